//! Content-addressed icon filenames.

use std::fmt::Write as _;

use sha2::{Digest, Sha256};

use crate::types::IconColor;

/// Package label used in cache keys for core-LaTeX symbols.
pub const BASE_PACKAGE: &str = "latex";

/// Derives the cache filename for one (command, color, package) unit.
///
/// The name is the first 16 hex characters of
/// `sha256("<command>-<color>-<package>")` plus a `.png` suffix. It depends
/// on nothing but its inputs, so repeated runs and different machines agree
/// on where an icon lives. Render-quality settings (DPI, gamma) are
/// deliberately excluded: changing them never invalidates existing icons.
pub fn icon_filename(command: &str, color: IconColor, package: Option<&str>) -> String {
    let key = format!("{command}-{color}-{}", package.unwrap_or(BASE_PACKAGE));
    let digest = Sha256::digest(key.as_bytes());
    let mut name = String::with_capacity(20);
    for byte in &digest[..8] {
        let _ = write!(name, "{byte:02x}");
    }
    name.push_str(".png");
    name
}
