//! Two-tier icon cache resolution.

use std::path::PathBuf;

use crate::config::BuildConfig;
use crate::types::{IconColor, ResolvedIcon, Tier};

/// Looks up a cache filename in the base tier, then the user tier.
///
/// The base tier is vendor-provided pre-built content and always wins when
/// both tiers hold the key; a hit in either tier means no build happens.
pub fn resolve_icon(
    config: &BuildConfig,
    color: IconColor,
    filename: &str,
) -> Option<ResolvedIcon> {
    let base = config.base_icon_path(color, filename);
    if base.is_file() {
        return Some(ResolvedIcon { tier: Tier::Base, path: base });
    }
    let user = config.user_icon_path(color, filename);
    if user.is_file() {
        return Some(ResolvedIcon { tier: Tier::User, path: user });
    }
    None
}

/// Where a newly rendered icon must land. Always the user tier; the base
/// tier is never mutated by a build.
pub fn build_target(config: &BuildConfig, color: IconColor, filename: &str) -> PathBuf {
    config.user_icon_path(color, filename)
}
