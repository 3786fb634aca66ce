//! CLI trigger for a full icon refresh.
//!
//! Roots come from `TEXICONS_BASE` (defaults to the current directory) and
//! `TEXICONS_USER` (defaults to the platform data directory); render tuning
//! comes from `DPI` and `GAMMA`.

use std::path::PathBuf;

use texicons::{run_refresh, BuildConfig};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let base_dir = std::env::var_os("TEXICONS_BASE")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let user_dir = std::env::var_os("TEXICONS_USER")
        .map(PathBuf::from)
        .or_else(|| dirs::data_dir().map(|dir| dir.join("texicons")))
        .unwrap_or_else(|| PathBuf::from("."));

    let config = BuildConfig::from_env(base_dir, user_dir);
    let summary = run_refresh(&config);
    if summary.fatal.is_some() {
        std::process::exit(1);
    }
}
