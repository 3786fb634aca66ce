//! The refresh trigger exposed to interactive callers.

use std::fs;
use std::path::PathBuf;

use crate::catalog;
use crate::config::BuildConfig;
use crate::error::{Result, TexiconsError};
use crate::generator::IconGenerator;
use crate::pipeline::{CommandRunner, SystemRunner};
use crate::types::RefreshSummary;

/// Rebuilds every missing icon and rewrites the metadata index.
///
/// Never returns an error: per-unit toolchain failures are logged and
/// skipped, and catalog-level failures abort the run with the reason in
/// [`RefreshSummary::fatal`], leaving any previous index untouched.
pub fn run_refresh(config: &BuildConfig) -> RefreshSummary {
    run_refresh_with(config, &SystemRunner)
}

/// [`run_refresh`] with a caller-supplied stage runner.
pub fn run_refresh_with(config: &BuildConfig, runner: &dyn CommandRunner) -> RefreshSummary {
    match try_refresh(config, runner) {
        Ok(summary) => summary,
        Err(error) => {
            tracing::error!("icon refresh aborted: {error}");
            RefreshSummary { fatal: Some(error.to_string()), ..RefreshSummary::default() }
        }
    }
}

fn try_refresh(config: &BuildConfig, runner: &dyn CommandRunner) -> Result<RefreshSummary> {
    let records = catalog::load_catalog(&config.catalog_path())?;
    tracing::info!("refreshing {} symbols from {}", records.len(), config.catalog_path().display());
    IconGenerator::new(config, runner).run(&records)
}

/// Launches a refresh on a background blocking task so an interactive
/// caller is never blocked by the toolchain.
pub fn spawn_refresh(config: BuildConfig) -> tokio::task::JoinHandle<RefreshSummary> {
    tokio::task::spawn_blocking(move || run_refresh(&config))
}

/// Copies the base catalog into the user tier when no override exists yet,
/// giving the user an editable starting point. Returns the override path.
pub fn seed_user_catalog(config: &BuildConfig) -> Result<PathBuf> {
    let user_path = config.user_catalog_path();
    if user_path.is_file() {
        return Ok(user_path);
    }
    let base_path = config.base_catalog_path();
    if !base_path.is_file() {
        return Err(TexiconsError::CatalogNotFound(base_path));
    }
    fs::create_dir_all(&config.user_dir)?;
    fs::copy(&base_path, &user_path)?;
    Ok(user_path)
}
