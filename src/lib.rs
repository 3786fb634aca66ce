//! LaTeX symbol icon cache: build pipeline and query index.
//!
//! This crate renders a catalog of LaTeX symbol commands into small raster
//! icons by orchestrating an external toolchain (`latex` → `dvipng` →
//! `mogrify`), keeps results in a two-tier content-addressed cache, and
//! serves a queryable metadata index to interactive callers:
//! - Catalog loading and flattening (`catalog`)
//! - Deterministic cache naming (`naming`)
//! - Base/user tier resolution (`resolve`)
//! - The three-stage toolchain pipeline (`pipeline`)
//! - Batch orchestration and the metadata index (`generator`, `metadata`)
//! - Filtered query access for popups and pickers (`index`)
//! - The never-failing refresh trigger (`refresh`)

pub mod catalog;
pub mod config;
pub mod error;
pub mod generator;
pub mod index;
pub mod metadata;
pub mod naming;
pub mod pipeline;
pub mod refresh;
pub mod resolve;
pub mod types;

pub use catalog::{load_catalog, SymbolRecord, SymbolTable};
pub use config::BuildConfig;
pub use error::{Result, TexiconsError};
pub use generator::IconGenerator;
pub use index::SymbolIndex;
pub use metadata::{IconPaths, MetadataEntry};
pub use pipeline::{CommandRunner, StageCommand, SystemRunner};
pub use refresh::{run_refresh, seed_user_catalog, spawn_refresh};
pub use types::{BuildOutcome, IconColor, RefreshSummary, SymbolKind, Tier};
