//! Batch orchestration: every (symbol, color) unit through the resolver and
//! the toolchain pipeline, finishing with a full metadata rewrite.

use std::fs;

use crate::catalog::SymbolRecord;
use crate::config::BuildConfig;
use crate::error::Result;
use crate::metadata::{self, IconPaths, MetadataEntry};
use crate::naming;
use crate::pipeline::{self, CommandRunner};
use crate::resolve;
use crate::types::{BuildOutcome, IconColor, RefreshSummary};

/// Drives a full build over a flattened catalog.
///
/// Units are processed strictly sequentially; the external tools are not
/// safe to run in parallel against shared temp and lock files.
pub struct IconGenerator<'a> {
    config: &'a BuildConfig,
    runner: &'a dyn CommandRunner,
}

impl<'a> IconGenerator<'a> {
    pub fn new(config: &'a BuildConfig, runner: &'a dyn CommandRunner) -> Self {
        Self { config, runner }
    }

    /// Processes every build unit in catalog order and rewrites the
    /// metadata index.
    ///
    /// Per-unit toolchain failures are logged and skipped; a symbol that
    /// fails for every color is dropped from the index, one that fails for
    /// some colors keeps the rest. Only filesystem problems around the
    /// output directories or the index itself propagate.
    pub fn run(&self, records: &[SymbolRecord]) -> Result<RefreshSummary> {
        self.ensure_output_dirs()?;

        let mut summary = RefreshSummary::default();
        let mut entries = Vec::new();
        let total = records.len();

        for (position, record) in records.iter().enumerate() {
            let mut paths = IconPaths::default();
            for color in IconColor::ALL {
                let outcome = self.process_unit(record, color, &mut paths);
                summary.record(outcome);
                match outcome {
                    BuildOutcome::Exists => tracing::info!(
                        "[{}/{total}] {} ({color}): already cached",
                        position + 1,
                        record.command
                    ),
                    BuildOutcome::Generated => tracing::info!(
                        "[{}/{total}] {} ({color}): generated",
                        position + 1,
                        record.command
                    ),
                    failure => tracing::warn!(
                        "[{}/{total}] {} ({color}): {}",
                        position + 1,
                        record.command,
                        failure.as_str()
                    ),
                }
            }

            if paths.is_empty() {
                tracing::warn!("{} failed for every color, dropped from index", record.command);
            } else {
                entries.push(MetadataEntry {
                    name: record.command.clone(),
                    package: record.package.clone(),
                    kind: record.kind,
                    keywords: record.keywords.clone(),
                    path: paths,
                });
            }
        }

        metadata::write_metadata(&self.config.metadata_path(), &entries)?;
        tracing::info!(
            "icon build finished: {} existing, {} generated, {} failed of {} units",
            summary.existing,
            summary.generated,
            summary.failed,
            summary.total
        );
        Ok(summary)
    }

    fn process_unit(
        &self,
        record: &SymbolRecord,
        color: IconColor,
        paths: &mut IconPaths,
    ) -> BuildOutcome {
        let filename = naming::icon_filename(&record.command, color, record.package.as_deref());
        if resolve::resolve_icon(self.config, color, &filename).is_some() {
            paths.set(color, BuildConfig::icon_rel_path(color, &filename));
            return BuildOutcome::Exists;
        }

        let target = resolve::build_target(self.config, color, &filename);
        let outcome = pipeline::render_icon(self.config, self.runner, record, color, &target);
        if outcome == BuildOutcome::Generated {
            paths.set(color, BuildConfig::icon_rel_path(color, &filename));
        }
        outcome
    }

    /// The user tier must hold both color directories before any unit runs;
    /// the rasterizer does not create missing output directories.
    fn ensure_output_dirs(&self) -> Result<()> {
        for color in IconColor::ALL {
            fs::create_dir_all(self.config.user_icon_dir(color))?;
        }
        Ok(())
    }
}
