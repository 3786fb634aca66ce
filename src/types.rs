//! Shared value types for the build pipeline and the query index.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Icon foreground color. Every symbol is rendered once per color so both
/// light and dark UI themes have a legible variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconColor {
    White,
    Black,
}

impl IconColor {
    /// All color variants, in build order.
    pub const ALL: [IconColor; 2] = [IconColor::White, IconColor::Black];

    pub fn as_str(self) -> &'static str {
        match self {
            IconColor::White => "white",
            IconColor::Black => "black",
        }
    }
}

impl fmt::Display for IconColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mode a symbol command is valid in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Math,
    Text,
    Both,
}

impl SymbolKind {
    /// Whether the command must be wrapped in inline-math delimiters when
    /// rendered. `Both` commands work in text mode, so only `Math` wraps.
    pub fn wraps_math(self) -> bool {
        self == SymbolKind::Math
    }
}

/// Cache tier an icon was found in.
///
/// The base tier is the shared, read-only catalog install; the user tier is
/// the writable override location. Builds only ever write to the user tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Base,
    User,
}

/// A cache hit: which tier answered and the absolute file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIcon {
    pub tier: Tier,
    pub path: PathBuf,
}

/// Outcome of processing one (symbol, color) build unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Icon already present in one of the cache tiers; no toolchain run.
    Exists,
    /// Icon rendered by the toolchain during this run.
    Generated,
    /// `latex` exited non-zero or produced no DVI despite a zero exit.
    CompileFailed,
    /// `dvipng` exited non-zero.
    RasterizeFailed,
    /// `mogrify` exited non-zero.
    ResizeFailed,
}

impl BuildOutcome {
    /// Whether the unit ended with a usable icon on disk.
    pub fn is_resolved(self) -> bool {
        matches!(self, BuildOutcome::Exists | BuildOutcome::Generated)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BuildOutcome::Exists => "exists",
            BuildOutcome::Generated => "generated",
            BuildOutcome::CompileFailed => "latex_failed",
            BuildOutcome::RasterizeFailed => "dvipng_failed",
            BuildOutcome::ResizeFailed => "mogrify_failed",
        }
    }
}

/// Per-run counters reported when a refresh finishes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    /// Build units processed (symbols × colors).
    pub total: usize,
    /// Units already cached in some tier.
    pub existing: usize,
    /// Units rendered during this run.
    pub generated: usize,
    /// Units that failed a toolchain stage.
    pub failed: usize,
    /// Set when the run aborted before processing units (catalog problems).
    pub fatal: Option<String>,
}

impl RefreshSummary {
    pub fn record(&mut self, outcome: BuildOutcome) {
        self.total += 1;
        match outcome {
            BuildOutcome::Exists => self.existing += 1,
            BuildOutcome::Generated => self.generated += 1,
            _ => self.failed += 1,
        }
    }
}
