//! Query access to the metadata index for interactive callers.
//!
//! This is the read side consumed by popups and pickers: load the index
//! once per session, then filter it as the user types. The build side never
//! goes through this module.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::BuildConfig;
use crate::error::Result;
use crate::metadata::{self, MetadataEntry};
use crate::naming::BASE_PACKAGE;
use crate::types::IconColor;

/// In-memory view of the symbols index.
#[derive(Debug, Clone)]
pub struct SymbolIndex {
    entries: Vec<MetadataEntry>,
}

impl SymbolIndex {
    /// Loads the index, preferring the user tier copy over the base tier.
    pub fn load(config: &BuildConfig) -> Result<Self> {
        let user_path = config.metadata_path();
        let path = if user_path.is_file() {
            user_path
        } else {
            config.base_metadata_path()
        };
        Ok(Self { entries: metadata::read_metadata(&path)? })
    }

    pub fn from_entries(entries: Vec<MetadataEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[MetadataEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive substring filter over name, package, and keywords.
    /// An empty (or whitespace) filter matches everything.
    pub fn filter(&self, text: &str) -> Vec<&MetadataEntry> {
        let needle = text.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|entry| Self::matches(entry, &needle))
            .collect()
    }

    fn matches(entry: &MetadataEntry, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        if entry.name.to_lowercase().contains(needle) {
            return true;
        }
        if let Some(package) = &entry.package {
            if package.to_lowercase().contains(needle) {
                return true;
            }
        }
        entry
            .keywords
            .iter()
            .any(|keyword| keyword.to_lowercase().contains(needle))
    }

    /// Entries tagged with exactly this keyword (case-insensitive).
    pub fn by_keyword(&self, keyword: &str) -> Vec<&MetadataEntry> {
        let wanted = keyword.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| entry.keywords.iter().any(|k| k.to_lowercase() == wanted))
            .collect()
    }

    /// Entries owned by the named package (case-insensitive). Symbols with
    /// no package belong to the base package label.
    pub fn by_package(&self, package: &str) -> Vec<&MetadataEntry> {
        let wanted = package.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| Self::package_label(entry).to_lowercase() == wanted)
            .collect()
    }

    /// Distinct keywords across the index, sorted.
    pub fn keywords(&self) -> Vec<String> {
        let mut keywords: Vec<String> = self
            .entries
            .iter()
            .flat_map(|entry| entry.keywords.iter().cloned())
            .collect();
        keywords.sort();
        keywords.dedup();
        keywords
    }

    /// Distinct package labels, base package first, the rest alphabetical.
    pub fn packages(&self) -> Vec<String> {
        self.grouped_by_package()
            .into_iter()
            .map(|(label, _)| label)
            .collect()
    }

    /// Entries grouped by package label, preserving catalog order inside
    /// each group. The base package group sorts first so core symbols lead
    /// any grouped display.
    pub fn grouped_by_package(&self) -> Vec<(String, Vec<&MetadataEntry>)> {
        let mut groups: BTreeMap<String, Vec<&MetadataEntry>> = BTreeMap::new();
        for entry in &self.entries {
            groups
                .entry(Self::package_label(entry).to_string())
                .or_default()
                .push(entry);
        }
        let mut grouped: Vec<(String, Vec<&MetadataEntry>)> = groups.into_iter().collect();
        grouped.sort_by_key(|(label, _)| (label.as_str() != BASE_PACKAGE, label.to_lowercase()));
        grouped
    }

    /// Absolute path of an entry's icon, resolved base tier first.
    pub fn icon_path(
        &self,
        config: &BuildConfig,
        entry: &MetadataEntry,
        color: IconColor,
    ) -> Option<PathBuf> {
        let rel = entry.path.get(color)?;
        let base = config.base_dir.join(rel);
        if base.is_file() {
            return Some(base);
        }
        let user = config.user_dir.join(rel);
        user.is_file().then_some(user)
    }

    fn package_label(entry: &MetadataEntry) -> &str {
        entry.package.as_deref().unwrap_or(BASE_PACKAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{write_metadata, IconPaths};
    use crate::types::SymbolKind;

    fn entry(name: &str, package: Option<&str>, keywords: &[&str]) -> MetadataEntry {
        MetadataEntry {
            name: name.to_string(),
            package: package.map(str::to_string),
            kind: SymbolKind::Math,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            path: IconPaths {
                white: Some(format!("icons/white/{name}.png")),
                black: Some(format!("icons/black/{name}.png")),
            },
        }
    }

    fn sample_index() -> SymbolIndex {
        SymbolIndex::from_entries(vec![
            entry("\\alpha", None, &["greek"]),
            entry("\\beta", None, &["greek"]),
            entry("\\mathbb{R}", Some("amssymb"), &["sets", "blackboard"]),
            entry("\\coloneqq", Some("mathtools"), &["relations"]),
        ])
    }

    #[test]
    fn empty_filter_matches_everything() {
        let index = sample_index();
        assert_eq!(index.filter("").len(), 4);
        assert_eq!(index.filter("   ").len(), 4);
    }

    #[test]
    fn filter_matches_name_package_and_keywords() {
        let index = sample_index();
        assert_eq!(index.filter("ALPHA").len(), 1);
        assert_eq!(index.filter("amssymb").len(), 1);
        assert_eq!(index.filter("greek").len(), 2);
        assert!(index.filter("nonexistent").is_empty());
    }

    #[test]
    fn keyword_filter_is_exact() {
        let index = sample_index();
        assert_eq!(index.by_keyword("Greek").len(), 2);
        // Substrings are not keyword matches.
        assert!(index.by_keyword("gree").is_empty());
    }

    #[test]
    fn package_filter_treats_missing_as_base() {
        let index = sample_index();
        assert_eq!(index.by_package("latex").len(), 2);
        assert_eq!(index.by_package("mathtools").len(), 1);
    }

    #[test]
    fn distinct_keywords_sorted() {
        let index = sample_index();
        assert_eq!(
            index.keywords(),
            vec!["blackboard", "greek", "relations", "sets"]
        );
    }

    #[test]
    fn grouping_puts_base_package_first() {
        let index = sample_index();
        let grouped = index.grouped_by_package();
        let labels: Vec<&str> = grouped.iter().map(|(label, _)| label.as_str()).collect();
        assert_eq!(labels, vec!["latex", "amssymb", "mathtools"]);
        assert_eq!(grouped[0].1.len(), 2);
        assert_eq!(grouped[0].1[0].name, "\\alpha");
    }

    #[test]
    fn load_prefers_user_tier_copy() {
        let base = tempfile::tempdir().expect("tempdir");
        let user = tempfile::tempdir().expect("tempdir");
        let config = BuildConfig::new(base.path(), user.path());

        write_metadata(&config.base_metadata_path(), &[entry("\\base", None, &[])])
            .expect("write base");
        write_metadata(&config.metadata_path(), &[entry("\\user", None, &[])])
            .expect("write user");

        let index = SymbolIndex::load(&config).expect("load");
        assert_eq!(index.entries()[0].name, "\\user");
    }

    #[test]
    fn load_falls_back_to_base_tier() {
        let base = tempfile::tempdir().expect("tempdir");
        let user = tempfile::tempdir().expect("tempdir");
        let config = BuildConfig::new(base.path(), user.path());

        write_metadata(&config.base_metadata_path(), &[entry("\\base", None, &[])])
            .expect("write base");

        let index = SymbolIndex::load(&config).expect("load");
        assert_eq!(index.len(), 1);
        assert_eq!(index.entries()[0].name, "\\base");
    }

    #[test]
    fn icon_path_resolves_base_then_user() {
        let base = tempfile::tempdir().expect("tempdir");
        let user = tempfile::tempdir().expect("tempdir");
        let config = BuildConfig::new(base.path(), user.path());
        let index = sample_index();
        let sample = &index.entries()[0];
        let rel = sample.path.get(IconColor::White).expect("rel path");

        assert!(index.icon_path(&config, sample, IconColor::White).is_none());

        let user_icon = config.user_dir.join(rel);
        std::fs::create_dir_all(user_icon.parent().expect("parent")).expect("mkdir");
        std::fs::write(&user_icon, b"png").expect("write");
        assert_eq!(
            index.icon_path(&config, sample, IconColor::White),
            Some(user_icon)
        );

        let base_icon = config.base_dir.join(rel);
        std::fs::create_dir_all(base_icon.parent().expect("parent")).expect("mkdir");
        std::fs::write(&base_icon, b"png").expect("write");
        assert_eq!(
            index.icon_path(&config, sample, IconColor::White),
            Some(base_icon)
        );
    }
}
