//! The symbols metadata index: entry types, reader, and the atomic writer.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TexiconsError};
use crate::types::{IconColor, SymbolKind};

/// Resolved icon paths per color, tier-relative (`icons/<color>/<key>.png`).
///
/// A color key is absent when every attempt to render that variant failed.
/// An entry with one missing color is degraded, not dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconPaths {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub white: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub black: Option<String>,
}

impl IconPaths {
    pub fn is_empty(&self) -> bool {
        self.white.is_none() && self.black.is_none()
    }

    pub fn get(&self, color: IconColor) -> Option<&str> {
        match color {
            IconColor::White => self.white.as_deref(),
            IconColor::Black => self.black.as_deref(),
        }
    }

    pub fn set(&mut self, color: IconColor, path: String) {
        match color {
            IconColor::White => self.white = Some(path),
            IconColor::Black => self.black = Some(path),
        }
    }
}

/// One symbol in the metadata index consumed by the presentation shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub name: String,
    pub package: Option<String>,
    #[serde(rename = "type")]
    pub kind: SymbolKind,
    pub keywords: Vec<String>,
    pub path: IconPaths,
}

/// Writes the full index, replacing any previous content.
///
/// The data lands under a temporary name and is renamed into place so a
/// concurrent reader never observes a half-written index.
pub fn write_metadata(path: &Path, entries: &[MetadataEntry]) -> Result<()> {
    let data = serde_json::to_string_pretty(entries).map_err(|error| {
        TexiconsError::Internal(format!("failed to serialize metadata index: {error}"))
    })?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, data)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

pub fn read_metadata(path: &Path) -> Result<Vec<MetadataEntry>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            return Err(TexiconsError::MetadataNotFound(path.to_path_buf()))
        }
        Err(error) => return Err(error.into()),
    };
    serde_json::from_str(&content)
        .map_err(|error| TexiconsError::MetadataParse(format!("{}: {error}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> MetadataEntry {
        MetadataEntry {
            name: name.to_string(),
            package: None,
            kind: SymbolKind::Math,
            keywords: vec!["greek".to_string()],
            path: IconPaths {
                white: Some("icons/white/abc.png".to_string()),
                black: Some("icons/black/def.png".to_string()),
            },
        }
    }

    #[test]
    fn roundtrips_entries() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("symbols_data.json");
        let entries = vec![entry("\\alpha"), entry("\\beta")];

        write_metadata(&path, &entries).expect("write");
        let loaded = read_metadata(&path).expect("read");
        assert_eq!(loaded, entries);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn rewrite_replaces_previous_content() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("symbols_data.json");

        write_metadata(&path, &[entry("\\alpha"), entry("\\beta")]).expect("write");
        write_metadata(&path, &[entry("\\gamma")]).expect("rewrite");

        let loaded = read_metadata(&path).expect("read");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "\\gamma");
    }

    #[test]
    fn missing_color_key_omitted_from_json() {
        let mut degraded = entry("\\alpha");
        degraded.path.white = None;
        let json = serde_json::to_string(&[degraded]).expect("serialize");
        assert!(!json.contains("white"));
        assert!(json.contains("black"));
    }

    #[test]
    fn missing_index_is_typed_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = read_metadata(&dir.path().join("absent.json")).expect_err("expected error");
        match err {
            TexiconsError::MetadataNotFound(_) => {}
            other => panic!("expected MetadataNotFound, got {other:?}"),
        }
    }

    #[test]
    fn garbage_index_is_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("symbols_data.json");
        fs::write(&path, "not json").expect("write");
        let err = read_metadata(&path).expect_err("expected error");
        match err {
            TexiconsError::MetadataParse(_) => {}
            other => panic!("expected MetadataParse, got {other:?}"),
        }
    }
}
