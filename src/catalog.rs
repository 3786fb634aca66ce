//! Catalog loading: the symbols file → flat, ordered symbol records.
//!
//! The catalog is a JSON file with a top-level `tables` list. Each table
//! groups commands sharing package/kind/keyword metadata; loading flattens
//! tables into one record per command, preserving table order and in-table
//! order. Later stages report progress by position in this sequence, so the
//! ordering is part of the contract.

use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, TexiconsError};
use crate::types::SymbolKind;

/// One group of commands sharing metadata, as written in the catalog file.
#[derive(Debug, Clone, Deserialize)]
pub struct SymbolTable {
    /// Owning LaTeX package; absent means core LaTeX.
    #[serde(default)]
    pub package: Option<String>,
    #[serde(rename = "type")]
    pub kind: SymbolKind,
    /// Font-encoding directive injected into the render document.
    #[serde(default)]
    pub fontenc: Option<String>,
    #[serde(default)]
    keywords: Option<KeywordList>,
    pub symbols: Vec<String>,
}

impl SymbolTable {
    pub fn keywords(&self) -> Vec<String> {
        match &self.keywords {
            Some(list) => list.clone().into_vec(),
            None => Vec::new(),
        }
    }
}

/// Keyword field that accepts either a single string or a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum KeywordList {
    One(String),
    Many(Vec<String>),
}

impl KeywordList {
    fn into_vec(self) -> Vec<String> {
        match self {
            KeywordList::One(keyword) => vec![keyword],
            KeywordList::Many(keywords) => keywords,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    tables: Vec<SymbolTable>,
}

/// Flattened unit: one symbol command with its inherited table metadata.
///
/// Cache identity is `(command, package)`; the same command under two
/// packages is two distinct build units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRecord {
    pub command: String,
    pub package: Option<String>,
    pub kind: SymbolKind,
    pub keywords: Vec<String>,
    pub fontenc: Option<String>,
}

/// Reads and flattens the catalog file.
///
/// A missing file is `CatalogNotFound` and a structurally invalid one is
/// `CatalogParse`; both abort the run before any unit is processed.
pub fn load_catalog(path: &Path) -> Result<Vec<SymbolRecord>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            return Err(TexiconsError::CatalogNotFound(path.to_path_buf()))
        }
        Err(error) => return Err(error.into()),
    };
    let catalog: CatalogFile = serde_json::from_str(&content)
        .map_err(|error| TexiconsError::CatalogParse(format!("{}: {error}", path.display())))?;
    Ok(flatten(catalog))
}

fn flatten(catalog: CatalogFile) -> Vec<SymbolRecord> {
    let mut records = Vec::new();
    for table in catalog.tables {
        let keywords = table.keywords();
        for command in &table.symbols {
            if command.is_empty() {
                tracing::warn!("skipping empty symbol command in catalog");
                continue;
            }
            records.push(SymbolRecord {
                command: command.clone(),
                package: table.package.clone(),
                kind: table.kind,
                keywords: keywords.clone(),
                fontenc: table.fontenc.clone(),
            });
        }
    }
    records
}
