use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TexiconsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog file not found: {0}")]
    CatalogNotFound(PathBuf),

    #[error("catalog parse error: {0}")]
    CatalogParse(String),

    #[error("metadata index not found: {0}")]
    MetadataNotFound(PathBuf),

    #[error("metadata parse error: {0}")]
    MetadataParse(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, TexiconsError>;
