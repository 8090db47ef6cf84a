use thiserror::Error;

/// Errors produced while flattening documents into tables.
///
/// Only the spec-validation variants (`EmptySpec`, `ShortChain`) are raised
/// during flattening itself; missing elements in the data are logged and
/// skipped, never surfaced as errors.
#[derive(Debug, Error)]
pub enum EspalierError {
    #[error("extraction batch is empty: at least one extraction unit is required")]
    EmptySpec,

    #[error("parent path for table '{target}' must list at least two tags when given as a chain (got {len}); use a plain tag for a single parent")]
    ShortChain { target: String, len: usize },

    #[error("XML parse error: {0}")]
    Xml(String),

    #[error("document has no root element")]
    EmptyDocument,

    #[error("job spec error: {0}")]
    Spec(#[from] serde_json::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
