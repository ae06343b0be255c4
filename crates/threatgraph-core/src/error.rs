use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Corpus has no header row")]
    MissingHeader,

    #[error("No supported encoding could decode the corpus (tried {0})")]
    UndecodableCorpus(String),

    #[error("Invalid entity label: {0}")]
    InvalidEntityLabel(String),

    #[error("Invalid relation kind: {0}")]
    InvalidRelationKind(String),

    #[error("Malformed pattern rule: {0}")]
    Pattern(#[from] regex::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
