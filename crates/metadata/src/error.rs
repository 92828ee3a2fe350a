use thiserror::Error;

/// Result type for metadata decoding
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Errors that can occur while decoding a metadata value
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Input was not valid JSON
    #[error("Invalid JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    /// JSON was valid but matched none of the value shapes
    #[error("Data corrupted at {path}: {detail}")]
    DataCorrupted { path: String, detail: String },
}

impl DecodeError {
    pub fn data_corrupted(path: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::DataCorrupted {
            path: path.into(),
            detail: detail.into(),
        }
    }

    /// Decode path of a `DataCorrupted` error (`$` is the document root)
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::DataCorrupted { path, .. } => Some(path),
            Self::Syntax(_) => None,
        }
    }
}
