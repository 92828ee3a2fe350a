use spotlight_query::{BuilderError, QueryError};
use thiserror::Error;

/// Caller-visible failure of one tool invocation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

pub type ToolResult<T> = std::result::Result<T, ToolError>;

impl ToolError {
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingArgument(name.into())
    }

    pub fn invalid(detail: impl Into<String>) -> Self {
        Self::InvalidArgument(detail.into())
    }

    /// Text shown to the caller, `<category>: <detail>`
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<QueryError> for ToolError {
    fn from(err: QueryError) -> Self {
        Self::QueryFailed(err.to_string())
    }
}

impl From<BuilderError> for ToolError {
    fn from(err: BuilderError) -> Self {
        match err {
            BuilderError::InvalidPredicate(detail) => Self::InvalidArgument(detail),
        }
    }
}
