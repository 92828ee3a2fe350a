use thiserror::Error;

/// Errors raised while building a predicate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuilderError {
    #[error("Invalid predicate: {0}")]
    InvalidPredicate(String),
}

/// Errors raised by [`crate::QueryExecutor::execute`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// No scope directories were given; the engine would otherwise search everything
    #[error("Search scope is empty")]
    InvalidScope,

    #[error("Query execution failed: {0}")]
    ExecutionFailed(String),
}

/// Errors reported by a metadata engine backend
#[derive(Error, Debug)]
pub enum EngineError {
    /// The engine rejected the query text
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// The backend process or service could not be reached
    #[error("Engine unavailable: {0}")]
    Unavailable(String),

    #[error("Execution error: {0}")]
    Execution(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self::InvalidQuery(msg.into())
    }

    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }
}

impl From<EngineError> for QueryError {
    fn from(err: EngineError) -> Self {
        Self::ExecutionFailed(err.to_string())
    }
}
