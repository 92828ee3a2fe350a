//! Spotlight MCP tool surface.
//!
//! Request flow: arguments → [`ArgumentExtractor`] → predicate → query executor →
//! [`PaginationPolicy`] → [`ResultFormatter`]. [`ToolRouter`] wraps the pipeline and turns every
//! [`ToolError`] into an error payload.

pub mod args;
pub mod catalog;
pub mod error;
pub mod format;
pub mod pagination;
pub mod paths;
pub mod router;
pub mod schemas;

pub use args::ArgumentExtractor;
pub use error::{ToolError, ToolResult};
pub use format::ResultFormatter;
pub use pagination::PaginationPolicy;
pub use paths::PathValidator;
pub use router::{ScopePolicy, ToolName, ToolResponse, ToolRouter};
