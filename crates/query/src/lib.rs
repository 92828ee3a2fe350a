//! # Spotlight Query
//!
//! Builds native metadata-query fragments and runs them against a [`MetadataEngine`].
//!
//! ## Architecture
//!
//! ```text
//! intent (text | kind | since | raw)
//!     │
//!     ├──> QueryBuilder  → Predicate (native query fragment)
//!     │
//!     ├──> QueryExecutor → engine.create_query / set_scope / execute_synchronous
//!     │
//!     └──> result handles → SearchResult { path, attributes }
//! ```
//!
//! Two engines ship with the crate: [`MdfindEngine`] drives the macOS Spotlight command-line
//! tools, [`FilesystemEngine`] walks directories and evaluates the fragment itself so the same
//! pipeline works on hosts without an index.
//!
//! ## Example
//!
//! ```rust
//! use spotlight_query::QueryBuilder;
//!
//! let builder = QueryBuilder::new();
//! let predicate = builder.kind("IMAGE").expect("known kind");
//! assert_eq!(predicate.as_str(), r#"kMDItemContentTypeTree == "public.image""#);
//! ```

pub mod attrs;
mod engine;
mod error;
mod executor;
mod filesystem;
mod filter;
mod kind;
mod mdfind;
mod predicate;

pub use engine::{AttributeItem, EngineQuery, MetadataEngine, MetadataItem};
pub use error::{BuilderError, EngineError, QueryError};
pub use executor::QueryExecutor;
pub use filesystem::FilesystemEngine;
pub use kind::{content_type_for_kind, supported_kinds, KIND_TABLE};
pub use mdfind::MdfindEngine;
pub use predicate::{Predicate, PredicateOrigin, QueryBuilder};
