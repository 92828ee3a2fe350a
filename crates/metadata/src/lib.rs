//! # Spotlight Metadata
//!
//! Typed representation of the metadata attributes an indexed item carries.
//!
//! ## Model
//!
//! ```text
//! engine value (untyped)
//!     │
//!     ├──> RawValue        string | integer | float | date | array | dictionary | unsupported
//!     │
//!     └──> MetadataValue   Text | Integer | Real | Timestamp | List | Map
//!              │
//!              └──> JSON   canonical text, object keys sorted
//! ```
//!
//! `MetadataValue` decodes JSON by trying its variants in a fixed order (Text, Integer, Real,
//! Timestamp, List, Map). JSON has no date type, so an encoded `Timestamp` comes back as `Text`;
//! use [`MetadataValue::as_timestamp`] when a date is expected.
//!
//! ## Example
//!
//! ```rust
//! use spotlight_metadata::MetadataValue;
//!
//! let value = MetadataValue::List(vec![MetadataValue::from("a"), MetadataValue::from(1_i64)]);
//! let text = value.encode().unwrap();
//! assert_eq!(text, r#"["a",1]"#);
//! assert_eq!(MetadataValue::decode(&text).unwrap(), value);
//! ```

mod error;
mod raw;
mod result;
mod value;

pub use error::{DecodeError, Result};
pub use raw::RawValue;
pub use result::SearchResult;
pub use value::{format_timestamp, AttributeMap, MetadataValue};
