//! Tool input shapes, used to generate the JSON schemas published in `tools/list`.

pub mod get_metadata;
pub mod recent_files;
pub mod search;
pub mod search_by_kind;
