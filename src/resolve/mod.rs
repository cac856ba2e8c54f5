//! Key resolution primitives.
//!
//! Everything the store needs to turn a raw dotted key into a value:
//! - [`path`] splits and joins dotted keys
//! - [`alias`] follows alias chains to canonical keys
//! - [`shadow`] detects scalar prefixes that mask longer paths
//! - [`tree`] walks and builds nested maps
//! - [`merge`] deep-merges value trees

pub mod alias;
pub mod merge;
pub mod path;
pub mod shadow;
pub mod tree;

pub use alias::AliasTable;
pub use merge::merge_into;
pub use path::{KEY_DELIMITER, join_path, normalize_key, split_key};
pub use tree::{deep_insert, ensure_path, search_nested, search_with_prefix};
