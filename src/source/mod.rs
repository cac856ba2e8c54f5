//! External value sources: config file formats and file discovery.

mod files;
mod format;

pub use files::{ResolvedFile, expand_home, find_config_file, normalize_extension};
pub use format::{ConfigFormat, SUPPORTED_EXTENSIONS};
