//! Config file discovery across search paths.
//!
//! Search directories are tried in the order they were added; within a
//! directory the supported extensions are tried in [`SUPPORTED_EXTENSIONS`]
//! order. The first existing file wins.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::format::{ConfigFormat, SUPPORTED_EXTENSIONS};
use crate::error::{Error, Result};

/// A config file located on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    /// Full path to the file
    pub path: PathBuf,
    /// Format selected by the file's extension
    pub format: ConfigFormat,
}

impl ResolvedFile {
    /// Resolve an explicitly named file.
    ///
    /// Fails with `ConfigNotSupported` for an unknown extension and with
    /// `ConfigFileNotFound` when the file does not exist.
    pub fn explicit(path: &Path) -> Result<Self> {
        let format = ConfigFormat::from_path(path)?;
        if !path.is_file() {
            return Err(Error::file_not_found(&[path]).with_path(path));
        }
        Ok(Self {
            path: path.to_path_buf(),
            format,
        })
    }
}

/// Find `{dir}/{name}{ext}` in the first search directory that has one.
///
/// With `fixed_extension` only that extension is tried; otherwise every
/// supported extension is.
pub fn find_config_file(
    search_paths: &[PathBuf],
    name: &str,
    fixed_extension: Option<&str>,
) -> Result<ResolvedFile> {
    let fixed = fixed_extension.map(normalize_extension);
    let extensions: Vec<&str> = match fixed.as_deref() {
        Some(ext) => vec![ext],
        None => SUPPORTED_EXTENSIONS.to_vec(),
    };

    for dir in search_paths {
        for ext in &extensions {
            let candidate = dir.join(format!("{name}{ext}"));
            if candidate.is_file() {
                debug!(path = %candidate.display(), "found config file");
                return Ok(ResolvedFile {
                    format: ConfigFormat::from_extension(ext)?,
                    path: candidate,
                });
            }
        }
    }

    Err(Error::file_not_found(search_paths))
}

/// Lowercase an extension and give it a leading dot.
pub fn normalize_extension(ext: &str) -> String {
    format!(".{}", ext.trim_start_matches('.').to_lowercase())
}

/// Expand a leading `~` or `$HOME` to the user's home directory.
///
/// Paths without either prefix, or when no home directory is known, are
/// returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    let rest = path
        .strip_prefix('~')
        .or_else(|| path.strip_prefix("$HOME"));
    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() || rest.starts_with(['/', '\\']) => {
            home.join(rest.trim_start_matches(['/', '\\']))
        }
        _ => PathBuf::from(path),
    }
}
