//! Config file settings and loading.
//!
//! The file tier is replaced wholesale on every successful
//! [`ConfigStore::read_config_file`]; [`ConfigStore::merge_config_file`]
//! layers a second file over it instead.

use std::io::Read;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::ConfigStore;
use crate::error::{Error, Result};
use crate::resolve::tree::lowercase_map;
use crate::resolve::{merge_into, search_with_prefix, split_key};
use crate::source::{ConfigFormat, ResolvedFile, expand_home, find_config_file, normalize_extension};

/// Base name searched for when none is set.
pub const DEFAULT_CONFIG_NAME: &str = "config";

impl ConfigStore {
    /// Add a directory to search for the config file. `~` and `$HOME` are
    /// expanded. Empty input and duplicates are ignored.
    pub fn add_config_path(&mut self, dir: &str) {
        if dir.is_empty() {
            return;
        }
        let path = expand_home(dir);
        if self.config_paths.contains(&path) {
            return;
        }
        debug!(path = %path.display(), "added config path");
        self.config_paths.push(path);
    }

    /// Set the file name, without extension, to search for.
    pub fn set_config_name(&mut self, name: &str) {
        if name.is_empty() {
            return;
        }
        debug!(name, "set config name");
        self.config_name = Some(name.to_string());
    }

    /// Restrict discovery to a single extension.
    ///
    /// Accepts the extension with or without its dot, in any case. An empty
    /// value lifts the restriction.
    pub fn set_config_type(&mut self, ext: &str) -> Result<()> {
        if ext.is_empty() {
            self.config_type = None;
            return Ok(());
        }
        ConfigFormat::from_extension(ext)?;
        let ext = normalize_extension(ext);
        debug!(ext = %ext, "set config type");
        self.config_type = Some(ext);
        Ok(())
    }

    /// Pin the config file, bypassing discovery. The file's extension picks
    /// the loader.
    pub fn set_config_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        ConfigFormat::from_path(path)?;
        debug!(path = %path.display(), "set config file");
        self.config_file = Some(path.to_path_buf());
        Ok(())
    }

    /// The file the last successful load read from.
    pub fn config_file_used(&self) -> Option<&Path> {
        self.config_file_used.as_deref()
    }

    pub fn config_paths(&self) -> &[PathBuf] {
        &self.config_paths
    }

    /// Locate and load the config file, replacing the file tier.
    ///
    /// On failure the file tier is left as it was.
    pub fn read_config_file(&mut self) -> Result<()> {
        let (file, map) = self.load_located()?;
        debug!(path = %file.path.display(), keys = map.len(), "loaded config file");
        self.file_config = map;
        self.config_file_used = Some(file.path);
        Ok(())
    }

    /// Locate and load the config file, merging it over the file tier.
    pub fn merge_config_file(&mut self) -> Result<()> {
        let (file, map) = self.load_located()?;
        debug!(path = %file.path.display(), keys = map.len(), "merged config file");
        merge_into(&mut self.file_config, map);
        self.config_file_used = Some(file.path);
        Ok(())
    }

    /// Replace the file tier with config read from `reader`.
    ///
    /// Unlike [`read_config_file`](Self::read_config_file), empty input is
    /// accepted and clears the tier.
    pub fn read_config(&mut self, format: ConfigFormat, reader: impl Read) -> Result<()> {
        let map = lowercase_map(format.load_reader(reader)?);
        debug!(%format, keys = map.len(), "read config");
        self.file_config = map;
        Ok(())
    }

    /// Merge config read from `reader` over the file tier.
    pub fn merge_config(&mut self, format: ConfigFormat, reader: impl Read) -> Result<()> {
        let map = lowercase_map(format.load_reader(reader)?);
        debug!(%format, keys = map.len(), "merged config");
        merge_into(&mut self.file_config, map);
        Ok(())
    }

    /// Whether `key` has a value in the file tier, ignoring other tiers.
    pub fn in_config(&self, key: &str) -> bool {
        let key = self.canonical(key);
        search_with_prefix(&self.file_config, &split_key(&key)).is_some()
    }

    fn locate(&self) -> Result<ResolvedFile> {
        if let Some(path) = &self.config_file {
            return ResolvedFile::explicit(path);
        }
        let name = self.config_name.as_deref().unwrap_or(DEFAULT_CONFIG_NAME);
        find_config_file(&self.config_paths, name, self.config_type.as_deref())
    }

    fn load_located(&self) -> Result<(ResolvedFile, Map<String, Value>)> {
        let file = self.locate()?;
        let map = lowercase_map(file.format.load(&file.path)?);
        if map.is_empty() {
            warn!(path = %file.path.display(), "config file yielded no values");
            return Err(Error::empty_file(&file.path));
        }
        Ok((file, map))
    }
}
