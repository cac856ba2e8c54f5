//! The hierarchical config store.
//!
//! A [`ConfigStore`] owns five value sources and an alias table. Lookups walk
//! the sources in fixed precedence order:
//!
//! 1. **Overrides** - `set_override`
//! 2. **Automatic env** - `PREFIX_KEY` for any key, once enabled
//! 3. **Bound env** - `bind_env`
//! 4. **File** - `read_config_file`
//! 5. **Defaults** - `set_default`
//!
//! A scalar at a shorter prefix in the source being consulted (`foo = "x"`
//! when looking up `foo.bar`) ends the lookup with nothing found, without
//! consulting lower tiers.
//!
//! The store does no locking of its own. Share it across threads behind one
//! lock, as [`crate::global`] does.

mod files;
mod mutate;
mod tier;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::trace;

use crate::env::{EnvSource, ProcessEnv, env_var_name};
use crate::error::{Error, ErrorCode, Result};
use crate::resolve::shadow::{in_environment, in_flat_keys, in_flat_map, in_nested_map};
use crate::resolve::{AliasTable, normalize_key, search_nested, search_with_prefix, split_key};

pub use tier::{ConfigTier, Resolved};

/// Config store merging overrides, environment, a config file and defaults.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    aliases: AliasTable,
    overrides: Map<String, Value>,
    /// Lowercase key -> environment variable name
    env_bindings: BTreeMap<String, String>,
    /// Uppercased at use, not at set
    env_prefix: Option<String>,
    automatic_env: bool,
    file_config: Map<String, Value>,
    defaults: Map<String, Value>,

    config_paths: Vec<PathBuf>,
    config_name: Option<String>,
    config_type: Option<String>,
    config_file: Option<PathBuf>,
    config_file_used: Option<PathBuf>,

    env: Arc<dyn EnvSource>,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore {
    /// Create an empty store reading the process environment.
    pub fn new() -> Self {
        Self::with_env(Arc::new(ProcessEnv))
    }

    /// Create an empty store reading the given environment.
    pub fn with_env(env: Arc<dyn EnvSource>) -> Self {
        Self {
            aliases: AliasTable::new(),
            overrides: Map::new(),
            env_bindings: BTreeMap::new(),
            env_prefix: None,
            automatic_env: false,
            file_config: Map::new(),
            defaults: Map::new(),
            config_paths: Vec::new(),
            config_name: None,
            config_type: None,
            config_file: None,
            config_file_used: None,
            env,
        }
    }

    /// Drop every value, binding, alias and file setting.
    ///
    /// The environment source is kept.
    pub fn reset(&mut self) {
        *self = Self::with_env(Arc::clone(&self.env));
    }

    /// Look up `key`, returning its value from the highest tier that has one.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.lookup(key).map(|resolved| resolved.value)
    }

    /// Look up `key` and report which tier supplied the value.
    pub fn lookup(&self, key: &str) -> Option<Resolved> {
        let raw_key = normalize_key(key);
        let raw_path = split_key(&raw_key);
        if let Some(prefix) = in_flat_keys(&raw_path, |p| self.aliases.contains(p)) {
            trace!(key = %raw_key, shadow = %prefix, "path shadowed by alias");
            return None;
        }

        let key = self.aliases.resolve(&raw_key);
        let path = split_key(&key);

        if let Some(value) = search_nested(&self.overrides, &path) {
            return Some(found(&key, value.clone(), ConfigTier::Override));
        }
        if let Some(prefix) =
            in_flat_map(&path, &self.overrides).or_else(|| in_nested_map(&path, &self.overrides))
        {
            return shadowed(&key, &prefix, ConfigTier::Override);
        }

        if self.automatic_env {
            let prefix = self.env_prefix.as_deref();
            if let Some(value) = self.env.var(&env_var_name(prefix, &key)) {
                return Some(found(&key, Value::String(value), ConfigTier::AutomaticEnv));
            }
            if let Some(shadow) = in_environment(&path, self.env.as_ref(), prefix) {
                return shadowed(&key, &shadow, ConfigTier::AutomaticEnv);
            }
        }

        if let Some(var) = self.env_bindings.get(&key)
            && let Some(value) = self.env.var(var)
        {
            return Some(found(&key, Value::String(value), ConfigTier::BoundEnv));
        }
        if let Some(prefix) = in_flat_keys(&path, |p| self.env_bindings.contains_key(p)) {
            return shadowed(&key, &prefix, ConfigTier::BoundEnv);
        }

        if let Some(value) = search_with_prefix(&self.file_config, &path) {
            return Some(found(&key, value.clone(), ConfigTier::File));
        }
        if let Some(prefix) = in_nested_map(&path, &self.file_config) {
            return shadowed(&key, &prefix, ConfigTier::File);
        }

        let value = search_nested(&self.defaults, &path)?;
        Some(found(&key, value.clone(), ConfigTier::Default))
    }

    /// Whether `key` resolves to a value in any tier.
    pub fn is_set(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Look up `key` as a string. No coercion from other types.
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key)?.as_bool()
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key)?.as_i64()
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key)?.as_u64()
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key)?.as_f64()
    }

    /// Look up `key` and deserialize it into `T`.
    ///
    /// `Ok(None)` when the key is not set; `TypeMismatch` when the value does
    /// not fit `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| Error::new(ErrorCode::TypeMismatch, e.to_string()).with_key(key))
    }

    /// Every key `all_config` reports, sorted.
    ///
    /// Keys only reachable through automatic env cannot be enumerated and are
    /// missing.
    pub fn keys(&self) -> Vec<String> {
        self.all_config().keys().cloned().collect()
    }

    /// Flat snapshot of every enumerable top-level key and its resolved value.
    pub fn all_config(&self) -> Map<String, Value> {
        let keys: BTreeSet<&String> = self
            .overrides
            .keys()
            .chain(self.env_bindings.keys())
            .chain(self.file_config.keys())
            .chain(self.defaults.keys())
            .collect();

        keys.into_iter()
            .map(|key| self.aliases.resolve(key))
            .filter_map(|key| self.get(&key).map(|value| (key, value)))
            .collect()
    }

    /// Deserialize the [`all_config`](Self::all_config) snapshot into `T`.
    pub fn unmarshal<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.all_config()))
            .map_err(|e| Error::new(ErrorCode::TypeMismatch, e.to_string()))
    }

    /// Human-readable dump of every source.
    pub fn debug(&self) -> String {
        let aliases: BTreeMap<&str, &str> = self.aliases.iter().collect();
        let mut out = String::new();
        let _ = writeln!(out, "Aliases: {}\n", to_json(&aliases));
        let _ = writeln!(out, "Override: {}\n", to_json(&self.overrides));
        let _ = writeln!(out, "Env: {}\n", to_json(&self.env_bindings));
        let _ = writeln!(out, "Config: {}\n", to_json(&self.file_config));
        let _ = writeln!(out, "Defaults: {}", to_json(&self.defaults));
        out
    }

    /// The alias table.
    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// The environment prefix as set, before uppercasing.
    pub fn env_prefix(&self) -> Option<&str> {
        self.env_prefix.as_deref()
    }

    pub fn is_automatic_env(&self) -> bool {
        self.automatic_env
    }
}

fn found(key: &str, value: Value, tier: ConfigTier) -> Resolved {
    trace!(key, %tier, "resolved");
    Resolved::new(value, tier)
}

fn shadowed(key: &str, prefix: &str, tier: ConfigTier) -> Option<Resolved> {
    trace!(key, prefix, %tier, "path shadowed");
    None
}

fn to_json(value: &impl serde::Serialize) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!("<{e}>"))
}
