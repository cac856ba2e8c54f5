//! Setters for overrides, defaults, environment bindings and aliases.

use serde_json::{Map, Value};
use tracing::debug;

use super::ConfigStore;
use crate::env::env_var_name;
use crate::error::Result;
use crate::resolve::tree::remove_nested;
use crate::resolve::{ensure_path, normalize_key, split_key};

impl ConfigStore {
    /// Set an override for `key`. Overrides win over every other source.
    pub fn set_override(&mut self, key: &str, value: impl Into<Value>) {
        let key = self.canonical(key);
        debug!(key = %key, "set override");
        insert_at(&mut self.overrides, &key, value.into());
    }

    /// Set the default for `key`, used when no other source has a value.
    pub fn set_default(&mut self, key: &str, value: impl Into<Value>) {
        let key = self.canonical(key);
        debug!(key = %key, "set default");
        insert_at(&mut self.defaults, &key, value.into());
    }

    /// Remove the override at `key`, returning the removed value.
    ///
    /// Only the leaf is removed; emptied parent maps stay behind.
    pub fn remove_override(&mut self, key: &str) -> Option<Value> {
        let key = self.canonical(key);
        let removed = remove_nested(&mut self.overrides, &split_key(&key));
        if removed.is_some() {
            debug!(key = %key, "removed override");
        }
        removed
    }

    /// Remove the default at `key`, returning the removed value.
    pub fn remove_default(&mut self, key: &str) -> Option<Value> {
        let key = self.canonical(key);
        let removed = remove_nested(&mut self.defaults, &split_key(&key));
        if removed.is_some() {
            debug!(key = %key, "removed default");
        }
        removed
    }

    /// Bind `key` to `PREFIX_KEY`, using the prefix set at the time of the call.
    pub fn bind_env(&mut self, key: &str) {
        let key = normalize_key(key);
        let var = env_var_name(self.env_prefix.as_deref(), &key);
        self.insert_binding(key, var);
    }

    /// Bind `key` to an explicitly named environment variable.
    pub fn bind_env_var(&mut self, key: &str, var: &str) {
        self.insert_binding(normalize_key(key), var.to_string());
    }

    fn insert_binding(&mut self, key: String, var: String) {
        debug!(key = %key, var = %var, "bound environment variable");
        self.env_bindings.insert(key, var);
    }

    /// Drop the environment binding for `key`. No-op if it was never bound.
    pub fn unbind_env(&mut self, key: &str) {
        if self.env_bindings.remove(&normalize_key(key)).is_some() {
            debug!(key, "unbound environment variable");
        }
    }

    /// Set the prefix for automatic env and for `bind_env` names.
    ///
    /// An empty prefix disables prefixing.
    pub fn set_env_prefix(&mut self, prefix: &str) {
        self.env_prefix = (!prefix.is_empty()).then(|| prefix.to_string());
        debug!(prefix, "set environment prefix");
    }

    /// Toggle automatic environment lookup. Calling twice restores the
    /// previous state.
    pub fn enable_automatic_env(&mut self) {
        self.automatic_env = !self.automatic_env;
        debug!(enabled = self.automatic_env, "toggled automatic env");
    }

    /// Copy every `{prefix}_*` environment variable into the overrides.
    ///
    /// `APP_DB_HOST` with prefix `APP` becomes the override `db_host`. This is
    /// a snapshot; later environment changes are not seen. Returns the number
    /// of overrides written.
    pub fn override_with_env(&mut self, prefix: &str) -> usize {
        let needle = format!("{prefix}_");
        let matches: Vec<(String, String)> = self
            .env
            .vars()
            .into_iter()
            .filter_map(|(name, value)| {
                let rest = name.strip_prefix(&needle)?;
                (!rest.is_empty()).then(|| (rest.to_lowercase(), value))
            })
            .collect();

        let count = matches.len();
        for (key, value) in matches {
            self.set_override(&key, value);
        }
        debug!(prefix, count, "copied environment into overrides");
        count
    }

    /// Register `alias` as another name for `key`.
    ///
    /// Fails with `CircularReference` if the alias would close a cycle; the
    /// table is left unchanged in that case.
    pub fn register_alias(&mut self, alias: &str, key: &str) -> Result<()> {
        self.aliases
            .register(&normalize_key(alias), &normalize_key(key))
    }

    pub fn deregister_alias(&mut self, alias: &str) {
        self.aliases.deregister(&normalize_key(alias));
    }

    /// Lowercase `key` and follow its alias chain.
    pub(super) fn canonical(&self, key: &str) -> String {
        self.aliases.resolve(&normalize_key(key))
    }
}

fn insert_at(map: &mut Map<String, Value>, key: &str, value: Value) {
    let path = split_key(key);
    if let Some((leaf, parents)) = path.split_last() {
        ensure_path(map, parents).insert(leaf.clone(), value);
    }
}
