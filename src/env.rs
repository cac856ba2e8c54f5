//! Environment variable access.
//!
//! The store only reads the environment through [`EnvSource`], so lookups can
//! run against the real process environment ([`ProcessEnv`]) or a fixed map
//! ([`MapEnv`]) without touching global state.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use tracing::warn;

/// Read-only view of a string -> string environment.
pub trait EnvSource: fmt::Debug + Send + Sync {
    /// Value of `name`, or `None` when unset.
    fn var(&self, name: &str) -> Option<String>;

    /// Snapshot of every variable.
    fn vars(&self) -> Vec<(String, String)>;
}

/// Name of the environment variable backing `key`.
///
/// `UPPER(prefix)_UPPER(key)`, or `UPPER(key)` when no prefix is set. Dots in
/// `key` are kept as-is.
pub fn env_var_name(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(prefix) if !prefix.is_empty() => {
            format!("{}_{}", prefix.to_uppercase(), key.to_uppercase())
        }
        _ => key.to_uppercase(),
    }
}

/// The live process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn vars(&self) -> Vec<(String, String)> {
        std::env::vars_os()
            .filter_map(|(name, value)| match (name.into_string(), value.into_string()) {
                (Ok(name), Ok(value)) => Some((name, value)),
                (name, _) => {
                    warn!(name = ?name, "skipping non-unicode environment variable");
                    None
                }
            })
            .collect()
    }
}

/// In-memory environment.
///
/// Variables can be changed after the store is built, which lets tests observe
/// live-binding versus snapshot behaviour.
#[derive(Debug, Default)]
pub struct MapEnv {
    vars: RwLock<BTreeMap<String, String>>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        self.vars
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), value.into());
    }

    pub fn remove(&self, name: &str) {
        self.vars
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name);
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for MapEnv {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let vars = iter
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        Self {
            vars: RwLock::new(vars),
        }
    }
}

impl EnvSource for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    fn vars(&self) -> Vec<(String, String)> {
        self.vars
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_env_var_name_with_prefix() {
        assert_eq!(env_var_name(Some("gila"), "db.host"), "GILA_DB.HOST");
    }

    #[test]
    fn test_env_var_name_without_prefix() {
        assert_eq!(env_var_name(None, "port"), "PORT");
        assert_eq!(env_var_name(Some(""), "port"), "PORT");
    }

    #[test]
    fn test_map_env_set_and_remove() {
        let env = MapEnv::from([("A", "1")]);
        assert_eq!(env.var("A").as_deref(), Some("1"));
        env.set("B", "");
        assert_eq!(env.var("B").as_deref(), Some(""));
        env.remove("A");
        assert_eq!(env.var("A"), None);
        assert_eq!(env.vars(), vec![("B".to_string(), String::new())]);
    }

    #[test]
    #[serial]
    fn test_process_env_reads_live_variables() {
        let name = "GILA_ENV_MODULE_TEST";
        // SAFETY: serialised with the other process-environment tests
        unsafe {
            std::env::set_var(name, "live");
        }
        assert_eq!(ProcessEnv.var(name).as_deref(), Some("live"));
        assert!(ProcessEnv.vars().iter().any(|(k, v)| k == name && v == "live"));

        unsafe {
            std::env::remove_var(name);
        }
        assert_eq!(ProcessEnv.var(name), None);
    }
}
