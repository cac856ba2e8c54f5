//! Alias table.
//!
//! Maps alias keys to the keys they stand for. Chains are allowed
//! (`a -> b -> c`), cycles are rejected when an alias is registered so that
//! resolution always reaches a fixed point.

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Alias -> key mapping with registration-time cycle rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    aliases: BTreeMap<String, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `alias -> key`.
    ///
    /// Fails with `CircularReference` when `alias == key` or when the chain
    /// starting at `key` passes through `alias`. Values stored under `alias`
    /// in any source are not migrated.
    pub fn register(&mut self, alias: &str, key: &str) -> Result<()> {
        if alias == key || self.chain_contains(key, alias) {
            return Err(Error::circular_reference(alias, key));
        }
        debug!(alias, key, "registered alias");
        self.aliases.insert(alias.to_string(), key.to_string());
        Ok(())
    }

    /// Remove an alias. No-op if it was never registered.
    pub fn deregister(&mut self, alias: &str) {
        if self.aliases.remove(alias).is_some() {
            debug!(alias, "deregistered alias");
        }
    }

    /// Follow the alias chain from `key` to its canonical key.
    pub fn resolve(&self, key: &str) -> String {
        let mut current = key;
        let mut visited: HashSet<&str> = HashSet::new();
        while let Some(next) = self.aliases.get(current) {
            // Unreachable while registration rejects cycles.
            if !visited.insert(current) {
                warn!(key, "alias cycle detected during resolution");
                break;
            }
            current = next.as_str();
        }
        current.to_string()
    }

    fn chain_contains(&self, start: &str, needle: &str) -> bool {
        let mut current = start;
        let mut visited: HashSet<&str> = HashSet::new();
        loop {
            if current == needle {
                return true;
            }
            if !visited.insert(current) {
                return false;
            }
            match self.aliases.get(current) {
                Some(next) => current = next.as_str(),
                None => return false,
            }
        }
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.aliases.contains_key(alias)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_resolve_unaliased_key_is_identity() {
        let table = AliasTable::new();
        assert_eq!(table.resolve("host"), "host");
    }

    #[test]
    fn test_resolve_follows_chain() {
        let mut table = AliasTable::new();
        table.register("a", "b").unwrap();
        table.register("b", "c").unwrap();
        assert_eq!(table.resolve("a"), "c");
        assert_eq!(table.resolve("b"), "c");
        assert!(table.iter().eq([("a", "b"), ("b", "c")]));
    }

    #[test]
    fn test_self_alias_rejected() {
        let mut table = AliasTable::new();
        let err = table.register("a", "a").unwrap_err();
        assert_eq!(err.code, ErrorCode::CircularReference);
        assert!(table.is_empty());
    }

    #[test]
    fn test_two_cycle_rejected_and_table_unchanged() {
        let mut table = AliasTable::new();
        table.register("a", "b").unwrap();
        let before = table.clone();

        let err = table.register("b", "a").unwrap_err();
        assert_eq!(err.code, ErrorCode::CircularReference);
        assert_eq!(table, before);
    }

    #[test]
    fn test_long_cycle_rejected() {
        let mut table = AliasTable::new();
        table.register("a", "b").unwrap();
        table.register("b", "c").unwrap();
        assert!(table.register("c", "a").is_err());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_retarget_into_cycle_rejected() {
        let mut table = AliasTable::new();
        table.register("a", "b").unwrap();
        table.register("c", "a").unwrap();
        // c -> a already exists, so a -> c would close a loop
        assert!(table.register("a", "c").is_err());
        assert_eq!(table.resolve("c"), "b");
    }

    #[test]
    fn test_reregister_replaces_target() {
        let mut table = AliasTable::new();
        table.register("a", "b").unwrap();
        table.register("a", "c").unwrap();
        assert_eq!(table.resolve("a"), "c");
    }

    #[test]
    fn test_deregister() {
        let mut table = AliasTable::new();
        table.register("a", "b").unwrap();
        table.deregister("a");
        table.deregister("missing");
        assert_eq!(table.resolve("a"), "a");
        assert!(!table.contains("a"));
    }
}
