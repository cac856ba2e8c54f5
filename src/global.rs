//! Process-wide default store.
//!
//! Free functions here forward to one shared [`ConfigStore`] reading the
//! process environment. Independent stores built with [`ConfigStore::new`]
//! are unaffected by anything in this module.
//!
//! A panic while the lock is held does not poison the store for later
//! callers: every method leaves the store consistent between statements.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::source::ConfigFormat;
use crate::store::{ConfigStore, Resolved};

static STORE: LazyLock<RwLock<ConfigStore>> = LazyLock::new(|| RwLock::new(ConfigStore::new()));

fn read() -> RwLockReadGuard<'static, ConfigStore> {
    STORE.read().unwrap_or_else(PoisonError::into_inner)
}

fn write() -> RwLockWriteGuard<'static, ConfigStore> {
    STORE.write().unwrap_or_else(PoisonError::into_inner)
}

/// Run `f` against the shared store under its read lock.
pub fn with<R>(f: impl FnOnce(&ConfigStore) -> R) -> R {
    f(&*read())
}

/// Run `f` against the shared store under its write lock.
pub fn with_mut<R>(f: impl FnOnce(&mut ConfigStore) -> R) -> R {
    f(&mut *write())
}

/// Discard the shared store and start over with an empty one.
pub fn reset() {
    *write() = ConfigStore::new();
    tracing::debug!("reset global config store");
}

pub fn get(key: &str) -> Option<Value> {
    read().get(key)
}

pub fn lookup(key: &str) -> Option<Resolved> {
    read().lookup(key)
}

pub fn is_set(key: &str) -> bool {
    read().is_set(key)
}

pub fn get_str(key: &str) -> Option<String> {
    read().get_str(key)
}

pub fn get_bool(key: &str) -> Option<bool> {
    read().get_bool(key)
}

pub fn get_i64(key: &str) -> Option<i64> {
    read().get_i64(key)
}

pub fn get_u64(key: &str) -> Option<u64> {
    read().get_u64(key)
}

pub fn get_f64(key: &str) -> Option<f64> {
    read().get_f64(key)
}

pub fn get_as<T: DeserializeOwned>(key: &str) -> Result<Option<T>> {
    read().get_as(key)
}

pub fn all_config() -> Map<String, Value> {
    read().all_config()
}

pub fn keys() -> Vec<String> {
    read().keys()
}

pub fn unmarshal<T: DeserializeOwned>() -> Result<T> {
    read().unmarshal()
}

pub fn debug() -> String {
    read().debug()
}

pub fn set_override(key: &str, value: impl Into<Value>) {
    write().set_override(key, value);
}

pub fn set_default(key: &str, value: impl Into<Value>) {
    write().set_default(key, value);
}

pub fn remove_override(key: &str) -> Option<Value> {
    write().remove_override(key)
}

pub fn remove_default(key: &str) -> Option<Value> {
    write().remove_default(key)
}

pub fn bind_env(key: &str) {
    write().bind_env(key);
}

pub fn bind_env_var(key: &str, var: &str) {
    write().bind_env_var(key, var);
}

pub fn unbind_env(key: &str) {
    write().unbind_env(key);
}

pub fn set_env_prefix(prefix: &str) {
    write().set_env_prefix(prefix);
}

pub fn enable_automatic_env() {
    write().enable_automatic_env();
}

pub fn override_with_env(prefix: &str) -> usize {
    write().override_with_env(prefix)
}

pub fn register_alias(alias: &str, key: &str) -> Result<()> {
    write().register_alias(alias, key)
}

pub fn deregister_alias(alias: &str) {
    write().deregister_alias(alias);
}

pub fn add_config_path(dir: &str) {
    write().add_config_path(dir);
}

pub fn set_config_name(name: &str) {
    write().set_config_name(name);
}

pub fn set_config_type(ext: &str) -> Result<()> {
    write().set_config_type(ext)
}

pub fn set_config_file(path: impl AsRef<Path>) -> Result<()> {
    write().set_config_file(path)
}

pub fn config_file_used() -> Option<PathBuf> {
    read().config_file_used().map(Path::to_path_buf)
}

pub fn read_config_file() -> Result<()> {
    write().read_config_file()
}

pub fn merge_config_file() -> Result<()> {
    write().merge_config_file()
}

pub fn read_config(format: ConfigFormat, reader: impl Read) -> Result<()> {
    write().read_config(format, reader)
}

pub fn merge_config(format: ConfigFormat, reader: impl Read) -> Result<()> {
    write().merge_config(format, reader)
}

pub fn in_config(key: &str) -> bool {
    read().in_config(key)
}
