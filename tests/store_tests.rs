//! Integration tests for key resolution across the store's sources.
//!
//! Every test runs against an in-memory environment, so none of them touch
//! the process environment.

use std::sync::Arc;

use gila::{ConfigFormat, ConfigStore, ConfigTier, ErrorCode, MapEnv};
use serde_json::{Value, json};

/// Store reading a fresh in-memory environment, returned alongside it.
fn store_with(vars: &[(&str, &str)]) -> (ConfigStore, Arc<MapEnv>) {
    let env: Arc<MapEnv> = Arc::new(vars.iter().copied().collect());
    (ConfigStore::with_env(env.clone()), env)
}

fn yaml(store: &mut ConfigStore, content: &str) {
    store
        .read_config(ConfigFormat::Yaml, content.as_bytes())
        .expect("valid yaml");
}

// ============================================================================
// Aliases
// ============================================================================

#[test]
fn test_alias_reads_every_tier_of_its_key() {
    let (mut store, env) = store_with(&[]);
    store.register_alias("db_host", "database.host").unwrap();

    store.set_default("database.host", "default-host");
    assert_eq!(store.get("db_host"), store.get("database.host"));

    yaml(&mut store, "database:\n  host: file-host\n");
    assert_eq!(store.get("db_host"), Some(json!("file-host")));

    store.bind_env_var("database.host", "DB_HOST");
    env.set("DB_HOST", "env-host");
    assert_eq!(store.get("db_host"), Some(json!("env-host")));

    store.set_override("database.host", "override-host");
    assert_eq!(store.get("db_host"), store.get("database.host"));
    assert_eq!(store.get("DB_HOST"), Some(json!("override-host")));
}

#[test]
fn test_alias_chain_resolves_to_end() {
    let (mut store, _) = store_with(&[]);
    store.register_alias("a", "b").unwrap();
    store.register_alias("b", "c").unwrap();
    store.set_default("c", 3);
    assert_eq!(store.get("a"), Some(json!(3)));
    assert_eq!(store.aliases().resolve("a"), "c");
}

#[test]
fn test_alias_does_not_migrate_existing_value() {
    let (mut store, _) = store_with(&[]);
    store.set_default("old", "kept");
    store.register_alias("old", "new").unwrap();
    assert_eq!(store.get("old"), None);
    store.deregister_alias("old");
    assert_eq!(store.get("old"), Some(json!("kept")));
}

#[test]
fn test_cycle_rejection_leaves_table_unchanged() {
    let (mut store, _) = store_with(&[]);
    store.register_alias("a", "b").unwrap();
    store.register_alias("b", "c").unwrap();
    let before = store.aliases().clone();

    for (alias, key) in [("b", "a"), ("c", "a"), ("a", "a")] {
        let err = store.register_alias(alias, key).unwrap_err();
        assert_eq!(err.code, ErrorCode::CircularReference, "{alias} -> {key}");
    }
    assert_eq!(store.aliases(), &before);
}

// ============================================================================
// Precedence
// ============================================================================

#[test]
fn test_precedence_independent_of_insertion_order() {
    let (mut forward, _) = store_with(&[("APP_KEY", "auto"), ("BOUND", "bound")]);
    forward.set_default("key", "default");
    yaml(&mut forward, "key: file\n");
    forward.bind_env_var("key", "BOUND");
    forward.set_env_prefix("app");
    forward.enable_automatic_env();
    forward.set_override("key", "override");

    let (mut backward, _) = store_with(&[("APP_KEY", "auto"), ("BOUND", "bound")]);
    backward.set_override("key", "override");
    backward.set_env_prefix("app");
    backward.enable_automatic_env();
    backward.bind_env_var("key", "BOUND");
    yaml(&mut backward, "key: file\n");
    backward.set_default("key", "default");

    assert_eq!(forward.get("key"), Some(json!("override")));
    assert_eq!(backward.get("key"), Some(json!("override")));
}

#[test]
fn test_each_tier_wins_over_the_ones_below() {
    let (mut store, env) = store_with(&[]);
    store.set_env_prefix("app");
    store.enable_automatic_env();
    store.bind_env_var("key", "BOUND");
    store.set_default("key", "default");
    assert_eq!(store.lookup("key").unwrap().tier, ConfigTier::Default);

    yaml(&mut store, "key: file\n");
    assert_eq!(store.lookup("key").unwrap().tier, ConfigTier::File);

    env.set("BOUND", "bound");
    assert_eq!(store.lookup("key").unwrap().tier, ConfigTier::BoundEnv);

    env.set("APP_KEY", "auto");
    assert_eq!(store.lookup("key").unwrap().tier, ConfigTier::AutomaticEnv);

    store.set_override("key", "override");
    assert_eq!(store.lookup("key").unwrap().tier, ConfigTier::Override);
}

// ============================================================================
// Falsy values
// ============================================================================

#[test]
fn test_falsy_override_is_returned() {
    let (mut store, _) = store_with(&[]);
    store.set_override("flag", false);
    assert_eq!(store.get("flag"), Some(json!(false)));
    assert_eq!(store.get("unset_key"), None);
}

#[test]
fn test_falsy_file_values_beat_defaults() {
    let (mut store, _) = store_with(&[]);
    yaml(&mut store, "count: 0\nname: ''\nitems: []\nnested: {}\nratio: 0.0\n");
    for key in ["count", "name", "items", "nested", "ratio"] {
        store.set_default(key, "default");
    }
    assert_eq!(store.get("count"), Some(json!(0)));
    assert_eq!(store.get("name"), Some(json!("")));
    assert_eq!(store.get("items"), Some(json!([])));
    assert_eq!(store.get("nested"), Some(json!({})));
    assert_eq!(store.get("ratio"), Some(json!(0.0)));
}

#[test]
fn test_null_file_value_falls_through() {
    let (mut store, _) = store_with(&[]);
    yaml(&mut store, "key: ~\n");
    store.set_default("key", "default");
    assert_eq!(store.get("key"), Some(json!("default")));
}

// ============================================================================
// Shadowing
// ============================================================================

#[test]
fn test_scalar_override_shadows_nested_default() {
    let (mut store, _) = store_with(&[]);
    store.set_override("foo", "scalar");
    store.set_default("foo.bar", "nested");
    assert_eq!(store.get("foo.bar"), None);
}

#[test]
fn test_scalar_in_file_shadows_nested_default() {
    let (mut store, _) = store_with(&[]);
    yaml(&mut store, "foo: scalar\n");
    store.set_default("foo.bar", "nested");
    assert_eq!(store.get("foo.bar"), None);
    assert_eq!(store.get("foo"), Some(json!("scalar")));
}

#[test]
fn test_automatic_env_prefix_shadows_lower_tiers() {
    let (mut store, _) = store_with(&[("FOO", "env")]);
    store.enable_automatic_env();
    store.set_default("foo.bar", "nested");
    assert_eq!(store.get("foo.bar"), None);
}

#[test]
fn test_flattened_file_key_is_found() {
    let (mut store, _) = store_with(&[]);
    store
        .read_config(ConfigFormat::Json, &br#"{"server.port": 8080}"#[..])
        .unwrap();
    assert_eq!(store.get("server.port"), Some(json!(8080)));
}

// ============================================================================
// Removal and reset
// ============================================================================

#[test]
fn test_removal_falls_back_to_bound_env() {
    let (mut store, _) = store_with(&[("GILA_KEY", "test")]);
    store.bind_env("gila_key");
    store.set_override("gila_key", "value");
    assert_eq!(store.get("gila_key"), Some(json!("value")));
    store.remove_override("gila_key");
    assert_eq!(store.get("gila_key"), Some(json!("test")));
}

#[test]
fn test_reset_forgets_every_key() {
    let (mut store, _) = store_with(&[("APP_AUTO", "x"), ("BOUND", "y")]);
    store.set_default("a", 1);
    store.set_override("b.c", 2);
    yaml(&mut store, "d: 3\n");
    store.bind_env_var("e", "BOUND");
    store.set_env_prefix("app");
    store.enable_automatic_env();
    store.register_alias("f", "a").unwrap();

    let keys = ["a", "b.c", "d", "e", "f", "auto"];
    assert!(keys.iter().all(|key| store.is_set(key)));

    store.reset();
    for key in keys {
        assert_eq!(store.get(key), None, "{key} survived reset");
    }
}

// ============================================================================
// End to end
// ============================================================================

#[test]
fn test_default_then_override() {
    let (mut store, _) = store_with(&[]);
    store.set_default("host", "localhost:8080");
    assert_eq!(store.get("host"), Some(json!("localhost:8080")));
    store.set_override("host", "localhost:9999");
    assert_eq!(store.get("host"), Some(json!("localhost:9999")));
}

#[test]
fn test_all_config_snapshot() {
    let (mut store, _) = store_with(&[("PORT", "9000")]);
    yaml(&mut store, "name: svc\ndb:\n  host: db.local\n");
    store.set_default("port", 80);
    store.set_default("db.port", 5432);
    store.bind_env("port");

    let all = Value::Object(store.all_config());
    // The file's db map wins over defaults as a whole; maps are not merged
    // across tiers.
    assert_eq!(
        all,
        json!({"name": "svc", "port": "9000", "db": {"host": "db.local"}})
    );
    assert_eq!(store.get("db.port"), Some(json!(5432)));
}
