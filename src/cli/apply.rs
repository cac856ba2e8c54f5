//! Turning parsed CLI options into a configured store, and printing results.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use serde_json::Value;

use super::{Cli, OutputFormat};
use crate::env::EnvSource;
use crate::store::ConfigStore;

/// Build a store from the global options.
///
/// Aliases are registered before any value is written so that `--set` and
/// `--default` through an alias land on the canonical key. A config file is
/// only loaded when `--config-file` or `--config-path` was given.
pub fn build_store(cli: &Cli, env: Arc<dyn EnvSource>) -> Result<ConfigStore> {
    let mut store = ConfigStore::with_env(env);

    for alias in &cli.aliases {
        let (alias, key) = split_assignment(alias)?;
        store.register_alias(alias, key)?;
    }

    if let Some(prefix) = &cli.env_prefix {
        store.set_env_prefix(prefix);
    }
    if cli.automatic_env {
        store.enable_automatic_env();
    }
    for binding in &cli.bind {
        match binding.split_once('=') {
            Some((key, var)) => store.bind_env_var(key, var),
            None => store.bind_env(binding),
        }
    }

    for dir in &cli.config_path {
        store.add_config_path(dir);
    }
    if let Some(name) = &cli.config_name {
        store.set_config_name(name);
    }
    if let Some(ext) = &cli.config_type {
        store.set_config_type(ext)?;
    }
    if let Some(file) = &cli.config_file {
        store.set_config_file(file)?;
    }
    if cli.config_file.is_some() || !cli.config_path.is_empty() {
        store
            .read_config_file()
            .context("Failed to load config file")?;
    }

    for default in &cli.defaults {
        let (key, raw) = split_assignment(default)?;
        store.set_default(key, parse_scalar(raw));
    }
    if let Some(prefix) = &cli.override_with_env {
        store.override_with_env(prefix);
    }
    for set in &cli.overrides {
        let (key, raw) = split_assignment(set)?;
        store.set_override(key, parse_scalar(raw));
    }

    Ok(store)
}

/// Split `KEY=VALUE` at the first `=`. The key must not be empty.
pub fn split_assignment(arg: &str) -> Result<(&str, &str)> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => bail!("Expected KEY=VALUE, got '{}'", arg),
    }
}

/// Parse a command-line value as YAML, so `8080` is a number and `true` a
/// bool. Empty input and anything YAML rejects stay strings.
pub fn parse_scalar(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::String(String::new());
    }
    match serde_yaml::from_str::<Value>(raw) {
        Ok(Value::Null) | Err(_) => Value::String(raw.to_string()),
        Ok(value) => value,
    }
}

/// Render a value in the requested format.
pub fn render(value: &impl Serialize, format: OutputFormat) -> Result<String> {
    let mut out = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    };
    if !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MapEnv;
    use crate::store::ConfigTier;
    use serde_json::json;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> Arc<dyn EnvSource> {
        Arc::new(pairs.iter().copied().collect::<MapEnv>())
    }

    #[test]
    fn test_parse_scalar() {
        assert_eq!(parse_scalar("8080"), json!(8080));
        assert_eq!(parse_scalar("false"), json!(false));
        assert_eq!(parse_scalar("1.5"), json!(1.5));
        assert_eq!(parse_scalar("hello"), json!("hello"));
        assert_eq!(parse_scalar(""), json!(""));
        assert_eq!(parse_scalar("~"), json!("~"));
        assert_eq!(parse_scalar("[a, b]"), json!(["a", "b"]));
        assert_eq!(parse_scalar("localhost:8080"), json!("localhost:8080"));
    }

    #[test]
    fn test_split_assignment() {
        assert_eq!(split_assignment("a.b=c=d").unwrap(), ("a.b", "c=d"));
        assert_eq!(split_assignment("a=").unwrap(), ("a", ""));
        assert!(split_assignment("=x").is_err());
        assert!(split_assignment("novalue").is_err());
    }

    #[test]
    fn test_build_store_layers_flags() {
        let cli = Cli {
            env_prefix: Some("app".into()),
            automatic_env: true,
            bind: vec!["token=SECRET".into()],
            defaults: vec!["port=80".into(), "host=localhost".into()],
            overrides: vec!["verbose=true".into()],
            aliases: vec!["loud=verbose".into()],
            ..Cli::default()
        };
        let store = build_store(&cli, env(&[("APP_PORT", "9000"), ("SECRET", "s3")])).unwrap();

        assert_eq!(store.get("port"), Some(json!("9000")));
        assert_eq!(store.lookup("port").unwrap().tier, ConfigTier::AutomaticEnv);
        assert_eq!(store.get("host"), Some(json!("localhost")));
        assert_eq!(store.get("token"), Some(json!("s3")));
        assert_eq!(store.get("loud"), Some(json!(true)));
    }

    #[test]
    fn test_build_store_loads_config_path() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("svc.toml"), "[db]\nport = 5432\n").unwrap();
        let cli = Cli {
            config_path: vec![dir.path().to_string_lossy().to_string()],
            config_name: Some("svc".into()),
            ..Cli::default()
        };
        let store = build_store(&cli, env(&[])).unwrap();
        assert_eq!(store.get("db.port"), Some(json!(5432)));
    }

    #[test]
    fn test_build_store_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let cli = Cli {
            config_path: vec![dir.path().to_string_lossy().to_string()],
            ..Cli::default()
        };
        let err = build_store(&cli, env(&[])).unwrap_err();
        let inner = err.downcast_ref::<crate::Error>().unwrap();
        assert_eq!(inner.code, crate::ErrorCode::ConfigFileNotFound);
    }

    #[test]
    fn test_build_store_override_with_env() {
        let cli = Cli {
            override_with_env: Some("SVC".into()),
            defaults: vec!["name=default".into()],
            ..Cli::default()
        };
        let store = build_store(&cli, env(&[("SVC_NAME", "from-env")])).unwrap();
        assert_eq!(store.get("name"), Some(json!("from-env")));
    }

    #[test]
    fn test_render() {
        let value = json!({"a": 1});
        assert_eq!(render(&value, OutputFormat::Json).unwrap(), "{\n  \"a\": 1\n}\n");
        assert_eq!(render(&value, OutputFormat::Yaml).unwrap(), "a: 1\n");
    }
}
