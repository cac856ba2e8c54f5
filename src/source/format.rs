//! Config file formats and their loaders.
//!
//! Every loader produces a `serde_json` map of the file's top level. A
//! document that parses to nothing (empty file, `null`) yields an empty map;
//! the store treats that the same as a missing file.

use std::fmt;
use std::io::Read;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Every extension a config file may carry, in discovery order.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    ".yaml",
    ".yml",
    ".toml",
    ".json",
    ".hcl",
    ".properties",
    ".props",
    ".prop",
    ".env",
];

/// Supported config file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigFormat {
    Yaml,
    Toml,
    Json,
    Hcl,
    Properties,
    Dotenv,
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigFormat::Yaml => write!(f, "yaml"),
            ConfigFormat::Toml => write!(f, "toml"),
            ConfigFormat::Json => write!(f, "json"),
            ConfigFormat::Hcl => write!(f, "hcl"),
            ConfigFormat::Properties => write!(f, "properties"),
            ConfigFormat::Dotenv => write!(f, "env"),
        }
    }
}

impl ConfigFormat {
    /// Format for an extension, with or without the leading dot.
    pub fn from_extension(ext: &str) -> Result<Self> {
        let normalized = ext.trim_start_matches('.').to_lowercase();
        match normalized.as_str() {
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            "toml" => Ok(ConfigFormat::Toml),
            "json" => Ok(ConfigFormat::Json),
            "hcl" => Ok(ConfigFormat::Hcl),
            "properties" | "props" | "prop" => Ok(ConfigFormat::Properties),
            "env" => Ok(ConfigFormat::Dotenv),
            _ => Err(Error::not_supported(ext, SUPPORTED_EXTENSIONS)),
        }
    }

    /// Format for a file path, judged by its extension.
    ///
    /// A bare `.env` file has no extension as far as `Path` is concerned, so
    /// it is matched by name.
    pub fn from_path(path: &Path) -> Result<Self> {
        if path.file_name().is_some_and(|name| name == ".env") {
            return Ok(ConfigFormat::Dotenv);
        }
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) => Self::from_extension(ext),
            None => Err(Error::not_supported(&path.display().to_string(), SUPPORTED_EXTENSIONS)
                .with_path(path)),
        }
    }

    /// Load a file.
    pub fn load(&self, path: &Path) -> Result<Map<String, Value>> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::invalid_file(path, e))?;
        self.parse(&content)
            .map_err(|e| Error::invalid_file(path, e.message))
    }

    /// Load from any reader.
    pub fn load_reader(&self, mut reader: impl Read) -> Result<Map<String, Value>> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .map_err(|e| Error::invalid_content(self, e))?;
        self.parse(&content)
    }

    /// Parse file content.
    pub fn parse(&self, content: &str) -> Result<Map<String, Value>> {
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        let value = match self {
            ConfigFormat::Yaml => {
                serde_yaml::from_str::<Value>(content).map_err(|e| Error::invalid_content(self, e))?
            }
            ConfigFormat::Toml => {
                let table = toml::from_str::<toml::Value>(content)
                    .map_err(|e| Error::invalid_content(self, e))?;
                toml_to_json(table)
            }
            ConfigFormat::Json => {
                serde_json::from_str::<Value>(content).map_err(|e| Error::invalid_content(self, e))?
            }
            ConfigFormat::Hcl => {
                hcl::from_str::<Value>(content).map_err(|e| Error::invalid_content(self, e))?
            }
            ConfigFormat::Properties => Value::Object(parse_properties(content)),
            ConfigFormat::Dotenv => Value::Object(
                parse_dotenv(content).map_err(|e| Error::invalid_content(self, e))?,
            ),
        };

        match value {
            Value::Object(map) => Ok(map),
            Value::Null => Ok(Map::new()),
            other => Err(Error::invalid_content(
                self,
                format!(
                    "top level must be a mapping, found {}",
                    crate::resolve::tree::value_kind(&other)
                ),
            )),
        }
    }
}

/// Convert a TOML value into the store's value model.
///
/// Datetimes have no counterpart and become their RFC 3339 string.
fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

/// Parse Java-style properties.
///
/// Keys are lowercased and every value is a string. `#`, `!` and `;` start
/// comment lines; a trailing backslash continues the value on the next line.
fn parse_properties(content: &str) -> Map<String, Value> {
    let mut map = Map::new();
    let mut lines = content.lines();
    while let Some(line) = lines.next() {
        let line = line.trim_start();
        if line.is_empty() || line.starts_with(['#', '!', ';']) {
            continue;
        }

        let mut logical = line.to_string();
        while logical.ends_with('\\') {
            logical.pop();
            match lines.next() {
                Some(next) => logical.push_str(next.trim_start()),
                None => break,
            }
        }

        let (key, value) = match logical.find(['=', ':']) {
            Some(idx) => (&logical[..idx], &logical[idx + 1..]),
            None => logical
                .split_once(char::is_whitespace)
                .unwrap_or((logical.as_str(), "")),
        };
        map.insert(
            key.trim().to_lowercase(),
            Value::String(value.trim().to_string()),
        );
    }
    map
}

fn parse_dotenv(content: &str) -> std::result::Result<Map<String, Value>, dotenvy::Error> {
    dotenvy::from_read_iter(content.as_bytes())
        .map(|entry| entry.map(|(key, value)| (key, Value::String(value))))
        .collect()
}
