//! Shadow detection.
//!
//! A path is shadowed in a source when one of its strict, non-empty prefixes
//! already holds a terminal (non-map) value there: `foo = "x"` masks
//! `foo.bar`. Each detector returns the shadowing prefix as a dotted key.

use serde_json::{Map, Value};

use super::path::join_path;
use super::tree::search_nested;
use crate::env::{EnvSource, env_var_name};

fn is_terminal(value: &Value) -> bool {
    !value.is_null() && !value.is_object()
}

/// Flat variant over an arbitrary key test.
///
/// Tries prefixes shortest first and returns the first one `is_set` accepts.
pub fn in_flat_keys<S, F>(path: &[S], is_set: F) -> Option<String>
where
    S: AsRef<str>,
    F: Fn(&str) -> bool,
{
    (1..path.len())
        .map(|len| join_path(&path[..len]))
        .find(|prefix| is_set(prefix.as_str()))
}

/// Flat variant: prefixes are tested as literal keys of `map`.
pub fn in_flat_map<S: AsRef<str>>(path: &[S], map: &Map<String, Value>) -> Option<String> {
    in_flat_keys(path, |prefix| map.get(prefix).is_some_and(is_terminal))
}

/// Nested variant: prefixes are walked level by level through `map`.
pub fn in_nested_map<S: AsRef<str>>(path: &[S], map: &Map<String, Value>) -> Option<String> {
    for len in 1..path.len() {
        match search_nested(map, &path[..len]) {
            None => return None,
            Some(Value::Object(_)) => continue,
            Some(_) => return Some(join_path(&path[..len])),
        }
    }
    None
}

/// Environment variant: prefixes are tested as `PREFIX_KEY` variables.
pub fn in_environment<S: AsRef<str>>(
    path: &[S],
    env: &dyn EnvSource,
    env_prefix: Option<&str>,
) -> Option<String> {
    in_flat_keys(path, |prefix| env.var(&env_var_name(env_prefix, prefix)).is_some())
}
