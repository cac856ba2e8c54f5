//! Walking and building nested value trees.
//!
//! Two lookup strategies live here:
//! - [`search_nested`] walks one segment per level. Used for overrides and
//!   defaults, which are only ever written through [`ensure_path`].
//! - [`search_with_prefix`] tries the longest dotted prefix as a literal key
//!   first, then shorter ones, descending into maps for the remainder. Used
//!   for file config, where a loader may hand back `"a.b.c"` as a single key.
//!
//! `Value::Null` counts as absent everywhere; every other value, including
//! `false`, `0`, `""` and empty containers, is a found value.

use serde_json::{Map, Value};

use super::path::join_path;
use crate::error::{Error, Result};

/// Human-readable name of a value's variant.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "map",
    }
}

/// Filter out structurally absent values.
pub fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

/// Return the map at `path` inside `haystack`, creating it as needed.
///
/// Missing segments get an empty map. A non-map value sitting on the path is
/// replaced by an empty map, discarding it. The returned map is borrowed from
/// `haystack`, so assigning into it mutates the tree in place.
pub fn ensure_path<'a, S: AsRef<str>>(
    haystack: &'a mut Map<String, Value>,
    path: &[S],
) -> &'a mut Map<String, Value> {
    let mut current = haystack;
    for segment in path {
        let slot = current
            .entry(segment.as_ref())
            .or_insert_with(|| Value::Object(Map::new()));
        current = as_map_mut(slot);
    }
    current
}

/// [`ensure_path`] for an untyped haystack.
///
/// Fails with `TypeMismatch` when `haystack` is not a map.
pub fn deep_insert<'a, S: AsRef<str>>(
    haystack: &'a mut Value,
    path: &[S],
) -> Result<&'a mut Map<String, Value>> {
    match haystack {
        Value::Object(map) => Ok(ensure_path(map, path)),
        other => Err(Error::type_mismatch("map", value_kind(other))),
    }
}

fn as_map_mut(slot: &mut Value) -> &mut Map<String, Value> {
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(map) => map,
        _ => unreachable!("slot holds a map after replacement"),
    }
}

/// Exact walk: one path segment per nesting level.
pub fn search_nested<'a, S: AsRef<str>>(
    map: &'a Map<String, Value>,
    path: &[S],
) -> Option<&'a Value> {
    let (last, parents) = path.split_last()?;
    let mut current = map;
    for segment in parents {
        current = current.get(segment.as_ref())?.as_object()?;
    }
    present(current.get(last.as_ref()))
}

/// Longest-prefix-first walk that accepts flattened dotted keys.
pub fn search_with_prefix<'a, S: AsRef<str>>(
    map: &'a Map<String, Value>,
    path: &[S],
) -> Option<&'a Value> {
    for index in (1..=path.len()).rev() {
        let Some(value) = map.get(&join_path(&path[..index])) else {
            continue;
        };
        if index == path.len() {
            if !value.is_null() {
                return Some(value);
            }
            continue;
        }
        if let Value::Object(nested) = value
            && let Some(found) = search_with_prefix(nested, &path[index..])
        {
            return Some(found);
        }
    }
    None
}

/// Remove the leaf at `path`, returning it.
///
/// A missing or non-map intermediate makes this a no-op.
pub fn remove_nested<S: AsRef<str>>(map: &mut Map<String, Value>, path: &[S]) -> Option<Value> {
    let (last, parents) = path.split_last()?;
    let mut current = map;
    for segment in parents {
        current = current.get_mut(segment.as_ref())?.as_object_mut()?;
    }
    current.remove(last.as_ref())
}

/// Recursively lowercase every map key in `value`.
///
/// When two keys collide after lowercasing, the one iterated last wins.
pub fn lowercase_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(lowercase_map(map)),
        Value::Array(items) => Value::Array(items.into_iter().map(lowercase_keys).collect()),
        other => other,
    }
}

pub fn lowercase_map(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .map(|(key, value)| (key.to_lowercase(), lowercase_keys(value)))
        .collect()
}
