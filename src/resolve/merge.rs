//! Deep merge of value trees.
//!
//! Used when a second config file is merged over the one already loaded.
//! Maps merge key by key; sequences and scalars from the overlay replace the
//! base outright; a null in the overlay leaves the base value in place.

use serde_json::{Map, Value};

/// Merge `overlay` into `base` in place, overlay winning.
pub fn merge_into(base: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, overlay_value) in overlay {
        match overlay_value {
            Value::Null => {}
            Value::Object(overlay_map) => {
                if let Some(Value::Object(base_map)) = base.get_mut(&key) {
                    merge_into(base_map, overlay_map);
                } else {
                    base.insert(key, Value::Object(overlay_map));
                }
            }
            other => {
                base.insert(key, other);
            }
        }
    }
}
