// crates/atlasprep-core/src/document.rs

//! Thin accessors over a GeoJSON document held as `serde_json::Value`.
//!
//! Documents stay untyped on purpose: geometry, foreign members and anything
//! else we do not touch must round-trip exactly, and a typed model would
//! have to enumerate all of it.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Simple aggregate statistics for a GeoJSON document.
///
/// Used to eyeball a stage's output: how many features there are, which
/// property keys survive and how many features ended up without data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    pub features: usize,
    /// Property key → number of features carrying it.
    pub property_counts: BTreeMap<String, usize>,
    /// Features whose `val` property is present and `null`.
    pub null_values: usize,
}

impl DocumentStats {
    pub fn collect(doc: &Value) -> Self {
        let mut stats = Self::default();
        for feature in features(doc) {
            stats.features += 1;
            let Some(props) = feature.get("properties").and_then(Value::as_object) else {
                continue;
            };
            for key in props.keys() {
                *stats.property_counts.entry(key.clone()).or_default() += 1;
            }
            if matches!(props.get("val"), Some(Value::Null)) {
                stats.null_values += 1;
            }
        }
        stats
    }
}

/// Mutable view of the `features` array. A missing or non-array `features`
/// member yields `None`, which callers treat as an empty collection.
pub fn features_mut(doc: &mut Value) -> Option<&mut Vec<Value>> {
    doc.get_mut("features").and_then(Value::as_array_mut)
}

pub fn features(doc: &Value) -> &[Value] {
    doc.get("features")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Returns the feature's `properties` object, replacing a missing, `null` or
/// non-object value with an empty object first. The member keeps its
/// position when it already exists.
///
/// The boolean is `true` when such a replacement happened.
pub fn properties_mut(feature: &mut Map<String, Value>) -> Option<(&mut Map<String, Value>, bool)> {
    let slot = feature.entry("properties").or_insert(Value::Null);
    let repaired = !slot.is_object();
    if repaired {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(props) => Some((props, repaired)),
        _ => None,
    }
}
