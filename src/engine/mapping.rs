//! Mapping strategies.

use std::collections::BTreeMap;

use crate::error::MergeResult;
use crate::resolver::Handle;
use crate::strategy::MappingStrategy;
use crate::value::{Category, Key, Value};

use super::{is_leaf_source, kind_not_supported, Merger};

pub(super) fn merge(
    m: &mut Merger<'_>,
    dst: &Value,
    entries: &BTreeMap<Key, Value>,
    src: &Value,
) -> MergeResult<Value> {
    let strategy = m.options().mapping_strategy();
    let walk = match (strategy.walk(), strategy) {
        (Some(walk), _) => walk,
        (None, MappingStrategy::ReplaceWhole) => return Ok(m.replace(dst, src)),
        (None, _) => return Ok(dst.deep_copy()),
    };
    if is_leaf_source(src) {
        return Ok(m.replace(dst, src));
    }
    let Value::Mapping(source) = src else {
        return Err(kind_not_supported(strategy, dst, src));
    };

    let resolver = m.options().resolver_for(Category::Mapping);
    let mut keys: Vec<&Key> = entries.keys().collect();
    if walk.dynamic {
        keys.extend(source.keys().filter(|k| !entries.contains_key(*k)));
    }

    let mut merged = BTreeMap::new();
    for key in keys {
        let value = m.element(
            walk.deep,
            Handle::from(entries.get(key)),
            Handle::from(source.get(key)),
            resolver,
        )?;
        // A rejected source-only key leaves nothing to store.
        if value.is_valid() {
            merged.insert(key.clone(), value);
        }
    }
    Ok(Value::Mapping(merged))
}
