//! Fixed-length sequence strategies. The destination's length never changes.

use crate::error::MergeResult;
use crate::resolver::{Handle, Resolver};
use crate::strategy::{ElementWalk, FixedStrategy};
use crate::value::{Category, Value};

use super::{is_leaf_source, sequence_source, Merger};

pub(super) fn merge(
    m: &mut Merger<'_>,
    dst: &Value,
    items: &[Value],
    src: &Value,
) -> MergeResult<Value> {
    let strategy = m.options().fixed_strategy();
    let resolver = m.options().resolver_for(Category::FixedSequence);

    match (strategy.walk(), strategy) {
        (None, FixedStrategy::ReplaceWhole) => Ok(replace_whole(m, dst, items, src)),
        (None, _) => Ok(dst.deep_copy()),
        _ if is_leaf_source(src) => Ok(m.replace(dst, src)),
        (Some(walk), _) => {
            let source = sequence_source(strategy, dst, src)?;
            Ok(Value::Fixed(walk_positions(m, walk, items, &source, resolver)?))
        }
    }
}

/// Take the source's elements, truncated or zero-padded to the destination's length.
fn replace_whole(m: &Merger<'_>, dst: &Value, items: &[Value], src: &Value) -> Value {
    if !m.passes(dst, src) {
        return dst.deep_copy();
    }
    let Some(source) = src.elements() else {
        return src.deep_copy();
    };
    let fitted = items
        .iter()
        .enumerate()
        .map(|(index, d)| match source.get(index) {
            Some(s) => s.deep_copy(),
            None => d.zeroed(),
        })
        .collect();
    Value::Fixed(fitted)
}

/// Static walks stop at the shorter side; dynamic walks visit every
/// destination position, absent source positions included.
fn walk_positions(
    m: &mut Merger<'_>,
    walk: ElementWalk,
    dst: &[Value],
    src: &[&Value],
    resolver: Resolver,
) -> MergeResult<Vec<Value>> {
    let range = if walk.dynamic { dst.len().max(src.len()) } else { dst.len().min(src.len()) };
    let mut merged = Vec::with_capacity(dst.len());
    for (index, d) in dst.iter().enumerate() {
        let value = if index < range {
            let s = src.get(index).copied();
            m.element(walk.deep, Handle::Borrowed(d), Handle::from(s), resolver)?
        } else {
            d.deep_copy()
        };
        merged.push(value);
    }
    Ok(merged)
}
