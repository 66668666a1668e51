//! Ordered-sequence strategies. Streams reuse `walk_elements` and `append`.

use crate::error::MergeResult;
use crate::resolver::{Handle, Resolver};
use crate::strategy::{ElementWalk, SequenceStrategy};
use crate::value::{Category, Value};

use super::{is_leaf_source, sequence_source, Merger};

pub(super) fn merge(
    m: &mut Merger<'_>,
    dst: &Value,
    items: &[Value],
    src: &Value,
) -> MergeResult<Value> {
    let strategy = m.options().sequence_strategy();
    let resolver = m.options().resolver_for(Category::OrderedSequence);
    let dst_items: Vec<&Value> = items.iter().collect();

    let merged = match (strategy.walk(), strategy) {
        (None, SequenceStrategy::ReplaceWhole) => return Ok(m.replace(dst, src)),
        (None, SequenceStrategy::Ignore) => return Ok(dst.deep_copy()),
        _ if is_leaf_source(src) => return Ok(m.replace(dst, src)),
        (Some(walk), _) => {
            let source = sequence_source(strategy, dst, src)?;
            walk_elements(m, walk, &dst_items, &source, resolver)?
        }
        (None, SequenceStrategy::Append) => {
            let source = sequence_source(strategy, dst, src)?;
            append(&dst_items, &source)
        }
        (None, _) => return Ok(dst.deep_copy()),
    };
    Ok(Value::Sequence(merged))
}

/// Destination elements followed by source elements, all freshly copied.
pub(super) fn append(dst: &[&Value], src: &[&Value]) -> Vec<Value> {
    dst.iter().chain(src.iter()).map(|v| v.deep_copy()).collect()
}

/// Element-wise merge by index.
///
/// Static walks cover the destination's length; dynamic walks cover the
/// longer side. A position only the source has, whose override is rejected,
/// is filled with the zero value of the source element.
pub(super) fn walk_elements(
    m: &mut Merger<'_>,
    walk: ElementWalk,
    dst: &[&Value],
    src: &[&Value],
    resolver: Resolver,
) -> MergeResult<Vec<Value>> {
    let len = if walk.dynamic { dst.len().max(src.len()) } else { dst.len() };
    let mut merged = Vec::with_capacity(len);
    for index in 0..len {
        let (d, s) = (dst.get(index).copied(), src.get(index).copied());
        let value = m.element(walk.deep, Handle::from(d), Handle::from(s), resolver)?;
        match (d, s) {
            (None, Some(s)) if !value.is_valid() => merged.push(s.zeroed()),
            _ => merged.push(value),
        }
    }
    Ok(merged)
}
