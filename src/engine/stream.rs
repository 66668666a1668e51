//! Stream strategies: the ordered-sequence algorithms over a bounded FIFO.

use crate::error::MergeResult;
use crate::strategy::SequenceStrategy;
use crate::value::{Category, Stream, Value};

use super::sequence::{append, walk_elements};
use super::{is_leaf_source, sequence_source, Merger};

pub(super) fn merge(
    m: &mut Merger<'_>,
    dst: &Value,
    stream: &Stream,
    src: &Value,
) -> MergeResult<Value> {
    let strategy = m.options().stream_strategy();
    let resolver = m.options().resolver_for(Category::Stream);
    let dst_items: Vec<&Value> = stream.iter().collect();

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
    Ok(Value::Stream(Stream::from_items(stream.capacity(), merged)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::MergeOptions;
    use crate::resolver::Handle;
    use serde_json::json;

    fn run(dst: &Value, src: &Value, options: &MergeOptions) -> MergeResult<Value> {
        let resolver = options.default_resolver();
        Merger::new(options).merge(Handle::Borrowed(dst), Handle::Borrowed(src), resolver)
    }

    fn stream(capacity: usize, items: Vec<Value>) -> Value {
        Value::Stream(Stream::from_items(capacity, items))
    }

    fn ints(values: &[i64]) -> Vec<Value> {
        values.iter().map(|&v| Value::Int(v)).collect()
    }

    fn with(strategy: SequenceStrategy) -> MergeOptions {
        MergeOptions::new().with_stream_strategy(strategy)
    }

    #[test]
    fn test_static_and_dynamic_elements() {
        let dst = stream(5, ints(&[3, 4, 5]));
        let src = stream(5, ints(&[1, 2, 3, 4, 5]));
        let fixed = run(&dst, &src, &with(SequenceStrategy::ReplaceElementsStatic)).unwrap();
        assert_eq!(fixed, stream(5, ints(&[1, 2, 3])));
        let grown = run(&dst, &src, &with(SequenceStrategy::ReplaceElementsDynamic)).unwrap();
        assert_eq!(grown, stream(5, ints(&[1, 2, 3, 4, 5])));
    }

    #[test]
    fn test_capacity_grows_to_fit() {
        let dst = stream(1, ints(&[1]));
        let append = with(SequenceStrategy::Append);
        let merged = run(&dst, &Value::from(json!([7, 8, 9])), &append).unwrap();
        let merged = merged.as_stream().unwrap();
        assert_eq!(merged.len(), 4);
        assert_eq!(merged.capacity(), 4);
    }

    #[test]
    fn test_nested_sequences_follow_their_own_strategy() {
        let dst = stream(2, vec![Value::from(json!([1, 2])), Value::from(json!([3, 4, 5]))]);
        let src = stream(1, vec![Value::from(json!([6, 7, 8, 9, 10]))]);

        let static_deep = MergeOptions::new()
            .with_stream_strategy(SequenceStrategy::ReplaceDeepStatic)
            .with_sequence_strategy(SequenceStrategy::ReplaceDeepStatic);
        assert_eq!(
            run(&dst, &src, &static_deep).unwrap(),
            stream(2, vec![Value::from(json!([6, 7])), Value::from(json!([3, 4, 5]))])
        );

        let dynamic_deep = MergeOptions::new()
            .with_stream_strategy(SequenceStrategy::ReplaceDeepDynamic)
            .with_sequence_strategy(SequenceStrategy::ReplaceDeepDynamic);
        assert_eq!(
            run(&dst, &src, &dynamic_deep).unwrap(),
            stream(2, vec![Value::from(json!([6, 7, 8, 9, 10])), Value::from(json!([3, 4, 5]))])
        );
    }

    #[test]
    fn test_leaf_source_replaces_stream() {
        let dst = stream(2, ints(&[1]));
        let options = with(SequenceStrategy::ReplaceElementsDynamic);
        let off = Value::Str("off".to_string());
        assert_eq!(run(&dst, &off, &options).unwrap(), off);
    }

    #[test]
    fn test_default_replaces_whole() {
        let dst = stream(3, ints(&[1]));
        let src = stream(2, ints(&[2, 3]));
        assert_eq!(run(&dst, &src, &MergeOptions::default()).unwrap(), src);
    }
}
