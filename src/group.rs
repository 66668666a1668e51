//! Left fold of one merge configuration over many inputs.

use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::debug;

use crate::error::{MergeError, MergeResult};
use crate::merge::{merge, panic_message};
use crate::options::MergeOptions;
use crate::value::Value;

/// A destination and an ordered list of sources merged into it in turn.
///
/// `merge` computes `merge(merge(merge(dst, s1), s2), ...)`; the first error
/// stops the fold.
#[derive(Debug, Clone)]
pub struct Group {
    dst: Value,
    sources: Vec<Value>,
    options: MergeOptions,
}

impl Group {
    pub fn new(dst: impl Into<Value>, src: impl Into<Value>) -> Self {
        Self {
            dst: dst.into(),
            sources: vec![src.into()],
            options: MergeOptions::default(),
        }
    }

    /// Append one more source.
    pub fn add(mut self, src: impl Into<Value>) -> Self {
        self.sources.push(src.into());
        self
    }

    pub fn extend<I>(mut self, sources: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.sources.extend(sources.into_iter().map(Into::into));
        self
    }

    pub fn with_options(mut self, options: MergeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn merge(&self) -> MergeResult<Value> {
        debug!(sources = self.sources.len(), "merging group");
        let mut acc = self.dst.deep_copy();
        for (index, src) in self.sources.iter().enumerate() {
            acc = merge(&acc, src, &self.options).map_err(|e| {
                debug!(index, error = %e, "group merge stopped");
                e
            })?;
        }
        Ok(acc)
    }

    pub fn must_merge(&self) -> Value {
        match self.merge() {
            Ok(merged) => merged,
            Err(e) => panic!("[Smooai Merge] {e}"),
        }
    }

    pub fn safe_merge(&self) -> MergeResult<Value> {
        catch_unwind(AssertUnwindSafe(|| self.merge()))
            .unwrap_or_else(|payload| Err(MergeError::Aborted(panic_message(payload.as_ref()))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Condition;
    use crate::strategy::SequenceStrategy;
    use serde_json::json;

    fn v(doc: serde_json::Value) -> Value {
        Value::from(doc)
    }

    #[test]
    fn test_fold_is_left_to_right() {
        let merged = Group::new(v(json!({"a": 1})), v(json!({"a": 2, "b": 2})))
            .add(v(json!({"a": 3})))
            .merge()
            .unwrap();
        assert_eq!(merged, v(json!({"a": 3, "b": 2})));
    }

    #[test]
    fn test_append_accumulates() {
        let group = Group::new(v(json!([1])), v(json!([2])))
            .extend(vec![v(json!([3])), v(json!([4, 5]))])
            .with_options(MergeOptions::new().with_sequence_strategy(SequenceStrategy::Append));
        assert_eq!(group.len(), 3);
        assert_eq!(group.merge().unwrap(), v(json!([1, 2, 3, 4, 5])));
    }

    #[test]
    fn test_first_error_stops_the_fold() {
        let group = Group::new(v(json!([1])), v(json!({"a": 1})))
            .add(v(json!([2])))
            .with_options(MergeOptions::new().with_sequence_strategy(SequenceStrategy::Append));
        assert!(matches!(group.merge(), Err(MergeError::KindNotSupported { .. })));
    }

    #[test]
    fn test_invalid_source_fails() {
        let group = Group::new(Value::Int(1), Value::Int(2)).add(Value::Invalid);
        assert_eq!(group.merge().unwrap_err(), MergeError::InvalidValue("source"));
    }

    #[test]
    #[should_panic(expected = "[Smooai Merge]")]
    fn test_must_merge_panics() {
        Group::new(Value::Invalid, Value::Int(2)).must_merge();
    }

    #[test]
    fn test_safe_merge_catches_panics() {
        let explode = Condition::custom("explode", |_, _| panic!("boom"));
        let options = MergeOptions::new().with_condition(explode);
        let group = Group::new(Value::Int(1), Value::Int(2)).with_options(options);
        assert_eq!(group.safe_merge().unwrap_err(), MergeError::Aborted("boom".to_string()));
    }
}
