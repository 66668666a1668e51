//! Record strategies.

use crate::error::{MergeError, MergeResult};
use crate::resolver::Handle;
use crate::strategy::RecordStrategy;
use crate::value::{Category, Field, Record, Value};

use super::{is_leaf_source, kind_not_supported, Merger};

pub(super) fn merge(
    m: &mut Merger<'_>,
    dst: &Value,
    record: &Record,
    src: &Value,
) -> MergeResult<Value> {
    let strategy = m.options().record_strategy();
    let deep = match strategy {
        RecordStrategy::Ignore => return Ok(dst.deep_copy()),
        RecordStrategy::ReplaceWhole => return Ok(m.replace(dst, src)),
        RecordStrategy::ReplaceFieldsShallow => false,
        RecordStrategy::ReplaceFieldsDeep => true,
    };
    if is_leaf_source(src) {
        return Ok(m.replace(dst, src));
    }
    let Value::Record(source) = src else {
        return Err(kind_not_supported(strategy, dst, src));
    };
    check_positions(record, source)?;

    let resolver = m.options().resolver_for(Category::Record);
    let mut fields = Vec::with_capacity(record.fields.len());
    for field in &record.fields {
        let value = if field.is_settable() {
            let counterpart = source.get(&field.name);
            m.element(deep, Handle::Borrowed(&field.value), Handle::from(counterpart), resolver)?
        } else {
            field.value.deep_copy()
        };
        fields.push(Field {
            name: field.name.clone(),
            value,
            visibility: field.visibility,
        });
    }

    Ok(Value::Record(Record {
        name: record.name.clone(),
        fields,
    }))
}

/// Every public source field needs a settable destination field.
fn check_positions(dst: &Record, src: &Record) -> MergeResult<()> {
    for field in src.fields.iter().filter(|f| f.is_settable()) {
        match dst.field(&field.name) {
            None => {
                return Err(MergeError::NotAddressable {
                    record: dst.name.clone(),
                    field: field.name.clone(),
                })
            }
            Some(target) if !target.is_settable() => {
                return Err(MergeError::NotSettable {
                    record: dst.name.clone(),
                    field: field.name.clone(),
                })
            }
            Some(_) => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Condition;
    use crate::options::MergeOptions;
    use crate::resolver::Resolver;

    fn run(dst: &Value, src: &Value, options: &MergeOptions) -> MergeResult<Value> {
        let resolver = options.default_resolver();
        Merger::new(options).merge(Handle::Borrowed(dst), Handle::Borrowed(src), resolver)
    }

    fn a(value: i64) -> Record {
        Record::new("a").with_field("A", value)
    }

    fn b(big_b: i64, inner: i64) -> Value {
        Value::from(Record::new("b").with_field("B", big_b).with_field("a", a(inner)))
    }

    fn nested(x: i64, y: i64) -> Value {
        let inner = Record::new("i").with_field("x", x).with_field("y", y);
        Value::from(Record::new("c").with_field("inner", inner))
    }

    fn open_hidden(open: i64, hidden: i64) -> Value {
        Value::from(Record::new("p").with_field("open", open).with_private_field("hidden", hidden))
    }

    #[test]
    fn test_ignore_and_replace_whole() {
        let (s1, s2) = (b(1, 0), b(0, 1));
        let ignore = MergeOptions::new().with_record_strategy(RecordStrategy::Ignore);
        assert_eq!(run(&s1, &s2, &ignore).unwrap(), s1);
        let whole = MergeOptions::new().with_record_strategy(RecordStrategy::ReplaceWhole);
        assert_eq!(run(&s1, &s2, &whole).unwrap(), s2);
    }

    #[test]
    fn test_shallow_takes_every_valid_field() {
        let options =
            MergeOptions::new().with_record_strategy(RecordStrategy::ReplaceFieldsShallow);
        assert_eq!(run(&b(1, 0), &b(0, 1), &options).unwrap(), b(0, 1));
    }

    #[test]
    fn test_shallow_with_source_not_zero() {
        let options = MergeOptions::new()
            .with_record_strategy(RecordStrategy::ReplaceFieldsShallow)
            .with_condition(Condition::SourceIsNotZero);
        assert_eq!(run(&b(1, 0), &b(0, 1), &options).unwrap(), b(1, 1));
    }

    #[test]
    fn test_deep_with_source_not_zero() {
        let options = MergeOptions::new()
            .with_record_strategy(RecordStrategy::ReplaceFieldsDeep)
            .with_condition(Condition::SourceIsNotZero);
        assert_eq!(run(&b(1, 0), &b(0, 1), &options).unwrap(), b(1, 1));
    }

    #[test]
    fn test_shallow_does_not_recurse() {
        let (dst, src) = (nested(1, 2), nested(0, 5));
        let shallow = MergeOptions::new()
            .with_record_strategy(RecordStrategy::ReplaceFieldsShallow)
            .with_condition(Condition::SourceIsNotZero);
        // The whole inner record is non-zero, so it is taken as-is.
        assert_eq!(run(&dst, &src, &shallow).unwrap(), src);

        let deep = MergeOptions::new().with_condition(Condition::SourceIsNotZero);
        assert_eq!(run(&dst, &src, &deep).unwrap(), nested(1, 5));
    }

    #[test]
    fn test_private_fields_keep_destination() {
        let merged = run(&open_hidden(1, 1), &open_hidden(2, 2), &MergeOptions::default());
        assert_eq!(merged.unwrap(), open_hidden(2, 1));
    }

    #[test]
    fn test_unknown_source_field_is_not_addressable() {
        let dst = Value::from(Record::new("p").with_field("open", 1));
        let src = Value::from(Record::new("p").with_field("open", 2).with_field("extra", 3));
        assert_eq!(
            run(&dst, &src, &MergeOptions::default()).unwrap_err(),
            MergeError::NotAddressable {
                record: "p".to_string(),
                field: "extra".to_string(),
            }
        );
    }

    #[test]
    fn test_private_destination_field_is_not_settable() {
        let dst = Value::from(Record::new("p").with_private_field("open", 1));
        let src = Value::from(Record::new("p").with_field("open", 2));
        assert!(matches!(
            run(&dst, &src, &MergeOptions::default()),
            Err(MergeError::NotSettable { .. })
        ));
    }

    #[test]
    fn test_pointer_field_with_record_resolver() {
        let dst = Value::from(Record::new("c").with_field("C", 1).with_field("a", Value::null()));
        let src = Value::reference(
            Record::new("c")
                .with_field("C", 0)
                .with_field("a", Value::reference(a(1))),
        );
        let options = MergeOptions::new()
            .with_default_resolver(Resolver::Single)
            .with_record_resolver(Resolver::Both)
            .with_condition(Condition::SourceIsNotZero);
        let merged = run(&dst, &src, &options).unwrap();
        let expected = Value::from(
            Record::new("c")
                .with_field("C", 1)
                .with_field("a", Value::reference(a(1))),
        );
        assert_eq!(merged, expected);
    }

    #[test]
    fn test_leaf_source_replaces_record() {
        let options = MergeOptions::default();
        assert_eq!(run(&b(1, 1), &Value::Int(3), &options).unwrap(), Value::Int(3));
        assert_eq!(run(&b(1, 1), &Value::null(), &options).unwrap(), Value::null());

        let shallow = MergeOptions::new()
            .with_record_strategy(RecordStrategy::ReplaceFieldsShallow)
            .with_condition(Condition::SourceIsNotZero);
        assert_eq!(run(&b(1, 1), &Value::Int(0), &shallow).unwrap(), b(1, 1));
    }

    #[test]
    fn test_leaf_source_replaces_nested_record_field() {
        let dst = nested(1, 2);
        let src = Value::from(Record::new("c").with_field("inner", 42));
        let expected = Value::from(Record::new("c").with_field("inner", 42));
        assert_eq!(run(&dst, &src, &MergeOptions::default()).unwrap(), expected);
    }

    #[test]
    fn test_container_source_of_other_kind_is_not_supported() {
        let options = MergeOptions::default();
        let mapping = Value::Mapping(Default::default());
        assert!(matches!(
            run(&b(1, 1), &mapping, &options),
            Err(MergeError::KindNotSupported { .. })
        ));
        let whole = MergeOptions::new().with_record_strategy(RecordStrategy::ReplaceWhole);
        assert_eq!(run(&b(1, 1), &mapping, &whole).unwrap(), mapping);
    }
}
