//! Strategy tables: one enumerated merge algorithm per structural category.
//!
//! Names are snake_case in text form (`Display`/`FromStr`), which is also the
//! form used by [`OptionsConfig`](crate::config::OptionsConfig).

use std::fmt;
use std::str::FromStr;

use crate::error::MergeError;
use crate::value::Category;

/// How an element-wise strategy walks its positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ElementWalk {
    /// Walk the union of both sides instead of the destination's positions only.
    pub dynamic: bool,
    /// Recurse the engine into each pair instead of a flat condition check.
    pub deep: bool,
}

fn invalid(category: Category, value: &str) -> MergeError {
    MergeError::InvalidStrategy {
        category,
        value: value.to_string(),
    }
}

/// Strategy for records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordStrategy {
    /// Keep the destination.
    Ignore,
    /// Take the source.
    ReplaceWhole,
    /// Per field, take the source's value when the conditions pass.
    ReplaceFieldsShallow,
    /// Per field, merge recursively.
    ReplaceFieldsDeep,
}

impl RecordStrategy {
    pub fn name(self) -> &'static str {
        match self {
            RecordStrategy::Ignore => "ignore",
            RecordStrategy::ReplaceWhole => "replace_whole",
            RecordStrategy::ReplaceFieldsShallow => "replace_fields_shallow",
            RecordStrategy::ReplaceFieldsDeep => "replace_fields_deep",
        }
    }
}

impl fmt::Display for RecordStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RecordStrategy {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ignore" => Ok(RecordStrategy::Ignore),
            "replace_whole" => Ok(RecordStrategy::ReplaceWhole),
            "replace_fields_shallow" => Ok(RecordStrategy::ReplaceFieldsShallow),
            "replace_fields_deep" => Ok(RecordStrategy::ReplaceFieldsDeep),
            other => Err(invalid(Category::Record, other)),
        }
    }
}

/// Strategy for ordered sequences. Streams use the same table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceStrategy {
    Ignore,
    /// Destination elements followed by source elements.
    Append,
    ReplaceWhole,
    /// Per index over the destination's length, flat selection.
    ReplaceElementsStatic,
    /// Per index over the longer side, flat selection.
    ReplaceElementsDynamic,
    /// Per index over the destination's length, recursive.
    ReplaceDeepStatic,
    /// Per index over the longer side, recursive.
    ReplaceDeepDynamic,
}

impl SequenceStrategy {
    pub fn name(self) -> &'static str {
        match self {
            SequenceStrategy::Ignore => "ignore",
            SequenceStrategy::Append => "append",
            SequenceStrategy::ReplaceWhole => "replace_whole",
            SequenceStrategy::ReplaceElementsStatic => "replace_elements_static",
            SequenceStrategy::ReplaceElementsDynamic => "replace_elements_dynamic",
            SequenceStrategy::ReplaceDeepStatic => "replace_deep_static",
            SequenceStrategy::ReplaceDeepDynamic => "replace_deep_dynamic",
        }
    }

    /// Parse a name, attributing failures to `category`.
    pub fn parse_for(s: &str, category: Category) -> Result<Self, MergeError> {
        match s {
            "ignore" => Ok(SequenceStrategy::Ignore),
            "append" => Ok(SequenceStrategy::Append),
            "replace_whole" => Ok(SequenceStrategy::ReplaceWhole),
            "replace_elements_static" => Ok(SequenceStrategy::ReplaceElementsStatic),
            "replace_elements_dynamic" => Ok(SequenceStrategy::ReplaceElementsDynamic),
            "replace_deep_static" => Ok(SequenceStrategy::ReplaceDeepStatic),
            "replace_deep_dynamic" => Ok(SequenceStrategy::ReplaceDeepDynamic),
            other => Err(invalid(category, other)),
        }
    }

    pub(crate) fn walk(self) -> Option<ElementWalk> {
        match self {
            SequenceStrategy::ReplaceElementsStatic => Some(ElementWalk {
                dynamic: false,
                deep: false,
            }),
            SequenceStrategy::ReplaceElementsDynamic => Some(ElementWalk {
                dynamic: true,
                deep: false,
            }),
            SequenceStrategy::ReplaceDeepStatic => Some(ElementWalk { dynamic: false, deep: true }),
            SequenceStrategy::ReplaceDeepDynamic => Some(ElementWalk { dynamic: true, deep: true }),
            SequenceStrategy::Ignore
            | SequenceStrategy::Append
            | SequenceStrategy::ReplaceWhole => None,
        }
    }
}

impl fmt::Display for SequenceStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SequenceStrategy {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_for(s, Category::OrderedSequence)
    }
}

/// Strategy for fixed-size sequences. The destination's length never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixedStrategy {
    Ignore,
    ReplaceWhole,
    ReplaceElementsStatic,
    ReplaceElementsDynamic,
    ReplaceDeepStatic,
    ReplaceDeepDynamic,
}

impl FixedStrategy {
    pub fn name(self) -> &'static str {
        match self {
            FixedStrategy::Ignore => "ignore",
            FixedStrategy::ReplaceWhole => "replace_whole",
            FixedStrategy::ReplaceElementsStatic => "replace_elements_static",
            FixedStrategy::ReplaceElementsDynamic => "replace_elements_dynamic",
            FixedStrategy::ReplaceDeepStatic => "replace_deep_static",
            FixedStrategy::ReplaceDeepDynamic => "replace_deep_dynamic",
        }
    }

    pub(crate) fn walk(self) -> Option<ElementWalk> {
        match self {
            FixedStrategy::ReplaceElementsStatic => Some(ElementWalk {
                dynamic: false,
                deep: false,
            }),
            FixedStrategy::ReplaceElementsDynamic => Some(ElementWalk {
                dynamic: true,
                deep: false,
            }),
            FixedStrategy::ReplaceDeepStatic => Some(ElementWalk { dynamic: false, deep: true }),
            FixedStrategy::ReplaceDeepDynamic => Some(ElementWalk { dynamic: true, deep: true }),
            FixedStrategy::Ignore | FixedStrategy::ReplaceWhole => None,
        }
    }
}

impl fmt::Display for FixedStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FixedStrategy {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ignore" => Ok(FixedStrategy::Ignore),
            "replace_whole" => Ok(FixedStrategy::ReplaceWhole),
            "replace_elements_static" => Ok(FixedStrategy::ReplaceElementsStatic),
            "replace_elements_dynamic" => Ok(FixedStrategy::ReplaceElementsDynamic),
            "replace_deep_static" => Ok(FixedStrategy::ReplaceDeepStatic),
            "replace_deep_dynamic" => Ok(FixedStrategy::ReplaceDeepDynamic),
            other => Err(invalid(Category::FixedSequence, other)),
        }
    }
}

/// Strategy for key-value mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingStrategy {
    Ignore,
    ReplaceWhole,
    /// Destination keys only, flat selection.
    ReplaceElementsShallow,
    /// Union of keys, flat selection.
    ReplaceElementsDynamic,
    /// Destination keys only, recursive.
    ReplaceDeepShallow,
    /// Union of keys, recursive.
    ReplaceDeepDynamic,
}

impl MappingStrategy {
    pub fn name(self) -> &'static str {
        match self {
            MappingStrategy::Ignore => "ignore",
            MappingStrategy::ReplaceWhole => "replace_whole",
            MappingStrategy::ReplaceElementsShallow => "replace_elements_shallow",
            MappingStrategy::ReplaceElementsDynamic => "replace_elements_dynamic",
            MappingStrategy::ReplaceDeepShallow => "replace_deep_shallow",
            MappingStrategy::ReplaceDeepDynamic => "replace_deep_dynamic",
        }
    }

    pub(crate) fn walk(self) -> Option<ElementWalk> {
        match self {
            MappingStrategy::ReplaceElementsShallow => Some(ElementWalk {
                dynamic: false,
                deep: false,
            }),
            MappingStrategy::ReplaceElementsDynamic => Some(ElementWalk {
                dynamic: true,
                deep: false,
            }),
            MappingStrategy::ReplaceDeepShallow => Some(ElementWalk { dynamic: false, deep: true }),
            MappingStrategy::ReplaceDeepDynamic => Some(ElementWalk { dynamic: true, deep: true }),
            MappingStrategy::Ignore | MappingStrategy::ReplaceWhole => None,
        }
    }
}

impl fmt::Display for MappingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MappingStrategy {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ignore" => Ok(MappingStrategy::Ignore),
            "replace_whole" => Ok(MappingStrategy::ReplaceWhole),
            "replace_elements_shallow" => Ok(MappingStrategy::ReplaceElementsShallow),
            "replace_elements_dynamic" => Ok(MappingStrategy::ReplaceElementsDynamic),
            "replace_deep_shallow" => Ok(MappingStrategy::ReplaceDeepShallow),
            "replace_deep_dynamic" => Ok(MappingStrategy::ReplaceDeepDynamic),
            other => Err(invalid(Category::Mapping, other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_parse_back() {
        for s in [
            SequenceStrategy::Ignore,
            SequenceStrategy::Append,
            SequenceStrategy::ReplaceWhole,
            SequenceStrategy::ReplaceElementsStatic,
            SequenceStrategy::ReplaceElementsDynamic,
            SequenceStrategy::ReplaceDeepStatic,
            SequenceStrategy::ReplaceDeepDynamic,
        ] {
            assert_eq!(s.name().parse::<SequenceStrategy>(), Ok(s));
        }
        assert_eq!(
            "replace_fields_deep".parse::<RecordStrategy>(),
            Ok(RecordStrategy::ReplaceFieldsDeep)
        );
        assert_eq!(
            "replace_deep_shallow".parse::<MappingStrategy>(),
            Ok(MappingStrategy::ReplaceDeepShallow)
        );
    }

    #[test]
    fn test_fixed_has_no_append() {
        assert_eq!(
            "append".parse::<FixedStrategy>(),
            Err(MergeError::InvalidStrategy {
                category: Category::FixedSequence,
                value: "append".to_string(),
            })
        );
    }

    #[test]
    fn test_stream_errors_name_stream() {
        let err = SequenceStrategy::parse_for("refer", Category::Stream).unwrap_err();
        assert_eq!(err.to_string(), "invalid stream strategy: refer");
    }

    #[test]
    fn test_walks() {
        assert_eq!(
            SequenceStrategy::ReplaceDeepDynamic.walk(),
            Some(ElementWalk { dynamic: true, deep: true })
        );
        assert_eq!(SequenceStrategy::Append.walk(), None);
        assert_eq!(
            MappingStrategy::ReplaceElementsShallow.walk(),
            Some(ElementWalk { dynamic: false, deep: false })
        );
    }
}
