//! Override conditions.
//!
//! A condition decides whether a source value may override the destination at
//! one position. A [`Conditions`] set passes only when every member passes;
//! `SourceIsValid` is always a member.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::value::Value;

/// Signature of a user-supplied override predicate.
pub type PredicateFn = dyn Fn(&Value, &Value) -> bool + Send + Sync;

/// A single override predicate over (destination, source).
#[derive(Clone)]
pub enum Condition {
    SourceIsValid,
    DestinationIsZero,
    SourceIsNotZero,
    TypesMatch,
    Custom {
        name: String,
        predicate: Arc<PredicateFn>,
    },
}

impl Condition {
    /// Wrap a closure as a named condition.
    pub fn custom<F>(name: &str, predicate: F) -> Self
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        Condition::Custom {
            name: name.to_string(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn check(&self, dst: &Value, src: &Value) -> bool {
        match self {
            Condition::SourceIsValid => src.is_valid(),
            Condition::DestinationIsZero => dst.is_zero(),
            Condition::SourceIsNotZero => !src.is_zero(),
            Condition::TypesMatch => dst.type_tag() == src.type_tag(),
            Condition::Custom { predicate, .. } => predicate(dst, src),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Condition::SourceIsValid => "source_is_valid",
            Condition::DestinationIsZero => "destination_is_zero",
            Condition::SourceIsNotZero => "source_is_not_zero",
            Condition::TypesMatch => "types_match",
            Condition::Custom { name, .. } => name,
        }
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Condition({})", self.name())
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses built-in condition names. Custom conditions cannot be named from text.
impl FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "source_is_valid" => Ok(Condition::SourceIsValid),
            "destination_is_zero" => Ok(Condition::DestinationIsZero),
            "source_is_not_zero" => Ok(Condition::SourceIsNotZero),
            "types_match" => Ok(Condition::TypesMatch),
            other => Err(other.to_string()),
        }
    }
}

/// Conjunction of conditions.
#[derive(Debug, Clone)]
pub struct Conditions {
    items: Vec<Condition>,
}

impl Default for Conditions {
    fn default() -> Self {
        Self {
            items: vec![Condition::SourceIsValid],
        }
    }
}

impl Conditions {
    pub fn push(&mut self, condition: Condition) {
        self.items.push(condition);
    }

    /// True when every condition passes.
    pub fn check(&self, dst: &Value, src: &Value) -> bool {
        self.items.iter().all(|c| c.check(dst, src))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
