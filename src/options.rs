//! Merge options: resolvers, conditions and per-category strategies.

use crate::condition::{Condition, Conditions};
use crate::resolver::Resolver;
use crate::strategy::{FixedStrategy, MappingStrategy, RecordStrategy, SequenceStrategy};
use crate::value::Category;

pub const DEFAULT_RESOLVER: Resolver = Resolver::Both;
pub const DEFAULT_RECORD_STRATEGY: RecordStrategy = RecordStrategy::ReplaceFieldsDeep;
pub const DEFAULT_SEQUENCE_STRATEGY: SequenceStrategy = SequenceStrategy::ReplaceWhole;
pub const DEFAULT_FIXED_STRATEGY: FixedStrategy = FixedStrategy::ReplaceDeepStatic;
pub const DEFAULT_MAPPING_STRATEGY: MappingStrategy = MappingStrategy::ReplaceDeepDynamic;
pub const DEFAULT_STREAM_STRATEGY: SequenceStrategy = SequenceStrategy::ReplaceWhole;

/// Configuration for one merge call.
///
/// Built with chainable `with_*` methods. Every slot is last-write-wins
/// except conditions, which accumulate. Defaults recurse into records and
/// mappings, replace sequences and streams whole, and overwrite leaves.
#[derive(Debug, Clone)]
pub struct MergeOptions {
    default_resolver: Resolver,
    record_resolver: Option<Resolver>,
    sequence_resolver: Option<Resolver>,
    fixed_resolver: Option<Resolver>,
    mapping_resolver: Option<Resolver>,
    stream_resolver: Option<Resolver>,
    conditions: Conditions,
    record_strategy: RecordStrategy,
    sequence_strategy: SequenceStrategy,
    fixed_strategy: FixedStrategy,
    mapping_strategy: MappingStrategy,
    stream_strategy: SequenceStrategy,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl MergeOptions {
    pub fn new() -> Self {
        Self {
            default_resolver: DEFAULT_RESOLVER,
            record_resolver: None,
            sequence_resolver: None,
            fixed_resolver: None,
            mapping_resolver: None,
            stream_resolver: None,
            conditions: Conditions::default(),
            record_strategy: DEFAULT_RECORD_STRATEGY,
            sequence_strategy: DEFAULT_SEQUENCE_STRATEGY,
            fixed_strategy: DEFAULT_FIXED_STRATEGY,
            mapping_strategy: DEFAULT_MAPPING_STRATEGY,
            stream_strategy: DEFAULT_STREAM_STRATEGY,
        }
    }

    // Resolver builder methods

    /// Resolver for the top-level call and any category without its own.
    pub fn with_default_resolver(mut self, resolver: Resolver) -> Self {
        self.default_resolver = resolver;
        self
    }

    pub fn with_record_resolver(mut self, resolver: Resolver) -> Self {
        self.record_resolver = Some(resolver);
        self
    }

    pub fn with_sequence_resolver(mut self, resolver: Resolver) -> Self {
        self.sequence_resolver = Some(resolver);
        self
    }

    pub fn with_fixed_resolver(mut self, resolver: Resolver) -> Self {
        self.fixed_resolver = Some(resolver);
        self
    }

    pub fn with_mapping_resolver(mut self, resolver: Resolver) -> Self {
        self.mapping_resolver = Some(resolver);
        self
    }

    pub fn with_stream_resolver(mut self, resolver: Resolver) -> Self {
        self.stream_resolver = Some(resolver);
        self
    }

    // Condition builder methods

    /// Add an override condition. All conditions must pass.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    // Strategy builder methods

    pub fn with_record_strategy(mut self, strategy: RecordStrategy) -> Self {
        self.record_strategy = strategy;
        self
    }

    pub fn with_sequence_strategy(mut self, strategy: SequenceStrategy) -> Self {
        self.sequence_strategy = strategy;
        self
    }

    pub fn with_fixed_strategy(mut self, strategy: FixedStrategy) -> Self {
        self.fixed_strategy = strategy;
        self
    }

    pub fn with_mapping_strategy(mut self, strategy: MappingStrategy) -> Self {
        self.mapping_strategy = strategy;
        self
    }

    pub fn with_stream_strategy(mut self, strategy: SequenceStrategy) -> Self {
        self.stream_strategy = strategy;
        self
    }

    pub fn default_resolver(&self) -> Resolver {
        self.default_resolver
    }

    /// Resolver used for the children of a container of `category`.
    pub fn resolver_for(&self, category: Category) -> Resolver {
        let slot = match category {
            Category::Record => self.record_resolver,
            Category::OrderedSequence => self.sequence_resolver,
            Category::FixedSequence => self.fixed_resolver,
            Category::Mapping => self.mapping_resolver,
            Category::Stream => self.stream_resolver,
            Category::Scalar | Category::Reference | Category::Invalid => None,
        };
        slot.unwrap_or(self.default_resolver)
    }

    pub fn conditions(&self) -> &Conditions {
        &self.conditions
    }

    pub fn record_strategy(&self) -> RecordStrategy {
        self.record_strategy
    }

    pub fn sequence_strategy(&self) -> SequenceStrategy {
        self.sequence_strategy
    }

    pub fn fixed_strategy(&self) -> FixedStrategy {
        self.fixed_strategy
    }

    pub fn mapping_strategy(&self) -> MappingStrategy {
        self.mapping_strategy
    }

    pub fn stream_strategy(&self) -> SequenceStrategy {
        self.stream_strategy
    }
}
