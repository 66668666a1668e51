//! Smoo AI Merge - structural merge engine.
//!
//! Merges a source value into a destination value of the same shape, driven
//! by per-category strategies, reference resolvers and override conditions.
//! The defaults recurse into records and mappings, replace sequences whole
//! and overwrite leaves, which is the usual layered-config merge.

pub mod condition;
pub mod config;
mod engine;
pub mod error;
pub mod group;
pub mod json;
pub mod merge;
pub mod options;
pub mod resolver;
pub mod strategy;
pub mod value;

pub use condition::{Condition, Conditions};
pub use config::{CategoryNames, ConfigError, OptionsConfig};
pub use error::{MergeError, MergeResult};
pub use group::Group;
pub use merge::{merge, merge_into, must_merge, safe_merge};
pub use options::MergeOptions;
pub use resolver::Resolver;
pub use strategy::{FixedStrategy, MappingStrategy, RecordStrategy, SequenceStrategy};
pub use value::{Category, Field, Key, Pointer, Record, Stream, TypeTag, Value, Visibility};
