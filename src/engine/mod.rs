//! Recursive merge dispatcher.
//!
//! Every recursion level resolves indirection, classifies the destination,
//! runs the strategy for its category and re-wraps the result to the depth
//! that was peeled off. Leaves are replaced subject to the condition set.

mod fixed;
mod mapping;
mod record;
mod sequence;
mod stream;
mod visited;

use std::fmt::Display;

use tracing::{instrument, trace};

use crate::error::{MergeError, MergeResult};
use crate::options::MergeOptions;
use crate::resolver::{resolve, rewrap, Handle, Resolved, Resolver};
use crate::value::{Category, Value};

use visited::VisitedSet;

pub(crate) struct Merger<'o> {
    options: &'o MergeOptions,
    visited: VisitedSet,
}

impl<'o> Merger<'o> {
    pub(crate) fn new(options: &'o MergeOptions) -> Self {
        Self {
            options,
            visited: VisitedSet::default(),
        }
    }

    pub(crate) fn options(&self) -> &'o MergeOptions {
        self.options
    }

    /// Number of addressable containers entered so far.
    pub(crate) fn visited_len(&self) -> usize {
        self.visited.len()
    }

    /// Resolve, merge by category, re-wrap.
    #[instrument(level = "trace", name = "merge", skip_all, fields(resolver = %resolver))]
    pub(crate) fn merge(
        &mut self,
        dst: Handle<'_>,
        src: Handle<'_>,
        resolver: Resolver,
    ) -> MergeResult<Value> {
        let Resolved { dst, src, depth } = resolve(dst, src, resolver)?;
        let merged = self.dispatch(&dst, &src)?;
        Ok(rewrap(merged, depth))
    }

    /// Resolve, then pick one side whole according to the conditions.
    pub(crate) fn select(
        &mut self,
        dst: Handle<'_>,
        src: Handle<'_>,
        resolver: Resolver,
    ) -> MergeResult<Value> {
        let Resolved { dst, src, depth } = resolve(dst, src, resolver)?;
        let chosen = self.replace(&dst.get(), &src.get());
        Ok(rewrap(chosen, depth))
    }

    /// `merge` when `deep`, `select` otherwise.
    pub(crate) fn element(
        &mut self,
        deep: bool,
        dst: Handle<'_>,
        src: Handle<'_>,
        resolver: Resolver,
    ) -> MergeResult<Value> {
        if deep {
            self.merge(dst, src, resolver)
        } else {
            self.select(dst, src, resolver)
        }
    }

    /// Fresh copy of the source if the conditions allow the override, else of the destination.
    pub(crate) fn replace(&self, dst: &Value, src: &Value) -> Value {
        if self.passes(dst, src) {
            src.deep_copy()
        } else {
            dst.deep_copy()
        }
    }

    pub(crate) fn passes(&self, dst: &Value, src: &Value) -> bool {
        let passed = self.options.conditions().check(dst, src);
        if !passed {
            trace!(destination = %dst.category(), source = %src.category(), "override rejected");
        }
        passed
    }

    fn dispatch(&mut self, dst: &Handle<'_>, src: &Handle<'_>) -> MergeResult<Value> {
        let (d, s) = (dst.get(), src.get());
        let category = d.category();
        trace!(destination = %category, source = %s.category(), "dispatch");

        if !category.is_container() {
            return Ok(self.replace(&d, &s));
        }
        if !s.is_valid() {
            return Ok(d.deep_copy());
        }
        // Entries live for the whole call, so shared nodes are merged once too.
        if let Some(addr) = dst.address() {
            if !self.visited.insert(addr, d.type_tag()) {
                trace!(addr, "node already visited, keeping destination");
                return Ok(d.deep_copy());
            }
        }

        match &*d {
            Value::Record(r) => record::merge(self, &d, r, &s),
            Value::Sequence(items) => sequence::merge(self, &d, items, &s),
            Value::Fixed(items) => fixed::merge(self, &d, items, &s),
            Value::Mapping(entries) => mapping::merge(self, &d, entries, &s),
            Value::Stream(stream) => stream::merge(self, &d, stream, &s),
            leaf => Ok(self.replace(leaf, &s)),
        }
    }
}

/// Error for a strategy that cannot walk `src` as the destination's category.
pub(crate) fn kind_not_supported(strategy: impl Display, dst: &Value, src: &Value) -> MergeError {
    MergeError::KindNotSupported {
        strategy: strategy.to_string(),
        destination: dst.category(),
        source_category: src.category(),
    }
}

/// Scalars and references are taken over a container whole, like a leaf.
pub(crate) fn is_leaf_source(src: &Value) -> bool {
    matches!(src.category(), Category::Scalar | Category::Reference)
}

/// Elements of `src` when it is sequence-like, as required by element-wise strategies.
pub(crate) fn sequence_source<'s>(
    strategy: impl Display,
    dst: &Value,
    src: &'s Value,
) -> MergeResult<Vec<&'s Value>> {
    match src.elements() {
        Some(items) if dst.category().accepts(src.category()) => Ok(items),
        _ => Err(kind_not_supported(strategy, dst, src)),
    }
}
