//! Indirection resolution.
//!
//! Before two values are compared, reference layers are peeled off according
//! to a [`Resolver`] policy. The number of destination layers removed is the
//! depth the merged result is re-wrapped to afterwards.

use std::cell::Ref;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;
use std::str::FromStr;

use crate::error::{MergeError, MergeResult};
use crate::value::{address_of, Pointer, Value};

const DESTINATION: &str = "destination";
const SOURCE: &str = "source";

/// Policy for unwrapping reference layers before merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Resolver {
    /// Leave both sides as they are.
    None,
    /// Unwrap one destination layer; the source is unwrapped independently.
    Single,
    /// Unwrap one layer on both sides, only when both are non-null references.
    #[default]
    Both,
    /// `Single`, repeated until the destination has no layer left.
    DeepSingle,
    /// `Both`, repeated while both sides are non-null references.
    DeepBoth,
}

impl Resolver {
    pub fn name(self) -> &'static str {
        match self {
            Resolver::None => "none",
            Resolver::Single => "single",
            Resolver::Both => "both",
            Resolver::DeepSingle => "deep_single",
            Resolver::DeepBoth => "deep_both",
        }
    }
}

impl fmt::Display for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Resolver {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Resolver::None),
            "single" => Ok(Resolver::Single),
            "both" => Ok(Resolver::Both),
            "deep_single" => Ok(Resolver::DeepSingle),
            "deep_both" => Ok(Resolver::DeepBoth),
            other => Err(MergeError::UnknownResolver(other.to_string())),
        }
    }
}

/// A position the engine reads from: borrowed in place, reached through a
/// reference, or missing altogether.
pub(crate) enum Handle<'a> {
    Borrowed(&'a Value),
    Shared(Pointer),
    Absent,
}

impl<'a> Handle<'a> {
    pub(crate) fn get(&self) -> Guard<'_> {
        match self {
            Handle::Borrowed(value) => Guard::Borrowed(value),
            Handle::Shared(ptr) => Guard::Shared(ptr.borrow()),
            Handle::Absent => Guard::Absent(Value::Invalid),
        }
    }

    /// Storage address of handles reached through a reference.
    pub(crate) fn address(&self) -> Option<usize> {
        match self {
            Handle::Shared(ptr) => Some(address_of(ptr)),
            _ => None,
        }
    }

    fn pointee(&self) -> Option<Pointer> {
        match &*self.get() {
            Value::Reference(Some(ptr)) => Some(Rc::clone(ptr)),
            _ => None,
        }
    }
}

impl<'a> From<Option<&'a Value>> for Handle<'a> {
    fn from(value: Option<&'a Value>) -> Self {
        value.map_or(Handle::Absent, Handle::Borrowed)
    }
}

/// Read access to the value behind a [`Handle`].
pub(crate) enum Guard<'h> {
    Borrowed(&'h Value),
    Shared(Ref<'h, Value>),
    Absent(Value),
}

impl Deref for Guard<'_> {
    type Target = Value;

    fn deref(&self) -> &Value {
        match self {
            Guard::Borrowed(value) => value,
            Guard::Shared(value) => value,
            Guard::Absent(value) => value,
        }
    }
}

/// Outcome of resolving a destination/source pair.
pub(crate) struct Resolved<'a> {
    pub dst: Handle<'a>,
    pub src: Handle<'a>,
    pub depth: usize,
}

fn follow(ptr: Pointer, side: &'static str) -> MergeResult<Handle<'static>> {
    if !ptr.borrow().is_valid() {
        return Err(MergeError::NilReference(side));
    }
    Ok(Handle::Shared(ptr))
}

/// Records `ptr` as visited; false when a reference chain loops back on itself.
fn first_visit(seen: &mut Vec<usize>, ptr: &Pointer) -> bool {
    let addr = address_of(ptr);
    if seen.contains(&addr) {
        return false;
    }
    seen.push(addr);
    true
}

pub(crate) fn resolve<'a>(
    dst: Handle<'a>,
    src: Handle<'a>,
    resolver: Resolver,
) -> MergeResult<Resolved<'a>> {
    let (mut dst, mut src, mut depth) = (dst, src, 0);

    match resolver {
        Resolver::None => {}
        Resolver::Single => {
            if let Some(ptr) = dst.pointee() {
                dst = follow(ptr, DESTINATION)?;
                depth += 1;
            }
            if let Some(ptr) = src.pointee() {
                src = follow(ptr, SOURCE)?;
            }
        }
        Resolver::DeepSingle => {
            let mut seen = Vec::new();
            while let Some(ptr) = dst.pointee() {
                if !first_visit(&mut seen, &ptr) {
                    break;
                }
                dst = follow(ptr, DESTINATION)?;
                depth += 1;
            }
            seen.clear();
            while let Some(ptr) = src.pointee() {
                if !first_visit(&mut seen, &ptr) {
                    break;
                }
                src = follow(ptr, SOURCE)?;
            }
        }
        Resolver::Both => {
            if let (Some(d), Some(s)) = (dst.pointee(), src.pointee()) {
                dst = follow(d, DESTINATION)?;
                src = follow(s, SOURCE)?;
                depth += 1;
            }
        }
        Resolver::DeepBoth => {
            let mut seen = Vec::new();
            while let (Some(d), Some(s)) = (dst.pointee(), src.pointee()) {
                if !first_visit(&mut seen, &d) {
                    break;
                }
                dst = follow(d, DESTINATION)?;
                src = follow(s, SOURCE)?;
                depth += 1;
            }
        }
    }

    Ok(Resolved { dst, src, depth })
}

/// Wrap `value` in `depth` fresh reference layers.
pub(crate) fn rewrap(value: Value, depth: usize) -> Value {
    (0..depth).fold(value, |inner, _| Value::reference(inner))
}
