//! Tagged-union value model the engine merges over.
//!
//! `Value` provides the introspection the engine needs: structural category,
//! concrete type identity, zero detection, zero construction, element access,
//! and independently owned deep copies. Reference layers are `Rc<RefCell<_>>`
//! so callers can build shared and self-referential graphs; the engine itself
//! only ever borrows them immutably.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;
use std::rc::Rc;

/// Shared, addressable storage behind a non-null reference.
pub type Pointer = Rc<RefCell<Value>>;

/// Shape-class of a value, used to pick a merge strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Invalid,
    Scalar,
    Reference,
    Record,
    OrderedSequence,
    FixedSequence,
    Mapping,
    Stream,
}

impl Category {
    /// Containers have a strategy table; scalars and references are only ever replaced.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            Category::Record
                | Category::OrderedSequence
                | Category::FixedSequence
                | Category::Mapping
                | Category::Stream
        )
    }

    /// Sequence-like categories can serve as element sources for each other.
    pub fn is_sequence_like(self) -> bool {
        matches!(
            self,
            Category::OrderedSequence | Category::FixedSequence | Category::Stream
        )
    }

    /// Whether a source of category `other` can be walked by a strategy for `self`.
    pub fn accepts(self, other: Category) -> bool {
        self == other || (self.is_sequence_like() && other.is_sequence_like())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Invalid => "invalid",
            Category::Scalar => "scalar",
            Category::Reference => "reference",
            Category::Record => "record",
            Category::OrderedSequence => "ordered sequence",
            Category::FixedSequence => "fixed sequence",
            Category::Mapping => "mapping",
            Category::Stream => "stream",
        };
        f.write_str(name)
    }
}

/// Concrete type identity of a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Invalid,
    Bool,
    Int,
    UInt,
    Float,
    Str,
    Record(String),
    Sequence,
    Fixed(usize),
    Mapping,
    Stream,
    Reference,
}

/// Mapping key. Keys are totally ordered so merged mappings iterate deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Str(String),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Bool(b) => write!(f, "{}", b),
            Key::Int(i) => write!(f, "{}", i),
            Key::UInt(u) => write!(f, "{}", u),
            Key::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Int(i)
    }
}

impl From<u64> for Key {
    fn from(u: u64) -> Self {
        Key::UInt(u)
    }
}

impl From<bool> for Key {
    fn from(b: bool) -> Self {
        Key::Bool(b)
    }
}

/// Whether the engine may write a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

/// A named record field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: Value,
    pub visibility: Visibility,
}

impl Field {
    pub fn is_settable(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

/// A named record with ordered fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub name: String,
    pub fields: Vec<Field>,
}

impl Record {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fields: Vec::new(),
        }
    }

    /// Add a public (settable) field.
    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.push(Field {
            name: name.to_string(),
            value: value.into(),
            visibility: Visibility::Public,
        });
        self
    }

    /// Add a private field. The engine never overwrites it.
    pub fn with_private_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.push(Field {
            name: name.to_string(),
            value: value.into(),
            visibility: Visibility::Private,
        });
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.field(name).map(|f| &f.value)
    }
}

/// Bounded FIFO container.
#[derive(Debug, Clone, PartialEq)]
pub struct Stream {
    capacity: usize,
    items: VecDeque<Value>,
}

impl Stream {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            items: VecDeque::with_capacity(capacity),
        }
    }

    /// Build a stream holding `items`, growing the capacity if they do not fit.
    pub fn from_items(capacity: usize, items: impl IntoIterator<Item = Value>) -> Self {
        let items: VecDeque<Value> = items.into_iter().collect();
        Self {
            capacity: capacity.max(items.len()),
            items,
        }
    }

    /// Enqueue a value. Hands the value back when the stream is full.
    pub fn push(&mut self, value: Value) -> Result<(), Value> {
        if self.items.len() >= self.capacity {
            return Err(value);
        }
        self.items.push_back(value);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<Value> {
        self.items.pop_front()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.items.iter()
    }
}

/// A runtime value of any supported shape.
///
/// `Clone` is shallow for references (the `Rc` is shared). Use
/// [`Value::deep_copy`] for an independently owned copy.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Invalid,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    Record(Record),
    Sequence(Vec<Value>),
    Fixed(Vec<Value>),
    Mapping(BTreeMap<Key, Value>),
    Stream(Stream),
    Reference(Option<Pointer>),
}

impl Value {
    /// Wrap a value in a fresh non-null reference.
    pub fn reference(value: impl Into<Value>) -> Self {
        Value::Reference(Some(Rc::new(RefCell::new(value.into()))))
    }

    /// The null reference.
    pub fn null() -> Self {
        Value::Reference(None)
    }

    pub fn category(&self) -> Category {
        match self {
            Value::Invalid => Category::Invalid,
            Value::Bool(_) | Value::Int(_) | Value::UInt(_) | Value::Float(_) | Value::Str(_) => {
                Category::Scalar
            }
            Value::Record(_) => Category::Record,
            Value::Sequence(_) => Category::OrderedSequence,
            Value::Fixed(_) => Category::FixedSequence,
            Value::Mapping(_) => Category::Mapping,
            Value::Stream(_) => Category::Stream,
            Value::Reference(_) => Category::Reference,
        }
    }

    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Invalid => TypeTag::Invalid,
            Value::Bool(_) => TypeTag::Bool,
            Value::Int(_) => TypeTag::Int,
            Value::UInt(_) => TypeTag::UInt,
            Value::Float(_) => TypeTag::Float,
            Value::Str(_) => TypeTag::Str,
            Value::Record(r) => TypeTag::Record(r.name.clone()),
            Value::Sequence(_) => TypeTag::Sequence,
            Value::Fixed(items) => TypeTag::Fixed(items.len()),
            Value::Mapping(_) => TypeTag::Mapping,
            Value::Stream(_) => TypeTag::Stream,
            Value::Reference(_) => TypeTag::Reference,
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, Value::Invalid)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Reference(None))
    }

    /// Zero test. Empty dynamic containers and the null reference count as zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Invalid => true,
            Value::Bool(b) => !b,
            Value::Int(i) => *i == 0,
            Value::UInt(u) => *u == 0,
            Value::Float(x) => *x == 0.0,
            Value::Str(s) => s.is_empty(),
            Value::Record(r) => r.fields.iter().all(|f| f.value.is_zero()),
            Value::Sequence(items) => items.is_empty(),
            Value::Fixed(items) => items.iter().all(Value::is_zero),
            Value::Mapping(map) => map.is_empty(),
            Value::Stream(stream) => stream.is_empty(),
            Value::Reference(ptr) => ptr.is_none(),
        }
    }

    /// Zero value of the same type.
    pub fn zeroed(&self) -> Value {
        match self {
            Value::Invalid => Value::Invalid,
            Value::Bool(_) => Value::Bool(false),
            Value::Int(_) => Value::Int(0),
            Value::UInt(_) => Value::UInt(0),
            Value::Float(_) => Value::Float(0.0),
            Value::Str(_) => Value::Str(String::new()),
            Value::Record(r) => Value::Record(Record {
                name: r.name.clone(),
                fields: r
                    .fields
                    .iter()
                    .map(|f| Field {
                        name: f.name.clone(),
                        value: f.value.zeroed(),
                        visibility: f.visibility,
                    })
                    .collect(),
            }),
            Value::Sequence(_) => Value::Sequence(Vec::new()),
            Value::Fixed(items) => Value::Fixed(items.iter().map(Value::zeroed).collect()),
            Value::Mapping(_) => Value::Mapping(BTreeMap::new()),
            Value::Stream(stream) => Value::Stream(Stream::with_capacity(stream.capacity())),
            Value::Reference(_) => Value::Reference(None),
        }
    }

    /// Elements of a sequence-like value, in order.
    pub fn elements(&self) -> Option<Vec<&Value>> {
        match self {
            Value::Sequence(items) | Value::Fixed(items) => Some(items.iter().collect()),
            Value::Stream(stream) => Some(stream.iter().collect()),
            _ => None,
        }
    }

    /// Independently owned copy. Shared and cyclic reference graphs keep
    /// their shape but never alias the original storage.
    pub fn deep_copy(&self) -> Value {
        let mut copied = HashMap::new();
        self.copy_with(&mut copied)
    }

    fn copy_with(&self, copied: &mut HashMap<usize, Pointer>) -> Value {
        match self {
            Value::Invalid => Value::Invalid,
            Value::Bool(b) => Value::Bool(*b),
            Value::Int(i) => Value::Int(*i),
            Value::UInt(u) => Value::UInt(*u),
            Value::Float(x) => Value::Float(*x),
            Value::Str(s) => Value::Str(s.clone()),
            Value::Record(r) => Value::Record(Record {
                name: r.name.clone(),
                fields: r
                    .fields
                    .iter()
                    .map(|f| Field {
                        name: f.name.clone(),
                        value: f.value.copy_with(copied),
                        visibility: f.visibility,
                    })
                    .collect(),
            }),
            Value::Sequence(items) => {
                Value::Sequence(items.iter().map(|v| v.copy_with(copied)).collect())
            }
            Value::Fixed(items) => {
                Value::Fixed(items.iter().map(|v| v.copy_with(copied)).collect())
            }
            Value::Mapping(map) => {
                Value::Mapping(map.iter().map(|(k, v)| (k.clone(), v.copy_with(copied))).collect())
            }
            Value::Stream(stream) => Value::Stream(Stream {
                capacity: stream.capacity,
                items: stream.items.iter().map(|v| v.copy_with(copied)).collect(),
            }),
            Value::Reference(None) => Value::Reference(None),
            Value::Reference(Some(ptr)) => {
                let addr = address_of(ptr);
                if let Some(existing) = copied.get(&addr) {
                    return Value::Reference(Some(Rc::clone(existing)));
                }
                // Register before descending so back-edges resolve to the new cell.
                let fresh: Pointer = Rc::new(RefCell::new(Value::Invalid));
                copied.insert(addr, Rc::clone(&fresh));
                let inner = ptr.borrow().copy_with(copied);
                *fresh.borrow_mut() = inner;
                Value::Reference(Some(fresh))
            }
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&BTreeMap<Key, Value>> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_stream(&self) -> Option<&Stream> {
        match self {
            Value::Stream(stream) => Some(stream),
            _ => None,
        }
    }

    /// Pointee of a non-null reference.
    pub fn pointee(&self) -> Option<&Pointer> {
        match self {
            Value::Reference(Some(ptr)) => Some(ptr),
            _ => None,
        }
    }
}

/// Storage address of a pointer's cell, used as an identity key.
pub(crate) fn address_of(ptr: &Pointer) -> usize {
    Rc::as_ptr(ptr) as usize
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::UInt(u)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Record(r)
    }
}

impl From<Stream> for Value {
    fn from(s: Stream) -> Self {
        Value::Stream(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}
