//! Decoded values and records

use std::fmt;
use std::sync::Weak;

use super::{Field, Schema};

/// A single decoded (or to-be-encoded) field value
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// Unsigned integer
    UInt(u64),
    /// UTF-8 text
    Text(String),
    /// Ordered sequence, one entry per repetition
    List(Vec<Value>),
    /// Nested record produced by an embedded schema
    Record(Record),
}

impl Value {
    /// Short name of the value kind, used in error messages
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UInt(_) => "uint",
            Self::Text(_) => "text",
            Self::List(_) => "list",
            Self::Record(_) => "record",
        }
    }

    /// Integer payload, if this is a [`Value::UInt`]
    #[must_use]
    pub const fn as_uint(&self) -> Option<u64> {
        match self {
            Self::UInt(v) => Some(*v),
            _ => None,
        }
    }

    /// Text payload, if this is a [`Value::Text`]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Elements, if this is a [`Value::List`]
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Nested record, if this is a [`Value::Record`]
    #[must_use]
    pub const fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::UInt(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::UInt(u64::from(v))
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Self::UInt(u64::from(v))
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Self::UInt(u64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Self::Record(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

/// Field name to value mapping, kept in insertion order
///
/// Records produced by [`Schema::decode`] keep a non-owning reference to the
/// schema that produced them; see [`Record::schema`].
#[derive(Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Record {
    entries: Vec<(String, Value)>,
    #[cfg_attr(feature = "serde", serde(skip))]
    schema: Option<Weak<[Field]>>,
}

impl Record {
    /// Create an empty record
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn for_schema(schema: &Schema) -> Self {
        Self {
            entries: Vec::new(),
            schema: Some(schema.downgrade()),
        }
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set `name` to `value`, returning the previous value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.get_mut(&name) {
            return Some(std::mem::replace(slot, value));
        }
        self.entries.push((name, value));
        None
    }

    /// Append `value` to the list stored under `name`, creating it if absent
    pub(crate) fn append(&mut self, name: &str, value: Value) {
        match self.get_mut(name) {
            Some(Value::List(items)) => items.push(value),
            Some(other) => {
                let previous = std::mem::replace(other, Value::List(Vec::new()));
                *other = Value::List(vec![previous, value]);
            }
            None => self.entries.push((name.to_owned(), Value::List(vec![value]))),
        }
    }

    /// Look up a field by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Mutable lookup by name
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Whether `name` is present
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Remove `name`, returning its value
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let idx = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(idx).1)
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the record has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Schema that decoded this record, if it is still alive
    ///
    /// Returns `None` for records built by hand.
    #[must_use]
    pub fn schema(&self) -> Option<Schema> {
        self.schema
            .as_ref()
            .and_then(Weak::upgrade)
            .map(Schema::from_fields)
    }
}

// Equality ignores the schema back-reference.
impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for Record {}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}
