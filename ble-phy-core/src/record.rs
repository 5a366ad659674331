//! The decoded-packet record (EMITTER, §4.3) and the typed value it carries per field.

use core::fmt;

/// A value held by a [`PacketRecord`] field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Str(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

/// An ordered `String -> Value` mapping populated by a successful decode (§3).
///
/// Insertion order is preserved (and is the order fields were discovered while parsing), which
/// matters for human-facing dumps of a record even though lookup by key is also supported.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PacketRecord {
    fields: Vec<(String, Value)>,
}

impl PacketRecord {
    pub fn new() -> Self {
        PacketRecord { fields: Vec::new() }
    }

    /// Inserts or overwrites `key`. Most fields in a record are written at most once, but AD
    /// structures of the same type are simply overwritten by a later occurrence, matching a
    /// plain key->value map with no multimap behavior.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.fields.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.fields.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for PacketRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (k, v)) in self.fields.iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", k, v)?;
        }
        Ok(())
    }
}
