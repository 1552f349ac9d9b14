use std::fmt;
use std::hash::{Hash, Hasher};

use super::render::{quote, quote_bytes};

/// The value of an option. Map-shaped values nest to any depth.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum OptionValue {
    /// Integer literal; wide enough for both `int64` and `uint64` values.
    Int(i128),
    Float(f64),
    Str(String),
    /// A string literal whose escapes produce bytes that are not UTF-8,
    /// such as a `bytes` default of `"\377\001"`.
    Bytes(Vec<u8>),
    /// A bare identifier such as `true`, `SPEED` or `inf`.
    Ident(String),
    /// `[a, b, c]`
    List(Vec<OptionValue>),
    /// `{ key: value ... }`, in declaration order.
    Map(Vec<ProtoOption>),
}

impl OptionValue {
    pub fn as_int(&self) -> Option<i128> {
        match self {
            OptionValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            OptionValue::Float(v) => Some(*v),
            OptionValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Str(v) => Some(v),
            _ => None,
        }
    }

    /// The raw bytes of a string literal, UTF-8 or not.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            OptionValue::Str(v) => Some(v.as_bytes()),
            OptionValue::Bytes(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_ident(&self) -> Option<&str> {
        match self {
            OptionValue::Ident(v) => Some(v),
            _ => None,
        }
    }

    /// `true` and `false` are plain identifiers in the grammar.
    pub fn as_bool(&self) -> Option<bool> {
        match self.as_ident() {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[OptionValue]> {
        match self {
            OptionValue::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[ProtoOption]> {
        match self {
            OptionValue::Map(v) => Some(v),
            _ => None,
        }
    }

    /// Look up an entry of a map value.
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.as_map().and_then(|entries| find_option(entries, key))
    }
}

// Floats compare and hash by bit pattern so that the model stays `Eq`.
impl PartialEq for OptionValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (OptionValue::Int(a), OptionValue::Int(b)) => a == b,
            (OptionValue::Float(a), OptionValue::Float(b)) => a.to_bits() == b.to_bits(),
            (OptionValue::Str(a), OptionValue::Str(b)) => a == b,
            (OptionValue::Bytes(a), OptionValue::Bytes(b)) => a == b,
            (OptionValue::Ident(a), OptionValue::Ident(b)) => a == b,
            (OptionValue::List(a), OptionValue::List(b)) => a == b,
            (OptionValue::Map(a), OptionValue::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for OptionValue {}

impl Hash for OptionValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            OptionValue::Int(v) => v.hash(state),
            OptionValue::Float(v) => v.to_bits().hash(state),
            OptionValue::Str(v) | OptionValue::Ident(v) => v.hash(state),
            OptionValue::Bytes(v) => v.hash(state),
            OptionValue::List(v) => v.hash(state),
            OptionValue::Map(v) => v.hash(state),
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Int(v) => write!(f, "{}", v),
            OptionValue::Float(v) => write!(f, "{:?}", v),
            OptionValue::Str(v) => f.write_str(&quote(v)),
            OptionValue::Bytes(v) => f.write_str(&quote_bytes(v)),
            OptionValue::Ident(v) => f.write_str(v),
            OptionValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            OptionValue::Map(entries) => {
                if entries.is_empty() {
                    return f.write_str("{}");
                }
                f.write_str("{ ")?;
                for (i, entry) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", entry.name, entry.value)?;
                }
                f.write_str(" }")
            }
        }
    }
}

/// A name/value annotation on a file, type, field, enum value, service or
/// method.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ProtoOption {
    name: String,
    value: OptionValue,
}

impl ProtoOption {
    pub fn new(name: impl Into<String>, value: OptionValue) -> Self {
        ProtoOption {
            name: name.into(),
            value,
        }
    }

    /// The option name as written: `java_package`, `(my.ext).field`, ...
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &OptionValue {
        &self.value
    }
}

impl fmt::Display for ProtoOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.value)
    }
}

/// Find the value of the first option named `name`.
pub fn find_option<'a>(options: &'a [ProtoOption], name: &str) -> Option<&'a OptionValue> {
    options.iter().find(|o| o.name == name).map(|o| &o.value)
}
