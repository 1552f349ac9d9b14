//! The immutable object model produced by the parser.
//!
//! Every entity validates its invariants on construction and exposes its
//! contents through read-only accessors only. Children keep declaration
//! order. Equality and hashing are structural.

mod enum_type;
mod extend;
mod file;
mod message;
mod option;
pub(crate) mod render;
mod service;

use std::fmt;

pub use enum_type::{EnumType, EnumValue};
pub use extend::Extend;
pub use file::{FileParts, ProtoFile, TypesRecursive};
pub use message::{
    ExtensionRange, Field, Label, MessageParts, MessageType, ScalarType, MAX_TAG, RESERVED_TAGS,
};
pub use option::{find_option, OptionValue, ProtoOption};
pub use service::{Method, Service};

/// A declared type: a message or an enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "lowercase"))]
pub enum Type {
    Message(MessageType),
    Enum(EnumType),
}

impl Type {
    pub fn name(&self) -> &str {
        match self {
            Type::Message(m) => m.name(),
            Type::Enum(e) => e.name(),
        }
    }

    /// `package.Outer.Inner`, without a leading dot.
    pub fn fully_qualified_name(&self) -> &str {
        match self {
            Type::Message(m) => m.fully_qualified_name(),
            Type::Enum(e) => e.fully_qualified_name(),
        }
    }

    pub fn documentation(&self) -> &str {
        match self {
            Type::Message(m) => m.documentation(),
            Type::Enum(e) => e.documentation(),
        }
    }

    /// Types declared inside this one. Enums never nest types.
    pub fn nested_types(&self) -> &[Type] {
        match self {
            Type::Message(m) => m.nested_types(),
            Type::Enum(_) => &[],
        }
    }

    pub fn options(&self) -> &[ProtoOption] {
        match self {
            Type::Message(m) => m.options(),
            Type::Enum(e) => e.options(),
        }
    }

    pub fn as_message(&self) -> Option<&MessageType> {
        match self {
            Type::Message(m) => Some(m),
            Type::Enum(_) => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumType> {
        match self {
            Type::Enum(e) => Some(e),
            Type::Message(_) => None,
        }
    }

    pub(crate) fn render(&self, out: &mut String, depth: usize) {
        match self {
            Type::Message(m) => m.render(out, depth),
            Type::Enum(e) => e.render(out, depth),
        }
    }
}

impl From<MessageType> for Type {
    fn from(m: MessageType) -> Self {
        Type::Message(m)
    }
}

impl From<EnumType> for Type {
    fn from(e: EnumType) -> Self {
        Type::Enum(e)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Message(m) => m.fmt(f),
            Type::Enum(e) => e.fmt(f),
        }
    }
}
