//! protoparser: parse Protocol Buffer (`.proto`, proto2) schema text into an
//! immutable object model.
//!
//! The parser turns one source unit into a [`ProtoFile`] holding messages,
//! enums, services, `extend` blocks, options and imports, with every type's
//! fully-qualified name computed from its package and enclosing types.
//! Referenced type names are kept as written; resolving them against other
//! files is left to the caller.
//!
//! # Quick Start
//!
//! ```rust
//! use protoparser::{parse, Label};
//!
//! let file = parse("person.proto", r#"
//!     package example;
//!
//!     // A person in the address book.
//!     message Person {
//!         required string name = 1;
//!         optional int32 id = 2;
//!     }
//! "#).unwrap();
//!
//! let person = file.types()[0].as_message().unwrap();
//! assert_eq!(person.fully_qualified_name(), "example.Person");
//! assert_eq!(person.documentation(), "A person in the address book.");
//! assert_eq!(person.fields()[1].label(), Label::Optional);
//! ```

pub mod config;
pub mod error;
pub mod parser;
pub mod types;

pub use config::{DocCommentConfig, ParserConfig};
pub use error::{
    LexError, LexErrorKind, ParseError, Position, Result, SyntaxError, ValidationError,
};
pub use parser::{parse, parse_bytes, parse_with_config};
pub use types::{
    EnumType, EnumValue, Extend, ExtensionRange, Field, Label, Method, MessageType, OptionValue,
    ProtoFile, ProtoOption, ScalarType, Service, Type,
};
