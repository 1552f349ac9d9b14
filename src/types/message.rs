use std::collections::HashMap;
use std::fmt;
use std::ops::RangeInclusive;

use super::extend::Extend;
use super::option::{find_option, ProtoOption};
use super::render::{bracket_options, indent, write_doc, write_option_statements};
use super::Type;
use crate::error::ValidationError;

/// Largest tag a field may use.
pub const MAX_TAG: u32 = 536_870_911;

/// Tags reserved for the protocol buffer implementation itself.
pub const RESERVED_TAGS: RangeInclusive<u32> = 19_000..=19_999;

/// Field cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Label {
    Required,
    Optional,
    Repeated,
}

impl Label {
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Required => "required",
            Label::Optional => "optional",
            Label::Repeated => "repeated",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The built-in scalar types a field may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Double,
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Bool,
    String,
    Bytes,
}

impl ScalarType {
    pub fn from_name(name: &str) -> Option<ScalarType> {
        Some(match name {
            "double" => ScalarType::Double,
            "float" => ScalarType::Float,
            "int32" => ScalarType::Int32,
            "int64" => ScalarType::Int64,
            "uint32" => ScalarType::Uint32,
            "uint64" => ScalarType::Uint64,
            "sint32" => ScalarType::Sint32,
            "sint64" => ScalarType::Sint64,
            "fixed32" => ScalarType::Fixed32,
            "fixed64" => ScalarType::Fixed64,
            "sfixed32" => ScalarType::Sfixed32,
            "sfixed64" => ScalarType::Sfixed64,
            "bool" => ScalarType::Bool,
            "string" => ScalarType::String,
            "bytes" => ScalarType::Bytes,
            _ => return None,
        })
    }
}

/// Check that `tag` is usable as a field tag.
fn validate_tag(name: &str, tag: i128) -> Result<u32, ValidationError> {
    if tag < 1 || tag > MAX_TAG as i128 {
        return Err(ValidationError::TagOutOfRange {
            name: name.to_string(),
            tag,
            max: MAX_TAG,
        });
    }
    let tag = tag as u32;
    if RESERVED_TAGS.contains(&tag) {
        return Err(ValidationError::ReservedTag {
            name: name.to_string(),
            tag,
        });
    }
    Ok(tag)
}

/// A message member.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Field {
    label: Label,
    type_name: String,
    name: String,
    tag: u32,
    documentation: String,
    options: Vec<ProtoOption>,
}

impl Field {
    pub fn new(
        label: Label,
        type_name: impl Into<String>,
        name: impl Into<String>,
        tag: i128,
        documentation: impl Into<String>,
        options: Vec<ProtoOption>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let type_name = type_name.into();
        if name.is_empty() {
            return Err(ValidationError::EmptyName("field"));
        }
        if type_name.is_empty() {
            return Err(ValidationError::EmptyName("field type"));
        }
        let tag = validate_tag(&name, tag)?;
        Ok(Field {
            label,
            type_name,
            name,
            tag,
            documentation: documentation.into(),
            options,
        })
    }

    pub fn label(&self) -> Label {
        self.label
    }

    /// The declared type, unresolved: `int32`, `Foo`, `.pkg.Foo`, ...
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> u32 {
        self.tag
    }

    pub fn documentation(&self) -> &str {
        &self.documentation
    }

    pub fn options(&self) -> &[ProtoOption] {
        &self.options
    }

    pub fn option(&self, name: &str) -> Option<&super::OptionValue> {
        find_option(&self.options, name)
    }

    /// The `[default = ...]` value, if declared.
    pub fn default_value(&self) -> Option<&super::OptionValue> {
        self.option("default")
    }

    pub fn is_deprecated(&self) -> bool {
        self.option("deprecated").and_then(|v| v.as_bool()) == Some(true)
    }

    pub fn is_packed(&self) -> bool {
        self.option("packed").and_then(|v| v.as_bool()) == Some(true)
    }

    /// The scalar type, or `None` for message and enum references.
    pub fn scalar_type(&self) -> Option<ScalarType> {
        ScalarType::from_name(&self.type_name)
    }

    pub(crate) fn render(&self, out: &mut String, depth: usize) {
        write_doc(out, &self.documentation, depth);
        indent(out, depth);
        // Map fields are written without a label.
        if !self.type_name.starts_with("map<") {
            out.push_str(self.label.as_str());
            out.push(' ');
        }
        out.push_str(&format!(
            "{} {} = {}{};\n",
            self.type_name,
            self.name,
            self.tag,
            bracket_options(&self.options)
        ));
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.render(&mut out, 0);
        f.write_str(out.trim_end())
    }
}

/// An `extensions start to end;` declaration. Both bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ExtensionRange {
    documentation: String,
    start: u32,
    end: u32,
}

impl ExtensionRange {
    pub fn new(
        documentation: impl Into<String>,
        start: i128,
        end: i128,
    ) -> Result<Self, ValidationError> {
        if start < 1 || start > end || end > MAX_TAG as i128 {
            return Err(ValidationError::InvalidExtensionRange { start, end });
        }
        Ok(ExtensionRange {
            documentation: documentation.into(),
            start: start as u32,
            end: end as u32,
        })
    }

    pub fn documentation(&self) -> &str {
        &self.documentation
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn contains(&self, tag: u32) -> bool {
        (self.start..=self.end).contains(&tag)
    }

    fn overlaps(&self, other: &ExtensionRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub(crate) fn render(&self, out: &mut String, depth: usize) {
        write_doc(out, &self.documentation, depth);
        indent(out, depth);
        if self.start == self.end {
            out.push_str(&format!("extensions {};\n", self.start));
        } else if self.end == MAX_TAG {
            out.push_str(&format!("extensions {} to max;\n", self.start));
        } else {
            out.push_str(&format!("extensions {} to {};\n", self.start, self.end));
        }
    }
}

impl fmt::Display for ExtensionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.render(&mut out, 0);
        f.write_str(out.trim_end())
    }
}

/// Tags and names must be unique among `fields`, and no tag may fall inside
/// one of `extensions`.
pub(crate) fn validate_fields(
    scope: &str,
    fields: &[Field],
    extensions: &[ExtensionRange],
) -> Result<(), ValidationError> {
    let mut tags: HashMap<u32, &str> = HashMap::new();
    let mut names: HashMap<&str, u32> = HashMap::new();

    for field in fields {
        if let Some(first) = tags.get(&field.tag) {
            return Err(ValidationError::DuplicateTag {
                scope: scope.to_string(),
                tag: field.tag as i64,
                first: first.to_string(),
                second: field.name.clone(),
            });
        }
        if names.contains_key(field.name.as_str()) {
            return Err(ValidationError::DuplicateName {
                scope: scope.to_string(),
                name: field.name.clone(),
            });
        }
        if let Some(range) = extensions.iter().find(|r| r.contains(field.tag)) {
            return Err(ValidationError::TagInExtensionRange {
                name: field.name.clone(),
                tag: field.tag,
                start: range.start,
                end: range.end,
            });
        }
        tags.insert(field.tag, &field.name);
        names.insert(&field.name, field.tag);
    }
    Ok(())
}

/// The members of a message body, gathered before the message is built.
#[derive(Debug, Clone, Default)]
pub struct MessageParts {
    pub fields: Vec<Field>,
    pub nested_types: Vec<Type>,
    pub extends: Vec<Extend>,
    pub extensions: Vec<ExtensionRange>,
    pub options: Vec<ProtoOption>,
}

/// A `message` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MessageType {
    name: String,
    fully_qualified_name: String,
    documentation: String,
    fields: Vec<Field>,
    nested_types: Vec<Type>,
    extends: Vec<Extend>,
    extensions: Vec<ExtensionRange>,
    options: Vec<ProtoOption>,
}

impl MessageType {
    pub fn new(
        name: impl Into<String>,
        fully_qualified_name: impl Into<String>,
        documentation: impl Into<String>,
        parts: MessageParts,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let fully_qualified_name = fully_qualified_name.into();
        if name.is_empty() {
            return Err(ValidationError::EmptyName("message"));
        }

        for (i, range) in parts.extensions.iter().enumerate() {
            if parts.extensions[..i].iter().any(|r| r.overlaps(range)) {
                return Err(ValidationError::InvalidExtensionRange {
                    start: range.start as i128,
                    end: range.end as i128,
                });
            }
        }
        validate_fields(&fully_qualified_name, &parts.fields, &parts.extensions)?;

        let mut names: Vec<&str> = parts.fields.iter().map(Field::name).collect();
        for nested in &parts.nested_types {
            if names.contains(&nested.name()) {
                return Err(ValidationError::DuplicateName {
                    scope: fully_qualified_name,
                    name: nested.name().to_string(),
                });
            }
            names.push(nested.name());
        }

        Ok(MessageType {
            name,
            fully_qualified_name,
            documentation: documentation.into(),
            fields: parts.fields,
            nested_types: parts.nested_types,
            extends: parts.extends,
            extensions: parts.extensions,
            options: parts.options,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fully_qualified_name(&self) -> &str {
        &self.fully_qualified_name
    }

    pub fn documentation(&self) -> &str {
        &self.documentation
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_by_tag(&self, tag: u32) -> Option<&Field> {
        self.fields.iter().find(|f| f.tag == tag)
    }

    pub fn nested_types(&self) -> &[Type] {
        &self.nested_types
    }

    /// `extend` blocks declared inside this message.
    pub fn extend_declarations(&self) -> &[Extend] {
        &self.extends
    }

    pub fn extensions(&self) -> &[ExtensionRange] {
        &self.extensions
    }

    pub fn options(&self) -> &[ProtoOption] {
        &self.options
    }

    pub fn option(&self, name: &str) -> Option<&super::OptionValue> {
        find_option(&self.options, name)
    }

    pub(crate) fn render(&self, out: &mut String, depth: usize) {
        write_doc(out, &self.documentation, depth);
        indent(out, depth);
        out.push_str(&format!("message {} {{\n", self.name));
        write_option_statements(out, &self.options, depth + 1);
        for field in &self.fields {
            field.render(out, depth + 1);
        }
        for range in &self.extensions {
            range.render(out, depth + 1);
        }
        for nested in &self.nested_types {
            nested.render(out, depth + 1);
        }
        for extend in &self.extends {
            extend.render(out, depth + 1);
        }
        indent(out, depth);
        out.push_str("}\n");
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.render(&mut out, 0);
        f.write_str(out.trim_end())
    }
}
