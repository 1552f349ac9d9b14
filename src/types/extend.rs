use std::fmt;

use super::message::{validate_fields, Field};
use super::render::{indent, write_doc};
use crate::error::ValidationError;

/// An `extend Target { ... }` declaration adding fields to a message that
/// may live in another file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Extend {
    type_name: String,
    documentation: String,
    fields: Vec<Field>,
}

impl Extend {
    pub fn new(
        type_name: impl Into<String>,
        documentation: impl Into<String>,
        fields: Vec<Field>,
    ) -> Result<Self, ValidationError> {
        let type_name = type_name.into();
        if type_name.is_empty() {
            return Err(ValidationError::EmptyName("extend target"));
        }
        validate_fields(&type_name, &fields, &[])?;
        Ok(Extend {
            type_name,
            documentation: documentation.into(),
            fields,
        })
    }

    /// The extended message, as written.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn documentation(&self) -> &str {
        &self.documentation
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub(crate) fn render(&self, out: &mut String, depth: usize) {
        write_doc(out, &self.documentation, depth);
        indent(out, depth);
        out.push_str(&format!("extend {} {{\n", self.type_name));
        for field in &self.fields {
            field.render(out, depth + 1);
        }
        indent(out, depth);
        out.push_str("}\n");
    }
}

impl fmt::Display for Extend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.render(&mut out, 0);
        f.write_str(out.trim_end())
    }
}
