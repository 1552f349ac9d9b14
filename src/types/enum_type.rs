use std::collections::HashMap;
use std::fmt;

use super::option::{find_option, OptionValue, ProtoOption};
use super::render::{bracket_options, indent, write_doc, write_option_statements};
use crate::error::ValidationError;

/// An enum constant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EnumValue {
    name: String,
    tag: i32,
    documentation: String,
    options: Vec<ProtoOption>,
}

impl EnumValue {
    pub fn new(
        name: impl Into<String>,
        tag: i128,
        documentation: impl Into<String>,
        options: Vec<ProtoOption>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::EmptyName("enum value"));
        }
        let tag = i32::try_from(tag).map_err(|_| ValidationError::EnumTagOutOfRange {
            name: name.clone(),
            tag,
        })?;
        Ok(EnumValue {
            name,
            tag,
            documentation: documentation.into(),
            options,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> i32 {
        self.tag
    }

    pub fn documentation(&self) -> &str {
        &self.documentation
    }

    pub fn options(&self) -> &[ProtoOption] {
        &self.options
    }

    pub(crate) fn render(&self, out: &mut String, depth: usize) {
        write_doc(out, &self.documentation, depth);
        indent(out, depth);
        out.push_str(&format!(
            "{} = {}{};\n",
            self.name,
            self.tag,
            bracket_options(&self.options)
        ));
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.tag)
    }
}

/// An `enum` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EnumType {
    name: String,
    fully_qualified_name: String,
    documentation: String,
    values: Vec<EnumValue>,
    options: Vec<ProtoOption>,
}

impl EnumType {
    /// Value names must be unique. Tags must be unique too, unless the enum
    /// carries `option allow_alias = true;`.
    pub fn new(
        name: impl Into<String>,
        fully_qualified_name: impl Into<String>,
        documentation: impl Into<String>,
        values: Vec<EnumValue>,
        options: Vec<ProtoOption>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let fully_qualified_name = fully_qualified_name.into();
        if name.is_empty() {
            return Err(ValidationError::EmptyName("enum"));
        }

        let allow_alias = find_option(&options, "allow_alias").and_then(OptionValue::as_bool)
            == Some(true);
        let mut tags: HashMap<i32, &str> = HashMap::new();
        let mut names: HashMap<&str, i32> = HashMap::new();
        for value in &values {
            if names.contains_key(value.name.as_str()) {
                return Err(ValidationError::DuplicateName {
                    scope: fully_qualified_name,
                    name: value.name.clone(),
                });
            }
            if !allow_alias {
                if let Some(first) = tags.get(&value.tag) {
                    return Err(ValidationError::DuplicateTag {
                        scope: fully_qualified_name,
                        tag: value.tag as i64,
                        first: first.to_string(),
                        second: value.name.clone(),
                    });
                }
            }
            tags.insert(value.tag, &value.name);
            names.insert(&value.name, value.tag);
        }

        Ok(EnumType {
            name,
            fully_qualified_name,
            documentation: documentation.into(),
            values,
            options,
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

    /// Values in declaration order.
    pub fn values(&self) -> &[EnumValue] {
        &self.values
    }

    pub fn value(&self, name: &str) -> Option<&EnumValue> {
        self.values.iter().find(|v| v.name == name)
    }

    pub fn options(&self) -> &[ProtoOption] {
        &self.options
    }

    pub(crate) fn render(&self, out: &mut String, depth: usize) {
        write_doc(out, &self.documentation, depth);
        indent(out, depth);
        out.push_str(&format!("enum {} {{\n", self.name));
        write_option_statements(out, &self.options, depth + 1);
        for value in &self.values {
            value.render(out, depth + 1);
        }
        indent(out, depth);
        out.push_str("}\n");
    }
}

impl fmt::Display for EnumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.render(&mut out, 0);
        f.write_str(out.trim_end())
    }
}
