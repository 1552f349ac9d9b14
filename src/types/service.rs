use std::fmt;

use super::option::{find_option, OptionValue, ProtoOption};
use super::render::{indent, write_doc, write_option_statements};
use crate::error::ValidationError;

/// One RPC endpoint of a service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Method {
    name: String,
    documentation: String,
    request_type: String,
    response_type: String,
    options: Vec<ProtoOption>,
}

impl Method {
    pub fn new(
        name: impl Into<String>,
        documentation: impl Into<String>,
        request_type: impl Into<String>,
        response_type: impl Into<String>,
        options: Vec<ProtoOption>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let request_type = request_type.into();
        let response_type = response_type.into();
        if name.is_empty() {
            return Err(ValidationError::EmptyName("rpc"));
        }
        if request_type.is_empty() {
            return Err(ValidationError::EmptyName("request type"));
        }
        if response_type.is_empty() {
            return Err(ValidationError::EmptyName("response type"));
        }
        Ok(Method {
            name,
            documentation: documentation.into(),
            request_type,
            response_type,
            options,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn documentation(&self) -> &str {
        &self.documentation
    }

    /// Unresolved request type name.
    pub fn request_type(&self) -> &str {
        &self.request_type
    }

    /// Unresolved response type name.
    pub fn response_type(&self) -> &str {
        &self.response_type
    }

    pub fn options(&self) -> &[ProtoOption] {
        &self.options
    }

    pub fn option(&self, name: &str) -> Option<&OptionValue> {
        find_option(&self.options, name)
    }

    pub(crate) fn render(&self, out: &mut String, depth: usize) {
        write_doc(out, &self.documentation, depth);
        indent(out, depth);
        out.push_str(&format!(
            "rpc {} ({}) returns ({})",
            self.name, self.request_type, self.response_type
        ));
        if self.options.is_empty() {
            out.push_str(";\n");
        } else {
            out.push_str(" {\n");
            write_option_statements(out, &self.options, depth + 1);
            indent(out, depth);
            out.push_str("}\n");
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.render(&mut out, 0);
        f.write_str(out.trim_end())
    }
}

/// A `service` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Service {
    name: String,
    fully_qualified_name: String,
    documentation: String,
    options: Vec<ProtoOption>,
    methods: Vec<Method>,
}

impl Service {
    pub fn new(
        name: impl Into<String>,
        fully_qualified_name: impl Into<String>,
        documentation: impl Into<String>,
        options: Vec<ProtoOption>,
        methods: Vec<Method>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let fully_qualified_name = fully_qualified_name.into();
        if name.is_empty() {
            return Err(ValidationError::EmptyName("service"));
        }
        for (i, method) in methods.iter().enumerate() {
            if methods[..i].iter().any(|m| m.name == method.name) {
                return Err(ValidationError::DuplicateName {
                    scope: fully_qualified_name,
                    name: method.name.clone(),
                });
            }
        }
        Ok(Service {
            name,
            fully_qualified_name,
            documentation: documentation.into(),
            options,
            methods,
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

    pub fn options(&self) -> &[ProtoOption] {
        &self.options
    }

    /// Methods in declaration order.
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub(crate) fn render(&self, out: &mut String, depth: usize) {
        write_doc(out, &self.documentation, depth);
        indent(out, depth);
        out.push_str(&format!("service {} {{\n", self.name));
        write_option_statements(out, &self.options, depth + 1);
        for method in &self.methods {
            method.render(out, depth + 1);
        }
        indent(out, depth);
        out.push_str("}\n");
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.render(&mut out, 0);
        f.write_str(out.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_display() {
        let m = Method::new("Search", "", "SearchRequest", "SearchResponse", vec![]).unwrap();
        assert_eq!(m.to_string(), "rpc Search (SearchRequest) returns (SearchResponse);");
    }

    #[test]
    fn test_duplicate_method_rejected() {
        let a = Method::new("Get", "", "A", "B", vec![]).unwrap();
        let result = Service::new("S", "S", "", vec![], vec![a.clone(), a]);
        assert!(matches!(result, Err(ValidationError::DuplicateName { .. })));
    }

    #[test]
    fn test_method_requires_types() {
        assert_eq!(
            Method::new("Get", "", "", "B", vec![]),
            Err(ValidationError::EmptyName("request type"))
        );
    }
}
