use std::fmt;

use super::extend::Extend;
use super::option::{find_option, OptionValue, ProtoOption};
use super::render::{quote, write_option_statements};
use super::service::Service;
use super::Type;
use crate::error::ValidationError;

/// The top-level declarations of a file, gathered before the file is built.
#[derive(Debug, Clone, Default)]
pub struct FileParts {
    pub package: String,
    /// Top-level types declared before the `package` statement. Those keep
    /// unqualified names.
    pub types_before_package: usize,
    /// Services declared before the `package` statement.
    pub services_before_package: usize,
    pub syntax: Option<String>,
    pub dependencies: Vec<String>,
    pub public_dependencies: Vec<String>,
    pub types: Vec<Type>,
    pub services: Vec<Service>,
    pub extends: Vec<Extend>,
    pub options: Vec<ProtoOption>,
}

/// One parsed `.proto` source unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ProtoFile {
    file_name: String,
    package: String,
    #[cfg_attr(feature = "serde", serde(skip))]
    types_before_package: usize,
    #[cfg_attr(feature = "serde", serde(skip))]
    services_before_package: usize,
    syntax: Option<String>,
    dependencies: Vec<String>,
    public_dependencies: Vec<String>,
    types: Vec<Type>,
    services: Vec<Service>,
    extends: Vec<Extend>,
    options: Vec<ProtoOption>,
}

impl ProtoFile {
    /// Top-level type and service names share one namespace and must be
    /// unique within it.
    pub fn new(file_name: impl Into<String>, parts: FileParts) -> Result<Self, ValidationError> {
        let scope = if parts.package.is_empty() {
            "<file>".to_string()
        } else {
            parts.package.clone()
        };
        let mut names: Vec<&str> = Vec::new();
        let declared = parts
            .types
            .iter()
            .map(Type::name)
            .chain(parts.services.iter().map(Service::name));
        for name in declared {
            if names.contains(&name) {
                return Err(ValidationError::DuplicateName {
                    scope,
                    name: name.to_string(),
                });
            }
            names.push(name);
        }

        Ok(ProtoFile {
            file_name: file_name.into(),
            types_before_package: parts.types_before_package.min(parts.types.len()),
            services_before_package: parts
                .services_before_package
                .min(parts.services.len()),
            package: parts.package,
            syntax: parts.syntax,
            dependencies: parts.dependencies,
            public_dependencies: parts.public_dependencies,
            types: parts.types,
            services: parts.services,
            extends: parts.extends,
            options: parts.options,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The declared package, or `""` when the file has none.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// The `syntax = "...";` value, when declared.
    pub fn syntax(&self) -> Option<&str> {
        self.syntax.as_deref()
    }

    /// Non-public imports, in declaration order.
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// `import public` targets, in declaration order.
    pub fn public_dependencies(&self) -> &[String] {
        &self.public_dependencies
    }

    /// Top-level types in declaration order.
    pub fn types(&self) -> &[Type] {
        &self.types
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    /// Top-level `extend` blocks.
    pub fn extend_declarations(&self) -> &[Extend] {
        &self.extends
    }

    pub fn options(&self) -> &[ProtoOption] {
        &self.options
    }

    pub fn option(&self, name: &str) -> Option<&OptionValue> {
        find_option(&self.options, name)
    }

    /// Every declared type, nested ones included, depth-first in
    /// declaration order.
    pub fn types_recursive(&self) -> TypesRecursive<'_> {
        TypesRecursive {
            stack: vec![self.types.iter()],
        }
    }

    /// Find a type by its fully-qualified name (a leading `.` is accepted).
    pub fn find_type(&self, fully_qualified_name: &str) -> Option<&Type> {
        let wanted = fully_qualified_name
            .strip_prefix('.')
            .unwrap_or(fully_qualified_name);
        self.types_recursive()
            .find(|t| t.fully_qualified_name() == wanted)
    }
}

impl fmt::Display for ProtoFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sections: Vec<String> = Vec::new();

        // A package declared after some types is written back at the same
        // point, so those types keep their unqualified names.
        let package_first = self.types_before_package == 0 && self.services_before_package == 0;
        let package_line = if self.package.is_empty() {
            String::new()
        } else {
            format!("package {};\n", self.package)
        };

        let mut header = String::new();
        if let Some(syntax) = &self.syntax {
            header.push_str(&format!("syntax = {};\n", quote(syntax)));
        }
        if package_first {
            header.push_str(&package_line);
        }
        sections.push(header);

        let mut imports = String::new();
        for dep in &self.dependencies {
            imports.push_str(&format!("import {};\n", quote(dep)));
        }
        for dep in &self.public_dependencies {
            imports.push_str(&format!("import public {};\n", quote(dep)));
        }
        sections.push(imports);

        let mut options = String::new();
        write_option_statements(&mut options, &self.options, 0);
        sections.push(options);

        let (early_types, late_types) = self.types.split_at(self.types_before_package);
        let (early_services, late_services) = self.services.split_at(self.services_before_package);
        let render_types = |sections: &mut Vec<String>, types: &[Type]| {
            for ty in types {
                let mut out = String::new();
                ty.render(&mut out, 0);
                sections.push(out);
            }
        };
        let render_services = |sections: &mut Vec<String>, services: &[Service]| {
            for service in services {
                let mut out = String::new();
                service.render(&mut out, 0);
                sections.push(out);
            }
        };

        render_types(&mut sections, early_types);
        render_services(&mut sections, early_services);
        if !package_first {
            sections.push(package_line);
        }
        render_types(&mut sections, late_types);
        for extend in &self.extends {
            let mut out = String::new();
            extend.render(&mut out, 0);
            sections.push(out);
        }
        render_services(&mut sections, late_services);

        let rendered: Vec<&str> = sections
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.trim_end())
            .collect();
        writeln!(f, "{}", rendered.join("\n\n"))
    }
}

/// Iterator returned by [`ProtoFile::types_recursive`].
pub struct TypesRecursive<'a> {
    stack: Vec<std::slice::Iter<'a, Type>>,
}

impl<'a> Iterator for TypesRecursive<'a> {
    type Item = &'a Type;

    fn next(&mut self) -> Option<&'a Type> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(ty) => {
                    self.stack.push(ty.nested_types().iter());
                    return Some(ty);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}
