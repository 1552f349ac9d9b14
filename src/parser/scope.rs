//! Package and nesting context threaded through the descent.

use tracing::trace;

use crate::error::ValidationError;

/// Tracks the file's package and the stack of enclosing type names, so that
/// every declaration can be given its fully-qualified name.
#[derive(Debug, Default)]
pub struct Scope {
    package: Option<String>,
    enclosing: Vec<String>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the package. A file may declare at most one.
    pub fn set_package(&mut self, package: String) -> Result<(), ValidationError> {
        if let Some(existing) = &self.package {
            return Err(ValidationError::DuplicatePackage {
                existing: existing.clone(),
            });
        }
        self.package = Some(package);
        Ok(())
    }

    pub fn package(&self) -> &str {
        self.package.as_deref().unwrap_or("")
    }

    /// Fully-qualified name of the current scope itself.
    pub fn current(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(self.enclosing.len() + 1);
        if let Some(package) = self.package.as_deref().filter(|p| !p.is_empty()) {
            parts.push(package);
        }
        parts.extend(self.enclosing.iter().map(String::as_str));
        parts.join(".")
    }

    /// Fully-qualified name of `name` declared in the current scope.
    pub fn qualify(&self, name: &str) -> String {
        let prefix = self.current();
        if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", prefix, name)
        }
    }

    pub fn enter(&mut self, name: &str) {
        self.enclosing.push(name.to_string());
        trace!(scope = %self.current(), "enter");
    }

    pub fn leave(&mut self) {
        trace!(scope = %self.current(), "leave");
        self.enclosing.pop();
    }
}
