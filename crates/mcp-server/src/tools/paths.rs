use std::fs;
use std::path::{Component, Path, PathBuf};

use super::error::{ToolError, ToolResult};

/// Canonical path resolution and scope containment checks
pub struct PathValidator;

impl PathValidator {
    /// Resolve an absolute path, following every symlink along the way.
    ///
    /// Every prefix that exists is canonicalized; missing segments are appended lexically
    /// (`..` pops, `.` is dropped).
    pub fn resolve_absolute(path: &Path) -> ToolResult<PathBuf> {
        if !path.is_absolute() {
            return Err(ToolError::invalid(format!(
                "path must be absolute, got '{}'",
                path.display()
            )));
        }

        let mut resolved = PathBuf::new();
        for component in path.components() {
            match component {
                Component::Prefix(_) | Component::RootDir => resolved.push(component.as_os_str()),
                Component::CurDir => {}
                Component::ParentDir => {
                    resolved.pop();
                }
                Component::Normal(part) => {
                    resolved.push(part);
                    // a `..` may lead back into existing directories
                    if let Ok(canonical) = resolved.canonicalize() {
                        resolved = canonical;
                    }
                }
            }
        }
        Ok(resolved)
    }

    /// Resolve both paths and require `path` to sit at or below `scope`.
    ///
    /// Containment compares whole path segments: `/tmp/ab` does not contain `/tmp/abc`.
    pub fn validate_within_scope(path: &Path, scope: &Path) -> ToolResult<PathBuf> {
        let resolved = Self::resolve_absolute(path)?;
        let scope_resolved = Self::resolve_absolute(scope)?;
        if resolved.starts_with(&scope_resolved) {
            Ok(resolved)
        } else {
            Err(ToolError::invalid(format!(
                "'{}' is outside of scope '{}'",
                path.display(),
                scope.display()
            )))
        }
    }

    /// Require `scope` to be an existing, listable directory; returns its canonical form
    pub fn validate_scope_exists(scope: &Path) -> ToolResult<PathBuf> {
        let canonical = scope.canonicalize().map_err(|_| {
            ToolError::invalid(format!("scope '{}' does not exist", scope.display()))
        })?;
        if !canonical.is_dir() {
            return Err(ToolError::invalid(format!(
                "scope '{}' is not a directory",
                scope.display()
            )));
        }
        fs::read_dir(&canonical).map_err(|err| {
            ToolError::invalid(format!("scope '{}' is not readable: {err}", scope.display()))
        })?;
        Ok(canonical)
    }

    /// Require `path` to lie within one of `roots`. An empty list allows everything.
    pub fn validate_within_any(path: &Path, roots: &[PathBuf]) -> ToolResult<PathBuf> {
        if roots.is_empty() {
            return Self::resolve_absolute(path);
        }
        roots
            .iter()
            .find_map(|root| Self::validate_within_scope(path, root).ok())
            .ok_or_else(|| {
                ToolError::invalid(format!(
                    "'{}' is outside of the allowed roots",
                    path.display()
                ))
            })
    }
}
