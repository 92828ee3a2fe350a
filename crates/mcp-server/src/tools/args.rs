use serde_json::{Map, Value};
use std::path::PathBuf;

use super::error::{ToolError, ToolResult};
use super::paths::PathValidator;

/// Typed accessors over a tool call's untyped argument object.
///
/// `null` is treated the same as an absent key.
#[derive(Debug, Clone, Copy)]
pub struct ArgumentExtractor<'a> {
    args: Option<&'a Map<String, Value>>,
}

impl<'a> ArgumentExtractor<'a> {
    pub fn new(args: Option<&'a Map<String, Value>>) -> Self {
        Self { args }
    }

    fn get(&self, name: &str) -> Option<&'a Value> {
        self.args
            .and_then(|args| args.get(name))
            .filter(|value| !value.is_null())
    }

    /// Present, non-empty string
    pub fn require_string(&self, name: &str) -> ToolResult<&'a str> {
        let value = self.get(name).ok_or_else(|| ToolError::missing(name))?;
        match value.as_str() {
            Some(text) if !text.is_empty() => Ok(text),
            Some(_) => Err(ToolError::invalid(format!("'{name}' must not be empty"))),
            None => Err(ToolError::invalid(format!("'{name}' must be a string"))),
        }
    }

    /// Non-empty string starting with `/`. Not resolved or checked for existence.
    pub fn require_absolute_path(&self, name: &str) -> ToolResult<PathBuf> {
        let text = self.require_string(name)?;
        if !text.starts_with('/') {
            return Err(ToolError::invalid(format!(
                "'{name}' must be an absolute path, got '{text}'"
            )));
        }
        Ok(PathBuf::from(text))
    }

    /// Absolute path naming an existing, listable directory; returned canonicalized
    pub fn require_validated_scope(&self, name: &str) -> ToolResult<PathBuf> {
        let path = self.require_absolute_path(name)?;
        PathValidator::validate_scope_exists(&path)
    }

    pub fn optional_string(&self, name: &str) -> Option<&'a str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Integral number; anything else reads as absent
    pub fn optional_integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn require_string_distinguishes_missing_from_invalid() {
        let args = object(json!({ "query": "", "scope": 3, "kind": "code", "gone": null }));
        let ex = ArgumentExtractor::new(Some(&args));

        assert_eq!(ex.require_string("kind"), Ok("code"));
        assert_eq!(
            ex.require_string("missing"),
            Err(ToolError::MissingArgument("missing".into()))
        );
        assert_eq!(
            ex.require_string("gone"),
            Err(ToolError::MissingArgument("gone".into()))
        );
        assert!(matches!(
            ex.require_string("query"),
            Err(ToolError::InvalidArgument(_))
        ));
        assert!(matches!(
            ex.require_string("scope"),
            Err(ToolError::InvalidArgument(_))
        ));
    }

    #[test]
    fn absent_argument_object_reports_missing() {
        let ex = ArgumentExtractor::new(None);
        assert_eq!(
            ex.require_string("path"),
            Err(ToolError::MissingArgument("path".into()))
        );
        assert_eq!(ex.optional_integer("limit"), None);
    }

    #[test]
    fn relative_path_is_rejected_with_absolute_hint() {
        let args = object(json!({ "path": "relative/path" }));
        let err = ArgumentExtractor::new(Some(&args))
            .require_absolute_path("path")
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgument(_)));
        assert!(err.message().contains("absolute"), "{err}");
    }

    #[test]
    fn validated_scope_requires_existing_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("f.txt");
        std::fs::write(&file, "x").unwrap();
        let args = object(json!({
            "dir": dir.path().to_string_lossy(),
            "file": file.to_string_lossy(),
            "nowhere": "/nonexistent/spotlight/scope",
        }));
        let ex = ArgumentExtractor::new(Some(&args));

        assert_eq!(
            ex.require_validated_scope("dir").unwrap(),
            dir.path().canonicalize().unwrap()
        );
        assert!(matches!(
            ex.require_validated_scope("file"),
            Err(ToolError::InvalidArgument(_))
        ));
        assert!(matches!(
            ex.require_validated_scope("nowhere"),
            Err(ToolError::InvalidArgument(_))
        ));
    }

    #[test]
    fn optional_accessors_ignore_wrong_shapes() {
        let args = object(json!({ "limit": "ten", "since": 5, "depth": 2.5, "count": 7 }));
        let ex = ArgumentExtractor::new(Some(&args));
        assert_eq!(ex.optional_integer("limit"), None);
        assert_eq!(ex.optional_integer("depth"), None);
        assert_eq!(ex.optional_integer("count"), Some(7));
        assert_eq!(ex.optional_string("since"), None);
        assert_eq!(ex.optional_string("absent"), None);
    }
}
