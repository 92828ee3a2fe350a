use std::fmt;

use crate::attrs;
use crate::error::BuilderError;
use crate::kind::content_type_for_kind;

/// Where a predicate's text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateOrigin {
    /// Assembled by [`QueryBuilder`] from a structured intent
    Built,
    /// Passed through verbatim from the caller; not validated
    Raw,
}

/// A native query fragment ready for a metadata engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    fragment: String,
    origin: PredicateOrigin,
}

impl Predicate {
    fn built(fragment: String) -> Self {
        Self {
            fragment,
            origin: PredicateOrigin::Built,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.fragment
    }

    pub fn origin(&self) -> PredicateOrigin {
        self.origin
    }

    pub fn is_raw(&self) -> bool {
        self.origin == PredicateOrigin::Raw
    }

    pub fn into_string(self) -> String {
        self.fragment
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fragment)
    }
}

/// Translates search intents into query fragments. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryBuilder;

impl QueryBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Case- and diacritic-insensitive substring match on the item's text content
    pub fn natural_text(&self, text: &str) -> Predicate {
        Predicate::built(format!(
            "{} == \"*{}*\"cd",
            attrs::TEXT_CONTENT,
            escape_quoted(text)
        ))
    }

    /// Content-type-tree match for a coarse kind name; `None` for names outside the table
    pub fn kind(&self, kind: &str) -> Option<Predicate> {
        content_type_for_kind(kind).map(|uti| {
            Predicate::built(format!("{} == \"{}\"", attrs::CONTENT_TYPE_TREE, uti))
        })
    }

    /// Modification date at or after `iso_date`. The date text is inserted as given.
    pub fn modified_since(&self, iso_date: &str) -> Predicate {
        Predicate::built(format!(
            "{} >= $time.iso({})",
            attrs::CONTENT_MODIFICATION_DATE,
            iso_date
        ))
    }

    /// Pass a caller-written fragment through unchanged
    pub fn raw_predicate(&self, fragment: &str) -> Result<Predicate, BuilderError> {
        if fragment.trim().is_empty() {
            return Err(BuilderError::InvalidPredicate(
                "predicate is empty".to_string(),
            ));
        }
        Ok(Predicate {
            fragment: fragment.to_string(),
            origin: PredicateOrigin::Raw,
        })
    }
}

/// Escape the characters that would terminate or corrupt a double-quoted query string
fn escape_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn natural_text_wraps_in_wildcards_with_modifiers() {
        let predicate = QueryBuilder::new().natural_text("hello world");
        assert_eq!(
            predicate.as_str(),
            r#"kMDItemTextContent == "*hello world*"cd"#
        );
        assert!(!predicate.is_raw());
    }

    #[test]
    fn natural_text_escapes_quotes_and_backslashes() {
        let predicate = QueryBuilder::new().natural_text(r#"say "hi" \o/"#);
        assert_eq!(
            predicate.as_str(),
            r#"kMDItemTextContent == "*say \"hi\" \\o/*"cd"#
        );
    }

    #[test]
    fn kind_uses_content_type_tree() {
        let builder = QueryBuilder::new();
        assert_eq!(
            builder.kind("code").unwrap().as_str(),
            r#"kMDItemContentTypeTree == "public.source-code""#
        );
        assert_eq!(builder.kind("Image"), builder.kind("image"));
        assert_eq!(builder.kind("spreadsheet"), None);
    }

    #[test]
    fn modified_since_inserts_date_verbatim() {
        let predicate = QueryBuilder::new().modified_since("2024-01-01T00:00:00Z");
        assert_eq!(
            predicate.as_str(),
            "kMDItemContentModificationDate >= $time.iso(2024-01-01T00:00:00Z)"
        );
    }

    #[test]
    fn raw_predicate_is_passed_through_and_tagged() {
        let predicate = QueryBuilder::new()
            .raw_predicate("kMDItemFSSize > 1000")
            .unwrap();
        assert_eq!(predicate.as_str(), "kMDItemFSSize > 1000");
        assert!(predicate.is_raw());
    }

    #[test]
    fn blank_raw_predicate_is_rejected() {
        let err = QueryBuilder::new().raw_predicate("   ").unwrap_err();
        assert!(matches!(err, BuilderError::InvalidPredicate(_)));
    }
}
