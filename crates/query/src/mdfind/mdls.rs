//! Parser for the text listing printed by `mdls`.
//!
//! ```text
//! kMDItemContentTypeTree = (
//!     "public.plain-text",
//!     "public.text"
//! )
//! kMDItemFSSize          = 1234
//! kMDItemContentModificationDate = 2024-01-15 10:30:00 +0000
//! kMDItemAuthors         = (null)
//! ```

use chrono::{DateTime, Utc};
use spotlight_metadata::RawValue;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("mdls output line {line}: {message}")]
pub(crate) struct ListingError {
    line: usize,
    message: String,
}

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

pub(crate) fn parse_listing(text: &str) -> Result<Vec<(String, RawValue)>, ListingError> {
    let mut cursor = Cursor {
        chars: text.chars().collect(),
        pos: 0,
        line: 1,
    };
    let mut entries = Vec::new();

    loop {
        cursor.skip_whitespace();
        if cursor.peek().is_none() {
            break;
        }

        let name = cursor.take_while(|ch| !ch.is_whitespace() && ch != '=');
        if name.is_empty() {
            return Err(cursor.error("expected attribute name"));
        }
        cursor.skip_inline_whitespace();
        if cursor.bump() != Some('=') {
            return Err(cursor.error(format!("expected '=' after {name}")));
        }
        cursor.skip_inline_whitespace();
        let value = cursor.value(false)?;
        entries.push((name, value));
    }
    Ok(entries)
}

struct Cursor {
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

impl Cursor {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
        }
        Some(ch)
    }

    fn error(&self, message: impl Into<String>) -> ListingError {
        ListingError {
            line: self.line,
            message: message.into(),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn skip_inline_whitespace(&mut self) {
        while self.peek().is_some_and(|ch| ch == ' ' || ch == '\t') {
            self.bump();
        }
    }

    fn take_while(&mut self, keep: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(ch) = self.peek().filter(|ch| keep(*ch)) {
            out.push(ch);
            self.bump();
        }
        out
    }

    fn value(&mut self, in_array: bool) -> Result<RawValue, ListingError> {
        match self.peek() {
            Some('"') => self.quoted().map(RawValue::String),
            Some('(') => self.parenthesized(),
            Some(_) => {
                let token = self.take_while(|ch| ch != '\n' && !(in_array && (ch == ',' || ch == ')')));
                Ok(bare_value(token.trim()))
            }
            None => Err(self.error("expected value")),
        }
    }

    fn quoted(&mut self) -> Result<String, ListingError> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some('"') => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(ch) => out.push(ch),
                    None => return Err(self.error("unterminated string")),
                },
                Some(ch) => out.push(ch),
            }
        }
    }

    fn parenthesized(&mut self) -> Result<RawValue, ListingError> {
        self.bump();
        self.skip_whitespace();
        if self.chars[self.pos..].starts_with(&['n', 'u', 'l', 'l', ')']) {
            self.pos += 5;
            return Ok(RawValue::unsupported("null"));
        }

        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(self.error("unterminated list")),
                Some(')') => {
                    self.bump();
                    return Ok(RawValue::Array(items));
                }
                Some(',') => {
                    self.bump();
                }
                Some(_) => items.push(self.value(true)?),
            }
        }
    }
}

fn bare_value(token: &str) -> RawValue {
    if let Ok(date) = DateTime::parse_from_str(token, DATE_FORMAT) {
        return RawValue::Date(date.with_timezone(&Utc));
    }
    if let Ok(int) = token.parse::<i64>() {
        return RawValue::Integer(int);
    }
    if let Ok(float) = token.parse::<f64>() {
        return RawValue::Float(float);
    }
    RawValue::String(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    const LISTING: &str = r#"_kMDItemDisplayNameWithExtensions = "notes.txt"
kMDItemContentCreationDate         = 2024-01-15 10:30:00 +0000
kMDItemContentTypeTree             = (
    "public.plain-text",
    "public.text",
    "public.data"
)
kMDItemDisplayName                 = "notes \"draft\".txt"
kMDItemFSSize                      = 1234
kMDItemDurationSeconds             = 12.5
kMDItemAuthors                     = (null)
kMDItemUsedDates                   = (
    2024-01-15 00:00:00 +0000
)
kMDItemPath                        = "/Users/me/notes.txt"
"#;

    fn lookup<'a>(entries: &'a [(String, RawValue)], name: &str) -> &'a RawValue {
        &entries
            .iter()
            .find(|(key, _)| key == name)
            .unwrap_or_else(|| panic!("{name} missing"))
            .1
    }

    #[test]
    fn parses_every_value_shape() {
        let entries = parse_listing(LISTING).unwrap();
        assert_eq!(entries.len(), 9);

        assert_eq!(
            lookup(&entries, "kMDItemContentCreationDate"),
            &RawValue::Date(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap())
        );
        assert_eq!(
            lookup(&entries, "kMDItemContentTypeTree"),
            &RawValue::Array(vec![
                RawValue::String("public.plain-text".into()),
                RawValue::String("public.text".into()),
                RawValue::String("public.data".into()),
            ])
        );
        assert_eq!(
            lookup(&entries, "kMDItemDisplayName"),
            &RawValue::String("notes \"draft\".txt".into())
        );
        assert_eq!(lookup(&entries, "kMDItemFSSize"), &RawValue::Integer(1234));
        assert_eq!(lookup(&entries, "kMDItemDurationSeconds"), &RawValue::Float(12.5));
        assert_eq!(
            lookup(&entries, "kMDItemAuthors"),
            &RawValue::unsupported("null")
        );
        assert_eq!(
            lookup(&entries, "kMDItemUsedDates"),
            &RawValue::Array(vec![RawValue::Date(
                Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
            )])
        );
        assert_eq!(
            lookup(&entries, "kMDItemPath"),
            &RawValue::String("/Users/me/notes.txt".into())
        );
    }

    #[test]
    fn empty_listing_has_no_entries() {
        assert_eq!(parse_listing("\n  \n").unwrap(), vec![]);
    }

    #[test]
    fn unterminated_list_reports_line() {
        let err = parse_listing("kMDItemFSSize = 1\nkMDItemTags = (\n  \"a\",\n").unwrap_err();
        assert!(err.to_string().contains("unterminated list"), "{err}");
    }

    #[test]
    fn missing_equals_is_an_error() {
        assert!(parse_listing("kMDItemFSSize 1").is_err());
    }
}
