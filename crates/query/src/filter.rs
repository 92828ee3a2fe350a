//! Parser and evaluator for the subset of the metadata query language the filesystem
//! engine understands.
//!
//! ```text
//! expr    := or
//! or      := and ( "||" and )*
//! and     := unary ( "&&" unary )*
//! unary   := "!" unary | primary
//! primary := "(" expr ")" | ATTRIBUTE OP value
//! value   := STRING[cdw] | NUMBER | $time.iso(DATE) | $time.now[(secs)] | $time.today[(days)]
//! ```
//!
//! String values support `*` and `?` wildcards; `c` folds case, `w` also matches single words.
//! `d` is accepted and ignored. A multi-valued attribute matches when any element does.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use glob::{MatchOptions, Pattern};
use spotlight_metadata::RawValue;
use std::cmp::Ordering;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at offset {offset}")]
pub(crate) struct FilterError {
    message: String,
    offset: usize,
}

impl FilterError {
    fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

type Result<T> = std::result::Result<T, FilterError>;

/// Attribute lookup for one candidate item
pub(crate) trait AttributeSource {
    fn attribute(&self, name: &str) -> Option<RawValue>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    fn holds(self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => ordering == Ordering::Equal,
            Self::Ne => ordering != Ordering::Equal,
            Self::Lt => ordering == Ordering::Less,
            Self::Le => ordering != Ordering::Greater,
            Self::Gt => ordering == Ordering::Greater,
            Self::Ge => ordering != Ordering::Less,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TextPattern {
    text: String,
    fold_case: bool,
    word: bool,
    matcher: TextMatcher,
}

#[derive(Debug, Clone, PartialEq)]
enum TextMatcher {
    Exact,
    Contains(String),
    Glob(Pattern),
}

impl TextPattern {
    fn new(raw: &str, modifiers: &str, offset: usize) -> Result<Self> {
        let mut fold_case = false;
        let mut word = false;
        for modifier in modifiers.chars() {
            match modifier {
                'c' => fold_case = true,
                'w' => word = true,
                'd' => {}
                other => {
                    return Err(FilterError::new(
                        format!("unknown string modifier '{other}'"),
                        offset,
                    ))
                }
            }
        }

        let text = if fold_case {
            raw.to_lowercase()
        } else {
            raw.to_string()
        };
        let matcher = compile_matcher(&text, offset)?;
        Ok(Self {
            text,
            fold_case,
            word,
            matcher,
        })
    }

    fn fold(&self, value: &str) -> String {
        if self.fold_case {
            value.to_lowercase()
        } else {
            value.to_string()
        }
    }

    fn matches(&self, value: &str) -> bool {
        let value = self.fold(value);
        if self.matches_folded(&value) {
            return true;
        }
        self.word && value.split_whitespace().any(|w| self.matches_folded(w))
    }

    fn matches_folded(&self, value: &str) -> bool {
        match &self.matcher {
            TextMatcher::Exact => value == self.text,
            TextMatcher::Contains(needle) => value.contains(needle.as_str()),
            TextMatcher::Glob(pattern) => pattern.matches_with(
                value,
                MatchOptions {
                    case_sensitive: true,
                    require_literal_separator: false,
                    require_literal_leading_dot: false,
                },
            ),
        }
    }

    fn compare(&self, value: &str) -> Ordering {
        self.fold(value).cmp(&self.text)
    }
}

fn compile_matcher(text: &str, offset: usize) -> Result<TextMatcher> {
    let is_wild = |c: char| c == '*' || c == '?';
    if !text.contains(is_wild) {
        return Ok(TextMatcher::Exact);
    }
    if text.len() >= 2 && text.starts_with('*') && text.ends_with('*') {
        let inner = text.trim_matches('*');
        if !inner.contains(is_wild) {
            return Ok(TextMatcher::Contains(inner.to_string()));
        }
    }

    let mut glob = String::with_capacity(text.len());
    let mut previous_star = false;
    for ch in text.chars() {
        match ch {
            '*' if previous_star => continue,
            '*' | '?' => glob.push(ch),
            '[' => glob.push_str("[[]"),
            ']' => glob.push_str("[]]"),
            _ => glob.push(ch),
        }
        previous_star = ch == '*';
    }
    Pattern::new(&glob)
        .map(TextMatcher::Glob)
        .map_err(|err| FilterError::new(format!("invalid wildcard pattern: {err}"), offset))
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Operand {
    Text(TextPattern),
    Number(f64),
    Time(DateTime<Utc>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Comparison {
    attribute: String,
    op: CompareOp,
    operand: Operand,
}

impl Comparison {
    pub(crate) fn attribute(&self) -> &str {
        &self.attribute
    }

    fn evaluate(&self, source: &dyn AttributeSource) -> bool {
        let Some(value) = source.attribute(&self.attribute) else {
            return false;
        };
        match self.op {
            CompareOp::Ne => !matches_value(&value, CompareOp::Eq, &self.operand),
            op => matches_value(&value, op, &self.operand),
        }
    }
}

fn matches_value(value: &RawValue, op: CompareOp, operand: &Operand) -> bool {
    if let RawValue::Array(items) = value {
        return items.iter().any(|item| matches_value(item, op, operand));
    }

    match (value, operand) {
        (RawValue::String(text), Operand::Text(pattern)) => match op {
            CompareOp::Eq => pattern.matches(text),
            _ => op.holds(pattern.compare(text)),
        },
        (RawValue::String(text), Operand::Number(number)) => text
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(|parsed| parsed.partial_cmp(number))
            .is_some_and(|ordering| op.holds(ordering)),
        (RawValue::Integer(int), Operand::Number(number)) => (*int as f64)
            .partial_cmp(number)
            .is_some_and(|ordering| op.holds(ordering)),
        (RawValue::Float(float), Operand::Number(number)) => float
            .partial_cmp(number)
            .is_some_and(|ordering| op.holds(ordering)),
        (RawValue::Date(date), Operand::Time(time)) => op.holds(date.cmp(time)),
        _ => false,
    }
}

/// Parsed query fragment
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Filter {
    And(Box<Filter>, Box<Filter>),
    Or(Box<Filter>, Box<Filter>),
    Not(Box<Filter>),
    Compare(Comparison),
}

impl Filter {
    pub(crate) fn parse(query: &str) -> Result<Self> {
        Self::parse_at(query, Utc::now())
    }

    /// Parse with a fixed clock for `$time.now` and `$time.today`
    pub(crate) fn parse_at(query: &str, now: DateTime<Utc>) -> Result<Self> {
        let tokens = Lexer::new(query, now).tokenize()?;
        let mut parser = Parser {
            tokens,
            pos: 0,
            end: query.len(),
            depth: 0,
        };
        let filter = parser.parse_or()?;
        if let Some((_, offset)) = parser.tokens.get(parser.pos) {
            return Err(FilterError::new("unexpected trailing input", *offset));
        }
        Ok(filter)
    }

    pub(crate) fn matches(&self, source: &dyn AttributeSource) -> bool {
        match self {
            Self::And(lhs, rhs) => lhs.matches(source) && rhs.matches(source),
            Self::Or(lhs, rhs) => lhs.matches(source) || rhs.matches(source),
            Self::Not(inner) => !inner.matches(source),
            Self::Compare(cmp) => cmp.evaluate(source),
        }
    }

    /// True when any comparison reads `attribute`
    pub(crate) fn references(&self, attribute: &str) -> bool {
        match self {
            Self::And(lhs, rhs) | Self::Or(lhs, rhs) => {
                lhs.references(attribute) || rhs.references(attribute)
            }
            Self::Not(inner) => inner.references(attribute),
            Self::Compare(cmp) => cmp.attribute() == attribute,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Op(CompareOp),
    And,
    Or,
    Not,
    LParen,
    RParen,
    Value(Operand),
}

struct Lexer<'a> {
    source: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
    now: DateTime<Utc>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str, now: DateTime<Utc>) -> Self {
        Self {
            source,
            chars: source.char_indices().collect(),
            pos: 0,
            now,
        }
    }

    fn offset(&self) -> usize {
        self.chars
            .get(self.pos)
            .map(|(offset, _)| *offset)
            .unwrap_or(self.source.len())
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|(_, ch)| *ch)
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).map(|(_, ch)| *ch)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn tokenize(mut self) -> Result<Vec<(Token, usize)>> {
        let mut tokens = Vec::new();
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.pos += 1;
            }
            let offset = self.offset();
            let Some(ch) = self.peek() else {
                break;
            };

            let token = match ch {
                '(' => {
                    self.pos += 1;
                    Token::LParen
                }
                ')' => {
                    self.pos += 1;
                    Token::RParen
                }
                '&' if self.peek_at(1) == Some('&') => {
                    self.pos += 2;
                    Token::And
                }
                '|' if self.peek_at(1) == Some('|') => {
                    self.pos += 2;
                    Token::Or
                }
                '!' if self.peek_at(1) == Some('=') => {
                    self.pos += 2;
                    Token::Op(CompareOp::Ne)
                }
                '!' => {
                    self.pos += 1;
                    Token::Not
                }
                '=' if self.peek_at(1) == Some('=') => {
                    self.pos += 2;
                    Token::Op(CompareOp::Eq)
                }
                '=' => {
                    self.pos += 1;
                    Token::Op(CompareOp::Eq)
                }
                '<' | '>' => {
                    self.pos += 1;
                    let or_equal = self.peek() == Some('=');
                    if or_equal {
                        self.pos += 1;
                    }
                    Token::Op(match (ch, or_equal) {
                        ('<', false) => CompareOp::Lt,
                        ('<', true) => CompareOp::Le,
                        ('>', false) => CompareOp::Gt,
                        _ => CompareOp::Ge,
                    })
                }
                '"' | '\'' => Token::Value(self.string(ch)?),
                '$' => Token::Value(Operand::Time(self.time()?)),
                c if c.is_ascii_digit()
                    || (c == '-' && self.peek_at(1).is_some_and(|n| n.is_ascii_digit())) =>
                {
                    Token::Value(Operand::Number(self.number()?))
                }
                c if c.is_alphabetic() || c == '_' => Token::Ident(self.ident()),
                other => {
                    return Err(FilterError::new(
                        format!("unexpected character '{other}'"),
                        offset,
                    ))
                }
            };
            tokens.push((token, offset));
        }
        Ok(tokens)
    }

    fn ident(&mut self) -> String {
        let mut out = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' || ch == ':' || ch == '.' {
                out.push(ch);
                self.pos += 1;
            } else {
                break;
            }
        }
        out
    }

    fn number(&mut self) -> Result<f64> {
        let offset = self.offset();
        let mut text = String::new();
        if self.peek() == Some('-') {
            text.push('-');
            self.pos += 1;
        }
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() || ch == '.' {
                text.push(ch);
                self.pos += 1;
            } else {
                break;
            }
        }
        text.parse::<f64>()
            .map_err(|_| FilterError::new(format!("invalid number '{text}'"), offset))
    }

    fn string(&mut self, quote: char) -> Result<Operand> {
        let offset = self.offset();
        self.pos += 1;
        let mut text = String::new();
        loop {
            match self.bump() {
                None => return Err(FilterError::new("unterminated string", offset)),
                Some('\\') => match self.bump() {
                    Some(escaped) => text.push(escaped),
                    None => return Err(FilterError::new("unterminated string", offset)),
                },
                Some(ch) if ch == quote => break,
                Some(ch) => text.push(ch),
            }
        }

        let mut modifiers = String::new();
        while let Some(ch) = self.peek().filter(char::is_ascii_alphabetic) {
            modifiers.push(ch);
            self.pos += 1;
        }
        TextPattern::new(&text, &modifiers, offset).map(Operand::Text)
    }

    fn time(&mut self) -> Result<DateTime<Utc>> {
        let offset = self.offset();
        self.pos += 1;
        let name = self.ident();
        match name.as_str() {
            "time.iso" => {
                let argument = self
                    .call_argument()?
                    .ok_or_else(|| FilterError::new("$time.iso needs a date", offset))?;
                parse_iso_date(argument.trim_matches(|c| c == '"' || c == '\''))
                    .ok_or_else(|| FilterError::new(format!("invalid date '{argument}'"), offset))
            }
            "time.now" => {
                let seconds = self.numeric_argument(offset)?;
                Duration::try_seconds(seconds)
                    .and_then(|delta| self.now.checked_add_signed(delta))
                    .ok_or_else(|| FilterError::new("time offset out of range", offset))
            }
            "time.today" => {
                let days = self.numeric_argument(offset)?;
                let midnight = self.now.date_naive().and_hms_opt(0, 0, 0).unwrap_or_default();
                Duration::try_days(days)
                    .and_then(|delta| midnight.and_utc().checked_add_signed(delta))
                    .ok_or_else(|| FilterError::new("time offset out of range", offset))
            }
            other => Err(FilterError::new(
                format!("unknown time function '${other}'"),
                offset,
            )),
        }
    }

    /// Text between `(` and `)` when a call follows, trimmed
    fn call_argument(&mut self) -> Result<Option<String>> {
        if self.peek() != Some('(') {
            return Ok(None);
        }
        let offset = self.offset();
        self.pos += 1;
        let mut argument = String::new();
        loop {
            match self.bump() {
                None => return Err(FilterError::new("unterminated call", offset)),
                Some(')') => break,
                Some(ch) => argument.push(ch),
            }
        }
        Ok(Some(argument.trim().to_string()))
    }

    fn numeric_argument(&mut self, offset: usize) -> Result<i64> {
        match self.call_argument()? {
            None => Ok(0),
            Some(argument) if argument.is_empty() => Ok(0),
            Some(argument) => argument.parse::<i64>().map_err(|_| {
                FilterError::new(format!("invalid time offset '{argument}'"), offset)
            }),
        }
    }
}

/// RFC 3339, `YYYY-MM-DDTHH:MM:SS` (UTC) or a bare `YYYY-MM-DD` (UTC midnight)
pub(crate) fn parse_iso_date(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Deepest `!` / `(` nesting accepted in one fragment
const MAX_NESTING: usize = 256;

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    end: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(token, _)| token)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(_, offset)| *offset)
            .unwrap_or(self.end)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(token, _)| token.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn parse_or(&mut self) -> Result<Filter> {
        let mut lhs = self.parse_and()?;
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            let rhs = self.parse_and()?;
            lhs = Filter::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Filter> {
        let mut lhs = self.parse_unary()?;
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            let rhs = self.parse_unary()?;
            lhs = Filter::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_NESTING {
            return Err(FilterError::new("query nested too deeply", self.offset()));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn parse_unary(&mut self) -> Result<Filter> {
        if self.peek() == Some(&Token::Not) {
            self.pos += 1;
            let inner = self.nested(Self::parse_unary)?;
            return Ok(Filter::Not(Box::new(inner)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Filter> {
        let offset = self.offset();
        match self.next() {
            Some(Token::LParen) => {
                let inner = self.nested(Self::parse_or)?;
                let close = self.offset();
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(FilterError::new("expected ')'", close)),
                }
            }
            Some(Token::Ident(attribute)) => {
                let op_offset = self.offset();
                let op = match self.next() {
                    Some(Token::Op(op)) => op,
                    _ => return Err(FilterError::new("expected comparison operator", op_offset)),
                };
                let value_offset = self.offset();
                let operand = match self.next() {
                    Some(Token::Value(operand)) => operand,
                    _ => return Err(FilterError::new("expected value", value_offset)),
                };
                Ok(Filter::Compare(Comparison {
                    attribute,
                    op,
                    operand,
                }))
            }
            Some(_) => Err(FilterError::new("expected attribute or '('", offset)),
            None => Err(FilterError::new("unexpected end of query", offset)),
        }
    }
}
