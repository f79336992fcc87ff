//! Atomic typed values of the section/value format.
//!
//! A value is a named leaf inside a section. The textual form is
//! `Name = type(payload)`, e.g. `Count = i32(7)` or `Label = str("hi")`.
//! This module owns the payload syntax in both directions: [`Value::render`]
//! produces it, [`Value::parse`] consumes it. Section structure is handled
//! by the reader and writer, not here.

use std::iter::Peekable;
use std::str::Chars;

use crate::codec::error::CodecError;

/// One atomic value payload.
///
/// `Null` is the explicit absence marker: optional values are written as
/// `null()` rather than being dropped, so a reader can distinguish "field
/// absent from the record" from "field present but empty".
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    I32(i32),
    I64(i64),
    Bool(bool),
    Str(String),
    StrList(Vec<String>),
    Null,
}

impl Value {
    /// The wire name of this value's type, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::Bool(_) => "bool",
            Value::Str(_) => "str",
            Value::StrList(_) => "list",
            Value::Null => "null",
        }
    }

    pub fn as_i32(&self, name: &str) -> Result<i32, CodecError> {
        match self {
            Value::I32(v) => Ok(*v),
            other => Err(other.mismatch(name, "i32")),
        }
    }

    pub fn as_i64(&self, name: &str) -> Result<i64, CodecError> {
        match self {
            Value::I64(v) => Ok(*v),
            other => Err(other.mismatch(name, "i64")),
        }
    }

    pub fn as_bool(&self, name: &str) -> Result<bool, CodecError> {
        match self {
            Value::Bool(v) => Ok(*v),
            other => Err(other.mismatch(name, "bool")),
        }
    }

    pub fn into_str(self, name: &str) -> Result<String, CodecError> {
        match self {
            Value::Str(s) => Ok(s),
            other => Err(other.mismatch(name, "str")),
        }
    }

    /// A string that may have been written as the `null()` marker.
    pub fn into_opt_str(self, name: &str) -> Result<Option<String>, CodecError> {
        match self {
            Value::Str(s) => Ok(Some(s)),
            Value::Null => Ok(None),
            other => Err(other.mismatch(name, "str")),
        }
    }

    /// A string list that may have been written as the `null()` marker.
    pub fn into_opt_str_list(self, name: &str) -> Result<Option<Vec<String>>, CodecError> {
        match self {
            Value::StrList(items) => Ok(Some(items)),
            Value::Null => Ok(None),
            other => Err(other.mismatch(name, "list")),
        }
    }

    fn mismatch(&self, name: &str, expected: &'static str) -> CodecError {
        CodecError::TypeMismatch {
            name: name.to_string(),
            expected,
            found: self.kind(),
        }
    }

    /// Append the `type(payload)` form of this value to `out`.
    pub fn render(&self, out: &mut String) {
        match self {
            Value::I32(v) => {
                out.push_str("i32(");
                out.push_str(&v.to_string());
                out.push(')');
            }
            Value::I64(v) => {
                out.push_str("i64(");
                out.push_str(&v.to_string());
                out.push(')');
            }
            Value::Bool(v) => {
                out.push_str("bool(");
                out.push_str(if *v { "true" } else { "false" });
                out.push(')');
            }
            Value::Str(s) => {
                out.push_str("str(");
                render_quoted(s, out);
                out.push(')');
            }
            Value::StrList(items) => {
                out.push_str("list(");
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    render_quoted(item, out);
                }
                out.push(')');
            }
            Value::Null => out.push_str("null()"),
        }
    }

    /// Parse a payload of the given type name, as found between the
    /// parentheses of `type(payload)`. `line` is carried for diagnostics.
    pub fn parse(ty: &str, payload: &str, line: usize) -> Result<Value, CodecError> {
        match ty {
            "i32" => payload
                .trim()
                .parse::<i32>()
                .map(Value::I32)
                .map_err(|e| CodecError::malformed(line, format!("bad i32 payload: {}", e))),
            "i64" => payload
                .trim()
                .parse::<i64>()
                .map(Value::I64)
                .map_err(|e| CodecError::malformed(line, format!("bad i64 payload: {}", e))),
            "bool" => match payload.trim() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                other => Err(CodecError::malformed(
                    line,
                    format!("bad bool payload '{}'", other),
                )),
            },
            "str" => {
                let mut scan = Scan::new(payload, line);
                let s = scan.quoted()?;
                scan.expect_end()?;
                Ok(Value::Str(s))
            }
            "list" => {
                let mut scan = Scan::new(payload, line);
                let items = scan.string_list()?;
                scan.expect_end()?;
                Ok(Value::StrList(items))
            }
            "null" => {
                if payload.trim().is_empty() {
                    Ok(Value::Null)
                } else {
                    Err(CodecError::malformed(line, "null payload must be empty"))
                }
            }
            other => Err(CodecError::malformed(
                line,
                format!("unknown value type '{}'", other),
            )),
        }
    }
}

fn render_quoted(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
}

/// Minimal character scanner over one payload.
struct Scan<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Scan<'a> {
    fn new(payload: &'a str, line: usize) -> Self {
        Self {
            chars: payload.chars().peekable(),
            line,
        }
    }

    fn err(&self, message: impl Into<String>) -> CodecError {
        CodecError::malformed(self.line, message)
    }

    fn skip_ws(&mut self) {
        while matches!(self.chars.peek(), Some(c) if c.is_ascii_whitespace()) {
            self.chars.next();
        }
    }

    /// One double-quoted string with escapes.
    fn quoted(&mut self) -> Result<String, CodecError> {
        self.skip_ws();
        if self.chars.next() != Some('"') {
            return Err(self.err("expected opening quote"));
        }
        let mut out = String::new();
        loop {
            match self.chars.next() {
                Some('"') => return Ok(out),
                Some('\\') => match self.chars.next() {
                    Some('"') => out.push('"'),
                    Some('\\') => out.push('\\'),
                    Some('n') => out.push('\n'),
                    Some('r') => out.push('\r'),
                    Some('t') => out.push('\t'),
                    Some(other) => {
                        return Err(self.err(format!("unknown escape '\\{}'", other)));
                    }
                    None => return Err(self.err("unterminated escape")),
                },
                Some(other) => out.push(other),
                None => return Err(self.err("unterminated string")),
            }
        }
    }

    /// Comma-separated quoted strings; an empty payload is an empty list.
    fn string_list(&mut self) -> Result<Vec<String>, CodecError> {
        self.skip_ws();
        let mut items = Vec::new();
        if self.chars.peek().is_none() {
            return Ok(items);
        }
        loop {
            items.push(self.quoted()?);
            self.skip_ws();
            match self.chars.peek() {
                Some(',') => {
                    self.chars.next();
                }
                _ => return Ok(items),
            }
        }
    }

    fn expect_end(&mut self) -> Result<(), CodecError> {
        self.skip_ws();
        match self.chars.peek().copied() {
            None => Ok(()),
            Some(c) => Err(self.err(format!("trailing character '{}' after payload", c))),
        }
    }
}
