//! Depth-checked writer for the section/value format.

use crate::codec::error::CodecError;
use crate::codec::is_valid_name;
use crate::codec::value::Value;

/// Builds the textual form of nested sections and values.
///
/// Output is byte-deterministic for a given call sequence: two-space
/// indentation per depth level, one token per line, no trailing noise.
/// `end_section` must name the section being closed so that encoder bugs
/// surface at write time instead of as unreadable stores.
#[derive(Debug, Default)]
pub struct SectionWriter {
    out: String,
    stack: Vec<String>,
}

impl SectionWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently open sections.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn start_section(&mut self, name: &str) -> Result<(), CodecError> {
        if !is_valid_name(name) {
            return Err(CodecError::InvalidName(name.to_string()));
        }
        self.indent();
        self.out.push_str(name);
        self.out.push_str(" {\n");
        self.stack.push(name.to_string());
        Ok(())
    }

    pub fn end_section(&mut self, name: &str) -> Result<(), CodecError> {
        match self.stack.pop() {
            None => Err(CodecError::NoOpenSection),
            Some(open) if open != name => Err(CodecError::MismatchedSectionEnd {
                expected: open,
                found: name.to_string(),
            }),
            Some(_) => {
                self.indent();
                self.out.push_str("}\n");
                Ok(())
            }
        }
    }

    pub fn write_value(&mut self, name: &str, value: &Value) -> Result<(), CodecError> {
        if !is_valid_name(name) {
            return Err(CodecError::InvalidName(name.to_string()));
        }
        self.indent();
        self.out.push_str(name);
        self.out.push_str(" = ");
        value.render(&mut self.out);
        self.out.push('\n');
        Ok(())
    }

    pub fn write_i32(&mut self, name: &str, value: i32) -> Result<(), CodecError> {
        self.write_value(name, &Value::I32(value))
    }

    pub fn write_i64(&mut self, name: &str, value: i64) -> Result<(), CodecError> {
        self.write_value(name, &Value::I64(value))
    }

    pub fn write_bool(&mut self, name: &str, value: bool) -> Result<(), CodecError> {
        self.write_value(name, &Value::Bool(value))
    }

    pub fn write_str(&mut self, name: &str, value: &str) -> Result<(), CodecError> {
        self.write_value(name, &Value::Str(value.to_string()))
    }

    /// Optional string; `None` is written as the explicit `null()` marker.
    pub fn write_opt_str(&mut self, name: &str, value: Option<&str>) -> Result<(), CodecError> {
        match value {
            Some(s) => self.write_str(name, s),
            None => self.write_value(name, &Value::Null),
        }
    }

    /// String list; an absent list is written as `null()`, an empty list as
    /// `list()`. Readers treat the two differently.
    pub fn write_str_list(
        &mut self,
        name: &str,
        values: Option<&[String]>,
    ) -> Result<(), CodecError> {
        match values {
            Some(items) => self.write_value(name, &Value::StrList(items.to_vec())),
            None => self.write_value(name, &Value::Null),
        }
    }

    /// Consume the writer and return the text, failing if any section is
    /// still open.
    pub fn finish(self) -> Result<String, CodecError> {
        if !self.stack.is_empty() {
            return Err(CodecError::UnclosedSections {
                open: self.stack.len(),
            });
        }
        Ok(self.out)
    }

    fn indent(&mut self) {
        for _ in 0..self.stack.len() {
            self.out.push_str("  ");
        }
    }
}
