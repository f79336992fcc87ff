//! Pull-style reader over the section/value format.
//!
//! The whole input is lexed up front into a token list (keeping line
//! numbers for diagnostics); traversal is then a cursor over that list with
//! explicit depth tracking. The depth convention throughout: every loop
//! passes the depth the reader had when the loop started, and the call that
//! returns `None`/`false` is the one that consumed the enclosing section
//! end, leaving the reader one level up.

use crate::codec::error::CodecError;
use crate::codec::is_valid_name;
use crate::codec::value::Value;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    SectionStart(String),
    SectionEnd,
    Value { name: String, value: Value },
}

/// One element encountered inside a section: either a named value or the
/// start of a nested section. After receiving `Section`, the caller must
/// either decode the section to its end or call
/// [`SectionReader::skip_current_section`].
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Value { name: String, value: Value },
    Section(String),
}

#[derive(Debug)]
pub struct SectionReader {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    depth: usize,
}

impl SectionReader {
    /// Lex `input` into tokens. Fails fast on malformed lines and globally
    /// unbalanced sections; traversal afterwards cannot run off the format.
    ///
    /// Lines whose first non-blank character is `#` are skipped, so stores
    /// survive hand annotation.
    pub fn new(input: &str) -> Result<Self, CodecError> {
        let mut tokens = Vec::new();
        let mut depth = 0usize;
        for (idx, raw) in input.lines().enumerate() {
            let line = idx + 1;
            let text = raw.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }
            if text == "}" {
                if depth == 0 {
                    return Err(CodecError::UnbalancedEnd { line });
                }
                depth -= 1;
                tokens.push((line, Token::SectionEnd));
            } else if let Some(name) = text.strip_suffix('{') {
                let name = name.trim_end();
                if !is_valid_name(name) {
                    return Err(CodecError::malformed(
                        line,
                        format!("invalid section name '{}'", name),
                    ));
                }
                depth += 1;
                tokens.push((line, Token::SectionStart(name.to_string())));
            } else if let Some((name, rhs)) = text.split_once('=') {
                let name = name.trim();
                if !is_valid_name(name) {
                    return Err(CodecError::malformed(
                        line,
                        format!("invalid value name '{}'", name),
                    ));
                }
                let rhs = rhs.trim();
                let (ty, payload) = split_typed_payload(rhs, line)?;
                let value = Value::parse(ty, payload, line)?;
                tokens.push((
                    line,
                    Token::Value {
                        name: name.to_string(),
                        value,
                    },
                ));
            } else {
                return Err(CodecError::malformed(line, "unrecognized line"));
            }
        }
        if depth != 0 {
            return Err(CodecError::UnclosedSections { open: depth });
        }
        Ok(Self {
            tokens,
            pos: 0,
            depth: 0,
        })
    }

    /// Nesting depth at the cursor.
    pub fn depth(&self) -> usize {
        self.depth
    }

    fn next_token(&mut self) -> Option<(usize, Token)> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Next value or nested-section start inside the current section.
    /// Returns `None` once the enclosing section closes (consuming its end
    /// marker). At the top level, end of input also yields `None`.
    pub fn next_element_within(
        &mut self,
        outer_depth: usize,
    ) -> Result<Option<Element>, CodecError> {
        debug_assert_eq!(self.depth, outer_depth);
        match self.next_token() {
            None => {
                if outer_depth == 0 {
                    Ok(None)
                } else {
                    Err(CodecError::UnexpectedEof)
                }
            }
            Some((_, Token::SectionEnd)) => {
                self.depth -= 1;
                Ok(None)
            }
            Some((_, Token::Value { name, value })) => Ok(Some(Element::Value { name, value })),
            Some((_, Token::SectionStart(name))) => {
                self.depth += 1;
                Ok(Some(Element::Section(name)))
            }
        }
    }

    /// Advance to the next section start at this depth, or `None` when the
    /// enclosing section closes. Stray values at this level are logged and
    /// skipped; newer writers may interleave values this reader does not
    /// know about.
    pub fn goto_next_section_or_end(
        &mut self,
        outer_depth: usize,
    ) -> Result<Option<String>, CodecError> {
        debug_assert_eq!(self.depth, outer_depth);
        loop {
            match self.next_token() {
                None => {
                    if outer_depth == 0 {
                        return Ok(None);
                    }
                    return Err(CodecError::UnexpectedEof);
                }
                Some((_, Token::SectionEnd)) => {
                    self.depth -= 1;
                    return Ok(None);
                }
                Some((line, Token::Value { name, .. })) => {
                    log::warn!("skipping stray value '{}' at line {}", name, line);
                }
                Some((_, Token::SectionStart(name))) => {
                    self.depth += 1;
                    return Ok(Some(name));
                }
            }
        }
    }

    /// Like [`goto_next_section_or_end`](Self::goto_next_section_or_end),
    /// but the next section must carry the given name; any other section at
    /// this level is a hard error.
    pub fn goto_next_section_with_name_or_end(
        &mut self,
        name: &str,
        outer_depth: usize,
    ) -> Result<bool, CodecError> {
        match self.goto_next_section_or_end(outer_depth)? {
            None => Ok(false),
            Some(found) if found == name => Ok(true),
            Some(found) => Err(CodecError::UnexpectedSection {
                expected: name.to_string(),
                found,
            }),
        }
    }

    /// Consume the rest of the section the cursor just entered, including
    /// its end marker. Used to step over unknown sections.
    pub fn skip_current_section(&mut self) -> Result<(), CodecError> {
        if self.depth == 0 {
            return Err(CodecError::NoOpenSection);
        }
        let target = self.depth - 1;
        while self.depth > target {
            match self.next_token() {
                None => return Err(CodecError::UnexpectedEof),
                Some((_, Token::SectionStart(_))) => self.depth += 1,
                Some((_, Token::SectionEnd)) => self.depth -= 1,
                Some((_, Token::Value { .. })) => {}
            }
        }
        Ok(())
    }
}

/// Split `type(payload)` into its two parts.
fn split_typed_payload(rhs: &str, line: usize) -> Result<(&str, &str), CodecError> {
    let open = rhs
        .find('(')
        .ok_or_else(|| CodecError::malformed(line, "value payload is not 'type(...)'"))?;
    if !rhs.ends_with(')') {
        return Err(CodecError::malformed(line, "value payload missing ')'"));
    }
    Ok((&rhs[..open], &rhs[open + 1..rhs.len() - 1]))
}
