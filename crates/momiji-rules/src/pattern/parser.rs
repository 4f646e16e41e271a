//! Recursive-descent parser for pattern-expression text
//!
//! Covers the surface needed by the pattern rules: alternation, groups
//! (plain, non-capturing, named), lookarounds, character classes,
//! quantifiers including `{m}`/`{m,}`/`{m,n}` and lazy variants, escapes,
//! and backreferences (`\1`..`\9`, `\k<name>`). Anything outside that
//! surface is a parse error; callers degrade gracefully on errors rather
//! than failing the analyzed file.

use super::{Alternative, Disjunction, Element, LookaroundKind};
use biome_text_size::TextRange;
use momiji_core::ast::text_range;
use thiserror::Error;

/// A pattern parse failure with the byte offset it was detected at
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at offset {offset}")]
pub struct PatternError {
    pub message: String,
    pub offset: usize,
}

impl PatternError {
    fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

/// Parse pattern text into its expression tree
pub fn parse(pattern: &str) -> Result<Disjunction, PatternError> {
    let mut parser = Parser {
        text: pattern,
        pos: 0,
    };
    let disjunction = parser.parse_disjunction()?;
    match parser.peek() {
        None => Ok(disjunction),
        Some(')') => Err(PatternError::new("Unmatched ')'", parser.pos)),
        Some(ch) => Err(PatternError::new(
            format!("Unexpected character '{ch}'"),
            parser.pos,
        )),
    }
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
}

type ParseResult<T> = Result<T, PatternError>;

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn span_from(&self, start: usize) -> TextRange {
        text_range(start as u32, self.pos as u32)
    }

    fn parse_disjunction(&mut self) -> ParseResult<Disjunction> {
        let start = self.pos;
        let mut alternatives = vec![self.parse_alternative()?];
        while self.eat('|') {
            alternatives.push(self.parse_alternative()?);
        }
        Ok(Disjunction {
            span: self.span_from(start),
            alternatives,
        })
    }

    fn parse_alternative(&mut self) -> ParseResult<Alternative> {
        let start = self.pos;
        let mut elements = Vec::new();
        while let Some(ch) = self.peek() {
            if ch == '|' || ch == ')' {
                break;
            }
            elements.push(self.parse_element()?);
        }
        Ok(Alternative {
            span: self.span_from(start),
            elements,
        })
    }

    fn parse_element(&mut self) -> ParseResult<Element> {
        let start = self.pos;
        let atom = self.parse_atom()?;
        if let Some(quantifier_span) = self.parse_quantifier()? {
            return Ok(Element::Quantified {
                span: self.span_from(start),
                element: Box::new(atom),
                quantifier_span,
            });
        }
        Ok(atom)
    }

    fn parse_atom(&mut self) -> ParseResult<Element> {
        let start = self.pos;
        match self.peek() {
            Some('(') => self.parse_group(),
            Some('[') => self.parse_character_class(),
            Some('\\') => self.parse_escape(),
            Some(ch @ ('*' | '+' | '?')) => Err(PatternError::new(
                format!("Nothing to repeat before '{ch}'"),
                start,
            )),
            Some(_) => {
                self.bump();
                Ok(Element::Literal {
                    span: self.span_from(start),
                })
            }
            None => Err(PatternError::new("Unexpected end of pattern", start)),
        }
    }

    fn parse_group(&mut self) -> ParseResult<Element> {
        let start = self.pos;
        self.bump(); // '('
        let mut capturing = true;
        let mut lookaround = None;

        if self.eat('?') {
            if self.eat(':') {
                capturing = false;
            } else if self.eat('=') {
                lookaround = Some(LookaroundKind::Lookahead);
            } else if self.eat('!') {
                lookaround = Some(LookaroundKind::NegativeLookahead);
            } else if self.eat('<') {
                if self.eat('=') {
                    lookaround = Some(LookaroundKind::Lookbehind);
                } else if self.eat('!') {
                    lookaround = Some(LookaroundKind::NegativeLookbehind);
                } else {
                    // named capturing group: consume the name
                    loop {
                        match self.bump() {
                            Some('>') => break,
                            Some(_) => {}
                            None => {
                                return Err(PatternError::new("Unterminated group name", self.pos));
                            }
                        }
                    }
                }
            } else {
                return Err(PatternError::new("Invalid group", self.pos));
            }
        }

        let body = self.parse_disjunction()?;
        if !self.eat(')') {
            return Err(PatternError::new("Unterminated group", self.pos));
        }
        let span = self.span_from(start);
        match lookaround {
            Some(kind) => Ok(Element::Lookaround { span, kind, body }),
            None => Ok(Element::Group {
                span,
                capturing,
                body,
            }),
        }
    }

    fn parse_character_class(&mut self) -> ParseResult<Element> {
        let start = self.pos;
        self.bump(); // '['
        self.eat('^');
        // a ']' directly after the opening (or after '^') is a literal
        let mut first = true;
        loop {
            match self.bump() {
                Some(']') if !first => break,
                Some(']') => {}
                Some('\\') => {
                    if self.bump().is_none() {
                        return Err(PatternError::new("Unterminated escape", self.pos));
                    }
                }
                Some(_) => {}
                None => {
                    return Err(PatternError::new("Unterminated character class", self.pos));
                }
            }
            first = false;
        }
        Ok(Element::CharacterClass {
            span: self.span_from(start),
        })
    }

    fn parse_escape(&mut self) -> ParseResult<Element> {
        let start = self.pos;
        self.bump(); // '\\'
        let ch = self
            .bump()
            .ok_or_else(|| PatternError::new("Unterminated escape", self.pos))?;
        match ch {
            '1'..='9' => {
                while matches!(self.peek(), Some('0'..='9')) {
                    self.bump();
                }
                Ok(Element::Backreference {
                    span: self.span_from(start),
                })
            }
            'k' if self.peek() == Some('<') => {
                self.bump(); // '<'
                loop {
                    match self.bump() {
                        Some('>') => break,
                        Some(_) => {}
                        None => {
                            return Err(PatternError::new(
                                "Unterminated backreference name",
                                self.pos,
                            ));
                        }
                    }
                }
                Ok(Element::Backreference {
                    span: self.span_from(start),
                })
            }
            'x' => {
                self.consume_hex_digits(2);
                Ok(self.literal_from(start))
            }
            'u' => {
                if self.eat('{') {
                    self.consume_until('}');
                } else {
                    self.consume_hex_digits(4);
                }
                Ok(self.literal_from(start))
            }
            'c' => {
                if matches!(self.peek(), Some(c) if c.is_ascii_alphabetic()) {
                    self.bump();
                }
                Ok(self.literal_from(start))
            }
            'p' | 'P' => {
                if self.eat('{') {
                    self.consume_until('}');
                }
                Ok(self.literal_from(start))
            }
            _ => Ok(self.literal_from(start)),
        }
    }

    fn literal_from(&self, start: usize) -> Element {
        Element::Literal {
            span: self.span_from(start),
        }
    }

    fn consume_hex_digits(&mut self, count: usize) {
        for _ in 0..count {
            if matches!(self.peek(), Some(c) if c.is_ascii_hexdigit()) {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn consume_until(&mut self, terminator: char) {
        while let Some(ch) = self.bump() {
            if ch == terminator {
                break;
            }
        }
    }

    /// Parse a quantifier token if one follows; returns its span
    ///
    /// A `{` that does not form a valid counted quantifier is a literal
    /// character and must not be consumed here.
    fn parse_quantifier(&mut self) -> ParseResult<Option<TextRange>> {
        let start = self.pos;
        match self.peek() {
            Some('*' | '+' | '?') => {
                self.bump();
                self.eat('?'); // lazy
                Ok(Some(self.span_from(start)))
            }
            Some('{') => {
                let checkpoint = self.pos;
                if self.parse_counted_quantifier() {
                    self.eat('?'); // lazy
                    Ok(Some(self.span_from(start)))
                } else {
                    self.pos = checkpoint;
                    Ok(None)
                }
            }
            _ => Ok(None),
        }
    }

    fn parse_counted_quantifier(&mut self) -> bool {
        self.bump(); // '{'
        let mut saw_digit = false;
        while matches!(self.peek(), Some('0'..='9')) {
            self.bump();
            saw_digit = true;
        }
        if !saw_digit {
            return false;
        }
        if self.eat(',') {
            while matches!(self.peek(), Some('0'..='9')) {
                self.bump();
            }
        }
        self.eat('}')
    }
}
