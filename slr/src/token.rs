//! # Tokens
//!
//! The token model shared by tokenizers and the [`Driver`](crate::Driver),
//! and the [`TokenSource`] capability a tokenizer implements.
//!
//! A token's type is a [`Terminal`]: the grammar and the tokenizer agree on
//! one enumeration, so no conversion table is needed between them.

use crate::grammar::Terminal;
use smartstring::alias::String;
use std::convert::Infallible;
use std::fmt;

/// The payload carried by a lexical token.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TokenValue {
    /// No extra data (operators, brackets, end of input).
    #[default]
    None,

    /// A numeric literal.
    Number(f64),

    /// Source text: an identifier, or the characters of an unknown token.
    Text(String),
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenValue::None => Ok(()),
            TokenValue::Number(n) => write!(f, "{}", n),
            TokenValue::Text(s) => f.write_str(s),
        }
    }
}

/// A lexical token: its type, its value and the 1-based source line.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: Terminal,
    pub value: TokenValue,
    pub line: usize,
}

impl Token {
    #[inline]
    pub fn new(token_type: Terminal, value: TokenValue, line: usize) -> Self {
        Self {
            token_type,
            value,
            line,
        }
    }

    /// A token without a value, e.g. `+` or `(`.
    #[inline]
    pub fn punct(token_type: Terminal, line: usize) -> Self {
        Self::new(token_type, TokenValue::None, line)
    }

    #[inline]
    pub fn number(value: f64, line: usize) -> Self {
        Self::new(Terminal::Number, TokenValue::Number(value), line)
    }

    #[inline]
    pub fn ident(name: &str, line: usize) -> Self {
        Self::new(Terminal::Id, TokenValue::Text(name.into()), line)
    }

    /// The END_OF_FILE marker that terminates every token sequence.
    #[inline]
    pub fn end(line: usize) -> Self {
        Self::punct(Terminal::EndOfFile, line)
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.token_type == Terminal::EndOfFile
    }
}

/// Renders the literal value if there is one, otherwise the type's glyph.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            TokenValue::None => f.write_str(self.token_type.glyph()),
            value => write!(f, "{}", value),
        }
    }
}

/// Anything that can hand out tokens one at a time.
///
/// `Ok(None)` means the input is exhausted. A well-behaved source yields a
/// single END_OF_FILE token last; [`collect_tokens`] supplies one if it
/// does not.
pub trait TokenSource {
    type Error;

    fn try_next(&mut self) -> Result<Option<Token>, Self::Error>;
}

/// Drains `source` into a token vector that ends with exactly one
/// END_OF_FILE token.
///
/// # Errors
/// Propagates the first error reported by the source.
pub fn collect_tokens<S: TokenSource + ?Sized>(source: &mut S) -> Result<Vec<Token>, S::Error> {
    let mut tokens = Vec::new();
    while let Some(token) = source.try_next()? {
        let at_end = token.is_end();
        tokens.push(token);
        if at_end {
            return Ok(tokens);
        }
    }
    let line = tokens.last().map_or(1, |t| t.line);
    tokens.push(Token::end(line));
    Ok(tokens)
}

/// Adapts any token iterator into an infallible [`TokenSource`].
#[derive(Debug, Clone)]
pub struct IterSource<I> {
    iter: I,
}

impl<I: Iterator<Item = Token>> From<I> for IterSource<I> {
    fn from(iter: I) -> Self {
        Self { iter }
    }
}

impl<I: Iterator<Item = Token>> TokenSource for IterSource<I> {
    type Error = Infallible;

    fn try_next(&mut self) -> Result<Option<Token>, Self::Error> {
        Ok(self.iter.next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefers_value_over_glyph() {
        assert_eq!(Token::number(2.0, 1).to_string(), "2");
        assert_eq!(Token::number(2.5, 1).to_string(), "2.5");
        assert_eq!(Token::ident("abc", 1).to_string(), "abc");
        assert_eq!(Token::punct(Terminal::Plus, 1).to_string(), "+");
        assert_eq!(Token::end(1).to_string(), "EOF");
        let unknown = Token::new(Terminal::Unknown, TokenValue::Text("#".into()), 1);
        assert_eq!(unknown.to_string(), "#");
        assert_eq!(Token::punct(Terminal::Unknown, 1).to_string(), "UNKNOWN");
    }

    #[test]
    fn collect_stops_at_first_end() {
        let toks = vec![
            Token::number(1.0, 1),
            Token::end(1),
            Token::number(2.0, 2),
        ];
        let mut source = IterSource::from(toks.into_iter());
        let collected = collect_tokens(&mut source).unwrap();
        assert_eq!(collected.len(), 2);
        assert!(collected[1].is_end());
    }

    #[test]
    fn collect_appends_missing_end() {
        let toks = vec![Token::number(1.0, 3)];
        let mut source = IterSource::from(toks.into_iter());
        let collected = collect_tokens(&mut source).unwrap();
        assert_eq!(collected, vec![Token::number(1.0, 3), Token::end(3)]);

        let mut empty = IterSource::from(std::iter::empty::<Token>());
        assert_eq!(collect_tokens(&mut empty).unwrap(), vec![Token::end(1)]);
    }

    #[test]
    fn collect_propagates_source_errors() {
        struct Failing;
        impl TokenSource for Failing {
            type Error = &'static str;
            fn try_next(&mut self) -> Result<Option<Token>, Self::Error> {
                Err("broken input")
            }
        }
        assert_eq!(collect_tokens(&mut Failing), Err("broken input"));
    }
}
