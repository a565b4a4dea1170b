//! # Calculator Lexer
//!
//! Turns source text into [`slr::Token`]s. Built on the [`logos`] crate; the
//! raw [`LogosToken`] kinds are mapped onto the grammar's terminals and
//! annotated with a 1-based line number.
//!
//! Characters that start no token are not an error here: they come out as
//! `UNKNOWN` tokens carrying their text, and the parser reports them as a
//! syntax error with the right line.

use crate::CalcError;
use logos::Logos;
use slr::{Terminal, Token, TokenSource, TokenValue, collect_tokens};

/// Raw tokens recognized by the `logos`-based lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\f]+")]
enum LogosToken {
    /// Line break, only used to count lines.
    #[token("\n")]
    LineFeed,

    /// Unsigned decimal literal, e.g. `42` or `3.14`.
    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Mul,

    #[token("/")]
    Div,

    #[token("(")]
    LBracket,

    #[token(")")]
    RBracket,
}

/// Streaming tokenizer over a borrowed source string.
///
/// Yields exactly one END_OF_FILE token after the last real token, then
/// `Ok(None)` forever.
pub struct CalcLexer<'src> {
    inner: logos::Lexer<'src, LogosToken>,
    line: usize,
    finished: bool,
}

impl<'src> CalcLexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: LogosToken::lexer(source),
            line: 1,
            finished: false,
        }
    }

    /// Current 1-based line.
    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }
}

impl TokenSource for CalcLexer<'_> {
    type Error = CalcError;

    fn try_next(&mut self) -> Result<Option<Token>, Self::Error> {
        if self.finished {
            return Ok(None);
        }
        loop {
            let Some(raw) = self.inner.next() else {
                self.finished = true;
                return Ok(Some(Token::end(self.line)));
            };
            let slice = self.inner.slice();
            let line = self.line;
            let token = match raw {
                Ok(LogosToken::LineFeed) => {
                    self.line += 1;
                    continue;
                }
                Ok(LogosToken::Number) => {
                    let value: f64 = slice.parse().map_err(|source| CalcError::Number {
                        text: slice.into(),
                        line,
                        source,
                    })?;
                    Token::number(value, line)
                }
                Ok(LogosToken::Ident) => Token::ident(slice, line),
                Ok(LogosToken::Plus) => Token::punct(Terminal::Plus, line),
                Ok(LogosToken::Minus) => Token::punct(Terminal::Minus, line),
                Ok(LogosToken::Mul) => Token::punct(Terminal::Mul, line),
                Ok(LogosToken::Div) => Token::punct(Terminal::Div, line),
                Ok(LogosToken::LBracket) => Token::punct(Terminal::LBracket, line),
                Ok(LogosToken::RBracket) => Token::punct(Terminal::RBracket, line),
                Err(()) => Token::new(Terminal::Unknown, TokenValue::Text(slice.into()), line),
            };
            log::trace!("token {:?}", token);
            return Ok(Some(token));
        }
    }
}

/// Tokenizes the whole of `source`; the result ends with END_OF_FILE.
///
/// # Errors
/// Returns [`CalcError::Number`] for a numeric literal `f64` cannot hold.
pub fn tokenize(source: &str) -> Result<Vec<Token>, CalcError> {
    collect_tokens(&mut CalcLexer::new(source))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(tokens: &[Token]) -> Vec<Terminal> {
        tokens.iter().map(|t| t.token_type).collect()
    }

    #[test]
    fn expression_tokens() {
        let tokens = tokenize("2 + 2 * (3 - 1)").unwrap();
        use Terminal::*;
        assert_eq!(
            types(&tokens),
            vec![
                Number, Plus, Number, Mul, LBracket, Number, Minus, Number, RBracket, EndOfFile
            ]
        );
        assert_eq!(tokens[0].value, TokenValue::Number(2.0));
        assert_eq!(tokens[7].value, TokenValue::Number(1.0));
    }

    #[test]
    fn decimals_and_identifiers() {
        let tokens = tokenize("3.25/rate_1").unwrap();
        assert_eq!(tokens[0], Token::number(3.25, 1));
        assert_eq!(tokens[1], Token::punct(Terminal::Div, 1));
        assert_eq!(tokens[2], Token::ident("rate_1", 1));
        assert!(tokens[3].is_end());
    }

    #[test]
    fn lines_are_counted() {
        let tokens = tokenize("1 +\n\n  2\n").unwrap();
        let lines: Vec<usize> = tokens.iter().map(|t| t.line).collect();
        assert_eq!(lines, vec![1, 1, 3, 4]);
    }

    #[test]
    fn unknown_characters_become_tokens() {
        let tokens = tokenize("1 # 2").unwrap();
        assert_eq!(tokens[1].token_type, Terminal::Unknown);
        assert_eq!(tokens[1].to_string(), "#");
        assert_eq!(tokens.len(), 4);
    }

    #[test]
    fn empty_input_is_just_end() {
        assert_eq!(tokenize("").unwrap(), vec![Token::end(1)]);
        assert_eq!(tokenize("  \t ").unwrap(), vec![Token::end(1)]);
    }

    #[test]
    fn end_is_yielded_once() {
        let mut lexer = CalcLexer::new("7");
        assert!(matches!(lexer.try_next(), Ok(Some(t)) if t.token_type == Terminal::Number));
        assert!(matches!(lexer.try_next(), Ok(Some(t)) if t.is_end()));
        assert!(matches!(lexer.try_next(), Ok(None)));
        assert_eq!(lexer.line(), 1);
    }
}
