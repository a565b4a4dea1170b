//! # slr-calc
//!
//! Text front end for the [`slr`] expression parser: a `logos`-based lexer
//! that produces the parser's tokens, and (in `main.rs`) a command-line tool
//! that parses a file or standard input and prints the tables and the trace.
//!
//! ## Example
//!
//! ```rust
//! use slr::{Driver, Grammar, ParsingTable};
//! use slr_calc::CalcLexer;
//!
//! let grammar = Grammar::new();
//! let table = ParsingTable::build(&grammar).unwrap();
//! let mut lexer = CalcLexer::new("(1 + 2) * 3");
//! let result = Driver::new(&grammar, &table).parse_source(&mut lexer).unwrap();
//! assert!(result.is_accepted());
//! ```
mod error;
pub mod lexer;

pub use error::CalcError;
pub use lexer::{CalcLexer, tokenize};

#[cfg(test)]
mod tests {
    use super::*;
    use slr::{Driver, Grammar, ParseError, ParsingTable};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn parse(source: &str) -> slr::ParseResult {
        init_logger();
        let grammar = Grammar::new();
        let table = ParsingTable::build(&grammar).unwrap();
        let tokens = tokenize(source).unwrap();
        Driver::new(&grammar, &table).parse(&tokens)
    }

    #[test]
    fn accepts_valid_expressions() {
        for source in ["2 + 2 * ( 3 - 1 )", "42", "((7))", "1 / 2 / 3", "8 -\n 4 * 2.5"] {
            let result = parse(source);
            assert!(result.is_accepted(), "{source:?}: {:?}", result.error);
        }
    }

    #[test]
    fn reports_line_of_offending_token() {
        let result = parse("2 +\n+ 3");
        assert!(matches!(
            result.error,
            Some(ParseError::Syntax { line: 2, ref token, .. }) if token == "+"
        ));
    }

    #[test]
    fn rejects_identifiers_and_stray_characters() {
        assert!(matches!(
            parse("a + 1").error,
            Some(ParseError::Syntax { state: 0, ref token, .. }) if token == "a"
        ));
        assert!(matches!(
            parse("1 + $").error,
            Some(ParseError::Syntax { ref token, .. }) if token == "$"
        ));
        assert!(matches!(
            parse("").error,
            Some(ParseError::Syntax { ref token, .. }) if token == "EOF"
        ));
    }
}
