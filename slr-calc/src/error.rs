//! # Calculator Error Type
//!
//! [`CalcError`] covers what can go wrong while turning text into tokens.
//! Syntax errors are not in here: the lexer passes unrecognized characters
//! through as `UNKNOWN` tokens and the parser reports them.
use smartstring::alias::String;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CalcError {
    /// A numeric literal could not be converted to `f64`.
    #[error("line {line}: unable to parse number {text:?}")]
    Number {
        text: String,
        line: usize,
        #[source]
        source: std::num::ParseFloatError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_error_trait_obj(e: &dyn std::error::Error) -> &dyn std::error::Error {
        e
    }

    #[test]
    fn number_error_keeps_source() {
        let source = "1.2.3".parse::<f64>().unwrap_err();
        let err = CalcError::Number {
            text: "1.2.3".into(),
            line: 4,
            source,
        };
        assert_eq!(err.to_string(), "line 4: unable to parse number \"1.2.3\"");
        assert!(_assert_error_trait_obj(&err).source().is_some());
    }

    fn _assert_send_sync_static<T: Send + Sync + 'static>() {}
    #[test]
    fn calc_error_is_send_sync_static() {
        _assert_send_sync_static::<CalcError>();
    }
}
