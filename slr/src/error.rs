//! Error types for grammar validation, table construction and parsing.
//!
//! Build-time failures ([`GrammarError`], [`ConstructionError`]) are returned
//! from constructors and mean the grammar cannot drive an SLR(1) parser.
//! Parse-time failures ([`ParseError`]) are carried inside a
//! [`ParseResult`](crate::ParseResult) next to the trace that led to them.

use crate::grammar::{NonTerminal, Terminal};
use crate::table::ParseAction;
use smartstring::alias::String;
use thiserror::Error;

/// A production list that cannot form a grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("grammar has no productions")]
    Empty,

    /// Empty bodies would make their head nullable.
    #[error("production {production} has an empty body")]
    EmptyBody { production: usize },

    #[error("no production is headed by <start>")]
    MissingStart,

    #[error("productions {first} and {second} are both headed by <start>")]
    DuplicateStart { first: usize, second: usize },

    #[error("production {production} headed by <start> must have exactly one body symbol")]
    StartBody { production: usize },

    #[error("production {production} uses <start> in its body")]
    StartInBody { production: usize },

    #[error("production {production} uses the UNKNOWN terminal")]
    UnknownInBody { production: usize },

    #[error("production {production} uses {non_terminal}, which heads no production")]
    Undefined {
        production: usize,
        non_terminal: NonTerminal,
    },
}

/// Failure to build the ACTION/GOTO tables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    #[error("invalid grammar: {0}")]
    Grammar(#[from] GrammarError),

    /// Two different actions were proposed for the same table cell, so the
    /// grammar is not SLR(1).
    #[error("conflict in state {state} on {terminal}: {existing} vs {proposed}")]
    Conflict {
        state: usize,
        terminal: Terminal,
        existing: ParseAction,
        proposed: ParseAction,
    },
}

/// Reason a parse stopped without accepting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No ACTION entry for the current state and lookahead.
    #[error("syntax error in line {line}, token is {token} (state {state})")]
    Syntax {
        line: usize,
        token: String,
        state: usize,
    },

    /// A reduction found no GOTO entry (or not enough stack) for its head.
    /// Points at a table that does not belong to the grammar.
    #[error("no goto from state {state} on {non_terminal} (line {line})")]
    Integrity {
        state: usize,
        non_terminal: NonTerminal,
        line: usize,
    },

    /// A reduction named a production the grammar does not have.
    #[error("reduce by unknown production {production} (line {line})")]
    UnknownProduction { production: usize, line: usize },

    /// The token sequence ran out before an END_OF_FILE token was read.
    #[error("token stream ended without END_OF_FILE (state {state})")]
    UnexpectedEnd { state: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_send_sync_static<T: Send + Sync + 'static>() {}

    #[test]
    fn errors_are_send_sync_static() {
        _assert_send_sync_static::<GrammarError>();
        _assert_send_sync_static::<ConstructionError>();
        _assert_send_sync_static::<ParseError>();
    }

    #[test]
    fn grammar_error_converts_into_construction_error() {
        let err: ConstructionError = GrammarError::MissingStart.into();
        assert!(matches!(err, ConstructionError::Grammar(_)));
        assert!(err.to_string().contains("<start>"));
    }

    #[test]
    fn conflict_message_names_both_actions() {
        let err = ConstructionError::Conflict {
            state: 4,
            terminal: Terminal::Plus,
            existing: ParseAction::Shift(7),
            proposed: ParseAction::Reduce(1),
        };
        assert_eq!(err.to_string(), "conflict in state 4 on +: s7 vs r1");
    }

    #[test]
    fn syntax_error_message() {
        let err = ParseError::Syntax {
            line: 3,
            token: "+".into(),
            state: 7,
        };
        assert_eq!(err.to_string(), "syntax error in line 3, token is + (state 7)");
    }
}
