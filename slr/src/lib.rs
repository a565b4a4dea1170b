//! # slr
//!
//! An SLR(1) parsing engine for a small arithmetic expression grammar.
//!
//! The crate is built from three layers, each depending only on the ones
//! before it:
//!
//! - [`Grammar`]: the fixed symbol universe, the production list and the
//!   FIRST/FOLLOW sets computed by fixpoint iteration;
//! - [`ParsingTable`]: the canonical collection of LR(0) item sets and the
//!   SLR(1) ACTION/GOTO tables derived from it;
//! - [`Driver`]: the shift-reduce automaton that runs those tables over a
//!   token sequence and records a trace.
//!
//! Tokenization is left to the caller: anything implementing [`TokenSource`]
//! (or any `&[Token]` ending in END_OF_FILE) can be parsed. The [`report`]
//! module renders tables and traces as plain text.
//!
//! ## Example
//!
//! ```rust
//! use slr::{Driver, Grammar, ParsingTable, Terminal, Token};
//!
//! let grammar = Grammar::new();
//! let table = ParsingTable::build(&grammar).unwrap();
//! let driver = Driver::new(&grammar, &table);
//!
//! // 2 * ( 3 + 1 )
//! let tokens = vec![
//!     Token::number(2.0, 1),
//!     Token::punct(Terminal::Mul, 1),
//!     Token::punct(Terminal::LBracket, 1),
//!     Token::number(3.0, 1),
//!     Token::punct(Terminal::Plus, 1),
//!     Token::number(1.0, 1),
//!     Token::punct(Terminal::RBracket, 1),
//!     Token::end(1),
//! ];
//! let result = driver.parse(&tokens);
//! assert!(result.is_accepted());
//! assert_eq!(result.steps.last().unwrap().action, "accept");
//! ```

mod driver;
mod error;
mod grammar;
pub mod report;
mod table;
mod token;

pub use crate::driver::{Driver, ParseResult, ParseStats, ParseStep};
pub use crate::error::{ConstructionError, GrammarError, ParseError};
pub use crate::grammar::{Grammar, NonTerminal, Production, Symbol, Terminal, reference_productions};
pub use crate::table::{Item, ItemSet, ParseAction, ParsingTable, canonical_collection, closure, goto};
pub use crate::token::{IterSource, Token, TokenSource, TokenValue, collect_tokens};
