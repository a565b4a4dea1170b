//! # Parse driver
//!
//! Runs the shift-reduce automaton described by a [`ParsingTable`] over a
//! token sequence and records every decision as a [`ParseStep`].
//!
//! The driver only borrows the grammar and the table, so one pair of them can
//! serve many parses, including parses running on different threads. Each
//! call to [`Driver::parse`] owns its stacks and cursor.

use crate::error::ParseError;
use crate::grammar::{Grammar, Symbol, Terminal};
use crate::table::{ParseAction, ParsingTable};
use crate::token::{Token, TokenSource, TokenValue, collect_tokens};

/// One row of the trace: the machine as it was when `action` was chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStep {
    /// Symbol stack, bottom first.
    pub stack: String,
    /// Remaining input, including the lookahead.
    pub input: String,
    /// The chosen action, e.g. `shift 4` or `reduce <mul> -> <brackets>`.
    pub action: String,
    /// Index of the lookahead token.
    pub cursor: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub shifts: usize,
    pub reductions: usize,
}

/// Outcome of one parse: the trace and, unless the input was accepted, the
/// reason it stopped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseResult {
    pub steps: Vec<ParseStep>,
    pub error: Option<ParseError>,
    pub stats: ParseStats,
}

impl ParseResult {
    #[inline]
    pub fn is_accepted(&self) -> bool {
        self.error.is_none()
    }

    /// The diagnostic text, if the parse failed.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }
}

/// Shift-reduce executor over a borrowed grammar and table.
#[derive(Debug, Clone, Copy)]
pub struct Driver<'a> {
    grammar: &'a Grammar,
    table: &'a ParsingTable,
}

impl<'a> Driver<'a> {
    pub fn new(grammar: &'a Grammar, table: &'a ParsingTable) -> Self {
        Self { grammar, table }
    }

    /// Parses `tokens`, which should end with an END_OF_FILE token.
    ///
    /// Never panics: running off the end of `tokens`, a syntax error and an
    /// inconsistent table all end up in [`ParseResult::error`].
    pub fn parse(&self, tokens: &[Token]) -> ParseResult {
        let mut result = ParseResult::default();
        let mut states: Vec<usize> = vec![0];
        let mut symbols: Vec<(Symbol, TokenValue)> =
            vec![(Terminal::EndOfFile.into(), TokenValue::None)];
        let mut cursor = 0;

        loop {
            let state = states.last().copied().unwrap_or_default();
            let Some(token) = tokens.get(cursor) else {
                result.error = Some(ParseError::UnexpectedEnd { state });
                return result;
            };
            let lookahead = token.token_type;
            let action = self.table.action(state, lookahead);

            result.steps.push(ParseStep {
                stack: render_stack(&symbols),
                input: render_input(&tokens[cursor..]),
                action: self.render_action(action),
                cursor,
            });
            if log::log_enabled!(log::Level::Trace) {
                log::trace!("{:?}  <-  {}  :  {}", states, token, action);
            }

            match action {
                ParseAction::Shift(target) => {
                    symbols.push((lookahead.into(), token.value.clone()));
                    states.push(target);
                    cursor += 1;
                    result.stats.shifts += 1;
                }

                ParseAction::Reduce(prod) => {
                    if let Err(err) = self.reduce(prod, token.line, &mut states, &mut symbols) {
                        result.error = Some(err);
                        return result;
                    }
                    result.stats.reductions += 1;
                }

                ParseAction::Accept => {
                    log::trace!("Accept");
                    return result;
                }

                ParseAction::Error => {
                    result.error = Some(ParseError::Syntax {
                        line: token.line,
                        token: token.to_string().into(),
                        state,
                    });
                    return result;
                }
            }
        }
    }

    /// Drains `source` and parses the collected tokens.
    ///
    /// # Errors
    /// Only errors of the source itself; parse failures are reported in the
    /// returned [`ParseResult`].
    pub fn parse_source<S: TokenSource + ?Sized>(
        &self,
        source: &mut S,
    ) -> Result<ParseResult, S::Error> {
        let tokens = collect_tokens(source)?;
        Ok(self.parse(&tokens))
    }

    fn reduce(
        &self,
        prod: usize,
        line: usize,
        states: &mut Vec<usize>,
        symbols: &mut Vec<(Symbol, TokenValue)>,
    ) -> Result<(), ParseError> {
        let Some(production) = self.grammar.production(prod) else {
            return Err(ParseError::UnknownProduction {
                production: prod,
                line,
            });
        };
        let head = production.head;
        let top = states.last().copied().unwrap_or_default();
        // The sentinel entry must survive the pop.
        let keep = match states.len().checked_sub(production.len()) {
            Some(keep) if keep > 0 => keep,
            _ => {
                return Err(ParseError::Integrity {
                    state: top,
                    non_terminal: head,
                    line,
                });
            }
        };
        states.truncate(keep);
        symbols.truncate(keep);
        symbols.push((head.into(), TokenValue::None));

        let exposed = states[keep - 1];
        let Some(target) = self.table.goto_state(exposed, head) else {
            return Err(ParseError::Integrity {
                state: exposed,
                non_terminal: head,
                line,
            });
        };
        states.push(target);
        Ok(())
    }

    fn render_action(&self, action: ParseAction) -> String {
        match action {
            ParseAction::Shift(state) => format!("shift {}", state),
            ParseAction::Reduce(prod) => match self.grammar.production_string(prod) {
                Some(name) => format!("reduce {}", name),
                None => format!("reduce {}", prod),
            },
            ParseAction::Accept => "accept".to_owned(),
            ParseAction::Error => "error".to_owned(),
        }
    }
}

fn render_stack(symbols: &[(Symbol, TokenValue)]) -> String {
    let mut out = String::new();
    for (i, (sym, value)) in symbols.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        match value {
            TokenValue::None => out.push_str(sym.glyph()),
            value => out.push_str(&value.to_string()),
        }
    }
    out
}

fn render_input(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
