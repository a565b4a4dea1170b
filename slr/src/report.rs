//! # Reports
//!
//! Plain-text renderings of the grammar, the automaton, the tables, a token
//! list and a parse result. Every writer takes any [`Write`] and only reads
//! data that has already been computed, so a caller is free to format things
//! differently without touching the core.

use crate::driver::ParseResult;
use crate::grammar::{Grammar, NonTerminal, Symbol, Terminal};
use crate::table::{ParseAction, ParsingTable};
use crate::token::Token;
use std::io::{self, Write};

const CELL: usize = 12;
const COLUMN: usize = 50;

/// Terminals that can appear in the ACTION table.
fn table_terminals() -> impl Iterator<Item = Terminal> {
    Terminal::ALL.into_iter().filter(|&t| t != Terminal::Unknown)
}

/// Writes the grammar productions, one per line.
///
/// # Output Format
/// ```text
/// === Productions (9) ===
/// 0: <start> -> <sum>
/// ```
pub fn write_productions<W: Write>(out: &mut W, grammar: &Grammar) -> io::Result<()> {
    writeln!(out, "=== Productions ({}) ===", grammar.production_count())?;
    for (i, prod) in grammar.productions().iter().enumerate() {
        writeln!(out, "{}: {}", i, prod.name)?;
    }
    writeln!(out)
}

/// Writes FIRST and FOLLOW sets of every nonterminal.
pub fn write_first_follow<W: Write>(out: &mut W, grammar: &Grammar) -> io::Result<()> {
    writeln!(out, "=== FIRST / FOLLOW ===")?;
    for n in NonTerminal::ALL {
        write!(out, "FIRST({}) = {{", n)?;
        write_terminals(out, grammar.first(n).iter().copied())?;
        write!(out, "}}   FOLLOW({}) = {{", n)?;
        write_terminals(out, grammar.follow(n).iter().copied())?;
        writeln!(out, "}}")?;
    }
    writeln!(out)
}

fn write_terminals<W: Write>(out: &mut W, set: impl Iterator<Item = Terminal>) -> io::Result<()> {
    for (i, t) in set.enumerate() {
        if i > 0 {
            write!(out, ", ")?;
        }
        write!(out, "{}", t)?;
    }
    Ok(())
}

/// Writes the canonical collection, marking each item's dot with `.`.
pub fn write_states<W: Write>(
    out: &mut W,
    grammar: &Grammar,
    table: &ParsingTable,
) -> io::Result<()> {
    writeln!(out, "=== States ({}) ===", table.state_count())?;
    for (i, items) in table.states().iter().enumerate() {
        writeln!(out, "I{}:", i)?;
        for item in items {
            let Some(prod) = grammar.production(item.prod) else {
                continue;
            };
            write!(out, "    {} ->", prod.head)?;
            for (j, sym) in prod.body.iter().enumerate() {
                if j == item.dot {
                    write!(out, " .")?;
                }
                write!(out, " {}", sym)?;
            }
            if item.dot == prod.len() {
                write!(out, " .")?;
            }
            writeln!(out)?;
        }
    }
    writeln!(out)
}

/// Writes the ACTION and GOTO tables: `s<n>` shift, `r<n>` reduce, `acc`
/// accept, `-` empty.
pub fn write_table<W: Write>(out: &mut W, table: &ParsingTable) -> io::Result<()> {
    writeln!(out, "=== ACTION ===")?;
    write!(out, "{:>CELL$}", "State")?;
    for t in table_terminals() {
        write!(out, "{:>CELL$}", Symbol::from(t).glyph())?;
    }
    writeln!(out)?;
    writeln!(out, "{}", "-".repeat(CELL * (Terminal::COUNT)))?;
    for state in 0..table.state_count() {
        write!(out, "{:>CELL$}", state)?;
        for t in table_terminals() {
            let cell = match table.action(state, t) {
                ParseAction::Error => "-".to_owned(),
                action => action.to_string(),
            };
            write!(out, "{:>CELL$}", cell)?;
        }
        writeln!(out)?;
    }
    writeln!(out)?;

    writeln!(out, "=== GOTO ===")?;
    write!(out, "{:>CELL$}", "State")?;
    for n in NonTerminal::ALL {
        write!(out, "{:>CELL$}", n.glyph())?;
    }
    writeln!(out)?;
    writeln!(out, "{}", "-".repeat(CELL * (NonTerminal::COUNT + 1)))?;
    for state in 0..table.state_count() {
        write!(out, "{:>CELL$}", state)?;
        for n in NonTerminal::ALL {
            match table.goto_state(state, n) {
                Some(target) => write!(out, "{:>CELL$}", target)?,
                None => write!(out, "{:>CELL$}", "-")?,
            }
        }
        writeln!(out)?;
    }
    writeln!(out)
}

/// Writes one token per line with its type and source line.
pub fn write_tokens<W: Write>(out: &mut W, tokens: &[Token]) -> io::Result<()> {
    writeln!(out, "=== Tokens ({}) ===", tokens.len())?;
    for token in tokens {
        writeln!(
            out,
            "{:<CELL$}{:<CELL$}line {}",
            token.token_type.name(),
            token.to_string(),
            token.line
        )?;
    }
    writeln!(out)
}

/// Writes the verdict, the diagnostic if any, and the STACK/INPUT/ACTION trace.
pub fn write_result<W: Write>(out: &mut W, result: &ParseResult) -> io::Result<()> {
    writeln!(out, "=== SLR parse result ===")?;
    match &result.error {
        None => writeln!(out, "Result: ACCEPTED")?,
        Some(err) => {
            writeln!(out, "Result: ERROR")?;
            writeln!(out, "Message: {}", err)?;
        }
    }
    writeln!(
        out,
        "Shifts: {}, reductions: {}",
        result.stats.shifts, result.stats.reductions
    )?;
    writeln!(out)?;
    writeln!(out, "{:<COLUMN$}{:<COLUMN$}ACTION", "STACK", "INPUT")?;
    writeln!(out, "{}", "-".repeat(COLUMN * 2 + 10))?;
    for step in &result.steps {
        writeln!(out, "{:<COLUMN$}{:<COLUMN$}{}", step.stack, step.input, step.action)?;
    }
    writeln!(out, "{}", "-".repeat(COLUMN * 2 + 10))
}
