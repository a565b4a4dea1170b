//! # Grammar
//!
//! Symbols, productions and the FIRST/FOLLOW sets of the expression grammar.
//!
//! The symbol universe is fixed: ten terminals (one per token type a tokenizer
//! may produce) and four nonterminals. A [`Grammar`] is an ordered list of
//! [`Production`]s over that universe together with FIRST and FOLLOW sets,
//! computed once at construction and read-only afterwards.
//!
//! The reference grammar ([`Grammar::new`]) is:
//!
//! ```text
//! 0  <start>    -> <sum>
//! 1  <sum>      -> <sum> '+' <mul>
//! 2  <sum>      -> <sum> '-' <mul>
//! 3  <sum>      -> <mul>
//! 4  <mul>      -> <mul> '*' <brackets>
//! 5  <mul>      -> <mul> '/' <brackets>
//! 6  <mul>      -> <brackets>
//! 7  <brackets> -> '(' <sum> ')'
//! 8  <brackets> -> NUM
//! ```
//!
//! Productions with an empty body are rejected, so no symbol is nullable and
//! FIRST of a body is always FIRST of its leading symbol.

use crate::error::GrammarError;
use smartstring::alias::String;
use std::collections::BTreeSet;
use std::fmt;

/// Terminal symbols. Each one doubles as the type of a lexical token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Terminal {
    EndOfFile,
    Number,
    Id,
    Plus,
    Minus,
    Mul,
    Div,
    LBracket,
    RBracket,
    /// Anything the tokenizer could not classify. Never appears in a production.
    Unknown,
}

impl Terminal {
    pub const COUNT: usize = 10;

    pub const ALL: [Terminal; Self::COUNT] = [
        Terminal::EndOfFile,
        Terminal::Number,
        Terminal::Id,
        Terminal::Plus,
        Terminal::Minus,
        Terminal::Mul,
        Terminal::Div,
        Terminal::LBracket,
        Terminal::RBracket,
        Terminal::Unknown,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the upper-case display name, e.g. `PLUS`.
    pub fn name(self) -> &'static str {
        match self {
            Terminal::EndOfFile => "END_OF_FILE",
            Terminal::Number => "NUMBER",
            Terminal::Id => "ID",
            Terminal::Plus => "PLUS",
            Terminal::Minus => "MINUS",
            Terminal::Mul => "MUL",
            Terminal::Div => "DIV",
            Terminal::LBracket => "LBRACKET",
            Terminal::RBracket => "RBRACKET",
            Terminal::Unknown => "UNKNOWN",
        }
    }

    /// Returns the operator glyph, e.g. `+`, or a short tag for value tokens.
    pub fn glyph(self) -> &'static str {
        match self {
            Terminal::EndOfFile => "EOF",
            Terminal::Number => "NUM",
            Terminal::Id => "ID",
            Terminal::Plus => "+",
            Terminal::Minus => "-",
            Terminal::Mul => "*",
            Terminal::Div => "/",
            Terminal::LBracket => "(",
            Terminal::RBracket => ")",
            Terminal::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

/// Nonterminal symbols.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NonTerminal {
    /// Head of the augmenting production.
    Start,
    Sum,
    MulExpr,
    Brackets,
}

impl NonTerminal {
    pub const COUNT: usize = 4;

    pub const ALL: [NonTerminal; Self::COUNT] = [
        NonTerminal::Start,
        NonTerminal::Sum,
        NonTerminal::MulExpr,
        NonTerminal::Brackets,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            NonTerminal::Start => "START",
            NonTerminal::Sum => "SUM",
            NonTerminal::MulExpr => "MUL_EXPR",
            NonTerminal::Brackets => "BRACKETS",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            NonTerminal::Start => "<start>",
            NonTerminal::Sum => "<sum>",
            NonTerminal::MulExpr => "<mul>",
            NonTerminal::Brackets => "<brackets>",
        }
    }
}

impl fmt::Display for NonTerminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

/// A grammar symbol: either a terminal or a nonterminal, never both.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    Terminal(Terminal),
    NonTerminal(NonTerminal),
}

impl Symbol {
    pub const COUNT: usize = Terminal::COUNT + NonTerminal::COUNT;

    /// Symbols tried, in this order, when discovering automaton states.
    /// `Unknown` is left out since no production mentions it.
    pub const ALL: [Symbol; Self::COUNT - 1] = [
        Symbol::Terminal(Terminal::EndOfFile),
        Symbol::Terminal(Terminal::Number),
        Symbol::Terminal(Terminal::Id),
        Symbol::Terminal(Terminal::Plus),
        Symbol::Terminal(Terminal::Minus),
        Symbol::Terminal(Terminal::Mul),
        Symbol::Terminal(Terminal::Div),
        Symbol::Terminal(Terminal::LBracket),
        Symbol::Terminal(Terminal::RBracket),
        Symbol::NonTerminal(NonTerminal::Start),
        Symbol::NonTerminal(NonTerminal::Sum),
        Symbol::NonTerminal(NonTerminal::MulExpr),
        Symbol::NonTerminal(NonTerminal::Brackets),
    ];

    /// Dense index: terminals first, then nonterminals.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Symbol::Terminal(t) => t.index(),
            Symbol::NonTerminal(n) => Terminal::COUNT + n.index(),
        }
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    #[inline]
    pub fn is_non_terminal(self) -> bool {
        matches!(self, Symbol::NonTerminal(_))
    }

    pub fn name(self) -> &'static str {
        match self {
            Symbol::Terminal(t) => t.name(),
            Symbol::NonTerminal(n) => n.name(),
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Symbol::Terminal(t) => t.glyph(),
            Symbol::NonTerminal(n) => n.glyph(),
        }
    }
}

impl From<Terminal> for Symbol {
    fn from(t: Terminal) -> Self {
        Symbol::Terminal(t)
    }
}

impl From<NonTerminal> for Symbol {
    fn from(n: NonTerminal) -> Self {
        Symbol::NonTerminal(n)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

/// A production `head -> body` with a printable name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Production {
    pub head: NonTerminal,
    pub body: Vec<Symbol>,
    /// Human-readable form, e.g. `<sum> -> <sum> '+' <mul>`.
    pub name: String,
}

impl Production {
    pub fn new(head: NonTerminal, body: Vec<Symbol>) -> Self {
        let mut name = String::from(head.glyph());
        name.push_str(" ->");
        for sym in &body {
            name.push(' ');
            match sym {
                Symbol::Terminal(
                    t @ (Terminal::Plus
                    | Terminal::Minus
                    | Terminal::Mul
                    | Terminal::Div
                    | Terminal::LBracket
                    | Terminal::RBracket),
                ) => {
                    name.push('\'');
                    name.push_str(t.glyph());
                    name.push('\'');
                }
                other => name.push_str(other.glyph()),
            }
        }
        Self { head, body, name }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Returns the productions of the reference expression grammar.
pub fn reference_productions() -> Vec<Production> {
    use NonTerminal::*;
    use Terminal::*;
    let t = Symbol::Terminal;
    let n = Symbol::NonTerminal;
    vec![
        Production::new(Start, vec![n(Sum)]),
        Production::new(Sum, vec![n(Sum), t(Plus), n(MulExpr)]),
        Production::new(Sum, vec![n(Sum), t(Minus), n(MulExpr)]),
        Production::new(Sum, vec![n(MulExpr)]),
        Production::new(MulExpr, vec![n(MulExpr), t(Mul), n(Brackets)]),
        Production::new(MulExpr, vec![n(MulExpr), t(Div), n(Brackets)]),
        Production::new(MulExpr, vec![n(Brackets)]),
        Production::new(Brackets, vec![t(LBracket), n(Sum), t(RBracket)]),
        Production::new(Brackets, vec![t(Number)]),
    ]
}

/// An ordered production list with its FIRST and FOLLOW sets.
///
/// Immutable once built, so a single instance can be shared by any number of
/// concurrent parses.
#[derive(Clone, Debug)]
pub struct Grammar {
    productions: Vec<Production>,
    start: usize,
    first: Vec<BTreeSet<Terminal>>,
    follow: Vec<BTreeSet<Terminal>>,
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}

impl Grammar {
    /// Builds the reference expression grammar.
    pub fn new() -> Self {
        Self::assemble(reference_productions())
    }

    /// Builds a grammar from an arbitrary production list over the fixed
    /// symbol universe.
    ///
    /// # Errors
    /// Returns a [`GrammarError`] if the list is empty, a body is empty, the
    /// augmenting production is missing, duplicated or malformed, a body uses
    /// `<start>` or `UNKNOWN`, or a body names a nonterminal that heads no
    /// production.
    pub fn with_productions(productions: Vec<Production>) -> Result<Self, GrammarError> {
        validate(&productions)?;
        Ok(Self::assemble(productions))
    }

    fn assemble(productions: Vec<Production>) -> Self {
        let start = productions
            .iter()
            .position(|p| p.head == NonTerminal::Start)
            .unwrap_or(0);
        let first = first_sets(&productions);
        let follow = follow_sets(&productions, &first);
        log::debug!(
            "grammar: {} productions, start production {}",
            productions.len(),
            start
        );
        Self {
            productions,
            start,
            first,
            follow,
        }
    }

    #[inline]
    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    #[inline]
    pub fn production(&self, index: usize) -> Option<&Production> {
        self.productions.get(index)
    }

    #[inline]
    pub fn production_count(&self) -> usize {
        self.productions.len()
    }

    /// Index of the augmenting production `<start> -> X`.
    #[inline]
    pub fn start_production(&self) -> usize {
        self.start
    }

    /// Returns the printable form of production `index`, if it exists.
    pub fn production_string(&self, index: usize) -> Option<&str> {
        self.productions.get(index).map(|p| p.name.as_str())
    }

    /// Productions headed by `head`, with their indices, in declaration order.
    pub fn productions_of(&self, head: NonTerminal) -> impl Iterator<Item = (usize, &Production)> {
        self.productions
            .iter()
            .enumerate()
            .filter(move |(_, p)| p.head == head)
    }

    /// FIRST set of `sym`. A terminal's FIRST set is the terminal itself.
    pub fn first(&self, sym: impl Into<Symbol>) -> &BTreeSet<Terminal> {
        &self.first[sym.into().index()]
    }

    /// FOLLOW set of `sym`. Empty for terminals.
    pub fn follow(&self, sym: impl Into<Symbol>) -> &BTreeSet<Terminal> {
        &self.follow[sym.into().index()]
    }
}

fn validate(productions: &[Production]) -> Result<(), GrammarError> {
    if productions.is_empty() {
        return Err(GrammarError::Empty);
    }
    let mut start: Option<usize> = None;
    for (i, prod) in productions.iter().enumerate() {
        if prod.body.is_empty() {
            return Err(GrammarError::EmptyBody { production: i });
        }
        if prod.head == NonTerminal::Start {
            if let Some(first) = start {
                return Err(GrammarError::DuplicateStart { first, second: i });
            }
            if prod.body.len() != 1 {
                return Err(GrammarError::StartBody { production: i });
            }
            start = Some(i);
        }
        for &sym in &prod.body {
            match sym {
                Symbol::Terminal(Terminal::Unknown) => {
                    return Err(GrammarError::UnknownInBody { production: i });
                }
                Symbol::NonTerminal(NonTerminal::Start) => {
                    return Err(GrammarError::StartInBody { production: i });
                }
                Symbol::NonTerminal(n) if !productions.iter().any(|p| p.head == n) => {
                    return Err(GrammarError::Undefined {
                        production: i,
                        non_terminal: n,
                    });
                }
                _ => {}
            }
        }
    }
    match start {
        Some(_) => Ok(()),
        None => Err(GrammarError::MissingStart),
    }
}

/// Computes FIRST sets for all symbols, indexed by [`Symbol::index`].
pub(crate) fn first_sets(productions: &[Production]) -> Vec<BTreeSet<Terminal>> {
    let mut first = vec![BTreeSet::new(); Symbol::COUNT];
    for t in Terminal::ALL {
        first[t.index()].insert(t);
    }
    while first_pass(productions, &mut first) {}
    first
}

/// One sweep of FIRST(head) ⊇ FIRST(body[0]) over every production.
/// Returns `true` if any set grew.
pub(crate) fn first_pass(productions: &[Production], first: &mut [BTreeSet<Terminal>]) -> bool {
    let mut changed = false;
    for prod in productions {
        let Some(&leading) = prod.body.first() else {
            continue;
        };
        let lhs = Symbol::from(prod.head).index();
        // Clone FIRST(leading) to avoid simultaneous borrow
        let first_sym = first[leading.index()].clone();
        for t in first_sym {
            if first[lhs].insert(t) {
                changed = true;
            }
        }
    }
    changed
}

/// Computes FOLLOW sets for all symbols, indexed by [`Symbol::index`].
pub(crate) fn follow_sets(
    productions: &[Production],
    first: &[BTreeSet<Terminal>],
) -> Vec<BTreeSet<Terminal>> {
    let mut follow = vec![BTreeSet::new(); Symbol::COUNT];
    follow[Symbol::from(NonTerminal::Start).index()].insert(Terminal::EndOfFile);
    while follow_pass(productions, first, &mut follow) {}
    follow
}

/// One sweep of the FOLLOW rules over every nonterminal occurrence in every
/// body. Returns `true` if any set grew.
pub(crate) fn follow_pass(
    productions: &[Production],
    first: &[BTreeSet<Terminal>],
    follow: &mut [BTreeSet<Terminal>],
) -> bool {
    let mut changed = false;
    for prod in productions {
        let lhs = Symbol::from(prod.head).index();
        for (i, &sym) in prod.body.iter().enumerate() {
            if sym.is_terminal() {
                continue;
            }
            // FIRST of a terminal is the terminal itself
            let incoming = match prod.body.get(i + 1) {
                Some(next) => first[next.index()].clone(),
                None => follow[lhs].clone(),
            };
            for t in incoming {
                if follow[sym.index()].insert(t) {
                    changed = true;
                }
            }
        }
    }
    changed
}
