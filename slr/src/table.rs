// This module defines LR(0) item machinery, the canonical collection of item
// sets, and SLR(1) ACTION/GOTO table construction.

use crate::error::ConstructionError;
use crate::grammar::{Grammar, NonTerminal, Symbol, Terminal};
use std::collections::{BTreeSet, VecDeque};
use std::fmt;

/// Represents an LR(0) item consisting of a production index and a dot position.
///
/// Each item corresponds to a production with a marker (the *dot*) indicating
/// how much of the body has been recognized during parsing. For example,
/// `<sum> -> <sum> • '+' <mul>` is production 1 with the dot at position 1.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Item {
    /// The index of the production in the grammar.
    pub prod: usize,

    /// The position of the dot within the production's body, `0..=len`.
    pub dot: usize,
}

impl Item {
    #[inline]
    pub const fn new(prod: usize, dot: usize) -> Self {
        Self { prod, dot }
    }

    /// Returns the symbol right after the dot, or `None` for a complete item.
    pub fn symbol_at_dot(&self, grammar: &Grammar) -> Option<Symbol> {
        grammar
            .production(self.prod)
            .and_then(|p| p.body.get(self.dot))
            .copied()
    }

    /// Returns `true` if the dot is past the last body symbol.
    pub fn is_complete(&self, grammar: &Grammar) -> bool {
        grammar
            .production(self.prod)
            .is_some_and(|p| self.dot == p.len())
    }

    #[inline]
    fn advance(&self) -> Self {
        Self::new(self.prod, self.dot + 1)
    }
}

/// A set of LR(0) items. Two sets are the same state iff they hold the same items.
pub type ItemSet = BTreeSet<Item>;

/// Computes the LR(0) *closure* of a set of items.
///
/// For every item whose dot stands before a nonterminal, adds the zero-dot
/// item of each production headed by that nonterminal, repeating until no
/// new items appear.
pub fn closure(items: &ItemSet, grammar: &Grammar) -> ItemSet {
    let mut result = items.clone();
    let mut work: Vec<Item> = items.iter().copied().collect();
    while let Some(item) = work.pop() {
        if let Some(Symbol::NonTerminal(head)) = item.symbol_at_dot(grammar) {
            for (prod, _) in grammar.productions_of(head) {
                let new_item = Item::new(prod, 0);
                if result.insert(new_item) {
                    work.push(new_item);
                }
            }
        }
    }
    result
}

/// Computes the LR(0) *goto* function for a given item set and grammar symbol.
///
/// Advances the dot of every item expecting `sym`, then closes the result.
/// An empty set means there is no transition on `sym`.
pub fn goto(items: &ItemSet, sym: Symbol, grammar: &Grammar) -> ItemSet {
    let moved: ItemSet = items
        .iter()
        .filter(|item| item.symbol_at_dot(grammar) == Some(sym))
        .map(Item::advance)
        .collect();
    if moved.is_empty() {
        return moved;
    }
    closure(&moved, grammar)
}

/// Constructs the canonical collection of LR(0) item sets.
///
/// Breadth-first from the closure of the augmenting item, trying the symbols
/// of [`Symbol::ALL`] in order. The position of a set in the returned vector
/// is its state number; state 0 is the initial state.
pub fn canonical_collection(grammar: &Grammar) -> Vec<ItemSet> {
    let start = ItemSet::from([Item::new(grammar.start_production(), 0)]);
    let mut states = vec![closure(&start, grammar)];
    let mut queue = VecDeque::from([0usize]);
    while let Some(current) = queue.pop_front() {
        for sym in Symbol::ALL {
            let next = goto(&states[current], sym, grammar);
            if !next.is_empty() && find_state(&states, &next).is_none() {
                queue.push_back(states.len());
                states.push(next);
            }
        }
    }
    states
}

/// Finds the index of a given item set within the discovered states.
fn find_state(states: &[ItemSet], target: &ItemSet) -> Option<usize> {
    states.iter().position(|st| st == target)
}

/// An ACTION table entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ParseAction {
    /// No entry: the lookahead is not valid in this state.
    #[default]
    Error,
    Accept,
    /// Push the lookahead and go to the given state.
    Shift(usize),
    /// Reduce by the given production.
    Reduce(usize),
}

impl fmt::Display for ParseAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAction::Error => f.write_str("err"),
            ParseAction::Accept => f.write_str("acc"),
            ParseAction::Shift(state) => write!(f, "s{}", state),
            ParseAction::Reduce(prod) => write!(f, "r{}", prod),
        }
    }
}

/// The LR(0) automaton of a grammar with its SLR(1) ACTION and GOTO tables.
///
/// Rows are indexed by state; ACTION columns by [`Terminal::index`], GOTO
/// columns by [`NonTerminal::index`]. Immutable once built.
#[derive(Clone, Debug)]
pub struct ParsingTable {
    states: Vec<ItemSet>,
    action: Vec<Vec<ParseAction>>,
    goto: Vec<Vec<Option<usize>>>,
}

impl ParsingTable {
    /// Builds the automaton and tables for `grammar`.
    ///
    /// - an incomplete item with a terminal at the dot shifts to the goto state;
    /// - the complete augmenting item accepts on END_OF_FILE;
    /// - any other complete item reduces on every terminal of FOLLOW(head);
    /// - a nonterminal transition becomes a GOTO entry.
    ///
    /// # Errors
    /// Returns [`ConstructionError::Conflict`] if two different actions land
    /// in the same cell.
    pub fn build(grammar: &Grammar) -> Result<Self, ConstructionError> {
        let states = canonical_collection(grammar);
        let n_states = states.len();
        let mut table = Self {
            states: Vec::new(),
            action: vec![vec![ParseAction::Error; Terminal::COUNT]; n_states],
            goto: vec![vec![None; NonTerminal::COUNT]; n_states],
        };

        for (state, items) in states.iter().enumerate() {
            for item in items {
                match item.symbol_at_dot(grammar) {
                    Some(Symbol::Terminal(t)) => {
                        let next = goto(items, t.into(), grammar);
                        if let Some(target) = find_state(&states, &next) {
                            table.set_action(state, t, ParseAction::Shift(target))?;
                        }
                    }
                    Some(Symbol::NonTerminal(_)) => {}
                    None => {
                        let Some(prod) = grammar.production(item.prod) else {
                            continue;
                        };
                        if prod.head == NonTerminal::Start && item.dot == 1 {
                            table.set_action(state, Terminal::EndOfFile, ParseAction::Accept)?;
                        } else {
                            for &t in grammar.follow(prod.head) {
                                table.set_action(state, t, ParseAction::Reduce(item.prod))?;
                            }
                        }
                    }
                }
            }

            for n in NonTerminal::ALL {
                let next = goto(items, n.into(), grammar);
                if next.is_empty() {
                    continue;
                }
                if let Some(target) = find_state(&states, &next) {
                    table.goto[state][n.index()] = Some(target);
                }
            }
        }

        table.states = states;
        log::debug!("parsing table: {} states", n_states);
        Ok(table)
    }

    fn set_action(
        &mut self,
        state: usize,
        terminal: Terminal,
        action: ParseAction,
    ) -> Result<(), ConstructionError> {
        let cell = &mut self.action[state][terminal.index()];
        match *cell {
            ParseAction::Error => {
                *cell = action;
                Ok(())
            }
            existing if existing == action => Ok(()),
            existing => Err(ConstructionError::Conflict {
                state,
                terminal,
                existing,
                proposed: action,
            }),
        }
    }

    /// Returns the ACTION entry, or [`ParseAction::Error`] for an unknown
    /// state or an empty cell.
    pub fn action(&self, state: usize, terminal: Terminal) -> ParseAction {
        self.action
            .get(state)
            .and_then(|row| row.get(terminal.index()))
            .copied()
            .unwrap_or_default()
    }

    /// Returns the GOTO entry, or `None` for an unknown state or an empty cell.
    pub fn goto_state(&self, state: usize, non_terminal: NonTerminal) -> Option<usize> {
        self.goto
            .get(state)
            .and_then(|row| row.get(non_terminal.index()))
            .copied()
            .flatten()
    }

    #[inline]
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// The canonical collection, in state order.
    #[inline]
    pub fn states(&self) -> &[ItemSet] {
        &self.states
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Production;
    use NonTerminal::*;
    use Terminal::*;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn table() -> (Grammar, ParsingTable) {
        init_logger();
        let grammar = Grammar::new();
        let table = ParsingTable::build(&grammar).unwrap();
        (grammar, table)
    }

    #[test]
    fn initial_state_holds_every_zero_dot_item() {
        let (grammar, table) = table();
        let expected: ItemSet = (0..grammar.production_count())
            .map(|p| Item::new(p, 0))
            .collect();
        assert_eq!(table.states()[0], expected);
    }

    #[test]
    fn closure_of_complete_item_is_itself() {
        let grammar = Grammar::new();
        let items = ItemSet::from([Item::new(8, 1)]);
        assert_eq!(closure(&items, &grammar), items);
    }

    #[test]
    fn goto_without_transition_is_empty() {
        let grammar = Grammar::new();
        assert!(goto(&ItemSet::new(), Number.into(), &grammar).is_empty());
        let items = ItemSet::from([Item::new(8, 0)]);
        assert!(goto(&items, Plus.into(), &grammar).is_empty());
        assert_eq!(
            goto(&items, Number.into(), &grammar),
            ItemSet::from([Item::new(8, 1)])
        );
    }

    #[test]
    fn collection_size_and_reproducibility() {
        let grammar = Grammar::new();
        let a = canonical_collection(&grammar);
        let b = canonical_collection(&Grammar::new());
        assert_eq!(a.len(), 16);
        assert_eq!(a, b);

        let (_, t1) = table();
        let (_, t2) = table();
        assert_eq!(t1.states(), t2.states());
        assert_eq!(t1.state_count(), 16);
    }

    #[test]
    fn states_are_distinct() {
        let (_, table) = table();
        let unique: BTreeSet<&ItemSet> = table.states().iter().collect();
        assert_eq!(unique.len(), table.state_count());
    }

    #[test]
    fn shift_reduce_accept_and_goto_entries() {
        let (grammar, table) = table();

        let ParseAction::Shift(num) = table.action(0, Number) else {
            panic!("expected shift on NUM in state 0");
        };
        assert_eq!(table.states()[num], ItemSet::from([Item::new(8, 1)]));
        assert!(matches!(table.action(0, LBracket), ParseAction::Shift(_)));
        assert_eq!(table.action(0, Plus), ParseAction::Error);
        assert_eq!(table.action(0, Id), ParseAction::Error);

        for &t in grammar.follow(Brackets) {
            assert_eq!(table.action(num, t), ParseAction::Reduce(8));
        }
        assert_eq!(table.action(num, Number), ParseAction::Error);

        let sum = table.goto_state(0, Sum).unwrap();
        assert_eq!(table.action(sum, EndOfFile), ParseAction::Accept);
        assert!(matches!(table.action(sum, Plus), ParseAction::Shift(_)));
        assert!(matches!(table.action(sum, Minus), ParseAction::Shift(_)));
        assert_eq!(table.goto_state(0, Start), None);
        assert!(table.goto_state(0, MulExpr).is_some());
        assert!(table.goto_state(0, Brackets).is_some());
    }

    #[test]
    fn accept_appears_exactly_once() {
        let (_, table) = table();
        let accepts = (0..table.state_count())
            .flat_map(|s| Terminal::ALL.into_iter().map(move |t| (s, t)))
            .filter(|&(s, t)| table.action(s, t) == ParseAction::Accept)
            .count();
        assert_eq!(accepts, 1);
    }

    #[test]
    fn out_of_range_queries() {
        let (_, table) = table();
        assert_eq!(table.action(999, Number), ParseAction::Error);
        assert_eq!(table.goto_state(999, Sum), None);
    }

    #[test]
    fn ambiguous_grammar_is_rejected() {
        init_logger();
        let n = Symbol::NonTerminal;
        let t = Symbol::Terminal;
        // <sum> -> <sum> '+' <sum> is ambiguous: after `<sum> + <sum>` both
        // shifting '+' and reducing are possible.
        let grammar = Grammar::with_productions(vec![
            Production::new(Start, vec![n(Sum)]),
            Production::new(Sum, vec![n(Sum), t(Plus), n(Sum)]),
            Production::new(Sum, vec![t(Number)]),
        ])
        .unwrap();
        let err = ParsingTable::build(&grammar).unwrap_err();
        assert!(
            matches!(
                err,
                ConstructionError::Conflict {
                    terminal: Plus,
                    existing: ParseAction::Shift(_),
                    proposed: ParseAction::Reduce(1),
                    ..
                }
            ),
            "{err}"
        );
    }

    #[test]
    fn reduce_reduce_conflict_is_rejected() {
        let n = Symbol::NonTerminal;
        let t = Symbol::Terminal;
        let grammar = Grammar::with_productions(vec![
            Production::new(Start, vec![n(Sum)]),
            Production::new(Sum, vec![n(MulExpr)]),
            Production::new(Sum, vec![t(Number)]),
            Production::new(MulExpr, vec![t(Number)]),
        ])
        .unwrap();
        let err = ParsingTable::build(&grammar).unwrap_err();
        assert!(matches!(
            err,
            ConstructionError::Conflict {
                terminal: EndOfFile,
                existing: ParseAction::Reduce(2),
                proposed: ParseAction::Reduce(3),
                ..
            }
        ));
    }
}
