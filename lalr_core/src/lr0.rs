// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

// §4.4 LR(0) builder: item closure, GOTO/ACTION construction and raw
// conflict detection. No lookahead is consulted here — reductions are
// proposed on every terminal, exactly per spec.md §4.4; §4.5-§4.7 then
// narrow them down.

use crate::grammar::Grammar;
use crate::symbol::{Nonterminal, ProductionRuleId, Symbol, Terminal};
use std::collections::{BTreeMap, BTreeSet};

pub type StateId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LrItem {
    pub production: ProductionRuleId,
    pub dot: usize,
}

impl LrItem {
    fn next_symbol<'g>(&self, grammar: &'g Grammar) -> Option<&'g Symbol> {
        grammar.production(self.production).rhs.get(self.dot)
    }

    fn is_reducible(&self, grammar: &Grammar) -> bool {
        self.dot >= grammar.production(self.production).rhs.len()
    }

    fn shifted(&self) -> Self {
        Self {
            production: self.production,
            dot: self.dot + 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LrParserState {
    pub id: StateId,
    /// Closure-closed set of items (spec.md §3 `LrParserState`).
    pub items: BTreeSet<LrItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LrAction {
    Shift(StateId),
    Reduce(ProductionRuleId),
    Accept,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    ShiftReduce,
    ReduceReduce,
}

#[derive(Debug, Clone)]
pub struct Conflict {
    pub state: StateId,
    pub terminal: Terminal,
    pub kind: ConflictKind,
    pub actions: BTreeSet<LrAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LrParserTable {
    pub states: Vec<LrParserState>,
    pub action: BTreeMap<(StateId, Terminal), BTreeSet<LrAction>>,
    pub goto: BTreeMap<(StateId, Nonterminal), StateId>,
    /// The automaton's structural terminal-transition function, recorded
    /// once at build time and never touched by precedence/SLR/LALR
    /// restriction. The LALR(1) upgrade (§4.7) traces productions through
    /// this map rather than through `action`, since `action` cells can
    /// lose their `Shift` entry to a precedence resolution while the
    /// underlying automaton transition still exists.
    pub shift: BTreeMap<(StateId, Terminal), StateId>,
}

impl LrParserTable {
    pub fn conflicts(&self) -> Vec<Conflict> {
        let mut out = Vec::new();
        for ((state, terminal), actions) in &self.action {
            if actions.len() > 1 {
                let kind = if actions
                    .iter()
                    .any(|a| matches!(a, LrAction::Shift(_) | LrAction::Accept))
                {
                    ConflictKind::ShiftReduce
                } else {
                    ConflictKind::ReduceReduce
                };
                out.push(Conflict {
                    state: *state,
                    terminal: terminal.clone(),
                    kind,
                    actions: actions.clone(),
                });
            }
        }
        out
    }
}

fn closure(grammar: &Grammar, mut items: BTreeSet<LrItem>) -> BTreeSet<LrItem> {
    let mut changed = true;
    while changed {
        changed = false;
        let snapshot: Vec<LrItem> = items.iter().copied().collect();
        for item in snapshot {
            if let Some(Symbol::Nonterminal(prospective_lhs)) = item.next_symbol(grammar) {
                for production in grammar.productions_for(prospective_lhs) {
                    let new_item = LrItem {
                        production: production.id,
                        dot: 0,
                    };
                    if items.insert(new_item) {
                        changed = true;
                    }
                }
            }
        }
    }
    items
}

fn goto_kernel(grammar: &Grammar, items: &BTreeSet<LrItem>, symbol: &Symbol) -> BTreeSet<LrItem> {
    items
        .iter()
        .filter(|item| item.next_symbol(grammar) == Some(symbol))
        .map(|item| item.shifted())
        .collect()
}

/// Builds the raw LR(0) ACTION/GOTO table over the augmented grammar
/// (spec.md §4.4). States are discovered breadth-first so numbering is
/// deterministic (spec.md §8 determinism property).
pub fn build(grammar: &Grammar) -> LrParserTable {
    let mut states: Vec<LrParserState> = Vec::new();
    let mut index_of: BTreeMap<BTreeSet<LrItem>, StateId> = BTreeMap::new();
    let mut action: BTreeMap<(StateId, Terminal), BTreeSet<LrAction>> = BTreeMap::new();
    let mut goto: BTreeMap<(StateId, Nonterminal), StateId> = BTreeMap::new();
    let mut shift: BTreeMap<(StateId, Terminal), StateId> = BTreeMap::new();

    let mut initial_kernel = BTreeSet::new();
    for &start_id in grammar.start_production_ids() {
        initial_kernel.insert(LrItem {
            production: start_id,
            dot: 0,
        });
    }
    let initial = closure(grammar, initial_kernel);
    index_of.insert(initial.clone(), 0);
    states.push(LrParserState {
        id: 0,
        items: initial,
    });

    let mut frontier = 0usize;
    while frontier < states.len() {
        let state_id = states[frontier].id;
        let items = states[frontier].items.clone();
        frontier += 1;

        let mut next_symbols: BTreeSet<Symbol> = BTreeSet::new();
        for item in &items {
            if let Some(symbol) = item.next_symbol(grammar) {
                next_symbols.insert(symbol.clone());
            }
        }

        for symbol in &next_symbols {
            let kernel = goto_kernel(grammar, &items, symbol);
            let target_items = closure(grammar, kernel);
            let target_id = *index_of.entry(target_items.clone()).or_insert_with(|| {
                let id = states.len() as StateId;
                states.push(LrParserState {
                    id,
                    items: target_items.clone(),
                });
                id
            });

            match symbol {
                Symbol::Terminal(terminal) => {
                    shift.insert((state_id, terminal.clone()), target_id);
                    let production_lhs_is_start_accept = items.iter().any(|item| {
                        item.next_symbol(grammar) == Some(symbol)
                            && grammar.production(item.production).lhs.is_start()
                            && terminal.is_end_of_file()
                    });
                    let entry = action.entry((state_id, terminal.clone())).or_default();
                    if production_lhs_is_start_accept {
                        entry.insert(LrAction::Accept);
                    } else {
                        entry.insert(LrAction::Shift(target_id));
                    }
                }
                Symbol::Nonterminal(nonterminal) => {
                    goto.insert((state_id, nonterminal.clone()), target_id);
                }
            }
        }

        for item in &items {
            if item.is_reducible(grammar) {
                let production = grammar.production(item.production);
                if production.lhs.is_start() {
                    continue;
                }
                for terminal in grammar.public_terminals() {
                    action
                        .entry((state_id, terminal.clone()))
                        .or_default()
                        .insert(LrAction::Reduce(item.production));
                }
            }
        }
    }

    LrParserTable {
        states,
        action,
        goto,
        shift,
    }
}
