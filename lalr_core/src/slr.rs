// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

// §4.6 SLR(1) upgrade: NULLABLE/FIRST/FOLLOW fixpoints over the augmented
// grammar, then restriction of LR(0) reductions by FOLLOW.

use crate::grammar::Grammar;
use crate::lr0::{LrAction, LrParserTable};
use crate::symbol::{Nonterminal, Symbol, Terminal};
use std::collections::{BTreeMap, BTreeSet};

pub fn first_sets(grammar: &Grammar, nullable: &BTreeSet<Nonterminal>) -> BTreeMap<Nonterminal, BTreeSet<Terminal>> {
    let mut first: BTreeMap<Nonterminal, BTreeSet<Terminal>> = grammar
        .nonterminals()
        .iter()
        .map(|n| (n.clone(), BTreeSet::new()))
        .collect();

    let mut changed = true;
    while changed {
        changed = false;
        for production in grammar.productions() {
            let mut addition = BTreeSet::new();
            for symbol in &production.rhs {
                match symbol {
                    Symbol::Terminal(t) => {
                        addition.insert(t.clone());
                        break;
                    }
                    Symbol::Nonterminal(n) => {
                        if let Some(f) = first.get(n) {
                            addition.extend(f.iter().cloned());
                        }
                        if !nullable.contains(n) {
                            break;
                        }
                    }
                }
            }
            let entry = first.get_mut(&production.lhs).expect("declared nonterminal");
            let before = entry.len();
            entry.extend(addition);
            if entry.len() != before {
                changed = true;
            }
        }
    }
    first
}

/// FIRST of a symbol sequence, given precomputed per-nonterminal FIRST
/// sets and the NULLABLE set.
pub fn first_of_sequence(
    first: &BTreeMap<Nonterminal, BTreeSet<Terminal>>,
    nullable: &BTreeSet<Nonterminal>,
    seq: &[Symbol],
) -> BTreeSet<Terminal> {
    let mut out = BTreeSet::new();
    for symbol in seq {
        match symbol {
            Symbol::Terminal(t) => {
                out.insert(t.clone());
                return out;
            }
            Symbol::Nonterminal(n) => {
                if let Some(f) = first.get(n) {
                    out.extend(f.iter().cloned());
                }
                if !nullable.contains(n) {
                    return out;
                }
            }
        }
    }
    out
}

pub fn follow_sets(
    grammar: &Grammar,
    first: &BTreeMap<Nonterminal, BTreeSet<Terminal>>,
    nullable: &BTreeSet<Nonterminal>,
) -> BTreeMap<Nonterminal, BTreeSet<Terminal>> {
    let mut follow: BTreeMap<Nonterminal, BTreeSet<Terminal>> = grammar
        .nonterminals()
        .iter()
        .map(|n| (n.clone(), BTreeSet::new()))
        .collect();
    follow
        .get_mut(&Nonterminal::Start)
        .expect("Start is always declared")
        .insert(Terminal::EndOfFile);

    let mut changed = true;
    while changed {
        changed = false;
        for production in grammar.productions() {
            for (i, symbol) in production.rhs.iter().enumerate() {
                let b = match symbol {
                    Symbol::Nonterminal(n) => n,
                    Symbol::Terminal(_) => continue,
                };
                let rest = &production.rhs[i + 1..];
                let mut addition = first_of_sequence(first, nullable, rest);
                if Grammar::is_sequence_nullable(nullable, rest) {
                    if let Some(lhs_follow) = follow.get(&production.lhs) {
                        addition.extend(lhs_follow.iter().cloned());
                    }
                }
                let entry = follow.get_mut(b).expect("declared nonterminal");
                let before = entry.len();
                entry.extend(addition);
                if entry.len() != before {
                    changed = true;
                }
            }
        }
    }
    follow
}

/// Restricts each `Reduce(r)` in `table` to the terminals in
/// `FOLLOW(head(r))` (spec.md §4.6). A cell left with zero actions is
/// removed entirely.
pub fn restrict_to_slr(
    grammar: &Grammar,
    follow: &BTreeMap<Nonterminal, BTreeSet<Terminal>>,
    table: &mut LrParserTable,
) {
    let keys: Vec<_> = table.action.keys().cloned().collect();
    for key in keys {
        let (_, terminal) = key.clone();
        let mut actions = table.action.get(&key).cloned().unwrap_or_default();
        actions.retain(|a| match a {
            LrAction::Reduce(r) => {
                let production = grammar.production(*r);
                follow
                    .get(&production.lhs)
                    .map_or(false, |f| f.contains(&terminal))
            }
            _ => true,
        });
        if actions.is_empty() {
            table.action.remove(&key);
        } else {
            table.action.insert(key, actions);
        }
    }
}
