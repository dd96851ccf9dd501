// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

// §4.7 LALR(1) upgrade via the DeRemer-Pennello digraph algorithm.
//
// This replaces lookahead propagation through item-set closure and
// state-merging-by-kernel with the staged LR(0) -> SLR(1) -> LALR(1)
// upgrade: Read/Includes/Lookback/Follow computed by the digraph
// algorithm (spec.md §4.7, §9 Open Questions).

use crate::diagnostics::Diagnostic;
use crate::grammar::Grammar;
use crate::lr0::{LrAction, LrParserTable, StateId};
use crate::relation::{digraph, Graph};
use crate::symbol::{Nonterminal, ProductionRuleId, Symbol, Terminal};
use std::collections::{BTreeMap, BTreeSet};

type Transition = (StateId, Nonterminal);

pub struct LalrUpgrade {
    /// `LA(q, r)`: the lookahead set for reducing production `r` while in
    /// state `q`, keyed by `(stateId, ProductionRuleId)` per the lookback
    /// relation of spec.md §4.7.
    pub la: BTreeMap<(StateId, ProductionRuleId), BTreeSet<Terminal>>,
}

fn nonterminal_transitions(table: &LrParserTable) -> Vec<Transition> {
    table.goto.keys().cloned().collect()
}

fn direct_read(
    grammar: &Grammar,
    table: &LrParserTable,
) -> impl Fn(&Transition) -> BTreeSet<Terminal> + '_ {
    move |(s, a): &Transition| {
        let target = *table
            .goto
            .get(&(*s, a.clone()))
            .expect("transition in T must have a GOTO target");
        grammar
            .public_terminals()
            .filter(|terminal| {
                table
                    .action
                    .get(&(target, (*terminal).clone()))
                    .map_or(false, |acts| {
                        acts.iter()
                            .any(|act| matches!(act, LrAction::Shift(_) | LrAction::Accept))
                    })
            })
            .cloned()
            .collect()
    }
}

fn reads_graph(grammar: &Grammar, table: &LrParserTable, nullable: &BTreeSet<Nonterminal>, transitions: &[Transition]) -> Graph<Transition> {
    let mut graph = Graph::new();
    for t in transitions {
        graph.add_vertex(t.clone());
    }
    for (s, a) in transitions {
        let target = table.goto[&(*s, a.clone())];
        for b in grammar.nonterminals() {
            if nullable.contains(b) && table.goto.contains_key(&(target, b.clone())) {
                graph.add_edge((*s, a.clone()), (target, b.clone()));
            }
        }
    }
    graph
}

/// Traces a production's rhs from state `from`, recording an `includes`
/// edge at each nullable-tailed nonterminal occurrence and returning the
/// final state reached (the `lookback` partner for this `(from, B)`
/// transition and production).
fn trace_production(
    table: &LrParserTable,
    includes: &mut Graph<Transition>,
    from: StateId,
    head: &Nonterminal,
    rhs: &[Symbol],
    nullable: &BTreeSet<Nonterminal>,
) -> StateId {
    let mut q = from;
    for (k, symbol) in rhs.iter().enumerate() {
        match symbol {
            Symbol::Nonterminal(a) => {
                let suffix = &rhs[k + 1..];
                if Grammar::is_sequence_nullable(nullable, suffix) {
                    includes.add_edge((q, a.clone()), (from, head.clone()));
                }
                q = *table
                    .goto
                    .get(&(q, a.clone()))
                    .expect("goto must exist while tracing a reachable production");
            }
            Symbol::Terminal(t) => {
                q = *table
                    .shift
                    .get(&(q, t.clone()))
                    .expect("shift must exist while tracing a reachable production");
            }
        }
    }
    q
}

pub fn upgrade(grammar: &Grammar, table: &LrParserTable) -> Result<LalrUpgrade, Diagnostic> {
    let nullable = grammar.nullable_set();
    let transitions = nonterminal_transitions(table);

    let reads = reads_graph(grammar, table, &nullable, &transitions);
    let dr = direct_read(grammar, table);
    let (read, read_sccs) = digraph(&transitions, &reads, dr);

    let mut not_lrk: Vec<ProductionRuleId> = Vec::new();
    for scc in &read_sccs {
        if scc.iter().any(|t| !read.get(t).map_or(true, |s| s.is_empty())) {
            for (s, a) in scc {
                for production in grammar.productions_for(a) {
                    if table.goto.get(&(*s, a.clone())).is_some() {
                        not_lrk.push(production.id);
                    }
                }
            }
        }
    }

    let mut includes = Graph::new();
    for t in &transitions {
        includes.add_vertex(t.clone());
    }
    let mut lookback: BTreeMap<(StateId, ProductionRuleId), Vec<Transition>> = BTreeMap::new();
    for (p_prime, b) in &transitions {
        for production in grammar.productions_for(b) {
            let q = trace_production(
                table,
                &mut includes,
                *p_prime,
                b,
                &production.rhs,
                &nullable,
            );
            lookback
                .entry((q, production.id))
                .or_default()
                .push((*p_prime, b.clone()));
        }
    }

    // The "not LR(k) for any k" condition (spec.md §4.7) is defined solely
    // in terms of a non-trivial cycle in the **reads** relation carrying a
    // non-empty Read set, checked above. A non-trivial SCC in the
    // **includes** graph is ordinary for any recursive grammar (e.g. two
    // mutually left-recursive alternatives of the same nonterminal) and is
    // not itself an error; `digraph` still computes the correct Follow
    // values for every vertex in such a cycle.
    let (follow, _includes_sccs) = digraph(&transitions, &includes, |t| {
        read.get(t).cloned().unwrap_or_default()
    });

    if !not_lrk.is_empty() {
        not_lrk.sort_unstable();
        not_lrk.dedup();
        return Err(Diagnostic::NotLrK(not_lrk));
    }

    let mut la: BTreeMap<(StateId, ProductionRuleId), BTreeSet<Terminal>> = BTreeMap::new();
    for (key, partners) in &lookback {
        let mut set = BTreeSet::new();
        for partner in partners {
            if let Some(f) = follow.get(partner) {
                set.extend(f.iter().cloned());
            }
        }
        la.insert(*key, set);
    }

    Ok(LalrUpgrade { la })
}

/// Restricts each `Reduce(r)` on `(s, a)` to `a ∈ LA(s, r)` (spec.md
/// §4.7). Productions with no recorded `LA` entry (unreachable
/// productions) lose all their reduce actions.
pub fn restrict_to_lalr(upgrade: &LalrUpgrade, table: &mut LrParserTable) {
    let keys: Vec<_> = table.action.keys().cloned().collect();
    for key in keys {
        let (state, terminal) = key.clone();
        let mut actions = table.action.get(&key).cloned().unwrap_or_default();
        actions.retain(|a| match a {
            LrAction::Reduce(r) => upgrade
                .la
                .get(&(state, *r))
                .map_or(false, |set| set.contains(&terminal)),
            _ => true,
        });
        if actions.is_empty() {
            table.action.remove(&key);
        } else {
            table.action.insert(key, actions);
        }
    }
}
