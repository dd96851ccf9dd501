// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

// §4.3 Augmented grammar and rule identity, plus the NULLABLE fixpoint
// that both the SLR(1) upgrade (§4.6) and the LALR(1) digraph (§4.7, the
// "reads" relation) depend on.

use crate::diagnostics::Diagnostic;
use crate::precompile::PrecompilationState;
use crate::relation::Graph;
use crate::symbol::{Associativity, Nonterminal, PrecedenceLevel, ProductionRuleId, Symbol, Terminal};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Debug, Clone)]
pub struct Production {
    pub id: ProductionRuleId,
    pub lhs: Nonterminal,
    pub rhs: Vec<Symbol>,
    pub prec_override: Option<Terminal>,
    pub action: String,
}

impl Production {
    pub fn is_epsilon(&self) -> bool {
        self.rhs.is_empty()
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ->", self.lhs)?;
        if self.rhs.is_empty() {
            write!(f, " <empty>")?;
        } else {
            for symbol in &self.rhs {
                write!(f, " {}", symbol)?;
            }
        }
        Ok(())
    }
}

/// The grammar augmented per spec.md §4.3: every terminal wrapped as
/// `Terminal::Named` plus `EndOfFile`; every nonterminal wrapped as
/// `Nonterminal::Named` plus `Start`; one `Start -> s EndOfFile` production
/// per declared start nonterminal `s`.
pub struct Grammar {
    /// All declared terminals in first-declaration order, *including*
    /// dummy (`%prec`-only) terminals and `EndOfFile`.
    terminals: Vec<Terminal>,
    dummy_terminals: BTreeSet<Terminal>,
    /// All declared nonterminals in first-declaration order, including
    /// `Start`.
    nonterminals: Vec<Nonterminal>,
    /// Dense, stable `ProductionRuleId -> Production` table; `id` always
    /// equals the index.
    productions: Vec<Production>,
    /// The augmented `Start` productions' indices, one per user start
    /// nonterminal, in declaration order.
    start_production_ids: Vec<ProductionRuleId>,
    terminal_precedence: BTreeMap<Terminal, (Associativity, PrecedenceLevel)>,
}

impl Grammar {
    pub fn augment(state: &PrecompilationState) -> Self {
        let mut terminals: Vec<Terminal> = state
            .terminal_order
            .iter()
            .map(|n| Terminal::named(n))
            .collect();
        terminals.push(Terminal::EndOfFile);

        let dummy_terminals = state
            .dummy_terminals
            .iter()
            .map(|n| Terminal::named(n))
            .collect();

        let mut nonterminals: Vec<Nonterminal> = state
            .nonterminal_order
            .iter()
            .map(|n| Nonterminal::named(n))
            .collect();
        nonterminals.push(Nonterminal::Start);

        let mut productions = Vec::with_capacity(state.productions.len() + state.starts.len());
        let mut next_id: ProductionRuleId = 0;
        let mut start_production_ids = Vec::with_capacity(state.starts.len());
        for start in &state.starts {
            let id = next_id;
            next_id += 1;
            start_production_ids.push(id);
            productions.push(Production {
                id,
                lhs: Nonterminal::Start,
                rhs: vec![
                    Symbol::Nonterminal(Nonterminal::named(start)),
                    Symbol::Terminal(Terminal::EndOfFile),
                ],
                prec_override: None,
                action: String::new(),
            });
        }
        for production in &state.productions {
            let id = next_id;
            next_id += 1;
            let rhs = production
                .symbols
                .iter()
                .map(|s| {
                    if state.terminal_types.contains_key(s) {
                        Symbol::Terminal(Terminal::named(s))
                    } else {
                        Symbol::Nonterminal(Nonterminal::named(s))
                    }
                })
                .collect();
            productions.push(Production {
                id,
                lhs: Nonterminal::named(&production.nonterminal),
                rhs,
                prec_override: production.prec_override.as_deref().map(Terminal::named),
                action: production.action.clone(),
            });
        }

        let terminal_precedence = state
            .terminal_precedence
            .iter()
            .map(|(name, (assoc, level))| (Terminal::named(name), (*assoc, *level)))
            .collect();

        Self {
            terminals,
            dummy_terminals,
            nonterminals,
            productions,
            start_production_ids,
            terminal_precedence,
        }
    }

    pub fn terminals(&self) -> &[Terminal] {
        &self.terminals
    }

    /// The terminal alphabet exposed to backends: dummy terminals
    /// (`%prec`-only) are filtered out (spec.md §4.5).
    pub fn public_terminals(&self) -> impl Iterator<Item = &Terminal> {
        self.terminals
            .iter()
            .filter(move |t| !self.dummy_terminals.contains(t))
    }

    pub fn is_dummy_terminal(&self, t: &Terminal) -> bool {
        self.dummy_terminals.contains(t)
    }

    pub fn nonterminals(&self) -> &[Nonterminal] {
        &self.nonterminals
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn production(&self, id: ProductionRuleId) -> &Production {
        &self.productions[id as usize]
    }

    pub fn start_production_ids(&self) -> &[ProductionRuleId] {
        &self.start_production_ids
    }

    pub fn productions_for<'a>(&'a self, lhs: &'a Nonterminal) -> impl Iterator<Item = &'a Production> {
        self.productions.iter().filter(move |p| &p.lhs == lhs)
    }

    pub fn terminal_precedence(&self, t: &Terminal) -> Option<(Associativity, PrecedenceLevel)> {
        self.terminal_precedence.get(t).copied()
    }

    /// Effective precedence of a production, per spec.md §4.5 step 1:
    /// `%prec` override if present, else the rightmost terminal in the
    /// rhs, else none.
    pub fn rule_precedence(&self, production: &Production) -> Option<(Associativity, PrecedenceLevel)> {
        if let Some(t) = &production.prec_override {
            return self.terminal_precedence(t);
        }
        production
            .rhs
            .iter()
            .rev()
            .find_map(|s| s.as_terminal())
            .and_then(|t| self.terminal_precedence(t))
    }

    /// NULLABLE(A): `A` has a production `A -> ε` or whose rhs is all
    /// nullable symbols. Computed by fixpoint (spec.md §4.6).
    pub fn nullable_set(&self) -> BTreeSet<Nonterminal> {
        let mut nullable: BTreeSet<Nonterminal> = BTreeSet::new();
        let mut changed = true;
        while changed {
            changed = false;
            for production in &self.productions {
                if nullable.contains(&production.lhs) {
                    continue;
                }
                let is_nullable = production.rhs.iter().all(|s| match s {
                    Symbol::Nonterminal(n) => nullable.contains(n),
                    Symbol::Terminal(_) => false,
                });
                if is_nullable {
                    nullable.insert(production.lhs.clone());
                    changed = true;
                }
            }
        }
        nullable
    }

    pub fn is_sequence_nullable(nullable: &BTreeSet<Nonterminal>, seq: &[Symbol]) -> bool {
        seq.iter().all(|s| match s {
            Symbol::Nonterminal(n) => nullable.contains(n),
            Symbol::Terminal(_) => false,
        })
    }

    /// Reachability/usefulness diagnostics (spec.md §2): nonterminals
    /// unreachable from any start symbol, and nonterminals that can never
    /// derive a string of terminals ("useless").
    pub fn usefulness_diagnostics(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        let mut graph: Graph<Nonterminal> = Graph::new();
        for nonterminal in &self.nonterminals {
            graph.add_vertex(nonterminal.clone());
        }
        for production in &self.productions {
            for symbol in &production.rhs {
                if let Symbol::Nonterminal(n) = symbol {
                    graph.add_edge(production.lhs.clone(), n.clone());
                }
            }
        }
        let reachable = graph.reachable_from(&Nonterminal::Start);
        for nonterminal in &self.nonterminals {
            if !nonterminal.is_start() && !reachable.contains(nonterminal) {
                diagnostics.push(Diagnostic::UnreachableNonterminal(
                    nonterminal.name().to_string(),
                ));
            }
        }

        let mut generating: BTreeSet<Nonterminal> = BTreeSet::new();
        let mut changed = true;
        while changed {
            changed = false;
            for production in &self.productions {
                if generating.contains(&production.lhs) {
                    continue;
                }
                let is_generating = production.rhs.iter().all(|s| match s {
                    Symbol::Terminal(_) => true,
                    Symbol::Nonterminal(n) => generating.contains(n),
                });
                if is_generating {
                    generating.insert(production.lhs.clone());
                    changed = true;
                }
            }
        }
        for nonterminal in &self.nonterminals {
            if !nonterminal.is_start() && !generating.contains(nonterminal) {
                diagnostics.push(Diagnostic::UselessNonterminal(
                    nonterminal.name().to_string(),
                ));
            }
        }

        diagnostics
    }
}
