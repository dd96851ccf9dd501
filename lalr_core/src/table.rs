// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

// Human-readable rendering of a built `LrParserTable`: per-state
// kernel/closure item listings and a conflict summary, for diagnostics and
// `-v`-style compiler output. Never consulted by `compile()` itself.

use crate::grammar::Grammar;
use crate::lr0::{ConflictKind, LrItem, LrParserTable};
use std::fmt::Write as _;

impl LrItem {
    /// Renders this item dot-notation style: `lhs -> sym1 sym2 . sym3`.
    pub fn describe(&self, grammar: &Grammar) -> String {
        let production = grammar.production(self.production);
        let mut out = format!("{} ->", production.lhs);
        for (i, symbol) in production.rhs.iter().enumerate() {
            if i == self.dot {
                out.push_str(" .");
            }
            write!(out, " {}", symbol).expect("String write is infallible");
        }
        if self.dot >= production.rhs.len() {
            out.push_str(" .");
        }
        out
    }
}

impl LrParserTable {
    /// A full textual description of every state's item set, plus a
    /// trailing summary of unresolved conflicts.
    pub fn to_description(&self, grammar: &Grammar) -> String {
        let mut out = String::new();
        for state in &self.states {
            writeln!(out, "state {}:", state.id).expect("String write is infallible");
            for item in &state.items {
                writeln!(out, "    {}", item.describe(grammar)).expect("String write is infallible");
            }
        }
        let conflicts = self.conflicts();
        if !conflicts.is_empty() {
            writeln!(out, "\nconflicts:").expect("String write is infallible");
            for conflict in &conflicts {
                let kind = match conflict.kind {
                    ConflictKind::ShiftReduce => "shift/reduce",
                    ConflictKind::ReduceReduce => "reduce/reduce",
                };
                writeln!(
                    out,
                    "    state {} on \"{}\": {} ({} actions)",
                    conflict.state,
                    conflict.terminal,
                    kind,
                    conflict.actions.len()
                )
                .expect("String write is infallible");
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lr0;
    use crate::precompile::precompile;
    use crate::spec::*;
    use crate::symbol::Associativity;

    fn sample_grammar() -> Grammar {
        let mut spec = RawSpecification::default();
        spec.terminals.push(TerminalGroup {
            declared_type: None,
            names: vec!["NUM".to_string(), "PLUS".to_string()],
        });
        spec.associativities.push(AssociativityGroup {
            associativity: Associativity::Left,
            terminals: vec!["PLUS".to_string()],
        });
        spec.productions.push(ProductionGroup {
            nonterminal: "E".to_string(),
            alternatives: vec![
                RawProduction::new(vec!["E".to_string(), "PLUS".to_string(), "NUM".to_string()]),
                RawProduction::new(vec!["NUM".to_string()]),
            ],
        });
        spec.nonterminal_types.push(NonterminalTypeDecl {
            declared_type: "i64".to_string(),
            name: "E".to_string(),
        });
        spec.starting_productions.push("E".to_string());
        let state = precompile(&spec);
        assert!(state.is_ok());
        Grammar::augment(&state)
    }

    #[test]
    fn description_lists_every_state_and_any_conflicts() {
        let grammar = sample_grammar();
        let table = lr0::build(&grammar);
        let description = table.to_description(&grammar);
        assert!(description.contains("state 0:"));
        assert!(description.contains(&format!("state {}:", table.states.len() - 1)));
    }
}
