// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

// §6 Compile interface: ties the pipeline together —
// `RawSpecification -> Precompiler -> PrecompilationState -> Grammar ->
// LR(0) table -> (+precedence) -> SLR(1) -> LALR(1) -> default residual
// conflict resolution` — and produces either the finished table or the
// accumulated fatal errors. The LALR(1) lookahead computation
// (`lalr::upgrade`) is invoked exactly once here (spec.md §9).

use crate::diagnostics::Diagnostic;
use crate::grammar::Grammar;
use crate::lalr;
use crate::lr0::{self, LrAction, LrParserTable};
use crate::precedence;
use crate::precompile::precompile;
use crate::slr;
use crate::spec::RawSpecification;
use std::collections::BTreeMap;

/// The output of a successful compile (spec.md §6 "Output record"):
/// the finished table, the augmented grammar it was built over, every
/// accumulated non-fatal diagnostic, and the declared-type maps a
/// backend needs to emit the generated parser's semantic value type.
pub struct CompiledGrammar {
    pub grammar: Grammar,
    pub table: LrParserTable,
    pub warnings: Vec<Diagnostic>,
    pub terminal_types: BTreeMap<String, Option<String>>,
    pub nonterminal_types: BTreeMap<String, Option<String>>,
}

pub fn compile(spec: &RawSpecification) -> Result<CompiledGrammar, Vec<Diagnostic>> {
    let state = precompile(spec);
    if !state.is_ok() {
        return Err(state.errors);
    }
    log::debug!(
        "precompiled {} terminals, {} nonterminals, {} productions",
        state.terminal_order.len(),
        state.nonterminal_order.len(),
        state.productions.len()
    );

    let grammar = Grammar::augment(&state);
    let mut table = lr0::build(&grammar);
    log::debug!("LR(0) automaton has {} states", table.states.len());

    let mut warnings = state.warnings;
    warnings.extend(grammar.usefulness_diagnostics());
    warnings.extend(precedence::apply_precedence(&grammar, &mut table));

    let nullable = grammar.nullable_set();
    let first = slr::first_sets(&grammar, &nullable);
    let follow = slr::follow_sets(&grammar, &first, &nullable);
    slr::restrict_to_slr(&grammar, &follow, &mut table);

    let upgrade = lalr::upgrade(&grammar, &table).map_err(|d| vec![d])?;
    lalr::restrict_to_lalr(&upgrade, &mut table);

    warnings.extend(resolve_residual_conflicts(&mut table));
    if !warnings.is_empty() {
        log::warn!("{} diagnostics after compilation", warnings.len());
    }

    Ok(CompiledGrammar {
        grammar,
        table,
        warnings,
        terminal_types: state.terminal_types,
        nonterminal_types: state.nonterminal_types,
    })
}

/// Default resolution policy for whatever conflicts survive the LALR(1)
/// upgrade (spec.md §4.7/§7): shift/reduce keeps the shift, reduce/reduce
/// keeps the lowest `ProductionRuleId`; either way a warning records what
/// was dropped.
fn resolve_residual_conflicts(table: &mut LrParserTable) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let keys: Vec<_> = table.action.keys().cloned().collect();
    for key in keys {
        let (state, terminal) = key.clone();
        let mut actions = table.action.get(&key).cloned().unwrap_or_default();
        if actions.len() <= 1 {
            continue;
        }
        let has_shift = actions
            .iter()
            .any(|a| matches!(a, LrAction::Shift(_) | LrAction::Accept));
        if has_shift {
            actions.retain(|a| matches!(a, LrAction::Shift(_) | LrAction::Accept));
            diagnostics.push(Diagnostic::ResidualShiftReduce {
                state,
                terminal: terminal.name().to_string(),
            });
        } else {
            let kept = actions
                .iter()
                .filter_map(|a| match a {
                    LrAction::Reduce(r) => Some(*r),
                    _ => None,
                })
                .min()
                .expect("a reduce/reduce conflict has at least one reduce action");
            actions.retain(|a| matches!(a, LrAction::Reduce(r) if *r == kept));
            diagnostics.push(Diagnostic::ResidualReduceReduce {
                state,
                terminal: terminal.name().to_string(),
                kept,
            });
        }
        table.action.insert(key, actions);
    }
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::*;
    use crate::symbol::Associativity;

    fn arithmetic_spec() -> RawSpecification {
        let mut spec = RawSpecification::default();
        spec.terminals.push(TerminalGroup {
            declared_type: None,
            names: vec!["NUM".to_string(), "LPAREN".to_string(), "RPAREN".to_string()],
        });
        spec.associativities.push(AssociativityGroup {
            associativity: Associativity::Left,
            terminals: vec!["PLUS".to_string()],
        });
        spec.associativities.push(AssociativityGroup {
            associativity: Associativity::Left,
            terminals: vec!["TIMES".to_string()],
        });
        spec.productions.push(ProductionGroup {
            nonterminal: "E".to_string(),
            alternatives: vec![
                RawProduction::new(vec!["E".to_string(), "PLUS".to_string(), "E".to_string()]),
                RawProduction::new(vec!["E".to_string(), "TIMES".to_string(), "E".to_string()]),
                RawProduction::new(vec![
                    "LPAREN".to_string(),
                    "E".to_string(),
                    "RPAREN".to_string(),
                ]),
                RawProduction::new(vec!["NUM".to_string()]),
            ],
        });
        spec.nonterminal_types.push(NonterminalTypeDecl {
            declared_type: "i64".to_string(),
            name: "E".to_string(),
        });
        spec.starting_productions.push("E".to_string());
        spec
    }

    #[test]
    fn empty_specification_fails_to_compile() {
        let spec = RawSpecification::default();
        let result = compile(&spec);
        assert!(result.is_err());
    }

    #[test]
    fn classic_arithmetic_grammar_compiles_without_residual_conflicts() {
        let spec = arithmetic_spec();
        let compiled = compile(&spec).expect("grammar is LALR(1) once precedence is declared");
        assert!(compiled
            .warnings
            .iter()
            .all(|d| !matches!(
                d,
                Diagnostic::ResidualShiftReduce { .. } | Diagnostic::ResidualReduceReduce { .. }
            )));
        assert!(compiled.table.conflicts().is_empty());
    }

    #[test]
    fn dummy_terminal_without_associativity_fails_to_compile() {
        let mut spec = RawSpecification::default();
        spec.terminals.push(TerminalGroup {
            declared_type: None,
            names: vec!["MINUS".to_string()],
        });
        spec.productions.push(ProductionGroup {
            nonterminal: "E".to_string(),
            alternatives: vec![
                RawProduction::new(vec!["MINUS".to_string()]).with_prec("UMINUS"),
            ],
        });
        spec.nonterminal_types.push(NonterminalTypeDecl {
            declared_type: "i64".to_string(),
            name: "E".to_string(),
        });
        spec.starting_productions.push("E".to_string());
        let result = compile(&spec);
        assert!(result.is_err());
    }

    #[test]
    fn reduce_reduce_conflict_is_resolved_by_lowest_rule_id() {
        // S -> A | B ; A -> X ; B -> X — both reduce on end-of-file.
        let mut spec = RawSpecification::default();
        spec.terminals.push(TerminalGroup {
            declared_type: None,
            names: vec!["X".to_string()],
        });
        spec.productions.push(ProductionGroup {
            nonterminal: "S".to_string(),
            alternatives: vec![
                RawProduction::new(vec!["A".to_string()]),
                RawProduction::new(vec!["B".to_string()]),
            ],
        });
        spec.productions.push(ProductionGroup {
            nonterminal: "A".to_string(),
            alternatives: vec![RawProduction::new(vec!["X".to_string()])],
        });
        spec.productions.push(ProductionGroup {
            nonterminal: "B".to_string(),
            alternatives: vec![RawProduction::new(vec!["X".to_string()])],
        });
        for name in ["S", "A", "B"] {
            spec.nonterminal_types.push(NonterminalTypeDecl {
                declared_type: "i64".to_string(),
                name: name.to_string(),
            });
        }
        spec.starting_productions.push("S".to_string());
        let compiled = compile(&spec).expect("precompiles cleanly");
        assert!(compiled
            .warnings
            .iter()
            .any(|d| matches!(d, Diagnostic::ResidualReduceReduce { .. })));
    }
}
