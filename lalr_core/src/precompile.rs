// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

// §4.1 Precompiler: validates a `RawSpecification` and produces a
// normalized `PrecompilationState`. Never throws — every problem becomes a
// `Diagnostic` pushed to `warnings` or `errors`; `compile()` halts only if
// `errors` is non-empty once precompilation finishes (spec.md §4.1
// "Failure semantics").

use crate::diagnostics::Diagnostic;
use crate::spec::RawSpecification;
use crate::symbol::{Associativity, PrecedenceLevel};
use std::collections::{BTreeMap, BTreeSet};

/// One alternative of a nonterminal's production group, normalized: symbol
/// names recorded in source order, `%prec` override kept as the raw name
/// the precompiler resolved (possibly a dummy terminal).
#[derive(Debug, Clone)]
pub struct NormalizedProduction {
    pub nonterminal: String,
    pub symbols: Vec<String>,
    pub prec_override: Option<String>,
    pub action: String,
}

#[derive(Debug, Default)]
pub struct PrecompilationState {
    /// Declared terminals in first-declaration order (includes dummy
    /// terminals introduced by `%prec`, appended as they're discovered).
    pub terminal_order: Vec<String>,
    pub terminal_types: BTreeMap<String, Option<String>>,
    pub dummy_terminals: BTreeSet<String>,
    /// Declared nonterminals in first-declaration (production group)
    /// order.
    pub nonterminal_order: Vec<String>,
    pub nonterminal_types: BTreeMap<String, Option<String>>,
    /// Productions surviving rule 5 (undeclared-symbol) validation, in
    /// source order across groups.
    pub productions: Vec<NormalizedProduction>,
    pub terminal_precedence: BTreeMap<String, (Associativity, PrecedenceLevel)>,
    pub starts: Vec<String>,
    pub warnings: Vec<Diagnostic>,
    pub errors: Vec<Diagnostic>,
}

impl PrecompilationState {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

pub fn precompile(spec: &RawSpecification) -> PrecompilationState {
    let mut st = PrecompilationState::default();

    // Rule 1: terminal declarations.
    for group in &spec.terminals {
        for name in &group.names {
            match st.terminal_types.get(name) {
                Some(existing) if *existing == group.declared_type => {
                    st.warnings
                        .push(Diagnostic::DuplicateTerminalSameType(name.clone()));
                }
                Some(_) => {
                    st.errors
                        .push(Diagnostic::DuplicateTerminalDifferentType(name.clone()));
                }
                None => {
                    st.terminal_types
                        .insert(name.clone(), group.declared_type.clone());
                    st.terminal_order.push(name.clone());
                }
            }
        }
    }

    // Rule 2: nonterminals are declared by having a production group.
    let mut seen_group = BTreeSet::new();
    for group in &spec.productions {
        let name = &group.nonterminal;
        if st.terminal_types.contains_key(name) {
            st.errors
                .push(Diagnostic::TerminalNonterminalCollision(name.clone()));
            continue;
        }
        if !seen_group.insert(name.clone()) {
            st.errors
                .push(Diagnostic::DuplicateProductionGroup(name.clone()));
            continue;
        }
        st.nonterminal_order.push(name.clone());
        st.nonterminal_types.insert(name.clone(), None);
        for alt in &group.alternatives {
            st.productions.push(NormalizedProduction {
                nonterminal: name.clone(),
                symbols: alt.symbols.clone(),
                prec_override: alt.prec_override.clone(),
                action: alt.action.clone(),
            });
        }
    }

    // Rule 3: %type declarations, nonterminals only.
    for decl in &spec.nonterminal_types {
        let name = &decl.name;
        if st.terminal_types.contains_key(name) {
            st.errors
                .push(Diagnostic::TypeAppliedToTerminal(name.clone()));
            continue;
        }
        match st.nonterminal_types.get(name).cloned() {
            None => {
                st.errors
                    .push(Diagnostic::TypeAppliedToUndeclared(name.clone()));
            }
            Some(None) => {
                st.nonterminal_types
                    .insert(name.clone(), Some(decl.declared_type.clone()));
            }
            Some(Some(existing)) if existing == decl.declared_type => {
                st.warnings
                    .push(Diagnostic::DuplicateTypeSameType(name.clone()));
            }
            Some(Some(_)) => {
                st.errors
                    .push(Diagnostic::DuplicateTypeDifferentType(name.clone()));
            }
        }
    }

    // Rule 4: start nonterminals.
    if spec.starting_productions.is_empty() {
        st.errors.push(Diagnostic::NoStartNonterminal);
    }
    let mut seen_start = BTreeSet::new();
    for name in &spec.starting_productions {
        if !seen_start.insert(name.clone()) {
            st.warnings.push(Diagnostic::DuplicateStart(name.clone()));
            continue;
        }
        match st.nonterminal_types.get(name) {
            Some(Some(_)) => st.starts.push(name.clone()),
            _ => st.errors.push(Diagnostic::StartNotDeclared(name.clone())),
        }
    }

    // Rule 5: every rhs symbol must be a declared terminal or nonterminal;
    // a production naming an undeclared symbol is dropped from the set
    // that proceeds to augmentation.
    let mut valid_productions = Vec::with_capacity(st.productions.len());
    for production in st.productions.drain(..) {
        let mut ok = true;
        for symbol in &production.symbols {
            if !st.terminal_types.contains_key(symbol) && !st.nonterminal_types.contains_key(symbol)
            {
                st.errors.push(Diagnostic::UndeclaredSymbol(
                    symbol.clone(),
                    production.nonterminal.clone(),
                ));
                ok = false;
            }
        }
        if ok {
            valid_productions.push(production);
        }
    }
    st.productions = valid_productions;

    // Rule 6: %prec targets. A nonterminal target is an error; an
    // undeclared target becomes a dummy terminal that must later acquire
    // an associativity declaration.
    for production in &st.productions {
        if let Some(target) = &production.prec_override {
            if st.nonterminal_types.contains_key(target) {
                st.errors
                    .push(Diagnostic::PrecOnNonterminal(target.clone()));
            } else if !st.terminal_types.contains_key(target) {
                st.dummy_terminals.insert(target.clone());
                st.terminal_types.insert(target.clone(), None);
                st.terminal_order.push(target.clone());
            }
        }
    }

    // Rule 7: associativity groups, earliest declared = lowest precedence.
    let mut claimed_by: BTreeMap<String, usize> = BTreeMap::new();
    for (index, group) in spec.associativities.iter().enumerate() {
        let level = index as PrecedenceLevel + 1;
        let mut seen_in_group = BTreeSet::new();
        for name in &group.terminals {
            if !seen_in_group.insert(name.clone()) {
                st.warnings
                    .push(Diagnostic::DuplicateInAssociativityGroup(name.clone()));
                continue;
            }
            if claimed_by.contains_key(name) {
                st.errors
                    .push(Diagnostic::AssociativityConflict(name.clone()));
                continue;
            }
            claimed_by.insert(name.clone(), index);
            if !st.terminal_types.contains_key(name) {
                st.terminal_types.insert(name.clone(), None);
                st.terminal_order.push(name.clone());
            }
            st.terminal_precedence
                .insert(name.clone(), (group.associativity, level));
        }
    }

    for dummy in &st.dummy_terminals {
        if !st.terminal_precedence.contains_key(dummy) {
            st.errors
                .push(Diagnostic::DummyTerminalWithoutAssociativity(
                    dummy.clone(),
                ));
        }
    }

    // Unused-symbol warnings.
    let mut used_terminals = BTreeSet::new();
    let mut used_nonterminals: BTreeSet<String> = st.starts.iter().cloned().collect();
    for production in &st.productions {
        for symbol in &production.symbols {
            if st.terminal_types.contains_key(symbol) {
                used_terminals.insert(symbol.clone());
            } else {
                used_nonterminals.insert(symbol.clone());
            }
        }
    }
    for name in &st.terminal_order {
        if !st.dummy_terminals.contains(name) && !used_terminals.contains(name) {
            st.warnings.push(Diagnostic::UnusedTerminal(name.clone()));
        }
    }
    for name in &st.nonterminal_order {
        if !used_nonterminals.contains(name) {
            st.warnings
                .push(Diagnostic::UnusedNonterminal(name.clone()));
        }
    }

    st
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::*;

    fn term_group(names: &[&str]) -> TerminalGroup {
        TerminalGroup {
            declared_type: None,
            names: names.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn empty_specification_reports_missing_start() {
        let spec = RawSpecification::default();
        let st = precompile(&spec);
        assert!(!st.is_ok());
        assert!(st.errors.contains(&Diagnostic::NoStartNonterminal));
    }

    #[test]
    fn undeclared_symbol_drops_its_production() {
        let mut spec = RawSpecification::default();
        spec.terminals.push(term_group(&["NUM"]));
        spec.productions.push(ProductionGroup {
            nonterminal: "E".to_string(),
            alternatives: vec![RawProduction::new(vec!["NUM".to_string()])],
        });
        spec.productions.push(ProductionGroup {
            nonterminal: "F".to_string(),
            alternatives: vec![RawProduction::new(vec!["GHOST".to_string()])],
        });
        spec.nonterminal_types.push(NonterminalTypeDecl {
            declared_type: "i64".to_string(),
            name: "E".to_string(),
        });
        spec.nonterminal_types.push(NonterminalTypeDecl {
            declared_type: "i64".to_string(),
            name: "F".to_string(),
        });
        spec.starting_productions.push("E".to_string());
        let st = precompile(&spec);
        assert!(st
            .errors
            .iter()
            .any(|d| matches!(d, Diagnostic::UndeclaredSymbol(s, _) if s == "GHOST")));
        assert_eq!(st.productions.len(), 1);
    }

    #[test]
    fn dummy_terminal_without_associativity_is_an_error() {
        let mut spec = RawSpecification::default();
        spec.terminals.push(term_group(&["MINUS"]));
        spec.productions.push(ProductionGroup {
            nonterminal: "E".to_string(),
            alternatives: vec![RawProduction::new(vec!["MINUS".to_string()])
                .with_prec("UMINUS")],
        });
        spec.nonterminal_types.push(NonterminalTypeDecl {
            declared_type: "i64".to_string(),
            name: "E".to_string(),
        });
        spec.starting_productions.push("E".to_string());
        let st = precompile(&spec);
        assert!(st
            .errors
            .iter()
            .any(|d| matches!(d, Diagnostic::DummyTerminalWithoutAssociativity(s) if s == "UMINUS")));
    }

    #[test]
    fn associativity_conflict_across_groups() {
        let mut spec = RawSpecification::default();
        spec.terminals.push(term_group(&["PLUS"]));
        spec.associativities.push(AssociativityGroup {
            associativity: Associativity::Left,
            terminals: vec!["PLUS".to_string()],
        });
        spec.associativities.push(AssociativityGroup {
            associativity: Associativity::Right,
            terminals: vec!["PLUS".to_string()],
        });
        spec.productions.push(ProductionGroup {
            nonterminal: "E".to_string(),
            alternatives: vec![RawProduction::new(vec!["PLUS".to_string()])],
        });
        spec.nonterminal_types.push(NonterminalTypeDecl {
            declared_type: "i64".to_string(),
            name: "E".to_string(),
        });
        spec.starting_productions.push("E".to_string());
        let st = precompile(&spec);
        assert!(st
            .errors
            .iter()
            .any(|d| matches!(d, Diagnostic::AssociativityConflict(s) if s == "PLUS")));
    }
}
