// Classic dangling-else: with no declared precedence between `THEN` and
// `ELSE`, every `else` creates a shift/reduce conflict that the default
// residual-conflict policy resolves by keeping the shift (binding `else`
// to the nearest unmatched `if`), emitting a warning rather than an error.

use lalr_core::{
    AssociativityGroup, Diagnostic, NonterminalTypeDecl, ProductionGroup, RawProduction,
    RawSpecification, TerminalGroup,
};

fn dangling_else_spec() -> RawSpecification {
    let mut spec = RawSpecification::default();
    spec.terminals.push(TerminalGroup {
        declared_type: None,
        names: vec![
            "IF".to_string(),
            "THEN".to_string(),
            "ELSE".to_string(),
            "OTHER".to_string(),
            "COND".to_string(),
        ],
    });
    spec.productions.push(ProductionGroup {
        nonterminal: "S".to_string(),
        alternatives: vec![
            RawProduction::new(vec![
                "IF".to_string(),
                "COND".to_string(),
                "THEN".to_string(),
                "S".to_string(),
            ]),
            RawProduction::new(vec![
                "IF".to_string(),
                "COND".to_string(),
                "THEN".to_string(),
                "S".to_string(),
                "ELSE".to_string(),
                "S".to_string(),
            ]),
            RawProduction::new(vec!["OTHER".to_string()]),
        ],
    });
    spec.nonterminal_types.push(NonterminalTypeDecl {
        declared_type: "()".to_string(),
        name: "S".to_string(),
    });
    spec.starting_productions.push("S".to_string());
    spec
}

#[test]
fn dangling_else_resolves_to_shift_with_a_warning() {
    let spec = dangling_else_spec();
    let compiled = lalr_core::compile(&spec).expect("ambiguity is a warning, not a fatal error");
    assert!(compiled
        .warnings
        .iter()
        .any(|d| matches!(d, Diagnostic::ResidualShiftReduce { .. })));
}

#[test]
fn declaring_precedence_removes_the_residual_conflict() {
    let mut spec = dangling_else_spec();
    // %nonassoc THEN %nonassoc ELSE with ELSE binding tighter resolves the
    // shift in favour of ELSE without leaving a residual warning behind.
    spec.associativities.push(AssociativityGroup {
        associativity: lalr_core::Associativity::Left,
        terminals: vec!["THEN".to_string()],
    });
    spec.associativities.push(AssociativityGroup {
        associativity: lalr_core::Associativity::Left,
        terminals: vec!["ELSE".to_string()],
    });
    let compiled = lalr_core::compile(&spec).expect("grammar precompiles");
    assert!(compiled
        .warnings
        .iter()
        .all(|d| !matches!(d, Diagnostic::ResidualShiftReduce { .. })));
}
