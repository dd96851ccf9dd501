// spec.md §8 determinism property: two runs on identical input produce
// byte-identical state numbering, ACTION entries, GOTO entries, and
// diagnostic order. Each proptest iteration draws a random ordering of the
// same grammar's production alternatives and compiles that one spec twice,
// checking the two runs agree; it does not compare two different orderings
// against each other, since each assigns its alternatives distinct
// `ProductionRuleId`s and so produces tables that aren't directly comparable
// without a remapping layer. Mirrors how `diet`'s own invariant tests are
// organized in this workspace.

use lalr_core::{
    AssociativityGroup, Associativity, NonterminalTypeDecl, ProductionGroup, RawProduction,
    RawSpecification, TerminalGroup,
};
use proptest::prelude::*;

fn arithmetic_spec(alternative_order: [usize; 4]) -> RawSpecification {
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

    let all_alternatives = [
        RawProduction::new(vec!["E".to_string(), "PLUS".to_string(), "E".to_string()]),
        RawProduction::new(vec!["E".to_string(), "TIMES".to_string(), "E".to_string()]),
        RawProduction::new(vec![
            "LPAREN".to_string(),
            "E".to_string(),
            "RPAREN".to_string(),
        ]),
        RawProduction::new(vec!["NUM".to_string()]),
    ];
    let alternatives = alternative_order
        .iter()
        .map(|&i| all_alternatives[i].clone())
        .collect();

    spec.productions.push(ProductionGroup {
        nonterminal: "E".to_string(),
        alternatives,
    });
    spec.nonterminal_types.push(NonterminalTypeDecl {
        declared_type: "i64".to_string(),
        name: "E".to_string(),
    });
    spec.starting_productions.push("E".to_string());
    spec
}

fn permutation_strategy() -> impl Strategy<Value = [usize; 4]> {
    Just([0usize, 1, 2, 3]).prop_shuffle().prop_map(|v| {
        let mut out = [0usize; 4];
        out.copy_from_slice(&v);
        out
    })
}

proptest! {
    #[test]
    fn compiling_the_same_grammar_twice_is_byte_identical(order in permutation_strategy()) {
        let spec = arithmetic_spec(order);
        let first = lalr_core::compile(&spec).expect("arithmetic grammar is LALR(1)");
        let second = lalr_core::compile(&spec).expect("arithmetic grammar is LALR(1)");
        prop_assert_eq!(first.table, second.table);
        prop_assert_eq!(first.warnings, second.warnings);
    }
}
