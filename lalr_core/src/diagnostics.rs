// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

// Error taxonomy of spec.md §7. A `Diagnostic` is pure data: validators
// accumulate it into `PrecompilationState` (or the final conflict report)
// rather than raising an exception. Only `DiagnosticKind::Grammar` and the
// `%prec` dummy-terminal rule in §4.1 rule 6 are fatal by construction;
// whether any particular diagnostic is fatal is a property of which list
// (`errors` vs `warnings`) it ends up in, not of the variant itself.

use crate::symbol::ProductionRuleId;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    Declaration,
    Reference,
    Precedence,
    Grammar,
    ConflictResidue,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            DiagnosticKind::Declaration => "declaration",
            DiagnosticKind::Reference => "reference",
            DiagnosticKind::Precedence => "precedence",
            DiagnosticKind::Grammar => "grammar",
            DiagnosticKind::ConflictResidue => "conflict residue",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Diagnostic {
    #[error("terminal \"{0}\" is already declared with the same type")]
    DuplicateTerminalSameType(String),
    #[error("terminal \"{0}\" is already declared with a different type")]
    DuplicateTerminalDifferentType(String),
    #[error("\"{0}\" is declared as both a terminal and a nonterminal")]
    TerminalNonterminalCollision(String),
    #[error("nonterminal \"{0}\" has more than one production group")]
    DuplicateProductionGroup(String),
    #[error("%type applied to terminal \"{0}\"")]
    TypeAppliedToTerminal(String),
    #[error("%type applied to undeclared name \"{0}\"")]
    TypeAppliedToUndeclared(String),
    #[error("nonterminal \"{0}\" redeclared with the same type")]
    DuplicateTypeSameType(String),
    #[error("nonterminal \"{0}\" redeclared with a different type")]
    DuplicateTypeDifferentType(String),
    #[error("must declare at least one starting nonterminal")]
    NoStartNonterminal,
    #[error("start nonterminal \"{0}\" is not a declared, typed nonterminal")]
    StartNotDeclared(String),
    #[error("\"{0}\" is declared as a start symbol more than once")]
    DuplicateStart(String),
    #[error("\"{0}\" used in production for \"{1}\" is not a declared terminal or nonterminal")]
    UndeclaredSymbol(String, String),
    #[error("%prec target \"{0}\" is a nonterminal")]
    PrecOnNonterminal(String),
    #[error("dummy terminal \"{0}\" requires an associativity declaration")]
    DummyTerminalWithoutAssociativity(String),
    #[error("terminal \"{0}\" listed more than once in one associativity group")]
    DuplicateInAssociativityGroup(String),
    #[error("terminal \"{0}\" conflicts with earlier associativity declaration")]
    AssociativityConflict(String),
    #[error("grammar is not LR(k) for any k: nontrivial cycle with non-empty read set through {0:?}")]
    NotLrK(Vec<ProductionRuleId>),
    #[error("state {state}: shift/reduce conflict on \"{terminal}\" resolved by default (kept shift)")]
    ResidualShiftReduce { state: u32, terminal: String },
    #[error("state {state}: reduce/reduce conflict on \"{terminal}\" resolved by default (kept rule {kept})")]
    ResidualReduceReduce {
        state: u32,
        terminal: String,
        kept: ProductionRuleId,
    },
    #[error("state {state}: shift/reduce conflict on \"{terminal}\" resolved by %nonassoc (dropped both)")]
    NonAssocConflict { state: u32, terminal: String },
    #[error("terminal \"{0}\" is declared but never used in any production")]
    UnusedTerminal(String),
    #[error("nonterminal \"{0}\" is declared but never used in any production")]
    UnusedNonterminal(String),
    #[error("nonterminal \"{0}\" is unreachable from any start symbol")]
    UnreachableNonterminal(String),
    #[error("nonterminal \"{0}\" can never derive a string of terminals")]
    UselessNonterminal(String),
}

impl Diagnostic {
    pub fn kind(&self) -> DiagnosticKind {
        use Diagnostic::*;
        match self {
            DuplicateTerminalSameType(_)
            | DuplicateTerminalDifferentType(_)
            | TerminalNonterminalCollision(_)
            | DuplicateProductionGroup(_)
            | TypeAppliedToTerminal(_)
            | DuplicateTypeSameType(_)
            | DuplicateTypeDifferentType(_)
            | NoStartNonterminal
            | StartNotDeclared(_)
            | DuplicateStart(_)
            | UnusedTerminal(_)
            | UnusedNonterminal(_)
            | UnreachableNonterminal(_)
            | UselessNonterminal(_) => DiagnosticKind::Declaration,
            TypeAppliedToUndeclared(_) | UndeclaredSymbol(_, _) => DiagnosticKind::Reference,
            PrecOnNonterminal(_)
            | DummyTerminalWithoutAssociativity(_)
            | DuplicateInAssociativityGroup(_)
            | AssociativityConflict(_)
            | NonAssocConflict { .. } => DiagnosticKind::Precedence,
            NotLrK(_) => DiagnosticKind::Grammar,
            ResidualShiftReduce { .. } | ResidualReduceReduce { .. } => {
                DiagnosticKind::ConflictResidue
            }
        }
    }
}
