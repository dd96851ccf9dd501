// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

//! A classical LALR(1) parser-table generator core: precompiler, grammar
//! augmentation, LR(0) automaton construction, precedence-based conflict
//! resolution, and the staged SLR(1) -> LALR(1) lookahead upgrade via the
//! DeRemer-Pennello digraph algorithm.
//!
//! This crate only builds the table; lexing, code generation and grammar
//! file parsing are the embedding application's concern.

pub mod compile;
pub mod diagnostics;
pub mod grammar;
pub mod lalr;
pub mod lr0;
pub mod precedence;
pub mod precompile;
pub mod relation;
pub mod slr;
pub mod spec;
pub mod symbol;
pub mod table;

pub use compile::{compile, CompiledGrammar};
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use grammar::{Grammar, Production};
pub use lr0::{Conflict, ConflictKind, LrAction, LrItem, LrParserState, LrParserTable, StateId};
pub use precompile::{NormalizedProduction, PrecompilationState};
pub use spec::{
    AssociativityGroup, CompileOptions, NonterminalTypeDecl, ProductionGroup, RawProduction,
    RawSpecification, TerminalGroup,
};
pub use symbol::{Associativity, Nonterminal, PrecedenceLevel, ProductionRuleId, Symbol, Terminal};
