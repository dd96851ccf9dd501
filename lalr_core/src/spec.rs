// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

// The raw, unvalidated specification record (spec.md §3 `Specification`,
// §6 "Input record"). This is what an external grammar-file parser (out of
// scope here, spec.md §1) hands to `compile()`.

use crate::symbol::Associativity;

/// One `%prec`-capable production alternative.
#[derive(Debug, Clone, Default)]
pub struct RawProduction {
    /// Right-hand side, in source order. Empty means an epsilon production.
    pub symbols: Vec<String>,
    /// `%prec X` override, if present.
    pub prec_override: Option<String>,
    /// Opaque semantic-action text; never interpreted by the core.
    pub action: String,
}

impl RawProduction {
    pub fn new(symbols: Vec<String>) -> Self {
        Self {
            symbols,
            prec_override: None,
            action: String::new(),
        }
    }

    pub fn with_prec(mut self, terminal: impl Into<String>) -> Self {
        self.prec_override = Some(terminal.into());
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }
}

/// A terminal declaration group: an optional shared type, and the
/// terminal names declared with it.
#[derive(Debug, Clone, Default)]
pub struct TerminalGroup {
    pub declared_type: Option<String>,
    pub names: Vec<String>,
}

/// A single `%type` declaration for one nonterminal.
#[derive(Debug, Clone)]
pub struct NonterminalTypeDecl {
    pub declared_type: String,
    pub name: String,
}

/// One nonterminal's production group: its name and its ordered
/// alternatives.
#[derive(Debug, Clone)]
pub struct ProductionGroup {
    pub nonterminal: String,
    pub alternatives: Vec<RawProduction>,
}

/// One `%left`/`%right`/`%nonassoc` declaration, naming the terminals that
/// share that associativity and (implicitly, by list order) precedence
/// level.
#[derive(Debug, Clone)]
pub struct AssociativityGroup {
    pub associativity: Associativity,
    pub terminals: Vec<String>,
}

/// Opaque to the core (spec.md §6); the driver populates whatever its
/// backend needs (output file path, feature flags, ...).
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    pub fields: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default)]
pub struct RawSpecification {
    pub terminals: Vec<TerminalGroup>,
    pub nonterminal_types: Vec<NonterminalTypeDecl>,
    pub productions: Vec<ProductionGroup>,
    pub associativities: Vec<AssociativityGroup>,
    pub starting_productions: Vec<String>,
    pub options: CompileOptions,
}
