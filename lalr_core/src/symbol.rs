// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

// Symbols of the (augmented) grammar: terminals and nonterminals, each
// distinguishable, opaque-named kinds. `Terminal::EndOfFile` and
// `Nonterminal::Start` are the two symbols the augmentation step adds
// (spec.md §4.3); every other variant wraps a user-declared name.

use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Terminal {
    Named(Rc<str>),
    EndOfFile,
}

impl Terminal {
    pub fn named(name: &str) -> Self {
        Terminal::Named(Rc::from(name))
    }

    pub fn name(&self) -> &str {
        match self {
            Terminal::Named(n) => n,
            Terminal::EndOfFile => "$end",
        }
    }

    pub fn is_end_of_file(&self) -> bool {
        matches!(self, Terminal::EndOfFile)
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Nonterminal {
    Named(Rc<str>),
    Start,
}

impl Nonterminal {
    pub fn named(name: &str) -> Self {
        Nonterminal::Named(Rc::from(name))
    }

    pub fn name(&self) -> &str {
        match self {
            Nonterminal::Named(n) => n,
            Nonterminal::Start => "$start",
        }
    }

    pub fn is_start(&self) -> bool {
        matches!(self, Nonterminal::Start)
    }
}

impl fmt::Display for Nonterminal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A grammar symbol: exactly one of terminal or nonterminal (spec.md §3).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    Terminal(Terminal),
    Nonterminal(Nonterminal),
}

impl Symbol {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    pub fn is_nonterminal(&self) -> bool {
        matches!(self, Symbol::Nonterminal(_))
    }

    pub fn as_terminal(&self) -> Option<&Terminal> {
        match self {
            Symbol::Terminal(t) => Some(t),
            Symbol::Nonterminal(_) => None,
        }
    }

    pub fn as_nonterminal(&self) -> Option<&Nonterminal> {
        match self {
            Symbol::Nonterminal(n) => Some(n),
            Symbol::Terminal(_) => None,
        }
    }
}

impl From<Terminal> for Symbol {
    fn from(t: Terminal) -> Self {
        Symbol::Terminal(t)
    }
}

impl From<Nonterminal> for Symbol {
    fn from(n: Nonterminal) -> Self {
        Symbol::Nonterminal(n)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Symbol::Terminal(t) => write!(f, "{}", t),
            Symbol::Nonterminal(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Associativity {
    Left,
    Right,
    NonAssoc,
}

impl fmt::Display for Associativity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Associativity::Left => write!(f, "left"),
            Associativity::Right => write!(f, "right"),
            Associativity::NonAssoc => write!(f, "nonassoc"),
        }
    }
}

/// Positive; higher binds tighter (spec.md §3).
pub type PrecedenceLevel = u32;

pub type ProductionRuleId = u32;
