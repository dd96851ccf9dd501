// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

// §4.5 Precedence/associativity conflict resolution. Runs once over the
// raw LR(0) ACTION table, resolving shift/reduce conflicts that have a
// defined precedence on both sides; everything else — including every
// reduce/reduce conflict — is left in the table for the SLR(1)/LALR(1)
// upgrades to narrow down.

use crate::diagnostics::Diagnostic;
use crate::grammar::Grammar;
use crate::lr0::{LrAction, LrParserTable};
use crate::symbol::Associativity;

pub fn apply_precedence(grammar: &Grammar, table: &mut LrParserTable) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let keys: Vec<_> = table.action.keys().cloned().collect();

    for key in keys {
        let (state, terminal) = key.clone();
        let actions = table.action.get(&key).cloned().unwrap_or_default();
        let has_shift = actions
            .iter()
            .any(|a| matches!(a, LrAction::Shift(_) | LrAction::Accept));
        let reduce_ids: Vec<_> = actions
            .iter()
            .filter_map(|a| match a {
                LrAction::Reduce(r) => Some(*r),
                _ => None,
            })
            .collect();
        if !has_shift || reduce_ids.is_empty() {
            continue;
        }

        let term_prec = grammar.terminal_precedence(&terminal);
        let mut actions = actions;
        for rule in reduce_ids {
            let production = grammar.production(rule);
            let rule_prec = grammar.rule_precedence(production);
            let (rule_level, term) = match (rule_prec, term_prec) {
                (Some((_, rl)), Some(t)) => (rl, t),
                _ => continue, // either side undefined: leave the conflict in place
            };
            let (assoc, term_level) = term;
            if rule_level > term_level {
                actions.retain(|a| !matches!(a, LrAction::Shift(_) | LrAction::Accept));
            } else if term_level > rule_level {
                actions.remove(&LrAction::Reduce(rule));
            } else {
                match assoc {
                    Associativity::Left => {
                        actions.retain(|a| !matches!(a, LrAction::Shift(_) | LrAction::Accept));
                    }
                    Associativity::Right => {
                        actions.remove(&LrAction::Reduce(rule));
                    }
                    Associativity::NonAssoc => {
                        actions.remove(&LrAction::Reduce(rule));
                        actions.retain(|a| !matches!(a, LrAction::Shift(_) | LrAction::Accept));
                        diagnostics.push(Diagnostic::NonAssocConflict {
                            state,
                            terminal: terminal.name().to_string(),
                        });
                    }
                }
            }
        }
        table.action.insert(key, actions);
    }

    diagnostics
}
