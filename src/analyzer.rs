//! This module provides non-fatal checks on a parsed `Definition`. Nothing reported here makes
//! a definition invalid; the findings point at rules that can never take effect.

use crate::types::{Definition, Symbol, Transition};
use std::collections::BTreeSet;
use std::fmt;

/// Represents a suspicious but legal construct found in a definition.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Diagnostic {
    /// Transition `index` can never fire: the earlier transition `by` leaves the same state
    /// and matches every configuration it would match.
    ShadowedTransition { index: usize, by: usize },
    /// Declared states that no sequence of transitions leads to from the initial state.
    UnreachableStates(Vec<String>),
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::ShadowedTransition { index, by } => write!(
                f,
                "transition #{} is shadowed by transition #{} and can never fire",
                index + 1,
                by + 1
            ),
            Diagnostic::UnreachableStates(states) => {
                write!(f, "unreachable states detected: {}", states.join(", "))
            }
        }
    }
}

/// Analyzes a `Definition`, returning every diagnostic found.
///
/// Transitions are numbered from 0 in declaration order.
pub fn analyze(definition: &Definition) -> Vec<Diagnostic> {
    [check_shadowed_transitions, check_unreachable_states]
        .iter()
        .flat_map(|check| check(definition))
        .collect()
}

/// Finds transitions hidden behind an earlier transition with a broader read pattern.
///
/// The engine always applies the first matching transition, so a later transition whose
/// every match is also a match of an earlier one is dead.
fn check_shadowed_transitions(definition: &Definition) -> Vec<Diagnostic> {
    let non_blank: Vec<char> = definition
        .tape_alphabet
        .iter()
        .copied()
        .filter(|&c| c != definition.blank)
        .collect();

    definition
        .transitions
        .iter()
        .enumerate()
        .filter_map(|(index, later)| {
            definition.transitions[..index]
                .iter()
                .position(|earlier| covers(earlier, later, definition.blank, &non_blank))
                .map(|by| Diagnostic::ShadowedTransition { index, by })
        })
        .collect()
}

/// Checks whether `earlier` matches every configuration `later` matches.
fn covers(earlier: &Transition, later: &Transition, blank: char, non_blank: &[char]) -> bool {
    earlier.from_state == later.from_state
        && earlier
            .read
            .iter()
            .zip(&later.read)
            .all(|(&outer, &inner)| match (outer, inner) {
                (Symbol::Wildcard, Symbol::Wildcard) => true,
                (Symbol::Wildcard, Symbol::Literal(c)) => c != blank,
                (Symbol::Literal(a), Symbol::Literal(b)) => a == b,
                // a wildcard is only as narrow as a literal when one non-blank symbol exists
                (Symbol::Literal(a), Symbol::Wildcard) => non_blank == [a],
            })
}

/// Checks for unreachable states by a depth-first traversal from the initial state.
fn check_unreachable_states(definition: &Definition) -> Vec<Diagnostic> {
    let mut visited = BTreeSet::new();
    let mut stack = vec![definition.initial_state.as_str()];

    while let Some(state) = stack.pop() {
        if !visited.insert(state) {
            continue;
        }

        stack.extend(
            definition
                .transitions_from(state)
                .map(|t| t.next_state.as_str())
                .filter(|next| !visited.contains(next)),
        );
    }

    let unreachable: Vec<String> = definition
        .states
        .iter()
        .filter(|state| !visited.contains(state.as_str()))
        .cloned()
        .collect();

    if unreachable.is_empty() {
        Vec::new()
    } else {
        vec![Diagnostic::UnreachableStates(unreachable)]
    }
}
