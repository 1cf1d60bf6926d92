//! Coverage measurement of a finished suite.
//!
//! - **tuples**: a tuple is covered when some sequence satisfies its automaton.
//! - **states / transitions**: visited by the accepting run of some sequence
//!   through the full-system automaton. Rejected sequences cover nothing.

use std::collections::BTreeSet;

use seqforge_compiler::alphabet::Symbol;
use seqforge_compiler::automaton::{Automaton, StateId};

use super::{Tuple, TupleConstraint};

/// Tuples satisfied by at least one of `sequences`, in constraint order.
pub fn covered_tuples<'a>(constraints: &'a [TupleConstraint], sequences: &[String]) -> Vec<&'a Tuple> {
    constraints
        .iter()
        .filter(|c| sequences.iter().any(|s| c.is_satisfied_by(s)))
        .map(|c| &c.tuple)
        .collect()
}

/// Number of tuples some legal trace can satisfy.
pub fn valid_tuple_count(full: &Automaton, constraints: &[TupleConstraint]) -> usize {
    constraints
        .iter()
        .filter(|c| full.language_nonempty_intersection(&c.automaton))
        .count()
}

/// States visited by the runs of `sequences`, initial state included.
/// Empty sequences visit nothing.
pub fn covered_states(full: &Automaton, sequences: &[String]) -> BTreeSet<StateId> {
    let mut states = BTreeSet::new();
    for sequence in sequences.iter().filter(|s| !s.is_empty()) {
        if let Some(steps) = full.run(sequence) {
            for step in steps {
                states.insert(step.from);
                states.insert(step.to);
            }
        }
    }
    states
}

pub fn covered_transitions(
    full: &Automaton,
    sequences: &[String],
) -> BTreeSet<(StateId, Symbol, StateId)> {
    let mut transitions = BTreeSet::new();
    for sequence in sequences {
        if let Some(steps) = full.run(sequence) {
            transitions.extend(steps.into_iter().map(|s| (s.from, s.symbol, s.to)));
        }
    }
    transitions
}
