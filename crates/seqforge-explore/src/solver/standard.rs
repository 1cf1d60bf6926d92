//! Standard combinatorial folding.
//!
//! Tuple automata are intersected with each other only, in fixed batches,
//! without looking at the full-system automaton. The emitted strings are not
//! necessarily legal traces and are meant to go through the repairer.

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use serde::Serialize;

use seqforge_compiler::automaton::Automaton;

use super::collecting::CollectingConfig;
use super::rng::{stage_rng, STANDARD_STAGE};
use super::TupleConstraint;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StandardOutcome {
    pub sequences: Vec<String>,
    pub batches: usize,
}

pub fn standard_cit(constraints: Vec<TupleConstraint>, config: &CollectingConfig) -> StandardOutcome {
    let mut shuffled = constraints;
    shuffled.shuffle(&mut stage_rng(config.seed, STANDARD_STAGE));
    let mut work: VecDeque<TupleConstraint> = shuffled.into();
    let mut outcome = StandardOutcome::default();

    while !work.is_empty() {
        let take = config.batch_size.min(work.len());
        let mut product: Option<Automaton> = None;

        for constraint in work.drain(..take) {
            product = Some(match product {
                None => constraint.automaton,
                Some(current) => {
                    let next = current.intersect(&constraint.automaton);
                    if next.is_empty() {
                        tracing::debug!(tuple = %constraint.tuple, "fold skipped");
                        current
                    } else if config.minimize {
                        next.minimize()
                    } else {
                        next
                    }
                }
            });
        }
        outcome.batches += 1;

        let sequence = product
            .and_then(|p| p.shortest_accepted_string())
            .filter(|s| !s.is_empty());
        if let Some(sequence) = sequence {
            if config.monitoring {
                work.retain(|c| !c.is_satisfied_by(&sequence));
            }
            tracing::debug!(
                batch = outcome.batches,
                length = sequence.chars().count(),
                remaining = work.len(),
                "emitted raw sequence"
            );
            outcome.sequences.push(sequence);
        }
    }

    tracing::info!(
        sequences = outcome.sequences.len(),
        batches = outcome.batches,
        "standard folding finished"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::tuples::{constraint_automata, enumerate_tuples};
    use seqforge_ir::config::Strength;

    #[test]
    fn test_every_tuple_in_some_sequence() {
        let tuples = enumerate_tuples(&['A', 'B', 'C'], Strength::Pairwise, false);
        let constraints = constraint_automata(&tuples, false).unwrap();
        let outcome = standard_cit(constraints.clone(), &CollectingConfig::default());
        for c in &constraints {
            assert!(
                outcome.sequences.iter().any(|s| c.is_satisfied_by(s)),
                "{} not covered",
                c.tuple
            );
        }
    }

    #[test]
    fn test_batches_follow_batch_size() {
        let tuples = enumerate_tuples(&['A', 'B', 'C'], Strength::Pairwise, true);
        let constraints = constraint_automata(&tuples, false).unwrap();
        let config = CollectingConfig {
            batch_size: 2,
            monitoring: false,
            ..Default::default()
        };
        let outcome = standard_cit(constraints, &config);
        assert_eq!(outcome.batches, 5);
        assert_eq!(outcome.sequences.len(), 5);
    }

    #[test]
    fn test_seeded_order_is_reproducible() {
        let tuples = enumerate_tuples(&['A', 'B', 'C'], Strength::Threewise, true);
        let constraints = constraint_automata(&tuples, false).unwrap();
        let config = CollectingConfig {
            batch_size: 4,
            ..Default::default()
        };
        let a = standard_cit(constraints.clone(), &config);
        let b = standard_cit(constraints, &config);
        assert_eq!(a, b);
    }
}
