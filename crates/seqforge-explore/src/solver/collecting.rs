//! Collecting: greedy folding of tuple automata into the full-system
//! automaton.
//!
//! Each pass starts from the full-system automaton and intersects it with as
//! many constraints as fit under the state ceiling and the batch size. The
//! shortest string of the accumulated product is a legal trace covering every
//! folded tuple. Monitoring then drops every remaining constraint the emitted
//! sequence happens to satisfy.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use serde::Serialize;

use seqforge_compiler::automaton::Automaton;
use seqforge_ir::config::GenerationConfig;

use super::rng::stage_rng;
use super::{Tuple, TupleConstraint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectingConfig {
    /// Stop folding once the accumulator has this many states.
    pub max_states: usize,
    /// Stop folding after this many tuples.
    pub batch_size: usize,
    pub monitoring: bool,
    /// Minimize the accumulator after each successful fold.
    pub minimize: bool,
    pub seed: u64,
}

impl Default for CollectingConfig {
    fn default() -> Self {
        Self {
            max_states: 150_000,
            batch_size: 10,
            monitoring: true,
            minimize: true,
            seed: 42,
        }
    }
}

impl From<&GenerationConfig> for CollectingConfig {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            max_states: config.max_states,
            batch_size: config.batch_size,
            monitoring: config.monitoring,
            minimize: config.minimize_products,
            seed: config.seed,
        }
    }
}

/// Result of a collecting run. Every input tuple ends up in exactly one of
/// `folded`, `incidental`, `infeasible` or `uncovered`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectingOutcome {
    /// Emitted sequences, in emission order.
    pub sequences: Vec<String>,
    /// Tuples folded into some emitted sequence.
    pub folded: Vec<Tuple>,
    /// Tuples pruned by monitoring.
    pub incidental: Vec<Tuple>,
    /// Tuples no legal trace can satisfy.
    pub infeasible: Vec<Tuple>,
    /// Feasible tuples left over when a pass made no progress.
    pub uncovered: Vec<Tuple>,
    pub passes: usize,
}

impl CollectingOutcome {
    pub fn covered(&self) -> impl Iterator<Item = &Tuple> {
        self.folded.iter().chain(self.incidental.iter())
    }

    pub fn covered_count(&self) -> usize {
        self.folded.len() + self.incidental.len()
    }

    pub fn total(&self) -> usize {
        self.covered_count() + self.infeasible.len() + self.uncovered.len()
    }
}

pub fn collect(
    full: &Automaton,
    constraints: Vec<TupleConstraint>,
    config: &CollectingConfig,
) -> CollectingOutcome {
    let mut outcome = CollectingOutcome::default();
    let mut work = constraints;
    // tuples known to be satisfiable by the full system on their own
    let mut feasible: HashSet<Tuple> = HashSet::new();

    tracing::info!(
        tuples = work.len(),
        max_states = config.max_states,
        batch_size = config.batch_size,
        monitoring = config.monitoring,
        "collecting started"
    );

    while !work.is_empty() {
        let before = work.len();
        let mut order: Vec<usize> = (0..work.len()).collect();
        order.shuffle(&mut stage_rng(config.seed, outcome.passes as u64));

        let mut acc = full.clone();
        let mut removed = vec![false; work.len()];
        let mut batch = 0;

        for &i in &order {
            let constraint = &work[i];
            let candidate = acc.intersect(&constraint.automaton);

            if !candidate.is_empty() {
                acc = if config.minimize {
                    candidate.minimize()
                } else {
                    candidate
                };
                removed[i] = true;
                batch += 1;
                feasible.insert(constraint.tuple.clone());
                outcome.folded.push(constraint.tuple.clone());
                tracing::debug!(tuple = %constraint.tuple, states = acc.state_count(), "folded");
            } else if feasible.contains(&constraint.tuple)
                || full.language_nonempty_intersection(&constraint.automaton)
            {
                feasible.insert(constraint.tuple.clone());
                tracing::debug!(tuple = %constraint.tuple, "deferred to a later pass");
            } else {
                removed[i] = true;
                outcome.infeasible.push(constraint.tuple.clone());
                tracing::debug!(tuple = %constraint.tuple, "infeasible");
            }

            if acc.state_count() >= config.max_states {
                tracing::debug!(states = acc.state_count(), "state ceiling reached");
                break;
            }
            if batch >= config.batch_size {
                break;
            }
        }

        let mut index = 0;
        work.retain(|_| {
            let keep = !removed[index];
            index += 1;
            keep
        });

        if let Some(sequence) = acc.shortest_accepted_string().filter(|s| !s.is_empty()) {
            if config.monitoring {
                let incidental = &mut outcome.incidental;
                work.retain(|c| {
                    if c.is_satisfied_by(&sequence) {
                        tracing::debug!(tuple = %c.tuple, "covered incidentally");
                        incidental.push(c.tuple.clone());
                        false
                    } else {
                        true
                    }
                });
            }
            tracing::info!(
                pass = outcome.passes,
                folded = batch,
                length = sequence.chars().count(),
                remaining = work.len(),
                "emitted sequence"
            );
            outcome.sequences.push(sequence);
        }

        outcome.passes += 1;
        if work.len() == before {
            break;
        }
    }

    outcome.uncovered = work.into_iter().map(|c| c.tuple).collect();
    if !outcome.uncovered.is_empty() {
        tracing::warn!(uncovered = outcome.uncovered.len(), "collecting stopped without progress");
    }
    tracing::info!(
        sequences = outcome.sequences.len(),
        covered = outcome.covered_count(),
        infeasible = outcome.infeasible.len(),
        passes = outcome.passes,
        "collecting finished"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::tuples::{constraint_automata, enumerate_tuples};
    use seqforge_compiler::alphabet::Alphabet;
    use seqforge_ir::config::Strength;
    use seqforge_ir::types::Transition;

    fn line() -> Automaton {
        // S0 -A-> S1 -B-> S2, no way back
        let transitions = vec![
            Transition::new("S0", "S1", "A", "no_response"),
            Transition::new("S1", "S2", "B", "no_response"),
        ];
        Automaton::from_transitions(&transitions, &Alphabet::assign(["A", "B"])).unwrap()
    }

    #[test]
    fn test_infeasible_tuples_are_dropped_with_a_count() {
        let tuples = enumerate_tuples(&['A', 'B'], Strength::Pairwise, true);
        let constraints = constraint_automata(&tuples, false).unwrap();
        let outcome = collect(&line(), constraints, &CollectingConfig::default());

        assert_eq!(outcome.sequences, vec!["AB".to_string()]);
        assert_eq!(outcome.folded, vec![Tuple(vec!['A', 'B'])]);
        let mut infeasible = outcome.infeasible.clone();
        infeasible.sort();
        assert_eq!(
            infeasible,
            vec![
                Tuple(vec!['A', 'A']),
                Tuple(vec!['B', 'A']),
                Tuple(vec!['B', 'B'])
            ]
        );
        assert_eq!(outcome.total(), 4);
    }

    #[test]
    fn test_batch_size_one_emits_per_tuple() {
        let tuples = vec![Tuple(vec!['A']), Tuple(vec!['B'])];
        let constraints = constraint_automata(&tuples, false).unwrap();
        let config = CollectingConfig {
            batch_size: 1,
            monitoring: false,
            ..Default::default()
        };
        let outcome = collect(&line(), constraints, &config);
        assert_eq!(outcome.sequences.len(), 2);
        assert_eq!(outcome.folded.len(), 2);
        assert!(outcome.incidental.is_empty());
    }

    #[test]
    fn test_monitoring_prunes_incidental_tuples() {
        let tuples = vec![Tuple(vec!['B']), Tuple(vec!['A'])];
        let constraints = constraint_automata(&tuples, false).unwrap();
        let config = CollectingConfig {
            batch_size: 1,
            ..Default::default()
        };
        let outcome = collect(&line(), constraints, &config);
        // folding B first emits "AB", which also covers A
        assert_eq!(outcome.covered_count(), 2);
        assert!(outcome.uncovered.is_empty());
        assert!(outcome.sequences.len() <= 2);
    }

    #[test]
    fn test_empty_work_list() {
        let outcome = collect(&line(), Vec::new(), &CollectingConfig::default());
        assert!(outcome.sequences.is_empty());
        assert_eq!(outcome.passes, 0);
    }
}
