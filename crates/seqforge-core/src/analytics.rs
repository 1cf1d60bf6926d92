//! Suite statistics.
//!
//! Lengths are measured on the sequences as generated. Coverage is measured
//! on their repaired form, so a raw string that is not a legal trace only
//! contributes what survives repair.

use serde::{Deserialize, Serialize};

use seqforge_compiler::CompiledModel;
use seqforge_explore::solver::coverage::{
    covered_states, covered_transitions, covered_tuples, valid_tuple_count,
};
use seqforge_explore::solver::repair::repair;
use seqforge_explore::solver::TupleConstraint;
use seqforge_ir::config::RepairMode;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuiteStatistics {
    /// Number of sequences in the suite.
    pub sequences: usize,
    /// Sum of all sequence lengths, in messages.
    pub total_length: usize,
    /// Mean sequence length (0.0 for an empty suite).
    pub average_length: f64,
    /// Shortest sequence length (0 for an empty suite).
    pub min_length: usize,
    /// Longest sequence length.
    pub max_length: usize,
    /// Sequences accepted by the full-system automaton as they are.
    pub valid_sequences: usize,
    /// Tuples targeted.
    pub total_tuples: usize,
    /// Targeted tuples some legal trace can satisfy.
    pub valid_tuples: usize,
    /// Targeted tuples satisfied by the repaired suite.
    pub covered_tuples: usize,
    /// States of the full-system automaton.
    pub total_states: usize,
    /// States visited by the repaired suite.
    pub covered_states: usize,
    /// Transitions of the full-system automaton.
    pub total_transitions: usize,
    /// Transitions taken by the repaired suite.
    pub covered_transitions: usize,
}

impl SuiteStatistics {
    pub fn measure(
        compiled: &CompiledModel,
        constraints: &[TupleConstraint],
        sequences: &[String],
        repair_mode: RepairMode,
    ) -> Self {
        let full = &compiled.automaton;
        let lengths: Vec<usize> = sequences.iter().map(|s| s.chars().count()).collect();
        let total_length: usize = lengths.iter().sum();

        let repaired: Vec<String> = sequences
            .iter()
            .map(|s| repair(s, full, repair_mode))
            .collect();

        Self {
            sequences: sequences.len(),
            total_length,
            average_length: if lengths.is_empty() {
                0.0
            } else {
                total_length as f64 / lengths.len() as f64
            },
            min_length: lengths.iter().copied().min().unwrap_or(0),
            max_length: lengths.iter().copied().max().unwrap_or(0),
            valid_sequences: sequences.iter().filter(|s| full.accepts(s)).count(),
            total_tuples: constraints.len(),
            valid_tuples: valid_tuple_count(full, constraints),
            covered_tuples: covered_tuples(constraints, &repaired).len(),
            total_states: full.state_count(),
            covered_states: covered_states(full, &repaired).len(),
            total_transitions: full.edge_count(),
            covered_transitions: covered_transitions(full, &repaired).len(),
        }
    }

    /// Covered share of the valid tuples (1.0 when none is valid).
    pub fn tuple_coverage(&self) -> f64 {
        ratio(self.covered_tuples, self.valid_tuples)
    }

    pub fn state_coverage(&self) -> f64 {
        ratio(self.covered_states, self.total_states)
    }

    pub fn transition_coverage(&self) -> f64 {
        ratio(self.covered_transitions, self.total_transitions)
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        1.0
    } else {
        part as f64 / whole as f64
    }
}
