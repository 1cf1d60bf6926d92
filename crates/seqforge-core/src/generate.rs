//! Sequence generation entry point.
//!
//! One call is one independent run: it compiles the model, builds the tuple
//! constraints, dispatches on the strategy and measures the resulting suite.
//! Nothing is shared between calls.

use std::collections::HashSet;

use serde::Serialize;

use seqforge_compiler::alphabet::{Alphabet, AlphabetError, Symbol};
use seqforge_compiler::automaton::AutomatonError;
use seqforge_compiler::graph::{CoverageGraph, EdgeId};
use seqforge_compiler::{compile, CompileError, CompiledModel};
use seqforge_explore::routing::postman::transition_coverage;
use seqforge_explore::routing::tour::state_coverage;
use seqforge_explore::solver::collecting::{collect, CollectingConfig};
use seqforge_explore::solver::coverage::covered_tuples;
use seqforge_explore::solver::repair::repair;
use seqforge_explore::solver::standard::standard_cit;
use seqforge_explore::solver::tuples::{constraint_automata, enumerate_tuples, sample_tuples};
use seqforge_explore::solver::{Tuple, TupleConstraint};
use seqforge_ir::config::{ConfigError, GenerationConfig, Strategy, Strength};
use seqforge_ir::types::SystemModel;

use crate::analytics::SuiteStatistics;
use crate::export::{decoded, render_sequence_file, ExportError};

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Compilation failed: {0}")]
    Compile(#[from] CompileError),

    #[error("Tuple automaton error: {0}")]
    Automaton(#[from] AutomatonError),

    #[error("Alphabet error: {0}")]
    Alphabet(#[from] AlphabetError),

    #[error("Reset message '{0}' is not a message of the model")]
    UnknownResetMessage(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub system: String,
    pub strategy: Strategy,
    pub strength: Strength,
    pub alphabet: Alphabet,
    /// Generated sequences, deduplicated, in generation order.
    pub sequences: Vec<String>,
    pub stats: SuiteStatistics,
    /// Satisfiable tuples the suite does not cover.
    pub uncovered_tuples: Vec<Tuple>,
    /// Tuples no legal trace can satisfy.
    pub infeasible_tuples: Vec<Tuple>,
    /// Why a route or tour strategy produced nothing.
    pub inapplicable: Option<String>,
}

impl GenerationReport {
    /// Lower-cased message names of every sequence.
    pub fn decoded(&self) -> Result<Vec<Vec<String>>, ExportError> {
        decoded(&self.sequences, &self.alphabet)
    }

    /// The sequence file for this suite.
    pub fn render(&self) -> Result<String, ExportError> {
        render_sequence_file(&self.sequences, &self.alphabet)
    }
}

pub fn generate(model: &SystemModel, config: &GenerationConfig) -> Result<GenerationReport, GenerationError> {
    config.validate()?;
    let compiled = compile(model)?;
    let constraints = build_constraints(&compiled, config)?;

    let start = config
        .start_state
        .clone()
        .or_else(|| model.initial_state().map(str::to_string))
        .unwrap_or_default();
    let reset = reset_symbol(&compiled.alphabet, config)?;

    tracing::info!(
        system = %model.name,
        strategy = %config.strategy,
        tuples = constraints.len(),
        "generation started"
    );

    let mut sequences = Vec::new();
    let mut inapplicable = None;
    let mut classified = None;

    match config.strategy {
        Strategy::OnlyConstraint => {
            let outcome = collect(
                &compiled.automaton,
                constraints.clone(),
                &CollectingConfig::from(config),
            );
            sequences = outcome.sequences;
            classified = Some((outcome.uncovered, outcome.infeasible));
        }
        Strategy::StandardCit => {
            let outcome = standard_cit(constraints.clone(), &CollectingConfig::from(config));
            sequences = outcome.sequences;
        }
        Strategy::TransitionsCoverage => {
            match transition_coverage(&compiled.graph, &start, config.split) {
                Ok(segments) => {
                    for segment in segments {
                        let mut sequence: String = reset.into_iter().collect();
                        sequence.push_str(&encode_edges(&compiled.graph, &compiled.alphabet, &segment)?);
                        sequences.push(sequence);
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "route inspection inapplicable");
                    inapplicable = Some(e.to_string());
                }
            }
        }
        Strategy::StatesCoverage => {
            match state_coverage(&compiled.graph, &start, config.exact_tour_limit) {
                Ok(tour) => {
                    if !tour.walk.is_empty() {
                        sequences.push(encode_edges(
                            &compiled.graph,
                            &compiled.alphabet,
                            &tour.walk.edges,
                        )?);
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "state tour inapplicable");
                    inapplicable = Some(e.to_string());
                }
            }
        }
    }

    let mut seen = HashSet::new();
    sequences.retain(|s| seen.insert(s.clone()));

    let (uncovered_tuples, infeasible_tuples) = match classified {
        Some(lists) => lists,
        None => classify_tuples(&compiled, &constraints, &sequences, config),
    };

    let stats = SuiteStatistics::measure(&compiled, &constraints, &sequences, config.repair_mode);
    tracing::info!(
        system = %model.name,
        sequences = stats.sequences,
        total_length = stats.total_length,
        covered_tuples = stats.covered_tuples,
        valid_tuples = stats.valid_tuples,
        "generation finished"
    );

    Ok(GenerationReport {
        system: compiled.system.clone(),
        strategy: config.strategy,
        strength: config.strength,
        alphabet: compiled.alphabet,
        sequences,
        stats,
        uncovered_tuples,
        infeasible_tuples,
        inapplicable,
    })
}

/// Statistics for a suite produced elsewhere, e.g. an imported covering array.
pub fn assess(
    model: &SystemModel,
    sequences: &[String],
    config: &GenerationConfig,
) -> Result<SuiteStatistics, GenerationError> {
    config.validate()?;
    let compiled = compile(model)?;
    let constraints = build_constraints(&compiled, config)?;
    Ok(SuiteStatistics::measure(
        &compiled,
        &constraints,
        sequences,
        config.repair_mode,
    ))
}

fn build_constraints(
    compiled: &CompiledModel,
    config: &GenerationConfig,
) -> Result<Vec<TupleConstraint>, GenerationError> {
    let tuples = enumerate_tuples(
        &compiled.alphabet.tuple_symbols(),
        config.strength,
        config.allow_repetitions,
    );
    let tuples = sample_tuples(tuples, config.seed, config.tuple_limit);
    Ok(constraint_automata(&tuples, config.exclude_last_in_gap)?)
}

fn reset_symbol(alphabet: &Alphabet, config: &GenerationConfig) -> Result<Option<Symbol>, GenerationError> {
    match (&config.reset_message, config.split) {
        (Some(message), true) => alphabet
            .symbol(message)
            .map(Some)
            .ok_or_else(|| GenerationError::UnknownResetMessage(message.clone())),
        _ => Ok(None),
    }
}

fn encode_edges(graph: &CoverageGraph, alphabet: &Alphabet, edges: &[EdgeId]) -> Result<String, AlphabetError> {
    let messages: Vec<&str> = edges
        .iter()
        .filter_map(|e| graph.edge(*e))
        .map(|edge| edge.message.as_str())
        .collect();
    alphabet.encode(&messages)
}

/// Split the tuples a suite misses into satisfiable and unsatisfiable ones,
/// judging coverage on the repaired sequences.
fn classify_tuples(
    compiled: &CompiledModel,
    constraints: &[TupleConstraint],
    sequences: &[String],
    config: &GenerationConfig,
) -> (Vec<Tuple>, Vec<Tuple>) {
    let repaired: Vec<String> = sequences
        .iter()
        .map(|s| repair(s, &compiled.automaton, config.repair_mode))
        .collect();
    let covered: HashSet<&Tuple> = covered_tuples(constraints, &repaired).into_iter().collect();

    let mut uncovered = Vec::new();
    let mut infeasible = Vec::new();
    for c in constraints {
        if !compiled.automaton.language_nonempty_intersection(&c.automaton) {
            infeasible.push(c.tuple.clone());
        } else if !covered.contains(&c.tuple) {
            uncovered.push(c.tuple.clone());
        }
    }
    (uncovered, infeasible)
}
