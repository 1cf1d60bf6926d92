use seqforge_ir::types::SystemModel;

use crate::alphabet::Alphabet;
use crate::automaton::{Automaton, AutomatonError};
use crate::graph::CoverageGraph;
use crate::validate::{validate_model, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("Validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Validation(Vec<ValidationError>),

    #[error("Automaton construction error: {0}")]
    Automaton(#[from] AutomatonError),
}

/// Everything one generation run derives from the model. Owned by that run.
#[derive(Debug, Clone)]
pub struct CompiledModel {
    pub system: String,
    pub alphabet: Alphabet,
    pub automaton: Automaton,
    pub graph: CoverageGraph,
}

pub fn compile(model: &SystemModel) -> Result<CompiledModel, CompileError> {
    // 1. Validate
    validate_model(model).map_err(CompileError::Validation)?;

    // 2. Assign symbols
    let alphabet = Alphabet::from_model(model);

    // 3. Full-system automaton and state graph
    let automaton = Automaton::from_transitions(&model.transitions, &alphabet)?;
    let graph = CoverageGraph::from_transitions(&model.transitions);

    tracing::debug!(
        system = %model.name,
        messages = alphabet.len(),
        states = automaton.state_count(),
        transitions = automaton.edge_count(),
        "compiled model"
    );

    Ok(CompiledModel {
        system: model.name.clone(),
        alphabet,
        automaton,
        graph,
    })
}
