pub mod collecting;
pub mod coverage;
pub mod repair;
pub mod rng;
pub mod standard;
pub mod tuples;

use serde::{Deserialize, Serialize};

use seqforge_compiler::alphabet::{Alphabet, AlphabetError, Symbol};
use seqforge_compiler::automaton::{Automaton, AutomatonError};

/// An ordered pair or triad of symbols that must occur, in order, in some
/// sequence of the suite.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tuple(pub Vec<Symbol>);

impl Tuple {
    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }

    pub fn arity(&self) -> usize {
        self.0.len()
    }

    /// Message names of the members, in order.
    pub fn decode(&self, alphabet: &Alphabet) -> Result<Vec<String>, AlphabetError> {
        alphabet.decode(&self.to_string())
    }
}

impl std::fmt::Display for Tuple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for symbol in &self.0 {
            write!(f, "{symbol}")?;
        }
        Ok(())
    }
}

/// A tuple together with the automaton recognizing it.
#[derive(Debug, Clone)]
pub struct TupleConstraint {
    pub tuple: Tuple,
    pub automaton: Automaton,
}

impl TupleConstraint {
    pub fn new(tuple: Tuple, exclude_last_in_gap: bool) -> Result<Self, AutomatonError> {
        let automaton = Automaton::from_ordered_pattern(tuple.symbols(), exclude_last_in_gap)?;
        Ok(Self { tuple, automaton })
    }

    pub fn is_satisfied_by(&self, sequence: &str) -> bool {
        self.automaton.accepts(sequence)
    }
}
