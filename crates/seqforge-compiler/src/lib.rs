pub mod alphabet;
pub mod automaton;
pub mod compile;
pub mod graph;
pub mod minimize;
pub mod validate;

pub use alphabet::{Alphabet, AlphabetError, Symbol};
pub use automaton::{Automaton, AutomatonError, StateId, Step};
pub use compile::{compile, CompileError, CompiledModel};
pub use graph::{CoverageGraph, EdgeId, GraphEdge, VertexId};
