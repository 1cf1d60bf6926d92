//! Generation configuration.
//!
//! One explicit struct passed into every entry point. Every field has a
//! default so partial JSON documents are accepted.

use serde::{Deserialize, Serialize};

/// Largest vertex count the exact tour solver is ever allowed to take on.
/// The DP table grows as `2^n * n`.
pub const MAX_EXACT_TOUR_LIMIT: usize = 20;

/// How the test sequences are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Collecting over the full-system automaton: only valid traces.
    OnlyConstraint,
    /// Blind tuple folding, repaired afterwards.
    StandardCit,
    /// Route inspection over the state graph.
    TransitionsCoverage,
    /// Tour over the state graph.
    StatesCoverage,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::OnlyConstraint => write!(f, "ONLY_CONSTRAINT"),
            Strategy::StandardCit => write!(f, "STANDARD_CIT"),
            Strategy::TransitionsCoverage => write!(f, "TRANSITIONS_COVERAGE"),
            Strategy::StatesCoverage => write!(f, "STATES_COVERAGE"),
        }
    }
}

/// Tuple strength of the combinatorial criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    Pairwise,
    Threewise,
}

impl Strength {
    pub fn arity(self) -> usize {
        match self {
            Strength::Pairwise => 2,
            Strength::Threewise => 3,
        }
    }

    pub fn from_arity(arity: usize) -> Option<Self> {
        match arity {
            2 => Some(Strength::Pairwise),
            3 => Some(Strength::Threewise),
            _ => None,
        }
    }

    /// Plural noun used in reports ("pairs" / "triads").
    pub fn noun(self) -> &'static str {
        match self {
            Strength::Pairwise => "pairs",
            Strength::Threewise => "triads",
        }
    }
}

/// Policy turning a possibly-invalid string into a valid trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairMode {
    /// Drop every symbol that would make the kept prefix invalid.
    SkipError,
    /// Truncate at the first invalid prefix.
    StopAtError,
    /// Keep the whole string only if it is valid.
    RejectNotValid,
}

impl std::fmt::Display for RepairMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepairMode::SkipError => write!(f, "SKIP_ERROR"),
            RepairMode::StopAtError => write!(f, "STOP_AT_ERROR"),
            RepairMode::RejectNotValid => write!(f, "REJECT_NOT_VALID"),
        }
    }
}

/// Configuration for a single generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub strategy: Strategy,
    pub strength: Strength,
    /// Allow tuples that repeat a message (`AA`, `ABA`).
    pub allow_repetitions: bool,
    /// Forbid the last tuple member inside the gap right before it.
    pub exclude_last_in_gap: bool,
    pub repair_mode: RepairMode,
    /// Prune tuples incidentally covered by each emitted sequence.
    pub monitoring: bool,
    /// State ceiling for the accumulated product automaton.
    pub max_states: usize,
    /// Maximum number of tuples folded into one sequence.
    pub batch_size: usize,
    /// Minimize the accumulator after every successful fold.
    pub minimize_products: bool,
    /// Keep only the first N tuples after shuffling (0 = all).
    pub tuple_limit: usize,
    /// Seed for every shuffle of the run.
    pub seed: u64,
    /// State every route/tour starts from. Defaults to the model's initial state.
    pub start_state: Option<String>,
    /// Message prefixed to every split segment.
    pub reset_message: Option<String>,
    /// Split the transition-coverage walk at each return to the start state.
    pub split: bool,
    /// Largest graph handed to the exact tour solver.
    pub exact_tour_limit: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::OnlyConstraint,
            strength: Strength::Pairwise,
            allow_repetitions: true,
            exclude_last_in_gap: false,
            repair_mode: RepairMode::SkipError,
            monitoring: true,
            max_states: 150_000,
            batch_size: 10,
            minimize_products: true,
            tuple_limit: 0,
            seed: 42,
            start_state: None,
            reset_message: None,
            split: false,
            exact_tour_limit: 12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("batch_size must be at least 1")]
    ZeroBatchSize,

    #[error("max_states must be at least 1")]
    ZeroMaxStates,

    #[error("exact_tour_limit {limit} exceeds the maximum of {max}")]
    TourLimitTooLarge { limit: usize, max: usize },

    #[error("split requires a reset_message")]
    SplitWithoutReset,
}

impl GenerationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        if self.max_states == 0 {
            return Err(ConfigError::ZeroMaxStates);
        }
        if self.exact_tour_limit > MAX_EXACT_TOUR_LIMIT {
            return Err(ConfigError::TourLimitTooLarge {
                limit: self.exact_tour_limit,
                max: MAX_EXACT_TOUR_LIMIT,
            });
        }
        if self.split && self.reset_message.is_none() {
            return Err(ConfigError::SplitWithoutReset);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(GenerationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_batch() {
        let config = GenerationConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroBatchSize));
    }

    #[test]
    fn test_split_needs_reset() {
        let config = GenerationConfig {
            split: true,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::SplitWithoutReset));
    }

    #[test]
    fn test_strength_arity_round_trip() {
        for s in [Strength::Pairwise, Strength::Threewise] {
            assert_eq!(Strength::from_arity(s.arity()), Some(s));
        }
        assert_eq!(Strength::from_arity(4), None);
    }
}
