pub mod config;
pub mod parse;
pub mod types;

pub use config::{GenerationConfig, RepairMode, Strategy, Strength};
pub use types::{GuardEvaluator, SystemModel, Transition};
