pub mod analytics;
pub mod export;
pub mod generate;
pub mod products;

pub use analytics::SuiteStatistics;
pub use generate::{assess, generate, GenerationError, GenerationReport};
pub use products::{generate_for_products, ProductReport};
