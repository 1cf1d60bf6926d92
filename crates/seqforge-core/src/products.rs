//! Per-product generation for product-line models.
//!
//! Each product restricts the model to the transitions whose guard holds
//! under its feature assignment. Products are independent runs, so they are
//! generated in parallel (rayon) and reported in input order.

use rayon::prelude::*;

use seqforge_ir::config::GenerationConfig;
use seqforge_ir::types::{GuardEvaluator, SystemModel};

use crate::generate::{generate, GenerationError, GenerationReport};

#[derive(Debug)]
pub struct ProductReport {
    pub product: String,
    /// Transitions left after restricting the model to this product.
    pub transitions: usize,
    pub outcome: Result<GenerationReport, GenerationError>,
}

pub fn generate_for_products<G>(
    model: &SystemModel,
    products: &[(String, G)],
    config: &GenerationConfig,
) -> Vec<ProductReport>
where
    G: GuardEvaluator + Sync,
{
    products
        .par_iter()
        .map(|(name, evaluator)| {
            let restricted = model.restrict(evaluator);
            let outcome = generate(&restricted, config);
            if let Err(e) = &outcome {
                tracing::warn!(product = %name, error = %e, "product generation failed");
            }
            ProductReport {
                product: name.clone(),
                transitions: restricted.transitions.len(),
                outcome,
            }
        })
        .collect()
}
