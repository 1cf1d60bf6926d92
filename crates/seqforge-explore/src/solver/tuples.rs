//! Combinatorial tuple enumeration.

use rand::seq::SliceRandom;

use seqforge_compiler::alphabet::Symbol;
use seqforge_compiler::automaton::AutomatonError;
use seqforge_ir::config::Strength;

use super::rng::{stage_rng, SAMPLE_STAGE};
use super::{Tuple, TupleConstraint};

/// Every ordered tuple of `strength.arity()` symbols, in lexicographic order
/// of positions in `symbols`. Without repetitions all members are distinct.
pub fn enumerate_tuples(symbols: &[Symbol], strength: Strength, allow_repetitions: bool) -> Vec<Tuple> {
    let arity = strength.arity();
    let mut tuples = Vec::new();
    let mut current = Vec::with_capacity(arity);
    extend(symbols, arity, allow_repetitions, &mut current, &mut tuples);
    tuples
}

fn extend(
    symbols: &[Symbol],
    arity: usize,
    allow_repetitions: bool,
    current: &mut Vec<Symbol>,
    out: &mut Vec<Tuple>,
) {
    if current.len() == arity {
        out.push(Tuple(current.clone()));
        return;
    }
    for &symbol in symbols {
        if !allow_repetitions && current.contains(&symbol) {
            continue;
        }
        current.push(symbol);
        extend(symbols, arity, allow_repetitions, current, out);
        current.pop();
    }
}

/// Keep a seeded random sample of `limit` tuples. `limit == 0` keeps all of
/// them in enumeration order.
pub fn sample_tuples(mut tuples: Vec<Tuple>, seed: u64, limit: usize) -> Vec<Tuple> {
    if limit == 0 || limit >= tuples.len() {
        return tuples;
    }
    tuples.shuffle(&mut stage_rng(seed, SAMPLE_STAGE));
    tuples.truncate(limit);
    tuples
}

pub fn constraint_automata(
    tuples: &[Tuple],
    exclude_last_in_gap: bool,
) -> Result<Vec<TupleConstraint>, AutomatonError> {
    tuples
        .iter()
        .map(|t| TupleConstraint::new(t.clone(), exclude_last_in_gap))
        .collect()
}
