//! Turning raw strings into legal traces.

use seqforge_compiler::automaton::Automaton;
use seqforge_ir::config::RepairMode;

/// Repair `sequence` against `model`. The result is always accepted by
/// `model`, or empty. Repairing a repaired sequence changes nothing.
pub fn repair(sequence: &str, model: &Automaton, mode: RepairMode) -> String {
    match mode {
        RepairMode::SkipError => skip_errors(sequence, model),
        RepairMode::StopAtError => stop_at_error(sequence, model),
        RepairMode::RejectNotValid => {
            if model.accepts(sequence) {
                sequence.to_string()
            } else {
                String::new()
            }
        }
    }
}

fn skip_errors(sequence: &str, model: &Automaton) -> String {
    let mut kept = String::new();
    let mut current = model.start_set();
    for symbol in sequence.chars() {
        let next = model.advance(&current, symbol);
        if model.any_accepting(&next) {
            kept.push(symbol);
            current = next;
        }
    }
    kept
}

fn stop_at_error(sequence: &str, model: &Automaton) -> String {
    let mut current = model.start_set();
    if !model.any_accepting(&current) {
        return String::new();
    }
    let mut kept = String::new();
    for symbol in sequence.chars() {
        let next = model.advance(&current, symbol);
        if !model.any_accepting(&next) {
            break;
        }
        kept.push(symbol);
        current = next;
    }
    kept
}
