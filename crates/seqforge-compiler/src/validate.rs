use std::collections::HashMap;

use seqforge_ir::types::{is_no_response, SystemModel};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Empty model: system '{system}' has no transitions")]
    EmptyModel { system: String },

    #[error("Blank state name in transition {index}")]
    BlankState { index: usize },

    #[error("Blank received message in transition {index}")]
    BlankMessage { index: usize },
}

pub fn validate_model(model: &SystemModel) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    validate_not_empty(model, &mut errors);
    validate_names(model, &mut errors);
    for (index, first) in duplicate_transitions(model) {
        tracing::warn!(
            system = %model.name,
            index,
            first,
            "duplicate transition kept as a parallel edge"
        );
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_not_empty(model: &SystemModel, errors: &mut Vec<ValidationError>) {
    if model.transitions.is_empty() {
        errors.push(ValidationError::EmptyModel {
            system: model.name.clone(),
        });
    }
}

/// Check that every transition names its states and its trigger.
fn validate_names(model: &SystemModel, errors: &mut Vec<ValidationError>) {
    for (index, t) in model.transitions.iter().enumerate() {
        if t.from.trim().is_empty() || t.to.trim().is_empty() {
            errors.push(ValidationError::BlankState { index });
        }
        if t.received.trim().is_empty() {
            errors.push(ValidationError::BlankMessage { index });
        }
    }
}

/// Pairs `(index, first)` of unguarded transitions repeating an earlier one.
/// Transitions differing only in their guard or output are distinct. Copies
/// are legal: they become parallel edges of the coverage graph.
pub fn duplicate_transitions(model: &SystemModel) -> Vec<(usize, usize)> {
    let mut duplicates = Vec::new();
    let mut seen: HashMap<(&str, &str, String, String), usize> = HashMap::new();
    for (index, t) in model.transitions.iter().enumerate() {
        if t.guard.as_deref().is_some_and(|g| !g.trim().is_empty()) {
            continue;
        }
        let sent = if is_no_response(&t.sent) {
            String::new()
        } else {
            t.sent.to_uppercase()
        };
        let key = (t.from.as_str(), t.to.as_str(), t.received.to_uppercase(), sent);
        match seen.get(&key) {
            Some(first) => duplicates.push((index, *first)),
            None => {
                seen.insert(key, index);
            }
        }
    }
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqforge_ir::types::Transition;

    #[test]
    fn test_valid_model() {
        let model = SystemModel::new(
            "ok",
            vec![
                Transition::new("S0", "S1", "a", "no_response"),
                Transition::new("S1", "S0", "b", "out"),
            ],
        );
        assert!(validate_model(&model).is_ok());
    }

    #[test]
    fn test_empty_model() {
        let model = SystemModel::new("none", vec![]);
        let errors = validate_model(&model).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::EmptyModel {
                system: "none".into()
            }]
        );
    }

    #[test]
    fn test_blank_names_reported_together() {
        let model = SystemModel::new(
            "blank",
            vec![
                Transition::new(" ", "S1", "a", "no_response"),
                Transition::new("S1", "S0", "", "no_response"),
            ],
        );
        let errors = validate_model(&model).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(&ValidationError::BlankState { index: 0 }));
        assert!(errors.contains(&ValidationError::BlankMessage { index: 1 }));
    }

    #[test]
    fn test_copies_are_reported_but_accepted() {
        let model = SystemModel::new(
            "guards",
            vec![
                Transition::new("S0", "S1", "a", "no_response").with_guard("F1"),
                Transition::new("S0", "S1", "a", "no_response").with_guard("F2"),
                Transition::new("S1", "S0", "b", "no_response"),
                Transition::new("S1", "S0", "B", "no response"),
            ],
        );
        assert!(validate_model(&model).is_ok());
        // guarded copies are distinct, the sentinel spelling is not
        assert_eq!(duplicate_transitions(&model), vec![(3, 2)]);
    }
}
