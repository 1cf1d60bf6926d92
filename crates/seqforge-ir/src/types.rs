use serde::{Deserialize, Serialize};

/// Sentinel used by state machines for "this transition sends nothing".
pub const NO_RESPONSE: &str = "no_response";

/// Returns true for every spelling of the no-response sentinel
/// (`no_response`, `NO RESPONSE`, ...).
pub fn is_no_response(message: &str) -> bool {
    let normalized: String = message
        .trim()
        .chars()
        .map(|c| if c == ' ' { '_' } else { c.to_ascii_lowercase() })
        .collect();
    normalized == NO_RESPONSE
}

/// One transition of the parsed state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: String,
    pub to: String,
    /// Message that triggers the transition.
    pub received: String,
    /// Output event emitted when the transition fires.
    #[serde(default = "default_sent")]
    pub sent: String,
    /// Guard condition over product features, unevaluated.
    #[serde(default)]
    pub guard: Option<String>,
}

fn default_sent() -> String {
    NO_RESPONSE.to_string()
}

impl Transition {
    pub fn new(from: &str, to: &str, received: &str, sent: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            received: received.to_string(),
            sent: sent.to_string(),
            guard: None,
        }
    }

    pub fn with_guard(mut self, guard: &str) -> Self {
        self.guard = Some(guard.to_string());
        self
    }
}

/// An ordered transition list plus the system name used in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemModel {
    pub name: String,
    pub transitions: Vec<Transition>,
}

impl SystemModel {
    pub fn new(name: &str, transitions: Vec<Transition>) -> Self {
        Self {
            name: name.to_string(),
            transitions,
        }
    }

    /// Distinct state names in first-seen order.
    pub fn state_names(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        let mut names = Vec::new();
        for t in &self.transitions {
            for name in [t.from.as_str(), t.to.as_str()] {
                if seen.insert(name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Name of the state the model starts in: the source of the first transition.
    pub fn initial_state(&self) -> Option<&str> {
        self.transitions.first().map(|t| t.from.as_str())
    }

    /// Keep only the transitions whose guard holds for one product.
    /// Unguarded transitions are always kept.
    pub fn restrict<G: GuardEvaluator + ?Sized>(&self, evaluator: &G) -> SystemModel {
        let transitions = self
            .transitions
            .iter()
            .filter(|t| match t.guard.as_deref() {
                None => true,
                Some(g) if g.trim().is_empty() => true,
                Some(g) => evaluator.evaluate(g),
            })
            .cloned()
            .collect();
        SystemModel {
            name: self.name.clone(),
            transitions,
        }
    }
}

/// Boundary to the guard-expression evaluator. One evaluator stands for one
/// product (feature assignment) of a product line.
pub trait GuardEvaluator {
    fn evaluate(&self, guard: &str) -> bool;
}

impl<F> GuardEvaluator for F
where
    F: Fn(&str) -> bool,
{
    fn evaluate(&self, guard: &str) -> bool {
        self(guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_response_spellings() {
        assert!(is_no_response("no_response"));
        assert!(is_no_response("NO RESPONSE"));
        assert!(is_no_response(" No_Response "));
        assert!(!is_no_response("response"));
    }

    #[test]
    fn test_state_names_first_seen_order() {
        let model = SystemModel::new(
            "m",
            vec![
                Transition::new("Idle", "Busy", "start", "ack"),
                Transition::new("Busy", "Idle", "stop", "no_response"),
                Transition::new("Busy", "Error", "fail", "alarm"),
            ],
        );
        assert_eq!(model.state_names(), vec!["Idle", "Busy", "Error"]);
        assert_eq!(model.initial_state(), Some("Idle"));
    }

    #[test]
    fn test_restrict_drops_false_guards() {
        let model = SystemModel::new(
            "m",
            vec![
                Transition::new("A", "B", "x", "no_response").with_guard("coffee"),
                Transition::new("A", "C", "y", "no_response").with_guard("tea"),
                Transition::new("B", "A", "z", "no_response"),
            ],
        );
        let product = model.restrict(&|g: &str| g == "coffee");
        let received: Vec<&str> = product.transitions.iter().map(|t| t.received.as_str()).collect();
        assert_eq!(received, vec!["x", "z"]);
    }
}
