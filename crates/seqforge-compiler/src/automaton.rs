//! Finite automata over message symbols.
//!
//! States live in an arena and are addressed by `StateId`. Each state has
//! explicit `(symbol, target)` edges, possibly several on the same symbol,
//! and an optional default successor taken on every symbol that has no
//! explicit edge out of that state. Default edges let pattern automata say
//! "any message" without knowing the alphabet.
//!
//! Automata are values: every operation returns a new automaton.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::fmt::Write as _;

use seqforge_ir::types::Transition;

use crate::alphabet::{is_reserved, Alphabet, Symbol};

pub type StateId = u32;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AutomatonError {
    #[error("cannot build an automaton from an empty transition list")]
    EmptyModel,

    #[error("cannot build a pattern automaton from an empty tuple")]
    EmptyTuple,

    #[error("message '{0}' has no symbol in the alphabet")]
    UnknownMessage(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    pub accepting: bool,
    pub(crate) edges: Vec<(Symbol, StateId)>,
    pub(crate) default: Option<StateId>,
}

impl State {
    pub(crate) fn new(accepting: bool) -> Self {
        Self {
            accepting,
            edges: Vec::new(),
            default: None,
        }
    }

    pub fn edges(&self) -> &[(Symbol, StateId)] {
        &self.edges
    }

    pub fn default_successor(&self) -> Option<StateId> {
        self.default
    }

    pub fn has_label(&self, symbol: Symbol) -> bool {
        self.edges.iter().any(|(label, _)| *label == symbol)
    }

    /// Explicit labels, sorted and deduplicated.
    pub fn labels(&self) -> Vec<Symbol> {
        let mut labels: Vec<Symbol> = self.edges.iter().map(|(label, _)| *label).collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }

    /// Visit every successor on `symbol`: the explicit targets if the symbol
    /// is labelled here, the default successor otherwise.
    pub fn for_each_successor(&self, symbol: Symbol, mut f: impl FnMut(StateId)) {
        let mut explicit = false;
        for &(label, target) in &self.edges {
            if label == symbol {
                explicit = true;
                f(target);
            }
        }
        if !explicit {
            if let Some(target) = self.default {
                f(target);
            }
        }
    }
}

/// One step of an accepting run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Step {
    pub from: StateId,
    pub symbol: Symbol,
    pub to: StateId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton {
    states: Vec<State>,
    initial: StateId,
}

impl Automaton {
    /// The automaton of the empty language.
    pub fn empty() -> Self {
        Self {
            states: vec![State::new(false)],
            initial: 0,
        }
    }

    /// Full-system automaton: one state per state name, every state
    /// accepting, one edge per transition labelled with its received message.
    ///
    /// Accepting everywhere makes the language prefix-closed: any prefix of a
    /// legal execution is itself a legal trace.
    pub fn from_transitions(
        transitions: &[Transition],
        alphabet: &Alphabet,
    ) -> Result<Self, AutomatonError> {
        let first = transitions.first().ok_or(AutomatonError::EmptyModel)?;

        let mut automaton = Self {
            states: Vec::new(),
            initial: 0,
        };
        let mut ids: HashMap<&str, StateId> = HashMap::new();
        let initial = automaton.add_state(true);
        ids.insert(first.from.as_str(), initial);

        for t in transitions {
            let symbol = alphabet
                .symbol(&t.received)
                .ok_or_else(|| AutomatonError::UnknownMessage(t.received.clone()))?;
            let from = match ids.get(t.from.as_str()) {
                Some(id) => *id,
                None => {
                    let id = automaton.add_state(true);
                    ids.insert(t.from.as_str(), id);
                    id
                }
            };
            let to = match ids.get(t.to.as_str()) {
                Some(id) => *id,
                None => {
                    let id = automaton.add_state(true);
                    ids.insert(t.to.as_str(), id);
                    id
                }
            };
            automaton.add_edge(from, symbol, to);
        }

        tracing::trace!(dot = %automaton.to_dot(), "built full-system automaton");
        Ok(automaton)
    }

    /// Recognizer for "the symbols occur in this order, anywhere":
    /// `(any)* s1 (any)* s2 (any)* ... sk (any)*`.
    ///
    /// Gap `i` waits for `symbols[i]` and may also skip over it. With
    /// `exclude_last_in_gap` the gap right before the last symbol cannot
    /// skip the last symbol, so its first occurrence completes the match.
    pub fn from_ordered_pattern(
        symbols: &[Symbol],
        exclude_last_in_gap: bool,
    ) -> Result<Self, AutomatonError> {
        if symbols.is_empty() {
            return Err(AutomatonError::EmptyTuple);
        }

        let k = symbols.len();
        let mut automaton = Self {
            states: (0..=k).map(|i| State::new(i == k)).collect(),
            initial: 0,
        };

        for (i, &symbol) in symbols.iter().enumerate() {
            let gap = i as StateId;
            let before_last = i + 1 == k;
            automaton.set_default(gap, gap);
            if !(exclude_last_in_gap && before_last) {
                automaton.add_edge(gap, symbol, gap);
            }
            automaton.add_edge(gap, symbol, gap + 1);
        }
        automaton.set_default(k as StateId, k as StateId);

        Ok(automaton)
    }

    pub(crate) fn from_parts(states: Vec<State>, initial: StateId) -> Self {
        Self { states, initial }
    }

    pub(crate) fn add_state(&mut self, accepting: bool) -> StateId {
        let id = self.states.len() as StateId;
        self.states.push(State::new(accepting));
        id
    }

    pub(crate) fn add_edge(&mut self, from: StateId, symbol: Symbol, to: StateId) {
        let edges = &mut self.states[from as usize].edges;
        if !edges.contains(&(symbol, to)) {
            edges.push((symbol, to));
        }
    }

    pub(crate) fn set_default(&mut self, from: StateId, to: StateId) {
        self.states[from as usize].default = Some(to);
    }

    pub fn initial(&self) -> StateId {
        self.initial
    }

    pub fn state(&self, id: StateId) -> &State {
        &self.states[id as usize]
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Explicit edges plus default edges.
    pub fn edge_count(&self) -> usize {
        self.states
            .iter()
            .map(|s| s.edges.len() + usize::from(s.default.is_some()))
            .sum()
    }

    /// Every symbol labelling some explicit edge.
    pub fn labels(&self) -> BTreeSet<Symbol> {
        self.states
            .iter()
            .flat_map(|s| s.edges.iter().map(|(label, _)| *label))
            .collect()
    }

    /// No state has two explicit edges on the same symbol.
    pub fn is_deterministic(&self) -> bool {
        self.states.iter().all(|s| s.labels().len() == s.edges.len())
    }

    /// Product construction over reachable state pairs, trimmed of states
    /// that cannot reach acceptance. A pair accepts iff both factors accept.
    pub fn intersect(&self, other: &Automaton) -> Automaton {
        let mut product = Automaton {
            states: Vec::new(),
            initial: 0,
        };
        let mut index: HashMap<(StateId, StateId), StateId> = HashMap::new();
        let mut queue = VecDeque::new();

        let mut intern = |pair: (StateId, StateId),
                          product: &mut Automaton,
                          queue: &mut VecDeque<(StateId, StateId)>|
         -> StateId {
            if let Some(id) = index.get(&pair) {
                return *id;
            }
            let accepting =
                self.states[pair.0 as usize].accepting && other.states[pair.1 as usize].accepting;
            let id = product.add_state(accepting);
            index.insert(pair, id);
            queue.push_back(pair);
            id
        };

        let start = intern((self.initial, other.initial), &mut product, &mut queue);
        product.initial = start;

        let mut id: StateId = 0;
        while let Some((p, q)) = queue.pop_front() {
            let left = &self.states[p as usize];
            let right = &other.states[q as usize];

            let labels: BTreeSet<Symbol> = left
                .edges
                .iter()
                .chain(right.edges.iter())
                .map(|(label, _)| *label)
                .collect();

            for symbol in labels {
                let mut left_targets = Vec::new();
                left.for_each_successor(symbol, |t| left_targets.push(t));
                let mut right_targets = Vec::new();
                right.for_each_successor(symbol, |t| right_targets.push(t));

                for &a in &left_targets {
                    for &b in &right_targets {
                        let target = intern((a, b), &mut product, &mut queue);
                        product.add_edge(id, symbol, target);
                    }
                }
            }

            if let (Some(a), Some(b)) = (left.default, right.default) {
                let target = intern((a, b), &mut product, &mut queue);
                product.set_default(id, target);
            }

            // pairs are dequeued in the order they were interned
            id += 1;
        }

        product.trim()
    }

    /// True iff some string is accepted by both automata.
    pub fn language_nonempty_intersection(&self, other: &Automaton) -> bool {
        !self.intersect(other).is_empty()
    }

    /// Drop states unreachable from the initial state or unable to reach an
    /// accepting state. An empty language collapses to [`Automaton::empty`].
    /// States with a default edge keep rejecting the labels whose explicit
    /// targets were all dropped: those edges go to a single rejecting sink.
    pub fn trim(&self) -> Automaton {
        let n = self.states.len();

        let mut reachable = vec![false; n];
        let mut queue = VecDeque::new();
        reachable[self.initial as usize] = true;
        queue.push_back(self.initial);
        while let Some(s) = queue.pop_front() {
            let state = &self.states[s as usize];
            for t in state.edges.iter().map(|(_, t)| *t).chain(state.default) {
                if !reachable[t as usize] {
                    reachable[t as usize] = true;
                    queue.push_back(t);
                }
            }
        }

        let mut reverse: Vec<Vec<StateId>> = vec![Vec::new(); n];
        for (s, state) in self.states.iter().enumerate() {
            for t in state.edges.iter().map(|(_, t)| *t).chain(state.default) {
                reverse[t as usize].push(s as StateId);
            }
        }

        let mut live = vec![false; n];
        for (s, state) in self.states.iter().enumerate() {
            if state.accepting && reachable[s] {
                live[s] = true;
                queue.push_back(s as StateId);
            }
        }
        while let Some(s) = queue.pop_front() {
            for &p in &reverse[s as usize] {
                if reachable[p as usize] && !live[p as usize] {
                    live[p as usize] = true;
                    queue.push_back(p);
                }
            }
        }

        if !live[self.initial as usize] {
            return Automaton::empty();
        }

        let mut remap: Vec<Option<StateId>> = vec![None; n];
        let mut next: StateId = 0;
        for s in 0..n {
            if live[s] {
                remap[s] = Some(next);
                next += 1;
            }
        }

        // A dead explicit edge must keep shadowing the default edge, so a
        // label left with only dead targets is sent to a rejecting sink.
        let sink = next;
        let mut needs_sink = false;

        let mut states: Vec<State> = self
            .states
            .iter()
            .enumerate()
            .filter(|(s, _)| live[*s])
            .map(|(_, state)| {
                let default = state.default.and_then(|t| remap[t as usize]);
                let mut edges: Vec<(Symbol, StateId)> = state
                    .edges
                    .iter()
                    .filter_map(|(label, t)| remap[*t as usize].map(|t| (*label, t)))
                    .collect();
                if default.is_some() {
                    for label in state.labels() {
                        if !edges.iter().any(|(l, _)| *l == label) {
                            edges.push((label, sink));
                            needs_sink = true;
                        }
                    }
                }
                State {
                    accepting: state.accepting,
                    edges,
                    default,
                }
            })
            .collect();

        if needs_sink {
            states.push(State::new(false));
        }

        Automaton {
            states,
            initial: remap[self.initial as usize].unwrap_or(0),
        }
    }

    /// Run `input` through the automaton. Works on partial strings and on
    /// the empty string.
    pub fn accepts(&self, input: &str) -> bool {
        let mut current = self.start_set();
        for symbol in input.chars() {
            current = self.advance(&current, symbol);
            if current.is_empty() {
                return false;
            }
        }
        self.any_accepting(&current)
    }

    /// The set of states active before any input.
    pub fn start_set(&self) -> BTreeSet<StateId> {
        BTreeSet::from([self.initial])
    }

    /// Successor set of `current` on `symbol`; empty when the input dies.
    pub fn advance(&self, current: &BTreeSet<StateId>, symbol: Symbol) -> BTreeSet<StateId> {
        let mut next = BTreeSet::new();
        for &s in current {
            self.states[s as usize].for_each_successor(symbol, |t| {
                next.insert(t);
            });
        }
        next
    }

    pub fn any_accepting(&self, current: &BTreeSet<StateId>) -> bool {
        current.iter().any(|s| self.states[*s as usize].accepting)
    }

    /// One accepting run over `input`, or `None` if the input is rejected.
    pub fn run(&self, input: &str) -> Option<Vec<Step>> {
        let symbols: Vec<Symbol> = input.chars().collect();
        let mut layers = vec![self.start_set()];

        for &symbol in &symbols {
            let next = self.advance(layers.last()?, symbol);
            if next.is_empty() {
                return None;
            }
            layers.push(next);
        }

        let mut target = layers
            .last()?
            .iter()
            .copied()
            .find(|s| self.states[*s as usize].accepting)?;

        let mut steps = Vec::with_capacity(symbols.len());
        for i in (0..symbols.len()).rev() {
            let symbol = symbols[i];
            let from = layers[i].iter().copied().find(|&p| {
                let mut hit = false;
                self.states[p as usize].for_each_successor(symbol, |t| hit |= t == target);
                hit
            })?;
            steps.push(Step {
                from,
                symbol,
                to: target,
            });
            target = from;
        }
        steps.reverse();
        Some(steps)
    }

    /// Breadth-first search for a minimum-length accepted string.
    pub fn shortest_accepted_string(&self) -> Option<String> {
        if self.states[self.initial as usize].accepting {
            return Some(String::new());
        }

        let known = self.labels();
        let n = self.states.len();
        let mut parent: Vec<Option<(StateId, Symbol)>> = vec![None; n];
        let mut visited = vec![false; n];
        let mut queue = VecDeque::new();
        visited[self.initial as usize] = true;
        queue.push_back(self.initial);

        while let Some(s) = queue.pop_front() {
            let state = &self.states[s as usize];

            let mut moves: Vec<(Symbol, StateId)> = Vec::new();
            for symbol in state.labels() {
                state.for_each_successor(symbol, |t| moves.push((symbol, t)));
            }
            if let Some(t) = state.default {
                if let Some(witness) = default_witness(state, &known) {
                    moves.push((witness, t));
                }
            }

            for (symbol, t) in moves {
                if visited[t as usize] {
                    continue;
                }
                visited[t as usize] = true;
                parent[t as usize] = Some((s, symbol));
                if self.states[t as usize].accepting {
                    return Some(self.spell(&parent, t));
                }
                queue.push_back(t);
            }
        }

        None
    }

    fn spell(&self, parent: &[Option<(StateId, Symbol)>], end: StateId) -> String {
        let mut symbols = Vec::new();
        let mut current = end;
        while let Some((prev, symbol)) = parent[current as usize] {
            symbols.push(symbol);
            current = prev;
        }
        symbols.iter().rev().collect()
    }

    /// True iff no accepting state is reachable.
    pub fn is_empty(&self) -> bool {
        let mut visited = vec![false; self.states.len()];
        let mut queue = VecDeque::from([self.initial]);
        visited[self.initial as usize] = true;
        while let Some(s) = queue.pop_front() {
            let state = &self.states[s as usize];
            if state.accepting {
                return false;
            }
            for t in state.edges.iter().map(|(_, t)| *t).chain(state.default) {
                if !visited[t as usize] {
                    visited[t as usize] = true;
                    queue.push_back(t);
                }
            }
        }
        true
    }

    /// Graphviz rendering, for trace logs.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph automaton {\n  rankdir=LR;\n");
        for (id, state) in self.states.iter().enumerate() {
            let shape = if state.accepting { "doublecircle" } else { "circle" };
            let _ = writeln!(out, "  s{id} [shape={shape}];");
        }
        let _ = writeln!(out, "  start [shape=point];\n  start -> s{};", self.initial);
        for (id, state) in self.states.iter().enumerate() {
            for (label, target) in &state.edges {
                let _ = writeln!(out, "  s{id} -> s{target} [label=\"{}\"];", label.escape_default());
            }
            if let Some(target) = state.default {
                let _ = writeln!(out, "  s{id} -> s{target} [label=\"*\", style=dashed];");
            }
        }
        out.push_str("}\n");
        out
    }
}

/// A concrete symbol for a default edge: the smallest known symbol not
/// labelled at this state, else the first free non-reserved char.
fn default_witness(state: &State, known: &BTreeSet<Symbol>) -> Option<Symbol> {
    known
        .iter()
        .copied()
        .find(|c| !state.has_label(*c))
        .or_else(|| {
            ('A'..=char::MAX).find(|c| !is_reserved(*c) && !state.has_label(*c))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle() -> (Automaton, Alphabet) {
        let transitions = vec![
            Transition::new("S0", "S1", "A", "no_response"),
            Transition::new("S1", "S0", "B", "no_response"),
        ];
        let alphabet = Alphabet::assign(["A", "B"]);
        (Automaton::from_transitions(&transitions, &alphabet).unwrap(), alphabet)
    }

    #[test]
    fn test_full_system_accepts_prefixes() {
        let (full, _) = cycle();
        assert_eq!(full.state_count(), 2);
        assert!(full.accepts(""));
        assert!(full.accepts("A"));
        assert!(full.accepts("AB"));
        assert!(full.accepts("ABA"));
        assert!(!full.accepts("B"));
        assert!(!full.accepts("AA"));
    }

    #[test]
    fn test_empty_model_is_error() {
        let alphabet = Alphabet::assign(["A"]);
        assert_eq!(
            Automaton::from_transitions(&[], &alphabet),
            Err(AutomatonError::EmptyModel)
        );
    }

    #[test]
    fn test_unknown_message_is_error() {
        let alphabet = Alphabet::assign(["A"]);
        let transitions = vec![Transition::new("S0", "S1", "Z", "no_response")];
        assert_eq!(
            Automaton::from_transitions(&transitions, &alphabet),
            Err(AutomatonError::UnknownMessage("Z".into()))
        );
    }

    #[test]
    fn test_pattern_matches_in_order_anywhere() {
        let pattern = Automaton::from_ordered_pattern(&['A', 'B'], false).unwrap();
        assert!(pattern.accepts("AB"));
        assert!(pattern.accepts("xAyyB"));
        assert!(pattern.accepts("BAAB"));
        assert!(!pattern.accepts("BA"));
        assert!(!pattern.accepts(""));
    }

    #[test]
    fn test_pattern_exclusion_keeps_language() {
        let plain = Automaton::from_ordered_pattern(&['A', 'A'], false).unwrap();
        let strict = Automaton::from_ordered_pattern(&['A', 'A'], true).unwrap();
        assert_eq!(strict.edge_count() + 1, plain.edge_count());
        assert!(!strict.state(1).labels().is_empty());
        for s in ["A", "AA", "ABA", "BAAB", "AAA", "B"] {
            assert_eq!(plain.accepts(s), strict.accepts(s), "{s}");
        }
    }

    #[test]
    fn test_empty_tuple_is_error() {
        assert_eq!(
            Automaton::from_ordered_pattern(&[], false),
            Err(AutomatonError::EmptyTuple)
        );
    }

    #[test]
    fn test_intersection_with_full_system() {
        let (full, _) = cycle();
        let ab = Automaton::from_ordered_pattern(&['A', 'B'], false).unwrap();
        let ba = Automaton::from_ordered_pattern(&['B', 'A'], false).unwrap();
        let aa = Automaton::from_ordered_pattern(&['A', 'A'], false).unwrap();
        let bb = Automaton::from_ordered_pattern(&['B', 'B'], false).unwrap();

        assert_eq!(full.intersect(&ab).shortest_accepted_string().as_deref(), Some("AB"));
        assert_eq!(full.intersect(&ba).shortest_accepted_string().as_deref(), Some("ABA"));
        assert_eq!(full.intersect(&aa).shortest_accepted_string().as_deref(), Some("ABA"));
        assert_eq!(full.intersect(&bb).shortest_accepted_string().as_deref(), Some("ABAB"));
    }

    #[test]
    fn test_empty_intersection() {
        let transitions = vec![Transition::new("S0", "S1", "A", "no_response")];
        let alphabet = Alphabet::assign(["A", "B"]);
        let full = Automaton::from_transitions(&transitions, &alphabet).unwrap();
        let ab = Automaton::from_ordered_pattern(&['A', 'B'], false).unwrap();

        let product = full.intersect(&ab);
        assert!(product.is_empty());
        assert_eq!(product.shortest_accepted_string(), None);
        assert!(!full.language_nonempty_intersection(&ab));
    }

    #[test]
    fn test_pattern_only_products_need_no_wildcards() {
        let ab = Automaton::from_ordered_pattern(&['A', 'B'], false).unwrap();
        let bc = Automaton::from_ordered_pattern(&['B', 'C'], false).unwrap();
        let product = ab.intersect(&bc);
        assert_eq!(product.shortest_accepted_string().as_deref(), Some("ABC"));
    }

    #[test]
    fn test_default_witness_used_when_needed() {
        // accepts exactly one symbol other than 'A'
        let mut automaton = Automaton::from_parts(vec![State::new(false), State::new(true)], 0);
        automaton.set_default(0, 1);
        automaton.add_edge(0, 'A', 0);
        let shortest = automaton.shortest_accepted_string().unwrap();
        assert_eq!(shortest.chars().count(), 1);
        assert!(automaton.accepts(&shortest));
    }

    #[test]
    fn test_trim_keeps_dead_labels_rejecting() {
        // 'B' leads only to a dead state; every other symbol loops
        let mut automaton = Automaton::from_parts(vec![State::new(true), State::new(false)], 0);
        automaton.set_default(0, 0);
        automaton.add_edge(0, 'B', 1);
        assert!(automaton.accepts("AA"));
        assert!(!automaton.accepts("AB"));

        let trimmed = automaton.trim();
        assert!(trimmed.accepts("AA"));
        assert!(!trimmed.accepts("B"));
        assert!(!trimmed.accepts("AB"));
        assert_eq!(trimmed.state_count(), 2);

        let minimal = automaton.minimize();
        assert!(minimal.accepts("CA"));
        assert!(!minimal.accepts("AB"));
    }

    #[test]
    fn test_run_reports_steps() {
        let (full, _) = cycle();
        let steps = full.run("ABA").unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].from, full.initial());
        assert_eq!(steps[0].symbol, 'A');
        assert_eq!(steps[1].from, steps[0].to);
        assert_eq!(steps[2].to, steps[1].from);
        assert!(full.run("BB").is_none());
        assert_eq!(full.run(""), Some(vec![]));
    }

    #[test]
    fn test_dot_mentions_every_state() {
        let (full, _) = cycle();
        let dot = full.to_dot();
        assert!(dot.contains("s0"));
        assert!(dot.contains("s1"));
        assert!(dot.contains("label=\"A\""));
    }
}
