//! Subset construction and Moore partition refinement.

use std::collections::{BTreeSet, HashMap, VecDeque};

use crate::alphabet::Symbol;
use crate::automaton::{Automaton, State, StateId};

impl Automaton {
    /// Subset construction over the reachable state sets. Default edges
    /// carry over: a subset's default target is the set of its members'
    /// default targets.
    pub fn determinize(&self) -> Automaton {
        let mut states: Vec<State> = Vec::new();
        let mut index: HashMap<Vec<StateId>, StateId> = HashMap::new();
        let mut queue: VecDeque<Vec<StateId>> = VecDeque::new();

        let mut intern = |set: Vec<StateId>,
                          states: &mut Vec<State>,
                          queue: &mut VecDeque<Vec<StateId>>|
         -> StateId {
            if let Some(id) = index.get(&set) {
                return *id;
            }
            let accepting = set.iter().any(|s| self.state(*s).accepting);
            let id = states.len() as StateId;
            states.push(State::new(accepting));
            index.insert(set.clone(), id);
            queue.push_back(set);
            id
        };

        intern(vec![self.initial()], &mut states, &mut queue);

        let mut id: usize = 0;
        while let Some(set) = queue.pop_front() {
            let labels: BTreeSet<Symbol> = set
                .iter()
                .flat_map(|s| self.state(*s).edges.iter().map(|(label, _)| *label))
                .collect();

            for symbol in labels {
                let mut targets = BTreeSet::new();
                for &s in &set {
                    self.state(s).for_each_successor(symbol, |t| {
                        targets.insert(t);
                    });
                }
                if !targets.is_empty() {
                    let target = intern(targets.into_iter().collect(), &mut states, &mut queue);
                    states[id].edges.push((symbol, target));
                }
            }

            let defaults: BTreeSet<StateId> =
                set.iter().filter_map(|s| self.state(*s).default).collect();
            if !defaults.is_empty() {
                let target = intern(defaults.into_iter().collect(), &mut states, &mut queue);
                states[id].default = Some(target);
            }

            id += 1;
        }

        Automaton::from_parts(states, 0)
    }

    /// Minimal deterministic automaton with the same language.
    ///
    /// Works on the trimmed determinization, so every state is live (or the
    /// rejecting sink) and a missing transition is distinguishable from every
    /// real one.
    pub fn minimize(&self) -> Automaton {
        let dfa = self.determinize().trim();
        let n = dfa.state_count();
        let symbols: Vec<Option<Symbol>> = dfa
            .labels()
            .into_iter()
            .map(Some)
            .chain(std::iter::once(None))
            .collect();

        let step = |s: usize, symbol: Option<Symbol>| -> Option<StateId> {
            let state = &dfa.states()[s];
            match symbol {
                Some(c) => state
                    .edges
                    .iter()
                    .find(|(label, _)| *label == c)
                    .map(|(_, t)| *t)
                    .or(state.default),
                None => state.default,
            }
        };

        let mut class: Vec<usize> = dfa
            .states()
            .iter()
            .map(|s| usize::from(s.accepting))
            .collect();
        let mut count = class.iter().collect::<BTreeSet<_>>().len();

        loop {
            let mut signatures: HashMap<(usize, Vec<Option<usize>>), usize> = HashMap::new();
            let mut next = vec![0; n];
            for s in 0..n {
                let signature: Vec<Option<usize>> = symbols
                    .iter()
                    .map(|c| step(s, *c).map(|t| class[t as usize]))
                    .collect();
                let fresh = signatures.len();
                next[s] = *signatures.entry((class[s], signature)).or_insert(fresh);
            }
            let refined = signatures.len();
            class = next;
            if refined == count {
                break;
            }
            count = refined;
        }

        let mut representative: Vec<Option<usize>> = vec![None; count];
        for (s, c) in class.iter().enumerate() {
            representative[*c].get_or_insert(s);
        }

        let states = representative
            .into_iter()
            .flatten()
            .map(|r| {
                let state = &dfa.states()[r];
                State {
                    accepting: state.accepting,
                    edges: state
                        .edges
                        .iter()
                        .map(|(label, t)| (*label, class[*t as usize] as StateId))
                        .collect(),
                    default: state.default.map(|t| class[t as usize] as StateId),
                }
            })
            .collect();

        let minimal = Automaton::from_parts(states, class[dfa.initial() as usize] as StateId);
        tracing::trace!(
            before = self.state_count(),
            after = minimal.state_count(),
            "minimized automaton"
        );
        minimal
    }
}
