//! Bijective mapping between message names and single-char symbols.
//!
//! Automaton edges and generated sequences are plain strings of symbols;
//! this table is the only way back to message names.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use seqforge_ir::types::{is_no_response, SystemModel};

/// One message, as used on automaton edges.
pub type Symbol = char;

/// First code point considered. It is itself reserved, so the first
/// assigned symbol is `'A'`.
const FIRST_CODE: u32 = 64;

/// Characters with a meaning in the pattern sub-language. Never assigned.
const RESERVED: &[char] = &[
    ')', '(', '*', '?', '&', '|', '+', '@', '}', '{', '~', '^', '[', ']', '-', '.', '#', '\\',
    '_', '<', '>', '"',
];

pub fn is_reserved(c: char) -> bool {
    RESERVED.contains(&c)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlphabetError {
    #[error("message '{0}' has no symbol")]
    UnknownMessage(String),

    #[error("symbol '{0}' does not map to any message")]
    UnknownSymbol(Symbol),
}

/// Ordered message <-> symbol bijection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "IndexMap<String, Symbol>", into = "IndexMap<String, Symbol>")]
pub struct Alphabet {
    codes: IndexMap<String, Symbol>,
    messages: HashMap<Symbol, usize>,
}

impl Alphabet {
    /// Assign strictly increasing symbols to `messages` in iteration order.
    /// Names are case-insensitive; duplicates keep their first symbol.
    pub fn assign<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut codes = IndexMap::new();
        let mut next = FIRST_CODE;

        for message in messages {
            let key = message.as_ref().to_uppercase();
            if codes.contains_key(&key) {
                continue;
            }
            let symbol = loop {
                let candidate = char::from_u32(next);
                next += 1;
                match candidate {
                    Some(c) if !is_reserved(c) => break c,
                    _ => continue,
                }
            };
            codes.insert(key, symbol);
        }

        Self::from(codes)
    }

    /// Discover the messages of a model: every received message and every
    /// sent message except the no-response sentinel, in transition order.
    pub fn from_model(model: &SystemModel) -> Self {
        let mut messages = Vec::new();
        for t in &model.transitions {
            messages.push(t.received.as_str());
            if !is_no_response(&t.sent) {
                messages.push(t.sent.as_str());
            }
        }
        Self::assign(messages)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn symbol(&self, message: &str) -> Option<Symbol> {
        self.codes.get(&message.to_uppercase()).copied()
    }

    /// Upper-cased message name for a symbol.
    pub fn message(&self, symbol: Symbol) -> Option<&str> {
        let index = *self.messages.get(&symbol)?;
        self.codes.get_index(index).map(|(name, _)| name.as_str())
    }

    /// Symbol at a position of the assignment order.
    pub fn symbol_at(&self, index: usize) -> Option<Symbol> {
        self.codes.get_index(index).map(|(_, s)| *s)
    }

    /// All symbols in assignment order.
    pub fn symbols(&self) -> Vec<Symbol> {
        self.codes.values().copied().collect()
    }

    /// Symbols taking part in combinatorial tuples: everything but the
    /// no-response sentinel.
    pub fn tuple_symbols(&self) -> Vec<Symbol> {
        self.codes
            .iter()
            .filter(|(name, _)| !is_no_response(name))
            .map(|(_, s)| *s)
            .collect()
    }

    /// Number of events, not counting the no-response sentinel.
    pub fn event_count(&self) -> usize {
        self.tuple_symbols().len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Symbol)> {
        self.codes.iter().map(|(name, s)| (name.as_str(), *s))
    }

    pub fn encode<S: AsRef<str>>(&self, messages: &[S]) -> Result<String, AlphabetError> {
        messages
            .iter()
            .map(|m| {
                self.symbol(m.as_ref())
                    .ok_or_else(|| AlphabetError::UnknownMessage(m.as_ref().to_string()))
            })
            .collect()
    }

    pub fn decode(&self, sequence: &str) -> Result<Vec<String>, AlphabetError> {
        sequence
            .chars()
            .map(|c| {
                self.message(c)
                    .map(str::to_string)
                    .ok_or(AlphabetError::UnknownSymbol(c))
            })
            .collect()
    }
}

impl From<IndexMap<String, Symbol>> for Alphabet {
    fn from(codes: IndexMap<String, Symbol>) -> Self {
        let messages = codes
            .values()
            .enumerate()
            .map(|(index, symbol)| (*symbol, index))
            .collect();
        Self { codes, messages }
    }
}

impl From<Alphabet> for IndexMap<String, Symbol> {
    fn from(alphabet: Alphabet) -> Self {
        alphabet.codes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqforge_ir::types::Transition;

    #[test]
    fn test_codes_skip_reserved_and_increase() {
        let names: Vec<String> = (0..40).map(|i| format!("m{i}")).collect();
        let alphabet = Alphabet::assign(&names);
        let symbols = alphabet.symbols();
        assert_eq!(symbols[0], 'A');
        assert!(symbols.windows(2).all(|w| w[0] < w[1]));
        assert!(symbols.iter().all(|s| !is_reserved(*s)));
        // '[' '\\' ']' '^' '_' are skipped after 'Z'
        assert_eq!(symbols[26], '`');
    }

    #[test]
    fn test_duplicate_names_are_case_insensitive() {
        let alphabet = Alphabet::assign(["go", "GO", "stop"]);
        assert_eq!(alphabet.len(), 2);
        assert_eq!(alphabet.symbol("Go"), Some('A'));
        assert_eq!(alphabet.message('B'), Some("STOP"));
    }

    #[test]
    fn test_from_model_skips_no_response_output() {
        let model = SystemModel::new(
            "m",
            vec![
                Transition::new("S0", "S1", "a", "no_response"),
                Transition::new("S1", "S0", "b", "out"),
            ],
        );
        let alphabet = Alphabet::from_model(&model);
        let names: Vec<&str> = alphabet.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["A", "B", "OUT"]);
    }

    #[test]
    fn test_received_no_response_keeps_code_but_not_tuples() {
        let alphabet = Alphabet::assign(["a", "no_response", "b"]);
        assert_eq!(alphabet.len(), 3);
        assert_eq!(alphabet.tuple_symbols(), vec!['A', 'C']);
        assert_eq!(alphabet.event_count(), 2);
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let alphabet = Alphabet::assign(["pay", "coffee", "take"]);
        let encoded = alphabet.encode(&["pay", "coffee", "take", "pay"]).unwrap();
        assert_eq!(encoded, "ABCA");
        let decoded = alphabet.decode(&encoded).unwrap();
        assert_eq!(decoded, vec!["PAY", "COFFEE", "TAKE", "PAY"]);
        assert_eq!(alphabet.encode(&decoded).unwrap(), encoded);
    }

    #[test]
    fn test_unknown_lookups() {
        let alphabet = Alphabet::assign(["a"]);
        assert_eq!(
            alphabet.encode(&["zzz"]),
            Err(AlphabetError::UnknownMessage("zzz".into()))
        );
        assert_eq!(alphabet.decode("Q"), Err(AlphabetError::UnknownSymbol('Q')));
    }
}
