//! Sequence files and covering-array import.
//!
//! A sequence file has one sequence per line: the lower-cased message
//! names, each followed by a single space.

use seqforge_compiler::alphabet::{Alphabet, AlphabetError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExportError {
    #[error("alphabet error: {0}")]
    Alphabet(#[from] AlphabetError),

    #[error("line {line}: '{value}' is not a message index")]
    BadIndex { line: usize, value: String },

    #[error("line {line}: message index {index} is out of range (alphabet has {size} messages)")]
    IndexOutOfRange { line: usize, index: usize, size: usize },
}

/// Message names of every sequence, lower-cased.
pub fn decoded(sequences: &[String], alphabet: &Alphabet) -> Result<Vec<Vec<String>>, ExportError> {
    sequences
        .iter()
        .map(|s| {
            Ok(alphabet
                .decode(s)?
                .into_iter()
                .map(|m| m.to_lowercase())
                .collect())
        })
        .collect()
}

pub fn render_sequence_file(sequences: &[String], alphabet: &Alphabet) -> Result<String, ExportError> {
    let mut out = String::new();
    for messages in decoded(sequences, alphabet)? {
        for message in messages {
            out.push_str(&message);
            out.push(' ');
        }
        out.push('\n');
    }
    Ok(out)
}

/// Read a sequence covering array: each non-empty line is a comma-separated
/// list of zero-based positions in the alphabet's assignment order.
/// Duplicate lines yield one sequence.
pub fn sequences_from_covering_array(text: &str, alphabet: &Alphabet) -> Result<Vec<String>, ExportError> {
    let mut sequences: Vec<String> = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        if line.trim().is_empty() {
            continue;
        }
        let mut sequence = String::new();
        for value in line.split(',') {
            let index: usize = value.trim().parse().map_err(|_| ExportError::BadIndex {
                line: line_no,
                value: value.trim().to_string(),
            })?;
            let symbol = alphabet
                .symbol_at(index)
                .ok_or(ExportError::IndexOutOfRange {
                    line: line_no,
                    index,
                    size: alphabet.len(),
                })?;
            sequence.push(symbol);
        }
        if !sequences.contains(&sequence) {
            sequences.push(sequence);
        }
    }
    Ok(sequences)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alphabet() -> Alphabet {
        Alphabet::assign(["Pay", "coffee", "TAKE"])
    }

    #[test]
    fn test_render_format() {
        let text = render_sequence_file(&["ABC".to_string(), "A".to_string()], &alphabet()).unwrap();
        assert_eq!(text, "pay coffee take \npay \n");
    }

    #[test]
    fn test_render_rejects_unknown_symbol() {
        let err = render_sequence_file(&["AZ".to_string()], &alphabet()).unwrap_err();
        assert_eq!(err, ExportError::Alphabet(AlphabetError::UnknownSymbol('Z')));
    }

    #[test]
    fn test_covering_array_import() {
        let text = "0,1,2\n\n2, 0\n0,1,2\n";
        let sequences = sequences_from_covering_array(text, &alphabet()).unwrap();
        assert_eq!(sequences, vec!["ABC".to_string(), "CA".to_string()]);
    }

    #[test]
    fn test_covering_array_errors() {
        assert_eq!(
            sequences_from_covering_array("0,x", &alphabet()),
            Err(ExportError::BadIndex {
                line: 1,
                value: "x".into()
            })
        );
        assert_eq!(
            sequences_from_covering_array("1\n3", &alphabet()),
            Err(ExportError::IndexOutOfRange {
                line: 2,
                index: 3,
                size: 3
            })
        );
    }
}
