//! Document chunking.
//!
//! Splits normalized page text into consecutive, non-overlapping groups of
//! units (words, sentences, passages, or pages) before indexing. Units keep
//! their trailing delimiters, so concatenating the returned chunks in order
//! reconstructs the input text exactly.

use serde::{Deserialize, Serialize};

use crate::core::errors::ChatError;

/// Granularity used when splitting a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitUnit {
    Word,
    Sentence,
    Passage,
    Page,
}

impl SplitUnit {
    pub fn parse(name: &str) -> Result<Self, ChatError> {
        match name.trim().to_lowercase().as_str() {
            "word" => Ok(SplitUnit::Word),
            "sentence" => Ok(SplitUnit::Sentence),
            "passage" => Ok(SplitUnit::Passage),
            "page" => Ok(SplitUnit::Page),
            other => Err(ChatError::InvalidConfiguration(format!(
                "unknown split unit '{}': choose one of 'word', 'sentence', 'passage', 'page'",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SplitUnit::Word => "word",
            SplitUnit::Sentence => "sentence",
            SplitUnit::Passage => "passage",
            SplitUnit::Page => "page",
        }
    }
}

/// Split `text` into chunks of `length` consecutive units.
///
/// The final chunk may hold fewer than `length` units. Deterministic and
/// side-effect-free; `length == 0` is rejected.
pub fn split(text: &str, unit: SplitUnit, length: usize) -> Result<Vec<String>, ChatError> {
    if length == 0 {
        return Err(ChatError::InvalidConfiguration(
            "split length must be a positive integer".to_string(),
        ));
    }

    let units = split_units(text, unit);
    let chunks = units
        .chunks(length)
        .map(|group| group.concat())
        .collect();

    Ok(chunks)
}

fn split_units(text: &str, unit: SplitUnit) -> Vec<String> {
    match unit {
        SplitUnit::Word => split_words(text),
        SplitUnit::Sentence => split_sentences(text),
        SplitUnit::Passage => text.split_inclusive("\n\n").map(String::from).collect(),
        SplitUnit::Page => text.split_inclusive('\u{000C}').map(String::from).collect(),
    }
}

/// A word unit is a run of non-whitespace plus the whitespace that follows
/// it. Leading whitespace attaches to the first unit.
fn split_words(text: &str) -> Vec<String> {
    let mut units = Vec::new();
    let mut current = String::new();
    let mut has_word = false;
    let mut in_gap = false;

    for c in text.chars() {
        let ws = c.is_whitespace();
        if !ws && in_gap && has_word {
            units.push(std::mem::take(&mut current));
            has_word = false;
        }
        if ws {
            in_gap = true;
        } else {
            has_word = true;
            in_gap = false;
        }
        current.push(c);
    }
    if !current.is_empty() {
        units.push(current);
    }
    units
}

/// A sentence unit ends after a run of terminators (`.`, `!`, `?`) and any
/// whitespace that follows it.
fn split_sentences(text: &str) -> Vec<String> {
    let mut units = Vec::new();
    let mut current = String::new();
    let mut after_terminator = false;

    for c in text.chars() {
        let terminator = matches!(c, '.' | '!' | '?');
        if after_terminator && !terminator && !c.is_whitespace() {
            units.push(std::mem::take(&mut current));
            after_terminator = false;
        }
        current.push(c);
        if terminator {
            after_terminator = true;
        } else if !c.is_whitespace() {
            after_terminator = false;
        }
    }
    if !current.is_empty() {
        units.push(current);
    }
    units
}

#[cfg(test)]
mod tests {
    use super::*;

    const BRAZIL: &str =
        "Brazil's population is 203 million. Brazil's capital is Bras\u{ed}lia.";

    #[test]
    fn sentence_split_length_one() {
        let chunks = split(BRAZIL, SplitUnit::Sentence, 1).unwrap();
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].contains("population"));
        assert!(chunks[1].contains("capital"));
    }

    #[test]
    fn concatenation_reconstructs_input() {
        let texts = [
            BRAZIL,
            "one two three four five",
            "First paragraph.\n\nSecond paragraph.\n\nThird.",
            "  leading whitespace. And trailing   ",
            "no terminator at all",
        ];
        for text in texts {
            for unit in [
                SplitUnit::Word,
                SplitUnit::Sentence,
                SplitUnit::Passage,
                SplitUnit::Page,
            ] {
                for length in [1, 2, 3, 100] {
                    let chunks = split(text, unit, length).unwrap();
                    assert_eq!(chunks.concat(), text, "unit={:?} length={}", unit, length);
                }
            }
        }
    }

    #[test]
    fn word_split_groups() {
        let chunks = split("one two three four five", SplitUnit::Word, 2).unwrap();
        assert_eq!(chunks, vec!["one two ", "three four ", "five"]);
    }

    #[test]
    fn remainder_chunk_is_shorter() {
        let chunks = split(BRAZIL, SplitUnit::Sentence, 2).unwrap();
        assert_eq!(chunks.len(), 1);

        let three = "A. B. C.";
        let chunks = split(three, SplitUnit::Sentence, 2).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1], "C.");
    }

    #[test]
    fn passage_split_on_blank_lines() {
        let text = "First paragraph.\n\nSecond paragraph.";
        let chunks = split(text, SplitUnit::Passage, 1).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], "First paragraph.\n\n");
    }

    #[test]
    fn page_split_on_form_feed() {
        let text = "page one\u{000C}page two";
        let chunks = split(text, SplitUnit::Page, 1).unwrap();
        assert_eq!(chunks.len(), 2);
    }

    #[test]
    fn zero_length_rejected() {
        let err = split("anything", SplitUnit::Sentence, 0).unwrap_err();
        assert!(matches!(err, ChatError::InvalidConfiguration(_)));
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        let chunks = split("", SplitUnit::Sentence, 1).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn deterministic() {
        let a = split(BRAZIL, SplitUnit::Word, 3).unwrap();
        let b = split(BRAZIL, SplitUnit::Word, 3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unit_parse() {
        assert_eq!(SplitUnit::parse("sentence").unwrap(), SplitUnit::Sentence);
        assert_eq!(SplitUnit::parse(" Word ").unwrap(), SplitUnit::Word);
        assert!(SplitUnit::parse("paragraphs").is_err());
    }
}
