// SPDX-License-Identifier: MIT
//
// Spell checking over document text.
//
// The checker sits outside the editing engine. It reads the text that
// `Document::spell_text` projects and never edits anything.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-zA-Z]+\b").expect("word pattern is valid"));

/// Common misspellings and their corrections.
const COMMON_MISSPELLINGS: &[(&str, &str)] = &[
    ("teh", "the"),
    ("recieve", "receive"),
    ("occured", "occurred"),
    ("seperate", "separate"),
    ("definately", "definitely"),
    ("wierd", "weird"),
    ("thier", "their"),
    ("goverment", "government"),
    ("untill", "until"),
    ("sucessful", "successful"),
    ("enviroment", "environment"),
    ("begining", "beginning"),
    ("occassion", "occasion"),
    ("accomodate", "accommodate"),
    ("neccessary", "necessary"),
];

/// One flagged word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Misspelling {
    /// The word as written.
    pub word: String,
    /// Char offset of the word in the checked text.
    pub offset: usize,
    pub suggestions: Vec<String>,
}

impl fmt::Display for Misspelling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\" at {}, suggestions: {}",
            self.word,
            self.offset,
            self.suggestions.join(", ")
        )
    }
}

/// Anything that can flag misspelled words in a block of text.
pub trait SpellChecker {
    /// Misspellings in order of appearance. Empty or blank text has none.
    fn check(&self, text: &str) -> Vec<Misspelling>;
}

/// A checker backed by a fixed table of known misspellings.
///
/// Words are ASCII letter runs; lookup is case-insensitive and the word is
/// reported as written.
#[derive(Debug, Clone)]
pub struct DictionaryChecker {
    table: HashMap<String, Vec<String>>,
}

impl DictionaryChecker {
    /// A checker loaded with the built-in table.
    #[must_use]
    pub fn new() -> Self {
        let table = COMMON_MISSPELLINGS
            .iter()
            .map(|&(wrong, right)| (wrong.to_string(), vec![right.to_string()]))
            .collect();
        Self { table }
    }
}

impl Default for DictionaryChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl SpellChecker for DictionaryChecker {
    fn check(&self, text: &str) -> Vec<Misspelling> {
        WORD_RE
            .find_iter(text)
            .filter_map(|m| {
                let suggestions = self.table.get(&m.as_str().to_ascii_lowercase())?;
                Some(Misspelling {
                    word: m.as_str().to_string(),
                    offset: text[..m.start()].chars().count(),
                    suggestions: suggestions.clone(),
                })
            })
            .collect()
    }
}
