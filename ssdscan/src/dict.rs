//! Ship name dictionaries.
//!
//! A dictionary is a flat UTF-8 text file, one entry per line.  A plain
//! line is a word we expect to see (allowed).  A `!` prefix marks a word
//! we never want to keep (forbidden), a `$` prefix a word that ends a
//! ship name (stop, also allowed), and `=WRONG|Correct Phrase` a direct
//! substitution for a known misreading:
//!
//! ```text
//! FEDERATION
//! !CHART
//! $CRUISER
//! =CRUSER|CRUISER
//! ```
//!
//! All comparisons elsewhere are case-insensitive, so everything except
//! substitution replacements is stored uppercased.

use common_failures::prelude::*;
use log::warn;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::io::prelude::*;
use std::path::Path;

use crate::errors::{DictionaryLoadError, MalformedDictionaryEntry};

/// A single parsed dictionary line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DictLine {
    /// A word that may appear in a ship name.
    Allowed(String),
    /// A word that must never survive correction.
    Forbidden(String),
    /// A word that terminates a ship name (implicitly also allowed).
    Stop(String),
    /// A known misreading and the phrase that replaces it.
    Substitution {
        /// The misread token, uppercased.
        wrong: String,
        /// The replacement phrase, kept in its original case.
        correct: String,
    },
}

impl DictLine {
    /// Parse a single dictionary line.  Returns `Ok(None)` for blank
    /// lines and an error for substitution lines missing their `|`
    /// delimiter.
    pub fn parse(line: &str) -> Result<Option<DictLine>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        if let Some(rest) = line.strip_prefix('=') {
            return match rest.split_once('|') {
                Some((wrong, correct)) => Ok(Some(DictLine::Substitution {
                    wrong: wrong.trim().to_uppercase(),
                    correct: correct.trim().to_owned(),
                })),
                None => Err(MalformedDictionaryEntry::new(line).into()),
            };
        }
        if let Some(rest) = line.strip_prefix('!') {
            return Ok(Some(DictLine::Forbidden(rest.to_uppercase())));
        }
        if let Some(rest) = line.strip_prefix('$') {
            return Ok(Some(DictLine::Stop(rest.to_uppercase())));
        }
        Ok(Some(DictLine::Allowed(line.to_uppercase())))
    }
}

/// The word lists driving ship name correction.
#[derive(Clone, Debug, Default)]
pub struct Dictionary {
    /// Allowed words in first-occurrence file order.  Correction breaks
    /// distance ties in favor of earlier entries, so this order is part
    /// of the observable behavior.
    allowed: Vec<String>,
    forbidden: Vec<String>,
    stop: HashSet<String>,
    substitutions: HashMap<String, String>,
}

impl Dictionary {
    /// Create an empty dictionary.  Correction with an empty dictionary
    /// passes every token through unchanged.
    pub fn new() -> Dictionary {
        Dictionary::default()
    }

    /// Load a dictionary from a file.  Malformed substitution lines are
    /// logged and skipped; an unreadable file is an error the caller
    /// may treat as recoverable.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Dictionary> {
        let path = path.as_ref();
        let f = fs::File::open(path).with_context(|_| DictionaryLoadError::new(path))?;
        let mut dict = Dictionary::new();
        for line in io::BufReader::new(f).lines() {
            let line = line.io_read_context(path)?;
            match DictLine::parse(&line) {
                Ok(Some(entry)) => dict.insert(entry),
                Ok(None) => {}
                Err(err) => warn!("{}", err),
            }
        }
        Ok(dict)
    }

    /// Fold one parsed line into the lookup structures.
    pub fn insert(&mut self, line: DictLine) {
        match line {
            DictLine::Allowed(word) => self.insert_allowed(word),
            DictLine::Forbidden(word) => {
                if !self.forbidden.contains(&word) {
                    self.forbidden.push(word);
                }
            }
            DictLine::Stop(word) => {
                self.insert_allowed(word.clone());
                self.stop.insert(word);
            }
            DictLine::Substitution { wrong, correct } => {
                self.substitutions.insert(wrong, correct);
            }
        }
    }

    fn insert_allowed(&mut self, word: String) {
        if !self.allowed.contains(&word) {
            self.allowed.push(word);
        }
    }

    /// Does this dictionary contain no entries at all?
    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty() && self.forbidden.is_empty() && self.substitutions.is_empty()
    }

    /// The allowed words, uppercased, in file order.
    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    /// The forbidden words, uppercased.
    pub fn forbidden(&self) -> &[String] {
        &self.forbidden
    }

    /// Does `word` terminate a ship name?  Case-insensitive.
    pub fn is_stop(&self, word: &str) -> bool {
        self.stop.contains(&word.to_uppercase())
    }

    /// The replacement phrase for a known misreading, if there is one.
    /// Case-insensitive.
    pub fn substitution(&self, word: &str) -> Option<&str> {
        self.substitutions.get(&word.to_uppercase()).map(String::as_str)
    }
}
