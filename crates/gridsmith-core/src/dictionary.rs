//! Clue dictionary for crossword filling.
//!
//! A [`ClueDictionary`] holds `(clue, answer)` pairs bucketed by answer
//! length, which is how the crossword fill phase consumes them: a span of
//! length `n` draws candidates from bucket `n` only. Parsing clue data out
//! of whatever delimited text format a caller stores it in stays on the
//! caller's side; this module only validates and organizes the pairs.
//!
//! # Examples
//!
//! ```
//! use gridsmith_core::ClueDictionary;
//!
//! let dictionary = ClueDictionary::from_pairs([
//!     ("Feline pet", "cat"),
//!     ("Canine pet", "dog"),
//!     ("Striped equine", "zebra"),
//! ])?;
//!
//! assert_eq!(dictionary.len(), 3);
//! assert_eq!(dictionary.bucket(3).len(), 2);
//! assert_eq!(dictionary.bucket(3)[0].answer(), "CAT");
//! assert!(dictionary.bucket(4).is_empty());
//! # Ok::<(), gridsmith_core::DictionaryError>(())
//! ```

use std::collections::BTreeMap;

/// A single clue/answer pair.
///
/// Answers are normalized to ASCII uppercase on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClueEntry {
    clue: String,
    answer: String,
}

impl ClueEntry {
    /// Returns the clue text shown to the player.
    #[must_use]
    pub fn clue(&self) -> &str {
        &self.clue
    }

    /// Returns the uppercase answer.
    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }
}

/// Clue/answer pairs bucketed by answer length.
///
/// The dictionary is the crossword generator's candidate pool source: the
/// fill phase borrows it read-only and tracks consumption separately, so a
/// single dictionary can serve many generation runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClueDictionary {
    buckets: BTreeMap<usize, Vec<ClueEntry>>,
    len: usize,
}

impl ClueDictionary {
    /// Builds a dictionary from clue/answer pairs.
    ///
    /// Answers must be ASCII alphabetic and at least two characters long;
    /// they are uppercased so fills compare characters case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`DictionaryError`] for the first invalid answer encountered.
    pub fn from_pairs<I, C, A>(pairs: I) -> Result<Self, DictionaryError>
    where
        I: IntoIterator<Item = (C, A)>,
        C: Into<String>,
        A: AsRef<str>,
    {
        let mut buckets: BTreeMap<usize, Vec<ClueEntry>> = BTreeMap::new();
        let mut len = 0;
        for (clue, answer) in pairs {
            let answer = answer.as_ref();
            if answer.len() < 2 {
                return Err(DictionaryError::AnswerTooShort {
                    answer: answer.to_owned(),
                });
            }
            if !answer.chars().all(|ch| ch.is_ascii_alphabetic()) {
                return Err(DictionaryError::AnswerNotAlphabetic {
                    answer: answer.to_owned(),
                });
            }
            let entry = ClueEntry {
                clue: clue.into(),
                answer: answer.to_ascii_uppercase(),
            };
            buckets.entry(entry.answer.len()).or_default().push(entry);
            len += 1;
        }
        Ok(Self { buckets, len })
    }

    /// Returns the entries whose answers have exactly `length` characters.
    ///
    /// Returns an empty slice when no answer of that length exists.
    #[must_use]
    pub fn bucket(&self, length: usize) -> &[ClueEntry] {
        self.buckets.get(&length).map_or(&[], Vec::as_slice)
    }

    /// Iterates over the answer lengths present, ascending.
    pub fn lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets.keys().copied()
    }

    /// Returns the total number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when the dictionary holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// An invalid clue/answer pair.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum DictionaryError {
    /// The answer has fewer than two characters.
    #[display("answer {answer:?} is shorter than two letters")]
    AnswerTooShort {
        /// The offending answer.
        answer: String,
    },
    /// The answer contains a character outside `A-Z`/`a-z`.
    #[display("answer {answer:?} contains a non-alphabetic character")]
    AnswerNotAlphabetic {
        /// The offending answer.
        answer: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ClueDictionary {
        ClueDictionary::from_pairs([
            ("Feline pet", "cat"),
            ("Canine pet", "dog"),
            ("Nocturnal bird", "owl"),
            ("Large deer", "moose"),
        ])
        .unwrap()
    }

    #[test]
    fn test_buckets_by_length() {
        let dictionary = sample();
        assert_eq!(dictionary.len(), 4);
        assert_eq!(dictionary.bucket(3).len(), 3);
        assert_eq!(dictionary.bucket(5).len(), 1);
        assert!(dictionary.bucket(7).is_empty());
        assert_eq!(dictionary.lengths().collect::<Vec<_>>(), vec![3, 5]);
    }

    #[test]
    fn test_answers_uppercased() {
        let dictionary = sample();
        assert!(
            dictionary
                .bucket(3)
                .iter()
                .all(|entry| entry.answer().chars().all(|ch| ch.is_ascii_uppercase()))
        );
    }

    #[test]
    fn test_clue_preserved() {
        let dictionary = sample();
        assert_eq!(dictionary.bucket(5)[0].clue(), "Large deer");
    }

    #[test]
    fn test_rejects_short_answer() {
        let err = ClueDictionary::from_pairs([("One letter", "a")]).unwrap_err();
        assert_eq!(
            err,
            DictionaryError::AnswerTooShort {
                answer: "a".to_owned()
            }
        );
    }

    #[test]
    fn test_rejects_non_alphabetic_answer() {
        let err = ClueDictionary::from_pairs([("Hyphenated", "no-op")]).unwrap_err();
        assert_eq!(
            err,
            DictionaryError::AnswerNotAlphabetic {
                answer: "no-op".to_owned()
            }
        );
    }

    #[test]
    fn test_empty_dictionary() {
        let dictionary = ClueDictionary::from_pairs(std::iter::empty::<(&str, &str)>()).unwrap();
        assert!(dictionary.is_empty());
        assert_eq!(dictionary.len(), 0);
        assert_eq!(dictionary.lengths().count(), 0);
    }
}
