//! Crossword generation: span layout plus dictionary fill.
//!
//! Generation runs in two phases over one board. The layout phase reserves
//! crossing word spans cell by cell until the number of derived maximal
//! runs meets the requested word count. The fill phase then assigns a
//! dictionary answer to every derived run under crossing-character
//! consistency. Both phases are instances of the shared
//! backtracking engine; a failure in either exhausts that phase's candidate
//! space and surfaces as a generation error, never as a partial puzzle.
//!
//! # Examples
//!
//! ```
//! use gridsmith_core::ClueDictionary;
//! use gridsmith_generator::{CrosswordGenerator, GenerateError, PuzzleSeed};
//!
//! let dictionary = ClueDictionary::from_pairs([
//!     ("Feline pet", "cat"),
//!     ("Hearing organ", "ear"),
//!     ("Brewed leaf drink", "tea"),
//!     ("Rodent", "rat"),
//!     ("Charged particle", "ion"),
//! ])?;
//! let generator = CrosswordGenerator::new(5, 5, 3..=5, 2, dictionary)?;
//!
//! // A given seed either yields a finished puzzle or a clean failure the
//! // caller retries with a fresh seed.
//! match generator.generate_with_seed(PuzzleSeed::from_phrase("docs")) {
//!     Ok(puzzle) => assert_eq!(puzzle.entries.len(), 2),
//!     Err(
//!         GenerateError::LayoutExhausted { .. }
//!         | GenerateError::CluesExhausted
//!         | GenerateError::Budget(_),
//!     ) => {}
//!     Err(err) => panic!("unexpected error: {err}"),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod fill;
mod layout;

use std::fmt::{self, Display};
use std::ops::RangeInclusive;

use gridsmith_core::{Axis, ClueDictionary, Direction, Grid, Position};
use gridsmith_engine::{SearchBudget, solve};
use log::{debug, warn};

use self::{fill::FillProblem, layout::LayoutProblem};
use crate::{GenerateError, PuzzleSeed};

/// Placement attempts allowed for the layout search.
const LAYOUT_BUDGET: u64 = 200_000;

/// Placement attempts allowed for the fill search.
const FILL_BUDGET: u64 = 200_000;

/// Generates crosswords for a fixed board size, word-length range, word
/// count, and dictionary.
#[derive(Debug, Clone)]
pub struct CrosswordGenerator {
    width: u8,
    height: u8,
    word_lengths: RangeInclusive<u8>,
    word_count: usize,
    dictionary: ClueDictionary,
}

impl CrosswordGenerator {
    /// Creates a generator for a `width × height` board holding exactly
    /// `word_count` words whose lengths fall in `word_lengths`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::InvalidParameters`] for requests no search
    /// could ever satisfy: word lengths below 3 (a two-letter run can never
    /// host a crossing-consistent word), words longer than the board, an
    /// empty length range, a word count of zero or beyond the board's
    /// geometric capacity, or a dictionary with no usable answers.
    pub fn new(
        width: u8,
        height: u8,
        word_lengths: RangeInclusive<u8>,
        word_count: usize,
        dictionary: ClueDictionary,
    ) -> Result<Self, GenerateError> {
        let invalid = |reason: String| GenerateError::InvalidParameters { reason };
        if word_lengths.is_empty() {
            return Err(invalid(format!(
                "word length range {}..={} is empty",
                word_lengths.start(),
                word_lengths.end()
            )));
        }
        if *word_lengths.start() < 3 {
            return Err(invalid(format!(
                "minimum word length {} is below 3",
                word_lengths.start()
            )));
        }
        let longest_line = width.max(height);
        if *word_lengths.end() > longest_line {
            return Err(invalid(format!(
                "maximum word length {} exceeds the {longest_line}-cell board lines",
                word_lengths.end()
            )));
        }
        if word_count == 0 {
            return Err(invalid("word count must be at least 1".to_owned()));
        }
        let capacity = Self::geometric_capacity(width, height, *word_lengths.start());
        if word_count > capacity {
            return Err(invalid(format!(
                "word count {word_count} exceeds the board capacity of {capacity}"
            )));
        }
        if !word_lengths
            .clone()
            .any(|length| !dictionary.bucket(usize::from(length)).is_empty())
        {
            return Err(invalid(
                "dictionary has no answers within the word length range".to_owned(),
            ));
        }
        Ok(Self {
            width,
            height,
            word_lengths,
            word_count,
            dictionary,
        })
    }

    /// Upper bound on how many words the board can geometrically hold:
    /// words of the minimum length packed per row and per column with a
    /// one-cell separator.
    fn geometric_capacity(width: u8, height: u8, min_len: u8) -> usize {
        let per_row = (usize::from(width) + 1) / (usize::from(min_len) + 1);
        let per_col = (usize::from(height) + 1) / (usize::from(min_len) + 1);
        usize::from(height) * per_row + usize::from(width) * per_col
    }

    /// Generates a puzzle from a fresh random seed.
    ///
    /// # Errors
    ///
    /// See [`generate_with_seed`](Self::generate_with_seed).
    pub fn generate(&self) -> Result<CrosswordPuzzle, GenerateError> {
        self.generate_with_seed(PuzzleSeed::random())
    }

    /// Generates the puzzle identified by `seed`.
    ///
    /// A seed either produces a complete puzzle or a total search failure;
    /// callers are expected to retry failures with a fresh seed.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::LayoutExhausted`] when no span arrangement
    /// reaches the word count, [`GenerateError::CluesExhausted`] when the
    /// dictionary cannot fill the derived runs consistently, and
    /// [`GenerateError::Budget`] when either search runs out of placement
    /// attempts first.
    pub fn generate_with_seed(&self, seed: PuzzleSeed) -> Result<CrosswordPuzzle, GenerateError> {
        let mut rng = seed.rng();

        let mut layout = LayoutProblem::new(
            self.width,
            self.height,
            self.word_lengths.clone(),
            self.word_count,
        );
        let mut budget = SearchBudget::new(LAYOUT_BUDGET);
        if !solve(&mut layout, &mut rng, &mut budget)? {
            warn!(
                "crossword layout exhausted at {} of {} words on a {}x{} board",
                layout.word_count(),
                self.word_count,
                self.width,
                self.height
            );
            return Err(GenerateError::LayoutExhausted {
                placed: layout.word_count(),
                target: self.word_count,
            });
        }
        debug!("layout complete in {} placement attempts", budget.spent());
        let runs = layout.into_runs();

        let mut fill = FillProblem::new(self.width, self.height, &runs, &self.dictionary);
        let mut budget = SearchBudget::new(FILL_BUDGET);
        if !solve(&mut fill, &mut rng, &mut budget)? {
            warn!(
                "crossword fill exhausted; partial board:\n{}",
                fill.render_partial()
            );
            return Err(GenerateError::CluesExhausted);
        }
        debug!("fill complete in {} placement attempts", budget.spent());

        let (cells, entries) = fill.into_solution();
        let entries = runs
            .iter()
            .zip(entries)
            .map(|(run, entry)| PlacedEntry {
                start: run.start(),
                direction: match run.axis {
                    Axis::Horizontal => Direction::Right,
                    Axis::Vertical => Direction::Down,
                },
                answer: entry.answer().to_owned(),
                clue: entry.clue().to_owned(),
            })
            .collect();
        Ok(CrosswordPuzzle {
            seed,
            cells,
            entries,
        })
    }
}

/// One word of a finished crossword: where it sits and what it answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedEntry {
    /// The first cell of the word.
    pub start: Position,
    /// [`Direction::Right`] for across entries, [`Direction::Down`] for
    /// down entries.
    pub direction: Direction,
    /// The uppercase answer.
    pub answer: String,
    /// The clue text shown to the player.
    pub clue: String,
}

/// A generated crossword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrosswordPuzzle {
    /// The seed that reproduces this puzzle.
    pub seed: PuzzleSeed,
    /// The board: `Some(letter)` for word cells, `None` for blanks.
    pub cells: Grid<Option<char>>,
    /// Every placed word with its clue, in start-position order (row-major,
    /// across before down).
    pub entries: Vec<PlacedEntry>,
}

impl CrosswordPuzzle {
    /// Returns the board width.
    #[must_use]
    pub fn width(&self) -> u8 {
        self.cells.width()
    }

    /// Returns the board height.
    #[must_use]
    pub fn height(&self) -> u8 {
        self.cells.height()
    }

    /// Returns the letter at `pos`, or `None` for a blank cell.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the board.
    #[must_use]
    pub fn cell(&self, pos: Position) -> Option<char> {
        *self.cells.get(pos)
    }
}

impl Display for CrosswordPuzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.cells.rows().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for cell in row {
                match cell {
                    Some(letter) => write!(f, "{letter}")?,
                    None => write!(f, "#")?,
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const WORDS: &[&str] = &[
        // 3 letters
        "cat", "dog", "sun", "ear", "rat", "car", "tea", "sea", "oat", "toe", "net", "ten",
        "eat", "art", "tar", "rot", "one", "ore", "era", "eel", "ant", "tan", "son", "nor",
        // 4 letters
        "rate", "tear", "seat", "note", "tone", "star", "arts", "east", "near", "earn",
        "rest", "rose", "sore", "tree", "tore", "ants", "nest", "oars",
        // 5 letters
        "stare", "tears", "notes", "stone", "tones", "earth", "heart", "rates", "aster",
        "snore", "tenor", "trees", "roast", "toast",
    ];

    fn test_dictionary() -> ClueDictionary {
        ClueDictionary::from_pairs(WORDS.iter().map(|word| (format!("Means {word}"), *word)))
            .unwrap()
    }

    /// Retries seeds derived from `tag` until one generates; individual
    /// seeds may fail, which callers handle by retrying with fresh
    /// randomness.
    fn generate_ok(generator: &CrosswordGenerator, tag: &str) -> CrosswordPuzzle {
        for i in 0..64 {
            let seed = PuzzleSeed::from_phrase(&format!("{tag}-{i}"));
            match generator.generate_with_seed(seed) {
                Ok(puzzle) => return puzzle,
                Err(
                    GenerateError::LayoutExhausted { .. }
                    | GenerateError::CluesExhausted
                    | GenerateError::Budget(_),
                ) => {}
                Err(err) => panic!("unexpected error: {err}"),
            }
        }
        panic!("no seed in 64 attempts produced a puzzle")
    }

    /// Re-derives the maximal letter runs of a finished board.
    fn letter_runs(puzzle: &CrosswordPuzzle) -> Vec<(Position, Direction, String)> {
        let mut runs = Vec::new();
        let (width, height) = (puzzle.width(), puzzle.height());
        for y in 0..height {
            collect_runs(
                puzzle,
                (0..width).map(|x| Position::new(x, y)),
                Direction::Right,
                &mut runs,
            );
        }
        for x in 0..width {
            collect_runs(
                puzzle,
                (0..height).map(|y| Position::new(x, y)),
                Direction::Down,
                &mut runs,
            );
        }
        runs
    }

    fn collect_runs(
        puzzle: &CrosswordPuzzle,
        line: impl Iterator<Item = Position>,
        direction: Direction,
        runs: &mut Vec<(Position, Direction, String)>,
    ) {
        let mut start = None;
        let mut word = String::new();
        for pos in line {
            match puzzle.cell(pos) {
                Some(letter) => {
                    if start.is_none() {
                        start = Some(pos);
                    }
                    word.push(letter);
                }
                None => {
                    if word.len() >= 2 {
                        runs.push((start.unwrap(), direction, std::mem::take(&mut word)));
                    }
                    word.clear();
                    start = None;
                }
            }
        }
        if word.len() >= 2 {
            runs.push((start.unwrap(), direction, word));
        }
    }

    fn assert_sound(puzzle: &CrosswordPuzzle, word_count: usize) {
        let runs = letter_runs(puzzle);
        // Every maximal run is a word: length >= 3, and exactly the
        // requested number of them.
        assert_eq!(runs.len(), word_count);
        assert_eq!(puzzle.entries.len(), word_count);
        for (_, _, word) in &runs {
            assert!(word.len() >= 3, "found forbidden short run {word:?}");
        }
        // Each entry matches the grid characters along its span, which also
        // checks crossing consistency (a cell holds one letter).
        for entry in &puzzle.entries {
            let mut pos = entry.start;
            for (i, ch) in entry.answer.chars().enumerate() {
                if i > 0 {
                    pos = pos.step(entry.direction).unwrap();
                }
                assert_eq!(puzzle.cell(pos), Some(ch), "mismatch in {}", entry.answer);
            }
        }
        // And every derived run is bound to exactly one entry.
        for (start, direction, word) in &runs {
            let matching = puzzle
                .entries
                .iter()
                .filter(|entry| {
                    entry.start == *start
                        && entry.direction == *direction
                        && entry.answer == *word
                })
                .count();
            assert_eq!(matching, 1, "run {word:?} at {start} bound {matching} times");
        }
    }

    #[test]
    fn test_five_by_five_scenario() {
        let generator = CrosswordGenerator::new(5, 5, 3..=5, 4, test_dictionary()).unwrap();
        let puzzle = generate_ok(&generator, "scenario");
        assert_sound(&puzzle, 4);
    }

    #[test]
    fn test_larger_board() {
        let generator = CrosswordGenerator::new(7, 7, 3..=5, 6, test_dictionary()).unwrap();
        let puzzle = generate_ok(&generator, "larger");
        assert_sound(&puzzle, 6);
    }

    #[test]
    fn test_determinism() {
        let generator = CrosswordGenerator::new(5, 5, 3..=5, 4, test_dictionary()).unwrap();
        let puzzle = generate_ok(&generator, "determinism");
        let again = generator.generate_with_seed(puzzle.seed).unwrap();
        assert_eq!(puzzle, again);
    }

    #[test]
    fn test_entries_sorted_by_start() {
        let generator = CrosswordGenerator::new(5, 5, 3..=5, 4, test_dictionary()).unwrap();
        let puzzle = generate_ok(&generator, "sorted");
        let keys: Vec<_> = puzzle
            .entries
            .iter()
            .map(|entry| {
                (
                    entry.start.y(),
                    entry.start.x(),
                    entry.direction == Direction::Down,
                )
            })
            .collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_starved_dictionary_fails_cleanly() {
        let dictionary = ClueDictionary::from_pairs([("Feline pet", "cat")]).unwrap();
        let generator = CrosswordGenerator::new(5, 5, 3..=5, 4, dictionary).unwrap();
        let err = generator
            .generate_with_seed(PuzzleSeed::from_phrase("starved"))
            .unwrap_err();
        assert!(matches!(
            err,
            GenerateError::CluesExhausted
                | GenerateError::LayoutExhausted { .. }
                | GenerateError::Budget(_)
        ));
    }

    #[test]
    fn test_rejects_word_length_below_three() {
        let err = CrosswordGenerator::new(5, 5, 2..=5, 4, test_dictionary()).unwrap_err();
        assert!(matches!(err, GenerateError::InvalidParameters { .. }));
    }

    #[test]
    fn test_rejects_word_longer_than_board() {
        let err = CrosswordGenerator::new(5, 5, 3..=6, 4, test_dictionary()).unwrap_err();
        assert!(matches!(err, GenerateError::InvalidParameters { .. }));
    }

    #[test]
    fn test_rejects_zero_word_count() {
        let err = CrosswordGenerator::new(5, 5, 3..=5, 0, test_dictionary()).unwrap_err();
        assert!(matches!(err, GenerateError::InvalidParameters { .. }));
    }

    #[test]
    fn test_rejects_geometrically_impossible_word_count() {
        // A 5x5 board with 3+ letter words holds at most 10 words.
        let err = CrosswordGenerator::new(5, 5, 3..=5, 11, test_dictionary()).unwrap_err();
        assert!(matches!(err, GenerateError::InvalidParameters { .. }));
    }

    #[test]
    fn test_rejects_dictionary_without_usable_lengths() {
        let dictionary = ClueDictionary::from_pairs([("Deer", "moose")]).unwrap();
        let err = CrosswordGenerator::new(5, 5, 3..=4, 2, dictionary).unwrap_err();
        assert!(matches!(err, GenerateError::InvalidParameters { .. }));
    }

    #[test]
    fn test_display_marks_blanks() {
        let generator = CrosswordGenerator::new(5, 5, 3..=5, 4, test_dictionary()).unwrap();
        let puzzle = generate_ok(&generator, "display");
        let rendered = puzzle.to_string();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|line| line.chars().count() == 5));
        for (y, line) in lines.iter().enumerate() {
            for (x, ch) in line.chars().enumerate() {
                #[expect(clippy::cast_possible_truncation, reason = "board is 5x5")]
                let pos = Position::new(x as u8, y as u8);
                match puzzle.cell(pos) {
                    Some(letter) => assert_eq!(ch, letter),
                    None => assert_eq!(ch, '#'),
                }
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        fn prop_any_seed_yields_puzzle_or_clean_failure(seed_bytes in any::<[u8; 32]>()) {
            let generator =
                CrosswordGenerator::new(5, 5, 3..=5, 4, test_dictionary()).unwrap();
            let seed = PuzzleSeed::from_bytes(seed_bytes);
            match generator.generate_with_seed(seed) {
                Ok(puzzle) => assert_sound(&puzzle, 4),
                Err(
                    GenerateError::LayoutExhausted { .. }
                    | GenerateError::CluesExhausted
                    | GenerateError::Budget(_),
                ) => {}
                Err(err) => prop_assert!(false, "unexpected error: {err}"),
            }
        }
    }
}
