//! Sudoku generation: full-grid fill and hole-poking.
//!
//! Generation runs in two phases. The fill phase backtracks over the empty
//! 9×9 board, placing shuffled digits into the first empty cell in
//! row-major order under the row/column/box constraint. The hole-poking
//! phase then clears cells from a shuffled pool of all 81 positions, keeping
//! a removal only when the puzzle still has a unique solution, until a
//! target drawn from the requested hole range is met.
//!
//! # Examples
//!
//! ```
//! use gridsmith_generator::{PuzzleSeed, SudokuGenerator};
//!
//! let generator = SudokuGenerator::new(30..=40)?;
//! let puzzle = generator.generate_with_seed(PuzzleSeed::from_phrase("docs"))?;
//!
//! assert!((30..=40).contains(&puzzle.holes));
//! assert_eq!(puzzle.solution.hole_count(), 0);
//! # Ok::<(), gridsmith_generator::GenerateError>(())
//! ```

use std::fmt::{self, Display};
use std::ops::RangeInclusive;
use std::str::FromStr;

use gridsmith_core::{Grid, Position};
use gridsmith_engine::{BacktrackProblem, SearchBudget, SlotSelection, solve};
use log::{debug, warn};
use rand::{RngExt as _, rand_core::RngCore, seq::SliceRandom as _};

use crate::{GenerateError, PuzzleSeed};

/// Placement attempts allowed for one fill search.
const FILL_BUDGET: u64 = 500_000;

/// A 9×9 sudoku board; `None` cells are holes.
///
/// # Examples
///
/// ```
/// use std::str::FromStr as _;
///
/// use gridsmith_core::Position;
/// use gridsmith_generator::DigitGrid;
///
/// let grid = DigitGrid::from_str(
///     "
///     53_ _7_ ___
///     6__ 195 ___
///     _98 ___ _6_
///     8__ _6_ __3
///     4__ 8_3 __1
///     7__ _2_ __6
///     _6_ ___ 28_
///     ___ 419 __5
///     ___ _8_ _79
/// ",
/// )?;
/// assert_eq!(grid.get(Position::new(0, 0)), Some(5));
/// assert_eq!(grid.get(Position::new(2, 0)), None);
/// assert_eq!(grid.hole_count(), 51);
/// # Ok::<(), gridsmith_generator::ParseDigitGridError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitGrid(Grid<Option<u8>>);

impl DigitGrid {
    /// Creates an all-holes board.
    #[must_use]
    pub fn empty() -> Self {
        Self(Grid::new(9, 9, None))
    }

    /// Returns the digit at `pos`, or `None` for a hole.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the 9×9 board.
    #[must_use]
    pub fn get(&self, pos: Position) -> Option<u8> {
        *self.0.get(pos)
    }

    /// Returns the number of holes.
    #[must_use]
    pub fn hole_count(&self) -> u8 {
        #[expect(clippy::cast_possible_truncation, reason = "at most 81 cells")]
        let holes = self
            .0
            .positions()
            .filter(|&pos| self.get(pos).is_none())
            .count() as u8;
        holes
    }

    /// Returns `true` when no holes remain.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.hole_count() == 0
    }

    fn set(&mut self, pos: Position, digit: u8) {
        debug_assert!((1..=9).contains(&digit));
        self.0.set(pos, Some(digit));
    }

    fn clear(&mut self, pos: Position) {
        self.0.set(pos, None);
    }

    fn first_empty(&self) -> Option<Position> {
        self.0.positions().find(|&pos| self.get(pos).is_none())
    }

    /// Safe iff no other cell in the row, column, or box holds `digit`.
    fn is_safe(&self, pos: Position, digit: u8) -> bool {
        for i in 0..9 {
            let row_pos = Position::new(i, pos.y());
            if row_pos != pos && self.get(row_pos) == Some(digit) {
                return false;
            }
            let col_pos = Position::new(pos.x(), i);
            if col_pos != pos && self.get(col_pos) == Some(digit) {
                return false;
            }
        }
        let origin = Position::new(pos.x() / 3 * 3, pos.y() / 3 * 3);
        for dy in 0..3 {
            for dx in 0..3 {
                let box_pos = Position::new(origin.x() + dx, origin.y() + dy);
                if box_pos != pos && self.get(box_pos) == Some(digit) {
                    return false;
                }
            }
        }
        true
    }
}

impl Display for DigitGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..9 {
            if y > 0 {
                writeln!(f)?;
            }
            for x in 0..9 {
                if x > 0 && x % 3 == 0 {
                    write!(f, " ")?;
                }
                match self.get(Position::new(x, y)) {
                    Some(digit) => write!(f, "{digit}")?,
                    None => write!(f, "_")?,
                }
            }
        }
        Ok(())
    }
}

impl FromStr for DigitGrid {
    type Err = ParseDigitGridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cells = Vec::with_capacity(81);
        for ch in s.chars() {
            match ch {
                '1'..='9' => cells.push(Some(ch as u8 - b'0')),
                '0' | '.' | '_' => cells.push(None),
                ch if ch.is_whitespace() => {}
                ch => return Err(ParseDigitGridError::InvalidCharacter { character: ch }),
            }
        }
        if cells.len() != 81 {
            return Err(ParseDigitGridError::WrongCellCount { count: cells.len() });
        }
        let mut grid = Self::empty();
        for (i, cell) in cells.into_iter().enumerate() {
            #[expect(clippy::cast_possible_truncation, reason = "i < 81")]
            let pos = Position::new((i % 9) as u8, (i / 9) as u8);
            if let Some(digit) = cell {
                grid.set(pos, digit);
            }
        }
        Ok(grid)
    }
}

/// A string that does not describe a 9×9 board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseDigitGridError {
    /// A character is neither a digit, a hole marker (`_`, `.`, `0`), nor
    /// whitespace.
    #[display("invalid character {character:?} in digit grid")]
    InvalidCharacter {
        /// The offending character.
        character: char,
    },
    /// The string does not contain exactly 81 cells.
    #[display("digit grid must have 81 cells, got {count}")]
    WrongCellCount {
        /// The number of cells found.
        count: usize,
    },
}

/// The fill-phase search: shuffled digits into the first empty cell.
struct DigitFill {
    grid: DigitGrid,
}

impl BacktrackProblem for DigitFill {
    type Slot = Position;
    type Candidate = u8;

    fn select_slot(&self) -> SlotSelection<Position> {
        match self.grid.first_empty() {
            Some(pos) => SlotSelection::Open(pos),
            None => SlotSelection::Complete,
        }
    }

    fn candidates(&self, _slot: &Position, rng: &mut dyn RngCore) -> Vec<u8> {
        let mut digits: Vec<u8> = (1..=9).collect();
        digits.shuffle(rng);
        digits
    }

    fn try_place(&mut self, slot: &Position, candidate: &u8) -> bool {
        if !self.grid.is_safe(*slot, *candidate) {
            return false;
        }
        self.grid.set(*slot, *candidate);
        true
    }

    fn retract(&mut self, slot: &Position, _candidate: &u8) {
        self.grid.clear(*slot);
    }
}

/// Counts solutions of `grid`, stopping once `limit` are found.
///
/// Deterministic (digits tried in ascending order, no RNG) so hole-poking
/// stays reproducible per seed.
fn count_solutions(grid: &mut DigitGrid, limit: u32) -> u32 {
    let Some(pos) = grid.first_empty() else {
        return 1;
    };
    let mut total = 0;
    for digit in 1..=9 {
        if !grid.is_safe(pos, digit) {
            continue;
        }
        grid.set(pos, digit);
        total += count_solutions(grid, limit - total);
        grid.clear(pos);
        if total >= limit {
            break;
        }
    }
    total
}

fn has_unique_solution(puzzle: &DigitGrid) -> bool {
    let mut scratch = puzzle.clone();
    count_solutions(&mut scratch, 2) == 1
}

/// Generates sudoku puzzles with a configurable hole range.
///
/// # Examples
///
/// ```
/// use gridsmith_generator::{PuzzleSeed, SudokuGenerator};
///
/// let generator = SudokuGenerator::new(0..=0)?;
/// let puzzle = generator.generate_with_seed(PuzzleSeed::from_phrase("docs"))?;
///
/// // A zero-hole request returns the solved grid untouched.
/// assert_eq!(puzzle.puzzle, puzzle.solution);
/// # Ok::<(), gridsmith_generator::GenerateError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SudokuGenerator {
    holes: RangeInclusive<u8>,
}

impl SudokuGenerator {
    /// Creates a generator that pokes a hole count drawn from `holes`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::InvalidParameters`] when the range is empty
    /// or exceeds the 81 cells of the board.
    pub fn new(holes: RangeInclusive<u8>) -> Result<Self, GenerateError> {
        if holes.is_empty() {
            return Err(GenerateError::InvalidParameters {
                reason: format!(
                    "hole range {}..={} is empty",
                    holes.start(),
                    holes.end()
                ),
            });
        }
        if *holes.end() > 81 {
            return Err(GenerateError::InvalidParameters {
                reason: format!("hole count {} exceeds the 81 cells", holes.end()),
            });
        }
        Ok(Self { holes })
    }

    /// Generates a puzzle from a fresh random seed.
    ///
    /// # Errors
    ///
    /// See [`generate_with_seed`](Self::generate_with_seed).
    pub fn generate(&self) -> Result<SudokuPuzzle, GenerateError> {
        self.generate_with_seed(PuzzleSeed::random())
    }

    /// Generates the puzzle identified by `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::HoleQuotaUnreachable`] when the removal pool
    /// runs out below the requested minimum, and
    /// [`GenerateError::Budget`]/[`GenerateError::FillExhausted`] when the
    /// fill search aborts (neither occurs for the standard 9×9 board in
    /// practice).
    pub fn generate_with_seed(&self, seed: PuzzleSeed) -> Result<SudokuPuzzle, GenerateError> {
        let mut rng = seed.rng();
        let mut fill = DigitFill {
            grid: DigitGrid::empty(),
        };
        let mut budget = SearchBudget::new(FILL_BUDGET);
        if !solve(&mut fill, &mut rng, &mut budget)? {
            return Err(GenerateError::FillExhausted);
        }
        let solution = fill.grid;
        debug!(
            "filled sudoku grid in {} placement attempts",
            budget.spent()
        );

        let mut puzzle = solution.clone();
        let target = rng.random_range(self.holes.clone());
        let mut pool: Vec<u8> = (0..81).collect();
        pool.shuffle(&mut rng);

        let mut holes = 0;
        for index in pool {
            if holes == target {
                break;
            }
            let pos = Position::new(index % 9, index / 9);
            let digit = puzzle.get(pos).expect("pool indices are distinct");
            puzzle.clear(pos);
            if has_unique_solution(&puzzle) {
                holes += 1;
            } else {
                // Removal breaks uniqueness: restore, don't count the cell.
                puzzle.set(pos, digit);
            }
        }
        if holes < *self.holes.start() {
            warn!(
                "hole pool exhausted at {holes} holes, minimum {} requested",
                self.holes.start()
            );
            return Err(GenerateError::HoleQuotaUnreachable {
                achieved: holes,
                minimum: *self.holes.start(),
            });
        }
        Ok(SudokuPuzzle {
            seed,
            solution,
            puzzle,
            holes,
        })
    }
}

/// A generated sudoku puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SudokuPuzzle {
    /// The seed that reproduces this puzzle.
    pub seed: PuzzleSeed,
    /// The fully solved board.
    pub solution: DigitGrid,
    /// The player-facing board, with holes poked.
    pub puzzle: DigitGrid,
    /// The number of holes poked.
    pub holes: u8,
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn assert_valid_solution(grid: &DigitGrid) {
        assert!(grid.is_complete());
        let mut groups: Vec<Vec<Position>> = Vec::new();
        for i in 0..9 {
            groups.push((0..9).map(|x| Position::new(x, i)).collect());
            groups.push((0..9).map(|y| Position::new(i, y)).collect());
            let origin = Position::new(i % 3 * 3, i / 3 * 3);
            groups.push(
                (0..9)
                    .map(|j| Position::new(origin.x() + j % 3, origin.y() + j / 3))
                    .collect(),
            );
        }
        for group in groups {
            let mut digits: Vec<u8> = group.iter().map(|&pos| grid.get(pos).unwrap()).collect();
            digits.sort_unstable();
            assert_eq!(digits, (1..=9).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_fill_produces_valid_solution() {
        let generator = SudokuGenerator::new(0..=0).unwrap();
        let puzzle = generator
            .generate_with_seed(PuzzleSeed::from_phrase("fill"))
            .unwrap();
        assert_valid_solution(&puzzle.solution);
    }

    #[test]
    fn test_zero_holes_leaves_solution_untouched() {
        let generator = SudokuGenerator::new(0..=0).unwrap();
        let puzzle = generator
            .generate_with_seed(PuzzleSeed::from_phrase("zero holes"))
            .unwrap();
        assert_eq!(puzzle.holes, 0);
        assert_eq!(puzzle.puzzle, puzzle.solution);
    }

    #[test]
    fn test_hole_count_within_range() {
        let generator = SudokuGenerator::new(20..=30).unwrap();
        let puzzle = generator
            .generate_with_seed(PuzzleSeed::from_phrase("holes"))
            .unwrap();
        assert!((20..=30).contains(&puzzle.holes));
        assert_eq!(puzzle.puzzle.hole_count(), puzzle.holes);
    }

    #[test]
    fn test_puzzle_agrees_with_solution_outside_holes() {
        let generator = SudokuGenerator::new(25..=25).unwrap();
        let puzzle = generator
            .generate_with_seed(PuzzleSeed::from_phrase("agree"))
            .unwrap();
        for pos in (0..9).flat_map(|y| (0..9).map(move |x| Position::new(x, y))) {
            if let Some(digit) = puzzle.puzzle.get(pos) {
                assert_eq!(puzzle.solution.get(pos), Some(digit));
            }
        }
    }

    #[test]
    fn test_poked_puzzle_has_unique_solution() {
        let generator = SudokuGenerator::new(30..=40).unwrap();
        let puzzle = generator
            .generate_with_seed(PuzzleSeed::from_phrase("unique"))
            .unwrap();
        assert!(has_unique_solution(&puzzle.puzzle));
    }

    #[test]
    fn test_determinism() {
        let generator = SudokuGenerator::new(25..=45).unwrap();
        let seed = PuzzleSeed::from_phrase("determinism");
        let first = generator.generate_with_seed(seed).unwrap();
        let second = generator.generate_with_seed(seed).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rejects_hole_count_over_81() {
        let err = SudokuGenerator::new(10..=90).unwrap_err();
        assert!(matches!(err, GenerateError::InvalidParameters { .. }));
    }

    #[test]
    fn test_rejects_empty_range() {
        #[expect(clippy::reversed_empty_ranges, reason = "the rejection under test")]
        let err = SudokuGenerator::new(5..=2).unwrap_err();
        assert!(matches!(err, GenerateError::InvalidParameters { .. }));
    }

    #[test]
    fn test_count_solutions_on_known_puzzle() {
        let mut grid: DigitGrid = "
            53_ _7_ ___
            6__ 195 ___
            _98 ___ _6_
            8__ _6_ __3
            4__ 8_3 __1
            7__ _2_ __6
            _6_ ___ 28_
            ___ 419 __5
            ___ _8_ _79
        "
        .parse()
        .unwrap();
        assert_eq!(count_solutions(&mut grid, 2), 1);
    }

    #[test]
    fn test_count_solutions_detects_ambiguity() {
        // A nearly empty grid has far more than one solution.
        let mut grid = DigitGrid::empty();
        grid.set(Position::new(0, 0), 1);
        assert_eq!(count_solutions(&mut grid, 2), 2);
    }

    #[test]
    fn test_digit_grid_display_round_trip() {
        let generator = SudokuGenerator::new(0..=0).unwrap();
        let puzzle = generator
            .generate_with_seed(PuzzleSeed::from_phrase("render"))
            .unwrap();
        let rendered = puzzle.solution.to_string();
        let parsed: DigitGrid = rendered.parse().unwrap();
        assert_eq!(parsed, puzzle.solution);
    }

    #[test]
    fn test_digit_grid_rejects_bad_character() {
        let err = DigitGrid::from_str(&"x".repeat(81)).unwrap_err();
        assert_eq!(
            err,
            ParseDigitGridError::InvalidCharacter { character: 'x' }
        );
    }

    #[test]
    fn test_digit_grid_rejects_wrong_count() {
        let err = DigitGrid::from_str("123").unwrap_err();
        assert_eq!(err, ParseDigitGridError::WrongCellCount { count: 3 });
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        fn prop_generated_puzzles_are_sound(seed_bytes in any::<[u8; 32]>()) {
            let generator = SudokuGenerator::new(20..=50).unwrap();
            let seed = PuzzleSeed::from_bytes(seed_bytes);
            let puzzle = generator.generate_with_seed(seed).unwrap();
            assert_valid_solution(&puzzle.solution);
            prop_assert!((20..=50).contains(&puzzle.holes));
            prop_assert_eq!(puzzle.puzzle.hole_count(), puzzle.holes);
            prop_assert!(has_unique_solution(&puzzle.puzzle));
        }
    }
}
