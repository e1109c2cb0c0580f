//! Puzzle generators built on one backtracking engine.
//!
//! This crate hosts the three Gridsmith generators. Each one owns its grid
//! and candidate pools for the duration of a generation call, runs the
//! shared depth-first engine from [`gridsmith_engine`] to completion, and
//! returns either a finished puzzle or a [`GenerateError`] — never a
//! partial grid.
//!
//! - [`crossword`]: two-phase span layout and dictionary fill.
//! - [`sudoku`]: full-grid digit fill plus uniqueness-preserving
//!   hole-poking.
//! - [`operations`]: arithmetic grid fill with precedence-free prefix
//!   evaluation and per-operator usage caps.
//!
//! All randomness is drawn from a [`PuzzleSeed`]-keyed PCG-64 stream, so a
//! seed plus a parameter set reproduces a puzzle exactly.
//!
//! # Examples
//!
//! ```
//! use gridsmith_generator::{PuzzleSeed, SudokuGenerator};
//!
//! let generator = SudokuGenerator::new(30..=45)?;
//! let puzzle = generator.generate_with_seed(PuzzleSeed::from_phrase("lib docs"))?;
//! assert!(puzzle.puzzle.hole_count() >= 30);
//! # Ok::<(), gridsmith_generator::GenerateError>(())
//! ```

pub mod crossword;
pub mod error;
pub mod operations;
pub mod seed;
pub mod sudoku;

// Re-export commonly used types
pub use self::{
    crossword::{CrosswordGenerator, CrosswordPuzzle, PlacedEntry},
    error::GenerateError,
    operations::{Equation, OpCell, Operator, OperationsGenerator, OperationsPuzzle},
    seed::{ParseSeedError, PuzzleSeed},
    sudoku::{DigitGrid, ParseDigitGridError, SudokuGenerator, SudokuPuzzle},
};
