//! Core data structures for puzzle-grid generation.
//!
//! This crate provides the leaf data types shared by every Gridsmith
//! generator: board geometry, a generic rectangular grid, and the clue
//! dictionary that feeds crossword filling.
//!
//! # Overview
//!
//! - [`position`]: [`Position`] coordinates on a board, addressed from the
//!   top-left corner.
//! - [`direction`]: [`Direction`] unit steps and their [`Axis`]
//!   classification, used for span placement and alignment rules.
//! - [`grid`]: [`Grid`], a rectangular row-major matrix generic over its
//!   cell type.
//! - [`dictionary`]: [`ClueDictionary`], clue/answer pairs bucketed by
//!   answer length.
//!
//! # Examples
//!
//! ```
//! use gridsmith_core::{Direction, Grid, Position};
//!
//! let mut grid = Grid::new(5, 5, 0u8);
//! let pos = Position::new(2, 3);
//! grid.set(pos, 7);
//! assert_eq!(*grid.get(pos), 7);
//!
//! let above = pos.step(Direction::Up).unwrap();
//! assert_eq!(above, Position::new(2, 2));
//! ```

pub mod dictionary;
pub mod direction;
pub mod grid;
pub mod position;

// Re-export commonly used types
pub use self::{
    dictionary::{ClueDictionary, ClueEntry, DictionaryError},
    direction::{Axis, Direction},
    grid::Grid,
    position::Position,
};
