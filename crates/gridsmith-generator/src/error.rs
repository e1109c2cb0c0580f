//! Generation failures surfaced to callers.

use gridsmith_engine::EngineError;

/// A generation run that could not produce a puzzle.
///
/// Constraint violations during search are recovered internally by
/// retraction and never reach this type; only two things do. Parameter sets
/// rejected eagerly, before any search runs, surface as
/// [`InvalidParameters`](Self::InvalidParameters). Everything else is a
/// total search failure: the whole candidate space (or the search budget)
/// ran out without a complete grid, and the caller should retry with a
/// fresh seed or relaxed parameters. No partial grid is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum GenerateError {
    /// The request can never be satisfied; rejected before searching.
    #[display("invalid generation parameters: {reason}")]
    InvalidParameters {
        /// Why the parameters were rejected.
        reason: String,
    },
    /// The crossword layout search ran out of candidate placements.
    #[display("layout search exhausted after reaching {placed} of {target} words")]
    LayoutExhausted {
        /// Words derived when the root candidate space ran out.
        placed: usize,
        /// The requested word count.
        target: usize,
    },
    /// The crossword fill search ran out of consistent clue assignments.
    #[display("clue pool exhausted before every span could be filled")]
    CluesExhausted,
    /// A digit/value fill search exhausted its candidate space.
    #[display("fill search exhausted without completing the grid")]
    FillExhausted,
    /// Sudoku hole-poking ran out of removable cells below the requested
    /// minimum. This indicates inconsistent parameters rather than bad luck.
    #[display("hole quota unreachable: removed {achieved} cells, minimum requested {minimum}")]
    HoleQuotaUnreachable {
        /// Holes actually poked before the pool ran out.
        achieved: u8,
        /// The minimum the caller asked for.
        minimum: u8,
    },
    /// The engine aborted the search on its placement-attempt budget.
    #[display("{_0}")]
    #[from]
    Budget(EngineError),
}
