//! Crossword layout: reserving crossing word spans on an empty board.
//!
//! The layout search claims runs of cells ("spans") one at a time. Each
//! cell carries a reservation list of at most two span ids — one per axis —
//! so a cell can host exactly one across word and one down word. After every
//! full reservation the board's maximal runs are re-derived; a placement
//! survives only if no run has length exactly 2 (such a run could never
//! host a crossing-consistent word), no run outgrows the longest fillable
//! word, and the run count has not overshot the target.

use std::ops::RangeInclusive;

use gridsmith_core::{Axis, Direction, Grid, Position};
use gridsmith_engine::{BacktrackProblem, SlotSelection};
use rand::{rand_core::RngCore, seq::SliceRandom as _};
use tinyvec::ArrayVec;

/// Index of a reserved span in the layout arena.
pub(crate) type SpanId = usize;

/// Reservations on one cell: at most one span per axis.
type CellClaims = ArrayVec<[SpanId; 2]>;

/// One candidate reservation: `length` cells from `anchor` toward
/// `direction`, anchor included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SpanPlacement {
    pub anchor: Position,
    pub direction: Direction,
    pub length: u8,
}

/// A reserved span in the arena.
#[derive(Debug, Clone)]
struct LayoutSpan {
    axis: Axis,
    cells: Vec<Position>,
}

/// A maximal run of claimed cells; one derived run becomes one word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Run {
    pub axis: Axis,
    pub cells: Vec<Position>,
}

impl Run {
    pub(crate) fn start(&self) -> Position {
        self.cells[0]
    }

    pub(crate) fn len(&self) -> usize {
        self.cells.len()
    }
}

/// The mutable reservation state of the layout search.
#[derive(Debug, Clone)]
pub(crate) struct LayoutBoard {
    claims: Grid<CellClaims>,
    spans: Vec<LayoutSpan>,
}

impl LayoutBoard {
    pub(crate) fn new(width: u8, height: u8) -> Self {
        Self {
            claims: Grid::new(width, height, CellClaims::new()),
            spans: Vec::new(),
        }
    }

    pub(crate) fn span_count(&self) -> usize {
        self.spans.len()
    }

    /// Positions with at least one reservation, row-major.
    fn claimed_positions(&self) -> Vec<Position> {
        self.claims
            .positions()
            .filter(|&pos| !self.claims.get(pos).is_empty())
            .collect()
    }

    /// Reserves every cell of `placement`, or changes nothing.
    ///
    /// A cell accepts the reservation only if it is on the board, carries
    /// fewer than two claims, and every existing claim has a different axis.
    pub(crate) fn try_reserve(&mut self, placement: &SpanPlacement) -> bool {
        let axis = placement.direction.axis();
        let mut cells = Vec::with_capacity(usize::from(placement.length));
        let mut pos = placement.anchor;
        for i in 0..placement.length {
            if i > 0 {
                pos = match pos.step(placement.direction) {
                    Some(next) => next,
                    None => return false,
                };
            }
            if !self.claims.contains(pos) {
                return false;
            }
            let claims = self.claims.get(pos);
            if claims.len() >= 2 {
                return false;
            }
            if claims.iter().any(|&id| self.spans[id].axis == axis) {
                return false;
            }
            cells.push(pos);
        }
        let id = self.spans.len();
        for &cell in &cells {
            self.claims.get_mut(cell).push(id);
        }
        self.spans.push(LayoutSpan { axis, cells });
        true
    }

    /// Removes the most recent reservation. Reservations are torn down
    /// strictly last-in-first-out by the backtracking engine.
    pub(crate) fn unreserve_last(&mut self) {
        let span = self.spans.pop().expect("unreserve without reservation");
        let id = self.spans.len();
        for cell in span.cells {
            let claims = self.claims.get_mut(cell);
            let i = claims
                .iter()
                .position(|&claim| claim == id)
                .expect("claim recorded at reservation");
            claims.remove(i);
        }
    }

    /// Derives all maximal runs of claimed cells with length ≥ 2, sorted by
    /// start position (row-major), across before down.
    pub(crate) fn derive_runs(&self) -> Vec<Run> {
        let mut runs = Vec::new();
        for y in 0..self.claims.height() {
            self.collect_line_runs(
                (0..self.claims.width()).map(|x| Position::new(x, y)),
                Axis::Horizontal,
                &mut runs,
            );
        }
        for x in 0..self.claims.width() {
            self.collect_line_runs(
                (0..self.claims.height()).map(|y| Position::new(x, y)),
                Axis::Vertical,
                &mut runs,
            );
        }
        runs.sort_by_key(|run| {
            (
                run.start().y(),
                run.start().x(),
                run.axis == Axis::Vertical,
            )
        });
        runs
    }

    fn collect_line_runs(
        &self,
        line: impl Iterator<Item = Position>,
        axis: Axis,
        runs: &mut Vec<Run>,
    ) {
        let mut current: Vec<Position> = Vec::new();
        for pos in line {
            if self.claims.get(pos).is_empty() {
                Self::flush_run(axis, &mut current, runs);
            } else {
                current.push(pos);
            }
        }
        Self::flush_run(axis, &mut current, runs);
    }

    fn flush_run(axis: Axis, current: &mut Vec<Position>, runs: &mut Vec<Run>) {
        if current.len() >= 2 {
            runs.push(Run {
                axis,
                cells: std::mem::take(current),
            });
        } else {
            current.clear();
        }
    }
}

/// The layout search: one span reservation per recursion level until the
/// derived word count meets the target.
#[derive(Debug)]
pub(crate) struct LayoutProblem {
    board: LayoutBoard,
    lengths: RangeInclusive<u8>,
    target: usize,
}

impl LayoutProblem {
    pub(crate) fn new(width: u8, height: u8, lengths: RangeInclusive<u8>, target: usize) -> Self {
        Self {
            board: LayoutBoard::new(width, height),
            lengths,
            target,
        }
    }

    pub(crate) fn word_count(&self) -> usize {
        self.board.derive_runs().len()
    }

    pub(crate) fn into_runs(self) -> Vec<Run> {
        self.board.derive_runs()
    }

    fn shuffled_lengths(&self, rng: &mut dyn RngCore) -> Vec<u8> {
        let mut lengths: Vec<u8> = self.lengths.clone().collect();
        lengths.shuffle(rng);
        lengths
    }
}

impl BacktrackProblem for LayoutProblem {
    type Slot = ();
    type Candidate = SpanPlacement;

    fn select_slot(&self) -> SlotSelection<()> {
        if self.word_count() == self.target {
            SlotSelection::Complete
        } else {
            SlotSelection::Open(())
        }
    }

    fn candidates(&self, _slot: &(), rng: &mut dyn RngCore) -> Vec<SpanPlacement> {
        let mut out = Vec::new();
        if self.board.span_count() == 0 {
            // The first span grows from the top-left corner, down or right.
            let mut directions = [Direction::Down, Direction::Right];
            directions.shuffle(rng);
            for direction in directions {
                for length in self.shuffled_lengths(rng) {
                    out.push(SpanPlacement {
                        anchor: Position::new(0, 0),
                        direction,
                        length,
                    });
                }
            }
        } else {
            let mut anchors = self.board.claimed_positions();
            anchors.shuffle(rng);
            for anchor in anchors {
                let mut directions = Direction::ALL;
                directions.shuffle(rng);
                for direction in directions {
                    for length in self.shuffled_lengths(rng) {
                        out.push(SpanPlacement {
                            anchor,
                            direction,
                            length,
                        });
                    }
                }
            }
        }
        out
    }

    fn try_place(&mut self, _slot: &(), candidate: &SpanPlacement) -> bool {
        if !self.board.try_reserve(candidate) {
            return false;
        }
        let runs = self.board.derive_runs();
        let max_len = usize::from(*self.lengths.end());
        let rejected = runs.iter().any(|run| run.len() == 2)
            || runs.iter().any(|run| run.len() > max_len)
            || runs.len() > self.target;
        if rejected {
            self.board.unreserve_last();
            return false;
        }
        true
    }

    fn retract(&mut self, _slot: &(), _candidate: &SpanPlacement) {
        self.board.unreserve_last();
    }
}
