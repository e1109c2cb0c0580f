//! Crossword fill: assigning dictionary answers to derived runs.
//!
//! Runs are filled in start-position order. Candidates for a run are the
//! unconsumed dictionary entries of matching length whose answers agree
//! with every character already contributed by crossing runs; placement
//! writes the answer's characters and consumes the entry, and retraction
//! restores the entry and clears only the characters no other filled run
//! still claims.

use std::collections::BTreeMap;

use gridsmith_core::{ClueDictionary, ClueEntry, Grid, Position};
use gridsmith_engine::{BacktrackProblem, SlotSelection};
use rand::{rand_core::RngCore, seq::SliceRandom as _};
use tinyvec::ArrayVec;

use super::layout::Run;

/// Runs covering one cell: at most one per axis.
type CoverList = ArrayVec<[usize; 2]>;

/// The fill-phase search state.
#[derive(Debug)]
pub(crate) struct FillProblem<'a> {
    runs: &'a [Run],
    dictionary: &'a ClueDictionary,
    chars: Grid<Option<char>>,
    /// Per-run assignment: an index into the bucket of the run's length.
    assigned: Vec<Option<usize>>,
    /// Consumption flags per bucket, keyed by answer length.
    used: BTreeMap<usize, Vec<bool>>,
    /// Cell → indices of the runs covering it.
    cover: Grid<CoverList>,
}

impl<'a> FillProblem<'a> {
    pub(crate) fn new(
        width: u8,
        height: u8,
        runs: &'a [Run],
        dictionary: &'a ClueDictionary,
    ) -> Self {
        let mut used = BTreeMap::new();
        for run in runs {
            used.entry(run.len())
                .or_insert_with(|| vec![false; dictionary.bucket(run.len()).len()]);
        }
        let mut cover = Grid::new(width, height, CoverList::new());
        for (i, run) in runs.iter().enumerate() {
            for &cell in &run.cells {
                cover.get_mut(cell).push(i);
            }
        }
        Self {
            runs,
            dictionary,
            chars: Grid::new(width, height, None),
            assigned: vec![None; runs.len()],
            used,
            cover,
        }
    }

    /// Consumes the finished fill into the character grid and the
    /// entry assigned to each run, in run order.
    ///
    /// # Panics
    ///
    /// Panics if any run is still unassigned.
    pub(crate) fn into_solution(self) -> (Grid<Option<char>>, Vec<ClueEntry>) {
        let entries = self
            .runs
            .iter()
            .zip(&self.assigned)
            .map(|(run, assigned)| {
                let entry = assigned.expect("fill completed every run");
                self.dictionary.bucket(run.len())[entry].clone()
            })
            .collect();
        (self.chars, entries)
    }

    /// Renders the partial fill for failure logging.
    pub(crate) fn render_partial(&self) -> String {
        let mut out = String::new();
        for row in self.chars.rows() {
            if !out.is_empty() {
                out.push('\n');
            }
            for cell in row {
                out.push(cell.unwrap_or('.'));
            }
        }
        out
    }

    fn matches_pattern(answer: &str, pattern: &[Option<char>]) -> bool {
        answer.len() == pattern.len()
            && answer
                .chars()
                .zip(pattern)
                .all(|(ch, required)| required.is_none_or(|required| required == ch))
    }
}

impl BacktrackProblem for FillProblem<'_> {
    type Slot = usize;
    type Candidate = usize;

    fn select_slot(&self) -> SlotSelection<usize> {
        match self.assigned.iter().position(Option::is_none) {
            Some(i) => SlotSelection::Open(i),
            None => SlotSelection::Complete,
        }
    }

    fn candidates(&self, slot: &usize, rng: &mut dyn RngCore) -> Vec<usize> {
        let run = &self.runs[*slot];
        let bucket = self.dictionary.bucket(run.len());
        let used = &self.used[&run.len()];
        // Required characters implied by already-filled crossing runs.
        let pattern: Vec<Option<char>> =
            run.cells.iter().map(|&cell| *self.chars.get(cell)).collect();
        let mut out: Vec<usize> = (0..bucket.len())
            .filter(|&entry| {
                !used[entry] && Self::matches_pattern(bucket[entry].answer(), &pattern)
            })
            .collect();
        out.shuffle(rng);
        out
    }

    fn try_place(&mut self, slot: &usize, candidate: &usize) -> bool {
        let run = &self.runs[*slot];
        let answer = self.dictionary.bucket(run.len())[*candidate].answer();
        // A filled crossing character may match; a mismatch rejects the
        // attempt without touching the board.
        for (&cell, ch) in run.cells.iter().zip(answer.chars()) {
            if self.chars.get(cell).is_some_and(|existing| existing != ch) {
                return false;
            }
        }
        for (&cell, ch) in run.cells.iter().zip(answer.chars()) {
            self.chars.set(cell, Some(ch));
        }
        self.assigned[*slot] = Some(*candidate);
        self.used.get_mut(&run.len()).expect("bucket exists")[*candidate] = true;
        true
    }

    fn retract(&mut self, slot: &usize, candidate: &usize) {
        let run = &self.runs[*slot];
        self.assigned[*slot] = None;
        self.used.get_mut(&run.len()).expect("bucket exists")[*candidate] = false;
        for &cell in &run.cells {
            let kept_by_other = self
                .cover
                .get(cell)
                .iter()
                .any(|&other| other != *slot && self.assigned[other].is_some());
            if !kept_by_other {
                self.chars.set(cell, None);
            }
        }
    }
}
