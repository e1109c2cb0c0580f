//! Generic depth-first backtracking search.
//!
//! Every Gridsmith generator is an instance of the same search skeleton:
//! pick the next open slot, enumerate candidates for it, tentatively place
//! one, recurse, and undo the placement when the descent fails. This crate
//! owns that skeleton so the generators only describe their
//! problem-specific pieces — slot selection, candidate enumeration,
//! placement validity, and retraction.
//!
//! # Examples
//!
//! ```
//! use gridsmith_engine::{BacktrackProblem, SearchBudget, SlotSelection, solve};
//! use rand::{rand_core::RngCore, SeedableRng as _};
//!
//! // Fill three slots with digits so that no two neighbors are equal.
//! struct NoRepeats {
//!     slots: [Option<u8>; 3],
//! }
//!
//! impl BacktrackProblem for NoRepeats {
//!     type Slot = usize;
//!     type Candidate = u8;
//!
//!     fn select_slot(&self) -> SlotSelection<usize> {
//!         match self.slots.iter().position(Option::is_none) {
//!             Some(i) => SlotSelection::Open(i),
//!             None => SlotSelection::Complete,
//!         }
//!     }
//!
//!     fn candidates(&self, _slot: &usize, _rng: &mut dyn RngCore) -> Vec<u8> {
//!         vec![1, 2]
//!     }
//!
//!     fn try_place(&mut self, slot: &usize, candidate: &u8) -> bool {
//!         if *slot > 0 && self.slots[slot - 1] == Some(*candidate) {
//!             return false;
//!         }
//!         self.slots[*slot] = Some(*candidate);
//!         true
//!     }
//!
//!     fn retract(&mut self, slot: &usize, _candidate: &u8) {
//!         self.slots[*slot] = None;
//!     }
//! }
//!
//! let mut problem = NoRepeats { slots: [None; 3] };
//! let mut rng = rand_pcg::Pcg64::seed_from_u64(0);
//! let mut budget = SearchBudget::new(1_000);
//! let solved = solve(&mut problem, &mut rng, &mut budget)?;
//! assert!(solved);
//! # Ok::<(), gridsmith_engine::EngineError>(())
//! ```

pub mod backtrack;

pub use self::backtrack::{BacktrackProblem, EngineError, SearchBudget, SlotSelection, solve};
