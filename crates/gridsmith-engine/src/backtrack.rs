//! The backtracking engine and its budget.

use rand::rand_core::RngCore;

/// The result of asking a problem for its next open slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotSelection<S> {
    /// Every slot is filled (or the problem's completion goal is met); the
    /// search is done.
    Complete,
    /// The slot the search should fill next.
    Open(S),
}

/// A constraint-satisfaction problem solvable by depth-first backtracking.
///
/// The engine drives implementations through a strict protocol:
///
/// 1. [`select_slot`](Self::select_slot) names the next open slot, or
///    reports completion.
/// 2. [`candidates`](Self::candidates) enumerates the values worth trying
///    at that slot, in the order to try them. Randomized problems shuffle
///    here with the engine-supplied RNG, which is the only randomness
///    source a problem may touch — that is what makes a run reproducible
///    from its seed.
/// 3. [`try_place`](Self::try_place) commits a candidate if it passes the
///    problem's validity rules. A rejected placement must leave the problem
///    exactly as it was: the engine will not call
///    [`retract`](Self::retract) for it.
/// 4. [`retract`](Self::retract) undoes a previously committed placement
///    when the descent below it failed. Placements are retracted strictly
///    last-in-first-out.
pub trait BacktrackProblem {
    /// Identifies one open slot (a cell, a span index, a recursion level).
    type Slot;
    /// One placeable value for a slot.
    type Candidate;

    /// Returns the next slot to fill, or [`SlotSelection::Complete`] when
    /// the problem's goal is reached.
    fn select_slot(&self) -> SlotSelection<Self::Slot>;

    /// Enumerates candidates for `slot` in the order to attempt them.
    fn candidates(&self, slot: &Self::Slot, rng: &mut dyn RngCore) -> Vec<Self::Candidate>;

    /// Attempts to commit `candidate` at `slot`.
    ///
    /// Returns `true` and mutates the problem when the placement is valid;
    /// returns `false` and leaves the problem untouched otherwise.
    fn try_place(&mut self, slot: &Self::Slot, candidate: &Self::Candidate) -> bool;

    /// Undoes a placement previously committed by
    /// [`try_place`](Self::try_place).
    fn retract(&mut self, slot: &Self::Slot, candidate: &Self::Candidate);
}

/// A cap on the total number of placement attempts in one search.
///
/// Backtracking over a pathological parameter set can wander for a very
/// long time without a termination proof, so every search runs under a
/// budget. Each call to [`BacktrackProblem::try_place`] spends one unit;
/// when the budget runs dry the search aborts with
/// [`EngineError::BudgetExhausted`] and the caller discards the grid.
#[derive(Debug, Clone)]
pub struct SearchBudget {
    limit: u64,
    spent: u64,
}

impl SearchBudget {
    /// Creates a budget allowing `limit` placement attempts.
    #[must_use]
    pub const fn new(limit: u64) -> Self {
        Self { limit, spent: 0 }
    }

    /// Returns how many placement attempts have been spent so far.
    #[must_use]
    pub const fn spent(&self) -> u64 {
        self.spent
    }

    /// Returns how many placement attempts remain.
    #[must_use]
    pub const fn remaining(&self) -> u64 {
        self.limit - self.spent
    }

    fn try_spend(&mut self) -> Result<(), EngineError> {
        if self.spent >= self.limit {
            return Err(EngineError::BudgetExhausted { limit: self.limit });
        }
        self.spent += 1;
        Ok(())
    }
}

/// A search aborted by the engine rather than exhausted by the problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum EngineError {
    /// The placement-attempt budget ran out before the search finished.
    #[display("search budget of {limit} placement attempts exhausted")]
    BudgetExhausted {
        /// The configured attempt limit.
        limit: u64,
    },
}

/// Runs the depth-first backtracking search to completion.
///
/// Returns `Ok(true)` when the problem reports
/// [`SlotSelection::Complete`], and `Ok(false)` when every candidate at
/// the root has been tried without success (total search failure — the
/// caller decides whether that is an error). Local placement failures and
/// branch exhaustion are handled internally by retraction and are never
/// surfaced.
///
/// # Errors
///
/// Returns [`EngineError::BudgetExhausted`] when `budget` runs out. The
/// problem is left in whatever partially-placed state the search had
/// reached; callers must discard it.
pub fn solve<P>(
    problem: &mut P,
    rng: &mut dyn RngCore,
    budget: &mut SearchBudget,
) -> Result<bool, EngineError>
where
    P: BacktrackProblem + ?Sized,
{
    let slot = match problem.select_slot() {
        SlotSelection::Complete => return Ok(true),
        SlotSelection::Open(slot) => slot,
    };
    for candidate in problem.candidates(&slot, rng) {
        budget.try_spend()?;
        if problem.try_place(&slot, &candidate) {
            if solve(problem, rng, budget)? {
                return Ok(true);
            }
            problem.retract(&slot, &candidate);
        }
    }
    Ok(false)
}
