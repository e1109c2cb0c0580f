//! Arithmetic operations-grid generation.
//!
//! The board is a fixed 6×6 template. Rows 0, 2, and 4 read `Number
//! Operator Number Operator Number = Answer`; rows 1 and 3 hold the
//! operators of the vertical equations; the last row holds the column
//! answers. Every row and column equation evaluates strictly left to
//! right/top to bottom with no operator precedence, and the running value
//! must stay non-negative at every prefix.
//!
//! Search fills the `Number` and `Operator` cells in row-major order under
//! those prefix rules; `Answer` cells are never searched — each one is
//! derived from its line's final value, and that same evaluation is the
//! line's acceptance test.
//!
//! # Examples
//!
//! ```
//! use gridsmith_generator::{OperationsGenerator, PuzzleSeed};
//!
//! let generator = OperationsGenerator::classic();
//! let puzzle = generator.generate_with_seed(PuzzleSeed::from_phrase("docs"))?;
//!
//! for equation in puzzle.equations() {
//!     assert!(equation.answer >= 0);
//! }
//! # Ok::<(), gridsmith_generator::GenerateError>(())
//! ```

use std::fmt::{self, Display};

use gridsmith_core::{Grid, Position};
use gridsmith_engine::{BacktrackProblem, SearchBudget, SlotSelection, solve};
use log::{debug, warn};
use rand::{rand_core::RngCore, seq::SliceRandom as _};

use crate::{GenerateError, PuzzleSeed};

/// Placement attempts allowed for one fill search.
const FILL_BUDGET: u64 = 1_000_000;

/// Board edge length of the fixed template.
const SIZE: u8 = 6;

/// An arithmetic operator, applied left to right with no precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Addition.
    Add,
    /// Subtraction; the running value must stay non-negative.
    Sub,
    /// Multiplication.
    Mul,
    /// Division; must divide the running value exactly and never by zero.
    Div,
}

impl Operator {
    /// All operators, in display order.
    pub const ALL: [Self; 4] = [Self::Add, Self::Sub, Self::Mul, Self::Div];

    /// Returns the display symbol.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
        }
    }

    /// Applies `self` to a running total and the next operand.
    ///
    /// Returns `None` for any invalid step: overflow, a negative running
    /// result, or an inexact/zero division. Returning `None` here is the
    /// single validity gate of the prefix evaluator.
    #[must_use]
    pub fn apply(self, total: i64, operand: i64) -> Option<i64> {
        match self {
            Self::Add => total.checked_add(operand),
            Self::Sub => total.checked_sub(operand).filter(|value| *value >= 0),
            Self::Mul => total.checked_mul(operand),
            Self::Div => {
                (operand != 0 && total % operand == 0).then(|| total / operand)
            }
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One cell of a finished operations grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCell {
    /// An operand chosen by the search.
    Number(i64),
    /// An operator chosen by the search.
    Operator(Operator),
    /// A derived equation result.
    Answer(i64),
    /// Structural filler; not part of any equation.
    Blank,
}

/// Slot kinds of the fixed template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpKind {
    Number,
    Operator,
    Answer,
    Blank,
}

/// A searched value: an operand or an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpValue {
    Number(i64),
    Operator(Operator),
}

fn template() -> Grid<OpKind> {
    let mut kinds = Grid::new(SIZE, SIZE, OpKind::Blank);
    for pos in kinds.positions() {
        let (x, y) = (pos.x(), pos.y());
        let kind = match (x % 2 == 0, y % 2 == 0) {
            _ if x == 5 && y == 5 => OpKind::Blank,
            _ if x == 5 => {
                if y % 2 == 0 {
                    OpKind::Answer
                } else {
                    OpKind::Blank
                }
            }
            _ if y == 5 => {
                if x % 2 == 0 {
                    OpKind::Answer
                } else {
                    OpKind::Blank
                }
            }
            (true, true) => OpKind::Number,
            (false, true) | (true, false) => OpKind::Operator,
            (false, false) => OpKind::Blank,
        };
        kinds.set(pos, kind);
    }
    kinds
}

/// One evaluated line: five alternating operand/operator cells plus the
/// answer cell they feed.
#[derive(Debug, Clone, Copy)]
struct Line {
    cells: [Position; 5],
    answer: Position,
}

fn lines() -> Vec<Line> {
    let mut out = Vec::with_capacity(6);
    for y in [0, 2, 4] {
        out.push(Line {
            cells: [0, 1, 2, 3, 4].map(|x| Position::new(x, y)),
            answer: Position::new(5, y),
        });
    }
    for x in [0, 2, 4] {
        out.push(Line {
            cells: [0, 1, 2, 3, 4].map(|y| Position::new(x, y)),
            answer: Position::new(x, 5),
        });
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineEval {
    /// A filled prefix violates the rules; the line can never complete.
    Invalid,
    /// The filled prefix is fine but the line is not finished.
    Partial,
    /// Every cell is filled and the line evaluates to this answer.
    Complete(i64),
}

/// Left-to-right prefix evaluation of a (possibly partly filled) line.
fn evaluate(values: &Grid<Option<OpValue>>, line: &Line) -> LineEval {
    let mut total = match values.get(line.cells[0]) {
        Some(OpValue::Number(n)) => *n,
        None => return LineEval::Partial,
        Some(OpValue::Operator(_)) => unreachable!("template puts a number first"),
    };
    for pair in line.cells[1..].chunks(2) {
        let operator = match values.get(pair[0]) {
            Some(OpValue::Operator(op)) => *op,
            None => return LineEval::Partial,
            Some(OpValue::Number(_)) => unreachable!("template alternates operators"),
        };
        let operand = match values.get(pair[1]) {
            Some(OpValue::Number(n)) => *n,
            None => return LineEval::Partial,
            Some(OpValue::Operator(_)) => unreachable!("template alternates numbers"),
        };
        total = match operator.apply(total, operand) {
            Some(total) => total,
            None => return LineEval::Invalid,
        };
    }
    LineEval::Complete(total)
}

/// The fill-phase search over `Number` and `Operator` cells.
struct OperationsFill<'a> {
    kinds: Grid<OpKind>,
    values: Grid<Option<OpValue>>,
    lines: Vec<Line>,
    numbers: &'a [i64],
    operators: Vec<Operator>,
    remaining: Vec<u8>,
}

impl<'a> OperationsFill<'a> {
    fn new(numbers: &'a [i64], operators: &[(Operator, u8)]) -> Self {
        Self {
            kinds: template(),
            values: Grid::new(SIZE, SIZE, None),
            lines: lines(),
            numbers,
            operators: operators.iter().map(|(op, _)| *op).collect(),
            remaining: operators.iter().map(|(_, cap)| *cap).collect(),
        }
    }

    /// The row and/or column lines that run through `pos`.
    fn lines_through(&self, pos: Position) -> impl Iterator<Item = &Line> {
        self.lines
            .iter()
            .filter(move |line| line.cells.contains(&pos))
    }

    fn prefixes_valid_through(&self, pos: Position) -> bool {
        self.lines_through(pos)
            .all(|line| evaluate(&self.values, line) != LineEval::Invalid)
    }

    /// Builds the finished grid, deriving every `Answer` cell from its
    /// line's final evaluation.
    fn finish(&self) -> Grid<OpCell> {
        let mut grid = Grid::new(SIZE, SIZE, OpCell::Blank);
        for pos in self.values.positions() {
            let cell = match self.kinds.get(pos) {
                OpKind::Number => match self.values.get(pos) {
                    Some(OpValue::Number(n)) => OpCell::Number(*n),
                    _ => unreachable!("search fills every number cell"),
                },
                OpKind::Operator => match self.values.get(pos) {
                    Some(OpValue::Operator(op)) => OpCell::Operator(*op),
                    _ => unreachable!("search fills every operator cell"),
                },
                OpKind::Blank | OpKind::Answer => OpCell::Blank,
            };
            grid.set(pos, cell);
        }
        for line in &self.lines {
            match evaluate(&self.values, line) {
                LineEval::Complete(answer) => grid.set(line.answer, OpCell::Answer(answer)),
                LineEval::Partial | LineEval::Invalid => {
                    unreachable!("finish is only called on a complete grid")
                }
            }
        }
        grid
    }
}

impl BacktrackProblem for OperationsFill<'_> {
    type Slot = Position;
    type Candidate = OpValue;

    fn select_slot(&self) -> SlotSelection<Position> {
        let open = self.values.positions().find(|&pos| {
            matches!(self.kinds.get(pos), OpKind::Number | OpKind::Operator)
                && self.values.get(pos).is_none()
        });
        match open {
            Some(pos) => SlotSelection::Open(pos),
            None => SlotSelection::Complete,
        }
    }

    fn candidates(&self, slot: &Position, rng: &mut dyn RngCore) -> Vec<OpValue> {
        match self.kinds.get(*slot) {
            OpKind::Number => {
                let mut numbers = self.numbers.to_vec();
                numbers.shuffle(rng);
                numbers.into_iter().map(OpValue::Number).collect()
            }
            OpKind::Operator => {
                // Operators whose cap has reached zero are out of the pool
                // until a retraction restores them.
                let mut operators: Vec<Operator> = self
                    .operators
                    .iter()
                    .zip(&self.remaining)
                    .filter(|(_, remaining)| **remaining > 0)
                    .map(|(op, _)| *op)
                    .collect();
                operators.shuffle(rng);
                operators.into_iter().map(OpValue::Operator).collect()
            }
            OpKind::Answer | OpKind::Blank => unreachable!("only open slots are searched"),
        }
    }

    fn try_place(&mut self, slot: &Position, candidate: &OpValue) -> bool {
        self.values.set(*slot, Some(*candidate));
        if !self.prefixes_valid_through(*slot) {
            self.values.set(*slot, None);
            return false;
        }
        if let OpValue::Operator(op) = candidate {
            let i = self
                .operators
                .iter()
                .position(|other| other == op)
                .expect("candidate operators come from the pool");
            self.remaining[i] -= 1;
        }
        true
    }

    fn retract(&mut self, slot: &Position, candidate: &OpValue) {
        self.values.set(*slot, None);
        if let OpValue::Operator(op) = candidate {
            let i = self
                .operators
                .iter()
                .position(|other| other == op)
                .expect("candidate operators come from the pool");
            self.remaining[i] += 1;
        }
    }
}

/// Generates operations grids from a number pool and capped operator pool.
#[derive(Debug, Clone)]
pub struct OperationsGenerator {
    numbers: Vec<i64>,
    operators: Vec<(Operator, u8)>,
}

impl OperationsGenerator {
    /// Creates a generator over the given pools.
    ///
    /// `numbers` are the operands the search may place (reusable without
    /// limit); `operators` pairs each operator with its usage cap across
    /// the whole grid.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::InvalidParameters`] when a pool is empty, a
    /// number is not positive, an operator appears twice, or the caps
    /// cannot cover the 12 operator cells.
    pub fn new(
        numbers: Vec<i64>,
        operators: Vec<(Operator, u8)>,
    ) -> Result<Self, GenerateError> {
        if numbers.is_empty() {
            return Err(GenerateError::InvalidParameters {
                reason: "number pool is empty".to_owned(),
            });
        }
        if let Some(bad) = numbers.iter().find(|n| **n < 1) {
            return Err(GenerateError::InvalidParameters {
                reason: format!("number pool entries must be positive, got {bad}"),
            });
        }
        for (i, (op, _)) in operators.iter().enumerate() {
            if operators[..i].iter().any(|(other, _)| other == op) {
                return Err(GenerateError::InvalidParameters {
                    reason: format!("operator {op} appears twice in the pool"),
                });
            }
        }
        let kinds = template();
        let operator_cells = kinds
            .positions()
            .filter(|&pos| *kinds.get(pos) == OpKind::Operator)
            .count();
        let cap_total: usize = operators.iter().map(|(_, cap)| usize::from(*cap)).sum();
        if cap_total < operator_cells {
            return Err(GenerateError::InvalidParameters {
                reason: format!(
                    "operator caps cover {cap_total} placements but the grid has \
                     {operator_cells} operator cells"
                ),
            });
        }
        Ok(Self { numbers, operators })
    }

    /// The classic pool: operands 1-9, caps `+`×4 `-`×4 `*`×2 `/`×2.
    #[must_use]
    pub fn classic() -> Self {
        Self {
            numbers: (1..=9).collect(),
            operators: vec![
                (Operator::Add, 4),
                (Operator::Sub, 4),
                (Operator::Mul, 2),
                (Operator::Div, 2),
            ],
        }
    }

    /// Generates a puzzle from a fresh random seed.
    ///
    /// # Errors
    ///
    /// See [`generate_with_seed`](Self::generate_with_seed).
    pub fn generate(&self) -> Result<OperationsPuzzle, GenerateError> {
        self.generate_with_seed(PuzzleSeed::random())
    }

    /// Generates the puzzle identified by `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::FillExhausted`] when no assignment of the
    /// pools satisfies every line, and [`GenerateError::Budget`] when the
    /// search budget runs out first.
    pub fn generate_with_seed(&self, seed: PuzzleSeed) -> Result<OperationsPuzzle, GenerateError> {
        let mut rng = seed.rng();
        let mut fill = OperationsFill::new(&self.numbers, &self.operators);
        let mut budget = SearchBudget::new(FILL_BUDGET);
        if !solve(&mut fill, &mut rng, &mut budget)? {
            warn!(
                "operations fill exhausted after {} attempts (numbers: {:?})",
                budget.spent(),
                self.numbers
            );
            return Err(GenerateError::FillExhausted);
        }
        debug!(
            "filled operations grid in {} placement attempts",
            budget.spent()
        );
        Ok(OperationsPuzzle {
            seed,
            grid: fill.finish(),
        })
    }
}

/// One equation of a finished puzzle, read left to right or top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Equation {
    /// The three operands in reading order.
    pub operands: [i64; 3],
    /// The two operators in reading order.
    pub operators: [Operator; 2],
    /// The derived result.
    pub answer: i64,
}

/// A generated operations puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationsPuzzle {
    /// The seed that reproduces this puzzle.
    pub seed: PuzzleSeed,
    /// The finished 6×6 board.
    pub grid: Grid<OpCell>,
}

impl OperationsPuzzle {
    /// Returns the six equations: rows 0, 2, 4 then columns 0, 2, 4.
    ///
    /// # Panics
    ///
    /// Panics if the grid was tampered with after generation.
    #[must_use]
    pub fn equations(&self) -> Vec<Equation> {
        lines()
            .iter()
            .map(|line| {
                let mut operands = [0; 3];
                let mut operators = [Operator::Add; 2];
                for (i, pos) in line.cells.into_iter().enumerate() {
                    match (i % 2, *self.grid.get(pos)) {
                        (0, OpCell::Number(n)) => operands[i / 2] = n,
                        (1, OpCell::Operator(op)) => operators[i / 2] = op,
                        _ => panic!("malformed operations grid at {pos}"),
                    }
                }
                let OpCell::Answer(answer) = *self.grid.get(line.answer) else {
                    panic!("missing answer cell at {}", line.answer);
                };
                Equation {
                    operands,
                    operators,
                    answer,
                }
            })
            .collect()
    }
}

impl Display for OperationsPuzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.grid.rows().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for (x, cell) in row.iter().enumerate() {
                if x > 0 {
                    write!(f, " ")?;
                }
                match cell {
                    OpCell::Number(n) => write!(f, "{n:>3}")?,
                    OpCell::Operator(op) => write!(f, "  {op}")?,
                    OpCell::Answer(answer) => write!(f, "={answer:<2}")?,
                    OpCell::Blank => write!(f, "  .")?,
                }
            }
        }
        Ok(())
    }
}
