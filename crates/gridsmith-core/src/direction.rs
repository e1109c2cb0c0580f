//! Directions and axes for span placement.

use std::fmt::{self, Display};

/// A unit step between neighboring cells.
///
/// Crossword span placement tries directions in random order; the
/// [`axis`](Self::axis) of a direction decides which reservations it may
/// share a cell with.
///
/// # Examples
///
/// ```
/// use gridsmith_core::{Axis, Direction};
///
/// assert_eq!(Direction::Right.axis(), Axis::Horizontal);
/// assert_eq!(Direction::Up.axis(), Axis::Vertical);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward smaller `y`.
    Up,
    /// Toward larger `y`.
    Down,
    /// Toward smaller `x`.
    Left,
    /// Toward larger `x`.
    Right,
}

impl Direction {
    /// All four directions, in no particular priority.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Returns the axis this direction moves along.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Up | Self::Down => Axis::Vertical,
            Self::Left | Self::Right => Axis::Horizontal,
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        };
        f.write_str(name)
    }
}

/// The alignment of a direction or word span.
///
/// A crossword cell may be claimed by at most one span per axis; two spans
/// sharing a cell must therefore have different axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Left-right alignment.
    Horizontal,
    /// Up-down alignment.
    Vertical,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_classification() {
        assert_eq!(Direction::Up.axis(), Axis::Vertical);
        assert_eq!(Direction::Down.axis(), Axis::Vertical);
        assert_eq!(Direction::Left.axis(), Axis::Horizontal);
        assert_eq!(Direction::Right.axis(), Axis::Horizontal);
    }

    #[test]
    fn test_all_contains_each_direction_once() {
        assert_eq!(Direction::ALL.len(), 4);
        for direction in Direction::ALL {
            assert_eq!(
                Direction::ALL.iter().filter(|d| **d == direction).count(),
                1
            );
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Direction::Down.to_string(), "down");
        assert_eq!(Direction::Right.to_string(), "right");
    }
}
