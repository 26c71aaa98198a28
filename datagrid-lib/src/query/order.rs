//! Sort state.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    #[default]
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Direction {
    /// Returns the opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            Direction::Asc => Direction::Desc,
            Direction::Desc => Direction::Asc,
        }
    }

    /// Applies this direction to an ascending comparison result.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }
}

/// The active sort: one column and a direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub column: String,
    pub direction: Direction,
}

impl Sort {
    /// Creates an ascending sort on a column.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Asc,
        }
    }

    /// Creates a descending sort on a column.
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Desc,
        }
    }

    /// Next sort state after the user selects `column`.
    ///
    /// A new column starts ascending; the current column flips direction.
    /// There is no third "unsorted" state.
    pub fn toggled(current: Option<&Sort>, column: &str) -> Sort {
        match current {
            Some(sort) if sort.column == column => Sort {
                column: sort.column.clone(),
                direction: sort.direction.flipped(),
            },
            _ => Sort::asc(column),
        }
    }
}

impl FromStr for Sort {
    type Err = std::convert::Infallible;

    /// Parses `column` or `column:asc` / `column:desc`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.rsplit_once(':') {
            Some((column, dir)) if dir.eq_ignore_ascii_case("desc") => Sort::desc(column),
            Some((column, dir)) if dir.eq_ignore_ascii_case("asc") => Sort::asc(column),
            _ => Sort::asc(s),
        })
    }
}
