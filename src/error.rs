use core::fmt;
use grid_util::point::Point;

/// Errors reported by grid mutations and by starting a search.
///
/// Every operation that fails with one of these leaves the grid unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathingError {
    /// The requested number of rows cannot form a grid.
    InvalidDimension(usize),
    /// The cell lies outside the grid.
    OutOfBounds(Point),
    /// The cell cannot take the requested role, e.g. a barrier as start or the start
    /// as goal.
    InvalidDesignation { cell: Point, reason: &'static str },
    /// A search was requested while start or goal is unset.
    MissingEndpoint,
    /// A search was requested while another search on the same grid is running.
    SearchInProgress,
}

impl fmt::Display for PathingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimension(rows) => write!(f, "cannot create a grid with {rows} rows"),
            Self::OutOfBounds(cell) => write!(f, "cell ({}, {}) is outside the grid", cell.y, cell.x),
            Self::InvalidDesignation { cell, reason } => {
                write!(f, "invalid designation of cell ({}, {}): {reason}", cell.y, cell.x)
            }
            Self::MissingEndpoint => write!(f, "start and goal must both be set before searching"),
            Self::SearchInProgress => write!(f, "a search on this grid is already in progress"),
        }
    }
}

impl std::error::Error for PathingError {}
