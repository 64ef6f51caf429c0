//! # grid_astar
//!
//! Shortest-path search on a square grid with 4-directional movement and unit edge
//! cost. A [PathingGrid] holds the cells together with their start, goal and barrier
//! designations and derives a neighbour graph from them on demand. Searching runs
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) with the
//! [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry) as heuristic and
//! reports its progress as a stream of [SearchEvent]s, so a renderer such as [GridView]
//! can follow along without the search knowing anything about drawing.
//!
//! Cells are addressed by [Point], where `y` is the row and `x` is the column.
//!
//! ```
//! use grid_astar::{EventLog, PathingGrid, Point, SearchOutcome};
//!
//! let mut grid = PathingGrid::new(5).unwrap();
//! grid.designate_start(Point::new(0, 0)).unwrap();
//! grid.designate_goal(Point::new(4, 4)).unwrap();
//! grid.rebuild_neighbour_graph();
//! let mut log = EventLog::default();
//! match grid.search(&mut log).unwrap() {
//!     SearchOutcome::PathFound(path) => assert_eq!(path.cost(), 8),
//!     other => panic!("unexpected outcome {:?}", other),
//! }
//! ```
mod error;
mod event;
pub mod pathing_grid;
pub mod search;
pub mod view;

pub use error::PathingError;
pub use event::{CancelToken, EventLog, SearchEvent, SearchObserver};
pub use grid_util::point::Point;
pub use pathing_grid::{Cell, PathingGrid, Role};
pub use search::{Path, SearchConfig, SearchOutcome};
pub use view::{CellState, GridView};

/// Cost of moving between two adjacent cells.
pub const UNIT_COST: i32 = 1;
/// Number of rows used by the demos when none is given.
pub const DEFAULT_ROWS: usize = 50;
/// Inline capacity of a neighbour list; a cell has at most four neighbours.
pub const N_SMALLVEC_SIZE: usize = 4;
