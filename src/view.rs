//! Display state for a renderer, derived from a grid snapshot plus the events of a search.
use crate::event::{SearchEvent, SearchObserver};
use crate::pathing_grid::{PathingGrid, Role};
use core::fmt;
use grid_util::point::Point;
use itertools::iproduct;
use log::debug;

/// How a cell should be drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellState {
    #[default]
    Empty,
    Start,
    Goal,
    Barrier,
    Open,
    Closed,
    Path,
}

impl CellState {
    pub fn symbol(self) -> char {
        match self {
            CellState::Empty => '.',
            CellState::Start => 'S',
            CellState::Goal => 'G',
            CellState::Barrier => '#',
            CellState::Open => 'o',
            CellState::Closed => 'x',
            CellState::Path => '*',
        }
    }
    fn is_fixed(self) -> bool {
        matches!(self, CellState::Start | CellState::Goal | CellState::Barrier)
    }
}

impl From<Role> for CellState {
    fn from(role: Role) -> CellState {
        match role {
            Role::Empty => CellState::Empty,
            Role::Start => CellState::Start,
            Role::Goal => CellState::Goal,
            Role::Barrier => CellState::Barrier,
        }
    }
}

/// Per-cell display state. Built from the roles of a [PathingGrid] and then updated only
/// through the [SearchEvent]s it observes; start, goal and barrier markers are never
/// overwritten by search progress.
#[derive(Clone, Debug)]
pub struct GridView {
    cells: Vec<CellState>,
    rows: usize,
}

impl GridView {
    pub fn new(grid: &PathingGrid) -> GridView {
        let rows = grid.rows();
        let cells = iproduct!(0..rows as i32, 0..rows as i32)
            .map(|(y, x)| grid.role(Point::new(x, y)).map_or(CellState::Empty, CellState::from))
            .collect();
        GridView { cells, rows }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
    /// State of `cell`, or [None] if it lies outside the grid.
    pub fn state(&self, cell: Point) -> Option<CellState> {
        self.ix(cell).map(|ix| self.cells[ix])
    }
    /// Number of cells currently in `state`.
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&s| s == state).count()
    }

    fn ix(&self, cell: Point) -> Option<usize> {
        let in_bounds = cell.x >= 0
            && cell.y >= 0
            && (cell.x as usize) < self.rows
            && (cell.y as usize) < self.rows;
        in_bounds.then(|| cell.y as usize * self.rows + cell.x as usize)
    }

    fn mark(&mut self, cell: Point, state: CellState) {
        if let Some(ix) = self.ix(cell) {
            if !self.cells[ix].is_fixed() {
                self.cells[ix] = state;
            }
        }
    }
}

impl SearchObserver for GridView {
    fn notify(&mut self, event: &SearchEvent) {
        match event {
            SearchEvent::Opened(cell) => self.mark(*cell, CellState::Open),
            SearchEvent::Closed(cell) => self.mark(*cell, CellState::Closed),
            SearchEvent::PathFound(cells) => {
                debug!("Drawing path of {} cells", cells.len());
                for cell in cells {
                    self.mark(*cell, CellState::Path);
                }
            }
        }
    }
}

impl fmt::Display for GridView {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.cells.chunks(self.rows) {
            let line = row.iter().map(|s| s.symbol()).collect::<String>();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SearchOutcome;

    fn p(row: i32, col: i32) -> Point {
        Point::new(col, row)
    }

    #[test]
    fn markers_survive_search_events() {
        let mut grid = PathingGrid::new(3).unwrap();
        grid.designate_start(p(0, 0)).unwrap();
        grid.designate_goal(p(2, 2)).unwrap();
        grid.designate_barrier(p(1, 1)).unwrap();
        let mut view = GridView::new(&grid);
        view.notify(&SearchEvent::Opened(p(2, 2)));
        view.notify(&SearchEvent::Closed(p(0, 0)));
        view.notify(&SearchEvent::Opened(p(1, 1)));
        assert_eq!(view.state(p(2, 2)), Some(CellState::Goal));
        assert_eq!(view.state(p(0, 0)), Some(CellState::Start));
        assert_eq!(view.state(p(1, 1)), Some(CellState::Barrier));
        assert_eq!(view.state(p(3, 0)), None);
    }

    #[test]
    fn renders_finished_search() {
        // |S  |
        // | # |
        // |  G|
        let mut grid = PathingGrid::new(3).unwrap();
        grid.place(p(0, 0)).unwrap();
        grid.place(p(2, 2)).unwrap();
        grid.place(p(1, 1)).unwrap();
        grid.rebuild_neighbour_graph();
        let mut view = GridView::new(&grid);
        let outcome = grid.search(&mut view).unwrap();
        assert!(matches!(outcome, SearchOutcome::PathFound(_)));
        assert_eq!(view.count(CellState::Path), 3);
        assert_eq!(view.to_string(), "Sxx\n*#x\n**G\n");
    }
}
