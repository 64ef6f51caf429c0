use crate::event::{CancelToken, SearchObserver};
use crate::search::{SearchConfig, SearchContext, SearchOutcome};
use crate::{PathingError, N_SMALLVEC_SIZE};
use core::fmt;
use grid_util::grid::{BoolGrid, Grid};
use grid_util::point::Point;
use itertools::{iproduct, Itertools};
use log::{debug, info, warn};
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;
use std::sync::{Arc, Mutex, TryLockError};

/// Offsets tried when building the neighbour graph, in priority order: down, up, right, left.
const NEIGHBOUR_OFFSETS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

pub type Neighbours = SmallVec<[Point; N_SMALLVEC_SIZE]>;

/// What a cell currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Empty,
    Start,
    Goal,
    Barrier,
}

/// Read-only view of a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell<'a> {
    pub position: Point,
    pub role: Role,
    /// Passable neighbours as of the last [PathingGrid::rebuild_neighbour_graph].
    pub neighbours: &'a [Point],
}

/// [PathingGrid] stores a square grid of cells. Barriers live in a [BoolGrid] where [true]
/// means blocked, start and goal are kept as coordinates. The neighbour graph and the
/// connected components derived from it form a snapshot that is only refreshed by
/// [rebuild_neighbour_graph](Self::rebuild_neighbour_graph).
#[derive(Debug)]
pub struct PathingGrid {
    rows: usize,
    barriers: BoolGrid,
    start: Option<Point>,
    goal: Option<Point>,
    neighbours: Vec<Neighbours>,
    components: UnionFind<usize>,
    neighbours_dirty: bool,
    pub config: SearchConfig,
    context: Arc<Mutex<SearchContext>>,
}

impl Clone for PathingGrid {
    /// The clone gets its own search context so both grids can be searched independently.
    fn clone(&self) -> Self {
        PathingGrid {
            rows: self.rows,
            barriers: self.barriers.clone(),
            start: self.start,
            goal: self.goal,
            neighbours: self.neighbours.clone(),
            components: self.components.clone(),
            neighbours_dirty: self.neighbours_dirty,
            config: self.config,
            context: Arc::new(Mutex::new(SearchContext::default())),
        }
    }
}

impl PathingGrid {
    /// Creates an empty `rows` x `rows` grid without start or goal. The neighbour graph
    /// starts out empty and has to be built before searching.
    pub fn new(rows: usize) -> Result<PathingGrid, PathingError> {
        let fits = rows
            .checked_mul(rows)
            .map_or(false, |n| i32::try_from(n).is_ok());
        if rows == 0 || !fits {
            return Err(PathingError::InvalidDimension(rows));
        }
        Ok(PathingGrid {
            rows,
            barriers: BoolGrid::new(rows, rows, false),
            start: None,
            goal: None,
            neighbours: vec![Neighbours::new(); rows * rows],
            components: UnionFind::new(rows * rows),
            neighbours_dirty: true,
            config: SearchConfig::default(),
            context: Arc::new(Mutex::new(SearchContext::default())),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
    pub fn start(&self) -> Option<Point> {
        self.start
    }
    pub fn goal(&self) -> Option<Point> {
        self.goal
    }
    /// Whether barriers changed since the neighbour graph was last rebuilt.
    pub fn is_stale(&self) -> bool {
        self.neighbours_dirty
    }

    pub fn in_bounds(&self, cell: Point) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as usize) < self.rows && (cell.y as usize) < self.rows
    }
    fn check_bounds(&self, cell: Point) -> Result<(), PathingError> {
        if self.in_bounds(cell) {
            Ok(())
        } else {
            Err(PathingError::OutOfBounds(cell))
        }
    }
    fn ix(&self, cell: Point) -> usize {
        cell.y as usize * self.rows + cell.x as usize
    }
    fn is_barrier(&self, cell: Point) -> bool {
        self.barriers.get(cell.x as usize, cell.y as usize)
    }
    fn role_unchecked(&self, cell: Point) -> Role {
        if self.start == Some(cell) {
            Role::Start
        } else if self.goal == Some(cell) {
            Role::Goal
        } else if self.is_barrier(cell) {
            Role::Barrier
        } else {
            Role::Empty
        }
    }

    pub fn role(&self, cell: Point) -> Result<Role, PathingError> {
        self.check_bounds(cell)?;
        Ok(self.role_unchecked(cell))
    }
    pub fn cell(&self, cell: Point) -> Result<Cell<'_>, PathingError> {
        self.check_bounds(cell)?;
        Ok(Cell {
            position: cell,
            role: self.role_unchecked(cell),
            neighbours: &self.neighbours[self.ix(cell)],
        })
    }
    /// Neighbours of `cell` in down, up, right, left order, as of the last rebuild.
    pub fn neighbours(&self, cell: Point) -> Result<&[Point], PathingError> {
        self.check_bounds(cell)?;
        Ok(&self.neighbours[self.ix(cell)])
    }
    pub(crate) fn neighbour_slice(&self, cell: Point) -> &[Point] {
        &self.neighbours[self.ix(cell)]
    }
    /// Iterates over all barrier cells, row by row.
    pub fn barriers(&self) -> impl Iterator<Item = Point> + '_ {
        iproduct!(0..self.rows as i32, 0..self.rows as i32)
            .map(|(y, x)| Point::new(x, y))
            .filter(move |p| self.is_barrier(*p))
    }

    /// Makes `cell` the start, returning any previous start to empty.
    pub fn designate_start(&mut self, cell: Point) -> Result<(), PathingError> {
        self.check_bounds(cell)?;
        if self.is_barrier(cell) {
            return Err(PathingError::InvalidDesignation {
                cell,
                reason: "a barrier cannot be the start",
            });
        }
        if self.goal == Some(cell) {
            return Err(PathingError::InvalidDesignation {
                cell,
                reason: "the goal cannot also be the start",
            });
        }
        debug!("Start set to {}", cell);
        self.start = Some(cell);
        Ok(())
    }
    /// Makes `cell` the goal, returning any previous goal to empty.
    pub fn designate_goal(&mut self, cell: Point) -> Result<(), PathingError> {
        self.check_bounds(cell)?;
        if self.is_barrier(cell) {
            return Err(PathingError::InvalidDesignation {
                cell,
                reason: "a barrier cannot be the goal",
            });
        }
        if self.start == Some(cell) {
            return Err(PathingError::InvalidDesignation {
                cell,
                reason: "the start cannot also be the goal",
            });
        }
        debug!("Goal set to {}", cell);
        self.goal = Some(cell);
        Ok(())
    }
    /// Blocks `cell`. The neighbour graph is stale afterwards.
    pub fn designate_barrier(&mut self, cell: Point) -> Result<(), PathingError> {
        self.check_bounds(cell)?;
        match self.role_unchecked(cell) {
            Role::Start => Err(PathingError::InvalidDesignation {
                cell,
                reason: "the start cannot be a barrier",
            }),
            Role::Goal => Err(PathingError::InvalidDesignation {
                cell,
                reason: "the goal cannot be a barrier",
            }),
            Role::Barrier => Ok(()),
            Role::Empty => {
                self.barriers.set(cell.x as usize, cell.y as usize, true);
                self.neighbours_dirty = true;
                Ok(())
            }
        }
    }
    /// Returns `cell` to empty, unsetting start or goal if it was one of them.
    pub fn clear_cell(&mut self, cell: Point) -> Result<(), PathingError> {
        self.check_bounds(cell)?;
        match self.role_unchecked(cell) {
            Role::Start => self.start = None,
            Role::Goal => self.goal = None,
            Role::Barrier => {
                self.barriers.set(cell.x as usize, cell.y as usize, false);
                self.neighbours_dirty = true;
            }
            Role::Empty => {}
        }
        Ok(())
    }
    /// Applies the click-to-edit rule: the first cell placed becomes the start, the next
    /// distinct one the goal, every later one a barrier. Placing onto the start or goal
    /// once both exist is rejected.
    pub fn place(&mut self, cell: Point) -> Result<Role, PathingError> {
        self.check_bounds(cell)?;
        if self.start.is_none() {
            self.designate_start(cell)?;
            Ok(Role::Start)
        } else if self.goal.is_none() && self.start != Some(cell) {
            self.designate_goal(cell)?;
            Ok(Role::Goal)
        } else if self.start != Some(cell) && self.goal != Some(cell) {
            self.designate_barrier(cell)?;
            Ok(Role::Barrier)
        } else {
            Err(PathingError::InvalidDesignation {
                cell,
                reason: "cell already holds the start or goal",
            })
        }
    }
    /// Empties every cell and drops start, goal and the neighbour graph. The size is kept.
    pub fn reset(&mut self) {
        info!("Resetting {}x{} grid", self.rows, self.rows);
        let n = self.rows * self.rows;
        self.barriers = BoolGrid::new(self.rows, self.rows, false);
        self.start = None;
        self.goal = None;
        self.neighbours = vec![Neighbours::new(); n];
        self.components = UnionFind::new(n);
        self.neighbours_dirty = true;
    }

    /// Recomputes the neighbours of every cell from the current barriers and regenerates
    /// the connected components to match.
    pub fn rebuild_neighbour_graph(&mut self) {
        info!("Rebuilding neighbour graph of {}x{} grid", self.rows, self.rows);
        for (y, x) in iproduct!(0..self.rows as i32, 0..self.rows as i32) {
            let cell = Point::new(x, y);
            let neighbours = NEIGHBOUR_OFFSETS
                .iter()
                .map(|&(dx, dy)| Point::new(x + dx, y + dy))
                .filter(|&n| self.in_bounds(n) && !self.is_barrier(n))
                .collect::<Neighbours>();
            let ix = self.ix(cell);
            self.neighbours[ix] = neighbours;
        }
        self.neighbours_dirty = false;
        self.generate_components();
    }

    /// Generates a new [UnionFind] structure linking every non-barrier cell to its
    /// neighbours in the current snapshot.
    pub fn generate_components(&mut self) {
        debug!("Generating connected components");
        let mut components = UnionFind::new(self.rows * self.rows);
        for (y, x) in iproduct!(0..self.rows as i32, 0..self.rows as i32) {
            let cell = Point::new(x, y);
            if self.is_barrier(cell) {
                continue;
            }
            let ix = self.ix(cell);
            for n in &self.neighbours[ix] {
                components.union(ix, self.ix(*n));
            }
        }
        self.components = components;
    }
    /// Retrieves the component id a given cell belongs to.
    pub fn get_component(&self, cell: Point) -> Result<usize, PathingError> {
        self.check_bounds(cell)?;
        Ok(self.components.find(self.ix(cell)))
    }
    /// Checks whether `a` and `b` are connected in the current neighbour snapshot.
    pub fn reachable(&self, a: Point, b: Point) -> bool {
        self.in_bounds(a) && self.in_bounds(b) && self.components.equiv(self.ix(a), self.ix(b))
    }

    /// Runs A* from the start to the goal, reporting progress to `observer`.
    pub fn search<O>(&self, observer: &mut O) -> Result<SearchOutcome, PathingError>
    where
        O: SearchObserver,
    {
        self.search_cancellable(observer, &CancelToken::new())
    }
    /// Like [search](Self::search), but gives up with [SearchOutcome::Cancelled] as soon as
    /// `cancel` is set.
    pub fn search_cancellable<O>(
        &self,
        observer: &mut O,
        cancel: &CancelToken,
    ) -> Result<SearchOutcome, PathingError>
    where
        O: SearchObserver,
    {
        let (start, goal) = match (self.start, self.goal) {
            (Some(start), Some(goal)) => (start, goal),
            _ => return Err(PathingError::MissingEndpoint),
        };
        let mut ct = match self.context.try_lock() {
            Ok(ct) => ct,
            Err(TryLockError::WouldBlock) => return Err(PathingError::SearchInProgress),
            // The context is cleared before every search, so a panic mid-search leaves
            // nothing behind that matters.
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
        };
        if self.neighbours_dirty {
            warn!("Searching on a stale neighbour graph, barriers changed since the last rebuild");
        }
        Ok(ct.astar(self, start, goal, &self.config, observer, cancel))
    }
}

impl fmt::Display for PathingGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in 0..self.rows as i32 {
            let line = (0..self.rows as i32)
                .map(|x| match self.role_unchecked(Point::new(x, y)) {
                    Role::Empty => '.',
                    Role::Start => 'S',
                    Role::Goal => 'G',
                    Role::Barrier => '#',
                })
                .join("");
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
