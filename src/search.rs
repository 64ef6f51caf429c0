//! A* over the neighbour graph of a [PathingGrid].
//!
//! The open set is a [BinaryHeap] ordered by estimated total cost with ties broken by
//! insertion order, paired with a membership set that says which cells are currently
//! queued. A cell is pushed only while it is not queued; when a queued cell is reached
//! more cheaply its cost and parent change but its heap entry keeps the priority it was
//! inserted with.
use crate::event::{CancelToken, SearchEvent, SearchObserver};
use crate::pathing_grid::PathingGrid;
use crate::UNIT_COST;
use fxhash::{FxBuildHasher, FxHashSet};
use grid_util::point::Point;
use indexmap::IndexMap;
use log::{debug, warn};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::iter;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Tunables of the search, stored on the grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchConfig {
    /// Multiplier applied to the Manhattan heuristic. Values above 1.0 expand fewer cells
    /// but no longer guarantee a shortest path.
    pub heuristic_factor: f32,
    /// Maximum number of cells expanded before the search gives up as cancelled.
    pub expansion_limit: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> SearchConfig {
        SearchConfig {
            heuristic_factor: 1.0,
            expansion_limit: None,
        }
    }
}

/// A path from start to goal. Only the cells strictly between the two are stored, which
/// is also what [SearchEvent::PathFound] reports.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    pub start: Point,
    pub goal: Point,
    pub interior: Vec<Point>,
}

impl Path {
    /// Number of moves needed to walk the path.
    pub fn cost(&self) -> i32 {
        (self.interior.len() as i32 + 1) * UNIT_COST
    }
    /// All cells of the path, start and goal included.
    pub fn cells(&self) -> impl Iterator<Item = Point> + '_ {
        iter::once(self.start)
            .chain(self.interior.iter().copied())
            .chain(iter::once(self.goal))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    PathFound(Path),
    NoPathExists,
    Cancelled,
}

impl SearchOutcome {
    pub fn path(&self) -> Option<&Path> {
        match self {
            SearchOutcome::PathFound(path) => Some(path),
            _ => None,
        }
    }
}

/// Manhattan distance scaled by `factor`.
pub fn heuristic(p1: &Point, p2: &Point, factor: f32) -> i32 {
    (p1.manhattan_distance(p2) as f32 * factor) as i32
}

#[derive(Clone, Copy, Debug)]
struct NodeState {
    g: i32,
    f: i32,
    parent: Option<Point>,
}

#[derive(Debug)]
struct OpenEntry {
    f: i32,
    seq: u64,
    cell: Point,
}

impl Eq for OpenEntry {}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.seq == other.seq
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: the lowest estimate wins, then the earliest insertion
        match other.f.cmp(&self.f) {
            Ordering::Equal => other.seq.cmp(&self.seq),
            s => s,
        }
    }
}

/// Working state of one search. Kept on the grid so allocations are reused, but emptied
/// at the start and end of every search.
#[derive(Debug, Default)]
pub(crate) struct SearchContext {
    nodes: FxIndexMap<Point, NodeState>,
    open: BinaryHeap<OpenEntry>,
    open_members: FxHashSet<Point>,
    next_seq: u64,
}

impl SearchContext {
    fn clear(&mut self) {
        self.nodes.clear();
        self.open.clear();
        self.open_members.clear();
        self.next_seq = 0;
    }

    /// Queues `cell` under the next sequence number.
    fn push_open(&mut self, cell: Point, f: i32) {
        self.open.push(OpenEntry {
            f,
            seq: self.next_seq,
            cell,
        });
        self.next_seq += 1;
        self.open_members.insert(cell);
    }

    /// Pops the best queued cell along with its current state. Every heap entry belongs to
    /// a member of the open set, since cells are never pushed twice while queued.
    fn pop_open(&mut self) -> Option<(Point, NodeState)> {
        let OpenEntry { f, cell, .. } = self.open.pop()?;
        debug_assert!(self.open_members.contains(&cell));
        self.open_members.remove(&cell);
        let state = *self.nodes.get(&cell)?;
        // Costs only ever drop while queued, so the entry never underestimates.
        debug_assert!(state.f <= f);
        Some((cell, state))
    }

    fn parent_of(&self, cell: Point) -> Option<Point> {
        self.nodes.get(&cell).and_then(|n| n.parent)
    }

    /// Walks the parents back from the goal. Neither endpoint is included.
    fn reconstruct_path(&self, start: Point, goal: Point) -> Vec<Point> {
        let mut path = iter::successors(self.parent_of(goal), |&cell| self.parent_of(cell))
            .take_while(|&cell| cell != start)
            .collect::<Vec<Point>>();
        path.reverse();
        path
    }

    pub(crate) fn astar<O>(
        &mut self,
        grid: &PathingGrid,
        start: Point,
        goal: Point,
        config: &SearchConfig,
        observer: &mut O,
        cancel: &CancelToken,
    ) -> SearchOutcome
    where
        O: SearchObserver,
    {
        debug!("Searching from {} to {}", start, goal);
        self.clear();
        let h = |p: &Point| heuristic(p, &goal, config.heuristic_factor);
        let start_f = h(&start);
        self.nodes.insert(
            start,
            NodeState {
                g: 0,
                f: start_f,
                parent: None,
            },
        );
        self.push_open(start, start_f);

        let mut expanded = 0usize;
        let outcome = loop {
            if cancel.is_cancelled() {
                warn!("Search from {} to {} cancelled after {} expansions", start, goal, expanded);
                break SearchOutcome::Cancelled;
            }
            if config.expansion_limit.map_or(false, |limit| expanded >= limit) {
                warn!("Search from {} to {} hit the expansion limit", start, goal);
                break SearchOutcome::Cancelled;
            }
            let Some((current, state)) = self.pop_open() else {
                debug!("Open set exhausted after {} expansions, no path", expanded);
                break SearchOutcome::NoPathExists;
            };
            expanded += 1;

            if current == goal {
                let interior = self.reconstruct_path(start, goal);
                debug!(
                    "Reached {} after {} expansions, path cost {}",
                    goal, expanded, state.g
                );
                observer.notify(&SearchEvent::PathFound(interior.clone()));
                break SearchOutcome::PathFound(Path {
                    start,
                    goal,
                    interior,
                });
            }

            let tentative = state.g + UNIT_COST;
            for &neighbour in grid.neighbour_slice(current) {
                let known = self.nodes.get(&neighbour).copied();
                if known.map_or(false, |n| tentative >= n.g) {
                    continue;
                }
                let f = tentative + h(&neighbour);
                self.nodes.insert(
                    neighbour,
                    NodeState {
                        g: tentative,
                        f,
                        parent: Some(current),
                    },
                );
                if !self.open_members.contains(&neighbour) {
                    self.push_open(neighbour, f);
                    observer.notify(&SearchEvent::Opened(neighbour));
                }
            }

            if current != start {
                observer.notify(&SearchEvent::Closed(current));
            }
        };
        self.clear();
        outcome
    }
}
