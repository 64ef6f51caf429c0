use grid_astar::{
    CancelToken, EventLog, GridView, PathingError, PathingGrid, Point, Role, SearchEvent,
    SearchOutcome,
};

/// Cell at `row`, `col`.
fn p(row: i32, col: i32) -> Point {
    Point::new(col, row)
}

fn prepared(rows: usize, start: Point, goal: Point, barriers: &[Point]) -> PathingGrid {
    let mut grid = PathingGrid::new(rows).unwrap();
    grid.designate_start(start).unwrap();
    grid.designate_goal(goal).unwrap();
    for &b in barriers {
        grid.designate_barrier(b).unwrap();
    }
    grid.rebuild_neighbour_graph();
    grid
}

#[test]
fn open_five_by_five_corner_to_corner() {
    let grid = prepared(5, p(0, 0), p(4, 4), &[]);
    let outcome = grid.search(&mut EventLog::default()).unwrap();
    let path = outcome.path().expect("path on an empty grid");
    assert_eq!(path.cost(), 8);
    assert_eq!(path.interior.len(), 7);
}

#[test]
fn no_barriers_means_manhattan_cost() {
    let grid_size = 9;
    for (start, goal) in [
        (p(0, 0), p(8, 8)),
        (p(4, 4), p(0, 8)),
        (p(8, 1), p(2, 6)),
        (p(3, 3), p(3, 4)),
    ] {
        let grid = prepared(grid_size, start, goal, &[]);
        let outcome = grid.search(&mut EventLog::default()).unwrap();
        assert_eq!(outcome.path().unwrap().cost(), start.manhattan_distance(&goal));
    }
}

#[test]
fn wall_between_start_and_goal() {
    // |S#G|
    // | # |
    // | # |
    let grid = prepared(3, p(0, 0), p(0, 2), &[p(0, 1), p(1, 1), p(2, 1)]);
    let mut log = EventLog::default();
    assert_eq!(grid.search(&mut log).unwrap(), SearchOutcome::NoPathExists);
    assert!(!log
        .events
        .iter()
        .any(|e| matches!(e, SearchEvent::PathFound(_))));
    assert!(!grid.reachable(p(0, 0), p(0, 2)));
}

#[test]
fn enclosed_goal_has_no_path() {
    let grid = prepared(5, p(0, 0), p(2, 2), &[p(1, 2), p(3, 2), p(2, 1), p(2, 3)]);
    let mut log = EventLog::default();
    assert_eq!(grid.search(&mut log).unwrap(), SearchOutcome::NoPathExists);
    // Every reachable cell except the start gets closed.
    assert_eq!(log.closed().count(), 25 - 4 - 1 - 1);
}

#[test]
fn barrier_on_start_leaves_grid_unchanged() {
    let mut grid = prepared(4, p(1, 1), p(3, 3), &[p(2, 2)]);
    let before = grid.to_string();
    let err = grid.designate_barrier(p(1, 1)).unwrap_err();
    assert!(matches!(err, PathingError::InvalidDesignation { .. }));
    assert_eq!(grid.to_string(), before);
    assert_eq!(grid.role(p(1, 1)).unwrap(), Role::Start);
    assert!(!grid.is_stale());
}

#[test]
fn repeated_searches_are_identical() {
    let grid = prepared(7, p(0, 3), p(6, 3), &[p(3, 1), p(3, 2), p(3, 3), p(3, 4)]);
    let mut first = EventLog::default();
    let mut second = EventLog::default();
    let a = grid.search(&mut first).unwrap();
    let b = grid.search(&mut second).unwrap();
    assert_eq!(a, b);
    assert_eq!(first, second);
}

#[test]
fn stale_graph_is_used_as_is() {
    let mut grid = prepared(3, p(0, 0), p(0, 2), &[]);
    grid.designate_barrier(p(0, 1)).unwrap();
    // Not rebuilt: the search still walks through the new barrier.
    let outcome = grid.search(&mut EventLog::default()).unwrap();
    assert_eq!(outcome.path().unwrap().interior, vec![p(0, 1)]);
    grid.rebuild_neighbour_graph();
    let outcome = grid.search(&mut EventLog::default()).unwrap();
    assert_eq!(outcome.path().unwrap().cost(), 4);
}

#[test]
fn cancelled_search_reports_cancelled() {
    let grid = prepared(20, p(0, 0), p(19, 19), &[]);
    let token = CancelToken::new();
    let handle = token.clone();
    let mut seen = 0;
    let mut observer = |_: &SearchEvent| {
        seen += 1;
        if seen == 10 {
            handle.cancel();
        }
    };
    let outcome = grid.search_cancellable(&mut observer, &token).unwrap();
    assert_eq!(outcome, SearchOutcome::Cancelled);
}

#[test]
fn view_follows_the_event_stream() {
    let grid = prepared(5, p(0, 0), p(4, 4), &[p(2, 0), p(2, 1), p(2, 2), p(2, 3)]);
    let mut view = GridView::new(&grid);
    let outcome = grid.search(&mut view).unwrap();
    let path = outcome.path().unwrap();
    assert_eq!(path.cost(), 8);
    for cell in &path.interior {
        assert_eq!(view.state(*cell), Some(grid_astar::CellState::Path));
    }
    assert_eq!(view.state(p(0, 0)), Some(grid_astar::CellState::Start));
    assert_eq!(view.state(p(4, 4)), Some(grid_astar::CellState::Goal));
}
