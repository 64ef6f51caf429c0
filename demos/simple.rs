use grid_astar::{GridView, PathingGrid, Point, SearchOutcome};

// In this example a path is found on a 5x5 grid with shape
//  _____
// |S    |
// |###  |
// |     |
// |  ###|
// |    G|
//  _____
// where
// - # marks a barrier
// - S marks the start
// - G marks the goal
//
// The search result is printed with o for open, x for closed and * for path cells.

fn main() {
    let mut grid = PathingGrid::new(5).unwrap();
    grid.designate_start(Point::new(0, 0)).unwrap();
    grid.designate_goal(Point::new(4, 4)).unwrap();
    for (x, y) in [(0, 1), (1, 1), (2, 1), (2, 3), (3, 3), (4, 3)] {
        grid.designate_barrier(Point::new(x, y)).unwrap();
    }
    grid.rebuild_neighbour_graph();
    println!("{}", grid);

    let mut view = GridView::new(&grid);
    match grid.search(&mut view).unwrap() {
        SearchOutcome::PathFound(path) => {
            println!("{}", view);
            println!("Path of cost {}:", path.cost());
            for p in path.cells() {
                println!("{:?}", p);
            }
        }
        SearchOutcome::NoPathExists => println!("No path"),
        SearchOutcome::Cancelled => println!("Cancelled"),
    }
}
