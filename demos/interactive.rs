use grid_astar::{GridView, PathingError, PathingGrid, Point, SearchOutcome, DEFAULT_ROWS};
use std::io::{self, BufRead, Write};

// A line-based editor for playing with the search. Usage:
//
//     cargo run --example interactive -- [rows]
//
// Commands:
//     place <row> <col>   first place sets the start, second the goal, then barriers
//     erase <row> <col>   empties a cell
//     run                 rebuilds the neighbour graph and searches
//     show                prints the grid
//     clear               empties the whole grid
//     quit

fn parse_cell(args: &[&str]) -> Option<Point> {
    match args {
        [row, col] => Some(Point::new(col.parse().ok()?, row.parse().ok()?)),
        _ => None,
    }
}

fn usage(text: &str) -> Result<(), PathingError> {
    println!("usage: {}", text);
    Ok(())
}

fn run(grid: &mut PathingGrid) -> Result<(), PathingError> {
    grid.rebuild_neighbour_graph();
    let mut view = GridView::new(grid);
    let outcome = grid.search(&mut view)?;
    print!("{}", view);
    match outcome {
        SearchOutcome::PathFound(path) => println!("path found, cost {}", path.cost()),
        SearchOutcome::NoPathExists => println!("no path exists"),
        SearchOutcome::Cancelled => println!("search cancelled"),
    }
    Ok(())
}

fn main() -> io::Result<()> {
    let rows = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(DEFAULT_ROWS);
    let mut grid = match PathingGrid::new(rows) {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(());
        }
    };
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    write!(stdout, "> ")?;
    stdout.flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        let words = line.split_whitespace().collect::<Vec<_>>();
        let result = match words.as_slice() {
            ["place", rest @ ..] => match parse_cell(rest) {
                Some(cell) => grid.place(cell).map(|role| println!("{:?}", role)),
                None => usage("place <row> <col>"),
            },
            ["erase", rest @ ..] => match parse_cell(rest) {
                Some(cell) => grid.clear_cell(cell),
                None => usage("erase <row> <col>"),
            },
            ["run"] => run(&mut grid),
            ["show"] => {
                print!("{}", grid);
                Ok(())
            }
            ["clear"] => {
                grid.reset();
                Ok(())
            }
            ["quit"] => break,
            [] => Ok(()),
            _ => usage("place | erase | run | show | clear | quit"),
        };
        if let Err(e) = result {
            println!("error: {}", e);
        }
        write!(stdout, "> ")?;
        stdout.flush()?;
    }
    Ok(())
}
