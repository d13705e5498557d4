use grid_bfs::{coord, BfsSolver, Heading, SearchGrid};
use grid_util::grid::ValueGrid;

// The neighbour order only breaks ties: both solvers find a 4 step path across an open 3x3
// grid, but they take different routes.
fn main() {
    env_logger::init();
    let search_grid = SearchGrid::new(3, 3, false);
    let solvers = [
        ("down, up, right, left", BfsSolver::new()),
        (
            "right, left, down, up",
            BfsSolver::with_order([Heading::Right, Heading::Left, Heading::Down, Heading::Up]),
        ),
    ];
    for (name, solver) in solvers {
        match solver.search(&search_grid, coord(0, 0), coord(2, 2)) {
            Ok(result) => println!("{name}: {:?}", result.path()),
            Err(e) => eprintln!("{name}: {e}"),
        }
    }
}
