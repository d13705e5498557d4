use grid_bfs::{coord, BfsSolver, SearchGrid};
use grid_util::grid::ValueGrid;

// In this example a path is found on a 3x3 grid with shape
//  ___
// |S  |
// | # |
// |  E|
//  ___
// where
// - # marks a wall
// - S marks the start
// - E marks the end
fn main() {
    env_logger::init();
    let mut search_grid = SearchGrid::new(3, 3, false);
    search_grid.set(1, 1, true);
    println!("{}", search_grid);
    let start = coord(0, 0);
    let end = coord(2, 2);
    match BfsSolver::new().search(&search_grid, start, end) {
        Ok(result) => {
            println!("Visited {} cells", result.visit_order().len());
            if let Some(path) = result.path() {
                println!("Path:");
                for p in path {
                    println!("{:?}", p);
                }
            }
        }
        Err(e) => eprintln!("{e}"),
    }
}
