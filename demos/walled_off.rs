use grid_bfs::{coord, BfsSolver, Board};

// The end is cut off by a full row of walls, so the search visits the top half and gives up.
// S...
// ####
// ...E
fn main() {
    env_logger::init();
    let mut board = Board::new(3, 4);
    board.click(coord(0, 0));
    board.click(coord(2, 3));
    for col in 0..4 {
        board.click(coord(1, col));
    }
    println!("{board}");
    println!("Reachable according to components: {:?}", board.reachable());
    match board.run(&BfsSolver::new()) {
        Ok(result) if result.is_found() => println!("Unexpected path: {:?}", result.path()),
        Ok(result) => {
            println!("No path found after visiting {} cells:", result.visit_order().len());
            print!("{}", board.render(&result));
        }
        Err(e) => eprintln!("{e}"),
    }
}
