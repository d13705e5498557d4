use grid_bfs::{BfsSolver, Board, Step};
use std::{thread, time::Duration};

// Plays a search back in the terminal, one dequeue per frame, then draws the path.
// - o marks a visited cell
// - * marks the path
const BOARD: &str = "
S.........
.######...
.....#....
####.#.##.
.....#..#E
.#####..#.
..........
";

fn main() {
    env_logger::init();
    let board: Board = match BOARD.parse() {
        Ok(board) => board,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };
    let (Some(start), Some(end)) = (board.start(), board.end()) else {
        eprintln!("Please set start and end points.");
        return;
    };
    let solver = BfsSolver::new();
    let mut cursor = match solver.cursor(board.grid(), start, end) {
        Ok(cursor) => cursor,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };
    let mut frame = 0;
    loop {
        match cursor.step() {
            Step::Expanded { node, discovered } => {
                frame += 1;
                println!("frame {frame}: expanded {node}, queued {discovered:?}");
            }
            Step::Reached(_) | Step::Exhausted => break,
        }
        thread::sleep(Duration::from_millis(10));
    }
    match cursor.finish() {
        Ok(result) => {
            print!("{}", board.render(&result));
            if !result.is_found() {
                println!("No path found.");
            }
        }
        Err(e) => eprintln!("{e}"),
    }
}
