//! # grid_bfs
//!
//! Shortest paths on a walled grid using
//! [breadth-first search](https://en.wikipedia.org/wiki/Breadth-first_search). Moves are
//! orthogonal and all cost the same, so the first time the end is dequeued its predecessor
//! chain is a shortest path.
//!
//! Besides the path, a search reports the order in which cells were visited, which is what a
//! visualizer animates. [BfsCursor](bfs::BfsCursor) exposes the traversal one dequeue at a time
//! for callers that want to pace that animation themselves.
//!
//! Points are [grid_util::Point] values where `x` is the column and `y` the row, with rows
//! growing downwards. [coord] builds one from a `(row, col)` pair.
pub mod bfs;
pub mod board;
pub mod error;
pub mod search_grid;

use grid_util::Point;

pub use bfs::{BfsCursor, BfsSolver, Heading, SearchResult, Step};
pub use board::{Board, Cell};
pub use error::{InvalidInput, ParseBoardError, SearchError};
pub use search_grid::SearchGrid;

/// Neighbour order used to break ties between equally short paths: down, up, right, left.
pub const DEFAULT_HEADING_ORDER: [Heading; 4] = Heading::ALL;
/// Size of a [Board] created with [Default].
pub const DEFAULT_ROWS: usize = 20;
pub const DEFAULT_COLS: usize = 20;

/// The point at `row`, `col`.
pub fn coord(row: i32, col: i32) -> Point {
    Point::new(col, row)
}

/// Checks that every consecutive pair of points is exactly one orthogonal step apart.
pub fn path_is_connected(path: &[Point]) -> bool {
    path.windows(2).all(|w| w[0].manhattan_distance(&w[1]) == 1)
}
