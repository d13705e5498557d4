//! Error types for grid searches and board parsing.

use grid_util::Point;

use crate::bfs::Heading;
use thiserror::Error;

/// A search request that violates the preconditions of the traversal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("no start cell has been set")]
    MissingStart,

    #[error("no end cell has been set")]
    MissingEnd,

    #[error("start {0} lies outside the grid")]
    StartOutOfBounds(Point),

    #[error("end {0} lies outside the grid")]
    EndOutOfBounds(Point),

    #[error("start and end are the same cell {0}")]
    SameStartAndEnd(Point),

    #[error("start {0} is a wall")]
    StartBlocked(Point),

    #[error("end {0} is a wall")]
    EndBlocked(Point),

    /// The tie-break order does not contain every heading exactly once.
    #[error("heading order {0:?} is not a permutation of down, up, right, left")]
    HeadingOrder([Heading; 4]),
}

/// Failure of a search. An unreachable end is not an error, see
/// [SearchResult::NotFound](crate::bfs::SearchResult::NotFound).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),

    /// The predecessor chain from the end did not lead back to the start.
    #[error("predecessor chain is broken at {at}")]
    InternalInconsistency { at: Point },
}

/// Failure to read a board from its text form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseBoardError {
    #[error("board has no rows")]
    Empty,

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unexpected character {found:?} at row {row}, column {col}")]
    UnknownCell { row: usize, col: usize, found: char },

    #[error("more than one {0:?} marker")]
    DuplicateMarker(char),
}

pub type Result<T> = std::result::Result<T, SearchError>;
