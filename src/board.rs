//! The editable state behind a visualizer window: a wall grid plus start and end markers.
//!
//! Clicks follow the usual visualizer convention. The first click places the start, the next
//! click on another cell places the end, and every later click toggles a wall, except on the
//! start or end. Cell states are explicit [Cell] values, never inferred from presentation.
use core::fmt;
use grid_util::grid::ValueGrid;
use grid_util::Point;
use log::debug;
use std::str::FromStr;

use crate::bfs::{BfsSolver, SearchResult};
use crate::error::{InvalidInput, ParseBoardError, Result};
use crate::search_grid::SearchGrid;
use crate::{DEFAULT_COLS, DEFAULT_ROWS};

const VISITED_SYMBOL: char = 'o';
const PATH_SYMBOL: char = '*';

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Wall,
    Start,
    End,
}

impl Cell {
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Wall => '#',
            Cell::Start => 'S',
            Cell::End => 'E',
        }
    }
    pub fn from_symbol(c: char) -> Option<Cell> {
        match c {
            '.' => Some(Cell::Empty),
            '#' => Some(Cell::Wall),
            'S' => Some(Cell::Start),
            'E' => Some(Cell::End),
            _ => None,
        }
    }
}

/// A wall grid with optional start and end cells. The start and end are never walls.
#[derive(Clone, Debug)]
pub struct Board {
    grid: SearchGrid,
    start: Option<Point>,
    end: Option<Point>,
}

impl Default for Board {
    fn default() -> Board {
        Board::new(DEFAULT_ROWS, DEFAULT_COLS)
    }
}

impl Board {
    /// An empty board. `rows` and `cols` should both be at least one.
    pub fn new(rows: usize, cols: usize) -> Board {
        Board {
            grid: SearchGrid::new(cols, rows, false),
            start: None,
            end: None,
        }
    }

    pub fn rows(&self) -> usize {
        self.grid.height()
    }
    pub fn cols(&self) -> usize {
        self.grid.width()
    }
    pub fn grid(&self) -> &SearchGrid {
        &self.grid
    }
    pub fn start(&self) -> Option<Point> {
        self.start
    }
    pub fn end(&self) -> Option<Point> {
        self.end
    }

    /// The state of a cell, or [None] outside the board.
    pub fn cell(&self, p: Point) -> Option<Cell> {
        if !self.grid.point_in_bounds(p) {
            return None;
        }
        Some(if self.start == Some(p) {
            Cell::Start
        } else if self.end == Some(p) {
            Cell::End
        } else if self.grid.get(p.x, p.y) {
            Cell::Wall
        } else {
            Cell::Empty
        })
    }

    /// Applies a click at `p` and returns the new state of that cell. Clicks outside the
    /// board are ignored.
    pub fn click(&mut self, p: Point) -> Option<Cell> {
        if !self.grid.point_in_bounds(p) {
            debug!("Ignoring click outside the board at {}", p);
            return None;
        }
        match (self.start, self.end) {
            (None, _) => {
                self.place_marker(p);
                self.start = Some(p);
                debug!("Start set to {}", p);
            }
            (Some(start), None) if start != p => {
                self.place_marker(p);
                self.end = Some(p);
                debug!("End set to {}", p);
            }
            (Some(start), end) if start != p && end != Some(p) => {
                let blocked = !self.grid.get(p.x, p.y);
                self.grid.set(p.x, p.y, blocked);
                debug!("Wall at {} set to {}", p, blocked);
            }
            _ => {}
        }
        self.cell(p)
    }

    fn place_marker(&mut self, p: Point) {
        if self.grid.get(p.x, p.y) {
            self.grid.set(p.x, p.y, false);
        }
    }

    /// Sets or removes a wall directly. Returns [false] if `p` is outside the board or is the
    /// start or end.
    pub fn set_wall(&mut self, p: Point, blocked: bool) -> bool {
        if !self.grid.point_in_bounds(p) || self.start == Some(p) || self.end == Some(p) {
            return false;
        }
        self.grid.set(p.x, p.y, blocked);
        true
    }

    /// Removes all walls and both markers.
    pub fn clear(&mut self) {
        debug!("Clearing board");
        self.grid.clear();
        self.start = None;
        self.end = None;
    }

    /// Whether the end is connected to the start, without running a search.
    pub fn reachable(&mut self) -> Option<bool> {
        let (start, end) = (self.start?, self.end?);
        self.grid.update();
        Some(self.grid.reachable(&start, &end))
    }

    /// Searches from the start to the end with `solver`.
    pub fn run(&self, solver: &BfsSolver) -> Result<SearchResult> {
        let start = self.start.ok_or(InvalidInput::MissingStart)?;
        let end = self.end.ok_or(InvalidInput::MissingEnd)?;
        solver.search(&self.grid, start, end)
    }

    fn symbols(&self) -> Vec<Vec<char>> {
        (0..self.rows() as i32)
            .map(|y| {
                (0..self.cols() as i32)
                    .map(|x| self.cell(Point::new(x, y)).map_or(' ', Cell::symbol))
                    .collect()
            })
            .collect()
    }

    /// Text rendering of the board with visited cells and the path of `result` drawn in.
    pub fn render(&self, result: &SearchResult) -> String {
        let mut rows = self.symbols();
        let mut mark = |p: &Point, symbol: char| {
            if let Some(c) = rows
                .get_mut(p.y as usize)
                .and_then(|row| row.get_mut(p.x as usize))
            {
                if *c == Cell::Empty.symbol() || *c == VISITED_SYMBOL {
                    *c = symbol;
                }
            }
        };
        for p in result.visit_order() {
            mark(p, VISITED_SYMBOL);
        }
        for p in result.path().unwrap_or_default() {
            mark(p, PATH_SYMBOL);
        }
        rows.into_iter()
            .map(|row| row.into_iter().collect::<String>() + "\n")
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.symbols() {
            writeln!(f, "{}", row.into_iter().collect::<String>())?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = ParseBoardError;

    /// Reads one row per line using `.` for open cells, `#` for walls, `S` for the start and
    /// `E` for the end. Blank lines are skipped.
    fn from_str(s: &str) -> std::result::Result<Board, ParseBoardError> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let cols = lines.first().ok_or(ParseBoardError::Empty)?.chars().count();
        let mut board = Board::new(lines.len(), cols);
        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != cols {
                return Err(ParseBoardError::RaggedRow {
                    row,
                    expected: cols,
                    found,
                });
            }
            for (col, symbol) in line.chars().enumerate() {
                let p = Point::new(col as i32, row as i32);
                match Cell::from_symbol(symbol) {
                    Some(Cell::Empty) => {}
                    Some(Cell::Wall) => board.grid.grid.set(p.x, p.y, true),
                    Some(Cell::Start) if board.start.is_none() => board.start = Some(p),
                    Some(Cell::End) if board.end.is_none() => board.end = Some(p),
                    Some(_) => return Err(ParseBoardError::DuplicateMarker(symbol)),
                    None => {
                        return Err(ParseBoardError::UnknownCell {
                            row,
                            col,
                            found: symbol,
                        })
                    }
                }
            }
        }
        board.grid.generate_components();
        Ok(board)
    }
}
