//! Breadth-first search on a 4-connected grid.
//!
//! The traversal state lives in a [BfsCursor] owned by the caller, which advances one dequeued
//! cell per [step](BfsCursor::step). This lets a front end pace an animation without the search
//! knowing anything about timers. [BfsSolver::search] simply drives a cursor to completion.
use fxhash::FxBuildHasher;
use grid_util::grid::ValueGrid;
use grid_util::Point;
use indexmap::map::Entry::Vacant;
use indexmap::IndexMap;
use log::{info, warn};
use smallvec::SmallVec;
use std::collections::VecDeque;

use crate::error::{InvalidInput, Result, SearchError};
use crate::{path_is_connected, DEFAULT_HEADING_ORDER};

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Parent index of the start node, which has no predecessor.
const NO_PARENT: usize = usize::MAX;

/// One of the four orthogonal moves. Rows grow downwards, so [Heading::Down] is `+y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Heading {
    Down,
    Up,
    Right,
    Left,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::Down, Heading::Up, Heading::Right, Heading::Left];

    /// Offset as `(dx, dy)`.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Heading::Down => (0, 1),
            Heading::Up => (0, -1),
            Heading::Right => (1, 0),
            Heading::Left => (-1, 0),
        }
    }

    pub fn apply(self, point: &Point) -> Point {
        let (dx, dy) = self.delta();
        Point::new(point.x + dx, point.y + dy)
    }
}

fn in_bounds<G: ValueGrid<bool>>(grid: &G, p: Point) -> bool {
    p.x >= 0 && p.y >= 0 && (p.x as usize) < grid.width() && (p.y as usize) < grid.height()
}

/// Outcome of a finished search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchResult {
    /// The end was dequeued. `path` runs from start to end inclusive.
    Found {
        visit_order: Vec<Point>,
        path: Vec<Point>,
    },
    /// The queue ran dry without reaching the end.
    NotFound { visit_order: Vec<Point> },
}

impl SearchResult {
    /// Cells in the order they were first marked visited. The start is not included.
    pub fn visit_order(&self) -> &[Point] {
        match self {
            SearchResult::Found { visit_order, .. } | SearchResult::NotFound { visit_order } => {
                visit_order
            }
        }
    }
    pub fn path(&self) -> Option<&[Point]> {
        match self {
            SearchResult::Found { path, .. } => Some(path),
            SearchResult::NotFound { .. } => None,
        }
    }
    pub fn is_found(&self) -> bool {
        matches!(self, SearchResult::Found { .. })
    }
}

/// What a single [BfsCursor::step] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// `node` was dequeued and its unvisited open neighbours were queued, in heading order.
    Expanded {
        node: Point,
        discovered: SmallVec<[Point; 4]>,
    },
    /// The end was dequeued.
    Reached(Point),
    /// The queue is empty and the end was never dequeued.
    Exhausted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Done {
    Reached,
    Exhausted,
}

/// Explicit BFS state: the FIFO queue plus the visited set and predecessor map. The latter two
/// share one [IndexMap] keyed by cell, whose insertion order is the visitation order and whose
/// values are the index of the predecessor. The start sits at index 0.
///
/// The cursor borrows the grid, so walls cannot change while a search is in progress.
#[derive(Clone, Debug)]
pub struct BfsCursor<'a, G> {
    grid: &'a G,
    order: [Heading; 4],
    start: Point,
    goal: Point,
    queue: VecDeque<(Point, usize)>,
    parents: FxIndexMap<Point, usize>,
    done: Option<Done>,
}

impl<'a, G: ValueGrid<bool>> BfsCursor<'a, G> {
    fn new(grid: &'a G, order: [Heading; 4], start: Point, goal: Point) -> Self {
        let mut parents = FxIndexMap::default();
        parents.insert(start, NO_PARENT);
        let mut queue = VecDeque::new();
        queue.push_back((start, 0));
        BfsCursor {
            grid,
            order,
            start,
            goal,
            queue,
            parents,
            done: None,
        }
    }

    pub fn start(&self) -> Point {
        self.start
    }
    pub fn goal(&self) -> Point {
        self.goal
    }
    pub fn is_finished(&self) -> bool {
        self.done.is_some()
    }

    /// Dequeues one cell. After the search has ended every call returns the same terminal step.
    pub fn step(&mut self) -> Step {
        match self.done {
            Some(Done::Reached) => return Step::Reached(self.goal),
            Some(Done::Exhausted) => return Step::Exhausted,
            None => {}
        }
        let Some((node, index)) = self.queue.pop_front() else {
            self.done = Some(Done::Exhausted);
            return Step::Exhausted;
        };
        if node == self.goal {
            self.done = Some(Done::Reached);
            return Step::Reached(node);
        }
        let mut discovered = SmallVec::new();
        for heading in self.order {
            let next = heading.apply(&node);
            if !in_bounds(self.grid, next) || self.grid.get(next.x, next.y) {
                continue;
            }
            if let Vacant(e) = self.parents.entry(next) {
                let n = e.index();
                e.insert(index);
                self.queue.push_back((next, n));
                discovered.push(next);
            }
        }
        Step::Expanded { node, discovered }
    }

    /// Cells visited so far, excluding the start.
    pub fn visit_order(&self) -> impl Iterator<Item = Point> + '_ {
        self.parents.keys().skip(1).copied()
    }
    pub fn visited_count(&self) -> usize {
        self.parents.len()
    }
    pub fn is_visited(&self, point: &Point) -> bool {
        self.parents.contains_key(point)
    }
    /// The cell from which `point` was first reached. [None] for the start and unvisited cells.
    pub fn predecessor(&self, point: &Point) -> Option<Point> {
        let &parent = self.parents.get(point)?;
        self.parents.get_index(parent).map(|(p, _)| *p)
    }
    /// Cells queued but not yet dequeued.
    pub fn frontier(&self) -> impl Iterator<Item = Point> + '_ {
        self.queue.iter().map(|(p, _)| *p)
    }

    /// Runs the remaining steps and builds the result.
    pub fn finish(mut self) -> Result<SearchResult> {
        loop {
            match self.step() {
                Step::Expanded { .. } => continue,
                Step::Reached(_) => break,
                Step::Exhausted => {
                    info!(
                        "{} is not reachable from {}, visited {} cells",
                        self.goal,
                        self.start,
                        self.visited_count()
                    );
                    return Ok(SearchResult::NotFound {
                        visit_order: self.visit_order().collect(),
                    });
                }
            }
        }
        let path = self.reconstruct()?;
        info!(
            "Found path of {} cells from {} to {}, visited {} cells",
            path.len(),
            self.start,
            self.goal,
            self.visited_count()
        );
        Ok(SearchResult::Found {
            visit_order: self.visit_order().collect(),
            path,
        })
    }

    /// Follows predecessors back from the goal. The walk is bounded by the number of visited
    /// cells, so a corrupted map cannot loop forever.
    fn reconstruct(&self) -> Result<Vec<Point>> {
        let Some(goal_ix) = self.parents.get_index_of(&self.goal) else {
            warn!("Goal {} was reached but never recorded as visited", self.goal);
            return Err(SearchError::InternalInconsistency { at: self.goal });
        };
        let path = reverse_path(&self.parents, goal_ix);
        if path.first() != Some(&self.start) {
            let at = path.first().copied().unwrap_or(self.goal);
            warn!("Predecessor chain from {} ends at {} instead of {}", self.goal, at, self.start);
            return Err(SearchError::InternalInconsistency { at });
        }
        if !path_is_connected(&path) {
            let at = path
                .windows(2)
                .find(|w| w[0].manhattan_distance(&w[1]) != 1)
                .map_or(self.goal, |w| w[1]);
            warn!("Predecessor chain from {} jumps at {}", self.goal, at);
            return Err(SearchError::InternalInconsistency { at });
        }
        Ok(path)
    }
}

fn reverse_path(parents: &FxIndexMap<Point, usize>, start: usize) -> Vec<Point> {
    let mut path: Vec<Point> = itertools::unfold(start, |i| {
        parents.get_index(*i).map(|(node, &parent)| {
            *i = parent;
            *node
        })
    })
    .take(parents.len())
    .collect();
    path.reverse();
    path
}

/// Breadth-first solver. `order` is the tie-break order in which neighbours are examined. It
/// decides which of several shortest paths is returned and the exact visitation order, never
/// the path length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BfsSolver {
    pub order: [Heading; 4],
}

impl Default for BfsSolver {
    fn default() -> Self {
        BfsSolver {
            order: DEFAULT_HEADING_ORDER,
        }
    }
}

impl BfsSolver {
    pub fn new() -> BfsSolver {
        BfsSolver::default()
    }

    /// Uses a different tie-break order. `order` must be a permutation of [Heading::ALL], which
    /// is checked when a search starts.
    pub fn with_order(order: [Heading; 4]) -> BfsSolver {
        BfsSolver { order }
    }

    /// Checks that the heading order is a permutation and that start and end are distinct, in
    /// bounds and open.
    pub fn validate<G: ValueGrid<bool>>(&self, grid: &G, start: Point, end: Point) -> Result<()> {
        if !Heading::ALL.iter().all(|h| self.order.contains(h)) {
            return Err(InvalidInput::HeadingOrder(self.order).into());
        }
        if !in_bounds(grid, start) {
            return Err(InvalidInput::StartOutOfBounds(start).into());
        }
        if !in_bounds(grid, end) {
            return Err(InvalidInput::EndOutOfBounds(end).into());
        }
        if start == end {
            return Err(InvalidInput::SameStartAndEnd(start).into());
        }
        if grid.get(start.x, start.y) {
            return Err(InvalidInput::StartBlocked(start).into());
        }
        if grid.get(end.x, end.y) {
            return Err(InvalidInput::EndBlocked(end).into());
        }
        Ok(())
    }

    /// A fresh traversal from `start` to `end`, to be advanced with [BfsCursor::step].
    pub fn cursor<'a, G: ValueGrid<bool>>(
        &self,
        grid: &'a G,
        start: Point,
        end: Point,
    ) -> Result<BfsCursor<'a, G>> {
        self.validate(grid, start, end)?;
        Ok(BfsCursor::new(grid, self.order, start, end))
    }

    /// Runs a complete search from `start` to `end`.
    pub fn search<G: ValueGrid<bool>>(
        &self,
        grid: &G,
        start: Point,
        end: Point,
    ) -> Result<SearchResult> {
        self.cursor(grid, start, end)?.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord;
    use crate::search_grid::SearchGrid;
    use grid_util::grid::BoolGrid;

    fn rc(cells: &[(i32, i32)]) -> Vec<Point> {
        cells.iter().map(|&(r, c)| coord(r, c)).collect()
    }

    /// The down, up, right, left order makes the path hug the left column first.
    #[test]
    fn open_3x3_corner_to_corner() {
        let grid = SearchGrid::new(3, 3, false);
        let result = BfsSolver::new()
            .search(&grid, coord(0, 0), coord(2, 2))
            .unwrap();
        assert_eq!(
            result.path().unwrap(),
            rc(&[(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)]).as_slice()
        );
        assert_eq!(
            result.visit_order(),
            rc(&[
                (1, 0),
                (0, 1),
                (2, 0),
                (1, 1),
                (0, 2),
                (2, 1),
                (1, 2),
                (2, 2)
            ])
            .as_slice()
        );
    }

    #[test]
    fn full_wall_row_is_not_found() {
        // |S  |
        // |###|
        // |E  |
        let mut grid = SearchGrid::new(3, 3, false);
        for c in 0..3 {
            grid.set(c, 1, true);
        }
        let result = BfsSolver::new()
            .search(&grid, coord(0, 0), coord(2, 0))
            .unwrap();
        assert!(!result.is_found());
        assert_eq!(result.path(), None);
        assert_eq!(result.visit_order(), rc(&[(0, 1), (0, 2)]).as_slice());
    }

    #[test]
    fn detour_around_wall() {
        // |S#E|
        // | # |
        // |   |
        let mut grid = BoolGrid::new(3, 3, false);
        grid.set(1, 0, true);
        grid.set(1, 1, true);
        let result = BfsSolver::new()
            .search(&grid, coord(0, 0), coord(0, 2))
            .unwrap();
        let path = result.path().unwrap();
        assert_eq!(path.len(), 7);
        assert!(path_is_connected(path));
        assert!(path.iter().all(|p| !grid.get(p.x, p.y)));
    }

    #[test]
    fn adjacent_cells() {
        let grid = SearchGrid::new(2, 1, false);
        let result = BfsSolver::new()
            .search(&grid, coord(0, 0), coord(0, 1))
            .unwrap();
        assert_eq!(result.path().unwrap(), rc(&[(0, 0), (0, 1)]).as_slice());
        assert_eq!(result.visit_order(), rc(&[(0, 1)]).as_slice());
    }

    #[test]
    fn rejects_invalid_input() {
        let mut grid = SearchGrid::new(3, 3, false);
        grid.set(1, 1, true);
        let solver = BfsSolver::new();
        let err = |s, e| solver.search(&grid, s, e).unwrap_err();
        assert_eq!(
            err(coord(0, 0), coord(0, 0)),
            SearchError::from(InvalidInput::SameStartAndEnd(coord(0, 0)))
        );
        assert_eq!(
            err(coord(-1, 0), coord(0, 0)),
            SearchError::from(InvalidInput::StartOutOfBounds(coord(-1, 0)))
        );
        assert_eq!(
            err(coord(0, 0), coord(0, 3)),
            SearchError::from(InvalidInput::EndOutOfBounds(coord(0, 3)))
        );
        assert_eq!(
            err(coord(1, 1), coord(0, 0)),
            SearchError::from(InvalidInput::StartBlocked(coord(1, 1)))
        );
        assert_eq!(
            err(coord(0, 0), coord(1, 1)),
            SearchError::from(InvalidInput::EndBlocked(coord(1, 1)))
        );
    }

    #[test]
    fn cursor_steps_match_search() {
        let mut grid = SearchGrid::new(4, 4, false);
        grid.set(1, 1, true);
        grid.set(2, 2, true);
        let solver = BfsSolver::new();
        let mut cursor = solver.cursor(&grid, coord(0, 0), coord(3, 3)).unwrap();
        let mut discovered_in_steps = Vec::new();
        let mut ticks = 0;
        loop {
            ticks += 1;
            match cursor.step() {
                Step::Expanded { discovered, .. } => discovered_in_steps.extend(discovered),
                Step::Reached(p) => {
                    assert_eq!(p, coord(3, 3));
                    break;
                }
                Step::Exhausted => panic!("end should be reachable"),
            }
        }
        assert!(ticks > 1);
        assert!(cursor.is_finished());
        assert_eq!(cursor.step(), Step::Reached(coord(3, 3)));
        assert_eq!(cursor.visit_order().collect::<Vec<_>>(), discovered_in_steps);
        let stepped = cursor.finish().unwrap();
        let direct = solver.search(&grid, coord(0, 0), coord(3, 3)).unwrap();
        assert_eq!(stepped, direct);
    }

    #[test]
    fn first_step_expands_start_in_heading_order() {
        let grid = SearchGrid::new(3, 3, false);
        let mut cursor = BfsSolver::new()
            .cursor(&grid, coord(1, 1), coord(2, 2))
            .unwrap();
        match cursor.step() {
            Step::Expanded { node, discovered } => {
                assert_eq!(node, coord(1, 1));
                assert_eq!(
                    discovered.to_vec(),
                    rc(&[(2, 1), (0, 1), (1, 2), (1, 0)])
                );
            }
            other => panic!("unexpected step {other:?}"),
        }
        assert_eq!(cursor.frontier().count(), 4);
        assert_eq!(cursor.predecessor(&coord(0, 1)), Some(coord(1, 1)));
        assert_eq!(cursor.predecessor(&coord(1, 1)), None);
        assert!(!cursor.is_visited(&coord(0, 0)));
    }

    #[test]
    fn exhausted_is_sticky() {
        let mut grid = SearchGrid::new(3, 1, false);
        grid.set(1, 0, true);
        let mut cursor = BfsSolver::new()
            .cursor(&grid, coord(0, 0), coord(0, 2))
            .unwrap();
        assert_eq!(
            cursor.step(),
            Step::Expanded {
                node: coord(0, 0),
                discovered: SmallVec::new()
            }
        );
        assert_eq!(cursor.step(), Step::Exhausted);
        assert_eq!(cursor.step(), Step::Exhausted);
    }

    #[test]
    fn heading_order_changes_tie_break_only() {
        let grid = SearchGrid::new(3, 3, false);
        let solver =
            BfsSolver::with_order([Heading::Right, Heading::Left, Heading::Down, Heading::Up]);
        let result = solver.search(&grid, coord(0, 0), coord(2, 2)).unwrap();
        assert_eq!(
            result.path().unwrap(),
            rc(&[(0, 0), (0, 1), (0, 2), (1, 2), (2, 2)]).as_slice()
        );
    }

    #[test]
    fn broken_chain_is_inconsistent() {
        let grid = SearchGrid::new(3, 1, false);
        let mut cursor = BfsSolver::new()
            .cursor(&grid, coord(0, 0), coord(0, 2))
            .unwrap();
        while !cursor.is_finished() {
            cursor.step();
        }
        // Point the end back at itself.
        let goal_ix = cursor.parents.get_index_of(&coord(0, 2)).unwrap();
        cursor.parents.insert(coord(0, 2), goal_ix);
        assert!(matches!(
            cursor.reconstruct(),
            Err(SearchError::InternalInconsistency { .. })
        ));
    }

    /// A chain that jumps over a cell is rejected even though it starts at the start.
    #[test]
    fn jumping_chain_is_inconsistent() {
        // |S.E|
        let grid = SearchGrid::new(3, 1, false);
        let mut cursor = BfsSolver::new()
            .cursor(&grid, coord(0, 0), coord(0, 2))
            .unwrap();
        while !cursor.is_finished() {
            cursor.step();
        }
        // Make the end a direct child of the start.
        cursor.parents.insert(coord(0, 2), 0);
        assert_eq!(
            cursor.reconstruct(),
            Err(SearchError::InternalInconsistency { at: coord(0, 2) })
        );
    }

    #[test]
    fn incomplete_heading_order_is_rejected() {
        let grid = SearchGrid::new(2, 1, false);
        let order = [Heading::Down; 4];
        let solver = BfsSolver { order };
        assert_eq!(
            solver.search(&grid, coord(0, 0), coord(0, 1)),
            Err(SearchError::from(InvalidInput::HeadingOrder(order)))
        );
        let solver =
            BfsSolver::with_order([Heading::Up, Heading::Up, Heading::Right, Heading::Left]);
        assert!(solver.cursor(&grid, coord(0, 0), coord(0, 1)).is_err());
    }
}
