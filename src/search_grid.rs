use core::fmt;
use grid_util::grid::{BoolGrid, ValueGrid};
use grid_util::Point;
use log::debug;
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

use crate::bfs::Heading;

/// [SearchGrid] keeps the raw [bool] wall values in a [BoolGrid], where a blocked cell is
/// [true] and an open cell is [false], together with the 4-connected components of the
/// open cells in a [UnionFind] structure for quick reachability queries.
/// Implements [ValueGrid] by building on [BoolGrid].
#[derive(Clone, Debug)]
pub struct SearchGrid {
    pub grid: BoolGrid,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
}

impl Default for SearchGrid {
    fn default() -> SearchGrid {
        SearchGrid {
            grid: BoolGrid::default(),
            components: UnionFind::new(0),
            components_dirty: false,
        }
    }
}

impl SearchGrid {
    /// The in-bounds orthogonal neighbours of a point, blocked or not.
    pub fn neighborhood_points(&self, point: &Point) -> SmallVec<[Point; 4]> {
        Heading::ALL
            .iter()
            .map(|heading| heading.apply(point))
            .filter(|p| self.point_in_bounds(*p))
            .collect()
    }

    /// Whether a point is inside the grid and not a wall.
    pub fn is_open(&self, pos: Point) -> bool {
        self.point_in_bounds(pos) && !self.grid.get_point(pos)
    }

    /// Retrieves the component id a given [Point] belongs to, or [None] outside the grid.
    pub fn get_component(&self, point: &Point) -> Option<usize> {
        if !self.point_in_bounds(*point) {
            return None;
        }
        Some(self.components.find(self.get_ix_point(point)))
    }

    /// Checks if start and goal are on the same component.
    pub fn reachable(&self, start: &Point, goal: &Point) -> bool {
        !self.unreachable(start, goal)
    }

    /// Checks if start and goal are not on the same component. Points outside the grid are
    /// never reachable.
    pub fn unreachable(&self, start: &Point, goal: &Point) -> bool {
        if self.point_in_bounds(*start) && self.point_in_bounds(*goal) {
            let start_ix = self.get_ix_point(start);
            let goal_ix = self.get_ix_point(goal);
            !self.components.equiv(start_ix, goal_ix)
        } else {
            true
        }
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            debug!("Components are dirty: regenerating components");
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up open neighbours to the same
    /// components. Only the cells below and to the right are joined, the others are covered
    /// when their own turn comes.
    pub fn generate_components(&mut self) {
        let w = self.grid.width;
        let h = self.grid.height;
        self.components = UnionFind::new(w * h);
        self.components_dirty = false;
        for x in 0..w as i32 {
            for y in 0..h as i32 {
                if self.grid.get(x, y) {
                    continue;
                }
                let point = Point::new(x, y);
                let parent_ix = self.get_ix_point(&point);
                for p in [Point::new(x, y + 1), Point::new(x + 1, y)] {
                    if self.is_open(p) {
                        let ix = self.get_ix_point(&p);
                        self.components.union(parent_ix, ix);
                    }
                }
            }
        }
    }

    /// Clears every wall and rebuilds the components.
    pub fn clear(&mut self) {
        self.grid = BoolGrid::new(self.width(), self.height(), false);
        self.generate_components();
    }
}

impl fmt::Display for SearchGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Grid:")?;
        for y in 0..self.grid.height as i32 {
            let values = (0..self.grid.width as i32)
                .map(|x| self.grid.get(x, y) as i32)
                .collect::<Vec<i32>>();
            writeln!(f, "{:?}", values)?;
        }
        Ok(())
    }
}

impl ValueGrid<bool> for SearchGrid {
    fn new(width: usize, height: usize, default_value: bool) -> Self {
        let mut base_grid = SearchGrid {
            grid: BoolGrid::new(width, height, default_value),
            components: UnionFind::new(width * height),
            components_dirty: false,
        };
        base_grid.generate_components();
        base_grid
    }
    fn get(&self, x: i32, y: i32) -> bool {
        self.grid.get(x, y)
    }
    /// Updates a position on the grid. Joins newly connected components and flags the components
    /// as dirty if components are (potentially) broken apart into multiple.
    fn set(&mut self, x: i32, y: i32, blocked: bool) {
        let p = Point::new(x, y);
        if blocked {
            if !self.grid.get(x, y) {
                self.components_dirty = true;
            }
        } else {
            let p_ix = self.grid.compute_ix(x, y);
            for n in self.neighborhood_points(&p) {
                if !self.grid.get_point(n) {
                    self.components.union(p_ix, self.grid.get_ix_point(&n));
                }
            }
        }
        self.grid.set(x, y, blocked);
    }
    fn width(&self) -> usize {
        self.grid.width()
    }
    fn height(&self) -> usize {
        self.grid.height()
    }
}
