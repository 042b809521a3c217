use std::fmt;

use self::direction::{Direction, GridDelta, ALL_DIRECTIONS};

/// Defines directions and grid deltas
pub mod direction;

/// Represents a position in a grid
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct GridPosition {
    /// Position on the x axis (columns, growing to the right)
    pub x: u32,
    /// Position on the y axis (rows, growing downwards)
    pub y: u32,
}

impl GridPosition {
    pub fn new(x: u32, y: u32) -> GridPosition {
        Self { x, y }
    }

    fn get_delta_position(&self, delta: &GridDelta) -> (i64, i64) {
        (
            i64::from(self.x) + i64::from(delta.dx),
            i64::from(self.y) + i64::from(delta.dy),
        )
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A square, non-looping 2d grid of `size * size` positions.
#[derive(Clone, Copy, Debug)]
pub struct GridDefinition {
    size: u32,
}

impl fmt::Display for GridDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "( size: {} {} )", self.size, self.size)
    }
}

impl GridDefinition {
    /// Creates a new [`GridDefinition`]
    pub fn new(size: u32) -> GridDefinition {
        Self { size }
    }

    /// Returns the size of the grid on each axis.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Returns the total number of positions in the grid
    pub fn total_size(&self) -> usize {
        self.size as usize * self.size as usize
    }

    /// Returns `true` if the position is inside the grid
    #[inline]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.size && y < self.size
    }

    /// Returns `true` if the position is on the outer ring of the grid.
    pub fn is_on_boundary(&self, pos: &GridPosition) -> bool {
        pos.x == 0 || pos.y == 0 || pos.x + 1 == self.size || pos.y + 1 == self.size
    }

    /// Returns the next position in the grid when moving 1 unit in `direction` from `grid_position`.
    ///
    /// Returns `None` if the destination is not in the grid.
    pub fn get_next_pos(
        &self,
        grid_position: &GridPosition,
        direction: Direction,
    ) -> Option<GridPosition> {
        let (x, y) = grid_position.get_delta_position(direction.delta());
        let size = i64::from(self.size);
        if x < 0 || x >= size || y < 0 || y >= size {
            return None;
        }
        // Both coordinates are in [0, size) so they fit in a u32
        Some(GridPosition::new(x as u32, y as u32))
    }

    /// Returns the positions of the (up to 4) neighbours of `grid_position`, with their direction from `grid_position`.
    pub fn neighbours(
        &self,
        grid_position: GridPosition,
    ) -> impl Iterator<Item = (Direction, GridPosition)> + '_ {
        ALL_DIRECTIONS.iter().filter_map(move |&dir| {
            self.get_next_pos(&grid_position, dir)
                .map(|next_pos| (dir, next_pos))
        })
    }

    /// Iterates over all the positions of the grid, row by row.
    pub fn positions(&self) -> impl Iterator<Item = GridPosition> {
        let size = self.size;
        (0..size).flat_map(move |y| (0..size).map(move |x| GridPosition::new(x, y)))
    }
}
