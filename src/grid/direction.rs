/// One of the four edges of a tile, also used as the step direction between two cells.
///
/// The grid is indexed with `y` growing downwards: [`Direction::Top`] is `y - 1`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Direction {
    Top = 0,
    Right = 1,
    Bottom = 2,
    Left = 3,
}

impl Direction {
    /// Returns the direction pointing the other way (top/bottom, right/left).
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Top => Direction::Bottom,
            Direction::Right => Direction::Left,
            Direction::Bottom => Direction::Top,
            Direction::Left => Direction::Right,
        }
    }

    /// Returns the offset to apply to a position to reach its neighbour in this direction.
    #[inline]
    pub fn delta(&self) -> &'static GridDelta {
        &CARTESIAN_2D_DELTAS[*self as usize]
    }
}

/// All the directions, in the order in which neighbours are visited during propagation.
pub const ALL_DIRECTIONS: &'static [Direction] = &[
    Direction::Top,
    Direction::Right,
    Direction::Bottom,
    Direction::Left,
];

/// Offset between two grid positions
#[derive(Debug)]
pub struct GridDelta {
    pub(crate) dx: i32,
    pub(crate) dy: i32,
}

const CARTESIAN_2D_DELTAS: &'static [GridDelta] = &[
    // Top
    GridDelta { dx: 0, dy: -1 },
    // Right
    GridDelta { dx: 1, dy: 0 },
    // Bottom
    GridDelta { dx: 0, dy: 1 },
    // Left
    GridDelta { dx: -1, dy: 0 },
];
