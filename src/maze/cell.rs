use std::fmt;

/// One of the four compass sides of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    North,
    East,
    South,
    West,
}

impl Side {
    /// Fixed neighbor order used by every neighbor query.
    pub const ALL: [Side; 4] = [Side::North, Side::East, Side::South, Side::West];

    /// Index of this side into a cell's wall array.
    pub const fn index(self) -> usize {
        match self {
            Side::North => 0,
            Side::East => 1,
            Side::South => 2,
            Side::West => 3,
        }
    }

    pub const fn opposite(self) -> Side {
        match self {
            Side::North => Side::South,
            Side::East => Side::West,
            Side::South => Side::North,
            Side::West => Side::East,
        }
    }

    /// Row and column offset of the neighbor on this side.
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Side::North => (-1, 0),
            Side::East => (0, 1),
            Side::South => (1, 0),
            Side::West => (0, -1),
        }
    }
}

/// Identifies the search lane that first visited a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathId {
    /// Lane growing from the first cell of the grid.
    A,
    /// Lane growing from the last cell of the grid.
    Z,
}

impl fmt::Display for PathId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathId::A => write!(f, "A"),
            PathId::Z => write!(f, "Z"),
        }
    }
}

/// A unit position in the maze.
///
/// Walls are indexed by [`Side::index`]. A fresh cell has all four walls closed
/// and is unvisited.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    index: usize,
    row: usize,
    col: usize,
    pub(super) walls: [bool; 4],
    pub(super) visited: bool,
    pub(super) path_id: Option<PathId>,
    pub(super) connections: Vec<usize>,
    is_start: bool,
    is_end: bool,
}

impl Cell {
    pub(super) fn new(index: usize, cols: usize, is_start: bool, is_end: bool) -> Self {
        Cell {
            index,
            row: index / cols,
            col: index % cols,
            walls: [true; 4],
            visited: false,
            path_id: None,
            connections: Vec::new(),
            is_start,
            is_end,
        }
    }

    /// Row-major position of the cell.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    /// Whether the wall on the given side is closed.
    pub fn has_wall(&self, side: Side) -> bool {
        self.walls[side.index()]
    }

    /// All four walls in `N, E, S, W` order.
    pub fn walls(&self) -> [bool; 4] {
        self.walls
    }

    pub fn is_visited(&self) -> bool {
        self.visited
    }

    pub fn path_id(&self) -> Option<PathId> {
        self.path_id
    }

    /// Indices of the cells this cell has an open passage to.
    pub fn connections(&self) -> &[usize] {
        &self.connections
    }

    pub fn is_start(&self) -> bool {
        self.is_start
    }

    pub fn is_end(&self) -> bool {
        self.is_end
    }

    /// True iff both cells were claimed by a lane and the lanes differ.
    pub fn has_different_path_id(&self, other: &Cell) -> bool {
        matches!((self.path_id, other.path_id), (Some(a), Some(b)) if a != b)
    }

    /// Side of this cell that faces `other`, if the two cells are adjacent.
    pub fn side_facing(&self, other: &Cell) -> Option<Side> {
        let d_row = other.row as isize - self.row as isize;
        let d_col = other.col as isize - self.col as isize;
        Side::ALL
            .into_iter()
            .find(|side| side.offset() == (d_row, d_col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cell_is_closed_and_unvisited() {
        let cell = Cell::new(7, 5, false, false);
        assert_eq!((cell.row(), cell.col()), (1, 2));
        assert_eq!(cell.walls(), [true; 4]);
        assert!(!cell.is_visited());
        assert_eq!(cell.path_id(), None);
    }

    #[test]
    fn test_side_facing() {
        let center = Cell::new(4, 3, false, false);
        assert_eq!(center.side_facing(&Cell::new(1, 3, false, false)), Some(Side::North));
        assert_eq!(center.side_facing(&Cell::new(5, 3, false, false)), Some(Side::East));
        assert_eq!(center.side_facing(&Cell::new(7, 3, false, false)), Some(Side::South));
        assert_eq!(center.side_facing(&Cell::new(3, 3, false, false)), Some(Side::West));
        // Diagonal and distant cells are not adjacent
        assert_eq!(center.side_facing(&Cell::new(0, 3, false, false)), None);
        assert_eq!(center.side_facing(&Cell::new(4, 3, false, false)), None);
    }

    #[test]
    fn test_has_different_path_id() {
        let mut a = Cell::new(0, 2, true, false);
        let mut b = Cell::new(1, 2, false, false);
        assert!(!a.has_different_path_id(&b));
        a.path_id = Some(PathId::A);
        assert!(!a.has_different_path_id(&b));
        b.path_id = Some(PathId::A);
        assert!(!a.has_different_path_id(&b));
        b.path_id = Some(PathId::Z);
        assert!(a.has_different_path_id(&b));
        assert!(b.has_different_path_id(&a));
    }

    #[test]
    fn test_opposite_sides() {
        for side in Side::ALL {
            assert_eq!(side.opposite().opposite(), side);
            let (r, c) = side.offset();
            assert_eq!(side.opposite().offset(), (-r, -c));
        }
    }
}
