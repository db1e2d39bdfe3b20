pub mod cell;

pub use cell::{Cell, PathId, Side};

/// The grid of cells a maze is carved into.
///
/// Cells are stored row-major, so the cell at `(row, col)` lives at
/// `row * cols + col`. The first cell is the start of the maze and the last cell
/// is its end. Coordinates outside the grid have no neighbor; there is no
/// wrap-around.
#[derive(Debug, Clone)]
pub struct Maze {
    cells: Box<[Cell]>,
    rows: usize,
    cols: usize,
}

impl Maze {
    /// Creates a maze with every wall closed and no cell visited.
    ///
    /// Panics if either `rows` or `cols` is 0.
    pub fn new(rows: usize, cols: usize) -> Self {
        assert!(rows > 0 && cols > 0, "Maze dimensions must be non-zero");
        let total = rows * cols;
        let cells = (0..total)
            .map(|index| Cell::new(index, cols, index == 0, index == total - 1))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Maze { cells, rows, cols }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells in the maze.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn start_index(&self) -> usize {
        0
    }

    pub fn end_index(&self) -> usize {
        self.cells.len() - 1
    }

    /// The row scanned for a seam between the two lanes.
    pub fn middle_row(&self) -> usize {
        self.rows / 2
    }

    pub fn is_in_bounds(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.cols
    }

    /// Get the in-bounds neighbors of a cell, always in `N, E, S, W` order.
    /// Callers that need a random order must pick from the result themselves.
    pub fn neighbors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        let cell = &self.cells[index];
        let (row, col) = (cell.row() as isize, cell.col() as isize);
        Side::ALL.into_iter().filter_map(move |side| {
            let (d_row, d_col) = side.offset();
            let (n_row, n_col) = (row + d_row, col + d_col);
            self.is_in_bounds(n_row, n_col)
                .then(|| n_row as usize * self.cols + n_col as usize)
        })
    }

    /// Get the neighbors of a cell that no lane has visited yet.
    pub fn unvisited_neighbors(&self, index: usize) -> Vec<usize> {
        self.neighbors(index)
            .filter(|&n| !self.cells[n].is_visited())
            .collect()
    }

    /// Get the neighbors reachable from a cell through an open wall.
    pub fn open_neighbors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        let cell = &self.cells[index];
        self.neighbors(index).filter(move |&n| {
            cell.side_facing(&self.cells[n])
                .is_some_and(|side| !cell.has_wall(side))
        })
    }

    /// Opens the passage between two adjacent cells on both sides.
    ///
    /// Calling this with cells that are not adjacent is a contract violation; the
    /// call is logged and ignored, leaving every wall untouched.
    pub fn connect(&mut self, a: usize, b: usize) {
        if self.cells[a].side_facing(&self.cells[b]).is_none() {
            tracing::warn!("Ignoring connect between non-adjacent cells {} and {}", a, b);
            return;
        }
        self.connect_one_way(a, b);
        self.connect_one_way(b, a);
    }

    /// Records `to` in `from`'s connections and clears the wall of `from` facing `to`.
    fn connect_one_way(&mut self, from: usize, to: usize) {
        let Some(side) = self.cells[from].side_facing(&self.cells[to]) else {
            return;
        };
        let cell = &mut self.cells[from];
        if !cell.connections.contains(&to) {
            cell.connections.push(to);
        }
        cell.walls[side.index()] = false;
    }

    /// Marks a cell as visited by the given lane and carves the passage from
    /// `prev`, if any.
    ///
    /// Every wall of an ordinary cell is closed again before the passage is opened.
    /// The start cell keeps its west side open and the end cell its east side, so
    /// the finished maze has exactly one entrance and one exit.
    ///
    /// Returns the index of the marked cell.
    pub fn mark_visited(&mut self, index: usize, prev: Option<usize>, path_id: PathId) -> usize {
        let cell = &mut self.cells[index];
        if cell.visited {
            tracing::warn!("Cell {} marked visited more than once", index);
        }
        cell.visited = true;
        cell.path_id = Some(path_id);
        if !cell.is_start() && !cell.is_end() {
            cell.walls = [true; 4];
        }

        if let Some(prev) = prev {
            self.connect(index, prev);
        }

        let cell = &mut self.cells[index];
        if cell.is_start() {
            cell.walls[Side::West.index()] = false;
        } else if cell.is_end() {
            cell.walls[Side::East.index()] = false;
        }
        index
    }

    /// True iff both cells were claimed by a lane and the lanes differ.
    pub fn has_different_path_id(&self, a: usize, b: usize) -> bool {
        self.cells[a].has_different_path_id(&self.cells[b])
    }

    /// Number of undirected connections carved so far.
    pub fn edge_count(&self) -> usize {
        self.cells.iter().map(|c| c.connections().len()).sum::<usize>() / 2
    }

    /// Number of cells some lane has visited.
    pub fn visited_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_visited()).count()
    }
}

impl std::ops::Index<usize> for Maze {
    type Output = Cell;

    fn index(&self, index: usize) -> &Self::Output {
        &self.cells[index]
    }
}

impl std::ops::Index<(usize, usize)> for Maze {
    type Output = Cell;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.cells[row * self.cols + col]
    }
}
