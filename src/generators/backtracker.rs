use rand::Rng;

use crate::maze::{Maze, PathId};

/// Result of advancing a [`SearchLane`] by one step.
#[derive(Debug, Clone, PartialEq)]
pub enum LaneStep {
    /// A new cell was visited and carved into the maze.
    Carved {
        cell: usize,
        /// Cells retreated through before a new cell was found, most recent last.
        backtracked: Vec<usize>,
    },
    /// The lane has visited everything it can reach. Further advances are no-ops.
    Complete {
        /// Cells retreated through in this step before the stack ran dry.
        backtracked: Vec<usize>,
    },
}

impl LaneStep {
    pub fn is_complete(&self) -> bool {
        matches!(self, LaneStep::Complete { .. })
    }

    pub fn backtracked(&self) -> &[usize] {
        match self {
            LaneStep::Carved { backtracked, .. } | LaneStep::Complete { backtracked } => {
                backtracked
            }
        }
    }
}

/// One randomized depth-first search over the maze.
///
/// The lane owns an explicit stack of cell indices instead of recursing, so a
/// single [`SearchLane::advance`] is the atomic unit of progress: it carves at
/// most one cell. The top of the stack is always the current cell.
#[derive(Debug, Clone)]
pub struct SearchLane {
    path_id: PathId,
    start: usize,
    current: Option<usize>,
    stack: Vec<usize>,
    started: bool,
    complete: bool,
}

impl SearchLane {
    pub fn new(path_id: PathId, start: usize) -> Self {
        SearchLane {
            path_id,
            start,
            current: None,
            stack: Vec::new(),
            started: false,
            complete: false,
        }
    }

    pub fn path_id(&self) -> PathId {
        self.path_id
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// The active frontier cell. `None` before the first advance and after completion.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Visited-path history, most recent last.
    pub fn stack(&self) -> &[usize] {
        &self.stack
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Advance the search by one carved cell.
    ///
    /// The first advance claims the lane's start cell. After that, a random
    /// unvisited neighbor of the current cell is carved; on a dead end the lane
    /// pops back through its stack until it finds a cell with unvisited
    /// neighbors, or completes when the stack is empty.
    pub fn advance<R: Rng>(&mut self, maze: &mut Maze, rng: &mut R) -> LaneStep {
        if self.complete {
            return LaneStep::Complete {
                backtracked: Vec::new(),
            };
        }

        if !self.started {
            self.started = true;
            if maze[self.start].is_visited() {
                // The other lane got here first, nothing left for this one
                tracing::debug!("Lane {} start cell {} already claimed", self.path_id, self.start);
                return self.finish(Vec::new());
            }
            maze.mark_visited(self.start, None, self.path_id);
            self.stack.push(self.start);
            self.current = Some(self.start);
            return LaneStep::Carved {
                cell: self.start,
                backtracked: Vec::new(),
            };
        }

        let mut backtracked = Vec::new();
        while let Some(&top) = self.stack.last() {
            let neighbors = maze.unvisited_neighbors(top);
            if !neighbors.is_empty() {
                let next = neighbors[rng.random_range(0..neighbors.len())];
                maze.mark_visited(next, Some(top), self.path_id);
                self.stack.push(next);
                self.current = Some(next);
                return LaneStep::Carved {
                    cell: next,
                    backtracked,
                };
            }

            // Dead end, retreat to the predecessor and look again from there
            self.stack.pop();
            if let Some(&prev) = self.stack.last() {
                backtracked.push(prev);
                self.current = Some(prev);
            }
        }

        self.finish(backtracked)
    }

    fn finish(&mut self, backtracked: Vec<usize>) -> LaneStep {
        tracing::debug!("Lane {} search complete", self.path_id);
        self.current = None;
        self.complete = true;
        LaneStep::Complete { backtracked }
    }
}
