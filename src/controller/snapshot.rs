use std::sync::mpsc::Sender;

use crate::{
    controller::{GenerationParams, State},
    generators::TickReport,
    maze::{Maze, PathId, Side},
};

/// Read-only view of one cell, as handed to a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellView {
    /// Closed walls in `N, E, S, W` order.
    pub walls: [bool; 4],
    pub visited: bool,
    /// The cell was carved by the latest tick.
    pub cursor: bool,
    /// A lane retreated through the cell in the latest tick.
    pub backtrack: bool,
    pub path_id: Option<PathId>,
}

impl CellView {
    pub fn has_wall(&self, side: Side) -> bool {
        self.walls[side.index()]
    }
}

/// Everything a renderer needs to draw one frame.
///
/// The cursor and backtrack markers only describe the latest tick; they are not
/// part of the maze itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub state: State,
    pub session_id: u64,
    pub tick: u64,
    pub rows: usize,
    pub cols: usize,
    pub cell_size: u32,
    pub border_weight: u32,
    pub paths_connected: bool,
    /// Row-major cell views, empty while no session is allocated.
    pub cells: Vec<CellView>,
}

impl Snapshot {
    pub(super) fn idle(state: State, session_id: u64, params: &GenerationParams) -> Self {
        Snapshot {
            state,
            session_id,
            tick: 0,
            rows: 0,
            cols: 0,
            cell_size: params.cell_size,
            border_weight: params.border_weight,
            paths_connected: false,
            cells: Vec::new(),
        }
    }

    pub(super) fn capture(
        state: State,
        session_id: u64,
        params: &GenerationParams,
        maze: &Maze,
        tick: u64,
        paths_connected: bool,
        report: &TickReport,
    ) -> Self {
        let cells = maze
            .cells()
            .iter()
            .map(|cell| CellView {
                walls: cell.walls(),
                visited: cell.is_visited(),
                cursor: report.cursors.contains(&cell.index()),
                backtrack: report.backtracked.contains(&cell.index()),
                path_id: cell.path_id(),
            })
            .collect();
        Snapshot {
            state,
            session_id,
            tick,
            rows: maze.rows(),
            cols: maze.cols(),
            cell_size: params.cell_size,
            border_weight: params.border_weight,
            paths_connected,
            cells,
        }
    }

    pub fn state_name(&self) -> &'static str {
        self.state.name()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&CellView> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col)
    }
}

/// Opaque handle to whatever draws the snapshots.
///
/// The controller only ever pushes snapshots through it. A target whose
/// receiving side went away is silently skipped.
#[derive(Debug, Clone, Default)]
pub struct RenderTarget {
    tx: Option<Sender<Snapshot>>,
}

impl RenderTarget {
    pub fn new(tx: Sender<Snapshot>) -> Self {
        RenderTarget { tx: Some(tx) }
    }

    /// A target that discards every snapshot, for headless runs.
    pub fn headless() -> Self {
        RenderTarget { tx: None }
    }

    pub(super) fn notify(&self, snapshot: Snapshot) {
        if let Some(tx) = &self.tx {
            // Error only happens if the renderer has exited, which is fine
            tx.send(snapshot).ok();
        }
    }
}
