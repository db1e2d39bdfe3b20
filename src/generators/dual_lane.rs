use rand::Rng;

use crate::{
    generators::backtracker::{LaneStep, SearchLane},
    maze::{Maze, PathId},
};

/// What happened during a single [`DualLane::tick`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Cells carved in this tick, the active frontier of each lane.
    pub cursors: Vec<usize>,
    /// Cells the lanes retreated through in this tick.
    pub backtracked: Vec<usize>,
    /// The cross-lane edge carved in this tick, if any.
    pub seam: Option<(usize, usize)>,
    /// Both lanes are complete and the join step has run.
    pub finished: bool,
}

/// Runs two backtracker lanes from opposite corners of the maze and joins the
/// two trees with a single seam once lane `A` runs out of cells.
#[derive(Debug, Clone)]
pub struct DualLane {
    lane_a: SearchLane,
    lane_z: SearchLane,
    paths_connected: bool,
    seam: Option<(usize, usize)>,
    finished: bool,
    ticks: u64,
}

impl DualLane {
    pub fn new(maze: &Maze) -> Self {
        DualLane {
            lane_a: SearchLane::new(PathId::A, maze.start_index()),
            lane_z: SearchLane::new(PathId::Z, maze.end_index()),
            paths_connected: false,
            seam: None,
            finished: false,
            ticks: 0,
        }
    }

    pub fn lane_a(&self) -> &SearchLane {
        &self.lane_a
    }

    pub fn lane_z(&self) -> &SearchLane {
        &self.lane_z
    }

    /// Whether the seam between the two lanes has been carved.
    pub fn paths_connected(&self) -> bool {
        self.paths_connected
    }

    pub fn seam(&self) -> Option<(usize, usize)> {
        self.seam
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Number of ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advance each lane by one step, then try to join them.
    ///
    /// Ticking a finished coordinator does nothing and reports `finished` again.
    pub fn tick<R: Rng>(&mut self, maze: &mut Maze, rng: &mut R) -> TickReport {
        let mut report = TickReport::default();
        if self.finished {
            report.finished = true;
            return report;
        }
        self.ticks += 1;

        for lane in [&mut self.lane_a, &mut self.lane_z] {
            let step = lane.advance(maze, rng);
            report.backtracked.extend_from_slice(step.backtracked());
            if let LaneStep::Carved { cell, .. } = step {
                report.cursors.push(cell);
            }
        }

        if !self.paths_connected && self.lane_a.is_complete() {
            report.seam = self.join(maze);
        }

        if self.lane_a.is_complete() && self.lane_z.is_complete() {
            self.finished = true;
            report.finished = true;
            if self.paths_connected {
                tracing::info!(
                    "Generation finished after {} ticks with {} connections",
                    self.ticks,
                    maze.edge_count()
                );
            } else {
                tracing::warn!(
                    "Generation finished after {} ticks without a seam, the maze has two components",
                    self.ticks
                );
            }
        }
        report
    }

    /// Scan the middle row left to right for the first cell with a neighbor
    /// claimed by the other lane, and carve the passage between them.
    fn join(&mut self, maze: &mut Maze) -> Option<(usize, usize)> {
        let row_start = maze.middle_row() * maze.cols();
        let seam = (row_start..row_start + maze.cols()).find_map(|index| {
            maze.neighbors(index)
                .find(|&n| maze.has_different_path_id(index, n))
                .map(|n| (index, n))
        })?;

        maze.connect(seam.0, seam.1);
        self.paths_connected = true;
        self.seam = Some(seam);
        tracing::info!("Lanes joined between cells {} and {}", seam.0, seam.1);
        Some(seam)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{
        get_rng,
        testing::{assert_perfect_maze, assert_walls_symmetric},
    };

    fn run_to_end(maze: &mut Maze, seed: u64) -> DualLane {
        let mut rng = get_rng(Some(seed));
        let mut coordinator = DualLane::new(maze);
        while !coordinator.tick(maze, &mut rng).finished {}
        coordinator
    }

    #[test]
    fn test_two_by_two() {
        for seed in 0..20 {
            let mut maze = Maze::new(2, 2);
            let coordinator = run_to_end(&mut maze, seed);
            assert!(coordinator.paths_connected());
            assert_eq!(maze.edge_count(), 3);
            // Entrance on the west of the start, exit on the east of the end
            assert!(!maze[0].has_wall(crate::maze::Side::West));
            assert!(!maze[3].has_wall(crate::maze::Side::East));
            assert_eq!(maze[0].path_id(), Some(PathId::A));
            assert_eq!(maze[3].path_id(), Some(PathId::Z));
            assert_perfect_maze(&maze);
        }
    }

    #[test]
    fn test_first_tick_claims_both_corners() {
        let mut maze = Maze::new(4, 5);
        let mut rng = get_rng(Some(7));
        let mut coordinator = DualLane::new(&maze);
        let report = coordinator.tick(&mut maze, &mut rng);
        assert_eq!(report.cursors, vec![0, 19]);
        assert!(!report.finished);
        assert_eq!(coordinator.lane_a().current(), Some(0));
        assert_eq!(coordinator.lane_z().current(), Some(19));
        assert_eq!(coordinator.ticks(), 1);
    }

    #[test]
    fn test_generation_produces_spanning_tree() {
        for (rows, cols, seed) in [(2, 5, 1), (5, 2, 2), (7, 9, 3), (15, 15, 4), (25, 25, 5)] {
            let mut maze = Maze::new(rows, cols);
            let coordinator = run_to_end(&mut maze, seed);
            assert_eq!(maze.visited_count(), rows * cols);
            if coordinator.paths_connected() {
                assert_perfect_maze(&maze);
            } else {
                // Two separate trees
                assert_eq!(maze.edge_count(), rows * cols - 2);
            }
        }
    }

    #[test]
    fn test_seam_lies_in_middle_row() {
        let mut maze = Maze::new(9, 9);
        let coordinator = run_to_end(&mut maze, 11);
        if let Some((scanned, other)) = coordinator.seam() {
            assert_eq!(maze[scanned].row(), maze.middle_row());
            assert!(maze.has_different_path_id(scanned, other));
            assert!(maze[scanned].connections().contains(&other));
        }
    }

    #[test]
    fn test_join_looks_across_middle_row_edges() {
        // Middle row is all lane A, but lane Z touches it from below
        let mut maze = Maze::new(3, 2);
        maze.mark_visited(0, None, PathId::A);
        maze.mark_visited(1, Some(0), PathId::A);
        maze.mark_visited(3, Some(1), PathId::A);
        maze.mark_visited(2, Some(0), PathId::A);
        maze.mark_visited(5, None, PathId::Z);
        maze.mark_visited(4, Some(5), PathId::Z);

        let mut coordinator = DualLane::new(&maze);
        // Row 1 holds cells 2 (A) and 3 (A); 4 (Z) sits below 2
        assert_eq!(coordinator.join(&mut maze), Some((2, 4)));
        assert!(maze[2].connections().contains(&4));

        // A single lane everywhere leaves nothing to join
        let mut maze = Maze::new(3, 2);
        for index in 0..6 {
            maze.mark_visited(index, None, PathId::A);
        }
        let mut coordinator = DualLane::new(&maze);
        assert_eq!(coordinator.join(&mut maze), None);
        assert!(!coordinator.paths_connected());
    }

    #[test]
    fn test_finishes_without_seam() {
        // Lane Z never reaches the middle row of this grid with this seed
        let mut maze = Maze::new(6, 3);
        let mut rng = get_rng(Some(5));
        let mut coordinator = DualLane::new(&maze);
        let report = loop {
            let report = coordinator.tick(&mut maze, &mut rng);
            if report.finished {
                break report;
            }
            assert_eq!(report.seam, None);
        };
        assert_eq!(report.seam, None);
        assert!(coordinator.is_finished());
        assert!(!coordinator.paths_connected());
        assert_eq!(coordinator.seam(), None);
        assert_eq!(maze.visited_count(), 18);
        // Two separate trees
        assert_eq!(maze.edge_count(), 16);
        assert_walls_symmetric(&maze);
    }

    #[test]
    fn test_ticks_after_finish_are_noops() {
        let mut maze = Maze::new(3, 3);
        let mut rng = get_rng(Some(5));
        let mut coordinator = run_to_end(&mut maze, 5);
        let edges = maze.edge_count();
        let ticks = coordinator.ticks();
        let report = coordinator.tick(&mut maze, &mut rng);
        assert!(report.finished);
        assert!(report.cursors.is_empty());
        assert_eq!(coordinator.ticks(), ticks);
        assert_eq!(maze.edge_count(), edges);
    }
}
