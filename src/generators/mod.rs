use rand::{SeedableRng, rngs::StdRng};

mod backtracker;
mod dual_lane;

pub use backtracker::{LaneStep, SearchLane};
pub use dual_lane::{DualLane, TickReport};

use crate::maze::Maze;

/// Get a random number generator, optionally seeded for reproducibility.
pub fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Carve the whole maze in one go with the two-lane backtracker.
/// Returns whether the two lanes were joined into a single tree.
pub fn generate_maze(maze: &mut Maze, seed: Option<u64>) -> bool {
    let mut rng = get_rng(seed);
    let mut coordinator = DualLane::new(maze);
    while !coordinator.tick(maze, &mut rng).finished {}
    coordinator.paths_connected()
}
