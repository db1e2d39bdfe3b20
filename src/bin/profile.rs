use std::time::Instant;

use twinmaze::controller::{
    Command, Controller, GenerationParams, ParamName, RenderTarget, State,
};

/// Headless run: `profile [iterations] [columns] [rows] [seed]`.
/// Every generation is driven by single steps, without a terminal or timer.
fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let mut args = std::env::args();
    args.next(); // Skip executable name
    let iterations = args.next().and_then(|s| s.parse::<usize>().ok()).unwrap_or(100);
    let columns = args.next().and_then(|s| s.parse::<i64>().ok()).unwrap_or(25);
    let rows = args.next().and_then(|s| s.parse::<i64>().ok()).unwrap_or(25);
    let seed = args.next().and_then(|s| s.parse::<u64>().ok());

    let mut controller = Controller::new(GenerationParams::default(), seed);
    controller.send(Command::SetParam {
        name: ParamName::GridColumns,
        value: columns,
    });
    controller.send(Command::SetParam {
        name: ParamName::GridRows,
        value: rows,
    });

    let started = Instant::now();
    let mut joined = 0;
    let mut total_ticks = 0;
    controller.send(Command::InjectRefs(RenderTarget::headless()));
    for i in 0..iterations {
        if i > 0 {
            // Done -> fresh session on the same target
            controller.send(Command::Restart);
        }
        controller.send(Command::Play);
        controller.send(Command::Pause);
        while controller.state() != State::Done {
            controller.send(Command::StepForward);
        }
        total_ticks += controller.ticks();
        if controller.paths_connected() {
            joined += 1;
        }
        tracing::debug!(
            "Session {} done in {} ticks with {} connections",
            controller.session_id(),
            controller.ticks(),
            controller.maze().map_or(0, |m| m.edge_count())
        );
    }

    tracing::info!(
        "{} generations of {}x{} in {:?}: {} joined, {:.1} ticks on average",
        iterations,
        controller.params().grid_columns,
        controller.params().grid_rows,
        started.elapsed(),
        joined,
        total_ticks as f64 / iterations.max(1) as f64
    );
    Ok(())
}
