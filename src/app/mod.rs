mod renderer;

use std::{
    io::{Stdout, Write},
    sync::mpsc,
    time::{Duration, Instant},
};

use crossterm::{
    cursor,
    event::{self, KeyCode, KeyEvent, KeyEventKind},
    queue,
    terminal::{self, ClearType},
};

pub use renderer::{Floor, Layout, Renderer, Tile, WallWeight};

use crate::controller::{
    Command, Controller, GenerationParams, ParamName, Phase, RenderTarget, Snapshot, State,
};

/// Longest time to block on input when no tick is scheduled,
/// a.k.a. how often the loop wakes up on its own
const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Step applied by the speed keys, matching the fps slider step.
const FPS_STEP: i64 = 5;
/// Step applied by the cell size keys.
const CELL_SIZE_STEP: i64 = 5;

/// Startup settings taken from the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaunchOptions {
    /// Parameter values to apply before the first session, clamped by the controller
    pub overrides: Vec<(ParamName, i64)>,
    pub seed: Option<u64>,
}

impl LaunchOptions {
    /// Parse `[columns] [rows] [fps] [seed]`. Missing or unparsable values keep
    /// their defaults.
    pub fn from_args<I: IntoIterator<Item = String>>(args: I) -> Self {
        let mut args = args.into_iter();
        let mut options = LaunchOptions::default();
        for name in [ParamName::GridColumns, ParamName::GridRows, ParamName::Fps] {
            match args.next().map(|s| s.parse::<i64>()) {
                Some(Ok(value)) => options.overrides.push((name, value)),
                Some(Err(e)) => tracing::warn!("Ignoring invalid value for {}: {}", name, e),
                None => return options,
            }
        }
        options.seed = args.next().and_then(|s| s.parse::<u64>().ok());
        options
    }
}

/// What a key press asks the app to do.
#[derive(Debug, Clone)]
pub enum KeyAction {
    Quit,
    Send(Command),
}

/// Map a key press to an action. Commands are only produced here; whether they
/// are accepted is up to the controller.
pub fn key_action(
    key: KeyCode,
    state: State,
    params: &GenerationParams,
    target: &RenderTarget,
) -> Option<KeyAction> {
    let set = |name: ParamName, delta: i64| {
        Some(KeyAction::Send(Command::SetParam {
            name,
            value: params.get(name) as i64 + delta,
        }))
    };
    match key {
        KeyCode::Char('q') => Some(KeyAction::Quit),
        KeyCode::Enter | KeyCode::Char(' ') => {
            let command = if state == State::Generating(Phase::Playing) {
                Command::Pause
            } else {
                Command::Play
            };
            Some(KeyAction::Send(command))
        }
        KeyCode::Right => Some(KeyAction::Send(Command::StepForward)),
        KeyCode::Esc | KeyCode::Char('s') => Some(KeyAction::Send(Command::Stop)),
        KeyCode::Char('n') => Some(KeyAction::Send(Command::InjectRefs(target.clone()))),
        KeyCode::Char('r') => Some(KeyAction::Send(Command::Restart)),
        KeyCode::Char('+') | KeyCode::Char('=') => set(ParamName::Fps, FPS_STEP),
        KeyCode::Char('-') => set(ParamName::Fps, -FPS_STEP),
        KeyCode::Char(']') => set(ParamName::GridColumns, 1),
        KeyCode::Char('[') => set(ParamName::GridColumns, -1),
        KeyCode::Char('}') => set(ParamName::GridRows, 1),
        KeyCode::Char('{') => set(ParamName::GridRows, -1),
        KeyCode::Char('>') => set(ParamName::CellSize, CELL_SIZE_STEP),
        KeyCode::Char('<') => set(ParamName::CellSize, -CELL_SIZE_STEP),
        KeyCode::Char('.') => set(ParamName::BorderWeight, 1),
        KeyCode::Char(',') => set(ParamName::BorderWeight, -1),
        _ => None,
    }
}

/// One line describing the controller state under the maze.
pub fn status_line(snapshot: &Snapshot, params: &GenerationParams) -> String {
    let hint = match snapshot.state {
        State::Idle => "n: new maze  +/-: fps  [/]: columns  {/}: rows  </>: cell  ,/.: border  q: quit",
        State::Generating(Phase::Initializing) => "Enter: play  Esc: stop  q: quit",
        State::Generating(Phase::Playing) => "Enter: pause  Esc: stop  q: quit",
        State::Generating(Phase::Paused) => "Enter: play  →: step  Esc: stop  q: quit",
        State::Done => "r: restart  q: quit",
    };
    let seam = if snapshot.paths_connected {
        "joined"
    } else if snapshot.state.is_generating() {
        "apart"
    } else if snapshot.state == State::Done {
        "no seam"
    } else {
        "-"
    };
    format!(
        "[{}] session {} tick {} {} | {}x{} @ {} fps | {}",
        snapshot.state_name(),
        snapshot.session_id,
        snapshot.tick,
        seam,
        params.grid_columns,
        params.grid_rows,
        params.fps,
        hint
    )
}

/// Set a panic hook to restore terminal state on panic
/// This ensures that the terminal is not left in raw mode or alternate screen on panic
fn set_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
        hook(panic_info);
    }));
}

/// Setup terminal in raw mode and enter alternate screen
/// Also sets a panic hook to restore terminal on panic
pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
    terminal::enable_raw_mode()?;
    set_panic_hook();
    queue!(
        stdout,
        terminal::EnterAlternateScreen,
        terminal::Clear(ClearType::All),
        cursor::Hide,
        cursor::MoveTo(0, 0)
    )?;
    stdout.flush()?;
    Ok(())
}

/// Restore terminal to original state
/// Leave alternate screen and disable raw mode
pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
    queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
    stdout.flush()?;
    terminal::disable_raw_mode()?;
    Ok(())
}

/// Entry point of the visualizer.
///
/// Runs on a single thread: each iteration blocks on input until the next tick
/// is due, handles at most one key, then lets the controller run a due tick.
/// Snapshots published by the controller are drawn as they arrive.
pub fn run(stdout: &mut Stdout, options: LaunchOptions) -> std::io::Result<()> {
    let mut controller = Controller::new(GenerationParams::default(), options.seed);
    for (name, value) in options.overrides {
        controller.send(Command::SetParam { name, value });
    }

    let (snapshot_tx, snapshot_rx) = mpsc::channel::<Snapshot>();
    let target = RenderTarget::new(snapshot_tx);
    let mut renderer = Renderer::new();
    controller.send(Command::InjectRefs(target.clone()));

    tracing::info!("Started main app loop");
    loop {
        // Only the latest snapshot matters for drawing
        if let Some(snapshot) = snapshot_rx.try_iter().last() {
            renderer.draw(stdout, &snapshot, &status_line(&snapshot, controller.params()))?;
        }

        let timeout = controller
            .next_tick_due()
            .map_or(INPUT_POLL_TIMEOUT, |due| {
                due.saturating_duration_since(Instant::now())
            })
            .min(INPUT_POLL_TIMEOUT);

        if event::poll(timeout)? {
            match event::read()? {
                event::Event::Key(KeyEvent { code, kind, .. }) if kind == KeyEventKind::Press => {
                    match key_action(code, controller.state(), controller.params(), &target) {
                        Some(KeyAction::Quit) => break,
                        Some(KeyAction::Send(command)) => {
                            tracing::debug!("[app loop] key {:?} -> {:?}", code, command);
                            controller.send(command);
                        }
                        None => {}
                    }
                }
                event::Event::Resize(_, _) => {
                    renderer.invalidate();
                    let snapshot = controller.snapshot();
                    renderer.draw(stdout, &snapshot, &status_line(&snapshot, controller.params()))?;
                }
                _ => {} // Ignore other events
            }
        }

        controller.poll(Instant::now());
    }
    tracing::info!("Exiting main app loop");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_launch_options() {
        assert_eq!(LaunchOptions::from_args(args(&[])), LaunchOptions::default());

        let options = LaunchOptions::from_args(args(&["20", "1", "500", "42"]));
        assert_eq!(
            options.overrides,
            vec![
                (ParamName::GridColumns, 20),
                (ParamName::GridRows, 1),
                (ParamName::Fps, 500)
            ]
        );
        assert_eq!(options.seed, Some(42));

        let options = LaunchOptions::from_args(args(&["abc", "7"]));
        assert_eq!(options.overrides, vec![(ParamName::GridRows, 7)]);
        assert_eq!(options.seed, None);
    }

    #[test]
    fn test_launch_overrides_are_clamped_by_controller() {
        let options = LaunchOptions::from_args(args(&["20", "1", "500"]));
        let mut controller = Controller::default();
        for (name, value) in options.overrides {
            assert!(controller.send(Command::SetParam { name, value }));
        }
        assert_eq!(controller.params().grid_columns, 20);
        assert_eq!(controller.params().grid_rows, 2);
        assert_eq!(controller.params().fps, 60);
    }

    #[test]
    fn test_enter_toggles_play_and_pause() {
        let params = GenerationParams::default();
        let target = RenderTarget::headless();
        let playing = State::Generating(Phase::Playing);
        assert!(matches!(
            key_action(KeyCode::Enter, playing, &params, &target),
            Some(KeyAction::Send(Command::Pause))
        ));
        assert!(matches!(
            key_action(KeyCode::Enter, State::Generating(Phase::Paused), &params, &target),
            Some(KeyAction::Send(Command::Play))
        ));
        assert!(matches!(
            key_action(KeyCode::Char('q'), playing, &params, &target),
            Some(KeyAction::Quit)
        ));
        assert!(key_action(KeyCode::Char('x'), playing, &params, &target).is_none());
    }

    #[test]
    fn test_param_keys_offset_current_value() {
        let params = GenerationParams::default();
        let target = RenderTarget::headless();
        match key_action(KeyCode::Char('+'), State::Idle, &params, &target) {
            Some(KeyAction::Send(Command::SetParam { name, value })) => {
                assert_eq!(name, ParamName::Fps);
                assert_eq!(value, params.fps as i64 + FPS_STEP);
            }
            other => panic!("Unexpected action {:?}", other),
        }
        match key_action(KeyCode::Char('['), State::Idle, &params, &target) {
            Some(KeyAction::Send(Command::SetParam { name, value })) => {
                assert_eq!(name, ParamName::GridColumns);
                assert_eq!(value, params.grid_columns as i64 - 1);
            }
            other => panic!("Unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_keys_drive_controller() {
        let params = GenerationParams::default();
        let target = RenderTarget::headless();
        let mut controller = Controller::new(params, Some(1));
        for key in [KeyCode::Char('n'), KeyCode::Enter, KeyCode::Enter, KeyCode::Right] {
            if let Some(KeyAction::Send(command)) =
                key_action(key, controller.state(), controller.params(), &target)
            {
                assert!(controller.send(command));
            }
        }
        assert_eq!(controller.state(), State::Generating(Phase::Paused));
        assert_eq!(controller.ticks(), 1);

        // Stop, then the grid keys are accepted again
        let stop = key_action(KeyCode::Esc, controller.state(), controller.params(), &target);
        if let Some(KeyAction::Send(command)) = stop {
            assert!(controller.send(command));
        }
        assert_eq!(controller.state(), State::Idle);
    }

    #[test]
    fn test_status_line() {
        let controller = Controller::default();
        let line = status_line(&controller.snapshot(), controller.params());
        assert!(line.starts_with("[Idle] session 0 tick 0 - | 15x15 @ 30 fps"));

        let mut controller = Controller::new(GenerationParams::default(), Some(1));
        controller.send(Command::InjectRefs(RenderTarget::headless()));
        let line = status_line(&controller.snapshot(), controller.params());
        assert!(line.starts_with("[Generating.Initializing] session 1 tick 0 apart"));
    }
}
