mod machine;
mod params;
mod scheduler;
mod snapshot;

use std::time::Instant;

use rand::rngs::StdRng;

pub use machine::{Effect, Event, Phase, State, transition};
pub use params::{GenerationParams, ParamName};
pub use scheduler::Ticker;
pub use snapshot::{CellView, RenderTarget, Snapshot};

use crate::{
    generators::{DualLane, TickReport, get_rng},
    maze::Maze,
};

/// Commands accepted by the [`Controller`].
#[derive(Debug, Clone)]
pub enum Command {
    Play,
    Pause,
    Stop,
    StepForward,
    SetParam { name: ParamName, value: i64 },
    Restart,
    /// Hand the controller the target to publish snapshots to, which starts a
    /// new session.
    InjectRefs(RenderTarget),
}

impl Command {
    fn event(&self) -> Event {
        match self {
            Command::Play => Event::Play,
            Command::Pause => Event::Pause,
            Command::Stop => Event::Stop,
            Command::StepForward => Event::StepForward,
            Command::SetParam { name, value } => Event::SetParam {
                name: *name,
                value: *value,
            },
            Command::Restart => Event::Restart,
            Command::InjectRefs(_) => Event::InjectRefs,
        }
    }
}

/// One generation session: a maze and the lanes carving it.
struct Session {
    id: u64,
    maze: Maze,
    lanes: DualLane,
    rng: StdRng,
    last_report: TickReport,
}

/// Drives the generation lifecycle.
///
/// State changes are decided by [`transition`]; this type only executes the
/// effects it returns. Everything runs on the caller's thread: ticks happen
/// inside [`Controller::send`] (single-stepping) or [`Controller::poll`]
/// (scheduled play), and each tick runs to completion before anything else is
/// processed.
pub struct Controller {
    state: State,
    params: GenerationParams,
    seed: Option<u64>,
    session_id: u64,
    session: Option<Session>,
    target: Option<RenderTarget>,
    ticker: Ticker,
}

impl Controller {
    /// Create an idle controller. With a `seed`, every session is reproducible.
    pub fn new(params: GenerationParams, seed: Option<u64>) -> Self {
        let mut clamped = GenerationParams::default();
        for name in ParamName::ALL {
            clamped.set(name, params.get(name) as i64);
        }
        Controller {
            state: State::Idle,
            ticker: Ticker::new(clamped.tick_interval()),
            params: clamped,
            seed,
            session_id: 0,
            session: None,
            target: None,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    pub fn session_id(&self) -> u64 {
        self.session_id
    }

    /// The maze of the current session, if one is allocated.
    pub fn maze(&self) -> Option<&Maze> {
        self.session.as_ref().map(|s| &s.maze)
    }

    /// The lane coordinator of the current session, if one is allocated.
    pub fn lanes(&self) -> Option<&DualLane> {
        self.session.as_ref().map(|s| &s.lanes)
    }

    pub fn paths_connected(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.lanes.paths_connected())
    }

    /// Ticks run in the current session.
    pub fn ticks(&self) -> u64 {
        self.session.as_ref().map_or(0, |s| s.lanes.ticks())
    }

    /// When the scheduler wants the next tick, if it is running.
    pub fn next_tick_due(&self) -> Option<Instant> {
        self.ticker.next_due()
    }

    pub fn snapshot(&self) -> Snapshot {
        match &self.session {
            Some(session) => Snapshot::capture(
                self.state,
                session.id,
                &self.params,
                &session.maze,
                session.lanes.ticks(),
                session.lanes.paths_connected(),
                &session.last_report,
            ),
            None => Snapshot::idle(self.state, self.session_id, &self.params),
        }
    }

    /// Feed a command into the state machine.
    ///
    /// Returns false, without touching any state, when the command is not valid
    /// in the current state.
    pub fn send(&mut self, command: Command) -> bool {
        let event = command.event();
        if !self.dispatch(event) {
            return false;
        }
        if let Command::InjectRefs(target) = command {
            self.target = Some(target);
            self.notify();
        }
        true
    }

    /// Run a scheduled tick if one is due at `now`. Returns whether a tick ran.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.state != State::Generating(Phase::Playing) || !self.ticker.poll(now) {
            return false;
        }
        self.tick();
        true
    }

    fn dispatch(&mut self, event: Event) -> bool {
        let Some((next, effects)) = transition(self.state, event) else {
            tracing::debug!("Ignoring {:?} in state {}", event, self.state);
            return false;
        };
        tracing::debug!("{} --{:?}--> {}", self.state, event, next);
        self.state = next;

        // InjectRefs notifies once the new target is stored, ticks publish their own frame
        let mut published = event == Event::InjectRefs;
        let mut request_refs = false;
        for effect in effects {
            match effect {
                Effect::AllocateSession => self.allocate_session(),
                Effect::DiscardSession => self.discard_session(),
                Effect::StartScheduler => self.ticker.start(Instant::now()),
                Effect::StopScheduler => self.ticker.stop(),
                Effect::Tick => {
                    self.tick();
                    published = true;
                }
                Effect::UpdateParam { name, value } => {
                    self.params.set(name, value);
                    if name == ParamName::Fps {
                        self.ticker.set_interval(self.params.tick_interval());
                    }
                }
                Effect::RequestRefs => request_refs = true,
            }
        }
        if !published {
            self.notify();
        }

        if request_refs {
            if let Some(target) = self.target.clone() {
                self.send(Command::InjectRefs(target));
            }
        }
        true
    }

    fn allocate_session(&mut self) {
        self.session_id += 1;
        let maze = Maze::new(
            self.params.grid_rows as usize,
            self.params.grid_columns as usize,
        );
        let lanes = DualLane::new(&maze);
        let rng = get_rng(self.seed.map(|s| s ^ self.session_id));
        tracing::info!(
            "Allocated session {} with a {}x{} grid",
            self.session_id,
            maze.rows(),
            maze.cols()
        );
        self.session = Some(Session {
            id: self.session_id,
            maze,
            lanes,
            rng,
            last_report: TickReport::default(),
        });
    }

    fn discard_session(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::info!(
                "Discarded session {} after {} ticks",
                session.id,
                session.lanes.ticks()
            );
        }
        self.session_id += 1;
    }

    /// Advance the coordinator by exactly one tick and publish the result
    /// as a single snapshot.
    fn tick(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let report = session.lanes.tick(&mut session.maze, &mut session.rng);
        let finished = report.finished;
        session.last_report = report;

        if finished {
            // Publishes the final snapshot with the Done state
            self.dispatch(Event::Finished);
        } else {
            self.notify();
        }
    }

    fn notify(&self) {
        if let Some(target) = &self.target {
            target.notify(self.snapshot());
        }
    }
}

impl Default for Controller {
    fn default() -> Self {
        Controller::new(GenerationParams::default(), None)
    }
}
