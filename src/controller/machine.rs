use std::fmt;

use crate::controller::params::ParamName;

/// Sub-states of an active generation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Session allocated, waiting for the first `play`.
    Initializing,
    Playing,
    Paused,
}

/// Lifecycle state of the generation controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    #[default]
    Idle,
    Generating(Phase),
    Done,
}

impl State {
    pub fn name(&self) -> &'static str {
        match self {
            State::Idle => "Idle",
            State::Generating(Phase::Initializing) => "Generating.Initializing",
            State::Generating(Phase::Playing) => "Generating.Playing",
            State::Generating(Phase::Paused) => "Generating.Paused",
            State::Done => "Done",
        }
    }

    pub fn is_generating(&self) -> bool {
        matches!(self, State::Generating(_))
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Inputs of the state machine. Everything but [`Event::Finished`] originates
/// from a user command; `Finished` is raised by the driver after the tick that
/// completes generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Play,
    Pause,
    Stop,
    StepForward,
    SetParam { name: ParamName, value: i64 },
    Restart,
    InjectRefs,
    Finished,
}

/// Side effects requested by a transition, executed in order by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Create a fresh maze and fresh lanes under a new session id.
    AllocateSession,
    /// Drop the current maze and lanes and move to the next session id.
    DiscardSession,
    StartScheduler,
    StopScheduler,
    /// Run exactly one coordinator tick.
    Tick,
    UpdateParam { name: ParamName, value: i64 },
    /// Hand the known render target back in as if it had just been injected.
    RequestRefs,
}

/// Compute the next state and its effects, or `None` when the event is not
/// accepted in the current state. Rejected events must leave everything as is.
pub fn transition(state: State, event: Event) -> Option<(State, Vec<Effect>)> {
    use Phase::*;

    let next = match (state, event) {
        (State::Idle, Event::InjectRefs) => {
            (State::Generating(Initializing), vec![Effect::AllocateSession])
        }
        (State::Idle, Event::SetParam { name, value }) => {
            (State::Idle, vec![Effect::UpdateParam { name, value }])
        }
        (State::Generating(Initializing | Paused), Event::Play) => {
            (State::Generating(Playing), vec![Effect::StartScheduler])
        }
        (State::Generating(Playing), Event::Pause) => {
            (State::Generating(Paused), vec![Effect::StopScheduler])
        }
        (State::Generating(Paused), Event::StepForward) => {
            (State::Generating(Paused), vec![Effect::Tick])
        }
        (State::Generating(_), Event::Stop) => (
            State::Idle,
            vec![Effect::StopScheduler, Effect::DiscardSession],
        ),
        (State::Generating(Playing | Paused), Event::Finished) => {
            (State::Done, vec![Effect::StopScheduler])
        }
        (State::Done, Event::Restart) => (
            State::Idle,
            vec![Effect::DiscardSession, Effect::RequestRefs],
        ),
        _ => return None,
    };
    Some(next)
}
