//! Control states and the context carried between ticks
//!
//! The [`Context`] is the only state that survives from one tick to the next.
//! It is created once at boot and afterwards replaced wholesale by the value
//! returned from [`crate::tick`].

use std::fmt;

/// The closed set of control states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Leaf components are still being set up
    Booting,
    /// Waiting for the network link to come (back) up
    ConnectingWifi,
    /// Link is up, automation is not on air, no show is open
    Idle,
    /// Automation went on air; a remote show is being opened
    StartingShow,
    /// A remote show is open and now-playing tracks are being logged
    AutoDjActive,
    /// Automation went off air; the remote show is being closed
    EndingShow,
    /// Recoverable holding state after a failed show start
    ErrorState,
}

impl State {
    /// Every state, in declaration order
    pub const ALL: [State; 7] = [
        State::Booting,
        State::ConnectingWifi,
        State::Idle,
        State::StartingShow,
        State::AutoDjActive,
        State::EndingShow,
        State::ErrorState,
    ];

    /// Human-readable name used in logs and on the status console
    pub fn name(self) -> &'static str {
        match self {
            State::Booting => "BOOTING",
            State::ConnectingWifi => "CONNECTING_WIFI",
            State::Idle => "IDLE",
            State::StartingShow => "STARTING_SHOW",
            State::AutoDjActive => "AUTO_DJ_ACTIVE",
            State::EndingShow => "ENDING_SHOW",
            State::ErrorState => "ERROR",
        }
    }

    /// Whether the link-loss pre-emption applies in this state
    pub fn requires_link(self) -> bool {
        !matches!(self, State::Booting | State::ConnectingWifi)
    }
}

impl Default for State {
    fn default() -> Self {
        State::Booting
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifier of a remote show (the flowsheet service calls it `radioShowID`)
///
/// Only positive values are valid; the service never hands out zero or
/// negative ids, and the absence of a show is expressed as `Option::None`
/// rather than a sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShowId(i32);

impl ShowId {
    /// Wrap a raw id, rejecting anything that is not strictly positive
    pub fn new(raw: i32) -> Option<Self> {
        (raw > 0).then_some(ShowId(raw))
    }

    /// The raw id as sent over the wire
    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for ShowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State persisted across ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    /// Current control state
    pub state: State,
    /// The remote show believed to be open, if any
    pub show_id: Option<ShowId>,
    /// Consecutive failed attempts of the current retryable operation
    pub retry_count: u32,
    /// Monotonic millis of the last now-playing poll while on air
    pub last_poll_ms: u64,
}

impl Context {
    /// Context at power-on: booting, no show, counters cleared
    pub fn new() -> Self {
        Self {
            state: State::Booting,
            show_id: None,
            retry_count: 0,
            last_poll_ms: 0,
        }
    }

    /// Context in a given state with no show open
    pub fn in_state(state: State) -> Self {
        Self {
            state,
            ..Self::new()
        }
    }

    /// Builder-style helper to attach an open show
    pub fn with_show(mut self, show_id: ShowId) -> Self {
        self.show_id = Some(show_id);
        self
    }

    /// Whether a remote show is believed to be open
    pub fn has_open_show(&self) -> bool {
        self.show_id.is_some()
    }

    /// Move to `state` as a fresh (non-retry) entry
    pub(crate) fn enter(&mut self, state: State) {
        self.state = state;
        self.retry_count = 0;
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
