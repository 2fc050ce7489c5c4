//! Per-tick input snapshot
//!
//! The orchestrator assembles one [`Inputs`] per tick from the leaf
//! components: the debounced relay, the link monitor, the clocks, and the
//! result of whichever remote operation [`crate::plan_io`] asked for.

/// Loop tuning that the transition function needs but does not own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Minimum spacing between now-playing polls while on air
    pub poll_interval_ms: u64,
    /// Attempts allowed for a show start or end before giving up (at least 1)
    pub max_retries: u32,
    /// Linear backoff step between retries
    pub retry_backoff_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 20_000,
            max_retries: 3,
            retry_backoff_ms: 2_000,
        }
    }
}

/// Readings from the leaf components, taken before any remote call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sensors {
    /// The debounced relay level flipped on this tick
    pub relay_changed: bool,
    /// Debounced relay level: the board is routed to automation
    pub auto_dj_active: bool,
    /// Network link is up
    pub connected: bool,
    /// Wall-clock Unix seconds, 0 when unknown
    pub epoch_seconds: u64,
    /// Monotonic milliseconds since start-up
    pub now_ms: u64,
}

impl Sensors {
    /// Automation just went on air
    pub fn relay_rising(&self) -> bool {
        self.relay_changed && self.auto_dj_active
    }

    /// Automation just went off air
    pub fn relay_falling(&self) -> bool {
        self.relay_changed && !self.auto_dj_active
    }
}

/// Track metadata reported by the now-playing poller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Track {
    pub artist: String,
    pub title: String,
    pub album: String,
}

impl Track {
    pub fn new(
        artist: impl Into<String>,
        title: impl Into<String>,
        album: impl Into<String>,
    ) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
            album: album.into(),
        }
    }
}

/// Complete snapshot consumed by [`crate::tick`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inputs {
    pub sensors: Sensors,

    /// Show id returned by the start operation, or a value <= 0 on failure
    pub start_result: i32,
    /// Whether the end operation succeeded
    pub end_result: bool,
    /// The poller saw a track it has not reported before
    pub new_track: bool,
    /// A live DJ is streaming over automation
    pub live_dj: bool,
    /// Only meaningful when `new_track` is set
    pub track: Track,

    pub settings: Settings,
}

impl Inputs {
    /// Snapshot with neutral operation results: start failed, end failed,
    /// nothing new playing
    pub fn from_sensors(sensors: Sensors, settings: Settings) -> Self {
        Self {
            sensors,
            start_result: -1,
            end_result: false,
            new_track: false,
            live_dj: false,
            track: Track::default(),
            settings,
        }
    }
}
