//! Time-window debouncing of a digital input

use std::fmt;

/// Logic level of a digital pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    High,
    Low,
}

impl Level {
    /// Parse a sysfs-style value (`"1"` or `"0"`, surrounding whitespace ignored)
    pub fn from_sysfs(value: &str) -> Option<Self> {
        match value.trim() {
            "1" => Some(Level::High),
            "0" => Some(Level::Low),
            _ => None,
        }
    }

    /// The sysfs-style representation
    pub fn as_sysfs(self) -> &'static str {
        match self {
            Level::High => "1",
            Level::Low => "0",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::High => f.write_str("HIGH"),
            Level::Low => f.write_str("LOW"),
        }
    }
}

/// Accepts a new level only after the raw reading has held steady for
/// longer than the window
///
/// Feed it one raw sample per loop iteration. A flicker shorter than the
/// window never flips the stable level and never raises `changed`.
///
/// ```rust
/// use relay_monitor::{Debouncer, Level};
///
/// let mut debouncer = Debouncer::new(50, Level::High);
/// assert!(!debouncer.update(Level::Low, 1_000)); // timer starts
/// assert!(!debouncer.update(Level::Low, 1_050)); // not yet past the window
/// assert!(debouncer.update(Level::Low, 1_051));  // accepted
/// assert_eq!(debouncer.level(), Level::Low);
/// assert!(!debouncer.update(Level::Low, 1_052)); // flag lasts one update
/// ```
#[derive(Debug, Clone)]
pub struct Debouncer {
    window_ms: u64,
    stable: Level,
    last_raw: Level,
    last_change_ms: u64,
    changed: bool,
}

impl Debouncer {
    pub fn new(window_ms: u64, initial: Level) -> Self {
        Self {
            window_ms,
            stable: initial,
            last_raw: initial,
            last_change_ms: 0,
            changed: false,
        }
    }

    /// Re-seed the stable level, e.g. from a first reading at start-up
    pub fn reset(&mut self, level: Level, now_ms: u64) {
        self.stable = level;
        self.last_raw = level;
        self.last_change_ms = now_ms;
        self.changed = false;
    }

    /// Feed one raw sample; returns whether the stable level flipped
    pub fn update(&mut self, raw: Level, now_ms: u64) -> bool {
        self.changed = false;

        if raw != self.last_raw {
            self.last_change_ms = now_ms;
        }

        if now_ms.wrapping_sub(self.last_change_ms) > self.window_ms && raw != self.stable {
            self.stable = raw;
            self.changed = true;
        }

        self.last_raw = raw;
        self.changed
    }

    /// Skip a sample (e.g. on a read error): clears the changed flag only
    pub fn skip(&mut self) {
        self.changed = false;
    }

    /// The debounced level
    pub fn level(&self) -> Level {
        self.stable
    }

    /// Whether the last update flipped the stable level
    pub fn changed(&self) -> bool {
        self.changed
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }
}
