//! Relay contact monitoring for the Auto DJ switch
//!
//! Turns the noisy AUX relay contact of the mixing board into a stable
//! "automation on air" level plus a one-update change flag, and optionally
//! mirrors that level on a status LED.
//!
//! # Quick Start
//!
//! ```no_run
//! use relay_monitor::{RelayMonitor, SysfsPin, DEFAULT_DEBOUNCE_MS};
//!
//! let relay = SysfsPin::new("/sys/class/gpio/gpio17/value");
//! let led = SysfsPin::new("/sys/class/gpio/gpio27/value");
//! let mut monitor = RelayMonitor::new(relay, DEFAULT_DEBOUNCE_MS).with_led(led);
//!
//! monitor.set_up(0)?;
//! monitor.update(10)?;
//! if monitor.state_changed() && monitor.is_auto_dj_active() {
//!     println!("automation is on air");
//! }
//! # Ok::<(), relay_monitor::PinError>(())
//! ```

pub mod debounce;
pub mod monitor;
pub mod pin;

pub use debounce::{Debouncer, Level};
pub use monitor::{RelayMonitor, DEFAULT_DEBOUNCE_MS};
pub use pin::{InputPin, OutputPin, PinError, SysfsPin};

#[cfg(any(test, feature = "test-support"))]
pub use pin::MemoryPin;
