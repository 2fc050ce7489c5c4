//! Mixing board relay monitor
//!
//! The board's AUX relay contact is wired between the input pin and ground
//! with a pull-up. When the relay closes (AUX off, automation on air) the pin
//! reads LOW; when it opens (AUX on, a DJ is live) the pin reads HIGH.

use tracing::{info, trace};

use crate::debounce::{Debouncer, Level};
use crate::pin::{InputPin, OutputPin, PinError};

/// Default stability window for the relay contact
pub const DEFAULT_DEBOUNCE_MS: u64 = 50;

/// Debounced view of the relay contact, optionally mirrored on a status LED
///
/// Call [`RelayMonitor::update`] once per loop iteration, then read
/// [`RelayMonitor::state_changed`] for the edge and
/// [`RelayMonitor::is_auto_dj_active`] for the level.
pub struct RelayMonitor<P: InputPin> {
    relay: P,
    led: Option<Box<dyn OutputPin + Send>>,
    debouncer: Debouncer,
}

impl<P: InputPin> RelayMonitor<P> {
    pub fn new(relay: P, debounce_ms: u64) -> Self {
        Self {
            relay,
            led: None,
            debouncer: Debouncer::new(debounce_ms, Level::High),
        }
    }

    /// Mirror the automation state on an LED (lit while automation is on air)
    pub fn with_led(mut self, led: impl OutputPin + Send + 'static) -> Self {
        self.led = Some(Box::new(led));
        self
    }

    /// Seed the debounced level from the current pin reading
    pub fn set_up(&mut self, now_ms: u64) -> Result<(), PinError> {
        let level = self.relay.read()?;
        self.debouncer.reset(level, now_ms);
        info!(
            debounce_ms = self.debouncer.window_ms(),
            "Relay initial state: {}",
            if self.is_auto_dj_active() { "auto DJ active" } else { "DJ live" }
        );
        self.drive_led()
    }

    /// Sample the relay once
    ///
    /// On a read error the changed flag is cleared and the stable level kept.
    pub fn update(&mut self, now_ms: u64) -> Result<(), PinError> {
        let raw = match self.relay.read() {
            Ok(level) => level,
            Err(e) => {
                self.debouncer.skip();
                return Err(e);
            }
        };

        if self.debouncer.update(raw, now_ms) {
            info!(
                level = %self.debouncer.level(),
                "Relay changed: {}",
                if self.is_auto_dj_active() { "auto DJ active" } else { "DJ live" }
            );
            self.drive_led()?;
        } else {
            trace!(raw = %raw, "Relay sample");
        }
        Ok(())
    }

    /// Relay closed: the board is routed to automation
    pub fn is_auto_dj_active(&self) -> bool {
        self.debouncer.level() == Level::Low
    }

    /// The debounced level flipped on the last update
    pub fn state_changed(&self) -> bool {
        self.debouncer.changed()
    }

    fn drive_led(&mut self) -> Result<(), PinError> {
        let level = if self.is_auto_dj_active() {
            Level::High
        } else {
            Level::Low
        };
        match self.led.as_mut() {
            Some(led) => led.write(level),
            None => Ok(()),
        }
    }
}
