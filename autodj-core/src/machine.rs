//! The transition function
//!
//! [`tick`] is evaluated once per loop iteration. It never performs I/O: it
//! reads the previous [`Context`] and the current [`Inputs`] and returns the
//! next context together with the work the orchestrator should do.

use crate::inputs::{Inputs, Settings, Track};
use crate::state::{Context, ShowId, State};
use crate::time::current_hour_ms;

/// Command to append one entry to the open show's flowsheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryAction {
    /// Hour bucket the entry belongs to, in Unix milliseconds
    pub hour_ms: u64,
    pub track: Track,
}

/// Output of a single tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickResult {
    /// Context to persist for the next tick
    pub context: Context,
    /// Entry to append, if any
    pub entry: Option<EntryAction>,
    /// Extra delay before the next tick; 0 means none
    pub delay_ms: u64,
}

impl TickResult {
    fn unchanged(context: Context) -> Self {
        Self {
            context,
            entry: None,
            delay_ms: 0,
        }
    }

    /// Whether the orchestrator should append an entry
    pub fn should_append_entry(&self) -> bool {
        self.entry.is_some()
    }
}

/// Whether enough time has passed since the last on-air poll
///
/// The subtraction wraps so a rolled-over millisecond counter still yields a
/// sensible elapsed time.
pub fn poll_due(ctx: &Context, now_ms: u64, poll_interval_ms: u64) -> bool {
    now_ms.wrapping_sub(ctx.last_poll_ms) >= poll_interval_ms
}

/// Count one more failed attempt
///
/// Returns the backoff to apply when another attempt is allowed, or `None`
/// once the attempt budget is spent (the counter is then left for the caller
/// to reset by entering a new state).
fn record_failure(next: &mut Context, settings: &Settings) -> Option<u64> {
    let attempts = next.retry_count.saturating_add(1);
    if attempts >= settings.max_retries {
        return None;
    }
    next.retry_count = attempts;
    Some(settings.retry_backoff_ms.saturating_mul(u64::from(attempts)))
}

/// Evaluate one tick of the control state machine
///
/// ```rust
/// use autodj_core::{tick, Context, Inputs, Sensors, Settings, State};
///
/// let ctx = Context::in_state(State::Idle);
/// let sensors = Sensors {
///     relay_changed: true,
///     auto_dj_active: true,
///     connected: true,
///     epoch_seconds: 1_705_347_000,
///     now_ms: 100_000,
/// };
///
/// let result = tick(&ctx, &Inputs::from_sensors(sensors, Settings::default()));
/// assert_eq!(result.context.state, State::StartingShow);
/// ```
pub fn tick(ctx: &Context, inputs: &Inputs) -> TickResult {
    let sensors = &inputs.sensors;
    let settings = &inputs.settings;
    let mut next = *ctx;

    // Link loss pre-empts everything. The show id is kept so the session can
    // resume once the link is back; the retry counter is left as it was.
    if ctx.state.requires_link() && !sensors.connected {
        next.state = State::ConnectingWifi;
        return TickResult::unchanged(next);
    }

    let mut entry = None;
    let mut delay_ms = 0;

    match ctx.state {
        State::Booting => {}

        State::ConnectingWifi => {
            if sensors.connected {
                if ctx.has_open_show() {
                    next.enter(State::AutoDjActive);
                } else {
                    next.enter(State::Idle);
                }
            }
        }

        State::Idle => {
            if sensors.relay_rising() {
                next.enter(State::StartingShow);
            }
        }

        State::StartingShow => {
            if sensors.epoch_seconds == 0 {
                // Entries could not be hour-bucketed; no point retrying.
                next.enter(State::ErrorState);
            } else if let Some(show_id) = ShowId::new(inputs.start_result) {
                next.show_id = Some(show_id);
                next.last_poll_ms = 0;
                next.enter(State::AutoDjActive);
            } else {
                match record_failure(&mut next, settings) {
                    Some(backoff) => delay_ms = backoff,
                    None => next.enter(State::ErrorState),
                }
            }
        }

        State::AutoDjActive => {
            if sensors.relay_falling() {
                next.enter(State::EndingShow);
            } else if poll_due(ctx, sensors.now_ms, settings.poll_interval_ms) {
                next.last_poll_ms = sensors.now_ms;
                if inputs.new_track && !inputs.live_dj {
                    let hour_ms = current_hour_ms(sensors.epoch_seconds);
                    if hour_ms > 0 {
                        entry = Some(EntryAction {
                            hour_ms,
                            track: inputs.track.clone(),
                        });
                    }
                }
            }
        }

        State::EndingShow => {
            if inputs.end_result {
                next.show_id = None;
                next.enter(State::Idle);
            } else {
                match record_failure(&mut next, settings) {
                    Some(backoff) => delay_ms = backoff,
                    None => {
                        // Give up on the remote show rather than retry forever.
                        next.show_id = None;
                        next.enter(State::Idle);
                    }
                }
            }
        }

        State::ErrorState => {
            // Link loss is normally caught by the pre-emption above.
            if !sensors.connected {
                next.enter(State::ConnectingWifi);
            } else if sensors.auto_dj_active && !ctx.has_open_show() {
                next.enter(State::StartingShow);
            } else if !sensors.auto_dj_active {
                next.enter(State::Idle);
            }
            delay_ms = settings.retry_backoff_ms;
        }
    }

    TickResult {
        context: next,
        entry,
        delay_ms,
    }
}
