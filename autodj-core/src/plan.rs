//! Deciding which remote operation feeds the next snapshot
//!
//! Remote calls block, so the orchestrator runs them before assembling
//! [`crate::Inputs`]. [`plan_io`] tells it which one (if any) the coming tick
//! will read, using the same conditions [`crate::tick`] applies.

use crate::inputs::{Sensors, Settings};
use crate::machine::poll_due;
use crate::state::{Context, ShowId, State};
use crate::time::current_hour_ms;

/// Remote operation whose outcome the next tick consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingIo {
    /// Open a show starting in the given hour bucket
    StartShow { hour_ms: u64 },
    /// Close the given show
    EndShow { show_id: ShowId },
    /// Fetch now-playing metadata
    PollNowPlaying,
}

/// Work out which remote operation to perform before the next tick
///
/// Returns `None` when the tick will not look at any operation result, or
/// when the result is already implied: a start without a wall clock fails
/// inside the tick, and there is nothing to end when no show is open.
pub fn plan_io(ctx: &Context, sensors: &Sensors, settings: &Settings) -> Option<PendingIo> {
    if !sensors.connected {
        return None;
    }

    match ctx.state {
        State::StartingShow => {
            let hour_ms = current_hour_ms(sensors.epoch_seconds);
            (hour_ms > 0).then_some(PendingIo::StartShow { hour_ms })
        }
        State::EndingShow => ctx.show_id.map(|show_id| PendingIo::EndShow { show_id }),
        State::AutoDjActive
            if !sensors.relay_falling()
                && poll_due(ctx, sensors.now_ms, settings.poll_interval_ms) =>
        {
            Some(PendingIo::PollNowPlaying)
        }
        State::Booting
        | State::ConnectingWifi
        | State::Idle
        | State::AutoDjActive
        | State::ErrorState => None,
    }
}
