//! The control loop
//!
//! [`Orchestrator`] owns the leaf components and the control [`Context`].
//! Each [`Orchestrator::step`] samples the leaves, performs the one remote
//! operation the next tick depends on, runs [`tick`] and carries out the
//! resulting command. All decisions are made by [`tick`]; this module only
//! moves data between it and the outside world.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use autodj_core::{
    plan_io, tick, Context, EntryAction, Inputs, PendingIo, Sensors, Settings, ShowId, State,
    Track,
};
use azuracast_client::{NowPlayingClient, NowPlayingError};
use flowsheet_client::{FlowsheetClient, FlowsheetError};
use relay_monitor::{InputPin, PinError, RelayMonitor};
use tracing::{debug, info, trace, warn};

use crate::clock::{MonotonicClock, WallClock};
use crate::connectivity::{ConnectivityMonitor, LinkProbe};

pub const DEFAULT_LOOP_PERIOD: Duration = Duration::from_millis(10);

/// Longest single sleep, so a shutdown request is noticed during backoff
const SLEEP_SLICE: Duration = Duration::from_millis(100);

/// Remote show log (the flowsheet)
pub trait ShowLog {
    type Error: fmt::Display;

    fn start_show(&self, starting_hour_ms: u64) -> Result<ShowId, Self::Error>;
    fn add_entry(&self, show_id: ShowId, entry: &EntryAction) -> Result<(), Self::Error>;
    fn end_show(&self, show_id: ShowId) -> Result<(), Self::Error>;
}

impl ShowLog for FlowsheetClient {
    type Error = FlowsheetError;

    fn start_show(&self, starting_hour_ms: u64) -> Result<ShowId, FlowsheetError> {
        FlowsheetClient::start_show(self, starting_hour_ms)
    }

    fn add_entry(&self, show_id: ShowId, entry: &EntryAction) -> Result<(), FlowsheetError> {
        FlowsheetClient::add_entry(
            self,
            show_id,
            entry.hour_ms,
            &entry.track.artist,
            &entry.track.title,
            &entry.track.album,
        )
    }

    fn end_show(&self, show_id: ShowId) -> Result<(), FlowsheetError> {
        FlowsheetClient::end_show(self, show_id)
    }
}

/// Source of now-playing metadata
pub trait NowPlaying {
    type Error: fmt::Display;

    /// `Ok(true)` when a track not reported before has started
    fn poll(&mut self) -> Result<bool, Self::Error>;
    fn is_live_dj(&self) -> bool;
    fn current_track(&self) -> &Track;
}

impl NowPlaying for NowPlayingClient {
    type Error = NowPlayingError;

    fn poll(&mut self) -> Result<bool, NowPlayingError> {
        NowPlayingClient::poll(self)
    }

    fn is_live_dj(&self) -> bool {
        NowPlayingClient::is_live_dj(self)
    }

    fn current_track(&self) -> &Track {
        NowPlayingClient::current_track(self)
    }
}

/// Runs the control state machine against real (or fake) components
pub struct Orchestrator<R, L, S, N>
where
    R: InputPin,
    L: LinkProbe,
    S: ShowLog,
    N: NowPlaying,
{
    relay: RelayMonitor<R>,
    link: ConnectivityMonitor<L>,
    show_log: S,
    now_playing: N,
    wall_clock: Box<dyn WallClock>,
    monotonic: Box<dyn MonotonicClock>,
    settings: Settings,
    loop_period: Duration,
    context: Context,
    relay_readable: bool,
}

impl<R, L, S, N> Orchestrator<R, L, S, N>
where
    R: InputPin,
    L: LinkProbe,
    S: ShowLog,
    N: NowPlaying,
{
    pub fn new(
        relay: RelayMonitor<R>,
        link: ConnectivityMonitor<L>,
        show_log: S,
        now_playing: N,
        wall_clock: impl WallClock + 'static,
        monotonic: impl MonotonicClock + 'static,
        settings: Settings,
    ) -> Self {
        Self {
            relay,
            link,
            show_log,
            now_playing,
            wall_clock: Box::new(wall_clock),
            monotonic: Box::new(monotonic),
            settings,
            loop_period: DEFAULT_LOOP_PERIOD,
            context: Context::new(),
            relay_readable: true,
        }
    }

    /// Pause added after every iteration
    pub fn with_loop_period(mut self, loop_period: Duration) -> Self {
        self.loop_period = loop_period;
        self
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn state(&self) -> State {
        self.context.state
    }

    /// Whether the last relay sample could be read
    pub fn relay_readable(&self) -> bool {
        self.relay_readable
    }

    /// Bring up the leaves and leave `BOOTING`
    ///
    /// Seeds the relay from its current level, checks the link once and
    /// moves the context to `CONNECTING_WIFI`, from where the first tick
    /// proceeds.
    pub fn boot(&mut self) -> Result<(), PinError> {
        let now_ms = self.monotonic.now_ms();
        self.relay.set_up(now_ms)?;
        self.link.set_up(now_ms);

        if self.wall_clock.epoch_seconds() == 0 {
            warn!("Wall clock not set; shows cannot start until it is");
        }

        self.transition_to(State::ConnectingWifi);
        Ok(())
    }

    /// One loop iteration; returns the extra delay the tick asked for
    pub fn step(&mut self) -> u64 {
        let now_ms = self.monotonic.now_ms();

        self.sample_relay(now_ms);
        self.link.update(now_ms);

        let sensors = Sensors {
            relay_changed: self.relay.state_changed(),
            auto_dj_active: self.relay.is_auto_dj_active(),
            connected: self.link.is_connected(),
            epoch_seconds: self.wall_clock.epoch_seconds(),
            now_ms,
        };

        let inputs = self.gather_inputs(sensors);
        let result = tick(&self.context, &inputs);

        if let Some(entry) = &result.entry {
            self.append_entry(result.context.show_id, entry);
        }

        if result.delay_ms > 0 {
            debug!(
                state = result.context.state.name(),
                retry = result.context.retry_count,
                "Backing off {} ms",
                result.delay_ms
            );
        }

        self.transition_to(result.context.state);
        self.context = result.context;
        result.delay_ms
    }

    /// Step until `running` is cleared
    ///
    /// An open show is left open on shutdown.
    pub fn run(&mut self, running: &AtomicBool) {
        info!("Control loop running");
        while running.load(Ordering::SeqCst) {
            let delay_ms = self.step();
            sleep_while_running(Duration::from_millis(delay_ms) + self.loop_period, running);
        }

        match self.context.show_id {
            Some(show_id) => info!(show_id = show_id.get(), "Shutting down; show left open"),
            None => info!("Shutting down"),
        }
    }

    /// Sample the relay, logging only when it stops or resumes answering
    ///
    /// While reads fail the monitor keeps its last debounced state.
    fn sample_relay(&mut self, now_ms: u64) {
        match (self.relay.update(now_ms), self.relay_readable) {
            (Err(e), true) => {
                warn!("Relay read failed: {}", e);
                self.relay_readable = false;
            }
            (Err(e), false) => trace!("Relay still unreadable: {}", e),
            (Ok(()), false) => {
                info!("Relay readable again.");
                self.relay_readable = true;
            }
            (Ok(()), true) => {}
        }
    }

    /// Perform the remote operation the next tick reads, if any
    fn gather_inputs(&mut self, sensors: Sensors) -> Inputs {
        let mut inputs = Inputs::from_sensors(sensors, self.settings);

        match plan_io(&self.context, &sensors, &self.settings) {
            Some(PendingIo::StartShow { hour_ms }) => {
                inputs.start_result = match self.show_log.start_show(hour_ms) {
                    Ok(show_id) => show_id.get(),
                    Err(e) => {
                        warn!(attempt = self.context.retry_count + 1, "Start show failed: {}", e);
                        -1
                    }
                };
            }
            Some(PendingIo::EndShow { show_id }) => {
                inputs.end_result = match self.show_log.end_show(show_id) {
                    Ok(()) => true,
                    Err(e) => {
                        warn!(attempt = self.context.retry_count + 1, "End show failed: {}", e);
                        false
                    }
                };
            }
            Some(PendingIo::PollNowPlaying) => match self.now_playing.poll() {
                Ok(new_track) => {
                    inputs.new_track = new_track;
                    inputs.live_dj = self.now_playing.is_live_dj();
                    if new_track {
                        inputs.track = self.now_playing.current_track().clone();
                        if inputs.live_dj {
                            info!("Live DJ on the stream; entry skipped");
                        }
                    }
                }
                Err(e) => warn!("Now playing poll failed: {}", e),
            },
            None => {
                if self.context.state == State::EndingShow && self.context.show_id.is_none() {
                    // Nothing open remotely, so there is nothing to end.
                    inputs.end_result = true;
                }
            }
        }

        inputs
    }

    fn append_entry(&self, show_id: Option<ShowId>, entry: &EntryAction) {
        let Some(show_id) = show_id else {
            warn!("No open show; entry for {} dropped", entry.track.title);
            return;
        };

        if let Err(e) = self.show_log.add_entry(show_id, entry) {
            warn!(
                show_id = show_id.get(),
                "Add entry failed, entry dropped: {}", e
            );
        }
    }

    fn transition_to(&mut self, next: State) {
        if next != self.context.state {
            info!("{} -> {}", self.context.state.name(), next.name());
            self.context.state = next;
        }
    }
}

fn sleep_while_running(total: Duration, running: &AtomicBool) {
    let mut remaining = total;
    while !remaining.is_zero() && running.load(Ordering::SeqCst) {
        let slice = remaining.min(SLEEP_SLICE);
        thread::sleep(slice);
        remaining -= slice;
    }
}
