//! End-to-end scenarios for the control state machine
//!
//! Each test drives `tick` with literal values taken from station operation:
//! a 20 s poll interval, three attempts per remote operation and a 2 s
//! backoff step.

use autodj_core::{
    plan_io, tick, Context, Inputs, PendingIo, Sensors, Settings, ShowId, State, Track,
};
use rstest::rstest;

const EPOCH: u64 = 1_705_347_000;

fn settings() -> Settings {
    Settings {
        poll_interval_ms: 20_000,
        max_retries: 3,
        retry_backoff_ms: 2_000,
    }
}

fn sensors(auto_dj_active: bool) -> Sensors {
    Sensors {
        relay_changed: false,
        auto_dj_active,
        connected: true,
        epoch_seconds: EPOCH,
        now_ms: 100_000,
    }
}

fn show(raw: i32) -> ShowId {
    ShowId::new(raw).unwrap()
}

#[rstest]
#[case::first_failure_retries(0, State::StartingShow, 1, 2_000)]
#[case::second_failure_retries(1, State::StartingShow, 2, 4_000)]
#[case::third_failure_escalates(2, State::ErrorState, 0, 0)]
fn test_start_show_failures(
    #[case] retry_count: u32,
    #[case] expected_state: State,
    #[case] expected_retry_count: u32,
    #[case] expected_delay: u64,
) {
    let mut ctx = Context::in_state(State::StartingShow);
    ctx.retry_count = retry_count;
    let mut inputs = Inputs::from_sensors(sensors(true), settings());
    inputs.start_result = -1;

    let result = tick(&ctx, &inputs);

    assert_eq!(result.context.state, expected_state);
    assert_eq!(result.context.retry_count, expected_retry_count);
    assert_eq!(result.delay_ms, expected_delay);
}

#[test]
fn test_new_track_is_logged_in_hour_bucket() {
    let mut ctx = Context::in_state(State::AutoDjActive).with_show(show(42));
    ctx.last_poll_ms = 50_000;
    let mut inputs = Inputs::from_sensors(sensors(true), settings());
    inputs.new_track = true;
    inputs.live_dj = false;
    inputs.track = Track::new("Stereolab", "French Disko", "Refried Ectoplasm");

    let result = tick(&ctx, &inputs);

    let entry = result.entry.expect("entry should be emitted");
    assert_eq!(entry.hour_ms, 1_705_345_200_000);
    assert_eq!(entry.track.artist, "Stereolab");
    assert_eq!(entry.track.title, "French Disko");
    assert_eq!(entry.track.album, "Refried Ectoplasm");
    assert_eq!(result.context.last_poll_ms, 100_000);
    assert_eq!(result.context.show_id, Some(show(42)));
}

#[test]
fn test_successful_end_returns_to_idle() {
    let ctx = Context::in_state(State::EndingShow).with_show(show(42));
    let mut inputs = Inputs::from_sensors(sensors(false), settings());
    inputs.end_result = true;

    let result = tick(&ctx, &inputs);

    assert_eq!(result.context.state, State::Idle);
    assert_eq!(result.context.show_id, None);
    assert_eq!(result.context.retry_count, 0);
}

#[test]
fn test_error_recovery_still_backs_off() {
    let ctx = Context::in_state(State::ErrorState);
    let inputs = Inputs::from_sensors(sensors(true), settings());

    let result = tick(&ctx, &inputs);

    assert_eq!(result.context.state, State::StartingShow);
    assert_eq!(result.delay_ms, 2_000);
}

/// Run one orchestrator-style step against scripted remote outcomes
fn step(ctx: &Context, sensors: Sensors, start: i32, end: bool, track: Option<Track>) -> Context {
    let mut inputs = Inputs::from_sensors(sensors, settings());
    match plan_io(ctx, &sensors, &settings()) {
        Some(PendingIo::StartShow { .. }) => inputs.start_result = start,
        Some(PendingIo::EndShow { .. }) => inputs.end_result = end,
        Some(PendingIo::PollNowPlaying) => {
            if let Some(track) = track {
                inputs.new_track = true;
                inputs.track = track;
            }
        }
        None => {}
    }
    tick(ctx, &inputs).context
}

#[test]
fn test_full_show_survives_link_drop() {
    let mut ctx = Context::in_state(State::ConnectingWifi);
    let mut s = sensors(false);

    ctx = step(&ctx, s, -1, false, None);
    assert_eq!(ctx.state, State::Idle);

    // Board hands over to automation.
    s.relay_changed = true;
    s.auto_dj_active = true;
    ctx = step(&ctx, s, -1, false, None);
    assert_eq!(ctx.state, State::StartingShow);

    s.relay_changed = false;
    ctx = step(&ctx, s, 314, false, None);
    assert_eq!(ctx.state, State::AutoDjActive);
    assert_eq!(ctx.show_id, Some(show(314)));

    // Link drops mid-show and comes back; the show id is kept.
    s.connected = false;
    ctx = step(&ctx, s, -1, false, None);
    assert_eq!(ctx.state, State::ConnectingWifi);
    assert_eq!(ctx.show_id, Some(show(314)));

    s.connected = true;
    ctx = step(&ctx, s, -1, false, None);
    assert_eq!(ctx.state, State::AutoDjActive);
    assert_eq!(ctx.show_id, Some(show(314)));

    // Human DJ takes over again; the end call fails once, then succeeds.
    s.relay_changed = true;
    s.auto_dj_active = false;
    ctx = step(&ctx, s, -1, false, None);
    assert_eq!(ctx.state, State::EndingShow);

    s.relay_changed = false;
    ctx = step(&ctx, s, -1, false, None);
    assert_eq!(ctx.state, State::EndingShow);
    assert_eq!(ctx.retry_count, 1);

    ctx = step(&ctx, s, -1, true, None);
    assert_eq!(ctx.state, State::Idle);
    assert_eq!(ctx.show_id, None);
    assert_eq!(ctx.retry_count, 0);
}
