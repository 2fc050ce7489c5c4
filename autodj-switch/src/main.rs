use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use autodj_switch::{
    init_logging, Config, ConnectivityMonitor, InstantClock, Orchestrator, SystemWallClock,
    TcpProbe,
};
use azuracast_client::NowPlayingClient;
use flowsheet_client::FlowsheetClient;
use relay_monitor::{RelayMonitor, SysfsPin};
use tracing::info;

type Switch = Orchestrator<SysfsPin, TcpProbe, FlowsheetClient, NowPlayingClient>;

fn main() -> Result<()> {
    let config = Config::load()?;
    init_logging(config.log_mode).context("Failed to initialize logging")?;

    info!("Auto DJ switch v{}", env!("CARGO_PKG_VERSION"));
    config.print_summary();

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("Failed to install Ctrl-C handler")?;

    let mut switch = build_switch(&config)?;
    switch
        .boot()
        .with_context(|| format!("Failed to read relay pin {}", config.relay_pin.display()))?;
    switch.run(&running);

    Ok(())
}

/// Assemble the production components from the configuration
fn build_switch(config: &Config) -> Result<Switch> {
    let mut relay = RelayMonitor::new(SysfsPin::new(&config.relay_pin), config.debounce_ms);
    if let Some(led_pin) = &config.led_pin {
        relay = relay.with_led(SysfsPin::new(led_pin));
    }

    let probe = TcpProbe::new(config.probe_host.clone(), config.probe_port, config.http_timeout);
    let link = ConnectivityMonitor::with_intervals(probe, config.link_retry_ms, config.link_check_ms);

    let flowsheet = FlowsheetClient::with_timeout(
        config.flowsheet_url.clone(),
        config.api_key.clone(),
        config.http_timeout,
    )
    .with_identity(config.identity.clone());

    let now_playing = NowPlayingClient::with_timeout(config.now_playing_url.clone(), config.http_timeout)
        .context("Failed to create now-playing client")?;

    Ok(Orchestrator::new(
        relay,
        link,
        flowsheet,
        now_playing,
        SystemWallClock,
        InstantClock::new(),
        config.settings,
    )
    .with_loop_period(config.loop_period))
}
