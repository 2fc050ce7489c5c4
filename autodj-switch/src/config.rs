//! Command line and environment configuration

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use autodj_core::Settings;
use clap::Parser;
use flowsheet_client::DjIdentity;
use tracing::info;

use crate::logging::LoggingMode;

/// Flowsheet Auto DJ switch
///
/// Watches the mixing board's AUX relay. When the board hands the air over
/// to automation, a show is opened on the flowsheet and every track the
/// automation plays is logged to it; when a DJ takes the air back, the show
/// is signed off.
#[derive(Parser, Debug, Clone)]
#[command(name = "autodj-switch", version)]
pub struct Args {
    /// Key sent in the X-Auto-DJ-Key header
    #[arg(long, env = "AUTODJ_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Base URL of the flowsheet service
    #[arg(long, env = "AUTODJ_FLOWSHEET_URL", default_value = flowsheet_client::DEFAULT_BASE_URL)]
    pub flowsheet_url: String,

    /// URL of the AzuraCast now-playing document
    #[arg(long, env = "AUTODJ_NOW_PLAYING_URL", default_value = azuracast_client::DEFAULT_NOW_PLAYING_URL)]
    pub now_playing_url: String,

    /// GPIO value file of the relay contact input
    #[arg(long, env = "AUTODJ_RELAY_PIN", default_value = "/sys/class/gpio/gpio2/value")]
    pub relay_pin: PathBuf,

    /// GPIO value file of the status LED, if one is fitted
    #[arg(long, env = "AUTODJ_LED_PIN")]
    pub led_pin: Option<PathBuf>,

    /// Host probed to decide whether the link is up
    #[arg(long, env = "AUTODJ_PROBE_HOST", default_value = "www.wxyc.info")]
    pub probe_host: String,

    /// TCP port probed on the probe host
    #[arg(long, env = "AUTODJ_PROBE_PORT", default_value = "443")]
    pub probe_port: u16,

    /// Relay debounce window in milliseconds
    #[arg(long, default_value = "50")]
    pub debounce_ms: u64,

    /// Minimum time between now-playing polls in milliseconds
    #[arg(long, env = "AUTODJ_POLL_INTERVAL_MS", default_value = "20000")]
    pub poll_interval_ms: u64,

    /// Link re-probe interval while the link is down, in milliseconds
    #[arg(long, default_value = "5000")]
    pub link_retry_ms: u64,

    /// Link re-probe interval while the link is up, in milliseconds
    #[arg(long, default_value = "30000")]
    pub link_check_ms: u64,

    /// HTTP response timeout in milliseconds
    #[arg(long, default_value = "10000")]
    pub http_timeout_ms: u64,

    /// Attempts allowed for starting or ending a show
    #[arg(short = 'r', long, default_value = "3")]
    pub max_retries: u32,

    /// Base backoff between attempts in milliseconds
    #[arg(long, default_value = "2000")]
    pub retry_backoff_ms: u64,

    /// Pause between loop iterations in milliseconds
    #[arg(long, default_value = "10")]
    pub loop_period_ms: u64,

    /// DJ id written on automation shows
    #[arg(long, default_value = "0")]
    pub dj_id: String,

    /// DJ name written on automation shows
    #[arg(long, default_value = "Auto DJ")]
    pub dj_name: String,

    /// DJ handle written on automation shows
    #[arg(long, default_value = "AutoDJ")]
    pub dj_handle: String,

    /// Show name written on automation shows
    #[arg(long, default_value = "Auto DJ")]
    pub show_name: String,

    /// Log output mode
    #[arg(long, env = "AUTODJ_LOG_MODE", value_enum, default_value = "development")]
    pub log_mode: LoggingMode,
}

impl Args {
    /// Validate command line arguments
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(anyhow::anyhow!("API key must not be empty"));
        }

        if self.max_retries == 0 {
            return Err(anyhow::anyhow!("Max retries must be at least 1"));
        }

        if self.poll_interval_ms == 0 {
            return Err(anyhow::anyhow!("Poll interval must be positive"));
        }

        if self.probe_port == 0 {
            return Err(anyhow::anyhow!("Probe port must not be 0"));
        }

        if self.http_timeout_ms == 0 {
            return Err(anyhow::anyhow!("HTTP timeout must be positive"));
        }

        if self.probe_host.trim().is_empty() {
            return Err(anyhow::anyhow!("Probe host must not be empty"));
        }

        Ok(())
    }
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub flowsheet_url: String,
    pub now_playing_url: String,
    pub relay_pin: PathBuf,
    pub led_pin: Option<PathBuf>,
    pub probe_host: String,
    pub probe_port: u16,
    pub debounce_ms: u64,
    pub link_retry_ms: u64,
    pub link_check_ms: u64,
    pub http_timeout: Duration,
    pub loop_period: Duration,
    pub settings: Settings,
    pub identity: DjIdentity,
    pub log_mode: LoggingMode,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            api_key: args.api_key,
            flowsheet_url: args.flowsheet_url,
            now_playing_url: args.now_playing_url,
            relay_pin: args.relay_pin,
            led_pin: args.led_pin,
            probe_host: args.probe_host,
            probe_port: args.probe_port,
            debounce_ms: args.debounce_ms,
            link_retry_ms: args.link_retry_ms,
            link_check_ms: args.link_check_ms,
            http_timeout: Duration::from_millis(args.http_timeout_ms),
            loop_period: Duration::from_millis(args.loop_period_ms),
            settings: Settings {
                poll_interval_ms: args.poll_interval_ms,
                max_retries: args.max_retries,
                retry_backoff_ms: args.retry_backoff_ms,
            },
            identity: DjIdentity {
                dj_id: args.dj_id,
                dj_name: args.dj_name,
                dj_handle: args.dj_handle,
                show_name: args.show_name,
            },
            log_mode: args.log_mode,
        }
    }
}

impl Config {
    /// Parse the process arguments (and their environment fallbacks)
    pub fn load() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    pub fn from_args(args: Args) -> Result<Self> {
        args.validate()?;
        Ok(Config::from(args))
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        info!("Configuration:");
        info!("  Flowsheet: {}", self.flowsheet_url);
        info!("  Now playing: {}", self.now_playing_url);
        info!("  Relay pin: {}", self.relay_pin.display());
        match &self.led_pin {
            Some(path) => info!("  LED pin: {}", path.display()),
            None => info!("  LED pin: none"),
        }
        info!("  Link probe: {}:{}", self.probe_host, self.probe_port);
        info!("  Debounce: {} ms", self.debounce_ms);
        info!("  Poll interval: {} ms", self.settings.poll_interval_ms);
        info!("  Max retries: {}", self.settings.max_retries);
        info!("  Retry backoff: {} ms", self.settings.retry_backoff_ms);
        info!("  HTTP timeout: {} ms", self.http_timeout.as_millis());
        info!("  Show: {} ({})", self.identity.show_name, self.identity.dj_name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["autodj-switch", "--api-key", "secret"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_args(parse(&[])).unwrap();

        assert_eq!(config.debounce_ms, 50);
        assert_eq!(config.settings, Settings::default());
        assert_eq!(config.link_retry_ms, 5_000);
        assert_eq!(config.http_timeout, Duration::from_secs(10));
        assert_eq!(config.loop_period, Duration::from_millis(10));
        assert_eq!(config.identity, DjIdentity::default());
        assert_eq!(config.flowsheet_url, "https://www.wxyc.info");
        assert_eq!(config.probe_port, 443);
        assert!(config.led_pin.is_none());
        assert_eq!(config.log_mode, LoggingMode::Development);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_args(parse(&[
            "--poll-interval-ms",
            "5000",
            "--max-retries",
            "5",
            "--led-pin",
            "/sys/class/gpio/gpio3/value",
            "--show-name",
            "Overnight",
            "--log-mode",
            "debug",
        ]))
        .unwrap();

        assert_eq!(config.settings.poll_interval_ms, 5_000);
        assert_eq!(config.settings.max_retries, 5);
        assert_eq!(
            config.led_pin,
            Some(PathBuf::from("/sys/class/gpio/gpio3/value"))
        );
        assert_eq!(config.identity.show_name, "Overnight");
        assert_eq!(config.log_mode, LoggingMode::Debug);
    }

    #[rstest]
    #[case::zero_retries(&["--max-retries", "0"])]
    #[case::zero_poll(&["--poll-interval-ms", "0"])]
    #[case::zero_port(&["--probe-port", "0"])]
    #[case::zero_timeout(&["--http-timeout-ms", "0"])]
    fn test_invalid_values_rejected(#[case] extra: &[&str]) {
        assert!(parse(extra).validate().is_err());
    }

    #[test]
    fn test_blank_api_key_rejected() {
        let args = Args::try_parse_from(["autodj-switch", "--api-key", "  "]).unwrap();
        assert!(args.validate().is_err());
    }
}
