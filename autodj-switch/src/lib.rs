//! Flowsheet Auto DJ switch
//!
//! Follows the mixing board's AUX relay. While the board is routed to
//! automation, an "Auto DJ" show is kept open on the station flowsheet and
//! every track the automation plays is appended to it; when a DJ takes the
//! air back, the show is signed off.
//!
//! The decisions live in [`autodj_core::tick`]. This crate wires that
//! function to the relay input, the link monitor, the clocks and the two
//! HTTP services, and provides the command line front end.
//!
//! ```text
//! relay ──┐
//! link  ──┼─> Sensors ─> plan_io ─> remote call ─> Inputs ─> tick ─> entry / delay
//! clocks ─┘
//! ```

pub mod clock;
pub mod config;
pub mod connectivity;
pub mod logging;
pub mod orchestrator;

pub use clock::{InstantClock, MonotonicClock, SystemWallClock, WallClock};
pub use config::{Args, Config};
pub use connectivity::{ConnectivityMonitor, LinkProbe, TcpProbe};
pub use logging::{init_logging, LoggingError, LoggingMode};
pub use orchestrator::{NowPlaying, Orchestrator, ShowLog, DEFAULT_LOOP_PERIOD};
