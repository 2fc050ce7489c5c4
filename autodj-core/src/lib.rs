//! Auto DJ control core
//!
//! A pure state machine that decides, once per loop iteration, what the Auto
//! DJ switch should be doing: waiting for the network, idling while a human
//! DJ is on air, opening a flowsheet show when the mixing board hands over to
//! automation, logging now-playing tracks into it, and closing it again.
//!
//! Nothing in this crate performs I/O. The orchestrator reads the relay, the
//! link and the clocks, runs whichever remote call [`plan_io`] asks for, and
//! feeds everything into [`tick`] as one [`Inputs`] snapshot. The returned
//! [`TickResult`] carries the next [`Context`], an optional [`EntryAction`] to
//! execute, and a backoff delay.
//!
//! # Quick Start
//!
//! ```rust
//! use autodj_core::{plan_io, tick, Context, Inputs, PendingIo, Sensors, Settings, State};
//!
//! let settings = Settings::default();
//! let mut ctx = Context::in_state(State::StartingShow);
//! let sensors = Sensors {
//!     relay_changed: false,
//!     auto_dj_active: true,
//!     connected: true,
//!     epoch_seconds: 1_705_347_000,
//!     now_ms: 100_000,
//! };
//!
//! // The orchestrator asks what to do, does it, and reports back.
//! assert_eq!(
//!     plan_io(&ctx, &sensors, &settings),
//!     Some(PendingIo::StartShow { hour_ms: 1_705_345_200_000 })
//! );
//! let mut inputs = Inputs::from_sensors(sensors, settings);
//! inputs.start_result = 42;
//!
//! ctx = tick(&ctx, &inputs).context;
//! assert_eq!(ctx.state, State::AutoDjActive);
//! assert_eq!(ctx.show_id.map(|id| id.get()), Some(42));
//! ```
//!
//! # State Flow
//!
//! ```text
//! BOOTING ──(boot hand-off)──▶ CONNECTING_WIFI ──▶ IDLE ──rising──▶ STARTING_SHOW
//!                                   ▲   │                              │     │
//!                          link lost│   └──(show open)──▶ AUTO_DJ_ACTIVE ◀┘     │
//!                                   │                          │ falling       │
//!                                ERROR ◀───────────────────────┼───────────────┘
//!                                                              ▼
//!                                                         ENDING_SHOW ──▶ IDLE
//! ```

pub mod inputs;
pub mod machine;
pub mod plan;
pub mod state;
pub mod time;

pub use inputs::{Inputs, Sensors, Settings, Track};
pub use machine::{poll_due, tick, EntryAction, TickResult};
pub use plan::{plan_io, PendingIo};
pub use state::{Context, ShowId, State};
pub use time::current_hour_ms;
