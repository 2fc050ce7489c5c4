//! Flowsheet show-logging client
//!
//! Talks to the station's flowsheet servlets on behalf of the Auto DJ
//! switch: opening a show when automation goes on air, appending a row per
//! track played, and signing the show off again.
//!
//! Every request is a form POST authenticated with the
//! [`API_KEY_HEADER`] header. The service signals success with a 302
//! redirect; the redirect of the start-show call carries the new show id.
//!
//! ```no_run
//! use flowsheet_client::FlowsheetClient;
//!
//! let client = FlowsheetClient::new("https://www.wxyc.info", "secret-key");
//! let show = client.start_show(1_705_345_200_000)?;
//! client.add_entry(show, 1_705_345_200_000, "Stereolab", "French Disko", "Refried Ectoplasm")?;
//! client.end_show(show)?;
//! # Ok::<(), flowsheet_client::FlowsheetError>(())
//! ```

mod client;
mod error;
pub mod form;

pub use client::{DjIdentity, FlowsheetClient, API_KEY_HEADER, DEFAULT_BASE_URL};
pub use error::{FlowsheetError, Result};
pub use form::{parse_radio_show_id, url_encode};
