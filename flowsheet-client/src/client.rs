//! Show-logging client
//!
//! The flowsheet servlets answer every successful form POST with a 302
//! redirect. Redirects are not followed: the start-show redirect target is
//! where the new show id comes from.

use std::time::Duration;

use autodj_core::ShowId;
use tracing::{debug, info, warn};

use crate::error::{FlowsheetError, Result};
use crate::form::parse_radio_show_id;

/// Header the service checks to authorise control-room automation
pub const API_KEY_HEADER: &str = "X-Auto-DJ-Key";

pub const DEFAULT_BASE_URL: &str = "https://www.wxyc.info";

const PATH_START_SHOW: &str = "/playlists/startRadioShow";
const PATH_ADD_ENTRY: &str = "/playlists/flowsheetEntryAdd";
const PATH_END_SHOW: &str = "/playlists/finishRadioShow";

/// Identity written on shows opened by the switch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DjIdentity {
    pub dj_id: String,
    pub dj_name: String,
    pub dj_handle: String,
    pub show_name: String,
}

impl Default for DjIdentity {
    fn default() -> Self {
        Self {
            dj_id: "0".to_string(),
            dj_name: "Auto DJ".to_string(),
            dj_handle: "AutoDJ".to_string(),
            show_name: "Auto DJ".to_string(),
        }
    }
}

/// Blocking client for the three flowsheet operations
#[derive(Debug, Clone)]
pub struct FlowsheetClient {
    agent: ureq::Agent,
    base_url: String,
    api_key: String,
    identity: DjIdentity,
}

impl FlowsheetClient {
    /// Create a client with a 10 second response timeout
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_timeout(base_url, api_key, Duration::from_secs(10))
    }

    /// Create a client with a custom response timeout
    pub fn with_timeout(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        response_timeout: Duration,
    ) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(Duration::from_secs(5))
                .timeout_read(response_timeout)
                .redirects(0)
                .build(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            identity: DjIdentity::default(),
        }
    }

    /// Replace the identity written on new shows
    pub fn with_identity(mut self, identity: DjIdentity) -> Self {
        self.identity = identity;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Open a new show; returns the id the service assigned
    pub fn start_show(&self, starting_hour_ms: u64) -> Result<ShowId> {
        info!("Starting show...");

        let starting_hour = starting_hour_ms.to_string();
        let response = self.post_form(
            PATH_START_SHOW,
            &[
                ("djID", self.identity.dj_id.as_str()),
                ("djName", self.identity.dj_name.as_str()),
                ("djHandle", self.identity.dj_handle.as_str()),
                ("showName", self.identity.show_name.as_str()),
                ("startingHour", starting_hour.as_str()),
            ],
        )?;
        let location = response
            .header("Location")
            .map(str::to_string)
            .ok_or(FlowsheetError::MissingLocation)?;
        drain(response);

        let show_id = parse_radio_show_id(&location).ok_or_else(|| {
            warn!(location = %location, "radioShowID not found in Location");
            FlowsheetError::MissingShowId(location.clone())
        })?;

        info!(show_id = show_id.get(), "Show started");
        Ok(show_id)
    }

    /// Append one track to the show's flowsheet
    ///
    /// The service inserts hour breakpoints itself (`autoBreakpoint=true`).
    pub fn add_entry(
        &self,
        show_id: ShowId,
        working_hour_ms: u64,
        artist: &str,
        title: &str,
        album: &str,
    ) -> Result<()> {
        info!("Adding entry: {} - {}", artist, title);

        let show = show_id.get().to_string();
        let working_hour = working_hour_ms.to_string();
        let fields = [
            ("radioShowID", show.as_str()),
            ("workingHour", working_hour.as_str()),
            ("artistName", artist),
            ("songTitle", title),
            ("releaseTitle", album),
            ("releaseType", "otherRelease"),
            ("autoBreakpoint", "true"),
        ];

        drain(self.post_form(PATH_ADD_ENTRY, &fields)?);
        info!("Entry added.");
        Ok(())
    }

    /// Close the show, skipping the interactive sign-off confirmation page
    pub fn end_show(&self, show_id: ShowId) -> Result<()> {
        info!("Ending show...");

        let show = show_id.get().to_string();
        let fields = [("radioShowID", show.as_str()), ("mode", "signoffConfirm")];

        drain(self.post_form(PATH_END_SHOW, &fields)?);
        info!(show_id = show_id.get(), "Show ended");
        Ok(())
    }

    /// POST form fields and require the service's 302 answer
    ///
    /// ureq encodes the fields and sets the form content type.
    fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> Result<ureq::Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "POST");

        let response = self
            .agent
            .post(&url)
            .set(API_KEY_HEADER, &self.api_key)
            .send_form(fields)
            .map_err(|e| {
                let error = FlowsheetError::from(e);
                warn!(path, "Request failed: {}", error);
                error
            })?;

        match response.status() {
            302 => Ok(response),
            status => {
                warn!(path, status, "Expected 302");
                drain(response);
                Err(FlowsheetError::UnexpectedStatus(status))
            }
        }
    }
}

/// Read the rest of the body so the connection can go back to the pool
fn drain(response: ureq::Response) {
    if let Err(e) = response.into_string() {
        debug!("Failed to drain response body: {}", e);
    }
}
