//! Polling client with track-change detection

use std::time::Duration;

use autodj_core::Track;
use tracing::{debug, info, warn};

use crate::error::{NowPlayingError, Result};
use crate::model::NowPlayingDocument;

pub const DEFAULT_NOW_PLAYING_URL: &str =
    "https://remote.wxyc.org/api/nowplaying_static/main.json";

/// Polls the now-playing document and remembers the last track seen
///
/// Track changes are detected through `now_playing.sh_id`, which the
/// station software assigns per play event, so the same song played twice
/// in a row still counts as two tracks.
#[derive(Debug)]
pub struct NowPlayingClient {
    http_client: reqwest::blocking::Client,
    url: String,
    last_sh_id: i64,
    track: Track,
    live_dj: bool,
}

impl NowPlayingClient {
    /// Create a client with a 10 second timeout
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, Duration::from_secs(10))
    }

    /// Create a client with a custom request timeout
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                NowPlayingError::Network(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            url: url.into(),
            last_sh_id: 0,
            track: Track::default(),
            live_dj: false,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the document once; `Ok(true)` means a new track started
    ///
    /// The live-DJ flag is refreshed from every document that parses, even
    /// when the track has not changed.
    pub fn poll(&mut self) -> Result<bool> {
        debug!(url = %self.url, "Polling now playing");

        let response = self
            .http_client
            .get(&self.url)
            .send()
            .map_err(|e| NowPlayingError::Network(format!("Failed to fetch now playing: {}", e)))?;

        let status = response.status().as_u16();
        if status != 200 {
            warn!(status, "Now playing endpoint returned an error status");
            return Err(NowPlayingError::HttpStatus(status));
        }

        let body = response
            .text()
            .map_err(|e| NowPlayingError::Network(format!("Failed to read response body: {}", e)))?;

        let document = NowPlayingDocument::from_json(&body)
            .map_err(|e| NowPlayingError::Parse(e.to_string()))?;

        Ok(self.apply(&document))
    }

    /// Fold a parsed document into the client state
    fn apply(&mut self, document: &NowPlayingDocument) -> bool {
        self.live_dj = document.is_live();

        let sh_id = document.sh_id();
        if sh_id == 0 {
            debug!("No sh_id in response");
            return false;
        }
        if sh_id == self.last_sh_id {
            debug!(sh_id, "Same track");
            return false;
        }

        self.last_sh_id = sh_id;
        self.track = match document.song() {
            Some(song) => Track::new(
                song.artist.clone().unwrap_or_default(),
                song.title.clone().unwrap_or_default(),
                song.album.clone().unwrap_or_default(),
            ),
            None => Track::default(),
        };

        info!(sh_id, "New track: {} - {}", self.track.artist, self.track.title);
        true
    }

    pub fn artist(&self) -> &str {
        &self.track.artist
    }

    pub fn title(&self) -> &str {
        &self.track.title
    }

    pub fn album(&self) -> &str {
        &self.track.album
    }

    /// Song-history id of the last new track, 0 before the first one
    pub fn sh_id(&self) -> i64 {
        self.last_sh_id
    }

    /// Whether a live DJ was connected to the stream at the last poll
    pub fn is_live_dj(&self) -> bool {
        self.live_dj
    }

    pub fn current_track(&self) -> &Track {
        &self.track
    }
}
