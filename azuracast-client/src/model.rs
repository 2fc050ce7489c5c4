//! The slice of the AzuraCast now-playing document the switch cares about
//!
//! The full document is around 10 KB; everything except the fields below is
//! skipped during deserialization. Missing or `null` fields fall back to
//! their defaults so a partially populated document still parses.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NowPlayingDocument {
    #[serde(default)]
    pub now_playing: Option<NowPlayingEntry>,
    #[serde(default)]
    pub live: Option<LiveInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NowPlayingEntry {
    /// Song-history id, unique per play event
    #[serde(default)]
    pub sh_id: Option<i64>,
    #[serde(default)]
    pub song: Option<Song>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Song {
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LiveInfo {
    #[serde(default)]
    pub is_live: Option<bool>,
}

impl NowPlayingDocument {
    pub fn from_json(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }

    /// Song-history id, or 0 when absent
    pub fn sh_id(&self) -> i64 {
        self.now_playing
            .as_ref()
            .and_then(|entry| entry.sh_id)
            .unwrap_or(0)
    }

    pub fn is_live(&self) -> bool {
        self.live
            .as_ref()
            .and_then(|live| live.is_live)
            .unwrap_or(false)
    }

    pub fn song(&self) -> Option<&Song> {
        self.now_playing.as_ref().and_then(|entry| entry.song.as_ref())
    }
}
