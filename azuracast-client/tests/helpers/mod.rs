//! Test helpers for fixture-based now-playing tests

use std::fs;
use std::path::PathBuf;

/// Load a JSON fixture from the fixtures directory
pub fn load_fixture(filename: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/fixtures");
    path.push(filename);

    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", filename, e))
}

/// Path the station serves the static document from
pub const NOW_PLAYING_PATH: &str = "/api/nowplaying_static/main.json";
