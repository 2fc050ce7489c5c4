//! AzuraCast now-playing poller
//!
//! Fetches the station's static now-playing document and reports when a new
//! track has started, along with its artist, title and album and whether a
//! live DJ is currently connected to the stream.
//!
//! ```no_run
//! use azuracast_client::{NowPlayingClient, DEFAULT_NOW_PLAYING_URL};
//!
//! let mut client = NowPlayingClient::new(DEFAULT_NOW_PLAYING_URL)?;
//! if client.poll()? {
//!     println!("{} - {}", client.artist(), client.title());
//! }
//! # Ok::<(), azuracast_client::NowPlayingError>(())
//! ```

mod client;
mod error;
pub mod model;

pub use client::{NowPlayingClient, DEFAULT_NOW_PLAYING_URL};
pub use error::{NowPlayingError, Result};
