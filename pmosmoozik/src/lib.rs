//! Smoozik client library for PMOMusic
//!
//! This crate talks to the Smoozik party service: a host logs in, opens a
//! party, publishes the playlist guests vote on, and tells the service which
//! track is playing and which one comes next.
//!
//! # Features
//!
//! - **Signed requests**: every call carries an MD5 `sig` computed from its
//!   parameters and the application secret
//! - **Schema-less replies**: XML and JSON replies are turned into a
//!   [`ResponseValue`] tree, lists being inferred from repeated tags
//! - **Blocking or background calls**: operations hand back a
//!   [`PendingReply`]; awaiting it yields the reply data, and in non-blocking
//!   mode the request is already running on a Tokio task
//! - **Playlists**: [`Playlist`] keeps tracks unique on their `localId` and
//!   serializes itself for `sendPlaylist`
//!
//! # Example
//!
//! ```no_run
//! use pmosmoozik::{Playlist, SmoozikApi, Track};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut api = SmoozikApi::new("my-api-key", "my-secret")?;
//!     api.login("host", "password").await?;
//!     api.start_party().await?;
//!
//!     let mut playlist = Playlist::new();
//!     playlist.add_track(Track::new("1", "So What").with_artist("Miles Davis"));
//!     playlist.add_track(Track::new("2", "Naima").with_artist("John Coltrane"));
//!     api.send_playlist(&playlist).await?;
//!
//!     let top = api.get_top_tracks(10, 0).await?;
//!     for track in Playlist::from_value(&top["tracks"]).iter() {
//!         println!("{} - {}", track.artist().unwrap_or("?"), track.name());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod parser;
pub mod playlist;
pub mod track;
pub mod value;

pub use api::{
    ApiMethod, ApiRequest, ClientBuilder, PendingReply, Reply, SignedRequest, SmoozikApi,
};
pub use config::SmoozikConfig;
pub use error::{Error, ErrorCode, Result};
pub use parser::{ArrayDetection, ResponseFormat, parse_reply};
pub use playlist::{MAX_ADVISED_PLAYLIST_SIZE, Playlist};
pub use track::Track;
pub use value::ResponseValue;
