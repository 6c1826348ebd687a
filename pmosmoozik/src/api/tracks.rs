//! Party track operations

use super::{ApiMethod, ApiRequest, PendingReply, SmoozikApi};
use crate::playlist::{MAX_ADVISED_PLAYLIST_SIZE, Playlist};
use crate::track::Track;
use tracing::{debug, warn};

impl SmoozikApi {
    /// Most requested tracks of the party.
    ///
    /// The reply holds a `tracks` list that [`Playlist::from_value`] accepts.
    pub fn get_top_tracks(&self, retrieve: u32, retrieved: u32) -> PendingReply {
        self.submit(&ApiRequest::get_top_tracks(retrieve, retrieved))
    }

    /// Tells the service which track sits at `position`
    pub fn set_track(&self, track: &Track, position: u32) -> PendingReply {
        debug!("setTrack {} at position {}", track.local_id(), position);
        self.submit(&ApiRequest::set_track(track, position))
    }

    pub fn unset_track(&self, local_id: &str) -> PendingReply {
        self.submit(&ApiRequest::unset_track(local_id))
    }

    pub fn unset_all_tracks(&self) -> PendingReply {
        self.submit(&ApiRequest::unset_all_tracks())
    }

    /// Uploads the tracks users can vote for.
    ///
    /// A playlist that cannot be serialized yields an already failed handle.
    pub fn send_playlist(&self, playlist: &Playlist<'_>) -> PendingReply {
        if playlist.exceeds_advised_size() {
            warn!(
                "Sending {} tracks, more than the advised {}",
                playlist.len(),
                MAX_ADVISED_PLAYLIST_SIZE
            );
        }
        match ApiRequest::send_playlist(playlist) {
            Ok(request) => self.submit(&request),
            Err(e) => PendingReply::ready(ApiMethod::SendPlaylist, Err(e)),
        }
    }
}
