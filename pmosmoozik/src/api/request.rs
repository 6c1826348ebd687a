//! Per-operation parameter tables
//!
//! Each constructor only fills the parameters specific to its method; the
//! client adds `format`, `apiKey`, `sessionKey` and `sig` when the request is
//! signed (see [`super::SmoozikApi::prepare`]).

use super::signing::{Params, auth_hash};
use crate::error::Result;
use crate::playlist::Playlist;
use crate::track::Track;
use std::fmt;

/// Number of tracks asked by [`ApiRequest::get_top_tracks`] by default
pub const DEFAULT_RETRIEVE: u32 = 10;

/// Remote methods exposed by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiMethod {
    Login,
    StartParty,
    GetTopTracks,
    SetTrack,
    UnsetTrack,
    UnsetAllTracks,
    SendPlaylist,
    JoinParty,
    ForceDisconnectUsers,
}

impl ApiMethod {
    /// Path segment appended to the API base URL
    pub fn name(&self) -> &'static str {
        match self {
            ApiMethod::Login => "login",
            ApiMethod::StartParty => "startParty",
            ApiMethod::GetTopTracks => "getTopTracks",
            ApiMethod::SetTrack => "setTrack",
            ApiMethod::UnsetTrack => "unsetTrack",
            ApiMethod::UnsetAllTracks => "unsetAllTracks",
            ApiMethod::SendPlaylist => "sendPlaylist",
            ApiMethod::JoinParty => "joinParty",
            ApiMethod::ForceDisconnectUsers => "forceDisconnectUsers",
        }
    }
}

impl fmt::Display for ApiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unsigned request: a method plus its GET and POST parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    method: ApiMethod,
    get: Params,
    post: Params,
}

impl ApiRequest {
    pub fn new(method: ApiMethod) -> Self {
        Self {
            method,
            get: Params::new(),
            post: Params::new(),
        }
    }

    pub fn with_get(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.get.insert(key.into(), value.into());
        self
    }

    pub fn with_post(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.post.insert(key.into(), value.into());
        self
    }

    pub fn method(&self) -> ApiMethod {
        self.method
    }

    pub fn get_params(&self) -> &Params {
        &self.get
    }

    pub fn post_params(&self) -> &Params {
        &self.post
    }

    /// `login`: the password itself never leaves the client
    pub fn login(username: &str, password: &str) -> Self {
        Self::new(ApiMethod::Login)
            .with_post("username", username)
            .with_post("authHash", auth_hash(username, password))
    }

    pub fn start_party() -> Self {
        Self::new(ApiMethod::StartParty)
    }

    /// `getTopTracks`: `retrieve` tracks, skipping the first `retrieved`
    pub fn get_top_tracks(retrieve: u32, retrieved: u32) -> Self {
        Self::new(ApiMethod::GetTopTracks)
            .with_get("retrieve", retrieve.to_string())
            .with_get("retrieved", retrieved.to_string())
    }

    /// `setTrack`: `position` is passed through as is
    pub fn set_track(track: &Track, position: u32) -> Self {
        Self::new(ApiMethod::SetTrack)
            .with_post("localId", track.local_id())
            .with_post("name", track.name())
            .with_post("artistName", track.artist().unwrap_or_default())
            .with_post("albumName", track.album().unwrap_or_default())
            .with_post("duration", track.duration().to_string())
            .with_post("position", position.to_string())
    }

    pub fn unset_track(local_id: &str) -> Self {
        Self::new(ApiMethod::UnsetTrack).with_post("localId", local_id)
    }

    pub fn unset_all_tracks() -> Self {
        Self::new(ApiMethod::UnsetAllTracks)
    }

    /// `sendPlaylist`: the whole playlist as a `partytracks` document
    pub fn send_playlist(playlist: &Playlist<'_>) -> Result<Self> {
        Ok(Self::new(ApiMethod::SendPlaylist).with_post("data", playlist.to_xml()?))
    }

    pub fn join_party(party_id: &str) -> Self {
        Self::new(ApiMethod::JoinParty).with_post("partyId", party_id)
    }

    /// `forceDisconnectUsers`: `count` is omitted when `None`
    pub fn force_disconnect_users(count: Option<u32>) -> Self {
        let request = Self::new(ApiMethod::ForceDisconnectUsers);
        match count {
            Some(count) => request.with_post("count", count.to_string()),
            None => request,
        }
    }
}
