//! Party lifecycle

use super::{ApiRequest, PendingReply, SmoozikApi};
use tracing::info;

impl SmoozikApi {
    /// Opens a party for the logged-in user
    pub fn start_party(&self) -> PendingReply {
        info!("Starting party");
        self.submit(&ApiRequest::start_party())
    }

    /// Joins an existing party
    pub fn join_party(&self, party_id: &str) -> PendingReply {
        info!("Joining party {}", party_id);
        self.submit(&ApiRequest::join_party(party_id))
    }

    /// Disconnects connected party users (`count` of them, or all when `None`)
    pub fn force_disconnect_users(&self, count: Option<u32>) -> PendingReply {
        self.submit(&ApiRequest::force_disconnect_users(count))
    }
}
