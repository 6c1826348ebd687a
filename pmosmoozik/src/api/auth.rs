//! Session management

use super::{ApiRequest, PendingReply, SmoozikApi};
use crate::error::Result;
use crate::value::ResponseValue;
use tracing::{info, warn};

impl SmoozikApi {
    /// Authenticates a user and stores the returned session key.
    ///
    /// Only `md5(username + md5(password))` is sent to the service.
    ///
    /// # Errors
    ///
    /// * `Error::Api` with `ErrorCode::AuthenticationFailed` on bad credentials
    pub async fn login(&mut self, username: &str, password: &str) -> Result<ResponseValue> {
        let pending = self.login_pending(username, password);
        self.complete_login(pending).await
    }

    /// Sends the login request without waiting for the reply.
    ///
    /// The session key is only stored once the handle is passed to
    /// [`SmoozikApi::complete_login`].
    pub fn login_pending(&self, username: &str, password: &str) -> PendingReply {
        info!("Logging in to Smoozik as {}", username);
        self.submit(&ApiRequest::login(username, password))
    }

    /// Waits for a login reply and stores its session key
    pub async fn complete_login(&mut self, pending: PendingReply) -> Result<ResponseValue> {
        let data = pending.data().await?;

        match data.get("sessionKey").and_then(ResponseValue::as_str) {
            Some(key) if !key.is_empty() => {
                self.session_key = Some(key.to_string());
                info!("Logged in to Smoozik");
            }
            _ => warn!("Login reply carries no session key"),
        }

        Ok(data)
    }

    /// Forgets the session key; later calls are sent unauthenticated
    pub fn logout(&mut self) {
        if self.session_key.take().is_some() {
            info!("Logged out of Smoozik");
        }
    }
}
