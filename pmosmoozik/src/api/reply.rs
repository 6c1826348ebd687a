//! Raw replies and pending request handles

use super::request::ApiMethod;
use crate::error::{Error, Result};
use crate::parser::{ArrayDetection, ResponseFormat, parse_reply};
use crate::value::ResponseValue;
use std::future::{Future, IntoFuture};
use std::pin::Pin;
use tokio::task::JoinHandle;

type ReplyFuture = Pin<Box<dyn Future<Output = Result<Reply>> + Send>>;

/// Body of a completed call, not yet parsed
#[derive(Debug, Clone)]
pub struct Reply {
    method: ApiMethod,
    status: u16,
    format: ResponseFormat,
    detection: ArrayDetection,
    body: Vec<u8>,
}

impl Reply {
    pub(crate) fn new(
        method: ApiMethod,
        status: u16,
        format: ResponseFormat,
        detection: ArrayDetection,
        body: Vec<u8>,
    ) -> Self {
        Self {
            method,
            status,
            format,
            detection,
            body,
        }
    }

    pub fn method(&self) -> ApiMethod {
        self.method
    }

    /// HTTP status code
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn format(&self) -> ResponseFormat {
        self.format
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as text, lossy
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Checks the envelope and returns the `data` payload
    pub fn parse(&self) -> Result<ResponseValue> {
        parse_reply(&self.body, self.format, self.detection)
    }
}

enum PendingState {
    Ready(Result<Reply>),
    Deferred(ReplyFuture),
    Spawned(JoinHandle<Result<Reply>>),
}

/// Handle on a request that may still be in flight.
///
/// Three shapes exist: already resolved, deferred (the request is sent when
/// the handle is awaited) and spawned (the request runs on a Tokio task).
/// Awaiting the handle directly yields the parsed `data` payload:
///
/// ```no_run
/// # async fn run(api: &pmosmoozik::SmoozikApi) -> pmosmoozik::Result<()> {
/// let pending = api.start_party();
/// // ... other work while a non-blocking request is in flight
/// let data = pending.await?;
/// # Ok(())
/// # }
/// ```
pub struct PendingReply {
    method: ApiMethod,
    state: PendingState,
}

impl PendingReply {
    pub(crate) fn ready(method: ApiMethod, reply: Result<Reply>) -> Self {
        Self {
            method,
            state: PendingState::Ready(reply),
        }
    }

    pub(crate) fn deferred(
        method: ApiMethod,
        reply: impl Future<Output = Result<Reply>> + Send + 'static,
    ) -> Self {
        Self {
            method,
            state: PendingState::Deferred(Box::pin(reply)),
        }
    }

    pub(crate) fn spawned(method: ApiMethod, handle: JoinHandle<Result<Reply>>) -> Self {
        Self {
            method,
            state: PendingState::Spawned(handle),
        }
    }

    pub fn method(&self) -> ApiMethod {
        self.method
    }

    pub fn is_finished(&self) -> bool {
        match &self.state {
            PendingState::Ready(_) => true,
            PendingState::Deferred(_) => false,
            PendingState::Spawned(handle) => handle.is_finished(),
        }
    }

    /// Cancels a spawned request. A deferred request is cancelled by
    /// dropping the handle; a resolved one is left untouched.
    pub fn abort(&self) {
        if let PendingState::Spawned(handle) = &self.state {
            handle.abort();
        }
    }

    pub async fn wait(self) -> Result<Reply> {
        match self.state {
            PendingState::Ready(reply) => reply,
            PendingState::Deferred(reply) => reply.await,
            PendingState::Spawned(handle) => handle
                .await
                .map_err(|e| Error::Task(format!("{} request: {}", self.method, e)))?,
        }
    }

    /// Waits for the reply and parses it
    pub async fn data(self) -> Result<ResponseValue> {
        self.wait().await?.parse()
    }
}

impl IntoFuture for PendingReply {
    type Output = Result<ResponseValue>;
    type IntoFuture = Pin<Box<dyn Future<Output = Result<ResponseValue>> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.data())
    }
}

impl std::fmt::Debug for PendingReply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingReply")
            .field("method", &self.method)
            .field("finished", &self.is_finished())
            .finish()
    }
}
