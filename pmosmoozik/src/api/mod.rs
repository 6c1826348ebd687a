//! Smoozik API client
//!
//! [`SmoozikApi`] owns the session (API key, secret, session key, reply
//! format) and turns [`ApiRequest`]s into signed HTTP calls. Typed
//! operations live in [`auth`], [`party`] and [`tracks`]; they return a
//! [`PendingReply`] that resolves to the reply's `data` when awaited.
//!
//! # Example
//!
//! ```no_run
//! use pmosmoozik::{SmoozikApi, Track};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut api = SmoozikApi::builder()
//!         .api_key("my-api-key")
//!         .secret("my-secret")
//!         .build()?;
//!
//!     api.login("user", "password").await?;
//!     api.start_party().await?;
//!     api.set_track(&Track::new("1", "So What").with_artist("Miles Davis"), 0)
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod party;
pub mod reply;
pub mod request;
pub mod signing;
pub mod tracks;

pub use reply::{PendingReply, Reply};
pub use request::{ApiMethod, ApiRequest, DEFAULT_RETRIEVE};

use crate::config::SmoozikConfig;
use crate::error::{Error, Result};
use crate::parser::{ArrayDetection, ResponseFormat};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use signing::{SIG_PARAM, encode_params, signature};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Default Smoozik API base URL
pub const DEFAULT_BASE_URL: &str = "https://www.smoozik.com/index.php/api/";

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default User-Agent
pub const DEFAULT_USER_AGENT: &str = "PMOMusic/0.1.0 (pmosmoozik)";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A request ready to be sent: signed, encoded and bound to its URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub method: ApiMethod,
    /// Endpoint URL, GET parameters included
    pub url: Url,
    /// URL-encoded POST body, `sig` included
    pub body: String,
}

/// Smoozik API client
#[derive(Clone)]
pub struct SmoozikApi {
    client: Client,
    base_url: Url,
    api_key: String,
    secret: String,
    session_key: Option<String>,
    format: ResponseFormat,
    blocking: bool,
    detection: ArrayDetection,
}

impl SmoozikApi {
    /// Create a client with default settings
    pub fn new(api_key: impl Into<String>, secret: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).secret(secret).build()
    }

    /// Create a builder for configuring the client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a client from a loaded configuration
    pub fn from_config(config: &SmoozikConfig) -> Result<Self> {
        config.validate()?;

        Self::builder()
            .api_key(&config.api_key)
            .secret(&config.secret)
            .base_url(&config.base_url)
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .format(config.format)
            .blocking(config.blocking)
            .array_detection(config.array_detection)
            .build()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Session key obtained at login, if any
    pub fn session_key(&self) -> Option<&str> {
        self.session_key.as_deref()
    }

    pub fn set_session_key(&mut self, session_key: Option<String>) {
        self.session_key = session_key.filter(|k| !k.is_empty());
    }

    pub fn is_authenticated(&self) -> bool {
        self.session_key.is_some()
    }

    pub fn format(&self) -> ResponseFormat {
        self.format
    }

    pub fn set_format(&mut self, format: ResponseFormat) {
        self.format = format;
    }

    /// Whether [`SmoozikApi::request`] waits for the reply before returning.
    ///
    /// When false, [`SmoozikApi::submit`] and the typed operations return
    /// while the request is still in flight.
    pub fn is_blocking(&self) -> bool {
        self.blocking
    }

    pub fn set_blocking(&mut self, blocking: bool) {
        self.blocking = blocking;
    }

    pub fn array_detection(&self) -> ArrayDetection {
        self.detection
    }

    pub fn set_array_detection(&mut self, detection: ArrayDetection) {
        self.detection = detection;
    }

    /// Adds the session parameters to `request`, signs it and encodes it
    pub fn prepare(&self, request: &ApiRequest) -> Result<SignedRequest> {
        let mut get = request.get_params().clone();
        get.insert("format".to_string(), self.format.as_str().to_string());

        let mut post = request.post_params().clone();
        post.insert("apiKey".to_string(), self.api_key.clone());
        post.insert(
            "sessionKey".to_string(),
            self.session_key.clone().unwrap_or_default(),
        );

        let sig = signature(&get, &post, &self.secret);
        post.insert(SIG_PARAM.to_string(), sig);

        let mut url = self.base_url.join(request.method().name())?;
        url.set_query(Some(&encode_params(&get)));

        Ok(SignedRequest {
            method: request.method(),
            url,
            body: encode_params(&post),
        })
    }

    /// Sends `request` and waits for the raw reply
    pub async fn execute(&self, request: &ApiRequest) -> Result<Reply> {
        let signed = self.prepare(request)?;
        send(self.client.clone(), signed, self.format, self.detection).await
    }

    /// Sends `request` on a background task and returns immediately.
    ///
    /// The request is signed before this returns, so later session changes
    /// do not affect it. Must be called from within a Tokio runtime.
    pub fn dispatch(&self, request: &ApiRequest) -> PendingReply {
        let method = request.method();
        match self.prepare(request) {
            Ok(signed) => {
                let client = self.client.clone();
                let format = self.format;
                let detection = self.detection;
                PendingReply::spawned(
                    method,
                    tokio::spawn(async move { send(client, signed, format, detection).await }),
                )
            }
            Err(e) => PendingReply::ready(method, Err(e)),
        }
    }

    /// Sends `request` following the blocking setting of the session
    pub async fn request(&self, request: &ApiRequest) -> PendingReply {
        if self.blocking {
            PendingReply::ready(request.method(), self.execute(request).await)
        } else {
            self.dispatch(request)
        }
    }

    /// Signs `request` and returns its handle without waiting for the reply.
    ///
    /// In non-blocking mode the request is already in flight on a Tokio task
    /// when this returns. In blocking mode it is sent once the handle is
    /// awaited. Typed operations are built on this, so `api.start_party()`
    /// hands back a [`PendingReply`] and `api.start_party().await` its data.
    pub fn submit(&self, request: &ApiRequest) -> PendingReply {
        if !self.blocking {
            return self.dispatch(request);
        }

        let method = request.method();
        match self.prepare(request) {
            Ok(signed) => PendingReply::deferred(
                method,
                send(self.client.clone(), signed, self.format, self.detection),
            ),
            Err(e) => PendingReply::ready(method, Err(e)),
        }
    }
}

impl fmt::Debug for SmoozikApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmoozikApi")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key)
            .field("authenticated", &self.is_authenticated())
            .field("format", &self.format)
            .field("blocking", &self.blocking)
            .field("detection", &self.detection)
            .finish()
    }
}

async fn send(
    client: Client,
    signed: SignedRequest,
    format: ResponseFormat,
    detection: ArrayDetection,
) -> Result<Reply> {
    debug!("POST {} ({})", signed.url.path(), signed.method);

    let response = client
        .post(signed.url)
        .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
        .body(signed.body)
        .send()
        .await
        .map_err(|e| Error::unreachable(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        warn!("Smoozik {} answered HTTP {}", signed.method, status);
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| Error::unreachable(e.to_string()))?;

    debug!("{} reply: {} bytes", signed.method, body.len());

    Ok(Reply::new(
        signed.method,
        status.as_u16(),
        format,
        detection,
        body.to_vec(),
    ))
}

/// Builder for [`SmoozikApi`]
pub struct ClientBuilder {
    client: Option<Client>,
    base_url: String,
    api_key: String,
    secret: String,
    session_key: Option<String>,
    timeout: Duration,
    user_agent: String,
    format: ResponseFormat,
    blocking: bool,
    detection: ArrayDetection,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            client: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            secret: String::new(),
            session_key: None,
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            format: ResponseFormat::default(),
            blocking: true,
            detection: ArrayDetection::default(),
        }
    }
}

impl ClientBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom HTTP client
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the API base URL (method names are appended to it)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = secret.into();
        self
    }

    /// Resume an existing session
    pub fn session_key(mut self, session_key: impl Into<String>) -> Self {
        self.session_key = Some(session_key.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }

    pub fn blocking(mut self, blocking: bool) -> Self {
        self.blocking = blocking;
        self
    }

    pub fn array_detection(mut self, detection: ArrayDetection) -> Self {
        self.detection = detection;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<SmoozikApi> {
        if self.api_key.is_empty() {
            return Err(Error::config("API key is required"));
        }

        let client = match self.client {
            Some(client) => client,
            None => Client::builder()
                .user_agent(&self.user_agent)
                .timeout(self.timeout)
                .build()?,
        };

        let mut base_url = self.base_url;
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(SmoozikApi {
            client,
            base_url: Url::parse(&base_url)?,
            api_key: self.api_key,
            secret: self.secret,
            session_key: self.session_key.filter(|k| !k.is_empty()),
            format: self.format,
            blocking: self.blocking,
            detection: self.detection,
        })
    }
}
