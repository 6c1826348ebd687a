//! Error types for the Smoozik client

use std::fmt;

/// Result type alias for Smoozik operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error codes reported by the Smoozik service.
///
/// `ServerUnreachable` and `ParseError` never come from the server: they are
/// raised locally when no usable reply could be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ServerUnreachable,
    ParseError,
    NoError,
    ServiceFailed,
    InvalidMethod,
    AuthenticationFailed,
    AuthenticationRequired,
    InvalidApiKey,
    InvalidSignature,
    ParameterMissing,
    InvalidFormat,
    AccessRestricted,
    InvalidSessionKey,
    InvalidPartyId,
    PartyDoesNotExist,
    InvalidCommand,
    TrackNotInParty,
    UsernameAlreadyInUse,
    MailAddressAlreadyInUse,
    InvalidMailAddress,
    PartyHasNoTrack,
    SubscriptionOver,
    CannotParseSentData,
    /// A code the client does not know about
    Unknown(i32),
}

impl ErrorCode {
    /// Numeric value as sent on the wire
    pub fn code(&self) -> i32 {
        match self {
            ErrorCode::ServerUnreachable => -2,
            ErrorCode::ParseError => -1,
            ErrorCode::NoError => 0,
            ErrorCode::ServiceFailed => 1,
            ErrorCode::InvalidMethod => 2,
            ErrorCode::AuthenticationFailed => 3,
            ErrorCode::AuthenticationRequired => 4,
            ErrorCode::InvalidApiKey => 5,
            ErrorCode::InvalidSignature => 6,
            ErrorCode::ParameterMissing => 7,
            ErrorCode::InvalidFormat => 8,
            ErrorCode::AccessRestricted => 9,
            ErrorCode::InvalidSessionKey => 10,
            ErrorCode::InvalidPartyId => 11,
            ErrorCode::PartyDoesNotExist => 12,
            ErrorCode::InvalidCommand => 13,
            ErrorCode::TrackNotInParty => 14,
            ErrorCode::UsernameAlreadyInUse => 15,
            ErrorCode::MailAddressAlreadyInUse => 16,
            ErrorCode::InvalidMailAddress => 17,
            ErrorCode::PartyHasNoTrack => 18,
            ErrorCode::SubscriptionOver => 19,
            ErrorCode::CannotParseSentData => 20,
            ErrorCode::Unknown(code) => *code,
        }
    }

    pub fn from_code(code: i32) -> Self {
        match code {
            -2 => ErrorCode::ServerUnreachable,
            -1 => ErrorCode::ParseError,
            0 => ErrorCode::NoError,
            1 => ErrorCode::ServiceFailed,
            2 => ErrorCode::InvalidMethod,
            3 => ErrorCode::AuthenticationFailed,
            4 => ErrorCode::AuthenticationRequired,
            5 => ErrorCode::InvalidApiKey,
            6 => ErrorCode::InvalidSignature,
            7 => ErrorCode::ParameterMissing,
            8 => ErrorCode::InvalidFormat,
            9 => ErrorCode::AccessRestricted,
            10 => ErrorCode::InvalidSessionKey,
            11 => ErrorCode::InvalidPartyId,
            12 => ErrorCode::PartyDoesNotExist,
            13 => ErrorCode::InvalidCommand,
            14 => ErrorCode::TrackNotInParty,
            15 => ErrorCode::UsernameAlreadyInUse,
            16 => ErrorCode::MailAddressAlreadyInUse,
            17 => ErrorCode::InvalidMailAddress,
            18 => ErrorCode::PartyHasNoTrack,
            19 => ErrorCode::SubscriptionOver,
            20 => ErrorCode::CannotParseSentData,
            other => ErrorCode::Unknown(other),
        }
    }

    /// Whether the code asks the caller to (re)authenticate
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::AuthenticationFailed
                | ErrorCode::AuthenticationRequired
                | ErrorCode::InvalidSessionKey
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Unknown(code) => write!(f, "Unknown({})", code),
            other => write!(f, "{:?}({})", other, other.code()),
        }
    }
}

impl From<i32> for ErrorCode {
    fn from(code: i32) -> Self {
        Self::from_code(code)
    }
}

/// Errors that can occur when using the Smoozik client
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Nothing usable came back from the server
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),

    /// Reply could not be parsed or lacks an envelope element
    #[error("Parse error: {0}")]
    Parse(String),

    /// The service answered with `status = failed`
    #[error("API error {code}: {message}")]
    Api { code: ErrorCode, message: String },

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// XML serialization failed
    #[error("XML write error: {0}")]
    Xml(#[from] xmltree::Error),

    /// YAML configuration could not be read
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Background request task failed
    #[error("Request task failed: {0}")]
    Task(String),
}

impl Error {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn unreachable(msg: impl Into<String>) -> Self {
        Self::ServerUnreachable(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an application error from a raw server code
    pub fn api(code: i32, message: impl Into<String>) -> Self {
        Self::Api {
            code: ErrorCode::from_code(code),
            message: message.into(),
        }
    }

    /// Smoozik error code carried by (or attributed to) this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::ServerUnreachable(_) | Error::Http(_) | Error::Task(_) => {
                ErrorCode::ServerUnreachable
            }
            Error::Parse(_) | Error::Xml(_) => ErrorCode::ParseError,
            Error::Api { code, .. } => *code,
            Error::InvalidUrl(_) | Error::Yaml(_) | Error::Io(_) | Error::Config(_) => {
                ErrorCode::ServiceFailed
            }
        }
    }

    pub fn is_server_unreachable(&self) -> bool {
        self.code() == ErrorCode::ServerUnreachable
    }

    pub fn is_parse_error(&self) -> bool {
        self.code() == ErrorCode::ParseError
    }

    pub fn is_auth_error(&self) -> bool {
        self.code().is_auth_error()
    }
}
