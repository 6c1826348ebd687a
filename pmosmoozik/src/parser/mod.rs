//! Reply parsing
//!
//! Every Smoozik reply is wrapped in the same envelope:
//!
//! ```xml
//! <smoozik>
//!   <status>ok|failed</status>
//!   <error><code>N</code><message>text</message></error>   <!-- if failed -->
//!   <data>...</data>                                        <!-- if ok -->
//! </smoozik>
//! ```
//!
//! [`parse_reply`] checks that envelope and turns the `data` subtree into a
//! [`ResponseValue`]. A missing element is a parse error; a `failed` status
//! with a readable code is an application error ([`Error::Api`]).

pub mod json;
pub mod xml;

use crate::error::{Error, Result};
use crate::value::ResponseValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

pub use json::json_to_value;
pub use xml::{element_to_value, parse_xml_document};

/// Status value reporting an application error
pub const STATUS_FAILED: &str = "failed";

/// Message used when the reply body is empty
pub const SERVER_UNREACHABLE_MESSAGE: &str = "Could not reach server.";

/// Reply document format, sent as the `format` query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Xml,
    Json,
}

impl ResponseFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseFormat::Xml => "xml",
            ResponseFormat::Json => "json",
        }
    }
}

impl FromStr for ResponseFormat {
    type Err = Error;

    /// Case-insensitive, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xml" => Ok(ResponseFormat::Xml),
            "json" => Ok(ResponseFormat::Json),
            _ => Err(Error::config(format!("invalid format: {}", s))),
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the XML parser decides that an element holds a list.
///
/// With `SiblingRepetition`, only repeated child tags produce a list, so
/// `<tracks><track/></tracks>` becomes a map with a single `track` key.
/// `SiblingRepetitionOrPlural` also treats an element whose single child tag
/// is its own name minus a trailing `s` as a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrayDetection {
    SiblingRepetition,
    #[default]
    SiblingRepetitionOrPlural,
}

impl ArrayDetection {
    pub fn honors_plural(&self) -> bool {
        matches!(self, ArrayDetection::SiblingRepetitionOrPlural)
    }
}

/// Envelope fields extracted from a reply, before they are turned into a result
#[derive(Debug)]
pub(crate) enum Envelope {
    Ok(ResponseValue),
    Failed { code: i32, message: String },
}

impl Envelope {
    fn into_result(self) -> Result<ResponseValue> {
        match self {
            Envelope::Ok(data) => Ok(data),
            Envelope::Failed { code, message } => {
                warn!("Smoozik API error {}: {}", code, message);
                Err(Error::api(code, message))
            }
        }
    }
}

/// Parses a raw reply body and returns its `data` payload.
///
/// # Errors
///
/// * [`Error::ServerUnreachable`] when `body` is empty
/// * [`Error::Parse`] when the document is malformed or an envelope element
///   is missing
/// * [`Error::Api`] when the service reports `status = failed`
pub fn parse_reply(
    body: &[u8],
    format: ResponseFormat,
    detection: ArrayDetection,
) -> Result<ResponseValue> {
    if body.is_empty() {
        return Err(Error::unreachable(SERVER_UNREACHABLE_MESSAGE));
    }

    let envelope = match format {
        ResponseFormat::Xml => xml::parse_envelope(body, detection)?,
        ResponseFormat::Json => json::parse_envelope(body)?,
    };

    envelope.into_result()
}

fn parse_code(raw: &str) -> Result<i32> {
    raw.trim()
        .parse()
        .map_err(|_| Error::parse(format!("invalid error code: {:?}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn parse(body: &str) -> Result<ResponseValue> {
        parse_reply(body.as_bytes(), ResponseFormat::Xml, ArrayDetection::default())
    }

    fn parse_message(body: &str) -> String {
        match parse(body) {
            Err(Error::Parse(msg)) => msg,
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_body_is_unreachable() {
        let err = parse("").unwrap_err();
        assert!(err.is_server_unreachable());
        assert_eq!(err.to_string(), "Server unreachable: Could not reach server.");

        let err = parse_reply(b"", ResponseFormat::Json, ArrayDetection::default()).unwrap_err();
        assert!(err.is_server_unreachable());
    }

    #[test]
    fn test_malformed_document() {
        assert!(parse("<smoozik><status>").unwrap_err().is_parse_error());
        assert!(parse("not xml at all").unwrap_err().is_parse_error());
    }

    #[test]
    fn test_missing_elements() {
        assert_eq!(parse_message("<other/>"), "smoozik element missing");
        assert_eq!(parse_message("<smoozik></smoozik>"), "status element missing");
        assert_eq!(
            parse_message("<smoozik><status>ok</status></smoozik>"),
            "data element missing"
        );
        assert_eq!(
            parse_message("<smoozik><status>failed</status></smoozik>"),
            "error element missing"
        );
        assert_eq!(
            parse_message("<smoozik><status>failed</status><error><message>x</message></error></smoozik>"),
            "code element missing"
        );
    }

    #[test]
    fn test_failed_status() {
        let err = parse(
            "<smoozik><status>failed</status><error><code>3</code>\
             <message>Authentication Failed</message></error></smoozik>",
        )
        .unwrap_err();

        match err {
            Error::Api { code, message } => {
                assert_eq!(code, ErrorCode::AuthenticationFailed);
                assert_eq!(code.code(), 3);
                assert_eq!(message, "Authentication Failed");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_failed_without_message() {
        let err = parse(
            "<smoozik><status>failed</status><error><code>14</code></error></smoozik>",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Api { code: ErrorCode::TrackNotInParty, ref message } if message.is_empty()
        ));
    }

    #[test]
    fn test_non_integer_code() {
        let msg = parse_message(
            "<smoozik><status>failed</status><error><code>abc</code></error></smoozik>",
        );
        assert!(msg.starts_with("invalid error code"));
    }

    #[test]
    fn test_ok_with_empty_data() {
        let data = parse("<smoozik><status>ok</status><data></data></smoozik>").unwrap();
        assert!(data.is_mapping());
        assert!(data.is_empty());

        let data = parse("<smoozik><status>ok</status><data><xml></xml></data></smoozik>").unwrap();
        assert!(data["xml"].is_mapping());
        assert!(data["xml"].is_empty());
    }

    #[test]
    fn test_ok_with_payload() {
        let data = parse(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <smoozik>\n  <status>ok</status>\n  <data>\n    <sessionKey>abc123</sessionKey>\n  </data>\n</smoozik>",
        )
        .unwrap();
        assert_eq!(data["sessionKey"].as_str(), Some("abc123"));
    }

    #[test]
    fn test_format_names() {
        assert_eq!(ResponseFormat::Xml.as_str(), "xml");
        assert_eq!(ResponseFormat::Json.to_string(), "json");
        assert_eq!(" JSON ".parse::<ResponseFormat>().unwrap(), ResponseFormat::Json);
        assert_eq!("Xml".parse::<ResponseFormat>().unwrap(), ResponseFormat::Xml);
        assert!(matches!("yaml".parse::<ResponseFormat>(), Err(Error::Config(_))));
        assert_eq!(ResponseFormat::default(), ResponseFormat::Xml);
    }
}
