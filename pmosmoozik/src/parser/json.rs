//! JSON reply parsing

use super::{Envelope, STATUS_FAILED, parse_code};
use crate::error::{Error, Result};
use crate::value::ResponseValue;
use serde_json::Value;

/// Converts a JSON value into a [`ResponseValue`].
///
/// Numbers and booleans become scalars holding their textual form; `null`
/// and empty strings become an empty mapping, like an empty XML element.
pub fn json_to_value(value: &Value) -> ResponseValue {
    match value {
        Value::Null => ResponseValue::empty(),
        Value::String(s) if s.is_empty() => ResponseValue::empty(),
        Value::String(s) => ResponseValue::Scalar(s.clone()),
        Value::Bool(b) => ResponseValue::Scalar(b.to_string()),
        Value::Number(n) => ResponseValue::Scalar(n.to_string()),
        Value::Array(items) => ResponseValue::Sequence(items.iter().map(json_to_value).collect()),
        Value::Object(map) => ResponseValue::Mapping(
            map.iter()
                .map(|(key, value)| (key.clone(), json_to_value(value)))
                .collect(),
        ),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub(super) fn parse_envelope(body: &[u8]) -> Result<Envelope> {
    let document: Value =
        serde_json::from_slice(body).map_err(|e| Error::parse(e.to_string()))?;

    // The envelope is either wrapped in a `smoozik` key or sits at the root
    let root = match document.get("smoozik") {
        Some(inner) if inner.is_object() => inner,
        _ if document.get("status").is_some() => &document,
        _ => return Err(Error::parse("smoozik element missing")),
    };

    let status = root
        .get("status")
        .ok_or_else(|| Error::parse("status element missing"))?;

    if scalar_text(status).trim() == STATUS_FAILED {
        let error = root
            .get("error")
            .ok_or_else(|| Error::parse("error element missing"))?;
        let code = error
            .get("code")
            .ok_or_else(|| Error::parse("code element missing"))?;
        let code = match code.as_i64() {
            Some(n) => i32::try_from(n)
                .map_err(|_| Error::parse(format!("invalid error code: {}", n)))?,
            None => parse_code(&scalar_text(code))?,
        };
        let message = error.get("message").map(scalar_text).unwrap_or_default();

        return Ok(Envelope::Failed { code, message });
    }

    let data = root
        .get("data")
        .ok_or_else(|| Error::parse("data element missing"))?;

    Ok(Envelope::Ok(json_to_value(data)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::parser::{ArrayDetection, ResponseFormat, parse_reply};
    use serde_json::json;

    fn parse(value: Value) -> Result<ResponseValue> {
        let body = serde_json::to_vec(&value).unwrap();
        parse_reply(&body, ResponseFormat::Json, ArrayDetection::default())
    }

    #[test]
    fn test_scalars() {
        assert_eq!(json_to_value(&json!("abc")), ResponseValue::scalar("abc"));
        assert_eq!(json_to_value(&json!(240)), ResponseValue::scalar("240"));
        assert_eq!(json_to_value(&json!(true)), ResponseValue::scalar("true"));
        assert_eq!(json_to_value(&json!(null)), ResponseValue::empty());
        assert_eq!(json_to_value(&json!("")), ResponseValue::empty());
    }

    #[test]
    fn test_wrapped_envelope() {
        let data = parse(json!({
            "smoozik": {
                "status": "ok",
                "data": { "sessionKey": "abc" }
            }
        }))
        .unwrap();
        assert_eq!(data["sessionKey"].as_str(), Some("abc"));
    }

    #[test]
    fn test_bare_envelope_with_list() {
        let data = parse(json!({
            "status": "ok",
            "data": {
                "tracks": [
                    { "track": { "id": 10, "localId": "1", "name": "a" } },
                    { "track": { "id": 11, "localId": "2", "name": "b" } }
                ]
            }
        }))
        .unwrap();
        assert_eq!(data["tracks"].len(), 2);
        assert_eq!(data["tracks"][0]["track"]["id"].as_str(), Some("10"));
    }

    #[test]
    fn test_failed_with_numeric_and_text_codes() {
        let err = parse(json!({
            "status": "failed",
            "error": { "code": 6, "message": "Invalid signature" }
        }))
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidSignature);

        let err = parse(json!({
            "smoozik": { "status": "failed", "error": { "code": "12" } }
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Api { code: ErrorCode::PartyDoesNotExist, ref message } if message.is_empty()
        ));
    }

    #[test]
    fn test_missing_elements() {
        let msg = |value: Value| match parse(value) {
            Err(Error::Parse(msg)) => msg,
            other => panic!("expected a parse error, got {:?}", other),
        };

        assert_eq!(msg(json!({ "foo": 1 })), "smoozik element missing");
        assert_eq!(msg(json!({ "smoozik": {} })), "status element missing");
        assert_eq!(msg(json!({ "status": "ok" })), "data element missing");
        assert_eq!(msg(json!({ "status": "failed" })), "error element missing");
        assert_eq!(
            msg(json!({ "status": "failed", "error": {} })),
            "code element missing"
        );
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_reply(b"{ nope", ResponseFormat::Json, ArrayDetection::default())
            .unwrap_err();
        assert!(err.is_parse_error());
    }
}
