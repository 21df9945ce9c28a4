//! Text update endpoint (`POST /api/scroll`)
//!
//! Accepts `{"text": "<string>"}` and replaces the scrolling message.
//! Validation stops at the first failure, and a rejected request never
//! touches the message.

use serde_json::Value;

use super::http::Response;
use crate::message::{Message, MessageText, MESSAGE_CAPACITY};

/// Route served by this endpoint
pub const SCROLL_PATH: &str = "/api/scroll";

/// JSON field carrying the new text
pub const TEXT_FIELD: &str = "text";

/// Successful update
pub const UPDATED: Response = Response::json(
    200,
    r#"{"status":"success","message":"Text updated successfully"}"#,
);

/// Reasons a text update is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ApiError {
    /// Request had no (or an empty) body
    NoBody,
    /// Body is not valid JSON
    InvalidJson,
    /// No `text` field in the body
    MissingField,
    /// `text` is present but not a JSON string
    NotAString,
    /// `text` does not fit the message buffer
    TooLong,
}

impl ApiError {
    /// Human-readable message sent to the client
    pub fn message(&self) -> &'static str {
        match self {
            ApiError::NoBody => "No body in request",
            ApiError::InvalidJson => "Invalid JSON format",
            ApiError::MissingField => "Missing 'text' field",
            ApiError::NotAString => "'text' field must be a string",
            ApiError::TooLong => "Text too long",
        }
    }

    /// Response for this rejection
    pub fn response(&self) -> Response {
        let body = match self {
            ApiError::NoBody => r#"{"status":"error","message":"No body in request"}"#,
            ApiError::InvalidJson => r#"{"status":"error","message":"Invalid JSON format"}"#,
            ApiError::MissingField => r#"{"status":"error","message":"Missing 'text' field"}"#,
            ApiError::NotAString => {
                r#"{"status":"error","message":"'text' field must be a string"}"#
            }
            ApiError::TooLong => r#"{"status":"error","message":"Text too long"}"#,
        };
        Response::json(400, body)
    }
}

/// Validate a request body and extract the new text
pub fn parse_text_update(body: Option<&[u8]>) -> Result<MessageText, ApiError> {
    let body = match body {
        Some(body) if !body.is_empty() => body,
        _ => return Err(ApiError::NoBody),
    };

    let doc: Value = serde_json::from_slice(body).map_err(|e| {
        warn!("JSON parsing failed at {}:{}", e.line(), e.column());
        ApiError::InvalidJson
    })?;

    let field = doc.get(TEXT_FIELD).ok_or(ApiError::MissingField)?;
    let text = field.as_str().ok_or(ApiError::NotAString)?;

    if text.len() >= MESSAGE_CAPACITY {
        return Err(ApiError::TooLong);
    }
    MessageText::new(text).map_err(|_| ApiError::TooLong)
}

/// Handle a text update request against the shared message
///
/// `measure` returns the rendered pixel width of the new text.
pub fn update_text<F>(body: Option<&[u8]>, message: &mut Message, measure: F) -> Response
where
    F: FnOnce(&str) -> u16,
{
    match parse_text_update(body) {
        Ok(text) => {
            let width = measure(text.as_str());
            message.replace(text, width);
            info!("Text updated to: {}", message.text());
            UPDATED
        }
        Err(e) => {
            debug!("Rejected text update: {}", e);
            e.response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::mock_text_width;
    use proptest::prelude::*;

    fn message() -> Message {
        let text = MessageText::new("Hello, how are you?").unwrap();
        let width = mock_text_width(&text);
        let mut message = Message::new(text, width);
        message.advance(1000);
        message.advance(1000);
        message
    }

    fn post(body: &str, message: &mut Message) -> Response {
        update_text(Some(body.as_bytes()), message, mock_text_width)
    }

    #[test]
    fn test_success() {
        let mut msg = message();
        let resp = post(r#"{"text":"Sale today"}"#, &mut msg);

        assert_eq!(resp, UPDATED);
        assert_eq!(resp.status, 200);
        assert_eq!(msg.text(), "Sale today");
        assert_eq!(msg.pixel_width(), mock_text_width("Sale today"));
        assert_eq!(msg.scroll_offset(), 0);
    }

    #[test]
    fn test_error_mapping() {
        let cases: [(Option<&[u8]>, ApiError); 9] = [
            (None, ApiError::NoBody),
            (Some(b""), ApiError::NoBody),
            (Some(b"{\"text\":"), ApiError::InvalidJson),
            (Some(b"text=hello"), ApiError::InvalidJson),
            (Some(b"{\"message\":\"hi\"}"), ApiError::MissingField),
            (Some(b"[\"text\"]"), ApiError::MissingField),
            (Some(b"{\"text\":42}"), ApiError::NotAString),
            (Some(b"{\"text\":null}"), ApiError::NotAString),
            (Some(b"{\"text\":[\"a\"]}"), ApiError::NotAString),
        ];

        for (body, expected) in cases {
            let mut msg = message();
            let before = msg.clone();
            let resp = update_text(body, &mut msg, mock_text_width);
            assert_eq!(resp, expected.response(), "body {:?}", body);
            assert_eq!(resp.status, 400);
            assert_eq!(msg, before);
        }
    }

    #[test]
    fn test_exact_bodies() {
        let all = [
            ApiError::NoBody,
            ApiError::InvalidJson,
            ApiError::MissingField,
            ApiError::NotAString,
            ApiError::TooLong,
        ];
        for e in all {
            let expected = format!(r#"{{"status":"error","message":"{}"}}"#, e.message());
            assert_eq!(e.response().body, expected);
        }
        assert_eq!(
            UPDATED.body,
            r#"{"status":"success","message":"Text updated successfully"}"#
        );
    }

    #[test]
    fn test_length_boundary() {
        let mut msg = message();
        let ok = format!(r#"{{"text":"{}"}}"#, "x".repeat(254));
        assert_eq!(post(&ok, &mut msg), UPDATED);
        assert_eq!(msg.text().len(), 254);

        let too_long = format!(r#"{{"text":"{}"}}"#, "x".repeat(255));
        assert_eq!(post(&too_long, &mut msg), ApiError::TooLong.response());
        assert_eq!(msg.text().len(), 254);
    }

    #[test]
    fn test_length_counts_bytes_not_chars() {
        let mut msg = message();
        // 128 two-byte characters
        let body = format!(r#"{{"text":"{}"}}"#, "é".repeat(128));
        assert_eq!(post(&body, &mut msg), ApiError::TooLong.response());
    }

    #[test]
    fn test_empty_text_accepted() {
        let mut msg = message();
        assert_eq!(post(r#"{"text":""}"#, &mut msg), UPDATED);
        assert_eq!(msg.text(), "");
        assert_eq!(msg.pixel_width(), 0);
    }

    proptest! {
        #[test]
        fn prop_valid_text_accepted(text in "[ -~]{0,254}") {
            let mut msg = message();
            let body = serde_json::json!({ "text": text }).to_string();
            prop_assert_eq!(post(&body, &mut msg), UPDATED);
            prop_assert_eq!(msg.text(), text.as_str());
            prop_assert_eq!(msg.scroll_offset(), 0);
        }

        #[test]
        fn prop_long_text_rejected(text in "[a-z]{255,400}") {
            let mut msg = message();
            let before = msg.clone();
            let body = serde_json::json!({ "text": text }).to_string();
            prop_assert_eq!(post(&body, &mut msg), ApiError::TooLong.response());
            prop_assert_eq!(msg, before);
        }
    }
}
