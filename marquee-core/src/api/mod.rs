//! HTTP API
//!
//! One route, `POST /api/scroll`. Transport is left to the caller: it feeds
//! received bytes to [`parse_request`] and writes back the encoded
//! [`Response`].

pub mod http;
pub mod scroll_text;

pub use http::{parse_request, HttpError, Method, Parse, Request, Response, MAX_REQUEST_SIZE};
pub use scroll_text::{parse_text_update, update_text, ApiError, SCROLL_PATH, UPDATED};

/// Unknown path
pub const NOT_FOUND: Response =
    Response::json(404, r#"{"status":"error","message":"Not found"}"#);

/// Known path, wrong method
pub const METHOD_NOT_ALLOWED: Response =
    Response::json(405, r#"{"status":"error","message":"Method not allowed"}"#);

/// Listener has not been activated
pub const NOT_READY: Response =
    Response::json(503, r#"{"status":"error","message":"Not ready"}"#);

/// Request could not be parsed as HTTP
pub const BAD_REQUEST: Response =
    Response::json(400, r#"{"status":"error","message":"Bad request"}"#);

/// Request exceeds the receive buffer
pub const PAYLOAD_TOO_LARGE: Response =
    Response::json(413, r#"{"status":"error","message":"Payload too large"}"#);

impl From<HttpError> for Response {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::TooLarge => PAYLOAD_TOO_LARGE,
            HttpError::Malformed | HttpError::UnsupportedEncoding => BAD_REQUEST,
        }
    }
}
