//! Minimal HTTP/1.x request parsing and response encoding
//!
//! Just enough HTTP for a single JSON endpoint: request line, a
//! `Content-Length` delimited body, and `Connection: close` responses.
//! Chunked transfer encoding is refused.

use core::fmt::Write;

use heapless::String;

/// Largest request (head + body) the server buffers
pub const MAX_REQUEST_SIZE: usize = 1024;

/// Largest encoded response
pub const MAX_RESPONSE_SIZE: usize = 256;

/// Request parsing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HttpError {
    /// Request line or headers are not valid HTTP/1.x
    Malformed,
    /// Transfer encoding other than identity
    UnsupportedEncoding,
    /// Request does not fit in `MAX_REQUEST_SIZE`
    TooLarge,
}

/// Request method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Other,
}

impl Method {
    fn parse(token: &str) -> Self {
        match token {
            "GET" => Method::Get,
            "HEAD" => Method::Head,
            "POST" => Method::Post,
            "PUT" => Method::Put,
            "DELETE" => Method::Delete,
            _ => Method::Other,
        }
    }
}

/// A parsed request borrowing from the receive buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request<'a> {
    pub method: Method,
    /// Path without query string
    pub path: &'a str,
    /// Body, if a non-zero `Content-Length` was sent
    pub body: Option<&'a [u8]>,
}

/// Result of feeding the receive buffer to the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parse<'a> {
    /// A full request is buffered
    Complete(Request<'a>),
    /// More bytes are needed
    Incomplete,
}

/// Parse a request from the bytes received so far
pub fn parse_request(buf: &[u8]) -> Result<Parse<'_>, HttpError> {
    let head_end = match find_head_end(buf) {
        Some(end) => end,
        None if buf.len() >= MAX_REQUEST_SIZE => return Err(HttpError::TooLarge),
        None => return Ok(Parse::Incomplete),
    };

    let head = core::str::from_utf8(&buf[..head_end]).map_err(|_| HttpError::Malformed)?;
    let mut lines = head.split("\r\n");

    let request_line = lines.next().ok_or(HttpError::Malformed)?;
    let mut parts = request_line.split(' ').filter(|p| !p.is_empty());
    let method = parts.next().ok_or(HttpError::Malformed)?;
    let target = parts.next().ok_or(HttpError::Malformed)?;
    let version = parts.next().ok_or(HttpError::Malformed)?;
    if !version.starts_with("HTTP/1.") || parts.next().is_some() {
        return Err(HttpError::Malformed);
    }
    let path = target.split('?').next().unwrap_or(target);

    let mut content_length = 0usize;
    for line in lines {
        let (name, value) = line.split_once(':').ok_or(HttpError::Malformed)?;
        let name = name.trim();
        let value = value.trim();
        if name.eq_ignore_ascii_case("content-length") {
            content_length = value.parse().map_err(|_| HttpError::Malformed)?;
        } else if name.eq_ignore_ascii_case("transfer-encoding")
            && !value.eq_ignore_ascii_case("identity")
        {
            return Err(HttpError::UnsupportedEncoding);
        }
    }

    let body_start = head_end + 4;
    // Checked against the remaining room, so a hostile length cannot overflow
    if content_length > MAX_REQUEST_SIZE.saturating_sub(body_start) {
        return Err(HttpError::TooLarge);
    }
    let body_end = body_start + content_length;
    if buf.len() < body_end {
        return Ok(Parse::Incomplete);
    }

    let body = match content_length {
        0 => None,
        _ => Some(&buf[body_start..body_end]),
    };

    Ok(Parse::Complete(Request {
        method: Method::parse(method),
        path,
        body,
    }))
}

fn find_head_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

/// A JSON response with a static body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Response {
    pub status: u16,
    pub body: &'static str,
}

impl Response {
    /// Create a JSON response
    pub const fn json(status: u16, body: &'static str) -> Self {
        Self { status, body }
    }

    /// Reason phrase for the status code
    pub fn reason(&self) -> &'static str {
        match self.status {
            200 => "OK",
            400 => "Bad Request",
            404 => "Not Found",
            405 => "Method Not Allowed",
            413 => "Payload Too Large",
            503 => "Service Unavailable",
            _ => "Unknown",
        }
    }

    /// Encode status line, headers and body
    pub fn encode(&self) -> Result<String<MAX_RESPONSE_SIZE>, core::fmt::Error> {
        let mut out = String::new();
        write!(
            out,
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status,
            self.reason(),
            self.body.len(),
            self.body
        )?;
        Ok(out)
    }
}
