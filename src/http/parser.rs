use crate::http::latin1;
use crate::http::request::{Method, Request};
use std::collections::HashMap;
use thiserror::Error;

pub const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The request line did not split into method, target and version.
    #[error("malformed request line: {0:?}")]
    MalformedRequest(String),
}

/// Parses a buffered request head.
///
/// The buffer does not need to contain the header terminator: a peer that
/// closes early still gets whatever it sent parsed. Header lines without a
/// colon are skipped and parsing stops at the first empty line.
pub fn parse_http_request(buf: &[u8]) -> Result<Request, ParseError> {
    let text = latin1::decode(buf);
    let mut lines = text.split("\r\n");

    // Request line
    let request_line = lines.next().unwrap_or_default();
    let parts: Vec<&str> = request_line
        .split(is_token_separator)
        .filter(|part| !part.is_empty())
        .collect();

    let &[method, target, version] = parts.as_slice() else {
        return Err(ParseError::MalformedRequest(request_line.to_string()));
    };

    // Headers
    let mut headers = HashMap::new();

    for line in lines {
        if line.is_empty() {
            break;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };

        headers.insert(
            key.trim().to_string(),
            value.trim().to_string(),
        );
    }

    Ok(Request {
        method: Method::parse(method),
        target: target.to_string(),
        version: version.to_string(),
        headers,
    })
}

/// Unicode whitespace plus the ASCII information separators 0x1C-0x1F.
fn is_token_separator(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}

pub fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(HEADER_TERMINATOR.len())
        .position(|w| w == HEADER_TERMINATOR)
}
