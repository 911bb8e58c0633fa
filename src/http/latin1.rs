//! ISO-8859-1 text codec for the request head and response headers.
//!
//! Every byte maps to the code point of the same value, so decoding never
//! fails and arbitrary header bytes survive unchanged.

use thiserror::Error;

/// A character that has no single-byte representation.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("character {ch:?} at index {index} cannot be encoded as ISO-8859-1")]
pub struct EncodeError {
    pub ch: char,
    pub index: usize,
}

pub fn decode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

pub fn encode(text: &str) -> Result<Vec<u8>, EncodeError> {
    text.chars()
        .enumerate()
        .map(|(index, ch)| u8::try_from(u32::from(ch)).map_err(|_| EncodeError { ch, index }))
        .collect()
}
