//! Failures that end a request with 500 Internal Server Error.
//!
//! "Not found" and "method not allowed" are normal outcomes and never show
//! up here.

use std::time::Duration;

use thiserror::Error;

use crate::http::latin1::EncodeError;
use crate::http::parser::ParseError;
use crate::static_files::resolver::ResolveError;

#[derive(Debug, Error)]
pub enum ServeError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("request head exceeds {limit} bytes")]
    RequestTooLarge { limit: usize },

    #[error("no complete request within {0:?}")]
    ReadTimeout(Duration),

    #[error("response header cannot be encoded: {0}")]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
