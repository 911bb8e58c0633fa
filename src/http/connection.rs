use std::sync::Arc;
use std::time::Duration;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::ServeError;
use crate::http::parser::{find_headers_end, parse_http_request};
use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};
use crate::http::writer::ResponseWriter;
use crate::static_files::{Resolution, StaticFiles};

/// Bytes requested from the transport per read.
pub const READ_CHUNK: usize = 1024;

/// Default cap on the buffered request head.
pub const DEFAULT_MAX_REQUEST_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, Copy)]
pub struct ConnectionOptions {
    pub max_request_bytes: usize,
    /// `None` waits on the peer indefinitely.
    pub read_timeout: Option<Duration>,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
            read_timeout: None,
        }
    }
}

/// One request/response exchange over a single transport.
pub struct Connection<S> {
    stream: S,
    buffer: BytesMut,
    state: ConnectionState,
    files: Arc<StaticFiles>,
    options: ConnectionOptions,
}

pub enum ConnectionState {
    Reading,
    Parsed(Request),
    Resolving(Request),
    NotFound,
    InternalError(ServeError),
    Responding(Response),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, files: Arc<StaticFiles>) -> Self {
        Self::with_options(stream, files, ConnectionOptions::default())
    }

    pub fn with_options(stream: S, files: Arc<StaticFiles>, options: ConnectionOptions) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(READ_CHUNK),
            state: ConnectionState::Reading,
            files,
            options,
        }
    }

    /// Drives the connection to `Closed`.
    ///
    /// The transport is shut down and dropped on every path, including a
    /// failed write, which is the only error returned.
    pub async fn run(mut self) -> anyhow::Result<()> {
        let result = self.drive().await;

        if let Err(e) = self.stream.shutdown().await {
            tracing::debug!(error = %e, "Shutdown after response failed");
        }

        result
    }

    async fn drive(&mut self) -> anyhow::Result<()> {
        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Closed);

            self.state = match state {
                ConnectionState::Reading => match self.read_request().await {
                    Ok(req) => ConnectionState::Parsed(req),
                    Err(e) => ConnectionState::InternalError(e),
                },

                ConnectionState::Parsed(req) => {
                    tracing::info!(
                        method = %req.method,
                        path = %req.target,
                        version = %req.version,
                        "Request received"
                    );

                    if req.is_get() {
                        ConnectionState::Resolving(req)
                    } else {
                        ConnectionState::Responding(Response::method_not_allowed())
                    }
                }

                ConnectionState::Resolving(req) => match self.files.resolve(&req.target) {
                    Resolution::Serve(path) => match self.files.serve_file(&path).await {
                        Ok(response) => ConnectionState::Responding(response),
                        Err(e) => ConnectionState::InternalError(e),
                    },
                    Resolution::NotFound | Resolution::Forbidden => ConnectionState::NotFound,
                    Resolution::Invalid(e) => ConnectionState::InternalError(e.into()),
                },

                ConnectionState::NotFound => ConnectionState::Responding(
                    self.files.error_response(StatusCode::NotFound).await,
                ),

                ConnectionState::InternalError(e) => {
                    tracing::error!(error = %e, "Request failed");
                    ConnectionState::Responding(
                        self.files
                            .error_response(StatusCode::InternalServerError)
                            .await,
                    )
                }

                ConnectionState::Responding(response) => {
                    match ResponseWriter::new(&response) {
                        Ok(mut writer) => {
                            writer.write_to_stream(&mut self.stream).await?;

                            tracing::info!(
                                status = response.status.as_u16(),
                                bytes = writer.len(),
                                "Response sent"
                            );
                            ConnectionState::Closed
                        }
                        // Built-in 500 pages are plain ASCII; give up rather than loop.
                        Err(e) if response.status == StatusCode::InternalServerError => {
                            return Err(e.into());
                        }
                        Err(e) => ConnectionState::InternalError(e.into()),
                    }
                }

                ConnectionState::Closed => {
                    break;
                }
            };
        }

        Ok(())
    }

    /// Buffers the request head and parses it.
    pub async fn read_request(&mut self) -> Result<Request, ServeError> {
        match self.options.read_timeout {
            Some(limit) => tokio::time::timeout(limit, self.fill_buffer())
                .await
                .map_err(|_| ServeError::ReadTimeout(limit))??,
            None => self.fill_buffer().await?,
        }

        Ok(parse_http_request(&self.buffer)?)
    }

    /// Reads until the header terminator arrives or the peer stops sending.
    async fn fill_buffer(&mut self) -> Result<(), ServeError> {
        loop {
            if find_headers_end(&self.buffer).is_some() {
                return Ok(());
            }

            if self.buffer.len() > self.options.max_request_bytes {
                return Err(ServeError::RequestTooLarge {
                    limit: self.options.max_request_bytes,
                });
            }

            let mut chunk = [0u8; READ_CHUNK];
            let n = self.stream.read(&mut chunk).await?;

            if n == 0 {
                // Peer closed early: parse whatever arrived.
                return Ok(());
            }

            self.buffer.extend_from_slice(&chunk[..n]);
        }
    }
}
