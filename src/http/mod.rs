//! HTTP protocol implementation.
//!
//! This module implements the HTTP/1.1 subset the server speaks: one GET
//! request per connection, answered and then closed.
//!
//! # Architecture
//!
//! The HTTP layer is organized into several submodules:
//!
//! - **`connection`**: The connection handler implementing the request-response state machine
//! - **`parser`**: Parses the buffered request head
//! - **`request`**: HTTP request representation
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes and writes HTTP responses to the client
//! - **`mime`**: Content-Type lookup based on file extensions
//! - **`latin1`**: Single-byte text codec used for the request head and response headers
//!
//! # Connection State Machine
//!
//! Each client connection goes through a state machine:
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Buffer until \r\n\r\n or EOF
//!        └──────┬──────┘
//!               │ Request line parsed
//!               ▼
//!        ┌──────────────────┐
//!        │     Parsed       │ ── not GET ──────────────┐
//!        └──────┬───────────┘                          │
//!               │ GET                                  │
//!               ▼                                      │
//!        ┌──────────────────┐                          │
//!        │    Resolving     │ ── NotFound ─────► 404   │
//!        └──────┬───────────┘ ── InternalError ► 500   │
//!               │ File read                     │      │
//!               ▼                               ▼      ▼
//!        ┌──────────────────────────────────────────────┐
//!        │                  Responding                  │
//!        └──────┬───────────────────────────────────────┘
//!               │ Response written (or write failed)
//!               ▼
//!            Closed
//! ```
//!
//! Any failure while reading or parsing also takes the 500 exit.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use statik::http::connection::Connection;
//! use statik::static_files::StaticFiles;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let files = Arc::new(StaticFiles::new("/srv/www"));
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let files = files.clone();
//!         tokio::spawn(async move {
//!             if let Err(e) = Connection::new(socket, files).run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod request;
pub mod response;
pub mod parser;
pub mod connection;
pub mod writer;
pub mod mime;
pub mod latin1;
