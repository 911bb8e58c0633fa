//! Statik - Static File Server
//!
//! Core library: request parsing, safe path resolution under a root
//! directory, and response construction.

pub mod config;
pub mod error;
pub mod http;
pub mod server;
pub mod static_files;
