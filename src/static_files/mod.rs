//! Static file serving
//!
//! This module turns request targets into files under the site root and
//! files (or their absence) into responses.

pub mod handler;
pub mod resolver;

pub use handler::StaticFiles;
pub use resolver::{PathResolver, Resolution, ResolveError};
