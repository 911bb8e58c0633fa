//! TCP front end: binds the listen address and feeds accepted sockets to
//! the HTTP connection handler.

pub mod listener;
