//! httpwire - HTTP/1.1 from the socket up
//!
//! Incremental request parser, ordered response writer and the
//! connection-per-task server that drives them.

pub mod config;
pub mod http;
pub mod server;
