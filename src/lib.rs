//! getserver - asynchronous static GET server
//!
//! Core library: request framing, path resolution, response formulation and
//! the per-connection state machine.

pub mod config;
pub mod error;
pub mod http;
pub mod server;
