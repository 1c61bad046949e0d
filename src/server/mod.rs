//! Accept loop and connection bookkeeping.

pub mod access_log;
pub mod events;
pub mod listener;
pub mod registry;
