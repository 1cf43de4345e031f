//! I/O helpers: config files and structured event logs.

pub mod config;
pub mod event_log;
