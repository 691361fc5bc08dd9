//! CLI command handlers.

pub mod browse;
pub mod config;
pub mod io;
pub mod servers;
