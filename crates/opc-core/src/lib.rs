//! Core opc library (browser, providers, config).

pub mod browser;
pub mod config;
pub mod error;
pub mod logging;
pub mod provider;

pub use opc_types as types;
