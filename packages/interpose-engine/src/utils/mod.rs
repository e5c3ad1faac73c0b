// packages/interpose-engine/src/utils/mod.rs
//! Common utilities: error types and configuration

pub mod config;
pub mod errors;

pub use config::{EngineConfig, LoggingConfig, ObserverConfig, ReportLevel};
pub use errors::{EngineError, Result};
