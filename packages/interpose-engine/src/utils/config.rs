// packages/interpose-engine/src/utils/config.rs
//! Engine configuration
//!
//! Loaded from an optional `interpose.{yaml,toml,json}` file in the working
//! directory, overridden by `INTERPOSE__*` environment variables
//! (e.g. `INTERPOSE__OBSERVER__LEVEL=debug`).

use crate::utils::errors::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default before/after observers
    pub observer: ObserverConfig,

    /// Tracing subscriber setup
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Load configuration from the working directory and environment
    pub fn load() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("interpose").required(false))
            .add_source(
                config::Environment::with_prefix("INTERPOSE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

/// Level at which default observers report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportLevel {
    Trace,
    Debug,
    Info,
}

/// Settings for the default before/after observers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    pub level: ReportLevel,

    /// Report call arguments (before observer)
    pub show_args: bool,

    /// Report return values (after observer)
    pub show_return: bool,

    /// Prefix the call line with a local timestamp
    pub timestamps: bool,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            level: ReportLevel::Info,
            show_args: true,
            show_return: true,
            timestamps: true,
        }
    }
}

/// Tracing subscriber settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "interpose_engine=info".to_string(),
            json: false,
        }
    }
}
