//! # agent-settings
//!
//! A validated, hierarchical settings object model for an instrumentation
//! agent. Every property checks the type of each value written to it,
//! normalizes units, and commits either to the settings object itself or to a
//! shared record read by the instrumentation runtime.
//!
//! ## Features
//!
//! - **Typed Properties**: Each property has its own getter and validating setter
//! - **Unit Normalization**: Thresholds are public in seconds, stored in microseconds
//! - **Sentinel Threshold**: `transaction_threshold` is `None` while derived from apdex
//! - **Shared State**: Runtime-facing fields live in one lock-guarded, injectable record
//! - **Singleton**: [`settings()`] returns the same process-wide tree on every call
//! - **Change Events**: Listeners and validators per property path
//! - **Environment Overrides**: Initial values can be overridden by `{PREFIX}_*` variables
//!
//! ## Quick Start
//!
//! ```rust
//! use agent_settings::settings;
//!
//! let settings = settings();
//! settings.set_app_name("checkout")?;
//! settings.set_log_level(agent_settings::LOG_DEBUG)?;
//!
//! let tracer = settings.transaction_tracer();
//! tracer.set_transaction_threshold(2.5)?;
//! tracer.set_stack_trace_threshold(-1.0)?; // clamps to 0
//!
//! assert_eq!(tracer.transaction_threshold(), Some(2.5));
//! assert_eq!(tracer.stack_trace_threshold(), 0.0);
//! # Ok::<(), agent_settings::Error>(())
//! ```
//!
//! ## Errors
//!
//! Writes fail with a type error ([`ErrorKind::Type`]) for a value of the wrong
//! shape or for a deletion, and with a value error ([`ErrorKind::Value`]) when
//! `log_level` is out of range. A failed write leaves the previous value intact.
//!
//! ```rust
//! use agent_settings::{Settings, SettingsGroup};
//!
//! let settings = Settings::new();
//! assert!(settings.set_ignored_params("password").unwrap_err().is_type_error());
//! assert!(settings.set_log_level(99).unwrap_err().is_value_error());
//! assert!(settings.delete("log_level").unwrap_err().is_type_error());
//! ```
//!
//! ## Isolated Trees
//!
//! Tests and embedders can build trees over their own shared record instead of
//! the singleton:
//!
//! ```rust
//! use agent_settings::{Settings, SettingsConfig, SharedSettings};
//!
//! let shared = SharedSettings::new();
//! let a = Settings::with_shared(SettingsConfig::default(), shared.clone())?;
//! let b = Settings::with_shared(SettingsConfig::default(), shared)?;
//!
//! a.set_app_name("orders")?;
//! a.set_monitor_mode(false)?;
//!
//! assert_eq!(b.app_name().as_deref(), Some("orders")); // shared
//! assert!(b.monitor_mode()); // object-local
//! # Ok::<(), agent_settings::Error>(())
//! ```

mod error;
mod error_collector;
mod events;
mod global;
mod group;
mod settings;
mod snapshot;
mod tracer;

pub mod config;
pub mod state;
pub mod value;

pub use error::{Error, ErrorKind, Result};
pub use error_collector::{ErrorsFlagBinding, ErrorsSettings};
pub use events::{ChangeCallback, EventManager, Validator};
pub use global::{init_settings, settings, try_settings};
pub use group::SettingsGroup;
pub use settings::Settings;
pub use snapshot::{ErrorsSnapshot, SettingsSnapshot, TracerSnapshot};
pub use tracer::{TracerSettings, TransactionThreshold};

pub use config::{
    DefaultEnvSource, EnvSource, PropertyMetadata, PropertyScope, PropertyType, SettingsConfig,
    SettingsConfigBuilder, Unit,
};

pub use state::{
    LOG_DEBUG, LOG_DUMP, LOG_ERROR, LOG_INFO, LOG_VERBOSE, LOG_VERBOSEDEBUG, LOG_WARNING,
    RECORD_SQL_OBFUSCATED, RECORD_SQL_OFF, RECORD_SQL_RAW, SharedSettings, SharedState,
};
