//! Configuration types
//!
//! This module contains:
//! - `SettingsConfig` - Initial values and options for building a settings tree
//! - `PropertyMetadata` - Catalog entries describing each property
//! - `EnvSource` - Pluggable environment lookup for overrides

pub(crate) mod env;
mod schema;
mod types;

pub use schema::{PropertyMetadata, PropertyScope, PropertyType, Unit};

pub use types::{DefaultEnvSource, EnvSource, SettingsConfig, SettingsConfigBuilder};
