//! Process-wide settings singleton
//!
//! The root is built at most once per process, either lazily by the first
//! [`settings()`] call or eagerly by [`init_settings`]. It is never torn down or
//! replaced.

use crate::config::SettingsConfig;
use crate::error::{Error, Result};
use crate::settings::Settings;
use log::info;
use std::sync::OnceLock;

static SETTINGS: OnceLock<Settings> = OnceLock::new();

/// Get the process-wide settings, building a default tree on first use.
///
/// Every call returns the same instance.
pub fn settings() -> &'static Settings {
    SETTINGS.get_or_init(|| {
        info!("Creating process-wide settings with defaults");
        Settings::new()
    })
}

/// Build the process-wide settings from a config.
///
/// # Errors
///
/// Returns [`Error::AlreadyInitialized`] if the singleton already exists
/// (including when [`settings()`] was called first), or the error of the first
/// initial value the config fails to apply.
pub fn init_settings(config: SettingsConfig) -> Result<&'static Settings> {
    if SETTINGS.get().is_some() {
        return Err(Error::AlreadyInitialized);
    }
    let built = Settings::from_config(config)?;

    let mut installed = false;
    let instance = SETTINGS.get_or_init(|| {
        installed = true;
        built
    });
    if installed {
        info!("Initialized process-wide settings from config");
        Ok(instance)
    } else {
        Err(Error::AlreadyInitialized)
    }
}

/// Get the process-wide settings if they have been built
pub fn try_settings() -> Option<&'static Settings> {
    SETTINGS.get()
}
