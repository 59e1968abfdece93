//! Common test utilities for agent-settings integration tests
//!
//! Provides shared fixtures, an event recorder and helper functions.

#![allow(dead_code)]

use agent_settings::{Settings, SettingsConfig, SharedSettings};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Install a test logger once per binary
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// =============================================================================
// Test Fixture
// =============================================================================

/// An isolated settings tree over its own shared record
pub struct TestFixture {
    pub settings: Settings,
    pub shared: SharedSettings,
}

impl TestFixture {
    /// Tree built from the default config
    pub fn new() -> Self {
        Self::with_config(SettingsConfig::default())
    }

    /// Tree built from a custom config
    pub fn with_config(config: SettingsConfig) -> Self {
        init_logging();
        let shared = SharedSettings::new();
        let settings = Settings::with_shared(config, shared.clone()).unwrap();
        Self { settings, shared }
    }

    /// A second tree over the same shared record
    pub fn sibling(&self) -> Settings {
        Settings::with_shared(SettingsConfig::default(), self.shared.clone()).unwrap()
    }
}

// =============================================================================
// Event Recorder
// =============================================================================

/// Records every change notification of a tree
#[derive(Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<(String, Value, Value)>>>,
}

impl Recorder {
    pub fn attach(settings: &Settings) -> Self {
        let recorder = Self::default();
        let sink = recorder.events.clone();
        settings.events().on_change(move |key, old, new| {
            sink.lock().push((key.to_string(), old.clone(), new.clone()));
        });
        recorder
    }

    pub fn events(&self) -> Vec<(String, Value, Value)> {
        self.events.lock().clone()
    }

    pub fn keys(&self) -> Vec<String> {
        self.events.lock().iter().map(|(k, _, _)| k.clone()).collect()
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Map-backed environment for override tests
pub fn env(vars: &[(&str, &str)]) -> HashMap<String, String> {
    vars.iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Config reading overrides with the `AGENT` prefix from `vars`
pub fn env_config(vars: &[(&str, &str)]) -> SettingsConfig {
    SettingsConfig::builder()
        .with_env_prefix("AGENT")
        .with_env_source(env(vars))
        .build()
}
