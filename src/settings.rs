//! Root settings object
//!
//! [`Settings`] owns one [`TracerSettings`] and one [`ErrorsSettings`] and
//! exposes the agent-wide properties. `monitor_mode` and `ignored_params` are
//! local to the object; everything else it exposes directly lives in the
//! shared record.
//!
//! ```
//! use agent_settings::{Settings, SettingsGroup};
//! use serde_json::json;
//!
//! let settings = Settings::new();
//! settings.set_app_name("checkout")?;
//! settings.transaction_tracer().set_transaction_threshold(0.5)?;
//!
//! assert_eq!(settings.get("transaction_tracer.transaction_threshold")?, json!(0.5));
//! assert!(settings.delete("app_name").unwrap_err().is_type_error());
//! # Ok::<(), agent_settings::Error>(())
//! ```

use crate::config::env::EnvironmentHandler;
use crate::config::{PropertyMetadata, SettingsConfig};
use crate::error::{Error, Result};
use crate::error_collector::{ErrorsFlagBinding, ErrorsSettings};
use crate::events::EventManager;
use crate::group::{GroupContext, SettingsGroup, nested};
use crate::snapshot::SettingsSnapshot;
use crate::state::{LOG_LEVEL_RANGE, SharedSettings};
use crate::tracer::TracerSettings;
use crate::value::{expect_bool, expect_int, expect_list, expect_string};
use log::{info, warn};
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;

const TRANSACTION_TRACER: &str = "transaction_tracer";
const ERROR_COLLECTOR: &str = "error_collector";

/// Root of the settings tree
#[derive(Debug)]
pub struct Settings {
    ctx: GroupContext,
    monitor_mode: RwLock<bool>,
    ignored_params: RwLock<Vec<Value>>,
    transaction_tracer: TracerSettings,
    error_collector: ErrorsSettings,
}

impl Settings {
    /// Create a settings tree with default values over a fresh shared record.
    ///
    /// `monitor_mode` starts `true` and `ignored_params` starts empty.
    pub fn new() -> Self {
        Self::empty(SharedSettings::new(), ErrorsFlagBinding::default())
    }

    /// Build a settings tree from a config over a fresh shared record
    ///
    /// # Errors
    ///
    /// Returns the type or range error of the first initial value (or
    /// environment override) that a property rejects.
    ///
    /// # Example
    ///
    /// ```rust
    /// use agent_settings::{Settings, SettingsConfig, LOG_DEBUG};
    ///
    /// let config = SettingsConfig::builder()
    ///     .app_name("checkout")
    ///     .log_level(LOG_DEBUG)
    ///     .build();
    /// let settings = Settings::from_config(config)?;
    /// assert_eq!(settings.log_level(), LOG_DEBUG);
    /// # Ok::<(), agent_settings::Error>(())
    /// ```
    pub fn from_config(config: SettingsConfig) -> Result<Self> {
        Self::with_shared(config, SharedSettings::new())
    }

    /// Build a settings tree from a config over an existing shared record.
    ///
    /// The config's initial values are written into `shared`, so other trees
    /// over the same record observe them. Values are staged on a copy of the
    /// record and swapped in only after every one of them is accepted, so a
    /// failed build leaves `shared` untouched.
    ///
    /// # Errors
    ///
    /// See [`Settings::from_config`].
    pub fn with_shared(config: SettingsConfig, shared: SharedSettings) -> Result<Self> {
        let staging = SharedSettings::from_state(shared.snapshot());
        let mut settings = Self::empty(staging.clone(), config.errors_flag_binding);
        let env = EnvironmentHandler::new(config.env_prefix.clone(), config.env_source.clone());

        let mut values: Vec<(String, Value, bool)> = config
            .initial_values()
            .into_iter()
            .map(|(key, value)| (key, value, false))
            .collect();
        for meta in settings.properties() {
            if meta.read_only {
                continue;
            }
            let Some(value) = env.get_env_override(&meta.key, meta.property_type) else {
                continue;
            };
            info!("Setting {} overridden by environment", meta.key);
            match values.iter_mut().find(|(key, _, _)| *key == meta.key) {
                Some(slot) => *slot = (meta.key, value, true),
                None => values.push((meta.key, value, true)),
            }
        }

        for (key, value, from_env) in values {
            if let Err(e) = settings.set(&key, value) {
                if from_env {
                    warn!(
                        "Environment override {} rejected: {e}",
                        env.env_var_name(&key).unwrap_or_default()
                    );
                }
                return Err(e);
            }
        }

        *shared.write() = staging.snapshot();
        settings.attach(shared);

        info!("Initialized settings tree");
        Ok(settings)
    }

    /// Point the tree and its children at another shared record
    fn attach(&mut self, shared: SharedSettings) {
        self.transaction_tracer.attach(shared.clone());
        self.error_collector.attach(shared.clone());
        self.ctx.shared = shared;
    }

    fn empty(shared: SharedSettings, binding: ErrorsFlagBinding) -> Self {
        let ctx = GroupContext::new(shared, Arc::new(EventManager::new()), None);
        Self {
            transaction_tracer: TracerSettings::with_context(ctx.child(TRANSACTION_TRACER)),
            error_collector: ErrorsSettings::with_context(ctx.child(ERROR_COLLECTOR), binding),
            monitor_mode: RwLock::new(true),
            ignored_params: RwLock::new(Vec::new()),
            ctx,
        }
    }

    // =========================================================================
    // Children
    // =========================================================================

    /// The owned transaction tracer group
    pub fn transaction_tracer(&self) -> &TracerSettings {
        &self.transaction_tracer
    }

    /// The owned error collector group
    pub fn error_collector(&self) -> &ErrorsSettings {
        &self.error_collector
    }

    /// Shared record backing this tree
    pub fn shared(&self) -> &SharedSettings {
        &self.ctx.shared
    }

    /// Listeners and validators for this tree and its children
    pub fn events(&self) -> &EventManager {
        &self.ctx.events
    }

    // =========================================================================
    // app_name
    // =========================================================================

    pub fn app_name(&self) -> Option<String> {
        self.ctx.shared.read().app_name.clone()
    }

    /// # Errors
    ///
    /// [`Error::TypeMismatch`] unless `value` is a string.
    pub fn set_app_name(&self, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let name = expect_string("app_name", &value)?;
        self.ctx.check("app_name", &value)?;

        let old = self.ctx.shared.write().app_name.replace(name);
        self.ctx.committed("app_name", &Value::from(old), &value);
        Ok(())
    }

    // =========================================================================
    // monitor_mode
    // =========================================================================

    pub fn monitor_mode(&self) -> bool {
        *self.monitor_mode.read()
    }

    /// # Errors
    ///
    /// [`Error::TypeMismatch`] unless `value` is a bool.
    pub fn set_monitor_mode(&self, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let enabled = expect_bool("monitor_mode", &value)?;
        self.ctx.check("monitor_mode", &value)?;

        let old = std::mem::replace(&mut *self.monitor_mode.write(), enabled);
        self.ctx
            .committed("monitor_mode", &Value::Bool(old), &Value::Bool(enabled));
        Ok(())
    }

    // =========================================================================
    // log_file
    // =========================================================================

    pub fn log_file(&self) -> Option<String> {
        self.ctx.shared.read().log_file.clone()
    }

    /// # Errors
    ///
    /// [`Error::TypeMismatch`] unless `value` is a string.
    pub fn set_log_file(&self, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let path = expect_string("log_file", &value)?;
        self.ctx.check("log_file", &value)?;

        let old = self.ctx.shared.write().log_file.replace(path);
        self.ctx.committed("log_file", &Value::from(old), &value);
        Ok(())
    }

    // =========================================================================
    // log_level
    // =========================================================================

    pub fn log_level(&self) -> i64 {
        self.ctx.shared.read().log_level
    }

    /// Set the log level, which must lie in `LOG_ERROR..=LOG_VERBOSEDEBUG`.
    ///
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] unless `value` is an integer, and
    /// [`Error::OutOfRange`] for an integer outside the range.
    pub fn set_log_level(&self, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let level = expect_int("log_level", &value)?;
        if !LOG_LEVEL_RANGE.contains(&level) {
            return Err(Error::OutOfRange {
                key: "log_level".to_string(),
                value: level,
                min: *LOG_LEVEL_RANGE.start(),
                max: *LOG_LEVEL_RANGE.end(),
            });
        }
        self.ctx.check("log_level", &value)?;

        let old = std::mem::replace(&mut self.ctx.shared.write().log_level, level);
        self.ctx
            .committed("log_level", &Value::from(old), &Value::from(level));
        Ok(())
    }

    // =========================================================================
    // capture_params
    // =========================================================================

    pub fn capture_params(&self) -> bool {
        self.ctx.shared.read().enable_params != 0
    }

    /// # Errors
    ///
    /// [`Error::TypeMismatch`] unless `value` is a bool.
    pub fn set_capture_params(&self, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let enabled = expect_bool("capture_params", &value)?;
        self.ctx.check("capture_params", &value)?;

        let old = std::mem::replace(
            &mut self.ctx.shared.write().enable_params,
            i32::from(enabled),
        );
        self.ctx
            .committed("capture_params", &Value::Bool(old != 0), &Value::Bool(enabled));
        Ok(())
    }

    // =========================================================================
    // ignored_params
    // =========================================================================

    /// Request parameters never captured. Elements are whatever was assigned.
    pub fn ignored_params(&self) -> Vec<Value> {
        self.ignored_params.read().clone()
    }

    /// Replace the whole list. Element types are not checked.
    ///
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] unless `value` is a list.
    pub fn set_ignored_params(&self, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let params = expect_list("ignored_params", &value)?;
        self.ctx.check("ignored_params", &value)?;

        let old = std::mem::replace(&mut *self.ignored_params.write(), params);
        self.ctx
            .committed("ignored_params", &Value::Array(old), &value);
        Ok(())
    }

    /// Whether a string element of `ignored_params` equals `name`
    pub fn is_param_ignored(&self, name: &str) -> bool {
        self.ignored_params
            .read()
            .iter()
            .any(|p| p.as_str() == Some(name))
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    /// Current values of the whole tree in public units
    pub fn snapshot(&self) -> SettingsSnapshot {
        SettingsSnapshot {
            app_name: self.app_name(),
            monitor_mode: self.monitor_mode(),
            log_file: self.log_file(),
            log_level: self.log_level(),
            capture_params: self.capture_params(),
            ignored_params: self.ignored_params(),
            transaction_tracer: self.transaction_tracer.snapshot(),
            error_collector: self.error_collector.snapshot(),
        }
    }

    /// Current values of the whole tree as JSON
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be represented as JSON.
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self.snapshot()).map_err(|e| Error::Config(e.to_string()))
    }

    fn child(&self, name: &str) -> Option<&dyn SettingsGroup> {
        match name {
            TRANSACTION_TRACER => Some(&self.transaction_tracer),
            ERROR_COLLECTOR => Some(&self.error_collector),
            _ => None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsGroup for Settings {
    /// Full catalog, including child properties under dotted keys
    fn properties(&self) -> Vec<PropertyMetadata> {
        let mut properties = vec![
            PropertyMetadata::text("app_name").description("Application name reported by the agent"),
            PropertyMetadata::toggle("monitor_mode")
                .local()
                .description("Whether collected data is reported"),
            PropertyMetadata::text("log_file").description("Agent log file path"),
            PropertyMetadata::integer("log_level")
                .description("Agent log level, LOG_ERROR through LOG_VERBOSEDEBUG"),
            PropertyMetadata::toggle("capture_params").description("Capture request parameters"),
            PropertyMetadata::list("ignored_params")
                .local()
                .description("Request parameters never captured"),
            PropertyMetadata::group(TRANSACTION_TRACER),
            PropertyMetadata::group(ERROR_COLLECTOR),
        ];
        properties.extend(nested(
            TRANSACTION_TRACER,
            self.transaction_tracer.properties(),
        ));
        properties.extend(nested(ERROR_COLLECTOR, self.error_collector.properties()));
        properties
    }

    fn get(&self, path: &str) -> Result<Value> {
        if let Some((group, name)) = path.split_once('.') {
            return match self.child(group) {
                Some(child) => child.get(name),
                None => Err(Error::SettingNotFound(path.to_string())),
            };
        }
        match path {
            "app_name" => Ok(Value::from(self.app_name())),
            "monitor_mode" => Ok(Value::Bool(self.monitor_mode())),
            "log_file" => Ok(Value::from(self.log_file())),
            "log_level" => Ok(Value::from(self.log_level())),
            "capture_params" => Ok(Value::Bool(self.capture_params())),
            "ignored_params" => Ok(Value::Array(self.ignored_params())),
            TRANSACTION_TRACER => serde_json::to_value(self.transaction_tracer.snapshot())
                .map_err(|e| Error::Config(e.to_string())),
            ERROR_COLLECTOR => serde_json::to_value(self.error_collector.snapshot())
                .map_err(|e| Error::Config(e.to_string())),
            _ => Err(Error::SettingNotFound(path.to_string())),
        }
    }

    fn set(&self, path: &str, value: Value) -> Result<()> {
        if let Some((group, name)) = path.split_once('.') {
            return match self.child(group) {
                Some(child) => child.set(name, value),
                None => Err(Error::SettingNotFound(path.to_string())),
            };
        }
        match path {
            "app_name" => self.set_app_name(value),
            "monitor_mode" => self.set_monitor_mode(value),
            "log_file" => self.set_log_file(value),
            "log_level" => self.set_log_level(value),
            "capture_params" => self.set_capture_params(value),
            "ignored_params" => self.set_ignored_params(value),
            TRANSACTION_TRACER | ERROR_COLLECTOR => Err(Error::ReadOnly(path.to_string())),
            _ => Err(Error::SettingNotFound(path.to_string())),
        }
    }
}
