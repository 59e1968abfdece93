//! Construction-time configuration for a settings tree

use crate::error_collector::ErrorsFlagBinding;
use crate::state::{LOG_INFO, RECORD_SQL_OBFUSCATED};
use serde_json::Value;
use std::collections::HashMap;
use std::env::VarError;
use std::sync::Arc;

// =============================================================================
// Environment Sources
// =============================================================================

/// Source of environment variables used for overrides
pub trait EnvSource: Send + Sync {
    /// Look up a variable by name
    fn var(&self, key: &str) -> Result<String, VarError>;
}

/// Reads the real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEnvSource;

impl EnvSource for DefaultEnvSource {
    fn var(&self, key: &str) -> Result<String, VarError> {
        std::env::var(key)
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Result<String, VarError> {
        self.get(key).cloned().ok_or(VarError::NotPresent)
    }
}

// =============================================================================
// Settings Config
// =============================================================================

/// Initial values and options used to build a [`Settings`](crate::Settings) tree
#[derive(Clone)]
pub struct SettingsConfig {
    pub app_name: Option<String>,
    pub log_file: Option<String>,
    pub log_level: i64,
    pub capture_params: bool,
    pub monitor_mode: bool,
    pub ignored_params: Vec<Value>,

    pub tracer_enabled: bool,
    /// Seconds, or `None` for the apdex-derived sentinel
    pub transaction_threshold: Option<f64>,
    pub record_sql: i64,
    /// Seconds
    pub stack_trace_threshold: f64,

    pub errors_enabled: bool,

    /// Which shared flag `error_collector.enabled` is bound to
    pub errors_flag_binding: ErrorsFlagBinding,

    /// Environment variable prefix for overrides (e.g., "AGENT" -> AGENT_LOG_LEVEL).
    /// If None, env var overrides are disabled
    pub env_prefix: Option<String>,

    /// Where environment variables are read from
    pub env_source: Arc<dyn EnvSource>,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            app_name: None,
            log_file: None,
            log_level: LOG_INFO,
            capture_params: false,
            monitor_mode: true,
            ignored_params: Vec::new(),
            tracer_enabled: true,
            transaction_threshold: None,
            record_sql: RECORD_SQL_OBFUSCATED,
            stack_trace_threshold: 0.5,
            errors_enabled: true,
            errors_flag_binding: ErrorsFlagBinding::default(),
            env_prefix: None,
            env_source: Arc::new(DefaultEnvSource),
        }
    }
}

impl std::fmt::Debug for SettingsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsConfig")
            .field("app_name", &self.app_name)
            .field("log_file", &self.log_file)
            .field("log_level", &self.log_level)
            .field("capture_params", &self.capture_params)
            .field("monitor_mode", &self.monitor_mode)
            .field("ignored_params", &self.ignored_params)
            .field("tracer_enabled", &self.tracer_enabled)
            .field("transaction_threshold", &self.transaction_threshold)
            .field("record_sql", &self.record_sql)
            .field("stack_trace_threshold", &self.stack_trace_threshold)
            .field("errors_enabled", &self.errors_enabled)
            .field("errors_flag_binding", &self.errors_flag_binding)
            .field("env_prefix", &self.env_prefix)
            .finish_non_exhaustive()
    }
}

impl SettingsConfig {
    /// Create a new builder for SettingsConfig
    ///
    /// # Example
    /// ```rust
    /// use agent_settings::SettingsConfig;
    ///
    /// let config = SettingsConfig::builder()
    ///     .app_name("checkout")
    ///     .log_level(agent_settings::LOG_DEBUG)
    ///     .build();
    /// ```
    pub fn builder() -> SettingsConfigBuilder {
        SettingsConfigBuilder::new()
    }

    /// Initial property assignments, keyed by property path, in apply order.
    ///
    /// With [`ErrorsFlagBinding::Tracer`] the errors flag is the tracer flag,
    /// so `error_collector.enabled` is left out to keep it from clobbering
    /// `transaction_tracer.enabled`.
    pub(crate) fn initial_values(&self) -> Vec<(String, Value)> {
        let mut values = vec![
            ("monitor_mode", Value::Bool(self.monitor_mode)),
            ("log_level", Value::from(self.log_level)),
            ("capture_params", Value::Bool(self.capture_params)),
            ("ignored_params", Value::Array(self.ignored_params.clone())),
            ("transaction_tracer.enabled", Value::Bool(self.tracer_enabled)),
            (
                "transaction_tracer.transaction_threshold",
                Value::from(self.transaction_threshold),
            ),
            ("transaction_tracer.record_sql", Value::from(self.record_sql)),
            (
                "transaction_tracer.stack_trace_threshold",
                Value::from(self.stack_trace_threshold),
            ),
        ];
        if let Some(name) = &self.app_name {
            values.push(("app_name", Value::String(name.clone())));
        }
        if let Some(path) = &self.log_file {
            values.push(("log_file", Value::String(path.clone())));
        }
        if self.errors_flag_binding != ErrorsFlagBinding::Tracer {
            values.push(("error_collector.enabled", Value::Bool(self.errors_enabled)));
        }
        values
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect()
    }
}

/// Builder for creating SettingsConfig with a fluent API
#[derive(Debug, Clone, Default)]
pub struct SettingsConfigBuilder {
    config: SettingsConfig,
}

impl SettingsConfigBuilder {
    /// Create a builder holding the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the application name
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.config.app_name = Some(name.into());
        self
    }

    /// Set the agent log file path
    pub fn log_file(mut self, path: impl Into<String>) -> Self {
        self.config.log_file = Some(path.into());
        self
    }

    /// Set the agent log level (checked when the tree is built)
    pub fn log_level(mut self, level: i64) -> Self {
        self.config.log_level = level;
        self
    }

    /// Enable or disable request parameter capture
    pub fn capture_params(mut self, enabled: bool) -> Self {
        self.config.capture_params = enabled;
        self
    }

    /// Set the initial monitor mode (default: true)
    pub fn monitor_mode(mut self, enabled: bool) -> Self {
        self.config.monitor_mode = enabled;
        self
    }

    /// Set the request parameter names that are never captured
    pub fn ignored_params<I, P>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.config.ignored_params = params
            .into_iter()
            .map(|p| Value::String(p.into()))
            .collect();
        self
    }

    /// Enable or disable transaction tracing
    pub fn tracer_enabled(mut self, enabled: bool) -> Self {
        self.config.tracer_enabled = enabled;
        self
    }

    /// Set the transaction threshold in seconds, or `None` to derive it from apdex
    pub fn transaction_threshold(mut self, seconds: Option<f64>) -> Self {
        self.config.transaction_threshold = seconds;
        self
    }

    /// Set the SQL recording mode code
    pub fn record_sql(mut self, mode: i64) -> Self {
        self.config.record_sql = mode;
        self
    }

    /// Set the slow SQL stack trace threshold in seconds
    pub fn stack_trace_threshold(mut self, seconds: f64) -> Self {
        self.config.stack_trace_threshold = seconds;
        self
    }

    /// Enable or disable error collection
    pub fn errors_enabled(mut self, enabled: bool) -> Self {
        self.config.errors_enabled = enabled;
        self
    }

    /// Choose which shared flag `error_collector.enabled` is bound to
    pub fn errors_flag_binding(mut self, binding: ErrorsFlagBinding) -> Self {
        self.config.errors_flag_binding = binding;
        self
    }

    /// Enable environment variable overrides
    ///
    /// The variable name is `{PREFIX}_{PATH}` with dots turned into
    /// underscores, all uppercase.
    ///
    /// # Example
    /// ```rust
    /// use agent_settings::SettingsConfig;
    ///
    /// let config = SettingsConfig::builder()
    ///     .with_env_prefix("AGENT")
    ///     .build();
    ///
    /// // Now AGENT_TRANSACTION_TRACER_RECORD_SQL=2 overrides record_sql
    /// ```
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.env_prefix = Some(prefix.into());
        self
    }

    /// Read environment overrides from a custom source
    pub fn with_env_source(mut self, source: impl EnvSource + 'static) -> Self {
        self.config.env_source = Arc::new(source);
        self
    }

    /// Build the SettingsConfig
    ///
    /// Values are validated when the settings tree is built from the config.
    pub fn build(self) -> SettingsConfig {
        self.config
    }
}
