//! Environment variable handling for settings
//!
//! Helper struct to encapsulate logic for overriding initial values via env vars.

use super::{EnvSource, PropertyType};
use serde_json::Value;
use std::sync::Arc;

/// Handles environment variable lookups and parsing
pub(crate) struct EnvironmentHandler {
    prefix: Option<String>,
    source: Arc<dyn EnvSource>,
}

impl EnvironmentHandler {
    pub(crate) fn new(prefix: Option<String>, source: Arc<dyn EnvSource>) -> Self {
        Self { prefix, source }
    }

    /// Get the environment variable name for a property path
    ///
    /// Returns None if env var overrides are disabled.
    /// Format: {PREFIX}_{GROUP}_{PROPERTY} (all uppercase)
    pub(crate) fn env_var_name(&self, path: &str) -> Option<String> {
        self.prefix.as_ref().map(|prefix| {
            let env_key = path.replace('.', "_").to_uppercase();
            format!("{}_{}", prefix.to_uppercase(), env_key)
        })
    }

    /// Look up and parse the override for a property path, if any
    ///
    /// Text properties take the raw string, so `AGENT_APP_NAME=8080` names an
    /// app "8080" rather than failing as an integer.
    pub(crate) fn get_env_override(
        &self,
        path: &str,
        property_type: PropertyType,
    ) -> Option<Value> {
        let env_var_name = self.env_var_name(path)?;
        let raw = self.source.var(&env_var_name).ok()?;
        Some(match property_type {
            PropertyType::Text => Value::String(raw),
            _ => parse_env_value(&raw),
        })
    }
}

/// Parse as JSON first, then fall back to bool/int/float/string heuristics
fn parse_env_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| {
        if raw.eq_ignore_ascii_case("true") {
            Value::Bool(true)
        } else if raw.eq_ignore_ascii_case("false") {
            Value::Bool(false)
        } else if let Ok(n) = raw.parse::<i64>() {
            Value::Number(n.into())
        } else if let Ok(n) = raw.parse::<f64>() {
            serde_json::Number::from_f64(n)
                .map_or_else(|| Value::String(raw.to_string()), Value::Number)
        } else {
            Value::String(raw.to_string())
        }
    })
}
