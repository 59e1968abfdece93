//! Property catalog
//!
//! Every settings group describes its properties with [`PropertyMetadata`]:
//! the accepted value shape, where the value is stored, the public unit, and
//! whether it can be assigned at all. The catalog is descriptive only. Each
//! property still validates its own writes.
//!
//! ```
//! use agent_settings::{PropertyMetadata, PropertyScope, Unit};
//!
//! let threshold = PropertyMetadata::optional_number("transaction_threshold")
//!     .local()
//!     .seconds()
//!     .description("Slow transaction threshold, None to derive it from apdex");
//!
//! assert_eq!(threshold.scope, PropertyScope::Local);
//! assert_eq!(threshold.unit, Unit::Seconds);
//! ```

use serde::{Deserialize, Serialize};

// =============================================================================
// Property Types
// =============================================================================

/// Value shape accepted by a property
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    /// Boolean flag
    Toggle,
    /// Integer (booleans and floats rejected)
    Integer,
    /// Integer or float
    Number,
    /// Integer, float, or null sentinel
    OptionalNumber,
    /// String
    Text,
    /// Array with unchecked elements
    List,
    /// Nested settings group (read-only reference)
    Group,
}

/// Where a property's value is stored
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PropertyScope {
    /// Shared process-wide state, visible to every settings object over the same handle
    Shared,
    /// Field of the settings object itself
    Local,
    /// Child group owned by the settings object
    Child,
}

/// Public unit of a property value
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// Unitless
    #[default]
    None,
    /// Seconds publicly, microseconds in storage
    Seconds,
}

// =============================================================================
// Property Metadata
// =============================================================================

/// Description of a single property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyMetadata {
    /// Property key, dotted when nested (`transaction_tracer.enabled`)
    pub key: String,

    /// Accepted value shape
    #[serde(rename = "type")]
    pub property_type: PropertyType,

    /// Backing storage location
    pub scope: PropertyScope,

    /// Public unit
    #[serde(default)]
    pub unit: Unit,

    /// Whether assignment is rejected
    #[serde(default)]
    pub read_only: bool,

    /// Human readable description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl PropertyMetadata {
    fn new(key: impl Into<String>, property_type: PropertyType) -> Self {
        Self {
            key: key.into(),
            property_type,
            scope: PropertyScope::Shared,
            unit: Unit::None,
            read_only: false,
            description: String::new(),
        }
    }

    /// Boolean property
    pub fn toggle(key: impl Into<String>) -> Self {
        Self::new(key, PropertyType::Toggle)
    }

    /// Integer property
    pub fn integer(key: impl Into<String>) -> Self {
        Self::new(key, PropertyType::Integer)
    }

    /// Int-or-float property
    pub fn number(key: impl Into<String>) -> Self {
        Self::new(key, PropertyType::Number)
    }

    /// Int-or-float property that also accepts the null sentinel
    pub fn optional_number(key: impl Into<String>) -> Self {
        Self::new(key, PropertyType::OptionalNumber)
    }

    /// String property
    pub fn text(key: impl Into<String>) -> Self {
        Self::new(key, PropertyType::Text)
    }

    /// List property
    pub fn list(key: impl Into<String>) -> Self {
        Self::new(key, PropertyType::List)
    }

    /// Read-only child group
    pub fn group(key: impl Into<String>) -> Self {
        Self {
            scope: PropertyScope::Child,
            read_only: true,
            ..Self::new(key, PropertyType::Group)
        }
    }

    /// Mark as stored on the settings object itself
    #[must_use]
    pub fn local(mut self) -> Self {
        self.scope = PropertyScope::Local;
        self
    }

    /// Mark as exposed in seconds
    #[must_use]
    pub fn seconds(mut self) -> Self {
        self.unit = Unit::Seconds;
        self
    }

    /// Set the description
    #[must_use]
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }

    /// Prefix the key with a group name
    #[must_use]
    pub fn nested_under(mut self, group: &str) -> Self {
        self.key = format!("{group}.{}", self.key);
        self
    }

    /// Whether the value is stored in shared state
    pub fn is_shared(&self) -> bool {
        self.scope == PropertyScope::Shared
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let level = PropertyMetadata::integer("log_level").description("Agent log level");
        assert_eq!(level.property_type, PropertyType::Integer);
        assert!(level.is_shared());
        assert!(!level.read_only);
        assert_eq!(level.description, "Agent log level");

        let mode = PropertyMetadata::toggle("monitor_mode").local();
        assert_eq!(mode.scope, PropertyScope::Local);
        assert!(!mode.is_shared());

        let tracer = PropertyMetadata::group("transaction_tracer");
        assert!(tracer.read_only);
        assert_eq!(tracer.scope, PropertyScope::Child);
    }

    #[test]
    fn test_nested_key() {
        let meta = PropertyMetadata::number("stack_trace_threshold")
            .seconds()
            .nested_under("transaction_tracer");
        assert_eq!(meta.key, "transaction_tracer.stack_trace_threshold");
        assert_eq!(meta.unit, Unit::Seconds);
    }

    #[test]
    fn test_serialization() {
        let meta = PropertyMetadata::list("ignored_params").local();
        let json = serde_json::to_value(&meta).unwrap();

        assert_eq!(json["type"], "list");
        assert_eq!(json["scope"], "local");
        assert!(json.get("description").is_none());

        let back: PropertyMetadata = serde_json::from_value(json).unwrap();
        assert_eq!(back, meta);
    }
}
