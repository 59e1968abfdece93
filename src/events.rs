//! Change notification for settings writes
//!
//! Listeners observe committed writes in public units (seconds, bools, the
//! `null` threshold sentinel). Validators run after a property's own type and
//! range checks and can veto a write before it is committed.

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Type alias for a change callback
pub type ChangeCallback = Arc<dyn Fn(&str, &Value, &Value) + Send + Sync>;

/// Type alias for a validator function
pub type Validator = Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;

/// Manages event listeners and validators for settings writes
pub struct EventManager {
    /// Global listeners (called for all changes)
    global_listeners: RwLock<Vec<ChangeCallback>>,

    /// Per-key listeners (called only for specific property changes)
    key_listeners: RwLock<HashMap<String, Vec<ChangeCallback>>>,

    /// Validators per key
    validators: RwLock<HashMap<String, Vec<Validator>>>,
}

impl EventManager {
    /// Create a new event manager
    #[must_use]
    pub fn new() -> Self {
        Self {
            global_listeners: RwLock::new(Vec::new()),
            key_listeners: RwLock::new(HashMap::new()),
            validators: RwLock::new(HashMap::new()),
        }
    }

    /// Register a listener called for every committed write
    ///
    /// # Arguments
    /// * `callback` - Function receiving (`key`, `old_value`, `new_value`)
    pub fn on_change<F>(&self, callback: F)
    where
        F: Fn(&str, &Value, &Value) + Send + Sync + 'static,
    {
        self.global_listeners.write().push(Arc::new(callback));
    }

    /// Register a listener for one property path
    ///
    /// # Arguments
    /// * `key` - The property path (e.g., "`transaction_tracer.enabled`")
    /// * `callback` - Function receiving (`key`, `old_value`, `new_value`)
    pub fn watch<F>(&self, key: &str, callback: F)
    where
        F: Fn(&str, &Value, &Value) + Send + Sync + 'static,
    {
        self.key_listeners
            .write()
            .entry(key.to_string())
            .or_default()
            .push(Arc::new(callback));
    }

    /// Register a validator for one property path
    ///
    /// The validator sees the value as written by the caller, after it passed
    /// the property's own type check. Returning an error rejects the write.
    pub fn add_validator<F>(&self, key: &str, validator: F)
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validators
            .write()
            .entry(key.to_string())
            .or_default()
            .push(Arc::new(validator));
    }

    /// Run the validators registered for `key`
    ///
    /// # Errors
    ///
    /// Returns the first validation error message if any validator fails.
    pub fn validate(&self, key: &str, value: &Value) -> Result<(), String> {
        // clone out so a validator may register further validators
        let validators = self.validators.read().get(key).cloned();
        if let Some(validators) = validators {
            for validator in &validators {
                validator(value)?;
            }
        }
        Ok(())
    }

    /// Notify listeners about a committed write
    pub fn notify(&self, key: &str, old_value: &Value, new_value: &Value) {
        let global = self.global_listeners.read().clone();
        for callback in &global {
            callback(key, old_value, new_value);
        }

        let keyed = self.key_listeners.read().get(key).cloned();
        if let Some(listeners) = keyed {
            for callback in &listeners {
                callback(key, old_value, new_value);
            }
        }
    }

    /// Remove all listeners for a specific key
    pub fn unwatch(&self, key: &str) {
        self.key_listeners.write().remove(key);
    }

    /// Clear all listeners (validators are kept)
    pub fn clear(&self) {
        self.global_listeners.write().clear();
        self.key_listeners.write().clear();
    }
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventManager")
            .field("global_listeners", &self.global_listeners.read().len())
            .field("key_listeners", &self.key_listeners.read().len())
            .field("validators", &self.validators.read().len())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
