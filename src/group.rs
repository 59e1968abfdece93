//! Path-addressed access to a settings group
//!
//! [`SettingsGroup`] lets callers address properties by name, which is how
//! environment overrides and the dotted-path API reach them. Implementations
//! route each name to that property's own accessor. There is no shared setter
//! that validates on behalf of several properties.

use crate::config::PropertyMetadata;
use crate::error::{Error, Result};
use crate::events::EventManager;
use crate::state::SharedSettings;
use log::debug;
use serde_json::Value;
use std::sync::Arc;

/// A settings object whose properties can be addressed by name
pub trait SettingsGroup {
    /// Catalog of this group's properties, keyed relative to the group
    fn properties(&self) -> Vec<PropertyMetadata>;

    /// Read a property in public units
    ///
    /// # Errors
    ///
    /// Returns [`Error::SettingNotFound`] for an unknown name.
    fn get(&self, name: &str) -> Result<Value>;

    /// Write a property
    ///
    /// # Errors
    ///
    /// Returns the property's type or range error, [`Error::ReadOnly`] for a
    /// child group, or [`Error::SettingNotFound`] for an unknown name.
    fn set(&self, name: &str, value: Value) -> Result<()>;

    /// Delete a property. Never supported.
    ///
    /// # Errors
    ///
    /// Always fails: [`Error::CannotDelete`] for assignable properties,
    /// [`Error::ReadOnly`] for child groups, [`Error::SettingNotFound`]
    /// otherwise.
    fn delete(&self, name: &str) -> Result<()> {
        match self.properties().into_iter().find(|p| p.key == name) {
            Some(meta) if meta.read_only => Err(Error::ReadOnly(meta.key)),
            Some(meta) => Err(Error::CannotDelete { key: meta.key }),
            None => Err(Error::SettingNotFound(name.to_string())),
        }
    }

    /// Write `Some(value)`, or treat `None` (no value at all) as a deletion
    ///
    /// # Errors
    ///
    /// See [`SettingsGroup::set`] and [`SettingsGroup::delete`].
    fn assign(&self, name: &str, value: Option<Value>) -> Result<()> {
        match value {
            Some(value) => self.set(name, value),
            None => self.delete(name),
        }
    }
}

/// State every group needs to commit a write: the shared record, the event
/// manager, and the group's key prefix.
#[derive(Debug, Clone)]
pub(crate) struct GroupContext {
    pub(crate) shared: SharedSettings,
    pub(crate) events: Arc<EventManager>,
    prefix: Option<&'static str>,
}

impl GroupContext {
    pub(crate) fn new(
        shared: SharedSettings,
        events: Arc<EventManager>,
        prefix: Option<&'static str>,
    ) -> Self {
        Self {
            shared,
            events,
            prefix,
        }
    }

    /// Context for a child group sharing this context's state and events
    pub(crate) fn child(&self, prefix: &'static str) -> Self {
        Self::new(self.shared.clone(), Arc::clone(&self.events), Some(prefix))
    }

    /// Full path of a property in this group
    pub(crate) fn key(&self, name: &str) -> String {
        match self.prefix {
            Some(prefix) => format!("{prefix}.{name}"),
            None => name.to_string(),
        }
    }

    /// Run user validators on a value that already passed its type check
    pub(crate) fn check(&self, key: &str, value: &Value) -> Result<()> {
        self.events
            .validate(key, value)
            .map_err(|reason| Error::InvalidSettingValue {
                key: key.to_string(),
                reason,
            })
    }

    /// Log and broadcast a committed write. Call with no lock held.
    pub(crate) fn committed(&self, key: &str, old: &Value, new: &Value) {
        debug!("Setting {key} changed: {old} -> {new}");
        self.events.notify(key, old, new);
    }
}

/// Metadata for each entry, prefixed with the group name
pub(crate) fn nested(group: &str, properties: Vec<PropertyMetadata>) -> Vec<PropertyMetadata> {
    properties
        .into_iter()
        .map(|meta| meta.nested_under(group))
        .collect()
}
