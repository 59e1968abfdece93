//! Error collector settings group

use crate::config::PropertyMetadata;
use crate::error::{Error, Result};
use crate::events::EventManager;
use crate::group::{GroupContext, SettingsGroup};
use crate::snapshot::ErrorsSnapshot;
use crate::state::{SharedSettings, SharedState};
use crate::value::expect_bool;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Which shared flag backs `error_collector.enabled`.
///
/// The shared record carries both a tracer flag and an errors flag, but the
/// runtime has historically driven error collection off the tracer flag.
/// Until the runtime is confirmed to honour a separate errors flag, the
/// default keeps the two bound together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorsFlagBinding {
    /// Read and write the tracer flag. Writing `error_collector.enabled`
    /// also changes `transaction_tracer.enabled`.
    #[default]
    Tracer,
    /// Read the tracer flag, write the errors flag
    Split,
    /// Read and write the errors flag only
    Independent,
}

/// Settings controlling error collection
#[derive(Debug)]
pub struct ErrorsSettings {
    ctx: GroupContext,
    binding: ErrorsFlagBinding,
}

impl ErrorsSettings {
    /// Standalone group over its own fresh shared record
    pub fn new(binding: ErrorsFlagBinding) -> Self {
        Self::with_context(
            GroupContext::new(
                SharedSettings::new(),
                Arc::new(EventManager::new()),
                Some("error_collector"),
            ),
            binding,
        )
    }

    pub(crate) fn with_context(ctx: GroupContext, binding: ErrorsFlagBinding) -> Self {
        Self { ctx, binding }
    }

    pub(crate) fn attach(&mut self, shared: SharedSettings) {
        self.ctx.shared = shared;
    }

    /// Flag binding in effect
    pub fn binding(&self) -> ErrorsFlagBinding {
        self.binding
    }

    pub fn enabled(&self) -> bool {
        self.read_flag(&self.ctx.shared.read())
    }

    fn read_flag(&self, state: &SharedState) -> bool {
        match self.binding {
            ErrorsFlagBinding::Tracer | ErrorsFlagBinding::Split => state.tt_enabled,
            ErrorsFlagBinding::Independent => state.errors_enabled,
        }
    }

    /// # Errors
    ///
    /// [`Error::TypeMismatch`] unless `value` is a bool.
    pub fn set_enabled(&self, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let key = self.ctx.key("enabled");
        let enabled = expect_bool(&key, &value)?;
        self.ctx.check(&key, &value)?;

        let old = {
            let mut state = self.ctx.shared.write();
            let old = self.read_flag(&state);
            match self.binding {
                ErrorsFlagBinding::Tracer => state.tt_enabled = enabled,
                ErrorsFlagBinding::Split | ErrorsFlagBinding::Independent => {
                    state.errors_enabled = enabled;
                }
            }
            old
        };
        self.ctx
            .committed(&key, &Value::Bool(old), &Value::Bool(enabled));
        Ok(())
    }

    /// Current values in public units
    pub fn snapshot(&self) -> ErrorsSnapshot {
        ErrorsSnapshot {
            enabled: self.enabled(),
        }
    }
}

impl SettingsGroup for ErrorsSettings {
    fn properties(&self) -> Vec<PropertyMetadata> {
        vec![PropertyMetadata::toggle("enabled").description("Collect errors")]
    }

    fn get(&self, name: &str) -> Result<Value> {
        match name {
            "enabled" => Ok(Value::Bool(self.enabled())),
            _ => Err(Error::SettingNotFound(self.ctx.key(name))),
        }
    }

    fn set(&self, name: &str, value: Value) -> Result<()> {
        match name {
            "enabled" => self.set_enabled(value),
            _ => Err(Error::SettingNotFound(self.ctx.key(name))),
        }
    }
}
