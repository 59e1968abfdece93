//! Transaction tracer settings group
//!
//! `enabled`, `record_sql` and `stack_trace_threshold` live in the shared
//! record. `transaction_threshold` is local to the group because the runtime
//! re-applies it per request.

use crate::config::PropertyMetadata;
use crate::error::{Error, Result};
use crate::events::EventManager;
use crate::group::{GroupContext, SettingsGroup};
use crate::snapshot::TracerSnapshot;
use crate::state::SharedSettings;
use crate::value::{
    expect_bool, expect_int, expect_seconds, micros_to_seconds, seconds_to_micros,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Threshold above which a transaction is traced.
///
/// `Apdex` means the threshold is derived from the apdex configuration by the
/// runtime; it carries no value of its own and reads as `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionThreshold {
    #[default]
    Apdex,
    Fixed { micros: u64 },
}

impl TransactionThreshold {
    /// Fixed threshold from a number of seconds, rounded to the microsecond.
    /// Negative values clamp to zero.
    pub fn from_seconds(seconds: f64) -> Self {
        match serde_json::Number::from_f64(seconds) {
            Some(n) => Self::Fixed {
                micros: seconds_to_micros(&n),
            },
            None => Self::Fixed { micros: 0 },
        }
    }

    /// Threshold in seconds, `None` in apdex mode
    pub fn seconds(&self) -> Option<f64> {
        self.micros().map(micros_to_seconds)
    }

    /// Threshold in microseconds, `None` in apdex mode
    pub fn micros(&self) -> Option<u64> {
        match self {
            Self::Apdex => None,
            Self::Fixed { micros } => Some(*micros),
        }
    }

    pub fn is_apdex(&self) -> bool {
        matches!(self, Self::Apdex)
    }

    fn to_value(self) -> Value {
        Value::from(self.seconds())
    }
}

/// Settings controlling transaction trace capture
#[derive(Debug)]
pub struct TracerSettings {
    ctx: GroupContext,
    transaction_threshold: RwLock<TransactionThreshold>,
}

impl TracerSettings {
    /// Standalone group over its own fresh shared record.
    ///
    /// Normally the group is created by, and reached through,
    /// [`Settings::transaction_tracer`](crate::Settings::transaction_tracer).
    pub fn new() -> Self {
        Self::with_context(GroupContext::new(
            SharedSettings::new(),
            Arc::new(EventManager::new()),
            Some("transaction_tracer"),
        ))
    }

    pub(crate) fn with_context(ctx: GroupContext) -> Self {
        Self {
            ctx,
            transaction_threshold: RwLock::new(TransactionThreshold::Apdex),
        }
    }

    pub(crate) fn attach(&mut self, shared: SharedSettings) {
        self.ctx.shared = shared;
    }

    // =========================================================================
    // enabled
    // =========================================================================

    pub fn enabled(&self) -> bool {
        self.ctx.shared.read().tt_enabled
    }

    /// # Errors
    ///
    /// [`Error::TypeMismatch`] unless `value` is a bool.
    pub fn set_enabled(&self, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let key = self.ctx.key("enabled");
        let enabled = expect_bool(&key, &value)?;
        self.ctx.check(&key, &value)?;

        let old = std::mem::replace(&mut self.ctx.shared.write().tt_enabled, enabled);
        self.ctx
            .committed(&key, &Value::Bool(old), &Value::Bool(enabled));
        Ok(())
    }

    // =========================================================================
    // transaction_threshold
    // =========================================================================

    /// Threshold in seconds, or `None` when derived from apdex
    pub fn transaction_threshold(&self) -> Option<f64> {
        self.transaction_threshold.read().seconds()
    }

    /// Threshold as stored
    pub fn transaction_threshold_mode(&self) -> TransactionThreshold {
        *self.transaction_threshold.read()
    }

    /// Set the threshold from `null` (apdex mode) or an int/float of seconds.
    ///
    /// Numbers are stored rounded to the microsecond; negatives clamp to 0.
    /// A non-finite `f64` (NaN or either infinity) converts to `null` before it
    /// reaches the setter, so it selects apdex mode.
    ///
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] for anything other than null, int or float.
    pub fn set_transaction_threshold(&self, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let key = self.ctx.key("transaction_threshold");
        let threshold = match &value {
            Value::Null => TransactionThreshold::Apdex,
            Value::Number(n) => TransactionThreshold::Fixed {
                micros: seconds_to_micros(n),
            },
            other => {
                return Err(Error::TypeMismatch {
                    key,
                    expected: "int, float or None",
                    actual: crate::value::type_name(other),
                });
            }
        };
        self.ctx.check(&key, &value)?;

        let old = std::mem::replace(&mut *self.transaction_threshold.write(), threshold);
        self.ctx
            .committed(&key, &old.to_value(), &threshold.to_value());
        Ok(())
    }

    // =========================================================================
    // record_sql
    // =========================================================================

    /// SQL recording mode code (see `RECORD_SQL_*`)
    pub fn record_sql(&self) -> i64 {
        self.ctx.shared.read().tt_record_sql
    }

    /// Store a mode code verbatim. The code is not range checked.
    ///
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] unless `value` is an integer.
    pub fn set_record_sql(&self, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let key = self.ctx.key("record_sql");
        let mode = expect_int(&key, &value)?;
        self.ctx.check(&key, &value)?;

        let old = std::mem::replace(&mut self.ctx.shared.write().tt_record_sql, mode);
        self.ctx.committed(&key, &Value::from(old), &Value::from(mode));
        Ok(())
    }

    // =========================================================================
    // stack_trace_threshold
    // =========================================================================

    /// Slow SQL stack trace threshold in seconds
    pub fn stack_trace_threshold(&self) -> f64 {
        micros_to_seconds(self.ctx.shared.read().slow_sql_stacktrace)
    }

    /// Set the threshold from an int/float of seconds; negatives clamp to 0.
    ///
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] unless `value` is an int or float. A non-finite
    /// `f64` converts to `null` and is rejected.
    pub fn set_stack_trace_threshold(&self, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let key = self.ctx.key("stack_trace_threshold");
        let micros = seconds_to_micros(expect_seconds(&key, &value)?);
        self.ctx.check(&key, &value)?;

        let old = std::mem::replace(&mut self.ctx.shared.write().slow_sql_stacktrace, micros);
        self.ctx.committed(
            &key,
            &Value::from(micros_to_seconds(old)),
            &Value::from(micros_to_seconds(micros)),
        );
        Ok(())
    }

    /// Current values in public units
    pub fn snapshot(&self) -> TracerSnapshot {
        TracerSnapshot {
            enabled: self.enabled(),
            transaction_threshold: self.transaction_threshold(),
            record_sql: self.record_sql(),
            stack_trace_threshold: self.stack_trace_threshold(),
        }
    }
}

impl Default for TracerSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsGroup for TracerSettings {
    fn properties(&self) -> Vec<PropertyMetadata> {
        vec![
            PropertyMetadata::toggle("enabled").description("Capture transaction traces"),
            PropertyMetadata::optional_number("transaction_threshold")
                .local()
                .seconds()
                .description("Trace transactions slower than this; None derives it from apdex"),
            PropertyMetadata::integer("record_sql").description("SQL recording mode code"),
            PropertyMetadata::number("stack_trace_threshold")
                .seconds()
                .description("Capture stack traces for SQL slower than this"),
        ]
    }

    fn get(&self, name: &str) -> Result<Value> {
        match name {
            "enabled" => Ok(Value::Bool(self.enabled())),
            "transaction_threshold" => Ok(self.transaction_threshold_mode().to_value()),
            "record_sql" => Ok(Value::from(self.record_sql())),
            "stack_trace_threshold" => Ok(Value::from(self.stack_trace_threshold())),
            _ => Err(Error::SettingNotFound(self.ctx.key(name))),
        }
    }

    fn set(&self, name: &str, value: Value) -> Result<()> {
        match name {
            "enabled" => self.set_enabled(value),
            "transaction_threshold" => self.set_transaction_threshold(value),
            "record_sql" => self.set_record_sql(value),
            "stack_trace_threshold" => self.set_stack_trace_threshold(value),
            _ => Err(Error::SettingNotFound(self.ctx.key(name))),
        }
    }
}
