//! Shared process-wide backing state
//!
//! Several properties do not live on the settings object that exposes them.
//! They are stored in one [`SharedState`] record that the instrumentation
//! runtime reads directly, in raw units (microseconds, 0/1 flags). Every
//! settings object built over the same [`SharedSettings`] handle reads and
//! writes the same record.
//!
//! | field | exposed as |
//! |---|---|
//! | `tt_enabled` | `transaction_tracer.enabled` |
//! | `errors_enabled` | `error_collector.enabled` (independent binding only) |
//! | `tt_record_sql` | `transaction_tracer.record_sql` |
//! | `slow_sql_stacktrace` | `transaction_tracer.stack_trace_threshold` |
//! | `app_name` | `app_name` |
//! | `log_file` | `log_file` |
//! | `log_level` | `log_level` |
//! | `enable_params` | `capture_params` |

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

// =============================================================================
// Log Levels
// =============================================================================

/// Errors only
pub const LOG_ERROR: i64 = 0;
/// Warnings and errors
pub const LOG_WARNING: i64 = 1;
/// Informational messages
pub const LOG_INFO: i64 = 2;
/// Verbose informational messages
pub const LOG_VERBOSE: i64 = 3;
/// Debug output
pub const LOG_DEBUG: i64 = 4;
/// Verbose debug output. Highest accepted level.
pub const LOG_VERBOSEDEBUG: i64 = 5;
/// Raw dump output. Known to wedge the log writer, so never accepted.
pub const LOG_DUMP: i64 = 6;

/// Inclusive range of log levels accepted by `log_level`
pub const LOG_LEVEL_RANGE: std::ops::RangeInclusive<i64> = LOG_ERROR..=LOG_VERBOSEDEBUG;

// =============================================================================
// Record SQL Modes
// =============================================================================

/// Do not record SQL
pub const RECORD_SQL_OFF: i64 = 0;
/// Record SQL with literals obfuscated
pub const RECORD_SQL_OBFUSCATED: i64 = 1;
/// Record raw SQL
pub const RECORD_SQL_RAW: i64 = 2;

// =============================================================================
// Shared State
// =============================================================================

/// Backing record for the shared settings fields, in raw units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedState {
    pub(crate) tt_enabled: bool,
    pub(crate) errors_enabled: bool,
    pub(crate) tt_record_sql: i64,
    pub(crate) slow_sql_stacktrace: u64,
    pub(crate) app_name: Option<String>,
    pub(crate) log_file: Option<String>,
    pub(crate) log_level: i64,
    pub(crate) enable_params: i32,
}

impl Default for SharedState {
    fn default() -> Self {
        Self {
            tt_enabled: true,
            errors_enabled: true,
            tt_record_sql: RECORD_SQL_OBFUSCATED,
            slow_sql_stacktrace: 500_000,
            app_name: None,
            log_file: None,
            log_level: LOG_INFO,
            enable_params: 0,
        }
    }
}

impl SharedState {
    /// Whether transaction traces are captured
    pub fn tt_enabled(&self) -> bool {
        self.tt_enabled
    }

    /// Whether errors are collected
    pub fn errors_enabled(&self) -> bool {
        self.errors_enabled
    }

    /// SQL recording mode code
    pub fn tt_record_sql(&self) -> i64 {
        self.tt_record_sql
    }

    /// Slow SQL stack trace threshold in microseconds
    pub fn slow_sql_stacktrace(&self) -> u64 {
        self.slow_sql_stacktrace
    }

    /// Application name, if set
    pub fn app_name(&self) -> Option<&str> {
        self.app_name.as_deref()
    }

    /// Log file path, if set
    pub fn log_file(&self) -> Option<&str> {
        self.log_file.as_deref()
    }

    /// Log level on the `LOG_ERROR..=LOG_VERBOSEDEBUG` scale
    pub fn log_level(&self) -> i64 {
        self.log_level
    }

    /// Request parameter capture flag (0 or 1)
    pub fn enable_params(&self) -> i32 {
        self.enable_params
    }
}

/// Cloneable handle to a lock-guarded [`SharedState`].
///
/// Clones refer to the same record. Build a fresh handle per test to keep
/// tests isolated from each other and from the process singleton.
#[derive(Debug, Clone, Default)]
pub struct SharedSettings {
    inner: Arc<RwLock<SharedState>>,
}

impl SharedSettings {
    /// Create a handle over a default record
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a handle over an existing record
    #[must_use]
    pub fn from_state(state: SharedState) -> Self {
        Self {
            inner: Arc::new(RwLock::new(state)),
        }
    }

    /// Acquire a read guard over the record
    ///
    /// # Deadlocks
    ///
    /// Every setter of a tree over this record takes the write lock. Calling
    /// one on the same thread while the guard is alive deadlocks; drop the
    /// guard first, or use [`SharedSettings::snapshot`].
    pub fn read(&self) -> RwLockReadGuard<'_, SharedState> {
        self.inner.read()
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, SharedState> {
        self.inner.write()
    }

    /// Copy of the current record
    #[must_use]
    pub fn snapshot(&self) -> SharedState {
        self.inner.read().clone()
    }

    /// Check whether two handles refer to the same record
    #[must_use]
    pub fn same_as(&self, other: &SharedSettings) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
