//! Point-in-time copies of a settings tree in public units

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Root settings values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsSnapshot {
    pub app_name: Option<String>,
    pub monitor_mode: bool,
    pub log_file: Option<String>,
    pub log_level: i64,
    pub capture_params: bool,
    pub ignored_params: Vec<Value>,
    pub transaction_tracer: TracerSnapshot,
    pub error_collector: ErrorsSnapshot,
}

/// Transaction tracer values; thresholds in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracerSnapshot {
    pub enabled: bool,
    /// `None` when derived from apdex
    pub transaction_threshold: Option<f64>,
    pub record_sql: i64,
    pub stack_trace_threshold: f64,
}

/// Error collector values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorsSnapshot {
    pub enabled: bool,
}
