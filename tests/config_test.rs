//! Config and Environment Override Tests

mod common;

use agent_settings::{
    ErrorsFlagBinding, LOG_DEBUG, LOG_INFO, LOG_VERBOSEDEBUG, RECORD_SQL_OFF, RECORD_SQL_RAW,
    Settings, SettingsConfig, SettingsGroup, SharedSettings,
};
use common::{TestFixture, env_config};
use serde_json::json;

// =============================================================================
// Initial Values
// =============================================================================

#[test]
fn test_default_config_matches_new() {
    let built = Settings::from_config(SettingsConfig::default()).unwrap();
    assert_eq!(built.snapshot(), Settings::new().snapshot());
}

#[test]
fn test_config_values_applied() {
    let config = SettingsConfig::builder()
        .app_name("billing")
        .log_file("/tmp/agent.log")
        .log_level(LOG_DEBUG)
        .capture_params(true)
        .monitor_mode(false)
        .ignored_params(["password"])
        .tracer_enabled(false)
        .transaction_threshold(Some(1.25))
        .record_sql(RECORD_SQL_RAW)
        .stack_trace_threshold(2.0)
        .build();
    let fixture = TestFixture::with_config(config);
    let settings = &fixture.settings;

    assert_eq!(settings.app_name().as_deref(), Some("billing"));
    assert_eq!(settings.log_file().as_deref(), Some("/tmp/agent.log"));
    assert_eq!(settings.log_level(), LOG_DEBUG);
    assert!(settings.capture_params());
    assert!(!settings.monitor_mode());
    assert!(settings.is_param_ignored("password"));

    let tracer = settings.transaction_tracer();
    assert!(!tracer.enabled());
    assert_eq!(tracer.transaction_threshold(), Some(1.25));
    assert_eq!(tracer.record_sql(), RECORD_SQL_RAW);
    assert_eq!(fixture.shared.read().slow_sql_stacktrace(), 2_000_000);
}

#[test]
fn test_invalid_config_rejected() {
    let err = Settings::from_config(SettingsConfig::builder().log_level(7).build()).unwrap_err();
    assert!(err.is_value_error());

    let err = Settings::from_config(SettingsConfig::builder().log_level(-2).build()).unwrap_err();
    assert!(err.is_value_error());
}

#[test]
fn test_config_clamps_negative_thresholds() {
    let config = SettingsConfig::builder()
        .transaction_threshold(Some(-1.0))
        .stack_trace_threshold(-0.5)
        .build();
    let settings = Settings::from_config(config).unwrap();

    assert_eq!(settings.transaction_tracer().transaction_threshold(), Some(0.0));
    assert_eq!(settings.transaction_tracer().stack_trace_threshold(), 0.0);
}

#[test]
fn test_tracer_binding_ignores_errors_enabled() {
    let config = SettingsConfig::builder()
        .tracer_enabled(true)
        .errors_enabled(false)
        .build();
    let settings = Settings::from_config(config).unwrap();
    assert!(settings.transaction_tracer().enabled());
    assert!(settings.error_collector().enabled());
}

#[test]
fn test_independent_binding_applies_errors_enabled() {
    let config = SettingsConfig::builder()
        .errors_enabled(false)
        .errors_flag_binding(ErrorsFlagBinding::Independent)
        .build();
    let settings = Settings::from_config(config).unwrap();
    assert!(settings.transaction_tracer().enabled());
    assert!(!settings.error_collector().enabled());
    assert_eq!(
        settings.error_collector().binding(),
        ErrorsFlagBinding::Independent
    );
}

// =============================================================================
// Environment Overrides
// =============================================================================

#[test]
fn test_env_overrides_config() {
    let config = env_config(&[
        ("AGENT_APP_NAME", "from-env"),
        ("AGENT_LOG_LEVEL", "5"),
        ("AGENT_MONITOR_MODE", "false"),
        ("AGENT_IGNORED_PARAMS", r#"["token", "secret"]"#),
        ("AGENT_TRANSACTION_TRACER_RECORD_SQL", "0"),
        ("AGENT_TRANSACTION_TRACER_TRANSACTION_THRESHOLD", "0.75"),
        ("AGENT_TRANSACTION_TRACER_STACK_TRACE_THRESHOLD", "3"),
    ]);
    let settings = Settings::from_config(config).unwrap();

    assert_eq!(settings.app_name().as_deref(), Some("from-env"));
    assert_eq!(settings.log_level(), LOG_VERBOSEDEBUG);
    assert!(!settings.monitor_mode());
    assert!(settings.is_param_ignored("token"));
    assert!(settings.is_param_ignored("secret"));

    let tracer = settings.transaction_tracer();
    assert_eq!(tracer.record_sql(), RECORD_SQL_OFF);
    assert_eq!(tracer.transaction_threshold(), Some(0.75));
    assert_eq!(tracer.stack_trace_threshold(), 3.0);
}

#[test]
fn test_env_null_threshold_is_sentinel() {
    let config = SettingsConfig::builder()
        .transaction_threshold(Some(4.0))
        .with_env_prefix("AGENT")
        .with_env_source(common::env(&[(
            "AGENT_TRANSACTION_TRACER_TRANSACTION_THRESHOLD",
            "null",
        )]))
        .build();
    let settings = Settings::from_config(config).unwrap();
    assert_eq!(settings.transaction_tracer().transaction_threshold(), None);
}

#[test]
fn test_env_errors_flag_under_tracer_binding() {
    let settings =
        Settings::from_config(env_config(&[("AGENT_ERROR_COLLECTOR_ENABLED", "FALSE")])).unwrap();

    assert!(!settings.error_collector().enabled());
    assert!(!settings.transaction_tracer().enabled());
}

#[test]
fn test_env_without_prefix_is_ignored() {
    let config = SettingsConfig::builder()
        .with_env_source(common::env(&[("AGENT_LOG_LEVEL", "4")]))
        .build();
    let settings = Settings::from_config(config).unwrap();
    assert_eq!(settings.log_level(), LOG_INFO);
}

#[test]
fn test_env_unrelated_variables_ignored() {
    let settings = Settings::from_config(env_config(&[
        ("AGENT_UNKNOWN_SETTING", "1"),
        ("OTHER_LOG_LEVEL", "4"),
    ]))
    .unwrap();
    assert_eq!(settings.log_level(), LOG_INFO);
}

#[test]
fn test_invalid_env_override_fails_build() {
    let err = Settings::from_config(env_config(&[("AGENT_LOG_LEVEL", "9")])).unwrap_err();
    assert!(err.is_value_error());

    let err = Settings::from_config(env_config(&[("AGENT_TRANSACTION_TRACER_RECORD_SQL", "raw")]))
        .unwrap_err();
    assert!(err.is_type_error());

    let err =
        Settings::from_config(env_config(&[("AGENT_IGNORED_PARAMS", "token")])).unwrap_err();
    assert!(err.is_type_error());
}

#[test]
fn test_env_text_properties_take_raw_strings() {
    let settings = Settings::from_config(env_config(&[
        ("AGENT_APP_NAME", "8080"),
        ("AGENT_LOG_FILE", "null"),
    ]))
    .unwrap();
    assert_eq!(settings.app_name().as_deref(), Some("8080"));
    assert_eq!(settings.log_file().as_deref(), Some("null"));

    let settings = Settings::from_config(env_config(&[("AGENT_APP_NAME", "true")])).unwrap();
    assert_eq!(settings.app_name().as_deref(), Some("true"));
}

#[test]
fn test_failed_build_leaves_shared_record_untouched() {
    let fixture = TestFixture::new();
    let sibling_before = fixture.settings.snapshot();
    let before = fixture.shared.snapshot();

    let config = SettingsConfig::builder()
        .capture_params(true)
        .record_sql(RECORD_SQL_RAW)
        .log_level(LOG_DEBUG)
        .with_env_prefix("AGENT")
        // applied after every configured value
        .with_env_source(common::env(&[("AGENT_ERROR_COLLECTOR_ENABLED", "maybe")]))
        .build();
    let err = Settings::with_shared(config, fixture.shared.clone()).unwrap_err();
    assert!(err.is_type_error());

    assert_eq!(fixture.shared.snapshot(), before);
    assert_eq!(fixture.settings.snapshot(), sibling_before);
}

#[test]
fn test_successful_build_swaps_in_every_value() {
    let shared = SharedSettings::new();
    let config = SettingsConfig::builder()
        .app_name("swapped")
        .capture_params(true)
        .record_sql(RECORD_SQL_RAW)
        .build();
    let settings = Settings::with_shared(config, shared.clone()).unwrap();

    assert!(settings.shared().same_as(&shared));
    let state = shared.read();
    assert_eq!(state.app_name(), Some("swapped"));
    assert_eq!(state.enable_params(), 1);
    assert_eq!(state.tt_record_sql(), RECORD_SQL_RAW);
    drop(state);

    // later writes go to the caller's record
    settings.set_log_level(LOG_DEBUG).unwrap();
    settings.transaction_tracer().set_enabled(false).unwrap();
    assert_eq!(shared.read().log_level(), LOG_DEBUG);
    assert!(!shared.read().tt_enabled());
}

#[test]
fn test_env_cannot_write_child_groups() {
    let settings =
        Settings::from_config(env_config(&[("AGENT_TRANSACTION_TRACER", "{}")])).unwrap();
    assert!(settings.transaction_tracer().enabled());
}

#[test]
fn test_config_applies_to_existing_shared_record() {
    let fixture = TestFixture::with_config(
        SettingsConfig::builder()
            .app_name("first")
            .log_level(LOG_DEBUG)
            .build(),
    );
    let second = Settings::with_shared(
        SettingsConfig::builder().app_name("second").build(),
        fixture.shared.clone(),
    )
    .unwrap();

    // the second build re-applies every initial value to the shared record
    assert_eq!(fixture.settings.app_name().as_deref(), Some("second"));
    assert_eq!(fixture.settings.log_level(), LOG_INFO);
    assert_eq!(second.get("app_name").unwrap(), json!("second"));
}
