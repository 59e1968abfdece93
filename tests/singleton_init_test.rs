//! Explicit singleton initialization
//!
//! Kept in its own test binary so no other test builds the singleton first.

mod common;

use agent_settings::{Error, LOG_DEBUG, SettingsConfig, init_settings, settings, try_settings};

#[test]
fn test_init_then_access() {
    common::init_logging();
    assert!(try_settings().is_none());

    let config = SettingsConfig::builder()
        .app_name("initialized")
        .log_level(LOG_DEBUG)
        .build();
    let installed = init_settings(config).unwrap();

    assert!(std::ptr::eq(installed, settings()));
    assert_eq!(settings().app_name().as_deref(), Some("initialized"));
    assert_eq!(settings().log_level(), LOG_DEBUG);

    let err = init_settings(SettingsConfig::default()).unwrap_err();
    assert!(matches!(err, Error::AlreadyInitialized));
    assert_eq!(settings().app_name().as_deref(), Some("initialized"));
}
