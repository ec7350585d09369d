use std::collections::HashMap;

use super::*;

#[test]
fn defaults_match_shipping_constants() {
    let cfg = AppConfig::default();
    assert_eq!(cfg.app_name, "AI Scenario Planner");
    assert_eq!(cfg.summarize_threshold_chars, 100);
    assert_eq!(cfg.speech_sample_rate, 24_000);
    assert!(!cfg.dev.global);
    cfg.validate().unwrap();
}

#[test]
fn partial_json_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cfg.json");
    std::fs::write(&path, r#"{ "version": "v.9.9.9" }"#).unwrap();

    let cfg = AppConfig::from_path(&path).unwrap();
    assert_eq!(cfg.version, "v.9.9.9");
    assert_eq!(cfg.app_name, AppConfig::default().app_name);
}

#[test]
fn invalid_json_is_a_serde_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cfg.json");
    std::fs::write(&path, "{ nope").unwrap();
    assert!(matches!(
        AppConfig::from_path(&path),
        Err(PlannerError::Serde(_))
    ));
}

#[test]
fn env_overrides_apply() {
    let vars: HashMap<&str, &str> = [
        (ENV_ENDPOINT, " https://example.test/api/generate "),
        (ENV_DEV_UNLIMITED, "true"),
        (ENV_DEV_UNLIMITED_EMAILS, "Dev@Example.com, ,ops@example.com"),
    ]
    .into_iter()
    .collect();

    let cfg = AppConfig::default().with_overrides_from(|k| vars.get(k).map(|v| v.to_string()));
    assert_eq!(cfg.endpoint, "https://example.test/api/generate");
    assert!(cfg.dev.global);
    assert_eq!(cfg.dev.emails, vec!["dev@example.com", "ops@example.com"]);
}

#[test]
fn validate_rejects_zero_sample_rate() {
    let cfg = AppConfig {
        speech_sample_rate: 0,
        ..AppConfig::default()
    };
    assert!(cfg.validate().is_err());
}
