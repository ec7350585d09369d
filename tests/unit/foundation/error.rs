use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PlannerError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        PlannerError::remote("x")
            .to_string()
            .contains("generation failed:")
    );
    assert!(PlannerError::media("x").to_string().contains("media error:"));
    assert!(PlannerError::export("x").to_string().contains("export failed:"));
    assert!(
        PlannerError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PlannerError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn quota_message_is_passed_through_verbatim() {
    let err = PlannerError::remote_quota("try again tomorrow");
    assert_eq!(err.to_string(), "try again tomorrow");
    assert_eq!(err.user_message(), "try again tomorrow");
}

#[test]
fn export_failures_surface_a_generic_message() {
    let err = PlannerError::export("zip writer exploded");
    assert_eq!(err.user_message(), "書き出しに失敗しました");
}

#[test]
fn serde_json_errors_convert() {
    let err: PlannerError = serde_json::from_str::<serde_json::Value>("{")
        .unwrap_err()
        .into();
    assert!(matches!(err, PlannerError::Serde(_)));
}
