use super::*;
use crate::model::sample_set;

fn set_json() -> serde_json::Value {
    serde_json::to_value(sample_set()).unwrap()
}

fn expect_invalid(v: serde_json::Value, needle: &str) {
    let err = parse_scenario_set(&v.to_string()).unwrap_err();
    assert!(matches!(err, PlannerError::Validation(_)), "{err}");
    assert!(err.to_string().contains(needle), "{err}");
}

#[test]
fn fixture_is_valid() {
    sample_set().validate().unwrap();
}

#[test]
fn fenced_payload_parses() {
    let fenced = format!("```json\n{}\n```", set_json());
    let set = parse_scenario_set(&fenced).unwrap();
    assert_eq!(set.scenarios.len(), 4);
}

#[test]
fn rejects_three_scenarios() {
    let mut v = set_json();
    v["scenarios"].as_array_mut().unwrap().pop();
    expect_invalid(v, "expected 4 scenarios");
}

#[test]
fn rejects_four_allocation_entries() {
    let mut v = set_json();
    v["scenarios"][1]["allocation"].as_array_mut().unwrap().pop();
    expect_invalid(v, "expected 5 allocation entries");
}

#[test]
fn rejects_two_early_signs() {
    let mut v = set_json();
    v["scenarios"][2]["earlySigns"].as_array_mut().unwrap().pop();
    expect_invalid(v, "expected 3 early signs");
}

#[test]
fn rejects_wrong_subject_order() {
    let mut v = set_json();
    let alloc = v["scenarios"][0]["allocation"].as_array_mut().unwrap();
    alloc.swap(0, 1);
    expect_invalid(v, "allocation[0] subject");
}

#[test]
fn rejects_out_of_scale_value() {
    let mut v = set_json();
    v["scenarios"][3]["allocation"][4]["val"] = 6.into();
    expect_invalid(v, "outside 1..=5");
}

#[test]
fn rejects_duplicate_quadrant() {
    let mut v = set_json();
    v["scenarios"][3]["id"] = "Scenario A".into();
    expect_invalid(v, "more than once");
}

#[test]
fn rejects_missing_required_field() {
    let mut v = set_json();
    v["scenarios"][0].as_object_mut().unwrap().remove("actionAdvice");
    expect_invalid(v, "actionAdvice");
}
