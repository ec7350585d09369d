use super::*;
use crate::gate::usage::Usage;

fn account(plan: &str, scenarios: u64) -> Account {
    Account {
        plan: plan.to_string(),
        email: Some("user@example.com".to_string()),
        usage: Usage {
            scenarios,
            images: 0,
            audios: 0,
        },
    }
}

#[test]
fn plan_synonyms_normalize_to_pro() {
    for raw in ["pro", " PRO ", "Pro Plan", "premium", "Paid"] {
        assert_eq!(Plan::normalize(raw), Plan::Pro, "{raw}");
    }
    for raw in ["", "free", "enterprise", "prof"] {
        assert_eq!(Plan::normalize(raw), Plan::Free, "{raw}");
    }
}

#[test]
fn free_plan_quota_boundary() {
    let table = PlanTable::default();
    let dev = DevOverride::default();
    let gate = PlanGate::new(&table, &dev);

    let denied = gate.check(Some(&account("free", 3)), Operation::Scenario);
    assert_eq!(
        denied,
        GateDecision::QuotaExhausted {
            plan: Plan::Free,
            used: 3,
            limit: 3
        }
    );
    assert!(gate
        .check(Some(&account("free", 2)), Operation::Scenario)
        .is_allowed());
}

#[test]
fn dev_override_always_allows() {
    let table = PlanTable::default();
    let dev = DevOverride {
        global: true,
        emails: Vec::new(),
    };
    let gate = PlanGate::new(&table, &dev);
    let acct = account("free", 999);
    for op in [
        Operation::Scenario,
        Operation::Image,
        Operation::Audio,
        Operation::Deck,
    ] {
        assert!(gate.check(Some(&acct), op).is_allowed());
    }
    assert!(!gate.meters(&acct));
}

#[test]
fn allow_listed_email_matches_case_insensitively() {
    let table = PlanTable::default();
    let dev = DevOverride {
        global: false,
        emails: vec!["user@example.com".to_string()],
    };
    let gate = PlanGate::new(&table, &dev);
    let mut acct = account("free", 50);
    acct.email = Some("User@Example.COM".to_string());
    assert!(gate.check(Some(&acct), Operation::Scenario).is_allowed());

    acct.email = Some("other@example.com".to_string());
    assert!(!gate.check(Some(&acct), Operation::Scenario).is_allowed());
}

#[test]
fn mixed_case_allow_list_from_config_file_matches() {
    let cfg: crate::AppConfig =
        serde_json::from_str(r#"{"dev":{"emails":[" Dev@Example.com "]}}"#).unwrap();
    let gate = PlanGate::from_config(&cfg);
    let mut acct = account("free", 3);
    acct.email = Some("dev@example.com".to_string());
    assert_eq!(
        gate.check(Some(&acct), Operation::Scenario),
        GateDecision::Allowed
    );
    assert!(!gate.meters(&acct));
}

#[test]
fn deck_is_feature_locked_on_free() {
    let table = PlanTable::default();
    let dev = DevOverride::default();
    let gate = PlanGate::new(&table, &dev);

    let decision = gate.check(Some(&account("free", 0)), Operation::Deck);
    assert_eq!(decision, GateDecision::FeatureLocked { plan: Plan::Free });
    assert!(decision.message().contains("Proプラン限定"));
    assert!(gate
        .check(Some(&account("premium", 0)), Operation::Deck)
        .is_allowed());
}

#[test]
fn pro_scenarios_are_unlimited() {
    let table = PlanTable::default();
    let dev = DevOverride::default();
    let gate = PlanGate::new(&table, &dev);
    let acct = account("pro", 10_000);
    assert!(gate.check(Some(&acct), Operation::Scenario).is_allowed());
    assert_eq!(gate.remaining(&acct, Counter::Scenarios), None);
    assert_eq!(gate.remaining(&acct, Counter::Images), Some(100));
}

#[test]
fn missing_account_requires_sign_in() {
    let table = PlanTable::default();
    let dev = DevOverride::default();
    let gate = PlanGate::new(&table, &dev);
    assert_eq!(
        gate.check(None, Operation::Image),
        GateDecision::SignInRequired
    );
}

#[test]
fn quota_message_shows_counts_and_plan_specific_hint() {
    let free = GateDecision::QuotaExhausted {
        plan: Plan::Free,
        used: 5,
        limit: 5,
    }
    .message();
    assert!(free.contains("FREEプラン"));
    assert!(free.contains("(今月: 5/5回)"));
    assert!(free.contains("Proプランへのアップグレード"));

    let pro = GateDecision::QuotaExhausted {
        plan: Plan::Pro,
        used: 100,
        limit: 100,
    }
    .message();
    assert!(pro.contains("PROプラン"));
    assert!(pro.contains("サポート"));
}

#[test]
fn limit_table_serializes_unlimited_as_null() {
    let json = serde_json::to_value(PlanTable::default()).unwrap();
    assert_eq!(json["pro"]["scenarios"], serde_json::Value::Null);
    assert_eq!(json["free"]["images"], 5);

    let back: PlanTable = serde_json::from_value(json).unwrap();
    assert_eq!(back, PlanTable::default());
}
