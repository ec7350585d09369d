use super::*;

#[tokio::test]
async fn memory_store_creates_then_increments() {
    let store = MemoryUsageStore::new();
    assert!(store.load("u1").await.unwrap().is_none());

    let acct = store
        .ensure_account("u1", Some("a@example.com"))
        .await
        .unwrap();
    assert_eq!(acct.plan, "free");
    assert_eq!(acct.usage, Usage::default());

    assert_eq!(store.increment("u1", Counter::Images).await.unwrap(), 1);
    assert_eq!(store.increment("u1", Counter::Images).await.unwrap(), 2);
    let acct = store.load("u1").await.unwrap().unwrap();
    assert_eq!(acct.usage.images, 2);
    assert_eq!(acct.usage.scenarios, 0);
}

#[tokio::test]
async fn increment_of_unknown_user_is_rejected() {
    let store = MemoryUsageStore::new();
    assert!(matches!(
        store.increment("ghost", Counter::Audios).await,
        Err(PlannerError::Validation(_))
    ));
}

#[tokio::test]
async fn ensure_account_keeps_existing_plan_and_usage() {
    let mut existing = Account::new("premium", None);
    existing.usage.scenarios = 7;
    let store = MemoryUsageStore::new().with_account("u1", existing);

    let merged = store
        .ensure_account("u1", Some("late@example.com"))
        .await
        .unwrap();
    assert_eq!(merged.plan, "premium");
    assert_eq!(merged.usage.scenarios, 7);
    assert_eq!(merged.email.as_deref(), Some("late@example.com"));
}

#[tokio::test]
async fn json_file_store_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("usage.json");

    let store = JsonFileUsageStore::new(&path);
    store.ensure_account("u1", None).await.unwrap();
    store.increment("u1", Counter::Scenarios).await.unwrap();

    let reopened = JsonFileUsageStore::new(&path);
    let acct = reopened.load("u1").await.unwrap().unwrap();
    assert_eq!(acct.usage.scenarios, 1);

    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(doc["u1"]["usage"]["scenarios"], 1);
}

#[test]
fn account_json_tolerates_missing_fields() {
    let acct: Account = serde_json::from_str(r#"{ "usage": { "images": 4 } }"#).unwrap();
    assert_eq!(acct.plan, "free");
    assert_eq!(acct.usage.images, 4);
    assert_eq!(acct.usage.audios, 0);
}
