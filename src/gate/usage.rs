use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::Context;

use crate::foundation::error::{PlannerError, PlannerResult};

/// Per-kind usage counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Counter {
    Scenarios,
    Images,
    Audios,
}

impl Counter {
    pub const ALL: [Self; 3] = [Self::Scenarios, Self::Images, Self::Audios];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scenarios => "scenarios",
            Self::Images => "images",
            Self::Audios => "audios",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Monotonic usage counters for the current period.
pub struct Usage {
    pub scenarios: u64,
    pub images: u64,
    pub audios: u64,
}

impl Usage {
    pub fn get(&self, counter: Counter) -> u64 {
        match counter {
            Counter::Scenarios => self.scenarios,
            Counter::Images => self.images,
            Counter::Audios => self.audios,
        }
    }

    /// Add one to `counter`, returning the new value.
    pub fn increment(&mut self, counter: Counter) -> u64 {
        let slot = match counter {
            Counter::Scenarios => &mut self.scenarios,
            Counter::Images => &mut self.images,
            Counter::Audios => &mut self.audios,
        };
        *slot = slot.saturating_add(1);
        *slot
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Account record as held by the external store.
pub struct Account {
    /// Raw plan string; normalized by the gate.
    #[serde(default = "default_plan")]
    pub plan: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub usage: Usage,
}

fn default_plan() -> String {
    "free".to_string()
}

impl Account {
    pub fn new(plan: impl Into<String>, email: Option<String>) -> Self {
        Self {
            plan: plan.into(),
            email,
            usage: Usage::default(),
        }
    }
}

/// Account/usage persistence keyed by user id.
#[async_trait::async_trait]
pub trait UsageStore: Send + Sync {
    async fn load(&self, user_id: &str) -> PlannerResult<Option<Account>>;

    /// Create the account on first sign-in, or merge a newly known email into it.
    async fn ensure_account(&self, user_id: &str, email: Option<&str>) -> PlannerResult<Account>;

    /// Atomically add one to `counter`, returning the new value.
    async fn increment(&self, user_id: &str, counter: Counter) -> PlannerResult<u64>;
}

fn merge_account(
    accounts: &mut BTreeMap<String, Account>,
    user_id: &str,
    email: Option<&str>,
) -> Account {
    let account = accounts
        .entry(user_id.to_string())
        .or_insert_with(|| Account::new(default_plan(), None));
    if let Some(email) = email.filter(|e| !e.trim().is_empty()) {
        account.email = Some(email.trim().to_string());
    }
    account.clone()
}

fn increment_in(
    accounts: &mut BTreeMap<String, Account>,
    user_id: &str,
    counter: Counter,
) -> PlannerResult<u64> {
    let account = accounts
        .get_mut(user_id)
        .ok_or_else(|| PlannerError::validation(format!("unknown user '{user_id}'")))?;
    Ok(account.usage.increment(counter))
}

/// Process-local store, used by tests and single-run CLI sessions.
#[derive(Debug, Default)]
pub struct MemoryUsageStore {
    accounts: Mutex<BTreeMap<String, Account>>,
}

impl MemoryUsageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(self, user_id: impl Into<String>, account: Account) -> Self {
        self.accounts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(user_id.into(), account);
        self
    }
}

#[async_trait::async_trait]
impl UsageStore for MemoryUsageStore {
    async fn load(&self, user_id: &str) -> PlannerResult<Option<Account>> {
        let accounts = self.accounts.lock().unwrap_or_else(|e| e.into_inner());
        Ok(accounts.get(user_id).cloned())
    }

    async fn ensure_account(&self, user_id: &str, email: Option<&str>) -> PlannerResult<Account> {
        let mut accounts = self.accounts.lock().unwrap_or_else(|e| e.into_inner());
        Ok(merge_account(&mut accounts, user_id, email))
    }

    async fn increment(&self, user_id: &str, counter: Counter) -> PlannerResult<u64> {
        let mut accounts = self.accounts.lock().unwrap_or_else(|e| e.into_inner());
        increment_in(&mut accounts, user_id, counter)
    }
}

/// One JSON document mapping user id to [`Account`].
///
/// Every mutation is a locked read-modify-write followed by a write to a sibling temp file and
/// a rename, so readers never observe a half-written document.
#[derive(Debug)]
pub struct JsonFileUsageStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileUsageStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> PlannerResult<BTreeMap<String, Account>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("read usage db '{}'", self.path.display()))?;
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw)
            .map_err(|e| PlannerError::serde(format!("usage db '{}': {e}", self.path.display())))
    }

    fn write_all(&self, accounts: &BTreeMap<String, Account>) -> PlannerResult<()> {
        let body = serde_json::to_vec_pretty(accounts)?;
        crate::export::pipeline::write_atomic(&self.path, &body)
    }

    fn mutate<T>(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, Account>) -> PlannerResult<T>,
    ) -> PlannerResult<T> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut accounts = self.read_all()?;
        let out = f(&mut accounts)?;
        self.write_all(&accounts)?;
        Ok(out)
    }
}

#[async_trait::async_trait]
impl UsageStore for JsonFileUsageStore {
    async fn load(&self, user_id: &str) -> PlannerResult<Option<Account>> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        Ok(self.read_all()?.remove(user_id))
    }

    async fn ensure_account(&self, user_id: &str, email: Option<&str>) -> PlannerResult<Account> {
        self.mutate(|accounts| Ok(merge_account(accounts, user_id, email)))
    }

    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    async fn increment(&self, user_id: &str, counter: Counter) -> PlannerResult<u64> {
        let value = self.mutate(|accounts| increment_in(accounts, user_id, counter))?;
        tracing::debug!(counter = counter.as_str(), value, "usage incremented");
        Ok(value)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gate/usage.rs"]
mod tests;
