//! Per-user generation history.
//!
//! Every successful scenario generation can be recorded as a [`HistoryEntry`]: the inputs, the
//! text result and the app version. Media is not part of an entry; a restored workspace starts
//! without images or narration.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::Context;
use time::OffsetDateTime;

use crate::{
    foundation::error::{PlannerError, PlannerResult},
    model::{
        scenario::{CustomAxes, ScenarioSet},
        session::Workspace,
    },
};

/// One recorded generation.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Assigned by the store on [`HistoryStore::record`].
    #[serde(default)]
    pub id: String,
    pub user_id: String,
    pub theme: String,
    /// Background details as entered.
    #[serde(default)]
    pub context: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_axes: Option<CustomAxes>,
    pub result: ScenarioSet,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default)]
    pub app_version: String,
}

impl HistoryEntry {
    /// Snapshot the workspace inputs and result. Fails when there is no result.
    pub fn from_workspace(
        user_id: &str,
        ws: &Workspace,
        app_version: &str,
        created_at: OffsetDateTime,
    ) -> PlannerResult<Self> {
        let result = ws
            .result()
            .cloned()
            .ok_or_else(|| PlannerError::validation("nothing to record: no scenarios generated"))?;
        Ok(Self {
            id: String::new(),
            user_id: user_id.to_string(),
            theme: ws.theme.clone(),
            context: ws.details.clone(),
            custom_axes: ws
                .custom_axes
                .clone()
                .filter(|a| !(a.x.is_blank() && a.y.is_blank())),
            result,
            created_at,
            app_version: app_version.to_string(),
        })
    }

    /// Rebuild a workspace from this entry. The result's axes become the fixed axes, so a
    /// regeneration keeps the same matrix frame.
    pub fn into_workspace(self) -> Workspace {
        let mut ws = Workspace::new(self.theme, self.context);
        ws.custom_axes = Some(CustomAxes {
            x: self.result.axis_x.clone(),
            y: self.result.axis_y.clone(),
        });
        ws.set_result(self.result);
        ws
    }
}

/// Generation history keyed by user id.
#[async_trait::async_trait]
pub trait HistoryStore: Send + Sync {
    /// Append an entry for `entry.user_id`, returning its assigned id.
    async fn record(&self, entry: HistoryEntry) -> PlannerResult<String>;

    /// All entries of a user, newest first.
    async fn list(&self, user_id: &str) -> PlannerResult<Vec<HistoryEntry>>;

    async fn load(&self, user_id: &str, id: &str) -> PlannerResult<Option<HistoryEntry>>;
}

type Entries = BTreeMap<String, Vec<HistoryEntry>>;

fn append(entries: &mut Entries, mut entry: HistoryEntry) -> String {
    let list = entries.entry(entry.user_id.clone()).or_default();
    entry.id = format!("h{}", list.len() + 1);
    let id = entry.id.clone();
    list.push(entry);
    id
}

/// Newest `created_at` first; entries recorded later win ties.
fn newest_first(entries: &Entries, user_id: &str) -> Vec<HistoryEntry> {
    let mut out: Vec<HistoryEntry> = entries
        .get(user_id)
        .map(|list| list.iter().rev().cloned().collect())
        .unwrap_or_default();
    out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    out
}

fn find(entries: &Entries, user_id: &str, id: &str) -> Option<HistoryEntry> {
    entries
        .get(user_id)
        .and_then(|list| list.iter().find(|e| e.id == id))
        .cloned()
}

#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    entries: Mutex<Entries>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn record(&self, entry: HistoryEntry) -> PlannerResult<String> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(append(&mut entries, entry))
    }

    async fn list(&self, user_id: &str) -> PlannerResult<Vec<HistoryEntry>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(newest_first(&entries, user_id))
    }

    async fn load(&self, user_id: &str, id: &str) -> PlannerResult<Option<HistoryEntry>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(find(&entries, user_id, id))
    }
}

/// One JSON document mapping user id to that user's entries in recording order.
#[derive(Debug)]
pub struct JsonFileHistoryStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> PlannerResult<Entries> {
        if !self.path.exists() {
            return Ok(Entries::new());
        }
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("read history db '{}'", self.path.display()))?;
        if raw.trim().is_empty() {
            return Ok(Entries::new());
        }
        serde_json::from_str(&raw)
            .map_err(|e| PlannerError::serde(format!("history db '{}': {e}", self.path.display())))
    }
}

#[async_trait::async_trait]
impl HistoryStore for JsonFileHistoryStore {
    #[tracing::instrument(skip(self, entry), fields(path = %self.path.display(), user = %entry.user_id))]
    async fn record(&self, entry: HistoryEntry) -> PlannerResult<String> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries = self.read_all()?;
        let id = append(&mut entries, entry);
        let body = serde_json::to_vec_pretty(&entries)?;
        crate::export::pipeline::write_atomic(&self.path, &body)?;
        tracing::debug!(id = %id, "history entry recorded");
        Ok(id)
    }

    async fn list(&self, user_id: &str) -> PlannerResult<Vec<HistoryEntry>> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        Ok(newest_first(&self.read_all()?, user_id))
    }

    async fn load(&self, user_id: &str, id: &str) -> PlannerResult<Option<HistoryEntry>> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        Ok(find(&self.read_all()?, user_id, id))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/project/history.rs"]
mod tests;
