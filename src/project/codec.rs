//! Saved project files.
//!
//! A project is one pretty-printed JSON document:
//!
//! ```json
//! {
//!   "meta": { "appVersion": "v.0.1.7", "copyright": "...", "savedAt": "2026-01-01T00:00:00Z" },
//!   "theme": "...",
//!   "details": "...",
//!   "result": { "axisX": {...}, "scenarios": [{ ..., "savedImage": "<b64>", "savedAudio": null }] },
//!   "customAxes": { "x": {...}, "y": {...} }
//! }
//! ```
//!
//! Media travels as bare base64 in `savedImage` / `savedAudio`. Loading never touches the
//! caller's workspace until the whole document has parsed and validated.

use std::path::Path;

use anyhow::Context;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{
    foundation::{
        config::AppConfig,
        error::{PlannerError, PlannerResult},
    },
    media::blob::{MIME_PNG, MIME_WAV, MediaBlob, sniff_image_mime},
    model::{
        scenario::{Axis, CustomAxes, Scenario, ScenarioSet},
        session::Workspace,
    },
};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMeta {
    pub app_version: String,
    #[serde(default)]
    pub copyright: String,
    /// RFC 3339, UTC.
    pub saved_at: String,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedScenario {
    #[serde(flatten)]
    scenario: Scenario,
    #[serde(default)]
    saved_image: Option<String>,
    #[serde(default)]
    saved_audio: Option<String>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedResult {
    axis_x: Axis,
    axis_y: Axis,
    #[serde(default)]
    rationale: String,
    #[serde(default)]
    portfolio_analysis: String,
    scenarios: Vec<SavedScenario>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedProjectDoc {
    meta: ProjectMeta,
    theme: String,
    #[serde(default)]
    details: String,
    result: SavedResult,
    #[serde(default)]
    custom_axes: Option<CustomAxes>,
}

/// A project restored from disk.
#[derive(Clone, Debug, PartialEq)]
pub struct SavedProject {
    pub meta: ProjectMeta,
    pub theme: String,
    pub details: String,
    pub result: ScenarioSet,
    pub custom_axes: Option<CustomAxes>,
}

impl SavedProject {
    /// Replace `ws` with this project's inputs and result.
    pub fn into_workspace(self) -> Workspace {
        let mut ws = Workspace::new(self.theme, self.details);
        ws.custom_axes = self.custom_axes.filter(|a| !(a.x.is_blank() && a.y.is_blank()));
        ws.set_result(self.result);
        ws
    }
}

fn save_scenario(s: &Scenario) -> SavedScenario {
    SavedScenario {
        scenario: s.clone(),
        saved_image: s.image.as_ref().map(MediaBlob::to_base64),
        saved_audio: s.audio.as_ref().map(MediaBlob::to_base64),
    }
}

fn restore_scenario(saved: SavedScenario) -> PlannerResult<Scenario> {
    let mut s = saved.scenario;
    s.image = match saved.saved_image.filter(|b| !b.is_empty()) {
        Some(b64) => {
            let blob = MediaBlob::from_base64(MIME_PNG, &b64)?;
            let mime = sniff_image_mime(blob.bytes()).unwrap_or(MIME_PNG);
            Some(MediaBlob::new(mime, blob.bytes().to_vec()))
        }
        None => None,
    };
    s.audio = match saved.saved_audio.filter(|b| !b.is_empty()) {
        Some(b64) => Some(MediaBlob::from_base64(MIME_WAV, &b64)?),
        None => None,
    };
    Ok(s)
}

/// Serialize the workspace as a project document.
///
/// Fails when the workspace has no result yet.
pub fn encode_project(
    ws: &Workspace,
    cfg: &AppConfig,
    saved_at: OffsetDateTime,
) -> PlannerResult<Vec<u8>> {
    let set = ws
        .result()
        .ok_or_else(|| PlannerError::validation("nothing to save: no scenarios generated"))?;
    let saved_at = saved_at
        .to_offset(time::UtcOffset::UTC)
        .format(&Rfc3339)
        .map_err(|e| PlannerError::serde(format!("format savedAt: {e}")))?;

    let doc = SavedProjectDoc {
        meta: ProjectMeta {
            app_version: cfg.version.clone(),
            copyright: cfg.copyright.clone(),
            saved_at,
        },
        theme: ws.theme.clone(),
        details: ws.details.clone(),
        result: SavedResult {
            axis_x: set.axis_x.clone(),
            axis_y: set.axis_y.clone(),
            rationale: set.rationale.clone(),
            portfolio_analysis: set.portfolio_analysis.clone(),
            scenarios: set.scenarios.iter().map(save_scenario).collect(),
        },
        custom_axes: ws.custom_axes.clone(),
    };
    Ok(serde_json::to_vec_pretty(&doc)?)
}

/// Parse and validate a project document, restoring media blobs.
pub fn decode_project(bytes: &[u8]) -> PlannerResult<SavedProject> {
    let doc: SavedProjectDoc = serde_json::from_slice(bytes)?;
    let scenarios = doc
        .result
        .scenarios
        .into_iter()
        .map(restore_scenario)
        .collect::<PlannerResult<Vec<_>>>()?;
    let result = ScenarioSet {
        axis_x: doc.result.axis_x,
        axis_y: doc.result.axis_y,
        rationale: doc.result.rationale,
        portfolio_analysis: doc.result.portfolio_analysis,
        scenarios,
    };
    result.validate()?;
    Ok(SavedProject {
        meta: doc.meta,
        theme: doc.theme,
        details: doc.details,
        result,
        custom_axes: doc.custom_axes,
    })
}

pub fn load_project(path: &Path) -> PlannerResult<SavedProject> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read project '{}'", path.display()))?;
    decode_project(&bytes)
}

/// `{theme}{suffix}` with every whitespace run (and any path separator) in `theme` replaced
/// by a single `_`.
pub fn export_file_name(theme: &str, suffix: &str) -> String {
    let mut out = String::with_capacity(theme.len() + suffix.len());
    let mut in_run = false;
    for c in theme.chars() {
        if c.is_whitespace() || c == '/' || c == '\\' {
            if !in_run {
                out.push('_');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out.push_str(suffix);
    out
}

pub fn project_file_name(theme: &str) -> String {
    export_file_name(theme, "_project.json")
}

#[cfg(test)]
#[path = "../../tests/unit/project/codec.rs"]
mod tests;
