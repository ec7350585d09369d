use std::path::Path;

use anyhow::Context;

use crate::{
    foundation::error::{PlannerError, PlannerResult},
    gate::plan::{DevOverride, PlanTable},
};

/// Env var overriding [`AppConfig::endpoint`].
pub const ENV_ENDPOINT: &str = "SCENARIO_PLANNER_ENDPOINT";
/// Env var enabling the global unlimited override (`"true"`).
pub const ENV_DEV_UNLIMITED: &str = "SCENARIO_PLANNER_DEV_UNLIMITED";
/// Env var listing comma-separated emails that bypass plan limits.
pub const ENV_DEV_UNLIMITED_EMAILS: &str = "SCENARIO_PLANNER_DEV_UNLIMITED_EMAILS";

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Application-wide settings.
///
/// Constructed once at startup and passed by reference to the components that need it
/// (gate, generator, deck builder, HTML exporter). There is no ambient global configuration.
pub struct AppConfig {
    /// Display name stamped on covers and HTML headers.
    pub app_name: String,
    /// Version string stamped on covers and saved projects.
    pub version: String,
    /// Copyright footer printed on every page.
    pub copyright: String,
    /// Generation endpoint URL (accepts `{mode, ...}` JSON posts).
    pub endpoint: String,
    /// Per-request timeout for the generation endpoint.
    pub request_timeout_secs: u64,
    /// `details` longer than this many characters is summarized before building a cover.
    pub summarize_threshold_chars: usize,
    /// Sample rate of PCM returned by the speech endpoint.
    pub speech_sample_rate: u32,
    /// Raster density for slide previews and embedded chart pictures.
    pub preview_px_per_inch: f64,
    /// Plan limit table.
    pub plans: PlanTable,
    /// Developer bypass of all plan checks.
    pub dev: DevOverride,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "AI Scenario Planner".to_string(),
            version: "v.0.1.7".to_string(),
            copyright: "© 2026 GURISAN. All Rights Reserved".to_string(),
            endpoint: "http://localhost:3000/api/generate".to_string(),
            request_timeout_secs: 120,
            summarize_threshold_chars: 100,
            speech_sample_rate: crate::media::wav::DEFAULT_SAMPLE_RATE,
            preview_px_per_inch: 144.0,
            plans: PlanTable::default(),
            dev: DevOverride::default(),
        }
    }
}

impl AppConfig {
    /// Load a JSON config file; missing fields fall back to [`AppConfig::default`].
    pub fn from_path(path: &Path) -> PlannerResult<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&raw)
            .map_err(|e| PlannerError::serde(format!("config '{}': {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply process environment overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(endpoint) = lookup(ENV_ENDPOINT).filter(|v| !v.trim().is_empty()) {
            self.endpoint = endpoint.trim().to_string();
        }
        if let Some(flag) = lookup(ENV_DEV_UNLIMITED) {
            self.dev.global = flag.trim() == "true";
        }
        if let Some(emails) = lookup(ENV_DEV_UNLIMITED_EMAILS) {
            self.dev.emails = emails
                .split(',')
                .map(|email| email.trim().to_lowercase())
                .filter(|email| !email.is_empty())
                .collect();
        }
        self
    }

    pub fn validate(&self) -> PlannerResult<()> {
        if self.endpoint.trim().is_empty() {
            return Err(PlannerError::validation("endpoint must not be empty"));
        }
        if self.speech_sample_rate == 0 {
            return Err(PlannerError::validation("speech_sample_rate must be > 0"));
        }
        if !self.preview_px_per_inch.is_finite() || self.preview_px_per_inch <= 0.0 {
            return Err(PlannerError::validation(
                "preview_px_per_inch must be finite and > 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
