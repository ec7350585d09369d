pub mod html;
pub mod pipeline;

use time::{Date, macros::format_description};

use crate::{
    foundation::{
        config::AppConfig,
        error::{PlannerError, PlannerResult},
    },
    model::{scenario::ScenarioSet, session::Workspace},
};

/// Everything a renderer needs from the current workspace.
#[derive(Clone, Copy, Debug)]
pub struct ExportContext<'a> {
    pub theme: &'a str,
    pub details: &'a str,
    pub result: &'a ScenarioSet,
    pub config: &'a AppConfig,
    pub generated_on: Date,
}

impl<'a> ExportContext<'a> {
    pub fn from_workspace(
        ws: &'a Workspace,
        config: &'a AppConfig,
        generated_on: Date,
    ) -> PlannerResult<Self> {
        let result = ws
            .result()
            .ok_or_else(|| PlannerError::validation("nothing to export: no scenarios generated"))?;
        Ok(Self {
            theme: &ws.theme,
            details: &ws.details,
            result,
            config,
            generated_on,
        })
    }

    /// Whether `details` is long enough to be summarized for the cover.
    pub fn details_need_summary(&self) -> bool {
        self.details.chars().count() > self.config.summarize_threshold_chars
    }

    /// `2026/1/15`
    pub fn generated_on_label(&self) -> String {
        let fmt = format_description!("[year]/[month padding:none]/[day padding:none]");
        self.generated_on
            .format(&fmt)
            .unwrap_or_else(|_| self.generated_on.to_string())
    }
}
