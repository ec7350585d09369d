use std::path::Path;

use time::Date;

use crate::{
    export::{
        ExportContext,
        pipeline::{DeckExportOpts, DeckExportStats, Exporter},
    },
    foundation::{
        config::AppConfig,
        error::{PlannerError, PlannerResult},
    },
    gate::{
        plan::{GateDecision, Operation, PlanGate},
        usage::{Account, UsageStore},
    },
    generate::{
        client::{GenerationClient, HELP_FALLBACK, HelpTurn},
        prompts::{image_prompt, speech_prompt},
    },
    media::{
        blob::{MIME_PNG, MediaBlob, sniff_image_mime},
        wav::pcm_base64_to_wav,
    },
    model::{
        scenario::{MediaKind, QuadrantId, Scenario},
        session::Workspace,
        validate::parse_scenario_set,
    },
    project::history::{HistoryEntry, HistoryStore},
};

/// The signed-in user an action is performed for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct User<'a> {
    pub id: &'a str,
    pub email: Option<&'a str>,
}

/// Result of a gated action.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome<T> {
    Done(T),
    /// The gate refused; nothing was called and nothing changed.
    Denied(GateDecision),
}

impl<T> Outcome<T> {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    pub fn denial(&self) -> Option<&GateDecision> {
        match self {
            Self::Done(_) => None,
            Self::Denied(d) => Some(d),
        }
    }
}

/// Orchestrates gated generation and export for one workspace.
///
/// Every action follows the same order: gate check, remote call, validation, workspace update,
/// usage increment. A failure at any step leaves the workspace and the counters untouched.
pub struct Planner<'a> {
    config: &'a AppConfig,
    client: &'a dyn GenerationClient,
    usage: &'a dyn UsageStore,
    history: Option<&'a dyn HistoryStore>,
    exporter: Exporter,
}

impl<'a> Planner<'a> {
    pub fn new(
        config: &'a AppConfig,
        client: &'a dyn GenerationClient,
        usage: &'a dyn UsageStore,
    ) -> Self {
        Self {
            config,
            client,
            usage,
            history: None,
            exporter: Exporter::new(),
        }
    }

    /// Record every generated scenario set in `history`.
    pub fn with_history(mut self, history: &'a dyn HistoryStore) -> Self {
        self.history = Some(history);
        self
    }

    pub fn config(&self) -> &AppConfig {
        self.config
    }

    pub fn exporter(&self) -> &Exporter {
        &self.exporter
    }

    async fn authorize(
        &self,
        user: Option<User<'_>>,
        op: Operation,
    ) -> PlannerResult<Result<Account, GateDecision>> {
        let Some(user) = user else {
            return Ok(Err(GateDecision::SignInRequired));
        };
        let account = self.usage.ensure_account(user.id, user.email).await?;
        match PlanGate::from_config(self.config).check(Some(&account), op) {
            GateDecision::Allowed => Ok(Ok(account)),
            denied => {
                tracing::info!(user = user.id, ?op, reason = %denied.message(), "gate denied");
                Ok(Err(denied))
            }
        }
    }

    /// Charge a completed operation. A failed increment is logged; the work is already done.
    async fn charge(&self, user: User<'_>, account: &Account, op: Operation) {
        let Some(counter) = op.counter() else {
            return;
        };
        if !PlanGate::from_config(self.config).meters(account) {
            tracing::debug!(user = user.id, counter = counter.as_str(), "usage not metered");
            return;
        }
        if let Err(e) = self.usage.increment(user.id, counter).await {
            tracing::warn!(user = user.id, counter = counter.as_str(), error = %e, "usage increment failed");
        }
    }

    /// Generate a fresh scenario set from the workspace inputs.
    ///
    /// Returns `Ok(None)` without any call when the theme is blank.
    #[tracing::instrument(skip(self, ws, user), fields(theme = %ws.theme))]
    pub async fn generate_scenarios(
        &self,
        ws: &mut Workspace,
        user: Option<User<'_>>,
    ) -> PlannerResult<Option<Outcome<()>>> {
        if ws.theme.trim().is_empty() {
            return Ok(None);
        }
        let (user, account) = match self.gated(user, Operation::Scenario).await? {
            Ok(pair) => pair,
            Err(denied) => return Ok(Some(Outcome::Denied(denied))),
        };

        let axes = ws.custom_axes.as_ref().filter(|a| !(a.x.is_blank() && a.y.is_blank()));
        let text = self
            .client
            .generate_scenarios(ws.theme.trim(), &ws.details, axes)
            .await?;
        let set = parse_scenario_set(&text)?;
        tracing::info!(scenarios = set.scenarios.len(), "scenario set generated");
        ws.set_result(set);

        self.charge(user, &account, Operation::Scenario).await;
        self.remember(user, ws).await;
        Ok(Some(Outcome::Done(())))
    }

    /// A failed history write is logged; the result is already in the workspace.
    async fn remember(&self, user: User<'_>, ws: &Workspace) {
        let Some(history) = self.history else {
            return;
        };
        let recorded = match HistoryEntry::from_workspace(
            user.id,
            ws,
            &self.config.version,
            time::OffsetDateTime::now_utc(),
        ) {
            Ok(entry) => history.record(entry).await,
            Err(e) => Err(e),
        };
        match recorded {
            Ok(id) => tracing::debug!(user = user.id, id = %id, "history recorded"),
            Err(e) => tracing::warn!(user = user.id, error = %e, "history record failed"),
        }
    }

    /// Generate the illustration for one scenario. `Done(false)` means a newer request
    /// superseded this one and the image was discarded.
    #[tracing::instrument(skip(self, ws, user))]
    pub async fn generate_image(
        &self,
        ws: &mut Workspace,
        quadrant: QuadrantId,
        user: Option<User<'_>>,
    ) -> PlannerResult<Outcome<bool>> {
        let prompt = image_prompt(scenario_in(ws, quadrant)?);
        let (user, account) = match self.gated(user, Operation::Image).await? {
            Ok(pair) => pair,
            Err(denied) => return Ok(Outcome::Denied(denied)),
        };

        let ticket = ws.begin_media(MediaKind::Image, quadrant);
        let b64 = self.client.generate_image(&prompt).await?;
        let raw = MediaBlob::from_base64(MIME_PNG, &b64)?;
        let mime = sniff_image_mime(raw.bytes())
            .ok_or_else(|| PlannerError::media("generated image is not a recognized format"))?;
        let blob = MediaBlob::new(mime, raw.bytes().to_vec());
        tracing::debug!(mime, bytes = blob.len(), "image decoded");
        let stored = ws.complete_media(ticket, blob);

        self.charge(user, &account, Operation::Image).await;
        Ok(Outcome::Done(stored))
    }

    /// Generate narration for one scenario as `audio/wav`.
    ///
    /// Existing narration is reused as-is unless `force` is set; reuse skips the gate and is not
    /// charged.
    #[tracing::instrument(skip(self, ws, user))]
    pub async fn generate_speech(
        &self,
        ws: &mut Workspace,
        quadrant: QuadrantId,
        user: Option<User<'_>>,
        force: bool,
    ) -> PlannerResult<Outcome<bool>> {
        let scenario = scenario_in(ws, quadrant)?;
        if !force && scenario.audio.is_some() {
            tracing::debug!("narration already present");
            return Ok(Outcome::Done(true));
        }
        let prompt = speech_prompt(scenario);
        let (user, account) = match self.gated(user, Operation::Audio).await? {
            Ok(pair) => pair,
            Err(denied) => return Ok(Outcome::Denied(denied)),
        };

        let ticket = ws.begin_media(MediaKind::Audio, quadrant);
        let b64 = self.client.generate_speech(&prompt).await?;
        let wav = pcm_base64_to_wav(&b64, self.config.speech_sample_rate)?;
        let stored = ws.complete_media(ticket, wav);

        self.charge(user, &account, Operation::Audio).await;
        Ok(Outcome::Done(stored))
    }

    /// Build and write the slide deck. Decks are a plan feature, not a metered count.
    #[tracing::instrument(skip(self, ws, user, opts), fields(out = %out.display()))]
    pub async fn export_deck(
        &self,
        ws: &Workspace,
        user: Option<User<'_>>,
        out: &Path,
        opts: &DeckExportOpts,
        today: Date,
    ) -> PlannerResult<Outcome<DeckExportStats>> {
        if let Err(denied) = self.gated(user, Operation::Deck).await? {
            return Ok(Outcome::Denied(denied));
        }
        let ctx = ExportContext::from_workspace(ws, self.config, today)?;
        let stats = self
            .exporter
            .export_deck(&ctx, self.client, out, opts)
            .await?;
        Ok(Outcome::Done(stats))
    }

    pub fn export_html(&self, ws: &Workspace, out: &Path, today: Date) -> PlannerResult<usize> {
        let ctx = ExportContext::from_workspace(ws, self.config, today)?;
        self.exporter.export_html(&ctx, out)
    }

    /// Ask the help assistant. The question and the answer are appended to `chat`; a failed
    /// request answers with [`HELP_FALLBACK`]. Blank questions return `None` without a call.
    ///
    /// Help is not gated and not metered.
    pub async fn help(&self, question: &str, chat: &mut Vec<HelpTurn>) -> Option<String> {
        if question.trim().is_empty() {
            return None;
        }
        let answer = match self.client.help(question, chat.as_slice()).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(error = %e, "help request failed");
                HELP_FALLBACK.to_string()
            }
        };
        chat.push(HelpTurn::user(question));
        chat.push(HelpTurn::ai(answer.clone()));
        Some(answer)
    }

    async fn gated<'u>(
        &self,
        user: Option<User<'u>>,
        op: Operation,
    ) -> PlannerResult<Result<(User<'u>, Account), GateDecision>> {
        Ok(match (user, self.authorize(user, op).await?) {
            (Some(user), Ok(account)) => Ok((user, account)),
            (_, Err(denied)) => Err(denied),
            (None, Ok(_)) => Err(GateDecision::SignInRequired),
        })
    }
}

fn scenario_in(ws: &Workspace, quadrant: QuadrantId) -> PlannerResult<&Scenario> {
    ws.result()
        .and_then(|set| set.scenario(quadrant))
        .ok_or_else(|| {
            PlannerError::validation(format!("no scenario {} in the workspace", quadrant.letter()))
        })
}

#[cfg(test)]
#[path = "../../tests/unit/generate/service.rs"]
mod tests;
