//! # Scenario planner guide (v0.1.7)
//!
//! A walkthrough of how a scenario set is generated, held, and exported. For command-line usage
//! run `scenario-planner --help`.
//!
//! ---
//!
//! ## Core concepts
//!
//! - [`ScenarioSet`](crate::ScenarioSet): two axes and four [`Scenario`](crate::Scenario)s, one
//!   per quadrant
//! - [`QuadrantId`](crate::QuadrantId): `A` (top-left) through `D` (bottom-right), derived from a
//!   scenario's `id` text; colors follow from the quadrant and are never stored
//! - [`Workspace`](crate::Workspace): the current theme, details, optional custom axes and result
//! - [`Planner`](crate::Planner): gated generation against a
//!   [`GenerationClient`](crate::GenerationClient) and a [`UsageStore`](crate::UsageStore)
//! - [`Deck`](crate::Deck): slides made of positioned shapes, text, pictures, radar charts and
//!   audio clips, in inches on a 10 x 5.625 page
//!
//! Data flows one way: inputs go through [`Planner::generate_scenarios`](crate::Planner::generate_scenarios)
//! into the workspace, and the deck builder, HTML exporter and project codec each read the
//! workspace independently.
//!
//! ---
//!
//! ## Generating
//!
//! ```rust,no_run
//! use scenario_planner::{
//!     AppConfig, HttpGenerationClient, MemoryUsageStore, Outcome, Planner, QuadrantId, User,
//!     Workspace,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> scenario_planner::PlannerResult<()> {
//! let cfg = AppConfig::default().with_env_overrides();
//! let client = HttpGenerationClient::from_config(&cfg)?;
//! let usage = MemoryUsageStore::new();
//! let planner = Planner::new(&cfg, &client, &usage);
//!
//! let user = User { id: "local", email: None };
//! let mut ws = Workspace::new("Future of urban mobility", "");
//! match planner.generate_scenarios(&mut ws, Some(user)).await? {
//!     Some(Outcome::Done(())) => {}
//!     Some(Outcome::Denied(decision)) => eprintln!("{}", decision.message()),
//!     None => eprintln!("enter a theme first"),
//! }
//! planner.generate_image(&mut ws, QuadrantId::A, Some(user)).await?;
//! # Ok(())
//! # }
//! ```
//!
//! Every gated action runs in the same order: gate check, remote call, validation, workspace
//! update, usage increment. Gate denials are values ([`GateDecision`](crate::GateDecision)), not
//! errors. Remote and validation failures are errors and leave the workspace as it was.
//!
//! ---
//!
//! ## Media tickets
//!
//! Image and narration regeneration are tracked per `(kind, quadrant)` slot.
//! [`Workspace::begin_media`](crate::Workspace::begin_media) issues a ticket and
//! [`Workspace::complete_media`](crate::Workspace::complete_media) only accepts the newest one, so
//! a slow response for an old request can never overwrite a newer image. Replacing the result
//! invalidates every outstanding ticket.
//!
//! Speech arrives as raw 16-bit PCM and is wrapped into a 44-byte-header WAV by
//! [`pcm_base64_to_wav`](crate::media::wav::pcm_base64_to_wav).
//!
//! ---
//!
//! ## Exporting
//!
//! [`Exporter`](crate::Exporter) runs one export at a time; a second export while one is running
//! fails with [`PlannerError::Busy`](crate::PlannerError::Busy).
//!
//! - Deck: long details are summarized once for the cover, the deck is built, written as a
//!   `.pptx` package, and optionally rendered to one PNG per slide via `usvg`/`resvg`.
//!   Media that fails to decode is logged and left out; the rest of the deck still exports.
//! - HTML: one self-contained file with inlined CSS, base64 media and the toggle/audio scripts.
//! - Project: JSON with the inputs, the result and base64 media, restorable with
//!   [`load_project`](crate::load_project).
//!
//! Every file is written to a sibling temp file first and renamed into place.
//!
//! ---
//!
//! ## History and help
//!
//! Attach a [`HistoryStore`](crate::HistoryStore) with
//! [`Planner::with_history`](crate::Planner::with_history) and every generated set is recorded
//! for its user; [`HistoryEntry::into_workspace`](crate::HistoryEntry::into_workspace) brings one
//! back. [`Planner::help`](crate::Planner::help) runs the help chat against the same endpoint and
//! never fails: a broken request answers with a fixed apology.
//!
//! ---
//!
//! ## Configuration
//!
//! [`AppConfig`](crate::AppConfig) is loaded from JSON (missing fields take defaults) and then
//! overlaid with `SCENARIO_PLANNER_ENDPOINT`, `SCENARIO_PLANNER_DEV_UNLIMITED` and
//! `SCENARIO_PLANNER_DEV_UNLIMITED_EMAILS`. It is passed by reference; nothing reads global state.
