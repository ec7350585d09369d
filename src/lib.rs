//! Scenario planner: builds 2x2 "future scenario" matrices with a generation endpoint and
//! exports them as a slide deck, a static HTML page, or a reloadable project file.
//!
//! The pipeline is staged:
//!
//! - [`Planner`] gates each action against the user's plan, calls the endpoint and installs the
//!   validated [`ScenarioSet`] into a [`Workspace`]
//! - [`build_deck`] lays the workspace out as a backend-agnostic [`Deck`]
//! - backends turn a deck into a `.pptx` package, SVG, or PNG previews
//!
//! See [`guide`] for a walkthrough.
#![forbid(unsafe_code)]

pub mod deck;
pub mod export;
pub mod foundation;
pub mod gate;
pub mod generate;
pub mod geometry;
pub mod guide;
pub mod media;
pub mod model;
pub mod project;

pub use crate::foundation::config::AppConfig;
pub use crate::foundation::core::{Point, Rect, Rgb8, Size, SlideSize, Vec2};
pub use crate::foundation::error::{PlannerError, PlannerResult};

pub use crate::deck::builder::build_deck;
pub use crate::deck::model::{Deck, Slide, SlideKind};
pub use crate::deck::pptx::write_pptx;
pub use crate::export::ExportContext;
pub use crate::export::pipeline::{DeckExportOpts, DeckExportStats, Exporter};
pub use crate::gate::plan::{GateDecision, Operation, Plan, PlanGate};
pub use crate::gate::usage::{Account, Counter, JsonFileUsageStore, MemoryUsageStore, UsageStore};
pub use crate::generate::client::{GenerationClient, HelpTurn, HttpGenerationClient};
pub use crate::generate::service::{Outcome, Planner, User};
pub use crate::media::blob::MediaBlob;
pub use crate::model::scenario::{QuadrantId, Scenario, ScenarioSet};
pub use crate::model::session::Workspace;
pub use crate::project::codec::{SavedProject, load_project};
pub use crate::project::history::{
    HistoryEntry, HistoryStore, JsonFileHistoryStore, MemoryHistoryStore,
};
