use std::collections::HashMap;

use crate::{
    media::blob::MediaBlob,
    model::scenario::{CustomAxes, MediaKind, QuadrantId, ScenarioSet},
};

/// Claim on one media slot (kind x quadrant) for an in-flight generation.
///
/// Only the most recently issued ticket for a slot may write to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MediaTicket {
    pub kind: MediaKind,
    pub quadrant: QuadrantId,
    seq: u64,
}

/// In-memory application state: the inputs of the current analysis and its result.
#[derive(Clone, Debug, Default)]
pub struct Workspace {
    pub theme: String,
    pub details: String,
    pub custom_axes: Option<CustomAxes>,
    result: Option<ScenarioSet>,
    next_seq: u64,
    latest: HashMap<(MediaKind, QuadrantId), u64>,
}

impl Workspace {
    pub fn new(theme: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            theme: theme.into(),
            details: details.into(),
            ..Self::default()
        }
    }

    pub fn result(&self) -> Option<&ScenarioSet> {
        self.result.as_ref()
    }

    pub fn result_mut(&mut self) -> Option<&mut ScenarioSet> {
        self.result.as_mut()
    }

    /// Install a new result. Outstanding media tickets become stale.
    pub fn set_result(&mut self, set: ScenarioSet) {
        self.latest.clear();
        self.result = Some(set);
    }

    /// Drop the current result before a new analysis. Outstanding media tickets become stale.
    pub fn clear(&mut self) {
        self.latest.clear();
        self.result = None;
    }

    /// Issue a ticket for regenerating `kind` media of `quadrant`, superseding earlier ones.
    pub fn begin_media(&mut self, kind: MediaKind, quadrant: QuadrantId) -> MediaTicket {
        self.next_seq += 1;
        self.latest.insert((kind, quadrant), self.next_seq);
        MediaTicket {
            kind,
            quadrant,
            seq: self.next_seq,
        }
    }

    pub fn is_current(&self, ticket: &MediaTicket) -> bool {
        self.latest.get(&(ticket.kind, ticket.quadrant)) == Some(&ticket.seq)
    }

    /// Store a completed generation. Returns `false` (and drops `blob`) when the ticket was
    /// superseded, the result was replaced, or the quadrant has no scenario.
    pub fn complete_media(&mut self, ticket: MediaTicket, blob: MediaBlob) -> bool {
        if !self.is_current(&ticket) {
            tracing::debug!(
                kind = ?ticket.kind,
                quadrant = ?ticket.quadrant,
                "discarding stale media result"
            );
            return false;
        }
        let Some(scenario) = self
            .result
            .as_mut()
            .and_then(|set| set.scenario_mut(ticket.quadrant))
        else {
            return false;
        };
        *scenario.media_slot(ticket.kind) = Some(blob);
        self.latest.remove(&(ticket.kind, ticket.quadrant));
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/session.rs"]
mod tests;
