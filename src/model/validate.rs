use std::collections::HashSet;

use crate::{
    foundation::error::{PlannerError, PlannerResult},
    model::scenario::{ALLOCATION_SUBJECTS, QuadrantId, Scenario, ScenarioSet},
};

pub const SCENARIO_COUNT: usize = 4;
pub const EARLY_SIGN_COUNT: usize = 3;
pub const ALLOCATION_MIN: u8 = 1;
pub const ALLOCATION_MAX: u8 = 5;

/// Parse the generation endpoint's `text` payload and validate it.
///
/// Models sometimes wrap JSON in a Markdown code fence; a single surrounding fence is
/// stripped before parsing.
pub fn parse_scenario_set(text: &str) -> PlannerResult<ScenarioSet> {
    let body = strip_code_fence(text);
    let set: ScenarioSet = serde_json::from_str(body)
        .map_err(|e| PlannerError::validation(format!("scenario payload: {e}")))?;
    set.validate()?;
    Ok(set)
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

impl ScenarioSet {
    /// Enforce the shape every consumer relies on: four scenarios, one per quadrant, each with
    /// three early signs and a five-entry allocation over the fixed subjects.
    pub fn validate(&self) -> PlannerResult<()> {
        if self.scenarios.len() != SCENARIO_COUNT {
            return Err(PlannerError::validation(format!(
                "expected {SCENARIO_COUNT} scenarios, got {}",
                self.scenarios.len()
            )));
        }

        let mut seen = HashSet::new();
        for s in &self.scenarios {
            let q = QuadrantId::find_in(&s.id).ok_or_else(|| {
                PlannerError::validation(format!("scenario id '{}' names no quadrant", s.id))
            })?;
            if !seen.insert(q) {
                return Err(PlannerError::validation(format!(
                    "quadrant {} appears more than once",
                    q.letter()
                )));
            }
            s.validate()?;
        }
        Ok(())
    }
}

impl Scenario {
    pub fn validate(&self) -> PlannerResult<()> {
        if self.title.trim().is_empty() {
            return Err(PlannerError::validation(format!(
                "{}: title must be non-empty",
                self.id
            )));
        }
        if self.early_signs.len() != EARLY_SIGN_COUNT {
            return Err(PlannerError::validation(format!(
                "{}: expected {EARLY_SIGN_COUNT} early signs, got {}",
                self.id,
                self.early_signs.len()
            )));
        }
        if self.allocation.len() != ALLOCATION_SUBJECTS.len() {
            return Err(PlannerError::validation(format!(
                "{}: expected {} allocation entries, got {}",
                self.id,
                ALLOCATION_SUBJECTS.len(),
                self.allocation.len()
            )));
        }
        for (i, (entry, subject)) in self.allocation.iter().zip(ALLOCATION_SUBJECTS).enumerate() {
            if entry.subject != subject {
                return Err(PlannerError::validation(format!(
                    "{}: allocation[{i}] subject must be '{subject}', got '{}'",
                    self.id, entry.subject
                )));
            }
            if !(ALLOCATION_MIN..=ALLOCATION_MAX).contains(&entry.val) {
                return Err(PlannerError::validation(format!(
                    "{}: allocation[{i}] value {} outside {ALLOCATION_MIN}..={ALLOCATION_MAX}",
                    self.id, entry.val
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/validate.rs"]
mod tests;
