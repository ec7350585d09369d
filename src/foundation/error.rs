/// Convenience result type used across the planner.
pub type PlannerResult<T> = Result<T, PlannerError>;

/// Top-level error taxonomy used by planner APIs.
///
/// Quota and plan denials are deliberately absent: those are ordinary control flow and are
/// reported through [`crate::GateDecision`].
#[derive(thiserror::Error, Debug)]
pub enum PlannerError {
    /// Invalid user-provided data or a payload that violates the scenario schema.
    #[error("validation error: {0}")]
    Validation(String),

    /// The generation endpoint failed or returned an error body.
    #[error("generation failed: {0}")]
    Remote(String),

    /// The generation provider reported a rate limit or daily quota exhaustion.
    #[error("{0}")]
    RemoteQuota(String),

    /// Media payloads (base64, WAV, images) could not be decoded or encoded.
    #[error("media error: {0}")]
    Media(String),

    /// Deck or HTML export failed; no output was written.
    #[error("export failed: {0}")]
    Export(String),

    /// Another export is already running.
    #[error("an export is already in progress")]
    Busy,

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlannerError {
    /// Build a [`PlannerError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PlannerError::Remote`] value.
    pub fn remote(msg: impl Into<String>) -> Self {
        Self::Remote(msg.into())
    }

    /// Build a [`PlannerError::RemoteQuota`] value.
    pub fn remote_quota(msg: impl Into<String>) -> Self {
        Self::RemoteQuota(msg.into())
    }

    /// Build a [`PlannerError::Media`] value.
    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }

    /// Build a [`PlannerError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`PlannerError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Short message suitable for a blocking user-facing alert.
    pub fn user_message(&self) -> String {
        match self {
            Self::RemoteQuota(msg) => msg.clone(),
            Self::Busy => "エクスポートを実行中です。完了までお待ちください。".to_string(),
            Self::Export(_) => "書き出しに失敗しました".to_string(),
            Self::Serde(_) => "読込失敗".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for PlannerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
