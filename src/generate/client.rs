use std::time::Duration;

use crate::{
    foundation::{
        config::AppConfig,
        error::{PlannerError, PlannerResult},
    },
    model::scenario::CustomAxes,
};

/// Shown when the provider reports a rate limit or daily quota.
pub const QUOTA_MESSAGE: &str = "⚠️ AIサービスの1日の利用上限に達しました。\n(Google API Limit)\n\nしばらく待つか、明日再度お試しください。";

/// Shown in place of a help answer when the request fails.
pub const HELP_FALLBACK: &str = "すみません、エラーが発生しました。";

/// Speaker of one help-chat turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HelpRole {
    User,
    Ai,
}

/// One turn of the help chat, sent back as context with the next question.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HelpTurn {
    pub role: HelpRole,
    pub text: String,
}

impl HelpTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: HelpRole::User,
            text: text.into(),
        }
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            role: HelpRole::Ai,
            text: text.into(),
        }
    }
}

/// Remote generation operations.
///
/// Every method performs exactly one request. Implementations map provider rate limits to
/// [`PlannerError::RemoteQuota`] and every other failure to [`PlannerError::Remote`].
#[async_trait::async_trait]
pub trait GenerationClient: Send + Sync {
    /// Raw JSON text of a scenario set (possibly fenced).
    async fn generate_scenarios(
        &self,
        theme: &str,
        details: &str,
        axes: Option<&CustomAxes>,
    ) -> PlannerResult<String>;

    /// Base64 PNG.
    async fn generate_image(&self, prompt: &str) -> PlannerResult<String>;

    /// Base64 little-endian PCM16 mono.
    async fn generate_speech(&self, text: &str) -> PlannerResult<String>;

    async fn summarize(&self, text: &str) -> PlannerResult<String>;

    /// Answer a usage question, given the earlier turns of the conversation.
    async fn help(&self, text: &str, history: &[HelpTurn]) -> PlannerResult<String>;
}

#[derive(Debug, serde::Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub(crate) enum GenerateRequest<'a> {
    Scenario {
        theme: &'a str,
        details: &'a str,
        axes: Option<&'a CustomAxes>,
    },
    Image {
        prompt: &'a str,
    },
    Speech {
        text: &'a str,
    },
    Summarize {
        text: &'a str,
    },
    Help {
        text: &'a str,
        history: &'a [HelpTurn],
    },
}

impl GenerateRequest<'_> {
    fn mode(&self) -> &'static str {
        match self {
            Self::Scenario { .. } => "scenario",
            Self::Image { .. } => "image",
            Self::Speech { .. } => "speech",
            Self::Summarize { .. } => "summarize",
            Self::Help { .. } => "help",
        }
    }
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct GenerateReply {
    pub text: Option<String>,
    pub base64: Option<String>,
    pub audio_data: Option<String>,
    pub summary: Option<String>,
    pub error: Option<String>,
}

/// Classify a provider error string.
pub fn classify_error(message: &str) -> PlannerError {
    if message.contains("429") || message.contains("Quota") {
        PlannerError::remote_quota(QUOTA_MESSAGE)
    } else {
        PlannerError::remote(message)
    }
}

fn require(field: Option<String>, name: &str, mode: &str) -> PlannerResult<String> {
    field
        .filter(|v| !v.is_empty())
        .ok_or_else(|| PlannerError::remote(format!("{mode} response is missing '{name}'")))
}

/// Talks to a JSON endpoint accepting `{mode, ...}` posts.
#[derive(Clone, Debug)]
pub struct HttpGenerationClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpGenerationClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> PlannerResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PlannerError::remote(format!("failed to create http client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config(cfg: &AppConfig) -> PlannerResult<Self> {
        Self::new(
            cfg.endpoint.clone(),
            Duration::from_secs(cfg.request_timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[tracing::instrument(skip(self, request), fields(mode = request.mode()))]
    async fn post(&self, request: &GenerateRequest<'_>) -> PlannerResult<GenerateReply> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| PlannerError::remote(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PlannerError::remote(format!("failed to read response: {e}")))?;
        let reply: GenerateReply = serde_json::from_str(&body).unwrap_or_default();

        if let Some(error) = reply.error.as_deref().filter(|e| !e.is_empty()) {
            tracing::warn!(%status, error, "generation endpoint reported an error");
            return Err(classify_error(error));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PlannerError::remote_quota(QUOTA_MESSAGE));
        }
        if !status.is_success() {
            return Err(classify_error(&format!("HTTP {status}: {body}")));
        }
        tracing::debug!(%status, bytes = body.len(), "generation reply received");
        Ok(reply)
    }
}

#[async_trait::async_trait]
impl GenerationClient for HttpGenerationClient {
    async fn generate_scenarios(
        &self,
        theme: &str,
        details: &str,
        axes: Option<&CustomAxes>,
    ) -> PlannerResult<String> {
        let reply = self
            .post(&GenerateRequest::Scenario {
                theme,
                details,
                axes,
            })
            .await?;
        require(reply.text, "text", "scenario")
    }

    async fn generate_image(&self, prompt: &str) -> PlannerResult<String> {
        let reply = self.post(&GenerateRequest::Image { prompt }).await?;
        require(reply.base64, "base64", "image")
    }

    async fn generate_speech(&self, text: &str) -> PlannerResult<String> {
        let reply = self.post(&GenerateRequest::Speech { text }).await?;
        require(reply.audio_data, "audioData", "speech")
    }

    async fn summarize(&self, text: &str) -> PlannerResult<String> {
        let reply = self.post(&GenerateRequest::Summarize { text }).await?;
        require(reply.summary, "summary", "summarize")
    }

    async fn help(&self, text: &str, history: &[HelpTurn]) -> PlannerResult<String> {
        let reply = self.post(&GenerateRequest::Help { text, history }).await?;
        require(reply.text, "text", "help")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/generate/client.rs"]
mod tests;
