// core/src/advisory_api.rs
use serde::Deserialize;
use ureq::Agent;

use crate::advisory::{AdvisoryError, AdvisoryProvider, CompletionRequest};
use crate::config::AdvisoryConfig;

#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionResp {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorResp {
    error: ErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Første ikke-tomme `choices[0].message.content`.
fn first_choice(resp: ChatCompletionResp) -> Result<String, AdvisoryError> {
    resp.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or(AdvisoryError::EmptyResponse)
}

/// `{"error": {"message": ...}}` hvis mulig, ellers rå body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResp>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

/// OpenAI-kompatibel chat-klient – enkel blocking-versjon (ureq)
pub struct OpenAiClient {
    agent: Agent,
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(settings: &AdvisoryConfig, api_key: impl Into<String>) -> Self {
        // ureq bruker rustls når "tls" er aktivert
        let agent = ureq::AgentBuilder::new()
            .timeout(std::time::Duration::from_secs(settings.timeout_secs))
            .build();
        Self {
            agent,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Leser nøkkelen fra miljøvariabelen i `settings.api_key_env`.
    pub fn from_config(settings: &AdvisoryConfig) -> Result<Self, AdvisoryError> {
        let key = settings
            .api_key()
            .ok_or_else(|| AdvisoryError::MissingApiKey(settings.api_key_env.clone()))?;
        Ok(Self::new(settings, key))
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl AdvisoryProvider for OpenAiClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String, AdvisoryError> {
        let url = self.endpoint();
        let resp = self
            .agent
            .post(&url)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(request)
            .map_err(|e| match e {
                ureq::Error::Status(status, resp) => {
                    let body = resp.into_string().unwrap_or_default();
                    AdvisoryError::Http { status, message: error_message(&body) }
                }
                ureq::Error::Transport(t) => AdvisoryError::Transport(t.to_string()),
            })?;

        let body: ChatCompletionResp = resp
            .into_json()
            .map_err(|e| AdvisoryError::Decode(e.to_string()))?;

        log::info!("[advisory] {} -> {} valg", request.model, body.choices.len());
        first_choice(body)
    }
}
