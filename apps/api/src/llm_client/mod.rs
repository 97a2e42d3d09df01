/// Completion Client — the single point of entry for all Groq API calls.
///
/// ARCHITECTURAL RULE: No other module may call the completions endpoint
/// directly. All LLM interactions MUST go through this module.
///
/// Model: llama-3.3-70b-versatile (hardcoded — do not make configurable to prevent drift)
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// The model used for all completion calls.
pub const MODEL: &str = "llama-3.3-70b-versatile";

const INVALID_KEY_MESSAGE: &str =
    "Invalid GROQ_API_KEY. Get a valid key from https://console.groq.com/keys";
const MISCONFIGURED_KEY_MESSAGE: &str =
    "Invalid GROQ API key configured. Please set GROQ_API_KEY to a valid key";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Bad or missing upstream credential. Detected by HTTP 401 or by
    /// "invalid" + "key" phrasing in the provider's error message (some
    /// providers report auth failures with non-401 statuses).
    #[error("{0}")]
    Auth(String),

    /// Upstream reachable but returned a non-success status.
    #[error("{message}")]
    Upstream { status: u16, message: String },
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Provider error bodies come in two shapes: `{"error": {"message": ...}}`
/// (OpenAI-compatible) or a bare `{"message": ...}`.
#[derive(Debug, Deserialize)]
struct ProviderError {
    error: Option<ProviderErrorBody>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: Option<String>,
}

/// The single completion client used by the roadmap service.
/// One synchronous (non-streaming) call per prompt, no retries.
#[derive(Clone)]
pub struct CompletionClient {
    client: Client,
    api_url: String,
    api_key: String,
}

impl CompletionClient {
    /// `api_url` is the full chat-completions endpoint; configurable so
    /// tests can point the client at a local stub.
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
        }
    }

    /// Sends the prompt as a single user-role message and returns the first
    /// choice's content, or an empty string when the provider omits it.
    pub async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let request_body = ChatRequest {
            model: MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status.as_u16() == 401 {
            return Err(LlmError::Auth(INVALID_KEY_MESSAGE.to_string()));
        }

        // Classify auth failures reported through the message body, even on
        // nominally success-coded responses.
        let provider_message = extract_provider_message(&body);
        if let Some(message) = &provider_message {
            let lower = message.to_lowercase();
            if lower.contains("invalid") && lower.contains("key") {
                return Err(LlmError::Auth(MISCONFIGURED_KEY_MESSAGE.to_string()));
            }
        }

        if !status.is_success() {
            let message = provider_message.unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("upstream request failed")
                    .to_string()
            });
            warn!("Completion API returned {status}: {message}");
            return Err(LlmError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::Upstream {
                status: status.as_u16(),
                message: format!("Could not decode upstream response: {e}"),
            })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default();

        debug!("Completion call succeeded ({} chars)", content.len());

        Ok(content)
    }
}

/// Pulls the human-readable message out of a provider error body, if any.
fn extract_provider_message(body: &str) -> Option<String> {
    let parsed: ProviderError = serde_json::from_str(body).ok()?;
    parsed
        .error
        .and_then(|e| e.message)
        .or(parsed.message)
        .filter(|m| !m.is_empty())
}
