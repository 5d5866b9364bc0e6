use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{HintError, HintResult};
use crate::protocol::{ApiErrorBody, ChatMessage, ChatRequest, ChatResponse};

/// Keys shipped in example configs; treated the same as no key at all.
const PLACEHOLDER_KEY: &str = "your_api_key_here";

// ---------------------------------------------------------------------------
// HintConfig
// ---------------------------------------------------------------------------

/// Hint backend settings. Everything has a default except the credential;
/// without a usable credential the feature is disabled, not an error.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HintConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for HintConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-4o-mini".into(),
            endpoint: "https://api.openai.com/v1/chat/completions".into(),
            temperature: 0.7,
            max_tokens: 500,
            timeout_secs: 30,
        }
    }
}

impl HintConfig {
    /// The credential, if it's present and not a placeholder.
    pub fn resolved_key(&self) -> Option<&str> {
        let key = self.api_key.as_deref()?.trim();
        if key.is_empty() || key == PLACEHOLDER_KEY {
            return None;
        }
        Some(key)
    }
}

// ---------------------------------------------------------------------------
// HintClient
// ---------------------------------------------------------------------------

/// Blocking chat-completion client for the hint feature.
///
/// Callers that need a responsive UI run `request_hint` on a worker thread;
/// the client itself is plain synchronous ureq.
pub struct HintClient {
    agent: ureq::Agent,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl HintClient {
    /// `None` when no usable credential is configured.
    pub fn from_config(config: &HintConfig) -> Option<Self> {
        let api_key = config.resolved_key()?.to_string();
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        Some(Self {
            agent,
            endpoint: config.endpoint.clone(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// Send one tutoring prompt and return the completion text, with blank
    /// lines collapsed for display. No retries; a failed request surfaces
    /// as a single `HintError`.
    pub fn request_hint(&self, prompt: &str) -> HintResult<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(crate::prompt::TUTOR_PERSONA),
                ChatMessage::user(prompt),
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "requesting hint");
        let response = self
            .agent
            .post(&self.endpoint)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(&request);

        match response {
            Ok(resp) => {
                let parsed: ChatResponse = resp
                    .into_json()
                    .map_err(|e| HintError::Malformed(e.to_string()))?;
                let text = parsed.first_text().ok_or_else(|| {
                    HintError::Malformed("response contained no completion".into())
                })?;
                Ok(normalize(text))
            }
            Err(ureq::Error::Status(status, resp)) => {
                let message = resp
                    .into_json::<ApiErrorBody>()
                    .ok()
                    .and_then(|body| body.message().map(str::to_string))
                    .unwrap_or_else(|| "unknown error".into());
                warn!(status, %message, "hint backend rejected request");
                Err(HintError::Api { status, message })
            }
            Err(ureq::Error::Transport(transport)) => {
                warn!(error = %transport, "hint request failed");
                Err(HintError::Transport(transport.to_string()))
            }
        }
    }
}

/// Collapse runs of blank lines to a single blank line and trim the ends.
fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newlines = 0usize;
    for ch in text.chars() {
        match ch {
            '\r' => {}
            '\n' => {
                newlines += 1;
                if newlines <= 2 {
                    out.push('\n');
                }
            }
            _ => {
                newlines = 0;
                out.push(ch);
            }
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_key() {
        let mut config = HintConfig::default();
        assert!(config.resolved_key().is_none());

        config.api_key = Some("  ".into());
        assert!(config.resolved_key().is_none());

        config.api_key = Some(PLACEHOLDER_KEY.into());
        assert!(config.resolved_key().is_none());

        config.api_key = Some(" sk-test ".into());
        assert_eq!(config.resolved_key(), Some("sk-test"));
    }

    #[test]
    fn test_client_disabled_without_key() {
        assert!(HintClient::from_config(&HintConfig::default()).is_none());
    }

    #[test]
    fn test_client_enabled_with_key() {
        let config = HintConfig {
            api_key: Some("sk-test".into()),
            ..HintConfig::default()
        };
        assert!(HintClient::from_config(&config).is_some());
    }

    #[test]
    fn test_normalize_collapses_blank_lines() {
        assert_eq!(
            normalize("first\n\n\n\nsecond\nthird\n"),
            "first\n\nsecond\nthird"
        );
        assert_eq!(normalize("\n\n  spaced  \n\n"), "spaced");
        assert_eq!(normalize("a\r\nb"), "a\nb");
    }

    #[test]
    fn test_config_parses_partial_toml_shape() {
        // the CLI embeds this under [hint]; here we just check serde defaults
        let config: HintConfig =
            serde_json::from_str(r#"{"api_key": "sk-live", "model": "gpt-4o"}"#).unwrap();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.max_tokens, 500);
        assert_eq!(config.endpoint, HintConfig::default().endpoint);
    }
}
