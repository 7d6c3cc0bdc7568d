//! LLM provider clients and the single-call completion contract.

pub mod chat;
pub mod whisper;

use crate::registry::ProviderId;
use chat::ChatClient;
use whisper::WhisperClient;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const TOGETHER_BASE_URL: &str = "https://api.together.xyz/v1";

/// A completion or transcription call failed. Never retried here; the
/// caller surfaces it to the sender.
#[derive(Debug)]
pub enum ProviderError {
    Http(String),
    Api { status: u16, body: String },
    Parse(String),
    Empty,
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderError::Http(e) => write!(f, "HTTP error: {e}"),
            ProviderError::Api { status, body } => write!(f, "API error {status}: {body}"),
            ProviderError::Parse(e) => write!(f, "Parse error: {e}"),
            ProviderError::Empty => write!(f, "Empty response"),
        }
    }
}

impl std::error::Error for ProviderError {}

/// One client per backend, dispatched on [`ProviderId`].
pub struct Providers {
    openai: ChatClient,
    together: ChatClient,
    whisper: WhisperClient,
}

impl Providers {
    pub fn new(openai_api_key: String, together_api_key: String) -> Self {
        Self {
            openai: ChatClient::new(OPENAI_BASE_URL, openai_api_key.clone()),
            together: ChatClient::new(TOGETHER_BASE_URL, together_api_key),
            whisper: WhisperClient::new(OPENAI_BASE_URL, openai_api_key),
        }
    }

    /// Submit `prompt` to `model` on the given backend and return the
    /// first response text verbatim.
    pub async fn complete(
        &self,
        provider: ProviderId,
        model: &str,
        prompt: &str,
    ) -> Result<String, ProviderError> {
        let client = match provider {
            ProviderId::OpenAi => &self.openai,
            ProviderId::Together => &self.together,
        };
        client.complete(model, prompt).await
    }

    /// Transcribe an OGG Opus voice message to text.
    pub async fn transcribe(&self, ogg_data: Vec<u8>) -> Result<String, ProviderError> {
        self.whisper.transcribe(ogg_data).await
    }
}
