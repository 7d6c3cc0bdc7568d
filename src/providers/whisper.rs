//! Speech-to-text through OpenAI's audio transcription endpoint.
//!
//! Telegram delivers voice notes as OGG Opus, which whisper-1 accepts
//! directly, so the bytes are forwarded untouched.

use serde::Deserialize;
use tracing::info;

use super::ProviderError;

const TRANSCRIPTION_MODEL: &str = "whisper-1";

pub struct WhisperClient {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

impl WhisperClient {
    pub fn new(base_url: &str, api_key: String) -> Self {
        Self {
            base_url: base_url.to_string(),
            api_key,
            http: reqwest::Client::new(),
        }
    }

    /// Transcribe OGG Opus voice data to text.
    pub async fn transcribe(&self, ogg_data: Vec<u8>) -> Result<String, ProviderError> {
        info!("Transcribing {} bytes of audio", ogg_data.len());

        let part = reqwest::multipart::Part::bytes(ogg_data)
            .file_name("voice.ogg")
            .mime_str("audio/ogg")
            .map_err(|e| ProviderError::Http(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .text("model", TRANSCRIPTION_MODEL)
            .part("file", part);

        let response = self
            .http
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api { status, body });
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        info!("Transcribed: \"{}\"", truncate(&parsed.text, 100));
        Ok(parsed.text)
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_chars).collect::<String>())
    }
}
