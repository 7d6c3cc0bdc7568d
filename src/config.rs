//! Startup configuration loaded from a JSON file.

use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use teloxide::types::ChatId;

use crate::registry::TOGETHER_MODELS;

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the config file.
    ReadFile { path: PathBuf, source: std::io::Error },
    /// Failed to parse JSON.
    ParseJson { path: PathBuf, source: serde_json::Error },
    /// Validation error.
    Validation(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFile { path, source } => {
                write!(f, "failed to read config file '{}': {}", path.display(), source)
            }
            Self::ParseJson { path, source } => {
                write!(f, "failed to parse config file '{}': {}", path.display(), source)
            }
            Self::Validation(msg) => write!(f, "config validation error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadFile { source, .. } => Some(source),
            Self::ParseJson { source, .. } => Some(source),
            Self::Validation(_) => None,
        }
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    telegram_bot_token: String,
    /// API key for the default provider (chat + voice transcription).
    openai_api_key: String,
    /// API key for the alternate provider.
    together_api_key: String,
    #[serde(default = "default_model")]
    default_model: String,
    /// Path to the startup prompt template file.
    #[serde(default = "default_template_path")]
    prompt_template_path: String,
    /// When true, the relay prompt is derived from the detected
    /// language instead of the session template.
    #[serde(default)]
    translator_mode: bool,
    /// Chats the bot responds in (empty = all).
    #[serde(default)]
    allowed_chats: Vec<i64>,
    /// Directory for state files (logs). Defaults to current directory.
    data_dir: Option<String>,
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_template_path() -> String {
    "prompt_templates/system_prompt_template.txt".to_string()
}

pub struct Config {
    pub telegram_bot_token: String,
    pub openai_api_key: String,
    pub together_api_key: String,
    pub default_model: String,
    pub prompt_template_path: PathBuf,
    pub translator_mode: bool,
    pub allowed_chats: HashSet<ChatId>,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config_path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| ConfigError::ReadFile { path: config_path.clone(), source: e })?;
        let file: ConfigFile = serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParseJson { path: config_path.clone(), source: e })?;

        // Validate required fields
        if file.telegram_bot_token.is_empty() {
            return Err(ConfigError::Validation("telegram_bot_token is required".into()));
        }
        // Telegram tokens are formatted as {bot_id}:{secret} where bot_id is numeric
        let token_parts: Vec<&str> = file.telegram_bot_token.split(':').collect();
        if token_parts.len() != 2 || token_parts[0].parse::<u64>().is_err() || token_parts[1].is_empty() {
            return Err(ConfigError::Validation(
                "telegram_bot_token appears invalid (expected format: 123456789:ABCdefGHI...)".into()
            ));
        }
        if file.openai_api_key.is_empty() {
            return Err(ConfigError::Validation("openai_api_key is required".into()));
        }
        if file.together_api_key.is_empty() {
            return Err(ConfigError::Validation("together_api_key is required".into()));
        }
        if file.default_model.is_empty() {
            return Err(ConfigError::Validation("default_model must not be empty".into()));
        }
        // The default model belongs to the default provider; a Together id
        // here would make the registry partition ambiguous.
        if TOGETHER_MODELS.contains(&file.default_model.as_str()) {
            return Err(ConfigError::Validation(format!(
                "default_model '{}' is a Together model; the default provider is OpenAI",
                file.default_model
            )));
        }

        let data_dir = file
            .data_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            telegram_bot_token: file.telegram_bot_token,
            openai_api_key: file.openai_api_key,
            together_api_key: file.together_api_key,
            default_model: file.default_model,
            prompt_template_path: PathBuf::from(file.prompt_template_path),
            translator_mode: file.translator_mode,
            allowed_chats: file.allowed_chats.into_iter().map(ChatId).collect(),
            data_dir,
        })
    }

    /// Whether the bot serves this chat.
    pub fn chat_allowed(&self, chat_id: ChatId) -> bool {
        self.allowed_chats.is_empty() || self.allowed_chats.contains(&chat_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn assert_err<T>(result: Result<T, ConfigError>) -> ConfigError {
        match result {
            Ok(_) => panic!("expected error, got Ok"),
            Err(e) => e,
        }
    }

    #[test]
    fn test_valid_config() {
        let file = write_config(r#"{
            "telegram_bot_token": "123456789:ABCdefGHIjklMNOpqrsTUVwxyz",
            "openai_api_key": "sk-test",
            "together_api_key": "tk-test"
        }"#);
        let config = Config::load(file.path()).expect("should load valid config");
        assert_eq!(config.default_model, "gpt-4o");
        assert!(!config.translator_mode);
        assert!(config.allowed_chats.is_empty());
        assert_eq!(
            config.prompt_template_path,
            PathBuf::from("prompt_templates/system_prompt_template.txt")
        );
    }

    #[test]
    fn test_empty_token() {
        let file = write_config(r#"{
            "telegram_bot_token": "",
            "openai_api_key": "sk-test",
            "together_api_key": "tk-test"
        }"#);
        let err = assert_err(Config::load(file.path()));
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("telegram_bot_token"));
    }

    #[test]
    fn test_invalid_token_format() {
        for token in ["no_colon_here", "notanumber:ABCdef", "123456789:"] {
            let file = write_config(&format!(
                r#"{{
                    "telegram_bot_token": "{token}",
                    "openai_api_key": "sk-test",
                    "together_api_key": "tk-test"
                }}"#
            ));
            let err = assert_err(Config::load(file.path()));
            assert!(matches!(err, ConfigError::Validation(_)), "token: {token}");
        }
    }

    #[test]
    fn test_missing_provider_keys() {
        let file = write_config(r#"{
            "telegram_bot_token": "123456789:ABCdef",
            "openai_api_key": "",
            "together_api_key": "tk-test"
        }"#);
        let err = assert_err(Config::load(file.path()));
        assert!(err.to_string().contains("openai_api_key"));

        let file = write_config(r#"{
            "telegram_bot_token": "123456789:ABCdef",
            "openai_api_key": "sk-test",
            "together_api_key": ""
        }"#);
        let err = assert_err(Config::load(file.path()));
        assert!(err.to_string().contains("together_api_key"));
    }

    #[test]
    fn test_default_model_cannot_be_together_model() {
        let file = write_config(r#"{
            "telegram_bot_token": "123456789:ABCdef",
            "openai_api_key": "sk-test",
            "together_api_key": "tk-test",
            "default_model": "togethercomputer/alpaca-7b"
        }"#);
        let err = assert_err(Config::load(file.path()));
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_allowed_chats_filter() {
        let file = write_config(r#"{
            "telegram_bot_token": "123456789:ABCdef",
            "openai_api_key": "sk-test",
            "together_api_key": "tk-test",
            "allowed_chats": [-1001, 42]
        }"#);
        let config = Config::load(file.path()).unwrap();
        assert!(config.chat_allowed(ChatId(-1001)));
        assert!(config.chat_allowed(ChatId(42)));
        assert!(!config.chat_allowed(ChatId(7)));
    }

    #[test]
    fn test_file_not_found() {
        let err = assert_err(Config::load("/nonexistent/path/config.json"));
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn test_invalid_json() {
        let file = write_config("{ invalid json }");
        let err = assert_err(Config::load(file.path()));
        assert!(matches!(err, ConfigError::ParseJson { .. }));
    }
}
