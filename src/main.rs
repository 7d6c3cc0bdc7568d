use std::sync::Arc;

use teloxide::net::Download;
use teloxide::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::prelude::*;

use babelbot::commands::{self, Parsed};
use babelbot::config::Config;
use babelbot::prompts::TemplateStore;
use babelbot::providers::Providers;
use babelbot::registry::ModelRegistry;
use babelbot::relay;
use babelbot::session::SessionStore;

struct BotState {
    config: Config,
    sessions: SessionStore,
    providers: Providers,
}

impl BotState {
    fn new(config: Config) -> Self {
        let registry = Arc::new(ModelRegistry::new(config.default_model.clone()));
        let templates = TemplateStore::new(&config.prompt_template_path);

        // Missing startup template is a fatal startup condition.
        let sessions = match SessionStore::new(registry, templates) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Failed to load startup prompt template: {e}");
                std::process::exit(1);
            }
        };

        let providers = Providers::new(
            config.openai_api_key.clone(),
            config.together_api_key.clone(),
        );

        Self {
            config,
            sessions,
            providers,
        }
    }
}

#[tokio::main]
async fn main() {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "babelbot.json".to_string());
    let config = match Config::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    // Setup logging
    let log_dir = config.data_dir.join("logs");
    std::fs::create_dir_all(&log_dir).ok();
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("babelbot.log"))
        .expect("Failed to open log file");
    let (non_blocking, _guard) = tracing_appender::non_blocking(log_file);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::INFO.into()),
                ),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::INFO.into()),
                ),
        )
        .init();

    info!("🚀 Starting babelbot...");
    info!("Loaded config from {config_path}");
    info!("Default model: {}", config.default_model);
    if config.translator_mode {
        info!("Translator mode enabled");
    }

    let bot = Bot::new(config.telegram_bot_token.clone());
    let state = Arc::new(BotState::new(config));

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn handle_message(bot: Bot, msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    if !state.config.chat_allowed(msg.chat.id) {
        return Ok(());
    }

    let chat_id = msg.chat.id.0;

    // Text directly, or voice transcribed to text first.
    let text = if let Some(t) = msg.text() {
        t.to_string()
    } else if let Some(voice) = msg.voice() {
        match transcribe_voice(&bot, &state, voice.file.id.clone()).await {
            Ok(t) => t,
            Err(e) => {
                warn!("Voice transcription failed: {e}");
                bot.send_message(msg.chat.id, format!("⚠️ Could not transcribe the voice message: {e}"))
                    .await
                    .ok();
                return Ok(());
            }
        }
    } else {
        return Ok(());
    };

    let reply = match commands::parse(&text) {
        Parsed::Command(cmd) => {
            info!("Command in chat {chat_id}: {cmd:?}");
            commands::respond(&cmd, chat_id, &state.sessions, &state.providers).await
        }
        Parsed::MissingArgument(token) => {
            format!("{token} needs an argument. See /help.")
        }
        Parsed::NotACommand => {
            match relay::relay(
                chat_id,
                &text,
                &state.sessions,
                &state.providers,
                state.config.translator_mode,
            )
            .await
            {
                Ok(response) => response,
                Err(e) => {
                    warn!("Relay failed for chat {chat_id}: {e}");
                    format!("⚠️ The provider request failed: {e}")
                }
            }
        }
    };

    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

/// Download a voice file from Telegram and transcribe it.
async fn transcribe_voice(
    bot: &Bot,
    state: &BotState,
    file_id: teloxide::types::FileId,
) -> Result<String, String> {
    let file = bot
        .get_file(file_id)
        .await
        .map_err(|e| format!("failed to get file info: {e}"))?;

    let mut data = Vec::new();
    bot.download_file(&file.path, &mut data)
        .await
        .map_err(|e| format!("failed to download voice file: {e}"))?;

    info!("Downloaded voice message ({} bytes)", data.len());

    state
        .providers
        .transcribe(data)
        .await
        .map_err(|e| e.to_string())
}
