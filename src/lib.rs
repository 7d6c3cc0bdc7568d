//! Telegram bot that relays chat messages to hosted LLM providers.
//!
//! Per-chat session state tracks the active model, provider and prompt
//! template; slash commands inspect and mutate it, everything else is
//! relayed to the active provider.

pub mod classifier;
pub mod commands;
pub mod config;
pub mod prompts;
pub mod providers;
pub mod registry;
pub mod relay;
pub mod session;
pub mod translator;
