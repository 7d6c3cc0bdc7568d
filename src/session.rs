//! Per-chat session state: active model, provider, template, last message.
//!
//! Each chat id gets its own session, lazily initialized from the
//! startup defaults, so one chat changing its model never leaks into
//! another. The model/provider pair is always written together under
//! the map lock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::info;

use crate::prompts::{TemplateError, TemplateStore};
use crate::registry::{ModelRegistry, ProviderId};

/// Mutable state for one chat.
#[derive(Debug, Clone)]
pub struct Session {
    pub active_model: String,
    pub active_provider: ProviderId,
    pub template: String,
    pub last_message: String,
}

/// Outcome of a model change request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelChange {
    /// The requested model was known and is now active.
    Changed { model: String, provider: ProviderId },
    /// The requested model was unknown; the default pair is now active.
    FellBack {
        requested: String,
        model: String,
        provider: ProviderId,
    },
}

/// All chat sessions plus the defaults new chats start from.
pub struct SessionStore {
    registry: Arc<ModelRegistry>,
    templates: TemplateStore,
    startup_template: String,
    sessions: Mutex<HashMap<i64, Session>>,
}

impl SessionStore {
    /// Load the startup template and build an empty store. A missing or
    /// unreadable template file is a fatal startup condition.
    pub fn new(registry: Arc<ModelRegistry>, templates: TemplateStore) -> Result<Self, TemplateError> {
        let startup_template = templates.load()?;
        Ok(Self {
            registry,
            templates,
            startup_template,
            sessions: Mutex::new(HashMap::new()),
        })
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn templates(&self) -> &TemplateStore {
        &self.templates
    }

    fn default_session(&self) -> Session {
        Session {
            active_model: self.registry.default_model().to_string(),
            active_provider: self.registry.default_provider(),
            template: self.startup_template.clone(),
            last_message: " ".to_string(),
        }
    }

    fn with_session<T>(&self, chat_id: i64, f: impl FnOnce(&mut Session) -> T) -> T {
        let mut sessions = self.sessions.lock().expect("session lock poisoned");
        let session = sessions
            .entry(chat_id)
            .or_insert_with(|| self.default_session());
        f(session)
    }

    /// Reads never insert: a chat the store has not seen is answered
    /// from the defaults without touching the map.
    fn read_session<T>(&self, chat_id: i64, f: impl FnOnce(&Session) -> T) -> T {
        let sessions = self.sessions.lock().expect("session lock poisoned");
        match sessions.get(&chat_id) {
            Some(session) => f(session),
            None => f(&self.default_session()),
        }
    }

    pub fn active_model(&self, chat_id: i64) -> String {
        self.read_session(chat_id, |s| s.active_model.clone())
    }

    pub fn active_provider(&self, chat_id: i64) -> ProviderId {
        self.read_session(chat_id, |s| s.active_provider)
    }

    pub fn active_template(&self, chat_id: i64) -> String {
        self.read_session(chat_id, |s| s.template.clone())
    }

    pub fn last_message(&self, chat_id: i64) -> String {
        self.read_session(chat_id, |s| s.last_message.clone())
    }

    /// One-lock read of everything the relay needs.
    pub fn snapshot(&self, chat_id: i64) -> (String, ProviderId, String) {
        self.read_session(chat_id, |s| {
            (s.active_model.clone(), s.active_provider, s.template.clone())
        })
    }

    /// Activate `requested` if the registry knows it, otherwise fall
    /// back to the default pair. Model and provider are committed
    /// together in both branches.
    pub fn set_active(&self, chat_id: i64, requested: &str) -> ModelChange {
        match self.registry.provider_for(requested) {
            Some(provider) => self.with_session(chat_id, |s| {
                s.active_model = requested.to_string();
                s.active_provider = provider;
                info!("Chat {chat_id}: model changed to {requested} ({provider})");
                ModelChange::Changed {
                    model: requested.to_string(),
                    provider,
                }
            }),
            None => {
                let model = self.registry.default_model().to_string();
                let provider = self.registry.default_provider();
                self.with_session(chat_id, |s| {
                    s.active_model = model.clone();
                    s.active_provider = provider;
                    info!("Chat {chat_id}: unknown model {requested}, falling back to {model}");
                    ModelChange::FellBack {
                        requested: requested.to_string(),
                        model,
                        provider,
                    }
                })
            }
        }
    }

    /// Set the template verbatim. The empty string is a valid template.
    pub fn set_template(&self, chat_id: i64, text: &str) {
        self.with_session(chat_id, |s| s.template = text.to_string());
    }

    /// Reload the template from its startup source. On read failure the
    /// prior template is left intact and the error propagates.
    pub fn reset_template(&self, chat_id: i64) -> Result<String, TemplateError> {
        let fresh = self.templates.load()?;
        self.with_session(chat_id, |s| s.template = fresh.clone());
        Ok(fresh)
    }

    pub fn record_last_message(&self, chat_id: i64, text: &str) {
        self.with_session(chat_id, |s| s.last_message = text.to_string());
    }
}
