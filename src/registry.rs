//! Static catalog of the models each provider backend can serve.

use std::fmt;

/// Which backend serves a completion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderId {
    OpenAi,
    Together,
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderId::OpenAi => write!(f, "openai"),
            ProviderId::Together => write!(f, "together"),
        }
    }
}

/// One backend and the model ids it is known to serve.
#[derive(Debug, Clone)]
pub struct ProviderDescriptor {
    pub id: ProviderId,
    pub models: Vec<String>,
}

impl ProviderDescriptor {
    /// Model ids within a descriptor are unique; duplicates keep their
    /// first position.
    fn new(id: ProviderId, models: Vec<String>) -> Self {
        let mut seen = Vec::with_capacity(models.len());
        for m in models {
            if !seen.contains(&m) {
                seen.push(m);
            }
        }
        Self { id, models: seen }
    }
}

/// Chat models served by Together.
pub const TOGETHER_MODELS: &[&str] = &[
    "zero-one-ai/Yi-34B-Chat",
    "meta-llama/Llama-3-8b-chat-hf",
    "meta-llama/Llama-3-70b-chat-hf",
    "mistralai/Mixtral-8x22B-Instruct-v0.1",
    "Qwen/Qwen1.5-110B-Chat",
    "WizardLM/WizardLM-13B-V1.2",
    "togethercomputer/RedPajama-INCITE-7B-Chat",
    "togethercomputer/alpaca-7b",
];

/// The full model catalog, partitioned by backend.
pub struct ModelRegistry {
    alternates: ProviderDescriptor,
    default_descriptor: ProviderDescriptor,
}

impl ModelRegistry {
    pub fn new(default_model: String) -> Self {
        let alternates = ProviderDescriptor::new(
            ProviderId::Together,
            TOGETHER_MODELS.iter().map(|m| m.to_string()).collect(),
        );
        let default_descriptor = ProviderDescriptor::new(ProviderId::OpenAi, vec![default_model]);
        Self {
            alternates,
            default_descriptor,
        }
    }

    pub fn default_model(&self) -> &str {
        &self.default_descriptor.models[0]
    }

    pub fn default_provider(&self) -> ProviderId {
        self.default_descriptor.id
    }

    /// Look up which backend serves `model`. Unknown ids return `None`;
    /// the caller decides how to fall back.
    pub fn provider_for(&self, model: &str) -> Option<ProviderId> {
        if self.alternates.models.iter().any(|m| m == model) {
            Some(self.alternates.id)
        } else if model == self.default_model() {
            Some(self.default_descriptor.id)
        } else {
            None
        }
    }

    /// Every known model id, declaration order, default model last.
    pub fn all_models(&self) -> Vec<&str> {
        self.alternates
            .models
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.default_model()))
            .collect()
    }
}
