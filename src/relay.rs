//! Relays non-command messages to the active provider.

use tracing::info;

use crate::providers::{ProviderError, Providers};
use crate::session::SessionStore;
use crate::translator;

/// Compose the outbound prompt: template first, single space, user text.
pub fn compose_prompt(template: &str, text: &str) -> String {
    format!("{template} {text}")
}

/// Forward `text` to the chat's active provider and return the reply.
///
/// The last message is recorded before dispatch, regardless of outcome.
/// In translator mode the prompt instruction is derived per message
/// from the detected language instead of the session template. Provider
/// failures propagate; session state is never mutated on failure.
pub async fn relay(
    chat_id: i64,
    text: &str,
    sessions: &SessionStore,
    providers: &Providers,
    translator_mode: bool,
) -> Result<String, ProviderError> {
    sessions.record_last_message(chat_id, text);

    let (model, provider, template) = sessions.snapshot(chat_id);
    let template = if translator_mode {
        translator::instruction_for(text)
    } else {
        template
    };

    let prompt = compose_prompt(&template, text);
    info!("Relaying to {provider} ({model}), prompt {} chars", prompt.len());

    providers.complete(provider, &model, &prompt).await
}
