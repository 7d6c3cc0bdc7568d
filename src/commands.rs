//! Command router: one table of recognized tokens, one dispatch function.

use tracing::warn;

use crate::providers::Providers;
use crate::relay::compose_prompt;
use crate::session::{ModelChange, SessionStore};
use crate::translator;

/// A recognized command with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    ShowPrompt,
    ShowModel,
    ChangeLlm(String),
    ChangePrompt(String),
    RestorePrompt,
    ListLlms,
    ListPromptTemplates,
    Describe,
}

/// Result of matching a message against the command table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Command(Command),
    /// The token matched but a required argument was absent.
    MissingArgument(&'static str),
    /// Not a recognized token; the message goes to the relay.
    NotACommand,
}

const HELP_TEXT: &str = "I relay your messages to an LLM with the active prompt template.\n\
Commands:\n\
/show_prompt - show the active prompt template\n\
/change_prompt <text> - replace the prompt template\n\
/restore_prompt - reload the startup prompt template\n\
/list_prompt_templates - list available template files\n\
/show_model - show the active model\n\
/change_llm <name> - switch to another model\n\
/list_llms - list all known models\n\
/describe - word-by-word translation of your last message";

/// Match `text` against the fixed command table.
///
/// Tokens are case-sensitive and matched exactly against the first
/// whitespace-separated word. `/change_llm` requires a model name;
/// `/change_prompt` without text sets the empty template, which is
/// valid.
pub fn parse(text: &str) -> Parsed {
    let mut parts = text.splitn(2, char::is_whitespace);
    let token = parts.next().unwrap_or("");
    let rest = parts.next().unwrap_or("");

    match token {
        "/start" => Parsed::Command(Command::Start),
        "/help" => Parsed::Command(Command::Help),
        "/show_prompt" => Parsed::Command(Command::ShowPrompt),
        "/show_model" => Parsed::Command(Command::ShowModel),
        "/change_llm" => {
            let name = rest.trim();
            if name.is_empty() {
                Parsed::MissingArgument("/change_llm")
            } else {
                Parsed::Command(Command::ChangeLlm(name.to_string()))
            }
        }
        "/change_prompt" => Parsed::Command(Command::ChangePrompt(rest.to_string())),
        "/restore_prompt" => Parsed::Command(Command::RestorePrompt),
        "/list_llms" => Parsed::Command(Command::ListLlms),
        "/list_prompt_templates" => Parsed::Command(Command::ListPromptTemplates),
        "/describe" => Parsed::Command(Command::Describe),
        _ => Parsed::NotACommand,
    }
}

/// Execute a command against the chat's session and produce the reply.
pub async fn respond(
    cmd: &Command,
    chat_id: i64,
    sessions: &SessionStore,
    providers: &Providers,
) -> String {
    match cmd {
        Command::Start => {
            "Hello! I am an LLM relay bot, created mostly for translation between \
             Dutch, English and Russian, but you can customize prompts and models \
             to build your own use case. Try /help."
                .to_string()
        }
        Command::Help => HELP_TEXT.to_string(),
        Command::ShowPrompt => {
            format!("Current template is {}", sessions.active_template(chat_id))
        }
        Command::ShowModel => {
            format!("Current model is {}", sessions.active_model(chat_id))
        }
        Command::ChangeLlm(name) => match sessions.set_active(chat_id, name) {
            ModelChange::Changed { model, .. } => {
                format!("You have successfully changed your llm to {model}")
            }
            ModelChange::FellBack { requested, model, .. } => {
                format!("Haven't found model {requested} in the list. Falling back to {model}.")
            }
        },
        Command::ChangePrompt(text) => {
            sessions.set_template(chat_id, text);
            format!("New prompt template:\n{text}")
        }
        Command::RestorePrompt => match sessions.reset_template(chat_id) {
            Ok(template) => format!("Template restored to {template}"),
            Err(e) => {
                warn!("Template restore failed: {e}");
                format!("Could not reload the template file ({e}). Keeping the current template.")
            }
        },
        Command::ListLlms => sessions.registry().all_models().join("\n"),
        Command::ListPromptTemplates => match sessions.templates().list() {
            Ok(names) if names.is_empty() => "No template files found.".to_string(),
            Ok(names) => names.join("\n"),
            Err(e) => {
                warn!("Template listing failed: {e}");
                format!("Could not list template files ({e}).")
            }
        },
        Command::Describe => {
            let last = sessions.last_message(chat_id);
            let (model, provider, _) = sessions.snapshot(chat_id);
            let prompt = compose_prompt(translator::DESCRIBE_TEMPLATE, &last);
            match providers.complete(provider, &model, &prompt).await {
                Ok(reply) => reply,
                Err(e) => {
                    warn!("Describe completion failed: {e}");
                    format!("⚠️ The provider request failed: {e}")
                }
            }
        }
    }
}
