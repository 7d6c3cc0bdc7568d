//! Translation prompt construction from the detected-language routing table.

use crate::classifier;

/// Translation direction for one detected source language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageRoute {
    pub source: String,
    pub target: String,
    pub second_target: String,
}

/// Fixed routing table keyed on the detected language code.
///
/// Unsupported codes keep the original prototype's observable behavior:
/// the raw code becomes the source and the secondary target stays
/// unresolved.
pub fn route_for(code: &str) -> LanguageRoute {
    let (source, target, second_target) = match code {
        "en" => ("English", "Dutch", "Russian"),
        "nl" => ("Dutch", "English", "Russian"),
        "ru" => ("Russian", "Dutch", "English"),
        other => (other, "English", "unknown target language"),
    };
    LanguageRoute {
        source: source.to_string(),
        target: target.to_string(),
        second_target: second_target.to_string(),
    }
}

/// Instruction prepended to the user text in translator mode.
pub fn translation_instruction(route: &LanguageRoute) -> String {
    format!(
        "Translate the message from {} to 1) {} and 2) {}. Message:",
        route.source, route.target, route.second_target
    )
}

/// Convenience: detect the language of `text` and build its instruction.
pub fn instruction_for(text: &str) -> String {
    translation_instruction(&route_for(&classifier::detect_language(text)))
}

/// Instruction used by `/describe` over the last relayed message.
pub const DESCRIBE_TEMPLATE: &str = "Please, split the given message into words and \
translate each word separately in two languages 1) in English and 2) in Russian. Message:";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_english() {
        let route = route_for("en");
        assert_eq!(route.source, "English");
        assert_eq!(route.target, "Dutch");
        assert_eq!(route.second_target, "Russian");
    }

    #[test]
    fn test_route_dutch() {
        let route = route_for("nl");
        assert_eq!(route.source, "Dutch");
        assert_eq!(route.target, "English");
        assert_eq!(route.second_target, "Russian");
    }

    #[test]
    fn test_route_russian() {
        let route = route_for("ru");
        assert_eq!(route.source, "Russian");
        assert_eq!(route.target, "Dutch");
        assert_eq!(route.second_target, "English");
    }

    #[test]
    fn test_route_unsupported_keeps_raw_code() {
        let route = route_for("fr");
        assert_eq!(route.source, "fr");
        assert_eq!(route.target, "English");
        assert_eq!(route.second_target, "unknown target language");
    }

    #[test]
    fn test_route_unknown_sentinel() {
        let route = route_for("unknown");
        assert_eq!(route.source, "unknown");
        assert_eq!(route.target, "English");
    }

    #[test]
    fn test_instruction_text() {
        let route = route_for("en");
        assert_eq!(
            translation_instruction(&route),
            "Translate the message from English to 1) Dutch and 2) Russian. Message:"
        );
    }

    #[test]
    fn test_instruction_for_detects() {
        let instruction = instruction_for("The weather is lovely today, is it not?");
        assert!(instruction.contains("from English"));
    }
}
