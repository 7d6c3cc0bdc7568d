//! Language detection with a failure sentinel.
//!
//! Detection problems never propagate: anything whatlang cannot place
//! comes back as `"unknown"` so the relay path is never blocked.

use whatlang::Lang;

/// Sentinel returned when the language cannot be determined.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Detect the language of `text`.
///
/// Returns `"en"`, `"nl"` or `"ru"` for the languages the translator
/// routes on, whatlang's ISO 639-3 code for anything else it can
/// identify, and [`UNKNOWN_LANGUAGE`] when detection fails.
pub fn detect_language(text: &str) -> String {
    match whatlang::detect(text) {
        Some(info) => match info.lang() {
            Lang::Eng => "en".to_string(),
            Lang::Nld => "nl".to_string(),
            Lang::Rus => "ru".to_string(),
            other => other.code().to_string(),
        },
        None => UNKNOWN_LANGUAGE.to_string(),
    }
}
