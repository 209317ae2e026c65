use serde::{Deserialize, Serialize};

pub const NO_RESULTS_MESSAGE: &str = "No relevant data found.";
pub const NO_RESPONSE_MESSAGE: &str = "No response generated.";
pub const GENERATION_FAILED_MESSAGE: &str = "An error occurred while generating the answer.";
pub const TRANSLATION_FAILED_MESSAGE: &str = "An error occurred during translation.";
pub const GRAMMAR_FAILED_MESSAGE: &str = "An error occurred during grammar correction.";

/// Terminal state of one query through the answer pipeline.
///
/// Only `Answered` carries model output; every other variant maps to a fixed,
/// user-facing message so callers can branch on the kind instead of the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum QueryOutcome {
    Answered(String),
    NoResults,
    NoResponse,
    GenerationFailed,
    TranslationFailed,
    GrammarCorrectionFailed,
}

impl QueryOutcome {
    pub fn message(&self) -> &str {
        match self {
            Self::Answered(text) => text,
            Self::NoResults => NO_RESULTS_MESSAGE,
            Self::NoResponse => NO_RESPONSE_MESSAGE,
            Self::GenerationFailed => GENERATION_FAILED_MESSAGE,
            Self::TranslationFailed => TRANSLATION_FAILED_MESSAGE,
            Self::GrammarCorrectionFailed => GRAMMAR_FAILED_MESSAGE,
        }
    }

    pub fn into_message(self) -> String {
        match self {
            Self::Answered(text) => text,
            other => other.message().to_string(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Answered(_) => "answered",
            Self::NoResults => "no_results",
            Self::NoResponse => "no_response",
            Self::GenerationFailed => "generation_failed",
            Self::TranslationFailed => "translation_failed",
            Self::GrammarCorrectionFailed => "grammar_correction_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_messages() {
        assert_eq!(QueryOutcome::NoResults.into_message(), "No relevant data found.");
        assert_eq!(
            QueryOutcome::TranslationFailed.message(),
            "An error occurred during translation."
        );
        assert_eq!(QueryOutcome::Answered("hi".into()).into_message(), "hi");
    }

    #[test]
    fn test_log_labels() {
        assert_eq!(QueryOutcome::Answered(String::new()).as_str(), "answered");
        assert_eq!(QueryOutcome::GrammarCorrectionFailed.as_str(), "grammar_correction_failed");
    }
}
