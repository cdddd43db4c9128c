use serde::Serialize;

use crate::sanitize::SanitizedInput;

/// Instruction prefix sent ahead of every user message.
///
/// Models repeat it often enough that it is also the first leakage pattern
/// removed from completions.
pub const INSTRUCTION_TEMPLATE: &str = "Be friendly. Respond strictly and only to the following message without adding extra content or repeating the prompt: ";

/// Instruction template plus the embedded user text, built fresh per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptEnvelope(String);

impl PromptEnvelope {
    pub fn wrap(input: &SanitizedInput) -> Self {
        Self(format!("{INSTRUCTION_TEMPLATE}\"{}\".", input.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Generation settings forwarded to the remote model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationParams {
    pub temperature: f64,
    pub max_new_tokens: u32,
    pub stop: Vec<String>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_new_tokens: 50,
            stop: vec!["\n".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_quotes_the_sanitized_input() {
        let envelope = PromptEnvelope::wrap(&SanitizedInput::new("  what's up? "));
        assert_eq!(
            envelope.as_str(),
            format!("{INSTRUCTION_TEMPLATE}\"what&#39;s up?\".")
        );
    }

    #[test]
    fn default_params_are_short_and_low_temperature() {
        let params = GenerationParams::default();
        assert_eq!(params.temperature, 0.3);
        assert_eq!(params.max_new_tokens, 50);
        assert_eq!(params.stop, vec!["\n".to_string()]);
    }
}
