//! Output filtering for raw model completions.
//!
//! The stages run strictly in [`STAGES`] order; later patterns (the `"".`
//! artifact, stray quotes) only take their final shape once the template and
//! the echoed input have been cut out. Each stage is a pure function that only
//! ever removes characters.

use crate::prompt::INSTRUCTION_TEMPLATE;
use crate::sanitize::SanitizedInput;

/// Residue left behind when the quoted input is cut out of `"<input>".`.
pub const QUOTE_ARTIFACT: &str = "\"\".";

/// Shortest message, in words, that is stripped wherever it appears.
pub const MIN_ECHO_WORDS: usize = 2;

pub type Stage = fn(&str, &SanitizedInput) -> String;

pub const STAGES: [(&str, Stage); 6] = [
    ("strip_template", strip_template),
    ("strip_echo", strip_echo),
    ("strip_quote_artifact", strip_quote_artifact),
    ("strip_trailing_quote", strip_trailing_quote),
    ("strip_lone_quote", strip_lone_quote),
    ("trim", trim),
];

/// Run every stage over `raw` until a full pass leaves the text unchanged.
///
/// The result is a fixed point of the stage list, so filtering it again is a
/// no-op.
pub fn filter_reply(raw: &str, input: &SanitizedInput) -> String {
    let mut current = raw.to_string();
    loop {
        let next = apply_stages(&current, input);
        if next == current {
            return next;
        }
        current = next;
    }
}

/// One pass over the stage list.
pub fn apply_stages(raw: &str, input: &SanitizedInput) -> String {
    STAGES
        .iter()
        .fold(raw.to_string(), |text, (_, stage)| stage(&text, input))
}

/// Remove `pattern` until no occurrence is left, including occurrences that
/// an earlier removal spliced together.
fn remove_all(text: &str, pattern: &str) -> String {
    if pattern.is_empty() {
        return text.to_string();
    }
    let mut out = text.to_string();
    while out.contains(pattern) {
        out = out.replace(pattern, "");
    }
    out
}

pub fn strip_template(text: &str, _input: &SanitizedInput) -> String {
    remove_all(text, INSTRUCTION_TEMPLATE)
}

/// Remove the user's message where the model repeats it.
///
/// The quoted prompt form `"<input>".` is always removed. The bare input is
/// only removed when it has at least [`MIN_ECHO_WORDS`] words: a one-word
/// message such as a greeting shows up in legitimate answers too.
pub fn strip_echo(text: &str, input: &SanitizedInput) -> String {
    if input.is_empty() {
        return text.to_string();
    }
    let text = remove_all(text, &format!("\"{}\".", input.as_str()));
    if input.as_str().split_whitespace().count() < MIN_ECHO_WORDS {
        return text;
    }
    remove_all(&text, input.as_str())
}

pub fn strip_quote_artifact(text: &str, _input: &SanitizedInput) -> String {
    remove_all(text, QUOTE_ARTIFACT)
}

pub fn strip_trailing_quote(text: &str, _input: &SanitizedInput) -> String {
    text.strip_suffix('"').unwrap_or(text).to_string()
}

/// Drop the opening half of a quote pair whose closing half is gone.
pub fn strip_lone_quote(text: &str, _input: &SanitizedInput) -> String {
    match text.strip_prefix('"') {
        Some(rest) if !rest.contains('"') => rest.to_string(),
        _ => text.to_string(),
    }
}

pub fn trim(text: &str, _input: &SanitizedInput) -> String {
    text.trim().to_string()
}
