use serde_json::json;

use crate::session::{TranscriptEntry, TranscriptEvent};

pub fn client() -> reqwest::Client {
    reqwest::Client::new()
}

/// Print a structured error to stderr and exit with `code`.
///
/// Exit codes: 1=server error, 2=request failed, 3=connection error, 4=usage error
pub fn exit_error(code: i32, error: &str, message: &str, docs_hint: Option<&str>) -> ! {
    let mut err = json!({
        "error": error,
        "message": message
    });
    if let Some(hint) = docs_hint {
        err["docs_hint"] = json!(hint);
    }
    eprintln!(
        "{}",
        serde_json::to_string_pretty(&err).unwrap_or_else(|_| err.to_string())
    );
    std::process::exit(code);
}

pub fn format_entry(entry: &TranscriptEntry) -> String {
    format!("{}: {}", entry.author.label(), entry.text)
}

/// Terminal line for a transcript event.
pub fn format_event(event: &TranscriptEvent) -> String {
    match event {
        TranscriptEvent::Appended { entry, .. } | TranscriptEvent::Replaced { entry, .. } => {
            format_entry(entry)
        }
    }
}
