use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::session::{ChatSession, SubmitOutcome};
use crate::transport::HttpTransport;
use crate::util::{exit_error, format_event};

const QUIT_COMMANDS: [&str; 2] = ["/quit", "/exit"];

/// Interactive loop over stdin. Lines typed while a reply is pending are
/// dropped by the session guard.
pub async fn run(api_url: &str) -> i32 {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let session = Arc::new(ChatSession::new(Arc::new(HttpTransport::new(api_url))).with_events(tx));

    let renderer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            println!("{}", format_event(&event));
        }
    });

    eprintln!("Connected to {api_url}. Type a message and press Enter; /quit to leave.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut in_flight: Option<JoinHandle<SubmitOutcome>> = None;

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => exit_error(4, "io_error", &format!("Failed to read stdin: {e}"), None),
        };
        if QUIT_COMMANDS.contains(&line.trim()) {
            break;
        }

        let session = session.clone();
        let handle = tokio::spawn(async move { session.submit(&line).await });
        if !matches!(&in_flight, Some(previous) if !previous.is_finished()) {
            in_flight = Some(handle);
        }
    }

    if let Some(handle) = in_flight {
        if let Err(e) = handle.await {
            tracing::error!("Chat task failed: {}", e);
        }
    }

    // Last sender goes away with the session; the renderer then drains and ends.
    drop(session);
    let _ = renderer.await;
    0
}
