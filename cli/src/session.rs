//! Client-side submission guard: one in-flight chat request per session and
//! an append-only transcript of what the user sees.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chatrelay_core::sanitize::escape_html;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc::UnboundedSender;

use crate::transport::ChatTransport;

/// Placeholder shown while the reply is outstanding.
pub const PENDING_TEXT: &str = "Typing...";
/// Shown in place of the reply when the local server could not answer.
pub const CLIENT_FAILURE_MESSAGE: &str = "Sorry, something went wrong. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Idle,
    Pending,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    You,
    Ai,
}

impl Author {
    pub fn label(self) -> &'static str {
        match self {
            Author::You => "You",
            Author::Ai => "AI",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub author: Author,
    pub text: String,
    pub pending: bool,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEvent {
    Appended { index: usize, entry: TranscriptEntry },
    /// The pending placeholder at `index` was settled.
    Replaced { index: usize, entry: TranscriptEntry },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    Empty,
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Ignored(IgnoreReason),
    Replied(String),
    Failed,
}

struct SessionInner {
    state: LifecycleState,
    transcript: Vec<TranscriptEntry>,
}

pub struct ChatSession {
    transport: Arc<dyn ChatTransport>,
    inner: Mutex<SessionInner>,
    events: Option<UnboundedSender<TranscriptEvent>>,
}

impl ChatSession {
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            transport,
            inner: Mutex::new(SessionInner {
                state: LifecycleState::Idle,
                transcript: Vec::new(),
            }),
            events: None,
        }
    }

    /// Publish every transcript change to `events`.
    pub fn with_events(mut self, events: UnboundedSender<TranscriptEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn state(&self) -> LifecycleState {
        self.lock().state
    }

    pub fn is_busy(&self) -> bool {
        self.state() == LifecycleState::Pending
    }

    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        self.lock().transcript.clone()
    }

    /// Submit one message.
    ///
    /// Blank text and submissions made while another one is pending are
    /// dropped without touching the transcript. Otherwise exactly one user
    /// entry and one AI entry (reply or failure message) are appended.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let message = text.trim();
        if message.is_empty() {
            return SubmitOutcome::Ignored(IgnoreReason::Empty);
        }

        let Some(flight) = self.try_begin(message) else {
            tracing::debug!("Submission dropped: a request is already pending");
            return SubmitOutcome::Ignored(IgnoreReason::Busy);
        };

        // Display escaping is cosmetic; the server gets the text as typed.
        match self.transport.send(message).await {
            Ok(reply) => {
                flight.finish(LifecycleState::Succeeded, reply.clone());
                SubmitOutcome::Replied(reply)
            }
            Err(err) => {
                tracing::error!(error = %err, "Error sending message to the server");
                flight.finish(LifecycleState::Failed, CLIENT_FAILURE_MESSAGE.to_string());
                SubmitOutcome::Failed
            }
        }
    }

    /// Idle -> Pending plus the user entry and placeholder, in one step.
    fn try_begin(&self, message: &str) -> Option<InFlight<'_>> {
        let mut inner = self.lock();
        if inner.state == LifecycleState::Pending {
            return None;
        }
        inner.state = LifecycleState::Pending;

        self.append(&mut inner, Author::You, escape_html(message), false);
        let placeholder = self.append(&mut inner, Author::Ai, PENDING_TEXT.to_string(), true);

        Some(InFlight {
            session: self,
            placeholder,
            settled: false,
        })
    }

    fn append(
        &self,
        inner: &mut SessionInner,
        author: Author,
        text: String,
        pending: bool,
    ) -> usize {
        let entry = TranscriptEntry {
            author,
            text,
            pending,
            at: Utc::now(),
        };
        let index = inner.transcript.len();
        inner.transcript.push(entry.clone());
        self.emit(TranscriptEvent::Appended { index, entry });
        index
    }

    fn settle(&self, inner: &mut SessionInner, placeholder: usize, text: String) {
        let entry = TranscriptEntry {
            author: Author::Ai,
            text,
            pending: false,
            at: Utc::now(),
        };
        if let Some(slot) = inner.transcript.get_mut(placeholder) {
            *slot = entry.clone();
            self.emit(TranscriptEvent::Replaced {
                index: placeholder,
                entry,
            });
        }
    }

    fn emit(&self, event: TranscriptEvent) {
        if let Some(events) = &self.events {
            // A closed receiver only means nobody is rendering anymore.
            let _ = events.send(event);
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Held for the duration of one request. Dropping it returns the session to
/// Idle on every exit path, including a cancelled `submit` future, which
/// settles the placeholder as a failure.
struct InFlight<'a> {
    session: &'a ChatSession,
    placeholder: usize,
    settled: bool,
}

impl InFlight<'_> {
    fn finish(mut self, outcome: LifecycleState, text: String) {
        let mut inner = self.session.lock();
        self.session.settle(&mut inner, self.placeholder, text);
        inner.state = outcome;
        tracing::debug!(state = ?outcome, "Chat request finished");
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut inner = self.session.lock();
        if !self.settled {
            tracing::warn!("Chat request abandoned before a reply arrived");
            self.session
                .settle(&mut inner, self.placeholder, CLIENT_FAILURE_MESSAGE.to_string());
        }
        inner.state = LifecycleState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::transport::TransportError;

    #[derive(Default)]
    struct RecordingTransport {
        fail: bool,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ChatTransport for RecordingTransport {
        async fn send(&self, message: &str) -> Result<String, TransportError> {
            self.calls.lock().unwrap().push(message.to_string());
            if self.fail {
                Err(TransportError::Status {
                    status: 500,
                    body: "Internal Server Error".to_string(),
                })
            } else {
                Ok(format!("reply to {message}"))
            }
        }
    }

    #[derive(Default)]
    struct GatedTransport {
        started: Notify,
        release: Notify,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ChatTransport for GatedTransport {
        async fn send(&self, message: &str) -> Result<String, TransportError> {
            self.calls.lock().unwrap().push(message.to_string());
            self.started.notify_one();
            self.release.notified().await;
            Ok(format!("reply to {message}"))
        }
    }

    fn texts(session: &ChatSession) -> Vec<(Author, String, bool)> {
        session
            .transcript()
            .into_iter()
            .map(|e| (e.author, e.text, e.pending))
            .collect()
    }

    #[tokio::test]
    async fn blank_input_is_a_no_op() {
        let transport = Arc::new(RecordingTransport::default());
        let session = ChatSession::new(transport.clone());

        for text in ["", "   ", "\n\t"] {
            assert_eq!(
                session.submit(text).await,
                SubmitOutcome::Ignored(IgnoreReason::Empty)
            );
        }
        assert!(session.transcript().is_empty());
        assert!(transport.calls.lock().unwrap().is_empty());
        assert_eq!(session.state(), LifecycleState::Idle);
    }

    #[tokio::test]
    async fn success_appends_user_and_reply_entries() {
        let transport = Arc::new(RecordingTransport::default());
        let session = ChatSession::new(transport.clone());

        let outcome = session.submit("  <b>hi</b> & bye  ").await;

        assert_eq!(
            outcome,
            SubmitOutcome::Replied("reply to <b>hi</b> & bye".to_string())
        );
        assert_eq!(
            transport.calls.lock().unwrap().as_slice(),
            ["<b>hi</b> & bye".to_string()]
        );
        assert_eq!(
            texts(&session),
            vec![
                (
                    Author::You,
                    "&lt;b&gt;hi&lt;/b&gt; &amp; bye".to_string(),
                    false
                ),
                (Author::Ai, "reply to <b>hi</b> & bye".to_string(), false),
            ]
        );
        assert_eq!(session.state(), LifecycleState::Idle);
    }

    #[tokio::test]
    async fn failure_appends_generic_message_and_releases_guard() {
        let transport = Arc::new(RecordingTransport {
            fail: true,
            ..Default::default()
        });
        let session = ChatSession::new(transport.clone());

        assert_eq!(session.submit("first").await, SubmitOutcome::Failed);
        assert_eq!(session.state(), LifecycleState::Idle);
        assert_eq!(session.submit("second").await, SubmitOutcome::Failed);

        let entries = texts(&session);
        assert_eq!(entries.len(), 4);
        assert_eq!(
            entries[1],
            (Author::Ai, CLIENT_FAILURE_MESSAGE.to_string(), false)
        );
        assert_eq!(transport.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn second_submit_while_pending_is_dropped() {
        let transport = Arc::new(GatedTransport::default());
        let session = Arc::new(ChatSession::new(transport.clone()));

        let first = tokio::spawn({
            let session = session.clone();
            async move { session.submit("first").await }
        });
        transport.started.notified().await;

        assert_eq!(session.state(), LifecycleState::Pending);
        assert!(session.is_busy());
        assert_eq!(
            session.submit("second").await,
            SubmitOutcome::Ignored(IgnoreReason::Busy)
        );
        assert_eq!(
            texts(&session),
            vec![
                (Author::You, "first".to_string(), false),
                (Author::Ai, PENDING_TEXT.to_string(), true),
            ]
        );

        transport.release.notify_one();
        assert_eq!(
            first.await.expect("task should not panic"),
            SubmitOutcome::Replied("reply to first".to_string())
        );
        assert_eq!(transport.calls.lock().unwrap().as_slice(), ["first".to_string()]);
        assert_eq!(session.state(), LifecycleState::Idle);

        // The guard is free again once the first request completed.
        let third = tokio::spawn({
            let session = session.clone();
            async move { session.submit("third").await }
        });
        transport.started.notified().await;
        transport.release.notify_one();
        assert_eq!(
            third.await.expect("task should not panic"),
            SubmitOutcome::Replied("reply to third".to_string())
        );
        assert_eq!(session.transcript().len(), 4);
    }

    #[tokio::test]
    async fn cancelled_submit_settles_placeholder_and_returns_to_idle() {
        let transport = Arc::new(GatedTransport::default());
        let session = ChatSession::new(transport.clone());

        let result = tokio::time::timeout(Duration::from_millis(20), session.submit("hang")).await;
        assert!(result.is_err(), "gated transport never answers");

        assert_eq!(session.state(), LifecycleState::Idle);
        assert_eq!(
            texts(&session),
            vec![
                (Author::You, "hang".to_string(), false),
                (Author::Ai, CLIENT_FAILURE_MESSAGE.to_string(), false),
            ]
        );
    }

    #[tokio::test]
    async fn events_follow_transcript_changes() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let session =
            ChatSession::new(Arc::new(RecordingTransport::default())).with_events(tx);

        session.submit("ping").await;

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert_eq!(events.len(), 3);
        assert!(matches!(
            &events[0],
            TranscriptEvent::Appended { index: 0, entry } if entry.author == Author::You
        ));
        assert!(matches!(
            &events[1],
            TranscriptEvent::Appended { index: 1, entry } if entry.pending
        ));
        assert!(matches!(
            &events[2],
            TranscriptEvent::Replaced { index: 1, entry } if entry.text == "reply to ping"
        ));
    }
}
