use thiserror::Error;

/// Why the remote completion call produced no usable text.
///
/// None of these reach the HTTP caller; the reply pipeline turns each one
/// into a fixed fallback sentence.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Connection, TLS or body-read failure
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("upstream request timed out")]
    Timeout,
    /// Upstream answered with a non-2xx status
    #[error("upstream returned status {status}")]
    Status { status: u16 },
    /// Upstream answered 2xx but without a generated text
    #[error("upstream response has no generated text")]
    Malformed,
}

impl CompletionError {
    /// Transport-class failures get the generic apology; a malformed but
    /// successful answer gets the "no relevant response" sentence.
    pub fn is_transport(&self) -> bool {
        !matches!(self, CompletionError::Malformed)
    }
}
