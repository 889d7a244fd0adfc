use thiserror::Error;

/// HTTP statuses the generative service uses for load shedding and hiccups.
pub const RETRYABLE_STATUSES: &[u16] = &[429, 500, 503];

/// Substrings that identify a transport-layer failure inside an error message.
pub const TRANSIENT_MARKERS: &[&str] = &[
    "xhr",
    "Rpc failed",
    "connection reset",
    "connection closed",
    "timed out",
];

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("generative service error {status}: {message}")]
    Service { status: u16, message: String },

    /// Connection-level hiccup worth another attempt.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The request could not be built or the reply could not be read.
    #[error("client failure: {0}")]
    Client(String),

    #[error("Empty response from intelligence core.")]
    EmptyResponse,

    #[error("Neural output format mismatch.")]
    FormatMismatch,

    #[error("Neural output carried no security report.")]
    MissingReport,

    #[error("invalid JSON payload: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ScanError {
    /// Status reported by the service, if the failure came with one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ScanError::Service { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            ScanError::Transport(_) => true,
            ScanError::Service { status, message } => {
                RETRYABLE_STATUSES.contains(status) || has_transient_marker(message)
            }
            ScanError::Client(_)
            | ScanError::EmptyResponse
            | ScanError::FormatMismatch
            | ScanError::MissingReport
            | ScanError::Parse(_) => false,
        }
    }
}

impl From<reqwest::Error> for ScanError {
    fn from(err: reqwest::Error) -> Self {
        let message = error_chain(&err);
        if let Some(status) = err.status() {
            return ScanError::Service {
                status: status.as_u16(),
                message,
            };
        }

        if err.is_connect() || err.is_timeout() || has_transient_marker(&message) {
            ScanError::Transport(message)
        } else {
            ScanError::Client(message)
        }
    }
}

/// reqwest keeps the io cause (e.g. "connection reset") in the source chain.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Case-insensitive; io errors say "Connection reset by peer".
fn has_transient_marker(message: &str) -> bool {
    let message = message.to_lowercase();
    TRANSIENT_MARKERS
        .iter()
        .any(|marker| message.contains(&marker.to_lowercase()))
}
