use super::{errors::ScanError, models::ScanOutcome};

/// Shown when a failure carries no message of its own.
pub const FALLBACK_ERROR_MESSAGE: &str = "Analysis failed. Security protocol anomaly detected.";

/// Lifecycle of one scan as the front-end sees it.
///
/// Each new scan replaces whatever the previous one produced.
#[derive(Debug, Default)]
pub enum ScanState {
    #[default]
    Idle,
    Loading { target: String },
    Result { target: String, outcome: ScanOutcome },
    Error { target: String, message: String },
}

impl ScanState {
    pub fn begin(&mut self, target: &str) {
        tracing::debug!("Scan started: {}", target);
        *self = ScanState::Loading {
            target: target.to_string(),
        };
    }

    /// Settle a loading scan with the pipeline's verdict.
    pub fn settle(&mut self, result: Result<ScanOutcome, ScanError>) {
        let target = self.target().unwrap_or_default().to_string();
        *self = match result {
            Ok(outcome) => {
                tracing::debug!("Scan completed: {}", target);
                ScanState::Result { target, outcome }
            }
            Err(err) => {
                let message = failure_message(err.to_string());
                tracing::debug!("Scan failed: {}: {}", target, message);
                ScanState::Error { target, message }
            }
        };
    }

    pub fn target(&self) -> Option<&str> {
        match self {
            ScanState::Idle => None,
            ScanState::Loading { target }
            | ScanState::Result { target, .. }
            | ScanState::Error { target, .. } => Some(target),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ScanState::Error { .. })
    }
}

fn failure_message(message: String) -> String {
    if message.trim().is_empty() {
        FALLBACK_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}
