//! Locating the JSON payload inside free-form model output.
//!
//! Two passes: a ```` ```json ```` fenced block first, then the span from the
//! first `{` to the last `}`. The fallback is a heuristic, not a JSON
//! scanner: stray braces in surrounding prose widen the span and make the
//! payload unparseable, while braces inside string values are harmless.

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, error};

use crate::core::ScanError;

static FENCED_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```json\s*([\s\S]*?)\s*```").expect("fence pattern compiles"));

/// Return the embedded payload, or `FormatMismatch` when neither pass finds one.
pub fn extract_json(text: &str) -> Result<&str, ScanError> {
    if let Some(payload) = fenced_block(text) {
        debug!("Found fenced JSON block ({} bytes)", payload.len());
        return Ok(payload);
    }

    if let Some(payload) = brace_span(text) {
        debug!("Falling back to brace span ({} bytes)", payload.len());
        return Ok(payload);
    }

    error!("Failed to find JSON in response: {}", text);
    Err(ScanError::FormatMismatch)
}

fn fenced_block(text: &str) -> Option<&str> {
    FENCED_JSON
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}
