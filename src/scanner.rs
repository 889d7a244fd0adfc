use std::sync::Arc;
use tracing::{error, info};

use crate::config::GlobalConfig;
use crate::core::{ScanError, ScanOutcome};
use crate::llm::{GeminiClient, GeminiConfig, ScanPrompt};
use crate::parser::{RetryStrategy, coerce, extract_json};
use crate::providers::{GenerationRequest, GenerationResponse, GenerativeService};

/// Runs one URL through prompt, service, extraction and coercion.
///
/// Holds no per-scan state, so clones can scan concurrently.
#[derive(Clone)]
pub struct ThreatAnalyzer {
    service: Arc<dyn GenerativeService>,
    retry: RetryStrategy,
}

impl ThreatAnalyzer {
    pub fn new(service: Arc<dyn GenerativeService>, retry: RetryStrategy) -> Self {
        Self { service, retry }
    }

    pub fn from_config(config: &GlobalConfig) -> Self {
        let client = GeminiClient::new(GeminiConfig::from(&config.gemini));
        Self::new(Arc::new(client), config.retry.strategy())
    }

    pub async fn analyze_url(&self, url: &str) -> Result<ScanOutcome, ScanError> {
        let request = GenerationRequest {
            prompt: ScanPrompt::scan_prompt(url),
            system_instruction: ScanPrompt::system_instruction().to_string(),
            web_search: true,
        };

        info!(
            "Analyzing '{}' via {} (up to {} retries)",
            url,
            self.service.provider_name(),
            self.retry.max_retries()
        );

        let response = self
            .retry
            .retry_with_backoff(|| self.service.generate(&request))
            .await?;

        Self::interpret(response).inspect_err(|e| error!("Analysis error for '{}': {}", url, e))
    }

    fn interpret(response: GenerationResponse) -> Result<ScanOutcome, ScanError> {
        let GenerationResponse { text, grounding } = response;
        let text = match text {
            Some(text) if !text.is_empty() => text,
            _ => return Err(ScanError::EmptyResponse),
        };

        let payload = extract_json(&text)?;
        coerce(payload, grounding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GroundingSource, ThreatStatus, WebSource};
    use crate::llm::ENGINE_LIST;
    use crate::parser::retry::test_support::RecordingSleeper;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Replays canned responses, one per call.
    #[derive(Default)]
    struct ScriptedService {
        script: Mutex<VecDeque<Result<GenerationResponse, ScanError>>>,
        requests: Mutex<Vec<GenerationRequest>>,
    }

    impl ScriptedService {
        fn new(script: Vec<Result<GenerationResponse, ScanError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn attempts(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl GenerativeService for ScriptedService {
        async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, ScanError> {
            self.requests.lock().unwrap().push(request.clone());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .expect("script exhausted")
        }

        fn provider_name(&self) -> &'static str {
            "scripted"
        }
    }

    fn text(body: &str) -> Result<GenerationResponse, ScanError> {
        Ok(GenerationResponse {
            text: Some(body.to_string()),
            grounding: vec![],
        })
    }

    fn unavailable() -> Result<GenerationResponse, ScanError> {
        Err(ScanError::Service {
            status: 503,
            message: "The model is overloaded.".to_string(),
        })
    }

    fn analyzer(service: &Arc<ScriptedService>, sleeper: &Arc<RecordingSleeper>) -> ThreatAnalyzer {
        ThreatAnalyzer::new(
            service.clone(),
            RetryStrategy::new(3).with_sleeper(sleeper.clone()),
        )
    }

    const REPORT: &str = r#"Verified via search.
```json
{
  "url": "https://example.com",
  "ip": "93.184.216.34",
  "security": {
    "score": 12,
    "status": "Malicious",
    "vendorsFlagged": 9,
    "totalVendors": 31,
    "summary": "Credential harvesting kit {v2} detected.",
    "engines": [{"name": "PhishTank", "result": "Phishing", "details": "Listed"}]
  }
}
```"#;

    #[tokio::test]
    async fn test_successful_scan() {
        let service = ScriptedService::new(vec![Ok(GenerationResponse {
            text: Some(REPORT.to_string()),
            grounding: vec![GroundingSource {
                web: Some(WebSource {
                    uri: "https://who.is/example.com".to_string(),
                    title: "who.is".to_string(),
                }),
            }],
        })]);
        let sleeper = Arc::new(RecordingSleeper::default());

        let outcome = analyzer(&service, &sleeper)
            .analyze_url("https://example.com")
            .await
            .unwrap();

        assert_eq!(outcome.data.ip, "93.184.216.34");
        assert_eq!(outcome.data.security.status, ThreatStatus::Malicious);
        assert_eq!(outcome.data.security.total_vendors, 32);
        assert_eq!(
            outcome.data.security.summary,
            "Credential harvesting kit {v2} detected."
        );
        assert_eq!(outcome.sources.len(), 1);
        assert_eq!(service.attempts(), 1);

        let requests = service.requests.lock().unwrap();
        assert!(requests[0].web_search);
        assert!(requests[0].prompt.contains(r#""https://example.com""#));
        assert!(requests[0].prompt.contains(ENGINE_LIST[31]));
        assert_eq!(requests[0].system_instruction, ScanPrompt::system_instruction());
    }

    #[tokio::test]
    async fn test_empty_text_is_empty_response() {
        let service = ScriptedService::new(vec![text("")]);
        let sleeper = Arc::new(RecordingSleeper::default());

        let err = analyzer(&service, &sleeper).analyze_url("a.example").await.unwrap_err();

        assert!(matches!(err, ScanError::EmptyResponse));
        assert_eq!(service.attempts(), 1);
    }

    #[tokio::test]
    async fn test_missing_text_is_empty_response() {
        let service = ScriptedService::new(vec![Ok(GenerationResponse::default())]);
        let sleeper = Arc::new(RecordingSleeper::default());

        let err = analyzer(&service, &sleeper).analyze_url("a.example").await.unwrap_err();

        assert!(matches!(err, ScanError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_prose_only_is_format_mismatch() {
        let service = ScriptedService::new(vec![text("I am unable to audit that domain.")]);
        let sleeper = Arc::new(RecordingSleeper::default());

        let err = analyzer(&service, &sleeper).analyze_url("a.example").await.unwrap_err();

        assert!(matches!(err, ScanError::FormatMismatch));
        assert!(sleeper.waits().is_empty());
    }

    #[tokio::test]
    async fn test_trailing_comma_is_parse_error() {
        let service = ScriptedService::new(vec![text("```json\n{\"url\": \"a\",}\n```")]);
        let sleeper = Arc::new(RecordingSleeper::default());

        let err = analyzer(&service, &sleeper).analyze_url("a.example").await.unwrap_err();

        assert!(matches!(err, ScanError::Parse(_)));
        assert_eq!(service.attempts(), 1);
    }

    #[tokio::test]
    async fn test_payload_without_report_is_rejected() {
        let service = ScriptedService::new(vec![text("```json\nnull\n```")]);
        let sleeper = Arc::new(RecordingSleeper::default());

        let err = analyzer(&service, &sleeper).analyze_url("a.example").await.unwrap_err();

        assert!(matches!(err, ScanError::MissingReport));
        assert_eq!(service.attempts(), 1);
        assert!(sleeper.waits().is_empty());
    }

    #[tokio::test]
    async fn test_three_unavailable_then_success() {
        let service = ScriptedService::new(vec![
            unavailable(),
            unavailable(),
            unavailable(),
            text(REPORT),
        ]);
        let sleeper = Arc::new(RecordingSleeper::default());

        let outcome = analyzer(&service, &sleeper).analyze_url("https://example.com").await;

        assert!(outcome.is_ok());
        assert_eq!(service.attempts(), 4);
        assert_eq!(
            sleeper.waits(),
            vec![
                Duration::from_millis(2000),
                Duration::from_millis(4000),
                Duration::from_millis(8000),
            ]
        );
    }

    #[tokio::test]
    async fn test_not_found_fails_after_one_attempt() {
        let service = ScriptedService::new(vec![Err(ScanError::Service {
            status: 404,
            message: "models/gemini-x is not found".to_string(),
        })]);
        let sleeper = Arc::new(RecordingSleeper::default());

        let err = analyzer(&service, &sleeper).analyze_url("a.example").await.unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert_eq!(service.attempts(), 1);
        assert!(sleeper.waits().is_empty());
    }

    #[tokio::test]
    async fn test_four_unavailable_exhausts_budget() {
        let service = ScriptedService::new(vec![
            unavailable(),
            unavailable(),
            unavailable(),
            unavailable(),
        ]);
        let sleeper = Arc::new(RecordingSleeper::default());

        let err = analyzer(&service, &sleeper).analyze_url("a.example").await.unwrap_err();

        assert_eq!(err.status(), Some(503));
        assert_eq!(service.attempts(), 4);
        assert_eq!(sleeper.waits().len(), 3);
    }
}
