use async_trait::async_trait;

use crate::core::{GroundingSource, ScanError};

/// One prompt as handed to a generative service.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub system_instruction: String,
    /// Let the model ground its answer with web search.
    pub web_search: bool,
}

/// Free-form text plus whatever citations the service attached.
#[derive(Debug, Clone, Default)]
pub struct GenerationResponse {
    pub text: Option<String>,
    pub grounding: Vec<GroundingSource>,
}

#[async_trait]
pub trait GenerativeService: Send + Sync {
    /// Issue exactly one request. Retrying is the caller's business.
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, ScanError>;
    fn provider_name(&self) -> &'static str;
}
