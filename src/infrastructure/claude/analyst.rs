//! Claude-backed recommendation oracle.

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use super::client::ClaudeClient;
use super::errors::ClaudeApiError;
use super::types::MessageRequest;
use crate::domain::errors::TuningResult;
use crate::domain::models::Recommendation;
use crate::domain::ports::{AnalysisRequest, RecommendationOracle};
use crate::services::build_analysis_prompt;

/// Asks a Claude model for the next balance adjustment.
pub struct ClaudeAnalyst {
    client: ClaudeClient,
    model: String,
    max_tokens: u32,
}

impl ClaudeAnalyst {
    pub fn new(client: ClaudeClient, model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            client,
            model: model.into(),
            max_tokens,
        }
    }
}

#[async_trait]
impl RecommendationOracle for ClaudeAnalyst {
    #[instrument(skip(self, request), fields(model = %self.model, runs = request.runs))]
    async fn analyze(&self, request: AnalysisRequest<'_>) -> TuningResult<Recommendation> {
        let prompt = build_analysis_prompt(&request);
        debug!(prompt_len = prompt.len(), "sending analysis prompt");

        let message = MessageRequest::simple_message(self.model.clone(), prompt, self.max_tokens);
        let response = self.client.send_message(&message).await?;

        let text = response.first_text().ok_or(ClaudeApiError::EmptyResponse)?;
        Ok(parse_recommendation(text))
    }
}

/// Strip a markdown code fence around the reply, if there is one.
///
/// A ```` ```json ```` fence wins over a bare ```` ``` ```` fence. Text after
/// an unterminated opening fence is taken as is.
pub fn extract_json_payload(reply: &str) -> &str {
    let fenced = if let Some((_, rest)) = reply.split_once("```json") {
        Some(rest)
    } else {
        reply.split_once("```").map(|(_, rest)| rest)
    };

    match fenced {
        Some(rest) => rest.split("```").next().unwrap_or(rest).trim(),
        None => reply.trim(),
    }
}

/// Parse a model reply into a recommendation, falling back to the
/// sentinel when the payload is not a JSON object.
pub fn parse_recommendation(reply: &str) -> Recommendation {
    let payload = extract_json_payload(reply);

    match serde_json::from_str::<Recommendation>(payload) {
        Ok(recommendation) => recommendation,
        Err(err) => {
            warn!(error = %err, "analyst reply is not valid JSON");
            Recommendation::sentinel(format!("Failed to parse JSON: {err}"), payload)
        }
    }
}
