// OpenAI-backed comment analysis: fill the prompt template, call the chat
// completion endpoint, parse the reply as a CommentAnalysis JSON object.

use ai_client::{ChatMessage, ChatRequest, OpenAiClient};
use async_trait::async_trait;

use commentlens_common::CommentAnalysis;

use crate::traits::{AnalyzeError, CommentAnalyzer};

pub const ANALYSIS_SYSTEM_PROMPT: &str =
    "You are a professional text analyst. Always respond with valid JSON only.";

const ANALYSIS_PROMPT: &str = r#"You are an expert text analyst. Analyze the following Instagram comment and return a structured JSON response with these exact fields:

{
  "sentiment": "positive" | "negative" | "neutral",
  "summary": "A brief 1-2 sentence summary of the comment",
  "keywords": ["array", "of", "key", "terms"],
  "category": "The primary category (e.g., product_feedback, question, complaint, praise, general_comment)",
  "confidence_score": 0.0-1.0 (your confidence in this analysis)
}

Comment to analyze: {TEXT_TO_ANALYZE}

Return ONLY the JSON object, no additional text."#;

const MAX_COMPLETION_TOKENS: u32 = 500;
const TEMPERATURE: f32 = 1.0;

/// Substitute the comment text into the fixed analysis prompt.
pub fn build_prompt(text: &str) -> String {
    ANALYSIS_PROMPT.replace("{TEXT_TO_ANALYZE}", text)
}

/// Parse a model reply into a CommentAnalysis. Empty or whitespace-only
/// replies are distinguished from malformed JSON for logging.
pub fn parse_analysis(reply: &str) -> Result<CommentAnalysis, AnalyzeError> {
    if reply.trim().is_empty() {
        return Err(AnalyzeError::EmptyResponse);
    }
    serde_json::from_str(reply).map_err(|e| AnalyzeError::Parse(e.to_string()))
}

pub struct OpenAiAnalyzer {
    client: OpenAiClient,
    model: String,
}

impl OpenAiAnalyzer {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            client: OpenAiClient::new(api_key),
            model: model.to_string(),
        }
    }

    /// Point at a different API base URL.
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.client = self.client.with_base_url(url);
        self
    }
}

#[async_trait]
impl CommentAnalyzer for OpenAiAnalyzer {
    async fn analyze(&self, text: &str) -> Result<CommentAnalysis, AnalyzeError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(ANALYSIS_SYSTEM_PROMPT),
                ChatMessage::user(build_prompt(text)),
            ],
            temperature: Some(TEMPERATURE),
            max_completion_tokens: Some(MAX_COMPLETION_TOKENS),
        };

        let response = self
            .client
            .chat(&request)
            .await
            .map_err(|e| AnalyzeError::Completion(e.to_string()))?;

        let reply = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        parse_analysis(&reply)
    }
}
