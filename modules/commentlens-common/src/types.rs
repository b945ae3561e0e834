use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentiment label produced by the analysis model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// Structured analysis of one comment, parsed from the model's JSON reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentAnalysis {
    pub sentiment: Sentiment,
    pub summary: String,
    pub keywords: Vec<String>,
    pub category: String,
    pub confidence_score: f64,
}

/// A persisted comment row. `analysis` and `analyzed_at` are always set
/// together: absent until analysis succeeds, then written by a single update.
#[derive(Debug, Clone, Serialize)]
pub struct CommentRecord {
    pub id: Uuid,
    pub source: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub analysis: Option<CommentAnalysis>,
    pub analyzed_at: Option<DateTime<Utc>>,
}

/// Fields for inserting a new raw comment, before analysis.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub source: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Aggregate result of one pipeline invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PipelineOutcome {
    #[serde(rename = "processedCount")]
    pub processed_count: u32,
    #[serde(rename = "totalFetched")]
    pub total_fetched: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentiment_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Sentiment::Positive).unwrap(),
            "\"positive\""
        );
        let s: Sentiment = serde_json::from_str("\"neutral\"").unwrap();
        assert_eq!(s, Sentiment::Neutral);
    }

    #[test]
    fn analysis_parses_model_reply_shape() {
        let reply = r#"{
            "sentiment": "negative",
            "summary": "Complains about shipping time.",
            "keywords": ["shipping", "delay"],
            "category": "complaint",
            "confidence_score": 0.87
        }"#;
        let analysis: CommentAnalysis = serde_json::from_str(reply).unwrap();
        assert_eq!(analysis.sentiment, Sentiment::Negative);
        assert_eq!(analysis.keywords, vec!["shipping", "delay"]);
        assert!((analysis.confidence_score - 0.87).abs() < f64::EPSILON);
    }

    #[test]
    fn analysis_rejects_unknown_sentiment() {
        let reply = r#"{
            "sentiment": "mixed",
            "summary": "",
            "keywords": [],
            "category": "general_comment",
            "confidence_score": 0.5
        }"#;
        assert!(serde_json::from_str::<CommentAnalysis>(reply).is_err());
    }
}
