use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Input for the apidojo/instagram-comments-scraper actor.
#[derive(Debug, Clone, Serialize)]
pub struct CommentScraperInput {
    #[serde(rename = "startUrls")]
    pub start_urls: Vec<StartUrl>,
    #[serde(rename = "maxItems")]
    pub max_items: u32,
}

/// A start URL entry for scraper input.
#[derive(Debug, Clone, Serialize)]
pub struct StartUrl {
    pub url: String,
}

/// Wrapper for Apify API responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Apify actor run metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct RunData {
    pub id: String,
    pub status: String,
    #[serde(rename = "defaultDatasetId")]
    pub default_dataset_id: String,
    #[serde(rename = "startedAt")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(rename = "finishedAt")]
    pub finished_at: Option<DateTime<Utc>>,
}

/// A single Instagram comment from the Apify dataset.
/// Engagement and author fields are carried through but unused downstream.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapedComment {
    pub id: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "likeCount")]
    pub like_count: Option<i64>,
    #[serde(rename = "replyCount")]
    pub reply_count: Option<i64>,
    pub user: Option<CommentAuthor>,
}

impl ScrapedComment {
    /// Returns the comment text, or `None` when it is absent or empty.
    pub fn text(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }
}

/// Author info nested inside a scraped comment.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentAuthor {
    pub id: Option<String>,
    pub username: Option<String>,
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
    #[serde(rename = "isVerified")]
    pub is_verified: Option<bool>,
}
