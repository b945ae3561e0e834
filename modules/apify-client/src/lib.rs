pub mod error;
pub mod types;

pub use error::{ApifyError, Result};
pub use types::{ApiResponse, CommentAuthor, CommentScraperInput, RunData, ScrapedComment, StartUrl};

const BASE_URL: &str = "https://api.apify.com/v2";

/// Actor ID for apidojo/instagram-comments-scraper.
const INSTAGRAM_COMMENTS_SCRAPER: &str = "apidojo~instagram-comments-scraper";

pub struct ApifyClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl ApifyClient {
    pub fn new(token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Override the API base URL.
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Start an Instagram comment scrape run. Returns immediately with run metadata.
    pub async fn start_comment_scrape(&self, post_url: &str, max_items: u32) -> Result<RunData> {
        let input = CommentScraperInput {
            start_urls: vec![StartUrl {
                url: post_url.to_string(),
            }],
            max_items,
        };

        let url = format!("{}/acts/{}/runs", self.base_url, INSTAGRAM_COMMENTS_SCRAPER);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&input)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApifyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let api_resp: ApiResponse<RunData> = resp.json().await?;
        tracing::info!(run_id = %api_resp.data.id, post_url, max_items, "Apify run started");
        Ok(api_resp.data)
    }

    /// Fetch current run metadata. One-shot: the caller owns any polling policy.
    pub async fn run_status(&self, run_id: &str) -> Result<RunData> {
        let url = format!("{}/actor-runs/{}", self.base_url, run_id);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApifyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let api_resp: ApiResponse<RunData> = resp.json().await?;
        tracing::debug!(run_id, status = %api_resp.data.status, "Fetched run status");
        Ok(api_resp.data)
    }

    /// Fetch dataset items from a completed run.
    pub async fn dataset_items(&self, dataset_id: &str) -> Result<Vec<ScrapedComment>> {
        let url = format!("{}/datasets/{}/items?format=json", self.base_url, dataset_id);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApifyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let items: Vec<ScrapedComment> = resp.json().await?;
        tracing::info!(dataset_id, count = items.len(), "Fetched dataset items");
        Ok(items)
    }
}
