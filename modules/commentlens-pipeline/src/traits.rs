// Trait abstractions for the pipeline's three collaborators.
//
// ScrapeRunner — launch / status / dataset against the scraping service.
// CommentAnalyzer — one comment text in, parsed analysis out.
// CommentStore — insert raw rows, attach analyses.
//
// These enable deterministic testing with the mocks in `crate::testing`:
// no network, no database.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use commentlens_common::{CommentAnalysis, NewComment};

// ---------------------------------------------------------------------------
// ScrapeRunner
// ---------------------------------------------------------------------------

/// Identifiers returned by a successful scrape launch.
#[derive(Debug, Clone)]
pub struct LaunchedRun {
    pub run_id: String,
    pub dataset_id: String,
}

/// A scraped comment as the runner sees it. Engagement metadata stays in the
/// client's wire types; the pipeline only needs text and timestamp.
#[derive(Debug, Clone)]
pub struct FetchedComment {
    pub message: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl FetchedComment {
    /// Returns the comment text, or `None` when it is absent or empty.
    pub fn content(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }
}

#[async_trait]
pub trait ScrapeRunner: Send + Sync {
    /// Submit a scrape run for one post URL. Returns immediately.
    async fn launch(&self, post_url: &str, max_items: u32) -> Result<LaunchedRun>;

    /// Fetch the current status string of a run. One-shot, no waiting.
    async fn run_status(&self, run_id: &str) -> Result<String>;

    /// Fetch the scraped items of a completed run, in dataset order.
    async fn dataset_items(&self, dataset_id: &str) -> Result<Vec<FetchedComment>>;
}

#[async_trait]
impl ScrapeRunner for apify_client::ApifyClient {
    async fn launch(&self, post_url: &str, max_items: u32) -> Result<LaunchedRun> {
        let run = self.start_comment_scrape(post_url, max_items).await?;
        Ok(LaunchedRun {
            run_id: run.id,
            dataset_id: run.default_dataset_id,
        })
    }

    async fn run_status(&self, run_id: &str) -> Result<String> {
        let run = apify_client::ApifyClient::run_status(self, run_id).await?;
        Ok(run.status)
    }

    async fn dataset_items(&self, dataset_id: &str) -> Result<Vec<FetchedComment>> {
        let items = apify_client::ApifyClient::dataset_items(self, dataset_id).await?;
        Ok(items
            .into_iter()
            .map(|c| FetchedComment {
                message: c.message,
                created_at: c.created_at,
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// CommentAnalyzer
// ---------------------------------------------------------------------------

/// Per-comment analysis failures. All non-fatal: the runner logs the kind and
/// moves on, leaving the raw row without an analysis.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("Completion request failed: {0}")]
    Completion(String),

    #[error("Completion response was empty")]
    EmptyResponse,

    #[error("Analysis JSON did not parse: {0}")]
    Parse(String),
}

#[async_trait]
pub trait CommentAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> std::result::Result<CommentAnalysis, AnalyzeError>;
}

// ---------------------------------------------------------------------------
// CommentStore
// ---------------------------------------------------------------------------

#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Insert a raw comment row, returning its assigned id.
    async fn insert(&self, new: &NewComment) -> Result<Uuid>;

    /// Attach an analysis to an existing row. Sets `analysis` and
    /// `analyzed_at` together.
    async fn attach_analysis(
        &self,
        id: Uuid,
        analysis: &CommentAnalysis,
        analyzed_at: DateTime<Utc>,
    ) -> Result<()>;
}

#[async_trait]
impl CommentStore for commentlens_store::CommentsStore {
    async fn insert(&self, new: &NewComment) -> Result<Uuid> {
        Ok(commentlens_store::CommentsStore::insert(self, new).await?)
    }

    async fn attach_analysis(
        &self,
        id: Uuid,
        analysis: &CommentAnalysis,
        analyzed_at: DateTime<Utc>,
    ) -> Result<()> {
        Ok(commentlens_store::CommentsStore::attach_analysis(self, id, analysis, analyzed_at)
            .await?)
    }
}
