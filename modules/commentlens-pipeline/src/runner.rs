// The scrape-analyze-persist pipeline: one invocation per post URL.
//
// Fatal: launch failure, scrape run not reaching SUCCEEDED, bad input.
// Non-fatal: any per-comment failure — logged, skipped, never propagated.

use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use commentlens_common::{NewComment, PipelineError, PipelineOutcome};

use crate::traits::{CommentAnalyzer, CommentStore, ScrapeRunner};

/// Delay between scrape status polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Poll cap: ~120 seconds wall-clock at 2 s per poll.
pub const MAX_POLLS: u32 = 60;

const STATUS_RUNNING: &str = "RUNNING";
const STATUS_SUCCEEDED: &str = "SUCCEEDED";

pub struct PipelineRunner<S, A, P> {
    scraper: S,
    analyzer: A,
    store: P,
}

impl<S, A, P> PipelineRunner<S, A, P>
where
    S: ScrapeRunner,
    A: CommentAnalyzer,
    P: CommentStore,
{
    pub fn new(scraper: S, analyzer: A, store: P) -> Self {
        Self {
            scraper,
            analyzer,
            store,
        }
    }

    /// Scrape comments for one post, analyze each, persist raw and analyzed
    /// results. Items are processed strictly sequentially, in fetched order.
    pub async fn run(
        &self,
        post_url: &str,
        max_items: u32,
    ) -> Result<PipelineOutcome, PipelineError> {
        if post_url.is_empty() {
            return Err(PipelineError::Validation(
                "postUrl must not be empty".to_string(),
            ));
        }
        if max_items == 0 {
            return Err(PipelineError::Validation(
                "maxItems must be a positive integer".to_string(),
            ));
        }

        let run = self
            .scraper
            .launch(post_url, max_items)
            .await
            .map_err(|e| PipelineError::LaunchFailed(e.to_string()))?;
        info!(run_id = %run.run_id, post_url, max_items, "Scrape run started, polling for completion");

        let mut status = STATUS_RUNNING.to_string();
        let mut polls = 0u32;
        while status == STATUS_RUNNING && polls < MAX_POLLS {
            tokio::time::sleep(POLL_INTERVAL).await;
            status = self
                .scraper
                .run_status(&run.run_id)
                .await
                .map_err(|e| PipelineError::ScrapeNotSucceeded(format!("status check failed: {e}")))?;
            polls += 1;
            debug!(run_id = %run.run_id, %status, polls, max_polls = MAX_POLLS, "Run status");
        }

        // Covers terminal failures and the poll cap expiring while RUNNING.
        if status != STATUS_SUCCEEDED {
            return Err(PipelineError::ScrapeNotSucceeded(status));
        }

        let comments = self.scraper.dataset_items(&run.dataset_id).await?;
        let total_fetched = comments.len();
        info!(total_fetched, "Fetched scraped comments");

        let mut processed_count = 0u32;

        for comment in &comments {
            let Some(text) = comment.content() else {
                continue;
            };

            let new = NewComment {
                source: post_url.to_string(),
                content: text.to_string(),
                created_at: comment.created_at.unwrap_or_else(Utc::now),
            };

            let id = match self.store.insert(&new).await {
                Ok(id) => id,
                Err(e) => {
                    warn!(error = %e, "Insert failed, skipping comment");
                    continue;
                }
            };

            debug!(comment_id = %id, "Analyzing comment");

            let analysis = match self.analyzer.analyze(text).await {
                Ok(analysis) => analysis,
                Err(e) => {
                    // Raw row stays; it is just never counted as processed.
                    warn!(comment_id = %id, error = %e, "Analysis failed, comment kept without analysis");
                    continue;
                }
            };

            if let Err(e) = self.store.attach_analysis(id, &analysis, Utc::now()).await {
                warn!(comment_id = %id, error = %e, "Failed to store analysis, skipping comment");
                continue;
            }

            processed_count += 1;
            debug!(comment_id = %id, "Comment analyzed");
        }

        info!(processed_count, total_fetched, "Pipeline complete");
        Ok(PipelineOutcome {
            processed_count,
            total_fetched,
        })
    }
}
