use thiserror::Error;

/// Pipeline-fatal errors. Per-comment failures (insert, completion, parse,
/// update) never take this form — they are logged at the item and skipped.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0} environment variable is required")]
    ConfigMissing(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Failed to launch scrape run: {0}")]
    LaunchFailed(String),

    #[error("Scrape run did not succeed. Status: {0}")]
    ScrapeNotSucceeded(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
