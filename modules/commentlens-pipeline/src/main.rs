use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use apify_client::ApifyClient;
use commentlens_common::Config;
use commentlens_pipeline::{OpenAiAnalyzer, PipelineRunner};
use commentlens_store::CommentsStore;

const DEFAULT_MAX_ITEMS: u32 = 10;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("commentlens=info".parse()?))
        .init();

    let mut args = std::env::args().skip(1);
    let post_url = match args.next() {
        Some(url) => url,
        None => {
            eprintln!("Usage: commentlens <postUrl> [maxItems]");
            std::process::exit(1);
        }
    };
    // Unparseable counts fall back to the default, matching the trigger UI.
    let max_items: u32 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_MAX_ITEMS);

    let config = Config::from_env()?;
    config.log_redacted();

    let store = CommentsStore::connect(&config.database_url).await?;
    let scraper = ApifyClient::new(config.apify_token.clone());
    let analyzer = OpenAiAnalyzer::new(&config.openai_api_key, &config.openai_model);

    let runner = PipelineRunner::new(scraper, analyzer, store);
    let outcome = runner.run(&post_url, max_items).await?;

    info!(
        processed = outcome.processed_count,
        total_fetched = outcome.total_fetched,
        "Pipeline complete"
    );
    println!(
        "Pipeline complete. Processed {} of {} comments.",
        outcome.processed_count, outcome.total_fetched
    );

    Ok(())
}
