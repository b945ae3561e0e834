pub mod analyzer;
pub mod runner;
pub mod testing;
pub mod traits;

pub use analyzer::OpenAiAnalyzer;
pub use runner::{PipelineRunner, MAX_POLLS, POLL_INTERVAL};
pub use traits::{
    AnalyzeError, CommentAnalyzer, CommentStore, FetchedComment, LaunchedRun, ScrapeRunner,
};
