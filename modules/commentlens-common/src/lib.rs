pub mod config;
pub mod error;
pub mod types;

pub use config::{redact, Config};
pub use error::PipelineError;
pub use types::{CommentAnalysis, CommentRecord, NewComment, PipelineOutcome, Sentiment};
