// Test mocks for the pipeline runner.
//
// Three mocks matching the three trait boundaries:
// - MockScraper (ScrapeRunner) — scripted launch result, status sequence, items
// - MockAnalyzer (CommentAnalyzer) — raw replies keyed by comment text, run
//   through the real parse path
// - MockStore (CommentStore) — stateful in-memory row list with failure
//   injection by content

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use commentlens_common::{CommentAnalysis, NewComment};

use crate::analyzer::parse_analysis;
use crate::traits::{
    AnalyzeError, CommentAnalyzer, CommentStore, FetchedComment, LaunchedRun, ScrapeRunner,
};

/// A valid analysis reply for tests that don't care about its content.
pub const CANNED_REPLY: &str = r#"{
    "sentiment": "positive",
    "summary": "Generic praise.",
    "keywords": ["nice"],
    "category": "praise",
    "confidence_score": 0.9
}"#;

/// Shorthand for a fetched comment with text and no timestamp.
pub fn comment(text: &str) -> FetchedComment {
    FetchedComment {
        message: Some(text.to_string()),
        created_at: None,
    }
}

// ---------------------------------------------------------------------------
// MockScraper
// ---------------------------------------------------------------------------

/// Scripted scrape service. Status polls consume `statuses` front to back and
/// repeat the last entry once exhausted, so `.with_statuses(["RUNNING"])`
/// models a run that never finishes.
pub struct MockScraper {
    launch_error: Option<String>,
    statuses: Mutex<Vec<String>>,
    items: Vec<FetchedComment>,
    pub launches: Mutex<Vec<(String, u32)>>,
    pub polls: Mutex<u32>,
}

impl MockScraper {
    pub fn new() -> Self {
        Self {
            launch_error: None,
            statuses: Mutex::new(vec!["SUCCEEDED".to_string()]),
            items: Vec::new(),
            launches: Mutex::new(Vec::new()),
            polls: Mutex::new(0),
        }
    }

    pub fn with_items(mut self, items: Vec<FetchedComment>) -> Self {
        self.items = items;
        self
    }

    pub fn with_statuses(mut self, statuses: &[&str]) -> Self {
        self.statuses = Mutex::new(statuses.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn failing_launch(mut self, message: &str) -> Self {
        self.launch_error = Some(message.to_string());
        self
    }

    pub fn poll_count(&self) -> u32 {
        *self.polls.lock().unwrap()
    }
}

#[async_trait]
impl ScrapeRunner for &MockScraper {
    async fn launch(&self, post_url: &str, max_items: u32) -> Result<LaunchedRun> {
        if let Some(msg) = &self.launch_error {
            bail!("{msg}");
        }
        self.launches
            .lock()
            .unwrap()
            .push((post_url.to_string(), max_items));
        Ok(LaunchedRun {
            run_id: "run-1".to_string(),
            dataset_id: "ds-1".to_string(),
        })
    }

    async fn run_status(&self, _run_id: &str) -> Result<String> {
        *self.polls.lock().unwrap() += 1;
        let mut statuses = self.statuses.lock().unwrap();
        if statuses.len() > 1 {
            Ok(statuses.remove(0))
        } else {
            Ok(statuses[0].clone())
        }
    }

    async fn dataset_items(&self, _dataset_id: &str) -> Result<Vec<FetchedComment>> {
        Ok(self.items.clone())
    }
}

// ---------------------------------------------------------------------------
// MockAnalyzer
// ---------------------------------------------------------------------------

/// Analyzer backed by raw text replies keyed by comment text, pushed through
/// the production `parse_analysis` path. Unregistered texts fall back to the
/// default reply.
pub struct MockAnalyzer {
    replies: HashMap<String, String>,
    network_failures: HashSet<String>,
    default_reply: String,
    pub calls: Mutex<Vec<String>>,
}

impl MockAnalyzer {
    /// Analyzer that answers every comment with a valid canned analysis.
    pub fn happy() -> Self {
        Self {
            replies: HashMap::new(),
            network_failures: HashSet::new(),
            default_reply: CANNED_REPLY.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Register the raw model reply for a specific comment text.
    pub fn on_reply(mut self, text: &str, raw: &str) -> Self {
        self.replies.insert(text.to_string(), raw.to_string());
        self
    }

    /// Simulate a network error on the completion call for this text.
    pub fn failing(mut self, text: &str) -> Self {
        self.network_failures.insert(text.to_string());
        self
    }
}

#[async_trait]
impl CommentAnalyzer for &MockAnalyzer {
    async fn analyze(&self, text: &str) -> Result<CommentAnalysis, AnalyzeError> {
        self.calls.lock().unwrap().push(text.to_string());
        if self.network_failures.contains(text) {
            return Err(AnalyzeError::Completion("connection reset".to_string()));
        }
        let raw = self.replies.get(text).unwrap_or(&self.default_reply);
        parse_analysis(raw)
    }
}

// ---------------------------------------------------------------------------
// MockStore
// ---------------------------------------------------------------------------

/// An in-memory persisted row.
#[derive(Debug, Clone)]
pub struct StoredRow {
    pub id: Uuid,
    pub source: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub analysis: Option<CommentAnalysis>,
    pub analyzed_at: Option<DateTime<Utc>>,
}

pub struct MockStore {
    rows: Mutex<Vec<StoredRow>>,
    fail_insert_for: HashSet<String>,
    fail_update_for: HashSet<String>,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            fail_insert_for: HashSet::new(),
            fail_update_for: HashSet::new(),
        }
    }

    /// Fail inserts whose content equals `text`.
    pub fn failing_insert_for(mut self, text: &str) -> Self {
        self.fail_insert_for.insert(text.to_string());
        self
    }

    /// Fail analysis updates for rows whose content equals `text`.
    pub fn failing_update_for(mut self, text: &str) -> Self {
        self.fail_update_for.insert(text.to_string());
        self
    }

    pub fn rows(&self) -> Vec<StoredRow> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommentStore for &MockStore {
    async fn insert(&self, new: &NewComment) -> Result<Uuid> {
        if self.fail_insert_for.contains(&new.content) {
            bail!("duplicate key value violates unique constraint");
        }
        let id = Uuid::new_v4();
        self.rows.lock().unwrap().push(StoredRow {
            id,
            source: new.source.clone(),
            content: new.content.clone(),
            created_at: new.created_at,
            analysis: None,
            analyzed_at: None,
        });
        Ok(id)
    }

    async fn attach_analysis(
        &self,
        id: Uuid,
        analysis: &CommentAnalysis,
        analyzed_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| anyhow::anyhow!("no row with id {id}"))?;
        if self.fail_update_for.contains(&row.content) {
            bail!("connection closed");
        }
        row.analysis = Some(analysis.clone());
        row.analyzed_at = Some(analyzed_at);
        Ok(())
    }
}
