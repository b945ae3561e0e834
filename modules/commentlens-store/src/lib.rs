// Postgres persistence for scraped Instagram comments.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use commentlens_common::{CommentAnalysis, CommentRecord, NewComment};

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// A row from the instagram_comments table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct CommentRow {
    id: Uuid,
    source: String,
    content: String,
    created_at: DateTime<Utc>,
    analysis: Option<Json<CommentAnalysis>>,
    analyzed_at: Option<DateTime<Utc>>,
}

impl From<CommentRow> for CommentRecord {
    fn from(row: CommentRow) -> Self {
        CommentRecord {
            id: row.id,
            source: row.source,
            content: row.content,
            created_at: row.created_at,
            analysis: row.analysis.map(|j| j.0),
            analyzed_at: row.analyzed_at,
        }
    }
}

#[derive(Clone)]
pub struct CommentsStore {
    pool: PgPool,
}

impl CommentsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to Postgres and run the embedded migrations.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        let store = Self::new(pool);
        store.migrate().await?;
        tracing::info!("Connected to Postgres, migrations applied");
        Ok(store)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Insert a raw comment row. Errors propagate: the pipeline decides
    /// whether a failed insert skips the item or aborts the run.
    pub async fn insert(&self, new: &NewComment) -> Result<Uuid> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO instagram_comments (source, content, created_at)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&new.source)
        .bind(&new.content)
        .bind(new.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Attach an analysis to an existing row. A single UPDATE sets both
    /// `analysis` and `analyzed_at`, so they are never observed apart.
    pub async fn attach_analysis(
        &self,
        id: Uuid,
        analysis: &CommentAnalysis,
        analyzed_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE instagram_comments
            SET analysis = $2, analyzed_at = $3
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(Json(analysis))
        .bind(analyzed_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// All comments, newest first. Used by the dashboard API.
    pub async fn list_all(&self) -> Result<Vec<CommentRecord>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, source, content, created_at, analysis, analyzed_at
            FROM instagram_comments
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CommentRecord::from).collect())
    }
}
