use async_trait::async_trait;

use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::Session;
use crate::services::repository::SessionRepository;

pub struct SessionService<'a> {
    db: &'a Database,
}

impl<'a> SessionService<'a> {
    pub fn new(db: &'a Database) -> Self {
        SessionService { db }
    }

    /// The session whose time range is still unbounded, if any.
    pub async fn get_open_session(&self, tagger_id: &str) -> AppResult<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT id::text AS id,
                   tagger_id::text AS tagger_id,
                   lower(session_ts_range) AS started_at
            FROM tagging.session
            WHERE tagger_id = $1::uuid AND upper_inf(session_ts_range)
            "#,
        )
        .bind(tagger_id)
        .fetch_optional(&self.db.pool)
        .await?;

        Ok(session)
    }
}

#[async_trait]
impl<'a> SessionRepository for SessionService<'a> {
    async fn ensure_session_exists(&self, tagger_id: &str) -> AppResult<String> {
        if let Some(session) = self.get_open_session(tagger_id).await? {
            tracing::debug!(
                "Continuing session {} of tagger {} started at {}",
                session.id,
                session.tagger_id,
                session.started_at
            );
            return Ok(session.id);
        }

        // At most one open session per tagger is enforced by a partial unique index
        sqlx::query(
            r#"
            INSERT INTO tagging.session (tagger_id, session_ts_range)
            VALUES ($1::uuid, tstzrange(now(), NULL))
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(tagger_id)
        .execute(&self.db.pool)
        .await?;

        let session = self
            .get_open_session(tagger_id)
            .await?
            .ok_or_else(|| AppError::Internal("Failed to create tagging session".to_string()))?;
        tracing::info!("Started tagging session {} for tagger {}", session.id, tagger_id);

        Ok(session.id)
    }
}
