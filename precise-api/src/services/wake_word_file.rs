use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;

use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::wake_word_file::is_taggable;
use crate::models::TaggableFile;
use crate::services::repository::WakeWordFileRepository;

#[derive(Debug, FromRow)]
struct TaggableFileRow {
    #[sqlx(flatten)]
    file: TaggableFile,
    last_tagged_at: Option<DateTime<Utc>>,
    queried_at: DateTime<Utc>,
    tag_count: i64,
}

pub struct WakeWordFileService<'a> {
    db: &'a Database,
    cooldown: Duration,
}

impl<'a> WakeWordFileService<'a> {
    pub fn new(db: &'a Database, cooldown: Duration) -> Self {
        WakeWordFileService { db, cooldown }
    }
}

#[async_trait]
impl<'a> WakeWordFileRepository for WakeWordFileService<'a> {
    async fn get_taggable_file(&self, wake_word: &str) -> AppResult<Option<TaggableFile>> {
        // A file without tag rows aggregates to {NULL}, the "needs wake word tag" marker.
        // The HAVING clause is `is_taggable` in SQL; change the two together.
        let row = sqlx::query_as::<_, TaggableFileRow>(
            r#"
            SELECT wwf.id::text AS id,
                   wwf.name,
                   fl.server::text AS server,
                   fl.directory,
                   array_agg(DISTINCT wwft.tag_id::text) AS designations,
                   max(wwft.insert_ts) AS last_tagged_at,
                   now() AS queried_at,
                   (SELECT count(*) FROM tagging.tag) AS tag_count
            FROM tagging.wake_word_file wwf
                INNER JOIN wake_word.wake_word ww ON ww.id = wwf.wake_word_id
                INNER JOIN tagging.file_location fl ON fl.id = wwf.file_location_id
                LEFT JOIN tagging.wake_word_file_tag wwft ON wwft.file_id = wwf.id
            WHERE ww.name = $1
            GROUP BY wwf.id, wwf.name, fl.server, fl.directory
            HAVING (max(wwft.insert_ts) IS NULL
                    OR max(wwft.insert_ts) <= now() - make_interval(secs => $2))
               AND count(DISTINCT wwft.tag_id) < (SELECT count(*) FROM tagging.tag)
            ORDER BY random()
            LIMIT 1
            "#,
        )
        .bind(wake_word)
        .bind(self.cooldown.num_seconds() as f64)
        .fetch_optional(&self.db.pool)
        .await?;

        let Some(row) = row else {
            tracing::debug!("No taggable file found for wake word \"{}\"", wake_word);
            return Ok(None);
        };

        if !is_taggable(
            &row.file.designations,
            row.last_tagged_at,
            row.queried_at,
            self.cooldown,
            row.tag_count as usize,
        ) {
            return Err(AppError::Internal(format!(
                "File {} was selected for tagging but is not taggable",
                row.file.id
            )));
        }

        Ok(Some(row.file))
    }
}
