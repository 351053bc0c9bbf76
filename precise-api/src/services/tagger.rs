use async_trait::async_trait;

use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::Tagger;
use crate::services::repository::TaggerRepository;

pub struct TaggerService<'a> {
    db: &'a Database,
}

impl<'a> TaggerService<'a> {
    pub fn new(db: &'a Database) -> Self {
        TaggerService { db }
    }

    pub async fn get_tagger_id(&self, tagger: &Tagger) -> AppResult<Option<String>> {
        let id = sqlx::query_scalar::<_, String>(
            r#"
            SELECT id::text
            FROM tagging.tagger
            WHERE entity_type = $1 AND entity_id = $2::uuid
            "#,
        )
        .bind(&tagger.entity_type)
        .bind(&tagger.entity_id)
        .fetch_optional(&self.db.pool)
        .await?;

        Ok(id)
    }
}

#[async_trait]
impl<'a> TaggerRepository for TaggerService<'a> {
    async fn ensure_tagger_exists(&self, tagger: &Tagger) -> AppResult<String> {
        if let Some(id) = self.get_tagger_id(tagger).await? {
            return Ok(id);
        }

        // The unique (entity_type, entity_id) constraint settles concurrent inserts
        sqlx::query(
            r#"
            INSERT INTO tagging.tagger (entity_type, entity_id)
            VALUES ($1, $2::uuid)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(&tagger.entity_type)
        .bind(&tagger.entity_id)
        .execute(&self.db.pool)
        .await?;

        let id = self
            .get_tagger_id(tagger)
            .await?
            .ok_or_else(|| AppError::Internal("Failed to create tagger".to_string()))?;
        tracing::info!(
            "Tagger {} ensured for {} {}",
            id,
            tagger.entity_type,
            tagger.entity_id
        );

        Ok(id)
    }
}
