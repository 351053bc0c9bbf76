use async_trait::async_trait;

use crate::db::Database;
use crate::error::AppResult;
use crate::models::WakeWordFileTag;
use crate::services::repository::FileTagRepository;

pub struct FileTagService<'a> {
    db: &'a Database,
}

impl<'a> FileTagService<'a> {
    pub fn new(db: &'a Database) -> Self {
        FileTagService { db }
    }
}

#[async_trait]
impl<'a> FileTagRepository for FileTagService<'a> {
    async fn add(&self, file_tag: &WakeWordFileTag) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO tagging.wake_word_file_tag (file_id, session_id, tag_id, tag_value_id)
            VALUES ($1::uuid, $2::uuid, $3::uuid, $4::uuid)
            "#,
        )
        .bind(&file_tag.file_id)
        .bind(&file_tag.session_id)
        .bind(&file_tag.tag_id)
        .bind(&file_tag.tag_value_id)
        .execute(&self.db.pool)
        .await?;

        Ok(())
    }
}
