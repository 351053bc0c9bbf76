use async_trait::async_trait;

use crate::db::Database;
use crate::error::AppResult;
use crate::models::Tag;
use crate::services::repository::TagRepository;

pub struct TagService<'a> {
    db: &'a Database,
}

impl<'a> TagService<'a> {
    pub fn new(db: &'a Database) -> Self {
        TagService { db }
    }
}

#[async_trait]
impl<'a> TagRepository for TagService<'a> {
    async fn get_all(&self) -> AppResult<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.id::text AS id,
                   t.name,
                   t.title,
                   t.instructions,
                   COALESCE(
                       json_agg(
                           json_build_object(
                               'id', tv.id::text,
                               'value', tv.value,
                               'display', tv.display
                           )
                           ORDER BY tv.value
                       ) FILTER (WHERE tv.id IS NOT NULL),
                       '[]'::json
                   ) AS "values"
            FROM tagging.tag t
                LEFT JOIN tagging.tag_value tv ON tv.tag_id = t.id
            GROUP BY t.id, t.name, t.title, t.instructions
            ORDER BY t.name
            "#,
        )
        .fetch_all(&self.db.pool)
        .await?;

        Ok(tags)
    }
}
