use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A run of consecutive tag submissions by one tagger.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: String,
    pub tagger_id: String,
    pub started_at: DateTime<Utc>,
}
