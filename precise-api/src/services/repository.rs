use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{Tag, TaggableFile, Tagger, WakeWordFileTag};

/// Source of audio files waiting for tags.
#[async_trait]
pub trait WakeWordFileRepository: Send + Sync {
    /// A random file for `wake_word` that is neither inside the cooldown
    /// window nor fully tagged. `None` when no such file exists.
    async fn get_taggable_file(&self, wake_word: &str) -> AppResult<Option<TaggableFile>>;
}

#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn get_all(&self) -> AppResult<Vec<Tag>>;
}

#[async_trait]
pub trait TaggerRepository: Send + Sync {
    /// Id of the tagger row for this entity, created on first use.
    async fn ensure_tagger_exists(&self, tagger: &Tagger) -> AppResult<String>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Id of the open session for the tagger, created on first use.
    async fn ensure_session_exists(&self, tagger_id: &str) -> AppResult<String>;
}

#[async_trait]
pub trait FileTagRepository: Send + Sync {
    async fn add(&self, file_tag: &WakeWordFileTag) -> AppResult<()>;
}
