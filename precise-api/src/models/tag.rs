use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Name of the tag type asking whether the wake word is spoken at all.
pub const WAKE_WORD_TAG_NAME: &str = "wake word";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagValue {
    pub id: String,
    pub value: String,
    pub display: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub title: String,
    pub instructions: String,
    #[sqlx(json)]
    pub values: Vec<TagValue>,
}

impl Tag {
    pub fn is_wake_word(&self) -> bool {
        self.name == WAKE_WORD_TAG_NAME
    }
}

#[derive(Debug, Deserialize)]
pub struct TagQuery {
    #[serde(rename = "wakeWord")]
    pub wake_word: Option<String>,
}

/// Body of a successful GET /tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagAssignmentResponse {
    pub audio_file_id: String,
    pub audio_file_name: String,
    pub tag_id: String,
    pub tag_instructions: String,
    pub tag_name: String,
    pub tag_title: String,
    pub tag_values: Vec<TagValue>,
}
