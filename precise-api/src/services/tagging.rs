use rand::seq::IndexedRandom;
use rand::Rng;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{
    Tag, TagAssignmentResponse, TagPostRequest, TaggableFile, Tagger, WakeWordFileTag,
};
use crate::services::repository::{
    FileTagRepository, SessionRepository, TagRepository, TaggerRepository,
    WakeWordFileRepository,
};
use crate::utils::misc::title_case;

/// A file picked for tagging together with what the client is asked to do.
#[derive(Debug, Clone)]
pub struct TagAssignment {
    pub file: TaggableFile,
    pub response: TagAssignmentResponse,
}

/// Wake words arrive URL-friendly ("hey-mycroft"); the database stores them
/// with spaces.
pub fn normalize_wake_word(wake_word: &str) -> String {
    wake_word.replace('-', " ")
}

/// Picks the tag the user will be asked to apply to `file`.
///
/// Files never tagged before always get the wake word tag first. Otherwise
/// one of the tags not yet applied is chosen uniformly at random.
pub fn select_tag<'t, R: Rng + ?Sized>(
    file: &TaggableFile,
    tags: &'t [Tag],
    rng: &mut R,
) -> AppResult<&'t Tag> {
    if file.needs_wake_word_tag() {
        return tags
            .iter()
            .find(|tag| tag.is_wake_word())
            .ok_or_else(|| AppError::Internal("No \"wake word\" tag is defined".to_string()));
    }

    let designated = file.designated_tag_ids();
    let remaining: Vec<&Tag> = tags
        .iter()
        .filter(|tag| !designated.contains(tag.id.as_str()))
        .collect();

    // Fully tagged files are excluded by the selection query
    remaining.choose(rng).copied().ok_or_else(|| {
        AppError::Internal(format!("No tags left to choose from for file {}", file.id))
    })
}

/// Name shown to the user; the generic wake word tag shows the actual word.
pub fn display_tag_name(tag: &Tag, wake_word: &str) -> String {
    if tag.is_wake_word() {
        title_case(wake_word)
    } else {
        title_case(&tag.name)
    }
}

pub async fn assign_tag<F, T, R>(
    files: &F,
    tags: &T,
    wake_word: &str,
    rng: &mut R,
) -> AppResult<Option<TagAssignment>>
where
    F: WakeWordFileRepository + ?Sized,
    T: TagRepository + ?Sized,
    R: Rng + ?Sized,
{
    let wake_word = normalize_wake_word(wake_word);
    let Some(file) = files.get_taggable_file(&wake_word).await? else {
        return Ok(None);
    };

    let all_tags = tags.get_all().await?;
    let tag = select_tag(&file, &all_tags, rng)?;
    tracing::debug!("Requesting tag \"{}\" for file {}", tag.name, file.id);

    let response = TagAssignmentResponse {
        audio_file_id: file.id.clone(),
        audio_file_name: file.name.clone(),
        tag_id: tag.id.clone(),
        tag_instructions: tag.instructions.clone(),
        tag_name: display_tag_name(tag, &wake_word),
        tag_title: tag.title.clone(),
        tag_values: tag.values.clone(),
    };

    Ok(Some(TagAssignment { file, response }))
}

/// Records a tag submitted by `account_id` and returns the session it was
/// recorded under.
pub async fn record_tag<TR, SR, FR>(
    taggers: &TR,
    sessions: &SR,
    file_tags: &FR,
    account_id: &str,
    request: &TagPostRequest,
) -> AppResult<String>
where
    TR: TaggerRepository + ?Sized,
    SR: SessionRepository + ?Sized,
    FR: FileTagRepository + ?Sized,
{
    request.validate()?;

    let file_id = required(&request.audio_file_id, "audioFileId")?;
    let tag_id = required(&request.tag_id, "tagId")?;
    let tag_value_id = required(&request.tag_value_id, "tagValueId")?;

    let tagger_id = taggers
        .ensure_tagger_exists(&Tagger::for_account(account_id))
        .await?;
    let session_id = sessions.ensure_session_exists(&tagger_id).await?;

    let file_tag = WakeWordFileTag {
        file_id,
        session_id: session_id.clone(),
        tag_id,
        tag_value_id,
    };
    file_tags.add(&file_tag).await?;
    tracing::info!(
        "Tag {} recorded for file {} in session {}",
        file_tag.tag_id,
        file_tag.file_id,
        session_id
    );

    Ok(session_id)
}

fn required(value: &Option<String>, field: &str) -> AppResult<String> {
    value
        .as_deref()
        .map(|value| value.trim().to_string())
        .ok_or_else(|| AppError::Validation(format!("Invalid or missing fields: {}", field)))
}
