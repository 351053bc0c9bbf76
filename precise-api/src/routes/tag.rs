use actix_web::{web, HttpResponse};
use chrono::Duration;

use crate::error::{AppError, AppResult};
use crate::middleware::{AuthAccount, AuthMiddleware};
use crate::models::{TagPostRequest, TagPostResponse, TagQuery};
use crate::services::tagging;
use crate::services::{
    AudioFileStager, FileTagService, SessionService, TagService, TaggerService,
    WakeWordFileService,
};
use crate::AppState;

pub fn create_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .wrap(AuthMiddleware)
            .route(web::get().to(get_tag))
            .route(web::post().to(post_tag)),
    );
}

// GET /?wakeWord= - Pick a file and the tag to apply to it
async fn get_tag(
    state: web::Data<AppState>,
    account: AuthAccount,
    query: web::Query<TagQuery>,
) -> AppResult<HttpResponse> {
    let wake_word = query
        .wake_word
        .as_deref()
        .map(str::trim)
        .filter(|wake_word| !wake_word.is_empty())
        .ok_or_else(|| AppError::BadRequest("wakeWord is required".to_string()))?;

    let files = WakeWordFileService::new(
        &state.db,
        Duration::seconds(state.config.tag_cooldown_seconds),
    );
    let tags = TagService::new(&state.db);
    let mut rng = rand::rng();

    let Some(assignment) = tagging::assign_tag(&files, &tags, wake_word, &mut rng).await? else {
        tracing::debug!(
            "Nothing to tag for \"{}\" (account {})",
            wake_word,
            account.account_id
        );
        return Ok(HttpResponse::NoContent().finish());
    };

    let staging = state.config.staging();
    AudioFileStager::new(&staging, state.remote_copy.as_ref())
        .stage(&assignment.file)
        .await?;

    Ok(HttpResponse::Ok().json(assignment.response))
}

// POST / - Record a tag applied by the caller
async fn post_tag(
    state: web::Data<AppState>,
    account: AuthAccount,
    form: web::Json<TagPostRequest>,
) -> AppResult<HttpResponse> {
    let session_id = tagging::record_tag(
        &TaggerService::new(&state.db),
        &SessionService::new(&state.db),
        &FileTagService::new(&state.db),
        &account.account_id,
        &form,
    )
    .await?;

    Ok(HttpResponse::Ok().json(TagPostResponse { session_id }))
}
