use axum::{
    Extension, Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use chrono::Utc;
use validator::Validate;

use crate::{
    errors::{Error, Result},
    middleware::AccountId,
    models::journal::{Journal, JournalMeta},
    pipeline::CompletionCallback,
    services::journals,
    state::AppState,
    utils::{get_record_id::get_record_id_from_string, validated_form::ValidatedJson},
};

#[derive(serde::Deserialize, Debug, Clone, Validate)]
pub struct CreateJournalRequest {
    /// Asset-store key of the audio uploaded out-of-band.
    #[validate(length(min = 1, max = 512))]
    pub audio_reference: String,
    pub template_id: Option<String>,
    #[validate(length(max = 16))]
    pub language: Option<String>,
    pub duration_secs: Option<f64>,
    pub source: Option<String>,
}

#[derive(serde::Serialize, Debug, Clone)]
pub struct JournalResponse {
    #[serde(flatten)]
    pub journal: Journal,
    /// Advisory only; display math over stored timestamps.
    pub progress: f64,
}

impl From<Journal> for JournalResponse {
    fn from(journal: Journal) -> Self {
        let progress = journal.progress(Utc::now());
        Self { journal, progress }
    }
}

pub async fn create_journal(
    State(state): State<AppState>,
    Extension(AccountId(account_id)): Extension<AccountId>,
    Path(ws_id): Path<String>,
    ValidatedJson(input): ValidatedJson<CreateJournalRequest>,
) -> Result<(StatusCode, Json<JournalResponse>)> {
    let actor = get_record_id_from_string(account_id)?;
    let workspace_id = get_record_id_from_string(ws_id)?;
    let template_id = input
        .template_id
        .map(get_record_id_from_string)
        .transpose()?;

    let journal = journals::create_journal(
        &state.sdb,
        &state.pipeline,
        &actor,
        &workspace_id,
        journals::NewJournal {
            audio_reference: input.audio_reference,
            template_id,
            language: input.language,
            meta: JournalMeta {
                duration_secs: input.duration_secs,
                source: input.source,
            },
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(journal.into())))
}

pub async fn read_journals(
    State(state): State<AppState>,
    Extension(AccountId(account_id)): Extension<AccountId>,
    Path(ws_id): Path<String>,
) -> Result<Json<Vec<JournalResponse>>> {
    let actor = get_record_id_from_string(account_id)?;
    let workspace_id = get_record_id_from_string(ws_id)?;
    let list = journals::list_journals(&state.sdb, &actor, &workspace_id).await?;
    Ok(Json(list.into_iter().map(Into::into).collect()))
}

pub async fn read_journal(
    State(state): State<AppState>,
    Extension(AccountId(account_id)): Extension<AccountId>,
    Path(journal_id): Path<String>,
) -> Result<Json<JournalResponse>> {
    let actor = get_record_id_from_string(account_id)?;
    let journal_id = get_record_id_from_string(journal_id)?;
    let journal = journals::get_journal(&state.sdb, &actor, &journal_id).await?;
    Ok(Json(journal.into()))
}

#[derive(serde::Deserialize, Debug, Clone, Validate)]
pub struct ResummarizeRequest {
    pub template_id: Option<String>,
    #[validate(length(max = 16))]
    pub language: Option<String>,
}

pub async fn resummarize(
    State(state): State<AppState>,
    Extension(AccountId(account_id)): Extension<AccountId>,
    Path(journal_id): Path<String>,
    ValidatedJson(input): ValidatedJson<ResummarizeRequest>,
) -> Result<Json<JournalResponse>> {
    let actor = get_record_id_from_string(account_id)?;
    let journal_id = get_record_id_from_string(journal_id)?;
    let template_id = input
        .template_id
        .map(get_record_id_from_string)
        .transpose()?;

    let journal = journals::resummarize(
        &state.sdb,
        &state.pipeline,
        &actor,
        &journal_id,
        template_id,
        input.language,
    )
    .await?;
    Ok(Json(journal.into()))
}

pub async fn delete_journal(
    State(state): State<AppState>,
    Extension(AccountId(account_id)): Extension<AccountId>,
    Path(journal_id): Path<String>,
) -> Result<StatusCode> {
    let actor = get_record_id_from_string(account_id)?;
    let journal_id = get_record_id_from_string(journal_id)?;
    journals::delete_journal(&state.sdb, &state.assets, &actor, &journal_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Completion callbacks arrive on the pipeline's schedule, seconds to
/// minutes after dispatch, or more than once, or never.
pub async fn pipeline_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(callback): Json<CompletionCallback>,
) -> Result<StatusCode> {
    let presented = headers
        .get("x-pipeline-token")
        .and_then(|value| value.to_str().ok())
        .ok_or(Error::MissingToken)?;
    if presented != state.pipeline_token {
        return Err(Error::InvalidToken);
    }

    journals::complete_processing(&state.sdb, callback).await?;
    Ok(StatusCode::OK)
}
