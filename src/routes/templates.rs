use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::{
    errors::Result,
    middleware::AccountId,
    models::template::{Template, VocabularyEntry},
    services::{templates, vocabulary},
    state::AppState,
    utils::{get_record_id::get_record_id_from_string, validated_form::ValidatedJson},
};

pub async fn read_std_templates(
    State(state): State<AppState>,
) -> Result<Json<Vec<Template>>> {
    let list = templates::list_std_templates(&state.sdb).await?;
    Ok(Json(list))
}

pub async fn read_templates(
    State(state): State<AppState>,
    Extension(AccountId(account_id)): Extension<AccountId>,
    Path(ws_id): Path<String>,
) -> Result<Json<Vec<Template>>> {
    let actor = get_record_id_from_string(account_id)?;
    let workspace_id = get_record_id_from_string(ws_id)?;
    let list = templates::list_templates(&state.sdb, &actor, &workspace_id).await?;
    Ok(Json(list))
}

#[derive(serde::Deserialize, Debug, Clone, Validate)]
pub struct CreateTemplateRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 4096))]
    pub prompt: String,
}

pub async fn create_template(
    State(state): State<AppState>,
    Extension(AccountId(account_id)): Extension<AccountId>,
    Path(ws_id): Path<String>,
    ValidatedJson(input): ValidatedJson<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<Template>)> {
    let actor = get_record_id_from_string(account_id)?;
    let workspace_id = get_record_id_from_string(ws_id)?;
    let template =
        templates::create_template(&state.sdb, &actor, &workspace_id, input.name, input.prompt)
            .await?;
    Ok((StatusCode::CREATED, Json(template)))
}

#[derive(serde::Deserialize, Debug, Clone, Validate)]
pub struct UpdateTemplateRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 4096))]
    pub prompt: Option<String>,
}

pub async fn update_template(
    State(state): State<AppState>,
    Extension(AccountId(account_id)): Extension<AccountId>,
    Path(template_id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateTemplateRequest>,
) -> Result<Json<Template>> {
    let actor = get_record_id_from_string(account_id)?;
    let template_id = get_record_id_from_string(template_id)?;
    let template =
        templates::update_template(&state.sdb, &actor, &template_id, input.name, input.prompt)
            .await?;
    Ok(Json(template))
}

pub async fn delete_template(
    State(state): State<AppState>,
    Extension(AccountId(account_id)): Extension<AccountId>,
    Path(template_id): Path<String>,
) -> Result<StatusCode> {
    let actor = get_record_id_from_string(account_id)?;
    let template_id = get_record_id_from_string(template_id)?;
    templates::delete_template(&state.sdb, &actor, &template_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn read_vocabulary(
    State(state): State<AppState>,
    Extension(AccountId(account_id)): Extension<AccountId>,
    Path(ws_id): Path<String>,
) -> Result<Json<Vec<VocabularyEntry>>> {
    let actor = get_record_id_from_string(account_id)?;
    let workspace_id = get_record_id_from_string(ws_id)?;
    let list = vocabulary::list_entries(&state.sdb, &actor, &workspace_id).await?;
    Ok(Json(list))
}

#[derive(serde::Deserialize, Debug, Clone, Validate)]
pub struct CreateVocabularyRequest {
    #[validate(length(min = 1, max = 255))]
    pub pattern: String,
    #[validate(length(min = 1, max = 255))]
    pub replacement: String,
}

pub async fn create_vocabulary_entry(
    State(state): State<AppState>,
    Extension(AccountId(account_id)): Extension<AccountId>,
    Path(ws_id): Path<String>,
    ValidatedJson(input): ValidatedJson<CreateVocabularyRequest>,
) -> Result<(StatusCode, Json<VocabularyEntry>)> {
    let actor = get_record_id_from_string(account_id)?;
    let workspace_id = get_record_id_from_string(ws_id)?;
    let entry = vocabulary::create_entry(
        &state.sdb,
        &actor,
        &workspace_id,
        input.pattern,
        input.replacement,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[derive(serde::Deserialize, Debug, Clone, Validate)]
pub struct UpdateVocabularyRequest {
    #[validate(length(min = 1, max = 255))]
    pub pattern: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub replacement: Option<String>,
}

pub async fn update_vocabulary_entry(
    State(state): State<AppState>,
    Extension(AccountId(account_id)): Extension<AccountId>,
    Path(entry_id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateVocabularyRequest>,
) -> Result<Json<VocabularyEntry>> {
    let actor = get_record_id_from_string(account_id)?;
    let entry_id = get_record_id_from_string(entry_id)?;
    let entry = vocabulary::update_entry(
        &state.sdb,
        &actor,
        &entry_id,
        input.pattern,
        input.replacement,
    )
    .await?;
    Ok(Json(entry))
}

pub async fn delete_vocabulary_entry(
    State(state): State<AppState>,
    Extension(AccountId(account_id)): Extension<AccountId>,
    Path(entry_id): Path<String>,
) -> Result<StatusCode> {
    let actor = get_record_id_from_string(account_id)?;
    let entry_id = get_record_id_from_string(entry_id)?;
    vocabulary::delete_entry(&state.sdb, &actor, &entry_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
