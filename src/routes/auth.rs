use axum::{Json, extract::State, http::StatusCode};
use chrono::{Duration, Utc};
use validator::Validate;

use crate::{
    errors::{Error, Result},
    services::bootstrap,
    state::AppState,
    utils::{
        jwt::{Claims, encode_jwt},
        password_rules::validate_password,
        pwd::{hash, validate},
        validated_form::ValidatedJson,
    },
};

#[derive(Debug, Clone, serde::Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(custom(function = validate_password))]
    pub password: String,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct SignUpResponse {
    pub account_id: String,
    pub workspace_id: String,
}

/// Signup doubles as the bootstrap collaborator: account, default workspace
/// and owner membership exist together before the response goes out.
pub async fn sign_up(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<SignUpRequest>,
) -> Result<(StatusCode, Json<SignUpResponse>)> {
    let password_hash = hash(input.password.as_bytes())?;
    let account = bootstrap::create_account_with_workspace(
        &state.sdb,
        input.email,
        input.name,
        password_hash,
    )
    .await?;

    // Workspace key equals account key, so the id is derivable here without
    // another read.
    let account_id = account.id.to_string();
    let key = account_id
        .split_once(':')
        .map(|(_, key)| key)
        .unwrap_or(&account_id);
    let workspace_id = format!("workspaces:{key}");

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            account_id: account.id.to_string(),
            workspace_id,
        }),
    ))
}

#[derive(Debug, Clone, serde::Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct SignInResponse {
    pub token: String,
    pub account_id: String,
}

pub async fn sign_in(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<SignInRequest>,
) -> Result<Json<SignInResponse>> {
    let account = bootstrap::account_by_email(&state.sdb, &input.email)
        .await?
        .ok_or(Error::InvalidLoginDetails)?;
    let stored = bootstrap::password_for_account(&state.sdb, &account)
        .await?
        .ok_or(Error::InvalidLoginDetails)?;

    if !validate(input.password.as_bytes(), &stored.password_hash)? {
        return Err(Error::InvalidLoginDetails);
    }

    let now = Utc::now();
    let claims = Claims {
        id: account.id.to_string(),
        exp: (now + Duration::days(7)).timestamp() as usize,
        iat: now.timestamp() as usize,
        iss: "echolog".to_string(),
    };
    let token = encode_jwt(&claims)?;

    Ok(Json(SignInResponse {
        token,
        account_id: account.id.to_string(),
    }))
}
