use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::{
    consts::invites::DEFAULT_TTL_HOURS,
    errors::Result,
    middleware::AccountId,
    services::invites,
    state::AppState,
    utils::{
        get_record_id::get_record_id_from_string, time::time_now_plus_hours,
        validated_form::ValidatedJson,
    },
};

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Validate)]
pub struct SendInviteRequest {
    #[validate(email, length(max = 255))]
    pub email: String,
    /// Hours until the invite lapses. Absent = default window; explicit 0 =
    /// non-expiring.
    pub ttl_hours: Option<i64>,
}

pub async fn send_invite(
    State(state): State<AppState>,
    Extension(AccountId(account_id)): Extension<AccountId>,
    Path(ws_id): Path<String>,
    ValidatedJson(input): ValidatedJson<SendInviteRequest>,
) -> Result<(StatusCode, Json<invites::InviteView>)> {
    let actor = get_record_id_from_string(account_id)?;
    let workspace_id = get_record_id_from_string(ws_id)?;

    let expires_at = match input.ttl_hours {
        Some(0) => None,
        Some(hours) => Some(time_now_plus_hours(hours)),
        None => Some(time_now_plus_hours(DEFAULT_TTL_HOURS)),
    };

    let (invite, _token) =
        invites::create_invite(&state.sdb, &actor, &workspace_id, input.email, expires_at).await?;

    Ok((StatusCode::CREATED, Json(invite)))
}

pub async fn read_invites(
    State(state): State<AppState>,
    Extension(AccountId(account_id)): Extension<AccountId>,
    Path(ws_id): Path<String>,
) -> Result<Json<Vec<invites::InviteView>>> {
    let actor = get_record_id_from_string(account_id)?;
    let workspace_id = get_record_id_from_string(ws_id)?;
    let list = invites::list_invites(&state.sdb, &actor, &workspace_id).await?;
    Ok(Json(list))
}

#[derive(serde::Deserialize, Debug, Clone, Validate)]
pub struct AcceptInviteRequest {
    #[validate(length(min = 16, max = 64))]
    pub token: String,
}

pub async fn accept_invite(
    State(state): State<AppState>,
    Extension(AccountId(account_id)): Extension<AccountId>,
    ValidatedJson(input): ValidatedJson<AcceptInviteRequest>,
) -> Result<Json<invites::InviteView>> {
    let actor = get_record_id_from_string(account_id)?;
    let invite = invites::accept_invite(&state.sdb, &actor, &input.token).await?;
    Ok(Json(invite))
}

pub async fn decline_invite(
    State(state): State<AppState>,
    Extension(AccountId(account_id)): Extension<AccountId>,
    Path(invite_id): Path<String>,
) -> Result<Json<invites::InviteView>> {
    let actor = get_record_id_from_string(account_id)?;
    let invite_id = get_record_id_from_string(invite_id)?;
    let invite = invites::decline_invite(&state.sdb, &actor, &invite_id).await?;
    Ok(Json(invite))
}

pub async fn revoke_invite(
    State(state): State<AppState>,
    Extension(AccountId(account_id)): Extension<AccountId>,
    Path(invite_id): Path<String>,
) -> Result<Json<invites::InviteView>> {
    let actor = get_record_id_from_string(account_id)?;
    let invite_id = get_record_id_from_string(invite_id)?;
    let invite = invites::revoke_invite(&state.sdb, &actor, &invite_id).await?;
    Ok(Json(invite))
}
