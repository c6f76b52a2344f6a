use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::{
    errors::Result,
    middleware::AccountId,
    models::workspace::{Membership, Workspace},
    services::{memberships, workspaces},
    state::AppState,
    utils::{get_record_id::get_record_id_from_string, validated_form::ValidatedJson},
};

pub async fn read_workspace(
    State(state): State<AppState>,
    Extension(AccountId(account_id)): Extension<AccountId>,
    Path(ws_id): Path<String>,
) -> Result<Json<Workspace>> {
    let actor = get_record_id_from_string(account_id)?;
    let workspace_id = get_record_id_from_string(ws_id)?;
    let workspace = workspaces::get_workspace(&state.sdb, &actor, &workspace_id).await?;
    Ok(Json(workspace))
}

#[derive(serde::Deserialize, Debug, Clone, Validate)]
pub struct RenameWorkspaceRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

pub async fn rename_workspace(
    State(state): State<AppState>,
    Extension(AccountId(account_id)): Extension<AccountId>,
    Path(ws_id): Path<String>,
    ValidatedJson(input): ValidatedJson<RenameWorkspaceRequest>,
) -> Result<Json<Workspace>> {
    let actor = get_record_id_from_string(account_id)?;
    let workspace_id = get_record_id_from_string(ws_id)?;
    let workspace =
        workspaces::rename_workspace(&state.sdb, &actor, &workspace_id, input.name).await?;
    Ok(Json(workspace))
}

pub async fn read_memberships(
    State(state): State<AppState>,
    Extension(AccountId(account_id)): Extension<AccountId>,
    Path(ws_id): Path<String>,
) -> Result<Json<Vec<Membership>>> {
    let actor = get_record_id_from_string(account_id)?;
    let workspace_id = get_record_id_from_string(ws_id)?;
    let list = memberships::list_memberships(&state.sdb, &actor, &workspace_id).await?;
    Ok(Json(list))
}

pub async fn remove_membership(
    State(state): State<AppState>,
    Extension(AccountId(account_id)): Extension<AccountId>,
    Path((ws_id, member_account_id)): Path<(String, String)>,
) -> Result<StatusCode> {
    let actor = get_record_id_from_string(account_id)?;
    let workspace_id = get_record_id_from_string(ws_id)?;
    let member_account = get_record_id_from_string(member_account_id)?;
    memberships::remove_member(&state.sdb, &actor, &workspace_id, &member_account).await?;
    Ok(StatusCode::NO_CONTENT)
}
