use surrealdb::{RecordId, Surreal, engine::any::Any};

use crate::{
    authz::{self, AccessScope, EntityKind, Operation, RowFacts},
    errors::{Error, Result},
    models::workspace::Workspace,
    utils::time::time_now,
};

pub async fn get_workspace(
    sdb: &Surreal<Any>,
    actor: &RecordId,
    workspace_id: &RecordId,
) -> Result<Workspace> {
    let scope = AccessScope::load(sdb, actor, workspace_id).await?;
    authz::check(&scope, EntityKind::Workspace, Operation::Read, &RowFacts::default())
        .map_err(|_| Error::NotFound)?;

    sdb.select(workspace_id.clone())
        .await?
        .ok_or(Error::NotFound)
}

/// The dedicated rename path; the only workspace mutation callers get.
/// Creation and deletion belong to the bootstrap collaborator.
pub async fn rename_workspace(
    sdb: &Surreal<Any>,
    actor: &RecordId,
    workspace_id: &RecordId,
    name: String,
) -> Result<Workspace> {
    let scope = AccessScope::load(sdb, actor, workspace_id).await?;
    if !scope.is_member {
        return Err(Error::NotFound);
    }
    authz::check(&scope, EntityKind::Workspace, Operation::Update, &RowFacts::default())?;

    let updated: Vec<Workspace> = sdb
        .query("UPDATE $workspace SET name = $name, updated_at = $now RETURN AFTER;")
        .bind(("workspace", workspace_id.clone()))
        .bind(("name", name))
        .bind(("now", time_now()))
        .await?
        .take(0)?;

    updated.into_iter().next().ok_or(Error::NotFound)
}
