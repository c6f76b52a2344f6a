use surrealdb::{RecordId, Surreal, engine::any::Any};

use crate::{
    authz::{self, AccessScope, EntityKind, Operation, RowFacts},
    consts::table::{INVITE_TABLE, MEMBERSHIP_TABLE},
    errors::{Error, Result},
    models::{
        invite::InviteStatus,
        workspace::Membership,
    },
    utils::time::time_now,
};

/// Core members see every row; an ordinary member sees only their own.
pub async fn list_memberships(
    sdb: &Surreal<Any>,
    actor: &RecordId,
    workspace_id: &RecordId,
) -> Result<Vec<Membership>> {
    let scope = AccessScope::load(sdb, actor, workspace_id).await?;
    if !scope.is_member {
        return Err(Error::NotFound);
    }

    let memberships: Vec<Membership> = sdb
        .query("SELECT * FROM type::table($table) WHERE workspace_id = $workspace_id;")
        .bind(("table", MEMBERSHIP_TABLE))
        .bind(("workspace_id", workspace_id.clone()))
        .await?
        .take(0)?;

    Ok(memberships
        .into_iter()
        .filter(|membership| {
            let row = RowFacts {
                member_account: Some(&membership.account_id),
                ..Default::default()
            };
            authz::can_access(&scope, EntityKind::Membership, Operation::Read, &row)
        })
        .collect())
}

/// Core member removes a collaborator. The owner's own row is permanent: the
/// rule holds even though the owner is simultaneously "self" and "core".
/// An invite the member entered through is marked revoked alongside, so the
/// invite ledger matches the membership table.
pub async fn remove_member(
    sdb: &Surreal<Any>,
    actor: &RecordId,
    workspace_id: &RecordId,
    account_id: &RecordId,
) -> Result<()> {
    let scope = AccessScope::load(sdb, actor, workspace_id).await?;
    if !scope.is_member {
        return Err(Error::NotFound);
    }

    if scope.is_core() && account_id == &scope.owner_id {
        return Err(Error::ProtectedOwnerMembership);
    }
    let row = RowFacts {
        member_account: Some(account_id),
        ..Default::default()
    };
    authz::check(&scope, EntityKind::Membership, Operation::Delete, &row)?;

    let existing: Vec<Membership> = sdb
        .query(
            "SELECT * FROM type::table($table) WHERE workspace_id = $workspace_id AND account_id = $account_id;",
        )
        .bind(("table", MEMBERSHIP_TABLE))
        .bind(("workspace_id", workspace_id.clone()))
        .bind(("account_id", account_id.clone()))
        .await?
        .take(0)?;
    if existing.is_empty() {
        return Err(Error::NotFound);
    }

    sdb.query(
        "DELETE type::table($table) WHERE workspace_id = $workspace_id AND account_id = $account_id;",
    )
    .bind(("table", MEMBERSHIP_TABLE))
    .bind(("workspace_id", workspace_id.clone()))
    .bind(("account_id", account_id.clone()))
    .await?
    .check()?;

    sdb.query(
        "UPDATE type::table($table) SET status = $revoked, updated_at = $now WHERE workspace_id = $workspace_id AND accepted_by = $account_id AND status = $accepted;",
    )
    .bind(("table", INVITE_TABLE))
    .bind(("revoked", InviteStatus::Revoked))
    .bind(("now", time_now()))
    .bind(("workspace_id", workspace_id.clone()))
    .bind(("account_id", account_id.clone()))
    .bind(("accepted", InviteStatus::Accepted))
    .await?
    .check()?;

    Ok(())
}
