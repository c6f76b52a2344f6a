use chrono::Utc;
use serde::{Deserialize, Serialize};
use surrealdb::{RecordId, Surreal, engine::any::Any};
use tracing::info;

use crate::{
    authz::{self, AccessScope, EntityKind, Operation, RowFacts},
    consts::table::{INVITE_TABLE, MEMBERSHIP_TABLE},
    errors::{Error, Result},
    models::{
        account::Account,
        invite::{CreateInvite, Invite, InviteStatus},
        workspace::{CreateMembership, Membership},
    },
    utils::{
        time::time_now,
        token::{generate_invite_token, hash_token},
    },
};

/// What callers see of an invite: effective status applied, token hash kept
/// out of responses.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct InviteView {
    pub id: RecordId,
    pub workspace_id: RecordId,
    pub email: String,
    pub status: InviteStatus,
    pub invited_by: RecordId,
    pub accepted_by: Option<RecordId>,
    pub expires_at: Option<String>,
    pub created_at: String,
}

impl From<Invite> for InviteView {
    fn from(invite: Invite) -> Self {
        let status = invite.effective_status(Utc::now());
        Self {
            id: invite.id,
            workspace_id: invite.workspace_id,
            email: invite.email,
            status,
            invited_by: invite.invited_by,
            accepted_by: invite.accepted_by,
            expires_at: invite.expires_at,
            created_at: invite.created_at,
        }
    }
}

/// Core member offers workspace membership to an email address. Returns the
/// raw token exactly once; only its hash is stored. A still-pending invite
/// for the same email is answered idempotently with no new token.
pub async fn create_invite(
    sdb: &Surreal<Any>,
    actor: &RecordId,
    workspace_id: &RecordId,
    email: String,
    expires_at: Option<String>,
) -> Result<(InviteView, Option<String>)> {
    let scope = AccessScope::load(sdb, actor, workspace_id).await?;
    authz::check(&scope, EntityKind::Invite, Operation::Create, &RowFacts::default())?;

    let now = Utc::now();
    let pending: Vec<Invite> = sdb
        .query(
            "SELECT * FROM type::table($table) WHERE workspace_id = $workspace_id AND email = $email AND status = $status;",
        )
        .bind(("table", INVITE_TABLE))
        .bind(("workspace_id", workspace_id.clone()))
        .bind(("email", email.clone()))
        .bind(("status", InviteStatus::Pending))
        .await?
        .take(0)?;

    if let Some(existing) = pending
        .into_iter()
        .find(|invite| invite.effective_status(now) == InviteStatus::Pending)
    {
        return Ok((existing.into(), None));
    }

    let (raw_token, token_hash) = generate_invite_token();
    let invite: Invite = sdb
        .create(INVITE_TABLE)
        .content(CreateInvite {
            workspace_id: workspace_id.clone(),
            email: email.clone(),
            token: token_hash,
            invited_by: actor.clone(),
            status: InviteStatus::Pending,
            accepted_by: None,
            expires_at,
            created_at: time_now(),
        })
        .await?
        .ok_or(Error::InternalServerError)?;

    // Email delivery is an external collaborator; the token is logged so a
    // local operator can hand it over.
    info!("invite for {email} created, token = {raw_token}");

    Ok((invite.into(), Some(raw_token)))
}

/// Redeems a token. The pending→accepted transition is a single
/// compare-and-set UPDATE, so of two concurrent acceptances exactly one wins
/// and the loser observes the already-transitioned row as `InviteInvalid`.
/// The winner then inserts the membership; an account that is already a
/// member is left as-is.
pub async fn accept_invite(
    sdb: &Surreal<Any>,
    actor: &RecordId,
    raw_token: &str,
) -> Result<InviteView> {
    let token_hash = hash_token(raw_token);
    let found: Vec<Invite> = sdb
        .query("SELECT * FROM type::table($table) WHERE token = $token_hash;")
        .bind(("table", INVITE_TABLE))
        .bind(("token_hash", token_hash.clone()))
        .await?
        .take(0)?;

    let invite = found.into_iter().next().ok_or(Error::InviteInvalid)?;
    if invite.effective_status(Utc::now()) != InviteStatus::Pending {
        return Err(Error::InviteInvalid);
    }

    let accepted: Vec<Invite> = sdb
        .query(
            "UPDATE type::table($table) SET status = $accepted, accepted_by = $actor, updated_at = $now WHERE token = $token_hash AND status = $pending RETURN AFTER;",
        )
        .bind(("table", INVITE_TABLE))
        .bind(("accepted", InviteStatus::Accepted))
        .bind(("actor", actor.clone()))
        .bind(("now", time_now()))
        .bind(("token_hash", token_hash))
        .bind(("pending", InviteStatus::Pending))
        .await?
        .take(0)?;

    let invite = accepted.into_iter().next().ok_or(Error::InviteInvalid)?;

    let existing: Vec<Membership> = sdb
        .query(
            "SELECT * FROM type::table($table) WHERE workspace_id = $workspace_id AND account_id = $account_id;",
        )
        .bind(("table", MEMBERSHIP_TABLE))
        .bind(("workspace_id", invite.workspace_id.clone()))
        .bind(("account_id", actor.clone()))
        .await?
        .take(0)?;

    if existing.is_empty() {
        let _: Option<Membership> = sdb
            .create(MEMBERSHIP_TABLE)
            .content(CreateMembership {
                workspace_id: invite.workspace_id.clone(),
                account_id: actor.clone(),
                created_at: time_now(),
            })
            .await?;
    }

    Ok(invite.into())
}

/// Declines a pending invite. Only the invited address itself may decline;
/// no membership side effect.
pub async fn decline_invite(
    sdb: &Surreal<Any>,
    actor: &RecordId,
    invite_id: &RecordId,
) -> Result<InviteView> {
    let invite: Invite = sdb
        .select(invite_id.clone())
        .await?
        .ok_or(Error::NotFound)?;

    let account: Account = sdb
        .select(actor.clone())
        .await?
        .ok_or(Error::NotFound)?;
    if account.email != invite.email {
        return Err(Error::PermissionDenied);
    }
    if invite.effective_status(Utc::now()) != InviteStatus::Pending {
        return Err(Error::InviteInvalid);
    }

    let declined: Vec<Invite> = sdb
        .query(
            "UPDATE $invite SET status = $declined, updated_at = $now WHERE status = $pending RETURN AFTER;",
        )
        .bind(("invite", invite_id.clone()))
        .bind(("declined", InviteStatus::Declined))
        .bind(("now", time_now()))
        .bind(("pending", InviteStatus::Pending))
        .await?
        .take(0)?;

    declined
        .into_iter()
        .next()
        .map(Into::into)
        .ok_or(Error::InviteInvalid)
}

/// Revokes an invite: a core member withdrawing it, or the member who
/// entered through it leaving. Accepted invites lose their membership row,
/// except the structurally-impossible case of the owner's own row, which is
/// refused outright. Revoking twice is a no-op success.
pub async fn revoke_invite(
    sdb: &Surreal<Any>,
    actor: &RecordId,
    invite_id: &RecordId,
) -> Result<InviteView> {
    let invite: Invite = sdb
        .select(invite_id.clone())
        .await?
        .ok_or(Error::NotFound)?;

    let scope = AccessScope::load(sdb, actor, &invite.workspace_id).await?;
    let self_leave = invite.accepted_by.as_ref() == Some(actor);
    if !scope.is_core() && !self_leave {
        return Err(Error::PermissionDenied);
    }

    if invite.status == InviteStatus::Revoked {
        return Ok(invite.into());
    }

    if invite.status == InviteStatus::Accepted
        && invite.accepted_by.as_ref() == Some(&scope.owner_id)
    {
        return Err(Error::ProtectedOwnerMembership);
    }

    let revoked: Vec<Invite> = sdb
        .query(
            "UPDATE $invite SET status = $revoked, updated_at = $now WHERE status IN [$pending, $accepted] RETURN AFTER;",
        )
        .bind(("invite", invite_id.clone()))
        .bind(("revoked", InviteStatus::Revoked))
        .bind(("now", time_now()))
        .bind(("pending", InviteStatus::Pending))
        .bind(("accepted", InviteStatus::Accepted))
        .await?
        .take(0)?;

    let updated = match revoked.into_iter().next() {
        Some(updated) => updated,
        // An empty CAS result here means another revoke landed between our
        // read and the update. Re-read and answer idempotently, same as
        // revoking twice in sequence.
        None => {
            let current: Invite = sdb
                .select(invite_id.clone())
                .await?
                .ok_or(Error::InviteInvalid)?;
            if current.status != InviteStatus::Revoked {
                return Err(Error::InviteInvalid);
            }
            current
        }
    };

    if let Some(accepted_by) = &invite.accepted_by
        && invite.status == InviteStatus::Accepted
    {
        sdb.query(
            "DELETE type::table($table) WHERE workspace_id = $workspace_id AND account_id = $account_id;",
        )
        .bind(("table", MEMBERSHIP_TABLE))
        .bind(("workspace_id", invite.workspace_id.clone()))
        .bind(("account_id", accepted_by.clone()))
        .await?
        .check()?;
    }

    Ok(updated.into())
}

/// Core-only listing, effective statuses applied at read time (this is
/// where a lapsed pending invite first shows as Expired).
pub async fn list_invites(
    sdb: &Surreal<Any>,
    actor: &RecordId,
    workspace_id: &RecordId,
) -> Result<Vec<InviteView>> {
    let scope = AccessScope::load(sdb, actor, workspace_id).await?;
    authz::check(&scope, EntityKind::Invite, Operation::Read, &RowFacts::default())?;

    let invites: Vec<Invite> = sdb
        .query("SELECT * FROM type::table($table) WHERE workspace_id = $workspace_id;")
        .bind(("table", INVITE_TABLE))
        .bind(("workspace_id", workspace_id.clone()))
        .await?
        .take(0)?;

    Ok(invites.into_iter().map(Into::into).collect())
}
