use chrono::{Duration, Utc};

use echolog::{
    errors::Error,
    models::invite::InviteStatus,
    services::{invites, memberships},
};

mod common;
use common::{signup, test_db, workspace_of};

#[tokio::test]
async fn invite_scenario_end_to_end() {
    let sdb = test_db().await;

    // A signs up; default workspace and owner membership exist.
    let a = signup(&sdb, "a@example.com", "A").await;
    let ws = workspace_of(&a);

    let (invite, token) = invites::create_invite(
        &sdb,
        &a.id,
        &ws,
        "b@example.com".to_string(),
        Some((Utc::now() + Duration::hours(72)).to_rfc3339()),
    )
    .await
    .unwrap();
    assert_eq!(invite.status, InviteStatus::Pending);
    let token = token.unwrap();

    // B signs up separately and gets a workspace of their own.
    let b = signup(&sdb, "b@example.com", "B").await;

    let accepted = invites::accept_invite(&sdb, &b.id, &token).await.unwrap();
    assert_eq!(accepted.status, InviteStatus::Accepted);
    assert_eq!(accepted.accepted_by, Some(b.id.clone()));

    let members = memberships::list_memberships(&sdb, &a.id, &ws).await.unwrap();
    assert_eq!(members.len(), 2);

    // B leaves by revoking their own invite.
    let revoked = invites::revoke_invite(&sdb, &b.id, &accepted.id).await.unwrap();
    assert_eq!(revoked.status, InviteStatus::Revoked);

    let members = memberships::list_memberships(&sdb, &a.id, &ws).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].account_id, a.id);

    // The token is spent for good.
    let err = invites::accept_invite(&sdb, &b.id, &token).await.unwrap_err();
    assert!(matches!(err, Error::InviteInvalid));
}

#[tokio::test]
async fn concurrent_acceptance_single_winner() {
    let sdb = test_db().await;
    let a = signup(&sdb, "a@example.com", "A").await;
    let ws = workspace_of(&a);
    let b = signup(&sdb, "b@example.com", "B").await;

    let (_, token) = invites::create_invite(&sdb, &a.id, &ws, "b@example.com".to_string(), None)
        .await
        .unwrap();
    let token = token.unwrap();

    let (first, second) = tokio::join!(
        invites::accept_invite(&sdb, &b.id, &token),
        invites::accept_invite(&sdb, &b.id, &token),
    );

    let oks = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(oks, 1, "exactly one concurrent acceptance may win");
    for result in [first, second] {
        if let Err(err) = result {
            assert!(matches!(err, Error::InviteInvalid));
        }
    }

    // Exactly one membership row for B despite the race.
    let members = memberships::list_memberships(&sdb, &a.id, &ws).await.unwrap();
    let b_rows = members.iter().filter(|m| m.account_id == b.id).count();
    assert_eq!(b_rows, 1);
}

#[tokio::test]
async fn expired_invite_fails_lazily() {
    let sdb = test_db().await;
    let a = signup(&sdb, "a@example.com", "A").await;
    let ws = workspace_of(&a);
    let b = signup(&sdb, "b@example.com", "B").await;

    let (_, token) = invites::create_invite(
        &sdb,
        &a.id,
        &ws,
        "b@example.com".to_string(),
        Some((Utc::now() - Duration::hours(1)).to_rfc3339()),
    )
    .await
    .unwrap();

    let err = invites::accept_invite(&sdb, &b.id, &token.unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InviteInvalid));

    // No sweeper ran; the stored row still says Pending but reads as Expired.
    let listed = invites::list_invites(&sdb, &a.id, &ws).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].status, InviteStatus::Expired);
}

#[tokio::test]
async fn non_expiring_invite_stays_acceptable() {
    let sdb = test_db().await;
    let a = signup(&sdb, "a@example.com", "A").await;
    let ws = workspace_of(&a);
    let b = signup(&sdb, "b@example.com", "B").await;

    let (_, token) = invites::create_invite(&sdb, &a.id, &ws, "b@example.com".to_string(), None)
        .await
        .unwrap();

    let accepted = invites::accept_invite(&sdb, &b.id, &token.unwrap())
        .await
        .unwrap();
    assert_eq!(accepted.status, InviteStatus::Accepted);
}

#[tokio::test]
async fn duplicate_pending_invite_is_idempotent() {
    let sdb = test_db().await;
    let a = signup(&sdb, "a@example.com", "A").await;
    let ws = workspace_of(&a);

    let (first, token) = invites::create_invite(&sdb, &a.id, &ws, "b@example.com".to_string(), None)
        .await
        .unwrap();
    assert!(token.is_some());

    let (second, token) = invites::create_invite(&sdb, &a.id, &ws, "b@example.com".to_string(), None)
        .await
        .unwrap();
    assert!(token.is_none(), "no new token for a still-pending invite");
    assert_eq!(first.id, second.id);
}

#[tokio::test]
async fn only_the_invited_address_declines() {
    let sdb = test_db().await;
    let a = signup(&sdb, "a@example.com", "A").await;
    let ws = workspace_of(&a);
    let b = signup(&sdb, "b@example.com", "B").await;
    let c = signup(&sdb, "c@example.com", "C").await;

    let (invite, token) = invites::create_invite(&sdb, &a.id, &ws, "b@example.com".to_string(), None)
        .await
        .unwrap();

    let err = invites::decline_invite(&sdb, &c.id, &invite.id).await.unwrap_err();
    assert!(matches!(err, Error::PermissionDenied));

    let declined = invites::decline_invite(&sdb, &b.id, &invite.id).await.unwrap();
    assert_eq!(declined.status, InviteStatus::Declined);

    // Declining leaves no membership behind and spends the token.
    let members = memberships::list_memberships(&sdb, &a.id, &ws).await.unwrap();
    assert_eq!(members.len(), 1);
    let err = invites::accept_invite(&sdb, &b.id, &token.unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InviteInvalid));
}

#[tokio::test]
async fn revoke_is_idempotent_and_guarded() {
    let sdb = test_db().await;
    let a = signup(&sdb, "a@example.com", "A").await;
    let ws = workspace_of(&a);
    let b = signup(&sdb, "b@example.com", "B").await;
    let outsider = signup(&sdb, "x@example.com", "X").await;

    let (invite, token) = invites::create_invite(&sdb, &a.id, &ws, "b@example.com".to_string(), None)
        .await
        .unwrap();
    invites::accept_invite(&sdb, &b.id, &token.unwrap())
        .await
        .unwrap();

    // Neither a stranger nor a plain member may revoke someone else's invite.
    let err = invites::revoke_invite(&sdb, &outsider.id, &invite.id)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::PermissionDenied));

    let revoked = invites::revoke_invite(&sdb, &a.id, &invite.id).await.unwrap();
    assert_eq!(revoked.status, InviteStatus::Revoked);

    // Second revoke is a no-op success.
    let again = invites::revoke_invite(&sdb, &a.id, &invite.id).await.unwrap();
    assert_eq!(again.status, InviteStatus::Revoked);
}

#[tokio::test]
async fn concurrent_revocations_both_succeed() {
    let sdb = test_db().await;
    let a = signup(&sdb, "a@example.com", "A").await;
    let ws = workspace_of(&a);
    let b = signup(&sdb, "b@example.com", "B").await;

    let (invite, token) = invites::create_invite(&sdb, &a.id, &ws, "b@example.com".to_string(), None)
        .await
        .unwrap();
    invites::accept_invite(&sdb, &b.id, &token.unwrap())
        .await
        .unwrap();

    // Owner and leaving member revoke at the same moment; the loser of the
    // race gets the same no-op success as a sequential second revoke.
    let (first, second) = tokio::join!(
        invites::revoke_invite(&sdb, &a.id, &invite.id),
        invites::revoke_invite(&sdb, &b.id, &invite.id),
    );
    assert_eq!(first.unwrap().status, InviteStatus::Revoked);
    assert_eq!(second.unwrap().status, InviteStatus::Revoked);

    let members = memberships::list_memberships(&sdb, &a.id, &ws).await.unwrap();
    assert_eq!(members.len(), 1);
}

#[tokio::test]
async fn invite_creation_is_core_only() {
    let sdb = test_db().await;
    let a = signup(&sdb, "a@example.com", "A").await;
    let ws = workspace_of(&a);
    let b = signup(&sdb, "b@example.com", "B").await;

    let (_, token) = invites::create_invite(&sdb, &a.id, &ws, "b@example.com".to_string(), None)
        .await
        .unwrap();
    invites::accept_invite(&sdb, &b.id, &token.unwrap())
        .await
        .unwrap();

    // B is a member now, but not core: inviting is still the owner's call.
    let err = invites::create_invite(&sdb, &b.id, &ws, "c@example.com".to_string(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::PermissionDenied));
}
