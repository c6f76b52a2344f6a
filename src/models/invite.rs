use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use crate::utils::time::parse_rfc3339;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum InviteStatus {
    Pending,
    Accepted,
    Declined,
    Revoked,
    /// Never written by a transition; the lazily computed effective status of
    /// a pending invite whose `expires_at` has elapsed.
    Expired,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Invite {
    pub id: RecordId,
    pub workspace_id: RecordId,
    pub email: String, // ! & (len = 255)

    /// SHA-256 hex of the raw token; the raw value is handed out once at
    /// creation and never stored.
    pub token: String, // ! unique
    pub invited_by: RecordId,

    pub status: InviteStatus,
    pub accepted_by: Option<RecordId>,
    pub expires_at: Option<String>, // ! None = non-expiring

    pub created_at: String,
    pub updated_at: Option<String>,
}

impl Invite {
    /// Expiry is inferred at read time, never swept by a background job.
    pub fn effective_status(&self, now: DateTime<Utc>) -> InviteStatus {
        if self.status == InviteStatus::Pending
            && let Some(expires_at) = &self.expires_at
            && let Some(expires_at) = parse_rfc3339(expires_at)
            && expires_at < now
        {
            return InviteStatus::Expired;
        }
        self.status.clone()
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CreateInvite {
    pub workspace_id: RecordId,
    pub email: String,
    pub token: String,
    pub invited_by: RecordId,
    pub status: InviteStatus,
    pub accepted_by: Option<RecordId>,
    pub expires_at: Option<String>,
    pub created_at: String,
}
