use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Tenant boundary. The record key equals the owning account's key: every
/// account gets exactly one default workspace at signup.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Workspace {
    pub id: RecordId,
    pub owner_id: RecordId,
    pub name: String, // ! & (len = 255)
    pub created_at: String,
    pub updated_at: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Membership {
    pub id: RecordId,
    pub workspace_id: RecordId,
    pub account_id: RecordId,
    pub created_at: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateMembership {
    pub workspace_id: RecordId,
    pub account_id: RecordId,
    pub created_at: String,
}
