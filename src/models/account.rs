use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Account {
    pub id: RecordId,
    pub email: String, // ! unique & (len = 255)
    pub name: Option<String>,
    /// BCP-47-ish language tag the pipeline should transcribe in by default.
    pub preferred_language: Option<String>,
    /// Default summarization template applied when a capture names none.
    pub preferred_template: Option<RecordId>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateAccount {
    pub email: String,
    pub name: Option<String>,
    pub preferred_language: Option<String>,
    pub preferred_template: Option<RecordId>,
    pub created_at: String,
}

/// Password hashes live apart from the profile row, keyed by account.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AccountPassword {
    pub id: RecordId,
    pub account_id: RecordId,
    pub password_hash: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateAccountPassword {
    pub account_id: RecordId,
    pub password_hash: String,
}
