use surrealdb::{Surreal, engine::any::Any};

use crate::{
    consts::table::{ACCOUNT_TABLE, AUTH_PASSWORD_TABLE, MEMBERSHIP_TABLE, WORKSPACE_TABLE},
    errors::{Error, Result},
    models::{
        account::{Account, AccountPassword, CreateAccount, CreateAccountPassword},
        workspace::{CreateMembership, Membership, Workspace},
    },
    utils::time::time_now,
};

/// Account bootstrap. Creates the account, its default workspace (record key
/// equal to the account's key, owner_id pointing back at the account) and
/// the owner's permanent membership row. Everything else in the system
/// assumes this invariant holds before any other operation runs.
pub async fn create_account_with_workspace(
    sdb: &Surreal<Any>,
    email: String,
    name: Option<String>,
    password_hash: String,
) -> Result<Account> {
    let existing: Vec<Account> = sdb
        .query("SELECT * FROM type::table($table) WHERE email = $email;")
        .bind(("table", ACCOUNT_TABLE))
        .bind(("email", email.clone()))
        .await?
        .take(0)?;

    if !existing.is_empty() {
        return Err(Error::EmailExist(email));
    }

    let now = time_now();
    let account_data = CreateAccount {
        email: email.clone(),
        name: name.clone(),
        preferred_language: None,
        preferred_template: None,
        created_at: now.clone(),
    };
    let account: Account = sdb
        .create(ACCOUNT_TABLE)
        .content(account_data)
        .await?
        .ok_or(Error::InternalServerError)?;

    let _: Option<AccountPassword> = sdb
        .create(AUTH_PASSWORD_TABLE)
        .content(CreateAccountPassword {
            account_id: account.id.clone(),
            password_hash,
        })
        .await?;

    let workspace_name = match &name {
        Some(name) => format!("{name}'s workspace"),
        None => "My workspace".to_string(),
    };

    // Default-workspace invariant: workspace key = account key.
    let workspace: Workspace = sdb
        .query(
            "CREATE type::thing($ws_table, record::id($owner)) CONTENT { owner_id: $owner, name: $name, created_at: $now };",
        )
        .bind(("ws_table", WORKSPACE_TABLE))
        .bind(("owner", account.id.clone()))
        .bind(("name", workspace_name))
        .bind(("now", now.clone()))
        .await?
        .take::<Vec<Workspace>>(0)?
        .into_iter()
        .next()
        .ok_or(Error::InternalServerError)?;

    let _: Option<Membership> = sdb
        .create(MEMBERSHIP_TABLE)
        .content(CreateMembership {
            workspace_id: workspace.id,
            account_id: account.id.clone(),
            created_at: now,
        })
        .await?;

    Ok(account)
}

pub async fn account_by_email(sdb: &Surreal<Any>, email: &str) -> Result<Option<Account>> {
    let found: Vec<Account> = sdb
        .query("SELECT * FROM type::table($table) WHERE email = $email;")
        .bind(("table", ACCOUNT_TABLE))
        .bind(("email", email.to_string()))
        .await?
        .take(0)?;
    Ok(found.into_iter().next())
}

pub async fn password_for_account(
    sdb: &Surreal<Any>,
    account: &Account,
) -> Result<Option<AccountPassword>> {
    let found: Vec<AccountPassword> = sdb
        .query("SELECT * FROM type::table($table) WHERE account_id = $account_id;")
        .bind(("table", AUTH_PASSWORD_TABLE))
        .bind(("account_id", account.id.clone()))
        .await?
        .take(0)?;
    Ok(found.into_iter().next())
}
