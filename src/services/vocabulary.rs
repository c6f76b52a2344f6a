use surrealdb::{RecordId, Surreal, engine::any::Any};

use crate::{
    authz::{self, AccessScope, EntityKind, Operation, RowFacts},
    consts::table::VOCABULARY_TABLE,
    errors::{Error, Result},
    models::template::{CreateVocabularyEntry, VocabularyEntry},
    utils::time::time_now,
};

pub async fn list_entries(
    sdb: &Surreal<Any>,
    actor: &RecordId,
    workspace_id: &RecordId,
) -> Result<Vec<VocabularyEntry>> {
    let scope = AccessScope::load(sdb, actor, workspace_id).await?;
    authz::check(&scope, EntityKind::Vocabulary, Operation::Read, &RowFacts::default())
        .map_err(|_| Error::NotFound)?;

    let entries: Vec<VocabularyEntry> = sdb
        .query("SELECT * FROM type::table($table) WHERE workspace_id = $workspace_id;")
        .bind(("table", VOCABULARY_TABLE))
        .bind(("workspace_id", workspace_id.clone()))
        .await?
        .take(0)?;
    Ok(entries)
}

pub async fn create_entry(
    sdb: &Surreal<Any>,
    actor: &RecordId,
    workspace_id: &RecordId,
    pattern: String,
    replacement: String,
) -> Result<VocabularyEntry> {
    let scope = AccessScope::load(sdb, actor, workspace_id).await?;
    if !scope.is_member {
        return Err(Error::NotFound);
    }
    authz::check(&scope, EntityKind::Vocabulary, Operation::Create, &RowFacts::default())?;

    sdb.create(VOCABULARY_TABLE)
        .content(CreateVocabularyEntry {
            workspace_id: workspace_id.clone(),
            pattern,
            replacement,
            created_by: actor.clone(),
            created_at: time_now(),
        })
        .await?
        .ok_or(Error::InternalServerError)
}

/// Default policy: corrections are shared state, so reshaping or removing
/// them stays with the core member.
pub async fn delete_entry(
    sdb: &Surreal<Any>,
    actor: &RecordId,
    entry_id: &RecordId,
) -> Result<()> {
    let entry: VocabularyEntry = sdb
        .select(entry_id.clone())
        .await?
        .ok_or(Error::NotFound)?;

    let scope = AccessScope::load(sdb, actor, &entry.workspace_id).await?;
    if !scope.is_member {
        return Err(Error::NotFound);
    }
    authz::check(&scope, EntityKind::Vocabulary, Operation::Delete, &RowFacts::default())?;

    let _: Option<VocabularyEntry> = sdb.delete(entry_id.clone()).await?;
    Ok(())
}

pub async fn update_entry(
    sdb: &Surreal<Any>,
    actor: &RecordId,
    entry_id: &RecordId,
    pattern: Option<String>,
    replacement: Option<String>,
) -> Result<VocabularyEntry> {
    let entry: VocabularyEntry = sdb
        .select(entry_id.clone())
        .await?
        .ok_or(Error::NotFound)?;

    let scope = AccessScope::load(sdb, actor, &entry.workspace_id).await?;
    if !scope.is_member {
        return Err(Error::NotFound);
    }
    authz::check(&scope, EntityKind::Vocabulary, Operation::Update, &RowFacts::default())?;

    let updated: Vec<VocabularyEntry> = sdb
        .query(
            "UPDATE $entry SET pattern = $pattern ?? pattern, replacement = $replacement ?? replacement RETURN AFTER;",
        )
        .bind(("entry", entry_id.clone()))
        .bind(("pattern", pattern))
        .bind(("replacement", replacement))
        .await?
        .take(0)?;
    updated.into_iter().next().ok_or(Error::NotFound)
}
