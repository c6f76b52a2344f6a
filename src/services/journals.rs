use surrealdb::{RecordId, Surreal, engine::any::Any};
use tracing::info;

use crate::{
    authz::{self, AccessScope, EntityKind, Operation, RowFacts},
    consts::table::JOURNAL_TABLE,
    errors::{Error, Result},
    models::{
        account::Account,
        journal::{CreateJournal, Journal, JournalMeta, JournalStatus},
        template::Template,
    },
    pipeline::{AssetStore, CompletionCallback, PipelineGateway, PipelineOutcome},
    utils::{get_record_id::get_record_id_from_string, time::time_now},
};

#[derive(Debug, Clone)]
pub struct NewJournal {
    pub audio_reference: String,
    pub template_id: Option<RecordId>,
    pub language: Option<String>,
    pub meta: JournalMeta,
}

/// Creates the journal in `Processing` and notifies the pipeline. A failed
/// dispatch surfaces `PipelineDispatchFailed` to the caller but the row is
/// deliberately kept: losing the uploaded audio reference over a transient
/// network error would be worse than a stuck-looking row the user can
/// resummarize later.
pub async fn create_journal(
    sdb: &Surreal<Any>,
    pipeline: &PipelineGateway,
    actor: &RecordId,
    workspace_id: &RecordId,
    new: NewJournal,
) -> Result<Journal> {
    let scope = AccessScope::load(sdb, actor, workspace_id).await?;
    if !scope.is_member {
        return Err(Error::NotFound);
    }
    let row = RowFacts {
        created_by: Some(actor),
        ..Default::default()
    };
    authz::check(&scope, EntityKind::Journal, Operation::Create, &row)?;

    let account: Account = sdb
        .select(actor.clone())
        .await?
        .ok_or(Error::InternalServerError)?;
    let template_id = match new.template_id {
        Some(template_id) => Some(resolve_template(sdb, &scope, &template_id).await?),
        None => account.preferred_template,
    };
    let language = new.language.or(account.preferred_language);

    let now = time_now();
    let journal: Journal = sdb
        .create(JOURNAL_TABLE)
        .content(CreateJournal {
            workspace_id: workspace_id.clone(),
            created_by: actor.clone(),
            status: JournalStatus::Processing,
            audio_reference: new.audio_reference,
            template_id: template_id.clone(),
            language: language.clone(),
            transcript: None,
            summary: None,
            meta: new.meta,
            created_at: now.clone(),
            updated_at: now,
        })
        .await?
        .ok_or(Error::InternalServerError)?;

    pipeline
        .dispatch(&journal.id, template_id.as_ref(), language.as_deref())
        .await?;

    Ok(journal)
}

/// Applies a completion callback from the pipeline. At-least-once delivery
/// is the contract, so a journal already in a terminal state (or deleted)
/// makes this a no-op rather than an error. Transcript/summary fields are
/// only overwritten when the callback carries them, which is what keeps the
/// previous summary readable while a resummarize is in flight and fails.
pub async fn complete_processing(
    sdb: &Surreal<Any>,
    callback: CompletionCallback,
) -> Result<Option<Journal>> {
    let journal_id = get_record_id_from_string(callback.journal_id.clone())?;
    let status = match callback.outcome {
        PipelineOutcome::Success => JournalStatus::Processed,
        PipelineOutcome::Failure => JournalStatus::Error,
    };

    let updated: Vec<Journal> = sdb
        .query(
            "UPDATE $journal SET transcript = $transcript ?? transcript, summary = $summary ?? summary, status = $status, updated_at = $now WHERE status = $processing RETURN AFTER;",
        )
        .bind(("journal", journal_id))
        .bind(("transcript", callback.transcript))
        .bind(("summary", callback.summary))
        .bind(("status", status))
        .bind(("now", time_now()))
        .bind(("processing", JournalStatus::Processing))
        .await?
        .take(0)?;

    let journal = updated.into_iter().next();
    if journal.is_none() {
        info!(
            "completion for {} ignored: journal gone or already terminal",
            callback.journal_id
        );
    }
    Ok(journal)
}

/// The system's only retry mechanism: a human asks for a fresh run, possibly
/// with a different template or language. Prior transcript/summary stay in
/// place until the new completion lands.
pub async fn resummarize(
    sdb: &Surreal<Any>,
    pipeline: &PipelineGateway,
    actor: &RecordId,
    journal_id: &RecordId,
    template_id: Option<RecordId>,
    language: Option<String>,
) -> Result<Journal> {
    let journal: Journal = sdb
        .select(journal_id.clone())
        .await?
        .ok_or(Error::NotFound)?;

    let scope = AccessScope::load(sdb, actor, &journal.workspace_id).await?;
    if !scope.is_member {
        return Err(Error::NotFound);
    }
    let row = RowFacts {
        created_by: Some(&journal.created_by),
        ..Default::default()
    };
    authz::check(&scope, EntityKind::Journal, Operation::Update, &row)?;

    let template_id = match template_id {
        Some(template_id) => Some(resolve_template(sdb, &scope, &template_id).await?),
        None => journal.template_id,
    };
    let language = language.or(journal.language);

    let updated: Vec<Journal> = sdb
        .query(
            "UPDATE $journal SET status = $processing, template_id = $template_id, language = $language, updated_at = $now RETURN AFTER;",
        )
        .bind(("journal", journal_id.clone()))
        .bind(("processing", JournalStatus::Processing))
        .bind(("template_id", template_id.clone()))
        .bind(("language", language.clone()))
        .bind(("now", time_now()))
        .await?
        .take(0)?;
    let journal = updated.into_iter().next().ok_or(Error::NotFound)?;

    pipeline
        .dispatch(&journal.id, template_id.as_ref(), language.as_deref())
        .await?;

    Ok(journal)
}

/// Deletes the row, then asks the asset store to drop the audio from a
/// spawned task. The entity store is the source of truth; asset cleanup is
/// best-effort and never blocks or fails the delete.
pub async fn delete_journal(
    sdb: &Surreal<Any>,
    assets: &AssetStore,
    actor: &RecordId,
    journal_id: &RecordId,
) -> Result<()> {
    let journal: Journal = sdb
        .select(journal_id.clone())
        .await?
        .ok_or(Error::NotFound)?;

    let scope = AccessScope::load(sdb, actor, &journal.workspace_id).await?;
    if !scope.is_member {
        return Err(Error::NotFound);
    }
    let row = RowFacts {
        created_by: Some(&journal.created_by),
        ..Default::default()
    };
    authz::check(&scope, EntityKind::Journal, Operation::Delete, &row)?;

    let _: Option<Journal> = sdb.delete(journal_id.clone()).await?;

    let assets = assets.clone();
    let reference = journal.audio_reference;
    tokio::spawn(async move {
        assets.delete(&reference).await;
    });

    Ok(())
}

pub async fn get_journal(
    sdb: &Surreal<Any>,
    actor: &RecordId,
    journal_id: &RecordId,
) -> Result<Journal> {
    let journal: Journal = sdb
        .select(journal_id.clone())
        .await?
        .ok_or(Error::NotFound)?;

    let scope = AccessScope::load(sdb, actor, &journal.workspace_id).await?;
    if !scope.is_member {
        return Err(Error::NotFound);
    }
    Ok(journal)
}

pub async fn list_journals(
    sdb: &Surreal<Any>,
    actor: &RecordId,
    workspace_id: &RecordId,
) -> Result<Vec<Journal>> {
    let scope = AccessScope::load(sdb, actor, workspace_id).await?;
    if !scope.is_member {
        return Err(Error::NotFound);
    }

    let journals: Vec<Journal> = sdb
        .query(
            "SELECT * FROM type::table($table) WHERE workspace_id = $workspace_id ORDER BY created_at DESC;",
        )
        .bind(("table", JOURNAL_TABLE))
        .bind(("workspace_id", workspace_id.clone()))
        .await?
        .take(0)?;
    Ok(journals)
}

/// A template referenced at dispatch time must exist and be visible in the
/// journal's workspace: Std anywhere, Custom only in its own workspace.
async fn resolve_template(
    sdb: &Surreal<Any>,
    scope: &AccessScope,
    template_id: &RecordId,
) -> Result<RecordId> {
    let template: Template = sdb
        .select(template_id.clone())
        .await?
        .ok_or(Error::NotFound)?;
    if let Some(workspace_id) = &template.workspace_id
        && workspace_id != &scope.workspace_id
    {
        return Err(Error::NotFound);
    }
    Ok(template.id)
}
