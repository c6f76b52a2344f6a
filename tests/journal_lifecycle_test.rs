use std::sync::atomic::Ordering;

use echolog::{
    errors::Error,
    models::journal::{JournalMeta, JournalStatus},
    pipeline::{CompletionCallback, PipelineOutcome},
    services::{invites, journals},
};

mod common;
use common::{dead_asset_store, dead_pipeline, signup, spawn_pipeline_stub, test_db, workspace_of};

fn capture(reference: &str) -> journals::NewJournal {
    journals::NewJournal {
        audio_reference: reference.to_string(),
        template_id: None,
        language: Some("en".to_string()),
        meta: JournalMeta {
            duration_secs: Some(90.0),
            source: Some("mic".to_string()),
        },
    }
}

#[tokio::test]
async fn failed_dispatch_keeps_the_row() {
    let sdb = test_db().await;
    let a = signup(&sdb, "a@example.com", "A").await;
    let ws = workspace_of(&a);

    let err = journals::create_journal(&sdb, &dead_pipeline(), &a.id, &ws, capture("captures/1.ogg"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::PipelineDispatchFailed(_)));

    // No rollback: the audio reference survives in a Processing row the user
    // can see and retry.
    let rows = journals::list_journals(&sdb, &a.id, &ws).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, JournalStatus::Processing);
    assert_eq!(rows[0].audio_reference, "captures/1.ogg");

    // Resummarize is the retry path once the pipeline is back.
    let (pipeline, hits) = spawn_pipeline_stub().await;
    let journal = journals::resummarize(&sdb, &pipeline, &a.id, &rows[0].id, None, None)
        .await
        .unwrap();
    assert_eq!(journal.status, JournalStatus::Processing);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn completion_and_duplicate_callbacks() {
    let sdb = test_db().await;
    let a = signup(&sdb, "a@example.com", "A").await;
    let ws = workspace_of(&a);
    let (pipeline, _) = spawn_pipeline_stub().await;

    let journal = journals::create_journal(&sdb, &pipeline, &a.id, &ws, capture("captures/2.ogg"))
        .await
        .unwrap();
    assert_eq!(journal.status, JournalStatus::Processing);

    let done = journals::complete_processing(
        &sdb,
        CompletionCallback {
            journal_id: journal.id.to_string(),
            transcript: Some("today I planted tomatoes".to_string()),
            summary: Some("Gardening day.".to_string()),
            outcome: PipelineOutcome::Success,
        },
    )
    .await
    .unwrap()
    .expect("first completion applies");
    assert_eq!(done.status, JournalStatus::Processed);
    assert_eq!(done.transcript.as_deref(), Some("today I planted tomatoes"));

    // At-least-once delivery: the duplicate is a no-op, not an error.
    let replay = journals::complete_processing(
        &sdb,
        CompletionCallback {
            journal_id: journal.id.to_string(),
            transcript: Some("today I planted tomatoes".to_string()),
            summary: Some("Gardening day.".to_string()),
            outcome: PipelineOutcome::Success,
        },
    )
    .await
    .unwrap();
    assert!(replay.is_none());

    let row = journals::get_journal(&sdb, &a.id, &journal.id).await.unwrap();
    assert_eq!(row.status, JournalStatus::Processed);
    assert_eq!(row.summary.as_deref(), Some("Gardening day."));
}

#[tokio::test]
async fn resummarize_keeps_prior_output_until_new_completion() {
    let sdb = test_db().await;
    let a = signup(&sdb, "a@example.com", "A").await;
    let ws = workspace_of(&a);
    let (pipeline, hits) = spawn_pipeline_stub().await;

    let journal = journals::create_journal(&sdb, &pipeline, &a.id, &ws, capture("captures/3.ogg"))
        .await
        .unwrap();
    journals::complete_processing(
        &sdb,
        CompletionCallback {
            journal_id: journal.id.to_string(),
            transcript: Some("first pass".to_string()),
            summary: Some("First summary.".to_string()),
            outcome: PipelineOutcome::Success,
        },
    )
    .await
    .unwrap();

    let retried = journals::resummarize(&sdb, &pipeline, &a.id, &journal.id, None, None)
        .await
        .unwrap();
    assert_eq!(retried.status, JournalStatus::Processing);
    // The old output stays readable while the new run is in flight.
    assert_eq!(retried.transcript.as_deref(), Some("first pass"));
    assert_eq!(retried.summary.as_deref(), Some("First summary."));
    assert_eq!(hits.load(Ordering::SeqCst), 2);

    // A failure completion without fresh output flips status but keeps the
    // last good transcript/summary.
    let failed = journals::complete_processing(
        &sdb,
        CompletionCallback {
            journal_id: journal.id.to_string(),
            transcript: None,
            summary: None,
            outcome: PipelineOutcome::Failure,
        },
    )
    .await
    .unwrap()
    .expect("completion applies to the in-flight run");
    assert_eq!(failed.status, JournalStatus::Error);
    assert_eq!(failed.transcript.as_deref(), Some("first pass"));
    assert_eq!(failed.summary.as_deref(), Some("First summary."));
}

#[tokio::test]
async fn callback_for_unknown_journal_is_a_noop() {
    let sdb = test_db().await;
    let gone = journals::complete_processing(
        &sdb,
        CompletionCallback {
            journal_id: "journals:never_existed".to_string(),
            transcript: Some("ghost".to_string()),
            summary: None,
            outcome: PipelineOutcome::Success,
        },
    )
    .await
    .unwrap();
    assert!(gone.is_none());
}

#[tokio::test]
async fn delete_is_core_only_and_survives_asset_store_outage() {
    let sdb = test_db().await;
    let a = signup(&sdb, "a@example.com", "A").await;
    let ws = workspace_of(&a);
    let b = signup(&sdb, "b@example.com", "B").await;
    let (pipeline, _) = spawn_pipeline_stub().await;

    let (_, token) = invites::create_invite(&sdb, &a.id, &ws, "b@example.com".to_string(), None)
        .await
        .unwrap();
    invites::accept_invite(&sdb, &b.id, &token.unwrap())
        .await
        .unwrap();

    let journal = journals::create_journal(&sdb, &pipeline, &b.id, &ws, capture("captures/4.ogg"))
        .await
        .unwrap();

    // The author may update but not delete their own journal.
    let err = journals::delete_journal(&sdb, &dead_asset_store(), &b.id, &journal.id)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::PermissionDenied));

    // Core delete succeeds even though the asset store is down; cleanup is
    // best-effort and the row is the source of truth.
    journals::delete_journal(&sdb, &dead_asset_store(), &a.id, &journal.id)
        .await
        .unwrap();
    let err = journals::get_journal(&sdb, &a.id, &journal.id).await.unwrap_err();
    assert!(matches!(err, Error::NotFound));
}

#[tokio::test]
async fn journals_are_invisible_across_workspaces() {
    let sdb = test_db().await;
    let a = signup(&sdb, "a@example.com", "A").await;
    let ws = workspace_of(&a);
    let stranger = signup(&sdb, "x@example.com", "X").await;
    let (pipeline, _) = spawn_pipeline_stub().await;

    let journal = journals::create_journal(&sdb, &pipeline, &a.id, &ws, capture("captures/5.ogg"))
        .await
        .unwrap();

    // Indistinguishable from nonexistence for outsiders.
    let err = journals::get_journal(&sdb, &stranger.id, &journal.id)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound));
    let err = journals::list_journals(&sdb, &stranger.id, &ws).await.unwrap_err();
    assert!(matches!(err, Error::NotFound));

    // Members that didn't author the capture cannot create one for someone
    // else either; create binds created_by to the actor.
    let err = journals::create_journal(&sdb, &pipeline, &stranger.id, &ws, capture("captures/6.ogg"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound));
}
