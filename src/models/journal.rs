use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use crate::consts::progress;
use crate::utils::time::parse_rfc3339;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum JournalStatus {
    Processing,
    Processed,
    Error,
}

/// Opaque processing metadata. Only used for progress estimation, never for
/// correctness.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct JournalMeta {
    pub duration_secs: Option<f64>,
    pub source: Option<String>, // ! e.g `mic`, `upload`
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Journal {
    pub id: RecordId,
    pub workspace_id: RecordId,
    pub created_by: RecordId,

    pub status: JournalStatus,
    pub audio_reference: String, // ! asset-store key, uploaded out-of-band
    pub template_id: Option<RecordId>,
    pub language: Option<String>,
    pub transcript: Option<String>,
    pub summary: Option<String>,
    pub meta: JournalMeta,

    pub created_at: String,
    pub updated_at: String,
}

impl Journal {
    /// Advisory progress for display. Never drives a status change: a
    /// journal whose completion never arrives just sits at the display cap
    /// until someone resummarizes or deletes it.
    pub fn progress(&self, now: DateTime<Utc>) -> f64 {
        if self.status != JournalStatus::Processing {
            return 1.0;
        }
        let elapsed = parse_rfc3339(&self.updated_at)
            .map(|started| (now - started).num_milliseconds() as f64 / 1000.0)
            .unwrap_or(0.0);
        let expected = (self.meta.duration_secs.unwrap_or(0.0) / progress::PROCESSING_RATE)
            .max(progress::MIN_EXPECTED_SECS);
        (elapsed / expected).clamp(progress::MIN_DISPLAY, progress::MAX_DISPLAY)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CreateJournal {
    pub workspace_id: RecordId,
    pub created_by: RecordId,
    pub status: JournalStatus,
    pub audio_reference: String,
    pub template_id: Option<RecordId>,
    pub language: Option<String>,
    pub transcript: Option<String>,
    pub summary: Option<String>,
    pub meta: JournalMeta,
    pub created_at: String,
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn journal(status: JournalStatus, updated_at: String, duration_secs: Option<f64>) -> Journal {
        Journal {
            id: RecordId::from_table_key("journals", "j1"),
            workspace_id: RecordId::from_table_key("workspaces", "w1"),
            created_by: RecordId::from_table_key("accounts", "a1"),
            status,
            audio_reference: "captures/j1.ogg".to_string(),
            template_id: None,
            language: None,
            transcript: None,
            summary: None,
            meta: JournalMeta {
                duration_secs,
                source: None,
            },
            created_at: updated_at.clone(),
            updated_at,
        }
    }

    #[test]
    fn progress_is_clamped_to_display_range() {
        let now = Utc::now();
        let fresh = journal(
            JournalStatus::Processing,
            now.to_rfc3339(),
            Some(600.0),
        );
        assert_eq!(fresh.progress(now), progress::MIN_DISPLAY);

        let stale = journal(
            JournalStatus::Processing,
            (now - Duration::hours(2)).to_rfc3339(),
            Some(600.0),
        );
        assert_eq!(stale.progress(now), progress::MAX_DISPLAY);
    }

    #[test]
    fn progress_is_full_once_terminal() {
        let now = Utc::now();
        let done = journal(JournalStatus::Processed, now.to_rfc3339(), None);
        assert_eq!(done.progress(now), 1.0);
        let failed = journal(JournalStatus::Error, now.to_rfc3339(), None);
        assert_eq!(failed.progress(now), 1.0);
    }
}
