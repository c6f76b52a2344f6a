use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// Built-in, seeded at startup, readable by anyone, mutated by nobody.
    Std,
    Custom,
}

/// Summarization template the pipeline applies. Workspace-scoped for Custom,
/// global (no workspace) for Std.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Template {
    pub id: RecordId,
    pub workspace_id: Option<RecordId>, // ! None for Std
    pub kind: TemplateKind,
    pub name: String, // ! & (len = 100)
    pub prompt: String,
    pub created_by: Option<RecordId>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CreateTemplate {
    pub workspace_id: Option<RecordId>,
    pub kind: TemplateKind,
    pub name: String,
    pub prompt: String,
    pub created_by: Option<RecordId>,
    pub created_at: String,
}

/// Correction applied to raw transcripts before summarization; consumed by
/// the pipeline as parameters, never interpreted here.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct VocabularyEntry {
    pub id: RecordId,
    pub workspace_id: RecordId,
    pub pattern: String, // ! what the recognizer tends to mishear
    pub replacement: String,
    pub created_by: RecordId,
    pub created_at: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CreateVocabularyEntry {
    pub workspace_id: RecordId,
    pub pattern: String,
    pub replacement: String,
    pub created_by: RecordId,
    pub created_at: String,
}
