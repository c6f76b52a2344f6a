pub mod table {
    pub const ACCOUNT_TABLE: &str = "accounts";
    pub const AUTH_PASSWORD_TABLE: &str = "auth_passwords";
    pub const WORKSPACE_TABLE: &str = "workspaces";
    pub const MEMBERSHIP_TABLE: &str = "memberships";
    pub const INVITE_TABLE: &str = "invites";
    pub const JOURNAL_TABLE: &str = "journals";
    pub const TEMPLATE_TABLE: &str = "templates";
    pub const VOCABULARY_TABLE: &str = "vocabulary_entries";
}

pub mod invites {
    /// Default invite validity window, matching the three-day window the
    /// invite emails quote.
    pub const DEFAULT_TTL_HOURS: i64 = 72;
}

pub mod progress {
    /// Floor for the expected processing time, seconds.
    pub const MIN_EXPECTED_SECS: f64 = 20.0;
    /// Seconds of audio the pipeline chews through per second of wall clock.
    pub const PROCESSING_RATE: f64 = 6.0;
    pub const MIN_DISPLAY: f64 = 0.02;
    pub const MAX_DISPLAY: f64 = 0.95;
}
