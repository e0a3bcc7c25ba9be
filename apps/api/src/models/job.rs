use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;

/// A job posting as read from the `jobs` table. Read-only to the matcher.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i64,
    pub title: String,
    /// Requirement list as stored: a JSON array whose items are either bare
    /// strings or objects carrying a `name` field. Parsed leniently at
    /// scoring time; malformed items contribute no tokens.
    pub requirements: Option<Value>,
    /// Free-text label such as "senior", "mid" or "entry". Drives the
    /// experience-score target.
    pub experience_level: Option<String>,
}
