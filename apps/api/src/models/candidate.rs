use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// The slice of the owning user exposed alongside a match.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// One work-history entry. The matcher only counts these as a rough fallback
/// year estimate when `experience_years` is unset, but the full record is
/// still serialized with the match result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub title: Option<String>,
    pub company: Option<String>,
    pub started_at: Option<NaiveDate>,
    pub ended_at: Option<NaiveDate>,
}

/// Lifecycle of a psychometric test assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    Assigned,
    InProgress,
    Completed,
}

impl TestStatus {
    /// Lenient parse of the stored status string. Unknown values map to
    /// `Assigned` so a malformed row can never make a candidate eligible.
    pub fn parse(s: &str) -> Self {
        match s {
            "completed" => TestStatus::Completed,
            "in_progress" => TestStatus::InProgress,
            _ => TestStatus::Assigned,
        }
    }
}

/// A psychometric test assignment for one candidate.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateTest {
    pub status: TestStatus,
    pub score: Option<f64>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A candidate profile with the associations the matcher scores against:
/// declared skills, work history, test assignments, and the owning user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: i64,
    pub user: Option<UserSummary>,
    pub experience_years: Option<i32>,
    pub test_taken: bool,
    /// Most recent psychometric score, 0-100, when recorded on the profile.
    pub last_score: Option<f64>,
    pub cv_url: Option<String>,
    pub skills: Vec<String>,
    pub experiences: Vec<Experience>,
    pub candidate_tests: Vec<CandidateTest>,
}
