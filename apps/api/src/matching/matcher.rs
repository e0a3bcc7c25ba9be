//! On-demand candidate matching for one job posting.
//!
//! Each computation is independent and idempotent: load the job, load the
//! eligible pool, score every candidate (fetching CV text as an extra token
//! source), then filter, rank and truncate. No match state is cached or
//! persisted.

use std::collections::HashSet;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::debug;

use crate::cv_parser::CvTextSource;
use crate::errors::AppError;
use crate::matching::scoring::{
    candidate_years, compute_experience_score, compute_final_score, compute_psych_score,
    compute_skill_score, requirement_tokens, tokenize,
};
use crate::models::candidate::{Candidate, TestStatus};
use crate::models::job::Job;
use crate::repo::{CandidateRepository, JobRepository};

pub const DEFAULT_MATCH_LIMIT: usize = 50;

/// Upper bound on in-flight CV fetches per match computation, so one job
/// with a large pool cannot hammer the document host.
const MAX_CONCURRENT_SCORING: usize = 8;

/// Per-candidate sub-scores and composite, all clamped integers in [0, 100].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scores {
    pub skill_score: u32,
    pub exp_score: u32,
    pub psych_score: u32,
    pub r#final: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub candidate: Candidate,
    pub scores: Scores,
}

/// Ranked matches plus summary counts over the full (untruncated) result set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub matches: Vec<MatchResult>,
    pub total: usize,
    pub top_count: usize,
    pub good_count: usize,
}

pub struct Matcher {
    jobs: Arc<dyn JobRepository>,
    candidates: Arc<dyn CandidateRepository>,
    cv_text: Arc<dyn CvTextSource>,
}

impl Matcher {
    pub fn new(
        jobs: Arc<dyn JobRepository>,
        candidates: Arc<dyn CandidateRepository>,
        cv_text: Arc<dyn CvTextSource>,
    ) -> Self {
        Self {
            jobs,
            candidates,
            cv_text,
        }
    }

    /// Computes the ranked match list for one job.
    ///
    /// Candidates without a completed test assignment are skipped before any
    /// CV fetch. Scoring fans out with bounded concurrency but results come
    /// back in pool order, so candidates with equal final scores keep their
    /// original relative order through the stable sort.
    pub async fn compute_matches(
        &self,
        job_id: i64,
        limit: usize,
    ) -> Result<MatchSummary, AppError> {
        let job = self
            .jobs
            .find_job_by_id(job_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

        let pool = self.candidates.find_eligible_candidates().await?;
        debug!("Scoring {} candidates for job {job_id}", pool.len());

        let req_tokens = requirement_tokens(job.requirements.as_ref());

        let mut results: Vec<MatchResult> =
            stream::iter(pool.into_iter().filter(has_completed_test))
                .map(|candidate| self.score_candidate(&job, &req_tokens, candidate))
                .buffered(MAX_CONCURRENT_SCORING)
                .collect::<Vec<Option<MatchResult>>>()
                .await
                .into_iter()
                .flatten()
                .collect();

        // sort_by is stable: ties keep pool order
        results.sort_by(|a, b| b.scores.r#final.cmp(&a.scores.r#final));

        let total = results.len();
        let top_count = results.iter().filter(|r| r.scores.r#final >= 90).count();
        let good_count = results.iter().filter(|r| r.scores.r#final >= 80).count();
        results.truncate(limit);

        Ok(MatchSummary {
            matches: results,
            total,
            top_count,
            good_count,
        })
    }

    /// Scores one candidate. Returns None for a zero composite, which would
    /// only add noise to the ranking.
    async fn score_candidate(
        &self,
        job: &Job,
        req_tokens: &HashSet<String>,
        candidate: Candidate,
    ) -> Option<MatchResult> {
        // CV text is an extra token source; extraction failures have already
        // degraded to "" inside the extractor.
        let cv_text = self.cv_text.extract_text(candidate.cv_url.as_deref()).await;

        let mut candidate_tokens: HashSet<String> =
            candidate.skills.iter().map(|s| s.to_lowercase()).collect();
        candidate_tokens.extend(tokenize(&cv_text));

        let skill_score = compute_skill_score(req_tokens, &candidate_tokens);
        let years = candidate_years(candidate.experience_years, candidate.experiences.len());
        let exp_score = compute_experience_score(job.experience_level.as_deref(), years);
        let psych_score = compute_psych_score(candidate.last_score, &candidate.candidate_tests);
        let final_score = compute_final_score(skill_score, exp_score, psych_score);

        if final_score == 0 {
            return None;
        }

        Some(MatchResult {
            candidate,
            scores: Scores {
                skill_score,
                exp_score,
                psych_score,
                r#final: final_score,
            },
        })
    }
}

fn has_completed_test(candidate: &Candidate) -> bool {
    candidate
        .candidate_tests
        .iter()
        .any(|t| t.status == TestStatus::Completed)
}
