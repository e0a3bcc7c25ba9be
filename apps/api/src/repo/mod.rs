//! Repository seams between the matching engine and the relational store.
//!
//! The matcher only ever reads through these two traits, so tests can swap
//! in static pools and the Postgres wiring stays in one place.

pub mod pg;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::candidate::Candidate;
use crate::models::job::Job;

/// Read-only access to job postings.
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn find_job_by_id(&self, id: i64) -> Result<Option<Job>, AppError>;
}

/// Read-only access to the eligible candidate pool.
#[async_trait]
pub trait CandidateRepository: Send + Sync {
    /// Returns every candidate with `test_taken = true`, populated with
    /// skills, experiences, test assignments, and the owning user.
    /// Eligibility and scoring depend on the test and skill associations,
    /// so implementations must not drop them.
    async fn find_eligible_candidates(&self) -> Result<Vec<Candidate>, AppError>;
}
