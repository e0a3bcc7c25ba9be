//! Postgres-backed repositories.
//!
//! Candidate associations are loaded in bulk (`= ANY($1)`) and grouped in
//! memory rather than per candidate, so one match computation costs a fixed
//! number of queries regardless of pool size.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};

use crate::errors::AppError;
use crate::models::candidate::{Candidate, CandidateTest, Experience, TestStatus, UserSummary};
use crate::models::job::Job;
use crate::repo::{CandidateRepository, JobRepository};

pub struct PgJobRepository {
    pool: PgPool,
}

impl PgJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobRepository for PgJobRepository {
    async fn find_job_by_id(&self, id: i64) -> Result<Option<Job>, AppError> {
        let job = sqlx::query_as::<_, Job>(
            "SELECT id, title, requirements, experience_level FROM jobs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(job)
    }
}

pub struct PgCandidateRepository {
    pool: PgPool,
}

impl PgCandidateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct CandidateRow {
    id: i64,
    experience_years: Option<i32>,
    test_taken: bool,
    last_score: Option<f64>,
    cv_url: Option<String>,
}

#[derive(FromRow)]
struct SkillNameRow {
    candidate_id: i64,
    name: String,
}

#[derive(FromRow)]
struct ExperienceRow {
    candidate_id: i64,
    title: Option<String>,
    company: Option<String>,
    started_at: Option<NaiveDate>,
    ended_at: Option<NaiveDate>,
}

#[derive(FromRow)]
struct TestRow {
    candidate_id: i64,
    status: String,
    score: Option<f64>,
    completed_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(FromRow)]
struct UserRow {
    candidate_id: i64,
    id: i64,
    name: String,
    email: String,
}

#[async_trait]
impl CandidateRepository for PgCandidateRepository {
    async fn find_eligible_candidates(&self) -> Result<Vec<Candidate>, AppError> {
        let rows = sqlx::query_as::<_, CandidateRow>(
            "SELECT id, experience_years, test_taken, last_score, cv_url \
             FROM candidates WHERE test_taken = TRUE",
        )
        .fetch_all(&self.pool)
        .await?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();

        let skills = sqlx::query_as::<_, SkillNameRow>(
            "SELECT cs.candidate_id, s.name \
             FROM candidate_skills cs \
             JOIN skills s ON s.id = cs.skill_id \
             WHERE cs.candidate_id = ANY($1)",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let experiences = sqlx::query_as::<_, ExperienceRow>(
            "SELECT candidate_id, title, company, started_at, ended_at \
             FROM candidate_experiences WHERE candidate_id = ANY($1)",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let tests = sqlx::query_as::<_, TestRow>(
            "SELECT candidate_id, status, score, completed_at, updated_at \
             FROM candidate_tests WHERE candidate_id = ANY($1)",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let users = sqlx::query_as::<_, UserRow>(
            "SELECT c.id AS candidate_id, u.id, u.name, u.email \
             FROM users u \
             JOIN candidates c ON c.user_id = u.id \
             WHERE c.id = ANY($1)",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut skills_by_candidate: HashMap<i64, Vec<String>> = HashMap::new();
        for row in skills {
            skills_by_candidate
                .entry(row.candidate_id)
                .or_default()
                .push(row.name);
        }

        let mut experiences_by_candidate: HashMap<i64, Vec<Experience>> = HashMap::new();
        for row in experiences {
            experiences_by_candidate
                .entry(row.candidate_id)
                .or_default()
                .push(Experience {
                    title: row.title,
                    company: row.company,
                    started_at: row.started_at,
                    ended_at: row.ended_at,
                });
        }

        let mut tests_by_candidate: HashMap<i64, Vec<CandidateTest>> = HashMap::new();
        for row in tests {
            tests_by_candidate
                .entry(row.candidate_id)
                .or_default()
                .push(CandidateTest {
                    status: TestStatus::parse(&row.status),
                    score: row.score,
                    completed_at: row.completed_at,
                    updated_at: row.updated_at,
                });
        }

        let mut users_by_candidate: HashMap<i64, UserSummary> = HashMap::new();
        for row in users {
            users_by_candidate.insert(
                row.candidate_id,
                UserSummary {
                    id: row.id,
                    name: row.name,
                    email: row.email,
                },
            );
        }

        let candidates = rows
            .into_iter()
            .map(|row| Candidate {
                user: users_by_candidate.remove(&row.id),
                skills: skills_by_candidate.remove(&row.id).unwrap_or_default(),
                experiences: experiences_by_candidate.remove(&row.id).unwrap_or_default(),
                candidate_tests: tests_by_candidate.remove(&row.id).unwrap_or_default(),
                id: row.id,
                experience_years: row.experience_years,
                test_taken: row.test_taken,
                last_score: row.last_score,
                cv_url: row.cv_url,
            })
            .collect();

        Ok(candidates)
    }
}
