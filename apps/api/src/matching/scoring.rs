//! Pure scoring functions for the candidate matcher.
//!
//! Three independent sub-scores (skill overlap, experience fit, psychometric
//! fit) combine into one composite via fixed weights. Every score, sub or
//! final, is a clamped integer in [0, 100]. Location and language are
//! intentionally ignored.

use std::collections::HashSet;

use serde_json::Value;

use crate::models::candidate::{CandidateTest, TestStatus};

pub const WEIGHT_SKILL: f64 = 0.5;
pub const WEIGHT_EXPERIENCE: f64 = 0.25;
pub const WEIGHT_PSYCH: f64 = 0.25;

/// Clamps a raw score into the integer range [0, 100], rounding to nearest.
/// Non-finite input is 0.
pub fn clamp_score(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u32
}

/// Splits text into lower-cased tokens on any run of characters outside
/// `[a-z0-9+#.]`. `+`, `#` and `.` stay inside tokens so skill names like
/// "c++", "c#" and "node.js" survive intact.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| {
            !(c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '+' | '#' | '.'))
        })
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn requirement_name(item: &Value) -> Option<&str> {
    match item {
        Value::String(s) => Some(s),
        Value::Object(map) => map.get("name").and_then(Value::as_str),
        _ => None,
    }
}

/// Flattens a job's requirement list into a normalized token set. Items may
/// be bare strings or objects carrying a `name`; anything else is skipped.
pub fn requirement_tokens(requirements: Option<&Value>) -> HashSet<String> {
    let Some(Value::Array(items)) = requirements else {
        return HashSet::new();
    };
    items
        .iter()
        .filter_map(requirement_name)
        .flat_map(tokenize)
        .collect()
}

/// Coverage of the job's requirement tokens by the candidate's token set.
/// No requirement tokens means no signal, scored 0.
pub fn compute_skill_score(
    requirement_tokens: &HashSet<String>,
    candidate_tokens: &HashSet<String>,
) -> u32 {
    if requirement_tokens.is_empty() {
        return 0;
    }
    let matched = requirement_tokens
        .iter()
        .filter(|t| candidate_tokens.contains(*t))
        .count();
    clamp_score(matched as f64 / requirement_tokens.len() as f64 * 100.0)
}

/// Minimum years implied by a job's free-text experience level.
/// "entry"/"junior" and anything unrecognized mean no explicit requirement.
pub fn required_years_for_level(level: Option<&str>) -> u32 {
    let Some(level) = level else { return 0 };
    let v = level.to_lowercase();
    if v.contains("senior") || v.contains("lead") {
        5
    } else if v.contains("mid") {
        2
    } else {
        0
    }
}

/// Scores candidate years against the job's implied minimum.
pub fn compute_experience_score(job_level: Option<&str>, years: u32) -> u32 {
    let required = required_years_for_level(job_level);

    if required == 0 {
        // No explicit requirement, reward more experience but cap
        return clamp_score((years as f64 * 10.0).min(90.0));
    }

    if years == 0 {
        return 0;
    }

    if years < required {
        // Under-qualified: score up to 60
        let ratio = years as f64 / required as f64;
        return clamp_score(20.0 + ratio * 40.0);
    }

    if years == required {
        return 75;
    }

    // Over-qualified: up to 100
    let extra = (years - required) as f64;
    clamp_score(75.0 + (extra * 5.0).min(25.0))
}

/// Years of experience for one candidate. The declared `experience_years` is
/// preferred when positive; otherwise the number of work-history entries
/// stands in as a rough year count.
pub fn candidate_years(experience_years: Option<i32>, experience_entries: usize) -> u32 {
    match experience_years {
        Some(y) if y > 0 => y as u32,
        _ => experience_entries as u32,
    }
}

/// Prefers the profile's `last_score`; falls back to the score of the latest
/// completed test assignment (by completion time, then last update; rows
/// missing both sort earliest). No completed scored assignment means 0.
pub fn compute_psych_score(last_score: Option<f64>, tests: &[CandidateTest]) -> u32 {
    if let Some(score) = last_score {
        return clamp_score(score);
    }

    tests
        .iter()
        .filter(|t| t.status == TestStatus::Completed && t.score.is_some())
        .max_by_key(|t| t.completed_at.or(t.updated_at))
        .and_then(|t| t.score)
        .map(clamp_score)
        .unwrap_or(0)
}

/// Weighted composite of the three sub-scores.
pub fn compute_final_score(skill_score: u32, exp_score: u32, psych_score: u32) -> u32 {
    clamp_score(
        WEIGHT_SKILL * skill_score as f64
            + WEIGHT_EXPERIENCE * exp_score as f64
            + WEIGHT_PSYCH * psych_score as f64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn token_set(tokens: &[&str]) -> HashSet<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    fn test_row(
        status: TestStatus,
        score: Option<f64>,
        completed_at: Option<(i32, u32, u32)>,
        updated_at: Option<(i32, u32, u32)>,
    ) -> CandidateTest {
        let ts = |d: (i32, u32, u32)| Utc.with_ymd_and_hms(d.0, d.1, d.2, 0, 0, 0).unwrap();
        CandidateTest {
            status,
            score,
            completed_at: completed_at.map(ts),
            updated_at: updated_at.map(ts),
        }
    }

    #[test]
    fn clamp_score_bounds_and_rounds() {
        assert_eq!(clamp_score(-5.0), 0);
        assert_eq!(clamp_score(0.0), 0);
        assert_eq!(clamp_score(49.5), 50);
        assert_eq!(clamp_score(100.0), 100);
        assert_eq!(clamp_score(140.0), 100);
        assert_eq!(clamp_score(f64::NAN), 0);
        assert_eq!(clamp_score(f64::INFINITY), 0);
    }

    #[test]
    fn tokenize_splits_on_punctuation_runs() {
        assert_eq!(tokenize("Node.js / React!"), vec!["node.js", "react"]);
        assert_eq!(tokenize("C++, C# and .NET"), vec!["c++", "c#", "and", ".net"]);
        assert!(tokenize("  --  ").is_empty());
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn requirement_tokens_accepts_strings_and_named_objects() {
        let reqs = json!(["Node.js", {"name": "React"}, {"label": "ignored"}, 42, null]);
        let tokens = requirement_tokens(Some(&reqs));
        assert_eq!(tokens, token_set(&["node.js", "react"]));
    }

    #[test]
    fn requirement_tokens_of_missing_or_non_array_is_empty() {
        assert!(requirement_tokens(None).is_empty());
        assert!(requirement_tokens(Some(&json!("Rust"))).is_empty());
        assert!(requirement_tokens(Some(&json!({}))).is_empty());
    }

    #[test]
    fn skill_score_full_overlap_is_100() {
        let reqs = token_set(&["node.js", "react"]);
        assert_eq!(compute_skill_score(&reqs, &reqs.clone()), 100);
    }

    #[test]
    fn skill_score_disjoint_is_0() {
        let reqs = token_set(&["rust"]);
        let cand = token_set(&["python", "django"]);
        assert_eq!(compute_skill_score(&reqs, &cand), 0);
    }

    #[test]
    fn skill_score_partial_coverage_rounds() {
        let reqs = token_set(&["rust", "tokio", "axum"]);
        let cand = token_set(&["rust", "tokio"]);
        // 2/3 -> 66.67 -> 67
        assert_eq!(compute_skill_score(&reqs, &cand), 67);
    }

    #[test]
    fn skill_score_without_requirements_is_0() {
        let cand = token_set(&["rust"]);
        assert_eq!(compute_skill_score(&HashSet::new(), &cand), 0);
    }

    #[test]
    fn required_years_maps_level_labels() {
        assert_eq!(required_years_for_level(Some("Senior Engineer")), 5);
        assert_eq!(required_years_for_level(Some("Tech Lead")), 5);
        assert_eq!(required_years_for_level(Some("Mid-level")), 2);
        assert_eq!(required_years_for_level(Some("entry")), 0);
        assert_eq!(required_years_for_level(Some("junior")), 0);
        assert_eq!(required_years_for_level(Some("whatever")), 0);
        assert_eq!(required_years_for_level(None), 0);
    }

    #[test]
    fn experience_score_without_requirement_caps_at_90() {
        assert_eq!(compute_experience_score(None, 0), 0);
        assert_eq!(compute_experience_score(None, 4), 40);
        assert_eq!(compute_experience_score(Some("junior"), 12), 90);
    }

    #[test]
    fn experience_score_exact_target_is_75() {
        assert_eq!(compute_experience_score(Some("senior"), 5), 75);
        assert_eq!(compute_experience_score(Some("lead"), 5), 75);
        assert_eq!(compute_experience_score(Some("mid"), 2), 75);
    }

    #[test]
    fn experience_score_under_qualified_scales_between_20_and_60() {
        // 2/5 years -> 20 + 0.4 * 40 = 36
        assert_eq!(compute_experience_score(Some("senior"), 2), 36);
        assert_eq!(compute_experience_score(Some("senior"), 0), 0);
        // 1/2 years -> 20 + 0.5 * 40 = 40
        assert_eq!(compute_experience_score(Some("mid"), 1), 40);
    }

    #[test]
    fn experience_score_over_qualified_caps_at_100() {
        assert_eq!(compute_experience_score(Some("senior"), 6), 80);
        assert_eq!(compute_experience_score(Some("senior"), 10), 100);
        assert_eq!(compute_experience_score(Some("senior"), 30), 100);
    }

    #[test]
    fn candidate_years_prefers_positive_declared_value() {
        assert_eq!(candidate_years(Some(6), 2), 6);
        assert_eq!(candidate_years(Some(0), 3), 3);
        assert_eq!(candidate_years(None, 3), 3);
        assert_eq!(candidate_years(None, 0), 0);
    }

    #[test]
    fn psych_score_prefers_last_score_clamped() {
        assert_eq!(compute_psych_score(Some(80.0), &[]), 80);
        assert_eq!(compute_psych_score(Some(150.0), &[]), 100);
        assert_eq!(compute_psych_score(Some(-3.0), &[]), 0);
    }

    #[test]
    fn psych_score_uses_latest_completed_assignment() {
        let tests = vec![
            test_row(TestStatus::Completed, Some(60.0), Some((2026, 1, 10)), None),
            test_row(TestStatus::Completed, Some(85.0), Some((2026, 3, 1)), None),
            test_row(TestStatus::InProgress, Some(99.0), Some((2026, 4, 1)), None),
        ];
        assert_eq!(compute_psych_score(None, &tests), 85);
    }

    #[test]
    fn psych_score_falls_back_to_updated_at() {
        let tests = vec![
            test_row(TestStatus::Completed, Some(50.0), None, Some((2026, 1, 1))),
            test_row(TestStatus::Completed, Some(70.0), None, Some((2026, 2, 1))),
        ];
        assert_eq!(compute_psych_score(None, &tests), 70);
    }

    #[test]
    fn psych_score_ignores_unscored_or_incomplete_assignments() {
        let tests = vec![
            test_row(TestStatus::Completed, None, Some((2026, 5, 1)), None),
            test_row(TestStatus::Assigned, Some(95.0), None, None),
        ];
        assert_eq!(compute_psych_score(None, &tests), 0);
        assert_eq!(compute_psych_score(None, &[]), 0);
    }

    #[test]
    fn final_score_is_fixed_weighted_sum() {
        assert_eq!(compute_final_score(100, 80, 80), 90);
        assert_eq!(compute_final_score(50, 100, 100), 75);
        assert_eq!(compute_final_score(0, 0, 0), 0);
        assert_eq!(compute_final_score(100, 100, 100), 100);
        // 0.5*33 + 0.25*33 + 0.25*33 = 33 exactly after rounding
        assert_eq!(compute_final_score(33, 33, 33), 33);
    }
}
