//! Per-experience relevance scoring.
//!
//! score = 0.45*tech_overlap + 0.25*responsibility_overlap + 0.10*industry
//!       + 0.10*seniority + 0.10*recency + override_bonus

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::generation::jd_parser::ExtractedSignals;
use crate::models::career::ExperienceRecord;

/// Flat bonus for experiences the caller names in their notes. Dwarfs every
/// realistic combination of the weighted terms.
pub const OVERRIDE_BONUS: f64 = 100.0;

/// Millisecond timestamps divided by this land around 0.17, keeping recency
/// a tie-breaker rather than a driver.
const RECENCY_DIVISOR: f64 = 1e13;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub technology: f64,
    pub responsibility: f64,
    pub industry: f64,
    pub seniority: f64,
    pub recency: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            technology: 0.45,
            responsibility: 0.25,
            industry: 0.10,
            seniority: 0.10,
            recency: 0.10,
        }
    }
}

/// Raw term values for one experience, before weighting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub technology_overlap: usize,
    pub responsibility_overlap: usize,
    pub industry_match: bool,
    pub seniority_match: bool,
    pub recency: f64,
    pub mentioned_in_notes: bool,
}

impl ScoreBreakdown {
    pub fn total(&self, weights: &ScoringWeights) -> f64 {
        let bonus = if self.mentioned_in_notes {
            OVERRIDE_BONUS
        } else {
            0.0
        };
        weights.technology * self.technology_overlap as f64
            + weights.responsibility * self.responsibility_overlap as f64
            + weights.industry * indicator(self.industry_match)
            + weights.seniority * indicator(self.seniority_match)
            + weights.recency * self.recency
            + bonus
    }
}

/// Computes every scoring term for `experience`.
///
/// `technology_universe` must already be lower-cased.
pub fn score_experience(
    experience: &ExperienceRecord,
    technology_universe: &HashSet<String>,
    signals: &ExtractedSignals,
    notes: &str,
    now: DateTime<Utc>,
) -> ScoreBreakdown {
    ScoreBreakdown {
        technology_overlap: technology_overlap(&experience.tech, technology_universe),
        responsibility_overlap: responsibility_overlap(
            experience,
            &signals.responsibility_keywords,
        ),
        industry_match: industry_matches(signals.industry.as_deref(), experience.industry.as_deref()),
        seniority_match: seniority_matches(
            signals.seniority.as_deref(),
            experience.seniority.as_deref(),
        ),
        recency: recency_proxy(experience.end_date, now),
        mentioned_in_notes: mentioned_in_notes(experience, notes),
    }
}

/// Counts tags present in the universe. Duplicated tags count twice.
fn technology_overlap(tags: &[String], universe: &HashSet<String>) -> usize {
    tags.iter()
        .filter(|tag| universe.contains(&tag.to_lowercase()))
        .count()
}

fn responsibility_overlap(experience: &ExperienceRecord, keywords: &[String]) -> usize {
    let responsibilities = experience.responsibilities.to_lowercase();
    let achievements = experience.achievements.to_lowercase();
    keywords
        .iter()
        .map(|k| k.to_lowercase())
        .filter(|k| responsibilities.contains(k.as_str()) || achievements.contains(k.as_str()))
        .count()
}

fn industry_matches(wanted: Option<&str>, actual: Option<&str>) -> bool {
    match (wanted, actual) {
        (Some(w), Some(a)) => w.to_lowercase() == a.to_lowercase(),
        _ => false,
    }
}

/// Exact, case-sensitive comparison.
fn seniority_matches(wanted: Option<&str>, actual: Option<&str>) -> bool {
    matches!((wanted, actual), (Some(w), Some(a)) if w == a)
}

/// End date (midnight UTC) or `now` for ongoing roles, as a unitless number.
pub fn recency_proxy(end_date: Option<NaiveDate>, now: DateTime<Utc>) -> f64 {
    let millis = end_date
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Utc.from_utc_datetime(&midnight).timestamp_millis())
        .unwrap_or_else(|| now.timestamp_millis());
    millis as f64 / RECENCY_DIVISOR
}

/// Verbatim (case-sensitive) mention of the display name or company.
fn mentioned_in_notes(experience: &ExperienceRecord, notes: &str) -> bool {
    if notes.is_empty() {
        return false;
    }
    [experience.name.as_str(), experience.company.as_str()]
        .iter()
        .any(|needle| !needle.is_empty() && notes.contains(needle))
}

fn indicator(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}
