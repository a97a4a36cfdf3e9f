//! Content Selector: ranks career records against JD signals and free-text notes.
//!
//! No I/O and no LLM calls. The only impure input is the clock, used for the
//! recency term of ongoing roles; `select_content_at` takes it explicitly.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::generation::jd_parser::ExtractedSignals;
use crate::generation::scoring::{score_experience, ScoringWeights};
use crate::models::career::{EducationRecord, ExperienceRecord, SkillRecord};

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// An experience with its computed relevance score. Flattened on the wire so
/// prompts see the record fields next to the score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredExperience {
    #[serde(flatten)]
    pub record: ExperienceRecord,
    pub score: f64,
}

/// Result of content selection. The only input to section generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
    pub experiences: Vec<ScoredExperience>,
    pub skills: Vec<SkillRecord>,
    /// Education entries first, then certifications.
    pub education: Vec<EducationRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EducationKind {
    Education,
    Certification,
}

// ────────────────────────────────────────────────────────────────────────────
// Selection algorithm
// ────────────────────────────────────────────────────────────────────────────

pub const EXPERIENCE_LIMIT: usize = 4;
pub const SKILL_LIMIT: usize = 15;
pub const EDUCATION_LIMIT: usize = 2;
pub const CERTIFICATION_LIMIT: usize = 4;

/// Selects experiences, skills and education for one CV, using the current time.
pub fn select_content(
    experiences: &[ExperienceRecord],
    skills: &[SkillRecord],
    education: &[EducationRecord],
    signals: &ExtractedSignals,
    notes: &str,
) -> SelectionResult {
    select_content_at(experiences, skills, education, signals, notes, Utc::now())
}

/// Algorithm:
/// 1. Build the technology universe from signals + skills mentioned in notes
/// 2. Score every experience (weighted terms + notes override bonus)
/// 3. Stable sort descending, keep the top `EXPERIENCE_LIMIT`
/// 4. Keep skills used by the kept experiences, up to `SKILL_LIMIT`
/// 5. Split education into degrees (newest first) and certifications
pub fn select_content_at(
    experiences: &[ExperienceRecord],
    skills: &[SkillRecord],
    education: &[EducationRecord],
    signals: &ExtractedSignals,
    notes: &str,
    now: DateTime<Utc>,
) -> SelectionResult {
    let weights = ScoringWeights::default();
    let universe: HashSet<String> = technology_universe(skills, signals, notes)
        .iter()
        .map(|tech| tech.to_lowercase())
        .collect();

    let mut ranked: Vec<ScoredExperience> = experiences
        .iter()
        .map(|record| {
            let breakdown = score_experience(record, &universe, signals, notes, now);
            let score = breakdown.total(&weights);
            debug!(experience = %record.name, score, ?breakdown, "Scored experience");
            ScoredExperience {
                record: record.clone(),
                score,
            }
        })
        .collect();

    // sort_by is stable: equal scores keep their input order
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    ranked.truncate(EXPERIENCE_LIMIT);

    let selected_skills = select_skills(&ranked, skills);
    let selected_education = select_education(education);

    SelectionResult {
        experiences: ranked,
        skills: selected_skills,
        education: selected_education,
    }
}

/// Signal technologies plus every skill whose name or synonym appears in the
/// notes (case-insensitive substring). Deduplicated, first occurrence wins.
pub fn technology_universe(
    skills: &[SkillRecord],
    signals: &ExtractedSignals,
    notes: &str,
) -> Vec<String> {
    let notes_lower = notes.to_lowercase();

    let from_notes = skills
        .iter()
        .filter(|skill| {
            std::iter::once(&skill.name)
                .chain(skill.synonyms.iter())
                .any(|key| !key.is_empty() && notes_lower.contains(&key.to_lowercase()))
        })
        .map(|skill| skill.name.clone());

    let mut seen = HashSet::new();
    signals
        .technologies
        .iter()
        .cloned()
        .chain(from_notes)
        .filter(|tech| seen.insert(tech.to_lowercase()))
        .collect()
}

fn select_skills(selected: &[ScoredExperience], skills: &[SkillRecord]) -> Vec<SkillRecord> {
    let used: HashSet<String> = selected
        .iter()
        .flat_map(|exp| exp.record.tech.iter())
        .map(|tech| tech.to_lowercase())
        .collect();

    skills
        .iter()
        .filter(|skill| used.contains(&skill.name.to_lowercase()))
        .take(SKILL_LIMIT)
        .cloned()
        .collect()
}

fn select_education(records: &[EducationRecord]) -> Vec<EducationRecord> {
    let mut degrees: Vec<&EducationRecord> = Vec::new();
    let mut certifications: Vec<&EducationRecord> = Vec::new();

    for record in records {
        match classify_education(&record.kind) {
            Some(EducationKind::Education) => degrees.push(record),
            Some(EducationKind::Certification) => certifications.push(record),
            None => {}
        }
    }

    // Lexicographic on purpose: years are expected as 4-digit strings.
    degrees.sort_by(|a, b| {
        b.year
            .as_deref()
            .unwrap_or("")
            .cmp(a.year.as_deref().unwrap_or(""))
    });

    debug!(
        "Education selection: {} education, {} certifications of {} records",
        degrees.len().min(EDUCATION_LIMIT),
        certifications.len().min(CERTIFICATION_LIMIT),
        records.len()
    );

    degrees
        .into_iter()
        .take(EDUCATION_LIMIT)
        .chain(certifications.into_iter().take(CERTIFICATION_LIMIT))
        .cloned()
        .collect()
}

/// Classifies a free-text education type. The education family is checked
/// first, so a record never lands in both buckets.
pub fn classify_education(kind: &str) -> Option<EducationKind> {
    let kind = kind.to_lowercase();
    if kind.contains("education") || kind.contains("educaci") || kind == "degree" {
        Some(EducationKind::Education)
    } else if kind.contains("cert") || kind == "course" {
        // "certificate" is covered by "cert"
        Some(EducationKind::Certification)
    } else {
        None
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn frozen_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn make_experience(name: &str, company: &str, tech: &[&str], end: Option<&str>) -> ExperienceRecord {
        ExperienceRecord {
            id: format!("id-{name}"),
            name: name.to_string(),
            company: company.to_string(),
            role: "Engineer".to_string(),
            end_date: end.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap()),
            tech: tech.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    fn make_skill(name: &str, synonyms: &[&str]) -> SkillRecord {
        SkillRecord {
            name: name.to_string(),
            category: None,
            synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn make_education(name: &str, kind: &str, year: &str) -> EducationRecord {
        EducationRecord {
            name: name.to_string(),
            kind: kind.to_string(),
            org: None,
            year: Some(year.to_string()),
            details: None,
        }
    }

    fn names(result: &SelectionResult) -> Vec<&str> {
        result
            .experiences
            .iter()
            .map(|e| e.record.name.as_str())
            .collect()
    }

    #[test]
    fn test_override_bonus_beats_recency() {
        let experiences = vec![
            make_experience("A", "Acme", &["React Native"], Some("2024-01-01")),
            make_experience("B", "Globex", &["Kubernetes"], None),
        ];
        let signals = ExtractedSignals {
            responsibility_keywords: vec!["payments".to_string()],
            ..Default::default()
        };
        let result = select_content_at(
            &experiences,
            &[],
            &[],
            &signals,
            "I want to highlight Acme",
            frozen_now(),
        );

        assert_eq!(names(&result), vec!["A", "B"]);
        assert!(result.experiences[0].score > 100.0);
        assert!(result.experiences[1].score < 1.0);
    }

    #[test]
    fn test_ongoing_role_outranks_closed_role_without_bonus() {
        let experiences = vec![
            make_experience("Old", "Initech", &[], Some("2019-03-01")),
            make_experience("Current", "Globex", &[], None),
        ];
        let result = select_content_at(
            &experiences,
            &[],
            &[],
            &ExtractedSignals::default(),
            "",
            frozen_now(),
        );
        assert_eq!(names(&result), vec!["Current", "Old"]);
    }

    #[test]
    fn test_synonym_in_notes_enters_technology_universe() {
        let skills = vec![make_skill("GraphQL", &["graphql api"])];
        let universe = technology_universe(
            &skills,
            &ExtractedSignals::default(),
            "looking for graphql api experience",
        );
        assert_eq!(universe, vec!["GraphQL"]);
    }

    #[test]
    fn test_universe_merges_signal_technologies_without_duplicates() {
        let skills = vec![make_skill("Docker", &[]), make_skill("AWS", &["amazon web services"])];
        let signals = ExtractedSignals {
            technologies: vec!["docker".to_string()],
            ..Default::default()
        };
        let universe = technology_universe(&skills, &signals, "Docker on Amazon Web Services");
        assert_eq!(universe, vec!["docker", "AWS"]);
    }

    #[test]
    fn test_blank_synonym_never_matches() {
        let skills = vec![make_skill("Rust", &[""])];
        let universe = technology_universe(&skills, &ExtractedSignals::default(), "anything");
        assert!(universe.is_empty());
    }

    #[test]
    fn test_technology_overlap_ranks_matching_experience_first() {
        let experiences = vec![
            make_experience("Web", "Initech", &["Angular"], Some("2023-01-01")),
            make_experience("Api", "Globex", &["GraphQL", "Node"], Some("2023-01-01")),
        ];
        let skills = vec![make_skill("GraphQL", &[]), make_skill("Node", &["node.js"])];
        let result = select_content_at(
            &experiences,
            &skills,
            &[],
            &ExtractedSignals::default(),
            "Strong on graphql and Node.js",
            frozen_now(),
        );
        assert_eq!(names(&result), vec!["Api", "Web"]);
        let expected = 0.45 * 2.0 + 0.10 * (1_672_531_200_000.0 / 1e13);
        assert!((result.experiences[0].score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let experiences: Vec<_> = ["first", "second", "third"]
            .iter()
            .map(|n| make_experience(n, "Same Co", &[], Some("2022-05-01")))
            .collect();
        let result = select_content_at(
            &experiences,
            &[],
            &[],
            &ExtractedSignals::default(),
            "",
            frozen_now(),
        );
        assert_eq!(names(&result), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_caps_hold_for_large_inputs() {
        let experiences: Vec<_> = (0..10)
            .map(|i| make_experience(&format!("exp{i}"), "Co", &["T"], None))
            .collect();
        let skills: Vec<_> = (0..30).map(|_| make_skill("T", &[])).collect();
        let education: Vec<_> = (0..10)
            .flat_map(|i| {
                vec![
                    make_education(&format!("deg{i}"), "Degree", "2010"),
                    make_education(&format!("cert{i}"), "Certification", "2011"),
                ]
            })
            .collect();
        let result = select_content_at(
            &experiences,
            &skills,
            &education,
            &ExtractedSignals::default(),
            "",
            frozen_now(),
        );
        assert_eq!(result.experiences.len(), EXPERIENCE_LIMIT);
        assert_eq!(result.skills.len(), SKILL_LIMIT);
        assert_eq!(result.education.len(), EDUCATION_LIMIT + CERTIFICATION_LIMIT);
    }

    #[test]
    fn test_skills_limited_to_selected_experience_tech() {
        let experiences = vec![make_experience("A", "Acme", &["react native", "Redux"], None)];
        let skills = vec![
            make_skill("Redux", &[]),
            make_skill("Kotlin", &[]),
            make_skill("React Native", &[]),
        ];
        let result = select_content_at(
            &experiences,
            &skills,
            &[],
            &ExtractedSignals::default(),
            "",
            frozen_now(),
        );
        let selected: Vec<_> = result.skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(selected, vec!["Redux", "React Native"]);
    }

    #[test]
    fn test_education_sorted_then_certifications() {
        let education = vec![
            make_education("deg-2018", "Degree", "2018"),
            make_education("edu-2020", "Education", "2020"),
            make_education("cert-2022", "Certificate", "2022"),
        ];
        let result = select_content_at(
            &[],
            &[],
            &education,
            &ExtractedSignals::default(),
            "",
            frozen_now(),
        );
        let order: Vec<_> = result.education.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(order, vec!["edu-2020", "deg-2018", "cert-2022"]);
    }

    #[test]
    fn test_certifications_keep_input_order() {
        let education = vec![
            make_education("c1", "Course", "2015"),
            make_education("c2", "Certification", "2023"),
            make_education("c3", "cert", "2019"),
        ];
        let result = select_content_at(
            &[],
            &[],
            &education,
            &ExtractedSignals::default(),
            "",
            frozen_now(),
        );
        let order: Vec<_> = result.education.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(order, vec!["c1", "c2", "c3"]);
    }

    #[test]
    fn test_classification_is_exclusive() {
        assert_eq!(classify_education("Educación"), Some(EducationKind::Education));
        assert_eq!(classify_education("degree"), Some(EducationKind::Education));
        assert_eq!(classify_education("Education Certificate"), Some(EducationKind::Education));
        assert_eq!(classify_education("Certificado"), Some(EducationKind::Certification));
        assert_eq!(classify_education("COURSE"), Some(EducationKind::Certification));
        assert_eq!(classify_education("Online course"), None);
        assert_eq!(classify_education("Bootcamp"), None);
        assert_eq!(classify_education(""), None);
    }

    #[test]
    fn test_unclassified_records_are_dropped_not_duplicated() {
        let education = vec![
            make_education("both", "Education Certificate", "2020"),
            make_education("neither", "Award", "2021"),
        ];
        let result = select_content_at(
            &[],
            &[],
            &education,
            &ExtractedSignals::default(),
            "",
            frozen_now(),
        );
        let order: Vec<_> = result.education.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(order, vec!["both"]);
    }

    #[test]
    fn test_empty_experiences_yield_no_skills() {
        let skills = vec![make_skill("GraphQL", &[])];
        let result = select_content_at(
            &[],
            &skills,
            &[],
            &ExtractedSignals::default(),
            "GraphQL",
            frozen_now(),
        );
        assert!(result.experiences.is_empty());
        assert!(result.skills.is_empty());
    }

    #[test]
    fn test_selection_is_deterministic_with_frozen_clock() {
        let experiences = vec![
            make_experience("A", "Acme", &["Docker"], None),
            make_experience("B", "Globex", &["Docker"], Some("2021-01-01")),
        ];
        let skills = vec![make_skill("Docker", &[])];
        let education = vec![make_education("deg", "Degree", "2012")];
        let run = || {
            select_content_at(
                &experiences,
                &skills,
                &education,
                &ExtractedSignals::default(),
                "docker",
                frozen_now(),
            )
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let experiences = vec![make_experience("A", "Acme", &["Docker"], None)];
        let before = experiences.clone();
        let _ = select_content(&experiences, &[], &[], &ExtractedSignals::default(), "Acme");
        assert_eq!(experiences, before);
    }
}
