//! Canonical career records handed to the relevance selector.
//!
//! Every store backend normalizes its raw rows into these shapes; the
//! generation module never sees store-specific field names.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Candidate header data. Empty strings mean "not provided".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub full_name: String,
    pub title: String,
    pub location: String,
    pub email: String,
    pub linkedin: String,
    pub github: String,
    pub portfolio: String,
    pub summary: String,
}

/// One role or project in the candidate's history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceRecord {
    pub id: String,
    /// Display name of the role/project, e.g. "Acme — Payments Revamp".
    pub name: String,
    pub company: String,
    pub role: String,
    pub start_date: Option<NaiveDate>,
    /// `None` means the role is ongoing.
    pub end_date: Option<NaiveDate>,
    pub summary: String,
    pub responsibilities: String,
    pub achievements: String,
    /// Technology tags in the order the store lists them.
    pub tech: Vec<String>,
    pub industry: Option<String>,
    pub seniority: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillRecord {
    pub name: String,
    pub category: Option<String>,
    /// Alternative spellings, only used to match free-text notes.
    pub synonyms: Vec<String>,
}

/// A degree, course or certification. `kind` is free text ("Degree",
/// "Educación", "Certificate", ...) and is classified at selection time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub org: Option<String>,
    pub year: Option<String>,
    pub details: Option<String>,
}

/// Maps blank strings to `None`. Used at every normalization boundary.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
