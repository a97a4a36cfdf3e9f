//! The generated CV payload, assembled section by section from LLM output.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Output language requested by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Es,
    #[default]
    En,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Es => f.write_str("es"),
            Language::En => f.write_str("en"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceBlock {
    pub company: String,
    pub role: String,
    /// "MMM YYYY – Present", "MMM YYYY – MMM YYYY" or empty when dates are unknown.
    #[serde(default)]
    pub period: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EduEntry {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
}

/// Skills under one category label, in the order the model grouped them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGroup {
    pub category: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    pub url: String,
}

/// Everything the document assembler needs to render a tailored CV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvPayload {
    pub profile: String,
    pub experiences: Vec<ExperienceBlock>,
    pub skills_by_category: Vec<SkillGroup>,
    pub education: Vec<EduEntry>,
    pub certs: Vec<CertEntry>,
    pub why_me: String,
    #[serde(default)]
    pub links: Vec<Link>,
}
