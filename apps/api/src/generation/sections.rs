//! Per-section prompt builders and output interpreters.
//!
//! Builders only serialize selected records into the templates; they never
//! see the full store contents. Interpreters run the raw model text through
//! `GenerationOutput` and coerce it into the payload types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::generation::content_selector::ScoredExperience;
use crate::generation::prompts::{
    EDUCATION_PROMPT_TEMPLATE, EXPERIENCE_PROMPT_TEMPLATE, PROFILE_PROMPT_TEMPLATE,
    SKILLS_PROMPT_TEMPLATE, WHY_ME_PROMPT_TEMPLATE,
};
use crate::llm_client::output::GenerationOutput;
use crate::llm_client::prompts::NEVER_INVENT_RULE;
use crate::models::career::{EducationRecord, Profile, SkillRecord};
use crate::models::cv::{CertEntry, EduEntry, ExperienceBlock, Language, SkillGroup};

const PROFILE_KEYS: &[&str] = &["summary", "profile"];
const WHY_ME_KEYS: &[&str] = &["fit_paragraph", "paragraph", "whyMe", "why"];

// ────────────────────────────────────────────────────────────────────────────
// Prompt builders
// ────────────────────────────────────────────────────────────────────────────

pub fn profile_prompt(
    job_description: &str,
    language: Language,
    profile: &Profile,
    experiences: &[ScoredExperience],
) -> Result<String, AppError> {
    let profile_json = to_json(profile)?;
    let experiences_json = to_json(experiences)?;
    Ok(render(
        PROFILE_PROMPT_TEMPLATE,
        language,
        &[
            ("job_description", job_description),
            ("profile_json", profile_json.as_str()),
            ("experiences_json", experiences_json.as_str()),
        ],
    ))
}

pub fn experience_prompt(
    job_description: &str,
    language: Language,
    experience: &ScoredExperience,
) -> Result<String, AppError> {
    let experience_json = to_json(experience)?;
    Ok(render(
        EXPERIENCE_PROMPT_TEMPLATE,
        language,
        &[
            ("job_description", job_description),
            ("experience_json", experience_json.as_str()),
        ],
    ))
}

pub fn skills_prompt(language: Language, skills: &[SkillRecord]) -> Result<String, AppError> {
    let skills_json = to_json(skills)?;
    Ok(render(
        SKILLS_PROMPT_TEMPLATE,
        language,
        &[("skills_json", skills_json.as_str())],
    ))
}

pub fn education_prompt(
    language: Language,
    education: &[EducationRecord],
) -> Result<String, AppError> {
    let education_json = to_json(education)?;
    Ok(render(
        EDUCATION_PROMPT_TEMPLATE,
        language,
        &[("education_json", education_json.as_str())],
    ))
}

pub fn why_me_prompt(
    job_description: &str,
    language: Language,
    experiences: &[ScoredExperience],
    skills: &[SkillRecord],
) -> Result<String, AppError> {
    let experiences_json = to_json(experiences)?;
    let skills_json = to_json(skills)?;
    Ok(render(
        WHY_ME_PROMPT_TEMPLATE,
        language,
        &[
            ("job_description", job_description),
            ("experiences_json", experiences_json.as_str()),
            ("skills_json", skills_json.as_str()),
        ],
    ))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::Internal(e.into()))
}

/// Single-pass placeholder substitution. Substituted text is never rescanned,
/// so a job description containing `{skills_json}` stays literal.
fn render(template: &str, language: Language, vars: &[(&str, &str)]) -> String {
    let language = language.to_string();
    let fixed = [("never_invent", NEVER_INVENT_RULE), ("language", language.as_str())];

    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    'scan: while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        for (key, value) in fixed.iter().chain(vars.iter()) {
            let substituted = tail
                .strip_prefix('{')
                .and_then(|t| t.strip_prefix(key))
                .and_then(|t| t.strip_prefix('}'));
            if let Some(after) = substituted {
                out.push_str(value);
                rest = after;
                continue 'scan;
            }
        }
        out.push('{');
        rest = &tail[1..];
    }
    out.push_str(rest);
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Output interpreters
// ────────────────────────────────────────────────────────────────────────────

pub fn interpret_profile(raw: &str) -> String {
    GenerationOutput::parse(raw)
        .into_text(PROFILE_KEYS)
        .trim()
        .to_string()
}

pub fn interpret_experience(raw: &str) -> Result<ExperienceBlock, AppError> {
    GenerationOutput::parse(raw)
        .into_json()
        .map_err(|e| AppError::Llm(format!("Experience block is not valid JSON: {e}")))
}

/// A JSON object of category → skill names, kept in the model's order.
pub fn interpret_skills(raw: &str) -> Result<Vec<SkillGroup>, AppError> {
    let map: Map<String, Value> = GenerationOutput::parse(raw)
        .into_json()
        .map_err(|e| AppError::Llm(format!("Skills section is not a JSON object: {e}")))?;

    Ok(map
        .into_iter()
        .map(|(category, value)| {
            let items = match value {
                Value::Array(items) => items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s),
                        Value::Null => None,
                        other => Some(other.to_string()),
                    })
                    .collect(),
                Value::String(single) => vec![single],
                _ => Vec::new(),
            };
            SkillGroup { category, items }
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct EducationSection {
    #[serde(default)]
    education: Option<Vec<EduEntry>>,
    #[serde(default)]
    certs: Option<Vec<CertEntry>>,
}

/// `{education, certs}`; either list may be missing or null.
pub fn interpret_education(raw: &str) -> Result<(Vec<EduEntry>, Vec<CertEntry>), AppError> {
    let section: EducationSection = GenerationOutput::parse(raw)
        .into_json()
        .map_err(|e| AppError::Llm(format!("Education section is not valid JSON: {e}")))?;
    Ok((
        section.education.unwrap_or_default(),
        section.certs.unwrap_or_default(),
    ))
}

pub fn interpret_why_me(raw: &str) -> String {
    GenerationOutput::parse(raw)
        .into_text(WHY_ME_KEYS)
        .trim()
        .to_string()
}
