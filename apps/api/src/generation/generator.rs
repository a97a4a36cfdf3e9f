//! CV Generation: orchestrates the full pipeline for one request.
//!
//! Flow: resolve job text → load career records → extract_signals →
//!       select_content → one LLM call per section → write document.
//!
//! A failed section aborts the whole request; nothing is written.

use futures::future::try_join_all;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::generation::content_selector::{select_content, SelectionResult};
use crate::generation::jd_parser::{extract_signals, ExtractedSignals};
use crate::generation::sections::{
    education_prompt, experience_prompt, interpret_education, interpret_experience,
    interpret_profile, interpret_skills, interpret_why_me, profile_prompt, skills_prompt,
    why_me_prompt,
};
use crate::llm_client::TextGenerator;
use crate::models::career::{EducationRecord, ExperienceRecord, Profile, SkillRecord};
use crate::models::cv::{CvPayload, Language};
use crate::scrape::JobPageFetcher;
use crate::store::{derive_skills_from_experiences, CareerStore};

/// Shorter job texts are rejected before any store or LLM call.
pub const MIN_JOB_DESCRIPTION_CHARS: usize = 30;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Request body for CV generation. `job_description` wins over `job_link`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateCvRequest {
    pub job_link: Option<String>,
    pub job_description: Option<String>,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateCvResponse {
    pub success: bool,
    pub document_url: String,
    pub payload: CvPayload,
}

/// Everything the store holds about the candidate, fetched once per request.
#[derive(Debug, Clone)]
pub struct CareerSnapshot {
    pub profile: Profile,
    pub experiences: Vec<ExperienceRecord>,
    pub skills: Vec<SkillRecord>,
    pub education: Vec<EducationRecord>,
}

/// Output of the deterministic half of the pipeline.
#[derive(Debug, Clone)]
pub struct PreparedRun {
    pub job_description: String,
    pub career: CareerSnapshot,
    pub signals: ExtractedSignals,
    pub selection: SelectionResult,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs the full generation pipeline and writes the document.
pub async fn generate_cv(
    store: &dyn CareerStore,
    llm: &dyn TextGenerator,
    fetcher: &JobPageFetcher,
    request: GenerateCvRequest,
) -> Result<GenerateCvResponse, AppError> {
    let run = prepare(store, fetcher, &request).await?;

    let payload = generate_sections(
        llm,
        &run.job_description,
        request.language,
        &run.career.profile,
        &run.selection,
    )
    .await?;

    let document_url = store.write_document(&run.career.profile, &payload).await?;
    info!(%document_url, "CV generated");

    Ok(GenerateCvResponse {
        success: true,
        document_url,
        payload,
    })
}

/// Steps 1-4: validate, resolve job text, load records, extract and select.
/// No LLM call is made here.
pub async fn prepare(
    store: &dyn CareerStore,
    fetcher: &JobPageFetcher,
    request: &GenerateCvRequest,
) -> Result<PreparedRun, AppError> {
    let job_description = resolve_job_description(fetcher, request).await?;

    let career = load_career(store).await?;

    let signals = extract_signals(&job_description);
    debug!(?signals, "Signals extracted");

    let selection = select_content(
        &career.experiences,
        &career.skills,
        &career.education,
        &signals,
        &request.notes,
    );
    info!(
        "Selected {} experiences, {} skills, {} education entries",
        selection.experiences.len(),
        selection.skills.len(),
        selection.education.len()
    );

    Ok(PreparedRun {
        job_description,
        career,
        signals,
        selection,
    })
}

/// Uses the pasted description if present, otherwise scrapes `job_link`.
/// Rejects texts shorter than `MIN_JOB_DESCRIPTION_CHARS`.
pub async fn resolve_job_description(
    fetcher: &JobPageFetcher,
    request: &GenerateCvRequest,
) -> Result<String, AppError> {
    let job_link = request.job_link.as_deref().filter(|l| !l.trim().is_empty());
    if let Some(link) = job_link {
        Url::parse(link).map_err(|e| {
            AppError::Validation(format!("job_link must be an absolute URL: {e}"))
        })?;
    }

    let job_description = match request.job_description.as_deref() {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => match job_link {
            Some(link) => fetcher.fetch_text(link).await?,
            None => String::new(),
        },
    };

    if job_description.chars().count() < MIN_JOB_DESCRIPTION_CHARS {
        return Err(AppError::Validation(format!(
            "job description must be at least {MIN_JOB_DESCRIPTION_CHARS} characters"
        )));
    }
    Ok(job_description)
}

/// Fetches all four record sets concurrently. Falls back to skills derived
/// from experience tech tags when the store has none.
pub async fn load_career(store: &dyn CareerStore) -> Result<CareerSnapshot, AppError> {
    let (profile, experiences, skills, education) = tokio::try_join!(
        store.fetch_profile(),
        store.fetch_experiences(),
        store.fetch_skills(),
        store.fetch_education(),
    )?;

    let skills = if skills.is_empty() {
        let derived = derive_skills_from_experiences(&experiences);
        info!("No skills in store, derived {} from experiences", derived.len());
        derived
    } else {
        skills
    };

    Ok(CareerSnapshot {
        profile,
        experiences,
        skills,
        education,
    })
}

/// One LLM call per section. Experience blocks run concurrently; the other
/// sections run one after another.
pub async fn generate_sections(
    llm: &dyn TextGenerator,
    job_description: &str,
    language: Language,
    profile: &Profile,
    selection: &SelectionResult,
) -> Result<CvPayload, AppError> {
    info!("Generating profile summary");
    let prompt = profile_prompt(job_description, language, profile, &selection.experiences)?;
    let profile_summary = interpret_profile(&llm.generate(&prompt).await?);

    info!("Generating {} experience blocks", selection.experiences.len());
    let experience_prompts = selection
        .experiences
        .iter()
        .map(|exp| experience_prompt(job_description, language, exp))
        .collect::<Result<Vec<_>, _>>()?;
    let experiences = try_join_all(experience_prompts.iter().map(|prompt| async move {
        let raw = llm.generate(prompt).await?;
        interpret_experience(&raw)
    }))
    .await?;

    info!("Generating skills");
    let prompt = skills_prompt(language, &selection.skills)?;
    let skills_by_category = interpret_skills(&llm.generate(&prompt).await?)?;

    info!("Generating education and certifications");
    let prompt = education_prompt(language, &selection.education)?;
    let (education, certs) = interpret_education(&llm.generate(&prompt).await?)?;

    info!("Generating why-me paragraph");
    let prompt = why_me_prompt(
        job_description,
        language,
        &selection.experiences,
        &selection.skills,
    )?;
    let why_me = interpret_why_me(&llm.generate(&prompt).await?);

    Ok(CvPayload {
        profile: profile_summary,
        experiences,
        skills_by_category,
        education,
        certs,
        why_me,
        // Contact links render from the profile; not duplicated here.
        links: Vec::new(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
