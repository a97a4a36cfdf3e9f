//! JD Parser: extracts keywords, seniority and industry from a raw job description.
//!
//! Pure-Rust, no LLM call. Detection is substring matching against fixed
//! vocabularies on the lower-cased text, so results are deterministic.

use serde::{Deserialize, Serialize};

/// Seniority label emitted for senior/lead roles. Compared verbatim against
/// experience seniority tags.
pub const SENIOR_LABEL: &str = "Senior";

/// Action verbs, domain nouns and technology nouns, in reporting order.
const RESPONSIBILITY_VOCABULARY: &[&str] = &[
    "lead",
    "design",
    "implement",
    "optimize",
    "scale",
    "mentor",
    "payments",
    "performance",
    "maps",
    "security",
    "ci/cd",
    "react native",
    "typescript",
    "node",
    "aws",
    "graphql",
    "kubernetes",
    "docker",
    "microservices",
    "api",
    "mobile",
    "frontend",
    "backend",
    "fullstack",
];

const SENIORITY_MARKERS: &[&str] = &["senior", "lead"];

/// Priority order: the first industry found wins.
const INDUSTRIES: &[&str] = &["fintech", "ecommerce", "health", "mobility", "retail"];

/// Structured facts pulled out of a job description. Feeds `select_content`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSignals {
    /// Technologies named by the JD. `extract_signals` leaves this empty;
    /// technology matching runs on the caller's notes against skill synonyms.
    pub technologies: Vec<String>,
    pub responsibility_keywords: Vec<String>,
    pub seniority: Option<String>,
    pub industry: Option<String>,
}

/// Parses a job description into `ExtractedSignals`.
pub fn extract_signals(jd_text: &str) -> ExtractedSignals {
    let jd = jd_text.to_lowercase();

    let responsibility_keywords = RESPONSIBILITY_VOCABULARY
        .iter()
        .filter(|keyword| jd.contains(**keyword))
        .map(|keyword| keyword.to_string())
        .collect();

    let seniority = SENIORITY_MARKERS
        .iter()
        .any(|marker| jd.contains(*marker))
        .then(|| SENIOR_LABEL.to_string());

    let industry = INDUSTRIES
        .iter()
        .find(|industry| jd.contains(**industry))
        .map(|industry| industry.to_string());

    ExtractedSignals {
        technologies: Vec::new(),
        responsibility_keywords,
        seniority,
        industry,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SENIOR_FINTECH_JD: &str = r#"
        Senior React Native Engineer — Payments
        You will design and implement payment flows for our fintech app,
        mentor other engineers and own performance across iOS and Android.
        Bonus: GraphQL, AWS, CI/CD pipelines.
    "#;

    const JUNIOR_RETAIL_JD: &str = r#"
        Junior Web Developer
        Join our retail team to build storefront pages with TypeScript.
    "#;

    #[test]
    fn test_keywords_follow_vocabulary_order() {
        let signals = extract_signals(SENIOR_FINTECH_JD);
        assert_eq!(
            signals.responsibility_keywords,
            vec![
                "design",
                "implement",
                "mentor",
                "payments",
                "performance",
                "ci/cd",
                "react native",
                "aws",
                "graphql",
            ]
        );
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let signals = extract_signals("We use KUBERNETES and Docker at SCALE");
        assert_eq!(
            signals.responsibility_keywords,
            vec!["scale", "kubernetes", "docker"]
        );
    }

    #[test]
    fn test_senior_detected_from_senior_or_lead() {
        assert_eq!(
            extract_signals(SENIOR_FINTECH_JD).seniority.as_deref(),
            Some(SENIOR_LABEL)
        );
        assert_eq!(
            extract_signals("Tech Lead wanted").seniority.as_deref(),
            Some("Senior")
        );
        assert_eq!(extract_signals(JUNIOR_RETAIL_JD).seniority, None);
    }

    #[test]
    fn test_industry_uses_priority_order() {
        // Both "retail" and "fintech" appear; fintech ranks first in the list.
        let signals = extract_signals("A retail bank going fintech");
        assert_eq!(signals.industry.as_deref(), Some("fintech"));
    }

    #[test]
    fn test_industry_absent_when_no_match() {
        assert_eq!(extract_signals("Backend engineer for logistics").industry, None);
    }

    #[test]
    fn test_technologies_always_empty() {
        let signals = extract_signals("React Native, TypeScript, GraphQL, Kubernetes");
        assert!(signals.technologies.is_empty());
    }

    #[test]
    fn test_empty_text_yields_empty_signals() {
        assert_eq!(extract_signals(""), ExtractedSignals::default());
    }
}
