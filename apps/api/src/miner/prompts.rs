//! Batch prompt for PR summarisation.

use serde::Serialize;

use crate::miner::models::PullRequest;

pub const BATCH_PROMPT_TEMPLATE: &str = "\
You summarise technical work for CVs.\n\
\n\
Below are merged pull requests. Group them into \"sub-projects\" that can be stored \
as experience records in a career database.\n\
\n\
### Input PRs (JSON)\n\
{prs_json}\n\
\n\
### Important context\n\
{context}\n\
- Use the real PR dates (createdAt/closedAt) to compute each sub-project's timeFrame.\n\
\n\
### Goal\n\
\n\
1. Be VERY GRANULAR: group PRs into specific, detailed sub-projects.\n\
   - TARGET: 1-3 sub-projects for every 3-5 PRs (do not over-group).\n\
   - Every significant feature deserves its own sub-project.\n\
   - Examples of SPECIFIC sub-projects: \"Credit Card Onboarding Flow\", \"Apple Pay Integration\", \
\"Map Marker Redesign\", \"Search Performance\", \"Payment Error Handling\".\n\
\n\
2. For each sub-project produce an object in this JSON format (no comments):\n\
\n\
[\n\
  {\n\
    \"title\": \"SPECIFIC sub-project name\",\n\
    \"timeFrame\": \"Mon YYYY - Mon YYYY (from the related PR dates)\",\n\
    \"overview\": \"2-3 line summary of the sub-project.\",\n\
    \"responsibilities\": [\"Specific technical responsibility\"],\n\
    \"achievements\": [\"Concrete, quantifiable achievement\"],\n\
    \"impact\": [\"Measurable product or business impact\"],\n\
    \"tech\": [\"Technologies beyond the main stack named in the context\"],\n\
    \"metrics\": [\"Specific figures: X% improvement, Y users impacted\"],\n\
    \"tags\": [\"Payments\", \"Performance\", \"UI/UX\", \"API\", \"Testing\"],\n\
    \"relatedPrs\": [{ \"number\": 123, \"title\": \"PR title\", \"url\": \"https://...\" }]\n\
  }\n\
]\n\
\n\
### CRITICAL rules\n\
\n\
- GRANULARITY: if a PR covers a different feature, it is a separate sub-project.\n\
- The output MUST be valid JSON (an array of objects) with no text before or after.\n\
- Do NOT include \"company\" or \"role\"; they are part of the general context.\n\
- Do NOT repeat the main stack in \"tech\".\n\
- timeFrame format: \"Jan 2023 - Mar 2023\".\n\
- Do not invent PRs: relatedPrs may only reference the input PRs.\n\
- Do NOT drop PRs: every PR belongs to some sub-project.\n\
- Each sub-project has 1-8 related PRs (ideally 2-5).\n\
- Prefer MORE specific sub-projects over FEWER general ones.\n\
\n\
Return ONLY the JSON.";

const DEFAULT_CONTEXT: &str = "- No extra context was provided; infer the main stack from the PRs.";

/// What the model sees of a PR. Comments, reviews and patches stay in the
/// cache only.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PromptPr<'a> {
    number: u64,
    title: &'a str,
    url: &'a str,
    body: &'a str,
    created_at: &'a str,
    closed_at: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<PromptStats>,
    files_changed: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
struct PromptStats {
    additions: u64,
    deletions: u64,
    changed_files: u64,
    commits: u64,
}

impl<'a> From<&'a PullRequest> for PromptPr<'a> {
    fn from(pr: &'a PullRequest) -> Self {
        PromptPr {
            number: pr.number,
            title: &pr.title,
            url: &pr.url,
            body: &pr.body,
            created_at: &pr.created_at,
            closed_at: pr.closed_at.as_deref(),
            stats: pr.details.as_ref().map(|d| PromptStats {
                additions: d.additions,
                deletions: d.deletions,
                changed_files: d.changed_files,
                commits: d.commits,
            }),
            files_changed: pr.files.iter().map(|f| f.filename.as_str()).collect(),
        }
    }
}

/// Builds the prompt for one batch. `context` is free text describing the
/// company, role and main stack; each line becomes a bullet.
pub fn batch_prompt(prs: &[PullRequest], context: Option<&str>) -> Result<String, serde_json::Error> {
    let essentials: Vec<PromptPr> = prs.iter().map(PromptPr::from).collect();
    let prs_json = serde_json::to_string_pretty(&essentials)?;

    let context = match context.map(str::trim).filter(|c| !c.is_empty()) {
        Some(text) => text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| format!("- {}", l.trim_start_matches("- ")))
            .collect::<Vec<_>>()
            .join("\n"),
        None => DEFAULT_CONTEXT.to_string(),
    };

    // PR bodies go in last so their braces are never treated as placeholders.
    Ok(BATCH_PROMPT_TEMPLATE
        .replace("{context}", &context)
        .replace("{prs_json}", &prs_json))
}
