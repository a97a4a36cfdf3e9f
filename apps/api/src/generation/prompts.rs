// Section prompt templates for CV generation.
// Each template has a distinct TASK line; every builder fills
// `{never_invent}` from llm_client::prompts and `{language}` from the request.

/// Profile summary. Replace: {never_invent}, {language}, {job_description},
/// {profile_json}, {experiences_json}
pub const PROFILE_PROMPT_TEMPLATE: &str = r#"You are a professional CV generator. Output language: {language}.

{never_invent}

TASK: Write a professional profile summary of 2-3 sentences.

RULES:
- Base the summary on the technologies that appear most often in the experiences provided
- Mention years of experience computed from the real experience dates
- Do NOT invent specialities the experiences do not support
- Lean the summary towards the job description requirements where relevant

RESPONSE FORMAT:
Return ONLY the paragraph text, WITHOUT:
- Quotes (neither single ' nor double ")
- JSON (no {}, [], etc)
- Prefixes such as "summary:" or "profile:"
- Markdown or extra formatting
CORRECT example: Mobile engineer with 5 years of experience...
INCORRECT example: {"summary": "Mobile engineer with..."}

JOB DESCRIPTION:
{job_description}

BASE PROFILE:
{profile_json}

EXPERIENCES (to compute years and technologies):
{experiences_json}
"#;

/// One experience block. Replace: {never_invent}, {language},
/// {job_description}, {experience_json}
pub const EXPERIENCE_PROMPT_TEMPLATE: &str = r#"You are a professional CV generator. Output language: {language}.

{never_invent}

TASK: Produce the experience block for this position as JSON:
{
  "company": "exact company name",
  "role": "exact role",
  "period": "MMM YYYY – Present|MMM YYYY – MMM YYYY",
  "context": "1-2 sentences describing the industry/product",
  "bullets": ["array of 3-5 bullets"]
}

BULLET RULES:

1. If "responsibilities" or "achievements" have content: use THAT text, only reformat it.

2. If they are EMPTY but you have company + role + tech, write 3-5 bullets:
   a) Context (1 bullet): the industry or product in generic terms.
      Unknown companies: "Development of [mobile/web/fullstack] applications".
   b) Technical responsibilities (2-3 bullets): GENERIC activities of the role,
      mentioning the technologies from the "tech" array in context.
      For Tech Lead / Team Lead roles mention technical leadership.
   c) Stack (1 bullet): "Stack: [technologies from tech]".
      If the tech array is EMPTY, omit this bullet entirely.

3. NEVER:
   - invent specific metrics (30%, 50%, $X million, X users, etc)
   - invent specific feature names
   - invent quantifiable achievements
   - invent technologies that are not in "tech"
   - mention specific team sizes
   - write "Stack: []"

4. ALLOWED:
   - industry context for well-known companies
   - generic activities of the role
   - platforms (mobile, web) inferred from the tech stack
   - qualitative terms ("performance improvements", "optimisation")

DATE FORMAT:
- Convert ISO dates (2020-02-01) to "Feb 2020"
- No end date: use "Present"
- No start date: use only the year if known, otherwise leave period as ""
- Both dates empty: period must be ""

JOB DESCRIPTION (for context):
{job_description}

EXPERIENCE:
{experience_json}

Return ONLY the JSON, with no text before or after it.
"#;

/// Skills grouped by category. Replace: {never_invent}, {language}, {skills_json}
pub const SKILLS_PROMPT_TEMPLATE: &str = r#"You are a professional CV generator. Output language: {language}.

{never_invent}

TASK: Group the following skills by category as JSON:
{
  "Category 1": ["skill1", "skill2"],
  "Category 2": ["skill3", "skill4"]
}

RULES:
- Use EXACTLY the technology names provided
- Group by the category given on each skill
- Skills without a category go under "Other"
- At most 15 skills in total (prioritise the most relevant)

SKILLS:
{skills_json}

Return ONLY the JSON, with no text before or after it.
"#;

/// Education and certifications. Replace: {never_invent}, {language}, {education_json}
pub const EDUCATION_PROMPT_TEMPLATE: &str = r#"You are a professional CV generator. Output language: {language}.

{never_invent}

TASK: Format the education and certifications as JSON:
{
  "education": [{ "title": "title", "org": "institution", "year": "year" }],
  "certs": [{ "name": "name", "org": "org", "year": "year" }]
}

RULES:
- Put degrees and education entries under "education", certifications and courses under "certs"
- Use the EXACT names, organisations and years provided
- If a field does not exist, omit it (no null, no empty string)

EDUCATION AND CERTIFICATIONS:
{education_json}

Return ONLY the JSON, with no text before or after it.
"#;

/// Why-me paragraph. Replace: {never_invent}, {language}, {job_description},
/// {experiences_json}, {skills_json}
pub const WHY_ME_PROMPT_TEMPLATE: &str = r#"You are a professional CV generator. Output language: {language}.

{never_invent}

TASK: Write a 2-3 sentence paragraph explaining why the candidate is a good fit for this role.

RULES:
- Map specific job description requirements to real experiences
- Cite real company names and technologies from the history
- If there is no clear match, be honest: "Relevant experience in [real technologies]"
- Do NOT invent projects or achievements

RESPONSE FORMAT:
Return ONLY the paragraph text, WITHOUT:
- Quotes (neither single ' nor double ")
- JSON (no {}, [], "fit_paragraph": etc)
- Prefixes such as "paragraph:", "fit:" or "whyMe:"
- Markdown or extra formatting

JOB DESCRIPTION:
{job_description}

CANDIDATE EXPERIENCES:
{experiences_json}

CANDIDATE SKILLS:
{skills_json}
"#;
