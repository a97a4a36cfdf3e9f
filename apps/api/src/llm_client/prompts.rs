// System prompts, one per pipeline.
// Section-level prompts live next to the code that builds them
// (generation/prompts.rs, miner/prompts.rs).

/// System prompt for every CV section call.
pub const CV_SYSTEM_PROMPT: &str = "You are a professional CV generator with ZERO hallucination. \
    NEVER invent data. Use ONLY the exact information provided. \
    Follow the user's format instructions precisely: if they ask for JSON, return JSON; \
    if they ask for plain text, return plain text with no wrapping.";

/// System prompt for PR summarisation batches.
pub const PR_MINER_SYSTEM_PROMPT: &str =
    "You are an assistant that turns merged pull requests into technical sub-projects for a CV.";

/// Shared rule embedded in every CV section prompt.
pub const NEVER_INVENT_RULE: &str = "CRITICAL RULE: NEVER INVENT DATA. Use only the information provided.";
