// CV Generation
// Implements: signal extraction, relevance scoring, content selection,
// per-section prompting and payload assembly.
// All LLM calls go through llm_client; no direct API calls here.

pub mod content_selector;
pub mod generator;
pub mod handlers;
pub mod jd_parser;
pub mod prompts;
pub mod scoring;
pub mod sections;
