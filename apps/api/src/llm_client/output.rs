//! Tolerant interpretation of raw model output.
//!
//! Models wrap JSON in fences, prefix it with chatter, or quote plain prose.
//! Every section goes through `GenerationOutput::parse` once and then asks
//! for the shape it expects.

use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutput {
    /// A JSON object or array.
    Structured(Value),
    /// Anything else, with fences and wrapping quotes removed.
    Text(String),
}

impl GenerationOutput {
    pub fn parse(raw: &str) -> Self {
        let text = strip_json_fences(raw);

        match serde_json::from_str::<Value>(text) {
            Ok(value @ (Value::Object(_) | Value::Array(_))) => {
                return GenerationOutput::Structured(value)
            }
            Ok(Value::String(s)) => return GenerationOutput::Text(s.trim().to_string()),
            _ => {}
        }

        if let Some(span) = outermost_json_span(text) {
            if let Ok(value @ (Value::Object(_) | Value::Array(_))) =
                serde_json::from_str::<Value>(span)
            {
                return GenerationOutput::Structured(value);
            }
        }

        GenerationOutput::Text(strip_wrapping_quotes(text).trim().to_string())
    }

    /// Plain prose. For a JSON object, the first non-empty string under one
    /// of `keys` wins; otherwise the compact JSON itself is returned.
    pub fn into_text(self, keys: &[&str]) -> String {
        match self {
            GenerationOutput::Text(text) => text,
            GenerationOutput::Structured(Value::Object(map)) => keys
                .iter()
                .filter_map(|key| map.get(*key).and_then(Value::as_str))
                .map(str::trim)
                .find(|s| !s.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| Value::Object(map).to_string()),
            GenerationOutput::Structured(other) => other.to_string(),
        }
    }

    pub fn into_json<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        match self {
            GenerationOutput::Structured(value) => serde_json::from_value(value),
            GenerationOutput::Text(text) => serde_json::from_str(&text),
        }
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// From the first `[` or `{` to the last `]` or `}`.
pub fn outermost_json_span(text: &str) -> Option<&str> {
    let start = text.find(['[', '{'])?;
    let end = text.rfind([']', '}'])?;
    (end > start).then(|| &text[start..=end])
}

fn strip_wrapping_quotes(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix('"')
        .or_else(|| text.strip_prefix('\''))
        .unwrap_or(text);
    text.strip_suffix('"')
        .or_else(|| text.strip_suffix('\''))
        .unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_plain_prose_is_text() {
        let output = GenerationOutput::parse("Mobile engineer with 5 years of experience.");
        assert_eq!(
            output,
            GenerationOutput::Text("Mobile engineer with 5 years of experience.".to_string())
        );
    }

    #[test]
    fn test_quoted_prose_loses_quotes() {
        assert_eq!(
            GenerationOutput::parse("'Brings React Native depth'").into_text(&[]),
            "Brings React Native depth"
        );
        assert_eq!(
            GenerationOutput::parse("\"A JSON string literal\"").into_text(&[]),
            "A JSON string literal"
        );
    }

    #[test]
    fn test_json_object_recovered_from_chatter() {
        let raw = "Sure! Here is the block:\n{\"company\": \"Acme\"}\nHope it helps.";
        let output = GenerationOutput::parse(raw);
        assert_eq!(
            output,
            GenerationOutput::Structured(serde_json::json!({"company": "Acme"}))
        );
    }

    #[test]
    fn test_into_text_unwraps_known_keys_in_order() {
        let output = GenerationOutput::parse(r#"{"paragraph": "", "whyMe": "Strong fit."}"#);
        assert_eq!(
            output.into_text(&["fit_paragraph", "paragraph", "whyMe", "why"]),
            "Strong fit."
        );
    }

    #[test]
    fn test_into_text_falls_back_to_compact_json() {
        let output = GenerationOutput::parse(r#"{"other": "x"}"#);
        assert_eq!(output.into_text(&["summary"]), r#"{"other":"x"}"#);
    }

    #[test]
    fn test_prose_with_stray_brace_stays_text() {
        let raw = "Uses {curly} braces but is not JSON";
        assert_eq!(
            GenerationOutput::parse(raw),
            GenerationOutput::Text(raw.to_string())
        );
    }

    #[test]
    fn test_into_json_on_fenced_array() {
        #[derive(Deserialize)]
        struct Item {
            title: String,
        }
        let raw = "```json\n[{\"title\": \"Apple Pay\"}]\n```";
        let items: Vec<Item> = GenerationOutput::parse(raw).into_json().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Apple Pay");
    }

    #[test]
    fn test_into_json_on_text_fails() {
        let result: Result<Vec<String>, _> = GenerationOutput::parse("no json here").into_json();
        assert!(result.is_err());
    }

    #[test]
    fn test_outermost_span_requires_ordered_brackets() {
        assert_eq!(outermost_json_span("} then {"), None);
        assert_eq!(outermost_json_span("x [1, {\"a\": 2}] y"), Some("[1, {\"a\": 2}]"));
    }
}
