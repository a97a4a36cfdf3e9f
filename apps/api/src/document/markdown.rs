//! `**bold**` and `_italic_` runs to Notion rich text.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{json, Map, Value};

fn emphasis_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\*\*(.*?)\*\*|_(.*?)_").expect("emphasis pattern is valid"))
}

/// A single unstyled run.
pub fn plain(content: &str) -> Value {
    json!({ "type": "text", "text": { "content": content } })
}

fn styled(content: &str, style: &str) -> Value {
    let mut annotations = Map::new();
    annotations.insert(style.to_string(), Value::Bool(true));
    json!({
        "type": "text",
        "text": { "content": content },
        "annotations": annotations,
    })
}

/// Splits `content` into plain, bold and italic runs. Empty runs are
/// dropped; text with no runs at all becomes one plain run.
pub fn rich_text(content: &str) -> Vec<Value> {
    let mut runs = Vec::new();
    let mut cursor = 0;

    for caps in emphasis_pattern().captures_iter(content) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > cursor {
            runs.push(plain(&content[cursor..whole.start()]));
        }
        if let Some(bold) = caps.get(1) {
            if !bold.as_str().is_empty() {
                runs.push(styled(bold.as_str(), "bold"));
            }
        } else if let Some(italic) = caps.get(2) {
            if !italic.as_str().is_empty() {
                runs.push(styled(italic.as_str(), "italic"));
            }
        }
        cursor = whole.end();
    }

    if cursor < content.len() {
        runs.push(plain(&content[cursor..]));
    }
    if runs.is_empty() {
        runs.push(plain(content));
    }
    runs
}
