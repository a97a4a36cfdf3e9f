//! Document assembler: turns a `CvPayload` into a two-column Notion block tree.
//!
//! Left column carries the narrative (header, summary, experience, education,
//! why-me); right column carries contact details and grouped skills.

use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::models::career::Profile;
use crate::models::cv::{CvPayload, ExperienceBlock};

pub mod markdown;

use markdown::{plain, rich_text};

/// `CV – {name} – {YYYY-MM-DD}`, with "Candidate" standing in for a blank name.
pub fn page_title(profile: &Profile, date: NaiveDate) -> String {
    let name = match profile.full_name.trim() {
        "" => "Candidate",
        name => name,
    };
    format!("CV – {} – {}", name, date.format("%Y-%m-%d"))
}

/// The full page body: a single column list holding both columns.
pub fn cv_blocks(profile: &Profile, payload: &CvPayload) -> Vec<Value> {
    vec![json!({
        "object": "block",
        "type": "column_list",
        "column_list": {
            "children": [
                column(left_column(profile, payload)),
                column(right_column(profile, payload)),
            ]
        }
    })]
}

fn left_column(profile: &Profile, payload: &CvPayload) -> Vec<Value> {
    let mut blocks = vec![
        heading(1, &format!("{} — {}", profile.full_name, profile.title)),
        gray_paragraph(&profile.location),
        callout("🧠", &payload.profile),
        heading(2, "💼 Experience"),
    ];

    for (idx, experience) in payload.experiences.iter().enumerate() {
        if idx > 0 {
            blocks.push(divider());
        }
        blocks.extend(experience_blocks(experience));
    }

    blocks.push(heading(2, "📚 Education & Certifications"));
    blocks.extend(payload.education.iter().map(|ed| {
        bullet(&credential_line(&ed.title, ed.org.as_deref(), ed.year.as_deref()))
    }));
    blocks.extend(payload.certs.iter().map(|cert| {
        bullet(&credential_line(&cert.name, cert.org.as_deref(), cert.year.as_deref()))
    }));

    blocks.push(heading(2, "💡 Why I fit this role"));
    blocks.push(paragraph(&payload.why_me));
    blocks
}

fn experience_blocks(experience: &ExperienceBlock) -> Vec<Value> {
    let role_line = if experience.period.is_empty() {
        format!("**{}**", experience.role)
    } else {
        format!("**{}** · {}", experience.role, experience.period)
    };

    let mut blocks = vec![heading(3, &experience.company), paragraph(&role_line)];
    if let Some(context) = experience.context.as_deref().filter(|c| !c.is_empty()) {
        blocks.push(paragraph(&format!("_{context}_")));
    }
    blocks.extend(experience.bullets.iter().map(|b| bullet(b)));
    blocks
}

fn right_column(profile: &Profile, payload: &CvPayload) -> Vec<Value> {
    let mut blocks = vec![heading(2, "📇 Contact")];

    let contacts = [
        ("Email", &profile.email),
        ("LinkedIn", &profile.linkedin),
        ("GitHub", &profile.github),
        ("Portfolio", &profile.portfolio),
    ];
    blocks.extend(
        contacts
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(label, value)| bullet(&format!("{label}: {value}"))),
    );

    blocks.push(heading(2, "🛠 Skills"));
    for group in &payload.skills_by_category {
        blocks.push(paragraph(&format!("**{}**", group.category)));
        blocks.push(bullet(&group.items.join(", ")));
    }
    blocks
}

/// "title, org — year" with absent parts left out.
fn credential_line(title: &str, org: Option<&str>, year: Option<&str>) -> String {
    let mut line = title.to_string();
    if let Some(org) = org.filter(|o| !o.is_empty()) {
        line.push_str(", ");
        line.push_str(org);
    }
    if let Some(year) = year.filter(|y| !y.is_empty()) {
        line.push_str(" — ");
        line.push_str(year);
    }
    line
}

// ────────────────────────────────────────────────────────────────────────────
// Block constructors
// ────────────────────────────────────────────────────────────────────────────

fn column(children: Vec<Value>) -> Value {
    json!({ "object": "block", "type": "column", "column": { "children": children } })
}

fn heading(level: u8, content: &str) -> Value {
    let kind = format!("heading_{level}");
    let mut block = json!({ "object": "block", "type": &kind });
    block[kind.as_str()] = json!({ "rich_text": [plain(content)] });
    block
}

fn paragraph(content: &str) -> Value {
    json!({
        "object": "block",
        "type": "paragraph",
        "paragraph": { "rich_text": rich_text(content) }
    })
}

fn gray_paragraph(content: &str) -> Value {
    json!({
        "object": "block",
        "type": "paragraph",
        "paragraph": { "rich_text": [plain(content)], "color": "gray" }
    })
}

fn bullet(content: &str) -> Value {
    json!({
        "object": "block",
        "type": "bulleted_list_item",
        "bulleted_list_item": { "rich_text": [plain(content)] }
    })
}

fn callout(icon: &str, content: &str) -> Value {
    json!({
        "object": "block",
        "type": "callout",
        "callout": {
            "rich_text": [plain(content)],
            "icon": { "type": "emoji", "emoji": icon }
        }
    })
}

fn divider() -> Value {
    json!({ "object": "block", "type": "divider", "divider": {} })
}
