//! Normalization boundary: raw Notion pages to canonical career records.
//!
//! Notion databases are user-designed, so the same field shows up under
//! Spanish or English names and as different property kinds. Each record
//! kind has one mapping function that tries its aliases in order; the first
//! alias that yields a value wins.

use chrono::{Datelike, NaiveDate};
use serde_json::{Map, Value};
use tracing::warn;

use crate::models::career::{non_blank, EducationRecord, ExperienceRecord, Profile, SkillRecord};

/// Read-only view over a page's `properties` object.
pub struct Properties<'a> {
    props: Option<&'a Map<String, Value>>,
}

impl<'a> Properties<'a> {
    pub fn of(page: &'a Value) -> Self {
        Self {
            props: page.get("properties").and_then(Value::as_object),
        }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.props.and_then(|p| p.get(key))
    }

    /// First text run of a `title` property.
    pub fn title(&self, key: &str) -> Option<String> {
        self.get(key)?
            .get("title")?
            .get(0)?
            .get("plain_text")?
            .as_str()
            .map(str::to_string)
    }

    /// All runs of a `rich_text` property joined with `sep`. An existing but
    /// empty property yields `Some("")`.
    pub fn rich_text(&self, key: &str, sep: &str) -> Option<String> {
        let runs = self.get(key)?.get("rich_text")?.as_array()?;
        Some(
            runs.iter()
                .filter_map(|run| run.get("plain_text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join(sep),
        )
    }

    pub fn rich_text_first(&self, key: &str) -> Option<String> {
        self.get(key)?
            .get("rich_text")?
            .get(0)?
            .get("plain_text")?
            .as_str()
            .map(str::to_string)
    }

    pub fn select(&self, key: &str) -> Option<String> {
        self.get(key)?
            .get("select")?
            .get("name")?
            .as_str()
            .map(str::to_string)
    }

    pub fn multi_select(&self, key: &str) -> Option<Vec<String>> {
        let options = self.get(key)?.get("multi_select")?.as_array()?;
        Some(
            options
                .iter()
                .filter_map(|o| o.get("name").and_then(Value::as_str))
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn date_start(&self, key: &str) -> Option<String> {
        self.date_field(key, "start")
    }

    pub fn date_end(&self, key: &str) -> Option<String> {
        self.date_field(key, "end")
    }

    fn date_field(&self, key: &str, field: &str) -> Option<String> {
        self.get(key)?
            .get("date")?
            .get(field)?
            .as_str()
            .map(str::to_string)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key)?.get("number")?.as_f64()
    }

    /// Reads whichever text-bearing kind the property has: title, rich_text
    /// (runs joined with a space), url or email.
    pub fn text_like(&self, key: &str) -> Option<String> {
        let prop = self.get(key)?;
        match prop.get("type").and_then(Value::as_str)? {
            "title" => self.title(key),
            "rich_text" => self.rich_text(key, " "),
            "url" => prop.get("url")?.as_str().map(str::to_string),
            "email" => prop.get("email")?.as_str().map(str::to_string),
            _ => None,
        }
    }

    /// Tries `read` on each alias in order.
    pub fn first<T>(&self, aliases: &[&str], read: impl Fn(&Self, &str) -> Option<T>) -> Option<T> {
        aliases.iter().find_map(|alias| read(self, alias))
    }
}

pub fn profile_from_page(page: &Value) -> Profile {
    let props = Properties::of(page);
    let text = |aliases: &[&str]| {
        props
            .first(aliases, Properties::text_like)
            .unwrap_or_default()
    };

    Profile {
        full_name: text(&["Nombre", "FullName", "Name"]),
        title: text(&["Título profesional", "Title", "Título"]),
        location: text(&["Ubicación", "Location"]),
        email: text(&["Email"]),
        linkedin: text(&["LinkedIn"]),
        github: text(&["GitHub"]),
        portfolio: text(&["Portfolio", "Website"]),
        summary: text(&["Resumen corto", "Summary", "Resumen"]),
    }
}

pub fn experience_from_page(page: &Value) -> ExperienceRecord {
    let props = Properties::of(page);
    let id = page
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let name = props
        .first(&["Título del proyecto", "Name"], Properties::title)
        .unwrap_or_default();

    let company = props
        .select("Empresa / Cliente")
        .or_else(|| props.rich_text_first("Company"))
        .or_else(|| props.select("Company"))
        .or_else(|| props.rich_text_first("Empresa"))
        .or_else(|| props.select("Empresa"))
        .unwrap_or_default();

    let role = props
        .first(&["Rol oficial", "Role", "Rol"], Properties::select)
        .unwrap_or_default();

    let start = props.first(&["Start Date", "Start", "Inicio", "Desde"], Properties::date_start);

    let end = ["End Date", "End", "Fin", "Hasta"]
        .iter()
        .find_map(|key| props.date_end(key).or_else(|| props.date_start(key)));

    let summary = props
        .first(&["Summary", "Resumen"], |p, k| p.rich_text(k, " "))
        .unwrap_or_default();
    let responsibilities = props
        .first(&["Responsibilities", "Responsabilidades"], |p, k| p.rich_text(k, "\n"))
        .unwrap_or_default();
    let achievements = props
        .first(&["Achievements", "Logros"], |p, k| p.rich_text(k, "\n"))
        .unwrap_or_default();

    let tech = props
        .first(&["Tecnologías", "Tech"], Properties::multi_select)
        .unwrap_or_default();

    ExperienceRecord {
        start_date: parse_date(start.as_deref(), &id, "start"),
        end_date: parse_date(end.as_deref(), &id, "end"),
        industry: non_blank(props.first(&["Industria", "Industry"], Properties::select)),
        seniority: non_blank(props.first(&["Senioridad", "Seniority"], Properties::select)),
        id,
        name,
        company,
        role,
        summary,
        responsibilities,
        achievements,
        tech,
    }
}

pub fn skill_from_page(page: &Value) -> SkillRecord {
    let props = Properties::of(page);
    let synonyms = props
        .rich_text("Synonyms", ",")
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    SkillRecord {
        name: props.title("Name").unwrap_or_default(),
        category: non_blank(props.select("Category")),
        synonyms,
    }
}

pub fn education_from_page(page: &Value) -> EducationRecord {
    let props = Properties::of(page);

    let year = props
        .first(&["Year", "Año"], |p, k| p.number(k).filter(|n| *n != 0.0))
        .map(format_year)
        .or_else(|| {
            props
                .date_end("End Date")
                .or_else(|| props.date_start("End Date"))
                .and_then(|date| parse_date(Some(&date), "education", "end"))
                .map(|date| date.year().to_string())
        });

    let details = props
        .rich_text_first("Programa / Título")
        .or_else(|| props.rich_text("Details", " "))
        .or_else(|| props.rich_text("Detalles", " "));

    EducationRecord {
        name: props
            .first(&["Nombre", "Name"], Properties::title)
            .unwrap_or_default(),
        kind: props
            .first(&["Tipo", "Type"], Properties::select)
            .unwrap_or_default(),
        org: non_blank(props.first(
            &["Institución / Proveedor", "Org", "Organización", "Institución"],
            Properties::rich_text_first,
        )),
        year,
        details: non_blank(details),
    }
}

fn format_year(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Accepts `YYYY-MM-DD` or a full timestamp; only the date part is kept.
/// Unparseable values become `None`, which downstream reads as "ongoing".
fn parse_date(raw: Option<&str>, record: &str, field: &str) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    let date_part = raw.get(..10).unwrap_or(raw);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(e) => {
            warn!(record, field, value = raw, "Ignoring unparseable date: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn title(text: &str) -> Value {
        json!({"type": "title", "title": [{"plain_text": text}]})
    }

    fn rich(texts: &[&str]) -> Value {
        let runs: Vec<_> = texts.iter().map(|t| json!({"plain_text": t})).collect();
        json!({"type": "rich_text", "rich_text": runs})
    }

    fn select(name: &str) -> Value {
        json!({"type": "select", "select": {"name": name}})
    }

    fn date(start: &str, end: Option<&str>) -> Value {
        json!({"type": "date", "date": {"start": start, "end": end}})
    }

    #[test]
    fn test_profile_spanish_aliases_and_property_kinds() {
        let page = json!({
            "id": "p1",
            "properties": {
                "Nombre": title("Ada Lovelace"),
                "Título profesional": rich(&["Senior", "Engineer"]),
                "Ubicación": rich(&["London"]),
                "Email": {"type": "email", "email": "ada@example.com"},
                "LinkedIn": {"type": "url", "url": "https://linkedin.com/in/ada"},
                "Website": {"type": "url", "url": "https://ada.dev"},
                "Resumen": rich(&["Analytical engine enthusiast."])
            }
        });
        let profile = profile_from_page(&page);
        assert_eq!(profile.full_name, "Ada Lovelace");
        assert_eq!(profile.title, "Senior Engineer");
        assert_eq!(profile.location, "London");
        assert_eq!(profile.email, "ada@example.com");
        assert_eq!(profile.linkedin, "https://linkedin.com/in/ada");
        assert_eq!(profile.github, "");
        assert_eq!(profile.portfolio, "https://ada.dev");
        assert_eq!(profile.summary, "Analytical engine enthusiast.");
    }

    #[test]
    fn test_profile_without_properties_is_blank() {
        assert_eq!(profile_from_page(&json!({"id": "x"})), Profile::default());
    }

    #[test]
    fn test_experience_english_aliases() {
        let page = json!({
            "id": "exp-1",
            "properties": {
                "Name": title("Acme — Checkout"),
                "Company": rich(&["Acme"]),
                "Role": select("Senior Engineer"),
                "Start": date("2021-03-01", None),
                "End": date("2023-06-01T00:00:00.000+00:00", None),
                "Responsibilities": rich(&["Led payments", "Mentored juniors"]),
                "Tech": {"type": "multi_select", "multi_select": [{"name": "React Native"}, {"name": "GraphQL"}]},
                "Industry": select("Fintech"),
                "Seniority": select("")
            }
        });
        let exp = experience_from_page(&page);
        assert_eq!(exp.id, "exp-1");
        assert_eq!(exp.name, "Acme — Checkout");
        assert_eq!(exp.company, "Acme");
        assert_eq!(exp.role, "Senior Engineer");
        assert_eq!(exp.start_date, NaiveDate::from_ymd_opt(2021, 3, 1));
        assert_eq!(exp.end_date, NaiveDate::from_ymd_opt(2023, 6, 1));
        assert_eq!(exp.responsibilities, "Led payments\nMentored juniors");
        assert_eq!(exp.achievements, "");
        assert_eq!(exp.tech, vec!["React Native", "GraphQL"]);
        assert_eq!(exp.industry.as_deref(), Some("Fintech"));
        assert_eq!(exp.seniority, None);
    }

    #[test]
    fn test_experience_spanish_aliases_and_range_end() {
        let page = json!({
            "id": "exp-2",
            "properties": {
                "Título del proyecto": title("Globex"),
                "Empresa / Cliente": select("Globex"),
                "Rol oficial": select("Tech Lead"),
                "Inicio": date("2019-01-01", None),
                "Fin": date("2019-05-01", Some("2020-02-01")),
                "Logros": rich(&["Shipped v2"]),
                "Tecnologías": {"type": "multi_select", "multi_select": []},
                "Senioridad": select("Senior")
            }
        });
        let exp = experience_from_page(&page);
        assert_eq!(exp.company, "Globex");
        assert_eq!(exp.role, "Tech Lead");
        assert_eq!(exp.end_date, NaiveDate::from_ymd_opt(2020, 2, 1));
        assert_eq!(exp.achievements, "Shipped v2");
        assert!(exp.tech.is_empty());
        assert_eq!(exp.seniority.as_deref(), Some("Senior"));
    }

    #[test]
    fn test_experience_bad_end_date_reads_as_ongoing() {
        let page = json!({
            "id": "exp-3",
            "properties": {"End Date": date("sometime", None)}
        });
        assert_eq!(experience_from_page(&page).end_date, None);
    }

    #[test]
    fn test_skill_synonyms_split_and_trimmed() {
        let page = json!({
            "properties": {
                "Name": title("GraphQL"),
                "Category": select("APIs"),
                "Synonyms": rich(&["graphql api, gql", ",apollo"])
            }
        });
        let skill = skill_from_page(&page);
        assert_eq!(skill.name, "GraphQL");
        assert_eq!(skill.category.as_deref(), Some("APIs"));
        assert_eq!(skill.synonyms, vec!["graphql api", "gql", "apollo"]);
    }

    #[test]
    fn test_education_year_from_number_or_end_date() {
        let with_number = json!({
            "properties": {
                "Nombre": title("BSc Computer Science"),
                "Tipo": select("Educación"),
                "Institución": rich(&["UBA"]),
                "Año": {"type": "number", "number": 2018.0}
            }
        });
        let edu = education_from_page(&with_number);
        assert_eq!(edu.name, "BSc Computer Science");
        assert_eq!(edu.kind, "Educación");
        assert_eq!(edu.org.as_deref(), Some("UBA"));
        assert_eq!(edu.year.as_deref(), Some("2018"));
        assert_eq!(edu.details, None);

        let with_date = json!({
            "properties": {
                "Name": title("AWS SAA"),
                "Type": select("Certification"),
                "Year": {"type": "number", "number": null},
                "End Date": date("2022-11-15", None),
                "Details": rich(&["Associate", "level"])
            }
        });
        let cert = education_from_page(&with_date);
        assert_eq!(cert.year.as_deref(), Some("2022"));
        assert_eq!(cert.details.as_deref(), Some("Associate level"));
    }

    #[test]
    fn test_education_missing_year_is_none() {
        let page = json!({"properties": {"Name": title("Course")}});
        assert_eq!(education_from_page(&page).year, None);
    }
}
