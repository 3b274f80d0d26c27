use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One catalog entry as returned by the search endpoint.
///
/// Entries are immutable once fetched; they are carried verbatim from the
/// catalog response for the lifetime of a page view. Optional fields are
/// routinely absent in the wire JSON, so everything beyond `key` and
/// `title` defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    /// Work key, e.g. `/works/OL45883W`.
    pub key: String,
    /// Title of the work.
    pub title: String,
    /// Author display names, in catalog order. May be empty.
    #[serde(default)]
    pub author_name: Vec<String>,
    /// Cover image identifier, when the work has one.
    #[serde(default)]
    pub cover_i: Option<i64>,
    /// Subject/genre tags.
    #[serde(default)]
    pub subject: Vec<String>,
}

impl Book {
    /// The bare work id used in detail routes: the key with its
    /// `/works/` prefix stripped.
    pub fn work_id(&self) -> &str {
        self.key.strip_prefix("/works/").unwrap_or(&self.key)
    }

    /// Card byline: the first two author names joined with a comma,
    /// with `, etc.` appended when more exist.
    pub fn byline(&self) -> String {
        let shown: Vec<&str> = self
            .author_name
            .iter()
            .take(2)
            .map(String::as_str)
            .collect();
        let mut line = shown.join(", ");
        if self.author_name.len() > 2 {
            line.push_str(", etc.");
        }
        line
    }
}

/// Envelope of the catalog search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub docs: Vec<Book>,
    #[serde(default, rename = "numFound")]
    pub num_found: i64,
}

/// Reference to an author on a work record.
///
/// Wire shape: `{"author": {"key": "/authors/OL23919A"}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthorRef {
    pub author: KeyRef,
}

/// A bare `{"key": ...}` object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeyRef {
    pub key: String,
}

/// An author record from the author lookup endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Author {
    pub name: String,
}

/// How many subjects the detail view surfaces as genres.
pub const GENRES_SHOWN: usize = 10;

/// One work fetched from the works endpoint for the detail page.
///
/// The catalog's JSON for works is dynamically shaped: `description` is
/// either a bare string or a `{type, value}` object, and `created` wraps
/// its timestamp the same way. Both are normalized here, at the
/// collaborator boundary, so nothing downstream sees the raw variants.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct WorkDetail {
    pub title: String,
    #[serde(default)]
    pub authors: Vec<AuthorRef>,
    #[serde(default)]
    pub covers: Vec<i64>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_description")]
    pub description: Option<String>,
    #[serde(default)]
    pub first_publish_date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_created")]
    pub created: Option<DateTime<Utc>>,
}

impl WorkDetail {
    /// The cover identifier the detail page shows, if any.
    pub fn primary_cover(&self) -> Option<i64> {
        self.covers.first().copied()
    }

    /// The subjects surfaced as genre chips (first [`GENRES_SHOWN`]).
    pub fn genres(&self) -> &[String] {
        let end = self.subjects.len().min(GENRES_SHOWN);
        &self.subjects[..end]
    }

    /// Author keys to resolve into display names.
    pub fn author_keys(&self) -> Vec<String> {
        self.authors.iter().map(|a| a.author.key.clone()).collect()
    }
}

/// Cover image sizes offered by the covers host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverSize {
    /// Thumbnail.
    Small,
    /// Library card.
    Medium,
    /// Detail page.
    Large,
}

impl CoverSize {
    /// The size suffix in cover URLs.
    pub fn suffix(&self) -> &'static str {
        match self {
            CoverSize::Small => "S",
            CoverSize::Medium => "M",
            CoverSize::Large => "L",
        }
    }
}

/// Deserialize a description that is either a bare string or a
/// `{type, value}` object.
fn deserialize_description<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrObject {
        Text(String),
        Object { value: String },
    }

    let parsed = Option::<TextOrObject>::deserialize(deserializer)?;
    Ok(parsed.map(|v| match v {
        TextOrObject::Text(s) => s,
        TextOrObject::Object { value } => value,
    }))
}

/// Deserialize the `created` field's `{type, value}` wrapper into a
/// timestamp. The catalog emits naive ISO-8601 values; an unparseable
/// value degrades to `None` rather than failing the whole work.
fn deserialize_created<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Created {
        value: String,
    }

    let parsed = Option::<Created>::deserialize(deserializer)?;
    Ok(parsed.and_then(|c| parse_catalog_timestamp(&c.value)))
}

fn parse_catalog_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(title: &str, authors: &[&str]) -> Book {
        Book {
            key: "/works/OL45883W".to_string(),
            title: title.to_string(),
            author_name: authors.iter().map(|s| s.to_string()).collect(),
            cover_i: Some(12345),
            subject: vec![],
        }
    }

    #[test]
    fn test_work_id_strips_prefix() {
        let b = book("Dune", &["Frank Herbert"]);
        assert_eq!(b.work_id(), "OL45883W");
    }

    #[test]
    fn test_work_id_without_prefix() {
        let mut b = book("Dune", &[]);
        b.key = "OL45883W".to_string();
        assert_eq!(b.work_id(), "OL45883W");
    }

    #[test]
    fn test_byline_truncates_after_two() {
        assert_eq!(book("T", &[]).byline(), "");
        assert_eq!(book("T", &["A"]).byline(), "A");
        assert_eq!(book("T", &["A", "B"]).byline(), "A, B");
        assert_eq!(book("T", &["A", "B", "C"]).byline(), "A, B, etc.");
    }

    #[test]
    fn test_book_deserialize_minimal() {
        let b: Book =
            serde_json::from_str(r#"{"key": "/works/OL1W", "title": "Dune"}"#).unwrap();
        assert_eq!(b.title, "Dune");
        assert!(b.author_name.is_empty());
        assert!(b.cover_i.is_none());
        assert!(b.subject.is_empty());
    }

    #[test]
    fn test_search_response_defaults() {
        let r: SearchResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(r.docs.is_empty());
        assert_eq!(r.num_found, 0);
    }

    #[test]
    fn test_work_detail_description_string() {
        let w: WorkDetail = serde_json::from_str(
            r#"{"title": "Dune", "description": "A desert planet."}"#,
        )
        .unwrap();
        assert_eq!(w.description.as_deref(), Some("A desert planet."));
    }

    #[test]
    fn test_work_detail_description_object() {
        let w: WorkDetail = serde_json::from_str(
            r#"{"title": "Dune", "description": {"type": "/type/text", "value": "A desert planet."}}"#,
        )
        .unwrap();
        assert_eq!(w.description.as_deref(), Some("A desert planet."));
    }

    #[test]
    fn test_work_detail_description_missing() {
        let w: WorkDetail = serde_json::from_str(r#"{"title": "Dune"}"#).unwrap();
        assert!(w.description.is_none());
    }

    #[test]
    fn test_work_detail_created_naive_timestamp() {
        let w: WorkDetail = serde_json::from_str(
            r#"{"title": "Dune", "created": {"type": "/type/datetime", "value": "2009-12-11T01:57:19.964652"}}"#,
        )
        .unwrap();
        let created = w.created.expect("created should parse");
        assert_eq!(created.timestamp(), 1260496639);
    }

    #[test]
    fn test_work_detail_created_unparseable_degrades() {
        let w: WorkDetail = serde_json::from_str(
            r#"{"title": "Dune", "created": {"type": "/type/datetime", "value": "not a date"}}"#,
        )
        .unwrap();
        assert!(w.created.is_none());
    }

    #[test]
    fn test_work_detail_genres_capped() {
        let subjects: Vec<String> = (0..15).map(|i| format!("subject-{}", i)).collect();
        let w = WorkDetail {
            title: "T".to_string(),
            authors: vec![],
            covers: vec![],
            subjects,
            description: None,
            first_publish_date: None,
            created: None,
        };
        assert_eq!(w.genres().len(), GENRES_SHOWN);
        assert_eq!(w.genres()[0], "subject-0");
    }

    #[test]
    fn test_work_detail_author_keys() {
        let w: WorkDetail = serde_json::from_str(
            r#"{"title": "Dune", "authors": [{"author": {"key": "/authors/OL79034A"}}]}"#,
        )
        .unwrap();
        assert_eq!(w.author_keys(), vec!["/authors/OL79034A".to_string()]);
    }

    #[test]
    fn test_primary_cover() {
        let w: WorkDetail =
            serde_json::from_str(r#"{"title": "Dune", "covers": [111, 222]}"#).unwrap();
        assert_eq!(w.primary_cover(), Some(111));
    }

    #[test]
    fn test_cover_size_suffixes() {
        assert_eq!(CoverSize::Small.suffix(), "S");
        assert_eq!(CoverSize::Medium.suffix(), "M");
        assert_eq!(CoverSize::Large.suffix(), "L");
    }
}
