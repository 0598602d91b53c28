//! Reference (bibliographic record) domain model.
//!
//! # Responsibility
//! - Define the canonical bibliographic record and its type enum.
//! - Keep decoding lenient: absent fields fall back to empty defaults.
//!
//! # Invariants
//! - `id` is unique within the reference store and never reused.
//! - `context_ids` / `related_ids` only point at live records once stored;
//!   cascading deletes keep them clean.
//! - Empty `publisher` / `url` / `comments` mean "not set".

use crate::model::context::ContextId;
use chrono::Datelike;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// Identifier of a reference. `0` is the unassigned marker.
pub type ReferenceId = i64;

/// Kind of bibliographic source.
///
/// Serialized as the exact capitalized variant name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceType {
    #[default]
    Book,
    WebResource,
    Article,
    Video,
    Audio,
}

impl ReferenceType {
    /// All variants in declaration order.
    pub const ALL: [ReferenceType; 5] = [
        ReferenceType::Book,
        ReferenceType::WebResource,
        ReferenceType::Article,
        ReferenceType::Video,
        ReferenceType::Audio,
    ];

    /// Wire name of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Book => "Book",
            Self::WebResource => "WebResource",
            Self::Article => "Article",
            Self::Video => "Video",
            Self::Audio => "Audio",
        }
    }

    /// Parses a wire name; anything unrecognized is treated as `Book`.
    pub fn parse_lenient(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .unwrap_or_default()
    }
}

impl Display for ReferenceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical bibliographic record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(default)]
    pub id: ReferenceId,
    /// Serialized as `type`; unknown values decode as `Book`.
    #[serde(rename = "type", default, deserialize_with = "deserialize_kind")]
    pub kind: ReferenceType,
    #[serde(default)]
    pub title: String,
    /// Ordered, comma separated author names.
    #[serde(default)]
    pub authors: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub url: String,
    /// Context membership, serialized as `contexts`.
    #[serde(rename = "contexts", default)]
    pub context_ids: BTreeSet<ContextId>,
    #[serde(default)]
    pub comments: String,
    /// One-directional cross-links, serialized as `related`.
    #[serde(rename = "related", default)]
    pub related_ids: BTreeSet<ReferenceId>,
}

impl Reference {
    /// Creates an unassigned record dated to the current calendar year.
    pub fn new(kind: ReferenceType, title: impl Into<String>, authors: impl Into<String>) -> Self {
        Self {
            id: 0,
            kind,
            title: title.into(),
            authors: authors.into(),
            year: chrono::Local::now().year(),
            publisher: String::new(),
            url: String::new(),
            context_ids: BTreeSet::new(),
            comments: String::new(),
            related_ids: BTreeSet::new(),
        }
    }

    /// Builder-style year override.
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    /// Builder-style publisher override.
    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = publisher.into();
        self
    }

    /// Builder-style URL override.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Builds an unassigned record from loosely shaped JSON.
    ///
    /// Never fails: `id` is ignored, and a missing, `null` or wrong-typed
    /// field takes its default. Non-integer relation entries are skipped.
    pub fn from_json_lenient(value: &Value) -> Self {
        let Some(fields) = value.as_object() else {
            return Self::default();
        };
        let text = |key: &str| {
            fields
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let id_set = |key: &str| -> BTreeSet<i64> {
            fields
                .get(key)
                .and_then(Value::as_array)
                .map(|items| items.iter().filter_map(json_integer).collect())
                .unwrap_or_default()
        };

        Self {
            id: 0,
            kind: fields
                .get("type")
                .and_then(Value::as_str)
                .map(ReferenceType::parse_lenient)
                .unwrap_or_default(),
            title: text("title"),
            authors: text("authors"),
            year: fields
                .get("year")
                .and_then(json_integer)
                .and_then(|year| i32::try_from(year).ok())
                .unwrap_or_default(),
            publisher: text("publisher"),
            url: text("url"),
            context_ids: id_set("contexts"),
            comments: text("comments"),
            related_ids: id_set("related"),
        }
    }

    /// Case-insensitive substring match on title or authors.
    ///
    /// `needle_lower` must already be lowercase.
    pub(crate) fn matches_lowercase(&self, needle_lower: &str) -> bool {
        needle_lower.is_empty()
            || self.title.to_lowercase().contains(needle_lower)
            || self.authors.to_lowercase().contains(needle_lower)
    }
}

impl Default for Reference {
    fn default() -> Self {
        Self {
            id: 0,
            kind: ReferenceType::Book,
            title: String::new(),
            authors: String::new(),
            year: 0,
            publisher: String::new(),
            url: String::new(),
            context_ids: BTreeSet::new(),
            comments: String::new(),
            related_ids: BTreeSet::new(),
        }
    }
}

/// Integer value of a JSON number; integral floats count, strings do not.
fn json_integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|number| number.fract() == 0.0 && number.abs() < i64::MAX as f64)
            .map(|number| number as i64)
    })
}

fn deserialize_kind<'de, D>(deserializer: D) -> Result<ReferenceType, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(match raw {
        Value::String(value) => ReferenceType::parse_lenient(&value),
        _ => ReferenceType::Book,
    })
}
