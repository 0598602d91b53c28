//! Citation dialect renderers.
//!
//! # Responsibility
//! - Render BibTeX entries, Harvard lines and DSTU lines.
//! - Derive BibTeX citation keys from the first author's last name.
//!
//! # Invariants
//! - Optional clauses (publisher, url) appear only when non-empty.
//! - BibTeX output always ends with a newline; Harvard/DSTU never do.

use crate::model::reference::Reference;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

const UNKNOWN_AUTHOR_KEY: &str = "unknown";

/// Supported citation dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CitationFormat {
    BibTex,
    Harvard,
    /// Ukrainian DSTU GOST 7.1:2006 bibliographic description.
    Dstu,
}

impl CitationFormat {
    pub const ALL: [CitationFormat; 3] = [
        CitationFormat::BibTex,
        CitationFormat::Harvard,
        CitationFormat::Dstu,
    ];

    /// Stable identifier used on command lines and in settings.
    pub fn id(self) -> &'static str {
        match self {
            Self::BibTex => "bibtex",
            Self::Harvard => "harvard",
            Self::Dstu => "dstu",
        }
    }

    /// Human-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::BibTex => "BibTeX",
            Self::Harvard => "Harvard",
            Self::Dstu => "DSTU GOST 7.1:2006",
        }
    }

    /// Suggested extension for export files.
    pub fn file_extension(self) -> &'static str {
        match self {
            Self::BibTex => "bib",
            Self::Harvard | Self::Dstu => "txt",
        }
    }
}

impl Display for CitationFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Returned when a format identifier is not one of `bibtex|harvard|dstu`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFormatError(pub String);

impl Display for UnknownFormatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported citation format `{}`; expected bibtex|harvard|dstu",
            self.0
        )
    }
}

impl Error for UnknownFormatError {}

impl FromStr for CitationFormat {
    type Err = UnknownFormatError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.id() == normalized)
            .ok_or(UnknownFormatError(normalized))
    }
}

/// Renders one reference in the requested dialect.
pub fn render(reference: &Reference, format: CitationFormat) -> String {
    match format {
        CitationFormat::BibTex => render_bibtex(reference),
        CitationFormat::Harvard => render_harvard(reference),
        CitationFormat::Dstu => render_dstu(reference),
    }
}

/// Renders one reference in every dialect, in `CitationFormat::ALL` order.
///
/// Backs the side-by-side preview of a selected record.
pub fn render_all(reference: &Reference) -> Vec<(CitationFormat, String)> {
    CitationFormat::ALL
        .into_iter()
        .map(|format| (format, render(reference, format)))
        .collect()
}

/// BibTeX key: lowercase last name of the first author followed by year.
///
/// The first author is the text before the first comma; its last
/// whitespace-separated token is taken as the last name.
pub fn bibtex_key(reference: &Reference) -> String {
    let first_author = reference.authors.split(',').next().unwrap_or("").trim();
    let last_name = WHITESPACE_RE
        .split(first_author)
        .filter(|token| !token.is_empty())
        .last()
        .map(str::to_lowercase)
        .unwrap_or_else(|| UNKNOWN_AUTHOR_KEY.to_string());
    format!("{last_name}{}", reference.year)
}

fn render_bibtex(reference: &Reference) -> String {
    let mut out = format!(
        "@{}{{{},\n",
        reference.kind.as_str().to_lowercase(),
        bibtex_key(reference)
    );
    out.push_str(&format!("  title = {{{}}},\n", reference.title));
    out.push_str(&format!("  author = {{{}}},\n", reference.authors));
    out.push_str(&format!("  year = {{{}}}", reference.year));
    if !reference.publisher.is_empty() {
        out.push_str(&format!(",\n  publisher = {{{}}}", reference.publisher));
    }
    if !reference.url.is_empty() {
        out.push_str(&format!(",\n  url = {{{}}}", reference.url));
    }
    out.push_str("\n}\n");
    out
}

fn render_harvard(reference: &Reference) -> String {
    let mut out = format!(
        "{} ({}) {}",
        reference.authors, reference.year, reference.title
    );
    if !reference.publisher.is_empty() {
        out.push_str(&format!(". {}", reference.publisher));
    }
    if !reference.url.is_empty() {
        out.push_str(&format!(". Available at: {}", reference.url));
    }
    out.push('.');
    out
}

fn render_dstu(reference: &Reference) -> String {
    let mut out = format!("{} {}", reference.authors, reference.title);
    if !reference.publisher.is_empty() {
        out.push_str(&format!(" / {}", reference.publisher));
    }
    out.push_str(&format!(", {}", reference.year));
    if !reference.url.is_empty() {
        out.push_str(&format!(". URL: {}", reference.url));
    }
    out.push('.');
    out
}
