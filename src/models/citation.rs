//! Citation record assembled from a single PubMed article.
//!
//! Values are kept as PubMed delivers them (upper-case initials, raw title,
//! ISO journal abbreviation). Display normalization happens when the record
//! is rendered, see [`crate::utils::format_bibtex`].

use std::fmt;

/// An entry of the article's author list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Author {
    /// Individual author with PubMed-style initials ("FH") and surname.
    Person { initials: String, surname: String },
    /// Group author such as a consortium.
    Collective(String),
}

impl Author {
    pub fn person(initials: impl Into<String>, surname: impl Into<String>) -> Self {
        Author::Person {
            initials: initials.into(),
            surname: surname.into(),
        }
    }
}

/// Where the article sits in its issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pages {
    /// Start page only
    Single(String),
    /// Start and end page
    Range { start: String, end: String },
    /// Electronic locator (PII) for articles without page numbers
    Locator(String),
}

impl fmt::Display for Pages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pages::Single(page) => write!(f, "{}", page),
            Pages::Range { start, end } => write!(f, "{}--{}", start, end),
            Pages::Locator(pii) => write!(f, "{}", pii),
        }
    }
}

/// Bibliographic fields for one publication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationRecord {
    /// PubMed identifier the record was fetched with
    pub pmid: String,
    /// Authors in source order, never empty
    pub authors: Vec<Author>,
    pub title: String,
    /// Journal abbreviation as stored by PubMed
    pub journal: String,
    pub year: String,
    pub volume: String,
    pub pages: Pages,
    /// PubMed Central identifier
    pub pmcid: Option<String>,
    pub doi: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_display() {
        assert_eq!(Pages::Single("1227".to_string()).to_string(), "1227");
        assert_eq!(
            Pages::Range {
                start: "1227".to_string(),
                end: "1232".to_string()
            }
            .to_string(),
            "1227--1232"
        );
        assert_eq!(Pages::Locator("e02131".to_string()).to_string(), "e02131");
    }

    #[test]
    fn test_author_person_constructor() {
        assert_eq!(
            Author::person("FH", "CRICK"),
            Author::Person {
                initials: "FH".to_string(),
                surname: "CRICK".to_string()
            }
        );
    }
}
