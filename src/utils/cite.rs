//! BibTeX rendering of a citation record.
//!
//! Produces one `@article` entry per record:
//!
//! ```text
//! @article{KEY,
//!   author = {F. H. Crick and L. Barnett},
//!   title = {General Nature of the Genetic Code for Proteins},
//!   journal = {Nature},
//!   year = 1961,
//!   volume = 192,
//!   pages = {1227--1232},
//!   pmid = 13882203,
//!   url = {https://doi.org/10.1038/1921227a0},
//! }
//! ```
//!
//! `pmcid` and `url` lines are left out when the record has no PMC id or DOI.

use std::collections::HashMap;

use crate::models::{Author, CitationRecord};
use crate::utils::normalize::{format_initials, format_journal, format_surname, format_title};

/// Citation key written when none is configured
pub const DEFAULT_ENTRY_KEY: &str = "KEY";

/// Rendering options
#[derive(Debug, Clone)]
pub struct CiteOptions {
    /// Placeholder citation key, edited by hand afterwards
    pub entry_key: String,
    /// Extra journal abbreviations, checked before the built-in table
    pub journal_overrides: HashMap<String, String>,
}

impl Default for CiteOptions {
    fn default() -> Self {
        Self {
            entry_key: DEFAULT_ENTRY_KEY.to_string(),
            journal_overrides: HashMap::new(),
        }
    }
}

/// Render a record as a BibTeX `@article` entry (no trailing newline).
pub fn format_bibtex(record: &CitationRecord, options: &CiteOptions) -> String {
    let authors = record
        .authors
        .iter()
        .map(format_author)
        .collect::<Vec<_>>()
        .join(" and ");

    let mut lines = vec![
        format!("@article{{{},", options.entry_key),
        braced_field("author", &authors),
        braced_field("title", &format_title(&record.title)),
        braced_field(
            "journal",
            &format_journal(&record.journal, &options.journal_overrides),
        ),
        numeric_field("year", &record.year),
        numeric_field("volume", &record.volume),
        braced_field("pages", &record.pages.to_string()),
        numeric_field("pmid", &record.pmid),
    ];

    if let Some(pmcid) = &record.pmcid {
        lines.push(braced_field("pmcid", pmcid));
    }
    if let Some(doi) = &record.doi {
        lines.push(braced_field("url", &format!("https://doi.org/{}", doi)));
    }

    lines.push("}".to_string());
    lines.join("\n")
}

/// "F. H. Crick" for people, "{Consortium Name}" for group authors.
fn format_author(author: &Author) -> String {
    match author {
        Author::Person { initials, surname } if initials.is_empty() => format_surname(surname),
        Author::Person { initials, surname } => {
            format!("{} {}", format_initials(initials), format_surname(surname))
        }
        Author::Collective(name) => format!("{{{}}}", name),
    }
}

fn braced_field(name: &str, value: &str) -> String {
    format!("  {} = {{{}}},", name, value)
}

/// Bare when the value is all digits, braced otherwise ("192 Suppl").
fn numeric_field(name: &str, value: &str) -> String {
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        format!("  {} = {},", name, value)
    } else {
        braced_field(name, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Pages;

    fn crick_record() -> CitationRecord {
        CitationRecord {
            pmid: "13882203".to_string(),
            authors: vec![
                Author::person("FH", "CRICK"),
                Author::person("L", "BARNETT"),
                Author::person("S", "BRENNER"),
                Author::person("RJ", "WATTS-TOBIN"),
            ],
            title: "General nature of the genetic code for proteins.".to_string(),
            journal: "Nature".to_string(),
            year: "1961".to_string(),
            volume: "192".to_string(),
            pages: Pages::Range {
                start: "1227".to_string(),
                end: "1232".to_string(),
            },
            pmcid: None,
            doi: Some("10.1038/1921227a0".to_string()),
        }
    }

    #[test]
    fn test_format_bibtex_crick() {
        let expected = "@article{KEY,
  author = {F. H. Crick and L. Barnett and S. Brenner and R. J. Watts-Tobin},
  title = {General Nature of the Genetic Code for Proteins},
  journal = {Nature},
  year = 1961,
  volume = 192,
  pages = {1227--1232},
  pmid = 13882203,
  url = {https://doi.org/10.1038/1921227a0},
}";
        assert_eq!(format_bibtex(&crick_record(), &CiteOptions::default()), expected);
    }

    #[test]
    fn test_format_bibtex_optional_fields() {
        let mut record = crick_record();
        record.doi = None;
        let bibtex = format_bibtex(&record, &CiteOptions::default());
        assert!(!bibtex.contains("url"));
        assert!(!bibtex.contains("pmcid"));

        record.pmcid = Some("PMC1234567".to_string());
        record.doi = Some("10.1000/xyz".to_string());
        let bibtex = format_bibtex(&record, &CiteOptions::default());
        let lines: Vec<&str> = bibtex.lines().collect();
        assert_eq!(lines[8], "  pmcid = {PMC1234567},");
        assert_eq!(lines[9], "  url = {https://doi.org/10.1000/xyz},");
        assert_eq!(lines[10], "}");
    }

    #[test]
    fn test_format_bibtex_options() {
        let mut record = crick_record();
        record.journal = "Curr Biol".to_string();

        let mut options = CiteOptions {
            entry_key: "crick1961".to_string(),
            ..CiteOptions::default()
        };
        let bibtex = format_bibtex(&record, &options);
        assert!(bibtex.starts_with("@article{crick1961,\n"));
        assert!(bibtex.contains("  journal = {Curr. Biol.},"));

        options
            .journal_overrides
            .insert("Curr Biol".to_string(), "Current Biology".to_string());
        let bibtex = format_bibtex(&record, &options);
        assert!(bibtex.contains("  journal = {Current Biology},"));
    }

    #[test]
    fn test_format_bibtex_locator_and_braced_volume() {
        let mut record = crick_record();
        record.pages = Pages::Locator("e02131".to_string());
        record.volume = "192 Suppl".to_string();
        let bibtex = format_bibtex(&record, &CiteOptions::default());

        assert!(bibtex.contains("  pages = {e02131},"));
        assert!(bibtex.contains("  volume = {192 Suppl},"));
    }

    #[test]
    fn test_format_author_variants() {
        assert_eq!(format_author(&Author::person("FH", "CRICK")), "F. H. Crick");
        assert_eq!(format_author(&Author::person("", "JONES")), "Jones");
        assert_eq!(
            format_author(&Author::Collective("Human Genome Consortium".to_string())),
            "{Human Genome Consortium}"
        );
    }

    #[test]
    fn test_every_field_line_ends_with_comma() {
        let mut record = crick_record();
        record.pmcid = Some("PMC1".to_string());
        let bibtex = format_bibtex(&record, &CiteOptions::default());
        let lines: Vec<&str> = bibtex.lines().collect();

        for line in &lines[1..lines.len() - 1] {
            assert!(line.ends_with(','), "{line:?}");
        }
    }
}
