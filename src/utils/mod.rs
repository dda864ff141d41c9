//! Utility modules supporting citation generation.
//!
//! - [`validate_pmid`]: Check a command-line PubMed ID
//! - [`HttpClient`]: Shared HTTP client
//! - [`format_initials`], [`format_surname`], [`format_title`], [`format_journal`]:
//!   Field normalization
//! - [`format_bibtex`]: Render a record as a BibTeX entry
//!
//! # Rendering a record
//!
//! ```rust
//! use pubmed_bibtex::models::{Author, CitationRecord, Pages};
//! use pubmed_bibtex::utils::{format_bibtex, CiteOptions};
//!
//! let record = CitationRecord {
//!     pmid: "13882203".to_string(),
//!     authors: vec![Author::person("FH", "CRICK")],
//!     title: "General nature of the genetic code for proteins.".to_string(),
//!     journal: "Nature".to_string(),
//!     year: "1961".to_string(),
//!     volume: "192".to_string(),
//!     pages: Pages::Single("1227".to_string()),
//!     pmcid: None,
//!     doi: None,
//! };
//!
//! let bibtex = format_bibtex(&record, &CiteOptions::default());
//! assert!(bibtex.contains("author = {F. H. Crick},"));
//! ```

mod cite;
mod http;
mod normalize;
mod validate;

pub use cite::{format_bibtex, CiteOptions, DEFAULT_ENTRY_KEY};
pub use http::{HttpClient, DEFAULT_USER_AGENT};
pub use normalize::{format_initials, format_journal, format_surname, format_title};
pub use validate::{validate_pmid, ValidationError};
