//! Bibliographic record sources.
//!
//! Only PubMed is supported: [`PubMedSource`] fetches one article through
//! the NCBI E-utilities `efetch` endpoint and turns it into a
//! [`CitationRecord`](crate::models::CitationRecord).

mod pubmed;

pub use pubmed::{parse_fetch_response, PubMedSource, DEFAULT_EUTILS_URL};

use thiserror::Error;

/// Errors raised while retrieving or reading a record
#[derive(Error, Debug)]
pub enum SourceError {
    /// Network or HTTP transport error
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success response from the service
    #[error("API error: {0}")]
    Api(String),

    /// Response body is not a readable PubMed document
    #[error("Parse error: {0}")]
    Parse(String),

    /// A field every citation needs is absent from the record
    #[error("Record is missing required field: {0}")]
    MissingField(&'static str),

    /// Neither pagination nor an electronic locator is present
    #[error("Record has neither pagination nor a PII location id")]
    UnresolvedPages,

    /// The response holds no article for the requested ID
    #[error("No PubMed record for ID {0}")]
    NotFound(String),

    /// Bad source configuration (e.g. base URL)
    #[error("Configuration error: {0}")]
    Config(String),
}

