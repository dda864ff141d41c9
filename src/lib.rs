//! # PubMed BibTeX
//!
//! Turns a single PubMed identifier into a BibTeX `@article` entry.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: The citation record and its parts
//! - [`sources`]: PubMed retrieval and XML parsing
//! - [`utils`]: Input validation, HTTP client, field normalization, BibTeX output
//! - [`config`]: Configuration management

pub mod config;
pub mod models;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use models::CitationRecord;
pub use sources::{PubMedSource, SourceError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
