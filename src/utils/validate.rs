//! Command-line input validation.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static PMID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("PMID pattern is a valid regex"));

/// Validation error types
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("PubMed ID must not be empty")]
    Empty,

    #[error("PubMed ID must be a decimal number, got '{0}'")]
    NotNumeric(String),
}

/// Validate a PubMed identifier.
///
/// Accepts only ASCII decimal digits; no trimming, signs or separators.
/// Usable directly as a clap `value_parser`.
pub fn validate_pmid(pmid: &str) -> Result<String, ValidationError> {
    if pmid.is_empty() {
        return Err(ValidationError::Empty);
    }

    // `\d` is Unicode-aware, so also require ASCII
    if !pmid.is_ascii() || !PMID_PATTERN.is_match(pmid) {
        return Err(ValidationError::NotNumeric(pmid.to_string()));
    }

    Ok(pmid.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_pmid_valid() {
        assert_eq!(validate_pmid("13882203").unwrap(), "13882203");
        assert_eq!(validate_pmid("1").unwrap(), "1");
        assert_eq!(validate_pmid("000123").unwrap(), "000123");
    }

    #[test]
    fn test_validate_pmid_empty() {
        assert_eq!(validate_pmid(""), Err(ValidationError::Empty));
    }

    #[test]
    fn test_validate_pmid_not_numeric() {
        for bad in ["abc", "123a", " 123", "123 ", "-5", "1.5", "PMC123", "١٢٣"] {
            assert_eq!(
                validate_pmid(bad),
                Err(ValidationError::NotNumeric(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }
}
