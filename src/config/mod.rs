//! Configuration management.
//!
//! Everything is optional; without a file or environment overrides the
//! built-in defaults are used.
//!
//! # Configuration File Format
//!
//! ```toml
//! eutils_url = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils"
//! user_agent = "pubmed-bibtex/0.1.0"
//! timeout_secs = 30
//! entry_key = "KEY"
//!
//! [[journals]]
//! name = "J Neurosci"
//! abbreviation = "J. Neurosci."
//! ```
//!
//! Scalar keys can also be set with `PUBMED_BIBTEX_`-prefixed environment
//! variables, e.g. `PUBMED_BIBTEX_EUTILS_URL`.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::sources::DEFAULT_EUTILS_URL;
use crate::utils::{CiteOptions, DEFAULT_ENTRY_KEY, DEFAULT_USER_AGENT};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "PUBMED_BIBTEX";

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// E-utilities base URL
    #[serde(default = "default_eutils_url")]
    pub eutils_url: String,

    /// User agent sent with the request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout; none by default
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Placeholder citation key
    #[serde(default = "default_entry_key")]
    pub entry_key: String,

    /// Extra journal abbreviations
    #[serde(default)]
    pub journals: Vec<JournalAbbreviation>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            eutils_url: default_eutils_url(),
            user_agent: default_user_agent(),
            timeout_secs: None,
            entry_key: default_entry_key(),
            journals: Vec::new(),
        }
    }
}

/// A journal name as PubMed writes it and the form to print instead
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JournalAbbreviation {
    pub name: String,
    pub abbreviation: String,
}

impl Config {
    /// Request timeout, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Rendering options derived from this configuration
    pub fn cite_options(&self) -> CiteOptions {
        let journal_overrides: HashMap<String, String> = self
            .journals
            .iter()
            .map(|j| (j.name.clone(), j.abbreviation.clone()))
            .collect();

        CiteOptions {
            entry_key: self.entry_key.clone(),
            journal_overrides,
        }
    }
}

fn default_eutils_url() -> String {
    DEFAULT_EUTILS_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_entry_key() -> String {
    DEFAULT_ENTRY_KEY.to_string()
}

/// Per-user configuration file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pubmed-bibtex").join("config.toml"))
}

/// Load configuration from the per-user file (if present), an explicit
/// file (must exist), and the environment, in increasing precedence.
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    build_config(default_config_path().as_deref(), path)
}

fn build_config(
    user_file: Option<&Path>,
    explicit_file: Option<&Path>,
) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();

    let vars = std::env::vars_os().map(|(key, value)| {
        (
            key.to_string_lossy().into_owned(),
            value.to_string_lossy().into_owned(),
        )
    });
    for source in applied_sources(user_file, explicit_file, vars) {
        tracing::info!(%source, "Applying configuration source");
    }

    if let Some(user_file) = user_file {
        builder = builder.add_source(
            config::File::from(user_file)
                .format(config::FileFormat::Toml)
                .required(false),
        );
    }

    if let Some(explicit_file) = explicit_file {
        builder = builder.add_source(
            config::File::from(explicit_file).format(config::FileFormat::Toml),
        );
    }

    builder
        .add_source(config::Environment::with_prefix(ENV_PREFIX))
        .build()?
        .try_deserialize()
}

/// Describe the configuration sources that will change the defaults:
/// files that exist and `PUBMED_BIBTEX_*` variables that are set.
fn applied_sources(
    user_file: Option<&Path>,
    explicit_file: Option<&Path>,
    vars: impl Iterator<Item = (String, String)>,
) -> Vec<String> {
    let mut sources = Vec::new();

    if let Some(user_file) = user_file.filter(|path| path.is_file()) {
        sources.push(format!("file {}", user_file.display()));
    }
    if let Some(explicit_file) = explicit_file {
        sources.push(format!("file {}", explicit_file.display()));
    }

    let prefix = format!("{}_", ENV_PREFIX);
    let mut env_keys: Vec<String> = vars
        .map(|(key, _)| key)
        .filter(|key| key.starts_with(&prefix))
        .collect();
    env_keys.sort();
    sources.extend(env_keys.into_iter().map(|key| format!("environment {}", key)));

    sources
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.eutils_url, DEFAULT_EUTILS_URL);
        assert_eq!(config.entry_key, "KEY");
        assert!(config.timeout().is_none());
        assert!(config.cite_options().journal_overrides.is_empty());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
eutils_url = "http://127.0.0.1:9999/eutils"
timeout_secs = 15
entry_key = "CITEKEY"

[[journals]]
name = "J Neurosci"
abbreviation = "J. Neurosci."
"#
        )
        .unwrap();

        let config = build_config(None, Some(file.path())).unwrap();
        assert_eq!(config.eutils_url, "http://127.0.0.1:9999/eutils");
        assert_eq!(config.timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.entry_key, "CITEKEY");
        assert_eq!(
            config.journals,
            vec![JournalAbbreviation {
                name: "J Neurosci".to_string(),
                abbreviation: "J. Neurosci.".to_string(),
            }]
        );

        let options = config.cite_options();
        assert_eq!(options.entry_key, "CITEKEY");
        assert_eq!(
            options.journal_overrides.get("J Neurosci").map(String::as_str),
            Some("J. Neurosci.")
        );
    }

    #[test]
    fn test_missing_user_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let config = build_config(Some(&dir.path().join("absent.toml")), None).unwrap();
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(build_config(None, Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn test_applied_sources_lists_files_and_env_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let user_file = dir.path().join("config.toml");
        std::fs::write(&user_file, "entry_key = \"X\"\n").unwrap();
        let explicit = PathBuf::from("/etc/pubmed-bibtex.toml");

        let vars = vec![
            ("PUBMED_BIBTEX_ENTRY_KEY".to_string(), "stray".to_string()),
            ("HOME".to_string(), "/root".to_string()),
            ("PUBMED_BIBTEX_EUTILS_URL".to_string(), "http://x".to_string()),
        ];
        let sources = applied_sources(Some(&user_file), Some(&explicit), vars.into_iter());

        assert_eq!(
            sources,
            vec![
                format!("file {}", user_file.display()),
                "file /etc/pubmed-bibtex.toml".to_string(),
                "environment PUBMED_BIBTEX_ENTRY_KEY".to_string(),
                "environment PUBMED_BIBTEX_EUTILS_URL".to_string(),
            ]
        );
    }

    #[test]
    fn test_applied_sources_skips_absent_user_file() {
        let dir = tempfile::tempdir().unwrap();
        let sources = applied_sources(
            Some(&dir.path().join("absent.toml")),
            None,
            std::iter::empty(),
        );
        assert!(sources.is_empty());
    }

    #[test]
    fn test_default_config_path() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("pubmed-bibtex/config.toml"));
        }
    }
}
