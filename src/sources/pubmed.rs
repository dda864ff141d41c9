//! PubMed record source using the E-utilities `efetch` endpoint.

use quick_xml::de::from_str;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use serde::Deserialize;
use std::sync::{Arc, LazyLock};
use url::Url;

use crate::models::{Author, CitationRecord, Pages};
use crate::sources::SourceError;
use crate::utils::HttpClient;

/// PubMed E-utilities API base URL
pub const DEFAULT_EUTILS_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}").expect("year pattern is a valid regex"));

/// PubMed record source
///
/// Fetches a single PubMed record and reads the fields a journal-article
/// citation needs.
#[derive(Debug, Clone)]
pub struct PubMedSource {
    client: Arc<HttpClient>,
    base_url: Url,
}

impl PubMedSource {
    /// Create a new PubMed source against the public NCBI service
    pub fn new() -> Result<Self, SourceError> {
        Self::with_client(Arc::new(HttpClient::new()?), DEFAULT_EUTILS_URL)
    }

    /// Create with a custom HTTP client and E-utilities base URL
    pub fn with_client(client: Arc<HttpClient>, base_url: &str) -> Result<Self, SourceError> {
        let parsed = Url::parse(base_url).map_err(|e| {
            SourceError::Config(format!("Invalid E-utilities URL '{}': {}", base_url, e))
        })?;

        if parsed.cannot_be_a_base() {
            return Err(SourceError::Config(format!(
                "E-utilities URL '{}' cannot carry a path",
                base_url
            )));
        }

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    /// Build the efetch URL for one PubMed ID
    pub fn build_fetch_url(&self, pmid: &str) -> Url {
        let mut url = self.base_url.clone();

        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("efetch.fcgi");
        }

        url.query_pairs_mut()
            .append_pair("db", "pubmed")
            .append_pair("id", pmid)
            .append_pair("rettype", "abstract")
            .append_pair("retmode", "xml");

        url
    }

    /// Download the raw efetch XML for one PubMed ID
    pub async fn fetch_xml(&self, pmid: &str) -> Result<String, SourceError> {
        let url = self.build_fetch_url(pmid);
        tracing::debug!(%url, "Fetching PubMed record");

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to fetch PubMed record: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Api(format!(
                "PubMed API returned status: {}",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to read response: {}", e)))?;

        tracing::debug!(%status, bytes = body.len(), "Received PubMed response");
        Ok(body)
    }

    /// Fetch one PubMed record and read it into a citation
    pub async fn fetch_record(&self, pmid: &str) -> Result<CitationRecord, SourceError> {
        let xml = self.fetch_xml(pmid).await?;
        parse_fetch_response(pmid, &xml)
    }
}

#[derive(Debug, Deserialize)]
struct PubmedArticleSet {
    #[serde(rename = "PubmedArticle", default)]
    articles: Vec<PubmedArticle>,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct PubmedArticle {
    MedlineCitation: Option<MedlineCitation>,
    PubmedData: Option<PubmedData>,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct MedlineCitation {
    Article: Option<Article>,
    MedlineJournalInfo: Option<MedlineJournalInfo>,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct Article {
    Journal: Option<Journal>,
    Pagination: Option<Pagination>,
    #[serde(rename = "ELocationID", default)]
    elocation_ids: Vec<ELocationId>,
    AuthorList: Option<AuthorList>,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct Journal {
    JournalIssue: Option<JournalIssue>,
    ISOAbbreviation: Option<String>,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct JournalIssue {
    Volume: Option<String>,
    PubDate: Option<PubDate>,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct PubDate {
    Year: Option<String>,
    MedlineDate: Option<String>,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct Pagination {
    StartPage: Option<String>,
    EndPage: Option<String>,
    MedlinePgn: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ELocationId {
    #[serde(rename = "@EIdType")]
    id_type: String,
    #[serde(rename = "$text", default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct AuthorList {
    #[serde(rename = "Author", default)]
    authors: Vec<AuthorEntry>,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct AuthorEntry {
    LastName: Option<String>,
    Initials: Option<String>,
    CollectiveName: Option<String>,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct MedlineJournalInfo {
    MedlineTA: Option<String>,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct PubmedData {
    ArticleIdList: Option<ArticleIdList>,
}

#[derive(Debug, Deserialize)]
struct ArticleIdList {
    #[serde(rename = "ArticleId", default)]
    ids: Vec<ArticleId>,
}

#[derive(Debug, Deserialize)]
struct ArticleId {
    #[serde(rename = "@IdType")]
    id_type: String,
    #[serde(rename = "$text", default)]
    value: String,
}

/// Parse an efetch response into a citation record.
///
/// Only the first article of the response is read. Every required field
/// that is absent yields [`SourceError::MissingField`] naming it.
pub fn parse_fetch_response(pmid: &str, xml: &str) -> Result<CitationRecord, SourceError> {
    let set: PubmedArticleSet = from_str(xml)
        .map_err(|e| SourceError::Parse(format!("Failed to parse PubMed fetch XML: {}", e)))?;

    let article = set
        .articles
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::NotFound(pmid.to_string()))?;

    let citation = article
        .MedlineCitation
        .ok_or(SourceError::MissingField("MedlineCitation"))?;
    let medline_ta = citation
        .MedlineJournalInfo
        .and_then(|info| info.MedlineTA)
        .and_then(non_empty);
    let details = citation
        .Article
        .ok_or(SourceError::MissingField("Article"))?;

    let authors = extract_authors(details.AuthorList);
    if authors.is_empty() {
        return Err(SourceError::MissingField("author"));
    }

    let title = extract_title(xml)?
        .and_then(non_empty)
        .ok_or(SourceError::MissingField("title"))?;

    let (iso_abbreviation, issue) = match details.Journal {
        Some(journal) => (journal.ISOAbbreviation.and_then(non_empty), journal.JournalIssue),
        None => (None, None),
    };
    let journal = iso_abbreviation
        .or(medline_ta)
        .ok_or(SourceError::MissingField("journal"))?;

    let (volume, pub_date) = match issue {
        Some(issue) => (issue.Volume.and_then(non_empty), issue.PubDate),
        None => (None, None),
    };
    let volume = volume.ok_or(SourceError::MissingField("volume"))?;
    let year = pub_date
        .and_then(extract_year)
        .ok_or(SourceError::MissingField("year"))?;

    let pages = extract_pages(details.Pagination, &details.elocation_ids)?;

    let article_ids = article
        .PubmedData
        .and_then(|data| data.ArticleIdList)
        .map(|list| list.ids)
        .unwrap_or_default();
    let (pmcid, doi) = extract_article_ids(&article_ids);

    Ok(CitationRecord {
        pmid: pmid.to_string(),
        authors,
        title,
        journal,
        year,
        volume,
        pages,
        pmcid,
        doi,
    })
}

/// Text of the first article's `ArticleTitle`, with inline markup such as
/// `<i>`, `<sup>` and `<sub>` flattened to its text.
fn extract_title(xml: &str) -> Result<Option<String>, SourceError> {
    const TITLE_PATH: [&str; 4] = ["PubmedArticle", "MedlineCitation", "Article", "ArticleTitle"];

    let parse_error =
        |e: &dyn std::fmt::Display| SourceError::Parse(format!("Failed to read ArticleTitle: {}", e));

    let mut reader = Reader::from_str(xml);
    let mut path: Vec<String> = Vec::new();
    let mut title_depth: Option<usize> = None;
    let mut title = String::new();

    loop {
        match reader.read_event().map_err(|e| parse_error(&e))? {
            Event::Start(start) => {
                path.push(String::from_utf8_lossy(start.local_name().as_ref()).into_owned());
                let at_title = path.len() >= TITLE_PATH.len()
                    && path[path.len() - TITLE_PATH.len()..]
                        .iter()
                        .zip(TITLE_PATH)
                        .all(|(name, expected)| name == expected);
                if title_depth.is_none() && at_title {
                    title_depth = Some(path.len());
                }
            }
            Event::End(_) => {
                if title_depth == Some(path.len()) {
                    return Ok(Some(title));
                }
                // Only the first article counts
                if path.last().is_some_and(|name| name == "PubmedArticle") {
                    return Ok(None);
                }
                path.pop();
            }
            Event::Text(text) if title_depth.is_some() => {
                title.push_str(&text.unescape().map_err(|e| parse_error(&e))?);
            }
            Event::CData(data) if title_depth.is_some() => {
                title.push_str(&String::from_utf8_lossy(&data));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}

fn extract_authors(list: Option<AuthorList>) -> Vec<Author> {
    list.map(|list| list.authors)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|entry| {
            match (
                entry.LastName.and_then(non_empty),
                entry.CollectiveName.and_then(non_empty),
            ) {
                (Some(surname), _) => Some(Author::Person {
                    initials: entry.Initials.and_then(non_empty).unwrap_or_default(),
                    surname,
                }),
                (None, Some(name)) => Some(Author::Collective(name)),
                (None, None) => {
                    tracing::debug!("Skipping author entry without a name");
                    None
                }
            }
        })
        .collect()
}

fn extract_year(pub_date: PubDate) -> Option<String> {
    if let Some(year) = pub_date.Year.and_then(non_empty) {
        return Some(year);
    }

    // MedlineDate holds free text such as "1998 Dec-1999 Jan"
    pub_date
        .MedlineDate
        .and_then(|date| YEAR_PATTERN.find(&date).map(|m| m.as_str().to_string()))
}

/// Pagination wins over electronic locators; among locators the first PII
/// is used.
fn extract_pages(
    pagination: Option<Pagination>,
    elocation_ids: &[ELocationId],
) -> Result<Pages, SourceError> {
    if let Some(pagination) = pagination {
        let start = pagination.StartPage.and_then(non_empty);
        let end = pagination.EndPage.and_then(non_empty);

        let pages = match (start, end) {
            (Some(start), Some(end)) => Some(Pages::Range { start, end }),
            (Some(start), None) => Some(Pages::Single(start)),
            (None, _) => pagination
                .MedlinePgn
                .and_then(non_empty)
                .map(|pgn| parse_medline_pgn(&pgn)),
        };

        if let Some(pages) = pages {
            tracing::debug!(%pages, "Pages taken from Pagination");
            return Ok(pages);
        }
    }

    let pii = elocation_ids
        .iter()
        .find(|id| id.id_type == "pii")
        .map(|id| id.value.trim())
        .filter(|value| !value.is_empty());

    match pii {
        Some(pii) => {
            tracing::debug!(pii, "Pages taken from PII location id");
            Ok(Pages::Locator(pii.to_string()))
        }
        None => Err(SourceError::UnresolvedPages),
    }
}

/// Read a MEDLINE page string such as "1227-32" as a range "1227"-"1232".
///
/// Only the first range of a multi-part string ("1-5, 9") is kept. Truncated
/// numeric end pages borrow the leading digits of the start page.
fn parse_medline_pgn(pgn: &str) -> Pages {
    let first = pgn.split([',', ';']).next().unwrap_or(pgn).trim();

    let Some((start, end)) = first.split_once('-') else {
        return Pages::Single(first.to_string());
    };
    let (start, end) = (start.trim(), end.trim());

    if start.is_empty() || end.is_empty() {
        return Pages::Single(first.to_string());
    }

    let numeric = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    let end = if numeric(start) && numeric(end) && end.len() < start.len() {
        format!("{}{}", &start[..start.len() - end.len()], end)
    } else {
        end.to_string()
    };

    Pages::Range {
        start: start.to_string(),
        end,
    }
}

/// PMC and DOI from the article id list. A later entry of the same type
/// replaces an earlier one.
fn extract_article_ids(ids: &[ArticleId]) -> (Option<String>, Option<String>) {
    let mut pmcid = None;
    let mut doi = None;

    for id in ids {
        let value = id.value.trim();
        if value.is_empty() {
            continue;
        }
        match id.id_type.as_str() {
            "pmc" => pmcid = Some(value.to_string()),
            "doi" => doi = Some(value.to_string()),
            _ => {}
        }
    }

    (pmcid, doi)
}
