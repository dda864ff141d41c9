//! Text normalization applied to PubMed fields before they are rendered.
//!
//! PubMed stores author initials and surnames in upper case for older
//! records, titles in sentence case, and journal names as dot-less ISO
//! abbreviations. The functions here turn those into the forms expected in
//! a BibTeX database.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Short words kept lower case inside a title.
const FUNCTION_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "for", "if", "in", "nor", "of", "off", "on", "or",
    "up", "so", "the", "to", "via", "with", "yet",
];

/// Species epithets, lower case even after a capitalized genus.
const SPECIES_EPITHETS: &[&str] = &[
    "cerevisiae",
    "coli",
    "elegans",
    "furiosus",
    "melanogaster",
    "musculus",
    "sapiens",
];

/// PubMed journal abbreviation -> preferred abbreviation.
const JOURNAL_ABBREVIATIONS: &[(&str, &str)] = &[
    ("Biophys J", "Biophys. J."),
    ("Cell Rep", "Cell Rep."),
    ("Curr Biol", "Curr. Biol."),
    ("Curr Opin Cell Biol", "Curr. Opin. Cell Biol."),
    ("Dev Cell", "Dev. Cell"),
    ("Elife", "eLife"),
    ("EMBO J", "EMBO J."),
    ("Genes Dev", "Genes Dev."),
    ("J Biol Chem", "J. Biol. Chem."),
    ("J Cell Biol", "J. Cell Biol."),
    ("J Cell Sci", "J. Cell Sci."),
    ("J Mol Biol", "J. Mol. Biol."),
    ("Mol Biol Cell", "Mol. Biol. Cell"),
    ("Mol Cell", "Mol. Cell"),
    ("Nat Cell Biol", "Nat. Cell Biol."),
    ("Nat Commun", "Nat. Commun."),
    ("Nat Methods", "Nat. Methods"),
    ("Nat Rev Mol Cell Biol", "Nat. Rev. Mol. Cell Biol."),
    ("Nat Struct Mol Biol", "Nat. Struct. Mol. Biol."),
    ("Nucleic Acids Res", "Nucleic Acids Res."),
    ("PLoS Biol", "PLoS Biol."),
    ("PLoS One", "PLoS ONE"),
    ("Proc Natl Acad Sci U S A", "Proc. Natl. Acad. Sci. USA"),
];

static JOURNALS: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| JOURNAL_ABBREVIATIONS.iter().copied().collect());

/// Format PubMed initials ("SR") as "S. R.".
pub fn format_initials(initials: &str) -> String {
    initials
        .chars()
        .map(|c| format!("{}.", c))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Re-case a surname run by run: "WATTS-TOBIN" becomes "Watts-Tobin".
///
/// Each maximal run of letters gets an upper-case first letter and a
/// lower-case remainder. Everything that is not a letter is copied through.
pub fn format_surname(surname: &str) -> String {
    let mut formatted = String::with_capacity(surname.len());
    let mut run_start = true;

    for ch in surname.chars() {
        if ch.is_alphabetic() {
            if run_start {
                formatted.extend(ch.to_uppercase());
            } else {
                formatted.extend(ch.to_lowercase());
            }
            run_start = false;
        } else {
            formatted.push(ch);
            run_start = true;
        }
    }

    formatted
}

/// Title-case a sentence-case title, brace-protecting what BibTeX styles
/// must not re-case.
///
/// One trailing period is dropped. Words are split on single spaces, so
/// runs of spaces survive the round trip.
pub fn format_title(title: &str) -> String {
    let title = title.strip_suffix('.').unwrap_or(title);

    title
        .split(' ')
        .enumerate()
        .map(|(position, word)| format_title_word(word, position == 0))
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_title_word(word: &str, first: bool) -> String {
    let mut chars = word.chars();
    let Some(head) = chars.next() else {
        return String::new();
    };
    let rest = chars.as_str();

    // Acronyms and gene names: DNA, mRNA, HIV-1
    if rest.chars().filter(|c| c.is_uppercase()).count() > 1 {
        return format!("{{{}}}", word);
    }

    if first {
        return word.to_string();
    }

    if head.is_uppercase() {
        return format!("{{{}}}{}", head, rest);
    }

    let lower = word.to_lowercase();
    if FUNCTION_WORDS.contains(&lower.as_str()) || SPECIES_EPITHETS.contains(&lower.as_str()) {
        return word.to_string();
    }

    capitalize(head, rest)
}

fn capitalize(head: char, rest: &str) -> String {
    let mut word: String = head.to_uppercase().collect();
    word.push_str(&rest.to_lowercase());
    word
}

/// Map a PubMed journal abbreviation to its preferred form.
///
/// `overrides` is consulted before the built-in table; names found in
/// neither are returned unchanged.
pub fn format_journal(name: &str, overrides: &HashMap<String, String>) -> String {
    if let Some(abbreviation) = overrides.get(name) {
        return abbreviation.clone();
    }

    JOURNALS
        .get(name)
        .map_or_else(|| name.to_string(), |abbreviation| abbreviation.to_string())
}
