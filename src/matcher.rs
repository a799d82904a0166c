//! Filtering catalog search results down to the books of a local series.
//!
//! Author and snippet comparisons run on folded text: diacritics stripped, lowercased and with
//! every run of non-alphanumeric characters collapsed into a single space. The title check keeps
//! punctuation and spacing as they are.

use std::collections::HashSet;

use tracing::debug;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::{
    catalog::{BookInfo, CatalogQuery, CatalogRecord, CatalogSearch},
    error::{Error, Result},
    library::Library,
    store::Store,
};

/// Tokens of at most this many characters are ignored on the candidate side of
/// [is_contained_in_snippet].
const NOISE_TOKEN_LEN: usize = 2;

pub fn fold(s: &str) -> String {
    let mut folded = String::with_capacity(s.len());
    let mut pending_space = false;
    for c in s.nfd().filter(|c| !is_combining_mark(*c)) {
        if c.is_alphanumeric() {
            if pending_space && !folded.is_empty() {
                folded.push(' ');
            }
            pending_space = false;
            folded.extend(c.to_lowercase());
        } else {
            pending_space = true;
        }
    }
    folded
}

/// Lowercased with diacritics stripped. Punctuation and whitespace are left untouched.
pub fn strip_diacritics_lowercase(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn tokenize(s: &str) -> HashSet<String> {
    fold(s).split(' ').filter(|x| !x.is_empty()).map(String::from).collect()
}

/// Whether any of the record's authors contains `author_name` as a substring.
pub fn matches_author(record: &CatalogRecord, author_name: &str) -> bool {
    let needle = fold(author_name);
    record
        .authors
        .iter()
        .flatten()
        .any(|x| fold(x).contains(&needle))
}

/// Whether every significant token of `candidate` shows up somewhere in `snippet`.
///
/// Order and adjacency are ignored. A missing snippet never contains anything.
pub fn is_contained_in_snippet(candidate: &str, snippet: Option<&str>) -> bool {
    let Some(snippet) = snippet else {
        return false;
    };
    let candidate: HashSet<String> = tokenize(candidate)
        .into_iter()
        .filter(|x| x.chars().count() > NOISE_TOKEN_LEN)
        .collect();
    let snippet = tokenize(snippet);
    candidate.intersection(&snippet).count() >= candidate.len()
}

pub fn is_candidate(record: &CatalogRecord, series_name: &str, author_name: &str) -> bool {
    matches_author(record, author_name)
        && (strip_diacritics_lowercase(&record.title)
            .contains(&strip_diacritics_lowercase(series_name))
            || is_contained_in_snippet(series_name, record.description.as_deref())
            || is_contained_in_snippet(series_name, record.snippet.as_deref()))
}

/// Records that plausibly belong to the series, in their original order. Duplicates are kept.
pub fn filter_candidates(
    series_name: &str,
    author_name: &str,
    records: &[CatalogRecord],
) -> Vec<BookInfo> {
    records
        .iter()
        .filter(|x| {
            let accepted = is_candidate(x, series_name, author_name);
            debug!("Candidate '{}' accepted: {accepted}", x.title);
            accepted
        })
        .map(BookInfo::from)
        .collect()
}

/// Searches the catalog for books of the local series named `series_name`.
pub async fn find_candidates<S: Store, C: CatalogSearch>(
    store: &mut S,
    catalog: &C,
    series_name: &str,
    max_results: u32,
) -> Result<Vec<BookInfo>> {
    let library = Library::load(store).await?;
    let series = library
        .find_series(series_name)
        .ok_or_else(|| Error::NotFound(format!("series '{series_name}'")))?;
    let query = CatalogQuery {
        title_or_series_hint: series.name.clone(),
        author_hint:          series.author.name.clone(),
        max_results,
    };
    let records = catalog.search(&query).await?;
    Ok(filter_candidates(&series.name, &series.author.name, &records))
}
