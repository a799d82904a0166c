//! Searching external book catalogs.

pub mod google_books;

use serde::{Deserialize, Serialize};

use crate::error::NetworkError;

pub use google_books::GoogleBooks;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub title_or_series_hint: String,
    pub author_hint:          String,
    pub max_results:          u32,
}

/// One search hit as the catalog reports it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogRecord {
    pub title:          String,
    pub authors:        Option<Vec<String>>,
    pub description:    Option<String>,
    pub snippet:        Option<String>,
    pub published_date: Option<String>,
    pub series_number:  Option<String>,
    pub thumbnail:      Option<String>,
}

/// A catalog record reduced to what is shown to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookInfo {
    pub title:          String,
    pub authors:        Vec<String>,
    pub description:    Option<String>,
    pub published_date: Option<String>,
    pub series_number:  Option<String>,
    pub thumbnail:      Option<String>,
}

impl From<&CatalogRecord> for BookInfo {
    fn from(record: &CatalogRecord) -> Self {
        Self {
            title:          record.title.clone(),
            authors:        record.authors.clone().unwrap_or_default(),
            description:    record.description.clone(),
            published_date: record.published_date.clone(),
            series_number:  record.series_number.clone(),
            thumbnail:      record.thumbnail.clone(),
        }
    }
}

pub trait CatalogSearch {
    /// Runs a single search. Failures are reported, never turned into an empty result.
    async fn search(&self, query: &CatalogQuery) -> Result<Vec<CatalogRecord>, NetworkError>;
}
