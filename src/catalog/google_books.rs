use std::time::Duration;

use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use super::{CatalogQuery, CatalogRecord, CatalogSearch};
use crate::{config::CatalogConfig, error::NetworkError};

/// [CatalogSearch] against the Google Books volumes API.
#[derive(Debug, Clone)]
pub struct GoogleBooks {
    client:   reqwest::Client,
    endpoint: String,
}

impl GoogleBooks {
    pub fn new(config: &CatalogConfig) -> Result<Self, NetworkError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    fn url(&self, query: &CatalogQuery) -> Result<Url, NetworkError> {
        let q = format!(
            "intitle:{} inauthor:{}",
            query.title_or_series_hint, query.author_hint
        );
        Url::parse_with_params(
            &self.endpoint,
            &[("q", q), ("maxResults", query.max_results.to_string())],
        )
        .map_err(|e| NetworkError::BadUrl(format!("{}: {e}", self.endpoint)))
    }
}

impl CatalogSearch for GoogleBooks {
    async fn search(&self, query: &CatalogQuery) -> Result<Vec<CatalogRecord>, NetworkError> {
        let url = self.url(query)?;
        debug!("Searching {url}");
        let response = self.client.get(url).send().await?;
        if response.status() != StatusCode::OK {
            return Err(NetworkError::BadResponse(response.status().as_u16()));
        }
        let volumes: Volumes = response.json().await?;
        Ok(volumes.into_records())
    }
}

#[derive(Debug, Default, Deserialize)]
struct Volumes {
    #[serde(default)]
    items: Vec<Volume>,
}

impl Volumes {
    fn into_records(self) -> Vec<CatalogRecord> {
        self.items.into_iter().map(CatalogRecord::from).collect()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Volume {
    #[serde(default)]
    volume_info: VolumeInfo,
    search_info: Option<SearchInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    #[serde(default)]
    title:          String,
    authors:        Option<Vec<String>>,
    description:    Option<String>,
    published_date: Option<String>,
    series_info:    Option<SeriesInfo>,
    image_links:    Option<ImageLinks>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeriesInfo {
    book_display_number: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ImageLinks {
    thumbnail: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchInfo {
    text_snippet: Option<String>,
}

impl From<Volume> for CatalogRecord {
    fn from(volume: Volume) -> Self {
        let info = volume.volume_info;
        Self {
            title:          info.title,
            authors:        info.authors,
            description:    info.description,
            snippet:        volume.search_info.and_then(|x| x.text_snippet),
            published_date: info.published_date,
            series_number:  info.series_info.and_then(|x| x.book_display_number),
            thumbnail:      info
                .image_links
                .and_then(|x| x.thumbnail)
                .map(|x| x.replace("http://", "https://")),
        }
    }
}
