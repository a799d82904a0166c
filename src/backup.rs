//! The portable transfer document used for backups.
//!
//! The document is a JSON array of series, each carrying its books. Entities are referenced by
//! name instead of id, so ids never survive a round trip.

use serde::{Deserialize, Serialize};
use serde_json::{error::Category, Value};
use serde_path_to_error::{Path, Segment};
use tracing::info;

use crate::{
    error::ParseError,
    types::{
        book::Book,
        rating::Rating,
        series::Series,
        status::{ReadStatus, SeriesStatus},
        timestamp::{Timestamp, EXPECTED_TIMESTAMP},
    },
};

/// Author name written for books that have no author of their own.
pub const NO_AUTHOR: &str = "No Author";

pub type Document = Vec<SeriesDto>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesDto {
    pub name:       String,
    pub status:     SeriesStatus,
    pub authorname: String,
    pub notes:      String,
    pub books:      Vec<BookDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    pub title:        String,
    pub series_order: i64,
    pub read_status:  ReadStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date:   Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date:     Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating:       Option<Rating>,
    pub notes:        String,
    pub authorname:   String,
}

impl From<&Series> for SeriesDto {
    fn from(series: &Series) -> Self {
        Self {
            name:       series.name.clone(),
            status:     series.status,
            authorname: series.author.name.clone(),
            notes:      series.notes.clone(),
            books:      series.books.iter().map(BookDto::from).collect(),
        }
    }
}

impl From<&Book> for BookDto {
    fn from(book: &Book) -> Self {
        Self {
            title:        book.title.clone(),
            series_order: book.series_order,
            read_status:  book.read_status,
            start_date:   book.start_date,
            end_date:     book.end_date,
            rating:       book.rating,
            notes:        book.notes.clone(),
            authorname:   book.author_name().unwrap_or(NO_AUTHOR).to_string(),
        }
    }
}

/// Flattens the series, in the order given, into a transfer document.
pub fn export_to_document(series: &[Series]) -> Document {
    let document: Document = series.iter().map(SeriesDto::from).collect();
    info!(
        "Exported {} series with {} books.",
        document.len(),
        document.iter().map(|x| x.books.len()).sum::<usize>()
    );
    document
}

/// Pretty printed JSON for a document.
pub fn encode(document: &[SeriesDto]) -> Result<String, ParseError> {
    serde_json::to_string_pretty(document).map_err(|e| ParseError::DataCorrupted(e.to_string()))
}

/// Decodes a transfer document without touching any store.
pub fn decode(bytes: &[u8]) -> Result<Document, ParseError> {
    let mut de = serde_json::Deserializer::from_slice(bytes);
    let document: Document =
        serde_path_to_error::deserialize(&mut de).map_err(|e| classify(e, bytes))?;
    de.end().map_err(|e| ParseError::DataCorrupted(e.to_string()))?;
    Ok(document)
}

fn classify(err: serde_path_to_error::Error<serde_json::Error>, bytes: &[u8]) -> ParseError {
    let path = err.path().clone();
    let inner = err.into_inner();
    if inner.classify() != Category::Data {
        return ParseError::DataCorrupted(inner.to_string());
    }
    let message = inner.to_string();
    let message = match message.rfind(" at line ") {
        Some(i) => &message[..i],
        None => message.as_str(),
    };

    if let Some(field) = message
        .strip_prefix("missing field `")
        .and_then(|x| x.strip_suffix('`'))
    {
        return ParseError::MissingKey(join(&path, field));
    }
    if message.contains(EXPECTED_TIMESTAMP) {
        return ParseError::MalformedDate {
            path: path.to_string(),
            raw:  raw_value(bytes, &path).unwrap_or_default(),
        };
    }
    match message.split_once(", expected ") {
        Some((_, expected)) => ParseError::TypeMismatch {
            path:     path.to_string(),
            expected: expected.to_string(),
        },
        None => ParseError::DataCorrupted(message.to_string()),
    }
}

fn join(path: &Path, field: &str) -> String {
    if path.iter().next().is_none() {
        field.to_string()
    } else {
        format!("{path}.{field}")
    }
}

/// The offending value as written in the document.
fn raw_value(bytes: &[u8], path: &Path) -> Option<String> {
    let root: Value = serde_json::from_slice(bytes).ok()?;
    let mut pointer = String::new();
    for segment in path.iter() {
        match segment {
            Segment::Seq { index } => pointer.push_str(&format!("/{index}")),
            Segment::Map { key } => {
                pointer.push('/');
                pointer.push_str(&key.replace('~', "~0").replace('/', "~1"));
            }
            _ => return None,
        }
    }
    match root.pointer(&pointer)? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
