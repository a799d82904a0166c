use tracing::info;

use crate::{
    backup::{self, Document},
    error::ImportError,
    identity::resolve_author,
    store::{EntityKind, Store},
    types::{book::Book, series::Series, uuid::Uuid},
};

/// What a successful import created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub series_count: usize,
    pub book_count:   usize,
    pub author_count: usize,
}

/// Replaces the whole library in `store` with the contents of a transfer document.
///
/// The document is decoded completely before anything is deleted, so a [ImportError::Parse]
/// leaves the store as it was.
pub async fn import_document<S: Store>(store: &mut S, bytes: &[u8]) -> Result<ImportSummary, ImportError> {
    let document = backup::decode(bytes)?;
    import(store, document).await
}

/// Full replace from an already decoded document.
pub async fn import<S: Store>(store: &mut S, document: Document) -> Result<ImportSummary, ImportError> {
    for kind in [EntityKind::Book, EntityKind::Series, EntityKind::Author] {
        store.delete_all(kind).await?;
    }

    let mut summary = ImportSummary::default();
    for dto in document {
        let author = resolve_author(store, &dto.authorname).await?;
        let series = Series {
            id: Uuid::new(),
            name: dto.name,
            status: dto.status,
            author,
            notes: dto.notes,
            books: vec![],
        };
        let series_id = series.id;
        store.insert(series.into()).await?;
        summary.series_count += 1;

        for book in dto.books {
            let author = resolve_author(store, &book.authorname).await?;
            let book = Book {
                id: Uuid::new(),
                series_id,
                title: book.title,
                series_order: book.series_order,
                read_status: book.read_status,
                start_date: book.start_date,
                end_date: book.end_date,
                rating: book.rating,
                notes: book.notes,
                author: Some(author),
            };
            store.insert(book.into()).await?;
            summary.book_count += 1;
        }
    }
    summary.author_count = store.authors().await?.len();

    store.save().await?;
    info!(
        "Imported {} series, {} books and {} authors.",
        summary.series_count, summary.book_count, summary.author_count
    );
    Ok(summary)
}
