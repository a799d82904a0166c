use tracing::debug;

use super::{Entity, EntityKind, Store};
use crate::{
    error::PersistenceError,
    types::{author::Author, book::Book, series::Series, uuid::Uuid},
};

#[derive(Debug, Clone, Default)]
struct Contents {
    authors: Vec<Author>,
    series:  Vec<Series>,
}

impl Contents {
    fn is_author_referenced(&self, id: &Uuid) -> bool {
        self.series.iter().any(|s| {
            s.author.id == *id
                || s.books
                    .iter()
                    .any(|b| b.author.as_ref().is_some_and(|a| a.id == *id))
        })
    }
}

/// [Store] that keeps everything in memory.
///
/// The first mutation after a save works on a copy of the committed contents, [Store::save]
/// swaps that copy in. Dropping the store throws pending changes away.
#[derive(Debug, Default)]
pub struct MemoryStore {
    committed: Contents,
    pending:   Option<Contents>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_pending_changes(&self) -> bool {
        self.pending.is_some()
    }

    fn current(&self) -> &Contents {
        self.pending.as_ref().unwrap_or(&self.committed)
    }

    fn staged(&mut self) -> &mut Contents {
        self.pending.get_or_insert_with(|| self.committed.clone())
    }
}

impl Store for MemoryStore {
    async fn find_author_by_name(&mut self, name: &str) -> Result<Option<Author>, PersistenceError> {
        Ok(self.current().authors.iter().find(|x| x.name == name).cloned())
    }

    async fn insert(&mut self, entity: Entity) -> Result<(), PersistenceError> {
        let contents = self.staged();
        match entity {
            Entity::Author(author) => contents.authors.push(author),
            Entity::Series(mut series) => {
                series.books.clear();
                contents.series.push(series);
            }
            Entity::Book(book) => {
                let Some(series) = contents.series.iter_mut().find(|x| x.id == book.series_id)
                else {
                    return Err(PersistenceError::new(format!(
                        "Book '{}' belongs to unknown series {}",
                        book.title, book.series_id
                    )));
                };
                series.books.push(book);
            }
        }
        Ok(())
    }

    async fn delete_all(&mut self, kind: EntityKind) -> Result<u64, PersistenceError> {
        let contents = self.staged();
        let removed = match kind {
            EntityKind::Author => {
                if let Some(author) = contents
                    .authors
                    .iter()
                    .find(|x| contents.is_author_referenced(&x.id))
                {
                    return Err(PersistenceError::new(format!(
                        "Author '{}' is still referenced",
                        author.name
                    )));
                }
                std::mem::take(&mut contents.authors).len()
            }
            EntityKind::Series => std::mem::take(&mut contents.series).len(),
            EntityKind::Book => contents
                .series
                .iter_mut()
                .map(|x| std::mem::take(&mut x.books).len())
                .sum(),
        };
        debug!("Deleted {removed} entries of {kind}.");
        Ok(removed as u64)
    }

    async fn delete_series(&mut self, id: &Uuid) -> Result<bool, PersistenceError> {
        let contents = self.staged();
        let before = contents.series.len();
        contents.series.retain(|x| x.id != *id);
        Ok(contents.series.len() != before)
    }

    async fn delete_book(&mut self, id: &Uuid) -> Result<bool, PersistenceError> {
        let contents = self.staged();
        for series in contents.series.iter_mut() {
            if let Some(i) = series.books.iter().position(|x| x.id == *id) {
                series.books.remove(i);
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn save(&mut self) -> Result<(), PersistenceError> {
        if let Some(pending) = self.pending.take() {
            self.committed = pending;
            debug!("Committed pending changes.");
        }
        Ok(())
    }

    async fn authors(&mut self) -> Result<Vec<Author>, PersistenceError> {
        Ok(self.current().authors.clone())
    }

    async fn series(&mut self) -> Result<Vec<Series>, PersistenceError> {
        Ok(self.current().series.clone())
    }

    async fn books(&mut self) -> Result<Vec<Book>, PersistenceError> {
        Ok(self
            .current()
            .series
            .iter()
            .flat_map(|x| x.books.iter().cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::status::{ReadStatus, SeriesStatus};
    use pretty_assertions::assert_eq;

    async fn store_with_series() -> (MemoryStore, Series) {
        let mut store = MemoryStore::new();
        let author = Author::new("Iain M. Banks");
        let series = Series::new("Culture", author.clone(), SeriesStatus::Reading).unwrap();
        store.insert(author.into()).await.unwrap();
        store.insert(series.clone().into()).await.unwrap();
        for (i, title) in ["Consider Phlebas", "The Player of Games"].iter().enumerate() {
            let book = Book::new(series.id, *title, i as i64 + 1, ReadStatus::NotStarted).unwrap();
            store.insert(book.into()).await.unwrap();
        }
        (store, series)
    }

    #[tokio::test]
    async fn changes_are_visible_before_save() {
        let (mut store, _) = store_with_series().await;
        assert!(store.has_pending_changes());
        let series = store.series().await.unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].books[1].title, "The Player of Games");
    }

    #[tokio::test]
    async fn unsaved_changes_are_discarded() {
        let (mut store, _) = store_with_series().await;
        store.save().await.unwrap();
        store.delete_all(EntityKind::Book).await.unwrap();
        assert_eq!(store.books().await.unwrap().len(), 0);

        let mut reopened = MemoryStore {
            committed: store.committed.clone(),
            pending:   None,
        };
        assert_eq!(reopened.books().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn orphan_books_are_rejected() {
        let mut store = MemoryStore::new();
        let book = Book::new(Uuid::new(), "Excession", 5, ReadStatus::NotStarted).unwrap();
        assert!(store.insert(book.into()).await.is_err());
    }

    #[tokio::test]
    async fn referenced_authors_cannot_be_deleted() {
        let (mut store, series) = store_with_series().await;
        assert!(store.delete_all(EntityKind::Author).await.is_err());
        assert!(store.delete_series(&series.id).await.unwrap());
        assert_eq!(store.delete_all(EntityKind::Author).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn deleting_a_single_book() {
        let (mut store, _) = store_with_series().await;
        let id = store.books().await.unwrap()[0].id;
        assert!(store.delete_book(&id).await.unwrap());
        assert!(!store.delete_book(&id).await.unwrap());
        assert_eq!(store.books().await.unwrap().len(), 1);
    }
}
