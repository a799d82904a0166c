use std::{collections::HashMap, path::Path, str::FromStr};

use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    Pool, Sqlite, SqliteConnection, SqlitePool, Transaction,
};
use tracing::debug;

use super::{Entity, EntityKind, Store};
use crate::{
    error::PersistenceError,
    traits::{CreateTable, Insertable, Queryable, Removeable},
    types::{author::Author, book::Book, series::Series, uuid::Uuid},
};

/// [Store] backed by a sqlite database.
///
/// Every operation runs inside one transaction that is opened on first use and committed by
/// [Store::save]. Dropping the store without saving rolls the transaction back, so a failed
/// import leaves the previous library in place.
pub struct SqliteStore {
    pool: SqlitePool,
    tx:   Option<Transaction<'static, Sqlite>>,
}

impl SqliteStore {
    /// Opens (creating if needed) the database file at `filename`.
    pub async fn connect(filename: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let pool = Pool::connect_with(
            SqliteConnectOptions::new()
                .filename(filename)
                .journal_mode(SqliteJournalMode::Wal)
                .create_if_missing(true),
        )
        .await?;
        Self::from_pool(pool).await
    }

    /// A private database that lives as long as the store.
    pub async fn in_memory() -> Result<Self, PersistenceError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(SqliteConnectOptions::from_str("sqlite::memory:")?)
            .await?;
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, PersistenceError> {
        let mut store = Self { pool, tx: None };
        store.create_tables().await?;
        Ok(store)
    }

    async fn create_tables(&mut self) -> Result<(), PersistenceError> {
        let mut conn = self.pool.acquire().await?;
        Author::create_table(&mut conn).await?;
        Series::create_table(&mut conn).await?;
        Book::create_table(&mut conn).await?;
        Ok(())
    }

    async fn conn(&mut self) -> Result<&mut SqliteConnection, PersistenceError> {
        if self.tx.is_none() {
            self.tx = Some(self.pool.begin().await?);
        }
        match self.tx.as_mut() {
            Some(tx) => Ok(&mut **tx),
            None => Err(PersistenceError::new("no open transaction")),
        }
    }
}

impl Store for SqliteStore {
    async fn find_author_by_name(&mut self, name: &str) -> Result<Option<Author>, PersistenceError> {
        Ok(Author::get_by_name(self.conn().await?, name).await?)
    }

    async fn insert(&mut self, entity: Entity) -> Result<(), PersistenceError> {
        let conn = self.conn().await?;
        match &entity {
            Entity::Author(author) => author.insert(conn).await?,
            Entity::Series(series) => series.insert(conn).await?,
            Entity::Book(book) => book.insert(conn).await?,
        };
        Ok(())
    }

    async fn delete_all(&mut self, kind: EntityKind) -> Result<u64, PersistenceError> {
        let conn = self.conn().await?;
        let removed = match kind {
            EntityKind::Author => Author::remove_all(conn).await?,
            EntityKind::Series => {
                Book::remove_all(&mut *conn).await?;
                Series::remove_all(conn).await?
            }
            EntityKind::Book => Book::remove_all(conn).await?,
        };
        debug!("Deleted {removed} rows of {kind}.");
        Ok(removed)
    }

    async fn delete_series(&mut self, id: &Uuid) -> Result<bool, PersistenceError> {
        let conn = self.conn().await?;
        Book::remove_all_of_series(&mut *conn, id).await?;
        Ok(Series::remove_by_id(conn, id).await?)
    }

    async fn delete_book(&mut self, id: &Uuid) -> Result<bool, PersistenceError> {
        Ok(Book::remove_by_id(self.conn().await?, id).await?)
    }

    async fn save(&mut self) -> Result<(), PersistenceError> {
        if let Some(tx) = self.tx.take() {
            tx.commit().await?;
            debug!("Committed transaction.");
        }
        Ok(())
    }

    async fn authors(&mut self) -> Result<Vec<Author>, PersistenceError> {
        Ok(Author::get_all(self.conn().await?).await?)
    }

    async fn series(&mut self) -> Result<Vec<Series>, PersistenceError> {
        let conn = self.conn().await?;
        let mut series = Series::get_all(&mut *conn).await?;
        let mut books: HashMap<Uuid, Vec<Book>> = HashMap::new();
        for book in Book::get_all(conn).await? {
            books.entry(book.series_id).or_default().push(book);
        }
        for s in series.iter_mut() {
            s.books = books.remove(&s.id).unwrap_or_default();
        }
        Ok(series)
    }

    async fn books(&mut self) -> Result<Vec<Book>, PersistenceError> {
        Ok(Book::get_all(self.conn().await?).await?)
    }
}
