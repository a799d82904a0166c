//! Persistence of the library.
//!
//! A [Store] works like a unit of work: mutations are staged until [Store::save] commits them,
//! reads always see staged changes. Callers are expected to drive one store from a single flow
//! at a time.

pub mod memory;
pub mod sqlite;

use std::fmt::Display;

use crate::{
    error::PersistenceError,
    types::{author::Author, book::Book, series::Series, uuid::Uuid},
};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Author,
    Series,
    Book,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Author => write!(f, "author"),
            EntityKind::Series => write!(f, "series"),
            EntityKind::Book => write!(f, "book"),
        }
    }
}

/// Anything that can be inserted into a [Store].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    Author(Author),
    /// Inserted without its books, those follow as [Entity::Book].
    Series(Series),
    Book(Book),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Author(_) => EntityKind::Author,
            Entity::Series(_) => EntityKind::Series,
            Entity::Book(_) => EntityKind::Book,
        }
    }
}

impl From<Author> for Entity {
    fn from(value: Author) -> Self {
        Entity::Author(value)
    }
}

impl From<Series> for Entity {
    fn from(value: Series) -> Self {
        Entity::Series(value)
    }
}

impl From<Book> for Entity {
    fn from(value: Book) -> Self {
        Entity::Book(value)
    }
}

pub trait Store {
    /// First author whose name equals `name` exactly.
    async fn find_author_by_name(&mut self, name: &str) -> Result<Option<Author>, PersistenceError>;

    /// Adds an entity. A book is appended to the books of the series named by its `series_id`,
    /// which has to exist already.
    async fn insert(&mut self, entity: Entity) -> Result<(), PersistenceError>;

    /// Removes every entity of a kind. Deleting series also deletes their books.
    async fn delete_all(&mut self, kind: EntityKind) -> Result<u64, PersistenceError>;

    /// Deletes a series together with its books. Returns whether it existed.
    async fn delete_series(&mut self, id: &Uuid) -> Result<bool, PersistenceError>;

    async fn delete_book(&mut self, id: &Uuid) -> Result<bool, PersistenceError>;

    /// Commits everything staged since the last save.
    async fn save(&mut self) -> Result<(), PersistenceError>;

    async fn authors(&mut self) -> Result<Vec<Author>, PersistenceError>;

    /// All series in insertion order, each with its author and books.
    async fn series(&mut self) -> Result<Vec<Series>, PersistenceError>;

    async fn books(&mut self) -> Result<Vec<Book>, PersistenceError>;
}
