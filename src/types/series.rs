use std::fmt::Display;

use derives::DbTable;
use sqlx::{
    sqlite::{SqliteQueryResult, SqliteRow},
    FromRow, Row, SqliteConnection,
};

use crate::{
    error::ValidationError,
    traits::{CreateTable, DbTable, Insertable, Queryable, Removeable},
    types::{
        author::Author,
        book::Book,
        status::{ReadStatus, SeriesStatus},
        timestamp::{Timestamp, UnsetLast},
        uuid::Uuid,
    },
};

/// A named, author-attributed and ordered collection of books.
///
/// The series owns its books by value; each book points back through its `series_id`.
#[derive(Default, Debug, Clone, PartialEq, Eq, DbTable)]
#[db_table(plural = "series")]
pub struct Series {
    pub id:     Uuid,
    pub name:   String,
    pub status: SeriesStatus,
    pub author: Author,
    pub notes:  String,
    pub books:  Vec<Book>,
}

impl Series {
    pub fn new(
        name: impl Into<String>,
        author: Author,
        status: SeriesStatus,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::new("name", "Empty string not allowed"));
        }
        if author.name.trim().is_empty() {
            return Err(ValidationError::new("author", "Empty string not allowed"));
        }
        Ok(Self {
            id: Uuid::new(),
            name,
            status,
            author,
            notes: String::new(),
            books: vec![],
        })
    }

    pub fn books_with_status(&self, status: ReadStatus) -> impl Iterator<Item = &Book> {
        self.books.iter().filter(move |x| x.read_status == status)
    }

    /// Reading progress summarized over all books.
    pub fn derived_read_status(&self) -> ReadStatus {
        let all = |status| self.books.iter().all(|x| x.read_status == status);
        if all(ReadStatus::NotStarted) {
            ReadStatus::NotStarted
        } else if all(ReadStatus::Completed) {
            ReadStatus::Completed
        } else if all(ReadStatus::Abandoned) {
            ReadStatus::Abandoned
        } else {
            ReadStatus::InProgress
        }
    }

    /// Most recent completion in this series, the "anchor" recommendations rank by.
    ///
    /// `None` if nothing was completed. A completed book without an end date counts as the most
    /// recent possible completion, see [UnsetLast].
    pub fn anchor_date(&self) -> Option<UnsetLast> {
        self.books_with_status(ReadStatus::Completed)
            .map(|x| UnsetLast(x.end_date))
            .max()
    }

    /// End date of the most recently completed book, if it has one.
    pub fn last_read(&self) -> Option<Timestamp> {
        self.anchor_date().and_then(|x| x.0)
    }
}

impl Display for Series {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} by {} [{} books]", self.name, self.author, self.books.len())
    }
}

impl CreateTable for Series {
    async fn create_table(conn: &mut SqliteConnection) -> sqlx::Result<()> {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id TEXT PRIMARY KEY NOT NULL,
                name TEXT NOT NULL,
                status TEXT NOT NULL,
                author_id TEXT NOT NULL,
                notes TEXT NOT NULL DEFAULT '',
                FOREIGN KEY (author_id) REFERENCES {} (id)
            );"#,
            Self::TABLE_NAME,
            Author::TABLE_NAME,
        ))
        .execute(conn)
        .await?;
        Ok(())
    }
}

impl Insertable for Series {
    /// Inserts the series row only, books are inserted one by one.
    async fn insert(&self, conn: &mut SqliteConnection) -> sqlx::Result<SqliteQueryResult> {
        sqlx::query(&format!(
            r#"
            INSERT INTO {} ( id, name, status, author_id, notes )
            VALUES ( ?1, ?2, ?3, ?4, ?5 )
            "#,
            Self::TABLE_NAME
        ))
        .bind(&self.id)
        .bind(&self.name)
        .bind(self.status)
        .bind(&self.author.id)
        .bind(&self.notes)
        .execute(conn)
        .await
    }
}

impl Queryable for Series {
    /// Every series with its author, without books.
    async fn get_all(conn: &mut SqliteConnection) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(&format!(
            r#"
            SELECT s.id, s.name, s.status, s.author_id, s.notes, a.name AS author_name
            FROM {} s
            JOIN {} a ON a.id = s.author_id
            ORDER BY s.rowid;
            "#,
            Self::TABLE_NAME,
            Author::TABLE_NAME,
        ))
        .fetch_all(conn)
        .await
    }
}

impl Removeable for Series {}

impl FromRow<'_, SqliteRow> for Series {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id:     row.try_get("id")?,
            name:   row.try_get("name")?,
            status: row.try_get("status")?,
            author: Author {
                id:   row.try_get("author_id")?,
                name: row.try_get("author_name")?,
            },
            notes:  row.try_get("notes")?,
            books:  vec![],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn series_with(statuses: &[ReadStatus]) -> Series {
        let mut series = Series::new("Laundry Files", Author::new("Charles Stross"), SeriesStatus::InProgress)
            .unwrap();
        for (i, status) in statuses.iter().enumerate() {
            let book = Book::new(series.id, format!("Book {i}"), i as i64 + 1, *status).unwrap();
            series.books.push(book);
        }
        series
    }

    #[test]
    fn derived_status() {
        use ReadStatus::*;
        assert_eq!(series_with(&[]).derived_read_status(), NotStarted);
        assert_eq!(series_with(&[NotStarted, NotStarted]).derived_read_status(), NotStarted);
        assert_eq!(series_with(&[Completed, Completed]).derived_read_status(), Completed);
        assert_eq!(series_with(&[Abandoned]).derived_read_status(), Abandoned);
        assert_eq!(series_with(&[Completed, NotStarted]).derived_read_status(), InProgress);
    }

    #[test]
    fn anchor_is_latest_completion() {
        let mut series = series_with(&[ReadStatus::Completed, ReadStatus::Completed, ReadStatus::NotStarted]);
        series.books[0].end_date = Timestamp::from_ymd(2024, 1, 5);
        series.books[1].end_date = Timestamp::from_ymd(2024, 1, 10);
        series.books[2].end_date = Timestamp::from_ymd(2025, 1, 1);
        assert_eq!(series.last_read(), Timestamp::from_ymd(2024, 1, 10));
        assert_eq!(series_with(&[ReadStatus::NotStarted]).anchor_date(), None);
    }

    #[test]
    fn blank_names_are_rejected() {
        assert_eq!(
            Series::new(" ", Author::new("X"), SeriesStatus::Reading).unwrap_err().field,
            "name"
        );
        assert_eq!(
            Series::new("Culture", Author::new(""), SeriesStatus::Reading).unwrap_err().field,
            "author"
        );
    }
}
