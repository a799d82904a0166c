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
        author::Author, rating::Rating, series::Series, status::ReadStatus,
        timestamp::Timestamp, uuid::Uuid,
    },
};

/// One title in a series. Always owned by exactly one [Series], referenced through `series_id`.
#[derive(Default, Debug, Clone, PartialEq, Eq, DbTable)]
pub struct Book {
    pub id:           Uuid,
    pub series_id:    Uuid,
    pub title:        String,
    pub series_order: i64,
    pub read_status:  ReadStatus,
    pub start_date:   Option<Timestamp>,
    pub end_date:     Option<Timestamp>,
    pub rating:       Option<Rating>,
    pub notes:        String,
    pub author:       Option<Author>,
}

impl Book {
    pub fn new(
        series_id: Uuid,
        title: impl Into<String>,
        series_order: i64,
        read_status: ReadStatus,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ValidationError::new("title", "Empty string not allowed"));
        }
        Ok(Self {
            id: Uuid::new(),
            series_id,
            title,
            series_order,
            read_status,
            ..Self::default()
        })
    }

    /// Drops dates and rating that make no sense for the current status: a book that was
    /// never started has no dates, one in progress has no end date or rating yet. A finished or
    /// abandoned book without a start date is taken to have started when it ended.
    pub fn normalize_for_status(&mut self) {
        match self.read_status {
            ReadStatus::NotStarted => {
                self.start_date = None;
                self.end_date = None;
                self.rating = None;
            }
            ReadStatus::InProgress => {
                self.end_date = None;
                self.rating = None;
            }
            ReadStatus::Completed | ReadStatus::Abandoned => {
                if self.start_date.is_none() {
                    self.start_date = self.end_date;
                }
            }
            ReadStatus::WaitingForNextBook => (),
        }
    }

    pub fn author_name(&self) -> Option<&str> {
        self.author.as_ref().map(|x| x.name.as_str())
    }

    /// Position after the last book of the series, stable across deletions.
    pub async fn next_position(conn: &mut SqliteConnection, series_id: &Uuid) -> sqlx::Result<i64> {
        sqlx::query_scalar(&format!(
            "SELECT COALESCE(MAX(position), -1) + 1 FROM {} WHERE series_id = ?1;",
            Self::TABLE_NAME
        ))
        .bind(series_id)
        .fetch_one(conn)
        .await
    }

    pub async fn remove_all_of_series(
        conn: &mut SqliteConnection,
        series_id: &Uuid,
    ) -> sqlx::Result<u64> {
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE series_id = ?1;",
            Self::TABLE_NAME
        ))
        .bind(series_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }
}

impl Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {} [{}]", self.series_order, self.title, self.read_status)
    }
}

impl CreateTable for Book {
    async fn create_table(conn: &mut SqliteConnection) -> sqlx::Result<()> {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {0} (
                id TEXT PRIMARY KEY NOT NULL,
                series_id TEXT NOT NULL,
                position INTEGER NOT NULL,
                title TEXT NOT NULL,
                series_order INTEGER NOT NULL,
                read_status TEXT NOT NULL,
                start_date TEXT,
                end_date TEXT,
                rating INTEGER,
                notes TEXT NOT NULL DEFAULT '',
                author_id TEXT,
                FOREIGN KEY (series_id) REFERENCES {1} (id),
                FOREIGN KEY (author_id) REFERENCES {2} (id)
            );
            CREATE INDEX IF NOT EXISTS {0}_series ON {0} (series_id, position);
            "#,
            Self::TABLE_NAME,
            Series::TABLE_NAME,
            Author::TABLE_NAME,
        ))
        .execute(conn)
        .await?;
        Ok(())
    }
}

impl Insertable for Book {
    /// Appends the book to the end of its series.
    async fn insert(&self, conn: &mut SqliteConnection) -> sqlx::Result<SqliteQueryResult> {
        let position = Self::next_position(&mut *conn, &self.series_id).await?;
        sqlx::query(&format!(
            r#"
            INSERT INTO {} ( id, series_id, position, title, series_order, read_status,
                             start_date, end_date, rating, notes, author_id )
            VALUES ( ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11 )
            "#,
            Self::TABLE_NAME
        ))
        .bind(&self.id)
        .bind(&self.series_id)
        .bind(position)
        .bind(&self.title)
        .bind(self.series_order)
        .bind(self.read_status)
        .bind(self.start_date)
        .bind(self.end_date)
        .bind(self.rating)
        .bind(&self.notes)
        .bind(self.author.as_ref().map(|x| x.id))
        .execute(conn)
        .await
    }
}

impl Queryable for Book {
    /// Every book, grouped by series in the order they were appended.
    async fn get_all(conn: &mut SqliteConnection) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(&format!(
            r#"
            SELECT b.id, b.series_id, b.title, b.series_order, b.read_status, b.start_date,
                   b.end_date, b.rating, b.notes, b.author_id, a.name AS author_name
            FROM {} b
            LEFT JOIN {} a ON a.id = b.author_id
            ORDER BY b.series_id, b.position;
            "#,
            Self::TABLE_NAME,
            Author::TABLE_NAME,
        ))
        .fetch_all(conn)
        .await
    }
}

impl Removeable for Book {}

impl FromRow<'_, SqliteRow> for Book {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        let author_id: Option<Uuid> = row.try_get("author_id")?;
        let author_name: Option<String> = row.try_get("author_name")?;
        Ok(Self {
            id:           row.try_get("id")?,
            series_id:    row.try_get("series_id")?,
            title:        row.try_get("title")?,
            series_order: row.try_get("series_order")?,
            read_status:  row.try_get("read_status")?,
            start_date:   row.try_get("start_date")?,
            end_date:     row.try_get("end_date")?,
            rating:       row.try_get("rating")?,
            notes:        row.try_get("notes")?,
            author:       author_id.zip(author_name).map(|(id, name)| Author { id, name }),
        })
    }
}
