use std::fmt::Display;

use derives::DbTable;
use sqlx::{sqlite::SqliteQueryResult, FromRow, SqliteConnection};

use crate::{
    traits::{CreateTable, DbTable, Insertable, Queryable, Removeable},
    types::uuid::Uuid,
};

/// A writer, identified by the exact spelling of their name.
///
/// Names are compared byte for byte: "Charles Stross" and "charles stross" are two authors.
#[derive(Default, Debug, Clone, PartialEq, Eq, FromRow, DbTable)]
pub struct Author {
    pub id:   Uuid,
    pub name: String,
}

impl Author {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id:   Uuid::new(),
            name: name.into(),
        }
    }

    pub async fn get_by_name(conn: &mut SqliteConnection, name: &str) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT id, name FROM {} WHERE name = ?1 ORDER BY rowid LIMIT 1;",
            Self::TABLE_NAME
        ))
        .bind(name)
        .fetch_optional(conn)
        .await
    }
}

impl Display for Author {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl CreateTable for Author {
    async fn create_table(conn: &mut SqliteConnection) -> sqlx::Result<()> {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {0} (
                id TEXT PRIMARY KEY NOT NULL,
                name TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS {0}_name ON {0} (name);
            "#,
            Self::TABLE_NAME
        ))
        .execute(conn)
        .await?;
        Ok(())
    }
}

impl Insertable for Author {
    async fn insert(&self, conn: &mut SqliteConnection) -> sqlx::Result<SqliteQueryResult> {
        sqlx::query(&format!(
            r#"
            INSERT INTO {} ( id, name )
            VALUES ( ?1, ?2 )
            "#,
            Self::TABLE_NAME
        ))
        .bind(&self.id)
        .bind(&self.name)
        .execute(conn)
        .await
    }
}

impl Queryable for Author {
    async fn get_all(conn: &mut SqliteConnection) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT id, name FROM {} ORDER BY rowid;",
            Self::TABLE_NAME
        ))
        .fetch_all(conn)
        .await
    }
}

impl Removeable for Author {}
