use sqlx::{sqlite::SqliteQueryResult, SqliteConnection};

/// Naming of the sqlite table backing a type, usually implemented through `#[derive(DbTable)]`.
pub trait DbTable {
    const TABLE_NAME: &'static str;
}

pub trait CreateTable {
    async fn create_table(conn: &mut SqliteConnection) -> sqlx::Result<()>;
}

pub trait Insertable {
    async fn insert(&self, conn: &mut SqliteConnection) -> sqlx::Result<SqliteQueryResult>;
}

pub trait Queryable: Sized {
    async fn get_all(conn: &mut SqliteConnection) -> sqlx::Result<Vec<Self>>;
}

pub trait Removeable: DbTable {
    async fn remove_all(conn: &mut SqliteConnection) -> sqlx::Result<u64> {
        let result = sqlx::query(&format!("DELETE FROM {};", Self::TABLE_NAME))
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }

    async fn remove_by_id(
        conn: &mut SqliteConnection,
        id: &crate::types::uuid::Uuid,
    ) -> sqlx::Result<bool> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = ?1;", Self::TABLE_NAME))
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{author::Author, book::Book, series::Series};
    use pretty_assertions::assert_eq;

    #[test]
    fn table_names_are_plural() {
        assert_eq!(Author::TABLE_NAME, "authors");
        assert_eq!(Book::TABLE_NAME, "books");
        assert_eq!(Series::TABLE_NAME, "series");
    }
}
