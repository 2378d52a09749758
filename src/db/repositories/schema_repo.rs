//! Schema and catalog repository
//!
//! Table and column names in DDL cannot be bound as parameters, so every
//! identifier is validated and quoted before it is spliced into SQL.

use sqlx::MySqlConnection;

use crate::{
    error::AppResult,
    models::ColumnInfo,
    utils::validation::{quote_identifier, validate_column_type},
};

/// Repository for catalog lookups and DDL
pub struct SchemaRepository;

impl SchemaRepository {
    /// Columns of a table in the current database, in declaration order
    pub async fn columns(conn: &mut MySqlConnection, table: &str) -> AppResult<Vec<ColumnInfo>> {
        let columns = sqlx::query_as::<_, ColumnInfo>(
            r#"
            SELECT CAST(COLUMN_NAME AS CHAR) AS name,
                CAST(COLUMN_TYPE AS CHAR) AS column_type,
                CAST(IS_NULLABLE AS CHAR) AS nullable
            FROM information_schema.COLUMNS
            WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?
            ORDER BY ORDINAL_POSITION
            "#,
        )
        .bind(table)
        .fetch_all(&mut *conn)
        .await?;

        Ok(columns)
    }

    /// Check whether a table exists in the current database
    pub async fn table_exists(conn: &mut MySqlConnection, table: &str) -> AppResult<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM information_schema.TABLES
            WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?
            "#,
        )
        .bind(table)
        .fetch_one(&mut *conn)
        .await?;

        Ok(count > 0)
    }

    /// Count rows of a table
    pub async fn count_rows(conn: &mut MySqlConnection, table: &str) -> AppResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_identifier(table)?);
        let count = sqlx::query_scalar::<_, i64>(&sql)
            .fetch_one(&mut *conn)
            .await?;

        Ok(count)
    }

    /// Change the declared type of a column
    pub async fn modify_column(
        conn: &mut MySqlConnection,
        table: &str,
        column: &str,
        column_type: &str,
    ) -> AppResult<()> {
        validate_column_type(column_type)?;
        let sql = format!(
            "ALTER TABLE {} MODIFY COLUMN {} {}",
            quote_identifier(table)?,
            quote_identifier(column)?,
            column_type
        );
        sqlx::query(&sql).execute(&mut *conn).await?;

        Ok(())
    }

    /// Add `created_at` / `updated_at` audit columns to a table
    pub async fn add_timestamps(conn: &mut MySqlConnection, table: &str) -> AppResult<()> {
        let sql = format!(
            r#"
            ALTER TABLE {}
            ADD COLUMN created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            ADD COLUMN updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP
            "#,
            quote_identifier(table)?
        );
        sqlx::query(&sql).execute(&mut *conn).await?;

        Ok(())
    }
}
