//! Contest registration repository

use sqlx::MySqlConnection;

use crate::{error::AppResult, models::Registration};

/// Repository for contest registration database operations
pub struct RegistrationRepository;

impl RegistrationRepository {
    /// List registration summaries (without `skills`), optionally limited
    pub async fn list(
        conn: &mut MySqlConnection,
        limit: Option<u32>,
    ) -> AppResult<Vec<Registration>> {
        let sql = r#"
            SELECT id, student_name, contest_id, CAST(status AS CHAR) AS status
            FROM contest_registrations
            ORDER BY id
        "#;

        let registrations = match limit {
            Some(limit) => {
                sqlx::query_as::<_, Registration>(&format!("{sql} LIMIT ?"))
                    .bind(limit)
                    .fetch_all(&mut *conn)
                    .await?
            }
            None => {
                sqlx::query_as::<_, Registration>(sql)
                    .fetch_all(&mut *conn)
                    .await?
            }
        };

        Ok(registrations)
    }

    /// List registrations whose `skills` column is not NULL
    ///
    /// Only valid when the table has a `skills` column.
    pub async fn list_with_skills(conn: &mut MySqlConnection) -> AppResult<Vec<Registration>> {
        let registrations = sqlx::query_as::<_, Registration>(
            r#"
            SELECT id, student_name, contest_id,
                CAST(status AS CHAR) AS status,
                CAST(skills AS CHAR) AS skills
            FROM contest_registrations
            WHERE skills IS NOT NULL
            ORDER BY id
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        Ok(registrations)
    }

    /// Update the `skills` value of one registration
    pub async fn update_skills(conn: &mut MySqlConnection, id: i32, skills: &str) -> AppResult<u64> {
        let result = sqlx::query(r#"UPDATE contest_registrations SET skills = ? WHERE id = ?"#)
            .bind(skills)
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }
}
