//! Student repository

use sqlx::MySqlConnection;

use crate::{error::AppResult, models::Student};

const SELECT_STUDENTS: &str = r#"
    SELECT id, name,
        CAST(skills AS CHAR) AS skills,
        CAST(achievements AS CHAR) AS achievements
    FROM students
"#;

/// Repository for student database operations
pub struct StudentRepository;

impl StudentRepository {
    /// List students ordered by id, optionally limited
    pub async fn list(conn: &mut MySqlConnection, limit: Option<u32>) -> AppResult<Vec<Student>> {
        let students = match limit {
            Some(limit) => {
                sqlx::query_as::<_, Student>(&format!("{SELECT_STUDENTS} ORDER BY id LIMIT ?"))
                    .bind(limit)
                    .fetch_all(&mut *conn)
                    .await?
            }
            None => {
                sqlx::query_as::<_, Student>(&format!("{SELECT_STUDENTS} ORDER BY id"))
                    .fetch_all(&mut *conn)
                    .await?
            }
        };

        Ok(students)
    }

    /// Find student by ID
    pub async fn find_by_id(conn: &mut MySqlConnection, id: i32) -> AppResult<Option<Student>> {
        let student = sqlx::query_as::<_, Student>(&format!("{SELECT_STUDENTS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(student)
    }

    /// Write both list columns as plain text values
    pub async fn update_lists(
        conn: &mut MySqlConnection,
        id: i32,
        skills: &str,
        achievements: &str,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE students
            SET skills = ?, achievements = ?
            WHERE id = ?
            "#,
        )
        .bind(skills)
        .bind(achievements)
        .bind(id)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Write both list columns, casting the values to JSON on the server
    pub async fn set_json_lists(
        conn: &mut MySqlConnection,
        id: i32,
        skills: &str,
        achievements: &str,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE students
            SET skills = CAST(? AS JSON), achievements = CAST(? AS JSON)
            WHERE id = ?
            "#,
        )
        .bind(skills)
        .bind(achievements)
        .bind(id)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }
}
