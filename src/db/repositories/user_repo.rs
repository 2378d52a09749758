//! User repository

use sqlx::MySqlConnection;

use crate::{
    error::AppResult,
    models::{NewUser, User},
};

const SELECT_USERS: &str = r#"
    SELECT id, username, email, password, school, student_id, phone, created_at
    FROM users
"#;

/// Repository for user database operations
pub struct UserRepository;

impl UserRepository {
    /// Create a new user
    pub async fn create(conn: &mut MySqlConnection, user: &NewUser) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, email, password, school, student_id, phone)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.school)
        .bind(&user.student_id)
        .bind(&user.phone)
        .execute(&mut *conn)
        .await?;

        Ok(result.last_insert_id())
    }

    /// List all users
    pub async fn list(conn: &mut MySqlConnection) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!("{SELECT_USERS} ORDER BY id"))
            .fetch_all(&mut *conn)
            .await?;

        Ok(users)
    }

    /// Find user by email
    pub async fn find_by_email(conn: &mut MySqlConnection, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("{SELECT_USERS} WHERE email = ?"))
            .bind(email)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(user)
    }

    /// Find user by email and stored digest (login check)
    pub async fn find_by_credentials(
        conn: &mut MySqlConnection,
        email: &str,
        password_digest: &str,
    ) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "{SELECT_USERS} WHERE email = ? AND password = ?"
        ))
        .bind(email)
        .bind(password_digest)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(user)
    }

    /// Update the stored digest of the user with `email`
    pub async fn update_password(
        conn: &mut MySqlConnection,
        email: &str,
        password_digest: &str,
    ) -> AppResult<u64> {
        let result = sqlx::query(r#"UPDATE users SET password = ? WHERE email = ?"#)
            .bind(password_digest)
            .bind(email)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }
}
