//! Storage seam for the maintenance services
//!
//! Services are written against [`Store`] so they can run against MySQL in
//! production and against in-memory or mocked stores in tests.

use async_trait::async_trait;
use sqlx::{Connection, MySqlConnection};

use crate::{
    db::repositories::{
        RegistrationRepository, SchemaRepository, StudentRepository, UserRepository,
    },
    error::AppResult,
    models::{ColumnInfo, NewUser, Registration, Student, User},
};

/// Operations the maintenance procedures need from the database
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Store: Send {
    // Catalog and DDL
    async fn columns(&mut self, table: &str) -> AppResult<Vec<ColumnInfo>>;
    async fn table_exists(&mut self, table: &str) -> AppResult<bool>;
    async fn count_rows(&mut self, table: &str) -> AppResult<i64>;
    async fn modify_column(&mut self, table: &str, column: &str, column_type: &str)
    -> AppResult<()>;
    async fn add_timestamps(&mut self, table: &str) -> AppResult<()>;

    // Students
    async fn list_students(&mut self, limit: Option<u32>) -> AppResult<Vec<Student>>;
    async fn find_student(&mut self, id: i32) -> AppResult<Option<Student>>;
    async fn update_student_lists(
        &mut self,
        id: i32,
        skills: &str,
        achievements: &str,
    ) -> AppResult<()>;
    async fn set_student_json_lists(
        &mut self,
        id: i32,
        skills: &str,
        achievements: &str,
    ) -> AppResult<()>;

    // Registrations
    async fn list_registrations(&mut self, limit: Option<u32>) -> AppResult<Vec<Registration>>;
    async fn list_registrations_with_skills(&mut self) -> AppResult<Vec<Registration>>;
    async fn update_registration_skills(&mut self, id: i32, skills: &str) -> AppResult<()>;

    // Users
    async fn list_users(&mut self) -> AppResult<Vec<User>>;
    async fn find_user_by_email(&mut self, email: &str) -> AppResult<Option<User>>;
    async fn find_user_by_credentials(
        &mut self,
        email: &str,
        password_digest: &str,
    ) -> AppResult<Option<User>>;
    async fn create_user(&mut self, user: &NewUser) -> AppResult<()>;
    async fn update_user_password(&mut self, email: &str, password_digest: &str)
    -> AppResult<u64>;
}

/// [`Store`] backed by one MySQL connection
pub struct MySqlStore {
    conn: MySqlConnection,
}

impl MySqlStore {
    pub fn new(conn: MySqlConnection) -> Self {
        Self { conn }
    }

    /// Gracefully close the underlying connection
    pub async fn close(self) -> AppResult<()> {
        self.conn.close().await?;
        Ok(())
    }
}

#[async_trait]
impl Store for MySqlStore {
    async fn columns(&mut self, table: &str) -> AppResult<Vec<ColumnInfo>> {
        SchemaRepository::columns(&mut self.conn, table).await
    }

    async fn table_exists(&mut self, table: &str) -> AppResult<bool> {
        SchemaRepository::table_exists(&mut self.conn, table).await
    }

    async fn count_rows(&mut self, table: &str) -> AppResult<i64> {
        SchemaRepository::count_rows(&mut self.conn, table).await
    }

    async fn modify_column(
        &mut self,
        table: &str,
        column: &str,
        column_type: &str,
    ) -> AppResult<()> {
        SchemaRepository::modify_column(&mut self.conn, table, column, column_type).await
    }

    async fn add_timestamps(&mut self, table: &str) -> AppResult<()> {
        SchemaRepository::add_timestamps(&mut self.conn, table).await
    }

    async fn list_students(&mut self, limit: Option<u32>) -> AppResult<Vec<Student>> {
        StudentRepository::list(&mut self.conn, limit).await
    }

    async fn find_student(&mut self, id: i32) -> AppResult<Option<Student>> {
        StudentRepository::find_by_id(&mut self.conn, id).await
    }

    async fn update_student_lists(
        &mut self,
        id: i32,
        skills: &str,
        achievements: &str,
    ) -> AppResult<()> {
        StudentRepository::update_lists(&mut self.conn, id, skills, achievements).await?;
        Ok(())
    }

    async fn set_student_json_lists(
        &mut self,
        id: i32,
        skills: &str,
        achievements: &str,
    ) -> AppResult<()> {
        StudentRepository::set_json_lists(&mut self.conn, id, skills, achievements).await?;
        Ok(())
    }

    async fn list_registrations(&mut self, limit: Option<u32>) -> AppResult<Vec<Registration>> {
        RegistrationRepository::list(&mut self.conn, limit).await
    }

    async fn list_registrations_with_skills(&mut self) -> AppResult<Vec<Registration>> {
        RegistrationRepository::list_with_skills(&mut self.conn).await
    }

    async fn update_registration_skills(&mut self, id: i32, skills: &str) -> AppResult<()> {
        RegistrationRepository::update_skills(&mut self.conn, id, skills).await?;
        Ok(())
    }

    async fn list_users(&mut self) -> AppResult<Vec<User>> {
        UserRepository::list(&mut self.conn).await
    }

    async fn find_user_by_email(&mut self, email: &str) -> AppResult<Option<User>> {
        UserRepository::find_by_email(&mut self.conn, email).await
    }

    async fn find_user_by_credentials(
        &mut self,
        email: &str,
        password_digest: &str,
    ) -> AppResult<Option<User>> {
        UserRepository::find_by_credentials(&mut self.conn, email, password_digest).await
    }

    async fn create_user(&mut self, user: &NewUser) -> AppResult<()> {
        let id = UserRepository::create(&mut self.conn, user).await?;
        tracing::debug!("Inserted user {} ({})", id, user.email);
        Ok(())
    }

    async fn update_user_password(
        &mut self,
        email: &str,
        password_digest: &str,
    ) -> AppResult<u64> {
        UserRepository::update_password(&mut self.conn, email, password_digest).await
    }
}
