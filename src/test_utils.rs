//! Test utilities
//!
//! [`MemoryStore`] is an in-memory [`Store`] that enforces the one MySQL rule
//! the repair procedures depend on: a column declared `JSON` rejects values
//! that do not parse, both on write and when a column is narrowed to `JSON`.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::{
    constants::{column_types, columns, tables},
    db::Store,
    error::{AppError, AppResult},
    models::{ColumnInfo, NewUser, Registration, Student, User},
    normalizer::is_valid_json,
};

/// In-memory store seeded with the competition schema
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub schema: BTreeMap<String, Vec<ColumnInfo>>,
    pub students: Vec<Student>,
    pub registrations: Vec<Registration>,
    pub users: Vec<User>,
    /// Row counts for tables without modelled rows
    pub row_counts: BTreeMap<String, i64>,
    /// Every mutating call, in order
    pub writes: Vec<String>,
    /// Student id whose update fails with a database error
    pub fail_student_update: Option<i32>,
    /// Column whose narrowing to `JSON` fails unconditionally
    pub fail_restore_of: Option<(String, String)>,
}

fn column(name: &str, column_type: &str) -> ColumnInfo {
    ColumnInfo {
        name: name.to_string(),
        column_type: column_type.to_string(),
        nullable: "YES".to_string(),
    }
}

impl MemoryStore {
    /// Store with the competition tables; `experts` does not exist
    pub fn competition() -> Self {
        let mut schema = BTreeMap::new();
        schema.insert(
            tables::STUDENTS.to_string(),
            vec![
                column("id", "int"),
                column("name", "varchar(100)"),
                column(columns::SKILLS, "json"),
                column(columns::ACHIEVEMENTS, "json"),
            ],
        );
        schema.insert(
            tables::REGISTRATIONS.to_string(),
            vec![
                column("id", "int"),
                column("contest_id", "int"),
                column("student_name", "varchar(100)"),
                column(columns::SKILLS, "json"),
                column("status", "enum('pending','approved','rejected')"),
            ],
        );
        schema.insert(
            tables::USERS.to_string(),
            vec![
                column("id", "int"),
                column("email", "varchar(100)"),
                column("password", "varchar(255)"),
            ],
        );
        schema.insert(tables::CONTESTS.to_string(), vec![column("id", "int")]);
        schema.insert(tables::TEAMS.to_string(), vec![column("id", "int")]);

        Self {
            schema,
            ..Self::default()
        }
    }

    pub fn with_student(
        mut self,
        id: i32,
        name: &str,
        skills: Option<&str>,
        achievements: Option<&str>,
    ) -> Self {
        self.students.push(Student {
            id,
            name: name.to_string(),
            skills: skills.map(str::to_string),
            achievements: achievements.map(str::to_string),
        });
        self
    }

    pub fn with_registration(mut self, id: i32, student_name: &str, skills: Option<&str>) -> Self {
        self.registrations.push(Registration {
            id,
            student_name: Some(student_name.to_string()),
            contest_id: Some(1),
            status: Some("pending".to_string()),
            skills: skills.map(str::to_string),
        });
        self
    }

    pub fn without_column(mut self, table: &str, column: &str) -> Self {
        if let Some(cols) = self.schema.get_mut(table) {
            cols.retain(|c| c.name != column);
        }
        self
    }

    pub fn with_table(mut self, table: &str, rows: i64) -> Self {
        self.schema
            .entry(table.to_string())
            .or_insert_with(|| vec![column("id", "int")]);
        self.row_counts.insert(table.to_string(), rows);
        self
    }

    pub fn column_type(&self, table: &str, column: &str) -> Option<String> {
        self.schema
            .get(table)?
            .iter()
            .find(|c| c.name == column)
            .map(|c| c.column_type.clone())
    }

    pub fn student(&self, id: i32) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn registration(&self, id: i32) -> Option<&Registration> {
        self.registrations.iter().find(|r| r.id == id)
    }

    /// Number of recorded row updates (DDL excluded)
    pub fn row_writes(&self) -> usize {
        self.writes.iter().filter(|w| w.starts_with("UPDATE") || w.starts_with("INSERT")).count()
    }

    fn require_table(&self, table: &str) -> AppResult<()> {
        if self.schema.contains_key(table) {
            Ok(())
        } else {
            Err(AppError::Database(format!(
                "Table 'competition_system.{}' doesn't exist",
                table
            )))
        }
    }

    fn check_json(&self, table: &str, column: &str, value: &str) -> AppResult<()> {
        let is_json = self
            .column_type(table, column)
            .is_some_and(|t| t.eq_ignore_ascii_case(column_types::JSON));
        if is_json && !is_valid_json(value) {
            return Err(AppError::Database(format!(
                "Invalid JSON text: \"Invalid value.\" at position 0 in value for column '{}.{}'",
                table, column
            )));
        }
        Ok(())
    }

    fn column_values(&self, table: &str, column: &str) -> Vec<Option<String>> {
        match (table, column) {
            (tables::STUDENTS, columns::SKILLS) => {
                self.students.iter().map(|s| s.skills.clone()).collect()
            }
            (tables::STUDENTS, columns::ACHIEVEMENTS) => {
                self.students.iter().map(|s| s.achievements.clone()).collect()
            }
            (tables::REGISTRATIONS, columns::SKILLS) => {
                self.registrations.iter().map(|r| r.skills.clone()).collect()
            }
            _ => Vec::new(),
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn columns(&mut self, table: &str) -> AppResult<Vec<ColumnInfo>> {
        Ok(self.schema.get(table).cloned().unwrap_or_default())
    }

    async fn table_exists(&mut self, table: &str) -> AppResult<bool> {
        Ok(self.schema.contains_key(table))
    }

    async fn count_rows(&mut self, table: &str) -> AppResult<i64> {
        self.require_table(table)?;
        let count = match table {
            tables::STUDENTS => self.students.len() as i64,
            tables::REGISTRATIONS => self.registrations.len() as i64,
            tables::USERS => self.users.len() as i64,
            _ => self.row_counts.get(table).copied().unwrap_or(0),
        };
        Ok(count)
    }

    async fn modify_column(
        &mut self,
        table: &str,
        column: &str,
        column_type: &str,
    ) -> AppResult<()> {
        self.require_table(table)?;
        if self.fail_restore_of.as_ref() == Some(&(table.to_string(), column.to_string()))
            && column_type.eq_ignore_ascii_case(column_types::JSON)
        {
            return Err(AppError::Database("Lost connection to MySQL server".to_string()));
        }
        if column_type.eq_ignore_ascii_case(column_types::JSON) {
            let invalid = self
                .column_values(table, column)
                .into_iter()
                .flatten()
                .any(|v| !is_valid_json(&v));
            if invalid {
                return Err(AppError::Database(format!(
                    "Invalid JSON text: \"Invalid value.\" in column '{}.{}'",
                    table, column
                )));
            }
        }

        let target = self
            .schema
            .get_mut(table)
            .and_then(|cols| cols.iter_mut().find(|c| c.name == column))
            .ok_or_else(|| {
                AppError::Database(format!("Unknown column '{}' in '{}'", column, table))
            })?;
        target.column_type = column_type.to_ascii_lowercase();
        self.writes
            .push(format!("ALTER {}.{} {}", table, column, column_type));
        Ok(())
    }

    async fn add_timestamps(&mut self, table: &str) -> AppResult<()> {
        self.require_table(table)?;
        let cols = self.schema.entry(table.to_string()).or_default();
        if cols.iter().any(|c| c.name == columns::CREATED_AT) {
            return Err(AppError::Database(
                "Duplicate column name 'created_at'".to_string(),
            ));
        }
        cols.push(column(columns::CREATED_AT, "timestamp"));
        cols.push(column("updated_at", "timestamp"));
        self.writes.push(format!("ALTER {} ADD TIMESTAMPS", table));
        Ok(())
    }

    async fn list_students(&mut self, limit: Option<u32>) -> AppResult<Vec<Student>> {
        let limit = limit.map(|l| l as usize).unwrap_or(usize::MAX);
        Ok(self.students.iter().take(limit).cloned().collect())
    }

    async fn find_student(&mut self, id: i32) -> AppResult<Option<Student>> {
        Ok(self.student(id).cloned())
    }

    async fn update_student_lists(
        &mut self,
        id: i32,
        skills: &str,
        achievements: &str,
    ) -> AppResult<()> {
        if self.fail_student_update == Some(id) {
            return Err(AppError::Database("Deadlock found when trying to get lock".to_string()));
        }
        self.check_json(tables::STUDENTS, columns::SKILLS, skills)?;
        self.check_json(tables::STUDENTS, columns::ACHIEVEMENTS, achievements)?;
        if let Some(student) = self.students.iter_mut().find(|s| s.id == id) {
            student.skills = Some(skills.to_string());
            student.achievements = Some(achievements.to_string());
        }
        self.writes.push(format!("UPDATE students {}", id));
        Ok(())
    }

    async fn set_student_json_lists(
        &mut self,
        id: i32,
        skills: &str,
        achievements: &str,
    ) -> AppResult<()> {
        for value in [skills, achievements] {
            if !is_valid_json(value) {
                return Err(AppError::Database(
                    "Invalid JSON text in argument 1 to function cast_as_json".to_string(),
                ));
            }
        }
        if let Some(student) = self.students.iter_mut().find(|s| s.id == id) {
            student.skills = Some(skills.to_string());
            student.achievements = Some(achievements.to_string());
        }
        self.writes.push(format!("UPDATE students {} AS JSON", id));
        Ok(())
    }

    async fn list_registrations(&mut self, limit: Option<u32>) -> AppResult<Vec<Registration>> {
        let limit = limit.map(|l| l as usize).unwrap_or(usize::MAX);
        Ok(self
            .registrations
            .iter()
            .take(limit)
            .map(|r| Registration {
                skills: None,
                ..r.clone()
            })
            .collect())
    }

    async fn list_registrations_with_skills(&mut self) -> AppResult<Vec<Registration>> {
        if self.column_type(tables::REGISTRATIONS, columns::SKILLS).is_none() {
            return Err(AppError::Database(
                "Unknown column 'skills' in 'where clause'".to_string(),
            ));
        }
        Ok(self
            .registrations
            .iter()
            .filter(|r| r.skills.is_some())
            .cloned()
            .collect())
    }

    async fn update_registration_skills(&mut self, id: i32, skills: &str) -> AppResult<()> {
        self.check_json(tables::REGISTRATIONS, columns::SKILLS, skills)?;
        if let Some(reg) = self.registrations.iter_mut().find(|r| r.id == id) {
            reg.skills = Some(skills.to_string());
        }
        self.writes.push(format!("UPDATE contest_registrations {}", id));
        Ok(())
    }

    async fn list_users(&mut self) -> AppResult<Vec<User>> {
        Ok(self.users.clone())
    }

    async fn find_user_by_email(&mut self, email: &str) -> AppResult<Option<User>> {
        Ok(self.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_credentials(
        &mut self,
        email: &str,
        password_digest: &str,
    ) -> AppResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email == email && u.password == password_digest)
            .cloned())
    }

    async fn create_user(&mut self, user: &NewUser) -> AppResult<()> {
        let id = self.users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        self.users.push(User {
            id,
            username: user.username.clone(),
            email: user.email.clone(),
            password: user.password.clone(),
            school: Some(user.school.clone()),
            student_id: Some(user.student_id.clone()),
            phone: Some(user.phone.clone()),
            created_at: None,
        });
        self.writes.push(format!("INSERT users {}", id));
        Ok(())
    }

    async fn update_user_password(
        &mut self,
        email: &str,
        password_digest: &str,
    ) -> AppResult<u64> {
        let mut affected = 0;
        for user in self.users.iter_mut().filter(|u| u.email == email) {
            user.password = password_digest.to_string();
            affected += 1;
        }
        self.writes.push(format!("UPDATE users {}", email));
        Ok(affected)
    }
}
