//! User model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::constants::{
    MAX_EMAIL_LENGTH, MAX_PHONE_LENGTH, MAX_SCHOOL_LENGTH, MAX_STUDENT_ID_LENGTH,
    MAX_USERNAME_LENGTH,
};

/// User database model
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    /// Single-round SHA-256 hex digest
    #[serde(skip_serializing)]
    pub password: String,
    pub school: Option<String>,
    pub student_id: Option<String>,
    pub phone: Option<String>,
    #[sqlx(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Fields for inserting a user row
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, max = MAX_USERNAME_LENGTH))]
    pub username: String,

    #[validate(email, length(max = MAX_EMAIL_LENGTH))]
    pub email: String,

    /// Digest, never the plaintext
    #[validate(length(min = 1))]
    pub password: String,

    #[validate(length(min = 1, max = MAX_SCHOOL_LENGTH))]
    pub school: String,

    #[validate(length(min = 1, max = MAX_STUDENT_ID_LENGTH))]
    pub student_id: String,

    #[validate(length(min = 1, max = MAX_PHONE_LENGTH))]
    pub phone: String,
}
