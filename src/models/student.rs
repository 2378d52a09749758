//! Student model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Student row with its list columns read as text
///
/// `skills` and `achievements` are selected through `CAST(.. AS CHAR)` so the
/// same row type works while the columns are `JSON` or relaxed to `TEXT`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Student {
    pub id: i32,
    pub name: String,
    pub skills: Option<String>,
    pub achievements: Option<String>,
}

/// Operator-supplied list values for one student
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentFixture {
    pub id: i32,
    /// Informational only; rows are matched by `id`
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
}
