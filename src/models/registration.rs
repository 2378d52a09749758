//! Contest registration model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Contest registration row
///
/// Older deployments have no `skills` column; it defaults to `None` when the
/// query does not select it.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Registration {
    pub id: i32,
    pub student_name: Option<String>,
    pub contest_id: Option<i32>,
    pub status: Option<String>,
    #[sqlx(default)]
    pub skills: Option<String>,
}
