//! Column metadata model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One column as reported by `information_schema.COLUMNS`
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub column_type: String,
    /// `YES` or `NO`
    pub nullable: String,
}

impl ColumnInfo {
    /// Whether the column is declared with the structured JSON type
    pub fn is_json(&self) -> bool {
        self.column_type.eq_ignore_ascii_case("json")
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable.eq_ignore_ascii_case("yes")
    }
}
