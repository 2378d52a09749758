//! Input validation utilities

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AppError, AppResult};

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,63}$").expect("identifier pattern is valid")
});

/// Validate a table or column name before it is spliced into DDL
pub fn validate_identifier(name: &str) -> AppResult<()> {
    if IDENTIFIER.is_match(name) {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "'{}' is not a valid table or column name",
            name
        )))
    }
}

/// Validate and backtick-quote an identifier
pub fn quote_identifier(name: &str) -> AppResult<String> {
    validate_identifier(name)?;
    Ok(format!("`{}`", name))
}

/// Validate a declared column type used by the schema flip
pub fn validate_column_type(column_type: &str) -> AppResult<()> {
    match column_type.to_ascii_uppercase().as_str() {
        "TEXT" | "MEDIUMTEXT" | "LONGTEXT" | "JSON" => Ok(()),
        _ => Err(AppError::InvalidInput(format!(
            "Unsupported column type '{}'",
            column_type
        ))),
    }
}
