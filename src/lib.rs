//! competition-datafix - Competition Database Maintenance
//!
//! This library provides the repair procedures for the competition
//! platform's MySQL database, whose `skills` and `achievements` columns were
//! declared `JSON` after legacy rows had already been written as comma text.
//!
//! # Features
//!
//! - Read-only inspection of the list columns
//! - Comma text to JSON array normalization, optionally inside a
//!   `TEXT`/`JSON` schema flip
//! - Password reset with a login self-check for a known test account
//! - Table statistics, audit-column upgrade and fixture loading
//!
//! # Architecture
//!
//! - **Services**: the maintenance procedures
//! - **Store**: the storage seam the services are written against
//! - **Repositories**: SQL for each table
//! - **Models**: row types

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod models;
pub mod normalizer;
pub mod services;
pub mod utils;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
