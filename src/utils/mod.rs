//! Utility functions

pub mod crypto;
pub mod time;
pub mod validation;

pub use crypto::{hash_string, verify_hash};
pub use time::{format_duration, now_utc};
pub use validation::{quote_identifier, validate_identifier};
