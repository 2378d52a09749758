//! Domain models
//!
//! Row types for the tables the maintenance procedures touch.

pub mod column;
pub mod registration;
pub mod student;
pub mod user;

pub use column::*;
pub use registration::*;
pub use student::*;
pub use user::*;
