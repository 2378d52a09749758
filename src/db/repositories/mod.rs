//! Database repositories
//!
//! Repositories handle all direct database interactions.

pub mod registration_repo;
pub mod schema_repo;
pub mod student_repo;
pub mod user_repo;

pub use registration_repo::RegistrationRepository;
pub use schema_repo::SchemaRepository;
pub use student_repo::StudentRepository;
pub use user_repo::UserRepository;
