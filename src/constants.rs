//! Application-wide constants
//!
//! This module contains all constant values used throughout the tool.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default database host
pub const DEFAULT_DB_HOST: &str = "localhost";

/// Default database port of the competition deployment
pub const DEFAULT_DB_PORT: u16 = 3305;

/// Default database user
pub const DEFAULT_DB_USER: &str = "root";

/// Default database (schema) name
pub const DEFAULT_DB_NAME: &str = "competition_system";

/// Default log filter when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "datafix=info,competition_datafix=info,sqlx=warn";

// =============================================================================
// TABLES
// =============================================================================

/// Table names referenced by the maintenance procedures
pub mod tables {
    pub const STUDENTS: &str = "students";
    pub const REGISTRATIONS: &str = "contest_registrations";
    pub const USERS: &str = "users";
    pub const CONTESTS: &str = "contests";
    pub const TEAMS: &str = "contest_teams";
    pub const EXPERTS: &str = "experts";

    /// Tables that must exist for `stats` to succeed
    pub const REQUIRED_FOR_STATS: &[&str] = &[CONTESTS, STUDENTS, REGISTRATIONS, TEAMS];

    /// Tables that are reported as missing instead of failing
    pub const OPTIONAL_FOR_STATS: &[&str] = &[EXPERTS];
}

/// JSON-array column names
pub mod columns {
    pub const SKILLS: &str = "skills";
    pub const ACHIEVEMENTS: &str = "achievements";
    pub const CREATED_AT: &str = "created_at";
}

/// Declared column types used by the schema flip
pub mod column_types {
    /// Unstructured type the columns are relaxed to during a repair pass
    pub const TEXT: &str = "TEXT";

    /// Structured type the columns are restored to afterwards
    pub const JSON: &str = "JSON";
}

// =============================================================================
// CREDENTIAL CHECK DEFAULTS
// =============================================================================

/// Defaults for the password reset self-check
pub mod test_account {
    pub const EMAIL: &str = "666666@qq.com";
    pub const PASSWORD: &str = "123456";
    pub const USERNAME: &str = "测试用户";
    pub const SCHOOL: &str = "测试学校";
    pub const STUDENT_ID: &str = "666666";
    pub const PHONE: &str = "13800138000";
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Username maximum length (matches `users.username VARCHAR(50)`)
pub const MAX_USERNAME_LENGTH: u64 = 50;

/// Email maximum length (matches `users.email VARCHAR(100)`)
pub const MAX_EMAIL_LENGTH: u64 = 100;

/// School maximum length
pub const MAX_SCHOOL_LENGTH: u64 = 100;

/// Student id maximum length
pub const MAX_STUDENT_ID_LENGTH: u64 = 50;

/// Phone maximum length
pub const MAX_PHONE_LENGTH: u64 = 20;

/// Rows shown by `inspect` when no limit is given
pub const DEFAULT_INSPECT_LIMIT: u32 = 5;
