//! Maintenance procedures

pub mod credential_service;
pub mod fixture_service;
pub mod inspect_service;
pub mod repair_service;
pub mod schema_service;

pub use credential_service::{AccountDetails, CredentialCheck, CredentialService};
pub use fixture_service::{FixtureReport, FixtureService};
pub use inspect_service::{InspectReport, InspectService};
pub use repair_service::{RepairOptions, RepairReport, RepairService};
pub use schema_service::{SchemaService, TableCount, TimestampOutcome};
