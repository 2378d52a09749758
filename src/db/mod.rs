//! Database module
//!
//! This module handles the single operator connection, the repositories, and
//! the [`Store`] seam the services are written against.

pub mod connection;
pub mod repositories;
pub mod store;

pub use connection::*;
pub use store::{MySqlStore, Store};

#[cfg(test)]
pub use store::MockStore;
