//! # Nexus Database Crate
//!
//! This crate is the read path over the externally managed sensor database.
//! It owns every SQL statement the service runs.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** Hides PostgreSQL behind the `SensorRepository` trait, so the web
//!   layer only sees domain types and `DbError`.
//! - **Scoped acquisition:** A connection is checked out per call and returned to the
//!   pool when its guard drops, whichever way the call ends.
//! - **Bounded:** Every call (acquire plus query) runs under the configured deadline.
//! - **Read-only:** No statement here writes. The schema (`zones`, `sensor_readings`)
//!   is created and migrated elsewhere.
//!
//! ## Public API
//!
//! - `ConnectionProvider`: hands out pooled connections, or a configuration error
//!   when no connection string was supplied.
//! - `SensorRepository`: zone existence, zone listing, reading queries and the
//!   liveness probe.
//! - `DbRepository`: the PostgreSQL implementation of `SensorRepository`.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{ConnectionProvider, MISSING_DATABASE_URL};
pub use error::DbError;
pub use repository::{DbRepository, SensorRepository};
