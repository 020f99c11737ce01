//! Outbound adapters implementing the repository ports.
//!
//! - **memory**: a process-local store used when no database is configured
//!   and by the HTTP tests.
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM.
//!
//! Adapters translate between domain types and storage representations and
//! carry no business rules.

pub mod memory;
pub mod persistence;
