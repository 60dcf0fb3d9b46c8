//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL walk repository using Diesel ORM
//! - **memory**: process-local walk repository for database-free runs
//! - **webhook**: HTTP notification gateway
//!
//! Adapters translate between domain types and infrastructure
//! representations. They hold no business rules.

pub mod memory;
pub mod persistence;
pub mod webhook;
