//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types. Row structs (`models.rs`) and table definitions (`schema.rs`) never
//! leave this module. Connections come from a `bb8` pool through
//! `diesel-async`.
//!
//! ```ignore
//! use walktalk::outbound::persistence::{DbPool, DieselWalkRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/walktalk")).await?;
//! let repo = DieselWalkRepository::new(pool);
//! ```

mod diesel_walk_error_mapping;
mod diesel_walk_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_walk_repository::DieselWalkRepository;
pub use migrations::run_pending_migrations;
pub use pool::{DbPool, PoolConfig, PoolError};
