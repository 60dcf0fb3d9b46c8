//! Process-local adapters.

mod in_memory_walk_repository;

pub use in_memory_walk_repository::InMemoryWalkRepository;
