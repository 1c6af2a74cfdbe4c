//! In-memory implementations, used when no database is configured and in tests

mod user_repository;

pub use user_repository::InMemoryUserRepository;
