//! Storage backends: PostgreSQL through SeaORM, or an in-memory store.

pub mod memory;

#[cfg(feature = "postgres")]
mod connections;
#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
pub mod postgres_repo;

#[cfg(feature = "postgres")]
pub mod entity;

pub use memory::{
    InMemoryCommentRepository, InMemoryDatabase, InMemoryPostRepository, InMemoryUserRepository,
};

#[cfg(feature = "postgres")]
pub use connections::{DatabaseConfig, DatabaseConnections};

#[cfg(feature = "postgres")]
pub use postgres_repo::{
    PostgresCommentRepository, PostgresPostRepository, PostgresUserRepository,
};

#[cfg(feature = "postgres")]
#[cfg(test)]
mod tests;
