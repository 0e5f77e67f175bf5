//! # WebBlog Infrastructure
//!
//! Concrete implementations of the ports defined in `blog-core`:
//! storage backends and authentication.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory store only
//! - `postgres` - PostgreSQL database support via SeaORM
//! - `auth` - JWT + Argon2 authentication

pub mod database;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use database::{
    InMemoryCommentRepository, InMemoryDatabase, InMemoryPostRepository, InMemoryUserRepository,
};

#[cfg(feature = "postgres")]
pub use database::{
    DatabaseConfig, DatabaseConnections, PostgresCommentRepository, PostgresPostRepository,
    PostgresUserRepository,
};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
