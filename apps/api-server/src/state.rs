//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::ports::{
    CommentRepository, PasswordService, PostRepository, TokenService, UserRepository,
};
use blog_core::services::{AccountService, BlogService};
use blog_infra::{Argon2PasswordService, InMemoryDatabase, JwtTokenService};

use crate::config::{AppConfig, PaginationConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blog: BlogService,
    pub accounts: AccountService,
    pub tokens: Arc<dyn TokenService>,
    pub pagination: PaginationConfig,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    ///
    /// Falls back to the in-memory store when no database is reachable.
    pub async fn new(config: &AppConfig) -> Self {
        match Self::with_database(config).await {
            Some(state) => state,
            None => Self::in_memory(config),
        }
    }

    /// State backed by a fresh in-memory store.
    pub fn in_memory(config: &AppConfig) -> Self {
        let db = InMemoryDatabase::new();
        Self::from_repositories(
            config,
            Arc::new(db.users()),
            Arc::new(db.posts()),
            Arc::new(db.comments()),
        )
    }

    #[cfg(feature = "postgres")]
    async fn with_database(config: &AppConfig) -> Option<Self> {
        use blog_infra::{
            DatabaseConnections, PostgresCommentRepository, PostgresPostRepository,
            PostgresUserRepository,
        };
        use migration::{Migrator, MigratorTrait};

        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return None;
        };

        let connections = match DatabaseConnections::init(db_config).await {
            Ok(connections) => connections,
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                return None;
            }
        };

        if let Err(e) = Migrator::up(&connections.main, None).await {
            tracing::error!("Failed to apply migrations: {}. Using in-memory fallback.", e);
            return None;
        }

        tracing::info!("Application state initialized (postgres)");
        let conn = connections.main;
        Some(Self::from_repositories(
            config,
            Arc::new(PostgresUserRepository::new(conn.clone())),
            Arc::new(PostgresPostRepository::new(conn.clone())),
            Arc::new(PostgresCommentRepository::new(conn)),
        ))
    }

    #[cfg(not(feature = "postgres"))]
    async fn with_database(_config: &AppConfig) -> Option<Self> {
        tracing::info!("Running without postgres feature - using in-memory store");
        None
    }

    fn from_repositories(
        config: &AppConfig,
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
    ) -> Self {
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        Self {
            blog: BlogService::new(users.clone(), posts, comments),
            accounts: AccountService::new(users, passwords),
            tokens: Arc::new(JwtTokenService::new(config.jwt.clone())),
            pagination: config.pagination,
        }
    }
}
