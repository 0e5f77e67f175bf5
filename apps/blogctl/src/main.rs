//! Operator CLI for WebBlog.

use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;

use blog_core::DomainError;
use blog_core::services::AccountService;
use blog_core::validation::RegistrationForm;
use blog_infra::{Argon2PasswordService, DatabaseConfig, DatabaseConnections, PostgresUserRepository};

/// Administrative commands for the blog database
#[derive(Debug, clap::Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// PostgreSQL connection string
    #[clap(long, env = "DATABASE_URL")]
    database_url: String,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Create a regular user for the blog
    CreateUser {
        /// Username for the new user
        username: String,
        /// Email for the new user
        email: String,
        /// Password for the new user
        password: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match start().await {
        Ok(message) => println!("{message}"),
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(1);
        }
    }
}

async fn start() -> anyhow::Result<String> {
    let cli = Cli::parse();

    let config = DatabaseConfig {
        url: cli.database_url,
        max_connections: 2,
        min_connections: 1,
    };
    let connections = DatabaseConnections::init(&config)
        .await
        .context("failed to connect to the database")?;

    let accounts = AccountService::new(
        Arc::new(PostgresUserRepository::new(connections.main)),
        Arc::new(Argon2PasswordService::new()),
    );

    match cli.command {
        Commands::CreateUser {
            username,
            email,
            password,
        } => create_user(&accounts, &username, &email, &password).await,
    }
}

async fn create_user(
    accounts: &AccountService,
    username: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<String> {
    let form = RegistrationForm {
        username,
        email,
        password,
        password_confirm: password,
    };

    match accounts.register(&form).await {
        Ok(user) => {
            tracing::info!(user_id = user.id, "User created from the command line");
            Ok(format!(
                "Successfully created user \"{}\" with email \"{}\"",
                user.username, user.email
            ))
        }
        Err(DomainError::Duplicate(_)) => {
            tracing::warn!("Refusing to create a user with a taken username");
            anyhow::bail!("User \"{username}\" already exists!")
        }
        Err(err) => {
            tracing::error!(error = %err, "User creation failed");
            Err(err).context("failed to create user")
        }
    }
}
