// Administrative CLI: run migrations, create accounts
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use bizdash_api::auth::hash_password;
use bizdash_api::database::models::UserRole;
use bizdash_api::database::DatabaseManager;

#[derive(Parser)]
#[command(name = "bizdash-admin", about = "bizdash API administration")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Create a user account directly in the database
    CreateUser {
        email: String,
        name: String,
        password: String,
        /// Grant the admin role instead of member
        #[arg(long)]
        admin: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Migrate => {
            DatabaseManager::run_migrations()
                .await
                .context("failed to run migrations")?;
            println!("migrations applied");
        }
        Commands::CreateUser {
            email,
            name,
            password,
            admin,
        } => {
            let pool = DatabaseManager::pool().await?;
            let role = if admin { UserRole::Admin } else { UserRole::Member };
            let id = Uuid::new_v4();

            sqlx::query(
                "INSERT INTO users (id, email, name, password_hash, role)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(id)
            .bind(email.trim().to_lowercase())
            .bind(name.trim())
            .bind(hash_password(&password))
            .bind(role)
            .execute(&pool)
            .await
            .context("failed to create user")?;

            println!("created user {}", id);
        }
    }

    Ok(())
}
