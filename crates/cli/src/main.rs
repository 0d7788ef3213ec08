use anyhow::Context;
use clap::{Parser, Subcommand};

use italia_app::domain::User;
use italia_app::repositories::{PasswordResetRepository, UserRepository};
use italia_app::{modules, utils, App};
use italia_kernel::{settings::Settings, ModuleRegistry};

#[derive(Debug, Parser)]
#[command(name = "italia", version, about = "Forum back-office administration")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server until Ctrl-C
    Serve,
    /// Apply pending module migrations and exit
    Migrate,
    /// Create a user account
    CreateUser {
        name: String,
        email: String,
        /// Plain-text password, hashed before storage
        #[arg(long)]
        password: String,
    },
    /// Issue a one-time password reset token for an email address
    IssueResetToken { email: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load settings")?;
    italia_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Command::Serve => App::bootstrap(settings).await?.serve().await,
        Command::Migrate => migrate(&settings).await,
        Command::CreateUser {
            name,
            email,
            password,
        } => {
            let pool = italia_db::connect(&settings.database).await?;
            let mut user = User::new(name.as_str(), email.as_str(), password.as_str())
                .context("failed to hash password")?;
            UserRepository::new(pool.clone())
                .save(&mut user)
                .await
                .with_context(|| format!("failed to create user {email}"))?;
            println!("created user {email} with id {}", user.id.unwrap_or_default());
            pool.close().await;
            Ok(())
        }
        Command::IssueResetToken { email } => {
            let pool = italia_db::connect(&settings.database).await?;
            let users = UserRepository::new(pool.clone());
            if users.find_by_email(&email).await?.is_none() {
                anyhow::bail!("no user registered with email {email}");
            }

            let token = utils::generate_reset_token();
            PasswordResetRepository::new(pool.clone())
                .create(&email, &token)
                .await
                .context("failed to store reset token")?;
            println!("{token}");
            pool.close().await;
            Ok(())
        }
    }
}

async fn migrate(settings: &Settings) -> anyhow::Result<()> {
    let pool = italia_db::connect(&settings.database).await?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, &pool, settings);

    let applied = italia_db::run_migrations(&pool, &registry)
        .await
        .context("failed to run migrations")?;
    tracing::info!(applied, "migrations complete");
    println!("applied {applied} migration(s)");

    pool.close().await;
    Ok(())
}
