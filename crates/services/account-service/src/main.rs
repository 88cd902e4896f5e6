//! Account Service - provisioning and account management CLI.

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use account_service_lib::config::AccountServiceConfig;
use account_service_lib::service::AccountService;
use domain::{CreateAccountRequest, UpdateAccountRequest};

#[derive(Parser)]
#[command(name = "account-service")]
#[command(author, version, about = "Account storage management", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database, role, schema, grants and table
    Provision,
    #[command(flatten)]
    Account(AccountCommand),
}

/// Commands that run as the application role.
#[derive(Subcommand)]
enum AccountCommand {
    /// Create a new account
    Create {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
    },
    /// List all accounts
    List,
    /// Show one account
    Get { id: i32 },
    /// Change account fields
    Update {
        id: i32,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Delete an account
    Delete { id: i32 },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AccountServiceConfig::from_env();

    match cli.command {
        Commands::Provision => {
            let db = account_service_lib::provision(&config).await?;
            db.close().await?;
        }
        Commands::Account(command) => run_account_command(&config, command).await?,
    }

    Ok(())
}

/// Run a CRUD command as the application role.
async fn run_account_command(
    config: &AccountServiceConfig,
    command: AccountCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = account_service_lib::connect(config).await?;
    let service = account_service_lib::account_service(&db);

    match command {
        AccountCommand::Create {
            first_name,
            last_name,
            email,
        } => {
            let account = service
                .create_account(CreateAccountRequest {
                    first_name,
                    last_name,
                    email,
                })
                .await?;
            print_json(&account)?;
        }
        AccountCommand::List => {
            print_json(&service.list_accounts().await?)?;
        }
        AccountCommand::Get { id } => {
            print_json(&service.get_account(id).await?)?;
        }
        AccountCommand::Update {
            id,
            first_name,
            last_name,
            email,
        } => {
            let changes = UpdateAccountRequest {
                first_name,
                last_name,
                email,
            };
            print_json(&service.update_account(id, changes).await?)?;
        }
        AccountCommand::Delete { id } => {
            service.delete_account(id).await?;
            info!(id, "Account deleted");
        }
    }

    drop(service);
    db.close().await?;

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
