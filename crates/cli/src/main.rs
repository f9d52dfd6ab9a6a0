//! Stockroom CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! stockroom-cli migrate
//!
//! # Create a staff member directly (bootstrap)
//! stockroom-cli staff create -e manager@example.com -n "Sam Okafor" -r manager
//!
//! # Create an invite without going through the web UI
//! stockroom-cli invite create -e clerk@example.com -n "Robin Mol" -r clerk --days 7
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `staff create` - Create staff members
//! - `invite create` - Create staff invites

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "stockroom-cli")]
#[command(author, version, about = "Stockroom CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage staff members
    Staff {
        #[command(subcommand)]
        action: StaffAction,
    },
    /// Manage staff invites
    Invite {
        #[command(subcommand)]
        action: InviteAction,
    },
}

#[derive(Subcommand)]
enum StaffAction {
    /// Create a new staff member
    Create {
        /// Staff email address
        #[arg(short, long)]
        email: String,

        /// Staff display name
        #[arg(short, long)]
        name: String,

        /// Staff role (`manager`, `clerk`)
        #[arg(short, long, default_value = "clerk")]
        role: String,
    },
}

#[derive(Subcommand)]
enum InviteAction {
    /// Create a new staff invite
    Create {
        /// Invitee email address
        #[arg(short, long)]
        email: String,

        /// Invitee display name
        #[arg(short, long)]
        name: String,

        /// Role to assign on acceptance (`manager`, `clerk`)
        #[arg(short, long, default_value = "clerk")]
        role: String,

        /// Validity window in days
        #[arg(long, default_value = "7")]
        days: i32,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Staff { action } => match action {
            StaffAction::Create { email, name, role } => {
                commands::staff::create(&email, &name, &role).await?;
            }
        },
        Commands::Invite { action } => match action {
            InviteAction::Create {
                email,
                name,
                role,
                days,
            } => {
                commands::invite::create(&email, &name, &role, days).await?;
            }
        },
    }
    Ok(())
}
