#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! CLI for managing mailcow mailboxes

use clap::{Parser, Subcommand};
use mailcow_accounts::{
    AccountExistence, ActivityState, ApiConfig, MailboxAttributes, MailboxManager, MailcowClient,
    ProvisionedMailbox,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mailcow-cli")]
#[command(about = "Provision and manage mailcow mailboxes")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Create a mailbox with a generated password
    Add {
        /// Email address of the new mailbox
        email: String,

        /// Display name
        #[arg(long)]
        name: String,

        /// Activity state (0/disabled, 1/enabled, 2/login-disabled)
        #[arg(long, default_value = "enabled")]
        active: ActivityState,

        /// Mailbox quota
        #[arg(long, default_value = "0")]
        quota: u64,
    },

    /// Change the display name or activity state of a mailbox
    Edit {
        /// Email address of the mailbox
        email: String,

        /// New display name
        #[arg(long)]
        name: Option<String>,

        /// New activity state
        #[arg(long)]
        active: Option<ActivityState>,
    },

    /// Delete a mailbox
    Delete {
        /// Email address of the mailbox
        email: String,
    },

    /// Check whether a mailbox exists
    Check {
        /// Email address of the mailbox
        email: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = ApiConfig::from_env()?;
    let manager = MailboxManager::new(MailcowClient::new(&config)?);

    match &args.command {
        Command::Add {
            email,
            name,
            active,
            quota,
        } => {
            let created = manager.provision(email, name, *active, *quota).await?;
            print_provisioned(&args, &created)?;
        }
        Command::Edit {
            email,
            name,
            active,
        } => {
            let attributes = MailboxAttributes {
                active: *active,
                name: name.clone(),
            };
            if attributes.is_empty() {
                anyhow::bail!("nothing to edit: pass --name and/or --active");
            }
            manager.edit(email, attributes).await?;
            print_done(&args, "edited", email)?;
        }
        Command::Delete { email } => {
            manager.delete(email).await?;
            print_done(&args, "deleted", email)?;
        }
        Command::Check { email } => {
            let existence = manager.check_exists(email).await?;
            print_existence(&args, email, &existence)?;
        }
    }

    Ok(())
}

fn print_provisioned(args: &Args, created: &ProvisionedMailbox) -> anyhow::Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(created)?);
    } else {
        println!("Created: {}", created.email);
        println!("Password: {}", created.password);
    }
    Ok(())
}

fn print_done(args: &Args, action: &str, email: &str) -> anyhow::Result<()> {
    if args.json {
        let value = serde_json::json!({ "email": email, "status": action });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{email} {action}");
    }
    Ok(())
}

fn print_existence(args: &Args, email: &str, existence: &AccountExistence) -> anyhow::Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(existence)?);
        return Ok(());
    }

    if !existence.exists {
        println!("{email} does not exist");
        return Ok(());
    }

    println!("Email:  {email}");
    println!("Name:   {}", existence.name.as_deref().unwrap_or("-"));
    println!(
        "Active: {} ({})",
        u8::from(existence.active),
        existence.active
    );
    Ok(())
}
