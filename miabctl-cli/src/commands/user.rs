//! The `user` command.
//!
//! Without a subcommand, lists mail users grouped by domain.

use clap::{Args, Subcommand};
use miabctl_client::{render, Config, Format, UserClient};

#[derive(Debug, Args)]
pub struct UserCommand {
    #[command(subcommand)]
    action: Option<UserAction>,

    /// Domain to filter the listed users by (exact match)
    #[arg(long)]
    domain: Option<String>,

    /// Output format (plain, csv, json, yaml)
    #[arg(long, default_value = "plain")]
    format: String,
}

#[derive(Debug, Subcommand)]
enum UserAction {
    /// Add a mail user. Adding a user under a new domain also adds that
    /// domain to the box.
    Add {
        /// E-mail address of the new user
        email: String,
        /// Password for the new user
        password: String,
    },
    /// Delete a mail user
    Del {
        /// E-mail address of the user
        email: String,
    },
    /// Manage the admin privilege of a mail user
    Privilege {
        #[command(subcommand)]
        action: PrivilegeAction,
    },
}

#[derive(Debug, Subcommand)]
enum PrivilegeAction {
    /// Grant the admin privilege to a mail user
    Add {
        /// E-mail address of the user
        email: String,
    },
    /// Revoke the admin privilege from a mail user
    Del {
        /// E-mail address of the user
        email: String,
    },
}

pub async fn run(config: &Config, command: UserCommand) -> anyhow::Result<()> {
    let client = UserClient::new(config);

    match command.action {
        None => {
            let format: Format = command.format.parse()?;
            let domains = client.get().await?;

            if let Some(domain) = command.domain.filter(|d| !d.is_empty()) {
                if let Some(matched) = domains.iter().find(|m| m.domain == domain) {
                    println!("{}", render(matched, format)?);
                    return Ok(());
                }
            }

            println!("{}", render(&domains, format)?);
            Ok(())
        }
        Some(UserAction::Add { email, password }) => {
            client.add(&email, &password).await?;
            Ok(())
        }
        Some(UserAction::Del { email }) => {
            client.delete(&email).await?;
            Ok(())
        }
        Some(UserAction::Privilege { action }) => match action {
            PrivilegeAction::Add { email } => {
                client.add_privilege(&email).await?;
                Ok(())
            }
            PrivilegeAction::Del { email } => {
                client.remove_privilege(&email).await?;
                Ok(())
            }
        },
    }
}
