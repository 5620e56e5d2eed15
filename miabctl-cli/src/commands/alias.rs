//! The `alias` command.
//!
//! Without a subcommand, lists mail aliases grouped by domain.

use clap::{Args, Subcommand};
use miabctl_client::{render, AliasClient, Config, Format};

#[derive(Debug, Args)]
pub struct AliasCommand {
    #[command(subcommand)]
    action: Option<AliasAction>,

    /// Domain to filter the listed aliases by (exact match)
    #[arg(long)]
    domain: Option<String>,

    /// Output format (plain, csv, json, yaml)
    #[arg(long, default_value = "plain")]
    format: String,
}

#[derive(Debug, Subcommand)]
enum AliasAction {
    /// Add a mail alias. Adding an alias under a new domain also adds that
    /// domain to the box.
    Add {
        /// The alias address
        address: String,
        /// Comma-separated list of destination addresses
        forwards_to: String,
    },
    /// Delete a mail alias
    Del {
        /// The alias address
        address: String,
    },
}

pub async fn run(config: &Config, command: AliasCommand) -> anyhow::Result<()> {
    let client = AliasClient::new(config);

    match command.action {
        None => {
            let format: Format = command.format.parse()?;
            let domains = client.get().await?;

            if let Some(domain) = command.domain.filter(|d| !d.is_empty()) {
                if let Some(matched) = domains.iter().find(|a| a.domain == domain) {
                    println!("{}", render(matched, format)?);
                    return Ok(());
                }
            }

            println!("{}", render(&domains, format)?);
            Ok(())
        }
        Some(AliasAction::Add {
            address,
            forwards_to,
        }) => {
            client.add(&address, &forwards_to).await?;
            Ok(())
        }
        Some(AliasAction::Del { address }) => {
            client.delete(&address).await?;
            Ok(())
        }
    }
}
