//! The command tree: `dns`, `user` and `alias`.

mod alias;
mod dns;
mod user;

use clap::Subcommand;
use miabctl_client::Config;

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List and manage custom DNS records
    Dns(dns::DnsCommand),
    /// List and manage mail users
    User(user::UserCommand),
    /// List and manage mail aliases
    Alias(alias::AliasCommand),
}

/// Dispatches the parsed command against the configured instance.
pub async fn run(config: &Config, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Dns(cmd) => dns::run(config, cmd).await,
        Command::User(cmd) => user::run(config, cmd).await,
        Command::Alias(cmd) => alias::run(config, cmd).await,
    }
}
