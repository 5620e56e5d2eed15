//! # miabctl-client
//!
//! A typed async client for the [Mail-in-a-Box](https://mailinabox.email)
//! admin API: custom DNS records, mail users and mail aliases, plus the
//! output formatting (`plain`/`json`/`yaml`/`csv`) shared by the command
//! line tools built on top of it.
//!
//! ## Feature Flags
//!
//! ### TLS Backend
//!
//! - **`native-tls`** *(default)* — Use the platform's native TLS
//!   implementation.
//! - **`rustls`** — Use rustls. Recommended for cross-compilation.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use miabctl_client::{Config, DnsClient, Format, render, ResourceType};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Build a configuration from credentials and the box URL
//!     let config = Config::new("admin@example.org", "secret", "https://box.example.org")?;
//!
//!     // 2. Fetch custom DNS records
//!     let client = DnsClient::new(&config);
//!     let records = client.get("", ResourceType::None).await?;
//!
//!     // 3. Render them in the format of your choice
//!     println!("{}", render(&records, Format::Csv)?);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Dynamic DNS
//!
//! ```rust,no_run
//! # use miabctl_client::{Config, DnsClient};
//! # async fn example(config: Config) -> miabctl_client::Result<()> {
//! // With an empty value the server stores the caller's observed IPv4
//! // address, which turns an ordinary A record into dynamic DNS.
//! let client = DnsClient::new(&config);
//! client.update_dns4("home.example.org", "").await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`](Error). Input problems are
//! rejected before any request is made ([`Error::Validation`]); failed
//! round trips carry the status and body ([`Error::Http`]); and a DNS write
//! that returns 200 without the expected `updated DNS:` marker surfaces as
//! [`Error::UnexpectedResponse`] instead of silent success.

mod aliases;
mod config;
mod dns;
mod error;
mod format;
mod http;
mod users;

// Re-export error types
pub use error::{Error, Result};

// Re-export configuration
pub use config::Config;

// Re-export DNS types and client
pub use dns::{DnsClient, NetworkType, Record, Records, ResourceType};

// Re-export mail user types and client
pub use users::{MailDomain, MailDomains, Privileges, Status, User, UserClient};

// Re-export mail alias types and client
pub use aliases::{Alias, AliasClient, AliasDomain, AliasDomains};

// Re-export the output formatter
pub use format::{render, Format, Render};
