//! Mail alias operations.
//!
//! Same access pattern as the user section: JSON reads grouped by domain,
//! form-encoded POST writes under `admin/mail/aliases`.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::Render;
use crate::http;

const ALIASES_PATH: &str = "admin/mail/aliases";

/// A mail alias forwarding to one or more destinations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    /// The alias address.
    pub address: String,
    /// Display form of the address.
    #[serde(rename = "address_display")]
    pub display_address: String,
    /// Destination addresses the alias forwards to.
    pub forwards_to: Vec<String>,
    /// Addresses permitted to send as this alias, absent when the server
    /// reports none.
    #[serde(default)]
    pub permitted_senders: Option<Vec<String>>,
    /// Whether the alias is mandated by the server (e.g. `abuse@`) and
    /// cannot be deleted. Informational only; the server enforces it.
    pub required: bool,
}

/// A domain together with its mail aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasDomain {
    /// The domain name, e.g. `example.org`.
    pub domain: String,
    /// The aliases of the domain, in server order.
    pub aliases: Vec<Alias>,
}

/// An ordered list of [`AliasDomain`]s, as returned by the server.
pub type AliasDomains = Vec<AliasDomain>;

impl Render for AliasDomain {
    const CSV_HEADER: &'static str =
        r#""domain", "address", "displayAddress", "forwardsTo", "permittedSenders", "required""#;

    /// Lists the domain followed by one `alias -> destinations` line per
    /// alias, tab-indented.
    fn plain(&self) -> String {
        let aliases: Vec<String> = self
            .aliases
            .iter()
            .map(|a| format!("\t{} -> {}", a.address, a.forwards_to.join(", ")))
            .collect();
        format!("{}:\n{}", self.domain, aliases.join("\n"))
    }

    fn csv_rows(&self, out: &mut String) {
        for alias in &self.aliases {
            let senders = alias.permitted_senders.as_deref().unwrap_or_default();
            out.push_str(&format!(
                r#""{}", "{}", "{}", "{}", "{}", {}"#,
                self.domain,
                alias.address,
                alias.display_address,
                alias.forwards_to.join(";"),
                senders.join(";"),
                alias.required
            ));
            out.push('\n');
        }
    }
}

/// Client for the mail alias section of the admin API.
pub struct AliasClient<'a> {
    config: &'a Config,
    http: Client,
}

impl<'a> AliasClient<'a> {
    /// Creates an alias client operating against the instance `config`
    /// points at.
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            http: http::create_client(),
        }
    }

    /// Returns all mail aliases, grouped by domain.
    pub async fn get(&self) -> Result<AliasDomains> {
        let url = format!("{}/{}?format=json", self.config.endpoint(), ALIASES_PATH);
        log::debug!("GET {url}");

        let request = self
            .http
            .get(&url)
            .basic_auth(self.config.user(), Some(self.config.password()));

        let (status, body) = http::execute(request).await?;
        if status != 200 {
            return Err(Error::Http { status, body });
        }

        http::decode_json(&body)
    }

    /// Adds a new alias. `forwards_to` is a comma-separated list of
    /// destination addresses, sent verbatim as the form field. Adding an
    /// alias under a domain the server does not yet host also creates that
    /// domain server-side.
    pub async fn add(&self, address: &str, forwards_to: &str) -> Result<()> {
        self.exec("add", &format!("address={address}&forwards_to={forwards_to}"))
            .await
    }

    /// Removes an existing alias.
    pub async fn delete(&self, address: &str) -> Result<()> {
        self.exec("remove", &format!("address={address}")).await
    }

    async fn exec(&self, path: &str, body: &str) -> Result<()> {
        let url = format!("{}/{}/{}", self.config.endpoint(), ALIASES_PATH, path);
        log::debug!("POST {url}");

        let request = self
            .http
            .post(&url)
            .basic_auth(self.config.user(), Some(self.config.password()))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body.to_string());

        let (status, body) = http::execute(request).await?;
        if status != 200 {
            return Err(Error::Http { status, body });
        }

        Ok(())
    }
}
