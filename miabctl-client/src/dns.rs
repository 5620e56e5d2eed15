//! Custom DNS record operations.
//!
//! The admin API exposes custom records under `admin/dns/custom`. Reads
//! return JSON arrays; writes return a plain-text body that must start with
//! `updated DNS:` to count as success — a 200 with any other body is
//! surfaced as [`Error::UnexpectedResponse`] rather than silent success.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::Render;
use crate::http;

/// Success marker prefix of DNS write responses.
const UPDATED_DNS_PREFIX: &str = "updated DNS:";

/// Accepts an optional leading wildcard/dot, dot-separated labels of 2–63
/// characters, and a TLD of at least two letters.
#[allow(clippy::unwrap_used)] // the pattern is a compile-time constant
static QNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*?\.?(?:[a-zA-Z0-9-]{2,63}\.?)+\.([a-zA-Z]{2,})$").unwrap());

// ============ Resource / Network Types ============

/// DNS resource record type supported by the admin API.
///
/// Serialized as uppercase strings (`"A"`, `"AAAA"`, `"TXT"`, etc.).
/// [`None`](Self::None) is the "unspecified" sentinel used to request all
/// types on reads; it is never valid for writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResourceType {
    /// No resource type specified.
    #[serde(rename = "")]
    None,
    /// IPv4 address record (RFC 1035).
    A,
    /// IPv6 address record (RFC 3596).
    Aaaa,
    /// Text record (RFC 1035).
    Txt,
    /// Canonical name record (RFC 1035).
    Cname,
    /// Mail exchange record (RFC 1035 and RFC 7505).
    Mx,
    /// Service locator (RFC 2782).
    Srv,
    /// SSH public key fingerprint (RFC 4255).
    Sshfp,
    /// Certification authority authorization (RFC 6844).
    Caa,
    /// Name server record (RFC 1035).
    Ns,
}

impl ResourceType {
    /// Whether this is one of the nine named types the API accepts for
    /// writes ([`None`](Self::None) is not).
    pub fn is_valid(self) -> bool {
        self != Self::None
    }

    /// The uppercase wire form, empty for [`None`](Self::None).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Txt => "TXT",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Srv => "SRV",
            Self::Sshfp => "SSHFP",
            Self::Caa => "CAA",
            Self::Ns => "NS",
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = Error;

    /// Parses case-insensitively; anything outside the nine named types
    /// fails, including the empty string.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "A" => Ok(Self::A),
            "AAAA" => Ok(Self::Aaaa),
            "TXT" => Ok(Self::Txt),
            "CNAME" => Ok(Self::Cname),
            "MX" => Ok(Self::Mx),
            "SRV" => Ok(Self::Srv),
            "SSHFP" => Ok(Self::Sshfp),
            "CAA" => Ok(Self::Caa),
            "NS" => Ok(Self::Ns),
            _ => Err(Error::validation(
                "rtype",
                format!("'{s}' is not a valid resource type"),
            )),
        }
    }
}

/// Address family selector for the dynamic-address convenience calls.
///
/// `Tcp4` targets A records over IPv4, `Tcp6` targets AAAA records over
/// IPv6. The variant picks both the record type and the address family the
/// connection is forced onto, so the server observes an address of the
/// matching family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    /// IPv4 transport, addressing A records.
    Tcp4,
    /// IPv6 transport, addressing AAAA records.
    Tcp6,
}

impl NetworkType {
    /// The resource type this network family maps to.
    pub fn resource_type(self) -> ResourceType {
        match self {
            Self::Tcp4 => ResourceType::A,
            Self::Tcp6 => ResourceType::Aaaa,
        }
    }
}

impl std::fmt::Display for NetworkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tcp4 => f.write_str("tcp4"),
            Self::Tcp6 => f.write_str("tcp6"),
        }
    }
}

impl FromStr for NetworkType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "tcp4" => Ok(Self::Tcp4),
            "tcp6" => Ok(Self::Tcp6),
            _ => Err(Error::validation(
                "network",
                "'network' has to be 'tcp4' or 'tcp6'",
            )),
        }
    }
}

// ============ Records ============

/// A custom DNS record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Fully qualified domain name the record applies to.
    pub qname: String,
    /// Resource type of the record.
    pub rtype: ResourceType,
    /// Value of the record.
    pub value: String,
}

/// An ordered list of [`Record`]s, as returned by the server.
pub type Records = Vec<Record>;

impl Render for Record {
    const CSV_HEADER: &'static str = r#""domain name", "record type", "value""#;

    fn plain(&self) -> String {
        format!("{}\t{}\t{}", self.qname, self.rtype, self.value)
    }

    fn csv_rows(&self, out: &mut String) {
        out.push_str(&format!(
            r#""{}", "{}", "{}""#,
            self.qname, self.rtype, self.value
        ));
        out.push('\n');
    }
}

// ============ Path construction ============

/// Builds the request path for custom DNS operations, omitting the empty
/// parts: `admin/dns/custom[/{qname}[/{rtype}]]`.
pub(crate) fn dns_path(qname: &str, rtype: ResourceType) -> String {
    const PATH: &str = "admin/dns/custom";

    if qname.is_empty() {
        return PATH.to_string();
    }

    if rtype == ResourceType::None {
        return format!("{PATH}/{qname}");
    }

    format!("{PATH}/{qname}/{rtype}")
}

fn is_valid_qname(qname: &str) -> bool {
    QNAME_RE.is_match(qname)
}

// ============ Client ============

/// Client for the custom DNS section of the admin API.
pub struct DnsClient<'a> {
    config: &'a Config,
    http: Client,
}

impl<'a> DnsClient<'a> {
    /// Creates a DNS client operating against the instance `config` points
    /// at.
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            http: http::create_client(),
        }
    }

    /// Returns matching custom DNS records. An empty `qname` returns all
    /// records; `rtype` may be [`ResourceType::None`] to leave the type
    /// unspecified. Note that when `qname` is given and `rtype` is not, the
    /// server defaults the type to A records.
    pub async fn get(&self, qname: &str, rtype: ResourceType) -> Result<Records> {
        if !qname.is_empty() && !is_valid_qname(qname) {
            return Err(Error::validation("qname", "'qname' seems to be invalid"));
        }

        let url = format!("{}/{}", self.config.endpoint(), dns_path(qname, rtype));
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

    /// Sets a custom DNS record, replacing any existing records with the
    /// same `qname` and `rtype`. Use `set` (instead of [`add`](Self::add))
    /// when a `qname`/`rtype` pair has a single value, such as typical A
    /// records without round-robin. Returns `true` when the server reports
    /// the DNS as updated.
    pub async fn set(&self, qname: &str, rtype: ResourceType, value: &str) -> Result<bool> {
        self.write(Method::PUT, qname, rtype, value).await
    }

    /// Adds a new custom DNS record, keeping existing ones. Use `add` for
    /// multiple TXT records or round-robin A records. Returns `true` when
    /// the server reports the DNS as updated.
    pub async fn add(&self, qname: &str, rtype: ResourceType, value: &str) -> Result<bool> {
        self.write(Method::POST, qname, rtype, value).await
    }

    /// Removes custom DNS records. An empty `value` deletes all records
    /// matching `qname` and `rtype`; a non-empty `value` narrows the
    /// deletion to the exact record. Returns `true` when the server reports
    /// the DNS as updated.
    pub async fn delete(&self, qname: &str, rtype: ResourceType, value: &str) -> Result<bool> {
        self.write(Method::DELETE, qname, rtype, value).await
    }

    async fn write(
        &self,
        method: Method,
        qname: &str,
        rtype: ResourceType,
        value: &str,
    ) -> Result<bool> {
        if !is_valid_qname(qname) {
            return Err(Error::validation("qname", "'qname' seems to be invalid"));
        }

        if !rtype.is_valid() {
            return Err(Error::validation("rtype", "'rtype' has to be set"));
        }

        let url = format!("{}/{}", self.config.endpoint(), dns_path(qname, rtype));
        log::debug!("{method} {url}");

        let request = self
            .http
            .request(method, &url)
            .basic_auth(self.config.user(), Some(self.config.password()))
            .body(value.to_string());

        let (status, body) = http::execute(request).await?;
        if status != 200 {
            return Err(Error::Http { status, body });
        }

        if body.starts_with(UPDATED_DNS_PREFIX) {
            return Ok(true);
        }

        Err(Error::UnexpectedResponse { body })
    }

    /// Sets or adds a custom A or AAAA record, selected via `network`
    /// (`tcp4` → A, `tcp6` → AAAA). With an empty `value` the server stores
    /// the address it observes on the connection instead, which is what
    /// makes this usable for dynamic DNS; the connection is forced onto the
    /// matching address family so the observed address has the right shape.
    /// `add = false` replaces existing records (PUT), `add = true` appends
    /// (POST). Consider [`update_dns4`](Self::update_dns4) /
    /// [`update_dns6`](Self::update_dns6) for the common case.
    pub async fn set_or_add_address_record(
        &self,
        network: NetworkType,
        qname: &str,
        value: &str,
        add: bool,
    ) -> Result<bool> {
        if !is_valid_qname(qname) {
            return Err(Error::validation("qname", "'qname' seems to be invalid"));
        }

        let rtype = network.resource_type();
        let url = format!("{}/{}", self.config.endpoint(), dns_path(qname, rtype));

        let method = if add { Method::POST } else { Method::PUT };
        log::debug!("{method} {url} ({network})");

        // Dedicated client: the local-address binding pins the family.
        let client = http::create_client_for(network);
        let request = client
            .request(method, &url)
            .basic_auth(self.config.user(), Some(self.config.password()))
            .body(value.to_string());

        let (status, body) = http::execute(request).await?;
        if status != 200 {
            return Err(Error::Http { status, body });
        }

        if body == "OK" || body.starts_with(UPDATED_DNS_PREFIX) {
            return Ok(true);
        }

        Err(Error::UnexpectedResponse { body })
    }

    /// Updates the custom A record for `qname` over IPv4. An empty `value`
    /// lets the server store the caller's observed IPv4 address.
    pub async fn update_dns4(&self, qname: &str, value: &str) -> Result<bool> {
        self.set_or_add_address_record(NetworkType::Tcp4, qname, value, false)
            .await
    }

    /// Updates the custom AAAA record for `qname` over IPv6. An empty
    /// `value` lets the server store the caller's observed IPv6 address.
    pub async fn update_dns6(&self, qname: &str, value: &str) -> Result<bool> {
        self.set_or_add_address_record(NetworkType::Tcp6, qname, value, false)
            .await
    }
}
