//! Mail user operations.
//!
//! Reads come back as JSON grouped by domain. All writes are form-encoded
//! POSTs under `admin/mail/users`; the server answers 200 with an empty or
//! informational body on success, so only the status code is interpreted.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::Render;
use crate::http;

const USERS_PATH: &str = "admin/mail/users";

/// Status of a mail account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// An active mail account.
    #[serde(rename = "active")]
    Active,
    /// An archived (inactive) mail account.
    #[serde(rename = "inactive")]
    Archived,
}

impl Status {
    /// The wire form of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "inactive",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Privileges granted to a user.
///
/// The admin API is inconsistent here: active accounts carry a list of
/// privilege names, archived accounts a single string. Both shapes decode
/// into this variant pair; consumers must handle both when rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Privileges {
    /// A single privilege name (archived-account shape).
    Single(String),
    /// A list of privilege names (active-account shape).
    Multiple(Vec<String>),
}

impl Privileges {
    /// Flattens to the single scalar string, or a `; `-joined string when
    /// the underlying value is a sequence. This is the exact shape the CSV
    /// output has always had, so it is part of the format contract.
    pub fn flatten(&self) -> String {
        match self {
            Self::Single(p) => p.clone(),
            Self::Multiple(ps) => ps.join("; "),
        }
    }
}

/// A mail user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// The e-mail address.
    pub email: String,
    /// Privileges granted to the user, absent when the server reports none.
    #[serde(default)]
    pub privileges: Option<Privileges>,
    /// Status of the account.
    #[serde(alias = "Status")]
    pub status: Status,
    /// Path to the mailbox on the server, populated for archived accounts
    /// only.
    #[serde(default)]
    pub mailbox: String,
}

/// A domain together with its mail users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailDomain {
    /// The domain name, e.g. `example.org`.
    pub domain: String,
    /// The users of the domain, in server order.
    pub users: Vec<User>,
}

/// An ordered list of [`MailDomain`]s, as returned by the server.
pub type MailDomains = Vec<MailDomain>;

impl Render for MailDomain {
    const CSV_HEADER: &'static str = r#""domain", "email", "privileges", "status", "mailbox""#;

    /// Lists the domain followed by its active users, one per tab-indented
    /// line. Archived accounts are omitted from the plain listing.
    fn plain(&self) -> String {
        let users: Vec<String> = self
            .users
            .iter()
            .filter(|u| u.status == Status::Active)
            .map(|u| format!("\t{}", u.email))
            .collect();
        format!("{}:\n{}", self.domain, users.join("\n"))
    }

    fn csv_rows(&self, out: &mut String) {
        for user in &self.users {
            let privileges = user
                .privileges
                .as_ref()
                .map(Privileges::flatten)
                .unwrap_or_default();
            out.push_str(&format!(
                r#""{}", "{}", "{}", "{}", "{}""#,
                self.domain, user.email, privileges, user.status, user.mailbox
            ));
            out.push('\n');
        }
    }
}

/// Client for the mail user section of the admin API.
pub struct UserClient<'a> {
    config: &'a Config,
    http: Client,
}

impl<'a> UserClient<'a> {
    /// Creates a user client operating against the instance `config` points
    /// at.
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            http: http::create_client(),
        }
    }

    /// Returns all mail users, grouped by domain.
    pub async fn get(&self) -> Result<MailDomains> {
        let url = format!("{}/{}?format=json", self.config.endpoint(), USERS_PATH);
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

    /// Adds a new mail user. Adding a user under a domain the server does
    /// not yet host also creates that domain server-side.
    pub async fn add(&self, email: &str, password: &str) -> Result<()> {
        self.exec("add", &format!("email={email}&password={password}"))
            .await
    }

    /// Removes an existing mail user.
    pub async fn delete(&self, email: &str) -> Result<()> {
        self.exec("remove", &format!("email={email}")).await
    }

    /// Grants the admin privilege to a user. The admin privilege is the
    /// only one the API supports.
    pub async fn add_privilege(&self, email: &str) -> Result<()> {
        self.exec("privileges/add", &format!("email={email}&privilege=admin"))
            .await
    }

    /// Revokes the admin privilege from a user.
    pub async fn remove_privilege(&self, email: &str) -> Result<()> {
        self.exec(
            "privileges/remove",
            &format!("email={email}&privilege=admin"),
        )
        .await
    }

    async fn exec(&self, path: &str, body: &str) -> Result<()> {
        let url = format!("{}/{}/{}", self.config.endpoint(), USERS_PATH, path);
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

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_domain() -> MailDomain {
        MailDomain {
            domain: "example.org".to_string(),
            users: vec![
                User {
                    email: "admin@example.org".to_string(),
                    privileges: Some(Privileges::Multiple(vec!["admin".to_string()])),
                    status: Status::Active,
                    mailbox: String::new(),
                },
                User {
                    email: "user1@example.org".to_string(),
                    privileges: None,
                    status: Status::Active,
                    mailbox: String::new(),
                },
                User {
                    email: "user2@example.org".to_string(),
                    privileges: None,
                    status: Status::Archived,
                    mailbox: "/home/miab/mail/example.org/user2".to_string(),
                },
            ],
        }
    }

    #[test]
    fn plain_lists_active_users_only() {
        let want = "example.org:\n\tadmin@example.org\n\tuser1@example.org";
        assert_eq!(sample_domain().plain(), want);
    }

    #[test]
    fn csv_rows_denormalize_domain() {
        let mut out = String::new();
        sample_domain().csv_rows(&mut out);
        let want = concat!(
            "\"example.org\", \"admin@example.org\", \"admin\", \"active\", \"\"\n",
            "\"example.org\", \"user1@example.org\", \"\", \"active\", \"\"\n",
            "\"example.org\", \"user2@example.org\", \"\", \"inactive\", ",
            "\"/home/miab/mail/example.org/user2\"\n",
        );
        assert_eq!(out, want);
    }

    #[test]
    fn privileges_flatten_single() {
        let p = Privileges::Single("admin".to_string());
        assert_eq!(p.flatten(), "admin");
    }

    #[test]
    fn privileges_flatten_sequence_joins() {
        let p = Privileges::Multiple(vec!["admin".to_string(), "backup".to_string()]);
        assert_eq!(p.flatten(), "admin; backup");
    }

    #[test]
    fn user_decodes_list_privileges() {
        let body = r#"{"email": "a@example.org", "privileges": ["admin"], "status": "active"}"#;
        let user: User = serde_json::from_str(body).unwrap();
        assert_eq!(
            user.privileges,
            Some(Privileges::Multiple(vec!["admin".to_string()]))
        );
        assert_eq!(user.status, Status::Active);
        assert_eq!(user.mailbox, "");
    }

    #[test]
    fn user_decodes_scalar_privileges() {
        let body = r#"{
            "email": "old@example.org",
            "privileges": "admin",
            "status": "inactive",
            "mailbox": "/home/miab/mail/example.org/old"
        }"#;
        let user: User = serde_json::from_str(body).unwrap();
        assert_eq!(user.privileges, Some(Privileges::Single("admin".to_string())));
        assert_eq!(user.status, Status::Archived);
        assert_eq!(user.mailbox, "/home/miab/mail/example.org/old");
    }

    #[test]
    fn user_decodes_null_privileges() {
        let body = r#"{"email": "a@example.org", "privileges": null, "status": "active"}"#;
        let user: User = serde_json::from_str(body).unwrap();
        assert_eq!(user.privileges, None);
    }

    #[test]
    fn user_accepts_capitalized_status_key() {
        let body = r#"{"email": "a@example.org", "Status": "active"}"#;
        let user: User = serde_json::from_str(body).unwrap();
        assert_eq!(user.status, Status::Active);
    }

    #[test]
    fn mail_domain_json_round_trip() {
        let domain = sample_domain();
        let json = serde_json::to_string(&domain).unwrap();
        let back: MailDomain = serde_json::from_str(&json).unwrap();
        assert_eq!(back, domain);
    }
}
