use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

#[allow(clippy::unwrap_used)] // the pattern is a compile-time constant
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(https?)://(.+)$").unwrap());

/// Connection details for a Mail-in-a-Box instance.
///
/// Holds the admin credentials and the validated base URL. A `Config` is
/// immutable once constructed; create it once per process and pass it by
/// reference into every client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    user: String,
    password: String,
    scheme: String,
    domain: String,
}

impl Config {
    /// Creates a new configuration to access the Mail-in-a-Box API.
    ///
    /// `url` must be an absolute `http://` or `https://` URL; surrounding
    /// whitespace and trailing slashes are stripped, the rest is lowercased.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when `user` or `password` is empty or
    /// `url` does not match `scheme://host`.
    pub fn new(user: &str, password: &str, url: &str) -> Result<Self> {
        if user.is_empty() {
            return Err(Error::validation("user", "'user' not specified"));
        }

        if password.is_empty() {
            return Err(Error::validation("password", "'password' not specified"));
        }

        let url = url.trim().to_lowercase();
        let caps = URL_RE
            .captures(&url)
            .ok_or_else(|| Error::validation("url", "'url' is not valid"))?;

        Ok(Self {
            user: user.to_string(),
            password: password.to_string(),
            scheme: caps[1].to_string(),
            domain: caps[2].trim_end_matches('/').to_string(),
        })
    }

    /// Reconstructs the request base URL (`scheme://domain`, no trailing
    /// slash).
    pub fn endpoint(&self) -> String {
        format!("{}://{}", self.scheme, self.domain)
    }

    /// The user to authenticate as.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// The password to authenticate with.
    pub fn password(&self) -> &str {
        &self.password
    }
}
