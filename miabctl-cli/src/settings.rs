//! Connection settings resolution.
//!
//! Credentials and the endpoint can come from three places, in order of
//! precedence: command line flags, environment variables
//! (`MIABCTL_USER`/`MIABCTL_PASSWORD`/`MIABCTL_ENDPOINT`, handled by clap),
//! and a TOML config file. The file is only consulted for values the flags
//! and environment left unset.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use miabctl_client::Config;
use serde::Deserialize;

/// Global connection options, shared by every subcommand.
#[derive(Debug, Args)]
pub struct ConnectionArgs {
    /// Config file (default: <config dir>/miabctl/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// User to authenticate, may also be set via environment or config file
    #[arg(short, long, global = true, env = "MIABCTL_USER")]
    pub user: Option<String>,

    /// Password to authenticate, may also be set via environment or config file
    #[arg(short, long, global = true, env = "MIABCTL_PASSWORD")]
    pub password: Option<String>,

    /// API endpoint (e.g. https://box.example.org), may also be set via
    /// environment or config file
    #[arg(short, long, global = true, env = "MIABCTL_ENDPOINT")]
    pub endpoint: Option<String>,
}

/// The subset of settings a config file may provide.
#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    user: Option<String>,
    password: Option<String>,
    endpoint: Option<String>,
}

/// Resolves the connection arguments into a validated [`Config`].
pub fn resolve(args: &ConnectionArgs) -> anyhow::Result<Config> {
    let mut user = args.user.clone();
    let mut password = args.password.clone();
    let mut endpoint = args.endpoint.clone();

    // Only fall back to the file when something is still missing; an
    // explicitly requested file that cannot be read is always an error.
    if user.is_none() || password.is_none() || endpoint.is_none() {
        if let Some(file) = load_file(args.config.as_ref())? {
            user = user.or(file.user);
            password = password.or(file.password);
            endpoint = endpoint.or(file.endpoint);
        }
    }

    let config = Config::new(
        user.as_deref().unwrap_or_default(),
        password.as_deref().unwrap_or_default(),
        endpoint.as_deref().unwrap_or_default(),
    )?;

    Ok(config)
}

fn load_file(explicit: Option<&PathBuf>) -> anyhow::Result<Option<FileSettings>> {
    let path = match explicit {
        Some(path) => path.clone(),
        None => {
            let Some(dir) = dirs::config_dir() else {
                return Ok(None);
            };
            let path = dir.join("miabctl").join("config.toml");
            if !path.exists() {
                return Ok(None);
            }
            path
        }
    };

    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("can't read config file {}", path.display()))?;
    let settings: FileSettings = toml::from_str(&raw)
        .with_context(|| format!("config file {} is invalid", path.display()))?;

    Ok(Some(settings))
}
