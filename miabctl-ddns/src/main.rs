//! Periodic dynamic DNS updater for Mail-in-a-Box.
//!
//! Designed to run in a container: everything is configured through the
//! environment. At each tick the configured address records are updated
//! with an empty value, so the server stores the address it observes on
//! the connection. SIGINT/SIGTERM stop scheduling further ticks and exit.
//!
//! Environment:
//! - `MIABCTL_USER` / `MIABCTL_PASSWORD` / `MIABCTL_ENDPOINT` — API access
//! - `DDNS_INTERVAL` — update interval in seconds, clamped to >= 30
//! - `DDNS_IPV4` / `DDNS_IPV6` — update A / AAAA records (`true`/`false`)
//! - `DDNS_DOMAINS` — qnames to update, separated by `,` or `;`

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use miabctl_client::{Config, DnsClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Lower bound for the update interval (seconds).
const MIN_INTERVAL_SECS: u64 = 30;

struct Settings {
    config: Config,
    interval: Duration,
    ipv4: bool,
    ipv6: bool,
    domains: Vec<String>,
}

fn settings_from_env() -> anyhow::Result<Settings> {
    let interval: u64 = std::env::var("DDNS_INTERVAL")
        .context("DDNS_INTERVAL is not set")?
        .parse()
        .context("DDNS_INTERVAL has to be an unsigned integer (seconds)")?;
    let interval = Duration::from_secs(interval.max(MIN_INTERVAL_SECS));

    let user = std::env::var("MIABCTL_USER").unwrap_or_default();
    let password = std::env::var("MIABCTL_PASSWORD").unwrap_or_default();
    let endpoint = std::env::var("MIABCTL_ENDPOINT").unwrap_or_default();
    let config = Config::new(&user, &password, &endpoint)?;

    let ipv4 = env_flag("DDNS_IPV4");
    let ipv6 = env_flag("DDNS_IPV6");

    let raw = std::env::var("DDNS_DOMAINS").unwrap_or_default();
    let separator = if raw.contains(';') { ';' } else { ',' };
    let domains: Vec<String> = raw
        .split(separator)
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .collect();

    Ok(Settings {
        config,
        interval,
        ipv4,
        ipv6,
        domains,
    })
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(false)
}

async fn update_all(client: &DnsClient<'_>, settings: &Settings) {
    for domain in &settings.domains {
        if settings.ipv4 {
            match client.update_dns4(domain, "").await {
                Ok(_) => tracing::info!("DNS update (A) for '{domain}' successful"),
                Err(e) if e.is_expected() => {
                    tracing::warn!("DNS update (A) for '{domain}' failed: {e}");
                }
                Err(e) => tracing::error!("DNS update (A) for '{domain}' failed: {e}"),
            }
        }
        if settings.ipv6 {
            match client.update_dns6(domain, "").await {
                Ok(_) => tracing::info!("DNS update (AAAA) for '{domain}' successful"),
                Err(e) if e.is_expected() => {
                    tracing::warn!("DNS update (AAAA) for '{domain}' failed: {e}");
                }
                Err(e) => tracing::error!("DNS update (AAAA) for '{domain}' failed: {e}"),
            }
        }
    }
}

/// Resolves when the process is asked to stop (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let settings = match settings_from_env() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    if settings.domains.is_empty() || (!settings.ipv4 && !settings.ipv6) {
        tracing::error!(
            "nothing to do: set DDNS_DOMAINS and at least one of DDNS_IPV4/DDNS_IPV6"
        );
        return ExitCode::FAILURE;
    }

    tracing::info!(
        "updating {} domain(s) every {}s (A: {}, AAAA: {})",
        settings.domains.len(),
        settings.interval.as_secs(),
        settings.ipv4,
        settings.ipv6
    );

    let client = DnsClient::new(&settings.config);
    let mut ticker = tokio::time::interval(settings.interval);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => update_all(&client, &settings).await,
            () = &mut shutdown => {
                tracing::info!("shutdown signal received, exiting");
                break;
            }
        }
    }

    ExitCode::SUCCESS
}
