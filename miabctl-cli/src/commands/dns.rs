//! The `dns` command.
//!
//! Without a subcommand, lists custom DNS records. `set`, `add` and
//! `delete` write records; omitting `--value` on `set`/`add` with an A or
//! AAAA record routes through the dynamic-address operation, so the server
//! stores the caller's observed address.

use anyhow::bail;
use clap::{Args, Subcommand};
use miabctl_client::{render, Config, DnsClient, Format, NetworkType, Records, ResourceType};

#[derive(Debug, Args)]
pub struct DnsCommand {
    #[command(subcommand)]
    action: Option<DnsAction>,

    #[command(flatten)]
    list: ListArgs,
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Fully qualified domain to filter the output. NOTE: the server
    /// defaults the record type to A when a qname is given; the
    /// domain-filter is ignored.
    #[arg(long)]
    qname: Option<String>,

    /// Resource type to filter the output (A, AAAA, TXT, CNAME, MX, SRV,
    /// SSHFP, CAA, NS)
    #[arg(long)]
    rtype: Option<String>,

    /// Substring to filter the listed record names by (e.g. '.org').
    /// Not considered when --qname is set.
    #[arg(long)]
    domain: Option<String>,

    /// Output format (plain, csv, json, yaml)
    #[arg(long, default_value = "plain")]
    format: String,
}

#[derive(Debug, Subcommand)]
enum DnsAction {
    /// Set a custom DNS record, replacing records with the same qname and
    /// rtype. Use 'set' when a qname and rtype has a single value, such as
    /// typical A records without round-robin.
    Set(WriteArgs),
    /// Add a custom DNS record, keeping existing ones. Use 'add' for
    /// multiple TXT records or round-robin A records ('set' would delete
    /// previously added records).
    Add(WriteArgs),
    /// Delete custom DNS records. Without --value, all records matching
    /// --qname and --rtype are deleted.
    Delete(WriteArgs),
}

#[derive(Debug, Args)]
struct WriteArgs {
    /// The fully qualified domain name for the record. It must be a domain
    /// or subdomain of a domain hosted on the box (add mail users or
    /// aliases to add new domains).
    #[arg(long)]
    qname: String,

    /// The resource type (A, AAAA, TXT, CNAME, MX, SRV, SSHFP, CAA, NS)
    #[arg(long, default_value = "A")]
    rtype: String,

    /// The record's value. For 'set' and 'add' with rtype A or AAAA it may
    /// be omitted, in which case the server uses the caller's observed
    /// address.
    #[arg(long)]
    value: Option<String>,
}

pub async fn run(config: &Config, command: DnsCommand) -> anyhow::Result<()> {
    match command.action {
        None => list(config, command.list).await,
        Some(DnsAction::Set(args)) => write(config, args, false).await,
        Some(DnsAction::Add(args)) => write(config, args, true).await,
        Some(DnsAction::Delete(args)) => delete(config, args).await,
    }
}

async fn list(config: &Config, args: ListArgs) -> anyhow::Result<()> {
    let format: Format = args.format.parse()?;
    let rtype = match args.rtype.as_deref() {
        Some(r) => r.parse::<ResourceType>()?,
        None => ResourceType::None,
    };
    let qname = args.qname.unwrap_or_default();

    let client = DnsClient::new(config);
    let records = client.get(&qname, rtype).await?;

    if qname.is_empty() {
        if let Some(domain) = args.domain.filter(|d| !d.is_empty()) {
            let filtered: Records = records
                .into_iter()
                .filter(|r| r.qname.contains(&domain))
                .filter(|r| rtype == ResourceType::None || r.rtype == rtype)
                .collect();
            println!("{}", render(&filtered, format)?);
            return Ok(());
        }
    } else if records.len() == 1 {
        // A single exact match prints just the value, handy for scripting.
        print!("{}", records[0].value);
        return Ok(());
    }

    println!("{}", render(&records, format)?);
    Ok(())
}

async fn write(config: &Config, args: WriteArgs, add: bool) -> anyhow::Result<()> {
    let rtype: ResourceType = args.rtype.parse()?;
    let client = DnsClient::new(config);

    let value = args.value.unwrap_or_default();
    if value.is_empty() {
        let network = match rtype {
            ResourceType::A => NetworkType::Tcp4,
            ResourceType::Aaaa => NetworkType::Tcp6,
            _ => bail!("--value can only be omitted when --rtype is 'A' or 'AAAA'"),
        };
        client
            .set_or_add_address_record(network, &args.qname, "", add)
            .await?;
        return Ok(());
    }

    if add {
        client.add(&args.qname, rtype, &value).await?;
    } else {
        client.set(&args.qname, rtype, &value).await?;
    }
    Ok(())
}

async fn delete(config: &Config, args: WriteArgs) -> anyhow::Result<()> {
    let rtype: ResourceType = args.rtype.parse()?;
    let client = DnsClient::new(config);
    client
        .delete(&args.qname, rtype, args.value.as_deref().unwrap_or_default())
        .await?;
    Ok(())
}
