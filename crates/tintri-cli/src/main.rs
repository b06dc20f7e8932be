//! Command-line utilities for Tintri VMstore appliances and Global Center
//! servers, built on `tintri-client`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use comfy_table::{presets, Table};
use secrecy::SecretString;
use tintri_client::models::{Consistency, QosConfig, SnapshotSpec, Vm, VmFilter, VmReportFilter};
use tintri_client::{Session, TintriClient, RECOMMENDATION_MIN_MINOR, SERVICE_GROUP_MIN_MINOR};
use tintri_core::query::QueryParams;
use tintri_core::version::{PRODUCT_GLOBAL_CENTER, PRODUCT_VMSTORE};
use tracing_subscriber::EnvFilter;

/// Minimum minor version the VMstore commands were verified against.
const VMSTORE_MIN_MINOR: u32 = 21;

/// Minimum minor version carrying the bulk QoS update endpoint.
const QOS_MIN_MINOR: u32 = 31;

/// Minimum minor version carrying downloadable reports on Global Center.
const REPORT_MIN_MINOR: u32 = 51;

const DEFAULT_PAGE_SIZE: u32 = 25;

#[derive(Parser)]
#[command(name = "tintri", version, about = "Tintri REST API utilities")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Server address and credentials, shared by every subcommand.
#[derive(Args)]
struct Connect {
    /// Server name or IP address.
    server: String,
    /// Account name.
    username: String,
    /// Account password.
    password: String,
    /// Skip TLS certificate verification.
    #[arg(long)]
    insecure: bool,
    /// Request timeout in seconds.
    #[arg(long, default_value_t = 60)]
    timeout: u64,
}

impl Connect {
    fn client(&self) -> Result<TintriClient> {
        let client = TintriClient::builder(self.server.as_str())
            .with_tls_verify(!self.insecure)
            .with_timeout(self.timeout)
            .build()?;
        Ok(client)
    }

    fn password(&self) -> SecretString {
        SecretString::from(self.password.clone())
    }
}

#[derive(Subcommand)]
enum Command {
    /// Show model and OS information for a VMstore appliance.
    Info {
        #[command(flatten)]
        connect: Connect,
    },
    /// List VMs, following pagination.
    Vms {
        #[command(flatten)]
        connect: Connect,
        /// Show live VMs only.
        #[arg(long)]
        live: bool,
        /// Page size for the listing.
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: u32,
    },
    /// Show the latest space, IOPS, and latency statistics per live VM.
    Stats {
        #[command(flatten)]
        connect: Connect,
    },
    /// Take a manual snapshot of one VM.
    Snapshot {
        #[command(flatten)]
        connect: Connect,
        /// VM name as known to the hypervisor.
        vm_name: String,
        /// Consistency level: crash or vm.
        #[arg(long, default_value = "crash")]
        consistency: Consistency,
    },
    /// Delete the oldest user-generated snapshot of one VM.
    DeleteSnapshot {
        #[command(flatten)]
        connect: Connect,
        /// VM name as known to the hypervisor.
        vm_name: String,
    },
    /// Set min/max normalized IOPS on the first two live VMs.
    Qos {
        #[command(flatten)]
        connect: Connect,
        /// Minimum normalized IOPS.
        min_iops: u64,
        /// Maximum normalized IOPS.
        max_iops: u64,
    },
    /// Add VMs to a Global Center service group by name.
    SgAdd {
        #[command(flatten)]
        connect: Connect,
        /// Service group display name.
        group_name: String,
        /// VM names to add.
        #[arg(required = true)]
        vm_names: Vec<String>,
    },
    /// Show pool recommendations on Global Center, optionally accepting them.
    Reco {
        #[command(flatten)]
        connect: Connect,
        /// Accept the available recommendations after listing them.
        #[arg(long)]
        accept: bool,
    },
    /// Generate a VM report on Global Center and download it as CSV.
    Report {
        #[command(flatten)]
        connect: Connect,
        /// File listing report attribute names, one per line.
        fields_file: PathBuf,
        /// Destination path for the CSV.
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli.command).await {
        tracing::error!("{err:#}");
        std::process::exit(1);
    }
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Info { connect } => info(&connect).await,
        Command::Vms {
            connect,
            live,
            page_size,
        } => vms(&connect, live, page_size).await,
        Command::Stats { connect } => stats(&connect).await,
        Command::Snapshot {
            connect,
            vm_name,
            consistency,
        } => snapshot(&connect, &vm_name, consistency).await,
        Command::DeleteSnapshot { connect, vm_name } => delete_snapshot(&connect, &vm_name).await,
        Command::Qos {
            connect,
            min_iops,
            max_iops,
        } => qos(&connect, min_iops, max_iops).await,
        Command::SgAdd {
            connect,
            group_name,
            vm_names,
        } => sg_add(&connect, &group_name, vm_names).await,
        Command::Reco { connect, accept } => reco(&connect, accept).await,
        Command::Report {
            connect,
            fields_file,
            output,
        } => report(&connect, &fields_file, &output).await,
    }
}

fn table_with_header(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_header(header);
    table
}

/// One statistic from the VM's newest slice, or a dash when absent.
fn latest_stat(vm: &Vm, key: &str) -> String {
    vm.stat
        .as_ref()
        .and_then(|stats| stats.latest())
        .and_then(|slice| slice.get(key))
        .map_or_else(|| "-".to_string(), ToString::to_string)
}

async fn info(connect: &Connect) -> Result<()> {
    let client = connect.client()?;
    let version = client.info().await?;
    version.check(PRODUCT_VMSTORE, VMSTORE_MIN_MINOR)?;

    let api = &client;
    let appliance = client
        .with_session(&connect.username, &connect.password(), |session| {
            async move { api.appliance_info(&session).await }
        })
        .await?;

    let mut table = table_with_header(vec!["Info", "Value"]);
    table.add_row(vec!["Product", version.product_name.as_str()]);
    table.add_row(vec!["API version", version.preferred_version.as_str()]);
    table.add_row(vec![
        "Model",
        appliance.model_name.as_deref().unwrap_or("-"),
    ]);
    table.add_row(vec![
        "OS version",
        appliance.os_version.as_deref().unwrap_or("-"),
    ]);
    println!("{table}");
    Ok(())
}

async fn vms(connect: &Connect, live: bool, page_size: u32) -> Result<()> {
    let client = connect.client()?;
    client
        .info()
        .await?
        .check(PRODUCT_VMSTORE, VMSTORE_MIN_MINOR)?;

    let filter = if live {
        VmFilter::live_only()
    } else {
        VmFilter::default()
    };
    let api = &client;
    let filter_ref = &filter;
    let vms = client
        .with_session(&connect.username, &connect.password(), |session| {
            async move { api.list_vms_paged(filter_ref, page_size, &session).await }
        })
        .await?;

    let mut table = table_with_header(vec!["VM name", "UUID", "Live"]);
    for vm in &vms {
        table.add_row(vec![
            vm.name().unwrap_or("-"),
            vm.uuid.uuid.as_str(),
            vm.is_live.map_or("-", |live| if live { "yes" } else { "no" }),
        ]);
    }
    println!("{table}");
    println!("{} VMs", vms.len());
    Ok(())
}

async fn stats(connect: &Connect) -> Result<()> {
    let client = connect.client()?;
    client
        .info()
        .await?
        .check(PRODUCT_VMSTORE, VMSTORE_MIN_MINOR)?;

    let api = &client;
    let vms = client
        .with_session(&connect.username, &connect.password(), |session| {
            async move {
                api.list_vms_paged(&VmFilter::live_only(), DEFAULT_PAGE_SIZE, &session)
                    .await
            }
        })
        .await?;

    let mut table = table_with_header(vec!["VM name", "Space used (GiB)", "IOPS", "Latency (ms)"]);
    for vm in &vms {
        table.add_row(vec![
            vm.name().unwrap_or("-").to_string(),
            latest_stat(vm, "spaceUsedGiB"),
            latest_stat(vm, "operationsTotalIops"),
            latest_stat(vm, "latencyTotalMs"),
        ]);
    }
    println!("{table}");
    Ok(())
}

async fn snapshot(connect: &Connect, vm_name: &str, consistency: Consistency) -> Result<()> {
    let client = connect.client()?;
    client
        .info()
        .await?
        .check(PRODUCT_VMSTORE, VMSTORE_MIN_MINOR)?;

    let snapshot_name = format!("{vm_name}{}", Local::now().format("%Y-%m-%dT%H:%M:%S"));
    let api = &client;
    let name_ref = &snapshot_name;
    let uuids = client
        .with_session(&connect.username, &connect.password(), |session| {
            async move {
                let vm = api.find_vm_by_name(vm_name, &session).await?;
                let spec = SnapshotSpec::new(vm.uuid.uuid, name_ref.clone(), consistency);
                api.create_snapshots(&[spec], &session).await
            }
        })
        .await?;

    for uuid in uuids {
        println!("created snapshot {snapshot_name} ({uuid})");
    }
    Ok(())
}

async fn delete_snapshot(connect: &Connect, vm_name: &str) -> Result<()> {
    let client = connect.client()?;
    client
        .info()
        .await?
        .check(PRODUCT_VMSTORE, VMSTORE_MIN_MINOR)?;

    let api = &client;
    let deleted = client
        .with_session(&connect.username, &connect.password(), |session| {
            async move {
                let vm = api.find_vm_by_name(vm_name, &session).await?;

                // Oldest user-generated snapshot first.
                let mut query = QueryParams::new();
                query.push("queryType", "TOP_DOCS_BY_TIME");
                query.push("limit", 1);
                query.push("type", "USER_GENERATED_SNAPSHOT");
                query.push("vmUuid", vm.uuid.uuid.clone());
                let page = api.list_snapshots(&query, &session).await?;

                match page.items.into_iter().next() {
                    Some(snapshot) => {
                        api.delete_snapshot(&snapshot.uuid.uuid, &session).await?;
                        Ok(Some(snapshot))
                    }
                    None => Ok(None),
                }
            }
        })
        .await?;

    match deleted {
        Some(snapshot) => println!("deleted snapshot {}", snapshot.uuid.uuid),
        None => println!("no user-generated snapshots for {vm_name}"),
    }
    Ok(())
}

async fn qos(connect: &Connect, min_iops: u64, max_iops: u64) -> Result<()> {
    let client = connect.client()?;
    client.info().await?.check(PRODUCT_VMSTORE, QOS_MIN_MINOR)?;

    let api = &client;
    let (before, after) = client
        .with_session(&connect.username, &connect.password(), |session| {
            async move {
                let live = api
                    .list_vms_paged(&VmFilter::live_only(), DEFAULT_PAGE_SIZE, &session)
                    .await?;
                let targets: Vec<Vm> = live.into_iter().take(2).collect();
                let uuids: Vec<String> =
                    targets.iter().map(|vm| vm.uuid.uuid.clone()).collect();

                let qos = QosConfig {
                    min_normalized_iops: Some(min_iops),
                    max_normalized_iops: Some(max_iops),
                    type_id: None,
                };
                api.update_qos(uuids.clone(), qos, &session).await?;

                let filter = VmFilter {
                    uuids,
                    ..VmFilter::default()
                };
                let updated = api.list_vms(&filter, &session).await?;
                Ok((targets, updated.items))
            }
        })
        .await?;

    let mut table = table_with_header(vec!["VM name", "Min IOPS", "Max IOPS"]);
    let qos_row = |vm: &Vm| {
        let qos = vm.qos_config.clone().unwrap_or_default();
        vec![
            vm.name().unwrap_or("-").to_string(),
            qos.min_normalized_iops
                .map_or_else(|| "-".to_string(), |v| v.to_string()),
            qos.max_normalized_iops
                .map_or_else(|| "-".to_string(), |v| v.to_string()),
        ]
    };
    for vm in &before {
        table.add_row(qos_row(vm));
    }
    println!("before:\n{table}");

    let mut table = table_with_header(vec!["VM name", "Min IOPS", "Max IOPS"]);
    for vm in &after {
        table.add_row(qos_row(vm));
    }
    println!("after:\n{table}");
    Ok(())
}

async fn sg_add(connect: &Connect, group_name: &str, vm_names: Vec<String>) -> Result<()> {
    let client = connect.client()?;
    client
        .info()
        .await?
        .check(PRODUCT_GLOBAL_CENTER, SERVICE_GROUP_MIN_MINOR)?;

    let api = &client;
    let names_ref = &vm_names;
    let added = client
        .with_session(&connect.username, &connect.password(), |session| {
            async move {
                let group = api.find_service_group(group_name, &session).await?;
                let mut uuids = Vec::with_capacity(names_ref.len());
                for name in names_ref {
                    let vm = api.find_vm_by_name(name, &session).await?;
                    uuids.push(vm.uuid.uuid);
                }
                let count = uuids.len();
                api.add_service_group_members(&group.uuid.uuid, uuids, &session)
                    .await?;
                Ok(count)
            }
        })
        .await?;

    println!("added {added} VMs to {group_name}");
    Ok(())
}

async fn reco(connect: &Connect, accept: bool) -> Result<()> {
    let client = connect.client()?;
    client
        .info()
        .await?
        .check(PRODUCT_GLOBAL_CENTER, RECOMMENDATION_MIN_MINOR)?;

    let api = &client;
    let rows = client
        .with_session(&connect.username, &connect.password(), |session| {
            async move {
                let pools = api.list_vmstore_pools(&session).await?.items;
                let mut rows = Vec::with_capacity(pools.len());
                for pool in pools {
                    let reco = api.current_recommendation(&pool.uuid.uuid, &session).await?;
                    let accepted = accept && reco.is_available();
                    if accepted {
                        api.accept_recommendation(&pool.uuid.uuid, &reco.id, &session)
                            .await?;
                    }
                    rows.push((pool.name, reco.state, accepted));
                }
                Ok(rows)
            }
        })
        .await?;

    let mut table = table_with_header(vec!["Pool", "Recommendation", "Accepted"]);
    for (name, state, accepted) in &rows {
        table.add_row(vec![
            name.as_str(),
            state.as_str(),
            if *accepted { "yes" } else { "-" },
        ]);
    }
    println!("{table}");
    Ok(())
}

/// Report attributes file: one name per line, `#` starts a comment.
fn read_report_fields(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read fields file {}", path.display()))?;
    let fields: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect();
    anyhow::ensure!(!fields.is_empty(), "fields file {} is empty", path.display());
    Ok(fields)
}

async fn report(connect: &Connect, fields_file: &Path, output: &Path) -> Result<()> {
    let client = connect.client()?;
    client
        .info()
        .await?
        .check(PRODUCT_GLOBAL_CENTER, REPORT_MIN_MINOR)?;

    let fields = read_report_fields(fields_file)?;
    let attachment = output
        .file_name()
        .map_or_else(|| "report.csv".to_string(), |name| name.to_string_lossy().into_owned());
    let filter = VmReportFilter::csv(attachment, fields);

    let api = &client;
    let filter_ref = &filter;
    client
        .with_session(&connect.username, &connect.password(), |session: Session| {
            async move {
                let url = api.generate_vm_report(filter_ref, &session).await?;
                tracing::info!(url, "report ready");
                api.download_file(&url, &session, output).await
            }
        })
        .await?;

    println!("report written to {}", output.display());
    Ok(())
}
