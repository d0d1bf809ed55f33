//! amroute CLI
//!
//! Command-line interface for bootstrapping an organization's notification
//! policy and provisioning its mute timings against a file-backed data directory.

mod config;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use amroute_config_file::{FileConfigStore, FileProvenanceStore};
use amroute_core::{
    OrgId,
    definitions::{MuteTimeInterval, MuteTiming, Provenance},
};
use amroute_provisioning::MuteTimingService;

use config::CliConfig;

#[derive(Parser)]
#[command(name = "amroute")]
#[command(about = "amroute - notification policy configuration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file (YAML or TOML)
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "AMROUTE_CONFIG",
        global = true
    )]
    config: Option<String>,

    /// Data directory (overrides config and AMROUTE_DATA_DIR)
    #[arg(long, value_name = "DIR", global = true)]
    data_dir: Option<String>,

    /// Organization to operate on
    #[arg(long = "org", value_name = "ID", global = true)]
    org_id: Option<i64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or repair the organization's routing configuration
    Migrate,
    /// Manage mute timings
    MuteTimings {
        #[command(subcommand)]
        action: MuteTimingCommand,
    },
}

#[derive(Subcommand)]
enum MuteTimingCommand {
    /// List all mute timings
    List,
    /// Show one mute timing
    Get { name: String },
    /// Create a mute timing from a YAML or JSON definition
    Create {
        #[arg(long, value_name = "FILE")]
        file: PathBuf,

        /// Provenance to record (api, file, converted_prometheus)
        #[arg(long, default_value = "")]
        provenance: String,
    },
    /// Replace an existing mute timing with a YAML or JSON definition
    Update {
        #[arg(long, value_name = "FILE")]
        file: PathBuf,

        /// Provenance to record (api, file, converted_prometheus)
        #[arg(long, default_value = "")]
        provenance: String,
    },
    /// Delete a mute timing
    Delete { name: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = if let Some(ref path) = cli.config {
        let path = shellexpand::tilde(path).into_owned();
        CliConfig::from_file(&path)?
    } else {
        CliConfig::default()
    };

    // Merge environment variables (they override config file)
    config.merge_env();

    // CLI flags have highest precedence
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(org_id) = cli.org_id {
        config.org_id = org_id;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    // Logs go to stderr so stdout stays machine-readable
    let filter = EnvFilter::new(config.log_level().to_string());
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let org_id = config.org()?;
    let data_dir = config.data_dir_path();
    let config_store = Arc::new(FileConfigStore::with_format(&data_dir, config.format()?).await?);
    debug!("Using data directory {:?} for org {}", data_dir, org_id);

    match cli.command {
        Commands::Migrate => {
            let version = amroute_migration::bootstrap_org(config_store.as_ref(), org_id).await?;
            info!("Org {} configuration at version {}", org_id, version);
            print_json(&serde_json::json!({ "org_id": org_id, "version": version }))?;
        }
        Commands::MuteTimings { action } => {
            let provenance = Arc::new(FileProvenanceStore::new(&data_dir).await?);
            let service = MuteTimingService::new(config_store, provenance);
            run_mute_timing_command(&service, action, org_id).await?;
        }
    }

    Ok(())
}

async fn run_mute_timing_command(
    service: &MuteTimingService,
    action: MuteTimingCommand,
    org_id: OrgId,
) -> anyhow::Result<()> {
    match action {
        MuteTimingCommand::List => print_json(&service.list(org_id).await?),
        MuteTimingCommand::Get { name } => print_json(&service.get(&name, org_id).await?),
        MuteTimingCommand::Create { file, provenance } => {
            let mute_timing = read_definition(&file, &provenance)?;
            print_json(&service.create(mute_timing, org_id).await?)
        }
        MuteTimingCommand::Update { file, provenance } => {
            let mute_timing = read_definition(&file, &provenance)?;
            print_json(&service.update(mute_timing, org_id).await?)
        }
        MuteTimingCommand::Delete { name } => {
            service.delete(&name, org_id).await?;
            print_json(&serde_json::json!({ "deleted": name }))
        }
    }
}

/// Load a mute time interval definition. YAML parsing also accepts JSON.
fn read_definition(path: &Path, provenance: &str) -> anyhow::Result<MuteTiming> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read definition {}", path.display()))?;
    let interval: MuteTimeInterval = serde_yaml::from_str(&contents)
        .with_context(|| format!("Invalid mute timing definition in {}", path.display()))?;
    let provenance: Provenance = provenance.parse()?;
    Ok(MuteTiming::new(interval, provenance))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
