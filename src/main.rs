mod config;
mod contracts;
mod network;
mod project;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use eyre::WrapErr;

use config::{DevConfig, NetworkOverrides};
use contracts::AbiExporter;
use network::NetworkInitializer;

#[derive(Parser, Debug)]
#[command(name = "devkit")]
#[command(about = "ABI export and local test network setup for Foundry contract projects")]
#[command(version)]
struct Cli {
    /// Path to the project directory
    #[arg(short = 'C', long = "project", global = true, default_value = ".")]
    path: PathBuf,

    /// Config file to use instead of <project>/devkit.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Copy contract ABIs from the compiler output into the consumer directories
    ExportAbis {
        /// Export only these contracts
        #[arg(long = "contract")]
        contracts: Vec<String>,

        /// Write to these directories instead of the configured ones
        #[arg(long = "dest")]
        destinations: Vec<PathBuf>,
    },

    /// Fund the deployer account on a local node and run the deployment script
    InitNetwork {
        #[arg(long)]
        rpc_url: Option<String>,

        /// Account to fund
        #[arg(long)]
        address: Option<String>,

        /// Amount in wei, 0x-hex wei, or <n>ether
        #[arg(long)]
        balance: Option<String>,

        /// Report completion even if the deployment script fails
        #[arg(long)]
        ignore_deploy_status: bool,
    },

    /// Write the effective configuration to <project>/devkit.toml
    InitConfig {
        /// Replace an existing devkit.toml
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
            .init();
    }

    let cli = Cli::parse();
    let root = cli.path.canonicalize().unwrap_or(cli.path);

    let mut config = match &cli.config {
        Some(path) => DevConfig::load_from(path)?,
        None => DevConfig::load(&root)?,
    };
    match config.config_path() {
        Some(path) => tracing::debug!("Using config {:?}", path),
        None => tracing::debug!("Using built-in defaults"),
    }

    match cli.command {
        Command::ExportAbis {
            contracts,
            destinations,
        } => {
            config.apply_export_overrides(contracts, destinations);

            let settings = config.export_settings(&root)?;
            let report = AbiExporter::new(settings)
                .export()
                .wrap_err("ABI export failed")?;

            for contract in &report.contracts {
                match &contract.summary {
                    Some(s) => println!(
                        "  {} ({} functions, {} events) -> {} files",
                        contract.name,
                        s.functions,
                        s.events,
                        contract.written.len()
                    ),
                    None => println!("  {} -> {} files", contract.name, contract.written.len()),
                }
            }
            println!(
                "Exported {} ABIs ({} files)",
                report.contracts.len(),
                report.files_written()
            );
        }
        Command::InitNetwork {
            rpc_url,
            address,
            balance,
            ignore_deploy_status,
        } => {
            config.apply_network_overrides(NetworkOverrides {
                rpc_url,
                address,
                balance,
                ignore_deploy_status,
            });

            let settings = config.init_settings(&root)?;
            let outcome = NetworkInitializer::new(settings)
                .run()
                .await
                .wrap_err("Test network setup failed")?;

            if !outcome.deployed() {
                tracing::warn!("Deployment did not succeed: {}", outcome.deploy_status);
            }
            println!("All done");
        }
        Command::InitConfig { force } => {
            let path = config.init_config(&root, force)?;
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}
