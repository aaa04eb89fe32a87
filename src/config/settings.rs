use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use alloy::primitives::{Address, U256, utils::parse_ether};
use eyre::{Result, WrapErr, eyre};
use serde::{Deserialize, Serialize};

use crate::network::DeployStatusPolicy;
use crate::project::FoundryProject;

const CONFIG_DIR: &str = "devkit";
pub const CONFIG_FILE: &str = "devkit.toml";

/// Tool configuration, read from `devkit.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DevConfig {
    #[serde(default)]
    pub abi: AbiConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub deploy: DeployConfig,

    #[serde(skip)]
    config_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AbiConfig {
    /// Foundry project root holding foundry.toml
    pub project: PathBuf,
    /// Compiler output directory, overrides `out` from foundry.toml
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,
    pub contracts: Vec<String>,
    pub destinations: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub rpc_url: String,
    pub timeout_secs: u64,
    pub address: String,
    /// Decimal wei, 0x-prefixed hex wei, or `<n>ether`
    pub balance: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    /// Working directory of the script, overrides `script` from foundry.toml
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_dir: Option<PathBuf>,
    pub script: String,
    pub shell: String,
    pub check_status: bool,
}

impl Default for AbiConfig {
    fn default() -> Self {
        Self {
            project: PathBuf::from("contracts"),
            out_dir: None,
            contracts: ["MonksPublication", "MonksERC20", "MonksMarket", "MonksTestFaucet"]
                .into_iter()
                .map(String::from)
                .collect(),
            destinations: vec![
                PathBuf::from("contracts/python/abis"),
                PathBuf::from("python/indexer/contracts"),
            ],
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:8545".to_string(),
            timeout_secs: 120,
            address: "0xA12Dd3E2049ebb0B953AD0B01914fF399955924d".to_string(),
            balance: "10ether".to_string(),
        }
    }
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            script_dir: None,
            script: "deploy_publication.sh".to_string(),
            shell: "sh".to_string(),
            check_status: true,
        }
    }
}

/// Command line values that take precedence over `[network]` and `[deploy]`
#[derive(Debug, Clone, Default)]
pub struct NetworkOverrides {
    pub rpc_url: Option<String>,
    pub address: Option<String>,
    pub balance: Option<String>,
    pub ignore_deploy_status: bool,
}

/// Everything the ABI exporter needs, with paths made absolute
#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub out_dir: PathBuf,
    pub contracts: Vec<String>,
    pub destinations: Vec<PathBuf>,
}

/// Everything the network initializer needs, parsed and resolved
#[derive(Debug, Clone)]
pub struct InitSettings {
    pub rpc_url: String,
    pub timeout: Duration,
    pub address: Address,
    pub balance: U256,
    pub script_dir: PathBuf,
    pub script: String,
    pub shell: String,
    pub policy: DeployStatusPolicy,
}

impl DevConfig {
    /// Find and load the configuration for a project.
    ///
    /// Looks at `<root>/devkit.toml`, then the user config directory, and
    /// falls back to the built-in defaults.
    pub fn load(root: &Path) -> Result<Self> {
        let project_config = root.join(CONFIG_FILE);
        if project_config.exists() {
            return Self::load_from(&project_config);
        }

        if let Ok(user_config) = Self::default_config_path() {
            if user_config.exists() {
                return Self::load_from(&user_config);
            }
        }

        tracing::debug!("No {} found, using defaults", CONFIG_FILE);
        Ok(Self::default())
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config file: {:?}", path))?;

        let mut config: DevConfig =
            toml::from_str(&content).wrap_err("Failed to parse config file")?;

        tracing::debug!("Loaded config from {:?}", path);
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Write the configuration as TOML
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .wrap_err_with(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).wrap_err("Failed to serialize config")?;

        fs::write(path, content)
            .wrap_err_with(|| format!("Failed to write config file: {:?}", path))?;

        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Where the configuration was loaded from, if anywhere
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| eyre!("Could not determine config directory"))?;

        Ok(config_dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Replace the configured contract and destination lists when given
    pub fn apply_export_overrides(&mut self, contracts: Vec<String>, destinations: Vec<PathBuf>) {
        if !contracts.is_empty() {
            self.abi.contracts = contracts;
        }
        if !destinations.is_empty() {
            self.abi.destinations = destinations;
        }
    }

    /// Apply command line overrides for `init-network`
    pub fn apply_network_overrides(&mut self, overrides: NetworkOverrides) {
        if let Some(url) = overrides.rpc_url {
            self.network.rpc_url = url;
        }
        if let Some(address) = overrides.address {
            self.network.address = address;
        }
        if let Some(balance) = overrides.balance {
            self.network.balance = balance;
        }
        if overrides.ignore_deploy_status {
            self.deploy.check_status = false;
        }
    }

    /// Write this configuration to `<root>/devkit.toml`.
    ///
    /// An existing file is only replaced when `force` is set.
    pub fn init_config(&self, root: &Path, force: bool) -> Result<PathBuf> {
        let path = root.join(CONFIG_FILE);
        if path.exists() && !force {
            return Err(eyre!(
                "{} already exists, pass --force to replace it",
                path.display()
            ));
        }

        self.save_to(&path)?;
        Ok(path)
    }

    fn foundry_project(&self, root: &Path) -> Result<FoundryProject> {
        FoundryProject::load(&root.join(&self.abi.project))
    }

    /// Resolve the exporter settings against the project root
    pub fn export_settings(&self, root: &Path) -> Result<ExportSettings> {
        let out_dir = match &self.abi.out_dir {
            Some(dir) => root.join(dir),
            None => self.foundry_project(root)?.out_dir,
        };

        if self.abi.destinations.is_empty() {
            return Err(eyre!("No ABI destinations configured"));
        }

        Ok(ExportSettings {
            out_dir,
            contracts: self.abi.contracts.clone(),
            destinations: self.abi.destinations.iter().map(|d| root.join(d)).collect(),
        })
    }

    /// Resolve and validate the initializer settings against the project root
    pub fn init_settings(&self, root: &Path) -> Result<InitSettings> {
        let address: Address = self
            .network
            .address
            .parse()
            .map_err(|e| eyre!("Invalid address {:?}: {}", self.network.address, e))?;

        let balance = parse_balance(&self.network.balance)?;

        let script_dir = match &self.deploy.script_dir {
            Some(dir) => root.join(dir),
            None => self.foundry_project(root)?.script_dir,
        };

        let policy = if self.deploy.check_status {
            DeployStatusPolicy::Enforce
        } else {
            DeployStatusPolicy::Ignore
        };

        Ok(InitSettings {
            rpc_url: self.network.rpc_url.clone(),
            timeout: Duration::from_secs(self.network.timeout_secs),
            address,
            balance,
            script_dir,
            script: self.deploy.script.clone(),
            shell: self.deploy.shell.clone(),
            policy,
        })
    }
}

/// Parse a balance given as decimal wei, 0x-hex wei, or `<n>ether`
pub fn parse_balance(value: &str) -> Result<U256> {
    let value = value.trim();

    // parse_ether accepts a sign and would hand back two's-complement bits
    if value.starts_with('-') {
        return Err(eyre!("Invalid balance {:?}: must not be negative", value));
    }

    if let Some(ether) = value.strip_suffix("ether") {
        return parse_ether(ether.trim()).map_err(|e| eyre!("Invalid balance {:?}: {}", value, e));
    }

    if value.starts_with("0x") {
        value.parse().wrap_err_with(|| format!("Invalid balance {:?}", value))
    } else {
        U256::from_str_radix(value, 10).wrap_err_with(|| format!("Invalid balance {:?}", value))
    }
}
