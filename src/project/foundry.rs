use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use serde::Deserialize;

const FOUNDRY_TOML: &str = "foundry.toml";

/// The parts of foundry.toml that locate artifacts and scripts
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FoundryConfig {
    #[serde(default)]
    pub profile: HashMap<String, ProfileConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileConfig {
    pub out: Option<String>,
    pub script: Option<String>,
}

impl FoundryConfig {
    fn default_profile(&self) -> Option<&ProfileConfig> {
        self.profile.get("default")
    }

    pub fn out_dir(&self) -> &str {
        self.default_profile()
            .and_then(|p| p.out.as_deref())
            .unwrap_or("out")
    }

    pub fn script_dir(&self) -> &str {
        self.default_profile()
            .and_then(|p| p.script.as_deref())
            .unwrap_or("script")
    }
}

/// Directories of a Foundry project the tool reads from
#[derive(Debug, Clone)]
pub struct FoundryProject {
    pub out_dir: PathBuf,
    pub script_dir: PathBuf,
}

impl FoundryProject {
    /// Load a Foundry project from the given path.
    ///
    /// Without a foundry.toml the default `out/` and `script/` layout is used.
    pub fn load(path: &Path) -> Result<Self> {
        let config_path = path.join(FOUNDRY_TOML);

        let config = if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .wrap_err_with(|| format!("Failed to read {:?}", config_path))?;

            toml::from_str(&content).wrap_err("Failed to parse foundry.toml")?
        } else {
            tracing::warn!("No foundry.toml at {:?}, using default layout", path);
            FoundryConfig::default()
        };

        Ok(Self::from_config(path, &config))
    }

    fn from_config(path: &Path, config: &FoundryConfig) -> Self {
        Self {
            out_dir: path.join(config.out_dir()),
            script_dir: path.join(config.script_dir()),
        }
    }
}
