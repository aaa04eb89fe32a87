mod deploy;
mod rpc;

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use alloy::primitives::{Address, U256};
use alloy::transports::TransportError;

pub use deploy::DeployScript;
pub use rpc::DevnetClient;

use crate::config::InitSettings;

/// Errors raised while preparing the local test network
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("RPC call {method} to {url} failed")]
    Rpc {
        url: String,
        method: &'static str,
        #[source]
        source: TransportError,
    },
    #[error("RPC call to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },
    #[error("failed to start deployment script {script:?}")]
    Spawn {
        script: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("deployment script {script:?} failed: {status}")]
    Deployment { script: PathBuf, status: ExitStatus },
}

/// What to do when the deployment script exits non-zero
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeployStatusPolicy {
    /// Fail the run
    #[default]
    Enforce,
    /// Log a warning and report completion anyway
    Ignore,
}

#[derive(Debug)]
pub struct InitOutcome {
    pub deploy_status: ExitStatus,
}

impl InitOutcome {
    /// False only when the script failed under [`DeployStatusPolicy::Ignore`]
    pub fn deployed(&self) -> bool {
        self.deploy_status.success()
    }
}

/// Funds an account on a dev node, then runs the deployment script
pub struct NetworkInitializer {
    client: DevnetClient,
    address: Address,
    balance: U256,
    script: DeployScript,
    policy: DeployStatusPolicy,
}

impl NetworkInitializer {
    pub fn new(settings: InitSettings) -> Self {
        Self {
            client: DevnetClient::new(&settings.rpc_url, settings.timeout),
            address: settings.address,
            balance: settings.balance,
            script: DeployScript::new(&settings.shell, &settings.script, &settings.script_dir),
            policy: settings.policy,
        }
    }

    /// Set the balance, then deploy. The script only runs if the RPC call succeeded.
    pub async fn run(&self) -> Result<InitOutcome, InitError> {
        tracing::info!(
            "Setting balance of {} to {} wei on {}",
            self.address,
            self.balance,
            self.client.rpc_url()
        );
        self.client.set_balance(self.address, self.balance).await?;

        let status = self.script.run().await?;

        if !status.success() {
            match self.policy {
                DeployStatusPolicy::Enforce => {
                    return Err(InitError::Deployment {
                        script: self.script.path(),
                        status,
                    });
                }
                DeployStatusPolicy::Ignore => {
                    tracing::warn!(
                        "Deployment script {:?} failed ({}), continuing",
                        self.script.path(),
                        status
                    );
                }
            }
        }

        Ok(InitOutcome {
            deploy_status: status,
        })
    }
}
