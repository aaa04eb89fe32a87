use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use tokio::process::Command;

use super::InitError;

/// A shell script run from its own directory
#[derive(Debug, Clone)]
pub struct DeployScript {
    shell: String,
    script: String,
    working_dir: PathBuf,
}

impl DeployScript {
    pub fn new(shell: &str, script: &str, working_dir: &Path) -> Self {
        Self {
            shell: shell.to_string(),
            script: script.to_string(),
            working_dir: working_dir.to_path_buf(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.working_dir.join(&self.script)
    }

    /// Run `<shell> <script>` and wait for it.
    ///
    /// Output goes straight to our own stdout/stderr. There is no timeout.
    pub async fn run(&self) -> Result<ExitStatus, InitError> {
        let mut cmd = Command::new(&self.shell);
        cmd.arg(&self.script)
            .current_dir(&self.working_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        tracing::info!(
            "Running {} {} in {:?}",
            self.shell,
            self.script,
            self.working_dir
        );

        let status = cmd.status().await.map_err(|source| InitError::Spawn {
            script: self.path(),
            source,
        })?;

        tracing::info!("Deployment script exited with {}", status);
        Ok(status)
    }
}
