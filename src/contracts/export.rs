use std::fs;
use std::path::PathBuf;

use super::ExportError;
use super::abi::{AbiSummary, artifact_path, extract_abi, summarize};
use crate::config::ExportSettings;

/// Copies the `abi` of compiled artifacts into consumer directories
#[derive(Debug, Clone)]
pub struct AbiExporter {
    out_dir: PathBuf,
    contracts: Vec<String>,
    destinations: Vec<PathBuf>,
}

/// One contract whose ABI was written
#[derive(Debug, Clone)]
pub struct ExportedContract {
    pub name: String,
    pub summary: Option<AbiSummary>,
    pub written: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    pub contracts: Vec<ExportedContract>,
}

impl ExportReport {
    pub fn files_written(&self) -> usize {
        self.contracts.iter().map(|c| c.written.len()).sum()
    }
}

impl AbiExporter {
    pub fn new(settings: ExportSettings) -> Self {
        Self {
            out_dir: settings.out_dir,
            contracts: settings.contracts,
            destinations: settings.destinations,
        }
    }

    /// Export every configured contract, in order.
    ///
    /// Stops at the first failure; contracts after it are left untouched.
    /// Existing destination files are overwritten.
    pub fn export(&self) -> Result<ExportReport, ExportError> {
        let mut report = ExportReport::default();

        for name in &self.contracts {
            report.contracts.push(self.export_contract(name)?);
        }

        tracing::info!(
            "Exported {} ABIs to {} destinations",
            report.contracts.len(),
            self.destinations.len()
        );
        Ok(report)
    }

    fn export_contract(&self, name: &str) -> Result<ExportedContract, ExportError> {
        let source = artifact_path(&self.out_dir, name);
        tracing::debug!("Reading artifact {:?}", source);

        let abi = extract_abi(&source)?;

        let summary = summarize(&abi);
        match &summary {
            Some(s) => tracing::info!(
                "{}: {} entries ({} functions, {} events)",
                name,
                s.entries,
                s.functions,
                s.events
            ),
            None => tracing::warn!("{}: `abi` is not an array, copying as-is", name),
        }

        // Compact JSON
        let content = abi.to_string();

        let mut written = Vec::with_capacity(self.destinations.len());
        for dest in &self.destinations {
            let path = dest.join(format!("{}.json", name));

            fs::write(&path, &content).map_err(|source| ExportError::Write {
                path: path.clone(),
                source,
            })?;

            tracing::debug!("Wrote {:?}", path);
            written.push(path);
        }

        Ok(ExportedContract {
            name: name.to_string(),
            summary,
            written,
        })
    }
}
