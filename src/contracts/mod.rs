mod abi;
mod export;

use std::io;
use std::path::PathBuf;

pub use export::AbiExporter;

/// Errors raised while exporting ABIs
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to read artifact {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse artifact {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("artifact {path:?} has no `abi` field")]
    MissingAbi { path: PathBuf },
    #[error("failed to write {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
