use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::ExportError;

/// Counts of the entries in an extracted ABI
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbiSummary {
    pub entries: usize,
    pub functions: usize,
    pub events: usize,
}

/// Location of a compiled artifact: `<out_dir>/<Contract>.sol/<Contract>.json`
pub fn artifact_path(out_dir: &Path, contract_name: &str) -> PathBuf {
    out_dir
        .join(format!("{}.sol", contract_name))
        .join(format!("{}.json", contract_name))
}

/// Read a compiler artifact and take its `abi` value
pub fn extract_abi(path: &Path) -> Result<Value, ExportError> {
    let content = fs::read_to_string(path).map_err(|source| ExportError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut artifact: Value =
        serde_json::from_str(&content).map_err(|source| ExportError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    artifact
        .get_mut("abi")
        .map(Value::take)
        .ok_or_else(|| ExportError::MissingAbi {
            path: path.to_path_buf(),
        })
}

/// Summarize an ABI array. Returns `None` when the value is not an array.
pub fn summarize(abi: &Value) -> Option<AbiSummary> {
    let items = abi.as_array()?;

    let mut summary = AbiSummary {
        entries: items.len(),
        ..Default::default()
    };

    for item in items {
        match item.get("type").and_then(|t| t.as_str()) {
            Some("function") => summary.functions += 1,
            Some("event") => summary.events += 1,
            _ => {}
        }
    }

    Some(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_artifact_path() {
        assert_eq!(
            artifact_path(Path::new("out"), "MonksERC20"),
            PathBuf::from("out/MonksERC20.sol/MonksERC20.json")
        );
    }

    #[test]
    fn test_extract_abi() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Token.json");
        fs::write(
            &path,
            r#"{"abi":[{"type":"function","name":"totalSupply"}],"bytecode":{"object":"0x"}}"#,
        )
        .unwrap();

        let abi = extract_abi(&path).unwrap();
        assert_eq!(abi, json!([{"type": "function", "name": "totalSupply"}]));
    }

    #[test]
    fn test_extract_abi_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = extract_abi(&dir.path().join("Nope.json")).unwrap_err();
        assert!(matches!(err, ExportError::Read { .. }));
    }

    #[test]
    fn test_extract_abi_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Broken.json");
        fs::write(&path, r#"{"abi": ["#).unwrap();

        let err = extract_abi(&path).unwrap_err();
        assert!(matches!(err, ExportError::Parse { .. }));
    }

    #[test]
    fn test_extract_abi_without_abi_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("NoAbi.json");
        fs::write(&path, r#"{"bytecode":{"object":"0x"}}"#).unwrap();

        let err = extract_abi(&path).unwrap_err();
        assert!(matches!(err, ExportError::MissingAbi { .. }));
    }

    #[test]
    fn test_summarize() {
        let abi = json!([
            {"type": "constructor", "inputs": []},
            {"type": "function", "name": "balanceOf"},
            {"type": "function", "name": "transfer"},
            {"type": "event", "name": "Transfer"},
            {"type": "error", "name": "InsufficientBalance"}
        ]);

        let summary = summarize(&abi).unwrap();
        assert_eq!(
            summary,
            AbiSummary {
                entries: 5,
                functions: 2,
                events: 1
            }
        );
        assert_eq!(summarize(&json!({"not": "an array"})), None);
    }
}
