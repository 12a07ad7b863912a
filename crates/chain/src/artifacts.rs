//! Creation bytecode lookup in a Hardhat `artifacts/` tree.

use crate::error::{ChainError, Result};
use alloy::primitives::Bytes;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct HardhatArtifact {
    #[serde(rename = "contractName")]
    contract_name: Option<String>,
    bytecode: String,
}

/// Reads compiled artifacts from a directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Create a store rooted at `root` (usually `./artifacts`).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creation bytecode of `contract`.
    ///
    /// Hardhat nests artifacts as `<source>.sol/<Contract>.json`, so the tree
    /// is searched for the first `<Contract>.json` that is not a debug file.
    pub fn bytecode(&self, contract: &str) -> Result<Bytes> {
        let path = self
            .find(&self.root, &format!("{contract}.json"))?
            .ok_or_else(|| ChainError::ArtifactNotFound {
                contract: contract.to_string(),
                dir: self.root.display().to_string(),
            })?;

        debug!(contract, path = %path.display(), "Loading artifact");

        let content = std::fs::read_to_string(&path)?;
        let artifact: HardhatArtifact = serde_json::from_str(&content)?;

        if let Some(name) = &artifact.contract_name {
            if name != contract {
                return Err(ChainError::InvalidArtifact {
                    path: path.display().to_string(),
                    reason: format!("contractName is {name}"),
                });
            }
        }

        let code = hex::decode(artifact.bytecode.trim_start_matches("0x")).map_err(|e| {
            ChainError::InvalidArtifact {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
        })?;

        if code.is_empty() {
            // interfaces and abstract contracts compile to empty bytecode
            return Err(ChainError::InvalidArtifact {
                path: path.display().to_string(),
                reason: "empty bytecode".to_string(),
            });
        }

        Ok(code.into())
    }

    fn find(&self, dir: &Path, file_name: &str) -> Result<Option<PathBuf>> {
        if !dir.exists() {
            return Ok(None);
        }

        let mut subdirs = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                subdirs.push(path);
            } else if path.file_name().is_some_and(|n| n == file_name) {
                return Ok(Some(path));
            }
        }

        subdirs.sort();
        for sub in subdirs {
            if let Some(found) = self.find(&sub, file_name)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }
}
