//! Contract address registry.
//!
//! Every successful deployment is recorded by name so that a re-run adopts
//! the existing contract instead of deploying it again. The file layout
//! follows Hardhat's `deployed-contracts.json`:
//!
//! ```text
//! {
//!   "LendingRateOracle": {
//!     "hardhat": { "address": "0x…", "deployedAt": "2024-…" }
//!   }
//! }
//! ```

use crate::error::{ChainError, Result};
use alloy::primitives::Address;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Persisted name → address store, scoped to one network.
pub trait ContractRegistry: Send + Sync + Debug {
    /// Record `address` under `name`, replacing any previous entry.
    fn insert(&self, name: &str, address: Address) -> Result<()>;

    /// Address recorded under `name`.
    fn lookup(&self, name: &str) -> Option<Address>;
}

/// Registry kept in memory only.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    entries: RwLock<HashMap<String, Address>>,
}

impl InMemoryRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded contracts.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl ContractRegistry for InMemoryRegistry {
    fn insert(&self, name: &str, address: Address) -> Result<()> {
        self.entries.write().insert(name.to_string(), address);
        Ok(())
    }

    fn lookup(&self, name: &str) -> Option<Address> {
        self.entries.read().get(name).copied()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistryEntry {
    address: Address,
    #[serde(default)]
    deployed_at: Option<DateTime<Utc>>,
}

type RegistryFile = BTreeMap<String, BTreeMap<String, RegistryEntry>>;

/// Registry persisted as JSON, written through on every insert unless
/// opened read-only.
#[derive(Debug)]
pub struct JsonFileRegistry {
    path: PathBuf,
    network: String,
    data: RwLock<RegistryFile>,
    read_only: bool,
}

impl JsonFileRegistry {
    /// Open (or start) the registry file at `path` for `network`.
    pub fn open(path: impl AsRef<Path>, network: impl Into<String>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                RegistryFile::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            RegistryFile::new()
        };

        let network = network.into();
        debug!(
            path = %path.display(),
            network = %network,
            contracts = data.len(),
            "Opened contract registry"
        );

        Ok(Self {
            path,
            network,
            data: RwLock::new(data),
            read_only: false,
        })
    }

    /// Open the registry file for lookups only. Inserts are kept in memory
    /// and never reach the file.
    pub fn read_only(path: impl AsRef<Path>, network: impl Into<String>) -> Result<Self> {
        let mut registry = Self::open(path, network)?;
        registry.read_only = true;
        Ok(registry)
    }

    /// Whether inserts stay in memory.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Network this registry view is scoped to.
    pub fn network(&self) -> &str {
        &self.network
    }

    fn persist(&self, data: &RegistryFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(data)?;
        std::fs::write(&self.path, content)
            .map_err(|e| ChainError::Registry(format!("{}: {e}", self.path.display())))
    }
}

impl ContractRegistry for JsonFileRegistry {
    fn insert(&self, name: &str, address: Address) -> Result<()> {
        let mut data = self.data.write();
        data.entry(name.to_string()).or_default().insert(
            self.network.clone(),
            RegistryEntry {
                address,
                deployed_at: Some(Utc::now()),
            },
        );
        if self.read_only {
            debug!(name, address = %address, network = %self.network, "Recorded contract in memory");
            return Ok(());
        }
        self.persist(&data)?;
        debug!(name, address = %address, network = %self.network, "Recorded contract");
        Ok(())
    }

    fn lookup(&self, name: &str) -> Option<Address> {
        self.data
            .read()
            .get(name)
            .and_then(|per_network| per_network.get(&self.network))
            .map(|entry| entry.address)
    }
}
