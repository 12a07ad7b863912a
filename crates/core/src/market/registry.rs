//! Registry of known market files.
//!
//! The `commons` and `pegasys` markets are compiled in; more can be added
//! from a directory of `<name>.toml` files.

use super::file::{build_pool, MarketFile};
use super::PoolConfiguration;
use crate::error::{ResolveError, Result};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

const COMMONS_TOML: &str = include_str!("../../markets/commons.toml");
const PEGASYS_TOML: &str = include_str!("../../markets/pegasys.toml");

/// Market files by lower-cased name.
#[derive(Debug, Default)]
pub struct MarketRegistry {
    markets: BTreeMap<String, (String, MarketFile)>,
}

impl MarketRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the compiled-in markets.
    pub fn builtin() -> Result<Self> {
        let mut registry = Self::new();
        registry.insert("Commons", MarketFile::parse(COMMONS_TOML)?);
        registry.insert("Pegasys", MarketFile::parse(PEGASYS_TOML)?);
        Ok(registry)
    }

    /// Built-in markets plus every `*.toml` file in `dir`. A file named
    /// like a built-in market replaces it.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        info!(markets_dir = %dir.display(), "Loading market files");

        let mut registry = Self::builtin()?;
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.extension().is_some_and(|e| e == "toml") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let file = MarketFile::from_file(&path).map_err(|e| {
                ResolveError::Config(format!("market file {}: {e}", path.display()))
            })?;
            debug!(market = name, file = %path.display(), "Loaded market file");
            registry.insert(name, file);
        }

        info!(markets = registry.markets.len(), "Market registry loaded");
        Ok(registry)
    }

    /// Register `file` under `name` (case-insensitive).
    pub fn insert(&mut self, name: &str, file: MarketFile) {
        self.markets
            .insert(name.to_lowercase(), (name.to_string(), file));
    }

    /// Registered market names.
    pub fn names(&self) -> Vec<&str> {
        self.markets.values().map(|(name, _)| name.as_str()).collect()
    }

    /// Load the pool `name`, following its `extends` chain.
    pub fn load_pool(&self, name: &str) -> Result<PoolConfiguration> {
        let (display_name, _) = self.get(name)?;

        let mut chain = Vec::new();
        let mut next = Some(name.to_string());
        while let Some(current) = next {
            let (current_name, file) = self.get(&current)?;
            if chain.iter().any(|(n, _): &(String, MarketFile)| n == current_name) {
                return Err(ResolveError::Config(format!(
                    "market {display_name}: extends cycle through {current_name}"
                )));
            }
            next = file.extends.clone();
            chain.push((current_name.clone(), file.clone()));
        }
        chain.reverse();

        debug!(
            market = %display_name,
            layers = chain.len(),
            "Resolving market configuration"
        );
        build_pool(display_name, chain.into_iter().map(|(_, file)| file).collect())
    }

    fn get(&self, name: &str) -> Result<&(String, MarketFile)> {
        self.markets
            .get(&name.to_lowercase())
            .ok_or_else(|| ResolveError::UnknownPool {
                name: name.to_string(),
                supported: self.names().join(", "),
            })
    }
}
