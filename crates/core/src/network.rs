//! Deployment networks and the active-network context.

use crate::error::{ResolveError, Result};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// Known deployment targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Network {
    /// In-process Hardhat network
    Hardhat,
    /// Coverage instrumentation network
    Coverage,
    /// Tenderly fork
    Tenderly,
    /// Rollux mainnet (chain 570)
    Main,
}

impl Network {
    pub const ALL: [Network; 4] = [
        Network::Hardhat,
        Network::Coverage,
        Network::Tenderly,
        Network::Main,
    ];

    /// Name used in configuration files and the registry.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hardhat => "hardhat",
            Self::Coverage => "coverage",
            Self::Tenderly => "tenderly",
            Self::Main => "main",
        }
    }

    /// Production networks carry real funds: names containing `main`.
    pub fn is_production(&self) -> bool {
        self.as_str().contains("main")
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "hardhat" => Ok(Self::Hardhat),
            "coverage" => Ok(Self::Coverage),
            "tenderly" => Ok(Self::Tenderly),
            "main" | "mainnet" => Ok(Self::Main),
            other => Err(ResolveError::UnknownNetwork(other.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for Network {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Which network a pass resolves against.
///
/// A `FORK` override replaces the configured network for resolution only;
/// the overlay data is untouched. `MAINNET_FORK=true` additionally forces
/// `main` when resolving the wrapped native token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkContext {
    configured: Network,
    fork: Option<Network>,
    mainnet_fork: bool,
}

impl NetworkContext {
    /// Context with no overrides.
    pub fn new(configured: Network) -> Self {
        Self {
            configured,
            fork: None,
            mainnet_fork: false,
        }
    }

    /// Resolve against `fork` instead of the configured network.
    pub fn with_fork(mut self, fork: Network) -> Self {
        self.fork = Some(fork);
        self
    }

    /// Force `main` for wrapped-native-token resolution.
    pub fn with_mainnet_fork(mut self, mainnet_fork: bool) -> Self {
        self.mainnet_fork = mainnet_fork;
        self
    }

    /// Build from `NETWORK`, `FORK` and `MAINNET_FORK`.
    pub fn from_env(default_network: Network) -> Result<Self> {
        Self::from_vars(default_network, |name| std::env::var(name).ok())
    }

    /// Build from `NETWORK`, `FORK` and `MAINNET_FORK` as returned by
    /// `var`. Blank values count as unset.
    pub fn from_vars(
        default_network: Network,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let get = |name: &str| var(name).filter(|v| !v.trim().is_empty());

        let configured = match get("NETWORK") {
            Some(name) => name.parse()?,
            None => default_network,
        };
        let mut ctx = Self::new(configured);
        if let Some(fork) = get("FORK") {
            ctx = ctx.with_fork(fork.parse()?);
        }
        let mainnet_fork = get("MAINNET_FORK").is_some_and(|v| v.trim() == "true");
        Ok(ctx.with_mainnet_fork(mainnet_fork))
    }

    /// Network named by the deployment target.
    pub fn configured(&self) -> Network {
        self.configured
    }

    /// Network every overlay is resolved against.
    pub fn active(&self) -> Network {
        self.fork.unwrap_or(self.configured)
    }

    /// Network used for the wrapped native token and its mock.
    pub fn wrapped_native_network(&self) -> Network {
        if self.mainnet_fork {
            Network::Main
        } else {
            self.active()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_networks() {
        assert_eq!("hardhat".parse::<Network>().unwrap(), Network::Hardhat);
        assert_eq!("MAIN".parse::<Network>().unwrap(), Network::Main);
        assert!(matches!(
            "kovan".parse::<Network>(),
            Err(ResolveError::UnknownNetwork(_))
        ));
    }

    #[test]
    fn test_only_main_is_production() {
        for network in Network::ALL {
            assert_eq!(network.is_production(), network == Network::Main);
        }
    }

    #[test]
    fn test_fork_overrides_resolution_network() {
        let ctx = NetworkContext::new(Network::Hardhat);
        assert_eq!(ctx.active(), Network::Hardhat);

        let forked = ctx.with_fork(Network::Main);
        assert_eq!(forked.active(), Network::Main);
        assert_eq!(forked.configured(), Network::Hardhat);
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: std::collections::HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_context_from_vars() {
        let ctx = NetworkContext::from_vars(Network::Hardhat, vars(&[])).unwrap();
        assert_eq!(ctx, NetworkContext::new(Network::Hardhat));

        // blank values fall back to the default
        let ctx = NetworkContext::from_vars(
            Network::Hardhat,
            vars(&[("NETWORK", "  "), ("FORK", ""), ("MAINNET_FORK", "")]),
        )
        .unwrap();
        assert_eq!(ctx.active(), Network::Hardhat);
        assert_eq!(ctx.wrapped_native_network(), Network::Hardhat);

        let ctx = NetworkContext::from_vars(
            Network::Hardhat,
            vars(&[("NETWORK", "coverage"), ("FORK", "mainnet")]),
        )
        .unwrap();
        assert_eq!(ctx.configured(), Network::Coverage);
        assert_eq!(ctx.active(), Network::Main);

        let ctx = NetworkContext::from_vars(
            Network::Hardhat,
            vars(&[("NETWORK", "tenderly"), ("MAINNET_FORK", "true")]),
        )
        .unwrap();
        assert_eq!(ctx.active(), Network::Tenderly);
        assert_eq!(ctx.wrapped_native_network(), Network::Main);

        assert!(matches!(
            NetworkContext::from_vars(Network::Hardhat, vars(&[("FORK", "kovan")])),
            Err(ResolveError::UnknownNetwork(_))
        ));
    }

    #[test]
    fn test_mainnet_fork_only_affects_wrapped_native() {
        let ctx = NetworkContext::new(Network::Hardhat).with_mainnet_fork(true);
        assert_eq!(ctx.active(), Network::Hardhat);
        assert_eq!(ctx.wrapped_native_network(), Network::Main);
    }
}
