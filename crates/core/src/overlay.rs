//! Per-network configuration values.
//!
//! A market file states most addresses once per network:
//!
//! ```toml
//! [addresses.treasury]
//! hardhat = ""
//! main = "0x464c71f6c2f760dda6093dcb91c24c39e5d6e18c"
//! ```
//!
//! An empty string means "not known yet, derive or deploy at runtime" and is
//! loaded as [`Configured::Unresolved`]. A missing network key is a
//! different thing entirely and fails resolution with
//! [`ResolveError::NetworkNotConfigured`].

use crate::env::expand_env;
use crate::error::{ResolveError, Result};
use crate::network::Network;
use alloy::primitives::Address;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

/// A configured value, or the explicit "resolve at runtime" marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Configured<T> {
    #[default]
    Unresolved,
    Value(T),
}

impl<T> Configured<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Unresolved => None,
            Self::Value(v) => Some(v),
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved)
    }
}

impl Configured<Address> {
    /// The address, unless unresolved or the zero address.
    pub fn usable(&self) -> Option<Address> {
        match self {
            Self::Value(address) if !address.is_zero() => Some(*address),
            _ => None,
        }
    }
}

impl<T> From<Option<T>> for Configured<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Unresolved, Self::Value)
    }
}

impl<T: FromStr> Configured<T>
where
    T::Err: Display,
{
    /// Parse a raw configuration string, expanding `${VAR}` references.
    pub fn parse(raw: &str) -> Result<Self> {
        let expanded = expand_env(raw)?;
        let trimmed = expanded.trim();
        if trimmed.is_empty() {
            return Ok(Self::Unresolved);
        }
        trimmed
            .parse()
            .map(Self::Value)
            .map_err(|e| ResolveError::Config(format!("cannot parse '{trimmed}': {e}")))
    }
}

impl<'de, T: FromStr> Deserialize<'de> for Configured<T>
where
    T::Err: Display,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Network → value table for one configuration field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkOverlay<T> {
    field: String,
    values: BTreeMap<Network, T>,
}

impl<T> Default for NetworkOverlay<T> {
    fn default() -> Self {
        Self {
            field: String::new(),
            values: BTreeMap::new(),
        }
    }
}

impl<T> NetworkOverlay<T> {
    /// Empty overlay for `field`.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            values: BTreeMap::new(),
        }
    }

    /// Name the field in error messages.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    /// Builder-style insert.
    pub fn with(mut self, network: Network, value: T) -> Self {
        self.values.insert(network, value);
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Value for `network`.
    pub fn resolve(&self, network: Network) -> Result<&T> {
        self.values
            .get(&network)
            .ok_or_else(|| ResolveError::NetworkNotConfigured {
                field: self.field.clone(),
                network: network.to_string(),
            })
    }

    /// Networks this overlay has an entry for.
    pub fn networks(&self) -> impl Iterator<Item = Network> + '_ {
        self.values.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for NetworkOverlay<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let values = BTreeMap::<Network, T>::deserialize(deserializer)?;
        Ok(Self {
            field: String::new(),
            values,
        })
    }
}

/// Address overlay with the unresolved sentinel.
pub type AddressOverlay = NetworkOverlay<Configured<Address>>;
