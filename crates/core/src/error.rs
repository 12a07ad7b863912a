//! Errors raised by a resolution pass.
//!
//! Every variant is fatal to the current pass; nothing is retried.

use deployer_chain::ChainError;
use thiserror::Error;

/// Result alias for resolution operations.
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Resolution failure.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The overlay of `field` has no entry for `network`.
    #[error("{field} is not configured for network {network}")]
    NetworkNotConfigured { field: String, network: String },

    /// A reserve strategy violates a risk-parameter constraint.
    #[error("invalid reserve strategy for {symbol}: {field}")]
    InvalidReserveStrategy { symbol: String, field: &'static str },

    /// The catalog has no strategy for `symbol`.
    #[error("unknown reserve asset {0}")]
    UnknownReserveAsset(String),

    /// A production network is missing an address that would otherwise be
    /// filled with a mock.
    #[error("{resource} has no configured address on production network {network}")]
    MissingProductionAddress { resource: String, network: String },

    /// The oracle quote currency is neither the native token nor USD.
    #[error("quote currency {0} is not supported")]
    UnsupportedQuoteCurrency(String),

    /// Production network with neither a price oracle nor a fallback oracle.
    #[error("no price oracle and no fallback oracle configured on {network}")]
    MissingFallbackOracle { network: String },

    /// A non-production network outside the mock allow-list.
    #[error("mock deployment of {resource} is not allowed on {network}")]
    MockNotAllowed { resource: String, network: String },

    /// Network name not recognised.
    #[error("unknown network {0}")]
    UnknownNetwork(String),

    /// Pool name not recognised.
    #[error("unsupported pool configuration {name}, supported: {supported}")]
    UnknownPool { name: String, supported: String },

    /// Admin index points past the signer list.
    #[error("{role} index {index} exceeds the {available} available signer accounts")]
    MissingSignerAccount {
        role: &'static str,
        index: usize,
        available: usize,
    },

    /// Malformed configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Chain submission failure; already-submitted deployments stay on chain.
    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}
