//! Error type for the chain submission layer.

use alloy::primitives::B256;
use thiserror::Error;

/// Result alias for chain operations.
pub type Result<T> = std::result::Result<T, ChainError>;

/// Errors raised while deploying contracts, sending calls or persisting
/// deployed addresses.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Transport or provider failure.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// The transaction was mined but reverted.
    #[error("transaction {tx_hash} reverted ({context})")]
    Reverted { tx_hash: B256, context: String },

    /// A deployment receipt carried no contract address.
    #[error("deployment of {contract} returned no contract address")]
    MissingContractAddress { contract: String },

    /// No compiled artifact was found for a contract.
    #[error("artifact for {contract} not found under {dir}")]
    ArtifactNotFound { contract: String, dir: String },

    /// The artifact exists but could not be used.
    #[error("invalid artifact {path}: {reason}")]
    InvalidArtifact { path: String, reason: String },

    /// Signer key could not be parsed.
    #[error("invalid signer key: {0}")]
    InvalidSigner(String),

    /// Contract address registry failure.
    #[error("registry error: {0}")]
    Registry(String),

    /// Submission refused by a test double.
    #[error("submission rejected: {0}")]
    Rejected(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ChainError {
    /// Wrap any displayable provider error.
    pub fn rpc(err: impl std::fmt::Display) -> Self {
        Self::Rpc(err.to_string())
    }
}
