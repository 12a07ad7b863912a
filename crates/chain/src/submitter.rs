//! Chain submission abstraction.
//!
//! The resolution engine never talks to a node directly; it goes through a
//! [`ChainSubmitter`]. Both operations may suspend while waiting for
//! confirmation and may fail. Callers do not retry.

use crate::contracts::{ConstructorArgs, ContractCall, ContractKind};
use crate::error::Result;
use alloy::primitives::{Address, B256};
use async_trait::async_trait;
use std::fmt::Debug;

/// Outcome of a confirmed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxResult {
    /// Transaction hash
    pub tx_hash: B256,
    /// Block the transaction was mined in (if reported)
    pub block_number: Option<u64>,
    /// Gas consumed
    pub gas_used: u64,
}

/// Deploys contracts and sends calls on one network.
#[async_trait]
pub trait ChainSubmitter: Send + Sync + Debug {
    /// Deploy `kind` with `args` and return the new contract address once
    /// the deployment is confirmed.
    async fn deploy(&self, kind: ContractKind, args: ConstructorArgs) -> Result<Address>;

    /// Send `call` to `to` and wait for confirmation.
    async fn call(&self, to: Address, call: ContractCall) -> Result<TxResult>;

    /// Accounts available for signing, deployer first.
    async fn accounts(&self) -> Result<Vec<Address>>;

    /// Name for logs.
    fn submitter_name(&self) -> &'static str;
}
