//! Recording submitter used for planning runs and tests.
//!
//! Nothing leaves the process. Deployments get the CREATE address the
//! deployer account would produce at its current nonce, so the same sequence
//! of operations always yields the same addresses.

use crate::contracts::{ConstructorArgs, ContractCall, ContractKind};
use crate::error::{ChainError, Result};
use crate::submitter::{ChainSubmitter, TxResult};
use alloy::primitives::{address, keccak256, Address, B256};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;
use tracing::info;

/// Hardhat's first default account.
pub const DEFAULT_DEPLOYER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

/// Hardhat's second default account.
pub const DEFAULT_SECOND_ACCOUNT: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");

/// Operation captured by [`DryRunSubmitter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedOp {
    Deploy {
        kind: ContractKind,
        args: ConstructorArgs,
        address: Address,
    },
    Call {
        to: Address,
        call: ContractCall,
    },
}

#[derive(Debug, Default)]
struct DryRunState {
    nonce: u64,
    ops: Vec<RecordedOp>,
}

/// Submitter that records operations instead of sending them.
#[derive(Debug)]
pub struct DryRunSubmitter {
    deployer: Address,
    accounts: Vec<Address>,
    state: Mutex<DryRunState>,
    rejected: HashSet<String>,
}

impl Default for DryRunSubmitter {
    fn default() -> Self {
        Self::new(DEFAULT_DEPLOYER)
    }
}

impl DryRunSubmitter {
    /// Create a submitter deploying from `deployer`.
    pub fn new(deployer: Address) -> Self {
        let mut accounts = vec![deployer];
        if deployer != DEFAULT_SECOND_ACCOUNT {
            accounts.push(DEFAULT_SECOND_ACCOUNT);
        }
        Self {
            deployer,
            accounts,
            state: Mutex::new(DryRunState::default()),
            rejected: HashSet::new(),
        }
    }

    /// Replace the signer account list (deployer is kept first).
    pub fn with_accounts(mut self, accounts: Vec<Address>) -> Self {
        let mut list = vec![self.deployer];
        list.extend(accounts.into_iter().filter(|a| *a != self.deployer));
        self.accounts = list;
        self
    }

    /// Make deployments of the contract registered as `registry_name` fail.
    pub fn reject_deploy(mut self, registry_name: impl Into<String>) -> Self {
        self.rejected.insert(registry_name.into());
        self
    }

    /// Deployer account.
    pub fn deployer(&self) -> Address {
        self.deployer
    }

    /// Operations recorded so far, in submission order.
    pub fn operations(&self) -> Vec<RecordedOp> {
        self.state.lock().ops.clone()
    }

    /// Number of deployments recorded.
    pub fn deploy_count(&self) -> usize {
        self.state
            .lock()
            .ops
            .iter()
            .filter(|op| matches!(op, RecordedOp::Deploy { .. }))
            .count()
    }

    /// Calls recorded so far.
    pub fn calls(&self) -> Vec<(Address, ContractCall)> {
        self.state
            .lock()
            .ops
            .iter()
            .filter_map(|op| match op {
                RecordedOp::Call { to, call } => Some((*to, call.clone())),
                RecordedOp::Deploy { .. } => None,
            })
            .collect()
    }
}

#[async_trait]
impl ChainSubmitter for DryRunSubmitter {
    async fn deploy(&self, kind: ContractKind, args: ConstructorArgs) -> Result<Address> {
        if self.rejected.contains(&kind.registry_name()) {
            return Err(ChainError::Rejected(format!("deployment of {kind}")));
        }

        let mut state = self.state.lock();
        let address = self.deployer.create(state.nonce);
        state.nonce += 1;
        state.ops.push(RecordedOp::Deploy {
            kind: kind.clone(),
            args,
            address,
        });

        info!(contract = %kind, address = %address, "Dry-run deployment");
        Ok(address)
    }

    async fn call(&self, to: Address, call: ContractCall) -> Result<TxResult> {
        let mut state = self.state.lock();
        let nonce = state.nonce;
        state.nonce += 1;

        let mut preimage = self.deployer.to_vec();
        preimage.extend_from_slice(&nonce.to_be_bytes());
        let tx_hash: B256 = keccak256(preimage);

        info!(to = %to, method = call.method(), "Dry-run call");
        state.ops.push(RecordedOp::Call { to, call });

        Ok(TxResult {
            tx_hash,
            block_number: None,
            gas_used: 0,
        })
    }

    async fn accounts(&self) -> Result<Vec<Address>> {
        Ok(self.accounts.clone())
    }

    fn submitter_name(&self) -> &'static str {
        "dry-run"
    }
}
