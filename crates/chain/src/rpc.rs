//! JSON-RPC backed submitter.
//! Uses Alloy providers with a local private-key signer.
//!
//! Transactions are sent one at a time: every deployment or call waits for
//! its receipt before returning, and the nonce is tracked locally so that a
//! slow node cannot hand out the same nonce twice.

use crate::artifacts::ArtifactStore;
use crate::contracts::{ConstructorArgs, ContractCall, ContractKind};
use crate::error::{ChainError, Result};
use crate::submitter::{ChainSubmitter, TxResult};
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, Bytes};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Local nonce tracking for sequential submission.
#[derive(Debug)]
pub(crate) struct NonceManager {
    current: AtomicU64,
}

impl NonceManager {
    /// Start from the chain's transaction count.
    pub(crate) fn new(initial_nonce: u64) -> Self {
        Self {
            current: AtomicU64::new(initial_nonce),
        }
    }

    /// Take the next nonce.
    #[inline]
    pub(crate) fn next(&self) -> u64 {
        self.current.fetch_add(1, Ordering::SeqCst)
    }

    /// Reset to the chain value (after a failed submission).
    pub(crate) fn reset(&self, chain_nonce: u64) {
        self.current.store(chain_nonce, Ordering::SeqCst);
    }
}

/// Builder for [`RpcSubmitter`].
#[derive(Debug)]
pub struct RpcSubmitterBuilder {
    rpc_url: String,
    chain_id: u64,
    artifacts_dir: PathBuf,
}

impl RpcSubmitterBuilder {
    /// Create a new builder.
    pub fn new(rpc_url: impl Into<String>, chain_id: u64) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            chain_id,
            artifacts_dir: PathBuf::from("./artifacts"),
        }
    }

    /// Directory holding compiled Hardhat artifacts.
    pub fn artifacts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifacts_dir = dir.into();
        self
    }

    /// Build the submitter, fetching the signer's nonce and the node's
    /// unlocked accounts.
    pub async fn build(self, private_key: &str) -> Result<RpcSubmitter> {
        // Parse private key (with or without 0x prefix)
        let key_str = private_key.trim_start_matches("0x");
        let signer: PrivateKeySigner = key_str
            .parse()
            .map_err(|e| ChainError::InvalidSigner(format!("{e}")))?;
        let address = signer.address();
        let wallet = EthereumWallet::from(signer);

        let provider = ProviderBuilder::new().on_http(self.rpc_url.parse().map_err(ChainError::rpc)?);

        let initial_nonce = provider
            .get_transaction_count(address)
            .await
            .map_err(ChainError::rpc)?;

        // Public endpoints usually refuse eth_accounts; only the signer is
        // available then.
        let node_accounts = match provider.get_accounts().await {
            Ok(accounts) => accounts,
            Err(e) => {
                debug!(error = %e, "Node exposes no accounts");
                Vec::new()
            }
        };

        let mut accounts = vec![address];
        accounts.extend(node_accounts.into_iter().filter(|a| *a != address));

        info!(
            address = %address,
            chain_id = self.chain_id,
            initial_nonce,
            accounts = accounts.len(),
            artifacts = %self.artifacts_dir.display(),
            "RPC submitter initialized"
        );

        Ok(RpcSubmitter {
            rpc_url: self.rpc_url,
            wallet,
            address,
            chain_id: self.chain_id,
            nonce_manager: NonceManager::new(initial_nonce),
            artifacts: ArtifactStore::new(self.artifacts_dir),
            accounts,
        })
    }
}

/// Submits deployments and calls through a JSON-RPC endpoint.
pub struct RpcSubmitter {
    rpc_url: String,
    wallet: EthereumWallet,
    /// Signer address
    pub address: Address,
    chain_id: u64,
    nonce_manager: NonceManager,
    artifacts: ArtifactStore,
    accounts: Vec<Address>,
}

impl RpcSubmitter {
    /// Connect with default settings.
    pub async fn new(private_key: &str, rpc_url: &str, chain_id: u64) -> Result<Self> {
        RpcSubmitterBuilder::new(rpc_url, chain_id)
            .build(private_key)
            .await
    }

    /// Get the RPC URL.
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    async fn send(&self, tx: TransactionRequest, context: &str) -> Result<TransactionReceipt> {
        let start = Instant::now();
        let nonce = self.nonce_manager.next();
        let tx = tx
            .with_from(self.address)
            .with_nonce(nonce)
            .with_chain_id(self.chain_id);

        let provider = ProviderBuilder::new()
            .wallet(self.wallet.clone())
            .on_http(self.rpc_url.parse().map_err(ChainError::rpc)?);

        let pending = match provider.send_transaction(tx).await {
            Ok(pending) => pending,
            Err(e) => {
                self.sync_nonce().await;
                return Err(ChainError::rpc(e));
            }
        };
        let tx_hash = *pending.tx_hash();

        debug!(tx_hash = %tx_hash, nonce, context, "Transaction submitted, waiting for confirmation");

        let receipt = pending.get_receipt().await.map_err(ChainError::rpc)?;

        if receipt.status() {
            info!(
                tx_hash = %tx_hash,
                block = receipt.block_number.unwrap_or(0),
                gas_used = receipt.gas_used,
                elapsed_ms = start.elapsed().as_millis(),
                context,
                "Transaction confirmed"
            );
            Ok(receipt)
        } else {
            warn!(tx_hash = %tx_hash, context, "Transaction reverted, syncing nonce");
            self.sync_nonce().await;
            Err(ChainError::Reverted {
                tx_hash,
                context: context.to_string(),
            })
        }
    }

    /// Resync the local nonce from the chain.
    pub async fn sync_nonce(&self) {
        let url = match self.rpc_url.parse() {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "Invalid RPC URL, nonce not synced");
                return;
            }
        };
        let provider = ProviderBuilder::new().on_http(url);
        match provider.get_transaction_count(self.address).await {
            Ok(chain_nonce) => {
                self.nonce_manager.reset(chain_nonce);
                debug!(nonce = chain_nonce, "Nonce synced from chain");
            }
            Err(e) => {
                warn!(error = %e, "Failed to sync nonce from chain");
            }
        }
    }
}

#[async_trait]
impl ChainSubmitter for RpcSubmitter {
    async fn deploy(&self, kind: ContractKind, args: ConstructorArgs) -> Result<Address> {
        let bytecode = self.artifacts.bytecode(kind.artifact())?;
        let mut code = bytecode.to_vec();
        code.extend_from_slice(&args.encode());

        info!(contract = %kind, artifact = kind.artifact(), "Deploying contract");

        let tx = TransactionRequest::default().with_deploy_code(Bytes::from(code));
        let receipt = self.send(tx, &kind.registry_name()).await?;

        receipt
            .contract_address
            .ok_or_else(|| ChainError::MissingContractAddress {
                contract: kind.registry_name(),
            })
    }

    async fn call(&self, to: Address, call: ContractCall) -> Result<TxResult> {
        info!(to = %to, method = call.method(), "Sending call");

        let tx = TransactionRequest::default()
            .with_to(to)
            .with_input(call.encode());
        let receipt = self.send(tx, call.method()).await?;

        Ok(TxResult {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        })
    }

    async fn accounts(&self) -> Result<Vec<Address>> {
        Ok(self.accounts.clone())
    }

    fn submitter_name(&self) -> &'static str {
        "rpc"
    }
}

impl std::fmt::Debug for RpcSubmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcSubmitter")
            .field("address", &self.address)
            .field("chain_id", &self.chain_id)
            .field("rpc_url", &self.rpc_url)
            .field("artifacts", &self.artifacts.root())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonce_manager() {
        let nm = NonceManager::new(5);
        assert_eq!(nm.next(), 5);
        assert_eq!(nm.next(), 6);
        assert_eq!(nm.next(), 7);

        nm.reset(3);
        assert_eq!(nm.next(), 3);
    }

    #[tokio::test]
    #[ignore] // Requires a local node
    async fn test_submitter_against_local_node() {
        // Hardhat account #0
        let key = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
        let submitter = RpcSubmitter::new(key, "http://127.0.0.1:8545", 31337).await;
        assert!(submitter.is_ok());

        let accounts = submitter.unwrap().accounts().await.unwrap();
        assert!(!accounts.is_empty());
    }
}
