//! Deployer chain interaction layer.
//!
//! This crate provides:
//! - The [`ChainSubmitter`] abstraction used by the resolution engine
//! - An Alloy-backed JSON-RPC submitter with a local signer
//! - A recording dry-run submitter for planning and tests
//! - Contract kinds, constructor arguments and call encodings
//! - The contract address registry (in-memory and JSON file)

mod artifacts;
pub mod contracts;
mod dry_run;
mod error;
mod registry;
mod rpc;
mod submitter;

pub use artifacts::ArtifactStore;
pub use contracts::{ConstructorArgs, ContractCall, ContractKind};
pub use dry_run::{DryRunSubmitter, RecordedOp, DEFAULT_DEPLOYER, DEFAULT_SECOND_ACCOUNT};
pub use error::{ChainError, Result};
pub use registry::{ContractRegistry, InMemoryRegistry, JsonFileRegistry};
pub use rpc::{RpcSubmitter, RpcSubmitterBuilder};
pub use submitter::{ChainSubmitter, TxResult};
