//! Address-or-mock resolution.
//!
//! Infrastructure that a test network lacks (wrapped native token, reserve
//! tokens, fallback oracle, price feed) is filled with a mock the first time
//! it is asked for. A production network never gets a mock.

use crate::error::{ResolveError, Result};
use crate::network::Network;
use crate::overlay::Configured;
use alloy::primitives::Address;
use deployer_chain::{ChainSubmitter, ConstructorArgs, ContractKind, ContractRegistry};
use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

/// Networks on which mocks may be deployed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockPolicy {
    allowed: BTreeSet<Network>,
}

impl Default for MockPolicy {
    /// Every non-production network.
    fn default() -> Self {
        Self {
            allowed: Network::ALL
                .into_iter()
                .filter(|n| !n.is_production())
                .collect(),
        }
    }
}

impl MockPolicy {
    /// Allow mocks on `networks` only. Production networks are refused
    /// regardless.
    pub fn only(networks: impl IntoIterator<Item = Network>) -> Self {
        Self {
            allowed: networks.into_iter().collect(),
        }
    }

    pub fn allows(&self, network: Network) -> bool {
        !network.is_production() && self.allowed.contains(&network)
    }
}

/// A contract deployed during the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub name: String,
    pub address: Address,
    pub network: Network,
    pub mock: bool,
}

/// Memoizing address resolver backed by a chain submitter and the contract
/// registry.
///
/// Driven through `&mut self`: one deployment at a time, in call order.
#[derive(Debug)]
pub struct MockDeployer {
    submitter: Arc<dyn ChainSubmitter>,
    registry: Arc<dyn ContractRegistry>,
    policy: MockPolicy,
    resolved: HashMap<(String, Network), Address>,
    deployments: Vec<Deployment>,
}

impl MockDeployer {
    pub fn new(submitter: Arc<dyn ChainSubmitter>, registry: Arc<dyn ContractRegistry>) -> Self {
        Self {
            submitter,
            registry,
            policy: MockPolicy::default(),
            resolved: HashMap::new(),
            deployments: Vec::new(),
        }
    }

    pub fn with_policy(mut self, policy: MockPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn submitter(&self) -> &Arc<dyn ChainSubmitter> {
        &self.submitter
    }

    pub fn registry(&self) -> &Arc<dyn ContractRegistry> {
        &self.registry
    }

    /// Contracts deployed so far, in order.
    pub fn deployments(&self) -> &[Deployment] {
        &self.deployments
    }

    /// Return `candidate` if usable, otherwise a mock for `resource`.
    ///
    /// The mock comes from, in order: this run's memo, the contract
    /// registry, or `deploy_mock`. `deploy_mock` runs at most once per
    /// `(resource, network)`.
    pub async fn resolve_or_deploy<F, Fut>(
        &mut self,
        resource: &str,
        network: Network,
        candidate: &Configured<Address>,
        deploy_mock: F,
    ) -> Result<Address>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Address>>,
    {
        if let Some(address) = candidate.usable() {
            return Ok(address);
        }

        if network.is_production() {
            return Err(ResolveError::MissingProductionAddress {
                resource: resource.to_string(),
                network: network.to_string(),
            });
        }
        if !self.policy.allows(network) {
            return Err(ResolveError::MockNotAllowed {
                resource: resource.to_string(),
                network: network.to_string(),
            });
        }

        let key = (resource.to_string(), network);
        if let Some(address) = self.resolved.get(&key) {
            return Ok(*address);
        }

        if let Some(address) = self.registry.lookup(resource) {
            debug!(resource, address = %address, network = %network, "Reusing registered mock");
            self.resolved.insert(key, address);
            return Ok(address);
        }

        let address = deploy_mock().await?;
        info!(resource, address = %address, network = %network, "Deployed mock");
        self.record(resource, address, network, true)?;
        self.resolved.insert(key, address);
        Ok(address)
    }

    /// [`resolve_or_deploy`](Self::resolve_or_deploy) with the mock deployed
    /// through the submitter.
    pub async fn resolve_or_deploy_mock(
        &mut self,
        network: Network,
        kind: ContractKind,
        args: ConstructorArgs,
        candidate: &Configured<Address>,
    ) -> Result<Address> {
        let resource = kind.registry_name();
        let submitter = Arc::clone(&self.submitter);
        self.resolve_or_deploy(&resource, network, candidate, || async move {
            Ok(submitter.deploy(kind, args).await?)
        })
        .await
    }

    /// Deploy a real (non-mock) contract and register it.
    pub async fn deploy(
        &mut self,
        network: Network,
        kind: ContractKind,
        args: ConstructorArgs,
    ) -> Result<Address> {
        let name = kind.registry_name();
        let mock = kind.is_mock();
        if mock && network.is_production() {
            return Err(ResolveError::MissingProductionAddress {
                resource: name,
                network: network.to_string(),
            });
        }

        let address = self.submitter.deploy(kind, args).await?;
        info!(contract = %name, address = %address, network = %network, "Deployed contract");
        self.record(&name, address, network, mock)?;
        Ok(address)
    }

    /// Address registered under `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<Address> {
        self.registry.lookup(name)
    }

    fn record(&mut self, name: &str, address: Address, network: Network, mock: bool) -> Result<()> {
        self.registry.insert(name, address)?;
        self.deployments.push(Deployment {
            name: name.to_string(),
            address,
            network,
            mock,
        });
        Ok(())
    }
}
