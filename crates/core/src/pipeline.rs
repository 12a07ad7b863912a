//! End-to-end market configuration pass.
//!
//! Resolves every address of a pool on the active network, deploys what is
//! missing, wires the oracles and seeds the rate oracle. Steps run strictly
//! in order because later steps consume earlier addresses.
//!
//! A failed step aborts the pass. Contracts deployed before the failure stay
//! deployed and stay in the contract registry; a re-run adopts them.

use crate::addresses::{
    configured_or_registered, resolve_admin, resolve_incentives_controller,
    resolve_reserve_assets, resolve_treasury, resolve_wrapped_native, AdminRole,
    ResolvedAddressSet,
};
use crate::error::Result;
use crate::market::PoolConfiguration;
use crate::mock::{Deployment, MockDeployer, MockPolicy};
use crate::network::{Network, NetworkContext};
use crate::oracle::{OracleWiring, OracleWiringResolver};
use crate::rates::{build_seed_operations, seed_batches, SeedOperation};
use crate::reserve_init::{
    build_configure_inputs, build_init_inputs, ReserveConfigureInput, ReserveInitInput,
};
use crate::symbol::SymbolMap;
use alloy::primitives::{Address, B256, U256};
use deployer_chain::{ChainSubmitter, ConstructorArgs, ContractCall, ContractKind, ContractRegistry};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Registry names of contracts deployed by earlier protocol steps.
pub const ADDRESSES_PROVIDER_NAME: &str = "LendingPoolAddressesProvider";
pub const LENDING_POOL_NAME: &str = "LendingPool";
pub const CONFIGURATOR_NAME: &str = "LendingPoolConfigurator";
pub const RATES_HELPER_NAME: &str = "StableAndVariableTokensHelper";

/// Optional steps of the pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Resolve or deploy the wrapped-native gateway
    pub deploy_gateway: bool,
    /// Register the oracles on the addresses provider
    pub register_oracles: bool,
    /// Send the reserve risk parameters to the configurator
    pub configure_reserves: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            deploy_gateway: true,
            register_oracles: true,
            configure_reserves: false,
        }
    }
}

/// A confirmed call made during the pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedCall {
    pub to: Address,
    pub method: &'static str,
    pub tx_hash: B256,
}

/// Everything a pass resolved, deployed and sent.
#[derive(Debug, Clone)]
pub struct DeploymentReport {
    pub pool: String,
    pub market_id: String,
    pub provider_id: u64,
    pub network: Network,
    pub addresses: ResolvedAddressSet,
    /// Price unit of the quote currency
    pub quote_unit: U256,
    pub a_token_domain_separator: Option<B256>,
    pub reserve_assets: SymbolMap<Address>,
    pub oracle: OracleWiring,
    pub seed_operations: Vec<SeedOperation>,
    pub init_inputs: Vec<ReserveInitInput>,
    pub configure_inputs: Vec<ReserveConfigureInput>,
    pub deployments: Vec<Deployment>,
    pub calls: Vec<SubmittedCall>,
}

impl fmt::Display for DeploymentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==================== Market configuration ====================")?;
        writeln!(f, "Pool        {}", self.pool)?;
        writeln!(f, "Market id   {} (provider {})", self.market_id, self.provider_id)?;
        writeln!(f, "Network     {}", self.network)?;
        if let Some(separator) = self.a_token_domain_separator {
            writeln!(f, "aToken domain separator {separator}")?;
        }
        writeln!(f, "Addresses")?;
        writeln!(f, "{}", self.addresses)?;

        let origin = if self.oracle.adopted { "adopted" } else { "deployed" };
        writeln!(
            f,
            "Price oracle {} ({origin}), quote {} at {} unit {}",
            self.oracle.price_oracle,
            self.oracle.quote_currency,
            self.oracle.quote_currency_address,
            self.quote_unit
        )?;

        writeln!(f, "Reserves")?;
        for input in &self.configure_inputs {
            writeln!(
                f,
                "  {:<6} {}  ltv {} threshold {} bonus {} factor {}",
                input.symbol.as_str(),
                input.asset,
                input.base_ltv,
                input.liquidation_threshold,
                input.liquidation_bonus,
                input.reserve_factor
            )?;
        }

        if self.seed_operations.is_empty() {
            writeln!(f, "Borrow rates: not seeded")?;
        } else {
            writeln!(f, "Borrow rates")?;
            for op in &self.seed_operations {
                writeln!(f, "  {:<6} {}", op.symbol.as_str(), op.rate)?;
            }
        }

        writeln!(f, "Deployments ({})", self.deployments.len())?;
        for deployment in &self.deployments {
            let mock = if deployment.mock { " [mock]" } else { "" };
            writeln!(f, "  {:<24} {}{mock}", deployment.name, deployment.address)?;
        }
        write!(f, "Calls sent: {}", self.calls.len())
    }
}

/// One configuration pass of a pool on one network.
#[derive(Debug)]
pub struct DeploymentPipeline<'a> {
    pool: &'a PoolConfiguration,
    context: NetworkContext,
    deployer: MockDeployer,
    options: PipelineOptions,
    calls: Vec<SubmittedCall>,
}

impl<'a> DeploymentPipeline<'a> {
    pub fn new(
        pool: &'a PoolConfiguration,
        context: NetworkContext,
        submitter: Arc<dyn ChainSubmitter>,
        registry: Arc<dyn ContractRegistry>,
    ) -> Self {
        Self {
            pool,
            context,
            deployer: MockDeployer::new(submitter, registry),
            options: PipelineOptions::default(),
            calls: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_mock_policy(mut self, policy: MockPolicy) -> Self {
        self.deployer = self.deployer.with_policy(policy);
        self
    }

    /// Contracts deployed so far, including by a pass that failed.
    pub fn deployments(&self) -> &[Deployment] {
        self.deployer.deployments()
    }

    /// Run the pass.
    pub async fn run(&mut self) -> Result<DeploymentReport> {
        let pool = self.pool;
        let network = self.context.active();
        info!(
            pool = %pool.name,
            network = %network,
            configured = %self.context.configured(),
            submitter = self.deployer.submitter().submitter_name(),
            "Starting market configuration"
        );

        let accounts = self.deployer.submitter().accounts().await?;
        let deployer_account = accounts.first().copied().unwrap_or(Address::ZERO);

        let pool_admin = resolve_admin(pool, AdminRole::Pool, network, &accounts)?;
        let emergency_admin = resolve_admin(pool, AdminRole::Emergency, network, &accounts)?;
        let treasury = resolve_treasury(pool, network, pool_admin)?;
        let incentives_controller = resolve_incentives_controller(pool, network)?;

        let wrapped_native_token =
            resolve_wrapped_native(pool, &self.context, &mut self.deployer).await?;
        let reserve_assets = resolve_reserve_assets(pool, network, &mut self.deployer).await?;
        let init_inputs = build_init_inputs(pool, &reserve_assets, treasury, incentives_controller)?;
        let configure_inputs = build_configure_inputs(pool, &reserve_assets)?;

        let oracle = OracleWiringResolver::new(pool, self.context)
            .resolve(&mut self.deployer, &reserve_assets)
            .await?;

        let configured_rate_oracle = pool.addresses.lending_rate_oracle.resolve(network)?.usable();
        let lending_rate_oracle = match configured_rate_oracle {
            Some(address) => {
                debug!(oracle = %address, "Adopting configured lending rate oracle");
                address
            }
            None => {
                self.deployer
                    .deploy(network, ContractKind::LendingRateOracle, ConstructorArgs::None)
                    .await?
            }
        };

        let seed_operations =
            build_seed_operations(&pool.lending_rates, &reserve_assets, configured_rate_oracle);
        if configured_rate_oracle.is_none() {
            self.seed_rates(lending_rate_oracle, &seed_operations, pool_admin, deployer_account)
                .await?;
        }

        if self.options.register_oracles {
            self.register_oracles(network, oracle.price_oracle, lending_rate_oracle)
                .await?;
        }

        let wrapped_native_gateway = if self.options.deploy_gateway {
            Some(self.resolve_gateway(network, wrapped_native_token).await?)
        } else {
            None
        };

        if self.options.configure_reserves {
            self.configure_reserves(network, &configure_inputs).await?;
        }

        let a_token_domain_separator = if pool.a_token_domain_separator.is_empty() {
            None
        } else {
            pool.a_token_domain_separator.resolve(network)?.value().copied()
        };

        let addresses = ResolvedAddressSet {
            pool_admin,
            emergency_admin,
            wrapped_native_token,
            fallback_oracle: oracle.fallback_oracle,
            price_oracle: oracle.price_oracle,
            lending_rate_oracle,
            treasury,
            incentives_controller,
            wrapped_native_gateway,
        };

        info!(
            pool = %pool.name,
            network = %network,
            deployments = self.deployer.deployments().len(),
            calls = self.calls.len(),
            "Market configuration complete"
        );

        Ok(DeploymentReport {
            pool: pool.name.clone(),
            market_id: pool.market_id.clone(),
            provider_id: pool.provider_id,
            network,
            addresses,
            quote_unit: pool.oracle_quote_unit,
            a_token_domain_separator,
            reserve_assets,
            oracle,
            seed_operations,
            init_inputs,
            configure_inputs,
            deployments: self.deployer.deployments().to_vec(),
            calls: self.calls.clone(),
        })
    }

    async fn send(&mut self, to: Address, call: ContractCall) -> Result<()> {
        let method = call.method();
        let result = self.deployer.submitter().call(to, call).await?;
        info!(to = %to, method, tx = %result.tx_hash, "Call confirmed");
        self.calls.push(SubmittedCall {
            to,
            method,
            tx_hash: result.tx_hash,
        });
        Ok(())
    }

    /// Seed a freshly deployed rate oracle and hand it to the pool admin.
    ///
    /// With the rates helper deployed, the oracle is lent to the helper for
    /// batched writes; otherwise each rate is set directly.
    async fn seed_rates(
        &mut self,
        oracle: Address,
        operations: &[SeedOperation],
        admin: Address,
        deployer_account: Address,
    ) -> Result<()> {
        match self.deployer.lookup(RATES_HELPER_NAME) {
            Some(helper) if !operations.is_empty() => {
                debug!(helper = %helper, batches = seed_batches(operations).len(), "Seeding rates through helper");
                self.send(oracle, ContractCall::TransferOwnership { new_owner: helper })
                    .await?;
                for batch in seed_batches(operations) {
                    self.send(
                        helper,
                        ContractCall::SetOracleBorrowRates {
                            assets: batch.iter().map(|op| op.asset).collect(),
                            rates: batch.iter().map(|op| op.rate.raw()).collect(),
                            oracle,
                        },
                    )
                    .await?;
                }
                self.send(helper, ContractCall::SetOracleOwnership { oracle, admin })
                    .await?;
            }
            _ => {
                for op in operations {
                    self.send(
                        oracle,
                        ContractCall::SetMarketBorrowRate {
                            asset: op.asset,
                            rate: op.rate.raw(),
                        },
                    )
                    .await?;
                }
                if admin != deployer_account {
                    self.send(oracle, ContractCall::TransferOwnership { new_owner: admin })
                        .await?;
                }
            }
        }
        Ok(())
    }

    async fn register_oracles(
        &mut self,
        network: Network,
        price_oracle: Address,
        lending_rate_oracle: Address,
    ) -> Result<()> {
        let provider = configured_or_registered(
            &self.pool.addresses.addresses_provider,
            network,
            &self.deployer,
            ADDRESSES_PROVIDER_NAME,
        )?;
        let Some(provider) = provider else {
            debug!("No addresses provider known, oracles not registered");
            return Ok(());
        };

        self.send(provider, ContractCall::SetPriceOracle { oracle: price_oracle })
            .await?;
        self.send(
            provider,
            ContractCall::SetLendingRateOracle {
                oracle: lending_rate_oracle,
            },
        )
        .await
    }

    async fn resolve_gateway(&mut self, network: Network, wrapped_native: Address) -> Result<Address> {
        let existing = configured_or_registered(
            &self.pool.addresses.wrapped_native_gateway,
            network,
            &self.deployer,
            &ContractKind::WrappedNativeGateway.registry_name(),
        )?;
        if let Some(gateway) = existing {
            debug!(gateway = %gateway, "Adopting wrapped native gateway");
            return Ok(gateway);
        }

        let gateway = self
            .deployer
            .deploy(
                network,
                ContractKind::WrappedNativeGateway,
                ConstructorArgs::Gateway { wrapped_native },
            )
            .await?;

        let lending_pool = configured_or_registered(
            &self.pool.addresses.lending_pool,
            network,
            &self.deployer,
            LENDING_POOL_NAME,
        )?;
        match lending_pool {
            Some(lending_pool) => {
                self.send(gateway, ContractCall::AuthorizeLendingPool { lending_pool })
                    .await?
            }
            None => debug!("No lending pool known, gateway left unauthorized"),
        }
        Ok(gateway)
    }

    async fn configure_reserves(
        &mut self,
        network: Network,
        inputs: &[ReserveConfigureInput],
    ) -> Result<()> {
        let configurator = configured_or_registered(
            &self.pool.addresses.lending_pool_configurator,
            network,
            &self.deployer,
            CONFIGURATOR_NAME,
        )?;
        let Some(configurator) = configurator else {
            debug!("No lending pool configurator known, reserves not configured");
            return Ok(());
        };

        for input in inputs {
            for call in input.calls() {
                self.send(configurator, call).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolveError;
    use crate::market::MarketRegistry;
    use crate::overlay::Configured;
    use alloy::primitives::address;
    use deployer_chain::{
        DryRunSubmitter, InMemoryRegistry, JsonFileRegistry, RecordedOp, DEFAULT_DEPLOYER,
    };

    fn pegasys() -> PoolConfiguration {
        MarketRegistry::builtin().unwrap().load_pool("Pegasys").unwrap()
    }

    fn setup() -> (Arc<DryRunSubmitter>, Arc<InMemoryRegistry>) {
        (
            Arc::new(DryRunSubmitter::default()),
            Arc::new(InMemoryRegistry::new()),
        )
    }

    #[tokio::test]
    async fn test_pegasys_on_hardhat() {
        let pool = pegasys();
        let (submitter, registry) = setup();
        let mut pipeline = DeploymentPipeline::new(
            &pool,
            NetworkContext::new(Network::Hardhat),
            submitter.clone(),
            registry.clone(),
        );

        let report = pipeline.run().await.unwrap();

        let seeded: Vec<_> = report
            .seed_operations
            .iter()
            .map(|op| op.symbol.as_str())
            .collect();
        assert_eq!(seeded, vec!["WSYS", "USDC", "USDT", "ETH", "BTC"]);

        // fallback mock, feed mock, price oracle, rate oracle, gateway
        let names: Vec<_> = report.deployments.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["PriceOracle", "SupraOracleMock", "PegasysOracle", "LendingRateOracle", "WSYSGateway"]
        );
        assert_eq!(registry.lookup("LendingRateOracle"), Some(report.addresses.lending_rate_oracle));

        // no helper, no provider: five direct rate writes, admin is the deployer
        let methods: Vec<_> = report.calls.iter().map(|c| c.method).collect();
        assert_eq!(methods, vec!["setMarketBorrowRate"; 5]);
        assert_eq!(report.addresses.pool_admin, DEFAULT_DEPLOYER);
        assert_eq!(report.addresses.treasury, DEFAULT_DEPLOYER);
        assert_eq!(report.init_inputs.len(), 5);
        assert_eq!(report.provider_id, 1);
        assert_eq!(report.quote_unit, U256::from(100_000_000u64));
        assert!(report.a_token_domain_separator.is_none());

        let rendered = report.to_string();
        assert!(rendered.contains("Pegasys genesis market"));
        assert!(rendered.contains("[mock]"));
    }

    #[tokio::test]
    async fn test_second_run_adopts_registered_contracts() {
        let pool = pegasys();
        let (submitter, registry) = setup();
        let ctx = NetworkContext::new(Network::Hardhat);

        let first = DeploymentPipeline::new(&pool, ctx, submitter.clone(), registry.clone())
            .run()
            .await
            .unwrap();
        let deploys_after_first = submitter.deploy_count();

        let second = DeploymentPipeline::new(&pool, ctx, submitter.clone(), registry.clone())
            .with_options(PipelineOptions {
                deploy_gateway: true,
                register_oracles: false,
                configure_reserves: false,
            })
            .run()
            .await
            .unwrap();

        // mocks and the gateway come from the registry; the oracles are redeployed
        assert_eq!(second.oracle.fallback_oracle, first.oracle.fallback_oracle);
        assert_eq!(second.addresses.wrapped_native_gateway, first.addresses.wrapped_native_gateway);
        assert_eq!(submitter.deploy_count(), deploys_after_first + 2);
    }

    #[tokio::test]
    async fn test_helper_batches_and_registration() {
        let pool = pegasys();
        let (submitter, registry) = setup();
        let helper = address!("00000000000000000000000000000000000000a1");
        let provider = address!("00000000000000000000000000000000000000a2");
        let lending_pool = address!("00000000000000000000000000000000000000a3");
        registry.insert(RATES_HELPER_NAME, helper).unwrap();
        registry.insert(ADDRESSES_PROVIDER_NAME, provider).unwrap();
        registry.insert(LENDING_POOL_NAME, lending_pool).unwrap();

        let report = DeploymentPipeline::new(
            &pool,
            NetworkContext::new(Network::Hardhat),
            submitter.clone(),
            registry,
        )
        .run()
        .await
        .unwrap();

        let calls = submitter.calls();
        let oracle = report.addresses.lending_rate_oracle;
        assert_eq!(calls[0], (oracle, ContractCall::TransferOwnership { new_owner: helper }));
        match &calls[1] {
            (to, ContractCall::SetOracleBorrowRates { assets, rates, oracle: target }) => {
                assert_eq!(*to, helper);
                assert_eq!(*target, oracle);
                assert_eq!(assets.len(), 5);
                assert_eq!(rates.len(), 5);
            }
            other => panic!("unexpected call {other:?}"),
        }
        assert_eq!(
            calls[2],
            (helper, ContractCall::SetOracleOwnership { oracle, admin: DEFAULT_DEPLOYER })
        );
        assert_eq!(
            calls[3],
            (provider, ContractCall::SetPriceOracle { oracle: report.addresses.price_oracle })
        );
        assert_eq!(calls[4], (provider, ContractCall::SetLendingRateOracle { oracle }));
        let gateway = report.addresses.wrapped_native_gateway.unwrap();
        assert_eq!(calls[5], (gateway, ContractCall::AuthorizeLendingPool { lending_pool }));
    }

    #[tokio::test]
    async fn test_configured_rate_oracle_is_not_seeded() {
        let mut pool = pegasys();
        let existing = address!("00000000000000000000000000000000000000b1");
        pool.addresses.lending_rate_oracle = pool
            .addresses
            .lending_rate_oracle
            .clone()
            .with(Network::Hardhat, Configured::Value(existing));
        let (submitter, registry) = setup();

        let report = DeploymentPipeline::new(
            &pool,
            NetworkContext::new(Network::Hardhat),
            submitter.clone(),
            registry,
        )
        .run()
        .await
        .unwrap();

        assert_eq!(report.addresses.lending_rate_oracle, existing);
        assert!(report.seed_operations.is_empty());
        assert!(submitter.calls().is_empty());
    }

    #[tokio::test]
    async fn test_configure_reserves_through_configurator() {
        let pool = pegasys();
        let (submitter, registry) = setup();
        let configurator = address!("00000000000000000000000000000000000000c1");
        registry.insert(CONFIGURATOR_NAME, configurator).unwrap();

        DeploymentPipeline::new(&pool, NetworkContext::new(Network::Hardhat), submitter.clone(), registry)
            .with_options(PipelineOptions {
                deploy_gateway: false,
                register_oracles: false,
                configure_reserves: true,
            })
            .run()
            .await
            .unwrap();

        let configure_calls = submitter
            .calls()
            .into_iter()
            .filter(|(to, _)| *to == configurator)
            .count();
        // five collateral reserves, three calls each
        assert_eq!(configure_calls, 15);
    }

    #[tokio::test]
    async fn test_failure_leaves_earlier_deployments_in_place() {
        let pool = pegasys();
        let submitter = Arc::new(DryRunSubmitter::default().reject_deploy("LendingRateOracle"));
        let registry = Arc::new(InMemoryRegistry::new());
        let mut pipeline = DeploymentPipeline::new(
            &pool,
            NetworkContext::new(Network::Hardhat),
            submitter.clone(),
            registry.clone(),
        );

        let err = pipeline.run().await.unwrap_err();
        assert!(matches!(err, ResolveError::Chain(_)));

        // nothing is rolled back
        assert_eq!(pipeline.deployments().len(), 3);
        assert!(registry.lookup("PegasysOracle").is_some());
        assert!(submitter
            .operations()
            .iter()
            .all(|op| matches!(op, RecordedOp::Deploy { .. })));
    }

    #[tokio::test]
    async fn test_main_without_signer_admin_needs_no_mocks() {
        let pool = pegasys();
        let (submitter, registry) = setup();

        let report = DeploymentPipeline::new(&pool, NetworkContext::new(Network::Main), submitter.clone(), registry)
            .with_options(PipelineOptions {
                deploy_gateway: false,
                register_oracles: false,
                configure_reserves: false,
            })
            .run()
            .await
            .unwrap();

        assert!(report.oracle.adopted);
        assert!(report.deployments.iter().all(|d| !d.mock));
        assert_eq!(report.addresses.pool_admin, address!("5B024AfAaaed10bA2788fdDCd7b72Af60A854D2F"));
        // admin differs from the deployer: ownership handed over after seeding
        let last = submitter.calls().pop().unwrap();
        assert_eq!(
            last.1,
            ContractCall::TransferOwnership { new_owner: report.addresses.pool_admin }
        );
    }

    #[tokio::test]
    async fn test_planning_pass_leaves_registry_file_unchanged() {
        let pool = pegasys();
        let path = std::env::temp_dir().join(format!(
            "deployer-pipeline-planning-{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        let provider = address!("00000000000000000000000000000000000000d1");
        JsonFileRegistry::open(&path, "hardhat")
            .unwrap()
            .insert(ADDRESSES_PROVIDER_NAME, provider)
            .unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        let planned = DeploymentPipeline::new(
            &pool,
            NetworkContext::new(Network::Hardhat),
            Arc::new(DryRunSubmitter::default()),
            Arc::new(JsonFileRegistry::read_only(&path, "hardhat").unwrap()),
        )
        .run()
        .await
        .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);

        // a later pass with another signer deploys its own contracts
        let signer = address!("7777777777777777777777777777777777777777");
        let submitter = Arc::new(DryRunSubmitter::new(signer));
        let real = DeploymentPipeline::new(
            &pool,
            NetworkContext::new(Network::Hardhat),
            submitter.clone(),
            Arc::new(JsonFileRegistry::open(&path, "hardhat").unwrap()),
        )
        .run()
        .await
        .unwrap();
        assert_ne!(real.oracle.fallback_oracle, planned.oracle.fallback_oracle);
        assert_ne!(
            real.addresses.wrapped_native_gateway,
            planned.addresses.wrapped_native_gateway
        );
        assert_eq!(submitter.deploy_count(), planned.deployments.len());

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_main_with_missing_asset_aborts_before_deploying() {
        let mut pool = pegasys();
        let mut assets = pool.reserve_assets.resolve(Network::Main).unwrap().clone();
        assets.insert(crate::symbol::Symbol::new("ETH").unwrap(), Configured::Unresolved);
        pool.reserve_assets = pool.reserve_assets.clone().with(Network::Main, assets);
        let (submitter, registry) = setup();

        let err = DeploymentPipeline::new(&pool, NetworkContext::new(Network::Main), submitter.clone(), registry)
            .run()
            .await
            .unwrap_err();

        assert!(matches!(err, ResolveError::MissingProductionAddress { .. }));
        assert_eq!(submitter.deploy_count(), 0);
    }
}
