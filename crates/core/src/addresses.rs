//! Infrastructure address resolution for one run.

use crate::error::{ResolveError, Result};
use crate::market::PoolConfiguration;
use crate::mock::MockDeployer;
use crate::network::{Network, NetworkContext};
use crate::overlay::{AddressOverlay, Configured};
use crate::symbol::SymbolMap;
use alloy::primitives::Address;
use deployer_chain::{ConstructorArgs, ContractKind};
use std::fmt;
use tracing::debug;

/// Concrete addresses the run ended up with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAddressSet {
    pub pool_admin: Address,
    pub emergency_admin: Address,
    pub wrapped_native_token: Address,
    /// `None` when a configured price oracle was adopted without one
    pub fallback_oracle: Option<Address>,
    pub price_oracle: Address,
    pub lending_rate_oracle: Address,
    pub treasury: Address,
    pub incentives_controller: Address,
    pub wrapped_native_gateway: Option<Address>,
}

impl fmt::Display for ResolvedAddressSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let optional = |a: Option<Address>| a.map_or_else(|| "-".to_string(), |a| a.to_string());
        writeln!(f, "  PoolAdmin              {}", self.pool_admin)?;
        writeln!(f, "  EmergencyAdmin         {}", self.emergency_admin)?;
        writeln!(f, "  WrappedNativeToken     {}", self.wrapped_native_token)?;
        writeln!(f, "  PriceOracle            {}", self.price_oracle)?;
        writeln!(f, "  FallbackOracle         {}", optional(self.fallback_oracle))?;
        writeln!(f, "  LendingRateOracle      {}", self.lending_rate_oracle)?;
        writeln!(f, "  Treasury               {}", self.treasury)?;
        writeln!(f, "  IncentivesController   {}", self.incentives_controller)?;
        write!(f, "  WrappedNativeGateway   {}", optional(self.wrapped_native_gateway))
    }
}

/// Admin role resolved either from the overlay or from a signer index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminRole {
    Pool,
    Emergency,
}

impl AdminRole {
    fn name(&self) -> &'static str {
        match self {
            Self::Pool => "pool admin",
            Self::Emergency => "emergency admin",
        }
    }
}

/// A configured admin address wins over the signer at the role's index.
pub fn resolve_admin(
    pool: &PoolConfiguration,
    role: AdminRole,
    network: Network,
    accounts: &[Address],
) -> Result<Address> {
    let (overlay, index) = match role {
        AdminRole::Pool => (&pool.addresses.pool_admin, pool.pool_admin_index),
        AdminRole::Emergency => (&pool.addresses.emergency_admin, pool.emergency_admin_index),
    };

    if let Some(address) = overlay.resolve(network)?.usable() {
        return Ok(address);
    }

    let address = accounts
        .get(index)
        .copied()
        .ok_or(ResolveError::MissingSignerAccount {
            role: role.name(),
            index,
            available: accounts.len(),
        })?;
    debug!(role = role.name(), index, address = %address, "Admin taken from signer accounts");
    Ok(address)
}

/// Reserve-factor treasury. Required on production, the pool admin
/// elsewhere.
pub fn resolve_treasury(
    pool: &PoolConfiguration,
    network: Network,
    pool_admin: Address,
) -> Result<Address> {
    match pool.addresses.treasury.resolve(network)?.usable() {
        Some(address) => Ok(address),
        None if network.is_production() => Err(ResolveError::MissingProductionAddress {
            resource: "Treasury".to_string(),
            network: network.to_string(),
        }),
        None => Ok(pool_admin),
    }
}

/// Incentives controller; the zero address disables incentives.
pub fn resolve_incentives_controller(pool: &PoolConfiguration, network: Network) -> Result<Address> {
    Ok(pool
        .addresses
        .incentives_controller
        .resolve(network)?
        .usable()
        .unwrap_or(Address::ZERO))
}

/// Wrapped native token, deploying the mock on test networks.
///
/// Resolved against `main` when the run forks mainnet.
pub async fn resolve_wrapped_native(
    pool: &PoolConfiguration,
    context: &NetworkContext,
    deployer: &mut MockDeployer,
) -> Result<Address> {
    let network = context.wrapped_native_network();
    let candidate = pool.addresses.wrapped_native_token.resolve(network)?;
    deployer
        .resolve_or_deploy_mock(
            network,
            ContractKind::WrappedNativeMock,
            ConstructorArgs::None,
            candidate,
        )
        .await
}

/// Reserve asset addresses for the active network, in file order.
///
/// Unresolved assets get a mintable test token with the catalog's decimals.
pub async fn resolve_reserve_assets(
    pool: &PoolConfiguration,
    network: Network,
    deployer: &mut MockDeployer,
) -> Result<SymbolMap<Address>> {
    let configured = pool.reserve_assets.resolve(network)?;
    let mut resolved = SymbolMap::new();
    for (symbol, candidate) in configured.iter() {
        let address = match candidate.usable() {
            Some(address) => address,
            None => {
                let decimals = pool.reserves.get(symbol.as_str())?.reserve_decimals;
                deployer
                    .resolve_or_deploy_mock(
                        network,
                        ContractKind::MintableToken {
                            symbol: symbol.to_string(),
                        },
                        ConstructorArgs::Token {
                            name: symbol.to_string(),
                            symbol: symbol.to_string(),
                            decimals,
                        },
                        candidate,
                    )
                    .await?
            }
        };
        resolved.insert(symbol.clone(), address);
    }
    Ok(resolved)
}

/// First usable address of `overlay` on `network`, else the registry entry
/// `registry_name`.
pub fn configured_or_registered(
    overlay: &AddressOverlay,
    network: Network,
    deployer: &MockDeployer,
    registry_name: &str,
) -> Result<Option<Address>> {
    let configured: &Configured<Address> = overlay.resolve(network)?;
    Ok(configured.usable().or_else(|| deployer.lookup(registry_name)))
}
