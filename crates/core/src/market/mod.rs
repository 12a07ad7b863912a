//! Market (pool) configuration.
//!
//! A market is described by TOML files; a pool file usually `extends` the
//! shared `commons` file and overrides what differs. Loading produces an
//! immutable [`PoolConfiguration`].
//!
//! # Example
//!
//! ```rust,ignore
//! use deployer_core::market::MarketRegistry;
//!
//! let pool = MarketRegistry::builtin()?.load_pool("Pegasys")?;
//! let assets = pool.reserve_assets.resolve(Network::Hardhat)?;
//! ```

mod file;
mod registry;

pub use file::{MarketFile, ReserveFile};
pub use registry::MarketRegistry;

use crate::error::{ResolveError, Result};
use crate::network::Network;
use crate::overlay::{AddressOverlay, Configured, NetworkOverlay};
use crate::rates::LendingRateTable;
use crate::reserves::ReserveCatalog;
use crate::symbol::{Symbol, SymbolMap};
use alloy::primitives::{Address, B256, U256};

/// Name prefixes of the tokens minted for each reserve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenNaming {
    pub a_token_name_prefix: String,
    pub stable_debt_token_name_prefix: String,
    pub variable_debt_token_name_prefix: String,
    pub symbol_prefix: String,
}

impl TokenNaming {
    pub fn a_token_name(&self, symbol: &Symbol) -> String {
        format!("{} {}", self.a_token_name_prefix, symbol)
    }

    pub fn a_token_symbol(&self, symbol: &Symbol) -> String {
        format!("a{}{}", self.symbol_prefix, symbol)
    }

    pub fn stable_debt_token_name(&self, symbol: &Symbol) -> String {
        format!("{} {}{}", self.stable_debt_token_name_prefix, self.symbol_prefix, symbol)
    }

    pub fn stable_debt_token_symbol(&self, symbol: &Symbol) -> String {
        format!("stableDebt{}{}", self.symbol_prefix, symbol)
    }

    pub fn variable_debt_token_name(&self, symbol: &Symbol) -> String {
        format!("{} {}{}", self.variable_debt_token_name_prefix, self.symbol_prefix, symbol)
    }

    pub fn variable_debt_token_symbol(&self, symbol: &Symbol) -> String {
        format!("variableDebt{}{}", self.symbol_prefix, symbol)
    }
}

/// Per-network infrastructure addresses of a market.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarketAddresses {
    pub pool_admin: AddressOverlay,
    pub emergency_admin: AddressOverlay,
    pub wrapped_native_token: AddressOverlay,
    pub price_oracle: AddressOverlay,
    pub fallback_oracle: AddressOverlay,
    pub price_feed: AddressOverlay,
    pub lending_rate_oracle: AddressOverlay,
    pub treasury: AddressOverlay,
    pub incentives_controller: AddressOverlay,
    pub addresses_provider: AddressOverlay,
    pub lending_pool: AddressOverlay,
    pub lending_pool_configurator: AddressOverlay,
    pub wrapped_native_gateway: AddressOverlay,
}

impl MarketAddresses {
    /// Every overlay, for coverage checks.
    pub fn all(&self) -> [&AddressOverlay; 13] {
        [
            &self.pool_admin,
            &self.emergency_admin,
            &self.wrapped_native_token,
            &self.price_oracle,
            &self.fallback_oracle,
            &self.price_feed,
            &self.lending_rate_oracle,
            &self.treasury,
            &self.incentives_controller,
            &self.addresses_provider,
            &self.lending_pool,
            &self.lending_pool_configurator,
            &self.wrapped_native_gateway,
        ]
    }
}

/// A fully loaded market.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfiguration {
    /// Name the pool was loaded under
    pub name: String,
    pub market_id: String,
    pub provider_id: u64,
    pub naming: TokenNaming,
    /// `USD`, `SYS` or `WSYS`; checked when the oracle is wired
    pub oracle_quote_currency: String,
    pub oracle_quote_unit: U256,
    /// Protocol pseudo-address standing for USD
    pub usd_address: Address,
    pub pool_admin_index: usize,
    pub emergency_admin_index: usize,
    pub addresses: MarketAddresses,
    pub reserve_assets: NetworkOverlay<SymbolMap<Configured<Address>>>,
    pub reserves: ReserveCatalog,
    pub lending_rates: LendingRateTable,
    /// Price-feed pair index per tracked symbol
    pub oracle_indexes: NetworkOverlay<SymbolMap<u64>>,
    pub a_token_domain_separator: NetworkOverlay<Configured<B256>>,
}

impl PoolConfiguration {
    /// Networks the market lists reserve assets for.
    pub fn networks(&self) -> Vec<Network> {
        self.reserve_assets.networks().collect()
    }

    /// Reserve symbols listed on `network`, in file order.
    pub fn reserve_symbols(&self, network: Network) -> Result<Vec<Symbol>> {
        Ok(self
            .reserve_assets
            .resolve(network)?
            .symbols()
            .cloned()
            .collect())
    }

    /// Every declared address overlay must have an entry (possibly
    /// unresolved) for each network the market lists reserve assets for.
    pub fn check_coverage(&self) -> Result<()> {
        let networks = self.networks();
        for overlay in self.addresses.all().into_iter().filter(|o| !o.is_empty()) {
            for network in &networks {
                if overlay.resolve(*network).is_err() {
                    return Err(ResolveError::Config(format!(
                        "market {}: {} has no entry for network {network}",
                        self.name,
                        overlay.field()
                    )));
                }
            }
        }
        Ok(())
    }
}
