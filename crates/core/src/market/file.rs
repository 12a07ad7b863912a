//! TOML market file schema and `extends` layering.

use super::{MarketAddresses, PoolConfiguration, TokenNaming};
use crate::error::{ResolveError, Result};
use crate::overlay::{AddressOverlay, Configured, NetworkOverlay};
use crate::rates::{LendingRateTable, Ray};
use crate::reserves::{InterestRateStrategy, ReserveCatalog, ReserveStrategy};
use crate::symbol::SymbolMap;
use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::path::Path;

/// One market file. Every field is optional so a file can override only
/// part of the market it `extends`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarketFile {
    /// Parent market name
    pub extends: Option<String>,
    pub market_id: Option<String>,
    pub provider_id: Option<u64>,
    pub pool_admin_index: Option<usize>,
    pub emergency_admin_index: Option<usize>,
    #[serde(default)]
    pub naming: NamingSection,
    #[serde(default)]
    pub oracle: OracleSection,
    #[serde(default)]
    pub addresses: AddressesSection,
    pub reserve_assets: Option<NetworkOverlay<SymbolMap<Configured<Address>>>>,
    pub lending_rates: Option<LendingRateTable>,
    pub oracle_indexes: Option<NetworkOverlay<SymbolMap<u64>>>,
    pub a_token_domain_separator: Option<NetworkOverlay<Configured<B256>>>,
    /// Named interest-rate curves, referenced by reserves
    #[serde(default)]
    pub interest_rate_strategies: BTreeMap<String, RateStrategyFile>,
    #[serde(default)]
    pub reserves: SymbolMap<ReserveFile>,
}

impl MarketFile {
    /// Parse a market file from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a market file from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamingSection {
    pub a_token_name_prefix: Option<String>,
    pub stable_debt_token_name_prefix: Option<String>,
    pub variable_debt_token_name_prefix: Option<String>,
    pub symbol_prefix: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OracleSection {
    pub quote_currency: Option<String>,
    pub quote_unit: Option<String>,
    pub usd_address: Option<Configured<Address>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddressesSection {
    pub pool_admin: Option<AddressOverlay>,
    pub emergency_admin: Option<AddressOverlay>,
    pub wrapped_native_token: Option<AddressOverlay>,
    pub price_oracle: Option<AddressOverlay>,
    pub fallback_oracle: Option<AddressOverlay>,
    pub price_feed: Option<AddressOverlay>,
    pub lending_rate_oracle: Option<AddressOverlay>,
    pub treasury: Option<AddressOverlay>,
    pub incentives_controller: Option<AddressOverlay>,
    pub addresses_provider: Option<AddressOverlay>,
    pub lending_pool: Option<AddressOverlay>,
    pub lending_pool_configurator: Option<AddressOverlay>,
    pub wrapped_native_gateway: Option<AddressOverlay>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateStrategyFile {
    pub optimal_utilization_rate: Ray,
    pub base_variable_borrow_rate: Ray,
    pub variable_rate_slope1: Ray,
    pub variable_rate_slope2: Ray,
    pub stable_rate_slope1: Ray,
    pub stable_rate_slope2: Ray,
}

/// Reserve entry. Numbers may be written as integers or decimal strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReserveFile {
    /// Name of an `[interest_rate_strategies]` entry
    pub strategy: String,
    #[serde(deserialize_with = "decimal")]
    pub base_ltv_as_collateral: u16,
    #[serde(deserialize_with = "decimal")]
    pub liquidation_threshold: u16,
    #[serde(deserialize_with = "decimal")]
    pub liquidation_bonus: u16,
    pub borrowing_enabled: bool,
    pub stable_borrow_rate_enabled: bool,
    #[serde(deserialize_with = "decimal")]
    pub reserve_decimals: u8,
    #[serde(default = "default_a_token_impl")]
    pub a_token_impl: String,
    #[serde(deserialize_with = "decimal")]
    pub reserve_factor: u16,
}

fn default_a_token_impl() -> String {
    "AToken".to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DecimalValue {
    Int(u64),
    Str(String),
}

fn decimal<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    let raw = match DecimalValue::deserialize(deserializer)? {
        DecimalValue::Int(v) => v,
        DecimalValue::Str(s) => s.trim().parse::<u64>().map_err(serde::de::Error::custom)?,
    };
    T::try_from(raw).map_err(|_| serde::de::Error::custom(format!("{raw} is out of range")))
}

fn pick<T>(child: Option<T>, parent: Option<T>) -> Option<T> {
    child.or(parent)
}

impl NamingSection {
    fn layer(self, child: Self) -> Self {
        Self {
            a_token_name_prefix: pick(child.a_token_name_prefix, self.a_token_name_prefix),
            stable_debt_token_name_prefix: pick(
                child.stable_debt_token_name_prefix,
                self.stable_debt_token_name_prefix,
            ),
            variable_debt_token_name_prefix: pick(
                child.variable_debt_token_name_prefix,
                self.variable_debt_token_name_prefix,
            ),
            symbol_prefix: pick(child.symbol_prefix, self.symbol_prefix),
        }
    }
}

impl OracleSection {
    fn layer(self, child: Self) -> Self {
        Self {
            quote_currency: pick(child.quote_currency, self.quote_currency),
            quote_unit: pick(child.quote_unit, self.quote_unit),
            usd_address: pick(child.usd_address, self.usd_address),
        }
    }
}

impl AddressesSection {
    fn layer(self, child: Self) -> Self {
        Self {
            pool_admin: pick(child.pool_admin, self.pool_admin),
            emergency_admin: pick(child.emergency_admin, self.emergency_admin),
            wrapped_native_token: pick(child.wrapped_native_token, self.wrapped_native_token),
            price_oracle: pick(child.price_oracle, self.price_oracle),
            fallback_oracle: pick(child.fallback_oracle, self.fallback_oracle),
            price_feed: pick(child.price_feed, self.price_feed),
            lending_rate_oracle: pick(child.lending_rate_oracle, self.lending_rate_oracle),
            treasury: pick(child.treasury, self.treasury),
            incentives_controller: pick(child.incentives_controller, self.incentives_controller),
            addresses_provider: pick(child.addresses_provider, self.addresses_provider),
            lending_pool: pick(child.lending_pool, self.lending_pool),
            lending_pool_configurator: pick(
                child.lending_pool_configurator,
                self.lending_pool_configurator,
            ),
            wrapped_native_gateway: pick(child.wrapped_native_gateway, self.wrapped_native_gateway),
        }
    }

    fn into_addresses(self) -> MarketAddresses {
        fn named(overlay: Option<AddressOverlay>, field: &str) -> AddressOverlay {
            overlay
                .unwrap_or_default()
                .with_field(format!("addresses.{field}"))
        }

        MarketAddresses {
            pool_admin: named(self.pool_admin, "pool_admin"),
            emergency_admin: named(self.emergency_admin, "emergency_admin"),
            wrapped_native_token: named(self.wrapped_native_token, "wrapped_native_token"),
            price_oracle: named(self.price_oracle, "price_oracle"),
            fallback_oracle: named(self.fallback_oracle, "fallback_oracle"),
            price_feed: named(self.price_feed, "price_feed"),
            lending_rate_oracle: named(self.lending_rate_oracle, "lending_rate_oracle"),
            treasury: named(self.treasury, "treasury"),
            incentives_controller: named(self.incentives_controller, "incentives_controller"),
            addresses_provider: named(self.addresses_provider, "addresses_provider"),
            lending_pool: named(self.lending_pool, "lending_pool"),
            lending_pool_configurator: named(
                self.lending_pool_configurator,
                "lending_pool_configurator",
            ),
            wrapped_native_gateway: named(self.wrapped_native_gateway, "wrapped_native_gateway"),
        }
    }
}

fn resolve_reserves(
    reserves: &SymbolMap<ReserveFile>,
    strategies: &BTreeMap<String, RateStrategyFile>,
) -> Result<SymbolMap<ReserveStrategy>> {
    let mut resolved = SymbolMap::new();
    for (symbol, reserve) in reserves.iter() {
        let curve = strategies.get(&reserve.strategy).ok_or_else(|| {
            ResolveError::Config(format!(
                "reserve {symbol} references unknown interest rate strategy {}",
                reserve.strategy
            ))
        })?;
        resolved.insert(
            symbol.clone(),
            ReserveStrategy {
                strategy: InterestRateStrategy {
                    name: reserve.strategy.clone(),
                    optimal_utilization_rate: curve.optimal_utilization_rate,
                    base_variable_borrow_rate: curve.base_variable_borrow_rate,
                    variable_rate_slope1: curve.variable_rate_slope1,
                    variable_rate_slope2: curve.variable_rate_slope2,
                    stable_rate_slope1: curve.stable_rate_slope1,
                    stable_rate_slope2: curve.stable_rate_slope2,
                },
                base_ltv_as_collateral: reserve.base_ltv_as_collateral,
                liquidation_threshold: reserve.liquidation_threshold,
                liquidation_bonus: reserve.liquidation_bonus,
                borrowing_enabled: reserve.borrowing_enabled,
                stable_borrow_rate_enabled: reserve.stable_borrow_rate_enabled,
                reserve_decimals: reserve.reserve_decimals,
                a_token_impl: reserve.a_token_impl.clone(),
                reserve_factor: reserve.reserve_factor,
            },
        );
    }
    Ok(resolved)
}

/// Build a pool from its file chain, root ancestor first.
pub(super) fn build_pool(name: &str, chain: Vec<MarketFile>) -> Result<PoolConfiguration> {
    let missing = |field: &str| ResolveError::Config(format!("market {name}: {field} is not set"));

    // Curves are shared across the chain; a child may redefine one by name.
    let mut strategies = BTreeMap::new();
    for file in &chain {
        strategies.extend(file.interest_rate_strategies.clone());
    }

    let mut catalog = ReserveCatalog::default();
    let mut merged = MarketFile::default();
    for file in chain {
        let overrides = resolve_reserves(&file.reserves, &strategies)?;
        catalog = ReserveCatalog::merge(&overrides, catalog.as_map())?;

        merged = MarketFile {
            extends: None,
            market_id: pick(file.market_id, merged.market_id),
            provider_id: pick(file.provider_id, merged.provider_id),
            pool_admin_index: pick(file.pool_admin_index, merged.pool_admin_index),
            emergency_admin_index: pick(file.emergency_admin_index, merged.emergency_admin_index),
            naming: merged.naming.layer(file.naming),
            oracle: merged.oracle.layer(file.oracle),
            addresses: merged.addresses.layer(file.addresses),
            reserve_assets: pick(file.reserve_assets, merged.reserve_assets),
            lending_rates: pick(file.lending_rates, merged.lending_rates),
            oracle_indexes: pick(file.oracle_indexes, merged.oracle_indexes),
            a_token_domain_separator: pick(
                file.a_token_domain_separator,
                merged.a_token_domain_separator,
            ),
            interest_rate_strategies: BTreeMap::new(),
            reserves: SymbolMap::new(),
        };
    }

    let naming = TokenNaming {
        a_token_name_prefix: merged
            .naming
            .a_token_name_prefix
            .ok_or_else(|| missing("naming.a_token_name_prefix"))?,
        stable_debt_token_name_prefix: merged
            .naming
            .stable_debt_token_name_prefix
            .ok_or_else(|| missing("naming.stable_debt_token_name_prefix"))?,
        variable_debt_token_name_prefix: merged
            .naming
            .variable_debt_token_name_prefix
            .ok_or_else(|| missing("naming.variable_debt_token_name_prefix"))?,
        symbol_prefix: merged.naming.symbol_prefix.unwrap_or_default(),
    };

    let quote_unit = merged
        .oracle
        .quote_unit
        .ok_or_else(|| missing("oracle.quote_unit"))?;
    let oracle_quote_unit = U256::from_str_radix(quote_unit.trim(), 10).map_err(|e| {
        ResolveError::Config(format!("market {name}: oracle.quote_unit '{quote_unit}': {e}"))
    })?;

    let pool = PoolConfiguration {
        name: name.to_string(),
        market_id: merged.market_id.ok_or_else(|| missing("market_id"))?,
        provider_id: merged.provider_id.unwrap_or_default(),
        naming,
        oracle_quote_currency: merged
            .oracle
            .quote_currency
            .ok_or_else(|| missing("oracle.quote_currency"))?,
        oracle_quote_unit,
        usd_address: merged
            .oracle
            .usd_address
            .and_then(|a| a.value().copied())
            .unwrap_or(Address::ZERO),
        pool_admin_index: merged.pool_admin_index.unwrap_or(0),
        emergency_admin_index: merged.emergency_admin_index.unwrap_or(1),
        addresses: merged.addresses.into_addresses(),
        reserve_assets: merged
            .reserve_assets
            .ok_or_else(|| missing("reserve_assets"))?
            .with_field("reserve_assets"),
        reserves: catalog,
        lending_rates: merged.lending_rates.unwrap_or_default(),
        oracle_indexes: merged
            .oracle_indexes
            .unwrap_or_default()
            .with_field("oracle_indexes"),
        a_token_domain_separator: merged
            .a_token_domain_separator
            .unwrap_or_default()
            .with_field("a_token_domain_separator"),
    };

    pool.check_coverage()?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Network;

    const PARENT: &str = r#"
        market_id = "Parent"

        [naming]
        a_token_name_prefix = "Test interest bearing"
        stable_debt_token_name_prefix = "Test stable debt bearing"
        variable_debt_token_name_prefix = "Test variable debt bearing"

        [oracle]
        quote_currency = "USD"
        quote_unit = "100000000"

        [addresses.treasury]
        hardhat = ""

        [reserve_assets.hardhat]

        [interest_rate_strategies.volatile]
        optimal_utilization_rate = "0.65"
        base_variable_borrow_rate = "0"
        variable_rate_slope1 = "0.08"
        variable_rate_slope2 = "1"
        stable_rate_slope1 = "0.1"
        stable_rate_slope2 = "1"

        [reserves.WSYS]
        strategy = "volatile"
        base_ltv_as_collateral = "8000"
        liquidation_threshold = "8250"
        liquidation_bonus = "10500"
        borrowing_enabled = true
        stable_borrow_rate_enabled = false
        reserve_decimals = "18"
        reserve_factor = "1000"
    "#;

    fn parent() -> MarketFile {
        MarketFile::parse(PARENT).unwrap()
    }

    #[test]
    fn test_child_overrides_parent_fields() {
        let child = MarketFile::parse(
            r#"
            extends = "parent"
            market_id = "Child"
            provider_id = 7

            [reserve_assets.hardhat]
            WSYS = "0x4200000000000000000000000000000000000006"

            [reserves.WSYS]
            strategy = "volatile"
            base_ltv_as_collateral = 7000
            liquidation_threshold = 7500
            liquidation_bonus = 11000
            borrowing_enabled = true
            stable_borrow_rate_enabled = false
            reserve_decimals = 18
            reserve_factor = 2000
            "#,
        )
        .unwrap();

        let pool = build_pool("Child", vec![parent(), child]).unwrap();
        assert_eq!(pool.market_id, "Child");
        assert_eq!(pool.provider_id, 7);
        assert_eq!(pool.naming.a_token_name_prefix, "Test interest bearing");
        assert_eq!(pool.reserves.get("WSYS").unwrap().base_ltv_as_collateral, 7000);
        assert_eq!(pool.reserve_symbols(Network::Hardhat).unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_reserve_fails_the_load() {
        let child = MarketFile::parse(
            r#"
            [reserves.USDC]
            strategy = "volatile"
            base_ltv_as_collateral = "8000"
            liquidation_threshold = "7999"
            liquidation_bonus = "10500"
            borrowing_enabled = true
            stable_borrow_rate_enabled = true
            reserve_decimals = "6"
            reserve_factor = "1000"
            "#,
        )
        .unwrap();

        let err = build_pool("Bad", vec![parent(), child]).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::InvalidReserveStrategy { field: "liquidation_threshold", .. }
        ));
    }

    #[test]
    fn test_unknown_rate_strategy_reference() {
        let child = MarketFile::parse(
            r#"
            [reserves.USDC]
            strategy = "nope"
            base_ltv_as_collateral = 0
            liquidation_threshold = 0
            liquidation_bonus = 0
            borrowing_enabled = true
            stable_borrow_rate_enabled = false
            reserve_decimals = 6
            reserve_factor = 1000
            "#,
        )
        .unwrap();
        assert!(matches!(
            build_pool("Bad", vec![parent(), child]),
            Err(ResolveError::Config(_))
        ));
    }

    #[test]
    fn test_address_overlay_must_cover_listed_networks() {
        let child = MarketFile::parse(
            r#"
            [reserve_assets.hardhat]
            [reserve_assets.main]
            "#,
        )
        .unwrap();
        let err = build_pool("Gap", vec![parent(), child]).unwrap_err();
        assert!(err.to_string().contains("addresses.treasury"));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(MarketFile::parse("market_idd = \"typo\"").is_err());
    }
}
