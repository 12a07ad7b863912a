//! Reserve initialization and configuration inputs.
//!
//! These are the per-reserve payloads handed to the lending pool
//! configurator: `batchInitReserve` for the token contracts and the
//! configure calls for the risk parameters.

use crate::error::Result;
use crate::market::PoolConfiguration;
use crate::symbol::{Symbol, SymbolMap};
use alloy::primitives::Address;
use deployer_chain::ContractCall;

/// Token implementations and names for one reserve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReserveInitInput {
    pub symbol: Symbol,
    pub underlying_asset: Address,
    pub underlying_asset_decimals: u8,
    pub underlying_asset_name: String,
    pub interest_rate_strategy: String,
    pub a_token_impl: String,
    pub stable_debt_token_impl: String,
    pub variable_debt_token_impl: String,
    pub treasury: Address,
    pub incentives_controller: Address,
    pub a_token_name: String,
    pub a_token_symbol: String,
    pub stable_debt_token_name: String,
    pub stable_debt_token_symbol: String,
    pub variable_debt_token_name: String,
    pub variable_debt_token_symbol: String,
}

/// Risk parameters to set once a reserve exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReserveConfigureInput {
    pub symbol: Symbol,
    pub asset: Address,
    pub base_ltv: u16,
    pub liquidation_threshold: u16,
    pub liquidation_bonus: u16,
    pub reserve_factor: u16,
    pub borrowing_enabled: bool,
    pub stable_borrow_rate_enabled: bool,
}

impl ReserveConfigureInput {
    /// Configurator calls, in submission order. Reserves with zero LTV are
    /// not enabled as collateral.
    pub fn calls(&self) -> Vec<ContractCall> {
        let mut calls = Vec::with_capacity(3);
        if self.base_ltv > 0 {
            calls.push(ContractCall::ConfigureReserveAsCollateral {
                asset: self.asset,
                ltv: self.base_ltv,
                liquidation_threshold: self.liquidation_threshold,
                liquidation_bonus: self.liquidation_bonus,
            });
        }
        if self.borrowing_enabled {
            calls.push(ContractCall::EnableBorrowingOnReserve {
                asset: self.asset,
                stable_borrow_rate_enabled: self.stable_borrow_rate_enabled,
            });
        }
        calls.push(ContractCall::SetReserveFactor {
            asset: self.asset,
            reserve_factor: self.reserve_factor,
        });
        calls
    }
}

/// Init inputs for every resolved reserve asset, in asset order.
pub fn build_init_inputs(
    pool: &PoolConfiguration,
    assets: &SymbolMap<Address>,
    treasury: Address,
    incentives_controller: Address,
) -> Result<Vec<ReserveInitInput>> {
    let naming = &pool.naming;
    assets
        .iter()
        .map(|(symbol, asset)| {
            let params = pool.reserves.get(symbol.as_str())?;
            Ok(ReserveInitInput {
                symbol: symbol.clone(),
                underlying_asset: *asset,
                underlying_asset_decimals: params.reserve_decimals,
                underlying_asset_name: symbol.to_string(),
                interest_rate_strategy: params.strategy.name.clone(),
                a_token_impl: params.a_token_impl.clone(),
                stable_debt_token_impl: "StableDebtToken".to_string(),
                variable_debt_token_impl: "VariableDebtToken".to_string(),
                treasury,
                incentives_controller,
                a_token_name: naming.a_token_name(symbol),
                a_token_symbol: naming.a_token_symbol(symbol),
                stable_debt_token_name: naming.stable_debt_token_name(symbol),
                stable_debt_token_symbol: naming.stable_debt_token_symbol(symbol),
                variable_debt_token_name: naming.variable_debt_token_name(symbol),
                variable_debt_token_symbol: naming.variable_debt_token_symbol(symbol),
            })
        })
        .collect()
}

/// Configure inputs for every resolved reserve asset, in asset order.
pub fn build_configure_inputs(
    pool: &PoolConfiguration,
    assets: &SymbolMap<Address>,
) -> Result<Vec<ReserveConfigureInput>> {
    assets
        .iter()
        .map(|(symbol, asset)| {
            let params = pool.reserves.get(symbol.as_str())?;
            Ok(ReserveConfigureInput {
                symbol: symbol.clone(),
                asset: *asset,
                base_ltv: params.base_ltv_as_collateral,
                liquidation_threshold: params.liquidation_threshold,
                liquidation_bonus: params.liquidation_bonus,
                reserve_factor: params.reserve_factor,
                borrowing_enabled: params.borrowing_enabled,
                stable_borrow_rate_enabled: params.stable_borrow_rate_enabled,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolveError;
    use crate::market::MarketRegistry;
    use alloy::primitives::address;

    fn pegasys() -> PoolConfiguration {
        MarketRegistry::builtin().unwrap().load_pool("Pegasys").unwrap()
    }

    fn sym(s: &str) -> Symbol {
        Symbol::new(s).unwrap()
    }

    #[test]
    fn test_token_names() {
        let pool = pegasys();
        let mut assets = SymbolMap::new();
        assets.insert(sym("USDC"), address!("368433CaC2A0B8D76E64681a9835502a1f2A8A30"));

        let inputs = build_init_inputs(&pool, &assets, Address::ZERO, Address::ZERO).unwrap();
        let usdc = &inputs[0];
        assert_eq!(usdc.a_token_name, "Pegasys interest bearing USDC");
        assert_eq!(usdc.a_token_symbol, "aUSDC");
        assert_eq!(usdc.stable_debt_token_name, "Pegasys stable debt bearing USDC");
        assert_eq!(usdc.variable_debt_token_symbol, "variableDebtUSDC");
        assert_eq!(usdc.underlying_asset_decimals, 6);
        assert_eq!(usdc.interest_rate_strategy, "rateStrategyStableTwo");
    }

    #[test]
    fn test_asset_without_strategy() {
        let pool = pegasys();
        let mut assets = SymbolMap::new();
        assets.insert(sym("DOGE"), Address::ZERO);
        assert!(matches!(
            build_configure_inputs(&pool, &assets),
            Err(ResolveError::UnknownReserveAsset(s)) if s == "DOGE"
        ));
    }

    #[test]
    fn test_zero_ltv_is_not_collateral() {
        let input = ReserveConfigureInput {
            symbol: sym("USDT"),
            asset: Address::ZERO,
            base_ltv: 0,
            liquidation_threshold: 0,
            liquidation_bonus: 0,
            reserve_factor: 1000,
            borrowing_enabled: true,
            stable_borrow_rate_enabled: false,
        };
        let methods: Vec<_> = input.calls().iter().map(ContractCall::method).collect();
        assert_eq!(methods, vec!["enableBorrowingOnReserve", "setReserveFactor"]);
    }

    #[test]
    fn test_collateral_reserve_calls() {
        let pool = pegasys();
        let mut assets = SymbolMap::new();
        assets.insert(sym("BTC"), address!("2A4DC2e946b92AB4a1f7D62844EB237788F9056c"));
        let inputs = build_configure_inputs(&pool, &assets).unwrap();

        assert_eq!(
            inputs[0].calls()[0],
            ContractCall::ConfigureReserveAsCollateral {
                asset: address!("2A4DC2e946b92AB4a1f7D62844EB237788F9056c"),
                ltv: 7000,
                liquidation_threshold: 7500,
                liquidation_bonus: 11000,
            }
        );
        assert_eq!(inputs[0].calls().len(), 3);
    }
}
