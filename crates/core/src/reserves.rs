//! Reserve risk parameters per asset symbol.
//!
//! A pool's catalog is its own reserve table laid over the shared defaults.
//! Every strategy is validated when the catalog is built, so a bad
//! parameter fails the load rather than the deployment.

use crate::error::{ResolveError, Result};
use crate::rates::Ray;
use crate::symbol::{Symbol, SymbolMap};

/// 100% in basis points.
pub const PERCENTAGE_FACTOR: u16 = 10_000;

/// Upper bound on token decimals.
pub const MAX_RESERVE_DECIMALS: u8 = 18;

/// Interest-rate curve deployed once per distinct strategy name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterestRateStrategy {
    pub name: String,
    pub optimal_utilization_rate: Ray,
    pub base_variable_borrow_rate: Ray,
    pub variable_rate_slope1: Ray,
    pub variable_rate_slope2: Ray,
    pub stable_rate_slope1: Ray,
    pub stable_rate_slope2: Ray,
}

/// Risk parameters of one reserve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReserveStrategy {
    pub strategy: InterestRateStrategy,
    /// Loan-to-value, basis points
    pub base_ltv_as_collateral: u16,
    /// Basis points, never below the LTV
    pub liquidation_threshold: u16,
    /// Basis points including the 100% principal (10500 = 5% bonus)
    pub liquidation_bonus: u16,
    pub borrowing_enabled: bool,
    pub stable_borrow_rate_enabled: bool,
    pub reserve_decimals: u8,
    /// aToken implementation contract
    pub a_token_impl: String,
    /// Basis points
    pub reserve_factor: u16,
}

impl ReserveStrategy {
    /// Check risk-parameter constraints for `symbol`.
    pub fn validate(&self, symbol: &Symbol) -> Result<()> {
        let invalid = |field: &'static str| ResolveError::InvalidReserveStrategy {
            symbol: symbol.to_string(),
            field,
        };

        if self.base_ltv_as_collateral > PERCENTAGE_FACTOR {
            return Err(invalid("base_ltv_as_collateral"));
        }
        if self.liquidation_threshold < self.base_ltv_as_collateral
            || self.liquidation_threshold > PERCENTAGE_FACTOR
        {
            return Err(invalid("liquidation_threshold"));
        }
        if self.liquidation_threshold > 0 {
            // The bonus applied to the threshold must not exceed 100%.
            let max_liquidated = u32::from(self.liquidation_threshold)
                * u32::from(self.liquidation_bonus)
                / u32::from(PERCENTAGE_FACTOR);
            if self.liquidation_bonus <= PERCENTAGE_FACTOR
                || max_liquidated > u32::from(PERCENTAGE_FACTOR)
            {
                return Err(invalid("liquidation_bonus"));
            }
        }
        if self.reserve_decimals == 0 || self.reserve_decimals > MAX_RESERVE_DECIMALS {
            return Err(invalid("reserve_decimals"));
        }
        if self.reserve_factor > PERCENTAGE_FACTOR {
            return Err(invalid("reserve_factor"));
        }
        if self.strategy.optimal_utilization_rate > Ray::one() {
            return Err(invalid("optimal_utilization_rate"));
        }
        Ok(())
    }

    /// Whether the reserve can back borrows.
    pub fn is_collateral(&self) -> bool {
        self.base_ltv_as_collateral > 0
    }
}

/// Validated symbol → strategy table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReserveCatalog(SymbolMap<ReserveStrategy>);

impl ReserveCatalog {
    /// Validate every entry of `strategies`.
    pub fn new(strategies: SymbolMap<ReserveStrategy>) -> Result<Self> {
        for (symbol, strategy) in strategies.iter() {
            strategy.validate(symbol)?;
        }
        Ok(Self(strategies))
    }

    /// Lay `overrides` over `defaults`.
    ///
    /// Keeps the defaults' order; an override replaces the default of the
    /// same symbol in place and symbols only in `overrides` follow at the
    /// end. Neither input is modified.
    pub fn merge(
        overrides: &SymbolMap<ReserveStrategy>,
        defaults: &SymbolMap<ReserveStrategy>,
    ) -> Result<Self> {
        let mut merged = defaults.clone();
        for (symbol, strategy) in overrides.iter() {
            merged.insert(symbol.clone(), strategy.clone());
        }
        Self::new(merged)
    }

    /// Parameters of `symbol`.
    pub fn get(&self, symbol: &str) -> Result<&ReserveStrategy> {
        self.0
            .get(symbol)
            .ok_or_else(|| ResolveError::UnknownReserveAsset(symbol.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &ReserveStrategy)> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &SymbolMap<ReserveStrategy> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn volatile_strategy() -> InterestRateStrategy {
        InterestRateStrategy {
            name: "rateStrategyVolatileOne".to_string(),
            optimal_utilization_rate: "0.65".parse().unwrap(),
            base_variable_borrow_rate: Ray::ZERO,
            variable_rate_slope1: "0.08".parse().unwrap(),
            variable_rate_slope2: "1".parse().unwrap(),
            stable_rate_slope1: "0.1".parse().unwrap(),
            stable_rate_slope2: "1".parse().unwrap(),
        }
    }

    pub(crate) fn strategy(ltv: u16, threshold: u16, bonus: u16, decimals: u8) -> ReserveStrategy {
        ReserveStrategy {
            strategy: volatile_strategy(),
            base_ltv_as_collateral: ltv,
            liquidation_threshold: threshold,
            liquidation_bonus: bonus,
            borrowing_enabled: true,
            stable_borrow_rate_enabled: false,
            reserve_decimals: decimals,
            a_token_impl: "AToken".to_string(),
            reserve_factor: 1000,
        }
    }

    fn sym(s: &str) -> Symbol {
        Symbol::new(s).unwrap()
    }

    fn map(entries: &[(&str, ReserveStrategy)]) -> SymbolMap<ReserveStrategy> {
        entries
            .iter()
            .map(|(s, strategy)| (sym(s), strategy.clone()))
            .collect()
    }

    #[test]
    fn test_threshold_below_ltv_is_rejected() {
        let bad = map(&[("WSYS", strategy(8000, 7999, 10500, 18))]);
        let err = ReserveCatalog::merge(&bad, &SymbolMap::new()).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::InvalidReserveStrategy { ref symbol, field: "liquidation_threshold" }
                if symbol == "WSYS"
        ));
    }

    #[test]
    fn test_parameter_bounds() {
        let cases = [
            (strategy(10_001, 10_001, 10_500, 18), "base_ltv_as_collateral"),
            (strategy(8000, 8250, 10_000, 18), "liquidation_bonus"),
            (strategy(8000, 9800, 10_500, 18), "liquidation_bonus"),
            (strategy(8000, 8250, 10_500, 0), "reserve_decimals"),
            (strategy(8000, 8250, 10_500, 19), "reserve_decimals"),
        ];
        for (strategy, expected) in cases {
            match strategy.validate(&sym("X")) {
                Err(ResolveError::InvalidReserveStrategy { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected {expected} to be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_non_collateral_reserve_is_valid() {
        let usd_like = strategy(0, 0, 0, 6);
        assert!(usd_like.validate(&sym("DAI")).is_ok());
        assert!(!usd_like.is_collateral());
    }

    #[test]
    fn test_override_wins_and_one_sided_entries_pass_through() {
        let defaults = map(&[
            ("WSYS", strategy(8000, 8250, 10500, 18)),
            ("USDC", strategy(8000, 8500, 10500, 6)),
        ]);
        let overrides = map(&[
            ("USDC", strategy(7500, 8000, 10500, 6)),
            ("BTC", strategy(7000, 7500, 11000, 8)),
        ]);

        let catalog = ReserveCatalog::merge(&overrides, &defaults).unwrap();
        let order: Vec<_> = catalog.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(order, vec!["WSYS", "USDC", "BTC"]);
        assert_eq!(catalog.get("USDC").unwrap().base_ltv_as_collateral, 7500);
        assert_eq!(catalog.get("WSYS").unwrap().liquidation_threshold, 8250);

        // inputs untouched
        assert_eq!(defaults.get("USDC").unwrap().base_ltv_as_collateral, 8000);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let defaults = map(&[
            ("WSYS", strategy(8000, 8250, 10500, 18)),
            ("USDC", strategy(8000, 8500, 10500, 6)),
        ]);
        let overrides = map(&[
            ("ETH", strategy(8000, 8250, 10500, 18)),
            ("WSYS", strategy(7000, 7500, 11000, 18)),
        ]);

        let once = ReserveCatalog::merge(&overrides, &defaults).unwrap();
        let twice = ReserveCatalog::merge(once.as_map(), &defaults).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unknown_symbol() {
        let catalog = ReserveCatalog::new(map(&[("WSYS", strategy(8000, 8250, 10500, 18))])).unwrap();
        assert!(matches!(
            catalog.get("DOGE"),
            Err(ResolveError::UnknownReserveAsset(s)) if s == "DOGE"
        ));
    }
}
