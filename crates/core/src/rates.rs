//! Borrow-rate table and rate-oracle seeding.

use crate::error::{ResolveError, Result};
use crate::symbol::{Symbol, SymbolMap};
use alloy::primitives::{Address, U256};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Decimal places of a ray.
pub const RAY_DECIMALS: usize = 27;

/// Assets per rate-oracle batch call.
pub const SEED_CHUNK_SIZE: usize = 20;

/// Fixed-point value scaled by 10^27.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Ray(U256);

impl Ray {
    pub const ZERO: Ray = Ray(U256::ZERO);

    /// Wrap a raw ray-scaled integer.
    pub fn from_raw(raw: U256) -> Self {
        Self(raw)
    }

    /// 10^27, i.e. one.
    pub fn one() -> Self {
        Self(U256::from(10u64).pow(U256::from(RAY_DECIMALS)))
    }

    /// Ray from basis points (10000 = 1.0).
    pub fn from_bps(bps: u64) -> Self {
        Self(U256::from(bps) * U256::from(10u64).pow(U256::from(RAY_DECIMALS - 4)))
    }

    pub fn raw(&self) -> U256 {
        self.0
    }
}

impl FromStr for Ray {
    type Err = ResolveError;

    /// Parse a decimal string such as `"0.039"` or `"3"`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || ResolveError::Config(format!("invalid ray value '{s}'"));

        let (int_part, frac_part) = s.split_once('.').unwrap_or((s, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if frac_part.len() > RAY_DECIMALS {
            return Err(invalid());
        }

        let parse = |digits: &str| -> Result<U256> {
            if digits.is_empty() {
                Ok(U256::ZERO)
            } else {
                U256::from_str_radix(digits, 10).map_err(|_| invalid())
            }
        };

        let scale = U256::from(10u64).pow(U256::from(RAY_DECIMALS));
        let frac_scale = U256::from(10u64).pow(U256::from(RAY_DECIMALS - frac_part.len()));
        let int = parse(int_part)?.checked_mul(scale).ok_or_else(invalid)?;
        let frac = parse(frac_part)? * frac_scale;
        Ok(Self(int + frac))
    }
}

impl fmt::Display for Ray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = U256::from(10u64).pow(U256::from(RAY_DECIMALS));
        let int = self.0 / scale;
        let frac = self.0 % scale;
        if frac.is_zero() {
            return write!(f, "{int}");
        }
        let frac = format!("{:0>width$}", frac.to_string(), width = RAY_DECIMALS);
        write!(f, "{int}.{}", frac.trim_end_matches('0'))
    }
}

impl<'de> Deserialize<'de> for Ray {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Symbol → borrow rate, in the order the market lists them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct LendingRateTable(SymbolMap<Ray>);

impl LendingRateTable {
    pub fn new(rates: SymbolMap<Ray>) -> Self {
        Self(rates)
    }

    pub fn get(&self, symbol: &str) -> Option<Ray> {
        self.0.get(symbol).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &Ray)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Symbol, Ray)> for LendingRateTable {
    fn from_iter<I: IntoIterator<Item = (Symbol, Ray)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One `setMarketBorrowRate(asset, rate)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedOperation {
    pub symbol: Symbol,
    pub asset: Address,
    pub rate: Ray,
}

/// Ordered rate-oracle seed operations.
///
/// Follows the table's order. The USD pseudo-asset and symbols with no
/// resolved address on this network are left out. Nothing is seeded when
/// an existing rate oracle is being reused.
pub fn build_seed_operations(
    table: &LendingRateTable,
    resolved_assets: &SymbolMap<Address>,
    existing_oracle: Option<Address>,
) -> Vec<SeedOperation> {
    if let Some(oracle) = existing_oracle {
        debug!(oracle = %oracle, "Reusing configured rate oracle, nothing to seed");
        return Vec::new();
    }

    let mut operations = Vec::with_capacity(table.len());
    for (symbol, rate) in table.iter() {
        if symbol.is_usd() {
            continue;
        }
        match resolved_assets.get(symbol.as_str()) {
            Some(asset) => operations.push(SeedOperation {
                symbol: symbol.clone(),
                asset: *asset,
                rate: *rate,
            }),
            None => debug!(symbol = %symbol, "No reserve asset on this network, rate not seeded"),
        }
    }
    operations
}

/// Split seed operations into rate-oracle batches.
pub fn seed_batches(operations: &[SeedOperation]) -> std::slice::Chunks<'_, SeedOperation> {
    operations.chunks(SEED_CHUNK_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    fn sym(s: &str) -> Symbol {
        Symbol::new(s).unwrap()
    }

    fn ray(s: &str) -> Ray {
        s.parse().unwrap()
    }

    fn pegasys_rates() -> LendingRateTable {
        [
            ("USD", "0.02"),
            ("WSYS", "0.03"),
            ("USDC", "0.039"),
            ("USDT", "0.035"),
            ("ETH", "0.03"),
            ("BTC", "0.03"),
        ]
        .into_iter()
        .map(|(s, r)| (sym(s), ray(r)))
        .collect()
    }

    fn pegasys_assets() -> SymbolMap<Address> {
        [
            ("WSYS", address!("4200000000000000000000000000000000000006")),
            ("USDC", address!("368433CaC2A0B8D76E64681a9835502a1f2A8A30")),
            ("USDT", address!("28c9c7Fb3fE3104d2116Af26cC8eF7905547349c")),
            ("BTC", address!("2A4DC2e946b92AB4a1f7D62844EB237788F9056c")),
            ("ETH", address!("aA1c53AFd099E415208F47FCFA2C880f659E6904")),
        ]
        .into_iter()
        .map(|(s, a)| (sym(s), a))
        .collect()
    }

    #[test]
    fn test_ray_parsing() {
        assert_eq!(ray("1"), Ray::one());
        assert_eq!(ray("0.039").raw(), U256::from(39_000_000_000_000_000_000_000_000u128));
        assert_eq!(ray("0.65"), Ray::from_bps(6500));
        assert_eq!(ray(".5"), Ray::from_bps(5000));
        assert!("".parse::<Ray>().is_err());
        assert!("0.0x".parse::<Ray>().is_err());
        assert!("-1".parse::<Ray>().is_err());
    }

    #[test]
    fn test_ray_display() {
        assert_eq!(ray("0.039").to_string(), "0.039");
        assert_eq!(ray("3").to_string(), "3");
    }

    #[test]
    fn test_pegasys_seed_order_excludes_usd() {
        let ops = build_seed_operations(&pegasys_rates(), &pegasys_assets(), None);
        let symbols: Vec<_> = ops.iter().map(|op| op.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["WSYS", "USDC", "USDT", "ETH", "BTC"]);
        assert_eq!(ops[1].rate, ray("0.039"));
        assert_eq!(ops[1].asset, address!("368433CaC2A0B8D76E64681a9835502a1f2A8A30"));
    }

    #[test]
    fn test_symbols_without_asset_are_skipped() {
        let mut assets = pegasys_assets();
        assets = assets
            .into_iter()
            .filter(|(s, _)| s.as_str() != "BTC")
            .collect();

        let ops = build_seed_operations(&pegasys_rates(), &assets, None);
        assert!(ops.iter().all(|op| assets.contains(op.symbol.as_str())));
        assert!(ops.iter().all(|op| !op.symbol.is_usd()));
        assert_eq!(ops.len(), 4);
    }

    #[test]
    fn test_usd_excluded_even_when_resolved() {
        let mut assets = pegasys_assets();
        assets.insert(Symbol::usd(), Address::ZERO);
        let ops = build_seed_operations(&pegasys_rates(), &assets, None);
        assert!(ops.iter().all(|op| !op.symbol.is_usd()));
    }

    #[test]
    fn test_existing_oracle_means_no_seeding() {
        let existing = Some(address!("00000000000000000000000000000000000000aa"));
        assert!(build_seed_operations(&pegasys_rates(), &pegasys_assets(), existing).is_empty());
    }

    #[test]
    fn test_output_is_deterministic() {
        let first = build_seed_operations(&pegasys_rates(), &pegasys_assets(), None);
        let second = build_seed_operations(&pegasys_rates(), &pegasys_assets(), None);
        assert_eq!(first, second);
    }

    #[test]
    fn test_batches_of_twenty() {
        let ops: Vec<_> = (0..45u8)
            .map(|i| SeedOperation {
                symbol: sym(&format!("T{i}")),
                asset: Address::with_last_byte(i + 1),
                rate: Ray::ZERO,
            })
            .collect();
        let sizes: Vec<_> = seed_batches(&ops).map(<[_]>::len).collect();
        assert_eq!(sizes, vec![20, 20, 5]);
    }
}
