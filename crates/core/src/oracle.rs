//! Price-oracle wiring.

use crate::addresses::resolve_wrapped_native;
use crate::error::{ResolveError, Result};
use crate::market::PoolConfiguration;
use crate::mock::MockDeployer;
use crate::network::NetworkContext;
use crate::symbol::{Symbol, SymbolMap};
use alloy::primitives::{Address, U256};
use deployer_chain::{ConstructorArgs, ContractKind};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// Currency the market's prices are quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteCurrency {
    /// Quoted in the wrapped native token
    Native,
    Usd,
}

impl FromStr for QuoteCurrency {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "SYS" | "WSYS" => Ok(Self::Native),
            "USD" => Ok(Self::Usd),
            _ => Err(ResolveError::UnsupportedQuoteCurrency(s.to_string())),
        }
    }
}

impl fmt::Display for QuoteCurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => f.write_str("native"),
            Self::Usd => f.write_str("USD"),
        }
    }
}

/// Price-feed source of one tracked token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatorIndex {
    pub symbol: Symbol,
    pub asset: Address,
    pub index: u64,
}

/// How the market prices its assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleWiring {
    pub price_oracle: Address,
    /// The configured oracle was reused rather than deployed
    pub adopted: bool,
    pub quote_currency: QuoteCurrency,
    pub quote_currency_address: Address,
    pub fallback_oracle: Option<Address>,
    pub price_feed: Option<Address>,
    /// Reserve symbols followed by `USD`
    pub tracked_symbols: Vec<Symbol>,
    /// Empty when the oracle was adopted
    pub aggregator_indexes: Vec<AggregatorIndex>,
}

impl OracleWiring {
    /// Constructor arguments for a new price oracle.
    ///
    /// The base currency is the quote currency's address (the USD
    /// pseudo-address for a USD-quoted market), not the wrapped native token.
    pub fn constructor_args(&self) -> ConstructorArgs {
        ConstructorArgs::PriceOracle {
            assets: self.aggregator_indexes.iter().map(|a| a.asset).collect(),
            indexes: self
                .aggregator_indexes
                .iter()
                .map(|a| U256::from(a.index))
                .collect(),
            base_currency: self.quote_currency_address,
            fallback_oracle: self.fallback_oracle.unwrap_or(Address::ZERO),
            price_feed: self.price_feed.unwrap_or(Address::ZERO),
        }
    }
}

/// Resolves the price oracle of one pool on the active network.
#[derive(Debug)]
pub struct OracleWiringResolver<'a> {
    pool: &'a PoolConfiguration,
    context: NetworkContext,
}

impl<'a> OracleWiringResolver<'a> {
    pub fn new(pool: &'a PoolConfiguration, context: NetworkContext) -> Self {
        Self { pool, context }
    }

    /// Quote currency and the address standing for it.
    pub async fn quote_currency(&self, deployer: &mut MockDeployer) -> Result<(QuoteCurrency, Address)> {
        let currency: QuoteCurrency = self.pool.oracle_quote_currency.parse()?;
        let address = match currency {
            QuoteCurrency::Native => resolve_wrapped_native(self.pool, &self.context, deployer).await?,
            QuoteCurrency::Usd => self.pool.usd_address,
        };
        Ok((currency, address))
    }

    /// Reserve symbols of the network plus `USD`, once.
    pub fn tracked_symbols(reserve_assets: &SymbolMap<Address>) -> Vec<Symbol> {
        let mut symbols: Vec<Symbol> = reserve_assets
            .symbols()
            .filter(|s| !s.is_usd())
            .cloned()
            .collect();
        symbols.push(Symbol::usd());
        symbols
    }

    /// Adopt the configured price oracle, or deploy one wired to the price
    /// feed and the fallback oracle.
    pub async fn resolve(
        &self,
        deployer: &mut MockDeployer,
        reserve_assets: &SymbolMap<Address>,
    ) -> Result<OracleWiring> {
        let network = self.context.active();
        let (quote_currency, quote_currency_address) = self.quote_currency(deployer).await?;
        let tracked_symbols = Self::tracked_symbols(reserve_assets);

        let configured_oracle = self.pool.addresses.price_oracle.resolve(network)?;
        let fallback_candidate = self.pool.addresses.fallback_oracle.resolve(network)?;

        if let Some(price_oracle) = configured_oracle.usable() {
            debug!(oracle = %price_oracle, network = %network, "Adopting configured price oracle");
            return Ok(OracleWiring {
                price_oracle,
                adopted: true,
                quote_currency,
                quote_currency_address,
                fallback_oracle: fallback_candidate.usable(),
                price_feed: self.pool.addresses.price_feed.resolve(network)?.usable(),
                tracked_symbols,
                aggregator_indexes: Vec::new(),
            });
        }

        if network.is_production() && fallback_candidate.usable().is_none() {
            return Err(ResolveError::MissingFallbackOracle {
                network: network.to_string(),
            });
        }

        let fallback_oracle = deployer
            .resolve_or_deploy_mock(
                network,
                ContractKind::FallbackPriceOracleMock,
                ConstructorArgs::None,
                fallback_candidate,
            )
            .await?;
        let price_feed = deployer
            .resolve_or_deploy_mock(
                network,
                ContractKind::PriceFeedMock,
                ConstructorArgs::None,
                self.pool.addresses.price_feed.resolve(network)?,
            )
            .await?;

        let indexes = self.pool.oracle_indexes.resolve(network)?;
        let mut aggregator_indexes = Vec::with_capacity(tracked_symbols.len());
        for symbol in &tracked_symbols {
            let asset = if symbol.is_usd() {
                self.pool.usd_address
            } else {
                match reserve_assets.get(symbol.as_str()) {
                    Some(asset) => *asset,
                    None => continue,
                }
            };
            match indexes.get(symbol.as_str()) {
                Some(index) => aggregator_indexes.push(AggregatorIndex {
                    symbol: symbol.clone(),
                    asset,
                    index: *index,
                }),
                None => debug!(symbol = %symbol, "No price feed index, left to the fallback oracle"),
            }
        }

        let mut wiring = OracleWiring {
            price_oracle: Address::ZERO,
            adopted: false,
            quote_currency,
            quote_currency_address,
            fallback_oracle: Some(fallback_oracle),
            price_feed: Some(price_feed),
            tracked_symbols,
            aggregator_indexes,
        };
        wiring.price_oracle = deployer
            .deploy(network, ContractKind::PriceOracle, wiring.constructor_args())
            .await?;
        info!(
            oracle = %wiring.price_oracle,
            sources = wiring.aggregator_indexes.len(),
            quote = %wiring.quote_currency,
            "Price oracle wired"
        );
        Ok(wiring)
    }
}
