//! Contract kinds, constructor arguments and calls handed to a
//! [`ChainSubmitter`](crate::ChainSubmitter).
//!
//! # Example
//!
//! ```rust,ignore
//! use deployer_chain::{ConstructorArgs, ContractCall, ContractKind};
//!
//! let oracle = submitter.deploy(ContractKind::LendingRateOracle, ConstructorArgs::None).await?;
//! submitter
//!     .call(oracle, ContractCall::SetMarketBorrowRate { asset, rate })
//!     .await?;
//! ```

pub mod bindings;

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::{SolCall, SolValue};
use std::fmt;

use bindings::{
    ILendingPoolAddressesProvider, ILendingPoolConfigurator, ILendingRateOracle, IOwnable,
    IStableAndVariableTokensHelper, IWSYSGateway,
};

/// Contracts the deployer knows how to create.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContractKind {
    /// Stand-in for the wrapped native token on test networks.
    WrappedNativeMock,
    /// Mintable ERC20 standing in for a reserve asset on test networks.
    MintableToken { symbol: String },
    /// Market price oracle (token → price source index table).
    PriceOracle,
    /// Settable price oracle used as fallback on test networks.
    FallbackPriceOracleMock,
    /// Stand-in for the external price feed on test networks.
    PriceFeedMock,
    /// Rate oracle holding market borrow rates.
    LendingRateOracle,
    /// Gateway wrapping native deposits into the market.
    WrappedNativeGateway,
}

impl ContractKind {
    /// Name under which the contract is recorded in the address registry.
    pub fn registry_name(&self) -> String {
        match self {
            Self::WrappedNativeMock => "WSYSMocked".to_string(),
            Self::MintableToken { symbol } => symbol.clone(),
            Self::PriceOracle => "PegasysOracle".to_string(),
            Self::FallbackPriceOracleMock => "PriceOracle".to_string(),
            Self::PriceFeedMock => "SupraOracleMock".to_string(),
            Self::LendingRateOracle => "LendingRateOracle".to_string(),
            Self::WrappedNativeGateway => "WSYSGateway".to_string(),
        }
    }

    /// Compiled artifact holding the creation bytecode.
    pub fn artifact(&self) -> &'static str {
        match self {
            Self::WrappedNativeMock => "WSYSMocked",
            Self::MintableToken { .. } => "MintableERC20",
            Self::PriceOracle => "PegasysOracle",
            Self::FallbackPriceOracleMock => "PriceOracle",
            Self::PriceFeedMock => "SupraOracleMock",
            Self::LendingRateOracle => "LendingRateOracle",
            Self::WrappedNativeGateway => "WSYSGateway",
        }
    }

    /// Whether this contract is a placeholder that must never reach a
    /// production network.
    pub fn is_mock(&self) -> bool {
        matches!(
            self,
            Self::WrappedNativeMock
                | Self::MintableToken { .. }
                | Self::FallbackPriceOracleMock
                | Self::PriceFeedMock
        )
    }
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.registry_name())
    }
}

/// Constructor arguments, ABI-encoded after the creation bytecode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructorArgs {
    None,
    /// `MintableERC20(name, symbol, decimals)`
    Token {
        name: String,
        symbol: String,
        decimals: u8,
    },
    /// `PegasysOracle(assets, indexes, baseCurrency, fallbackOracle, priceFeed)`
    PriceOracle {
        assets: Vec<Address>,
        indexes: Vec<U256>,
        base_currency: Address,
        fallback_oracle: Address,
        price_feed: Address,
    },
    /// `WSYSGateway(wsys)`
    Gateway { wrapped_native: Address },
}

impl ConstructorArgs {
    /// ABI-encode the arguments (empty for [`ConstructorArgs::None`]).
    pub fn encode(&self) -> Bytes {
        match self {
            Self::None => Bytes::new(),
            Self::Token {
                name,
                symbol,
                decimals,
            } => (name.clone(), symbol.clone(), U256::from(*decimals))
                .abi_encode_params()
                .into(),
            Self::PriceOracle {
                assets,
                indexes,
                base_currency,
                fallback_oracle,
                price_feed,
            } => (
                assets.clone(),
                indexes.clone(),
                *base_currency,
                *fallback_oracle,
                *price_feed,
            )
                .abi_encode_params()
                .into(),
            Self::Gateway { wrapped_native } => (*wrapped_native,).abi_encode_params().into(),
        }
    }
}

/// State-changing calls issued during market setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCall {
    SetMarketBorrowRate {
        asset: Address,
        rate: U256,
    },
    SetOracleBorrowRates {
        assets: Vec<Address>,
        rates: Vec<U256>,
        oracle: Address,
    },
    SetOracleOwnership {
        oracle: Address,
        admin: Address,
    },
    TransferOwnership {
        new_owner: Address,
    },
    SetPriceOracle {
        oracle: Address,
    },
    SetLendingRateOracle {
        oracle: Address,
    },
    ConfigureReserveAsCollateral {
        asset: Address,
        ltv: u16,
        liquidation_threshold: u16,
        liquidation_bonus: u16,
    },
    EnableBorrowingOnReserve {
        asset: Address,
        stable_borrow_rate_enabled: bool,
    },
    SetReserveFactor {
        asset: Address,
        reserve_factor: u16,
    },
    AuthorizeLendingPool {
        lending_pool: Address,
    },
}

impl ContractCall {
    /// Solidity method name, for logs and reports.
    pub fn method(&self) -> &'static str {
        match self {
            Self::SetMarketBorrowRate { .. } => "setMarketBorrowRate",
            Self::SetOracleBorrowRates { .. } => "setOracleBorrowRates",
            Self::SetOracleOwnership { .. } => "setOracleOwnership",
            Self::TransferOwnership { .. } => "transferOwnership",
            Self::SetPriceOracle { .. } => "setPriceOracle",
            Self::SetLendingRateOracle { .. } => "setLendingRateOracle",
            Self::ConfigureReserveAsCollateral { .. } => "configureReserveAsCollateral",
            Self::EnableBorrowingOnReserve { .. } => "enableBorrowingOnReserve",
            Self::SetReserveFactor { .. } => "setReserveFactor",
            Self::AuthorizeLendingPool { .. } => "authorizeLendingPool",
        }
    }

    /// ABI-encoded calldata.
    pub fn encode(&self) -> Bytes {
        let data = match self {
            Self::SetMarketBorrowRate { asset, rate } => {
                ILendingRateOracle::setMarketBorrowRateCall {
                    asset: *asset,
                    rate: *rate,
                }
                .abi_encode()
            }
            Self::SetOracleBorrowRates {
                assets,
                rates,
                oracle,
            } => IStableAndVariableTokensHelper::setOracleBorrowRatesCall {
                assets: assets.clone(),
                rates: rates.clone(),
                oracle: *oracle,
            }
            .abi_encode(),
            Self::SetOracleOwnership { oracle, admin } => {
                IStableAndVariableTokensHelper::setOracleOwnershipCall {
                    oracle: *oracle,
                    admin: *admin,
                }
                .abi_encode()
            }
            Self::TransferOwnership { new_owner } => IOwnable::transferOwnershipCall {
                newOwner: *new_owner,
            }
            .abi_encode(),
            Self::SetPriceOracle { oracle } => ILendingPoolAddressesProvider::setPriceOracleCall {
                priceOracle: *oracle,
            }
            .abi_encode(),
            Self::SetLendingRateOracle { oracle } => {
                ILendingPoolAddressesProvider::setLendingRateOracleCall {
                    lendingRateOracle: *oracle,
                }
                .abi_encode()
            }
            Self::ConfigureReserveAsCollateral {
                asset,
                ltv,
                liquidation_threshold,
                liquidation_bonus,
            } => ILendingPoolConfigurator::configureReserveAsCollateralCall {
                asset: *asset,
                ltv: U256::from(*ltv),
                liquidationThreshold: U256::from(*liquidation_threshold),
                liquidationBonus: U256::from(*liquidation_bonus),
            }
            .abi_encode(),
            Self::EnableBorrowingOnReserve {
                asset,
                stable_borrow_rate_enabled,
            } => ILendingPoolConfigurator::enableBorrowingOnReserveCall {
                asset: *asset,
                stableBorrowRateEnabled: *stable_borrow_rate_enabled,
            }
            .abi_encode(),
            Self::SetReserveFactor {
                asset,
                reserve_factor,
            } => ILendingPoolConfigurator::setReserveFactorCall {
                asset: *asset,
                reserveFactor: U256::from(*reserve_factor),
            }
            .abi_encode(),
            Self::AuthorizeLendingPool { lending_pool } => IWSYSGateway::authorizeLendingPoolCall {
                lendingPool: *lending_pool,
            }
            .abi_encode(),
        };
        data.into()
    }
}
