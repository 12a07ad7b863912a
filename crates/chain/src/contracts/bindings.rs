//! Solidity interfaces of the market contracts touched during deployment.
//!
//! Only the functions the deployer calls are declared. Calldata is produced
//! with [`alloy::sol_types::SolCall::abi_encode`] on the generated call
//! structs.

use alloy::sol;

sol! {
    /// Rate oracle seeded with initial market borrow rates.
    #[derive(Debug)]
    interface ILendingRateOracle {
        function setMarketBorrowRate(address asset, uint256 rate) external;
    }
}

sol! {
    /// Ownable base shared by the oracles.
    #[derive(Debug)]
    interface IOwnable {
        function transferOwnership(address newOwner) external;
    }
}

sol! {
    /// Batch helper used to seed rate oracles in chunks.
    #[derive(Debug)]
    interface IStableAndVariableTokensHelper {
        function setOracleBorrowRates(address[] calldata assets, uint256[] calldata rates, address oracle) external;
        function setOracleOwnership(address oracle, address admin) external;
    }
}

sol! {
    /// Market addresses provider.
    #[derive(Debug)]
    interface ILendingPoolAddressesProvider {
        function setPriceOracle(address priceOracle) external;
        function setLendingRateOracle(address lendingRateOracle) external;
    }
}

sol! {
    /// Reserve risk configuration entry points.
    #[derive(Debug)]
    interface ILendingPoolConfigurator {
        function configureReserveAsCollateral(address asset, uint256 ltv, uint256 liquidationThreshold, uint256 liquidationBonus) external;
        function enableBorrowingOnReserve(address asset, bool stableBorrowRateEnabled) external;
        function setReserveFactor(address asset, uint256 reserveFactor) external;
    }
}

sol! {
    /// Wrapped native token gateway.
    #[derive(Debug)]
    interface IWSYSGateway {
        function authorizeLendingPool(address lendingPool) external;
    }
}
