//! Solidity bindings for the contracts the client talks to

use alloy::sol;

sol! {
    /// No-loss prediction pool controller
    #[sol(rpc)]
    interface IMarketController {
        function poolCount() external view returns (uint256);

        function pools(uint256 poolId) external view returns (
            address creator,
            string question,
            uint256 endTime,
            uint256 totalShares,
            uint256 totalPrincipal,
            uint256 creatorPrincipal,
            bool resolved,
            bool outcome,
            uint256 yesPrincipal,
            uint256 noPrincipal,
            uint256 totalYesWeight,
            uint256 totalNoWeight,
            uint256 finalTotalYield,
            bool requestSubmitted,
            uint256 requestTime
        );

        function bets(uint256 poolId, address user) external view returns (
            uint256 principal,
            uint256 weight,
            bool side,
            bool claimed
        );

        function getPoolMetrics(uint256 poolId) external view returns (
            uint256 currentTotalYield,
            uint256 estimatedWinnerPrize,
            uint256 estimatedCreatorFee
        );

        function createPool(string question, uint256 duration, uint256 seedAmount) external;
        function placeBet(uint256 poolId, bool side, uint256 amount) external;
        function claim(uint256 poolId) external;
        function claimCreatorRewards(uint256 poolId) external;
        function requestResolution(uint256 poolId) external;
        function settleResolution(uint256 poolId) external;
    }
}

sol! {
    /// Minimal ERC20 surface for balances and allowances
    #[sol(rpc)]
    interface IERC20 {
        function balanceOf(address owner) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }
}

sol! {
    /// Aave v3 pool, only what is needed to read the supply rate
    #[sol(rpc)]
    interface IAavePool {
        struct ReserveData {
            uint256 configuration;
            uint128 liquidityIndex;
            uint128 currentLiquidityRate;
            uint128 variableBorrowIndex;
            uint128 currentVariableBorrowRate;
            uint128 currentStableBorrowRate;
            uint40 lastUpdateTimestamp;
            uint16 id;
            address aTokenAddress;
            address stableDebtTokenAddress;
            address variableDebtTokenAddress;
            address interestRateStrategyAddress;
            uint128 accruedToTreasury;
            uint128 unbacked;
            uint128 isolationModeTotalDebt;
        }

        function getReserveData(address asset) external view returns (ReserveData memory);
    }
}
