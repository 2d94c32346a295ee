//! Contract ABI definitions for Safe deployment

use alloy::sol;

sol! {
    /// Safe proxy factory (v1.3.0 / v1.4.1 share this interface)
    #[sol(rpc)]
    interface ISafeProxyFactory {
        /// Deploys a proxy at a CREATE2 address derived from the initializer and salt nonce
        function createProxyWithNonce(
            address _singleton,
            bytes memory initializer,
            uint256 saltNonce
        ) external returns (address proxy);

        /// Creation bytecode of the proxy, without the constructor argument
        function proxyCreationCode() external pure returns (bytes memory);

        event ProxyCreation(address proxy, address singleton);
    }

    /// Safe setup, called by the proxy factory on the fresh proxy
    #[sol(rpc)]
    interface ISafeSetup {
        function setup(
            address[] calldata _owners,
            uint256 _threshold,
            address to,
            bytes calldata data,
            address fallbackHandler,
            address paymentToken,
            uint256 payment,
            address payable paymentReceiver
        ) external;
    }

    /// Read-only Safe getters used to verify a deployment
    #[sol(rpc)]
    interface ISafe {
        function getThreshold() external view returns (uint256 threshold);
        function getOwners() external view returns (address[] memory owners);
    }

    /// Multicall3 batching with per-call value and failure tolerance
    #[sol(rpc)]
    interface IMulticall3 {
        struct Call3Value {
            address target;
            bool allowFailure;
            uint256 value;
            bytes callData;
        }

        struct Result {
            bool success;
            bytes returnData;
        }

        function aggregate3Value(Call3Value[] calldata calls)
            external
            payable
            returns (Result[] memory returnData);
    }
}
