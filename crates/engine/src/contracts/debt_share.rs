// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

use std::sync::Arc;

use alloy::{
    primitives::{Address, U256},
    sol,
    sol_types::SolCall,
};

use crate::rpc::{error::RpcClientError, http::HttpRpcClient};

sol! {
    contract DebtShare {
        function totalSupply() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
    }
}

/// Interface for reading a protocol's debt-share contract on one chain.
///
/// Debt shares act as a proxy for governance voting power: `totalSupply`
/// yields the protocol-wide total on that chain and `balanceOf` a single
/// wallet's holding.
#[derive(Debug)]
pub struct DebtShareContract {
    /// The HTTP RPC client used to communicate with the blockchain node.
    client: Arc<HttpRpcClient>,
    /// The debt-share contract address on this chain.
    address: Address,
}

impl DebtShareContract {
    /// Creates a new debt-share contract interface with the specified RPC
    /// client and contract address.
    #[must_use]
    pub const fn new(client: Arc<HttpRpcClient>, address: Address) -> Self {
        Self { client, address }
    }

    /// Fetches the protocol-wide debt-share supply on this chain.
    ///
    /// # Errors
    ///
    /// Returns [`RpcClientError::ClientError`] or [`RpcClientError::NodeError`]
    /// if the RPC call fails, or [`RpcClientError::AbiDecodingError`] if ABI
    /// decoding fails.
    pub async fn fetch_total_supply(&self) -> Result<U256, RpcClientError> {
        let call_data = DebtShare::totalSupplyCall {}.abi_encode();
        let bytes = self.execute_call(call_data.as_slice()).await?;

        DebtShare::totalSupplyCall::abi_decode_returns(&bytes).map_err(|e| {
            RpcClientError::AbiDecodingError(format!(
                "Error decoding debt share totalSupply with error {e}"
            ))
        })
    }

    /// Fetches one wallet's debt-share balance on this chain.
    ///
    /// # Errors
    ///
    /// Returns [`RpcClientError::ClientError`] or [`RpcClientError::NodeError`]
    /// if the RPC call fails, or [`RpcClientError::AbiDecodingError`] if ABI
    /// decoding fails.
    pub async fn fetch_balance_of(&self, account: &Address) -> Result<U256, RpcClientError> {
        let call_data = DebtShare::balanceOfCall { account: *account }.abi_encode();
        let bytes = self.execute_call(call_data.as_slice()).await?;

        DebtShare::balanceOfCall::abi_decode_returns(&bytes).map_err(|e| {
            RpcClientError::AbiDecodingError(format!(
                "Error decoding debt share balanceOf with error {e}"
            ))
        })
    }

    /// Executes a single contract call and returns the raw response bytes.
    async fn execute_call(&self, call_data: &[u8]) -> Result<Vec<u8>, RpcClientError> {
        let rpc_request = self
            .client
            .construct_eth_call(&self.address.to_string(), call_data);

        let encoded_response = self.client.execute_eth_call::<String>(rpc_request).await?;

        decode_hex_response(&encoded_response)
    }
}

/// Decodes a hexadecimal string response from a blockchain RPC call.
///
/// # Errors
///
/// Returns an [`RpcClientError::AbiDecodingError`] if the hex decoding fails.
pub fn decode_hex_response(encoded_response: &str) -> Result<Vec<u8>, RpcClientError> {
    // Remove the "0x" prefix if present
    let encoded_str = encoded_response
        .strip_prefix("0x")
        .unwrap_or(encoded_response);
    hex::decode(encoded_str)
        .map_err(|e| RpcClientError::AbiDecodingError(format!("Error decoding hex response: {e}")))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_total_supply_call_selector() {
        let call_data = DebtShare::totalSupplyCall {}.abi_encode();
        assert_eq!(&call_data[..4], &[0x18, 0x16, 0x0d, 0xdd]);
    }

    #[rstest]
    fn test_balance_of_call_encoding() {
        let account = Address::from_str("0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359").unwrap();
        let call_data = DebtShare::balanceOfCall { account }.abi_encode();

        assert_eq!(&call_data[..4], &[0x70, 0xa0, 0x82, 0x31]);
        assert_eq!(call_data.len(), 36);
        // The address is ABI-encoded left-padded into a 32-byte word
        assert_eq!(&call_data[16..], account.as_slice());
    }

    #[rstest]
    fn test_decode_total_supply_response() {
        // 10^24 in base units, as returned by eth_call
        let encoded = "0x00000000000000000000000000000000000000000000d3c21bcecceda1000000";
        let bytes = decode_hex_response(encoded).unwrap();
        let total = DebtShare::totalSupplyCall::abi_decode_returns(&bytes).unwrap();

        assert_eq!(total, U256::from_str("1000000000000000000000000").unwrap());
    }

    #[rstest]
    fn test_decode_hex_response_rejects_garbage() {
        assert!(matches!(
            decode_hex_response("0xzz"),
            Err(RpcClientError::AbiDecodingError(_))
        ));
    }
}
