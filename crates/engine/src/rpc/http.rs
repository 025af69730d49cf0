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

use bytes::Bytes;
use govtally_model::rpc::RpcNodeHttpResponse;
use serde::de::DeserializeOwned;

use crate::rpc::error::RpcClientError;

/// Client for making HTTP-based JSON-RPC requests to blockchain nodes.
///
/// This client targets Ethereum-compatible networks and handles the `eth_call`
/// request/response cycle in a type-safe manner. Retry, backoff and timeout
/// policy belong to the underlying transport configuration, not this client.
#[derive(Debug)]
pub struct HttpRpcClient {
    /// The HTTP URL for the blockchain node's RPC endpoint.
    http_rpc_url: String,
    /// The HTTP client for making RPC requests.
    http_client: reqwest::Client,
}

impl HttpRpcClient {
    /// Creates a new HTTP RPC client for the given endpoint URL.
    #[must_use]
    pub fn new(http_rpc_url: String) -> Self {
        Self {
            http_rpc_url,
            http_client: reqwest::Client::new(),
        }
    }

    /// Sends a JSON-RPC request and returns the raw response bytes.
    async fn send_rpc_request(
        &self,
        rpc_request: serde_json::Value,
    ) -> Result<Bytes, RpcClientError> {
        let response = self
            .http_client
            .post(&self.http_rpc_url)
            .json(&rpc_request)
            .send()
            .await
            .map_err(|e| RpcClientError::ClientError(e.to_string()))?;

        response
            .bytes()
            .await
            .map_err(|e| RpcClientError::ClientError(e.to_string()))
    }

    /// Executes an Ethereum JSON-RPC call and deserializes the response into
    /// the specified type `T`.
    ///
    /// # Errors
    ///
    /// Returns [`RpcClientError::ClientError`] if the HTTP request fails,
    /// [`RpcClientError::NodeError`] if the node reports an error object, or
    /// [`RpcClientError::MessageParsingError`] if the response envelope cannot
    /// be parsed.
    pub async fn execute_eth_call<T: DeserializeOwned>(
        &self,
        rpc_request: serde_json::Value,
    ) -> Result<T, RpcClientError> {
        let bytes = self.send_rpc_request(rpc_request).await?;

        match serde_json::from_slice::<RpcNodeHttpResponse<T>>(bytes.as_ref()) {
            Ok(parsed) => {
                if let Some(error) = parsed.error {
                    Err(RpcClientError::NodeError {
                        code: error.code,
                        message: error.message,
                    })
                } else if let Some(result) = parsed.result {
                    Ok(result)
                } else {
                    Err(RpcClientError::MessageParsingError(
                        "Response missing both result and error fields".to_string(),
                    ))
                }
            }
            Err(e) => {
                let raw_response = String::from_utf8_lossy(bytes.as_ref());
                let preview: String = raw_response.chars().take(500).collect();
                Err(RpcClientError::MessageParsingError(format!(
                    "Failed to parse eth call response: {e}\nRaw response: {preview}"
                )))
            }
        }
    }

    /// Creates a properly formatted `eth_call` JSON-RPC request targeting a
    /// specific contract address with encoded function data.
    ///
    /// Reads always target the latest block; there is no historical voting
    /// power.
    #[must_use]
    pub fn construct_eth_call(&self, to: &str, call_data: &[u8]) -> serde_json::Value {
        let encoded_data = format!("0x{}", hex::encode(call_data));
        serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_call",
            "params": [
                {
                    "to": to,
                    "data": encoded_data
                },
                "latest"
            ]
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_construct_eth_call_request_shape() {
        let client = HttpRpcClient::new("https://rpc.example.org".to_string());
        let request = client.construct_eth_call(
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            &[0x18, 0x16, 0x0d, 0xdd],
        );

        assert_eq!(request["jsonrpc"], "2.0");
        assert_eq!(request["method"], "eth_call");
        assert_eq!(
            request["params"][0]["to"],
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359"
        );
        assert_eq!(request["params"][0]["data"], "0x18160ddd");
        assert_eq!(request["params"][1], "latest");
    }
}
