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

//! JSON-RPC response envelope types for blockchain node communication.

use serde::{Deserialize, de::DeserializeOwned};

/// A response structure received from an HTTP JSON-RPC blockchain node request.
#[derive(Debug, Deserialize)]
pub struct RpcNodeHttpResponse<T>
where
    T: DeserializeOwned,
{
    /// JSON-RPC version identifier.
    pub jsonrpc: String,
    /// Request identifier returned by the server (absent on some error
    /// responses).
    #[serde(default)]
    pub id: Option<u64>,
    /// Deserialized result, present on success.
    #[serde(bound(deserialize = ""))]
    pub result: Option<T>,
    /// Node-level error, present on failure.
    #[serde(default)]
    pub error: Option<RpcNodeError>,
}

/// A node-level JSON-RPC error object.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcNodeError {
    /// Error code reported by the node.
    pub code: i64,
    /// Human-readable error message reported by the node.
    pub message: String,
}
