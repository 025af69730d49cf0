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

use thiserror::Error;

/// Represents errors that can occur when reading from a blockchain RPC node.
#[derive(Debug, Error)]
pub enum RpcClientError {
    /// Occurs when the RPC client encounters a transport-level error, such as
    /// connection failures.
    #[error("Client error: {0}")]
    ClientError(String),
    /// Occurs when the node itself reports an error (for example a contract
    /// revert).
    #[error("RPC node error {code}: {message}")]
    NodeError {
        /// Error code reported by the node.
        code: i64,
        /// Human-readable message reported by the node.
        message: String,
    },
    /// Occurs when decoding contract ABI data fails.
    #[error("Decoding error: {0}")]
    AbiDecodingError(String),
    /// Occurs when parsing an RPC response envelope fails.
    #[error("Parsing error: {0}")]
    MessageParsingError(String),
}
