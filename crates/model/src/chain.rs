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

//! Chain-layer identifiers and per-chain endpoint definitions.
//!
//! The protocol keeps separate debt-share records on exactly two networks: a
//! base settlement layer and a rollup layer. Voting power is aggregated across
//! both, so every engine instance is configured with one [`ChainEndpoint`] per
//! [`ChainLayer`].

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Identifies one of the two networks holding debt-share records.
#[derive(
    Debug,
    Clone,
    Copy,
    Hash,
    PartialOrd,
    PartialEq,
    Ord,
    Eq,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum ChainLayer {
    /// The base settlement layer (L1).
    Base,
    /// The rollup layer (L2).
    Rollup,
}

/// Connection and contract details for one chain's debt-share deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainEndpoint {
    /// The layer this endpoint serves.
    pub layer: ChainLayer,
    /// The unique identifier of the blockchain network.
    pub chain_id: u32,
    /// The HTTP URL of the JSON-RPC endpoint for this chain.
    pub http_rpc_url: String,
    /// The debt-share contract address deployed on this chain.
    pub debt_share_address: Address,
}

impl ChainEndpoint {
    /// Creates a new [`ChainEndpoint`] instance.
    #[must_use]
    pub const fn new(
        layer: ChainLayer,
        chain_id: u32,
        http_rpc_url: String,
        debt_share_address: Address,
    ) -> Self {
        Self {
            layer,
            chain_id,
            http_rpc_url,
            debt_share_address,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("base", ChainLayer::Base)]
    #[case("Rollup", ChainLayer::Rollup)]
    #[case("ROLLUP", ChainLayer::Rollup)]
    fn test_chain_layer_parsing(#[case] input: &str, #[case] expected: ChainLayer) {
        assert_eq!(ChainLayer::from_str(input).unwrap(), expected);
    }

    #[rstest]
    fn test_chain_layer_display() {
        assert_eq!(ChainLayer::Base.to_string(), "Base");
        assert_eq!(ChainLayer::Rollup.to_string(), "Rollup");
    }
}
