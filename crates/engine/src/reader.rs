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

//! The chain-reader capability consumed by the balance aggregator.
//!
//! The aggregator never dials the network itself; it reads through this seam,
//! which keeps the transport swappable and the aggregator testable against
//! stub readers.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use govtally_model::chain::{ChainEndpoint, ChainLayer};

use crate::{
    config::VotingPowerEngineConfig,
    contracts::debt_share::DebtShareContract,
    rpc::{error::RpcClientError, http::HttpRpcClient},
};

/// Capability for reading debt-share quantities from one of the two chains.
#[async_trait]
pub trait DebtShareReader: Send + Sync + std::fmt::Debug {
    /// Reads the protocol-wide debt-share supply on the given layer.
    ///
    /// # Errors
    ///
    /// Returns an [`RpcClientError`] if the underlying transport or contract
    /// read fails.
    async fn total_supply(&self, layer: ChainLayer) -> Result<U256, RpcClientError>;

    /// Reads one wallet's debt-share balance on the given layer.
    ///
    /// # Errors
    ///
    /// Returns an [`RpcClientError`] if the underlying transport or contract
    /// read fails.
    async fn balance_of(&self, layer: ChainLayer, account: Address)
    -> Result<U256, RpcClientError>;
}

/// Production [`DebtShareReader`] over the two configured chain endpoints,
/// each bound to its chain's debt-share contract deployment.
#[derive(Debug)]
pub struct DualChainReader {
    base: DebtShareContract,
    rollup: DebtShareContract,
}

impl DualChainReader {
    /// Creates a new [`DualChainReader`] from the engine configuration.
    #[must_use]
    pub fn new(config: &VotingPowerEngineConfig) -> Self {
        Self {
            base: contract_for(&config.base_chain),
            rollup: contract_for(&config.rollup_chain),
        }
    }

    const fn contract(&self, layer: ChainLayer) -> &DebtShareContract {
        match layer {
            ChainLayer::Base => &self.base,
            ChainLayer::Rollup => &self.rollup,
        }
    }
}

fn contract_for(endpoint: &ChainEndpoint) -> DebtShareContract {
    let client = Arc::new(HttpRpcClient::new(endpoint.http_rpc_url.clone()));
    DebtShareContract::new(client, endpoint.debt_share_address)
}

#[async_trait]
impl DebtShareReader for DualChainReader {
    async fn total_supply(&self, layer: ChainLayer) -> Result<U256, RpcClientError> {
        self.contract(layer).fetch_total_supply().await
    }

    async fn balance_of(
        &self,
        layer: ChainLayer,
        account: Address,
    ) -> Result<U256, RpcClientError> {
        self.contract(layer).fetch_balance_of(&account).await
    }
}
