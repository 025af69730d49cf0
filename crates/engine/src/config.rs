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

use std::time::Duration;

use govtally_model::chain::ChainEndpoint;

/// Settle delay applied to raw address input before validation.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(600);

/// Configuration for the voting power engine.
///
/// Exactly two chain endpoints are required, one per layer; `base_chain` must
/// carry [`ChainLayer::Base`](govtally_model::chain::ChainLayer::Base) and
/// `rollup_chain` [`ChainLayer::Rollup`](govtally_model::chain::ChainLayer::Rollup).
#[derive(Debug, Clone)]
pub struct VotingPowerEngineConfig {
    /// The base-layer endpoint and debt-share deployment.
    pub base_chain: ChainEndpoint,
    /// The rollup-layer endpoint and debt-share deployment.
    pub rollup_chain: ChainEndpoint,
    /// How long raw address input must stay unchanged before it is validated.
    pub settle_delay: Duration,
}

impl VotingPowerEngineConfig {
    /// Creates a new [`VotingPowerEngineConfig`] instance with the default
    /// settle delay.
    #[must_use]
    pub const fn new(base_chain: ChainEndpoint, rollup_chain: ChainEndpoint) -> Self {
        Self {
            base_chain,
            rollup_chain,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    /// Overrides the input settle delay.
    #[must_use]
    pub const fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }
}
