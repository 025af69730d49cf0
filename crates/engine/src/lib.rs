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

//! Balance aggregation and voting power computation engine for govtally.
//!
//! The `govtally-engine` crate orchestrates concurrent debt-share reads from
//! the two chain layers and derives governance voting power under the linear
//! and square-root weighting schemes:
//!
//! - [`rpc`] — the HTTP JSON-RPC client used to reach each chain's node.
//! - [`contracts`] — `alloy` ABI bindings for the debt-share contract.
//! - [`reader`] — the injected chain-reader capability and its production
//!   implementation over the two configured endpoints.
//! - [`aggregator`] — the per-subject snapshot state machine with
//!   generation-guarded, last-write-wins snapshot commits.
//! - [`pipeline`] — the debounced, validating address-input stage.
//! - [`engine`] — the facade wiring settled input into wallet computations.
//!
//! The engine emits unscaled base-unit integers and one-decimal percentages as
//! plain data; presentation concerns (unit scaling, table layout) belong to
//! downstream consumers.

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(clippy::missing_errors_doc)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod aggregator;
pub mod config;
pub mod contracts;
pub mod engine;
pub mod pipeline;
pub mod reader;
pub mod rpc;

// Re-exports
pub use crate::{
    aggregator::{AggregateError, BalanceAggregator},
    config::VotingPowerEngineConfig,
    engine::VotingPowerEngine,
    pipeline::{AddressInputPipeline, AddressInputStatus, ValidatedInput},
    reader::{DebtShareReader, DualChainReader},
    rpc::{error::RpcClientError, http::HttpRpcClient},
};
