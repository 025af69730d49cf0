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

//! Domain model for the govtally cross-chain governance voting power engine.
//!
//! The `govtally-model` crate provides the pure data model shared by the rest of
//! the workspace: chain-layer identifiers, the voting-power data structures,
//! arbitrary-precision integer math (floor square root and fixed-point
//! percentages over `U256`), wallet-address validation, and the JSON-RPC
//! response envelope consumed by the engine's HTTP client.
//!
//! The crate performs no I/O and holds no async machinery. Every computation is
//! pure integer arithmetic, so identical inputs produce bit-identical results
//! on every platform.

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(clippy::missing_errors_doc)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod balances;
pub mod chain;
pub mod math;
pub mod rpc;
pub mod validation;

// Re-exports
pub use crate::{
    balances::{BalanceSnapshot, ComputationState, VotingPower, WeightedTotal},
    chain::{ChainEndpoint, ChainLayer},
    math::{MathError, Percent, checked_isqrt, isqrt, percent_of},
    validation::{AddressValidationError, validate_wallet_address},
};
