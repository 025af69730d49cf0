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

//! Voting-power data structures and the rules for combining per-chain readings.
//!
//! A [`VotingPower`] carries four weighted totals: the per-layer debt-share
//! balances, their linear sum, and the integer square root of that sum (the
//! quadratic-style weighting that diminishes very large holders). Ecosystem
//! values normalize against themselves; wallet values normalize against the
//! *corresponding* ecosystem total only — cross terms are never mixed.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::math::{self, Percent};

/// A voting-power total paired with its normalized share of a baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedTotal {
    /// The raw total in base units.
    pub value: U256,
    /// Share of the corresponding baseline total, absent when no non-zero
    /// baseline is available.
    pub percent: Option<Percent>,
}

impl WeightedTotal {
    /// A zero total with no percentage.
    pub const ZERO: Self = Self {
        value: U256::ZERO,
        percent: None,
    };

    /// Creates a new [`WeightedTotal`] instance.
    #[must_use]
    pub const fn new(value: U256, percent: Option<Percent>) -> Self {
        Self { value, percent }
    }
}

/// Aggregated voting power across both chain layers under the linear and
/// square-root weighting schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingPower {
    /// Debt shares held on the base layer.
    pub l1: WeightedTotal,
    /// Debt shares held on the rollup layer.
    pub l2: WeightedTotal,
    /// Linear voting power: `l1 + l2`.
    pub linear_total: WeightedTotal,
    /// Square-root voting power: the floor square root of the linear total.
    pub sqrt_total: WeightedTotal,
}

impl VotingPower {
    /// The all-zero voting power with every percentage absent.
    pub const ZERO: Self = Self {
        l1: WeightedTotal::ZERO,
        l2: WeightedTotal::ZERO,
        linear_total: WeightedTotal::ZERO,
        sqrt_total: WeightedTotal::ZERO,
    };

    /// Combines protocol-wide per-layer totals into the ecosystem baseline.
    ///
    /// The baseline normalizes against itself: the per-layer percentages sum
    /// to 100, and the linear and square-root totals are pinned at 100. A zero
    /// linear total yields [`Self::ZERO`] (every percentage absent).
    #[must_use]
    pub fn ecosystem(total_l1: U256, total_l2: U256) -> Self {
        let linear_total = total_l1 + total_l2;
        if linear_total.is_zero() {
            return Self::ZERO;
        }
        let sqrt_total = math::isqrt(linear_total);

        Self {
            l1: WeightedTotal::new(total_l1, math::percent_of(total_l1, linear_total).ok()),
            l2: WeightedTotal::new(total_l2, math::percent_of(total_l2, linear_total).ok()),
            linear_total: WeightedTotal::new(linear_total, Some(Percent::ONE_HUNDRED)),
            sqrt_total: WeightedTotal::new(sqrt_total, Some(Percent::ONE_HUNDRED)),
        }
    }

    /// Combines one wallet's per-layer balances against an ecosystem baseline.
    ///
    /// Each of the four percentages divides by the *matching* baseline total
    /// (`l1` by `baseline.l1`, `sqrt_total` by `baseline.sqrt_total`, and so
    /// on). Any zero baseline component leaves that percentage absent rather
    /// than risking a division by zero.
    #[must_use]
    pub fn wallet(balance_l1: U256, balance_l2: U256, baseline: &Self) -> Self {
        let linear_total = balance_l1 + balance_l2;
        let sqrt_total = if linear_total.is_zero() {
            U256::ZERO
        } else {
            math::isqrt(linear_total)
        };

        Self {
            l1: WeightedTotal::new(balance_l1, share_of(balance_l1, &baseline.l1)),
            l2: WeightedTotal::new(balance_l2, share_of(balance_l2, &baseline.l2)),
            linear_total: WeightedTotal::new(
                linear_total,
                share_of(linear_total, &baseline.linear_total),
            ),
            sqrt_total: WeightedTotal::new(sqrt_total, share_of(sqrt_total, &baseline.sqrt_total)),
        }
    }

    /// Returns `true` if the linear total is zero (unresolved or empty).
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.linear_total.value.is_zero()
    }
}

fn share_of(value: U256, baseline: &WeightedTotal) -> Option<Percent> {
    if baseline.value.is_zero() {
        None
    } else {
        math::percent_of(value, baseline.value).ok()
    }
}

/// Lifecycle state of a per-subject balance computation.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum ComputationState {
    /// No computation has been requested yet.
    Idle,
    /// Chain reads are in flight; the previously published figures remain
    /// valid until they complete.
    Pending,
    /// The published figures come from a completed computation.
    Resolved,
    /// The subject was reset to the zero snapshot (absent or invalid input).
    Reset,
}

/// An immutable snapshot of one subject's voting power.
///
/// Snapshots are replaced wholesale on commit, never patched field-by-field;
/// the `generation` records which computation request produced the snapshot
/// and provides the last-write-wins ordering for concurrent computations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    /// The aggregated voting power figures.
    pub power: VotingPower,
    /// Lifecycle state of the computation that produced (or is producing)
    /// this snapshot.
    pub state: ComputationState,
    /// The request generation that produced this snapshot.
    pub generation: u64,
}

impl BalanceSnapshot {
    /// The initial snapshot: all-zero figures, [`ComputationState::Idle`].
    pub const INITIAL: Self = Self {
        power: VotingPower::ZERO,
        state: ComputationState::Idle,
        generation: 0,
    };

    /// Creates a new [`BalanceSnapshot`] instance.
    #[must_use]
    pub const fn new(power: VotingPower, state: ComputationState, generation: u64) -> Self {
        Self {
            power,
            state,
            generation,
        }
    }

    /// Returns `true` if this snapshot holds figures from a completed
    /// computation.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.state == ComputationState::Resolved
    }
}
