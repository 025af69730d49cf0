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

//! The balance aggregator: concurrent paired chain reads combined into
//! voting-power snapshots.
//!
//! Each subject (the ecosystem baseline, the queried wallet) moves through
//! `Idle → Pending → Resolved`/`Reset`. Both reads of a pair must succeed for
//! a computation to publish; a failed pair leaves the prior snapshot visible.
//! Every computation request takes a fresh generation number and a completed
//! computation commits only if its inputs are still the most recently
//! requested — a slow, superseded read can never overwrite a newer snapshot.
//! Superseded results are dropped, not buffered.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use alloy::primitives::Address;
use govtally_model::{
    balances::{BalanceSnapshot, ComputationState, VotingPower},
    chain::ChainLayer,
};
use thiserror::Error;
use tokio::sync::watch;

use crate::{reader::DebtShareReader, rpc::error::RpcClientError};

/// Represents errors from a subject-level balance computation.
#[derive(Debug, Error)]
pub enum AggregateError {
    /// A chain read failed, failing the computation as a whole; the prior
    /// snapshot remains published and the caller may retry.
    #[error("Chain read failed: {0}")]
    ReadFailure(#[from] RpcClientError),
}

/// Aggregates debt-share readings from both chain layers into voting-power
/// snapshots.
///
/// The aggregator owns no long-lived state beyond the last committed snapshot
/// per subject. Snapshots are replaced by a single atomic assignment inside
/// the watch channel; readers never observe a partially updated snapshot.
#[derive(Debug)]
pub struct BalanceAggregator {
    reader: Arc<dyn DebtShareReader>,
    baseline_tx: watch::Sender<BalanceSnapshot>,
    wallet_tx: watch::Sender<BalanceSnapshot>,
    baseline_generation: AtomicU64,
    wallet_generation: AtomicU64,
}

impl BalanceAggregator {
    /// Creates a new [`BalanceAggregator`] over the given chain-reader
    /// capability.
    #[must_use]
    pub fn new(reader: Arc<dyn DebtShareReader>) -> Self {
        let (baseline_tx, _) = watch::channel(BalanceSnapshot::INITIAL);
        let (wallet_tx, _) = watch::channel(BalanceSnapshot::INITIAL);
        Self {
            reader,
            baseline_tx,
            wallet_tx,
            baseline_generation: AtomicU64::new(0),
            wallet_generation: AtomicU64::new(0),
        }
    }

    /// Returns the current ecosystem baseline snapshot.
    #[must_use]
    pub fn baseline(&self) -> BalanceSnapshot {
        self.baseline_tx.borrow().clone()
    }

    /// Returns the current wallet snapshot.
    #[must_use]
    pub fn wallet(&self) -> BalanceSnapshot {
        self.wallet_tx.borrow().clone()
    }

    /// Subscribes to ecosystem baseline snapshot updates.
    #[must_use]
    pub fn subscribe_baseline(&self) -> watch::Receiver<BalanceSnapshot> {
        self.baseline_tx.subscribe()
    }

    /// Subscribes to wallet snapshot updates.
    #[must_use]
    pub fn subscribe_wallet(&self) -> watch::Receiver<BalanceSnapshot> {
        self.wallet_tx.subscribe()
    }

    /// Computes the ecosystem baseline from both chains' protocol-wide
    /// supplies.
    ///
    /// Issues the two `totalSupply` reads concurrently and joins them: both
    /// must succeed. On success the resolved snapshot replaces the stored
    /// baseline atomically, unless a newer baseline computation was requested
    /// in the meantime, in which case the result is dropped and `Ok(None)` is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError::ReadFailure`] if either chain read fails; no
    /// partial snapshot is published and the prior snapshot stays visible.
    pub async fn compute_ecosystem_baseline(
        &self,
    ) -> Result<Option<VotingPower>, AggregateError> {
        let generation = self.next_generation(&self.baseline_generation);
        let prior = self.baseline();

        self.commit_baseline(BalanceSnapshot::new(
            prior.power,
            ComputationState::Pending,
            generation,
        ));

        let result = tokio::try_join!(
            self.reader.total_supply(ChainLayer::Base),
            self.reader.total_supply(ChainLayer::Rollup),
        );

        match result {
            Ok((total_l1, total_l2)) => {
                let power = VotingPower::ecosystem(total_l1, total_l2);
                let committed = self.commit_baseline(BalanceSnapshot::new(
                    power,
                    ComputationState::Resolved,
                    generation,
                ));
                if committed {
                    tracing::debug!(
                        "Resolved ecosystem baseline: linear total {}",
                        power.linear_total.value
                    );
                    Ok(Some(power))
                } else {
                    tracing::debug!("Discarded superseded ecosystem baseline result");
                    Ok(None)
                }
            }
            Err(e) => {
                self.commit_baseline(BalanceSnapshot::new(prior.power, prior.state, generation));
                Err(AggregateError::ReadFailure(e))
            }
        }
    }

    /// Computes one wallet's voting power against the current baseline.
    ///
    /// An absent address, or a baseline that has not resolved to a non-zero
    /// linear total, resets the wallet subject to the zero snapshot without
    /// issuing any reads. Otherwise the two `balanceOf` reads are issued
    /// concurrently and joined, and the resolved snapshot commits only if
    /// both the address request and the baseline it was computed against are
    /// still current — otherwise the result is dropped and `Ok(None)` is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError::ReadFailure`] if either chain read fails; no
    /// partial snapshot is published and the prior snapshot stays visible.
    pub async fn compute_wallet_balances(
        &self,
        address: Option<Address>,
    ) -> Result<Option<VotingPower>, AggregateError> {
        let generation = self.next_generation(&self.wallet_generation);
        let baseline = self.baseline();
        let baseline_generation = self.baseline_generation.load(Ordering::SeqCst);

        let account = match address {
            Some(account) if !baseline.power.is_zero() => account,
            _ => {
                let committed = self.commit_wallet(
                    BalanceSnapshot::new(VotingPower::ZERO, ComputationState::Reset, generation),
                    baseline_generation,
                );
                return Ok(committed.then_some(VotingPower::ZERO));
            }
        };

        let prior = self.wallet();
        self.commit_wallet(
            BalanceSnapshot::new(prior.power, ComputationState::Pending, generation),
            baseline_generation,
        );

        let result = tokio::try_join!(
            self.reader.balance_of(ChainLayer::Base, account),
            self.reader.balance_of(ChainLayer::Rollup, account),
        );

        match result {
            Ok((balance_l1, balance_l2)) => {
                let power = VotingPower::wallet(balance_l1, balance_l2, &baseline.power);
                let committed = self.commit_wallet(
                    BalanceSnapshot::new(power, ComputationState::Resolved, generation),
                    baseline_generation,
                );
                if committed {
                    tracing::debug!("Resolved wallet balances for {account}");
                    Ok(Some(power))
                } else {
                    tracing::debug!("Discarded superseded wallet result for {account}");
                    Ok(None)
                }
            }
            Err(e) => {
                self.commit_wallet(
                    BalanceSnapshot::new(prior.power, prior.state, generation),
                    baseline_generation,
                );
                Err(AggregateError::ReadFailure(e))
            }
        }
    }

    fn next_generation(&self, counter: &AtomicU64) -> u64 {
        counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Commits a baseline snapshot if its generation is still the most
    /// recently requested; returns whether the commit happened.
    fn commit_baseline(&self, snapshot: BalanceSnapshot) -> bool {
        let mut committed = false;
        self.baseline_tx.send_if_modified(|current| {
            if self.baseline_generation.load(Ordering::SeqCst) != snapshot.generation {
                return false;
            }
            committed = true;
            *current = snapshot;
            true
        });
        committed
    }

    /// Commits a wallet snapshot if both its generation and the baseline it
    /// was computed against are still current; returns whether the commit
    /// happened.
    fn commit_wallet(&self, snapshot: BalanceSnapshot, baseline_generation: u64) -> bool {
        let mut committed = false;
        self.wallet_tx.send_if_modified(|current| {
            if self.wallet_generation.load(Ordering::SeqCst) != snapshot.generation {
                return false;
            }
            if self.baseline_generation.load(Ordering::SeqCst) != baseline_generation {
                return false;
            }
            committed = true;
            *current = snapshot;
            true
        });
        committed
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::atomic::AtomicUsize,
        time::Duration,
    };

    use alloy::primitives::U256;
    use async_trait::async_trait;
    use rstest::{fixture, rstest};

    use super::*;

    #[derive(Debug, Default)]
    struct StubReader {
        total_l1: U256,
        total_l2: U256,
        balances: HashMap<Address, (U256, U256)>,
        balance_delays: HashMap<Address, Duration>,
        fail_layer: Option<ChainLayer>,
        fail_balance_for: Option<Address>,
        supply_reads: AtomicUsize,
        balance_reads: AtomicUsize,
    }

    impl StubReader {
        fn with_totals(total_l1: u64, total_l2: u64) -> Self {
            Self {
                total_l1: U256::from(total_l1),
                total_l2: U256::from(total_l2),
                ..Default::default()
            }
        }

        fn with_balance(mut self, account: Address, l1: u64, l2: u64) -> Self {
            self.balances
                .insert(account, (U256::from(l1), U256::from(l2)));
            self
        }

        fn with_balance_delay(mut self, account: Address, delay: Duration) -> Self {
            self.balance_delays.insert(account, delay);
            self
        }

        fn failing_on(mut self, layer: ChainLayer) -> Self {
            self.fail_layer = Some(layer);
            self
        }

        fn failing_balance_for(mut self, account: Address) -> Self {
            self.fail_balance_for = Some(account);
            self
        }
    }

    #[async_trait]
    impl DebtShareReader for StubReader {
        async fn total_supply(&self, layer: ChainLayer) -> Result<U256, RpcClientError> {
            self.supply_reads.fetch_add(1, Ordering::SeqCst);
            if self.fail_layer == Some(layer) {
                return Err(RpcClientError::ClientError("connection refused".to_string()));
            }
            Ok(match layer {
                ChainLayer::Base => self.total_l1,
                ChainLayer::Rollup => self.total_l2,
            })
        }

        async fn balance_of(
            &self,
            layer: ChainLayer,
            account: Address,
        ) -> Result<U256, RpcClientError> {
            self.balance_reads.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.balance_delays.get(&account) {
                tokio::time::sleep(*delay).await;
            }
            if self.fail_layer == Some(layer) || self.fail_balance_for == Some(account) {
                return Err(RpcClientError::ClientError("connection refused".to_string()));
            }
            let (l1, l2) = self.balances.get(&account).copied().unwrap_or_default();
            Ok(match layer {
                ChainLayer::Base => l1,
                ChainLayer::Rollup => l2,
            })
        }
    }

    #[fixture]
    fn wallet_a() -> Address {
        Address::repeat_byte(0xaa)
    }

    #[fixture]
    fn wallet_b() -> Address {
        Address::repeat_byte(0xbb)
    }

    #[rstest]
    #[tokio::test]
    async fn test_baseline_resolves_with_self_relative_percentages() {
        let aggregator =
            BalanceAggregator::new(Arc::new(StubReader::with_totals(600, 400)));

        let power = aggregator
            .compute_ecosystem_baseline()
            .await
            .unwrap()
            .unwrap();

        assert_eq!(power.linear_total.value, U256::from(1000u64));
        assert_eq!(power.sqrt_total.value, U256::from(31u64));
        assert_eq!(power.l1.percent.unwrap().to_string(), "60.0");
        assert_eq!(power.l2.percent.unwrap().to_string(), "40.0");

        let snapshot = aggregator.baseline();
        assert!(snapshot.is_resolved());
        assert_eq!(snapshot.generation, 1);
        assert_eq!(snapshot.power, power);
    }

    #[rstest]
    #[tokio::test]
    async fn test_baseline_read_failure_retains_prior_snapshot() {
        let aggregator = BalanceAggregator::new(Arc::new(
            StubReader::with_totals(600, 400).failing_on(ChainLayer::Rollup),
        ));

        let result = aggregator.compute_ecosystem_baseline().await;

        assert!(matches!(result, Err(AggregateError::ReadFailure(_))));
        let snapshot = aggregator.baseline();
        assert_eq!(snapshot.state, ComputationState::Idle);
        assert!(snapshot.power.is_zero());
    }

    #[rstest]
    #[tokio::test]
    async fn test_wallet_absent_address_resets_without_reads(wallet_a: Address) {
        let reader = Arc::new(
            StubReader::with_totals(600, 400).with_balance(wallet_a, 60, 40),
        );
        let aggregator = BalanceAggregator::new(reader.clone());
        aggregator.compute_ecosystem_baseline().await.unwrap();

        let power = aggregator
            .compute_wallet_balances(None)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(power, VotingPower::ZERO);
        assert_eq!(aggregator.wallet().state, ComputationState::Reset);
        assert_eq!(reader.balance_reads.load(Ordering::SeqCst), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn test_wallet_unresolved_baseline_resets_without_reads(wallet_a: Address) {
        let reader = Arc::new(
            StubReader::with_totals(600, 400).with_balance(wallet_a, 60, 40),
        );
        let aggregator = BalanceAggregator::new(reader.clone());

        // Baseline never computed: linear total is zero
        let power = aggregator
            .compute_wallet_balances(Some(wallet_a))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(power, VotingPower::ZERO);
        assert_eq!(aggregator.wallet().state, ComputationState::Reset);
        assert_eq!(reader.balance_reads.load(Ordering::SeqCst), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn test_wallet_resolves_against_matching_baseline_components(wallet_a: Address) {
        let aggregator = BalanceAggregator::new(Arc::new(
            StubReader::with_totals(600, 400).with_balance(wallet_a, 60, 40),
        ));
        aggregator.compute_ecosystem_baseline().await.unwrap();

        let power = aggregator
            .compute_wallet_balances(Some(wallet_a))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(power.l1.percent.unwrap().to_string(), "10.0");
        assert_eq!(power.l2.percent.unwrap().to_string(), "10.0");
        assert_eq!(power.linear_total.value, U256::from(100u64));
        assert_eq!(power.linear_total.percent.unwrap().to_string(), "10.0");
        assert_eq!(power.sqrt_total.value, U256::from(10u64));
        assert_eq!(power.sqrt_total.percent.unwrap().to_string(), "32.2");
        assert!(aggregator.wallet().is_resolved());
    }

    #[rstest]
    #[tokio::test]
    async fn test_wallet_read_failure_retains_prior_snapshot(
        wallet_a: Address,
        wallet_b: Address,
    ) {
        let reader = StubReader::with_totals(600, 400)
            .with_balance(wallet_a, 60, 40)
            .failing_balance_for(wallet_b);
        let aggregator = BalanceAggregator::new(Arc::new(reader));
        aggregator.compute_ecosystem_baseline().await.unwrap();
        aggregator
            .compute_wallet_balances(Some(wallet_a))
            .await
            .unwrap();

        let result = aggregator.compute_wallet_balances(Some(wallet_b)).await;

        assert!(matches!(result, Err(AggregateError::ReadFailure(_))));
        // The last-known-good figures for wallet A stay published
        let snapshot = aggregator.wallet();
        assert!(snapshot.is_resolved());
        assert_eq!(snapshot.power.linear_total.value, U256::from(100u64));
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn test_slow_stale_result_never_overwrites_newer_snapshot(
        wallet_a: Address,
        wallet_b: Address,
    ) {
        let reader = Arc::new(
            StubReader::with_totals(600, 400)
                .with_balance(wallet_a, 60, 40)
                .with_balance(wallet_b, 300, 100)
                .with_balance_delay(wallet_a, Duration::from_millis(250)),
        );
        let aggregator = Arc::new(BalanceAggregator::new(reader));
        aggregator.compute_ecosystem_baseline().await.unwrap();

        // Request A; its reads stall on the delay
        let slow = {
            let aggregator = aggregator.clone();
            tokio::spawn(async move { aggregator.compute_wallet_balances(Some(wallet_a)).await })
        };
        tokio::task::yield_now().await;
        assert_eq!(aggregator.wallet().state, ComputationState::Pending);

        // Request B supersedes A and resolves immediately
        let power_b = aggregator
            .compute_wallet_balances(Some(wallet_b))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(power_b.linear_total.value, U256::from(400u64));

        // A's late result must be discarded silently
        let stale = slow.await.unwrap().unwrap();
        assert_eq!(stale, None);
        assert_eq!(
            aggregator.wallet().power.linear_total.value,
            U256::from(400u64)
        );
        assert!(aggregator.wallet().is_resolved());
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn test_baseline_refresh_invalidates_inflight_wallet_result(wallet_a: Address) {
        let reader = Arc::new(
            StubReader::with_totals(600, 400)
                .with_balance(wallet_a, 60, 40)
                .with_balance_delay(wallet_a, Duration::from_millis(250)),
        );
        let aggregator = Arc::new(BalanceAggregator::new(reader));
        aggregator.compute_ecosystem_baseline().await.unwrap();

        let slow = {
            let aggregator = aggregator.clone();
            tokio::spawn(async move { aggregator.compute_wallet_balances(Some(wallet_a)).await })
        };
        tokio::task::yield_now().await;

        // The baseline identity changes while the wallet reads are in flight
        aggregator.compute_ecosystem_baseline().await.unwrap();

        let stale = slow.await.unwrap().unwrap();
        assert_eq!(stale, None);
        assert!(aggregator.wallet().power.is_zero());
    }

    #[rstest]
    #[tokio::test]
    async fn test_superseded_baseline_result_is_dropped() {
        let aggregator = BalanceAggregator::new(Arc::new(StubReader::with_totals(600, 400)));

        // Simulate a newer request arriving while this one is "in flight" by
        // bumping the generation counter directly before the commit lands.
        let generation = aggregator.next_generation(&aggregator.baseline_generation);
        aggregator.next_generation(&aggregator.baseline_generation);

        let committed = aggregator.commit_baseline(BalanceSnapshot::new(
            VotingPower::ecosystem(U256::from(600u64), U256::from(400u64)),
            ComputationState::Resolved,
            generation,
        ));

        assert!(!committed);
        assert!(aggregator.baseline().power.is_zero());
    }
}
