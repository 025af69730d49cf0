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

//! The voting power engine facade.
//!
//! Wires the address-input pipeline into the balance aggregator: each settled
//! input fires an independent wallet computation, and the aggregator's
//! generation guard provides last-write-wins ordering across overlapping
//! computations. The ecosystem baseline is computed once on start and only
//! recomputed on explicit refresh.

use std::sync::Arc;

use alloy::primitives::Address;
use govtally_model::balances::{BalanceSnapshot, VotingPower};
use tokio::sync::watch;

use crate::{
    aggregator::{AggregateError, BalanceAggregator},
    config::VotingPowerEngineConfig,
    pipeline::{AddressInputPipeline, ValidatedInput},
    reader::{DebtShareReader, DualChainReader},
};

/// Facade over the balance aggregator and address-input pipeline.
///
/// Downstream consumers receive [`BalanceSnapshot`] values as plain data; all
/// presentation concerns (base-unit scaling, percent signs, layout) stay
/// outside the engine.
#[derive(Debug)]
pub struct VotingPowerEngine {
    /// Configuration parameters for the engine.
    pub config: VotingPowerEngineConfig,
    aggregator: Arc<BalanceAggregator>,
    pipeline: AddressInputPipeline,
    /// Background task routing settled input into wallet computations.
    process_task: Option<tokio::task::JoinHandle<()>>,
    /// Oneshot channel sender for graceful shutdown signal.
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl VotingPowerEngine {
    /// Creates a new [`VotingPowerEngine`] reading through HTTP JSON-RPC
    /// clients built from the configured endpoints.
    #[must_use]
    pub fn new(config: VotingPowerEngineConfig) -> Self {
        let reader = Arc::new(DualChainReader::new(&config));
        Self::with_reader(config, reader)
    }

    /// Creates a new [`VotingPowerEngine`] over an injected chain-reader
    /// capability.
    #[must_use]
    pub fn with_reader(
        config: VotingPowerEngineConfig,
        reader: Arc<dyn DebtShareReader>,
    ) -> Self {
        let aggregator = Arc::new(BalanceAggregator::new(reader));
        let pipeline = AddressInputPipeline::new(config.settle_delay);
        Self {
            config,
            aggregator,
            pipeline,
            process_task: None,
            shutdown_tx: None,
        }
    }

    /// Computes the ecosystem baseline and starts routing settled address
    /// input into wallet computations.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError::ReadFailure`] if the initial baseline
    /// computation fails; the engine is not started and the call may be
    /// retried.
    pub async fn start(&mut self) -> Result<(), AggregateError> {
        self.aggregator.compute_ecosystem_baseline().await?;
        self.spawn_process_task();
        Ok(())
    }

    fn spawn_process_task(&mut self) {
        if self.process_task.is_some() {
            tracing::warn!("Engine already started");
            return;
        }

        let (shutdown_tx, mut shutdown_rx) = tokio::sync::oneshot::channel();
        self.shutdown_tx = Some(shutdown_tx);

        let aggregator = self.aggregator.clone();
        let mut input_rx = self.pipeline.subscribe();

        let handle = tokio::spawn(async move {
            tracing::debug!("Started task 'process'");
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        tracing::debug!("Received shutdown signal in voting power process task");
                        break;
                    }
                    changed = input_rx.changed() => {
                        if changed.is_err() {
                            tracing::debug!("Address input pipeline closed");
                            break;
                        }
                        let input = *input_rx.borrow_and_update();
                        spawn_wallet_computation(aggregator.clone(), input.address);
                    }
                }
            }
        });
        self.process_task = Some(handle);
    }

    /// Recomputes the ecosystem baseline and re-derives the wallet figures
    /// for the current input against the new baseline.
    ///
    /// Any wallet computation still in flight against the old baseline is
    /// invalidated by the generation capture and its result dropped.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError::ReadFailure`] if the baseline recompute
    /// fails; the prior baseline stays published.
    pub async fn refresh_baseline(&self) -> Result<Option<VotingPower>, AggregateError> {
        let result = self.aggregator.compute_ecosystem_baseline().await?;
        let input = self.pipeline.output();
        spawn_wallet_computation(self.aggregator.clone(), input.address);
        Ok(result)
    }

    /// Submits a raw address edit to the input pipeline.
    pub fn submit_address_input(&self, raw: &str) {
        self.pipeline.submit(raw);
    }

    /// Returns the current ecosystem baseline snapshot.
    #[must_use]
    pub fn baseline(&self) -> BalanceSnapshot {
        self.aggregator.baseline()
    }

    /// Returns the current wallet snapshot.
    #[must_use]
    pub fn wallet(&self) -> BalanceSnapshot {
        self.aggregator.wallet()
    }

    /// Returns the most recently settled, validated address input.
    #[must_use]
    pub fn address_input(&self) -> ValidatedInput {
        self.pipeline.output()
    }

    /// Subscribes to ecosystem baseline snapshot updates.
    #[must_use]
    pub fn subscribe_baseline(&self) -> watch::Receiver<BalanceSnapshot> {
        self.aggregator.subscribe_baseline()
    }

    /// Subscribes to wallet snapshot updates.
    #[must_use]
    pub fn subscribe_wallet(&self) -> watch::Receiver<BalanceSnapshot> {
        self.aggregator.subscribe_wallet()
    }

    /// Subscribes to settled address-input updates.
    #[must_use]
    pub fn subscribe_address_input(&self) -> watch::Receiver<ValidatedInput> {
        self.pipeline.subscribe()
    }

    /// Stops the processing task gracefully.
    pub async fn stop(&mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(());
        }
        if let Some(task) = self.process_task.take() {
            if let Err(e) = task.await {
                tracing::error!("Error stopping process task: {e}");
            }
        }
    }
}

/// Fires an independent wallet computation; overlapping computations are
/// ordered by the aggregator's generation guard, not by arrival.
fn spawn_wallet_computation(aggregator: Arc<BalanceAggregator>, address: Option<Address>) {
    tokio::spawn(async move {
        match aggregator.compute_wallet_balances(address).await {
            Ok(Some(_)) => {}
            Ok(None) => tracing::debug!("Discarded superseded wallet computation"),
            Err(e) => tracing::error!("Wallet balance computation failed: {e}"),
        }
    });
}
