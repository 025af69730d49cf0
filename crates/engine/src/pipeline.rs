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

//! The debounced, validating address-input pipeline.
//!
//! Raw user edits are debounced with a fixed settling delay before validation,
//! so rapid typing collapses into a single validation of the final text. Only
//! validated, canonicalized addresses flow downstream; empty or invalid input
//! is emitted as *absent* together with a status signal the display layer can
//! surface immediately, independent of any chain-read state.

use std::time::Duration;

use alloy::primitives::Address;
use govtally_model::validation::validate_wallet_address;
use tokio::sync::{mpsc, watch};

/// Status of the most recently settled input, for input-field indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressInputStatus {
    /// No input (or whitespace only).
    Empty,
    /// Input was validated and canonicalized.
    Valid,
    /// Input failed format or checksum validation.
    Invalid,
}

/// A settled, validated input emitted by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedInput {
    /// The canonical wallet address; absent for empty or invalid input.
    pub address: Option<Address>,
    /// Status signal for the input field.
    pub status: AddressInputStatus,
}

impl ValidatedInput {
    /// The initial, empty input.
    pub const EMPTY: Self = Self {
        address: None,
        status: AddressInputStatus::Empty,
    };
}

/// Debounces raw address edits and emits validated input on a watch channel.
///
/// The settle task exits when the pipeline is dropped (its input channel
/// closes).
#[derive(Debug)]
pub struct AddressInputPipeline {
    input_tx: mpsc::UnboundedSender<String>,
    output_rx: watch::Receiver<ValidatedInput>,
}

impl AddressInputPipeline {
    /// Creates a new [`AddressInputPipeline`] and spawns its settle task.
    #[must_use]
    pub fn new(settle_delay: Duration) -> Self {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (output_tx, output_rx) = watch::channel(ValidatedInput::EMPTY);

        tokio::spawn(settle_loop(input_rx, output_tx, settle_delay));

        Self {
            input_tx,
            output_rx,
        }
    }

    /// Submits a raw text edit; edits inside the settle window reset it.
    pub fn submit(&self, raw: &str) {
        if self.input_tx.send(raw.to_string()).is_err() {
            tracing::error!("Address input settle task has stopped");
        }
    }

    /// Returns the most recently settled, validated input.
    #[must_use]
    pub fn output(&self) -> ValidatedInput {
        *self.output_rx.borrow()
    }

    /// Subscribes to settled input updates.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ValidatedInput> {
        self.output_rx.clone()
    }
}

async fn settle_loop(
    mut input_rx: mpsc::UnboundedReceiver<String>,
    output_tx: watch::Sender<ValidatedInput>,
    settle_delay: Duration,
) {
    while let Some(raw) = input_rx.recv().await {
        let mut latest = raw;
        loop {
            match tokio::time::timeout(settle_delay, input_rx.recv()).await {
                // A newer edit restarts the settle window
                Ok(Some(newer)) => latest = newer,
                Ok(None) => {
                    tracing::debug!("Address input pipeline closed");
                    return;
                }
                Err(_) => {
                    publish(&output_tx, validate_input(&latest));
                    break;
                }
            }
        }
    }
    tracing::debug!("Address input settle task stopped");
}

/// Publishes only on change, so resubmitting identical input does not
/// retrigger downstream computations.
fn publish(output_tx: &watch::Sender<ValidatedInput>, input: ValidatedInput) {
    output_tx.send_if_modified(|current| {
        if *current == input {
            false
        } else {
            *current = input;
            true
        }
    });
}

fn validate_input(raw: &str) -> ValidatedInput {
    if raw.trim().is_empty() {
        return ValidatedInput::EMPTY;
    }

    match validate_wallet_address(raw) {
        Ok(address) => ValidatedInput {
            address: Some(address),
            status: AddressInputStatus::Valid,
        },
        Err(e) => {
            tracing::debug!("Rejected address input: {e}");
            ValidatedInput {
                address: None,
                status: AddressInputStatus::Invalid,
            }
        }
    }
}
