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

use std::{env, str::FromStr};

use alloy::primitives::Address;
use anyhow::Context;
use govtally_engine::{VotingPowerEngine, VotingPowerEngineConfig};
use govtally_model::{
    balances::{BalanceSnapshot, ComputationState, WeightedTotal},
    chain::{ChainEndpoint, ChainLayer},
};

// Run with `cargo run -p govtally-engine --bin voting_power`
//
// Required environment (dotenv supported):
//   BASE_RPC_HTTP_URL, BASE_DEBT_SHARE_ADDRESS
//   ROLLUP_RPC_HTTP_URL, ROLLUP_DEBT_SHARE_ADDRESS
// Optional:
//   WALLET_ADDRESS — a wallet to query against the ecosystem baseline
//   BASE_CHAIN_ID / ROLLUP_CHAIN_ID — default 1 / 10
// To see additional tracing logs `export RUST_LOG=debug`

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let base = endpoint_from_env(ChainLayer::Base, "BASE", 1)?;
    let rollup = endpoint_from_env(ChainLayer::Rollup, "ROLLUP", 10)?;
    let config = VotingPowerEngineConfig::new(base, rollup);

    let mut engine = VotingPowerEngine::new(config);
    engine.start().await?;

    log_snapshot("Ecosystem", &engine.baseline());

    if let Ok(wallet_address) = env::var("WALLET_ADDRESS") {
        let mut wallet_rx = engine.subscribe_wallet();
        engine.submit_address_input(&wallet_address);

        loop {
            wallet_rx.changed().await?;
            let snapshot = wallet_rx.borrow_and_update().clone();
            match snapshot.state {
                ComputationState::Resolved => {
                    log_snapshot(&format!("Wallet {wallet_address}"), &snapshot);
                    break;
                }
                ComputationState::Reset => {
                    tracing::warn!(
                        "No voting power computed for input '{wallet_address}': {:?}",
                        engine.address_input().status
                    );
                    break;
                }
                _ => {}
            }
        }
    }

    engine.stop().await;
    Ok(())
}

fn endpoint_from_env(
    layer: ChainLayer,
    prefix: &str,
    default_chain_id: u32,
) -> anyhow::Result<ChainEndpoint> {
    let http_rpc_url =
        env::var(format!("{prefix}_RPC_HTTP_URL")).context(format!("{prefix}_RPC_HTTP_URL"))?;
    let debt_share_address = Address::from_str(
        &env::var(format!("{prefix}_DEBT_SHARE_ADDRESS"))
            .context(format!("{prefix}_DEBT_SHARE_ADDRESS"))?,
    )?;
    let chain_id = match env::var(format!("{prefix}_CHAIN_ID")) {
        Ok(value) => value.parse()?,
        Err(_) => default_chain_id,
    };

    Ok(ChainEndpoint::new(
        layer,
        chain_id,
        http_rpc_url,
        debt_share_address,
    ))
}

fn log_snapshot(subject: &str, snapshot: &BalanceSnapshot) {
    let power = &snapshot.power;
    tracing::info!("{subject} voting power:");
    log_total("L1", &power.l1);
    log_total("L2", &power.l2);
    log_total("Linear total", &power.linear_total);
    log_total("Sqrt total", &power.sqrt_total);
}

fn log_total(label: &str, total: &WeightedTotal) {
    let percent = total
        .percent
        .map_or_else(|| "-".to_string(), |p| format!("{p}%"));
    tracing::info!("  {label}: {} ({percent})", total.value);
}
