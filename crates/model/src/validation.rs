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

//! Wallet-address validation and canonicalization.
//!
//! The aggregator only ever receives addresses that passed this gate; input
//! that fails validation is represented as *absent* downstream, never as an
//! error value inside the engine.

use std::str::FromStr;

use alloy_primitives::Address;
use thiserror::Error;

/// Represents errors from wallet-address validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressValidationError {
    /// Occurs when the input is not a `0x`-prefixed 20-byte hexadecimal string.
    #[error("Address must be a 0x-prefixed 20-byte hexadecimal string: {0}")]
    InvalidFormat(String),
    /// Occurs when mixed-case input does not match its EIP-55 checksum.
    #[error("Address failed the EIP-55 checksum check: {0}")]
    ChecksumMismatch(String),
}

/// Validates raw text as a wallet address and returns its canonical form.
///
/// Uniform-case input (all-lowercase or all-uppercase hex letters) carries no
/// checksum information and is accepted on shape alone. Mixed-case input must
/// match the EIP-55 checksum casing exactly. The canonical display form of the
/// returned address is the checksum casing ([`Address::to_checksum`]).
///
/// # Errors
///
/// Returns [`AddressValidationError::InvalidFormat`] if the input is not a
/// `0x`-prefixed 40-digit hexadecimal string, or
/// [`AddressValidationError::ChecksumMismatch`] if mixed-case input fails the
/// checksum check.
pub fn validate_wallet_address(raw: &str) -> Result<Address, AddressValidationError> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .ok_or_else(|| AddressValidationError::InvalidFormat(trimmed.to_string()))?;

    if digits.len() != 40 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(AddressValidationError::InvalidFormat(trimmed.to_string()));
    }

    let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
    let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());

    if has_upper && has_lower {
        Address::parse_checksummed(trimmed, None)
            .map_err(|_| AddressValidationError::ChecksumMismatch(trimmed.to_string()))
    } else {
        Address::from_str(trimmed)
            .map_err(|_| AddressValidationError::InvalidFormat(trimmed.to_string()))
    }
}
