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

//! Arbitrary-precision math for voting-power aggregation.
//!
//! Debt-share totals are 256-bit base-unit integers (10^24 and beyond), so both
//! the floor square root and the percentage normalization stay in pure integer
//! arithmetic end to end. Floating point appears only behind [`Percent::as_f64`]
//! for edge-of-system consumers; it is never part of a computation.

use std::fmt::{Display, Formatter};

use alloy_primitives::{I256, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One percent expressed in [`Percent`]'s fixed-point scale.
const THOUSANDTHS_PER_PERCENT: u64 = 1000;

/// Scaling factor applied to the numerator when normalizing a percentage,
/// yielding thousandths of a percent after the integer division.
const PERCENT_NUMERATOR_SCALE: u64 = 100 * THOUSANDTHS_PER_PERCENT;

/// Represents errors from the voting-power math primitives.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MathError {
    /// Occurs when a square root is requested for a negative value.
    #[error("Square root is undefined for negative value {0}")]
    NegativeSquareRoot(I256),
    /// Occurs when a percentage is requested against a zero denominator.
    #[error("Percentage denominator must be non-zero")]
    ZeroDenominator,
    /// Occurs when a percentage does not fit the fixed-point representation.
    #[error("Percentage value exceeds the representable range")]
    PercentOverflow,
}

/// A percentage with one displayed decimal digit, stored as thousandths of a
/// percent.
///
/// The fixed-point representation keeps normalization reproducible: two
/// computations over identical inputs always yield bit-identical values, which
/// `f64` division cannot guarantee across platforms.
#[derive(
    Debug, Clone, Copy, Default, Hash, PartialOrd, PartialEq, Ord, Eq, Serialize, Deserialize,
)]
pub struct Percent(u64);

impl Percent {
    /// Zero percent.
    pub const ZERO: Self = Self(0);
    /// Exactly one hundred percent.
    pub const ONE_HUNDRED: Self = Self(100 * THOUSANDTHS_PER_PERCENT);

    /// Creates a new [`Percent`] from a value in thousandths of a percent.
    #[must_use]
    pub const fn from_thousandths(thousandths: u64) -> Self {
        Self(thousandths)
    }

    /// Returns the underlying value in thousandths of a percent.
    #[must_use]
    pub const fn as_thousandths(self) -> u64 {
        self.0
    }

    /// Lossy conversion for edge-of-system consumers that demand a float.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / THOUSANDTHS_PER_PERCENT as f64
    }
}

impl Display for Percent {
    /// Renders with exactly one decimal digit, truncating finer precision.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let whole = self.0 / THOUSANDTHS_PER_PERCENT;
        let tenths = (self.0 % THOUSANDTHS_PER_PERCENT) / 100;
        write!(f, "{whole}.{tenths}")
    }
}

/// Returns the floor square root of `value`.
///
/// Integer Newton iteration seeded at 1: `x1 = (value / x0 + x0) / 2`,
/// terminating when the iterate converges (`x1 == x0`) or oscillates around the
/// fixed point (`x1 == x0 + 1`), in which case the smaller of the pair is the
/// floor root. Exact for the full `U256` range.
#[must_use]
pub fn isqrt(value: U256) -> U256 {
    if value < U256::from(2u8) {
        return value;
    }

    let one = U256::from(1u8);
    // First iterate from seed 1 is (value + 1) / 2; the addition wraps at
    // U256::MAX, so it is computed shift-first. Every later sum stays below
    // value / 2 + x0 and cannot overflow.
    let mut x0 = (value >> 1) + (value & one);
    loop {
        let x1 = (value / x0 + x0) >> 1;
        if x1 == x0 || x1 == x0 + one {
            return x0;
        }
        x0 = x1;
    }
}

/// Returns the floor square root of a signed value, rejecting negative input.
///
/// # Errors
///
/// Returns [`MathError::NegativeSquareRoot`] if `value` is negative; this is a
/// programming-contract violation and fails only the offending call.
pub fn checked_isqrt(value: I256) -> Result<U256, MathError> {
    if value.is_negative() {
        return Err(MathError::NegativeSquareRoot(value));
    }
    Ok(isqrt(value.into_raw()))
}

/// Computes `part / whole * 100` as a fixed-point [`Percent`].
///
/// The numerator is scaled by 100,000 before the integer division, so the
/// result carries thousandths-of-a-percent precision with no floating point
/// involved.
///
/// # Errors
///
/// Returns [`MathError::ZeroDenominator`] if `whole` is zero (callers must
/// guard; the aggregator substitutes an absent percentage instead of invoking
/// this function), or [`MathError::PercentOverflow`] if the scaled numerator
/// overflows 256 bits or the result exceeds the fixed-point range.
pub fn percent_of(part: U256, whole: U256) -> Result<Percent, MathError> {
    if whole.is_zero() {
        return Err(MathError::ZeroDenominator);
    }

    let scaled = part
        .checked_mul(U256::from(PERCENT_NUMERATOR_SCALE))
        .ok_or(MathError::PercentOverflow)?
        / whole;

    let thousandths = u64::try_from(scaled).map_err(|_| MathError::PercentOverflow)?;
    Ok(Percent::from_thousandths(thousandths))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use proptest::prelude::*;
    use rstest::rstest;

    use super::*;

    fn u256_dec(s: &str) -> U256 {
        U256::from_str(s).unwrap()
    }

    #[rstest]
    #[case(0u64, 0u64)]
    #[case(1, 1)]
    #[case(2, 1)]
    #[case(3, 1)]
    #[case(4, 2)]
    #[case(8, 2)]
    #[case(9, 3)]
    #[case(1000, 31)]
    #[case(961, 31)]
    #[case(1023, 31)]
    #[case(1024, 32)]
    fn test_isqrt_small_values(#[case] value: u64, #[case] expected: u64) {
        assert_eq!(isqrt(U256::from(value)), U256::from(expected));
    }

    #[rstest]
    fn test_isqrt_beyond_native_range() {
        // 10^24 is a realistic debt-share total in base units
        let value = u256_dec("1000000000000000000000000");
        assert_eq!(isqrt(value), u256_dec("1000000000000"));

        // One below the next perfect square still floors down
        let below = u256_dec("1000000000002000000000000"); // (10^12 + 1)^2 - 1
        assert_eq!(isqrt(below), u256_dec("1000000000000"));
    }

    #[rstest]
    fn test_isqrt_max_value() {
        let root = isqrt(U256::MAX);
        assert!(root * root <= U256::MAX);
        // root is the full 128-bit all-ones value, so (root + 1)^2 overflows;
        // equality with 2^128 - 1 is the strongest upper-bound check available.
        assert_eq!(root, U256::from(u128::MAX));
    }

    #[rstest]
    fn test_checked_isqrt_rejects_negative() {
        let result = checked_isqrt(I256::from_str("-1").unwrap());
        assert_eq!(
            result,
            Err(MathError::NegativeSquareRoot(I256::from_str("-1").unwrap()))
        );
    }

    #[rstest]
    fn test_checked_isqrt_non_negative() {
        let value = I256::from_str("1000000000000000000000000").unwrap();
        assert_eq!(
            checked_isqrt(value).unwrap(),
            u256_dec("1000000000000")
        );
        assert_eq!(checked_isqrt(I256::ZERO).unwrap(), U256::ZERO);
    }

    #[rstest]
    #[case(600u64, 1000u64, 60_000u64)]
    #[case(400, 1000, 40_000)]
    #[case(0, 1000, 0)]
    #[case(1000, 1000, 100_000)]
    #[case(10, 31, 32_258)]
    #[case(1, 3, 33_333)]
    fn test_percent_of_thousandths(
        #[case] part: u64,
        #[case] whole: u64,
        #[case] expected: u64,
    ) {
        let percent = percent_of(U256::from(part), U256::from(whole)).unwrap();
        assert_eq!(percent.as_thousandths(), expected);
    }

    #[rstest]
    fn test_percent_of_zero_denominator() {
        assert_eq!(
            percent_of(U256::from(1u8), U256::ZERO),
            Err(MathError::ZeroDenominator)
        );
    }

    #[rstest]
    fn test_percent_of_overflow() {
        assert_eq!(
            percent_of(U256::MAX, U256::from(1u8)),
            Err(MathError::PercentOverflow)
        );
    }

    #[rstest]
    #[case(Percent::from_thousandths(32_258), "32.2")]
    #[case(Percent::from_thousandths(32_299), "32.2")]
    #[case(Percent::ONE_HUNDRED, "100.0")]
    #[case(Percent::ZERO, "0.0")]
    #[case(Percent::from_thousandths(60_000), "60.0")]
    #[case(Percent::from_thousandths(999), "0.9")]
    fn test_percent_display_one_decimal(#[case] percent: Percent, #[case] expected: &str) {
        assert_eq!(percent.to_string(), expected);
    }

    #[rstest]
    fn test_percent_as_f64() {
        assert_eq!(Percent::from_thousandths(32_258).as_f64(), 32.258);
        assert_eq!(Percent::ONE_HUNDRED.as_f64(), 100.0);
    }

    proptest! {
        #[test]
        fn prop_isqrt_is_floor_root(n in any::<u128>()) {
            let value = U256::from(n);
            let root = isqrt(value);
            let next = root + U256::from(1u8);
            prop_assert!(root * root <= value);
            prop_assert!(next * next > value);
        }

        #[test]
        fn prop_percent_of_bounded(a in any::<u128>(), b in 1u128..=u128::MAX) {
            let (part, whole) = if a <= b { (a, b) } else { (b, a) };
            let percent = percent_of(U256::from(part), U256::from(whole)).unwrap();
            prop_assert!(percent <= Percent::ONE_HUNDRED);
        }

        #[test]
        fn prop_percent_of_is_deterministic(part in any::<u64>(), whole in 1u64..=u64::MAX) {
            let lhs = percent_of(U256::from(part), U256::from(whole)).unwrap();
            let rhs = percent_of(U256::from(part), U256::from(whole)).unwrap();
            prop_assert_eq!(lhs, rhs);
        }
    }
}
