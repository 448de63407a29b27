//! UQ112x112 fixed-point values and modular 256-bit arithmetic.
//!
//! A UQ112x112 number is a `U256` whose low 112 bits are the fraction.
//! Cumulative price accumulators are sums of such numbers multiplied by
//! elapsed seconds and are allowed to wrap modulo 2^256, so consumers must
//! only ever look at differences taken with [`wrapping_sub`].

use soroban_sdk::{Env, U256};

use crate::{to_i128, to_u256};

/// Number of fractional bits.
pub const RESOLUTION: u32 = 112;

fn max_u256(env: &Env) -> U256 {
    U256::from_parts(env, u64::MAX, u64::MAX, u64::MAX, u64::MAX)
}

/// `numerator / denominator` as UQ112x112.
pub fn encode_ratio(env: &Env, numerator: i128, denominator: i128) -> Option<U256> {
    if denominator <= 0 {
        return None;
    }
    let scaled = to_u256(env, numerator)?.shl(RESOLUTION);
    Some(scaled.div(&to_u256(env, denominator)?))
}

/// `(a + b) mod 2^256`.
pub fn wrapping_add(env: &Env, a: &U256, b: &U256) -> U256 {
    let headroom = max_u256(env).sub(a);
    if *b > headroom {
        b.sub(&headroom).sub(&U256::from_u32(env, 1))
    } else {
        a.add(b)
    }
}

/// `(a - b) mod 2^256`.
pub fn wrapping_sub(env: &Env, a: &U256, b: &U256) -> U256 {
    if *a >= *b {
        a.sub(b)
    } else {
        max_u256(env).sub(b).add(a).add(&U256::from_u32(env, 1))
    }
}

/// Multiplies a UQ112x112 value by an integer amount and drops the fraction.
///
/// Split into integer and fractional parts so that neither partial product
/// can exceed 256 bits.
pub fn mul_decode(env: &Env, value: &U256, amount: i128) -> Option<i128> {
    let amount_wide = to_u256(env, amount)?;
    let integer = value.shr(RESOLUTION);
    let fraction = value.sub(&integer.shl(RESOLUTION));

    let whole = to_i128(&integer)?.checked_mul(amount)?;
    let partial = to_i128(&fraction.mul(&amount_wide).shr(RESOLUTION))?;
    whole.checked_add(partial)
}
