#![no_std]
//! Integer and fixed-point helpers shared by the pair, router and oracle.
//!
//! Every value that can outgrow `i128` is computed in `soroban_sdk::U256`.
//! Functions return `Option` and leave the error mapping to the calling
//! contract, which knows its own error enum.

pub mod fixed_point;

#[cfg(test)]
extern crate std;

use soroban_sdk::{Env, U256};

pub use fixed_point::{encode_ratio, mul_decode, wrapping_add, wrapping_sub, RESOLUTION};

/// Converts a non-negative `i128` into a `U256`.
pub fn to_u256(env: &Env, value: i128) -> Option<U256> {
    if value < 0 {
        return None;
    }
    Some(U256::from_u128(env, value as u128))
}

/// Narrows a `U256` back to `i128`, failing above `i128::MAX`.
pub fn to_i128(value: &U256) -> Option<i128> {
    let wide = value.to_u128()?;
    if wide > i128::MAX as u128 {
        return None;
    }
    Some(wide as i128)
}

/// `floor(a * b / denominator)` with a 256-bit intermediate product.
pub fn mul_div(env: &Env, a: i128, b: i128, denominator: i128) -> Option<i128> {
    if denominator <= 0 {
        return None;
    }
    let product = to_u256(env, a)?.mul(&to_u256(env, b)?);
    to_i128(&product.div(&to_u256(env, denominator)?))
}

/// `a * b` as a `U256`; both factors must be non-negative.
pub fn mul_wide(env: &Env, a: i128, b: i128) -> Option<U256> {
    Some(to_u256(env, a)?.mul(&to_u256(env, b)?))
}

/// Integer square root (floor) of a `u128` by Newton's method.
pub fn sqrt_u128(value: u128) -> u128 {
    if value == 0 {
        return 0;
    }
    let mut x = value;
    let mut y = x / 2 + 1;
    while y < x {
        x = y;
        y = (x + value / x) / 2;
    }
    x
}

/// Integer square root (floor) of a 256-bit value.
///
/// Values that fit in 128 bits take the Newton path; larger ones are
/// bisected over `0..=u128::MAX`, whose squares never overflow 256 bits.
pub fn sqrt(env: &Env, value: &U256) -> u128 {
    if let Some(narrow) = value.to_u128() {
        return sqrt_u128(narrow);
    }
    let mut lo: u128 = 0;
    let mut hi: u128 = u128::MAX;
    while lo < hi {
        let mid = hi - (hi - lo) / 2;
        let wide = U256::from_u128(env, mid);
        if wide.mul(&wide) <= *value {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    lo
}
