//! Reserve and share arithmetic for the pair.
//! Products of reserves can reach 2^224, so they are always taken in U256.

use ponder_math::{mul_div, mul_wide, sqrt, to_i128, to_u256};
use soroban_sdk::{Env, U256};

use crate::errors::PairError;

/// Minimum liquidity locked on first mint to prevent division by zero.
pub const MINIMUM_LIQUIDITY: i128 = 1_000;
/// Reserves are bounded to 112 bits.
pub const MAX_RESERVE: i128 = (1 << 112) - 1;
/// Swap fee of 0.3% expressed over `FEE_DENOMINATOR`.
pub const FEE_NUMERATOR: i128 = 3;
pub const FEE_DENOMINATOR: i128 = 1_000;

/// Shares for the very first deposit, before the sink's cut is removed.
pub fn initial_liquidity(env: &Env, amount_0: i128, amount_1: i128) -> Result<i128, PairError> {
    let product = mul_wide(env, amount_0, amount_1).ok_or(PairError::Overflow)?;
    let root = sqrt(env, &product);
    i128::try_from(root).map_err(|_| PairError::Overflow)
}

/// Shares for a deposit into a non-empty pool; the smaller side wins so
/// that an unbalanced deposit donates the excess to existing holders.
pub fn proportional_liquidity(
    env: &Env,
    amount_0: i128,
    amount_1: i128,
    total_supply: i128,
    reserve_0: i128,
    reserve_1: i128,
) -> Result<i128, PairError> {
    let by_0 = mul_div(env, amount_0, total_supply, reserve_0).ok_or(PairError::Overflow)?;
    let by_1 = mul_div(env, amount_1, total_supply, reserve_1).ok_or(PairError::Overflow)?;
    Ok(by_0.min(by_1))
}

/// Pro-rata share of `balance` for `liquidity` out of `total_supply`.
pub fn redeem_amount(
    env: &Env,
    liquidity: i128,
    balance: i128,
    total_supply: i128,
) -> Result<i128, PairError> {
    mul_div(env, liquidity, balance, total_supply).ok_or(PairError::Overflow)
}

/// Fee-adjusted constant-product check, scaled by 1000 on each side:
/// `(b0*1000 - in0*3) * (b1*1000 - in1*3) >= r0 * r1 * 1000^2`.
pub fn fee_adjusted_k_holds(
    env: &Env,
    balance_0: i128,
    balance_1: i128,
    amount_0_in: i128,
    amount_1_in: i128,
    reserve_0: i128,
    reserve_1: i128,
) -> Result<bool, PairError> {
    let adjusted_0 = adjusted_balance(balance_0, amount_0_in)?;
    let adjusted_1 = adjusted_balance(balance_1, amount_1_in)?;

    let lhs = mul_wide(env, adjusted_0, adjusted_1).ok_or(PairError::Overflow)?;
    let scale = U256::from_u128(env, (FEE_DENOMINATOR * FEE_DENOMINATOR) as u128);
    let rhs = mul_wide(env, reserve_0, reserve_1)
        .ok_or(PairError::Overflow)?
        .mul(&scale);
    Ok(lhs >= rhs)
}

fn adjusted_balance(balance: i128, amount_in: i128) -> Result<i128, PairError> {
    balance
        .checked_mul(FEE_DENOMINATOR)
        .and_then(|scaled| scaled.checked_sub(amount_in.checked_mul(FEE_NUMERATOR)?))
        .filter(|adjusted| *adjusted >= 0)
        .ok_or(PairError::Overflow)
}

/// Shares owed to the protocol for the growth of sqrt(k) since `k_last`:
/// `supply * (root_k - root_k_last) / (5 * root_k + root_k_last)`,
/// i.e. one sixth of the fee growth.
pub fn protocol_fee_liquidity(
    env: &Env,
    total_supply: i128,
    k: &U256,
    k_last: &U256,
) -> Result<i128, PairError> {
    let root_k = sqrt(env, k);
    let root_k_last = sqrt(env, k_last);
    if root_k <= root_k_last {
        return Ok(0);
    }
    let root_k = i128::try_from(root_k).map_err(|_| PairError::Overflow)?;
    let root_k_last = i128::try_from(root_k_last).map_err(|_| PairError::Overflow)?;

    let growth = root_k - root_k_last;
    let denominator = root_k
        .checked_mul(5)
        .and_then(|v| v.checked_add(root_k_last))
        .ok_or(PairError::Overflow)?;
    let numerator = to_u256(env, total_supply)
        .ok_or(PairError::Overflow)?
        .mul(&to_u256(env, growth).ok_or(PairError::Overflow)?);
    let shares = numerator.div(&to_u256(env, denominator).ok_or(PairError::Overflow)?);
    to_i128(&shares).ok_or(PairError::Overflow)
}
