use ponder_math::{encode_ratio, wrapping_add};
use soroban_sdk::{Env, U256};

use crate::{errors::PairError, math::MAX_RESERVE, storage::PairStorage};

// Cumulative price accumulation (TWAP support).
// The oracle contract samples these accumulators; the pair only integrates.

/// Ledger timestamp truncated to 32 bits, the width stored alongside the
/// reserves.
pub fn block_timestamp(env: &Env) -> u32 {
    (env.ledger().timestamp() % (1u64 << 32)) as u32
}

/// Adds `price * elapsed` for both directions, using the reserves that
/// were in force during the elapsed interval.
///
/// Intervals where either reserve is zero contribute nothing.
pub fn update_cumulative_prices(
    env: &Env,
    reserve_0: i128,
    reserve_1: i128,
    time_elapsed: u32,
    price_0_cumulative: &mut U256,
    price_1_cumulative: &mut U256,
) -> Result<(), PairError> {
    if time_elapsed == 0 || reserve_0 == 0 || reserve_1 == 0 {
        return Ok(());
    }
    let elapsed = U256::from_u32(env, time_elapsed);
    let price_0 = encode_ratio(env, reserve_1, reserve_0).ok_or(PairError::Overflow)?;
    let price_1 = encode_ratio(env, reserve_0, reserve_1).ok_or(PairError::Overflow)?;

    *price_0_cumulative = wrapping_add(env, price_0_cumulative, &price_0.mul(&elapsed));
    *price_1_cumulative = wrapping_add(env, price_1_cumulative, &price_1.mul(&elapsed));
    Ok(())
}

/// Writes new reserves into `state`.
///
/// The accumulators are advanced with the *old* reserves before they are
/// overwritten; reversing the order would price the elapsed interval at
/// the post-trade ratio.
pub fn update_reserves(
    env: &Env,
    state: &mut PairStorage,
    balance_0: i128,
    balance_1: i128,
) -> Result<(), PairError> {
    if !(0..=MAX_RESERVE).contains(&balance_0) || !(0..=MAX_RESERVE).contains(&balance_1) {
        return Err(PairError::Overflow);
    }
    let now = block_timestamp(env);
    let elapsed = now.wrapping_sub(state.block_timestamp_last);

    update_cumulative_prices(
        env,
        state.reserve_0,
        state.reserve_1,
        elapsed,
        &mut state.price_0_cumulative_last,
        &mut state.price_1_cumulative_last,
    )?;

    state.reserve_0 = balance_0;
    state.reserve_1 = balance_1;
    state.block_timestamp_last = now;
    Ok(())
}
