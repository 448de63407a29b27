use ponder_math::{encode_ratio, mul_div, wrapping_add};
use soroban_sdk::{contractclient, Address, Env, U256};

use crate::errors::OracleError;

#[contractclient(name = "PairClient")]
pub trait PairInterface {
    fn get_reserves(env: Env) -> (i128, i128, u32);
    fn price_0_cumulative_last(env: Env) -> U256;
    fn price_1_cumulative_last(env: Env) -> U256;
    fn token_0(env: Env) -> Address;
    fn token_1(env: Env) -> Address;
}

#[contractclient(name = "FactoryClient")]
pub trait FactoryInterface {
    fn get_pair(env: Env, token_a: Address, token_b: Address) -> Option<Address>;
}

fn block_timestamp(env: &Env) -> u32 {
    (env.ledger().timestamp() % (1u64 << 32)) as u32
}

/// Tokens of `pair`, or `InvalidPair` if it does not answer like a pool.
pub fn pair_tokens(env: &Env, pair: &Address) -> Result<(Address, Address), OracleError> {
    let client = PairClient::new(env, pair);
    let token_0 = client.try_token_0().ok().and_then(|r| r.ok());
    let token_1 = client.try_token_1().ok().and_then(|r| r.ok());
    match (token_0, token_1) {
        (Some(token_0), Some(token_1)) => Ok((token_0, token_1)),
        _ => Err(OracleError::InvalidPair),
    }
}

/// The pool's accumulators as they would read if it synced right now.
///
/// The stored values only advance when the pool's reserves change, so the
/// interval since its last update is added here at the current reserves.
pub fn current_cumulative_prices(env: &Env, pair: &Address) -> Result<(U256, U256), OracleError> {
    let client = PairClient::new(env, pair);
    let mut price_0 = client.price_0_cumulative_last();
    let mut price_1 = client.price_1_cumulative_last();
    let (reserve_0, reserve_1, timestamp_last) = client.get_reserves();

    let now = block_timestamp(env);
    if now != timestamp_last && reserve_0 > 0 && reserve_1 > 0 {
        let elapsed = U256::from_u32(env, now.wrapping_sub(timestamp_last));
        let spot_0 = encode_ratio(env, reserve_1, reserve_0).ok_or(OracleError::Overflow)?;
        let spot_1 = encode_ratio(env, reserve_0, reserve_1).ok_or(OracleError::Overflow)?;
        price_0 = wrapping_add(env, &price_0, &spot_0.mul(&elapsed));
        price_1 = wrapping_add(env, &price_1, &spot_1.mul(&elapsed));
    }
    Ok((price_0, price_1))
}

/// UQ112x112 spot price of token_0 in token_1, zero while the pool is empty.
pub fn spot_price_0(env: &Env, pair: &Address) -> U256 {
    let (reserve_0, reserve_1, _) = PairClient::new(env, pair).get_reserves();
    encode_ratio(env, reserve_1, reserve_0).unwrap_or_else(|| U256::from_u32(env, 0))
}

/// `amount_in` of `token_in` converted at the reserve ratio.
pub fn spot_quote(
    env: &Env,
    pair: &Address,
    token_0: &Address,
    token_in: &Address,
    amount_in: i128,
) -> Result<i128, OracleError> {
    let (reserve_0, reserve_1, _) = PairClient::new(env, pair).get_reserves();
    let (reserve_in, reserve_out) =
        if token_in == token_0 { (reserve_0, reserve_1) } else { (reserve_1, reserve_0) };
    if reserve_in == 0 || reserve_out == 0 {
        return Err(OracleError::InsufficientHistory);
    }
    mul_div(env, amount_in, reserve_out, reserve_in).ok_or(OracleError::Overflow)
}
