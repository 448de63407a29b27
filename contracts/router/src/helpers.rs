use ponder_math::{mul_div, mul_wide, to_i128, to_u256};
use soroban_sdk::{contractclient, Address, Bytes, Env, Vec};

use crate::errors::RouterError;

#[contractclient(name = "FactoryClient")]
pub trait FactoryInterface {
    fn get_pair(env: Env, token_a: Address, token_b: Address) -> Option<Address>;
    fn create_pair(env: Env, token_a: Address, token_b: Address) -> Address;
}

#[contractclient(name = "PairClient")]
pub trait PairInterface {
    fn get_reserves(env: Env) -> (i128, i128, u32);
    fn mint(env: Env, to: Address) -> i128;
    fn burn(env: Env, to: Address) -> (i128, i128);
    fn swap(env: Env, amount_0_out: i128, amount_1_out: i128, to: Address, data: Bytes);
    fn transfer(env: Env, from: Address, to: Address, amount: i128);
}

const FEE_FACTOR: i128 = 997;
const FEE_SCALE: i128 = 1_000;

/// Orders two token addresses the way the factory keys its pools.
pub fn sort_tokens(token_a: &Address, token_b: &Address) -> Result<(Address, Address), RouterError> {
    if token_a == token_b {
        return Err(RouterError::IdenticalAddresses);
    }
    if token_a < token_b {
        Ok((token_a.clone(), token_b.clone()))
    } else {
        Ok((token_b.clone(), token_a.clone()))
    }
}

pub fn pair_for(
    env: &Env,
    factory: &Address,
    token_a: &Address,
    token_b: &Address,
) -> Result<Address, RouterError> {
    sort_tokens(token_a, token_b)?;
    FactoryClient::new(env, factory)
        .get_pair(token_a, token_b)
        .ok_or(RouterError::PairNotFound)
}

/// Reserves of the `(token_a, token_b)` pool in the caller's order.
pub fn get_reserves(
    env: &Env,
    factory: &Address,
    token_a: &Address,
    token_b: &Address,
) -> Result<(i128, i128), RouterError> {
    let (token_0, _) = sort_tokens(token_a, token_b)?;
    let pair = pair_for(env, factory, token_a, token_b)?;
    let (reserve_0, reserve_1, _) = PairClient::new(env, &pair).get_reserves();
    if *token_a == token_0 {
        Ok((reserve_0, reserve_1))
    } else {
        Ok((reserve_1, reserve_0))
    }
}

/// `amount_a` of token A expressed in token B at the reserve ratio, no fee.
pub fn quote(env: &Env, amount_a: i128, reserve_a: i128, reserve_b: i128) -> Result<i128, RouterError> {
    if amount_a <= 0 {
        return Err(RouterError::InsufficientAmount);
    }
    if reserve_a <= 0 || reserve_b <= 0 {
        return Err(RouterError::InsufficientLiquidity);
    }
    mul_div(env, amount_a, reserve_b, reserve_a).ok_or(RouterError::Overflow)
}

/// Maximum output for an exact input after the 0.3% fee:
/// `in*997*r_out / (r_in*1000 + in*997)`.
pub fn get_amount_out(
    env: &Env,
    amount_in: i128,
    reserve_in: i128,
    reserve_out: i128,
) -> Result<i128, RouterError> {
    if amount_in <= 0 {
        return Err(RouterError::InsufficientInputAmount);
    }
    if reserve_in <= 0 || reserve_out <= 0 {
        return Err(RouterError::InsufficientLiquidity);
    }
    let amount_in_with_fee = amount_in.checked_mul(FEE_FACTOR).ok_or(RouterError::Overflow)?;
    let numerator = mul_wide(env, amount_in_with_fee, reserve_out).ok_or(RouterError::Overflow)?;
    let denominator = reserve_in
        .checked_mul(FEE_SCALE)
        .and_then(|scaled| to_u256(env, scaled))
        .ok_or(RouterError::Overflow)?
        .add(&to_u256(env, amount_in_with_fee).ok_or(RouterError::Overflow)?);
    to_i128(&numerator.div(&denominator)).ok_or(RouterError::Overflow)
}

/// Minimum input that yields `amount_out`:
/// `r_in*out*1000 / ((r_out - out)*997) + 1`.
pub fn get_amount_in(
    env: &Env,
    amount_out: i128,
    reserve_in: i128,
    reserve_out: i128,
) -> Result<i128, RouterError> {
    if amount_out <= 0 {
        return Err(RouterError::InsufficientOutputAmount);
    }
    if reserve_in <= 0 || reserve_out <= 0 || amount_out >= reserve_out {
        return Err(RouterError::InsufficientLiquidity);
    }
    let scaled_reserve = reserve_in.checked_mul(FEE_SCALE).ok_or(RouterError::Overflow)?;
    let numerator = mul_wide(env, scaled_reserve, amount_out).ok_or(RouterError::Overflow)?;
    let denominator = (reserve_out - amount_out)
        .checked_mul(FEE_FACTOR)
        .and_then(|d| to_u256(env, d))
        .ok_or(RouterError::Overflow)?;
    to_i128(&numerator.div(&denominator))
        .and_then(|amount| amount.checked_add(1))
        .ok_or(RouterError::Overflow)
}

fn check_path(path: &Vec<Address>) -> Result<(), RouterError> {
    if path.len() < 2 {
        return Err(RouterError::InvalidPath);
    }
    Ok(())
}

/// Chains `get_amount_out` over every hop of `path`.
pub fn get_amounts_out(
    env: &Env,
    factory: &Address,
    amount_in: i128,
    path: &Vec<Address>,
) -> Result<Vec<i128>, RouterError> {
    check_path(path)?;
    let mut amounts = Vec::new(env);
    amounts.push_back(amount_in);
    let mut current = amount_in;
    for i in 0..path.len() - 1 {
        let (input, output) = hop(path, i)?;
        let (reserve_in, reserve_out) = get_reserves(env, factory, &input, &output)?;
        current = get_amount_out(env, current, reserve_in, reserve_out)?;
        amounts.push_back(current);
    }
    Ok(amounts)
}

/// Chains `get_amount_in` backwards from the last hop of `path`.
pub fn get_amounts_in(
    env: &Env,
    factory: &Address,
    amount_out: i128,
    path: &Vec<Address>,
) -> Result<Vec<i128>, RouterError> {
    check_path(path)?;
    let mut amounts = Vec::new(env);
    amounts.push_front(amount_out);
    let mut current = amount_out;
    for i in (0..path.len() - 1).rev() {
        let (input, output) = hop(path, i)?;
        let (reserve_in, reserve_out) = get_reserves(env, factory, &input, &output)?;
        current = get_amount_in(env, current, reserve_in, reserve_out)?;
        amounts.push_front(current);
    }
    Ok(amounts)
}

/// The `(input, output)` tokens of hop `i`.
pub fn hop(path: &Vec<Address>, i: u32) -> Result<(Address, Address), RouterError> {
    match (path.get(i), path.get(i + 1)) {
        (Some(input), Some(output)) => Ok((input, output)),
        _ => Err(RouterError::InvalidPath),
    }
}

/// Output amounts in pair order for a hop that sends `amount_out` of
/// `output`.
pub fn pair_outputs(
    input: &Address,
    output: &Address,
    amount_out: i128,
) -> Result<(i128, i128), RouterError> {
    let (token_0, _) = sort_tokens(input, output)?;
    if *input == token_0 {
        Ok((0, amount_out))
    } else {
        Ok((amount_out, 0))
    }
}
