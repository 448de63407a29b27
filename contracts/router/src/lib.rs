#![no_std]

mod errors;
mod helpers;
mod storage;

#[cfg(test)]
extern crate std;

#[cfg(test)]
mod test;

pub use errors::RouterError;
use helpers::{pair_for, pair_outputs, FactoryClient, PairClient};
use soroban_sdk::{contract, contractimpl, token::TokenClient, Address, Bytes, Env, Vec};
use storage::{get_factory, has_factory, set_factory};

#[contract]
pub struct Router;

fn factory_address(env: &Env) -> Result<Address, RouterError> {
    get_factory(env).ok_or(RouterError::NotInitialized)
}

fn ensure_deadline(env: &Env, deadline: u64) -> Result<(), RouterError> {
    if env.ledger().timestamp() > deadline {
        return Err(RouterError::ExpiredDeadline);
    }
    Ok(())
}

/// Sends the router's whole balance of `token` to `to`.
fn forward_balance(env: &Env, token: &Address, router: &Address, to: &Address) -> i128 {
    let client = TokenClient::new(env, token);
    let received = client.balance(router);
    if received > 0 {
        client.transfer(router, to, &received);
    }
    received
}

/// Works out how much of each token to deposit so the pool ratio is kept.
#[allow(clippy::too_many_arguments)]
fn optimal_deposit(
    env: &Env,
    factory: &Address,
    token_a: &Address,
    token_b: &Address,
    amount_a_desired: i128,
    amount_b_desired: i128,
    amount_a_min: i128,
    amount_b_min: i128,
) -> Result<(i128, i128), RouterError> {
    let factory_client = FactoryClient::new(env, factory);
    if factory_client.get_pair(token_a, token_b).is_none() {
        factory_client.create_pair(token_a, token_b);
    }

    let (reserve_a, reserve_b) = helpers::get_reserves(env, factory, token_a, token_b)?;
    if reserve_a == 0 && reserve_b == 0 {
        return Ok((amount_a_desired, amount_b_desired));
    }

    let amount_b_optimal = helpers::quote(env, amount_a_desired, reserve_a, reserve_b)?;
    if amount_b_optimal <= amount_b_desired {
        if amount_b_optimal < amount_b_min {
            return Err(RouterError::InsufficientBAmount);
        }
        return Ok((amount_a_desired, amount_b_optimal));
    }

    let amount_a_optimal = helpers::quote(env, amount_b_desired, reserve_b, reserve_a)?;
    if amount_a_optimal > amount_a_desired || amount_a_optimal < amount_a_min {
        return Err(RouterError::InsufficientAAmount);
    }
    Ok((amount_a_optimal, amount_b_desired))
}

/// Executes a precomputed route. Each hop's output goes straight to the
/// next pool; the last one goes to `to`.
fn swap_along(
    env: &Env,
    factory: &Address,
    amounts: &Vec<i128>,
    path: &Vec<Address>,
    to: &Address,
) -> Result<(), RouterError> {
    let hops = path.len() - 1;
    for i in 0..hops {
        let (input, output) = helpers::hop(path, i)?;
        let amount_out = amounts.get(i + 1).ok_or(RouterError::InvalidPath)?;
        let (amount_0_out, amount_1_out) = pair_outputs(&input, &output, amount_out)?;
        let recipient = if i + 1 < hops {
            let (_, next) = helpers::hop(path, i + 1)?;
            pair_for(env, factory, &output, &next)?
        } else {
            to.clone()
        };
        PairClient::new(env, &pair_for(env, factory, &input, &output)?).swap(
            &amount_0_out,
            &amount_1_out,
            &recipient,
            &Bytes::new(env),
        );
    }
    Ok(())
}

/// Like [`swap_along`], but derives each hop's input from what the pool
/// actually received, for tokens that take a cut on transfer.
fn swap_along_supporting_fee(
    env: &Env,
    factory: &Address,
    path: &Vec<Address>,
    to: &Address,
) -> Result<(), RouterError> {
    let hops = path.len() - 1;
    for i in 0..hops {
        let (input, output) = helpers::hop(path, i)?;
        let pair = pair_for(env, factory, &input, &output)?;
        let (reserve_input, reserve_output) =
            helpers::get_reserves(env, factory, &input, &output)?;
        let amount_input = TokenClient::new(env, &input).balance(&pair) - reserve_input;
        let amount_output =
            helpers::get_amount_out(env, amount_input, reserve_input, reserve_output)?;

        let (amount_0_out, amount_1_out) = pair_outputs(&input, &output, amount_output)?;
        let recipient = if i + 1 < hops {
            let (_, next) = helpers::hop(path, i + 1)?;
            pair_for(env, factory, &output, &next)?
        } else {
            to.clone()
        };
        PairClient::new(env, &pair).swap(
            &amount_0_out,
            &amount_1_out,
            &recipient,
            &Bytes::new(env),
        );
    }
    Ok(())
}

fn first_hop_pair(env: &Env, factory: &Address, path: &Vec<Address>) -> Result<Address, RouterError> {
    let (input, output) = helpers::hop(path, 0)?;
    pair_for(env, factory, &input, &output)
}

#[contractimpl]
impl Router {
    pub fn initialize(env: Env, factory: Address) -> Result<(), RouterError> {
        if has_factory(&env) {
            return Err(RouterError::AlreadyInitialized);
        }
        set_factory(&env, &factory);
        storage::extend_instance_ttl(&env);
        Ok(())
    }

    pub fn factory(env: Env) -> Result<Address, RouterError> {
        factory_address(&env)
    }

    // ---------------------------------------------------------------------
    // Quoting
    // ---------------------------------------------------------------------

    pub fn quote(env: Env, amount_a: i128, reserve_a: i128, reserve_b: i128) -> Result<i128, RouterError> {
        helpers::quote(&env, amount_a, reserve_a, reserve_b)
    }

    pub fn get_amount_out(
        env: Env,
        amount_in: i128,
        reserve_in: i128,
        reserve_out: i128,
    ) -> Result<i128, RouterError> {
        helpers::get_amount_out(&env, amount_in, reserve_in, reserve_out)
    }

    pub fn get_amount_in(
        env: Env,
        amount_out: i128,
        reserve_in: i128,
        reserve_out: i128,
    ) -> Result<i128, RouterError> {
        helpers::get_amount_in(&env, amount_out, reserve_in, reserve_out)
    }

    pub fn get_amounts_out(env: Env, amount_in: i128, path: Vec<Address>) -> Result<Vec<i128>, RouterError> {
        let factory = factory_address(&env)?;
        helpers::get_amounts_out(&env, &factory, amount_in, &path)
    }

    pub fn get_amounts_in(env: Env, amount_out: i128, path: Vec<Address>) -> Result<Vec<i128>, RouterError> {
        let factory = factory_address(&env)?;
        helpers::get_amounts_in(&env, &factory, amount_out, &path)
    }

    pub fn sort_tokens(
        _env: Env,
        token_a: Address,
        token_b: Address,
    ) -> Result<(Address, Address), RouterError> {
        helpers::sort_tokens(&token_a, &token_b)
    }

    // ---------------------------------------------------------------------
    // Liquidity
    // ---------------------------------------------------------------------

    /// Deposits into the `(token_a, token_b)` pool at its current ratio,
    /// creating the pool first if it does not exist. `to` pays and
    /// receives the shares.
    pub fn add_liquidity(
        env: Env,
        token_a: Address,
        token_b: Address,
        amount_a_desired: i128,
        amount_b_desired: i128,
        amount_a_min: i128,
        amount_b_min: i128,
        to: Address,
        deadline: u64,
    ) -> Result<(i128, i128, i128), RouterError> {
        ensure_deadline(&env, deadline)?;
        to.require_auth();
        let factory = factory_address(&env)?;
        helpers::sort_tokens(&token_a, &token_b)?;

        let (amount_a, amount_b) = optimal_deposit(
            &env,
            &factory,
            &token_a,
            &token_b,
            amount_a_desired,
            amount_b_desired,
            amount_a_min,
            amount_b_min,
        )?;

        let pair = pair_for(&env, &factory, &token_a, &token_b)?;
        TokenClient::new(&env, &token_a).transfer(&to, &pair, &amount_a);
        TokenClient::new(&env, &token_b).transfer(&to, &pair, &amount_b);
        let liquidity = PairClient::new(&env, &pair).mint(&to);

        storage::extend_instance_ttl(&env);
        Ok((amount_a, amount_b, liquidity))
    }

    /// Returns `liquidity` shares of `to` to the pool and pays the
    /// underlying tokens back to `to`.
    pub fn remove_liquidity(
        env: Env,
        token_a: Address,
        token_b: Address,
        liquidity: i128,
        amount_a_min: i128,
        amount_b_min: i128,
        to: Address,
        deadline: u64,
    ) -> Result<(i128, i128), RouterError> {
        ensure_deadline(&env, deadline)?;
        to.require_auth();
        let factory = factory_address(&env)?;
        let amounts = burn_shares(
            &env, &factory, &token_a, &token_b, liquidity, amount_a_min, amount_b_min, &to, &to,
        )?;
        storage::extend_instance_ttl(&env);
        Ok(amounts)
    }

    /// Variant of `remove_liquidity` for tokens that take a cut on
    /// transfer: the pool pays the router, which forwards whatever it
    /// actually received.
    pub fn remove_liquidity_supporting_fee(
        env: Env,
        token_a: Address,
        token_b: Address,
        liquidity: i128,
        amount_a_min: i128,
        amount_b_min: i128,
        to: Address,
        deadline: u64,
    ) -> Result<(i128, i128), RouterError> {
        ensure_deadline(&env, deadline)?;
        to.require_auth();
        let factory = factory_address(&env)?;
        let router = env.current_contract_address();
        burn_shares(
            &env, &factory, &token_a, &token_b, liquidity, amount_a_min, amount_b_min, &to,
            &router,
        )?;

        let forwarded_a = forward_balance(&env, &token_a, &router, &to);
        let forwarded_b = forward_balance(&env, &token_b, &router, &to);
        storage::extend_instance_ttl(&env);
        Ok((forwarded_a, forwarded_b))
    }

    // ---------------------------------------------------------------------
    // Swaps
    // ---------------------------------------------------------------------

    /// Sells exactly `amount_in` of `path[0]` for at least
    /// `amount_out_min` of the last token.
    pub fn swap_exact_tokens_for_tokens(
        env: Env,
        amount_in: i128,
        amount_out_min: i128,
        path: Vec<Address>,
        to: Address,
        deadline: u64,
    ) -> Result<Vec<i128>, RouterError> {
        ensure_deadline(&env, deadline)?;
        to.require_auth();
        let factory = factory_address(&env)?;

        let amounts = helpers::get_amounts_out(&env, &factory, amount_in, &path)?;
        let final_out = amounts.last().ok_or(RouterError::InvalidPath)?;
        if final_out < amount_out_min {
            return Err(RouterError::InsufficientOutputAmount);
        }

        let first_pair = first_hop_pair(&env, &factory, &path)?;
        let first_token = path.get(0).ok_or(RouterError::InvalidPath)?;
        TokenClient::new(&env, &first_token).transfer(&to, &first_pair, &amount_in);
        swap_along(&env, &factory, &amounts, &path, &to)?;

        storage::extend_instance_ttl(&env);
        Ok(amounts)
    }

    /// Buys exactly `amount_out` of the last token, spending at most
    /// `amount_in_max` of `path[0]`.
    pub fn swap_tokens_for_exact_tokens(
        env: Env,
        amount_out: i128,
        amount_in_max: i128,
        path: Vec<Address>,
        to: Address,
        deadline: u64,
    ) -> Result<Vec<i128>, RouterError> {
        ensure_deadline(&env, deadline)?;
        to.require_auth();
        let factory = factory_address(&env)?;

        let amounts = helpers::get_amounts_in(&env, &factory, amount_out, &path)?;
        let amount_in = amounts.first().ok_or(RouterError::InvalidPath)?;
        if amount_in > amount_in_max {
            return Err(RouterError::ExcessiveInputAmount);
        }

        let first_pair = first_hop_pair(&env, &factory, &path)?;
        let first_token = path.get(0).ok_or(RouterError::InvalidPath)?;
        TokenClient::new(&env, &first_token).transfer(&to, &first_pair, &amount_in);
        swap_along(&env, &factory, &amounts, &path, &to)?;

        storage::extend_instance_ttl(&env);
        Ok(amounts)
    }

    /// Exact-input swap for tokens that take a cut on transfer. Returns
    /// what `to` actually received.
    pub fn swap_exact_tokens_supporting_fee(
        env: Env,
        amount_in: i128,
        amount_out_min: i128,
        path: Vec<Address>,
        to: Address,
        deadline: u64,
    ) -> Result<i128, RouterError> {
        ensure_deadline(&env, deadline)?;
        to.require_auth();
        let factory = factory_address(&env)?;
        if path.len() < 2 {
            return Err(RouterError::InvalidPath);
        }
        if amount_in <= 0 {
            return Err(RouterError::InsufficientInputAmount);
        }

        let first_pair = first_hop_pair(&env, &factory, &path)?;
        let first_token = path.get(0).ok_or(RouterError::InvalidPath)?;
        let last_token = path.last().ok_or(RouterError::InvalidPath)?;
        TokenClient::new(&env, &first_token).transfer(&to, &first_pair, &amount_in);

        let out_token = TokenClient::new(&env, &last_token);
        let balance_before = out_token.balance(&to);
        swap_along_supporting_fee(&env, &factory, &path, &to)?;
        let received = out_token.balance(&to) - balance_before;
        if received < amount_out_min {
            return Err(RouterError::InsufficientOutputAmount);
        }

        storage::extend_instance_ttl(&env);
        Ok(received)
    }
}

/// Moves `liquidity` shares from `owner` into the pool and burns them,
/// paying `recipient`. Returns the amounts in `(token_a, token_b)` order.
#[allow(clippy::too_many_arguments)]
fn burn_shares(
    env: &Env,
    factory: &Address,
    token_a: &Address,
    token_b: &Address,
    liquidity: i128,
    amount_a_min: i128,
    amount_b_min: i128,
    owner: &Address,
    recipient: &Address,
) -> Result<(i128, i128), RouterError> {
    if liquidity <= 0 {
        return Err(RouterError::InsufficientLiquidity);
    }
    let (token_0, _) = helpers::sort_tokens(token_a, token_b)?;
    let pair = pair_for(env, factory, token_a, token_b)?;
    let pair_client = PairClient::new(env, &pair);

    pair_client.transfer(owner, &pair, &liquidity);
    let (amount_0, amount_1) = pair_client.burn(recipient);
    let (amount_a, amount_b) = if *token_a == token_0 {
        (amount_0, amount_1)
    } else {
        (amount_1, amount_0)
    };

    if amount_a < amount_a_min {
        return Err(RouterError::InsufficientAAmount);
    }
    if amount_b < amount_b_min {
        return Err(RouterError::InsufficientBAmount);
    }
    Ok((amount_a, amount_b))
}
