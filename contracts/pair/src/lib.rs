#![no_std]

mod errors;
mod events;
mod fee;
mod math;
mod oracle;
mod reentrancy;
mod shares;
mod storage;
mod swap;

#[cfg(test)]
extern crate std; // soroban-sdk testutils require std; pair is no_std so we must opt-in explicitly.

#[cfg(test)]
mod test;

use soroban_sdk::{contract, contractimpl, token::TokenClient, Address, Bytes, Env, String, U256};

pub use errors::PairError;
use events::PairEvents;
pub use math::{MAX_RESERVE, MINIMUM_LIQUIDITY};
use storage::{get_pair_state, get_share_balance, get_total_supply, PairStorage, ShareHolder};

#[contract]
pub struct Pair;

fn load(env: &Env) -> Result<PairStorage, PairError> {
    get_pair_state(env).ok_or(PairError::NotInitialized)
}

fn balances(env: &Env, state: &PairStorage) -> (i128, i128) {
    let contract = env.current_contract_address();
    (
        TokenClient::new(env, &state.token_0).balance(&contract),
        TokenClient::new(env, &state.token_1).balance(&contract),
    )
}

fn write_reserves(
    env: &Env,
    state: &mut PairStorage,
    balance_0: i128,
    balance_1: i128,
) -> Result<(), PairError> {
    oracle::update_reserves(env, state, balance_0, balance_1)?;
    storage::set_pair_state(env, state);
    PairEvents::sync(env, state.reserve_0, state.reserve_1);
    Ok(())
}

#[contractimpl]
impl Pair {
    /// Binds the pair to its factory and canonically ordered tokens.
    /// Callable once, by the factory.
    pub fn initialize(
        env: Env,
        factory: Address,
        token_0: Address,
        token_1: Address,
    ) -> Result<(), PairError> {
        if storage::has_pair_state(&env) {
            return Err(PairError::AlreadyInitialized);
        }
        if token_0 == token_1 {
            return Err(PairError::IdenticalAddresses);
        }
        factory.require_auth();

        let zero = U256::from_u32(&env, 0);
        let state = PairStorage {
            factory,
            token_0,
            token_1,
            reserve_0: 0,
            reserve_1: 0,
            block_timestamp_last: oracle::block_timestamp(&env),
            price_0_cumulative_last: zero.clone(),
            price_1_cumulative_last: zero.clone(),
            k_last: zero,
        };
        storage::set_pair_state(&env, &state);
        shares::write_metadata(&env);
        storage::extend_instance_ttl(&env);
        Ok(())
    }

    /// Mints shares for whatever tokens were sent to the pair since the
    /// last reserve update.
    pub fn mint(env: Env, to: Address) -> Result<i128, PairError> {
        reentrancy::guarded(&env, || {
            let mut state = load(&env)?;
            let (balance_0, balance_1) = balances(&env, &state);
            let amount_0 = balance_0 - state.reserve_0;
            let amount_1 = balance_1 - state.reserve_1;
            if amount_0 < 0 || amount_1 < 0 {
                return Err(PairError::InsufficientInputAmount);
            }

            let fee_on = fee::mint_fee(&env, &mut state)?;
            let total_supply = get_total_supply(&env);

            let liquidity = if total_supply == 0 {
                let root = math::initial_liquidity(&env, amount_0, amount_1)?;
                if root <= MINIMUM_LIQUIDITY {
                    return Err(PairError::InsufficientLiquidity);
                }
                shares::mint(&env, &ShareHolder::Sink, MINIMUM_LIQUIDITY)?;
                root - MINIMUM_LIQUIDITY
            } else {
                math::proportional_liquidity(
                    &env,
                    amount_0,
                    amount_1,
                    total_supply,
                    state.reserve_0,
                    state.reserve_1,
                )?
            };
            if liquidity <= 0 {
                return Err(PairError::InsufficientLiquidity);
            }
            shares::mint(&env, &ShareHolder::Account(to.clone()), liquidity)?;

            write_reserves(&env, &mut state, balance_0, balance_1)?;
            if fee_on {
                fee::record_k_last(&env, &mut state)?;
                storage::set_pair_state(&env, &state);
            }

            PairEvents::mint(&env, &to, amount_0, amount_1);
            storage::extend_instance_ttl(&env);
            Ok(liquidity)
        })
    }

    /// Burns the shares held by the pair and pays out the underlying
    /// tokens to `to`.
    pub fn burn(env: Env, to: Address) -> Result<(i128, i128), PairError> {
        reentrancy::guarded(&env, || {
            let mut state = load(&env)?;
            let contract = env.current_contract_address();
            let (balance_0, balance_1) = balances(&env, &state);
            let liquidity = get_share_balance(&env, &ShareHolder::Account(contract.clone()));

            let fee_on = fee::mint_fee(&env, &mut state)?;
            let total_supply = get_total_supply(&env);
            if total_supply == 0 {
                return Err(PairError::InsufficientLiquidity);
            }

            let amount_0 = math::redeem_amount(&env, liquidity, balance_0, total_supply)?;
            let amount_1 = math::redeem_amount(&env, liquidity, balance_1, total_supply)?;
            if amount_0 <= 0 || amount_1 <= 0 {
                return Err(PairError::InsufficientLiquidity);
            }

            shares::burn(&env, &contract, liquidity)?;
            TokenClient::new(&env, &state.token_0).transfer(&contract, &to, &amount_0);
            TokenClient::new(&env, &state.token_1).transfer(&contract, &to, &amount_1);

            let (balance_0, balance_1) = balances(&env, &state);
            write_reserves(&env, &mut state, balance_0, balance_1)?;
            if fee_on {
                fee::record_k_last(&env, &mut state)?;
                storage::set_pair_state(&env, &state);
            }

            PairEvents::burn(&env, &to, amount_0, amount_1);
            storage::extend_instance_ttl(&env);
            Ok((amount_0, amount_1))
        })
    }

    /// Sends `amount_0_out`/`amount_1_out` to `to`. With a non-empty `data`
    /// payload `to` is called back as a flash borrower before inputs are
    /// checked.
    pub fn swap(
        env: Env,
        amount_0_out: i128,
        amount_1_out: i128,
        to: Address,
        data: Bytes,
    ) -> Result<(), PairError> {
        reentrancy::guarded(&env, || {
            swap::execute_swap(&env, amount_0_out, amount_1_out, to, &data)?;
            storage::extend_instance_ttl(&env);
            Ok(())
        })
    }

    /// Sends any balance above the recorded reserves to `to`.
    pub fn skim(env: Env, to: Address) -> Result<(), PairError> {
        reentrancy::guarded(&env, || {
            let state = load(&env)?;
            let contract = env.current_contract_address();
            let (balance_0, balance_1) = balances(&env, &state);
            let excess_0 = balance_0 - state.reserve_0;
            let excess_1 = balance_1 - state.reserve_1;
            if excess_0 > 0 {
                TokenClient::new(&env, &state.token_0).transfer(&contract, &to, &excess_0);
            }
            if excess_1 > 0 {
                TokenClient::new(&env, &state.token_1).transfer(&contract, &to, &excess_1);
            }
            Ok(())
        })
    }

    /// Forces reserves to match the actual balances.
    pub fn sync(env: Env) -> Result<(), PairError> {
        reentrancy::guarded(&env, || {
            let mut state = load(&env)?;
            let (balance_0, balance_1) = balances(&env, &state);
            write_reserves(&env, &mut state, balance_0, balance_1)?;
            storage::extend_instance_ttl(&env);
            Ok(())
        })
    }

    pub fn get_reserves(env: Env) -> Result<(i128, i128, u32), PairError> {
        let state = load(&env)?;
        Ok((state.reserve_0, state.reserve_1, state.block_timestamp_last))
    }

    pub fn price_0_cumulative_last(env: Env) -> Result<U256, PairError> {
        Ok(load(&env)?.price_0_cumulative_last)
    }

    pub fn price_1_cumulative_last(env: Env) -> Result<U256, PairError> {
        Ok(load(&env)?.price_1_cumulative_last)
    }

    pub fn k_last(env: Env) -> Result<U256, PairError> {
        Ok(load(&env)?.k_last)
    }

    pub fn token_0(env: Env) -> Result<Address, PairError> {
        Ok(load(&env)?.token_0)
    }

    pub fn token_1(env: Env) -> Result<Address, PairError> {
        Ok(load(&env)?.token_1)
    }

    pub fn factory(env: Env) -> Result<Address, PairError> {
        Ok(load(&env)?.factory)
    }

    // --- liquidity shares -------------------------------------------------

    pub fn total_supply(env: Env) -> i128 {
        get_total_supply(&env)
    }

    pub fn balance(env: Env, id: Address) -> i128 {
        get_share_balance(&env, &ShareHolder::Account(id))
    }

    /// Shares held by the unspendable sink.
    pub fn locked_liquidity(env: Env) -> i128 {
        get_share_balance(&env, &ShareHolder::Sink)
    }

    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), PairError> {
        from.require_auth();
        shares::transfer(&env, &from, &to, amount)
    }

    pub fn transfer_from(
        env: Env,
        spender: Address,
        from: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), PairError> {
        spender.require_auth();
        shares::spend_allowance(&env, &from, &spender, amount)?;
        shares::transfer(&env, &from, &to, amount)
    }

    pub fn approve(
        env: Env,
        from: Address,
        spender: Address,
        amount: i128,
        expiration_ledger: u32,
    ) -> Result<(), PairError> {
        from.require_auth();
        shares::approve(&env, &from, &spender, amount, expiration_ledger)
    }

    pub fn allowance(env: Env, from: Address, spender: Address) -> i128 {
        storage::get_allowance(&env, &from, &spender).amount
    }

    pub fn decimals(env: Env) -> u32 {
        shares::read_metadata(&env).decimal
    }

    pub fn name(env: Env) -> String {
        shares::read_metadata(&env).name
    }

    pub fn symbol(env: Env) -> String {
        shares::read_metadata(&env).symbol
    }
}
