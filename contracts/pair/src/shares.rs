//! Liquidity-share ledger.
//!
//! Shares are a SEP-41 style token hosted by the pair itself. Balances are
//! keyed by [`ShareHolder`], so the locked minimum liquidity sits under the
//! reserved `Sink` key instead of an address somebody might control.

use soroban_sdk::{Address, Env, String};
use soroban_token_sdk::{metadata::TokenMetadata, TokenUtils};

use crate::{
    errors::PairError,
    storage::{
        get_allowance, get_share_balance, get_total_supply, set_allowance, set_share_balance,
        set_total_supply, AllowanceValue, ShareHolder,
    },
};

pub const DECIMALS: u32 = 7;
pub const NAME: &str = "Ponder LP";
pub const SYMBOL: &str = "PONDER-LP";

pub fn write_metadata(env: &Env) {
    TokenUtils::new(env).metadata().set_metadata(&TokenMetadata {
        decimal: DECIMALS,
        name: String::from_str(env, NAME),
        symbol: String::from_str(env, SYMBOL),
    });
}

pub fn read_metadata(env: &Env) -> TokenMetadata {
    TokenUtils::new(env).metadata().get_metadata()
}

fn check_non_negative(amount: i128) -> Result<(), PairError> {
    if amount < 0 {
        return Err(PairError::NegativeAmount);
    }
    Ok(())
}

fn credit(env: &Env, holder: &ShareHolder, amount: i128) -> Result<(), PairError> {
    let balance = get_share_balance(env, holder)
        .checked_add(amount)
        .ok_or(PairError::Overflow)?;
    set_share_balance(env, holder, balance);
    Ok(())
}

fn debit(env: &Env, holder: &ShareHolder, amount: i128) -> Result<(), PairError> {
    let balance = get_share_balance(env, holder);
    if balance < amount {
        return Err(PairError::InsufficientBalance);
    }
    set_share_balance(env, holder, balance - amount);
    Ok(())
}

/// Issues new shares and grows the total supply.
pub fn mint(env: &Env, holder: &ShareHolder, amount: i128) -> Result<(), PairError> {
    check_non_negative(amount)?;
    credit(env, holder, amount)?;
    let supply = get_total_supply(env)
        .checked_add(amount)
        .ok_or(PairError::Overflow)?;
    set_total_supply(env, supply);

    if let ShareHolder::Account(to) = holder {
        TokenUtils::new(env)
            .events()
            .mint(env.current_contract_address(), to.clone(), amount);
    }
    Ok(())
}

/// Destroys shares held by `from`.
pub fn burn(env: &Env, from: &Address, amount: i128) -> Result<(), PairError> {
    check_non_negative(amount)?;
    debit(env, &ShareHolder::Account(from.clone()), amount)?;
    set_total_supply(env, get_total_supply(env) - amount);
    TokenUtils::new(env).events().burn(from.clone(), amount);
    Ok(())
}

/// Moves shares between two accounts. Authorization is checked by the
/// caller.
pub fn transfer(env: &Env, from: &Address, to: &Address, amount: i128) -> Result<(), PairError> {
    check_non_negative(amount)?;
    debit(env, &ShareHolder::Account(from.clone()), amount)?;
    credit(env, &ShareHolder::Account(to.clone()), amount)?;
    TokenUtils::new(env)
        .events()
        .transfer(from.clone(), to.clone(), amount);
    Ok(())
}

pub fn approve(
    env: &Env,
    from: &Address,
    spender: &Address,
    amount: i128,
    expiration_ledger: u32,
) -> Result<(), PairError> {
    check_non_negative(amount)?;
    if amount > 0 && expiration_ledger < env.ledger().sequence() {
        return Err(PairError::InvalidExpiration);
    }
    set_allowance(env, from, spender, &AllowanceValue { amount, expiration_ledger });
    TokenUtils::new(env)
        .events()
        .approve(from.clone(), spender.clone(), amount, expiration_ledger);
    Ok(())
}

pub fn spend_allowance(
    env: &Env,
    from: &Address,
    spender: &Address,
    amount: i128,
) -> Result<(), PairError> {
    check_non_negative(amount)?;
    let allowance = get_allowance(env, from, spender);
    if allowance.amount < amount {
        return Err(PairError::InsufficientAllowance);
    }
    if amount > 0 {
        set_allowance(
            env,
            from,
            spender,
            &AllowanceValue {
                amount: allowance.amount - amount,
                expiration_ledger: allowance.expiration_ledger,
            },
        );
    }
    Ok(())
}
