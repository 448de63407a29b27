use ponder_math::mul_wide;
use soroban_sdk::{contractclient, Address, Env, U256};

use crate::{
    errors::PairError,
    math::protocol_fee_liquidity,
    shares,
    storage::{get_total_supply, PairStorage, ShareHolder},
};

#[contractclient(name = "FactoryClient")]
pub trait FactoryInterface {
    fn fee_to(env: Env) -> Option<Address>;
}

/// Mints the protocol's cut of accrued swap fees to the factory's `fee_to`
/// account, if one is configured. Returns whether the fee is on.
///
/// Must run before the share math of `mint`/`burn` so that the new shares
/// dilute the protocol rather than the depositor.
pub fn mint_fee(env: &Env, state: &mut PairStorage) -> Result<bool, PairError> {
    let fee_to = FactoryClient::new(env, &state.factory).fee_to();
    let zero = U256::from_u32(env, 0);

    match fee_to {
        Some(fee_to) => {
            if state.k_last != zero {
                let k = mul_wide(env, state.reserve_0, state.reserve_1).ok_or(PairError::Overflow)?;
                let liquidity =
                    protocol_fee_liquidity(env, get_total_supply(env), &k, &state.k_last)?;
                if liquidity > 0 {
                    shares::mint(env, &ShareHolder::Account(fee_to), liquidity)?;
                }
            }
            Ok(true)
        }
        None => {
            if state.k_last != zero {
                state.k_last = zero;
            }
            Ok(false)
        }
    }
}

/// Records `reserve_0 * reserve_1` as the baseline for the next fee mint.
pub fn record_k_last(env: &Env, state: &mut PairStorage) -> Result<(), PairError> {
    state.k_last = mul_wide(env, state.reserve_0, state.reserve_1).ok_or(PairError::Overflow)?;
    Ok(())
}
