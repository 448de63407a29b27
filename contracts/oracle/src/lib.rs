#![no_std]

mod cumulative;
mod errors;
mod events;
mod observations;
mod storage;

#[cfg(test)]
extern crate std;

#[cfg(test)]
mod test;

use ponder_math::{mul_decode, wrapping_sub};
use soroban_sdk::{contract, contractimpl, log, Address, Env, Vec, U256};

use cumulative::{current_cumulative_prices, pair_tokens, spot_price_0, spot_quote, FactoryClient};
pub use errors::OracleError;
use events::OracleEvents;
pub use observations::{
    Observation, MAX_OBSERVATIONS, MIN_UPDATE_DELAY, PERIOD, PRICE_STALENESS_THRESHOLD,
};
use observations::ObservationRing;
use storage::OracleConfig;

fn load_config(env: &Env) -> Result<OracleConfig, OracleError> {
    storage::get_config(env).ok_or(OracleError::NotInitialized)
}

fn load_ring(env: &Env, pair: &Address) -> ObservationRing {
    storage::get_ring(env, pair).unwrap_or_else(|| ObservationRing::new(env))
}

fn check_amount(amount_in: i128) -> Result<(), OracleError> {
    if amount_in < 0 {
        return Err(OracleError::InvalidAmount);
    }
    Ok(())
}

/// `token_in`'s side of the pair: true for token_0.
fn side(token_0: &Address, token_1: &Address, token_in: &Address) -> Result<bool, OracleError> {
    if token_in == token_0 {
        Ok(true)
    } else if token_in == token_1 {
        Ok(false)
    } else {
        Err(OracleError::InvalidToken)
    }
}

/// `(current - past) / elapsed` over the accumulator difference, modulo 2^256.
fn average(env: &Env, current: &U256, past: &U256, elapsed: u64) -> U256 {
    wrapping_sub(env, current, past).div(&U256::from_u128(env, elapsed as u128))
}

fn twap_quote(
    env: &Env,
    pair: &Address,
    ring: &ObservationRing,
    token_is_0: bool,
    amount_in: i128,
    period: u64,
) -> Result<i128, OracleError> {
    if ring.len() < 2 {
        return Err(OracleError::InsufficientHistory);
    }
    let now = env.ledger().timestamp();
    let oldest = ring.oldest().ok_or(OracleError::InsufficientHistory)?;
    if period == 0 || period > now.saturating_sub(oldest.timestamp) {
        return Err(OracleError::InvalidPeriod);
    }
    let past = ring
        .closest_to(now - period, now)
        .ok_or(OracleError::InsufficientHistory)?;

    let (price_0, price_1) = current_cumulative_prices(env, pair)?;
    let (current, past_cumulative) = if token_is_0 {
        (price_0, past.price_0_cumulative)
    } else {
        (price_1, past.price_1_cumulative)
    };
    let price_average = average(env, &current, &past_cumulative, now - past.timestamp);
    mul_decode(env, &price_average, amount_in).ok_or(OracleError::Overflow)
}

/// TWAP over the longest window up to `PERIOD`, or the reserve ratio when
/// the history is too thin or too old. The flag reports the fallback.
fn price_through(
    env: &Env,
    pair: &Address,
    token_in: &Address,
    amount_in: i128,
) -> Result<(i128, bool), OracleError> {
    let (token_0, token_1) = pair_tokens(env, pair)?;
    let token_is_0 = side(&token_0, &token_1, token_in)?;
    let ring = load_ring(env, pair);
    let now = env.ledger().timestamp();

    let fresh = ring
        .newest()
        .map(|newest| now.saturating_sub(newest.timestamp) <= MIN_UPDATE_DELAY)
        .unwrap_or(false);
    if ring.len() >= 2 && fresh {
        if let Some(oldest) = ring.oldest() {
            let period = PERIOD.min(now.saturating_sub(oldest.timestamp));
            let amount_out = twap_quote(env, pair, &ring, token_is_0, amount_in, period)?;
            return Ok((amount_out, false));
        }
    }

    log!(env, "price from reserves", pair.clone(), ring.len(), ring.last_update);
    let amount_out = spot_quote(env, pair, &token_0, token_in, amount_in)?;
    Ok((amount_out, true))
}

#[contract]
pub struct Oracle;

#[contractimpl]
impl Oracle {
    /// Binds the oracle to the factory it validates pools against and to
    /// the token `get_price_in_usd` quotes in.
    pub fn initialize(env: Env, factory: Address, stablecoin: Address) -> Result<(), OracleError> {
        if storage::has_config(&env) {
            return Err(OracleError::AlreadyInitialized);
        }
        storage::set_config(&env, &OracleConfig { factory, stablecoin });
        storage::extend_instance_ttl(&env);
        Ok(())
    }

    /// Samples `pair`'s cumulative prices into its ring.
    ///
    /// Returns `false` without writing when the previous sample is less than
    /// `MIN_UPDATE_DELAY` seconds old. Anyone may call this.
    pub fn update(env: Env, pair: Address) -> Result<bool, OracleError> {
        let config = load_config(&env)?;
        let (token_0, token_1) = pair_tokens(&env, &pair)?;
        let registered = FactoryClient::new(&env, &config.factory).get_pair(&token_0, &token_1);
        if registered != Some(pair.clone()) {
            return Err(OracleError::InvalidPair);
        }

        let now = env.ledger().timestamp();
        let mut ring = load_ring(&env, &pair);
        if !ring.is_due(now) {
            log!(&env, "update skipped", pair.clone(), ring.last_update);
            return Ok(false);
        }

        let (price_0_cumulative, price_1_cumulative) = current_cumulative_prices(&env, &pair)?;
        let price_average = match ring.newest() {
            Some(previous) => average(
                &env,
                &price_0_cumulative,
                &previous.price_0_cumulative,
                now - previous.timestamp,
            ),
            None => spot_price_0(&env, &pair),
        };

        ring.record(Observation { timestamp: now, price_0_cumulative, price_1_cumulative });
        storage::set_ring(&env, &pair, &ring);
        storage::extend_instance_ttl(&env);

        OracleEvents::price_updated(&env, &pair, &price_average, now);
        Ok(true)
    }

    /// Amount of the other token `amount_in` of `token_in` is worth at the
    /// average price over roughly the last `period` seconds.
    ///
    /// The window opens at the stored observation closest to
    /// `now - period`, so its real length depends on how the ring was sampled.
    pub fn consult(
        env: Env,
        pair: Address,
        token_in: Address,
        amount_in: i128,
        period: u64,
    ) -> Result<i128, OracleError> {
        check_amount(amount_in)?;
        let (token_0, token_1) = pair_tokens(&env, &pair)?;
        let token_is_0 = side(&token_0, &token_1, &token_in)?;
        let ring = load_ring(&env, &pair);
        twap_quote(&env, &pair, &ring, token_is_0, amount_in, period)
    }

    /// `(amount_out, used_reserves)`; see [`Oracle::consult`].
    pub fn get_price(
        env: Env,
        pair: Address,
        token_in: Address,
        amount_in: i128,
    ) -> Result<(i128, bool), OracleError> {
        check_amount(amount_in)?;
        price_through(&env, &pair, &token_in, amount_in)
    }

    /// Value of `amount_in` in the stablecoin. Prices into the pair's other
    /// token first and, unless that is already the stablecoin, on through
    /// the factory's `(other, stablecoin)` pool.
    pub fn get_price_in_usd(
        env: Env,
        pair: Address,
        token_in: Address,
        amount_in: i128,
    ) -> Result<(i128, bool), OracleError> {
        check_amount(amount_in)?;
        let config = load_config(&env)?;
        if token_in == config.stablecoin {
            return Ok((amount_in, false));
        }

        let (token_0, token_1) = pair_tokens(&env, &pair)?;
        let other = if side(&token_0, &token_1, &token_in)? { token_1 } else { token_0 };
        let (amount_other, first_from_reserves) = price_through(&env, &pair, &token_in, amount_in)?;
        if other == config.stablecoin {
            return Ok((amount_other, first_from_reserves));
        }

        let usd_pair = FactoryClient::new(&env, &config.factory)
            .get_pair(&other, &config.stablecoin)
            .ok_or(OracleError::InvalidPair)?;
        let (amount_usd, second_from_reserves) =
            price_through(&env, &usd_pair, &other, amount_other)?;
        Ok((amount_usd, first_from_reserves || second_from_reserves))
    }

    /// Newest observation, provided it is younger than
    /// `PRICE_STALENESS_THRESHOLD`.
    pub fn get_latest_price(env: Env, pair: Address) -> Result<Observation, OracleError> {
        let newest = load_ring(&env, &pair)
            .newest()
            .ok_or(OracleError::InsufficientHistory)?;
        let age = env.ledger().timestamp().saturating_sub(newest.timestamp);
        if age > PRICE_STALENESS_THRESHOLD {
            return Err(OracleError::StalePrice);
        }
        Ok(newest)
    }

    /// Stored observations, oldest first.
    pub fn observations(env: Env, pair: Address) -> Vec<Observation> {
        load_ring(&env, &pair).chronological(&env)
    }

    pub fn observation_count(env: Env, pair: Address) -> u32 {
        load_ring(&env, &pair).len()
    }

    pub fn current_index(env: Env, pair: Address) -> u32 {
        load_ring(&env, &pair).current_index()
    }

    pub fn last_update_time(env: Env, pair: Address) -> u64 {
        load_ring(&env, &pair).last_update
    }

    pub fn factory(env: Env) -> Result<Address, OracleError> {
        load_config(&env).map(|c| c.factory)
    }

    pub fn stablecoin(env: Env) -> Result<Address, OracleError> {
        load_config(&env).map(|c| c.stablecoin)
    }
}
