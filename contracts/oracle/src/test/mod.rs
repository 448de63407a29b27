#![cfg(test)]

// ---------------------------------------------------------------------------
// Oracle test suite
//
// mod.rs    — Setup: SAC tokens, real Pair contracts behind a mock factory,
//             initialize / config tests
// updates   — sampling, ring capacity, events, pool validation
// consult   — TWAP queries and their failure modes
// pricing   — get_price fallback, USD routing, latest price staleness
// ---------------------------------------------------------------------------


use ponder_pair::{Pair, PairClient};
use soroban_sdk::{
    testutils::{Address as _, Ledger},
    token::StellarAssetClient,
    Address, Env, U256,
};

use crate::{Oracle, OracleClient, OracleError};

pub(crate) mod mock_factory {
    use soroban_sdk::{contract, contractimpl, contracttype, Address, Env};

    #[contracttype]
    enum Key {
        Pair(Address, Address),
    }

    fn sorted(a: Address, b: Address) -> (Address, Address) {
        if a < b {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Pool registry the oracle validates against.
    #[contract]
    pub struct MockFactory;

    #[contractimpl]
    impl MockFactory {
        pub fn register(env: Env, token_a: Address, token_b: Address, pair: Address) {
            let (token_0, token_1) = sorted(token_a, token_b);
            env.storage().instance().set(&Key::Pair(token_0, token_1), &pair);
        }

        pub fn get_pair(env: Env, token_a: Address, token_b: Address) -> Option<Address> {
            let (token_0, token_1) = sorted(token_a, token_b);
            env.storage().instance().get(&Key::Pair(token_0, token_1))
        }
    }
}
pub(crate) use mock_factory::{MockFactory, MockFactoryClient};

pub(crate) const START: u64 = 1_000_000;

pub(crate) struct Setup<'a> {
    pub env: Env,
    pub oracle: OracleClient<'a>,
    pub factory: MockFactoryClient<'a>,
    pub a: Address,
    pub b: Address,
    pub usd: Address,
}

impl<'a> Setup<'a> {
    pub fn new() -> Self {
        let env = Env::default();
        env.mock_all_auths();
        env.budget().reset_unlimited();
        env.ledger().set_timestamp(START);

        let issuer = Address::generate(&env);
        let a = env.register_stellar_asset_contract_v2(issuer.clone()).address();
        let b = env.register_stellar_asset_contract_v2(issuer.clone()).address();
        let usd = env.register_stellar_asset_contract_v2(issuer).address();

        let factory_id = env.register_contract(None, MockFactory);
        let oracle = OracleClient::new(&env, &env.register_contract(None, Oracle));
        oracle.initialize(&factory_id, &usd);

        Setup {
            oracle,
            factory: MockFactoryClient::new(&env, &factory_id),
            a,
            b,
            usd,
            env,
        }
    }

    /// Initialized pool for `(x, y)` that the factory does not know about.
    pub fn unregistered_pool(&self, x: &Address, y: &Address) -> Address {
        let pair = self.env.register_contract(None, Pair);
        let (token_0, token_1) = if x < y { (x, y) } else { (y, x) };
        PairClient::new(&self.env, &pair).initialize(&self.factory.address, token_0, token_1);
        pair
    }

    /// Registered pool holding `amount_x` of `x` and `amount_y` of `y`.
    pub fn pool(&self, x: &Address, y: &Address, amount_x: i128, amount_y: i128) -> Address {
        let pair = self.unregistered_pool(x, y);
        self.factory.register(x, y, &pair);
        self.donate(&pair, x, y, amount_x, amount_y);
        pair
    }

    /// Adds to the pool's balances and syncs, moving its spot price.
    pub fn donate(&self, pair: &Address, x: &Address, y: &Address, amount_x: i128, amount_y: i128) {
        if amount_x > 0 {
            StellarAssetClient::new(&self.env, x).mint(pair, &amount_x);
        }
        if amount_y > 0 {
            StellarAssetClient::new(&self.env, y).mint(pair, &amount_y);
        }
        PairClient::new(&self.env, pair).sync();
    }

    pub fn advance(&self, seconds: u64) {
        self.env.ledger().with_mut(|li| li.timestamp += seconds);
    }

    pub fn now(&self) -> u64 {
        self.env.ledger().timestamp()
    }

    /// `value` as a UQ112x112 integer.
    pub fn uq(&self, value: u32) -> U256 {
        U256::from_u32(&self.env, value).shl(112)
    }
}

// ============================================================================
// initialize
// ============================================================================

#[test]
fn initialize_stores_config() {
    let s = Setup::new();
    assert_eq!(s.oracle.factory(), s.factory.address);
    assert_eq!(s.oracle.stablecoin(), s.usd);
}

#[test]
fn initialize_twice_fails() {
    let s = Setup::new();
    let result = s.oracle.try_initialize(&s.factory.address, &s.a);
    assert_eq!(result, Err(Ok(OracleError::AlreadyInitialized)));
    assert_eq!(s.oracle.stablecoin(), s.usd);
}

#[test]
fn uninitialized_oracle_rejects_calls() {
    let env = Env::default();
    let oracle = OracleClient::new(&env, &env.register_contract(None, Oracle));
    let pair = Address::generate(&env);
    let token = Address::generate(&env);

    assert_eq!(oracle.try_factory(), Err(Ok(OracleError::NotInitialized)));
    assert_eq!(oracle.try_stablecoin(), Err(Ok(OracleError::NotInitialized)));
    assert_eq!(oracle.try_update(&pair), Err(Ok(OracleError::NotInitialized)));
    assert_eq!(
        oracle.try_get_price_in_usd(&pair, &token, &100),
        Err(Ok(OracleError::NotInitialized))
    );
    assert_eq!(oracle.observation_count(&pair), 0);
    assert_eq!(oracle.last_update_time(&pair), 0);
}

#[test]
fn average_is_taken_modulo_2_pow_256() {
    let env = Env::default();
    let max = U256::from_parts(&env, u64::MAX, u64::MAX, u64::MAX, u64::MAX);
    let past = max.sub(&U256::from_u32(&env, 99));
    let current = U256::from_u32(&env, 500);

    // 100 to wrap, 500 after it, over 200 seconds
    assert_eq!(crate::average(&env, &current, &past, 200), U256::from_u32(&env, 3));
}
