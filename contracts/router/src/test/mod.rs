#![cfg(test)]

// ---------------------------------------------------------------------------
// Router test suite
//
// mod.rs     — Setup: three SAC tokens, a mock factory that hands out real
//              Pair contracts, and a funded user
// quotes     — pure quote / amount math, proptests
// liquidity  — add / remove liquidity
// swaps      — exact-in / exact-out, multi-hop
// fee_token  — transfer-fee token routes
// ---------------------------------------------------------------------------


use ponder_pair::{Pair, PairClient};
use soroban_sdk::{
    testutils::Address as _,
    token::{StellarAssetClient, TokenClient},
    vec, Address, Env, Vec,
};

use crate::{Router, RouterClient, RouterError};

pub(crate) mod mock_factory {
    use ponder_pair::PairClient;
    use soroban_sdk::{contract, contractimpl, contracttype, Address, Env, Vec};

    #[contracttype]
    enum Key {
        Staged,
        Pair(Address, Address),
    }

    fn sorted(a: Address, b: Address) -> (Address, Address) {
        if a < b {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Factory stand-in. Pools cannot be deployed from wasm in native
    /// tests, so natively registered pairs are staged up front and
    /// `create_pair` initializes the next one.
    #[contract]
    pub struct MockFactory;

    #[contractimpl]
    impl MockFactory {
        pub fn stage_pair(env: Env, pair: Address) {
            let mut staged: Vec<Address> =
                env.storage().instance().get(&Key::Staged).unwrap_or(Vec::new(&env));
            staged.push_back(pair);
            env.storage().instance().set(&Key::Staged, &staged);
        }

        pub fn create_pair(env: Env, token_a: Address, token_b: Address) -> Address {
            let (token_0, token_1) = sorted(token_a, token_b);
            let key = Key::Pair(token_0.clone(), token_1.clone());
            assert!(!env.storage().instance().has(&key), "pair exists");

            let mut staged: Vec<Address> =
                env.storage().instance().get(&Key::Staged).unwrap_or(Vec::new(&env));
            let pair = staged.pop_front().expect("no staged pair");
            env.storage().instance().set(&Key::Staged, &staged);

            PairClient::new(&env, &pair).initialize(
                &env.current_contract_address(),
                &token_0,
                &token_1,
            );
            env.storage().instance().set(&key, &pair);
            pair
        }

        pub fn get_pair(env: Env, token_a: Address, token_b: Address) -> Option<Address> {
            let (token_0, token_1) = sorted(token_a, token_b);
            env.storage().instance().get(&Key::Pair(token_0, token_1))
        }

        pub fn fee_to(_env: Env) -> Option<Address> {
            None
        }
    }
}
pub(crate) use mock_factory::{MockFactory, MockFactoryClient};

pub(crate) const FUNDING: i128 = 1_000_000_000_000;
pub(crate) const DEADLINE: u64 = 1_000;

pub(crate) struct Setup<'a> {
    pub env: Env,
    pub router: RouterClient<'a>,
    pub factory: MockFactoryClient<'a>,
    pub a: Address,
    pub b: Address,
    pub c: Address,
    pub user: Address,
}

impl<'a> Setup<'a> {
    pub fn new() -> Self {
        let env = Env::default();
        env.mock_all_auths();
        env.budget().reset_unlimited();

        let factory_id = env.register_contract(None, MockFactory);
        let router_id = env.register_contract(None, Router);
        let router = RouterClient::new(&env, &router_id);
        router.initialize(&factory_id);

        let issuer = Address::generate(&env);
        let user = Address::generate(&env);
        let mut tokens = std::vec::Vec::new();
        for _ in 0..3 {
            let token = env.register_stellar_asset_contract_v2(issuer.clone()).address();
            StellarAssetClient::new(&env, &token).mint(&user, &FUNDING);
            tokens.push(token);
        }

        Setup {
            router,
            factory: MockFactoryClient::new(&env, &factory_id),
            a: tokens[0].clone(),
            b: tokens[1].clone(),
            c: tokens[2].clone(),
            user,
            env,
        }
    }

    /// Makes sure the factory can hand out a pool for `(x, y)`.
    pub fn stage(&self, x: &Address, y: &Address) {
        if self.factory.get_pair(x, y).is_none() {
            let pair = self.env.register_contract(None, Pair);
            self.factory.stage_pair(&pair);
        }
    }

    pub fn add_liquidity(&self, x: &Address, y: &Address, amount_x: i128, amount_y: i128) -> i128 {
        self.stage(x, y);
        let (_, _, liquidity) = self
            .router
            .add_liquidity(x, y, &amount_x, &amount_y, &0, &0, &self.user, &DEADLINE);
        liquidity
    }

    pub fn pair(&self, x: &Address, y: &Address) -> PairClient<'a> {
        let address = self.factory.get_pair(x, y).expect("pool exists");
        PairClient::new(&self.env, &address)
    }

    /// Reserves of `(x, y)` in the caller's order.
    pub fn reserves(&self, x: &Address, y: &Address) -> (i128, i128) {
        let (r0, r1, _) = self.pair(x, y).get_reserves();
        if x < y {
            (r0, r1)
        } else {
            (r1, r0)
        }
    }

    pub fn balance(&self, token: &Address) -> i128 {
        TokenClient::new(&self.env, token).balance(&self.user)
    }

    pub fn path(&self, tokens: &[&Address]) -> Vec<Address> {
        let mut path = vec![&self.env];
        for token in tokens {
            path.push_back((*token).clone());
        }
        path
    }
}

// ============================================================================
// initialize / factory
// ============================================================================

#[test]
fn initialize_twice_fails() {
    let s = Setup::new();
    let result = s.router.try_initialize(&s.factory.address);
    assert_eq!(result, Err(Ok(RouterError::AlreadyInitialized)));
    assert_eq!(s.router.factory(), s.factory.address);
}

#[test]
fn uninitialized_router_has_no_factory() {
    let env = Env::default();
    let router = RouterClient::new(&env, &env.register_contract(None, Router));

    assert_eq!(router.try_factory(), Err(Ok(RouterError::NotInitialized)));
    let path = vec![&env, Address::generate(&env), Address::generate(&env)];
    assert_eq!(
        router.try_get_amounts_out(&100, &path),
        Err(Ok(RouterError::NotInitialized))
    );
}
