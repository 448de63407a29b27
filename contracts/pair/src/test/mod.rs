#![cfg(test)]

// ---------------------------------------------------------------------------
// Pair test suite
//
// Structure
// ─────────
// mod.rs       — shared Setup (SAC tokens, mock factory) plus mint/burn/swap
//                lifecycle tests
// swap_math    — pure reserve/share arithmetic, including proptests
// flash_swap   — optimistic transfer + receiver callback
// twap         — cumulative price accumulation
// sync         — sync / skim
// shares       — liquidity-share ledger
// events       — PairEvents payloads
// reentrancy   — critical-section guard
// views        — read-only accessors
// ---------------------------------------------------------------------------


use soroban_sdk::{
    testutils::Address as _,
    token::{StellarAssetClient, TokenClient},
    Address, Bytes, Env,
};

use crate::{Pair, PairClient, PairError, MINIMUM_LIQUIDITY};

pub(crate) mod mock_factory {
    use soroban_sdk::{contract, contractimpl, contracttype, Address, Env};

    #[contracttype]
    enum Key {
        FeeTo,
    }

    /// Stands in for the factory: the pair only ever asks it for `fee_to`.
    #[contract]
    pub struct MockFactory;

    #[contractimpl]
    impl MockFactory {
        pub fn set_fee_to(env: Env, fee_to: Address) {
            env.storage().instance().set(&Key::FeeTo, &fee_to);
        }

        pub fn fee_to(env: Env) -> Option<Address> {
            env.storage().instance().get(&Key::FeeTo)
        }
    }
}
pub(crate) use mock_factory::{MockFactory, MockFactoryClient};

pub(crate) struct Setup<'a> {
    pub env: Env,
    pub pair: Address,
    pub client: PairClient<'a>,
    pub factory: MockFactoryClient<'a>,
    pub token_0: TokenClient<'a>,
    pub token_1: TokenClient<'a>,
    pub admin_0: StellarAssetClient<'a>,
    pub admin_1: StellarAssetClient<'a>,
    pub user: Address,
}

impl<'a> Setup<'a> {
    pub fn new() -> Self {
        let env = Env::default();
        env.mock_all_auths();
        env.budget().reset_unlimited();

        let issuer = Address::generate(&env);
        let a = env.register_stellar_asset_contract_v2(issuer.clone()).address();
        let b = env.register_stellar_asset_contract_v2(issuer).address();
        let (token_0, token_1) = if a < b { (a, b) } else { (b, a) };

        let factory_id = env.register_contract(None, MockFactory);
        let pair = env.register_contract(None, Pair);
        let client = PairClient::new(&env, &pair);
        client.initialize(&factory_id, &token_0, &token_1);

        let user = Address::generate(&env);

        Setup {
            pair,
            client,
            factory: MockFactoryClient::new(&env, &factory_id),
            token_0: TokenClient::new(&env, &token_0),
            token_1: TokenClient::new(&env, &token_1),
            admin_0: StellarAssetClient::new(&env, &token_0),
            admin_1: StellarAssetClient::new(&env, &token_1),
            user,
            env,
        }
    }

    /// Sends tokens straight to the pair, the way a router would.
    pub fn deposit(&self, amount_0: i128, amount_1: i128) {
        if amount_0 > 0 {
            self.admin_0.mint(&self.pair, &amount_0);
        }
        if amount_1 > 0 {
            self.admin_1.mint(&self.pair, &amount_1);
        }
    }

    pub fn add_liquidity(&self, to: &Address, amount_0: i128, amount_1: i128) -> i128 {
        self.deposit(amount_0, amount_1);
        self.client.mint(to)
    }

    /// Seeds reserves without issuing shares.
    pub fn seed_reserves(&self, amount_0: i128, amount_1: i128) {
        self.deposit(amount_0, amount_1);
        self.client.sync();
    }

    pub fn reserves(&self) -> (i128, i128) {
        let (reserve_0, reserve_1, _) = self.client.get_reserves();
        (reserve_0, reserve_1)
    }

    pub fn empty_data(&self) -> Bytes {
        Bytes::new(&self.env)
    }
}

// ============================================================================
// initialize
// ============================================================================

#[test]
fn initialize_twice_fails() {
    let s = Setup::new();
    let factory = s.factory.address.clone();
    let result = s
        .client
        .try_initialize(&factory, &s.token_0.address, &s.token_1.address);
    assert_eq!(result, Err(Ok(PairError::AlreadyInitialized)));
}

#[test]
fn initialize_rejects_identical_tokens() {
    let env = Env::default();
    env.mock_all_auths();
    let pair = env.register_contract(None, Pair);
    let client = PairClient::new(&env, &pair);
    let token = Address::generate(&env);
    let factory = Address::generate(&env);

    let result = client.try_initialize(&factory, &token, &token);
    assert_eq!(result, Err(Ok(PairError::IdenticalAddresses)));
}

// ============================================================================
// mint
// ============================================================================

#[test]
fn first_mint_locks_minimum_liquidity() {
    let s = Setup::new();

    let liquidity = s.add_liquidity(&s.user, 1_000, 4_000);

    // floor(sqrt(1000 * 4000)) - 1000 = 2000 - 1000
    assert_eq!(liquidity, 1_000);
    assert_eq!(s.client.balance(&s.user), 1_000);
    assert_eq!(s.client.locked_liquidity(), MINIMUM_LIQUIDITY);
    assert_eq!(s.client.total_supply(), 2_000);
    assert_eq!(s.reserves(), (1_000, 4_000));
}

#[test]
fn first_mint_at_or_below_minimum_fails() {
    let s = Setup::new();
    s.deposit(1_000, 1_000);

    let result = s.client.try_mint(&s.user);
    assert_eq!(result, Err(Ok(PairError::InsufficientLiquidity)));
    assert_eq!(s.client.total_supply(), 0);
}

#[test]
fn subsequent_mint_is_proportional() {
    let s = Setup::new();
    s.add_liquidity(&s.user, 1_000, 4_000);

    let other = Address::generate(&s.env);
    let liquidity = s.add_liquidity(&other, 500, 2_000);

    // min(500 * 2000 / 1000, 2000 * 2000 / 4000)
    assert_eq!(liquidity, 1_000);
    assert_eq!(s.client.total_supply(), 3_000);
    assert_eq!(s.reserves(), (1_500, 6_000));
}

#[test]
fn unbalanced_mint_credits_the_smaller_side() {
    let s = Setup::new();
    s.add_liquidity(&s.user, 1_000, 4_000);

    let other = Address::generate(&s.env);
    let liquidity = s.add_liquidity(&other, 500, 8_000);

    assert_eq!(liquidity, 1_000);
    // the surplus of token_1 is donated to the pool
    assert_eq!(s.reserves(), (1_500, 12_000));
}

#[test]
fn mint_without_deposit_fails() {
    let s = Setup::new();
    s.add_liquidity(&s.user, 1_000, 4_000);

    let result = s.client.try_mint(&s.user);
    assert_eq!(result, Err(Ok(PairError::InsufficientLiquidity)));
}

// ============================================================================
// burn
// ============================================================================

#[test]
fn burn_returns_pro_rata_amounts() {
    let s = Setup::new();
    s.add_liquidity(&s.user, 1_000, 4_000);

    s.client.transfer(&s.user, &s.pair, &1_000);
    let (amount_0, amount_1) = s.client.burn(&s.user);

    // 1000 of 2000 shares
    assert_eq!((amount_0, amount_1), (500, 2_000));
    assert_eq!(s.token_0.balance(&s.user), 500);
    assert_eq!(s.token_1.balance(&s.user), 2_000);
    assert_eq!(s.client.total_supply(), 1_000);
    assert_eq!(s.client.locked_liquidity(), MINIMUM_LIQUIDITY);
    assert_eq!(s.reserves(), (500, 2_000));
}

#[test]
fn mint_then_burn_returns_deposit_minus_dust() {
    let s = Setup::new();
    s.add_liquidity(&s.user, 10_007, 40_009);

    let lp = Address::generate(&s.env);
    let (deposit_0, deposit_1) = (3_331_i128, 13_337_i128);
    let liquidity = s.add_liquidity(&lp, deposit_0, deposit_1);

    s.client.transfer(&lp, &s.pair, &liquidity);
    let (out_0, out_1) = s.client.burn(&lp);

    // token_0 limits the share count, so it comes back minus rounding dust
    assert_eq!((out_0, out_1), (3_330, 13_321));
    assert!(deposit_0 - out_0 <= 1);
    assert!(out_1 <= deposit_1);
}

#[test]
fn burn_without_shares_fails() {
    let s = Setup::new();
    s.add_liquidity(&s.user, 1_000, 4_000);

    let result = s.client.try_burn(&s.user);
    assert_eq!(result, Err(Ok(PairError::InsufficientLiquidity)));
}

// ============================================================================
// swap
// ============================================================================

#[test]
fn swap_matches_constant_product_quote() {
    let s = Setup::new();
    s.seed_reserves(1_000, 1_000);

    s.admin_0.mint(&s.pair, &100);
    // floor(100 * 997 * 1000 / (1000 * 1000 + 100 * 997)) = 90
    s.client.swap(&0, &90, &s.user, &s.empty_data());

    assert_eq!(s.token_1.balance(&s.user), 90);
    assert_eq!(s.reserves(), (1_100, 910));
}

#[test]
fn swap_one_unit_above_quote_violates_k() {
    let s = Setup::new();
    s.seed_reserves(1_000, 1_000);

    s.admin_0.mint(&s.pair, &100);
    let result = s.client.try_swap(&0, &91, &s.user, &s.empty_data());
    assert_eq!(result, Err(Ok(PairError::InvalidK)));

    // nothing moved
    assert_eq!(s.token_1.balance(&s.user), 0);
    assert_eq!(s.reserves(), (1_000, 1_000));
}

#[test]
fn swap_strictly_grows_k() {
    let s = Setup::new();
    s.add_liquidity(&s.user, 1_000_000, 1_000_000);
    let (r0, r1) = s.reserves();

    s.admin_1.mint(&s.pair, &10_000);
    s.client.swap(&9_000, &0, &s.user, &s.empty_data());

    let (n0, n1) = s.reserves();
    assert!(n0 * n1 > r0 * r1, "fee must grow k");
}

#[test]
fn swap_requires_some_output() {
    let s = Setup::new();
    s.seed_reserves(1_000, 1_000);

    let result = s.client.try_swap(&0, &0, &s.user, &s.empty_data());
    assert_eq!(result, Err(Ok(PairError::InsufficientOutputAmount)));

    let result = s.client.try_swap(&-1, &5, &s.user, &s.empty_data());
    assert_eq!(result, Err(Ok(PairError::InsufficientOutputAmount)));
}

#[test]
fn swap_cannot_drain_a_reserve() {
    let s = Setup::new();
    s.seed_reserves(1_000, 1_000);
    s.admin_0.mint(&s.pair, &1_000_000);

    let result = s.client.try_swap(&0, &1_000, &s.user, &s.empty_data());
    assert_eq!(result, Err(Ok(PairError::InsufficientLiquidity)));
}

#[test]
fn swap_rejects_token_as_recipient() {
    let s = Setup::new();
    s.seed_reserves(1_000, 1_000);
    s.admin_0.mint(&s.pair, &100);

    let result = s
        .client
        .try_swap(&0, &10, &s.token_0.address, &s.empty_data());
    assert_eq!(result, Err(Ok(PairError::InvalidTo)));

    let result = s
        .client
        .try_swap(&0, &10, &s.token_1.address, &s.empty_data());
    assert_eq!(result, Err(Ok(PairError::InvalidTo)));
}

#[test]
fn swap_without_input_fails() {
    let s = Setup::new();
    s.seed_reserves(1_000, 1_000);

    let result = s.client.try_swap(&0, &10, &s.user, &s.empty_data());
    assert_eq!(result, Err(Ok(PairError::InsufficientInputAmount)));
    assert_eq!(s.token_1.balance(&s.user), 0);
}

#[test]
fn swap_on_uninitialized_pair_fails() {
    let env = Env::default();
    env.mock_all_auths();
    let pair = env.register_contract(None, Pair);
    let client = PairClient::new(&env, &pair);
    let to = Address::generate(&env);

    let result = client.try_swap(&0, &10, &to, &Bytes::new(&env));
    assert_eq!(result, Err(Ok(PairError::NotInitialized)));
}

// ============================================================================
// protocol fee
// ============================================================================

#[test]
fn protocol_fee_mints_to_fee_to_on_next_liquidity_event() {
    let s = Setup::new();
    let fee_to = Address::generate(&s.env);
    s.factory.set_fee_to(&fee_to);

    s.add_liquidity(&s.user, 1_000_000, 1_000_000);
    assert_eq!(s.client.k_last(), ponder_math::mul_wide(&s.env, 1_000_000, 1_000_000).unwrap());

    // trade back and forth to accrue fees
    for _ in 0..5 {
        s.admin_0.mint(&s.pair, &100_000);
        s.client.swap(&0, &90_000, &s.user, &s.empty_data());
        s.admin_1.mint(&s.pair, &100_000);
        s.client.swap(&90_000, &0, &s.user, &s.empty_data());
    }
    assert_eq!(s.client.balance(&fee_to), 0, "fee is only realised on mint/burn");

    s.client.transfer(&s.user, &s.pair, &1_000);
    s.client.burn(&s.user);

    assert!(s.client.balance(&fee_to) > 0, "protocol share minted");
    let (r0, r1) = s.reserves();
    assert_eq!(s.client.k_last(), ponder_math::mul_wide(&s.env, r0, r1).unwrap());
}

#[test]
fn k_last_stays_zero_while_fee_is_off() {
    let s = Setup::new();
    s.add_liquidity(&s.user, 1_000_000, 1_000_000);

    assert_eq!(s.client.k_last(), soroban_sdk::U256::from_u32(&s.env, 0));
}
