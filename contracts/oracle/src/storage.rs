use soroban_sdk::{contracttype, Address, Env};

use crate::observations::ObservationRing;

const INSTANCE_LIFETIME_THRESHOLD: u32 = 17_280; // ~1 day in 5s ledgers
const INSTANCE_BUMP_AMOUNT: u32 = 518_400; // ~30 days in 5s ledgers
const RING_LIFETIME_THRESHOLD: u32 = 17_280;
const RING_BUMP_AMOUNT: u32 = 518_400;

#[contracttype]
#[derive(Clone, Debug)]
pub struct OracleConfig {
    pub factory: Address,
    /// Quote asset for `get_price_in_usd`.
    pub stablecoin: Address,
}

#[contracttype]
#[derive(Clone, Debug)]
pub enum DataKey {
    Config,
    Ring(Address),
}

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn set_config(env: &Env, config: &OracleConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

pub fn get_config(env: &Env) -> Option<OracleConfig> {
    env.storage().instance().get(&DataKey::Config)
}

pub fn get_ring(env: &Env, pair: &Address) -> Option<ObservationRing> {
    let key = DataKey::Ring(pair.clone());
    let ring = env.storage().persistent().get(&key);
    if ring.is_some() {
        env.storage()
            .persistent()
            .extend_ttl(&key, RING_LIFETIME_THRESHOLD, RING_BUMP_AMOUNT);
    }
    ring
}

pub fn set_ring(env: &Env, pair: &Address, ring: &ObservationRing) {
    let key = DataKey::Ring(pair.clone());
    env.storage().persistent().set(&key, ring);
    env.storage()
        .persistent()
        .extend_ttl(&key, RING_LIFETIME_THRESHOLD, RING_BUMP_AMOUNT);
}

pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}
