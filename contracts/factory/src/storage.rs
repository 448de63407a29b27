use soroban_sdk::{contracttype, Address, BytesN, Env};

const INSTANCE_LIFETIME_THRESHOLD: u32 = 17280; // ~1 day in 5s ledgers
const INSTANCE_BUMP_AMOUNT: u32 = 518400; // ~30 days in 5s ledgers
const PAIR_LIFETIME_THRESHOLD: u32 = 17280;
const PAIR_BUMP_AMOUNT: u32 = 518400;

#[contracttype]
#[derive(Clone, Debug)]
pub struct FactoryStorage {
    pub pair_wasm_hash: BytesN<32>,
    pub fee_to: Option<Address>,
    pub pair_count: u32,
}

#[contracttype]
#[derive(Clone, Debug)]
pub enum DataKey {
    Factory,
    /// Keyed by the sorted token pair.
    Pair(Address, Address),
    PairAt(u32),
}

pub fn get_factory_storage(env: &Env) -> Option<FactoryStorage> {
    env.storage().instance().get(&DataKey::Factory)
}

pub fn set_factory_storage(env: &Env, storage: &FactoryStorage) {
    env.storage().instance().set(&DataKey::Factory, storage);
}

pub fn has_factory_storage(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Factory)
}

fn read_persistent(env: &Env, key: &DataKey) -> Option<Address> {
    let pair = env.storage().persistent().get(key);
    if pair.is_some() {
        env.storage()
            .persistent()
            .extend_ttl(key, PAIR_LIFETIME_THRESHOLD, PAIR_BUMP_AMOUNT);
    }
    pair
}

fn write_persistent(env: &Env, key: &DataKey, pair: &Address) {
    env.storage().persistent().set(key, pair);
    env.storage()
        .persistent()
        .extend_ttl(key, PAIR_LIFETIME_THRESHOLD, PAIR_BUMP_AMOUNT);
}

/// `token_0` must sort before `token_1`.
pub fn get_pair(env: &Env, token_0: Address, token_1: Address) -> Option<Address> {
    read_persistent(env, &DataKey::Pair(token_0, token_1))
}

pub fn set_pair(env: &Env, token_0: Address, token_1: Address, pair: &Address) {
    write_persistent(env, &DataKey::Pair(token_0, token_1), pair);
}

pub fn get_pair_at(env: &Env, index: u32) -> Option<Address> {
    read_persistent(env, &DataKey::PairAt(index))
}

pub fn set_pair_at(env: &Env, index: u32, pair: &Address) {
    write_persistent(env, &DataKey::PairAt(index), pair);
}

/// Extend instance storage TTL to keep contract alive.
pub fn extend_instance_ttl(env: &Env) {
    env.storage().instance().extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}
