#![cfg_attr(not(test), no_std)]

#[cfg(test)]
extern crate std;

mod errors;
mod events;
mod storage;


use soroban_sdk::xdr::ToXdr;
use soroban_sdk::{contract, contractclient, contractimpl, Address, Bytes, BytesN, Env};
pub use errors::FactoryError;
use storage::FactoryStorage;

#[contractclient(name = "PairClient")]
pub trait PairInterface {
    fn initialize(env: Env, factory: Address, token_0: Address, token_1: Address);
}

fn sort(token_a: Address, token_b: Address) -> Result<(Address, Address), FactoryError> {
    if token_a == token_b {
        return Err(FactoryError::IdenticalAddresses);
    }
    if token_a < token_b {
        Ok((token_a, token_b))
    } else {
        Ok((token_b, token_a))
    }
}

#[contract]
pub struct Factory;

#[contractimpl]
impl Factory {
    /// Stores the pair wasm every pool is deployed from, and the account
    /// that collects the protocol share of swap fees (`None` disables it).
    pub fn initialize(
        env: Env,
        pair_wasm_hash: BytesN<32>,
        fee_to: Option<Address>,
    ) -> Result<(), FactoryError> {
        if storage::has_factory_storage(&env) {
            return Err(FactoryError::AlreadyInitialized);
        }

        let storage = FactoryStorage { pair_wasm_hash, fee_to, pair_count: 0 };
        storage::set_factory_storage(&env, &storage);
        storage::extend_instance_ttl(&env);
        Ok(())
    }

    /// Deploys and initializes the pool for `(token_a, token_b)`. The
    /// deployment salt is derived from the sorted tokens, so each pair
    /// has exactly one address.
    pub fn create_pair(
        env: Env, token_a: Address, token_b: Address,
    ) -> Result<Address, FactoryError> {
        let (token_0, token_1) = sort(token_a, token_b)?;

        if storage::get_pair(&env, token_0.clone(), token_1.clone()).is_some() {
            return Err(FactoryError::PairExists);
        }

        let mut factory_storage = storage::get_factory_storage(&env)
            .ok_or(FactoryError::NotInitialized)?;

        let mut salt_data = Bytes::new(&env);
        salt_data.append(&token_0.clone().to_xdr(&env));
        salt_data.append(&token_1.clone().to_xdr(&env));
        let salt = env.crypto().sha256(&salt_data);

        let pair_address = env
            .deployer()
            .with_current_contract(salt)
            .deploy(factory_storage.pair_wasm_hash.clone());

        PairClient::new(&env, &pair_address).initialize(
            &env.current_contract_address(),
            &token_0,
            &token_1,
        );

        let index = factory_storage.pair_count;
        storage::set_pair(&env, token_0.clone(), token_1.clone(), &pair_address);
        storage::set_pair_at(&env, index, &pair_address);
        factory_storage.pair_count += 1;
        storage::set_factory_storage(&env, &factory_storage);
        storage::extend_instance_ttl(&env);

        events::FactoryEvents::pair_created(&env, &token_0, &token_1, &pair_address, index);

        Ok(pair_address)
    }

    /// Pool for the two tokens, in either order.
    pub fn get_pair(env: Env, token_a: Address, token_b: Address) -> Option<Address> {
        let (token_0, token_1) = sort(token_a, token_b).ok()?;
        storage::get_pair(&env, token_0, token_1)
    }

    pub fn all_pairs(env: Env, index: u32) -> Option<Address> {
        storage::get_pair_at(&env, index)
    }

    pub fn all_pairs_length(env: Env) -> u32 {
        storage::get_factory_storage(&env).map(|s| s.pair_count).unwrap_or(0)
    }

    /// Read by every pool before `mint`/`burn` to decide whether the
    /// protocol fee is on.
    pub fn fee_to(env: Env) -> Option<Address> {
        storage::get_factory_storage(&env).and_then(|s| s.fee_to)
    }

    pub fn pair_wasm_hash(env: Env) -> Result<BytesN<32>, FactoryError> {
        storage::get_factory_storage(&env)
            .map(|s| s.pair_wasm_hash)
            .ok_or(FactoryError::NotInitialized)
    }
}
