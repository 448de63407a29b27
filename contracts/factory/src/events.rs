use soroban_sdk::{Address, Env, Symbol};

pub struct FactoryEvents;

impl FactoryEvents {
    /// Topics: `("pair_created", token_0, token_1)`
    /// Data:   `(pair, index)` where `index` is the pair's position in
    ///         `all_pairs`.
    pub fn pair_created(
        env: &Env,
        token_0: &Address,
        token_1: &Address,
        pair: &Address,
        index: u32,
    ) {
        env.events().publish(
            (Symbol::new(env, "pair_created"), token_0.clone(), token_1.clone()),
            (pair.clone(), index),
        );
    }
}
