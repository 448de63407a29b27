use soroban_sdk::{Address, Env, Symbol, U256};

pub struct OracleEvents;

impl OracleEvents {
    /// Emitted whenever `update` records an observation.
    ///
    /// Topics: `("price_updated", pair)`
    /// Data:   `(price_average, timestamp)`
    ///
    /// `price_average` is the UQ112x112 price of token_0 in token_1 averaged
    /// since the previous observation, or the spot price for the first one.
    pub fn price_updated(env: &Env, pair: &Address, price_average: &U256, timestamp: u64) {
        env.events().publish(
            (Symbol::new(env, "price_updated"), pair.clone()),
            (price_average.clone(), timestamp),
        );
    }
}
