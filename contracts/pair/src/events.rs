use soroban_sdk::{symbol_short, Address, Env};

pub struct PairEvents;

impl PairEvents {
    /// Emits a `swap` event after a validated swap.
    ///
    /// Topics: `("swap", to)`
    /// Data:   `(amount_0_in, amount_1_in, amount_0_out, amount_1_out)`
    ///
    /// Input amounts are the balance deltas the pair actually observed, so
    /// fee-on-transfer tokens show up with their net value.
    pub fn swap(
        env: &Env,
        to: &Address,
        amount_0_in: i128,
        amount_1_in: i128,
        amount_0_out: i128,
        amount_1_out: i128,
    ) {
        env.events().publish(
            (symbol_short!("swap"), to.clone()),
            (amount_0_in, amount_1_in, amount_0_out, amount_1_out),
        );
    }

    pub fn mint(env: &Env, to: &Address, amount_0: i128, amount_1: i128) {
        env.events().publish((symbol_short!("mint"), to.clone()), (amount_0, amount_1));
    }

    pub fn burn(env: &Env, to: &Address, amount_0: i128, amount_1: i128) {
        env.events().publish((symbol_short!("burn"), to.clone()), (amount_0, amount_1));
    }

    /// Emitted on every reserve write, including the one inside `mint`,
    /// `burn` and `swap`.
    pub fn sync(env: &Env, reserve_0: i128, reserve_1: i128) {
        env.events().publish((symbol_short!("sync"),), (reserve_0, reserve_1));
    }
}
