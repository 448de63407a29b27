use soroban_sdk::{token::TokenClient, Address, Bytes, Env};

use ponder_flash_receiver_interface::FlashReceiverClient;

use crate::{
    errors::PairError,
    events::PairEvents,
    math::fee_adjusted_k_holds,
    oracle::update_reserves,
    storage::{get_pair_state, set_pair_state, PairStorage},
};

/// A swap whose outputs have already left the pair but whose inputs have
/// not been checked yet.
///
/// The only way forward is [`PendingSwap::validate`], which reads the
/// post-callback balances and consumes the pending state.
pub struct PendingSwap {
    state: PairStorage,
    amount_0_out: i128,
    amount_1_out: i128,
    to: Address,
}

/// A swap that passed the fee-adjusted invariant and can be committed.
pub struct ValidatedSwap {
    state: PairStorage,
    balance_0: i128,
    balance_1: i128,
    amount_0_in: i128,
    amount_1_in: i128,
    amount_0_out: i128,
    amount_1_out: i128,
    to: Address,
}

impl PendingSwap {
    /// Validates the request and optimistically transfers the outputs.
    ///
    /// # Errors
    /// | Error                      | Condition                                   |
    /// |----------------------------|---------------------------------------------|
    /// | `InsufficientOutputAmount` | both outputs zero, or either negative       |
    /// | `NotInitialized`           | pair never initialized                      |
    /// | `InsufficientLiquidity`    | an output is not below its reserve          |
    /// | `InvalidTo`                | `to` is one of the pair's tokens            |
    pub fn begin(
        env: &Env,
        amount_0_out: i128,
        amount_1_out: i128,
        to: Address,
    ) -> Result<Self, PairError> {
        if amount_0_out < 0 || amount_1_out < 0 || (amount_0_out == 0 && amount_1_out == 0) {
            return Err(PairError::InsufficientOutputAmount);
        }

        let state = get_pair_state(env).ok_or(PairError::NotInitialized)?;
        if amount_0_out >= state.reserve_0 || amount_1_out >= state.reserve_1 {
            return Err(PairError::InsufficientLiquidity);
        }
        if to == state.token_0 || to == state.token_1 {
            return Err(PairError::InvalidTo);
        }

        let contract = env.current_contract_address();
        if amount_0_out > 0 {
            TokenClient::new(env, &state.token_0).transfer(&contract, &to, &amount_0_out);
        }
        if amount_1_out > 0 {
            TokenClient::new(env, &state.token_1).transfer(&contract, &to, &amount_1_out);
        }

        Ok(Self { state, amount_0_out, amount_1_out, to })
    }

    /// Hands control to the borrower when `data` is non-empty. The receiver
    /// runs before any input has been checked.
    pub fn call_receiver(&self, env: &Env, data: &Bytes) {
        if data.is_empty() {
            return;
        }
        FlashReceiverClient::new(env, &self.to).on_flash_swap(
            &env.current_contract_address(),
            &self.state.token_0,
            &self.state.token_1,
            &self.amount_0_out,
            &self.amount_1_out,
            data,
        );
    }

    /// Derives the inputs from balance deltas and enforces
    /// `(b0*1000 - in0*3) * (b1*1000 - in1*3) >= r0*r1*1000^2`.
    pub fn validate(self, env: &Env) -> Result<ValidatedSwap, PairError> {
        let contract = env.current_contract_address();
        let balance_0 = TokenClient::new(env, &self.state.token_0).balance(&contract);
        let balance_1 = TokenClient::new(env, &self.state.token_1).balance(&contract);

        let amount_0_in = input_amount(balance_0, self.state.reserve_0, self.amount_0_out);
        let amount_1_in = input_amount(balance_1, self.state.reserve_1, self.amount_1_out);
        if amount_0_in == 0 && amount_1_in == 0 {
            return Err(PairError::InsufficientInputAmount);
        }

        if !fee_adjusted_k_holds(
            env,
            balance_0,
            balance_1,
            amount_0_in,
            amount_1_in,
            self.state.reserve_0,
            self.state.reserve_1,
        )? {
            return Err(PairError::InvalidK);
        }

        Ok(ValidatedSwap {
            state: self.state,
            balance_0,
            balance_1,
            amount_0_in,
            amount_1_in,
            amount_0_out: self.amount_0_out,
            amount_1_out: self.amount_1_out,
            to: self.to,
        })
    }
}

impl ValidatedSwap {
    /// Writes the new reserves (accumulating prices first) and emits.
    pub fn commit(mut self, env: &Env) -> Result<(), PairError> {
        update_reserves(env, &mut self.state, self.balance_0, self.balance_1)?;
        set_pair_state(env, &self.state);

        PairEvents::sync(env, self.state.reserve_0, self.state.reserve_1);
        PairEvents::swap(
            env,
            &self.to,
            self.amount_0_in,
            self.amount_1_in,
            self.amount_0_out,
            self.amount_1_out,
        );
        Ok(())
    }
}

/// `balance - (reserve - amount_out)` when positive, else zero.
fn input_amount(balance: i128, reserve: i128, amount_out: i128) -> i128 {
    let expected = reserve - amount_out;
    if balance > expected {
        balance - expected
    } else {
        0
    }
}

/// Runs a full swap: optimistic transfer, optional flash callback,
/// invariant check, commit.
pub fn execute_swap(
    env: &Env,
    amount_0_out: i128,
    amount_1_out: i128,
    to: Address,
    data: &Bytes,
) -> Result<(), PairError> {
    let pending = PendingSwap::begin(env, amount_0_out, amount_1_out, to)?;
    pending.call_receiver(env, data);
    pending.validate(env)?.commit(env)
}
