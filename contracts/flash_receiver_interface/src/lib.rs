#![no_std]

use soroban_sdk::{contractclient, Address, Bytes, Env};

/// Flash swap receiver interface.
///
/// When `Pair::swap` is called with a non-empty `data` payload, the pair
/// transfers the requested outputs to `to` first and then invokes
/// `on_flash_swap` on it. Before the callback returns the receiver must
/// send enough of token_0 and/or token_1 back to `pair` for the
/// fee-adjusted constant-product check to pass, otherwise the whole swap
/// is rolled back.
#[contractclient(name = "FlashReceiverClient")]
pub trait FlashReceiver {
    fn on_flash_swap(
        env: Env,
        pair: Address,
        token_0: Address,
        token_1: Address,
        amount_0_out: i128,
        amount_1_out: i128,
        data: Bytes,
    );
}
