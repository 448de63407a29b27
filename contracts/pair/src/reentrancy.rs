use soroban_sdk::Env;

use crate::{
    errors::PairError,
    storage::{get_reentrancy_guard, set_reentrancy_guard, ReentrancyGuard},
};

/// Enters the pair's critical section. Reverts with `Locked` if a mutating
/// call on this pair is already in flight.
///
/// The guard lives in the pair's own instance storage, so it is keyed by
/// pool identity: two different pairs never contend for it. A failed
/// invocation is rolled back by the host, which clears the flag too.
pub fn acquire(env: &Env) -> Result<(), PairError> {
    if get_reentrancy_guard(env).locked {
        return Err(PairError::Locked);
    }
    set_reentrancy_guard(env, &ReentrancyGuard { locked: true });
    Ok(())
}

/// Leaves the critical section on the success path.
pub fn release(env: &Env) {
    set_reentrancy_guard(env, &ReentrancyGuard { locked: false });
}

/// Runs `f` inside the critical section.
pub fn guarded<T>(env: &Env, f: impl FnOnce() -> Result<T, PairError>) -> Result<T, PairError> {
    acquire(env)?;
    let out = f()?;
    release(env);
    Ok(out)
}
