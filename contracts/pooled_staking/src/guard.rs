use soroban_sdk::{symbol_short, Env, Symbol};

use crate::StakingError;

const LOCKED: Symbol = symbol_short!("LOCKED");

/// Run `body` while holding the pool's single-writer lock.
///
/// Every mutating entry point goes through here, so a token callback that
/// tries to re-enter the pool sees the lock and is turned away before it
/// can observe half-updated state. The lock lives in instance storage,
/// which the host rolls back together with everything else when `body`
/// fails.
pub fn with_lock<T>(
    env: &Env,
    body: impl FnOnce() -> Result<T, StakingError>,
) -> Result<T, StakingError> {
    if is_locked(env) {
        return Err(StakingError::Reentrant);
    }
    env.storage().instance().set(&LOCKED, &true);

    let outcome = body();

    env.storage().instance().remove(&LOCKED);
    outcome
}

pub fn is_locked(env: &Env) -> bool {
    env.storage().instance().get(&LOCKED).unwrap_or(false)
}
