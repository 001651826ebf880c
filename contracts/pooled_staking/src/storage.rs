use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, I256};

// ── Storage key constants ───────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const CONFIG: Symbol = symbol_short!("CONFIG");
const POOL: Symbol = symbol_short!("POOL");
const POSITION: Symbol = symbol_short!("POS");

const INSTANCE_TTL_THRESHOLD: u32 = 518_400; // ~30 days
const INSTANCE_TTL_EXTEND_TO: u32 = 1_036_800; // ~60 days
const POSITION_TTL_THRESHOLD: u32 = 5_184_000; // ~60 days
const POSITION_TTL_EXTEND_TO: u32 = 10_368_000; // ~120 days

// ── Types ───────────────────────────────────────────────────────────────────

/// Token pair the pool was initialised with.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub stake_token: Address,
    pub reward_token: Address,
}

/// Aggregate accounting shared by every position.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolState {
    /// Sum of `Position::staked` over all accounts.
    pub total_staked: i128,
    /// Reward earned per staked unit since inception, scaled by `PRECISION`.
    /// Held in 256 bits: a single base unit staked against an ordinary
    /// injection already exceeds `i128` once scaled.
    pub acc_reward_per_share: I256,
    /// Reward-token balance at the last distribution, less payouts since.
    pub last_reward_balance: i128,
    /// Scaled reward units not yet folded into the accumulator.
    pub reward_remainder: i128,
}

impl PoolState {
    pub fn empty(env: &Env) -> Self {
        PoolState {
            total_staked: 0,
            acc_reward_per_share: I256::from_i32(env, 0),
            last_reward_balance: 0,
            reward_remainder: 0,
        }
    }
}

/// A single participant's stake and settlement bookkeeping.
///
/// Records are zeroed on withdrawal, never removed, so a returning
/// participant starts from a consistent snapshot.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Position {
    pub staked: i128,
    /// Value of `acc_reward_per_share` already settled into this position.
    pub reward_debt: I256,
    /// Reward settled by an earlier `stake` and not yet transferred.
    pub unclaimed: i128,
}

impl Position {
    pub fn empty(env: &Env) -> Self {
        Position {
            staked: 0,
            reward_debt: I256::from_i32(env, 0),
            unclaimed: 0,
        }
    }
}

// ── Storage helpers ─────────────────────────────────────────────────────────

pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND_TO);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&INITIALIZED)
}

pub fn set_config(env: &Env, config: &Config) {
    env.storage().instance().set(&CONFIG, config);
    env.storage().instance().set(&INITIALIZED, &true);
}

pub fn get_config(env: &Env) -> Option<Config> {
    env.storage().instance().get(&CONFIG)
}

pub fn get_pool(env: &Env) -> PoolState {
    env.storage()
        .instance()
        .get(&POOL)
        .unwrap_or_else(|| PoolState::empty(env))
}

pub fn set_pool(env: &Env, pool: &PoolState) {
    env.storage().instance().set(&POOL, pool);
}

fn position_key(account: &Address) -> (Symbol, Address) {
    (POSITION, account.clone())
}

/// Load a position, returning an empty one for accounts that never staked.
pub fn get_position(env: &Env, account: &Address) -> Position {
    let key = position_key(account);
    match env.storage().persistent().get::<_, Position>(&key) {
        Some(position) => {
            env.storage()
                .persistent()
                .extend_ttl(&key, POSITION_TTL_THRESHOLD, POSITION_TTL_EXTEND_TO);
            position
        }
        None => Position::empty(env),
    }
}

pub fn set_position(env: &Env, account: &Address, position: &Position) {
    let key = position_key(account);
    env.storage().persistent().set(&key, position);
    env.storage()
        .persistent()
        .extend_ttl(&key, POSITION_TTL_THRESHOLD, POSITION_TTL_EXTEND_TO);
}
