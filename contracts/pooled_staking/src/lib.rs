#![no_std]

pub mod events;
mod guard;
pub mod rewards;
mod storage;

pub use storage::{Config, PoolState, Position};

use soroban_sdk::{contract, contractimpl, contracttype, log, token, Address, Env};

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum StakingError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    InvalidAmount = 3,
    InsufficientStake = 4,
    TransferFailure = 5,
    ArithmeticOverflow = 6,
    TokensIdentical = 7,
    Reentrant = 8,
}

/// Amounts paid out by `withdraw`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Withdrawal {
    pub stake: i128,
    pub reward: i128,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct PooledStakingContract;

#[contractimpl]
impl PooledStakingContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bind the pool to its token pair.
    ///
    /// * `stake_token`  – token participants lock into the pool.
    /// * `reward_token` – token injected by the custodian and paid out
    ///   pro rata. Must differ from `stake_token`, otherwise deposits would
    ///   be mistaken for fresh rewards.
    pub fn initialize(
        env: Env,
        stake_token: Address,
        reward_token: Address,
    ) -> Result<(), StakingError> {
        if storage::is_initialized(&env) {
            return Err(StakingError::AlreadyInitialized);
        }
        if stake_token == reward_token {
            return Err(StakingError::TokensIdentical);
        }

        storage::set_config(
            &env,
            &Config {
                stake_token: stake_token.clone(),
                reward_token: reward_token.clone(),
            },
        );
        storage::set_pool(&env, &PoolState::empty(&env));
        storage::extend_instance_ttl(&env);

        events::publish_initialized(&env, stake_token, reward_token);

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` stake tokens.
    ///
    /// The position's reward up to the last distribution is parked in
    /// `unclaimed` so the deposit cannot dilute or inflate it. Reward tokens
    /// that arrived since then are not touched here; the next distribution
    /// splits them over everyone staked at that point, this deposit
    /// included.
    pub fn stake(env: Env, staker: Address, amount: i128) -> Result<(), StakingError> {
        let config = Self::load_config(&env)?;
        staker.require_auth();

        if amount <= 0 {
            return Err(StakingError::InvalidAmount);
        }

        guard::with_lock(&env, || {
            let mut pool = storage::get_pool(&env);

            let mut position = storage::get_position(&env, &staker);
            position.unclaimed = Self::pending(&env, &pool, &position)?;
            position.reward_debt = pool.acc_reward_per_share.clone();
            position.staked = position
                .staked
                .checked_add(amount)
                .ok_or(StakingError::ArithmeticOverflow)?;
            pool.total_staked = pool
                .total_staked
                .checked_add(amount)
                .ok_or(StakingError::ArithmeticOverflow)?;

            storage::set_position(&env, &staker, &position);
            storage::set_pool(&env, &pool);
            storage::extend_instance_ttl(&env);

            Self::transfer(
                &env,
                &config.stake_token,
                &staker,
                &env.current_contract_address(),
                amount,
            )?;

            log!(&env, "stake", staker, amount, pool.total_staked);
            events::publish_staked(&env, staker.clone(), amount, pool.total_staked);

            Ok(())
        })
    }

    /// Exit the pool: return the whole stake and every unpaid reward.
    ///
    /// Reward tokens waiting in the pool are distributed first, so leaving
    /// does not forfeit them. Partial withdrawals are not supported.
    pub fn withdraw(env: Env, staker: Address) -> Result<Withdrawal, StakingError> {
        let config = Self::load_config(&env)?;
        staker.require_auth();

        guard::with_lock(&env, || {
            let mut pool = storage::get_pool(&env);
            Self::sync_rewards(&env, &config, &mut pool)?;

            let position = storage::get_position(&env, &staker);
            if position.staked <= 0 {
                return Err(StakingError::InsufficientStake);
            }

            let stake = position.staked;
            let reward = Self::pending(&env, &pool, &position)?;

            pool.total_staked = pool
                .total_staked
                .checked_sub(stake)
                .ok_or(StakingError::ArithmeticOverflow)?;
            pool.last_reward_balance = pool
                .last_reward_balance
                .checked_sub(reward)
                .ok_or(StakingError::ArithmeticOverflow)?;

            storage::set_position(
                &env,
                &staker,
                &Position {
                    staked: 0,
                    reward_debt: pool.acc_reward_per_share.clone(),
                    unclaimed: 0,
                },
            );
            storage::set_pool(&env, &pool);
            storage::extend_instance_ttl(&env);

            let this = env.current_contract_address();
            Self::transfer(&env, &config.stake_token, &this, &staker, stake)?;
            if reward > 0 {
                Self::transfer(&env, &config.reward_token, &this, &staker, reward)?;
            }

            log!(&env, "withdraw", staker, stake, reward);
            events::publish_withdrawn(&env, staker.clone(), stake, reward, pool.total_staked);

            Ok(Withdrawal { stake, reward })
        })
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Attribute every reward token that reached the pool since the last
    /// distribution to the current stakers.
    ///
    /// Returns the amount attributed. With nobody staked the tokens stay
    /// undistributed and are picked up by a later call.
    pub fn distribute(env: Env) -> Result<i128, StakingError> {
        let config = Self::load_config(&env)?;

        guard::with_lock(&env, || {
            let mut pool = storage::get_pool(&env);
            let distributed = Self::sync_rewards(&env, &config, &mut pool)?;
            storage::set_pool(&env, &pool);
            storage::extend_instance_ttl(&env);
            Ok(distributed)
        })
    }

    /// Pay out the caller's reward while leaving the stake in place.
    ///
    /// Like `withdraw`, pending reward tokens are distributed first.
    ///
    /// Nothing to claim is not an error; the call returns `0` and moves no
    /// tokens.
    pub fn claim(env: Env, staker: Address) -> Result<i128, StakingError> {
        let config = Self::load_config(&env)?;
        staker.require_auth();

        guard::with_lock(&env, || {
            let mut pool = storage::get_pool(&env);
            Self::sync_rewards(&env, &config, &mut pool)?;

            let mut position = storage::get_position(&env, &staker);
            let reward = Self::pending(&env, &pool, &position)?;

            if reward > 0 {
                position.unclaimed = 0;
                position.reward_debt = pool.acc_reward_per_share.clone();
                pool.last_reward_balance = pool
                    .last_reward_balance
                    .checked_sub(reward)
                    .ok_or(StakingError::ArithmeticOverflow)?;
                storage::set_position(&env, &staker, &position);
            }
            storage::set_pool(&env, &pool);
            storage::extend_instance_ttl(&env);

            if reward > 0 {
                Self::transfer(
                    &env,
                    &config.reward_token,
                    &env.current_contract_address(),
                    &staker,
                    reward,
                )?;
                log!(&env, "claim", staker, reward);
                events::publish_claimed(&env, staker.clone(), reward);
            }

            Ok(reward)
        })
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Return the account's current staked balance.
    pub fn staked(env: Env, account: Address) -> i128 {
        storage::get_position(&env, &account).staked
    }

    /// Return the reward the account could claim against the last
    /// distribution.
    ///
    /// Reward tokens that arrived after that distribution are not included;
    /// see `undistributed_rewards`.
    pub fn calculate_reward(env: Env, account: Address) -> Result<i128, StakingError> {
        let pool = storage::get_pool(&env);
        let position = storage::get_position(&env, &account);
        Self::pending(&env, &pool, &position)
    }

    /// Reward tokens received but not yet attributed to any stake.
    pub fn undistributed_rewards(env: Env) -> Result<i128, StakingError> {
        let config = Self::load_config(&env)?;
        let pool = storage::get_pool(&env);
        let balance = Self::reward_balance(&env, &config);
        let pending = balance
            .checked_sub(pool.last_reward_balance)
            .ok_or(StakingError::ArithmeticOverflow)?;
        Ok(pending.max(0))
    }

    pub fn total_staked(env: Env) -> i128 {
        storage::get_pool(&env).total_staked
    }

    pub fn get_pool(env: Env) -> PoolState {
        storage::get_pool(&env)
    }

    pub fn get_position(env: Env, account: Address) -> Position {
        storage::get_position(&env, &account)
    }

    pub fn get_config(env: Env) -> Result<Config, StakingError> {
        Self::load_config(&env)
    }

    pub fn is_initialized(env: Env) -> bool {
        storage::is_initialized(&env)
    }

    /// Contract version
    pub fn version() -> u32 {
        1
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn load_config(env: &Env) -> Result<Config, StakingError> {
        storage::get_config(env).ok_or(StakingError::NotInitialized)
    }

    fn reward_balance(env: &Env, config: &Config) -> i128 {
        token::TokenClient::new(env, &config.reward_token).balance(&env.current_contract_address())
    }

    fn pending(env: &Env, pool: &PoolState, position: &Position) -> Result<i128, StakingError> {
        rewards::earned(
            env,
            position.staked,
            &pool.acc_reward_per_share,
            &position.reward_debt,
            position.unclaimed,
        )
        .ok_or(StakingError::ArithmeticOverflow)
    }

    /// Fold newly arrived reward tokens into the accumulator.
    ///
    /// 1. Measure the reward-token balance against `last_reward_balance`.
    /// 2. Spread the difference over `total_staked`, carrying the rounding
    ///    remainder forward.
    /// 3. Advance `last_reward_balance` so the same tokens are never
    ///    attributed twice.
    ///
    /// Only `pool` is updated; persisting it is the caller's job.
    fn sync_rewards(
        env: &Env,
        config: &Config,
        pool: &mut PoolState,
    ) -> Result<i128, StakingError> {
        let balance = Self::reward_balance(env, config);
        let incoming = balance
            .checked_sub(pool.last_reward_balance)
            .ok_or(StakingError::ArithmeticOverflow)?;

        if incoming <= 0 || pool.total_staked == 0 {
            return Ok(0);
        }

        let accrual =
            rewards::accrue(env, incoming, pool.reward_remainder, pool.total_staked)
                .ok_or(StakingError::ArithmeticOverflow)?;

        pool.acc_reward_per_share = pool.acc_reward_per_share.add(&accrual.delta);
        pool.reward_remainder = accrual.remainder;
        pool.last_reward_balance = balance;

        log!(env, "distribute", incoming, pool.total_staked);
        events::publish_distributed(
            env,
            incoming,
            pool.acc_reward_per_share.clone(),
            pool.total_staked,
        );

        Ok(incoming)
    }

    /// Move tokens through the token contract, surfacing a refusal as
    /// `TransferFailure` instead of trapping.
    fn transfer(
        env: &Env,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: i128,
    ) -> Result<(), StakingError> {
        match token::TokenClient::new(env, token).try_transfer(from, to, &amount) {
            Ok(Ok(())) => Ok(()),
            _ => {
                log!(env, "transfer declined", token.clone(), amount);
                Err(StakingError::TransferFailure)
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
