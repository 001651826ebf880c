use soroban_sdk::{contracttype, symbol_short, Address, Env, I256};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub stake_token: Address,
    pub reward_token: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakedEvent {
    pub staker: Address,
    pub amount: i128,
    pub total_staked: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DistributedEvent {
    pub amount: i128,
    pub acc_reward_per_share: I256,
    pub total_staked: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClaimedEvent {
    pub staker: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub staker: Address,
    pub stake: i128,
    pub reward: i128,
    pub total_staked: i128,
}

pub fn publish_initialized(env: &Env, stake_token: Address, reward_token: Address) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            stake_token,
            reward_token,
        },
    );
}

pub fn publish_staked(env: &Env, staker: Address, amount: i128, total_staked: i128) {
    env.events().publish(
        (symbol_short!("STAKED"), staker.clone()),
        StakedEvent {
            staker,
            amount,
            total_staked,
        },
    );
}

pub fn publish_distributed(env: &Env, amount: i128, acc_reward_per_share: I256, total_staked: i128) {
    env.events().publish(
        (symbol_short!("DISTRIB"),),
        DistributedEvent {
            amount,
            acc_reward_per_share,
            total_staked,
        },
    );
}

pub fn publish_claimed(env: &Env, staker: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("CLAIMED"), staker.clone()),
        ClaimedEvent { staker, amount },
    );
}

pub fn publish_withdrawn(env: &Env, staker: Address, stake: i128, reward: i128, total_staked: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAWN"), staker.clone()),
        WithdrawnEvent {
            staker,
            stake,
            reward,
            total_staked,
        },
    );
}
