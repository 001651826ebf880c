#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pooled_staking::{PooledStakingContract, PooledStakingContractClient, StakingError};
use soroban_sdk::testutils::Address as _;
use soroban_sdk::{token, Address, Env, I256};

const STAKERS: usize = 4;
const STAKER_FUNDS: i128 = u64::MAX as i128;

#[derive(Arbitrary, Debug)]
enum Op {
    Stake { who: u8, amount: u64 },
    Inject { amount: u64 },
    Distribute,
    Claim { who: u8 },
    Withdraw { who: u8 },
}

fuzz_target!(|ops: Vec<Op>| {
    if ops.len() > 64 {
        return;
    }

    let env = Env::default();
    env.mock_all_auths();
    env.cost_estimate().budget().reset_unlimited();

    let issuer = Address::generate(&env);
    let stake_sac = env.register_stellar_asset_contract_v2(issuer.clone());
    let reward_sac = env.register_stellar_asset_contract_v2(issuer);
    let stake_admin = token::StellarAssetClient::new(&env, &stake_sac.address());
    let reward_admin = token::StellarAssetClient::new(&env, &reward_sac.address());
    let reward_token = token::TokenClient::new(&env, &reward_sac.address());

    let contract_id = env.register(PooledStakingContract, ());
    let client = PooledStakingContractClient::new(&env, &contract_id);
    client.initialize(&stake_sac.address(), &reward_sac.address());

    let stakers: Vec<Address> = (0..STAKERS)
        .map(|_| {
            let staker = Address::generate(&env);
            stake_admin.mint(&staker, &STAKER_FUNDS);
            staker
        })
        .collect();

    let mut injected: i128 = 0;
    let mut paid: i128 = 0;
    let mut last_acc = I256::from_i32(&env, 0);

    for op in ops {
        match op {
            Op::Stake { who, amount } => {
                let staker = &stakers[who as usize % STAKERS];
                match client.try_stake(staker, &(amount as i128)) {
                    Ok(Ok(())) => {}
                    Err(Ok(StakingError::InvalidAmount)) => assert_eq!(amount, 0),
                    Err(Ok(StakingError::TransferFailure)) => {}
                    other => panic!("unexpected stake outcome: {:?}", other),
                }
            }
            Op::Inject { amount } => {
                if amount > 0 {
                    reward_admin.mint(&contract_id, &(amount as i128));
                    injected += amount as i128;
                }
            }
            Op::Distribute => match client.try_distribute() {
                Ok(Ok(_)) => {}
                other => panic!("unexpected distribute outcome: {:?}", other),
            },
            Op::Claim { who } => match client.try_claim(&stakers[who as usize % STAKERS]) {
                Ok(Ok(reward)) => paid += reward,
                other => panic!("unexpected claim outcome: {:?}", other),
            },
            Op::Withdraw { who } => {
                match client.try_withdraw(&stakers[who as usize % STAKERS]) {
                    Ok(Ok(withdrawal)) => paid += withdrawal.reward,
                    Err(Ok(StakingError::InsufficientStake)) => {}
                    other => panic!("unexpected withdraw outcome: {:?}", other),
                }
            }
        }

        let pool = client.get_pool();
        assert!(pool.acc_reward_per_share >= last_acc);
        last_acc = pool.acc_reward_per_share;

        let total: i128 = stakers.iter().map(|s| client.staked(s)).sum();
        assert_eq!(pool.total_staked, total);

        let claimable: i128 = stakers.iter().map(|s| client.calculate_reward(s)).sum();
        let held = reward_token.balance(&contract_id);
        assert!(held >= claimable);
        assert_eq!(held + paid, injected);
    }
});
