use pooled_staking::{PooledStakingContract, PooledStakingContractClient, StakingError};
use proptest::prelude::*;
use proptest_derive::Arbitrary;
use soroban_sdk::testutils::Address as _;
use soroban_sdk::{token, Address, Env, I256};

const STAKERS: usize = 3;
const STAKER_FUNDS: i128 = 1_000_000_000_000_000;

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    Stake {
        #[proptest(strategy = "0usize..STAKERS")]
        who: usize,
        #[proptest(strategy = "1i128..=1_000_000_000_000")]
        amount: i128,
    },
    Inject {
        #[proptest(strategy = "1i128..=1_000_000_000_000_000_000")]
        amount: i128,
    },
    Distribute,
    Claim {
        #[proptest(strategy = "0usize..STAKERS")]
        who: usize,
    },
    Withdraw {
        #[proptest(strategy = "0usize..STAKERS")]
        who: usize,
    },
}

struct Harness<'a> {
    client: PooledStakingContractClient<'a>,
    reward_token: token::TokenClient<'a>,
    reward_admin: token::StellarAssetClient<'a>,
    stakers: Vec<Address>,
    injected: i128,
    paid: i128,
}

fn harness<'a>(env: &Env) -> Harness<'a> {
    env.mock_all_auths();
    env.cost_estimate().budget().reset_unlimited();

    let issuer = Address::generate(env);
    let stake_sac = env.register_stellar_asset_contract_v2(issuer.clone());
    let reward_sac = env.register_stellar_asset_contract_v2(issuer);
    let stake_admin = token::StellarAssetClient::new(env, &stake_sac.address());

    let contract_id = env.register(PooledStakingContract, ());
    let client = PooledStakingContractClient::new(env, &contract_id);
    client.initialize(&stake_sac.address(), &reward_sac.address());

    let stakers = (0..STAKERS)
        .map(|_| {
            let staker = Address::generate(env);
            stake_admin.mint(&staker, &STAKER_FUNDS);
            staker
        })
        .collect();

    Harness {
        client,
        reward_token: token::TokenClient::new(env, &reward_sac.address()),
        reward_admin: token::StellarAssetClient::new(env, &reward_sac.address()),
        stakers,
        injected: 0,
        paid: 0,
    }
}

impl Harness<'_> {
    fn apply(&mut self, op: &Op) {
        match *op {
            Op::Stake { who, amount } => {
                self.client.stake(&self.stakers[who], &amount);
            }
            Op::Inject { amount } => {
                self.reward_admin.mint(&self.client.address, &amount);
                self.injected += amount;
            }
            Op::Distribute => {
                self.client.distribute();
            }
            Op::Claim { who } => {
                self.paid += self.client.claim(&self.stakers[who]);
            }
            Op::Withdraw { who } => match self.client.try_withdraw(&self.stakers[who]) {
                Ok(Ok(withdrawal)) => self.paid += withdrawal.reward,
                Err(Ok(StakingError::InsufficientStake)) => {
                    assert_eq!(self.client.staked(&self.stakers[who]), 0);
                }
                other => panic!("unexpected withdraw outcome: {:?}", other),
            },
        }
    }

    fn check_invariants(&self) {
        let total: i128 = self.stakers.iter().map(|s| self.client.staked(s)).sum();
        assert_eq!(self.client.total_staked(), total, "total_staked drifted");

        let claimable: i128 = self
            .stakers
            .iter()
            .map(|s| self.client.calculate_reward(s))
            .sum();
        let held = self.reward_token.balance(&self.client.address);
        assert!(held >= claimable, "pool cannot cover claimable rewards");
        assert_eq!(held + self.paid, self.injected, "reward tokens leaked");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn ledger_stays_consistent(ops in proptest::collection::vec(any::<Op>(), 1..24)) {
        let env = Env::default();
        let mut h = harness(&env);
        let mut last_acc = I256::from_i32(&env, 0);

        for op in &ops {
            h.apply(op);
            let acc = h.client.get_pool().acc_reward_per_share;
            prop_assert!(acc >= last_acc, "accumulator went backwards");
            last_acc = acc;
        }
        h.check_invariants();
    }

    #[test]
    fn repeated_distribute_adds_nothing(
        stake in 1i128..=1_000_000_000_000,
        reward in 1i128..=1_000_000_000_000_000_000,
    ) {
        let env = Env::default();
        let h = harness(&env);

        h.client.stake(&h.stakers[0], &stake);
        h.reward_admin.mint(&h.client.address, &reward);
        prop_assert_eq!(h.client.distribute(), reward);

        let pool = h.client.get_pool();
        prop_assert_eq!(h.client.distribute(), 0);
        prop_assert_eq!(h.client.get_pool(), pool);
    }

    #[test]
    fn distribution_is_pro_rata_to_stake(
        a in 1i128..=1_000_000_000_000,
        b in 1i128..=1_000_000_000_000,
        reward in 1i128..=1_000_000_000_000_000_000,
    ) {
        let env = Env::default();
        let h = harness(&env);

        // Rewards already waiting when the stakes arrive are shared by both.
        h.reward_admin.mint(&h.client.address, &reward);
        h.client.stake(&h.stakers[0], &a);
        h.client.stake(&h.stakers[1], &b);
        prop_assert_eq!(h.client.distribute(), reward);

        let first = h.client.withdraw(&h.stakers[0]).reward;
        let second = h.client.withdraw(&h.stakers[1]).reward;
        let total = a + b;
        prop_assert!((first - reward * a / total).abs() <= 1);
        prop_assert!((second - reward * b / total).abs() <= 1);
    }

    #[test]
    fn full_exit_never_overpays(
        a in 1i128..=1_000_000_000_000,
        b in 1i128..=1_000_000_000_000,
        reward in 1i128..=1_000_000_000_000_000_000,
    ) {
        let env = Env::default();
        let h = harness(&env);

        h.client.stake(&h.stakers[0], &a);
        h.client.stake(&h.stakers[1], &b);
        h.reward_admin.mint(&h.client.address, &reward);
        h.client.distribute();

        let first = h.client.withdraw(&h.stakers[0]).reward;
        let second = h.client.withdraw(&h.stakers[1]).reward;

        prop_assert!(first + second <= reward);
        // Each side loses at most one base unit to flooring, plus the
        // sub-unit share held back as the scaled remainder.
        prop_assert!(reward - (first + second) <= 2);
        prop_assert_eq!(h.client.total_staked(), 0);
    }
}
