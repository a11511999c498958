//! Randomised operation sequences checked against the pool's accounting
//! invariants after every step.

use std::vec::Vec as StdVec;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use soroban_sdk::{
    testutils::{Address as _, Ledger},
    token, vec, Address, Env,
};

use crate::*;

const STAKERS: usize = 3;

#[derive(Clone, Debug, Arbitrary)]
enum Action {
    Stake(
        #[proptest(strategy = "0usize..STAKERS")] usize,
        #[proptest(strategy = "1i128..10_000")] i128,
    ),
    Withdraw(
        #[proptest(strategy = "0usize..STAKERS")] usize,
        #[proptest(strategy = "1i128..10_000")] i128,
    ),
    Exit(#[proptest(strategy = "0usize..STAKERS")] usize),
    Claim(#[proptest(strategy = "0usize..STAKERS")] usize),
    Advance(#[proptest(strategy = "1u64..5_000")] u64),
    Fund(
        #[proptest(strategy = "1i128..1_000_000")] i128,
        #[proptest(strategy = "1u64..10_000")] u64,
    ),
}

struct Harness<'a> {
    env: Env,
    client: MegaPoolContractClient<'a>,
    owner: Address,
    reward_token: Address,
    stakers: StdVec<Address>,
}

impl Harness<'_> {
    fn new() -> Self {
        let env = Env::default();
        env.mock_all_auths();
        env.ledger().set_timestamp(1_000);

        let token_admin = Address::generate(&env);
        let staking_token = env
            .register_stellar_asset_contract_v2(token_admin.clone())
            .address();
        let reward_token = env
            .register_stellar_asset_contract_v2(token_admin)
            .address();

        let contract_id = env.register(MegaPoolContract, ());
        let client = MegaPoolContractClient::new(&env, &contract_id);
        let owner = Address::generate(&env);
        client.initialize(&owner, &staking_token, &reward_token);

        let staking = token::StellarAssetClient::new(&env, &staking_token);
        let stakers = (0..STAKERS)
            .map(|_| {
                let staker = Address::generate(&env);
                staking.mint(&staker, &1_000_000);
                staker
            })
            .collect();

        Harness {
            env,
            client,
            owner,
            reward_token,
            stakers,
        }
    }

    fn apply(&self, action: &Action) {
        // Rejected operations are part of the exploration; only the state
        // they leave behind is checked.
        match *action {
            Action::Stake(who, amount) => {
                let _ = self.client.try_stake(&self.stakers[who], &amount);
            }
            Action::Withdraw(who, amount) => {
                let _ = self.client.try_withdraw(&self.stakers[who], &amount);
            }
            Action::Exit(who) => {
                let _ = self.client.try_exit(&self.stakers[who]);
            }
            Action::Claim(who) => {
                let _ = self.client.try_get_reward(&self.stakers[who]);
            }
            Action::Advance(seconds) => {
                let now = self.env.ledger().timestamp();
                self.env.ledger().set_timestamp(now + seconds);
            }
            Action::Fund(amount, duration) => {
                token::StellarAssetClient::new(&self.env, &self.reward_token)
                    .mint(&self.owner, &amount);
                self.client.notify_reward_amount(
                    &self.owner,
                    &vec![
                        &self.env,
                        RewardEntry {
                            token: self.reward_token.clone(),
                            amount,
                            duration,
                        },
                    ],
                );
            }
        }
    }

    fn pending(&self, staker: &Address) -> i128 {
        self.client.earned_for(staker, &self.reward_token)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn accounting_invariants_hold(actions in proptest::collection::vec(any::<Action>(), 1..24)) {
        let h = Harness::new();
        let mut last_rpt = 0i128;

        for action in &actions {
            h.apply(action);

            // Conservation.
            let sum: i128 = h.stakers.iter().map(|s| h.client.balance_of(s)).sum();
            prop_assert_eq!(h.client.total_staked(), sum);

            // Monotonic accumulator.
            let stream = h.client.get_stream(&h.reward_token);
            prop_assert!(stream.reward_per_token_stored >= last_rpt);
            last_rpt = stream.reward_per_token_stored;

            // Non-negative and idempotent pending rewards.
            let mut owed = 0i128;
            for staker in &h.stakers {
                let pending = h.pending(staker);
                prop_assert!(pending >= 0);
                prop_assert_eq!(pending, h.pending(staker));
                owed += pending;
            }

            // Solvency: what is owed plus what is still scheduled is covered
            // by the reward tokens in custody.
            let now = h.env.ledger().timestamp();
            let committed = stream.committed_reward(now).unwrap();
            let held = token::Client::new(&h.env, &h.reward_token).balance(&h.client.address);
            prop_assert!(owed + committed <= held, "owed {} + committed {} > held {}", owed, committed, held);
        }
    }

    #[test]
    fn settling_without_elapsed_time_credits_nothing(stake in 1i128..100_000, wait in 1u64..2_000) {
        let h = Harness::new();
        h.apply(&Action::Fund(50_000, 4_000));
        let staker = &h.stakers[0];
        h.client.stake(staker, &stake);
        h.apply(&Action::Advance(wait));

        let before = h.pending(staker);
        h.client.get_reward(staker);
        // A second claim in the same instant finds nothing left.
        prop_assert!(h.client.get_reward(staker).is_empty());
        prop_assert_eq!(h.pending(staker), 0);
        prop_assert_eq!(
            token::Client::new(&h.env, &h.reward_token).balance(staker),
            before
        );
    }
}
