#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use megapool::{MegaPoolContract, MegaPoolContractClient, RewardEntry};
use soroban_sdk::{
    testutils::{Address as _, Ledger},
    token, vec, Address, Env,
};

const STAKERS: usize = 4;

#[derive(Arbitrary, Debug)]
enum Op {
    Stake { who: u8, amount: u32 },
    Withdraw { who: u8, amount: u32 },
    Exit { who: u8 },
    Claim { who: u8 },
    Advance { seconds: u16 },
    Fund { amount: u32, duration: u16 },
}

fuzz_target!(|ops: Vec<Op>| {
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
    let rewards = token::StellarAssetClient::new(&env, &reward_token);
    let stakers: Vec<Address> = (0..STAKERS)
        .map(|_| {
            let staker = Address::generate(&env);
            staking.mint(&staker, &(u32::MAX as i128));
            staker
        })
        .collect();

    let mut last_rpt = 0i128;
    for op in ops.iter().take(64) {
        match *op {
            Op::Stake { who, amount } => {
                let _ = client.try_stake(&stakers[who as usize % STAKERS], &(amount as i128));
            }
            Op::Withdraw { who, amount } => {
                let _ = client.try_withdraw(&stakers[who as usize % STAKERS], &(amount as i128));
            }
            Op::Exit { who } => {
                let _ = client.try_exit(&stakers[who as usize % STAKERS]);
            }
            Op::Claim { who } => {
                let _ = client.try_get_reward(&stakers[who as usize % STAKERS]);
            }
            Op::Advance { seconds } => {
                let now = env.ledger().timestamp();
                env.ledger().set_timestamp(now + seconds as u64);
            }
            Op::Fund { amount, duration } => {
                rewards.mint(&owner, &(amount as i128));
                let _ = client.try_notify_reward_amount(
                    &owner,
                    &vec![
                        &env,
                        RewardEntry {
                            token: reward_token.clone(),
                            amount: amount as i128,
                            duration: duration as u64,
                        },
                    ],
                );
            }
        }

        let sum: i128 = stakers.iter().map(|s| client.balance_of(s)).sum();
        assert_eq!(client.total_staked(), sum, "total_staked drifted from balances");

        let stream = client.get_stream(&reward_token);
        assert!(stream.reward_per_token_stored >= last_rpt, "accumulator ran backwards");
        last_rpt = stream.reward_per_token_stored;

        let owed: i128 = stakers
            .iter()
            .map(|s| client.earned_for(s, &reward_token))
            .sum();
        let committed = stream
            .committed_reward(env.ledger().timestamp())
            .expect("committed reward overflow");
        let held = token::Client::new(&env, &reward_token).balance(&contract_id);
        assert!(owed + committed <= held, "pool owes more than it holds");
    }
});
