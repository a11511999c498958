use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::rewards::RewardStream;
use crate::staker::RewardCheckpoint;

// Storage TTL constants (in ledgers, ~5 seconds each)
const INSTANCE_TTL_THRESHOLD: u32 = 17_280; // ~1 day
const INSTANCE_TTL_EXTEND: u32 = 518_400; // ~30 days
const PERSISTENT_TTL_THRESHOLD: u32 = 17_280; // ~1 day
const PERSISTENT_TTL_EXTEND: u32 = 518_400; // ~30 days

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    Owner,
    PendingOwner,
    StakingToken,
    TotalStaked,
    /// Reward tokens in registration order.
    RewardTokens,
    Stream(Address),
    Balance(Address),
    /// (staker, reward token)
    Checkpoint(Address, Address),
}

// --- Instance storage (configuration and pool totals) ---

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Initialized)
}

pub fn set_initialized(env: &Env) {
    env.storage().instance().set(&DataKey::Initialized, &true);
}

pub fn get_owner(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::Owner)
}

pub fn set_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&DataKey::Owner, owner);
}

pub fn get_pending_owner(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::PendingOwner)
}

pub fn set_pending_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&DataKey::PendingOwner, owner);
}

pub fn remove_pending_owner(env: &Env) {
    env.storage().instance().remove(&DataKey::PendingOwner);
}

pub fn get_staking_token(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::StakingToken)
}

pub fn set_staking_token(env: &Env, token: &Address) {
    env.storage().instance().set(&DataKey::StakingToken, token);
}

pub fn get_total_staked(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::TotalStaked)
        .unwrap_or(0)
}

pub fn set_total_staked(env: &Env, total: i128) {
    env.storage().instance().set(&DataKey::TotalStaked, &total);
}

pub fn get_reward_tokens(env: &Env) -> Vec<Address> {
    env.storage()
        .instance()
        .get(&DataKey::RewardTokens)
        .unwrap_or(Vec::new(env))
}

pub fn set_reward_tokens(env: &Env, tokens: &Vec<Address>) {
    env.storage().instance().set(&DataKey::RewardTokens, tokens);
}

pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

// --- Persistent storage (streams and staker positions) ---

pub fn get_stream(env: &Env, token: &Address) -> Option<RewardStream> {
    let key = DataKey::Stream(token.clone());
    let stream = env.storage().persistent().get(&key);
    if stream.is_some() {
        extend_persistent(env, &key);
    }
    stream
}

pub fn set_stream(env: &Env, stream: &RewardStream) {
    let key = DataKey::Stream(stream.token.clone());
    env.storage().persistent().set(&key, stream);
    extend_persistent(env, &key);
}

pub fn get_balance(env: &Env, staker: &Address) -> i128 {
    let key = DataKey::Balance(staker.clone());
    match env.storage().persistent().get(&key) {
        Some(balance) => {
            extend_persistent(env, &key);
            balance
        }
        None => 0,
    }
}

pub fn set_balance(env: &Env, staker: &Address, balance: i128) {
    let key = DataKey::Balance(staker.clone());
    env.storage().persistent().set(&key, &balance);
    extend_persistent(env, &key);
}

pub fn get_checkpoint(env: &Env, staker: &Address, token: &Address) -> RewardCheckpoint {
    let key = DataKey::Checkpoint(staker.clone(), token.clone());
    match env.storage().persistent().get(&key) {
        Some(checkpoint) => {
            extend_persistent(env, &key);
            checkpoint
        }
        None => RewardCheckpoint::default(),
    }
}

pub fn set_checkpoint(env: &Env, staker: &Address, token: &Address, checkpoint: &RewardCheckpoint) {
    let key = DataKey::Checkpoint(staker.clone(), token.clone());
    env.storage().persistent().set(&key, checkpoint);
    extend_persistent(env, &key);
}

fn extend_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}
