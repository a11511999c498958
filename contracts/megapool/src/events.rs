use soroban_sdk::{contracttype, symbol_short, Address, Env};

// ── Event payloads ──────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub owner: Address,
    pub staking_token: Address,
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
pub struct WithdrawnEvent {
    pub staker: Address,
    pub amount: i128,
    pub total_staked: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardPaidEvent {
    pub staker: Address,
    pub token: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StreamRegisteredEvent {
    pub token: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardAddedEvent {
    pub token: Address,
    pub amount: i128,
    pub duration: u64,
    pub reward_rate: i128,
    pub leftover: i128,
    pub period_finish: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OperatorAddedEvent {
    pub operator: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OperatorRemovedEvent {
    pub operator: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerTransferProposedEvent {
    pub current_owner: Address,
    pub proposed_owner: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerTransferAcceptedEvent {
    pub previous_owner: Address,
    pub new_owner: Address,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(env: &Env, owner: Address, staking_token: Address, reward_token: Address) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            owner,
            staking_token,
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

pub fn publish_withdrawn(env: &Env, staker: Address, amount: i128, total_staked: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAWN"), staker.clone()),
        WithdrawnEvent {
            staker,
            amount,
            total_staked,
        },
    );
}

pub fn publish_reward_paid(env: &Env, staker: Address, token: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("RWD_PAID"), staker.clone(), token.clone()),
        RewardPaidEvent {
            staker,
            token,
            amount,
        },
    );
}

pub fn publish_stream_registered(env: &Env, token: Address) {
    env.events().publish(
        (symbol_short!("STRM_REG"), token.clone()),
        StreamRegisteredEvent { token },
    );
}

pub fn publish_reward_added(
    env: &Env,
    token: Address,
    amount: i128,
    duration: u64,
    reward_rate: i128,
    leftover: i128,
    period_finish: u64,
) {
    env.events().publish(
        (symbol_short!("RWD_ADD"), token.clone()),
        RewardAddedEvent {
            token,
            amount,
            duration,
            reward_rate,
            leftover,
            period_finish,
        },
    );
}

pub fn publish_operator_added(env: &Env, operator: Address) {
    env.events().publish(
        (symbol_short!("OP_ADD"), operator.clone()),
        OperatorAddedEvent { operator },
    );
}

pub fn publish_operator_removed(env: &Env, operator: Address) {
    env.events().publish(
        (symbol_short!("OP_REM"), operator.clone()),
        OperatorRemovedEvent { operator },
    );
}

pub fn publish_owner_transfer_proposed(env: &Env, current_owner: Address, proposed_owner: Address) {
    env.events().publish(
        (symbol_short!("OWN_PROP"),),
        OwnerTransferProposedEvent {
            current_owner,
            proposed_owner,
        },
    );
}

pub fn publish_owner_transfer_accepted(env: &Env, previous_owner: Address, new_owner: Address) {
    env.events().publish(
        (symbol_short!("OWN_ACC"),),
        OwnerTransferAcceptedEvent {
            previous_owner,
            new_owner,
        },
    );
}
