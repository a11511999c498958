#![no_std]

#[cfg(test)]
extern crate std;

pub mod custody;
pub mod events;
pub mod fixed_point;
pub mod rewards;
pub mod staker;
pub mod storage;
pub mod validation;

use common::operators;
use soroban_sdk::{contract, contractimpl, contracttype, Address, Env, Vec};

pub use rewards::RewardStream;
pub use staker::RewardCheckpoint;

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidAmount = 4,
    InvalidDuration = 5,
    TransferFailed = 6,
    UnknownStream = 7,
    ArithmeticOverflow = 8,
    StakingTokenAsReward = 9,
    NoPendingOwner = 10,
}

// ── Public-facing types ──────────────────────────────────────────────────────

/// One reward schedule submitted to `notify_reward_amount`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardEntry {
    pub token: Address,
    /// Raw token units pulled from the caller.
    pub amount: i128,
    /// Seconds over which `amount` (plus any leftover) is emitted.
    pub duration: u64,
}

/// An amount of one reward token, either pending or paid out.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EarnedReward {
    pub token: Address,
    pub amount: i128,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct MegaPoolContract;

#[contractimpl]
impl MegaPoolContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the pool.
    ///
    /// * `owner`         – may register reward schedules and manage operators.
    /// * `staking_token` – SAC address of the token users stake.
    /// * `reward_token`  – first reward stream, registered empty (rate zero).
    pub fn initialize(
        env: Env,
        owner: Address,
        staking_token: Address,
        reward_token: Address,
    ) -> Result<(), ContractError> {
        if storage::is_initialized(&env) {
            return Err(ContractError::AlreadyInitialized);
        }
        if staking_token == reward_token {
            return Err(ContractError::StakingTokenAsReward);
        }

        storage::set_owner(&env, &owner);
        storage::set_staking_token(&env, &staking_token);
        storage::set_initialized(&env);
        Self::register_stream(&env, &reward_token, env.ledger().timestamp());
        storage::extend_instance_ttl(&env);

        events::publish_initialized(&env, owner, staking_token, reward_token);

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` staking tokens.
    ///
    /// Rewards are settled first so the new tokens earn nothing
    /// retroactively.
    pub fn stake(env: Env, staker: Address, amount: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();
        validation::validate_amount(amount)?;

        Self::update_rewards(&env, Some(&staker))?;

        let new_balance = storage::get_balance(&env, &staker)
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        let new_total = storage::get_total_staked(&env)
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        storage::set_balance(&env, &staker, new_balance);
        storage::set_total_staked(&env, new_total);

        let staking_token = Self::load_staking_token(&env)?;
        custody::deposit(&env, &staking_token, &staker, amount)?;

        storage::extend_instance_ttl(&env);
        events::publish_staked(&env, staker, amount, new_total);

        Ok(())
    }

    /// Return `amount` staked tokens to the staker.
    ///
    /// Fails with `InvalidAmount` for zero or more than the staked balance.
    pub fn withdraw(env: Env, staker: Address, amount: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        Self::withdraw_stake(&env, &staker, amount)?;

        storage::extend_instance_ttl(&env);
        Ok(())
    }

    /// Withdraw the whole balance and claim every reward in one invocation.
    ///
    /// Returns the rewards paid out.
    pub fn exit(env: Env, staker: Address) -> Result<Vec<EarnedReward>, ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        let balance = storage::get_balance(&env, &staker);
        Self::withdraw_stake(&env, &staker, balance)?;
        let paid = Self::pay_rewards(&env, &staker, &storage::get_reward_tokens(&env))?;

        storage::extend_instance_ttl(&env);
        Ok(paid)
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Claim the settled rewards of every stream.
    ///
    /// Streams with nothing owed are skipped; the returned list holds only
    /// what was actually transferred.
    pub fn get_reward(env: Env, staker: Address) -> Result<Vec<EarnedReward>, ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        Self::update_rewards(&env, Some(&staker))?;
        let paid = Self::pay_rewards(&env, &staker, &storage::get_reward_tokens(&env))?;

        storage::extend_instance_ttl(&env);
        Ok(paid)
    }

    /// Claim the settled rewards of the listed streams only.
    pub fn get_specific_rewards(
        env: Env,
        staker: Address,
        tokens: Vec<Address>,
    ) -> Result<Vec<EarnedReward>, ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        for token in tokens.iter() {
            if storage::get_stream(&env, &token).is_none() {
                return Err(ContractError::UnknownStream);
            }
        }

        Self::update_rewards(&env, Some(&staker))?;
        let paid = Self::pay_rewards(&env, &staker, &tokens)?;

        storage::extend_instance_ttl(&env);
        Ok(paid)
    }

    /// Fund one or more reward schedules.
    ///
    /// Unseen tokens are registered as new streams. A schedule renewed before
    /// its `period_finish` carries its unemitted remainder into the new rate.
    /// The batch is all-or-nothing: any failing entry reverts every entry.
    ///
    /// Only the owner or a registered operator may call this.
    pub fn notify_reward_amount(
        env: Env,
        caller: Address,
        entries: Vec<RewardEntry>,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_authorized(&env, &caller)?;

        let staking_token = Self::load_staking_token(&env)?;
        let now = env.ledger().timestamp();

        // `now` is fixed for the whole invocation: after this settlement every
        // existing stream sits at `now`, and streams registered below start
        // there.
        Self::update_rewards(&env, None)?;

        for entry in entries.iter() {
            validation::validate_reward_entry(&entry, &staking_token)?;

            let mut stream = match storage::get_stream(&env, &entry.token) {
                Some(stream) => stream,
                None => Self::register_stream(&env, &entry.token, now),
            };
            stream.renew(entry.amount, entry.duration, now)?;
            storage::set_stream(&env, &stream);

            custody::deposit(&env, &entry.token, &caller, entry.amount)?;

            events::publish_reward_added(
                &env,
                entry.token,
                entry.amount,
                entry.duration,
                stream.reward_rate,
                stream.leftover_at_renewal,
                stream.period_finish,
            );
        }

        storage::extend_instance_ttl(&env);
        Ok(())
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Pending reward of every stream, in registration order, without
    /// mutating any state.
    pub fn earned(env: Env, staker: Address) -> Result<Vec<EarnedReward>, ContractError> {
        Self::require_initialized(&env)?;

        let now = env.ledger().timestamp();
        let total_staked = storage::get_total_staked(&env);
        let balance = storage::get_balance(&env, &staker);

        let mut pending = Vec::new(&env);
        for token in storage::get_reward_tokens(&env).iter() {
            let stream = storage::get_stream(&env, &token).ok_or(ContractError::UnknownStream)?;
            let amount = Self::project_earned(&env, &stream, &staker, balance, total_staked, now)?;
            pending.push_back(EarnedReward { token, amount });
        }
        Ok(pending)
    }

    /// Pending reward of a single stream.
    pub fn earned_for(env: Env, staker: Address, token: Address) -> Result<i128, ContractError> {
        let stream = Self::load_stream(&env, &token)?;
        let balance = storage::get_balance(&env, &staker);
        Self::project_earned(
            &env,
            &stream,
            &staker,
            balance,
            storage::get_total_staked(&env),
            env.ledger().timestamp(),
        )
    }

    /// Current (projected) reward-per-token accumulator of a stream, scaled by
    /// `PRECISION`.
    pub fn reward_per_token(env: Env, token: Address) -> Result<i128, ContractError> {
        Self::load_stream(&env, &token)?
            .reward_per_token(storage::get_total_staked(&env), env.ledger().timestamp())
    }

    pub fn last_time_reward_applicable(env: Env, token: Address) -> Result<u64, ContractError> {
        Ok(Self::load_stream(&env, &token)?.last_time_reward_applicable(env.ledger().timestamp()))
    }

    /// Total raw reward the stream's current schedule emits.
    pub fn reward_for_duration(env: Env, token: Address) -> Result<i128, ContractError> {
        Self::load_stream(&env, &token)?.reward_for_duration()
    }

    pub fn get_stream(env: Env, token: Address) -> Result<RewardStream, ContractError> {
        Self::load_stream(&env, &token)
    }

    /// Registered reward tokens in registration order.
    pub fn reward_tokens(env: Env) -> Vec<Address> {
        storage::get_reward_tokens(&env)
    }

    pub fn total_staked(env: Env) -> i128 {
        storage::get_total_staked(&env)
    }

    pub fn balance_of(env: Env, staker: Address) -> i128 {
        storage::get_balance(&env, &staker)
    }

    pub fn staking_token(env: Env) -> Result<Address, ContractError> {
        Self::load_staking_token(&env)
    }

    pub fn is_initialized(env: Env) -> bool {
        storage::is_initialized(&env)
    }

    pub fn version() -> u32 {
        1
    }

    // ── Ownership and operators ──────────────────────────────────────────────

    pub fn get_owner(env: Env) -> Result<Address, ContractError> {
        storage::get_owner(&env).ok_or(ContractError::NotInitialized)
    }

    pub fn get_pending_owner(env: Env) -> Option<Address> {
        storage::get_pending_owner(&env)
    }

    /// Allow `operator` to fund reward schedules. Owner only.
    pub fn add_operator(env: Env, owner: Address, operator: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        Self::require_owner(&env, &owner)?;

        if operators::add_operator(&env, &operator) {
            events::publish_operator_added(&env, operator);
        }
        Ok(())
    }

    /// Revoke a previously granted operator. Owner only.
    pub fn remove_operator(env: Env, owner: Address, operator: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        Self::require_owner(&env, &owner)?;

        if operators::remove_operator(&env, &operator) {
            events::publish_operator_removed(&env, operator);
        }
        Ok(())
    }

    pub fn is_operator(env: Env, address: Address) -> bool {
        operators::is_operator(&env, &address)
    }

    /// Whether `caller` may fund reward schedules.
    pub fn is_authorized(env: Env, caller: Address) -> bool {
        Self::require_authorized(&env, &caller).is_ok()
    }

    /// Propose a new owner. The proposal takes effect once `new_owner` calls
    /// `accept_owner`.
    pub fn propose_owner(env: Env, owner: Address, new_owner: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        Self::require_owner(&env, &owner)?;

        storage::set_pending_owner(&env, &new_owner);
        events::publish_owner_transfer_proposed(&env, owner, new_owner);
        Ok(())
    }

    /// Complete a two-step ownership transfer.
    pub fn accept_owner(env: Env, new_owner: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        new_owner.require_auth();

        let pending = storage::get_pending_owner(&env).ok_or(ContractError::NoPendingOwner)?;
        if new_owner != pending {
            return Err(ContractError::Unauthorized);
        }
        let previous = storage::get_owner(&env).ok_or(ContractError::NotInitialized)?;

        storage::set_owner(&env, &new_owner);
        storage::remove_pending_owner(&env);
        events::publish_owner_transfer_accepted(&env, previous, new_owner);
        Ok(())
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !storage::is_initialized(env) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    fn require_owner(env: &Env, caller: &Address) -> Result<(), ContractError> {
        let owner = storage::get_owner(env).ok_or(ContractError::NotInitialized)?;
        if *caller != owner {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    /// Owner or registered operator.
    fn require_authorized(env: &Env, caller: &Address) -> Result<(), ContractError> {
        if Self::require_owner(env, caller).is_ok() || operators::is_operator(env, caller) {
            return Ok(());
        }
        Err(ContractError::Unauthorized)
    }

    fn load_staking_token(env: &Env) -> Result<Address, ContractError> {
        storage::get_staking_token(env).ok_or(ContractError::NotInitialized)
    }

    fn load_stream(env: &Env, token: &Address) -> Result<RewardStream, ContractError> {
        Self::require_initialized(env)?;
        storage::get_stream(env, token).ok_or(ContractError::UnknownStream)
    }

    /// Append a fresh, empty stream for `token`.
    fn register_stream(env: &Env, token: &Address, now: u64) -> RewardStream {
        let stream = RewardStream::new(token.clone(), now);

        let mut tokens = storage::get_reward_tokens(env);
        tokens.push_back(token.clone());
        storage::set_reward_tokens(env, &tokens);
        storage::set_stream(env, &stream);

        events::publish_stream_registered(env, token.clone());
        stream
    }

    /// Settlement, run before every mutation.
    ///
    /// 1. Advance every stream's accumulator to now (capped at its period end).
    /// 2. If a staker is given, credit what they earned since their last
    ///    snapshot in each stream and move the snapshot.
    fn update_rewards(env: &Env, staker: Option<&Address>) -> Result<(), ContractError> {
        let now = env.ledger().timestamp();
        let total_staked = storage::get_total_staked(env);
        let balance = staker.map_or(0, |staker| storage::get_balance(env, staker));

        for token in storage::get_reward_tokens(env).iter() {
            let mut stream = storage::get_stream(env, &token).ok_or(ContractError::UnknownStream)?;
            stream.settle(total_staked, now)?;
            storage::set_stream(env, &stream);

            if let Some(staker) = staker {
                let mut checkpoint = storage::get_checkpoint(env, staker, &token);
                checkpoint.settle(balance, stream.reward_per_token_stored)?;
                storage::set_checkpoint(env, staker, &token, &checkpoint);
            }
        }
        Ok(())
    }

    /// Settlement-equivalent pending amount, computed without writing.
    fn project_earned(
        env: &Env,
        stream: &RewardStream,
        staker: &Address,
        balance: i128,
        total_staked: i128,
        now: u64,
    ) -> Result<i128, ContractError> {
        let reward_per_token = stream.reward_per_token(total_staked, now)?;
        storage::get_checkpoint(env, staker, &stream.token).earned(balance, reward_per_token)
    }

    /// Settle `staker`, reduce their balance by `amount` and pay it out.
    fn withdraw_stake(env: &Env, staker: &Address, amount: i128) -> Result<(), ContractError> {
        validation::validate_amount(amount)?;

        Self::update_rewards(env, Some(staker))?;

        let balance = storage::get_balance(env, staker);
        validation::validate_withdrawal(amount, balance)?;

        let new_total = storage::get_total_staked(env)
            .checked_sub(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        storage::set_balance(env, staker, balance - amount);
        storage::set_total_staked(env, new_total);

        let staking_token = Self::load_staking_token(env)?;
        custody::release(env, &staking_token, staker, amount)?;

        events::publish_withdrawn(env, staker.clone(), amount, new_total);
        Ok(())
    }

    /// Zero and transfer the settled reward of each listed stream.
    fn pay_rewards(
        env: &Env,
        staker: &Address,
        tokens: &Vec<Address>,
    ) -> Result<Vec<EarnedReward>, ContractError> {
        let mut paid = Vec::new(env);
        for token in tokens.iter() {
            let mut checkpoint = storage::get_checkpoint(env, staker, &token);
            let amount = checkpoint.take_rewards();
            if amount <= 0 {
                continue;
            }
            storage::set_checkpoint(env, staker, &token, &checkpoint);

            custody::release(env, &token, staker, amount)?;

            events::publish_reward_paid(env, staker.clone(), token.clone(), amount);
            paid.push_back(EarnedReward { token, amount });
        }
        Ok(paid)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_invariants;
