use soroban_sdk::Address;

use crate::{ContractError, RewardEntry};

/// Stake and withdrawal amounts must be strictly positive.
pub fn validate_amount(amount: i128) -> Result<(), ContractError> {
    if amount <= 0 {
        return Err(ContractError::InvalidAmount);
    }
    Ok(())
}

/// A withdrawal must be positive and covered by the staked balance.
pub fn validate_withdrawal(amount: i128, balance: i128) -> Result<(), ContractError> {
    validate_amount(amount)?;
    if amount > balance {
        return Err(ContractError::InvalidAmount);
    }
    Ok(())
}

/// A reward schedule must last at least one second.
pub fn validate_duration(duration: u64) -> Result<(), ContractError> {
    if duration == 0 {
        return Err(ContractError::InvalidDuration);
    }
    Ok(())
}

/// Validate one `notify_reward_amount` entry.
///
/// The staking token is refused as a reward so staked principal can never be
/// paid out as reward.
pub fn validate_reward_entry(entry: &RewardEntry, staking_token: &Address) -> Result<(), ContractError> {
    if entry.token == *staking_token {
        return Err(ContractError::StakingTokenAsReward);
    }
    validate_amount(entry.amount)?;
    validate_duration(entry.duration)
}
