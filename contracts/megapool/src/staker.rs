use soroban_sdk::contracttype;

use crate::fixed_point::{self, PRECISION};
use crate::ContractError;

/// A staker's position in one reward stream.
///
/// Stored per `(staker, token)`; an absent entry is equivalent to
/// `RewardCheckpoint::default()`.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RewardCheckpoint {
    /// Stream accumulator at this staker's last settlement (scaled).
    pub reward_per_token_paid: i128,
    /// Settled, not yet claimed reward in raw token units.
    pub rewards: i128,
}

impl RewardCheckpoint {
    /// Everything owed at accumulator value `reward_per_token`.
    ///
    /// ```text
    /// earned = rewards + balance × (reward_per_token − reward_per_token_paid) / PRECISION
    /// ```
    ///
    /// Only the accumulation since the last snapshot is counted, so an
    /// interval can never be credited twice.
    pub fn earned(&self, balance: i128, reward_per_token: i128) -> Result<i128, ContractError> {
        let delta = reward_per_token
            .checked_sub(self.reward_per_token_paid)
            .ok_or(ContractError::ArithmeticOverflow)?;
        let accrued = fixed_point::mul_div_floor(balance, delta, PRECISION)?;

        self.rewards
            .checked_add(accrued)
            .ok_or(ContractError::ArithmeticOverflow)
    }

    /// Credit the accrual up to `reward_per_token` and move the snapshot.
    pub fn settle(&mut self, balance: i128, reward_per_token: i128) -> Result<(), ContractError> {
        self.rewards = self.earned(balance, reward_per_token)?;
        self.reward_per_token_paid = reward_per_token;
        Ok(())
    }

    /// Zero the settled balance, returning what it held.
    pub fn take_rewards(&mut self) -> i128 {
        core::mem::take(&mut self.rewards)
    }
}
