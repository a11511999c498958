use soroban_sdk::{contracttype, Address};

use crate::fixed_point::{self, PRECISION};
use crate::ContractError;

// ── Types ───────────────────────────────────────────────────────────────────

/// Schedule and accumulator for one reward token.
///
/// `reward_rate` and `reward_per_token_stored` are scaled by `PRECISION`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardStream {
    pub token: Address,
    /// Scaled reward units emitted per second across all stakers.
    pub reward_rate: i128,
    /// Timestamp after which the stream stops emitting.
    pub period_finish: u64,
    /// Timestamp the accumulator was last advanced to.
    pub last_update_time: u64,
    /// Cumulative reward per staked unit (scaled).
    pub reward_per_token_stored: i128,
    /// Undistributed reward rolled into the current schedule on renewal.
    pub leftover_at_renewal: i128,
    /// Length in seconds of the current schedule.
    pub duration: u64,
}

// ── Core reward engine ──────────────────────────────────────────────────────

impl RewardStream {
    /// A freshly registered stream: no rate, already expired at `now`.
    pub fn new(token: Address, now: u64) -> Self {
        Self {
            token,
            reward_rate: 0,
            period_finish: now,
            last_update_time: now,
            reward_per_token_stored: 0,
            leftover_at_renewal: 0,
            duration: 0,
        }
    }

    /// `min(now, period_finish)`: the latest instant that still emits.
    pub fn last_time_reward_applicable(&self, now: u64) -> u64 {
        now.min(self.period_finish)
    }

    /// Project the accumulator to `now` without committing it.
    ///
    /// ```text
    /// Δrpt = reward_rate × (min(now, period_finish) − last_update_time) / total_staked
    /// ```
    ///
    /// With nothing staked the accumulator does not move.
    pub fn reward_per_token(&self, total_staked: i128, now: u64) -> Result<i128, ContractError> {
        let effective = self.last_time_reward_applicable(now);
        if total_staked <= 0 || effective <= self.last_update_time {
            return Ok(self.reward_per_token_stored);
        }

        let elapsed = i128::from(effective - self.last_update_time);
        let delta = fixed_point::mul_div_floor(self.reward_rate, elapsed, total_staked)?;

        self.reward_per_token_stored
            .checked_add(delta)
            .ok_or(ContractError::ArithmeticOverflow)
    }

    /// Advance the accumulator to `now`.
    ///
    /// `last_update_time` moves forward even when `total_staked` is zero, so
    /// emission time that passes with an empty pool is burned: it is never
    /// paid out to whoever stakes next.
    pub fn settle(&mut self, total_staked: i128, now: u64) -> Result<(), ContractError> {
        self.reward_per_token_stored = self.reward_per_token(total_staked, now)?;
        self.last_update_time = self
            .last_update_time
            .max(self.last_time_reward_applicable(now));
        Ok(())
    }

    /// Reward (raw units) still committed to stakers between `now` and
    /// `period_finish`.
    pub fn committed_reward(&self, now: u64) -> Result<i128, ContractError> {
        let left = i128::from(self.period_finish.saturating_sub(now));
        Ok(fixed_point::descale(
            left.checked_mul(self.reward_rate)
                .ok_or(ContractError::ArithmeticOverflow)?,
        ))
    }

    /// Total reward (raw units) the current schedule emits over its duration.
    pub fn reward_for_duration(&self) -> Result<i128, ContractError> {
        fixed_point::mul_div_floor(self.reward_rate, i128::from(self.duration), PRECISION)
    }

    /// Start a new schedule of `amount` over `duration` seconds.
    ///
    /// Must run on a stream already settled at `now`. When the previous
    /// schedule is still running, its unemitted remainder is added to
    /// `amount` so that funded reward is neither lost nor emitted twice:
    ///
    /// ```text
    /// remaining = (period_finish − now) × reward_rate
    /// new_rate  = (amount × PRECISION + remaining) / duration
    /// ```
    ///
    /// `duration` is validated by the caller; a zero here is reported as
    /// `ArithmeticOverflow` and leaves the stream untouched.
    pub fn renew(&mut self, amount: i128, duration: u64, now: u64) -> Result<(), ContractError> {
        let scaled_amount = fixed_point::scale(amount)?;

        let remaining = if now >= self.period_finish {
            0
        } else {
            i128::from(self.period_finish - now)
                .checked_mul(self.reward_rate)
                .ok_or(ContractError::ArithmeticOverflow)?
        };

        let total = scaled_amount
            .checked_add(remaining)
            .ok_or(ContractError::ArithmeticOverflow)?;

        let period_finish = now
            .checked_add(duration)
            .ok_or(ContractError::ArithmeticOverflow)?;

        let reward_rate = total
            .checked_div(i128::from(duration))
            .ok_or(ContractError::ArithmeticOverflow)?;

        self.reward_rate = reward_rate;
        self.leftover_at_renewal = fixed_point::descale(remaining);
        self.duration = duration;
        self.last_update_time = now;
        self.period_finish = period_finish;

        Ok(())
    }
}

// ── Unit tests ──────────────────────────────────────────────────────────────
// Pure math, no contract invocation involved.

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::{testutils::Address as _, Env};

    fn stream(env: &Env, now: u64) -> RewardStream {
        RewardStream::new(Address::generate(env), now)
    }

    #[test]
    fn rpt_frozen_when_no_stakers() {
        let env = Env::default();
        let mut s = stream(&env, 0);
        s.renew(1_000, 1_000, 0).unwrap();

        s.settle(0, 400).unwrap();
        assert_eq!(s.reward_per_token_stored, 0, "RPT must not move with nothing staked");
        assert_eq!(s.last_update_time, 400, "emission time is still consumed");
    }

    #[test]
    fn rpt_accumulates_correctly() {
        // 1_000 tokens over 100 s → 10 tokens/s; 1_000 staked for 100 s
        // Δrpt = 10 × PRECISION × 100 / 1_000 = PRECISION
        let env = Env::default();
        let mut s = stream(&env, 0);
        s.renew(1_000, 100, 0).unwrap();
        assert_eq!(s.reward_rate, 10 * PRECISION);

        s.settle(1_000, 100).unwrap();
        assert_eq!(s.reward_per_token_stored, PRECISION);
    }

    #[test]
    fn accrual_stops_at_period_finish() {
        let env = Env::default();
        let mut s = stream(&env, 0);
        s.renew(1_000, 100, 0).unwrap();

        s.settle(1_000, 5_000).unwrap();
        assert_eq!(s.reward_per_token_stored, PRECISION);
        assert_eq!(s.last_update_time, 100);

        // Settling again later changes nothing.
        s.settle(1_000, 9_000).unwrap();
        assert_eq!(s.reward_per_token_stored, PRECISION);
    }

    #[test]
    fn projection_does_not_mutate() {
        let env = Env::default();
        let mut s = stream(&env, 0);
        s.renew(1_000, 100, 0).unwrap();

        let before = s.clone();
        let projected = s.reward_per_token(500, 50).unwrap();
        assert_eq!(s, before);
        assert_eq!(projected, 10 * PRECISION * 50 / 500);
    }

    #[test]
    fn renewal_rolls_remaining_reward_forward() {
        // rate 10/s with 5 s left → remaining 50; notify 450 over 100 → 5/s
        let env = Env::default();
        let mut s = stream(&env, 0);
        s.renew(1_000, 100, 0).unwrap();

        s.settle(1, 95).unwrap();
        s.renew(450, 100, 95).unwrap();

        assert_eq!(s.reward_rate, 5 * PRECISION);
        assert_eq!(s.leftover_at_renewal, 50);
        assert_eq!(s.period_finish, 195);
        assert_eq!(s.last_update_time, 95);
        assert_eq!(s.reward_for_duration().unwrap(), 500);
    }

    #[test]
    fn renewal_after_expiry_ignores_old_rate() {
        let env = Env::default();
        let mut s = stream(&env, 0);
        s.renew(1_000, 100, 0).unwrap();

        s.settle(1, 300).unwrap();
        s.renew(200, 100, 300).unwrap();

        assert_eq!(s.reward_rate, 2 * PRECISION);
        assert_eq!(s.leftover_at_renewal, 0);
    }

    #[test]
    fn committed_reward_tracks_time_left() {
        let env = Env::default();
        let mut s = stream(&env, 0);
        s.renew(1_000, 1_000, 0).unwrap();

        assert_eq!(s.committed_reward(0).unwrap(), 1_000);
        assert_eq!(s.committed_reward(250).unwrap(), 750);
        assert_eq!(s.committed_reward(2_000).unwrap(), 0);
    }

    #[test]
    fn renewal_rejects_overflowing_amount() {
        let env = Env::default();
        let mut s = stream(&env, 0);
        assert_eq!(
            s.renew(i128::MAX, 10, 0),
            Err(ContractError::ArithmeticOverflow)
        );
        assert_eq!(
            s.renew(1, u64::MAX, 10),
            Err(ContractError::ArithmeticOverflow)
        );
    }

    #[test]
    fn zero_duration_leaves_stream_untouched() {
        let env = Env::default();
        let mut s = stream(&env, 0);
        s.renew(1_000, 100, 0).unwrap();
        let before = s.clone();

        assert_eq!(s.renew(500, 0, 40), Err(ContractError::ArithmeticOverflow));
        assert_eq!(s, before);
    }
}
