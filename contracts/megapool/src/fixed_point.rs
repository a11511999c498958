//! Scaled integer arithmetic shared by the reward accounting.
//!
//! Reward rates and reward-per-token accumulators are stored multiplied by
//! [`PRECISION`] so that dividing a small emission by a large staked supply
//! keeps sub-unit precision without floating point. Every division floors,
//! which for the non-negative operands used here means rounding toward zero:
//! the pool can only ever owe less than it was funded, never more.

use crate::ContractError;

/// Fixed-point scaling factor (12 decimal places).
///
/// Token amounts on Stellar carry 7 decimals, so `amount × PRECISION` stays
/// far below `i128::MAX` for any realistic supply.
pub const PRECISION: i128 = 1_000_000_000_000;

/// Lift a raw token amount into the scaled domain.
pub fn scale(amount: i128) -> Result<i128, ContractError> {
    amount
        .checked_mul(PRECISION)
        .ok_or(ContractError::ArithmeticOverflow)
}

/// Drop a scaled value back to raw token units, flooring.
pub fn descale(value: i128) -> i128 {
    value / PRECISION
}

/// `a × b / denominator`, floored.
///
/// Operands must be non-negative and the denominator strictly positive;
/// anything else is reported as an arithmetic error rather than producing a
/// value that could round against the pool.
pub fn mul_div_floor(a: i128, b: i128, denominator: i128) -> Result<i128, ContractError> {
    if a < 0 || b < 0 || denominator <= 0 {
        return Err(ContractError::ArithmeticOverflow);
    }
    a.checked_mul(b)
        .map(|product| product / denominator)
        .ok_or(ContractError::ArithmeticOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_and_descale() {
        assert_eq!(scale(5).unwrap(), 5 * PRECISION);
        assert_eq!(descale(5 * PRECISION + PRECISION - 1), 5);
        assert_eq!(scale(i128::MAX), Err(ContractError::ArithmeticOverflow));
    }

    #[test]
    fn mul_div_rounds_toward_zero() {
        // 10 × 1 / 3 = 3.33.. → 3
        assert_eq!(mul_div_floor(10, 1, 3).unwrap(), 3);
        // 2 × 1 / 3 = 0.66.. → 0
        assert_eq!(mul_div_floor(2, 1, 3).unwrap(), 0);
        assert_eq!(mul_div_floor(7, 6, 2).unwrap(), 21);
    }

    #[test]
    fn mul_div_rejects_bad_operands() {
        assert_eq!(mul_div_floor(1, 1, 0), Err(ContractError::ArithmeticOverflow));
        assert_eq!(mul_div_floor(-1, 1, 1), Err(ContractError::ArithmeticOverflow));
        assert_eq!(
            mul_div_floor(i128::MAX, 2, 1),
            Err(ContractError::ArithmeticOverflow)
        );
    }
}
