//! Reward arithmetic.

/// Reward earned by `staked` over `elapsed` blocks at `reward_per_block`,
/// as a share of `total_staked`.
///
/// `elapsed × reward_per_block × staked / total_staked`, multiplied first and
/// floor-divided last. The share is taken against the pool total at
/// settlement time, not against a per-share accumulator, so stake changes
/// by other accounts between two settlements shift what a past block pays.
///
/// Returns 0 when the pool is empty and `None` on overflow.
pub fn accrued_reward(
    elapsed: u64,
    reward_per_block: u128,
    staked: u128,
    total_staked: u128,
) -> Option<u128> {
    if total_staked == 0 {
        return Some(0);
    }
    let gross = u128::from(elapsed)
        .checked_mul(reward_per_block)?
        .checked_mul(staked)?;
    Some(gross / total_staked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sole_staker_earns_full_rate() {
        assert_eq!(accrued_reward(5, 1, 50, 50), Some(5));
    }

    #[test]
    fn half_share_earns_half() {
        assert_eq!(accrued_reward(10, 4, 25, 50), Some(20));
    }

    #[test]
    fn empty_pool_pays_nothing() {
        assert_eq!(accrued_reward(100, 7, 0, 0), Some(0));
    }

    #[test]
    fn result_is_floored() {
        // 3 * 1 * 1 / 2 = 1.5
        assert_eq!(accrued_reward(3, 1, 1, 2), Some(1));
    }

    #[test]
    fn multiplies_before_dividing() {
        // Dividing first would give 1 * (1 / 3) * 3 = 0.
        assert_eq!(accrued_reward(3, 1, 1, 3), Some(1));
    }

    #[test]
    fn overflow_is_reported() {
        assert_eq!(accrued_reward(2, u128::MAX, 1, 1), None);
    }
}
