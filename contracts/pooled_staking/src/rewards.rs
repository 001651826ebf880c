use soroban_sdk::{Env, I256};

/// Fixed-point scaling factor for `acc_reward_per_share`.
///
/// 10^18 keeps the per-share accumulator exact enough that an 18-decimal
/// stake token splits an 18-decimal reward without visible truncation.
/// The accumulator itself is 256 bits wide, so `i128` inputs scaled by this
/// factor always fit.
pub const PRECISION: i128 = 1_000_000_000_000_000_000;

/// Outcome of attributing a batch of freshly arrived rewards.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Accrual {
    /// Increase of `acc_reward_per_share`.
    pub delta: I256,
    /// Scaled reward units left over by the floor division, carried into
    /// the next accrual so rounding dust is eventually handed out.
    /// Always below `total_staked`.
    pub remainder: i128,
}

// ── Core reward engine ──────────────────────────────────────────────────────

/// Spread `new_rewards` across `total_staked` shares.
///
/// ```text
/// scaled    = new_rewards × PRECISION + remainder
/// Δacc      = scaled / total_staked
/// remainder = scaled mod total_staked
/// ```
///
/// With nothing staked the accumulator cannot move; the previous remainder
/// is returned untouched and the caller keeps the rewards undistributed.
///
/// Returns `None` if the remainder does not fit in an `i128`, which only
/// happens for a negative `total_staked`.
pub fn accrue(
    env: &Env,
    new_rewards: i128,
    remainder: i128,
    total_staked: i128,
) -> Option<Accrual> {
    if total_staked <= 0 || new_rewards <= 0 {
        return Some(Accrual {
            delta: I256::from_i32(env, 0),
            remainder,
        });
    }

    let total = I256::from_i128(env, total_staked);
    let scaled = I256::from_i128(env, new_rewards)
        .mul(&I256::from_i128(env, PRECISION))
        .add(&I256::from_i128(env, remainder));

    let delta = scaled.div(&total);
    let left = scaled.sub(&delta.mul(&total));

    Some(Accrual {
        remainder: left.to_i128()?,
        delta,
    })
}

/// Calculate the reward a single position can claim right now.
///
/// ```text
/// earned = unclaimed + staked × (current_acc − reward_debt) / PRECISION
/// ```
///
/// `reward_debt` is the accumulator value at the position's last
/// settlement, so only growth since then is paid. Flooring happens once per
/// settlement, never in the participant's favour.
///
/// Returns `None` if the result does not fit in an `i128` or if the
/// accumulator went backwards.
pub fn earned(
    env: &Env,
    staked: i128,
    current_acc: &I256,
    reward_debt: &I256,
    unclaimed: i128,
) -> Option<i128> {
    let zero = I256::from_i32(env, 0);
    let growth = current_acc.sub(reward_debt);
    if growth < zero {
        return None;
    }
    if staked == 0 || growth == zero {
        return Some(unclaimed);
    }

    let fresh = I256::from_i128(env, staked)
        .mul(&growth)
        .div(&I256::from_i128(env, PRECISION))
        .to_i128()?;
    unclaimed.checked_add(fresh)
}

// ── Unit tests ──────────────────────────────────────────────────────────────
