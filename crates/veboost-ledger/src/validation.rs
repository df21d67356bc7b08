//! Ordered parameter rules for create and extend.
//!
//! Each function checks its rules in a fixed order and reports the first
//! failure. None of them touch state.

use veboost_core::error::{BoostError, PercentageBound};
use veboost_core::types::{BoostParams, BoostRecord, TokenId};

use crate::config::BoostConfig;

/// `0 < percentage_bps <= config.max_percentage_bps`.
pub fn check_percentage(percentage_bps: u64, config: &BoostConfig) -> Result<(), BoostError> {
    if percentage_bps == 0 {
        return Err(BoostError::InvalidPercentage {
            bps: percentage_bps,
            bound: PercentageBound::TooLow,
        });
    }
    if percentage_bps > config.max_percentage_bps {
        return Err(BoostError::InvalidPercentage {
            bps: percentage_bps,
            bound: PercentageBound::TooHigh,
        });
    }
    Ok(())
}

/// Rules shared by create and extend, in order:
/// 1. percentage in range
/// 2. `cancel_time > expire_time`
/// 3. `expire_time - now >= min_duration_secs`
/// 4. `expire_time <= lock_expiry`
pub fn check_params(
    params: &BoostParams,
    now: u64,
    lock_expiry: u64,
    config: &BoostConfig,
) -> Result<(), BoostError> {
    check_percentage(params.percentage_bps, config)?;

    if params.cancel_time <= params.expire_time {
        return Err(BoostError::CancelBeforeExpiry {
            expire_time: params.expire_time,
            cancel_time: params.cancel_time,
        });
    }

    if params.expire_time < now.saturating_add(config.min_duration_secs) {
        return Err(BoostError::DurationTooShort {
            expire_time: params.expire_time,
            now,
            min: config.min_duration_secs,
        });
    }

    if params.expire_time > lock_expiry {
        return Err(BoostError::ExpiryBeyondLockExpiry {
            expire_time: params.expire_time,
            lock_expiry,
        });
    }

    Ok(())
}

/// Rules specific to extending `token`, in order:
/// 1. the expiry strictly moves forward
/// 2. the cancel time only shrinks once the current grant has expired
pub fn check_extension(
    token: &TokenId,
    current: &BoostRecord,
    params: &BoostParams,
    now: u64,
) -> Result<(), BoostError> {
    if params.expire_time <= current.expiry_time {
        return Err(BoostError::ExpiryNotIncreasing {
            token: *token,
            expire_time: params.expire_time,
            current: current.expiry_time,
        });
    }

    if params.cancel_time < current.cancel_time && now < current.expiry_time {
        return Err(BoostError::CancelTimeReductionDisallowed {
            token: *token,
            cancel_time: params.cancel_time,
            current: current.cancel_time,
        });
    }

    Ok(())
}
