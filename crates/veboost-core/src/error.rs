//! Error types for veboost delegation.
//!
//! Every [`BoostError`] is a pre-mutation rejection: an operation that
//! returns one has left all state untouched.
use std::fmt;

use thiserror::Error;

use crate::types::{AccountId, TokenId};

/// Which side of the valid percentage range a request fell on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PercentageBound {
    /// Zero basis points.
    TooLow,
    /// More than the basis-point denominator.
    TooHigh,
}

impl fmt::Display for PercentageBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLow => write!(f, "must be greater than 0 bps"),
            Self::TooHigh => write!(f, "exceeds the maximum allowed bps"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecayError {
    #[error("arithmetic overflow")] ArithmeticOverflow,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("token slots exhausted for delegator {0}")] SlotsExhausted(AccountId),
    #[error("token already minted: {0}")] AlreadyMinted(TokenId),
    #[error("registry unavailable: {0}")] Unavailable(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("min_duration_secs must be positive")] ZeroMinDuration,
    #[error("max_percentage_bps {0} outside 1..=10_000")] MaxPercentageOutOfRange(u64),
    #[error("invalid value for {key}: {value}")] InvalidValue { key: String, value: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoostError {
    #[error("unknown token: {0}")] UnknownToken(TokenId),
    #[error("{caller} is neither delegator {delegator} nor an approved operator")] NotAuthorized { caller: AccountId, delegator: AccountId },
    #[error("invalid percentage {bps} bps: {bound}")] InvalidPercentage { bps: u64, bound: PercentageBound },
    #[error("cancel time {cancel_time} is not after expiry {expire_time}")] CancelBeforeExpiry { expire_time: u64, cancel_time: u64 },
    #[error("boost duration must be at least {min}s: expiry {expire_time}, now {now}")] DurationTooShort { expire_time: u64, now: u64, min: u64 },
    #[error("boost expiry {expire_time} is past lock expiry {lock_expiry}")] ExpiryBeyondLockExpiry { expire_time: u64, lock_expiry: u64 },
    #[error("new expiry {expire_time} must be greater than expiry {current} of {token}")] ExpiryNotIncreasing { token: TokenId, expire_time: u64, current: u64 },
    #[error("cancel time reduction disallowed on {token}: {cancel_time} < {current}")] CancelTimeReductionDisallowed { token: TokenId, cancel_time: u64, current: u64 },
    #[error("outstanding negative boosts for {delegator}: debt {debt}")] OutstandingNegativeBoost { delegator: AccountId, debt: u128 },
    #[error("no boost available for {delegator}: available {available}")] NoBoostAvailable { delegator: AccountId, available: u64 },
    #[error("cannot reduce value of {token}: proposed {proposed} < current {current}")] BoostReductionDisallowed { token: TokenId, proposed: i128, current: i128 },
    #[error("cannot delegate to self: {0}")] SelfDelegation(AccountId),
    #[error("zero account cannot be a {role}")] ZeroAccount { role: &'static str },
    #[error(transparent)] Decay(#[from] DecayError),
    #[error(transparent)] Registry(#[from] RegistryError),
}

impl BoostError {
    /// Stable short name of the rejection, for logs and CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownToken(_) => "unknown_token",
            Self::NotAuthorized { .. } => "not_authorized",
            Self::InvalidPercentage { .. } => "invalid_percentage",
            Self::CancelBeforeExpiry { .. } => "cancel_before_expiry",
            Self::DurationTooShort { .. } => "duration_too_short",
            Self::ExpiryBeyondLockExpiry { .. } => "expiry_beyond_lock_expiry",
            Self::ExpiryNotIncreasing { .. } => "expiry_not_increasing",
            Self::CancelTimeReductionDisallowed { .. } => "cancel_time_reduction_disallowed",
            Self::OutstandingNegativeBoost { .. } => "outstanding_negative_boost",
            Self::NoBoostAvailable { .. } => "no_boost_available",
            Self::BoostReductionDisallowed { .. } => "boost_reduction_disallowed",
            Self::SelfDelegation(_) => "self_delegation",
            Self::ZeroAccount { .. } => "zero_account",
            Self::Decay(_) => "decay",
            Self::Registry(_) => "registry",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_messages_differ() {
        let low = BoostError::InvalidPercentage { bps: 0, bound: PercentageBound::TooLow };
        let high = BoostError::InvalidPercentage { bps: 10_001, bound: PercentageBound::TooHigh };
        assert!(low.to_string().contains("greater than 0"));
        assert!(high.to_string().contains("maximum"));
        assert_eq!(low.kind(), high.kind());
    }

    #[test]
    fn decay_error_converts_transparently() {
        let err: BoostError = DecayError::ArithmeticOverflow.into();
        assert_eq!(err.to_string(), "arithmetic overflow");
        assert_eq!(err.kind(), "decay");
    }

    #[test]
    fn zero_account_names_role() {
        let err = BoostError::ZeroAccount { role: "receiver" };
        assert_eq!(err.to_string(), "zero account cannot be a receiver");
        assert_eq!(err.kind(), "zero_account");
    }

    #[test]
    fn registry_error_converts() {
        let err: BoostError = RegistryError::Unavailable("down".into()).into();
        assert!(matches!(err, BoostError::Registry(_)));
    }

    #[test]
    fn not_authorized_names_both_accounts() {
        let caller = AccountId([0x0B; 32]);
        let delegator = AccountId([0x0A; 32]);
        let msg = BoostError::NotAuthorized { caller, delegator }.to_string();
        assert!(msg.contains(&caller.to_string()));
        assert!(msg.contains(&delegator.to_string()));
    }
}
