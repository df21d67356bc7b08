//! Core delegation types: accounts, token identifiers, boost records.
//!
//! Times are `u64` unix seconds. Boost magnitudes are signed `i128`
//! fixed-point values in base units: positive while power is granted,
//! negative while the delegator owes it back.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte account identifier.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    /// The zero account. Rejected as delegator or receiver of a boost.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Derive a deterministic account from a human-readable label.
    ///
    /// BLAKE3 of the label bytes. Used by scenario files and tests to name
    /// accounts (`"alice"`, `"bob"`) without handling raw keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use veboost_core::types::AccountId;
    /// assert_eq!(AccountId::from_label("alice"), AccountId::from_label("alice"));
    /// assert_ne!(AccountId::from_label("alice"), AccountId::from_label("bob"));
    /// ```
    pub fn from_label(label: &str) -> Self {
        Self(blake3::hash(label.as_bytes()).into())
    }

    /// Check if this is the zero account.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// First four bytes as hex, for compact log output.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Identifier of a boost token.
///
/// Encodes the delegator together with a per-delegator sequence slot
/// issued by the token registry, so the delegator of any token is
/// recoverable from its id alone.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId {
    /// Account that granted the boost.
    pub delegator: AccountId,
    /// Sequence slot, unique per delegator.
    pub slot: u64,
}

impl TokenId {
    pub fn new(delegator: AccountId, slot: u64) -> Self {
        Self { delegator, slot }
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.delegator, self.slot)
    }
}

/// Phase of a boost's decay schedule at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoostPhase {
    /// `now < expiry_time`: positive power is granted to the receiver.
    Granting,
    /// `expiry_time <= now < cancel_time`: the value runs negative.
    Debt,
    /// `now >= cancel_time`: the value is fixed at `-initial_magnitude`.
    Closed,
}

/// A single boost token's decay schedule.
///
/// Created by `create_boost` and rewritten in place by `extend_boost`;
/// `delegator` and `receiver` never change after creation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct BoostRecord {
    /// Account that granted the boost.
    pub delegator: AccountId,
    /// Account the boost was granted to.
    pub receiver: AccountId,
    /// Boost value at `start_time`, in base units.
    pub initial_magnitude: i128,
    /// Instant the current schedule began decaying from.
    pub start_time: u64,
    /// Instant the granted power reaches zero.
    pub expiry_time: u64,
    /// Instant the debt tail stops accruing and the record closes.
    pub cancel_time: u64,
}

impl BoostRecord {
    /// Phase of the schedule at `now`.
    ///
    /// # Examples
    ///
    /// ```
    /// use veboost_core::types::{AccountId, BoostPhase, BoostRecord};
    /// let r = BoostRecord {
    ///     delegator: AccountId::from_label("alice"),
    ///     receiver: AccountId::from_label("bob"),
    ///     initial_magnitude: 1_000,
    ///     start_time: 0,
    ///     expiry_time: 100,
    ///     cancel_time: 200,
    /// };
    /// assert_eq!(r.phase(99), BoostPhase::Granting);
    /// assert_eq!(r.phase(100), BoostPhase::Debt);
    /// assert_eq!(r.phase(200), BoostPhase::Closed);
    /// ```
    pub fn phase(&self, now: u64) -> BoostPhase {
        if now >= self.cancel_time {
            BoostPhase::Closed
        } else if now >= self.expiry_time {
            BoostPhase::Debt
        } else {
            BoostPhase::Granting
        }
    }

    /// Whether the record is accruing debt: strictly past expiry and not
    /// yet closed. At exactly `expiry_time` the value is still zero.
    pub fn has_open_debt(&self, now: u64) -> bool {
        now > self.expiry_time && now < self.cancel_time
    }
}

/// Requested parameters of a create or extend call.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoostParams {
    /// Share of the delegator's available power, in basis points.
    pub percentage_bps: u64,
    /// Requested expiry time.
    pub expire_time: u64,
    /// Requested cancel time.
    pub cancel_time: u64,
}
