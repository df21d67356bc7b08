//! Outstanding-boost ledger.
//!
//! Indexes every token by delegator and by receiver. Aggregates are not
//! stored: they are recomputed from the [`BoostStore`] at the instant of
//! each check, so no bookkeeping can drift as boosts decay.
//!
//! The over-commitment check gates every create and extend:
//! 1. the delegator must have no open debt on any *other* boost, and
//! 2. the new magnitude is a share of what the lock still backs after the
//!    delegator's other positive boosts are subtracted.

use std::collections::HashMap;

use veboost_core::constants::BPS_DENOMINATOR;
use veboost_core::error::{BoostError, DecayError};
use veboost_core::traits::DecayCurve;
use veboost_core::types::{AccountId, TokenId};

use crate::store::BoostStore;

/// Outcome of a successful capacity check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Commitment {
    /// Lock balance not already delegated through other boosts.
    pub available: u64,
    /// Magnitude the new schedule starts from.
    pub magnitude: i128,
}

/// Per-account token indexes.
#[derive(Debug, Default, Clone)]
pub struct OutstandingLedger {
    /// delegator → tokens issued, in mint order
    delegated: HashMap<AccountId, Vec<TokenId>>,
    /// receiver → tokens held, in mint order
    received: HashMap<AccountId, Vec<TokenId>>,
}

impl OutstandingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index `token` under its delegator and `receiver`.
    ///
    /// Idempotent: create and extend both call it, and re-recording a known
    /// token leaves the indexes unchanged.
    pub fn record(&mut self, token: TokenId, receiver: AccountId) {
        let issued = self.delegated.entry(token.delegator).or_default();
        if !issued.contains(&token) {
            issued.push(token);
        }
        let held = self.received.entry(receiver).or_default();
        if !held.contains(&token) {
            held.push(token);
        }
    }

    /// Tokens issued by `delegator`, in mint order.
    pub fn tokens_of(&self, delegator: &AccountId) -> &[TokenId] {
        self.delegated.get(delegator).map_or(&[], Vec::as_slice)
    }

    /// Tokens held by `receiver`, in mint order.
    pub fn received_by(&self, receiver: &AccountId) -> &[TokenId] {
        self.received.get(receiver).map_or(&[], Vec::as_slice)
    }

    /// Sum of open debt across `delegator`'s boosts at `now`, skipping
    /// `exclude`.
    ///
    /// Only boosts strictly inside their debt phase count; a boost whose
    /// cancel time has passed is closed and owes nothing further.
    pub fn outstanding_debt(
        &self,
        delegator: &AccountId,
        store: &BoostStore,
        curve: &dyn DecayCurve,
        now: u64,
        exclude: Option<&TokenId>,
    ) -> Result<u128, BoostError> {
        let mut debt: u128 = 0;
        for token in others(self.tokens_of(delegator), exclude) {
            let record = store.get(token)?;
            if record.has_open_debt(now) {
                debt = debt
                    .checked_add(curve.debt_at(record, now)?)
                    .ok_or(DecayError::ArithmeticOverflow)?;
            }
        }
        Ok(debt)
    }

    /// Positive power `delegator` currently grants through boosts other
    /// than `exclude`.
    pub fn delegated_power(
        &self,
        delegator: &AccountId,
        store: &BoostStore,
        curve: &dyn DecayCurve,
        now: u64,
        exclude: Option<&TokenId>,
    ) -> Result<u128, BoostError> {
        sum_granted(others(self.tokens_of(delegator), exclude), store, curve, now)
    }

    /// Positive power `receiver` currently holds through received boosts.
    pub fn received_power(
        &self,
        receiver: &AccountId,
        store: &BoostStore,
        curve: &dyn DecayCurve,
        now: u64,
    ) -> Result<u128, BoostError> {
        sum_granted(self.received_by(receiver).iter(), store, curve, now)
    }

    /// Run the over-commitment check and size a new schedule.
    ///
    /// # Errors
    ///
    /// - [`BoostError::OutstandingNegativeBoost`] if any other boost of the
    ///   delegator is accruing debt at `now`
    /// - [`BoostError::NoBoostAvailable`] if the requested share rounds to zero
    #[allow(clippy::too_many_arguments)]
    pub fn commit(
        &self,
        delegator: &AccountId,
        percentage_bps: u64,
        locked_balance: u64,
        store: &BoostStore,
        curve: &dyn DecayCurve,
        now: u64,
        exclude: Option<&TokenId>,
    ) -> Result<Commitment, BoostError> {
        let debt = self.outstanding_debt(delegator, store, curve, now, exclude)?;
        if debt > 0 {
            return Err(BoostError::OutstandingNegativeBoost {
                delegator: *delegator,
                debt,
            });
        }

        let delegated = self.delegated_power(delegator, store, curve, now, exclude)?;
        let available = (locked_balance as u128).saturating_sub(delegated) as u64;

        // bps <= 10_000 and available <= u64::MAX: the product fits in u128
        let magnitude = (available as u128 * percentage_bps as u128 / BPS_DENOMINATOR as u128) as i128;
        if magnitude <= 0 {
            return Err(BoostError::NoBoostAvailable {
                delegator: *delegator,
                available,
            });
        }

        Ok(Commitment {
            available,
            magnitude,
        })
    }
}

fn others<'a>(
    tokens: &'a [TokenId],
    exclude: Option<&'a TokenId>,
) -> impl Iterator<Item = &'a TokenId> + 'a {
    tokens.iter().filter(move |t| Some(*t) != exclude)
}

fn sum_granted<'a>(
    tokens: impl Iterator<Item = &'a TokenId>,
    store: &BoostStore,
    curve: &dyn DecayCurve,
    now: u64,
) -> Result<u128, BoostError> {
    let mut total: u128 = 0;
    for token in tokens {
        let granted = curve.granted_at(store.get(token)?, now)?;
        total = total
            .checked_add(granted)
            .ok_or(DecayError::ArithmeticOverflow)?;
    }
    Ok(total)
}
