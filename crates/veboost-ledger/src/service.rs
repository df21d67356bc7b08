//! Public delegation service.
//!
//! [`BoostService`] owns the [`BoostStore`] and [`OutstandingLedger`]
//! behind a single mutex and wires them to the external collaborators.
//! Every mutating operation takes the lock, reads the clock once, runs all
//! validation, and only then writes. A rejected operation leaves the store
//! and the ledger exactly as they were.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use veboost_core::error::{BoostError, ConfigError, RegistryError};
use veboost_core::traits::{Clock, DecayCurve, LockedBalanceOracle, TokenRegistry};
use veboost_core::types::{AccountId, BoostParams, BoostRecord, TokenId};
use veboost_decay::TwoPhaseDecay;

use crate::auth::authorize;
use crate::config::BoostConfig;
use crate::ledger::OutstandingLedger;
use crate::store::{BoostStore, Schedule};
use crate::validation::{check_extension, check_params};

#[derive(Debug, Default)]
struct BoostState {
    store: BoostStore,
    ledger: OutstandingLedger,
}

/// The boost token service.
pub struct BoostService {
    oracle: Arc<dyn LockedBalanceOracle>,
    registry: Arc<dyn TokenRegistry>,
    clock: Arc<dyn Clock>,
    curve: Arc<dyn DecayCurve>,
    config: BoostConfig,
    state: Mutex<BoostState>,
}

impl fmt::Debug for BoostService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoostService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl BoostService {
    /// Create a service using the two-phase linear decay curve.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] from [`BoostConfig::validate`].
    pub fn new(
        oracle: Arc<dyn LockedBalanceOracle>,
        registry: Arc<dyn TokenRegistry>,
        clock: Arc<dyn Clock>,
        config: BoostConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            oracle,
            registry,
            clock,
            curve: Arc::new(TwoPhaseDecay::new()),
            config,
            state: Mutex::new(BoostState::default()),
        })
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Delegate `percentage_bps` of `delegator`'s available power to
    /// `receiver` until `expire_time`, with the debt tail closing at
    /// `cancel_time`.
    ///
    /// # Errors
    ///
    /// In order of evaluation: [`BoostError::ZeroAccount`],
    /// [`BoostError::NotAuthorized`],
    /// [`BoostError::SelfDelegation`], [`BoostError::InvalidPercentage`],
    /// [`BoostError::CancelBeforeExpiry`], [`BoostError::DurationTooShort`],
    /// [`BoostError::ExpiryBeyondLockExpiry`],
    /// [`BoostError::OutstandingNegativeBoost`],
    /// [`BoostError::NoBoostAvailable`], then registry failures.
    pub fn create_boost(
        &self,
        delegator: &AccountId,
        receiver: &AccountId,
        percentage_bps: u64,
        cancel_time: u64,
        expire_time: u64,
        caller: &AccountId,
    ) -> Result<TokenId, BoostError> {
        let params = BoostParams {
            percentage_bps,
            expire_time,
            cancel_time,
        };
        self.try_create(delegator, receiver, &params, caller)
            .inspect_err(|e| log_rejection("create_boost", e))
    }

    /// Restart `token`'s schedule from now with a fresh percentage, a later
    /// expiry and a new cancel time.
    ///
    /// # Errors
    ///
    /// In order of evaluation: [`BoostError::UnknownToken`],
    /// [`BoostError::NotAuthorized`], [`BoostError::InvalidPercentage`],
    /// [`BoostError::CancelBeforeExpiry`], [`BoostError::DurationTooShort`],
    /// [`BoostError::ExpiryBeyondLockExpiry`],
    /// [`BoostError::ExpiryNotIncreasing`],
    /// [`BoostError::CancelTimeReductionDisallowed`],
    /// [`BoostError::OutstandingNegativeBoost`],
    /// [`BoostError::NoBoostAvailable`],
    /// [`BoostError::BoostReductionDisallowed`].
    pub fn extend_boost(
        &self,
        token: &TokenId,
        percentage_bps: u64,
        expire_time: u64,
        cancel_time: u64,
        caller: &AccountId,
    ) -> Result<(), BoostError> {
        let params = BoostParams {
            percentage_bps,
            expire_time,
            cancel_time,
        };
        self.try_extend(token, &params, caller)
            .inspect_err(|e| log_rejection("extend_boost", e))
    }

    fn try_create(
        &self,
        delegator: &AccountId,
        receiver: &AccountId,
        params: &BoostParams,
        caller: &AccountId,
    ) -> Result<TokenId, BoostError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        // read under the lock so commit order matches time order
        let now = self.clock.now();

        if delegator.is_zero() {
            return Err(BoostError::ZeroAccount { role: "delegator" });
        }
        if receiver.is_zero() {
            return Err(BoostError::ZeroAccount { role: "receiver" });
        }
        authorize(self.registry.as_ref(), caller, delegator)?;
        if receiver == delegator {
            return Err(BoostError::SelfDelegation(*delegator));
        }
        check_params(params, now, self.oracle.lock_expiry(delegator), &self.config)?;

        let commitment = state.ledger.commit(
            delegator,
            params.percentage_bps,
            self.oracle.locked_balance(delegator),
            &state.store,
            self.curve.as_ref(),
            now,
            None,
        )?;

        let token = self.registry.mint_token(delegator)?;
        if token.delegator != *delegator || self.registry.owner_of(&token) != Some(*delegator) {
            return Err(RegistryError::Unavailable(format!(
                "minted {token} for delegator {delegator}"
            ))
            .into());
        }

        state.store.insert(
            token,
            BoostRecord {
                delegator: *delegator,
                receiver: *receiver,
                initial_magnitude: commitment.magnitude,
                start_time: now,
                expiry_time: params.expire_time,
                cancel_time: params.cancel_time,
            },
        )?;
        state.ledger.record(token, *receiver);

        info!(
            %token,
            receiver = %receiver.short(),
            magnitude = %commitment.magnitude,
            expire_time = params.expire_time,
            cancel_time = params.cancel_time,
            "created boost"
        );
        Ok(token)
    }

    fn try_extend(
        &self,
        token: &TokenId,
        params: &BoostParams,
        caller: &AccountId,
    ) -> Result<(), BoostError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let now = self.clock.now();

        let current = state.store.get(token)?.clone();
        let delegator = current.delegator;

        authorize(self.registry.as_ref(), caller, &delegator)?;
        check_params(params, now, self.oracle.lock_expiry(&delegator), &self.config)?;
        check_extension(token, &current, params, now)?;

        let commitment = state.ledger.commit(
            &delegator,
            params.percentage_bps,
            self.oracle.locked_balance(&delegator),
            &state.store,
            self.curve.as_ref(),
            now,
            Some(token),
        )?;

        let current_value = self.curve.value_at(&current, now)?;
        if commitment.magnitude < current_value {
            return Err(BoostError::BoostReductionDisallowed {
                token: *token,
                proposed: commitment.magnitude,
                current: current_value,
            });
        }

        state.store.reschedule(
            token,
            Schedule {
                initial_magnitude: commitment.magnitude,
                start_time: now,
                expiry_time: params.expire_time,
                cancel_time: params.cancel_time,
            },
        )?;
        state.ledger.record(*token, current.receiver);

        info!(
            %token,
            previous = %current_value,
            magnitude = %commitment.magnitude,
            expire_time = params.expire_time,
            cancel_time = params.cancel_time,
            "extended boost"
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Token queries
    // ------------------------------------------------------------------

    /// Current signed value of `token`.
    pub fn token_boost(&self, token: &TokenId) -> Result<i128, BoostError> {
        self.token_boost_at(token, self.clock.now())
    }

    /// Signed value of `token` at an arbitrary instant.
    pub fn token_boost_at(&self, token: &TokenId, at: u64) -> Result<i128, BoostError> {
        let state = self.state.lock();
        Ok(self.curve.value_at(state.store.get(token)?, at)?)
    }

    /// Expiry time of `token`.
    pub fn token_expiry(&self, token: &TokenId) -> Result<u64, BoostError> {
        self.with_record(token, |r| r.expiry_time)
    }

    /// Cancel time of `token`.
    pub fn token_cancel_time(&self, token: &TokenId) -> Result<u64, BoostError> {
        self.with_record(token, |r| r.cancel_time)
    }

    /// Start of `token`'s current schedule.
    pub fn token_start_time(&self, token: &TokenId) -> Result<u64, BoostError> {
        self.with_record(token, |r| r.start_time)
    }

    pub fn token_delegator(&self, token: &TokenId) -> Result<AccountId, BoostError> {
        self.with_record(token, |r| r.delegator)
    }

    pub fn token_receiver(&self, token: &TokenId) -> Result<AccountId, BoostError> {
        self.with_record(token, |r| r.receiver)
    }

    /// Snapshot of `token`'s full record.
    pub fn token_record(&self, token: &TokenId) -> Result<BoostRecord, BoostError> {
        self.with_record(token, BoostRecord::clone)
    }

    fn with_record<T>(
        &self,
        token: &TokenId,
        f: impl FnOnce(&BoostRecord) -> T,
    ) -> Result<T, BoostError> {
        let state = self.state.lock();
        Ok(f(state.store.get(token)?))
    }

    // ------------------------------------------------------------------
    // Account queries
    // ------------------------------------------------------------------

    /// Tokens issued by `delegator`, in mint order.
    pub fn tokens_of(&self, delegator: &AccountId) -> Vec<TokenId> {
        self.state.lock().ledger.tokens_of(delegator).to_vec()
    }

    /// Number of tokens ever created.
    pub fn token_count(&self) -> usize {
        self.state.lock().store.len()
    }

    /// Positive power `account` currently delegates away.
    pub fn delegated_boost(&self, account: &AccountId) -> Result<u64, BoostError> {
        let now = self.clock.now();
        let state = self.state.lock();
        let power = state
            .ledger
            .delegated_power(account, &state.store, self.curve.as_ref(), now, None)?;
        Ok(clamp_u64(power))
    }

    /// Positive power `account` currently receives.
    pub fn received_boost(&self, account: &AccountId) -> Result<u64, BoostError> {
        let now = self.clock.now();
        let state = self.state.lock();
        let power = state
            .ledger
            .received_power(account, &state.store, self.curve.as_ref(), now)?;
        Ok(clamp_u64(power))
    }

    /// Debt `account` currently owes across its boosts in the debt phase.
    pub fn outstanding_debt(&self, account: &AccountId) -> Result<u128, BoostError> {
        let now = self.clock.now();
        let state = self.state.lock();
        state
            .ledger
            .outstanding_debt(account, &state.store, self.curve.as_ref(), now, None)
    }

    /// Voting power after delegation: `locked - delegated + received`,
    /// saturating at both ends.
    pub fn adjusted_balance_of(&self, account: &AccountId) -> Result<u64, BoostError> {
        let now = self.clock.now();
        let locked = self.oracle.locked_balance(account) as u128;
        let state = self.state.lock();
        let curve = self.curve.as_ref();
        let delegated = state
            .ledger
            .delegated_power(account, &state.store, curve, now, None)?;
        let received = state.ledger.received_power(account, &state.store, curve, now)?;
        Ok(clamp_u64(
            locked.saturating_sub(delegated).saturating_add(received),
        ))
    }
}

fn clamp_u64(value: u128) -> u64 {
    value.min(u64::MAX as u128) as u64
}

fn log_rejection(op: &'static str, err: &BoostError) {
    debug!(op, kind = err.kind(), "rejected: {err}");
}
