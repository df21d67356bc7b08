//! Trait interfaces for veboost.
//!
//! These traits define the contracts between the delegation core and its
//! collaborators:
//! - [`LockedBalanceOracle`]: the voting-escrow ledger (read-only)
//! - [`TokenRegistry`]: token identity, ownership and operator approvals
//! - [`Clock`]: the host time source
//! - [`DecayCurve`]: point-in-time boost value (veboost-decay implements)

use crate::error::{DecayError, RegistryError};
use crate::types::{AccountId, BoostRecord, TokenId};

/// Read-only view of the voting-escrow lock backing a delegator's power.
pub trait LockedBalanceOracle: Send + Sync {
    /// Current locked-balance voting power of `account`, in base units.
    fn locked_balance(&self, account: &AccountId) -> u64;

    /// Unix time at which `account`'s lock expires. Zero if no lock.
    fn lock_expiry(&self, account: &AccountId) -> u64;
}

/// Identity and permission registry for boost tokens.
pub trait TokenRegistry: Send + Sync {
    /// Reserve a fresh token identifier for `delegator`.
    ///
    /// Slots are unique per delegator; two calls never return the same id.
    fn mint_token(&self, delegator: &AccountId) -> Result<TokenId, RegistryError>;

    /// Whether `operator` holds blanket approval over `delegator`'s boosts.
    fn is_approved_operator(&self, operator: &AccountId, delegator: &AccountId) -> bool;

    /// Delegator that owns `token`. `None` if never minted.
    fn owner_of(&self, token: &TokenId) -> Option<AccountId>;
}

/// Host clock. Read once at the start of every operation.
pub trait Clock: Send + Sync {
    /// Current unix time in seconds.
    fn now(&self) -> u64;
}

/// Point-in-time value of a boost schedule.
///
/// Implementations must be pure: the same record and instant always yield
/// the same value.
pub trait DecayCurve: Send + Sync {
    /// Signed boost value of `record` at `now`.
    fn value_at(&self, record: &BoostRecord, now: u64) -> Result<i128, DecayError>;

    /// Power the receiver currently holds: the value clamped at zero.
    ///
    /// Default implementation clamps [`value_at`](Self::value_at).
    fn granted_at(&self, record: &BoostRecord, now: u64) -> Result<u128, DecayError> {
        Ok(self.value_at(record, now)?.max(0) as u128)
    }

    /// Debt the delegator currently owes on `record`: the magnitude of a
    /// negative value, zero otherwise.
    ///
    /// Default implementation negates a negative [`value_at`](Self::value_at).
    fn debt_at(&self, record: &BoostRecord, now: u64) -> Result<u128, DecayError> {
        let value = self.value_at(record, now)?;
        Ok(if value < 0 { value.unsigned_abs() } else { 0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    // ------------------------------------------------------------------
    // Mock: LockedBalanceOracle
    // ------------------------------------------------------------------

    struct MockOracle {
        locks: HashMap<AccountId, (u64, u64)>,
    }

    impl LockedBalanceOracle for MockOracle {
        fn locked_balance(&self, account: &AccountId) -> u64 {
            self.locks.get(account).map(|l| l.0).unwrap_or(0)
        }

        fn lock_expiry(&self, account: &AccountId) -> u64 {
            self.locks.get(account).map(|l| l.1).unwrap_or(0)
        }
    }

    // ------------------------------------------------------------------
    // Mock: TokenRegistry
    // ------------------------------------------------------------------

    #[derive(Default)]
    struct MockRegistry {
        next: Mutex<HashMap<AccountId, u64>>,
        operators: HashSet<(AccountId, AccountId)>,
    }

    impl TokenRegistry for MockRegistry {
        fn mint_token(&self, delegator: &AccountId) -> Result<TokenId, RegistryError> {
            let mut next = self.next.lock().unwrap();
            let slot = next.entry(*delegator).or_insert(0);
            let id = TokenId::new(*delegator, *slot);
            *slot += 1;
            Ok(id)
        }

        fn is_approved_operator(&self, operator: &AccountId, delegator: &AccountId) -> bool {
            self.operators.contains(&(*operator, *delegator))
        }

        fn owner_of(&self, token: &TokenId) -> Option<AccountId> {
            let next = self.next.lock().unwrap();
            let minted = next.get(&token.delegator).copied().unwrap_or(0);
            (token.slot < minted).then_some(token.delegator)
        }
    }

    // ------------------------------------------------------------------
    // Mock: DecayCurve (step function, exercises the default methods)
    // ------------------------------------------------------------------

    struct StepCurve;

    impl DecayCurve for StepCurve {
        fn value_at(&self, record: &BoostRecord, now: u64) -> Result<i128, DecayError> {
            Ok(if now < record.expiry_time {
                record.initial_magnitude
            } else {
                -record.initial_magnitude
            })
        }
    }

    fn record() -> BoostRecord {
        BoostRecord {
            delegator: AccountId::from_label("alice"),
            receiver: AccountId::from_label("bob"),
            initial_magnitude: 700,
            start_time: 0,
            expiry_time: 10,
            cancel_time: 20,
        }
    }

    #[test]
    fn oracle_defaults_to_zero_for_unknown_account() {
        let oracle = MockOracle { locks: HashMap::new() };
        let a = AccountId::from_label("nobody");
        assert_eq!(oracle.locked_balance(&a), 0);
        assert_eq!(oracle.lock_expiry(&a), 0);
    }

    #[test]
    fn registry_slots_are_sequential_per_delegator() {
        let reg = MockRegistry::default();
        let alice = AccountId::from_label("alice");
        let bob = AccountId::from_label("bob");
        assert_eq!(reg.mint_token(&alice).unwrap().slot, 0);
        assert_eq!(reg.mint_token(&alice).unwrap().slot, 1);
        assert_eq!(reg.mint_token(&bob).unwrap().slot, 0);
        assert_eq!(reg.owner_of(&TokenId::new(alice, 1)), Some(alice));
        assert_eq!(reg.owner_of(&TokenId::new(alice, 2)), None);
    }

    #[test]
    fn granted_and_debt_defaults() {
        let c = StepCurve;
        let r = record();
        assert_eq!(c.granted_at(&r, 5).unwrap(), 700);
        assert_eq!(c.debt_at(&r, 5).unwrap(), 0);
        assert_eq!(c.granted_at(&r, 15).unwrap(), 0);
        assert_eq!(c.debt_at(&r, 15).unwrap(), 700);
    }

    // --- dyn compatibility ---

    #[test]
    fn traits_are_object_safe() {
        let oracle: &dyn LockedBalanceOracle = &MockOracle { locks: HashMap::new() };
        let registry: &dyn TokenRegistry = &MockRegistry::default();
        let curve: &dyn DecayCurve = &StepCurve;
        let a = AccountId::from_label("alice");
        assert_eq!(oracle.locked_balance(&a), 0);
        assert!(!registry.is_approved_operator(&a, &a));
        assert_eq!(curve.value_at(&record(), 0).unwrap(), 700);
    }
}
