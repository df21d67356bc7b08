//! In-memory collaborators: lock oracle, token registry and clocks.
//!
//! [`MemoryEscrow`] and [`MemoryRegistry`] keep their state in `HashMap`s
//! behind `parking_lot` locks and have no persistence. They back the CLI
//! scenario runner and the test suites; a production deployment supplies
//! its own implementations of the traits.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use veboost_core::error::RegistryError;
use veboost_core::traits::{Clock, LockedBalanceOracle, TokenRegistry};
use veboost_core::types::{AccountId, TokenId};

/// Locked-balance oracle with explicitly set locks.
#[derive(Debug, Default)]
pub struct MemoryEscrow {
    /// account → (locked balance, lock expiry)
    locks: RwLock<HashMap<AccountId, (u64, u64)>>,
}

impl MemoryEscrow {
    /// Create an escrow with no locks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or replace) `account`'s lock.
    pub fn set_lock(&self, account: &AccountId, balance: u64, expiry: u64) {
        self.locks.write().insert(*account, (balance, expiry));
    }

    /// Remove `account`'s lock entirely.
    pub fn clear_lock(&self, account: &AccountId) {
        self.locks.write().remove(account);
    }
}

impl LockedBalanceOracle for MemoryEscrow {
    fn locked_balance(&self, account: &AccountId) -> u64 {
        self.locks.read().get(account).map_or(0, |l| l.0)
    }

    fn lock_expiry(&self, account: &AccountId) -> u64 {
        self.locks.read().get(account).map_or(0, |l| l.1)
    }
}

#[derive(Debug, Default)]
struct RegistryState {
    /// delegator → next unissued slot
    next_slot: HashMap<AccountId, u64>,
    /// (owner, operator) pairs with blanket approval
    operators: HashSet<(AccountId, AccountId)>,
}

/// Token registry issuing sequential slots per delegator.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    state: RwLock<RegistryState>,
}

impl MemoryRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant or revoke `operator`'s blanket approval over `owner`'s boosts.
    pub fn set_approval_for_all(&self, owner: &AccountId, operator: &AccountId, approved: bool) {
        let mut state = self.state.write();
        if approved {
            state.operators.insert((*owner, *operator));
        } else {
            state.operators.remove(&(*owner, *operator));
        }
    }

    /// Number of tokens minted for `delegator`.
    pub fn minted(&self, delegator: &AccountId) -> u64 {
        self.state.read().next_slot.get(delegator).copied().unwrap_or(0)
    }
}

impl TokenRegistry for MemoryRegistry {
    fn mint_token(&self, delegator: &AccountId) -> Result<TokenId, RegistryError> {
        let mut state = self.state.write();
        let next = state.next_slot.entry(*delegator).or_insert(0);
        let slot = *next;
        *next = slot
            .checked_add(1)
            .ok_or(RegistryError::SlotsExhausted(*delegator))?;
        Ok(TokenId::new(*delegator, slot))
    }

    fn is_approved_operator(&self, operator: &AccountId, delegator: &AccountId) -> bool {
        self.state.read().operators.contains(&(*delegator, *operator))
    }

    fn owner_of(&self, token: &TokenId) -> Option<AccountId> {
        (token.slot < self.minted(&token.delegator)).then_some(token.delegator)
    }
}

/// Wall clock backed by `chrono::Utc`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        chrono::Utc::now().timestamp().max(0) as u64
    }
}

/// Manually driven clock for tests and scenario replay.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(now: u64) -> Self {
        Self {
            now: AtomicU64::new(now),
        }
    }

    /// Jump to an absolute time.
    pub fn set(&self, now: u64) {
        self.now.store(now, Ordering::SeqCst);
    }

    /// Move forward by `secs`, saturating at `u64::MAX`.
    pub fn advance(&self, secs: u64) {
        let _ = self
            .now
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |t| Some(t.saturating_add(secs)));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}
