//! Shared fixtures for lifecycle and adversarial tests.

use std::sync::Arc;

use veboost_core::constants::{COIN, WEEK};
use veboost_core::types::{AccountId, TokenId};
use veboost_ledger::{BoostConfig, BoostService, ManualClock, MemoryEscrow, MemoryRegistry};

/// Genesis time of every fixture.
pub const T0: u64 = 1_700_000_000;

/// Alice's locked balance.
pub const ALICE_LOCKED: u64 = 1_000 * COIN;

/// Alice's lock expiry.
pub const ALICE_UNLOCK_TIME: u64 = T0 + 52 * WEEK;

/// Expiry of the fixture boost alice grants bob.
pub const EXPIRE_TIME: u64 = T0 + 2 * WEEK;

/// Cancel time of the fixture boost alice grants bob.
pub const CANCEL_TIME: u64 = T0 + 4 * WEEK;

pub fn alice() -> AccountId {
    AccountId::from_label("alice")
}

pub fn bob() -> AccountId {
    AccountId::from_label("bob")
}

pub fn charlie() -> AccountId {
    AccountId::from_label("charlie")
}

/// Service plus handles on its in-memory collaborators.
pub struct Fixture {
    pub escrow: Arc<MemoryEscrow>,
    pub registry: Arc<MemoryRegistry>,
    pub clock: Arc<ManualClock>,
    pub service: BoostService,
}

impl Fixture {
    /// Alice holds [`ALICE_LOCKED`] until [`ALICE_UNLOCK_TIME`]; the clock
    /// reads [`T0`]; no boosts exist.
    pub fn new() -> Self {
        let escrow = Arc::new(MemoryEscrow::new());
        let registry = Arc::new(MemoryRegistry::new());
        let clock = Arc::new(ManualClock::new(T0));
        escrow.set_lock(&alice(), ALICE_LOCKED, ALICE_UNLOCK_TIME);
        let service = BoostService::new(
            escrow.clone(),
            registry.clone(),
            clock.clone(),
            BoostConfig::default(),
        )
        .expect("default config is valid");
        Self {
            escrow,
            registry,
            clock,
            service,
        }
    }

    /// [`Fixture::new`] plus a 50% boost from alice to bob expiring at
    /// [`EXPIRE_TIME`] and cancelling at [`CANCEL_TIME`].
    pub fn with_boost_bob() -> (Self, TokenId) {
        let fx = Self::new();
        let token = fx
            .service
            .create_boost(&alice(), &bob(), 5_000, CANCEL_TIME, EXPIRE_TIME, &alice())
            .expect("fixture boost");
        (fx, token)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Token id of `delegator`'s `slot`-th boost.
pub fn token_id(delegator: AccountId, slot: u64) -> TokenId {
    TokenId::new(delegator, slot)
}
