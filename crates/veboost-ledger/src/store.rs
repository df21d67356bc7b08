//! Boost token store: token id → boost record.
//!
//! The store never deletes. A record is inserted once by `create_boost`
//! and its schedule is rewritten in place by `extend_boost`; delegator and
//! receiver are fixed at insertion.
//!
//! The store enforces the record invariants on every write but performs no
//! authorization or capacity checks; those belong to the service.

use std::collections::HashMap;

use veboost_core::error::{BoostError, RegistryError};
use veboost_core::types::{BoostRecord, TokenId};

/// New decay schedule for an existing token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Schedule {
    pub initial_magnitude: i128,
    pub start_time: u64,
    pub expiry_time: u64,
    pub cancel_time: u64,
}

impl Schedule {
    /// `initial_magnitude > 0`, `start < expiry < cancel`.
    fn is_well_formed(&self) -> bool {
        self.initial_magnitude > 0
            && self.start_time < self.expiry_time
            && self.expiry_time < self.cancel_time
    }
}

/// In-memory boost record storage.
#[derive(Debug, Default, Clone)]
pub struct BoostStore {
    records: HashMap<TokenId, BoostRecord>,
}

impl BoostStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a record.
    ///
    /// # Errors
    ///
    /// [`BoostError::UnknownToken`] if `id` was never inserted.
    pub fn get(&self, id: &TokenId) -> Result<&BoostRecord, BoostError> {
        self.records.get(id).ok_or(BoostError::UnknownToken(*id))
    }

    /// Insert a freshly minted token.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::AlreadyMinted`] if `id` already has a record
    ///
    /// # Panics
    ///
    /// Debug builds assert the record's schedule is well formed; the
    /// service validates it before calling.
    pub fn insert(&mut self, id: TokenId, record: BoostRecord) -> Result<(), BoostError> {
        debug_assert_eq!(id.delegator, record.delegator);
        debug_assert!(schedule_of(&record).is_well_formed());
        if self.records.contains_key(&id) {
            return Err(RegistryError::AlreadyMinted(id).into());
        }
        self.records.insert(id, record);
        Ok(())
    }

    /// Replace the decay schedule of an existing token in place.
    ///
    /// # Errors
    ///
    /// [`BoostError::UnknownToken`] if `id` has no record.
    pub fn reschedule(&mut self, id: &TokenId, schedule: Schedule) -> Result<(), BoostError> {
        debug_assert!(schedule.is_well_formed());
        let record = self
            .records
            .get_mut(id)
            .ok_or(BoostError::UnknownToken(*id))?;
        record.initial_magnitude = schedule.initial_magnitude;
        record.start_time = schedule.start_time;
        record.expiry_time = schedule.expiry_time;
        record.cancel_time = schedule.cancel_time;
        Ok(())
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn schedule_of(record: &BoostRecord) -> Schedule {
    Schedule {
        initial_magnitude: record.initial_magnitude,
        start_time: record.start_time,
        expiry_time: record.expiry_time,
        cancel_time: record.cancel_time,
    }
}
