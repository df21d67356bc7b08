//! Lifecycle and adversarial test suite for veboost.
//!
//! The integration tests drive [`veboost_ledger::BoostService`] through
//! the in-memory collaborators and check the delegation invariants under
//! hand-written scenarios and randomized operation sequences.

pub mod helpers;
