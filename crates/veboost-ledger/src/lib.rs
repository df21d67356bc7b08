//! # veboost-ledger: Boost token lifecycle.
//!
//! Composes the delegation subsystems into a single service:
//! - [`service::BoostService`]: public operations (`create_boost`,
//!   `extend_boost`, token queries) with validate-then-commit atomicity
//! - [`store::BoostStore`]: token id → boost record mapping
//! - [`ledger::OutstandingLedger`]: per-delegator and per-receiver token
//!   indexes with lazily recomputed debt and delegated-power aggregates
//! - [`auth`]: delegator / approved-operator gate
//! - [`validation`]: ordered parameter and extension rules
//! - [`memory`]: in-memory lock oracle, token registry and clocks
//! - [`config::BoostConfig`]: tunable limits

pub mod auth;
pub mod config;
pub mod ledger;
pub mod memory;
pub mod service;
pub mod store;
pub mod validation;

pub use config::BoostConfig;
pub use ledger::OutstandingLedger;
pub use memory::{ManualClock, MemoryEscrow, MemoryRegistry, SystemClock};
pub use service::BoostService;
pub use store::BoostStore;
