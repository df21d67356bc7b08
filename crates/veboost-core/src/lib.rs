//! # veboost-core
//! Foundation types and traits for veboost delegation.
//!
//! - [`types`]: accounts, token identifiers and boost records
//! - [`traits`]: contracts for the external collaborators (lock oracle,
//!   token registry, clock) and the decay curve
//! - [`error`]: closed error enumerations
//! - [`constants`]: protocol constants

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;
