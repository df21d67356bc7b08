//! # veboost-decay: Time-decay of boost magnitudes.
//!
//! All calculations use integer arithmetic only for determinism.
//!
//! A boost decays in two linear phases:
//! - **Grant phase** (`start..expiry`): from `initial_magnitude` down to zero.
//! - **Debt phase** (`expiry..cancel`): from zero down to `-initial_magnitude`.
//!
//! After `cancel_time` the value is fixed at `-initial_magnitude`. Every
//! division truncates toward zero, so the reported value is never further
//! from zero than the exact rational value.

pub mod engine;

pub use engine::{boost_value, TwoPhaseDecay};
