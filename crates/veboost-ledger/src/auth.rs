//! Delegation authorization gate.
//!
//! A caller may mutate a delegator's boosts iff it is the delegator itself
//! or the registry reports it as an approved operator for that delegator.

use veboost_core::error::BoostError;
use veboost_core::traits::TokenRegistry;
use veboost_core::types::AccountId;

/// Check that `caller` may act on behalf of `delegator`.
///
/// # Errors
///
/// [`BoostError::NotAuthorized`] if `caller` is neither `delegator` nor an
/// approved operator.
pub fn authorize(
    registry: &dyn TokenRegistry,
    caller: &AccountId,
    delegator: &AccountId,
) -> Result<(), BoostError> {
    if caller == delegator || registry.is_approved_operator(caller, delegator) {
        return Ok(());
    }
    Err(BoostError::NotAuthorized {
        caller: *caller,
        delegator: *delegator,
    })
}
