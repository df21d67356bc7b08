//! Decay engine implementing the [`DecayCurve`] trait.
//!
//! Evaluates the two-phase linear schedule of a [`BoostRecord`] at an
//! arbitrary instant. All arithmetic is `i128` with checked multiplication.

use veboost_core::error::DecayError;
use veboost_core::traits::DecayCurve;
use veboost_core::types::BoostRecord;

/// The production decay curve: linear grant phase, linear debt phase,
/// constant after cancellation.
#[derive(Debug, Clone, Default)]
pub struct TwoPhaseDecay;

impl TwoPhaseDecay {
    /// Create a new TwoPhaseDecay.
    pub fn new() -> Self {
        Self
    }
}

/// Fixed-point `magnitude * numerator / denominator`, truncating toward zero.
///
/// `denominator` must be positive.
fn scale(magnitude: i128, numerator: i128, denominator: i128) -> Result<i128, DecayError> {
    magnitude
        .checked_mul(numerator)
        .and_then(|p| p.checked_div(denominator))
        .ok_or(DecayError::ArithmeticOverflow)
}

/// Signed boost value at `now` for the schedule `(initial, start, expiry, cancel)`.
///
/// - `now <= start`: `initial`
/// - `start < now < expiry`: `initial * (expiry - now) / (expiry - start)`
/// - `expiry <= now < cancel`: `initial * (expiry - now) / (cancel - expiry)`
/// - `now >= cancel`: `-initial`
///
/// At `now == expiry` both phase formulas agree on exactly zero.
///
/// # Examples
///
/// ```
/// use veboost_decay::boost_value;
/// assert_eq!(boost_value(1_000, 0, 100, 300, 0).unwrap(), 1_000);
/// assert_eq!(boost_value(1_000, 0, 100, 300, 50).unwrap(), 500);
/// assert_eq!(boost_value(1_000, 0, 100, 300, 100).unwrap(), 0);
/// assert_eq!(boost_value(1_000, 0, 100, 300, 200).unwrap(), -500);
/// assert_eq!(boost_value(1_000, 0, 100, 300, 999).unwrap(), -1_000);
/// ```
pub fn boost_value(
    initial: i128,
    start: u64,
    expiry: u64,
    cancel: u64,
    now: u64,
) -> Result<i128, DecayError> {
    if now <= start {
        return Ok(initial);
    }

    if now < expiry {
        // start < now < expiry, so expiry - start > 0
        return scale(initial, (expiry - now) as i128, (expiry - start) as i128);
    }

    if now < cancel {
        // expiry <= now < cancel: negative numerator, positive denominator
        return scale(initial, -((now - expiry) as i128), (cancel - expiry) as i128);
    }

    initial.checked_neg().ok_or(DecayError::ArithmeticOverflow)
}

impl DecayCurve for TwoPhaseDecay {
    fn value_at(&self, record: &BoostRecord, now: u64) -> Result<i128, DecayError> {
        boost_value(
            record.initial_magnitude,
            record.start_time,
            record.expiry_time,
            record.cancel_time,
            now,
        )
    }
}
