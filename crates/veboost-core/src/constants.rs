//! Protocol constants. Times are unix seconds, magnitudes are base units
//! of the vote-escrowed token (1 VE = 10^8 base units).

pub const COIN: u64 = 100_000_000;

/// One day in seconds.
pub const DAY: u64 = 86_400;

/// One week in seconds.
pub const WEEK: u64 = 7 * DAY;

/// Minimum distance between "now" and a boost's expiry time.
///
/// Prevents degenerate grants that decay to zero almost instantly.
///
/// # Examples
///
/// ```
/// use veboost_core::constants::{DAY, MIN_DURATION};
/// assert_eq!(MIN_DURATION, DAY);
/// ```
pub const MIN_DURATION: u64 = DAY;

/// Basis-point denominator: 10_000 bps = 100%.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Largest percentage a single boost may request, in basis points.
pub const MAX_PERCENTAGE_BPS: u64 = BPS_DENOMINATOR;
