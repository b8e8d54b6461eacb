//! Fixed scoring policy. Tuning these values changes recommendations for every request.

/// Weight of premium affordability in the utility score.
pub const AFFORDABILITY_WEIGHT: f64 = 0.3;
/// Weight of out-of-pocket protection in the utility score.
pub const PROTECTION_WEIGHT: f64 = 0.3;
/// Weight of actuarial coverage in the utility score.
pub const COVERAGE_WEIGHT: f64 = 0.2;
/// Weight of network quality in the utility score.
pub const NETWORK_WEIGHT: f64 = 0.2;

/// Network quality is not differentiated between plans.
pub const NETWORK_QUALITY: f64 = 0.8;
/// Protection assumed when a plan publishes no MOOP.
pub const NEUTRAL_PROTECTION: f64 = 0.5;
/// MOOP at which protection reaches zero.
pub const MOOP_NORMALIZATION: f64 = 10_000.0;

pub const UTILITY_SCALE: f64 = 10.0;

/// Displayed network strength on every coverage summary.
pub const NETWORK_STRENGTH_DISPLAY: f64 = 8.5;
/// Displayed risk protection when a plan publishes no MOOP.
pub const DEFAULT_RISK_PROTECTION: f64 = 7.0;
/// MOOP dollars per point of displayed risk protection.
pub const RISK_PROTECTION_DIVISOR: f64 = 1_000.0;

/// Actuarial value (exclusive) above which coverage is `Excellent`.
pub const EXCELLENT_COVERAGE_AV: f64 = 80.0;
/// Actuarial value (exclusive) above which coverage is `Good`.
pub const GOOD_COVERAGE_AV: f64 = 70.0;

pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Number of runner-up plans reported next to a recommendation.
pub const MAX_ALTERNATIVES: usize = 2;
