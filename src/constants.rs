//! Physical, unit and epoch constants shared by the propagator.
//!
//! Gravity-model dependent values (μ, Earth radius, zonal harmonics) live in
//! [`crate::gravity`]; everything here is model independent.

/// Two pi
pub const TAU: f64 = std::f64::consts::TAU;

/// Pi
pub const PI: f64 = std::f64::consts::PI;

/// Degrees to radians
pub const DEG2RAD: f64 = PI / 180.0;

/// Radians to degrees
pub const RAD2DEG: f64 = 180.0 / PI;

/// Minutes per solar day
pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Revolutions/day → radians/minute divisor (1440 / 2π).
pub const XPDOTP: f64 = MINUTES_PER_DAY / TAU;

/// Julian date of 1949-12-31 00:00 UT, the reference for SGP4 internal epochs.
pub const JD_1950: f64 = 2_433_281.5;

/// Julian date of J2000 (2000-01-01 12:00).
pub const JD_J2000: f64 = 2_451_545.0;

/// Julian days per century.
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Orbits with a period at or above this many minutes use the deep-space model.
pub const DEEP_SPACE_PERIOD_MIN: f64 = 225.0;

/// Earth rotation rate (rad/min) used by the resonance terms.
pub const RPTIM: f64 = 4.375_269_088_011_299_66e-3;

/// Two thirds.
pub const X2O3: f64 = 2.0 / 3.0;

/// Guard substituted for `1 + cos i` when the inclination is near 180°.
pub const TEMP4: f64 = 1.5e-12;
