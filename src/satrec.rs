//! The satellite record: one initialized SGP4/SDP4 propagator instance.
//!
//! A [`Satrec`] is built once from an element set (see [`crate::init`]) and is
//! read-only afterwards, except for the deep-space resonance cache which the
//! kernel advances as it integrates (see [`ResonanceState`]).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;
use crate::deep_space::DeepSpace;
use crate::gravity::{GravityConstants, GravityModel};

// ── Configuration ──

/// Which sidereal-time formula and angle wrapping to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpsMode {
    /// Legacy AFSPC behaviour: 1970-referenced sidereal time, node wrapped
    /// into `[0, 2π)` in the low-inclination periodics.
    Afspc,
    /// Modern IAU sidereal time, no extra wrapping.
    #[default]
    Improved,
}

impl FromStr for OpsMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "afspc" => Ok(OpsMode::Afspc),
            "i" | "improved" => Ok(OpsMode::Improved),
            _ => Err(format!("Unknown operations mode '{}' (expected afspc or improved)", s)),
        }
    }
}

impl fmt::Display for OpsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpsMode::Afspc => f.write_str("afspc"),
            OpsMode::Improved => f.write_str("improved"),
        }
    }
}

/// Initialization options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sgp4Options {
    /// Gravity model (default WGS-72).
    pub gravity: GravityModel,
    /// Operations mode (default improved).
    pub ops_mode: OpsMode,
}

impl Sgp4Options {
    /// WGS-72 with the legacy AFSPC operations mode.
    pub fn afspc() -> Self {
        Sgp4Options {
            gravity: GravityModel::Wgs72,
            ops_mode: OpsMode::Afspc,
        }
    }

    pub fn with_gravity(mut self, gravity: GravityModel) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_ops_mode(mut self, ops_mode: OpsMode) -> Self {
        self.ops_mode = ops_mode;
        self
    }
}

// ── Errors ──

/// Physical failures reported by the propagation kernel.
///
/// Each variant maps onto the historical integer status via [`Sgp4Error::code`].
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum Sgp4Error {
    #[error("Mean elements invalid: eccentricity {ecc} outside [-0.001, 1) or semi-major axis {a} below 0.95 Earth radii")]
    MeanElements { ecc: f64, a: f64 },

    #[error("Propagation time {0} minutes is not finite")]
    NonFiniteTime(f64),

    #[error("Mean motion {0} is not positive")]
    MeanMotion(f64),

    #[error("Perturbed eccentricity {0} outside [0, 1]")]
    PerturbedEccentricity(f64),

    #[error("Semi-latus rectum {0} is negative")]
    SemiLatusRectum(f64),

    /// Never produced; kept so the full status table is representable.
    #[error("Epoch elements are sub-orbital")]
    SubOrbitalEpoch,

    #[error("Satellite has decayed: radius {0} Earth radii")]
    Decayed(f64),
}

impl Sgp4Error {
    /// Historical integer status code (1-6).
    pub fn code(&self) -> u8 {
        match self {
            Sgp4Error::MeanElements { .. } | Sgp4Error::NonFiniteTime(_) => 1,
            Sgp4Error::MeanMotion(_) => 2,
            Sgp4Error::PerturbedEccentricity(_) => 3,
            Sgp4Error::SemiLatusRectum(_) => 4,
            Sgp4Error::SubOrbitalEpoch => 5,
            Sgp4Error::Decayed(_) => 6,
        }
    }
}

// ── Element set in working units ──

/// Raw elements in propagator working units (radians, radians/minute).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSet {
    /// Catalog number as written in the element set.
    pub satnum: String,
    /// Epoch Julian date, whole part (ends in .5).
    pub epoch_jd: f64,
    /// Epoch Julian date, fractional day.
    pub epoch_jd_frac: f64,
    /// Drag term (1/Earth radii).
    pub bstar: f64,
    /// First derivative of mean motion (rad/min²).
    pub ndot: f64,
    /// Second derivative of mean motion (rad/min³).
    pub nddot: f64,
    pub ecco: f64,
    pub argpo: f64,
    pub inclo: f64,
    pub mo: f64,
    /// Kozai mean motion (rad/min).
    pub no_kozai: f64,
    pub nodeo: f64,
}

impl ElementSet {
    /// Epoch as days since 1949-12-31 00:00 UT.
    pub fn epoch(&self) -> f64 {
        self.epoch_jd + self.epoch_jd_frac - JD_1950
    }
}

// ── Resonance ──

/// Earth-rotation commensurability of a deep-space orbit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resonance {
    #[default]
    None,
    /// One revolution per day (geosynchronous).
    Synchronous,
    /// Two revolutions per day, eccentric (Molniya-class).
    HalfDay,
}

impl Resonance {
    /// Classify from Brouwer mean motion (rad/min) and eccentricity.
    pub fn classify(mean_motion: f64, ecc: f64) -> Self {
        if (8.26e-3..=9.24e-3).contains(&mean_motion) && ecc >= 0.5 {
            Resonance::HalfDay
        } else if (0.003_490_658_5..=0.005_235_987_7).contains(&mean_motion) {
            Resonance::Synchronous
        } else {
            Resonance::None
        }
    }
}

/// Resonance integrator cache.
///
/// Holds the integrated mean longitude and mean motion at integrator time
/// `atime` (minutes from epoch). The kernel resumes from here when the next
/// request lies further out on the same side of epoch, otherwise it restarts
/// from the epoch values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResonanceState {
    pub atime: f64,
    pub xli: f64,
    pub xni: f64,
}

impl ResonanceState {
    /// State at epoch.
    pub fn at_epoch(xlamo: f64, no_unkozai: f64) -> Self {
        ResonanceState {
            atime: 0.0,
            xli: xlamo,
            xni: no_unkozai,
        }
    }
}

// ── Working elements ──

/// Mean elements at a propagation time, before short-period corrections.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeanElements {
    pub ecc: f64,
    /// Inclination (rad)
    pub incl: f64,
    /// Right ascension of the ascending node (rad)
    pub node: f64,
    /// Argument of perigee (rad)
    pub argp: f64,
    /// Mean anomaly (rad)
    pub mean_anomaly: f64,
    /// Mean motion (rad/min)
    pub mean_motion: f64,
}

// ── Method ──

/// Propagation method, fixed at initialization.
#[derive(Debug, Clone, PartialEq)]
pub enum Method {
    /// Period below 225 minutes: SGP4.
    NearEarth,
    /// Period of 225 minutes or more: SDP4 with lunar-solar terms.
    DeepSpace(Box<DeepSpace>),
}

// ── Record ──

/// An initialized satellite record.
#[derive(Debug, Clone, PartialEq)]
pub struct Satrec {
    pub satnum: String,
    pub options: Sgp4Options,
    pub gravity: GravityConstants,

    // Elements as given
    pub epoch_jd: f64,
    pub epoch_jd_frac: f64,
    /// Days since 1949-12-31 00:00 UT.
    pub epoch: f64,
    pub bstar: f64,
    pub ndot: f64,
    pub nddot: f64,
    pub ecco: f64,
    pub argpo: f64,
    pub inclo: f64,
    pub mo: f64,
    pub no_kozai: f64,
    pub nodeo: f64,

    // Derived at initialization
    /// Brouwer mean motion (rad/min).
    pub no_unkozai: f64,
    /// Brouwer semi-major axis (Earth radii).
    pub a: f64,
    /// Apogee altitude (Earth radii).
    pub alta: f64,
    /// Perigee altitude (Earth radii).
    pub altp: f64,
    /// Sidereal time at epoch (rad).
    pub gsto: f64,
    /// Perigee below 220 km (or deep space): drop the higher-order drag terms.
    pub simple_drag: bool,
    pub method: Method,

    pub(crate) aycof: f64,
    pub(crate) con41: f64,
    pub(crate) cc1: f64,
    pub(crate) cc4: f64,
    pub(crate) cc5: f64,
    pub(crate) d2: f64,
    pub(crate) d3: f64,
    pub(crate) d4: f64,
    pub(crate) delmo: f64,
    pub(crate) eta: f64,
    pub(crate) argpdot: f64,
    pub(crate) omgcof: f64,
    pub(crate) sinmao: f64,
    pub(crate) t2cof: f64,
    pub(crate) t3cof: f64,
    pub(crate) t4cof: f64,
    pub(crate) t5cof: f64,
    pub(crate) x1mth2: f64,
    pub(crate) x7thm1: f64,
    pub(crate) mdot: f64,
    pub(crate) nodedot: f64,
    pub(crate) xlcof: f64,
    pub(crate) xmcof: f64,
    pub(crate) nodecf: f64,

    /// Outcome of the most recent propagation (`None` on success).
    pub error: Option<Sgp4Error>,
}

impl Satrec {
    /// Whether the deep-space (SDP4) branch is in use.
    pub fn is_deep_space(&self) -> bool {
        matches!(self.method, Method::DeepSpace(_))
    }

    /// Resonance class (always `None` for near-Earth records).
    pub fn resonance(&self) -> Resonance {
        match &self.method {
            Method::NearEarth => Resonance::None,
            Method::DeepSpace(ds) => ds.resonance,
        }
    }

    /// Current resonance integrator cache, if the orbit is resonant.
    pub fn resonance_state(&self) -> Option<ResonanceState> {
        match &self.method {
            Method::DeepSpace(ds) if ds.resonance != Resonance::None => Some(ds.state),
            _ => None,
        }
    }

    /// Rewind the resonance integrator to epoch.
    ///
    /// Needed only when evaluating far out-of-order times where the automatic
    /// restart rule would not trigger. No-op for near-Earth records.
    pub fn reset_resonance(&mut self) {
        let no_unkozai = self.no_unkozai;
        if let Method::DeepSpace(ds) = &mut self.method {
            ds.state = ResonanceState::at_epoch(ds.xlamo, no_unkozai);
        }
    }

    /// Epoch Julian date (whole + fraction).
    pub fn epoch_julian_date(&self) -> f64 {
        self.epoch_jd + self.epoch_jd_frac
    }

    /// Anomalistic period from the Brouwer mean motion (minutes).
    pub fn period_minutes(&self) -> f64 {
        TAU / self.no_unkozai
    }

    /// Apogee altitude (km).
    pub fn apogee_km(&self) -> f64 {
        self.alta * self.gravity.radius_earth_km
    }

    /// Perigee altitude (km).
    pub fn perigee_km(&self) -> f64 {
        self.altp * self.gravity.radius_earth_km
    }

    /// Last error as the historical status code (0 = none).
    pub fn error_code(&self) -> u8 {
        self.error.map_or(0, |e| e.code())
    }
}
