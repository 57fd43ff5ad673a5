//! Classical orbital elements from state vectors, and anomaly conversion.
//!
//! Angles that are geometrically undefined for a given orbit shape (argument
//! of perigee on a circular orbit, node on an equatorial orbit, ...) are
//! reported as `None` rather than a magic number.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::math::{angle, cross, dot, mag, wrap_two_pi};

const SMALL: f64 = 1.0e-8;

/// Orbit shape classification, which decides which angles are defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrbitType {
    /// Elliptical (or hyperbolic/parabolic) and inclined.
    EllipticalInclined,
    /// Circular and equatorial.
    CircularEquatorial,
    /// Circular and inclined.
    CircularInclined,
    /// Elliptical and equatorial.
    EllipticalEquatorial,
}

/// Classical (osculating) orbital elements.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClassicalElements {
    /// Semi-latus rectum (km)
    pub p: f64,
    /// Semi-major axis (km); `None` for parabolic orbits.
    pub a: Option<f64>,
    /// Eccentricity
    pub ecc: f64,
    /// Inclination (rad)
    pub incl: f64,
    /// Right ascension of ascending node (rad)
    pub raan: Option<f64>,
    /// Argument of perigee (rad)
    pub argp: Option<f64>,
    /// True anomaly (rad)
    pub nu: Option<f64>,
    /// Mean anomaly (rad). For circular orbits this carries the argument of
    /// latitude or true longitude instead.
    pub m: Option<f64>,
    /// Argument of latitude (rad), circular inclined orbits only.
    pub arglat: Option<f64>,
    /// True longitude (rad), circular equatorial orbits only.
    pub truelon: Option<f64>,
    /// Longitude of periapsis (rad), elliptical equatorial orbits only.
    pub lonper: Option<f64>,
    pub orbit_type: OrbitType,
}

/// Eccentric (or hyperbolic/parabolic) anomaly and mean anomaly for a true anomaly.
///
/// Branches on the eccentricity regime: circular (`e < 1e-8`), elliptical,
/// hyperbolic (`e > 1 + 1e-8`) and parabolic. Returns `None` where the anomaly
/// is not reachable (hyperbolic beyond the asymptote, parabolic past ±168°).
pub fn true_to_mean_anomaly(ecc: f64, nu: f64) -> Option<(f64, f64)> {
    let (e0, m) = if ecc.abs() < SMALL {
        (nu, nu)
    } else if ecc < 1.0 - SMALL {
        let denom = 1.0 + ecc * nu.cos();
        let sine = (1.0 - ecc * ecc).sqrt() * nu.sin() / denom;
        let cose = (ecc + nu.cos()) / denom;
        let e0 = sine.atan2(cose);
        (e0, e0 - ecc * e0.sin())
    } else if ecc > 1.0 + SMALL {
        if nu.abs() + 0.00001 >= PI - (1.0 / ecc).acos() {
            return None;
        }
        let sine = (ecc * ecc - 1.0).sqrt() * nu.sin() / (1.0 + ecc * nu.cos());
        let e0 = sine.asinh();
        (e0, ecc * e0.sinh() - e0)
    } else {
        if nu.abs() >= 168.0 * DEG2RAD {
            return None;
        }
        let e0 = (nu * 0.5).tan();
        (e0, e0 + e0 * e0 * e0 / 3.0)
    };

    if ecc < 1.0 {
        Some((e0 % TAU, wrap_two_pi(m)))
    } else {
        Some((e0, m))
    }
}

impl ClassicalElements {
    /// Elements from an inertial position (km) and velocity (km/s).
    ///
    /// Returns `None` when the angular momentum vanishes (rectilinear motion).
    pub fn from_state(r: &[f64; 3], v: &[f64; 3], mu: f64) -> Option<Self> {
        let magr = mag(r);
        let magv = mag(v);

        let hbar = cross(r, v);
        let magh = mag(&hbar);
        if magh <= SMALL {
            return None;
        }

        let nbar = [-hbar[1], hbar[0], 0.0];
        let magn = mag(&nbar);
        let c1 = magv * magv - mu / magr;
        let rdotv = dot(r, v);
        let ebar = [
            (c1 * r[0] - rdotv * v[0]) / mu,
            (c1 * r[1] - rdotv * v[1]) / mu,
            (c1 * r[2] - rdotv * v[2]) / mu,
        ];
        let ecc = mag(&ebar);

        let sme = 0.5 * magv * magv - mu / magr;
        let a = (sme.abs() > SMALL).then(|| -mu / (2.0 * sme));
        let p = magh * magh / mu;

        let incl = (hbar[2] / magh).acos();
        let equatorial = incl < SMALL || (incl - PI).abs() < SMALL;

        let orbit_type = match (ecc < SMALL, equatorial) {
            (true, true) => OrbitType::CircularEquatorial,
            (true, false) => OrbitType::CircularInclined,
            (false, true) => OrbitType::EllipticalEquatorial,
            (false, false) => OrbitType::EllipticalInclined,
        };

        let raan = (magn > SMALL).then(|| {
            let node = (nbar[0] / magn).clamp(-1.0, 1.0).acos();
            if nbar[1] < 0.0 { TAU - node } else { node }
        });

        let argp = match orbit_type {
            OrbitType::EllipticalInclined => angle(&nbar, &ebar)
                .map(|w| if ebar[2] < 0.0 { TAU - w } else { w }),
            _ => None,
        };

        let nu = match orbit_type {
            OrbitType::EllipticalInclined | OrbitType::EllipticalEquatorial => angle(&ebar, r)
                .map(|nu| if rdotv < 0.0 { TAU - nu } else { nu }),
            _ => None,
        };

        let arglat = match orbit_type {
            OrbitType::CircularInclined => angle(&nbar, r)
                .map(|u| if r[2] < 0.0 { TAU - u } else { u }),
            _ => None,
        };

        let lonper = match orbit_type {
            OrbitType::EllipticalEquatorial if ecc > SMALL => {
                let mut lonper = (ebar[0] / ecc).clamp(-1.0, 1.0).acos();
                if ebar[1] < 0.0 {
                    lonper = TAU - lonper;
                }
                if incl > 0.5 * PI {
                    lonper = TAU - lonper;
                }
                Some(lonper)
            }
            _ => None,
        };

        let truelon = match orbit_type {
            OrbitType::CircularEquatorial if magr > SMALL => {
                let mut lon = (r[0] / magr).clamp(-1.0, 1.0).acos();
                if r[1] < 0.0 {
                    lon = TAU - lon;
                }
                if incl > 0.5 * PI {
                    lon = TAU - lon;
                }
                Some(lon)
            }
            _ => None,
        };

        let m = match orbit_type {
            OrbitType::CircularInclined => arglat,
            OrbitType::CircularEquatorial => truelon,
            _ => nu.and_then(|nu| true_to_mean_anomaly(ecc, nu)).map(|(_, m)| m),
        };

        Some(ClassicalElements {
            p,
            a,
            ecc,
            incl,
            raan,
            argp,
            nu,
            m,
            arglat,
            truelon,
            lonper,
            orbit_type,
        })
    }
}
