//! SGP4/SDP4 propagation kernel.
//!
//! Each call starts from the record's epoch elements, applies secular drag
//! and gravity rates (plus lunar-solar drift and resonance for deep-space
//! orbits), solves Kepler's equation, adds short-period J2 corrections and
//! returns a TEME position and velocity.
//!
//! Physical failures come back as [`Sgp4Error`] and are also left in
//! [`Satrec::error`], so batch callers can skip a record and carry on.
use crate::constants::*;
use crate::deep_space::SecularInputs;
use crate::elements::ClassicalElements;
use crate::math::{mag, solve_kepler};
use crate::satrec::{MeanElements, Method, Satrec, Sgp4Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// ── State vector ──

/// Cartesian state in the TEME frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateVector {
    /// Position (km): [x, y, z]
    pub r: [f64; 3],
    /// Velocity (km/s): [vx, vy, vz]
    pub v: [f64; 3],
    /// Minutes since the record's epoch
    pub tsince: f64,
}

impl StateVector {
    /// Position magnitude (km).
    pub fn r_mag(&self) -> f64 {
        mag(&self.r)
    }

    /// Velocity magnitude (km/s).
    pub fn v_mag(&self) -> f64 {
        mag(&self.v)
    }

    /// Osculating classical elements for gravitational parameter `mu` (km³/s²).
    pub fn osculating_elements(&self, mu: f64) -> Option<ClassicalElements> {
        ClassicalElements::from_state(&self.r, &self.v, mu)
    }
}

// ── Kernel ──

impl Satrec {
    /// Propagate to `tsince` minutes from epoch.
    ///
    /// Deep-space resonant records advance their integrator cache, which is
    /// why this takes `&mut self`.
    pub fn propagate(&mut self, tsince: f64) -> Result<StateVector, Sgp4Error> {
        let result = self.kernel(tsince);
        self.error = result.as_ref().err().copied();
        if let Err(e) = &result {
            warn!(satnum = %self.satnum, tsince, code = e.code(), "propagation failed: {}", e);
        }
        result
    }

    /// Propagate to an absolute Julian date given as `(jd, fraction)`.
    pub fn propagate_jd(&mut self, jd: f64, fr: f64) -> Result<StateVector, Sgp4Error> {
        let tsince = (jd - self.epoch_jd) * MINUTES_PER_DAY + (fr - self.epoch_jd_frac) * MINUTES_PER_DAY;
        self.propagate(tsince)
    }

    /// Propagate to each time in turn (minutes from epoch).
    pub fn propagate_many(&mut self, times: &[f64]) -> Vec<Result<StateVector, Sgp4Error>> {
        times.iter().map(|&t| self.propagate(t)).collect()
    }

    fn kernel(&mut self, t: f64) -> Result<StateVector, Sgp4Error> {
        if !t.is_finite() {
            return Err(Sgp4Error::NonFiniteTime(t));
        }

        let xke = self.gravity.xke;
        let j2 = self.gravity.j2;

        // Secular gravity and drag
        let xmdf = self.mo + self.mdot * t;
        let argpdf = self.argpo + self.argpdot * t;
        let nodedf = self.nodeo + self.nodedot * t;
        let t2 = t * t;

        let mut el = MeanElements {
            ecc: self.ecco,
            incl: self.inclo,
            node: nodedf + self.nodecf * t2,
            argp: argpdf,
            mean_anomaly: xmdf,
            mean_motion: self.no_unkozai,
        };
        let mut tempa = 1.0 - self.cc1 * t;
        let mut tempe = self.bstar * self.cc4 * t;
        let mut templ = self.t2cof * t2;

        if !self.simple_drag {
            let delomg = self.omgcof * t;
            let delm = self.xmcof * ((1.0 + self.eta * xmdf.cos()).powi(3) - self.delmo);
            let temp = delomg + delm;
            el.mean_anomaly = xmdf + temp;
            el.argp = argpdf - temp;
            let t3 = t2 * t;
            let t4 = t3 * t;
            tempa -= self.d2 * t2 + self.d3 * t3 + self.d4 * t4;
            tempe += self.bstar * self.cc5 * (el.mean_anomaly.sin() - self.sinmao);
            templ += self.t3cof * t3 + t4 * (self.t4cof + t * self.t5cof);
        }

        let inputs = SecularInputs::from(&*self);
        if let Method::DeepSpace(ds) = &mut self.method {
            ds.secular(t, inputs, &mut el);
        }

        if !(el.mean_motion > 0.0) {
            return Err(Sgp4Error::MeanMotion(el.mean_motion));
        }

        let am = (xke / el.mean_motion).powf(X2O3) * tempa * tempa;
        let nm = xke / am.powf(1.5);
        let mut em = el.ecc - tempe;

        if !(em < 1.0 && em >= -0.001) || am < 0.95 {
            return Err(Sgp4Error::MeanElements { ecc: em, a: am });
        }
        if em < 1.0e-6 {
            em = 1.0e-6;
        }

        let mm = el.mean_anomaly + self.no_unkozai * templ;
        let xlm = (mm + el.argp + el.node) % TAU;
        let nodem = el.node % TAU;
        let argpm = el.argp % TAU;

        let mut p = MeanElements {
            ecc: em,
            incl: el.incl,
            node: nodem,
            argp: argpm,
            mean_anomaly: (xlm - argpm - nodem) % TAU,
            mean_motion: nm,
        };

        // Long-period periodics; the J2/J3 geometry terms follow the perturbed inclination
        let (mut aycof, mut xlcof) = (self.aycof, self.xlcof);
        let (mut con41, mut x1mth2, mut x7thm1) = (self.con41, self.x1mth2, self.x7thm1);

        if let Method::DeepSpace(ds) = &self.method {
            ds.periodics(t, self.options.ops_mode, &mut p);
            if p.incl < 0.0 {
                p.incl = -p.incl;
                p.node += PI;
                p.argp -= PI;
            }
            if !(0.0..=1.0).contains(&p.ecc) {
                return Err(Sgp4Error::PerturbedEccentricity(p.ecc));
            }

            let (sinip, cosip) = p.incl.sin_cos();
            let j3oj2 = self.gravity.j3oj2;
            let one_plus_cos = if (cosip + 1.0).abs() > TEMP4 { 1.0 + cosip } else { TEMP4 };
            aycof = -0.5 * j3oj2 * sinip;
            xlcof = -0.25 * j3oj2 * sinip * (3.0 + 5.0 * cosip) / one_plus_cos;

            let cosisq = cosip * cosip;
            con41 = 3.0 * cosisq - 1.0;
            x1mth2 = 1.0 - cosisq;
            x7thm1 = 7.0 * cosisq - 1.0;
        }

        let (sinip, cosip) = p.incl.sin_cos();
        let ep = p.ecc;

        // Kepler's equation in equinoctial form
        let axnl = ep * p.argp.cos();
        let temp = 1.0 / (am * (1.0 - ep * ep));
        let aynl = ep * p.argp.sin() + temp * aycof;
        let xl = p.mean_anomaly + p.argp + p.node + temp * xlcof * axnl;

        let u = (xl - p.node) % TAU;
        let eo1 = solve_kepler(u, axnl, aynl);

        let (sineo1, coseo1) = eo1.sin_cos();
        let ecose = axnl * coseo1 + aynl * sineo1;
        let esine = axnl * sineo1 - aynl * coseo1;
        let el2 = axnl * axnl + aynl * aynl;
        let pl = am * (1.0 - el2);
        if pl < 0.0 {
            return Err(Sgp4Error::SemiLatusRectum(pl));
        }

        let rl = am * (1.0 - ecose);
        let rdotl = am.sqrt() * esine / rl;
        let rvdotl = pl.sqrt() / rl;
        let betal = (1.0 - el2).sqrt();
        let temp = esine / (1.0 + betal);
        let sinu = am / rl * (sineo1 - aynl - axnl * temp);
        let cosu = am / rl * (coseo1 - axnl + aynl * temp);
        let su = sinu.atan2(cosu);
        let sin2u = (cosu + cosu) * sinu;
        let cos2u = 1.0 - 2.0 * sinu * sinu;
        let temp = 1.0 / pl;
        let temp1 = 0.5 * j2 * temp;
        let temp2 = temp1 * temp;

        // Short-period corrections
        let mrt = rl * (1.0 - 1.5 * temp2 * betal * con41) + 0.5 * temp1 * x1mth2 * cos2u;
        let su = su - 0.25 * temp2 * x7thm1 * sin2u;
        let xnode = p.node + 1.5 * temp2 * cosip * sin2u;
        let xinc = p.incl + 1.5 * temp2 * cosip * sinip * cos2u;
        let mvt = rdotl - nm * temp1 * x1mth2 * sin2u / xke;
        let rvdot = rvdotl + nm * temp1 * (x1mth2 * cos2u + 1.5 * con41) / xke;

        if mrt < 1.0 {
            return Err(Sgp4Error::Decayed(mrt));
        }

        // Orientation vectors
        let (sinsu, cossu) = su.sin_cos();
        let (snod, cnod) = xnode.sin_cos();
        let (sini, cosi) = xinc.sin_cos();
        let xmx = -snod * cosi;
        let xmy = cnod * cosi;
        let u_hat = [xmx * sinsu + cnod * cossu, xmy * sinsu + snod * cossu, sini * sinsu];
        let v_hat = [xmx * cossu - cnod * sinsu, xmy * cossu - snod * sinsu, sini * cossu];

        let mr = mrt * self.gravity.radius_earth_km;
        let vkmpersec = self.gravity.km_per_sec();
        let mut r = [0.0; 3];
        let mut v = [0.0; 3];
        for k in 0..3 {
            r[k] = mr * u_hat[k];
            v[k] = (mvt * u_hat[k] + rvdot * v_hat[k]) * vkmpersec;
        }

        Ok(StateVector { r, v, tsince: t })
    }
}

// ── Batch ──

/// Propagate every record to the same `tsince` in parallel.
///
/// Records are independent, so each worker holds its own `&mut Satrec`.
/// Results come back in input order.
pub fn propagate_catalog(
    satellites: &mut [Satrec],
    tsince: f64,
) -> Vec<Result<StateVector, Sgp4Error>> {
    use rayon::prelude::*;

    let results: Vec<_> = satellites
        .par_iter_mut()
        .map(|sat| sat.propagate(tsince))
        .collect();

    let failed = results.iter().filter(|r| r.is_err()).count();
    debug!(records = results.len(), failed, tsince, "propagated catalog");
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::satrec::Sgp4Options;
    use crate::tle::Tle;
    use approx::assert_relative_eq;

    const ISS_LINE1: &str = "1 25544U 98067A   23054.45075046  .00020310  00000-0  36478-3 0  9992";
    const ISS_LINE2: &str = "2 25544  51.6417 203.5231 0005102 218.5493 303.0730 15.49367633384651";

    fn iss() -> Satrec {
        let tle = Tle::parse(ISS_LINE1, ISS_LINE2).unwrap();
        Satrec::from_tle(&tle, Sgp4Options::default())
    }

    #[test]
    fn test_iss_epoch_state() {
        let mut sat = iss();
        let sv = sat.propagate(0.0).unwrap();
        assert!(sv.r_mag() > 6500.0 && sv.r_mag() < 6900.0, "|r| = {}", sv.r_mag());
        assert!(sv.v_mag() > 7.4 && sv.v_mag() < 7.7, "|v| = {}", sv.v_mag());
        assert_eq!(sat.error_code(), 0);
    }

    #[test]
    fn test_deterministic() {
        let mut sat = iss();
        let a = sat.propagate(1234.5).unwrap();
        let b = sat.propagate(1234.5).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_osculating_elements() {
        let mut sat = iss();
        let sv = sat.propagate(30.0).unwrap();
        let coe = sv.osculating_elements(sat.gravity.mu).unwrap();
        assert_relative_eq!(coe.incl, 51.64 * DEG2RAD, epsilon = 0.01);
        assert!(coe.ecc < 0.01);
    }

    #[test]
    fn test_propagate_jd_matches_minutes() {
        let mut sat = iss();
        let (jd, fr) = (sat.epoch_jd, sat.epoch_jd_frac);
        let by_jd = sat.propagate_jd(jd + 1.0, fr).unwrap();
        let by_min = sat.propagate(MINUTES_PER_DAY).unwrap();
        for k in 0..3 {
            assert_relative_eq!(by_jd.r[k], by_min.r[k], epsilon = 1e-6);
            assert_relative_eq!(by_jd.v[k], by_min.v[k], epsilon = 1e-9);
        }
    }

    #[test]
    fn test_propagate_many() {
        let mut sat = iss();
        let results = sat.propagate_many(&[0.0, 45.0, 90.0]);
        assert_eq!(results.len(), 3);
        for (res, t) in results.iter().zip([0.0, 45.0, 90.0]) {
            assert_eq!(res.as_ref().unwrap().tsince, t);
        }
    }

    #[test]
    fn test_decay_sets_error() {
        let tle = Tle::parse(ISS_LINE1, ISS_LINE2).unwrap();
        let mut el = tle.to_element_set();
        // Mean radius of ~0.98 Earth radii
        el.no_kozai = 0.0766;
        el.ecco = 0.0001;

        let mut sat = Satrec::from_elements(&el, Sgp4Options::default());
        assert_eq!(sat.error_code(), 6);
        let err = sat.propagate(0.0).unwrap_err();
        assert_eq!(err.code(), 6);
        assert!(matches!(err, Sgp4Error::Decayed(r) if r < 1.0));
    }

    #[test]
    fn test_sub_surface_mean_elements_rejected() {
        let tle = Tle::parse(ISS_LINE1, ISS_LINE2).unwrap();
        let mut el = tle.to_element_set();
        // Semi-major axis of ~0.9 Earth radii
        el.no_kozai = 0.0871;

        let mut sat = Satrec::from_elements(&el, Sgp4Options::default());
        assert_eq!(sat.error_code(), 1);
        assert!(matches!(sat.propagate(0.0), Err(Sgp4Error::MeanElements { a, .. }) if a < 0.95));
    }

    #[test]
    fn test_error_cleared_on_success() {
        let mut sat = iss();
        sat.error = Some(Sgp4Error::MeanMotion(-1.0));
        sat.propagate(5.0).unwrap();
        assert!(sat.error.is_none());
    }

    #[test]
    fn test_catalog_matches_serial() {
        let mut catalog: Vec<Satrec> = (0..8).map(|_| iss()).collect();
        let mut serial = iss();
        let expected = serial.propagate(720.0).unwrap();

        let results = propagate_catalog(&mut catalog, 720.0);
        assert_eq!(results.len(), 8);
        for res in results {
            assert_eq!(res.unwrap(), expected);
        }
    }

    #[test]
    fn test_state_vector_serde() {
        let mut sat = iss();
        let sv = sat.propagate(10.0).unwrap();
        let json = serde_json::to_string(&sv).unwrap();
        let back: StateVector = serde_json::from_str(&json).unwrap();
        for k in 0..3 {
            assert_relative_eq!(back.r[k], sv.r[k], max_relative = 1e-15);
            assert_relative_eq!(back.v[k], sv.v[k], max_relative = 1e-15);
        }
        assert_eq!(back.tsince, 10.0);
    }
}
