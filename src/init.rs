//! Record initialization.
//!
//! Recovers the Brouwer mean motion from the Kozai value carried by element
//! sets, computes sidereal time at epoch, then derives the near-Earth drag and
//! secular coefficients. Orbits with a period of 225 minutes or more also get
//! their deep-space terms. Every record is propagated once to epoch before it
//! is returned, so element sets that cannot be propagated at all come back
//! with [`Satrec::error`] already set.

use tracing::debug;

use crate::constants::*;
use crate::deep_space::{common_terms, DeepSpace};
use crate::gravity::GravityConstants;
use crate::satrec::{ElementSet, Method, OpsMode, Satrec, Sgp4Options};
use crate::time::{greenwich_sidereal_time, legacy_sidereal_time};
use crate::tle::Tle;

/// Atmosphere reference altitude for the drag density function (km).
const S_ALTITUDE_KM: f64 = 78.0;
/// Upper bound of the density function fit (km).
const Q0_ALTITUDE_KM: f64 = 120.0;
/// Perigees below this use the simplified drag polynomial (km).
const SIMPLE_DRAG_PERIGEE_KM: f64 = 220.0;

/// Epoch quantities shared by the secular and drag setup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochGeometry {
    /// Brouwer (un-Kozai'd) mean motion (rad/min).
    pub no_unkozai: f64,
    /// Semi-major axis from the Brouwer mean motion (Earth radii).
    pub ao: f64,
    pub con41: f64,
    pub con42: f64,
    pub cosio: f64,
    pub cosio2: f64,
    pub sinio: f64,
    pub eccsq: f64,
    /// 1 - e²
    pub omeosq: f64,
    pub rteosq: f64,
    /// Semi-latus rectum squared.
    pub posq: f64,
    /// Perigee radius (Earth radii).
    pub rp: f64,
    /// Sidereal time at epoch (rad).
    pub gsto: f64,
}

/// Brouwer mean motion and epoch geometry from Kozai mean motion `no_kozai`.
///
/// `epoch` is days since 1949-12-31 00:00 UT.
pub fn epoch_geometry(
    gravity: &GravityConstants,
    ecco: f64,
    epoch: f64,
    inclo: f64,
    no_kozai: f64,
    ops_mode: OpsMode,
) -> EpochGeometry {
    let eccsq = ecco * ecco;
    let omeosq = 1.0 - eccsq;
    let rteosq = omeosq.sqrt();
    let (sinio, cosio) = inclo.sin_cos();
    let cosio2 = cosio * cosio;

    // Undo the Kozai convention
    let ak = (gravity.xke / no_kozai).powf(X2O3);
    let d1 = 0.75 * gravity.j2 * (3.0 * cosio2 - 1.0) / (rteosq * omeosq);
    let del = d1 / (ak * ak);
    let adel = ak * (1.0 - del * del - del * (1.0 / 3.0 + 134.0 * del * del / 81.0));
    let del = d1 / (adel * adel);
    let no_unkozai = no_kozai / (1.0 + del);

    let ao = (gravity.xke / no_unkozai).powf(X2O3);
    let po = ao * omeosq;
    let con42 = 1.0 - 5.0 * cosio2;

    let gsto = match ops_mode {
        OpsMode::Afspc => legacy_sidereal_time(epoch),
        OpsMode::Improved => greenwich_sidereal_time(epoch + JD_1950),
    };

    EpochGeometry {
        no_unkozai,
        ao,
        con41: -con42 - cosio2 - cosio2,
        con42,
        cosio,
        cosio2,
        sinio,
        eccsq,
        omeosq,
        rteosq,
        posq: po * po,
        rp: ao * (1.0 - ecco),
        gsto,
    }
}

impl Satrec {
    /// Initialize from a parsed element set.
    pub fn from_tle(tle: &Tle, options: Sgp4Options) -> Self {
        let mut sat = Self::from_elements(&tle.to_element_set(), options);
        sat.satnum = tle.satnum.clone();
        sat
    }

    /// Initialize from elements already in working units.
    ///
    /// Never fails outright: if the epoch state itself cannot be computed the
    /// record is still returned, with [`Satrec::error`] describing why.
    pub fn from_elements(el: &ElementSet, options: Sgp4Options) -> Self {
        let gravity = options.gravity.constants();
        let re = gravity.radius_earth_km;
        let epoch = el.epoch();
        let ecco = el.ecco;

        let g = epoch_geometry(&gravity, ecco, epoch, el.inclo, el.no_kozai, options.ops_mode);
        let no = g.no_unkozai;

        let a = (no * gravity.tumin).powf(-X2O3);
        let deep_space = TAU / no >= DEEP_SPACE_PERIOD_MIN;
        let simple_drag = deep_space || g.rp < SIMPLE_DRAG_PERIGEE_KM / re + 1.0;

        // Density function altitude terms, lowered for very low perigees
        let perigee_km = (g.rp - 1.0) * re;
        let (sfour, qzms24) = if perigee_km < 156.0 {
            let s = if perigee_km < 98.0 { 20.0 } else { perigee_km - S_ALTITUDE_KM };
            (s / re + 1.0, ((Q0_ALTITUDE_KM - s) / re).powi(4))
        } else {
            (S_ALTITUDE_KM / re + 1.0, ((Q0_ALTITUDE_KM - S_ALTITUDE_KM) / re).powi(4))
        };

        let ao = g.ao;
        let pinvsq = 1.0 / g.posq;
        let tsi = 1.0 / (ao - sfour);
        let eta = ao * ecco * tsi;
        let etasq = eta * eta;
        let eeta = ecco * eta;
        let psisq = (1.0 - etasq).abs();
        let coef = qzms24 * tsi.powi(4);
        let coef1 = coef / psisq.powf(3.5);

        let cc2 = coef1
            * no
            * (ao * (1.0 + 1.5 * etasq + eeta * (4.0 + etasq))
                + 0.375 * gravity.j2 * tsi / psisq * g.con41 * (8.0 + 3.0 * etasq * (8.0 + etasq)));
        let cc1 = el.bstar * cc2;
        let cc3 = if ecco > 1.0e-4 {
            -2.0 * coef * tsi * gravity.j3oj2 * no * g.sinio / ecco
        } else {
            0.0
        };
        let x1mth2 = 1.0 - g.cosio2;
        let cc4 = 2.0
            * no
            * coef1
            * ao
            * g.omeosq
            * (eta * (2.0 + 0.5 * etasq) + ecco * (0.5 + 2.0 * etasq)
                - gravity.j2 * tsi / (ao * psisq)
                    * (-3.0 * g.con41 * (1.0 - 2.0 * eeta + etasq * (1.5 - 0.5 * eeta))
                        + 0.75 * x1mth2 * (2.0 * etasq - eeta * (1.0 + etasq)) * (2.0 * el.argpo).cos()));
        let cc5 = 2.0 * coef1 * ao * g.omeosq * (1.0 + 2.75 * (etasq + eeta) + eeta * etasq);

        // Secular rates from J2 and J4
        let cosio2 = g.cosio2;
        let cosio4 = cosio2 * cosio2;
        let temp1 = 1.5 * gravity.j2 * pinvsq * no;
        let temp2 = 0.5 * temp1 * gravity.j2 * pinvsq;
        let temp3 = -0.46875 * gravity.j4 * pinvsq * pinvsq * no;
        let mdot = no
            + 0.5 * temp1 * g.rteosq * g.con41
            + 0.0625 * temp2 * g.rteosq * (13.0 - 78.0 * cosio2 + 137.0 * cosio4);
        let argpdot = -0.5 * temp1 * g.con42
            + 0.0625 * temp2 * (7.0 - 114.0 * cosio2 + 395.0 * cosio4)
            + temp3 * (3.0 - 36.0 * cosio2 + 49.0 * cosio4);
        let xhdot1 = -temp1 * g.cosio;
        let nodedot =
            xhdot1 + (0.5 * temp2 * (4.0 - 19.0 * cosio2) + 2.0 * temp3 * (3.0 - 7.0 * cosio2)) * g.cosio;

        let xmcof = if ecco > 1.0e-4 {
            -X2O3 * coef * el.bstar / eeta
        } else {
            0.0
        };
        let one_plus_cos = if (g.cosio + 1.0).abs() > TEMP4 { 1.0 + g.cosio } else { TEMP4 };
        let xlcof = -0.25 * gravity.j3oj2 * g.sinio * (3.0 + 5.0 * g.cosio) / one_plus_cos;
        let delmo = (1.0 + eta * el.mo.cos()).powi(3);

        // Higher-order drag polynomial, full model only
        let (mut d2, mut d3, mut d4) = (0.0, 0.0, 0.0);
        let (mut t3cof, mut t4cof, mut t5cof) = (0.0, 0.0, 0.0);
        if !simple_drag {
            let cc1sq = cc1 * cc1;
            d2 = 4.0 * ao * tsi * cc1sq;
            let temp = d2 * tsi * cc1 / 3.0;
            d3 = (17.0 * ao + sfour) * temp;
            d4 = 0.5 * temp * ao * tsi * (221.0 * ao + 31.0 * sfour) * cc1;
            t3cof = d2 + 2.0 * cc1sq;
            t4cof = 0.25 * (3.0 * d3 + cc1 * (12.0 * d2 + 10.0 * cc1sq));
            t5cof = 0.2 * (3.0 * d4 + 12.0 * cc1 * d3 + 6.0 * d2 * d2 + 15.0 * cc1sq * (2.0 * d2 + cc1sq));
        }

        let mut sat = Satrec {
            satnum: el.satnum.clone(),
            options,
            gravity,
            epoch_jd: el.epoch_jd,
            epoch_jd_frac: el.epoch_jd_frac,
            epoch,
            bstar: el.bstar,
            ndot: el.ndot,
            nddot: el.nddot,
            ecco,
            argpo: el.argpo,
            inclo: el.inclo,
            mo: el.mo,
            no_kozai: el.no_kozai,
            nodeo: el.nodeo,
            no_unkozai: no,
            a,
            alta: a * (1.0 + ecco) - 1.0,
            altp: a * (1.0 - ecco) - 1.0,
            gsto: g.gsto,
            simple_drag,
            method: Method::NearEarth,
            aycof: -0.5 * gravity.j3oj2 * g.sinio,
            con41: g.con41,
            cc1,
            cc4,
            cc5,
            d2,
            d3,
            d4,
            delmo,
            eta,
            argpdot,
            omgcof: el.bstar * cc3 * el.argpo.cos(),
            sinmao: el.mo.sin(),
            t2cof: 1.5 * cc1,
            t3cof,
            t4cof,
            t5cof,
            x1mth2,
            x7thm1: 7.0 * cosio2 - 1.0,
            mdot,
            nodedot,
            xlcof,
            xmcof,
            nodecf: 3.5 * g.omeosq * xhdot1 * cc1,
            error: None,
        };

        if deep_space {
            let common = common_terms(epoch, ecco, sat.argpo, 0.0, sat.inclo, sat.nodeo, no);
            sat.method = Method::DeepSpace(Box::new(DeepSpace::new(&common, &sat)));
        }

        debug!(
            satnum = %sat.satnum,
            deep_space,
            simple_drag,
            resonance = ?sat.resonance(),
            period_min = sat.period_minutes(),
            "initialized satellite record"
        );

        // Validate the element set end to end; the outcome lands in `sat.error`
        if let Err(e) = sat.propagate(0.0) {
            debug!(satnum = %sat.satnum, code = e.code(), "element set fails at epoch");
        }
        sat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gravity::GravityModel;
    use crate::satrec::Resonance;
    use approx::assert_relative_eq;

    const ISS_LINE1: &str = "1 25544U 98067A   23054.45075046  .00020310  00000-0  36478-3 0  9992";
    const ISS_LINE2: &str = "2 25544  51.6417 203.5231 0005102 218.5493 303.0730 15.49367633384651";

    fn iss() -> Satrec {
        let tle = Tle::parse(ISS_LINE1, ISS_LINE2).unwrap();
        Satrec::from_tle(&tle, Sgp4Options::default())
    }

    #[test]
    fn test_brouwer_mean_motion_correction() {
        let gravity = GravityModel::Wgs72.constants();
        let no_kozai = 15.493_676_33 / XPDOTP;
        let g = epoch_geometry(&gravity, 0.000_510_2, 26_716.45, 51.6417 * DEG2RAD, no_kozai, OpsMode::Improved);

        // Prograde LEO: J2 correction slightly lowers mean motion
        assert!(g.no_unkozai < no_kozai);
        assert_relative_eq!(g.no_unkozai, no_kozai, max_relative = 1e-3);
        assert_relative_eq!(g.ao * g.ao * g.ao * g.no_unkozai * g.no_unkozai, gravity.xke * gravity.xke, max_relative = 1e-12);
        assert_relative_eq!(g.con41, 3.0 * g.cosio2 - 1.0, epsilon = 1e-15);
        assert!((0.0..TAU).contains(&g.gsto));
    }

    #[test]
    fn test_ops_mode_selects_sidereal_formula() {
        let gravity = GravityModel::Wgs72.constants();
        let epoch = 18_000.25;
        let a = epoch_geometry(&gravity, 0.1, epoch, 0.5, 0.05, OpsMode::Afspc);
        let i = epoch_geometry(&gravity, 0.1, epoch, 0.5, 0.05, OpsMode::Improved);
        assert_eq!(a.gsto, legacy_sidereal_time(epoch));
        assert_eq!(i.gsto, greenwich_sidereal_time(epoch + JD_1950));
        assert_eq!(a.no_unkozai, i.no_unkozai);
    }

    #[test]
    fn test_iss_is_near_earth() {
        let sat = iss();
        assert!(!sat.is_deep_space());
        assert_eq!(sat.resonance(), Resonance::None);
        assert!(!sat.simple_drag);
        assert!(sat.error.is_none());
        assert!(sat.period_minutes() > 92.0 && sat.period_minutes() < 94.0);
        assert!(sat.perigee_km() > 380.0 && sat.perigee_km() < 430.0);
        assert!(sat.apogee_km() > sat.perigee_km());
        assert_relative_eq!(sat.epoch_julian_date(), 2_459_998.950_750_46, epsilon = 1e-8);
    }

    #[test]
    fn test_drag_coefficients_scale_with_bstar() {
        let tle = Tle::parse(ISS_LINE1, ISS_LINE2).unwrap();
        let mut el = tle.to_element_set();
        let base = Satrec::from_elements(&el, Sgp4Options::default());
        el.bstar *= 2.0;
        let doubled = Satrec::from_elements(&el, Sgp4Options::default());

        assert_relative_eq!(doubled.cc1, 2.0 * base.cc1, max_relative = 1e-14);
        assert_relative_eq!(doubled.t2cof, 2.0 * base.t2cof, max_relative = 1e-14);
        assert_eq!(doubled.mdot, base.mdot);
        assert_eq!(doubled.nodedot, base.nodedot);
    }

    #[test]
    fn test_secular_rates_sign() {
        let sat = iss();
        // Prograde orbit: node regresses, perigee advances below critical inclination
        assert!(sat.nodedot < 0.0);
        assert!(sat.argpdot > 0.0);
        assert!(sat.mdot > 0.0);
    }

    #[test]
    fn test_low_perigee_uses_simple_drag() {
        let tle = Tle::parse(ISS_LINE1, ISS_LINE2).unwrap();
        let mut el = tle.to_element_set();
        // ~16.3 rev/day puts perigee near 190 km
        el.no_kozai = 16.3 / XPDOTP;
        let sat = Satrec::from_elements(&el, Sgp4Options::default());
        assert!(sat.perigee_km() < 220.0);
        assert!(sat.simple_drag);
        assert_eq!(sat.d2, 0.0);
        assert_eq!(sat.t5cof, 0.0);
    }

    #[test]
    fn test_near_180_inclination_guard() {
        let tle = Tle::parse(ISS_LINE1, ISS_LINE2).unwrap();
        let mut el = tle.to_element_set();
        el.inclo = PI;
        let sat = Satrec::from_elements(&el, Sgp4Options::default());
        assert!(sat.xlcof.is_finite());
    }
}
