//! Deep-space (SDP4) lunar-solar perturbations and resonance integration.
//!
//! Engaged for orbits with a period of 225 minutes or more. Four pieces:
//! - [`common_terms`]: solar and lunar geometry at epoch, evaluated by one
//!   shared formula per body.
//! - [`DeepSpace::new`]: periodic amplitudes, secular rates and resonance
//!   coefficients derived from the common terms.
//! - [`DeepSpace::secular`]: secular lunar-solar drift plus the fixed-step
//!   resonance integrator.
//! - [`DeepSpace::periodics`]: long-period lunar-solar periodics, including the
//!   Lyddane formulation for inclinations below 0.2 rad.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::satrec::{MeanElements, OpsMode, Resonance, ResonanceState, Satrec};

// ── Lunar-solar constants ──

/// Solar mean motion (rad/min).
const ZNS: f64 = 1.19459e-5;
/// Solar eccentricity.
const ZES: f64 = 0.01675;
/// Lunar mean motion (rad/min).
const ZNL: f64 = 1.583_521_8e-4;
/// Lunar eccentricity.
const ZEL: f64 = 0.05490;
const C1SS: f64 = 2.986_479_7e-6;
const C1L: f64 = 4.796_806_5e-7;
const ZSINIS: f64 = 0.397_854_16;
const ZCOSIS: f64 = 0.917_448_67;
const ZCOSGS: f64 = 0.194_590_5;
const ZSINGS: f64 = -0.980_884_58;

/// Below 3° (or above 177°) the node-rate terms are dropped.
const SMALL_INCLINATION: f64 = 5.235_987_7e-2;

/// Inclination below which the Lyddane periodics are used (rad).
const LYDDANE_INCLINATION: f64 = 0.2;

// ── Resonance constants ──

const Q22: f64 = 1.789_167_9e-6;
const Q31: f64 = 2.146_074_8e-6;
const Q33: f64 = 2.212_301_5e-7;
const ROOT22: f64 = 1.789_167_9e-6;
const ROOT32: f64 = 3.739_379_2e-7;
const ROOT44: f64 = 7.363_695_3e-9;
const ROOT52: f64 = 1.142_863_9e-7;
const ROOT54: f64 = 2.176_580_3e-9;

const FASX2: f64 = 0.131_309_08;
const FASX4: f64 = 2.884_319_8;
const FASX6: f64 = 0.374_480_87;
const G22: f64 = 5.768_639_6;
const G32: f64 = 0.952_408_98;
const G44: f64 = 1.801_499_8;
const G52: f64 = 1.050_833_0;
const G54: f64 = 4.410_889_8;

/// Integrator step (minutes).
const STEP: f64 = 720.0;
/// Half the squared step, used by the second-order update.
const STEP2: f64 = 259_200.0;

// ── Common terms ──

/// Intermediate terms for one perturbing body (sun or moon).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BodyTerms {
    pub s1: f64,
    pub s2: f64,
    pub s3: f64,
    pub s4: f64,
    pub s5: f64,
    pub s6: f64,
    pub s7: f64,
    pub z1: f64,
    pub z2: f64,
    pub z3: f64,
    pub z11: f64,
    pub z12: f64,
    pub z13: f64,
    pub z21: f64,
    pub z22: f64,
    pub z23: f64,
    pub z31: f64,
    pub z32: f64,
    pub z33: f64,
}

/// Epoch geometry shared by the periodic, secular and resonance terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommonTerms {
    pub sinim: f64,
    pub cosim: f64,
    pub emsq: f64,
    pub solar: BodyTerms,
    pub lunar: BodyTerms,
    /// Lunar mean anomaly at epoch (rad).
    pub zmol: f64,
    /// Solar mean anomaly at epoch (rad).
    pub zmos: f64,
}

/// Orientation of a perturbing body's orbit relative to the equator.
struct BodyOrientation {
    cos_g: f64,
    sin_g: f64,
    cos_i: f64,
    sin_i: f64,
    cos_h: f64,
    sin_h: f64,
}

/// Satellite quantities the body terms depend on.
struct SatelliteAngles {
    sinim: f64,
    cosim: f64,
    sinomm: f64,
    cosomm: f64,
    em: f64,
    emsq: f64,
    rtemsq: f64,
    xnoi: f64,
}

fn body_terms(body: &BodyOrientation, cc: f64, sat: &SatelliteAngles) -> BodyTerms {
    let (cosim, sinim) = (sat.cosim, sat.sinim);
    let (cosomm, sinomm) = (sat.cosomm, sat.sinomm);
    let emsq = sat.emsq;
    let betasq = 1.0 - emsq;

    let a1 = body.cos_g * body.cos_h + body.sin_g * body.cos_i * body.sin_h;
    let a3 = -body.sin_g * body.cos_h + body.cos_g * body.cos_i * body.sin_h;
    let a7 = -body.cos_g * body.sin_h + body.sin_g * body.cos_i * body.cos_h;
    let a8 = body.sin_g * body.sin_i;
    let a9 = body.sin_g * body.sin_h + body.cos_g * body.cos_i * body.cos_h;
    let a10 = body.cos_g * body.sin_i;
    let a2 = cosim * a7 + sinim * a8;
    let a4 = cosim * a9 + sinim * a10;
    let a5 = -sinim * a7 + cosim * a8;
    let a6 = -sinim * a9 + cosim * a10;

    let x1 = a1 * cosomm + a2 * sinomm;
    let x2 = a3 * cosomm + a4 * sinomm;
    let x3 = -a1 * sinomm + a2 * cosomm;
    let x4 = -a3 * sinomm + a4 * cosomm;
    let x5 = a5 * sinomm;
    let x6 = a6 * sinomm;
    let x7 = a5 * cosomm;
    let x8 = a6 * cosomm;

    let z31 = 12.0 * x1 * x1 - 3.0 * x3 * x3;
    let z32 = 24.0 * x1 * x2 - 6.0 * x3 * x4;
    let z33 = 12.0 * x2 * x2 - 3.0 * x4 * x4;
    let z1 = 3.0 * (a1 * a1 + a2 * a2) + z31 * emsq;
    let z2 = 6.0 * (a1 * a3 + a2 * a4) + z32 * emsq;
    let z3 = 3.0 * (a3 * a3 + a4 * a4) + z33 * emsq;
    let z11 = -6.0 * a1 * a5 + emsq * (-24.0 * x1 * x7 - 6.0 * x3 * x5);
    let z12 = -6.0 * (a1 * a6 + a3 * a5)
        + emsq * (-24.0 * (x2 * x7 + x1 * x8) - 6.0 * (x3 * x6 + x4 * x5));
    let z13 = -6.0 * a3 * a6 + emsq * (-24.0 * x2 * x8 - 6.0 * x4 * x6);
    let z21 = 6.0 * a2 * a5 + emsq * (24.0 * x1 * x5 - 6.0 * x3 * x7);
    let z22 = 6.0 * (a4 * a5 + a2 * a6)
        + emsq * (24.0 * (x2 * x5 + x1 * x6) - 6.0 * (x4 * x7 + x3 * x8));
    let z23 = 6.0 * a4 * a6 + emsq * (24.0 * x2 * x6 - 6.0 * x4 * x8);

    let s3 = cc * sat.xnoi;
    let s2 = -0.5 * s3 / sat.rtemsq;
    let s4 = s3 * sat.rtemsq;

    BodyTerms {
        s1: -15.0 * sat.em * s4,
        s2,
        s3,
        s4,
        s5: x1 * x3 + x2 * x4,
        s6: x2 * x3 + x1 * x4,
        s7: x2 * x4 - x1 * x3,
        z1: z1 + z1 + betasq * z31,
        z2: z2 + z2 + betasq * z32,
        z3: z3 + z3 + betasq * z33,
        z11,
        z12,
        z13,
        z21,
        z22,
        z23,
        z31,
        z32,
        z33,
    }
}

/// Solar and lunar geometry for a satellite at `tc` minutes past `epoch`
/// (days since 1950).
pub fn common_terms(
    epoch: f64,
    ecc: f64,
    argp: f64,
    tc: f64,
    incl: f64,
    node: f64,
    mean_motion: f64,
) -> CommonTerms {
    let (snodm, cnodm) = node.sin_cos();
    let (sinomm, cosomm) = argp.sin_cos();
    let (sinim, cosim) = incl.sin_cos();
    let emsq = ecc * ecc;

    let sat = SatelliteAngles {
        sinim,
        cosim,
        sinomm,
        cosomm,
        em: ecc,
        emsq,
        rtemsq: (1.0 - emsq).sqrt(),
        xnoi: 1.0 / mean_motion,
    };

    // Lunar node and orbit orientation at this date
    let day = epoch + 18_261.5 + tc / MINUTES_PER_DAY;
    let xnodce = (4.523_602_0 - 9.242_202_9e-4 * day) % TAU;
    let (stem, ctem) = xnodce.sin_cos();
    let zcosil = 0.913_751_64 - 0.035_680_96 * ctem;
    let zsinil = (1.0 - zcosil * zcosil).sqrt();
    let zsinhl = 0.089_683_511 * stem / zsinil;
    let zcoshl = (1.0 - zsinhl * zsinhl).sqrt();
    let gam = 5.835_151_4 + 0.001_944_368_0 * day;
    let zx = 0.397_854_16 * stem / zsinil;
    let zy = zcoshl * ctem + 0.917_448_67 * zsinhl * stem;
    let zx = gam + zx.atan2(zy) - xnodce;

    let sun = BodyOrientation {
        cos_g: ZCOSGS,
        sin_g: ZSINGS,
        cos_i: ZCOSIS,
        sin_i: ZSINIS,
        cos_h: cnodm,
        sin_h: snodm,
    };
    let moon = BodyOrientation {
        cos_g: zx.cos(),
        sin_g: zx.sin(),
        cos_i: zcosil,
        sin_i: zsinil,
        cos_h: zcoshl * cnodm + zsinhl * snodm,
        sin_h: snodm * zcoshl - cnodm * zsinhl,
    };

    CommonTerms {
        sinim,
        cosim,
        emsq,
        solar: body_terms(&sun, C1SS, &sat),
        lunar: body_terms(&moon, C1L, &sat),
        zmol: (4.719_967_2 + 0.229_971_50 * day - gam) % TAU,
        zmos: (6.256_583_7 + 0.017_201_977 * day) % TAU,
    }
}

// ── Periodic amplitudes ──

/// Long-period amplitudes contributed by one body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodicCoefficients {
    pub e2: f64,
    pub e3: f64,
    pub i2: f64,
    pub i3: f64,
    pub l2: f64,
    pub l3: f64,
    pub l4: f64,
    pub gh2: f64,
    pub gh3: f64,
    pub gh4: f64,
    pub h2: f64,
    pub h3: f64,
}

impl PeriodicCoefficients {
    fn new(b: &BodyTerms, emsq: f64, body_ecc: f64) -> Self {
        PeriodicCoefficients {
            e2: 2.0 * b.s1 * b.s6,
            e3: 2.0 * b.s1 * b.s7,
            i2: 2.0 * b.s2 * b.z12,
            i3: 2.0 * b.s2 * (b.z13 - b.z11),
            l2: -2.0 * b.s3 * b.z2,
            l3: -2.0 * b.s3 * (b.z3 - b.z1),
            l4: -2.0 * b.s3 * (-21.0 - 9.0 * emsq) * body_ecc,
            gh2: 2.0 * b.s4 * b.z32,
            gh3: 2.0 * b.s4 * (b.z33 - b.z31),
            gh4: -18.0 * b.s4 * body_ecc,
            h2: -2.0 * b.s2 * b.z22,
            h3: -2.0 * b.s2 * (b.z23 - b.z21),
        }
    }

    /// Periodic offsets `[e, i, l, gh, h]` at body mean anomaly `zm`.
    fn evaluate(&self, zm: f64, body_ecc: f64) -> [f64; 5] {
        let zf = zm + 2.0 * body_ecc * zm.sin();
        let sinzf = zf.sin();
        let f2 = 0.5 * sinzf * sinzf - 0.25;
        let f3 = -0.5 * sinzf * zf.cos();
        [
            self.e2 * f2 + self.e3 * f3,
            self.i2 * f2 + self.i3 * f3,
            self.l2 * f2 + self.l3 * f3 + self.l4 * sinzf,
            self.gh2 * f2 + self.gh3 * f3 + self.gh4 * sinzf,
            self.h2 * f2 + self.h3 * f3,
        ]
    }
}

/// Secular rates `[e, i, m, gh, h]` contributed by one body.
fn body_secular_rates(b: &BodyTerms, zn: f64, emsq: f64) -> [f64; 5] {
    [
        b.s1 * zn * b.s5,
        b.s2 * zn * (b.z11 + b.z13),
        -zn * b.s3 * (b.z1 + b.z3 - 14.0 - 6.0 * emsq),
        b.s4 * zn * (b.z31 + b.z33 - 6.0),
        -zn * b.s2 * (b.z21 + b.z23),
    ]
}

// ── Deep-space state ──

/// Resonance amplitude coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ResonanceTerms {
    None,
    Synchronous {
        del1: f64,
        del2: f64,
        del3: f64,
    },
    HalfDay {
        d2201: f64,
        d2211: f64,
        d3210: f64,
        d3222: f64,
        d4410: f64,
        d4422: f64,
        d5220: f64,
        d5232: f64,
        d5421: f64,
        d5433: f64,
    },
}

/// Deep-space terms owned by a [`Satrec`].
#[derive(Debug, Clone, PartialEq)]
pub struct DeepSpace {
    pub solar: PeriodicCoefficients,
    pub lunar: PeriodicCoefficients,
    pub zmol: f64,
    pub zmos: f64,

    // Lunar-solar secular rates (per minute)
    pub dedt: f64,
    pub didt: f64,
    pub dmdt: f64,
    pub dnodt: f64,
    pub domdt: f64,

    pub resonance: Resonance,
    terms: ResonanceTerms,
    pub xfact: f64,
    /// Resonant mean longitude at epoch.
    pub xlamo: f64,
    /// Integrator cache, advanced by [`DeepSpace::secular`].
    pub state: ResonanceState,
}

impl DeepSpace {
    /// Derive amplitudes, secular rates and resonance terms for `sat`, whose
    /// near-Earth fields must already be initialized.
    pub fn new(common: &CommonTerms, sat: &Satrec) -> Self {
        let emsq = common.emsq;
        let (sinim, cosim) = (common.sinim, common.cosim);
        let low_inclination = sat.inclo < SMALL_INCLINATION || sat.inclo > PI - SMALL_INCLINATION;

        let [ses, sis, sls, sghs, mut shs] = body_secular_rates(&common.solar, ZNS, emsq);
        let [sel, sil, sll, sghl, mut shll] = body_secular_rates(&common.lunar, ZNL, emsq);

        if low_inclination {
            shs = 0.0;
            shll = 0.0;
        }
        if sinim != 0.0 {
            shs /= sinim;
        }
        let sgs = sghs - cosim * shs;

        let dedt = ses + sel;
        let didt = sis + sil;
        let dmdt = sls + sll;
        let mut domdt = sgs + sghl;
        let mut dnodt = shs;
        if sinim != 0.0 {
            domdt -= cosim / sinim * shll;
            dnodt += shll / sinim;
        }

        let nm = sat.no_unkozai;
        let resonance = Resonance::classify(nm, sat.ecco);
        let theta = sat.gsto % TAU;
        let aonv = (nm / sat.gravity.xke).powf(X2O3);

        let (terms, xlamo, xfact) = match resonance {
            Resonance::None => (ResonanceTerms::None, 0.0, 0.0),
            Resonance::HalfDay => {
                let terms = half_day_terms(sat.ecco, sinim, cosim, nm, aonv);
                let xlamo = (sat.mo + sat.nodeo + sat.nodeo - theta - theta) % TAU;
                let xfact = sat.mdot + dmdt + 2.0 * (sat.nodedot + dnodt - RPTIM) - nm;
                (terms, xlamo, xfact)
            }
            Resonance::Synchronous => {
                let g200 = 1.0 + emsq * (-2.5 + 0.8125 * emsq);
                let g310 = 1.0 + 2.0 * emsq;
                let g300 = 1.0 + emsq * (-6.0 + 6.609_37 * emsq);
                let f220 = 0.75 * (1.0 + cosim) * (1.0 + cosim);
                let f311 = 0.9375 * sinim * sinim * (1.0 + 3.0 * cosim) - 0.75 * (1.0 + cosim);
                let f330 = 1.875 * (1.0 + cosim).powi(3);
                let del1 = 3.0 * nm * nm * aonv * aonv;
                let del2 = 2.0 * del1 * f220 * g200 * Q22;
                let del3 = 3.0 * del1 * f330 * g300 * Q33 * aonv;
                let del1 = del1 * f311 * g310 * Q31 * aonv;

                let xpidot = sat.argpdot + sat.nodedot;
                let xlamo = (sat.mo + sat.nodeo + sat.argpo - theta) % TAU;
                let xfact = sat.mdot + xpidot - RPTIM + dmdt + domdt + dnodt - nm;
                (ResonanceTerms::Synchronous { del1, del2, del3 }, xlamo, xfact)
            }
        };

        DeepSpace {
            solar: PeriodicCoefficients::new(&common.solar, emsq, ZES),
            lunar: PeriodicCoefficients::new(&common.lunar, emsq, ZEL),
            zmol: common.zmol,
            zmos: common.zmos,
            dedt,
            didt,
            dmdt,
            dnodt,
            domdt,
            resonance,
            terms,
            xfact,
            xlamo,
            state: ResonanceState::at_epoch(xlamo, nm),
        }
    }

    /// Apply lunar-solar secular drift to `el` at `t` minutes from epoch and,
    /// for resonant orbits, integrate mean longitude and mean motion.
    ///
    /// `el.mean_motion` must hold the Brouwer mean motion on entry.
    pub fn secular(&mut self, t: f64, sat_consts: SecularInputs, el: &mut MeanElements) {
        let theta = (sat_consts.gsto + t * RPTIM) % TAU;
        el.ecc += self.dedt * t;
        el.incl += self.didt * t;
        el.argp += self.domdt * t;
        el.node += self.dnodt * t;
        el.mean_anomaly += self.dmdt * t;

        if self.resonance == Resonance::None {
            return;
        }

        let no = sat_consts.no_unkozai;
        let mut state = self.state;
        if state.atime == 0.0 || t * state.atime <= 0.0 || t.abs() < state.atime.abs() {
            tracing::trace!(t, atime = state.atime, "restarting resonance integrator");
            state = ResonanceState::at_epoch(self.xlamo, no);
        }

        let delt = if t > 0.0 { STEP } else { -STEP };
        let (mut xndt, mut xldot, mut xnddt) = self.resonance_rates(&state, sat_consts.argpo, sat_consts.argpdot);
        // Exits on NaN; the kernel rejects infinite times before getting here
        while (t - state.atime).abs() >= STEP {
            state.xli += xldot * delt + xndt * STEP2;
            state.xni += xndt * delt + xnddt * STEP2;
            state.atime += delt;
            (xndt, xldot, xnddt) = self.resonance_rates(&state, sat_consts.argpo, sat_consts.argpdot);
        }
        let ft = t - state.atime;
        self.state = state;

        let nm = state.xni + xndt * ft + xnddt * ft * ft * 0.5;
        let xl = state.xli + xldot * ft + xndt * ft * ft * 0.5;
        el.mean_anomaly = match self.resonance {
            Resonance::Synchronous => xl - el.node - el.argp + theta,
            _ => xl - 2.0 * el.node + 2.0 * theta,
        };
        el.mean_motion = nm;
    }

    /// Mean-motion rate, longitude rate and mean-motion acceleration.
    fn resonance_rates(&self, state: &ResonanceState, argpo: f64, argpdot: f64) -> (f64, f64, f64) {
        let xli = state.xli;
        let xldot = state.xni + self.xfact;

        match self.terms {
            ResonanceTerms::None => (0.0, xldot, 0.0),
            ResonanceTerms::Synchronous { del1, del2, del3 } => {
                let xndt = del1 * (xli - FASX2).sin()
                    + del2 * (2.0 * (xli - FASX4)).sin()
                    + del3 * (3.0 * (xli - FASX6)).sin();
                let xnddt = del1 * (xli - FASX2).cos()
                    + 2.0 * del2 * (2.0 * (xli - FASX4)).cos()
                    + 3.0 * del3 * (3.0 * (xli - FASX6)).cos();
                (xndt, xldot, xnddt * xldot)
            }
            ResonanceTerms::HalfDay {
                d2201,
                d2211,
                d3210,
                d3222,
                d4410,
                d4422,
                d5220,
                d5232,
                d5421,
                d5433,
            } => {
                let xomi = argpo + argpdot * state.atime;
                let x2omi = xomi + xomi;
                let x2li = xli + xli;
                let xndt = d2201 * (x2omi + xli - G22).sin()
                    + d2211 * (xli - G22).sin()
                    + d3210 * (xomi + xli - G32).sin()
                    + d3222 * (-xomi + xli - G32).sin()
                    + d4410 * (x2omi + x2li - G44).sin()
                    + d4422 * (x2li - G44).sin()
                    + d5220 * (xomi + xli - G52).sin()
                    + d5232 * (-xomi + xli - G52).sin()
                    + d5421 * (xomi + x2li - G54).sin()
                    + d5433 * (-xomi + x2li - G54).sin();
                let xnddt = d2201 * (x2omi + xli - G22).cos()
                    + d2211 * (xli - G22).cos()
                    + d3210 * (xomi + xli - G32).cos()
                    + d3222 * (-xomi + xli - G32).cos()
                    + d5220 * (xomi + xli - G52).cos()
                    + d5232 * (-xomi + xli - G52).cos()
                    + 2.0
                        * (d4410 * (x2omi + x2li - G44).cos()
                            + d4422 * (x2li - G44).cos()
                            + d5421 * (xomi + x2li - G54).cos()
                            + d5433 * (-xomi + x2li - G54).cos());
                (xndt, xldot, xnddt * xldot)
            }
        }
    }

    /// Apply long-period lunar-solar periodics to `el` at `t` minutes from epoch.
    ///
    /// Eccentricity, inclination, node, argument of perigee and mean anomaly
    /// are updated; mean motion is untouched.
    pub fn periodics(&self, t: f64, ops_mode: OpsMode, el: &mut MeanElements) {
        let [ses, sis, sls, sghs, shs] = self.solar.evaluate(self.zmos + ZNS * t, ZES);
        let [sel, sil, sll, sghl, shl] = self.lunar.evaluate(self.zmol + ZNL * t, ZEL);

        let pe = ses + sel;
        let pinc = sis + sil;
        let pl = sls + sll;
        let pgh = sghs + sghl;
        let ph = shs + shl;

        el.incl += pinc;
        el.ecc += pe;
        let (sinip, cosip) = el.incl.sin_cos();

        if el.incl >= LYDDANE_INCLINATION {
            let ph = ph / sinip;
            el.argp += pgh - cosip * ph;
            el.node += ph;
            el.mean_anomaly += pl;
        } else {
            // Lyddane: perturb the node through its direction cosines
            let (sinop, cosop) = el.node.sin_cos();
            let alfdp = sinip * sinop + (ph * cosop + pinc * cosip * sinop);
            let betdp = sinip * cosop + (-ph * sinop + pinc * cosip * cosop);

            let mut nodep = el.node % TAU;
            if nodep < 0.0 && ops_mode == OpsMode::Afspc {
                nodep += TAU;
            }

            let xls = el.mean_anomaly + el.argp + pl + pgh + (cosip - pinc * sinip) * nodep;
            let xnoh = nodep;
            nodep = alfdp.atan2(betdp);
            if nodep < 0.0 && ops_mode == OpsMode::Afspc {
                nodep += TAU;
            }
            if (xnoh - nodep).abs() > PI {
                if nodep < xnoh {
                    nodep += TAU;
                } else {
                    nodep -= TAU;
                }
            }

            el.mean_anomaly += pl;
            el.node = nodep;
            el.argp = xls - el.mean_anomaly - cosip * nodep;
        }
    }
}

/// Record constants the resonance integrator reads.
#[derive(Debug, Clone, Copy)]
pub struct SecularInputs {
    pub gsto: f64,
    pub argpo: f64,
    pub argpdot: f64,
    pub no_unkozai: f64,
}

impl From<&Satrec> for SecularInputs {
    fn from(sat: &Satrec) -> Self {
        SecularInputs {
            gsto: sat.gsto,
            argpo: sat.argpo,
            argpdot: sat.argpdot,
            no_unkozai: sat.no_unkozai,
        }
    }
}

/// Half-day (12 h, e ≥ 0.5) resonance amplitudes.
fn half_day_terms(ecc: f64, sinim: f64, cosim: f64, nm: f64, aonv: f64) -> ResonanceTerms {
    let em = ecc;
    let emsq = ecc * ecc;
    let eoc = em * emsq;
    let cosisq = cosim * cosim;

    let g201 = -0.306 - (em - 0.64) * 0.440;
    let (g211, g310, g322, g410, g422, g520);
    if em <= 0.65 {
        g211 = 3.616 - 13.2470 * em + 16.2900 * emsq;
        g310 = -19.302 + 117.3900 * em - 228.4190 * emsq + 156.5910 * eoc;
        g322 = -18.9068 + 109.7927 * em - 214.6334 * emsq + 146.5816 * eoc;
        g410 = -41.122 + 242.6940 * em - 471.0940 * emsq + 313.9530 * eoc;
        g422 = -146.407 + 841.8800 * em - 1629.014 * emsq + 1083.4350 * eoc;
        g520 = -532.114 + 3017.977 * em - 5740.032 * emsq + 3708.2760 * eoc;
    } else {
        g211 = -72.099 + 331.819 * em - 508.738 * emsq + 266.724 * eoc;
        g310 = -346.844 + 1582.851 * em - 2415.925 * emsq + 1246.113 * eoc;
        g322 = -342.585 + 1554.908 * em - 2366.899 * emsq + 1215.972 * eoc;
        g410 = -1052.797 + 4758.686 * em - 7193.992 * emsq + 3651.957 * eoc;
        g422 = -3581.690 + 16178.110 * em - 24462.770 * emsq + 12422.520 * eoc;
        g520 = if em > 0.715 {
            -5149.66 + 29936.92 * em - 54087.36 * emsq + 31324.56 * eoc
        } else {
            1464.74 - 4664.75 * em + 3763.64 * emsq
        };
    }

    let (g533, g521, g532);
    if em < 0.7 {
        g533 = -919.22770 + 4988.61 * em - 9064.77 * emsq + 5542.21 * eoc;
        g521 = -822.71072 + 4568.6173 * em - 8491.4146 * emsq + 5337.524 * eoc;
        g532 = -853.66600 + 4690.25 * em - 8624.77 * emsq + 5341.4 * eoc;
    } else {
        g533 = -37995.78 + 161616.52 * em - 229838.2 * emsq + 109377.94 * eoc;
        g521 = -51752.104 + 218913.95 * em - 309468.16 * emsq + 146349.42 * eoc;
        g532 = -40023.88 + 170470.89 * em - 242699.48 * emsq + 115605.82 * eoc;
    }

    let sini2 = sinim * sinim;
    let f220 = 0.75 * (1.0 + 2.0 * cosim + cosisq);
    let f221 = 1.5 * sini2;
    let f321 = 1.875 * sinim * (1.0 - 2.0 * cosim - 3.0 * cosisq);
    let f322 = -1.875 * sinim * (1.0 + 2.0 * cosim - 3.0 * cosisq);
    let f441 = 35.0 * sini2 * f220;
    let f442 = 39.375 * sini2 * sini2;
    let f522 = 9.84375
        * sinim
        * (sini2 * (1.0 - 2.0 * cosim - 5.0 * cosisq) + 0.33333333 * (-2.0 + 4.0 * cosim + 6.0 * cosisq));
    let f523 = sinim
        * (4.92187512 * sini2 * (-2.0 - 4.0 * cosim + 10.0 * cosisq)
            + 6.56250012 * (1.0 + 2.0 * cosim - 3.0 * cosisq));
    let f542 = 29.53125 * sinim * (2.0 - 8.0 * cosim + cosisq * (-12.0 + 8.0 * cosim + 10.0 * cosisq));
    let f543 = 29.53125 * sinim * (-2.0 - 8.0 * cosim + cosisq * (12.0 + 8.0 * cosim - 10.0 * cosisq));

    let xno2 = nm * nm;
    let ainv2 = aonv * aonv;
    let mut temp1 = 3.0 * xno2 * ainv2;
    let mut temp = temp1 * ROOT22;
    let d2201 = temp * f220 * g201;
    let d2211 = temp * f221 * g211;
    temp1 *= aonv;
    temp = temp1 * ROOT32;
    let d3210 = temp * f321 * g310;
    let d3222 = temp * f322 * g322;
    temp1 *= aonv;
    temp = 2.0 * temp1 * ROOT44;
    let d4410 = temp * f441 * g410;
    let d4422 = temp * f442 * g422;
    temp1 *= aonv;
    temp = temp1 * ROOT52;
    let d5220 = temp * f522 * g520;
    let d5232 = temp * f523 * g532;
    temp = 2.0 * temp1 * ROOT54;
    let d5421 = temp * f542 * g521;
    let d5433 = temp * f543 * g533;

    ResonanceTerms::HalfDay {
        d2201,
        d2211,
        d3210,
        d3222,
        d4410,
        d4422,
        d5220,
        d5232,
        d5421,
        d5433,
    }
}
