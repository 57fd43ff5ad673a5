use approx::assert_abs_diff_eq;
use sgp4_core::tle::compute_checksum;
use sgp4_core::{propagate_catalog, OpsMode, Resonance, Satrec, Sgp4Error, Sgp4Options, StateVector, Tle};

const ISS: (&str, &str) = (
    "1 25544U 98067A   23054.45075046  .00020310  00000-0  36478-3 0  9992",
    "2 25544  51.6417 203.5231 0005102 218.5493 303.0730 15.49367633384651",
);

// Near-Earth verification set with non-zero eccentricity
const SAT_00005: (&str, &str) = (
    "1 00005U 58002B   00179.78495062  .00000023  00000-0  28098-4 0  4753",
    "2 00005  34.2682 348.7242 1859667 331.7664  19.3264 10.82419157413667",
);

// Molniya, 12-hour resonance
const MOLNIYA: (&str, &str) = (
    "1 08195U 75081A   06176.33215444  .00000099  00000-0  11873-3 0   813",
    "2 08195  64.1586 279.0717 6877146 264.7651  20.2257  2.00491383225656",
);

// Geosynchronous, 24-hour resonance, inclination below 0.2 rad
const GEO: (&str, &str) = (
    "1 24208U 96044A   06177.04061740 -.00000094  00000-0  10000-3 0  1464",
    "2 24208   3.8536  80.0121 0026640 311.0977  48.3000  1.00778172095889",
);

fn record(lines: (&str, &str), options: Sgp4Options) -> Satrec {
    let tle = Tle::parse(lines.0, lines.1).unwrap();
    Satrec::from_tle(&tle, options)
}

fn assert_state(sv: &StateVector, r: [f64; 3], v: [f64; 3], r_tol: f64, v_tol: f64) {
    for k in 0..3 {
        assert_abs_diff_eq!(sv.r[k], r[k], epsilon = r_tol);
        assert_abs_diff_eq!(sv.v[k], v[k], epsilon = v_tol);
    }
}

fn all_finite(sv: &StateVector) -> bool {
    sv.r.iter().chain(sv.v.iter()).all(|x| x.is_finite())
}

#[test]
fn iss_low_earth_orbit() {
    let mut sat = record(ISS, Sgp4Options::default());
    assert!(!sat.is_deep_space());
    assert!(sat.period_minutes() < 100.0);

    let sv = sat.propagate(0.0).unwrap();
    assert!((6500.0..=6900.0).contains(&sv.r_mag()), "|r| = {}", sv.r_mag());
    assert!((7.4..=7.7).contains(&sv.v_mag()), "|v| = {}", sv.v_mag());
    assert_state(
        &sv,
        [6442.295625, 1357.209264, 1675.333241],
        [0.413643963, 5.101204237, -5.705575028],
        1e-5,
        1e-8,
    );

    let day = sat.propagate(1440.0).unwrap();
    assert_state(
        &day,
        [-6558.581474, -905.534639, -1553.657935],
        [-0.666506266, -5.017141798, 5.745291046],
        1e-5,
        1e-8,
    );
}

#[test]
fn near_earth_verification_set() {
    let mut sat = record(SAT_00005, Sgp4Options::default());
    assert!(!sat.is_deep_space());

    let sv = sat.propagate(0.0).unwrap();
    assert_state(
        &sv,
        [7022.46529266, -1400.08296755, 0.03995155],
        [1.893841015, 6.405893759, 4.534807250],
        1e-6,
        1e-8,
    );

    let sv = sat.propagate(360.0).unwrap();
    assert_state(
        &sv,
        [-7154.03120202, -3783.17682504, -3536.19412294],
        [4.741887409, -4.151817765, -2.093935425],
        1e-6,
        1e-8,
    );

    let sv = sat.propagate(-1440.0).unwrap();
    assert_state(
        &sv,
        [3758.79747126, 6348.44465201, 4644.59925172],
        [-5.404561380, 3.546685070, 1.866218313],
        1e-6,
        1e-8,
    );
}

#[test]
fn ops_modes_agree_for_near_earth() {
    let mut improved = record(SAT_00005, Sgp4Options::default());
    let mut afspc = record(SAT_00005, Sgp4Options::afspc());
    let a = improved.propagate(720.0).unwrap();
    let b = afspc.propagate(720.0).unwrap();
    assert_state(&a, b.r, b.v, 1e-9, 1e-12);
}

#[test]
fn molniya_half_day_resonance() {
    let mut sat = record(MOLNIYA, Sgp4Options::default());
    assert!(sat.is_deep_space());
    assert!(sat.simple_drag);
    assert_eq!(sat.resonance(), Resonance::HalfDay);

    let sv = sat.propagate(0.0).unwrap();
    assert_state(
        &sv,
        [2349.89483350, -14785.93811562, 0.02119378],
        [2.721488096, -3.256811655, 4.498416672],
        1e-6,
        1e-8,
    );

    let sv = sat.propagate(1440.0).unwrap();
    assert_state(
        &sv,
        [2890.806383, -15446.439523, 948.770102],
        [2.654407490, -2.909344895, 4.486437362],
        1e-4,
        1e-7,
    );

    let state = sat.resonance_state().unwrap();
    assert_eq!(state.atime, 1440.0);

    let sv = sat.propagate(2880.0).unwrap();
    assert_state(
        &sv,
        [3417.209316, -16038.795107, 1894.749341],
        [2.585515864, -2.596818146, 4.456882556],
        1e-4,
        1e-7,
    );
}

#[test]
fn geosynchronous_resonance() {
    let mut sat = record(GEO, Sgp4Options::default());
    assert!(sat.is_deep_space());
    assert_eq!(sat.resonance(), Resonance::Synchronous);

    for (t, r) in [
        (0.0, [7534.104005, 41266.360453, -0.108032]),
        (720.0, [-6874.621260, -41530.375895, -46.612886]),
        (1440.0, [5500.768446, 41590.286774, 138.346141]),
    ] {
        let sv = sat.propagate(t).unwrap();
        for k in 0..3 {
            assert_abs_diff_eq!(sv.r[k], r[k], epsilon = 1e-4);
        }
        assert!((41_800.0..42_300.0).contains(&sv.r_mag()), "|r| = {}", sv.r_mag());
    }
}

#[test]
fn backward_propagation_restarts_integrator() {
    let mut sat = record(GEO, Sgp4Options::default());
    sat.propagate(2880.0).unwrap();
    let sv = sat.propagate(-1440.0).unwrap();
    assert_state(
        &sv,
        [9550.315583, 40842.464096, -138.791278],
        [-2.996303572, 0.707293617, 0.207480883],
        1e-4,
        1e-7,
    );
    assert_eq!(sat.resonance_state().unwrap().atime, -1440.0);
}

#[test]
fn lyddane_branches_both_finite() {
    let tle = Tle::parse(GEO.0, GEO.1).unwrap();
    let low = tle.to_element_set();
    let mut high = low.clone();
    high.inclo = 0.25;

    for (el, expected) in [
        (&low, [5500.768446, 41590.286774, 138.346141]),
        (&high, [5547.067752, 41581.902693, 460.483356]),
    ] {
        for ops_mode in [OpsMode::Afspc, OpsMode::Improved] {
            let options = Sgp4Options::default().with_ops_mode(ops_mode);
            let mut sat = Satrec::from_elements(el, options);
            for t in [0.0, 720.0, 4320.0, -2000.0] {
                let sv = sat.propagate(t).unwrap();
                assert!(all_finite(&sv), "t = {t}, incl = {}", el.inclo);
                let coe = sv.osculating_elements(sat.gravity.mu).unwrap();
                assert!(coe.incl.is_finite());
            }
            let sv = sat.propagate(1440.0).unwrap();
            for k in 0..3 {
                assert_abs_diff_eq!(sv.r[k], expected[k], epsilon = 1e-4);
            }
        }
    }
}

#[test]
fn repeated_calls_are_bit_identical() {
    for lines in [ISS, SAT_00005, MOLNIYA, GEO] {
        let mut sat = record(lines, Sgp4Options::default());
        let first = sat.propagate(1000.0).unwrap();
        let second = sat.propagate(1000.0).unwrap();
        assert_eq!(first, second);

        sat.propagate(5000.0).unwrap();
        let third = sat.propagate(1000.0).unwrap();
        assert_eq!(first, third);
    }
}

#[test]
fn decayed_record_reports_code_6() {
    let tle = Tle::parse(ISS.0, ISS.1).unwrap();
    let mut el = tle.to_element_set();
    el.no_kozai = 0.0766;
    el.ecco = 0.0001;

    let mut sat = Satrec::from_elements(&el, Sgp4Options::default());
    // The epoch check at initialization already records the failure
    assert_eq!(sat.error_code(), 6);
    let err = sat.propagate(0.0).unwrap_err();
    assert_eq!(err.code(), 6);
    assert_eq!(sat.error, Some(err));
}

#[test]
fn failed_records_do_not_abort_catalog() {
    let tle = Tle::parse(ISS.0, ISS.1).unwrap();
    let mut decayed = tle.to_element_set();
    decayed.no_kozai = 0.0766;
    decayed.ecco = 0.0001;

    let mut catalog = vec![
        record(ISS, Sgp4Options::default()),
        Satrec::from_elements(&decayed, Sgp4Options::default()),
        record(MOLNIYA, Sgp4Options::default()),
        record(GEO, Sgp4Options::default()),
    ];
    let results = propagate_catalog(&mut catalog, 720.0);
    assert_eq!(results.len(), 4);
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(Sgp4Error::Decayed(_))));
    assert!(results[2].is_ok());
    assert!(results[3].is_ok());

    let mut geo = record(GEO, Sgp4Options::default());
    assert_eq!(results[3].as_ref().unwrap(), &geo.propagate(720.0).unwrap());
}

#[test]
fn resonance_classification_boundaries() {
    assert_eq!(Resonance::classify(0.0052359877, 0.0), Resonance::Synchronous);
    assert_eq!(Resonance::classify(0.0034906585, 0.0), Resonance::Synchronous);
    assert_eq!(Resonance::classify(0.0034906584, 0.0), Resonance::None);
    assert_eq!(Resonance::classify(0.00826, 0.5), Resonance::HalfDay);
    assert_eq!(Resonance::classify(0.00826, 0.49), Resonance::None);
    assert_eq!(Resonance::classify(0.0093, 0.7), Resonance::None);
}

fn with_checksum(body: &str) -> String {
    format!("{}{}", body, compute_checksum(body))
}

#[test]
fn alpha5_catalog_number() {
    let line1 = with_checksum(&ISS.0[..68].replacen("25544", "J1234", 1));
    let line2 = with_checksum(&ISS.1[..68].replacen("25544", "J1234", 1));

    let tle = Tle::parse(&line1, &line2).unwrap();
    assert_eq!(tle.satnum, "J1234");
    assert_eq!(tle.norad_id, 191_234);

    let mut sat = Satrec::from_tle(&tle, Sgp4Options::default());
    assert_eq!(sat.satnum, "J1234");
    let renamed = sat.propagate(90.0).unwrap();
    let original = record(ISS, Sgp4Options::default()).propagate(90.0).unwrap();
    assert_eq!(renamed, original);
}

#[test]
fn non_finite_times_are_rejected() {
    for lines in [ISS, SAT_00005, MOLNIYA, GEO] {
        let mut sat = record(lines, Sgp4Options::default());
        let before = sat.resonance_state();
        for t in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = sat.propagate(t).unwrap_err();
            assert!(matches!(err, Sgp4Error::NonFiniteTime(_)), "t = {t}: {err:?}");
            assert_eq!(err.code(), 1);
            assert_eq!(sat.error_code(), 1);
        }
        assert_eq!(sat.resonance_state(), before);

        // The record stays usable afterwards
        assert!(sat.propagate(720.0).is_ok());
        assert_eq!(sat.error, None);
    }
}

#[test]
fn non_finite_time_in_catalog_fails_per_record() {
    let mut catalog = vec![
        record(ISS, Sgp4Options::default()),
        record(MOLNIYA, Sgp4Options::default()),
        record(GEO, Sgp4Options::default()),
    ];
    for t in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let results = propagate_catalog(&mut catalog, t);
        assert_eq!(results.len(), 3);
        for result in &results {
            assert!(matches!(result, Err(Sgp4Error::NonFiniteTime(_))));
        }
    }
    assert!(propagate_catalog(&mut catalog, 1440.0).iter().all(|r| r.is_ok()));
}

#[test]
fn far_future_resonant_propagation_returns() {
    // A century of 720-minute integrator steps
    let t = 100.0 * 365.25 * 1440.0;
    let mut sat = record(GEO, Sgp4Options::default());
    if let Ok(sv) = sat.propagate(t) {
        assert!(all_finite(&sv));
    }
    assert_eq!(sat.resonance_state().unwrap().atime, t);
}
