//! Python bindings via PyO3.
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::constants;
use crate::gravity::GravityModel;
use crate::propagator::{self, StateVector};
use crate::satrec::{OpsMode, Satrec, Sgp4Options};
use crate::tle::Tle;

fn state_row(s: &StateVector) -> Vec<f64> {
    vec![s.tsince, s.r[0], s.r[1], s.r[2], s.v[0], s.v[1], s.v[2]]
}

fn options(gravity: &str, opsmode: &str) -> PyResult<Sgp4Options> {
    let gravity = gravity
        .parse::<GravityModel>()
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    let ops_mode = opsmode.parse::<OpsMode>().map_err(PyValueError::new_err)?;
    Ok(Sgp4Options { gravity, ops_mode })
}

// TLE
#[pyclass(name = "TLE")]
#[derive(Clone)]
pub struct PyTle {
    inner: Tle,
}

#[pymethods]
impl PyTle {
    /// Parse a TLE from two lines.
    #[staticmethod]
    fn parse(line1: &str, line2: &str) -> PyResult<Self> {
        Tle::parse(line1, line2)
            .map(|t| PyTle { inner: t })
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    /// Parse a TLE from three lines (name + line1 + line2).
    #[staticmethod]
    fn parse_3line(name: &str, line1: &str, line2: &str) -> PyResult<Self> {
        Tle::parse_3line(name, line1, line2)
            .map(|t| PyTle { inner: t })
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    /// Parse a batch of TLEs from a multi-line string.
    #[staticmethod]
    fn parse_batch(text: &str) -> PyResult<Vec<PyTle>> {
        Tle::parse_batch(text)
            .map(|tles| tles.into_iter().map(|t| PyTle { inner: t }).collect())
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    /// Epoch as (jd, fraction).
    fn epoch_jd(&self) -> (f64, f64) { self.inner.epoch_jd() }

    /// Orbital period (minutes).
    fn period_minutes(&self) -> f64 { self.inner.period_minutes() }

    #[getter] fn name(&self) -> Option<String> { self.inner.name.clone() }
    #[getter] fn satnum(&self) -> String { self.inner.satnum.clone() }
    #[getter] fn norad_id(&self) -> u32 { self.inner.norad_id }
    #[getter] fn inclination_deg(&self) -> f64 { self.inner.inclination_deg }
    #[getter] fn raan_deg(&self) -> f64 { self.inner.raan_deg }
    #[getter] fn eccentricity(&self) -> f64 { self.inner.eccentricity }
    #[getter] fn arg_perigee_deg(&self) -> f64 { self.inner.arg_perigee_deg }
    #[getter] fn mean_anomaly_deg(&self) -> f64 { self.inner.mean_anomaly_deg }
    #[getter] fn mean_motion(&self) -> f64 { self.inner.mean_motion_rev_day }
    #[getter] fn bstar(&self) -> f64 { self.inner.bstar }
    #[getter] fn epoch_year(&self) -> i32 { self.inner.epoch_year }
    #[getter] fn epoch_day(&self) -> f64 { self.inner.epoch_day }
    #[getter] fn classification(&self) -> char { self.inner.classification }
    #[getter] fn intl_designator(&self) -> String { self.inner.intl_designator.clone() }

    fn __repr__(&self) -> String {
        format!("{}", self.inner)
    }
}

// Propagation record
#[pyclass(name = "Satrec")]
#[derive(Clone)]
pub struct PySatrec {
    inner: Satrec,
}

#[pymethods]
impl PySatrec {
    /// Initialize from a parsed TLE.
    ///
    /// Args:
    ///     gravity: "wgs72old", "wgs72" or "wgs84" (default: "wgs72")
    ///     opsmode: "a" for AFSPC compatibility, "i" for improved (default: "i")
    #[staticmethod]
    #[pyo3(signature = (tle, gravity="wgs72", opsmode="i"))]
    fn from_tle(tle: &PyTle, gravity: &str, opsmode: &str) -> PyResult<Self> {
        let opts = options(gravity, opsmode)?;
        Ok(PySatrec { inner: Satrec::from_tle(&tle.inner, opts) })
    }

    /// Propagate to minutes from epoch.
    ///
    /// Returns [tsince, x, y, z, vx, vy, vz] in km and km/s.
    fn propagate(&mut self, tsince: f64) -> PyResult<Vec<f64>> {
        self.inner
            .propagate(tsince)
            .map(|s| state_row(&s))
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }

    /// Propagate to an absolute Julian date split as (jd, fraction).
    fn propagate_jd(&mut self, jd: f64, fr: f64) -> PyResult<Vec<f64>> {
        self.inner
            .propagate_jd(jd, fr)
            .map(|s| state_row(&s))
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }

    /// Propagate to each time; failed steps come back as None.
    fn propagate_many(&mut self, times: Vec<f64>) -> Vec<Option<Vec<f64>>> {
        self.inner
            .propagate_many(&times)
            .iter()
            .map(|r| r.as_ref().ok().map(state_row))
            .collect()
    }

    /// Summary of the initialized record.
    fn info(&self, py: Python<'_>) -> PyResult<Py<PyDict>> {
        let dict = PyDict::new(py);
        dict.set_item("satnum", self.inner.satnum.clone())?;
        dict.set_item("deep_space", self.inner.is_deep_space())?;
        dict.set_item("resonance", format!("{:?}", self.inner.resonance()))?;
        dict.set_item("period_min", self.inner.period_minutes())?;
        dict.set_item("perigee_km", self.inner.perigee_km())?;
        dict.set_item("apogee_km", self.inner.apogee_km())?;
        dict.set_item("inclination_deg", self.inner.inclo * constants::RAD2DEG)?;
        dict.set_item("gsto", self.inner.gsto)?;
        Ok(dict.into())
    }

    #[getter] fn error(&self) -> u8 { self.inner.error_code() }
    #[getter] fn jdsatepoch(&self) -> f64 { self.inner.epoch_jd }
    #[getter] fn jdsatepochf(&self) -> f64 { self.inner.epoch_jd_frac }
    #[getter] fn no_kozai(&self) -> f64 { self.inner.no_kozai }
    #[getter] fn no_unkozai(&self) -> f64 { self.inner.no_unkozai }
}

// Free functions
#[pyfunction]
#[pyo3(signature = (sats, tsince))]
fn propagate_catalog(mut sats: Vec<PyRefMut<'_, PySatrec>>, tsince: f64) -> Vec<Option<Vec<f64>>> {
    let mut records: Vec<Satrec> = sats.iter().map(|s| s.inner.clone()).collect();
    let results = propagator::propagate_catalog(&mut records, tsince);
    for (py_sat, rec) in sats.iter_mut().zip(records) {
        py_sat.inner = rec;
    }
    results.iter().map(|r| r.as_ref().ok().map(state_row)).collect()
}

#[pyfunction]
fn julian_date(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: f64) -> (f64, f64) {
    crate::time::julian_date(year, month, day, hour, minute, second)
}

// Module registration
pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyTle>()?;
    m.add_class::<PySatrec>()?;
    m.add_function(wrap_pyfunction!(propagate_catalog, m)?)?;
    m.add_function(wrap_pyfunction!(julian_date, m)?)?;
    Ok(())
}
